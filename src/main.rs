/// Headless native driver: builds a gallery from a local listing, manifest
/// or directory and logs what a renderer would do.
#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::process::ExitCode;

    use clap::Parser;

    use folio::{
        FetchResponse, ListingRequest, LogLevel, LogRenderer, MemoryHistory, Viewer, ViewerConfig,
    };

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Build an image gallery from a listing or manifest")]
    pub struct Cli {
        /// Listing HTML, manifest JSON or a directory of images
        pub source: PathBuf,

        /// Treat SOURCE as a JSON manifest
        #[arg(long)]
        pub manifest: bool,

        /// Image id to build around and open first
        #[arg(long)]
        pub target: Option<String>,

        /// Folder prefix for listed images
        #[arg(long)]
        pub folder: Option<String>,

        /// Configuration file (defaults to the platform config directory)
        #[arg(long)]
        pub config: Option<PathBuf>,

        /// Images built on each side of the target before the rest
        #[arg(long)]
        pub radius: Option<usize>,

        /// Log level: error, warn, info, debug or trace
        #[arg(long, value_parser = parse_log_level)]
        pub log_level: Option<LogLevel>,
    }

    fn parse_log_level(name: &str) -> Result<LogLevel, String> {
        LogLevel::from_name(name).ok_or_else(|| format!("unknown log level '{}'", name))
    }

    fn load_config(cli: &Cli) -> Result<ViewerConfig, folio::ConfigError> {
        let mut config = match &cli.config {
            Some(path) => ViewerConfig::load_from_path(path)?,
            None => ViewerConfig::load_from_default_path().unwrap_or_default(),
        };

        if let Some(radius) = cli.radius {
            config.window_radius = radius;
        }
        if let Some(level) = cli.log_level {
            config.log_level = level;
        }
        if let Some(folder) = &cli.folder {
            config.folder = folder.clone();
        }
        Ok(config)
    }

    /// Read a source as the text a server would have returned for it.
    ///
    /// A directory becomes an index page with one anchor per entry.
    fn read_source(path: &Path) -> io::Result<String> {
        if !path.is_dir() {
            return fs::read_to_string(path);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let mut name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_dir() {
                name.push('/');
            }
            names.push(name);
        }
        names.sort();

        Ok(names
            .iter()
            .map(|name| format!("<a href=\"{}\">{}</a>\n", name, name))
            .collect())
    }

    pub fn run() -> ExitCode {
        let cli = Cli::parse();

        let config = match load_config(&cli) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        };

        env_logger::Builder::new()
            .filter_level(config.log_level.to_level_filter())
            .parse_default_env()
            .init();

        let url = match &cli.target {
            Some(target) => format!("folio://local/#{}", target),
            None => "folio://local/".to_string(),
        };
        let mut viewer = Viewer::new(config, LogRenderer::new(), MemoryHistory::new(url));

        let source = cli.source.to_string_lossy().into_owned();
        let mut request = if cli.manifest {
            viewer.load_manifest(&source)
        } else {
            match viewer.initial_request() {
                Some(request) => request,
                None if cli.source.is_dir() => viewer.set_folder(&source),
                // A bare listing file keeps its image paths relative
                None => ListingRequest::listing(""),
            }
        };
        let mut body = read_source(&cli.source);

        loop {
            let result = match body {
                Ok(text) => viewer.receive(&request, FetchResponse::ok(text)),
                Err(e) => Err(viewer.receive_failure(&request, &e.to_string())),
            };
            match result {
                Ok(Some(next)) => {
                    body = read_source(Path::new(&next.url));
                    request = next;
                }
                Ok(None) => break,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }

        let ids: Vec<String> = viewer
            .gallery()
            .images()
            .iter()
            .map(|image| image.id.clone())
            .collect();
        for id in &ids {
            viewer.image_loaded(id);
        }

        for id in viewer.renderer().display_order() {
            let marker = if viewer.selection().is_open(&id) { "*" } else { " " };
            println!("{} {}", marker, id);
        }
        for subfolder in viewer.gallery().subfolders() {
            println!("  {}", subfolder);
        }

        ExitCode::SUCCESS
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_cli_parses_options() {
            let cli = Cli::try_parse_from([
                "folio",
                "gallery.json",
                "--manifest",
                "--target",
                "b.jpg",
                "--radius",
                "3",
                "--log-level",
                "debug",
            ])
            .unwrap();
            assert!(cli.manifest);
            assert_eq!(cli.target.as_deref(), Some("b.jpg"));
            assert_eq!(cli.radius, Some(3));
            assert_eq!(cli.log_level, Some(LogLevel::Debug));
        }

        #[test]
        fn test_cli_rejects_unknown_log_level() {
            assert!(Cli::try_parse_from(["folio", "x.html", "--log-level", "loud"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    cli::run()
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
