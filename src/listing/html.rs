//! Directory listing normalization.
//!
//! Server index pages are rarely well-formed, so anchors are found with a
//! tolerant pattern scan rather than a document parser.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::IMAGE_EXTENSIONS;
use crate::listing::Listing;
use crate::listing::folder::is_subfolder_href;
use crate::model::ImageRecord;

/// Opening `<a ...>` tags, capturing the attribute text.
static ANCHOR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a(\s[^>]*)?>").expect("anchor pattern is valid"));

/// An `href` attribute with a double-quoted, single-quoted or bare value.
static HREF_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)(?:^|\s)href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("href pattern is valid")
});

/// Check if an href names an image: a supported extension with a non-empty stem.
pub fn is_image_href(href: &str) -> bool {
    let lower = href.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| {
        lower
            .strip_suffix(ext)
            .and_then(|rest| rest.strip_suffix('.'))
            .is_some_and(|stem| !stem.is_empty())
    })
}

/// Collect every `href` value in document order, with basic entities decoded.
pub fn anchor_hrefs(document: &str) -> Vec<String> {
    ANCHOR_TAG
        .captures_iter(document)
        .filter_map(|tag| {
            let attrs = tag.get(1)?.as_str();
            let value = HREF_ATTR.captures(attrs).and_then(|caps| {
                caps.get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
            })?;
            let href = decode_entities(value.as_str().trim());
            (!href.is_empty()).then_some(href)
        })
        .collect()
}

/// Build a listing from a server index page for `folder`.
///
/// Hrefs that are neither images nor direct subfolders are dropped.
pub fn parse_listing(folder: &str, document: &str) -> Listing {
    let mut listing = Listing::new(folder.to_string());
    let mut skipped = 0usize;

    for href in anchor_hrefs(document) {
        if is_image_href(&href) {
            listing
                .images
                .push(ImageRecord::new(format!("{}{}", folder, href), href));
        } else if is_subfolder_href(&href) {
            listing.subfolders.push(href);
        } else {
            skipped += 1;
        }
    }

    log::debug!(
        "Listing for '{}': {} images, {} subfolders, {} other links skipped",
        folder,
        listing.images.len(),
        listing.subfolders.len(),
        skipped
    );
    listing
}

fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const APACHE_INDEX: &str = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 3.2 Final//EN">
<html><head><title>Index of /scans</title></head><body>
<h1>Index of /scans</h1>
<table>
<tr><th><a href="?C=N;O=D">Name</a></th><th><a href="?C=M;O=A">Last modified</a></th></tr>
<tr><td><a href="/">Parent Directory</a></td></tr>
<tr><td><a href="page001.jpg">page001.jpg</a></td></tr>
<tr><td><a href="page002.JPEG">page002.JPEG</a></td></tr>
<tr><td><a href="notes.txt">notes.txt</a></td></tr>
<tr><td><a href="covers/">covers/</a></td></tr>
<tr><td><a href="map.svg">map.svg</a></td></tr>
</table></body></html>"#;

    #[test]
    fn test_image_href_classification() {
        assert!(is_image_href("a.jpg"));
        assert!(is_image_href("A.JPG"));
        assert!(is_image_href("scan.jpeg"));
        assert!(is_image_href("x.PnG"));
        assert!(is_image_href("icon.svg"));
        assert!(is_image_href("anim.gif"));
        assert!(!is_image_href(".jpg"));
        assert!(!is_image_href("photo.webp"));
        assert!(!is_image_href("jpg"));
        assert!(!is_image_href("notes.txt"));
        assert!(!is_image_href("folder/"));
    }

    #[test]
    fn test_apache_index() {
        let listing = parse_listing("scans/", APACHE_INDEX);
        let names: Vec<&str> = listing
            .images
            .iter()
            .map(|image| image.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["page001.jpg", "page002.JPEG", "map.svg"]);
        assert_eq!(listing.images[0].source_path, "scans/page001.jpg");
        assert_eq!(listing.subfolders, vec!["covers/".to_string()]);
    }

    #[test]
    fn test_space_in_href_gives_safe_id() {
        let html = r#"<a href="photo 1.png">photo 1</a> <a href="sub/">sub</a>"#;
        let listing = parse_listing("", html);
        assert_eq!(listing.images.len(), 1);
        assert_eq!(listing.images[0].id, "photo_1.png");
        assert_eq!(listing.images[0].display_name, "photo 1.png");
        assert_eq!(listing.subfolders, vec!["sub/".to_string()]);
    }

    #[test]
    fn test_tolerates_malformed_anchors() {
        let html = r#"<a>no href</a><a name=x><A HREF=bare.gif>bare</A>
            <a class='x' href='single.png'><a href="unterminated.jpg <a href="">empty</a>
            <a data-href="decoy.jpg" href="real.jpg">"#;
        let hrefs = anchor_hrefs(html);
        assert!(hrefs.contains(&"bare.gif".to_string()));
        assert!(hrefs.contains(&"single.png".to_string()));
        assert!(hrefs.contains(&"real.jpg".to_string()));
        assert!(!hrefs.contains(&"decoy.jpg".to_string()));
        assert!(!hrefs.iter().any(|h| h.is_empty()));
    }

    #[test]
    fn test_entities_decoded() {
        let hrefs = anchor_hrefs(r#"<a href="fish&amp;chips.jpg">x</a>"#);
        assert_eq!(hrefs, vec!["fish&chips.jpg".to_string()]);
    }

    #[test]
    fn test_not_an_anchor() {
        assert!(anchor_hrefs(r#"<abbr href="x.jpg"></abbr><link href="y.png">"#).is_empty());
    }
}
