//! Selection state machine.
//!
//! At most one image is *open* (shown large) at a time. Closing an image
//! leaves a transient "just closed" marker on it, which the next selection
//! call of either kind removes.
//!
//! The machine itself only computes transitions. The viewer applies them:
//! resetting transforms, updating the renderer and pushing history.

/// Where a selection request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOrigin {
    /// A click, keyboard command or initial target
    User,
    /// A back/forward navigation; history must not be pushed again
    History,
}

/// Effects of one `select` or `deselect` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// Image that left the open state (its transform must be reset)
    pub closed: Option<String>,
    /// Image that is open after the call (also set when reselecting)
    pub opened: Option<String>,
    /// Image whose "just closed" marker was removed
    pub marker_cleared: Option<String>,
    /// Image that received the "just closed" marker
    pub marker_set: Option<String>,
    /// Whether a history entry should be pushed for `opened`
    pub push_history: bool,
}

impl Transition {
    /// Whether the call changed nothing at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Tracks the open image and the most recently closed one.
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    current: Option<String>,
    previously_closed: Option<String>,
}

impl SelectionMachine {
    /// Start in the closed state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The open image, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The image carrying the "just closed" marker, if any.
    pub fn previously_closed(&self) -> Option<&str> {
        self.previously_closed.as_deref()
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.current.as_deref() == Some(id)
    }

    /// Open `id`, closing whatever was open before.
    ///
    /// Selecting the image that is already open only clears the marker and
    /// reports `opened` again so it can be scrolled back into view.
    pub fn select(&mut self, id: &str, origin: SelectOrigin) -> Transition {
        let mut transition = Transition {
            marker_cleared: self.previously_closed.take(),
            push_history: origin == SelectOrigin::User,
            ..Transition::default()
        };

        if !self.is_open(id) {
            transition.closed = self.current.take();
            log::debug!("Select '{}' (closing {:?})", id, transition.closed);
            self.current = Some(id.to_string());
        }
        transition.opened = Some(id.to_string());
        transition
    }

    /// Close `id`.
    ///
    /// Only the open image can be closed; for any other id the call just
    /// clears the "just closed" marker.
    pub fn deselect(&mut self, id: &str) -> Transition {
        if !self.is_open(id) {
            log::debug!("Ignoring deselect of '{}': not open", id);
            return Transition {
                marker_cleared: self.previously_closed.take(),
                ..Transition::default()
            };
        }

        log::debug!("Deselect '{}'", id);
        let transition = Transition {
            closed: self.current.take(),
            marker_cleared: self.previously_closed.take(),
            marker_set: Some(id.to_string()),
            ..Transition::default()
        };
        self.previously_closed = Some(id.to_string());
        transition
    }

    /// Back to the initial state (the display is being rebuilt).
    pub fn reset(&mut self) {
        self.current = None;
        self.previously_closed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_closed() {
        let machine = SelectionMachine::new();
        assert_eq!(machine.current(), None);
        assert_eq!(machine.previously_closed(), None);
    }

    #[test]
    fn test_select_from_closed() {
        let mut machine = SelectionMachine::new();
        let t = machine.select("a", SelectOrigin::User);
        assert_eq!(t.opened.as_deref(), Some("a"));
        assert_eq!(t.closed, None);
        assert!(t.push_history);
        assert!(machine.is_open("a"));
    }

    #[test]
    fn test_select_other_closes_previous() {
        let mut machine = SelectionMachine::new();
        machine.select("a", SelectOrigin::User);
        let t = machine.select("b", SelectOrigin::User);
        assert_eq!(t.closed.as_deref(), Some("a"));
        assert_eq!(t.opened.as_deref(), Some("b"));
        assert_eq!(machine.current(), Some("b"));
        // Switching images is not a "close"; no marker
        assert_eq!(machine.previously_closed(), None);
    }

    #[test]
    fn test_reselect_is_noop() {
        let mut machine = SelectionMachine::new();
        machine.select("a", SelectOrigin::User);
        let t = machine.select("a", SelectOrigin::User);
        assert_eq!(t.closed, None);
        assert_eq!(t.opened.as_deref(), Some("a"));
        assert!(machine.is_open("a"));
    }

    #[test]
    fn test_history_origin_does_not_push() {
        let mut machine = SelectionMachine::new();
        let t = machine.select("a", SelectOrigin::History);
        assert!(!t.push_history);
        assert!(machine.is_open("a"));
    }

    #[test]
    fn test_deselect_sets_marker() {
        let mut machine = SelectionMachine::new();
        machine.select("a", SelectOrigin::User);
        let t = machine.deselect("a");
        assert_eq!(t.closed.as_deref(), Some("a"));
        assert_eq!(t.marker_set.as_deref(), Some("a"));
        assert!(!t.push_history);
        assert_eq!(machine.current(), None);
        assert_eq!(machine.previously_closed(), Some("a"));
    }

    #[test]
    fn test_deselect_of_other_id_is_ignored() {
        let mut machine = SelectionMachine::new();
        machine.select("a", SelectOrigin::User);
        assert!(machine.deselect("b").is_empty());
        assert!(machine.is_open("a"));

        let mut closed = SelectionMachine::new();
        assert!(closed.deselect("a").is_empty());
    }

    #[test]
    fn test_ignored_deselect_still_clears_marker() {
        let mut machine = SelectionMachine::new();
        machine.select("a", SelectOrigin::User);
        machine.deselect("a");
        let t = machine.deselect("b");
        assert_eq!(t.marker_cleared.as_deref(), Some("a"));
        assert_eq!(t.closed, None);
        assert_eq!(machine.previously_closed(), None);
    }

    #[test]
    fn test_marker_cleared_by_next_call() {
        let mut machine = SelectionMachine::new();
        machine.select("a", SelectOrigin::User);
        machine.deselect("a");

        let t = machine.select("b", SelectOrigin::User);
        assert_eq!(t.marker_cleared.as_deref(), Some("a"));
        assert_eq!(machine.previously_closed(), None);

        machine.deselect("b");
        machine.select("b", SelectOrigin::User);
        let t = machine.deselect("b");
        assert_eq!(t.marker_cleared, None);
        assert_eq!(machine.previously_closed(), Some("b"));

        // Reopening the image that was just closed clears its own marker
        let t = machine.select("b", SelectOrigin::User);
        assert_eq!(t.marker_cleared.as_deref(), Some("b"));
        assert_eq!(machine.previously_closed(), None);
    }

    #[test]
    fn test_invariants_hold_over_random_sequences() {
        let ids = ["a", "b", "c"];
        let mut seed: u32 = 0x2545_f491;
        let mut machine = SelectionMachine::new();

        for _ in 0..2000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let id = ids[(seed % 3) as usize];
            let was_open = machine.is_open(id);

            if seed & 8 == 0 {
                machine.select(id, SelectOrigin::User);
                assert!(machine.is_open(id));
                assert_eq!(machine.previously_closed(), None);
            } else {
                let open_before = machine.current().map(str::to_string);
                machine.deselect(id);
                if was_open {
                    assert_eq!(machine.previously_closed(), Some(id));
                    assert_eq!(machine.current(), None);
                } else {
                    assert_eq!(machine.previously_closed(), None);
                    assert_eq!(machine.current().map(str::to_string), open_before);
                }
            }

            if let (Some(current), Some(closed)) = (machine.current(), machine.previously_closed()) {
                assert_ne!(current, closed);
            }
        }
    }
}
