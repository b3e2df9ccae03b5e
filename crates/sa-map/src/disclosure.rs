/// Button text while the extra content is hidden
pub const COLLAPSED_TEXT: &str = "More ...";

/// "Show more" toggle of the filter bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Disclosure {
    expanded: bool,
}

impl Disclosure {
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Label matching the current state
    pub fn label(&self) -> &'static str {
        if self.expanded {
            "Hide"
        } else {
            "Show"
        }
    }

    /// Flip the state and return the new button text
    pub fn toggle(&mut self, expanded_text: &str) -> String {
        self.expanded = !self.expanded;
        if self.expanded {
            expanded_text.to_string()
        } else {
            COLLAPSED_TEXT.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_follows_state() {
        let mut disclosure = Disclosure::default();
        assert_eq!(disclosure.label(), "Show");

        assert_eq!(disclosure.toggle("Less"), "Less");
        assert!(disclosure.is_expanded());
        assert_eq!(disclosure.label(), "Hide");

        assert_eq!(disclosure.toggle("Less"), COLLAPSED_TEXT);
        assert_eq!(disclosure.label(), "Show");
    }
}
