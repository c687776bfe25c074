/// What a back trigger should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// Step the webview back one entry
    HistoryBack,
    /// No history left, fall through to the default (leave the shell)
    Exit,
}

/// Where the page sits in the webview's session history, as the page itself
/// reports it after every load, `pushState`, fragment change or traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPosition {
    /// Entries behind the current one
    pub index: u32,
    /// `navigation.canGoBack`, where the webview has the Navigation API
    pub can_go_back: Option<bool>,
}

/// Last history position reported by the page.
///
/// Nothing is counted on the host side: the page's own history is the
/// source of truth, so back traversals started by the page and in-page
/// navigation cannot make this drift.
#[derive(Debug, Default)]
pub struct NavigationHistory {
    position: Option<HistoryPosition>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, position: HistoryPosition) {
        self.position = Some(position);
    }

    /// Number of entries the view can go back through
    pub fn depth(&self) -> u32 {
        self.position.map_or(0, |p| p.index)
    }

    pub fn can_go_back(&self) -> bool {
        match self.position {
            Some(p) => p.can_go_back.unwrap_or(p.index > 0),
            None => false,
        }
    }

    pub fn back(&mut self) -> BackAction {
        if !self.can_go_back() {
            return BackAction::Exit;
        }
        // Assume one step back until the page reports where it landed
        if let Some(p) = self.position.as_mut() {
            p.index = p.index.saturating_sub(1);
            p.can_go_back = None;
        }
        BackAction::HistoryBack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(index: u32) -> HistoryPosition {
        HistoryPosition {
            index,
            can_go_back: None,
        }
    }

    #[test]
    fn test_empty_history_exits() {
        let mut history = NavigationHistory::new();
        assert_eq!(history.back(), BackAction::Exit);

        history.report(at(0));
        assert_eq!(history.depth(), 0);
        assert_eq!(history.back(), BackAction::Exit);
    }

    #[test]
    fn test_back_reduces_depth_by_one() {
        let mut history = NavigationHistory::new();
        history.report(at(0));
        history.report(at(1));
        history.report(at(2));
        assert_eq!(history.depth(), 2);

        assert_eq!(history.back(), BackAction::HistoryBack);
        assert_eq!(history.depth(), 1);
    }

    #[test]
    fn test_page_initiated_back_does_not_grow_history() {
        // A, B, then the page calls history.back() itself, then B again
        let mut history = NavigationHistory::new();
        history.report(at(0));
        history.report(at(1));
        history.report(at(0));
        history.report(at(1));
        assert_eq!(history.depth(), 1);

        // Page goes back to A on its own; the next trigger leaves the shell
        history.report(at(0));
        assert_eq!(history.back(), BackAction::Exit);
    }

    #[test]
    fn test_push_state_and_fragments_count() {
        // Full load, pushState, #fragment: each is its own entry
        let mut history = NavigationHistory::new();
        for index in 0..3 {
            history.report(at(index));
        }
        assert!(history.can_go_back());
        assert_eq!(history.back(), BackAction::HistoryBack);
        history.report(at(1));
        assert_eq!(history.back(), BackAction::HistoryBack);
        history.report(at(0));
        assert_eq!(history.back(), BackAction::Exit);
    }

    #[test]
    fn test_navigation_api_overrides_index() {
        let mut history = NavigationHistory::new();
        history.report(HistoryPosition {
            index: 3,
            can_go_back: Some(false),
        });
        assert_eq!(history.back(), BackAction::Exit);

        history.report(HistoryPosition {
            index: 0,
            can_go_back: Some(true),
        });
        assert_eq!(history.back(), BackAction::HistoryBack);
        assert_eq!(history.depth(), 0);
    }

    #[test]
    fn test_back_without_report_cannot_overshoot() {
        let mut history = NavigationHistory::new();
        history.report(at(1));
        assert_eq!(history.back(), BackAction::HistoryBack);
        // No report arrived yet; the assumed position is the first entry
        assert_eq!(history.back(), BackAction::Exit);
    }
}
