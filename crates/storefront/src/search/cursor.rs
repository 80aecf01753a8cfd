//! Keyboard selection over a rendered suggestion list.

/// Highlighted row in the suggestion dropdown.
///
/// Arrow keys move the highlight, Enter opens the highlighted row. Nothing is
/// highlighted until the first key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuggestionCursor {
    len: usize,
    selected: Option<usize>,
}

impl SuggestionCursor {
    /// Cursor over a freshly rendered list of `len` rows.
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self {
            len,
            selected: None,
        }
    }

    /// ArrowDown: move to the next row, stopping at the last one.
    pub fn down(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let next = self.selected.map_or(0, |i| (i + 1).min(self.len - 1));
        self.selected = Some(next);
        self.selected
    }

    /// ArrowUp: move to the previous row, stopping at the first one.
    pub fn up(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let prev = self.selected.map_or(0, |i| i.saturating_sub(1));
        self.selected = Some(prev);
        self.selected
    }

    /// Row that Enter would open.
    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unselected() {
        assert_eq!(SuggestionCursor::new(3).selected(), None);
    }

    #[test]
    fn test_down_clamps_at_end() {
        let mut cursor = SuggestionCursor::new(2);
        assert_eq!(cursor.down(), Some(0));
        assert_eq!(cursor.down(), Some(1));
        assert_eq!(cursor.down(), Some(1));
    }

    #[test]
    fn test_up_clamps_at_start() {
        let mut cursor = SuggestionCursor::new(3);
        assert_eq!(cursor.up(), Some(0));
        cursor.down();
        cursor.down();
        assert_eq!(cursor.selected(), Some(2));
        assert_eq!(cursor.up(), Some(1));
        assert_eq!(cursor.up(), Some(0));
        assert_eq!(cursor.up(), Some(0));
    }

    #[test]
    fn test_empty_list_ignores_keys() {
        let mut cursor = SuggestionCursor::new(0);
        assert!(cursor.is_empty());
        assert_eq!(cursor.down(), None);
        assert_eq!(cursor.up(), None);
        assert_eq!(cursor.selected(), None);
    }
}
