use std::ops::Range;

/// Cursor and scroll offset over a windowed list.
///
/// Holds `offset <= cursor < offset + visible` whenever the list is non-empty,
/// and `cursor == offset == 0` when it is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    cursor: usize,
    offset: usize,
    visible: usize,
    len: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        ScrollState {
            cursor: 0,
            offset: 0,
            visible: 1,
            len: 0,
        }
    }
}

/// How many items fit in `rows`, never less than one
pub fn visible_items(rows: u16, rows_per_item: u16) -> usize {
    (rows / rows_per_item.max(1)).max(1) as usize
}

impl ScrollState {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indices of the items on screen
    pub fn window(&self) -> Range<usize> {
        self.offset..self.len.min(self.offset + self.visible)
    }

    /// The list was replaced. Clamps the cursor to the new length.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.settle();
    }

    /// The viewport changed size. Keeps the cursor where it is and moves the
    /// window only as far as needed to keep it on screen.
    pub fn set_visible(&mut self, visible: usize) {
        self.visible = visible.max(1);
        self.settle();
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.settle();
    }

    pub fn down(&mut self) {
        if self.cursor + 1 < self.len {
            self.cursor += 1;
        }
        self.settle();
    }

    pub fn first(&mut self) {
        self.cursor = 0;
        self.settle();
    }

    pub fn last(&mut self) {
        self.cursor = self.len.saturating_sub(1);
        self.settle();
    }

    pub fn select(&mut self, index: usize) {
        self.cursor = index;
        self.settle();
    }

    /// Back to the top of the list
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.offset = 0;
    }

    fn settle(&mut self) {
        if self.len == 0 {
            self.cursor = 0;
            self.offset = 0;
            return;
        }
        self.cursor = self.cursor.min(self.len - 1);
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + self.visible {
            self.offset = self.cursor + 1 - self.visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holds(s: &ScrollState) -> bool {
        if s.len == 0 {
            s.cursor == 0 && s.offset == 0
        } else {
            s.offset <= s.cursor && s.cursor < s.offset + s.visible && s.cursor < s.len
        }
    }

    #[test]
    fn visible_items_never_zero() {
        assert_eq!(visible_items(0, 3), 1);
        assert_eq!(visible_items(2, 3), 1);
        assert_eq!(visible_items(9, 3), 3);
        assert_eq!(visible_items(10, 3), 3);
        assert_eq!(visible_items(5, 0), 5);
    }

    #[test]
    fn moving_below_window_scrolls_minimally() {
        let mut s = ScrollState::default();
        s.set_visible(3);
        s.set_len(10);
        for _ in 0..4 {
            s.down();
        }
        assert_eq!((s.cursor(), s.offset()), (4, 2));
        s.up();
        s.up();
        assert_eq!((s.cursor(), s.offset()), (2, 2));
        s.up();
        assert_eq!((s.cursor(), s.offset()), (1, 1));
        assert_eq!(s.window(), 1..4);
    }

    #[test]
    fn shrinking_list_clamps_cursor() {
        let mut s = ScrollState::default();
        s.set_visible(3);
        s.set_len(10);
        s.last();
        assert_eq!((s.cursor(), s.offset()), (9, 7));
        s.set_len(4);
        assert_eq!((s.cursor(), s.offset()), (3, 3));
        s.set_len(0);
        assert_eq!((s.cursor(), s.offset()), (0, 0));
        assert!(s.window().is_empty());
    }

    #[test]
    fn resize_keeps_cursor() {
        let mut s = ScrollState::default();
        s.set_visible(5);
        s.set_len(20);
        s.select(4);
        assert_eq!(s.offset(), 0);
        s.set_visible(2);
        assert_eq!((s.cursor(), s.offset()), (4, 3));
        s.set_visible(8);
        assert_eq!((s.cursor(), s.offset()), (4, 3));
    }

    #[test]
    fn invariant_survives_mixed_operations() {
        let mut s = ScrollState::default();
        let mut seed = 7usize;
        for step in 0..500 {
            seed = (seed * 1103 + 12345) % 65_521;
            match seed % 7 {
                0 => s.up(),
                1 | 2 => s.down(),
                3 => s.set_len(seed % 30),
                4 => s.set_visible(seed % 9),
                5 => s.last(),
                _ => s.select(seed % 40),
            }
            assert!(holds(&s), "step {step}: {s:?}");
        }
    }
}
