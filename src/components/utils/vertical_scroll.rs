use std::cell::Cell;

/// Selection plus the first visible row of a list. Updated during render, hence
/// the cells.
pub struct VerticalScroll {
    y_offset: Cell<usize>,
    pos: Cell<usize>,
}

impl VerticalScroll {
    pub fn new() -> Self {
        VerticalScroll {
            y_offset: Cell::new(0),
            pos: Cell::new(0),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos.get()
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset.get()
    }

    pub fn move_up(&self) {
        self.pos.set(self.pos.get().saturating_sub(1));
    }

    pub fn move_down(&self, len: usize) {
        let pos = self.pos.get();
        if pos + 1 < len {
            self.pos.set(pos + 1);
        }
    }

    /// Scrolls just enough to keep the selection inside `visible_height` rows.
    pub fn update(&self, visible_height: usize, len: usize) {
        if visible_height == 0 || len == 0 {
            self.pos.set(0);
            self.y_offset.set(0);
            return;
        }

        let pos = self.pos.get().min(len - 1);
        self.pos.set(pos);

        let offset = self.y_offset.get();
        let offset = if pos < offset {
            pos
        } else if pos >= offset + visible_height {
            pos + 1 - visible_height
        } else {
            offset
        };

        self.y_offset
            .set(offset.min(len.saturating_sub(visible_height)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_down_stops_at_the_last_row() {
        let scroll = VerticalScroll::new();
        scroll.move_down(0);
        assert_eq!(scroll.pos(), 0);

        scroll.move_down(2);
        scroll.move_down(2);
        assert_eq!(scroll.pos(), 1);

        scroll.move_up();
        scroll.move_up();
        assert_eq!(scroll.pos(), 0);
    }

    #[test]
    fn offset_follows_the_selection() {
        let scroll = VerticalScroll::new();
        for _ in 0..5 {
            scroll.move_down(10);
        }
        scroll.update(3, 10);
        assert_eq!(scroll.y_offset(), 3);

        scroll.move_up();
        scroll.update(3, 10);
        assert_eq!(scroll.y_offset(), 3);

        for _ in 0..3 {
            scroll.move_up();
        }
        scroll.update(3, 10);
        assert_eq!(scroll.y_offset(), 1);
    }

    #[test]
    fn a_short_list_never_scrolls() {
        let scroll = VerticalScroll::new();
        scroll.move_down(2);
        scroll.update(5, 2);
        assert_eq!(scroll.y_offset(), 0);
    }
}
