//! Scrolling for list panes shorter than their contents.

use std::ops::Range;

/// The first item shown in a list pane of a given height.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ListWindow {
    offset: usize,
}

impl ListWindow {
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Scrolls as little as possible so `selected` is inside the pane.
    pub fn follow(&mut self, selected: Option<usize>, len: usize, height: usize) {
        if height == 0 || len <= height {
            self.offset = 0;
            return;
        }
        self.offset = self.offset.min(len - height);
        if let Some(selected) = selected.map(|s| s.min(len - 1)) {
            if selected < self.offset {
                self.offset = selected;
            } else if selected >= self.offset + height {
                self.offset = selected + 1 - height;
            }
        }
    }

    /// Indices of the items that fit in the pane.
    pub fn visible(&self, len: usize, height: usize) -> Range<usize> {
        self.offset.min(len)..(self.offset + height).min(len)
    }

    /// The item drawn on pane row `row`, if any.
    pub fn item_at(&self, row: usize, len: usize, height: usize) -> Option<usize> {
        if row >= height {
            return None;
        }
        let index = self.offset + row;
        (index < len).then_some(index)
    }
}
