//! Fixed-row-height windowing over the accumulated list.
//!
//! All measurements are in abstract units (terminal lines in the app). With a
//! constant row height the visible range is plain division, so no layout pass
//! is needed.

use crate::item::Item;
use std::ops::Range;

/// Inclusive index range of rows that intersect the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub first: usize,
    pub last: usize,
}

impl VisibleRange {
    /// Number of rows in the range, never zero.
    pub fn rows(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.first..=self.last).contains(&index)
    }
}

/// What occupies one renderable index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowSlot<'a> {
    Item(&'a Item),
    /// The synthetic trailing row shown while more pages may exist.
    Loader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLayout {
    row_height: usize,
    viewport_height: usize,
    overscan: usize,
}

impl WindowLayout {
    /// `row_height` is clamped to at least 1.
    pub fn new(row_height: usize, viewport_height: usize, overscan: usize) -> Self {
        Self {
            row_height: row_height.max(1),
            viewport_height,
            overscan,
        }
    }

    pub fn row_height(&self) -> usize {
        self.row_height
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn with_viewport_height(self, viewport_height: usize) -> Self {
        Self {
            viewport_height,
            ..self
        }
    }

    /// Rows to lay out: every loaded item plus a loader row unless exhausted.
    pub fn row_count(loaded: usize, exhausted: bool) -> usize {
        loaded + usize::from(!exhausted)
    }

    /// Rows that fit fully in the viewport, at least one.
    pub fn rows_per_viewport(&self) -> usize {
        (self.viewport_height / self.row_height).max(1)
    }

    pub fn content_height(&self, row_count: usize) -> usize {
        row_count * self.row_height
    }

    pub fn max_scroll_offset(&self, row_count: usize) -> usize {
        self.content_height(row_count)
            .saturating_sub(self.viewport_height)
    }

    pub fn clamp_offset(&self, offset: usize, row_count: usize) -> usize {
        offset.min(self.max_scroll_offset(row_count))
    }

    /// Rows intersecting `[offset, offset + viewport_height)`.
    ///
    /// `None` when there is nothing to show or no room to show it.
    pub fn visible_range(&self, offset: usize, row_count: usize) -> Option<VisibleRange> {
        if row_count == 0 || self.viewport_height == 0 {
            return None;
        }
        let offset = self.clamp_offset(offset, row_count);
        let first = offset / self.row_height;
        let last = ((offset + self.viewport_height - 1) / self.row_height).min(row_count - 1);
        Some(VisibleRange { first, last })
    }

    /// The visible range widened by the overscan on both sides, as a
    /// half-open range clamped to `row_count`.
    pub fn render_range(&self, offset: usize, row_count: usize) -> Range<usize> {
        match self.visible_range(offset, row_count) {
            Some(visible) => {
                let start = visible.first.saturating_sub(self.overscan);
                let end = (visible.last + self.overscan + 1).min(row_count);
                start..end
            }
            None => 0..0,
        }
    }

    /// Smallest scroll change that brings row `index` fully into view.
    pub fn offset_to_reveal(&self, offset: usize, index: usize) -> usize {
        let top = index * self.row_height;
        let bottom = top + self.row_height;
        if top < offset {
            top
        } else if bottom > offset + self.viewport_height {
            bottom.saturating_sub(self.viewport_height)
        } else {
            offset
        }
    }

    /// Position of row `index` relative to the viewport top.
    pub fn row_top(&self, offset: usize, index: usize) -> isize {
        (index * self.row_height) as isize - offset as isize
    }

    pub fn slot<'a>(&self, index: usize, items: &'a [Item], row_count: usize) -> Option<RowSlot<'a>> {
        if index >= row_count {
            return None;
        }
        Some(match items.get(index) {
            Some(item) => RowSlot::Item(item),
            None => RowSlot::Loader,
        })
    }
}
