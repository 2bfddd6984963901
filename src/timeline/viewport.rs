use chrono::NaiveDate;

use super::axis::TimeAxis;

/// The window of day-indices materialized on the surface, overscan included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportRange {
    pub start_index: i64,
    pub end_index: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ViewportRange {
    /// Visible index range for a horizontal scroll position, widened
    /// symmetrically by `overscan` days and clamped to the axis.
    pub fn compute(axis: &TimeAxis, scroll_offset: f32, visible_width: f32, overscan: i64) -> Self {
        let ppd = axis.pixels_per_day();
        let scroll = if scroll_offset.is_finite() {
            scroll_offset.max(0.0)
        } else {
            0.0
        };
        let width = if visible_width.is_finite() {
            visible_width.max(0.0)
        } else {
            0.0
        };
        let overscan = overscan.max(0);

        let first_visible = (scroll / ppd).floor() as i64;
        let last_visible = ((scroll + width) / ppd).ceil() as i64;

        let start_index = axis.clamp_index(first_visible - overscan);
        let end_index = axis.clamp_index(last_visible + overscan).max(start_index);

        Self {
            start_index,
            end_index,
            start_date: axis.index_to_date(start_index),
            end_date: axis.index_to_date(end_index),
        }
    }

    /// The whole axis, used before the surface has reported its size.
    pub fn full(axis: &TimeAxis) -> Self {
        let end_index = axis.clamp_index(axis.total_days() - 1);
        Self {
            start_index: 0,
            end_index,
            start_date: axis.index_to_date(0),
            end_date: axis.index_to_date(end_index),
        }
    }

    pub fn contains(&self, index: i64) -> bool {
        index >= self.start_index && index <= self.end_index
    }

    /// Number of indices in the window.
    pub fn len(&self) -> i64 {
        self.end_index - self.start_index + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }
}

/// Holds at most one pending update per paint frame.
///
/// Scheduling a new value cancels the one still waiting; the frame loop
/// takes whatever is pending when it paints.
#[derive(Debug, Clone)]
pub struct FrameSlot<T> {
    pending: Option<T>,
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> FrameSlot<T> {
    /// Schedule `value`, returning true if it superseded a pending one.
    pub fn schedule(&mut self, value: T) -> bool {
        self.pending.replace(value).is_some()
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Take the pending value for this frame.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Tracks scroll and resize notifications and recomputes the viewport at
/// most once per frame.
#[derive(Debug, Clone, Default)]
pub struct ViewportTracker {
    slot: FrameSlot<(f32, f32)>,
    last_input: Option<(f32, f32)>,
    current: Option<ViewportRange>,
}

impl ViewportTracker {
    /// Record a scroll or resize; only the latest one before a frame counts.
    pub fn notify(&mut self, scroll_offset: f32, visible_width: f32) {
        if self.last_input != Some((scroll_offset, visible_width)) {
            self.slot.schedule((scroll_offset, visible_width));
        }
    }

    /// Run the pending recomputation, if any. Returns true when the range changed.
    pub fn on_frame(&mut self, axis: &TimeAxis, overscan: i64) -> bool {
        let Some((scroll, width)) = self.slot.take() else {
            return false;
        };
        self.last_input = Some((scroll, width));
        let next = ViewportRange::compute(axis, scroll, width, overscan);
        let changed = self.current != Some(next);
        self.current = Some(next);
        changed
    }

    /// Forget the last input so the next notify recomputes (zoom, new range).
    pub fn invalidate(&mut self) {
        self.last_input = None;
        self.current = None;
    }

    pub fn current(&self, axis: &TimeAxis) -> ViewportRange {
        self.current.unwrap_or_else(|| ViewportRange::full(axis))
    }
}
