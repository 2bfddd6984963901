use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::model::DateRange;

/// Maps calendar days onto the horizontal pixel axis of the timeline surface.
///
/// Day-index 0 is the reference start date; the axis covers `total_days`
/// consecutive days. Invalid inputs coming from host state that is not ready
/// yet are coerced to safe values instead of producing NaN geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    start: NaiveDate,
    pixels_per_day: f32,
    total_days: i64,
}

impl TimeAxis {
    pub fn new(start: NaiveDate, pixels_per_day: f32, total_days: i64) -> Self {
        Self {
            start,
            pixels_per_day: safe_pixels_per_day(pixels_per_day),
            total_days: safe_total_days(total_days),
        }
    }

    pub fn for_range(range: &DateRange, pixels_per_day: f32) -> Self {
        Self::new(range.start(), pixels_per_day, range.days())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn pixels_per_day(&self) -> f32 {
        self.pixels_per_day
    }

    pub fn total_days(&self) -> i64 {
        self.total_days
    }

    /// Clamp an index into `[0, total_days - 1]`.
    pub fn clamp_index(&self, index: i64) -> i64 {
        if self.total_days == 0 {
            0
        } else {
            index.clamp(0, self.total_days - 1)
        }
    }

    /// Whether the index lies on the axis at all.
    pub fn contains_index(&self, index: i64) -> bool {
        index >= 0 && index < self.total_days
    }

    /// Unclamped day offset of a date from the reference start.
    pub fn raw_index(&self, date: NaiveDate) -> i64 {
        (date - self.start).num_days()
    }

    pub fn date_to_index(&self, date: NaiveDate) -> i64 {
        self.clamp_index(self.raw_index(date))
    }

    pub fn index_to_date(&self, index: i64) -> NaiveDate {
        self.start + chrono::Duration::days(index)
    }

    /// Left pixel edge of a day-index.
    pub fn index_to_x(&self, index: i64) -> f32 {
        index as f32 * self.pixels_per_day
    }

    /// Convert an x-pixel offset (relative to the surface's left edge) to a day-index.
    pub fn x_to_index(&self, x: f32) -> i64 {
        if !x.is_finite() {
            return 0;
        }
        self.clamp_index((x / self.pixels_per_day).floor() as i64)
    }

    /// Convert a pointer's client x to a day-index, given the surface's left edge.
    pub fn client_offset_to_index(&self, client_x: f32, left_edge: f32) -> i64 {
        self.x_to_index(client_x - left_edge)
    }

    /// Total width in pixels of the whole axis.
    pub fn total_width(&self) -> f32 {
        self.index_to_x(self.total_days)
    }

    /// Zoom in (increase pixels per day).
    pub fn zoom_in(&mut self, max_pixels_per_day: f32) {
        self.pixels_per_day = (self.pixels_per_day * 1.2).min(max_pixels_per_day);
    }

    /// Zoom out (decrease pixels per day).
    pub fn zoom_out(&mut self, min_pixels_per_day: f32) {
        self.pixels_per_day = (self.pixels_per_day / 1.2).max(safe_pixels_per_day(min_pixels_per_day));
    }
}

pub fn safe_pixels_per_day(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

pub fn safe_total_days(value: i64) -> i64 {
    value.max(0)
}

/// Caches the scroll surface's left edge for a short validity window.
///
/// Reading the edge from the layout on every pointer event is wasteful; a
/// stale value older than the window is re-measured so continuous pointer
/// movement stays accurate.
#[derive(Debug, Clone)]
pub struct EdgeAnchorCache {
    validity: Duration,
    cached: Option<(f32, Instant)>,
}

impl EdgeAnchorCache {
    pub fn new(validity: Duration) -> Self {
        Self {
            validity,
            cached: None,
        }
    }

    pub fn left_edge(&mut self, now: Instant, measure: impl FnOnce() -> f32) -> f32 {
        if let Some((edge, at)) = self.cached {
            if now.saturating_duration_since(at) < self.validity {
                return edge;
            }
        }
        let edge = measure();
        self.cached = Some((edge, now));
        edge
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

impl Default for EdgeAnchorCache {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}
