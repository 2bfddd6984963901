use chrono::NaiveDate;

use super::dates::is_weekend;

/// A maximal run of weekday indices inside a bar's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start_index: i64,
    pub length: i64,
}

impl Segment {
    pub fn end_index(&self) -> i64 {
        self.start_index + self.length
    }
}

/// Split `[offset, offset + length)` into weekday-only segments.
///
/// Weekends become gaps; a span lying entirely on a weekend yields nothing.
pub fn weekday_segments(
    offset: i64,
    length: i64,
    date_at: impl Fn(i64) -> NaiveDate,
) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut open: Option<Segment> = None;

    for index in offset..offset + length.max(0) {
        if is_weekend(date_at(index)) {
            if let Some(segment) = open.take() {
                segments.push(segment);
            }
        } else {
            match open.as_mut() {
                Some(segment) => segment.length += 1,
                None => {
                    open = Some(Segment {
                        start_index: index,
                        length: 1,
                    })
                }
            }
        }
    }
    if let Some(segment) = open {
        segments.push(segment);
    }
    segments
}

/// Coalesce consecutive weekend days in `[start, end]` into bands.
pub fn weekend_bands(
    start_index: i64,
    end_index: i64,
    date_at: impl Fn(i64) -> NaiveDate,
) -> Vec<Segment> {
    let mut bands: Vec<Segment> = Vec::new();
    for index in start_index..=end_index {
        if !is_weekend(date_at(index)) {
            continue;
        }
        match bands.last_mut() {
            Some(band) if band.end_index() == index => band.length += 1,
            _ => bands.push(Segment {
                start_index: index,
                length: 1,
            }),
        }
    }
    bands
}
