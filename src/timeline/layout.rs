//! Headless composition of the timeline surface.
//!
//! [`TimelineLayout::build`] turns plan data plus the current viewport into
//! an ordered list of primitives, back to front. Only the visible window is
//! materialized, and day-cells exist only where references exist.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use egui::Color32;
use tracing::warn;
use uuid::Uuid;

use super::axis::TimeAxis;
use super::dates::parse_iso_date;
use super::drag::{BarHandle, PointerTarget};
use super::overlay::{CalendarDayIndex, OverlayEntry};
use super::segments::{weekday_segments, weekend_bands, Segment};
use super::viewport::ViewportRange;
use crate::model::{DayReference, Milestone, Phase, PlanTask, ReferenceKind};

/// Pixels-per-day below which weekly grid lines are skipped.
const WEEK_GRID_MIN_PPD: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneKind {
    Phase(Uuid),
    Task(Uuid),
    /// Milestones not attached to any phase.
    Milestones,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub row: usize,
    pub kind: LaneKind,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    Week,
    Month,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarOwner {
    Phase(Uuid),
    Task(Uuid),
}

/// Reference counts for one phase on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellCounts {
    pub comments: usize,
    pub files: usize,
    pub links: usize,
}

impl CellCounts {
    pub fn total(&self) -> usize {
        self.comments + self.files + self.links
    }
}

/// One drawable element of the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    WeekendBand(Segment),
    CalendarMarker {
        index: i64,
        entries: Vec<OverlayEntry>,
    },
    Lane(Lane),
    GridLine {
        index: i64,
        kind: GridKind,
    },
    TodayMarker {
        index: i64,
    },
    Bar {
        row: usize,
        owner: BarOwner,
        label: String,
        color: Color32,
        segments: Vec<Segment>,
    },
    Milestone {
        row: usize,
        index: i64,
        name: String,
    },
    DayCell {
        row: usize,
        phase_id: Uuid,
        index: i64,
        counts: CellCounts,
    },
    CaptureOverlay {
        row: usize,
        phase_id: Uuid,
    },
}

/// Everything the composition needs for one pass.
#[derive(Debug, Clone, Copy)]
pub struct LayoutInput<'a> {
    pub axis: &'a TimeAxis,
    pub viewport: ViewportRange,
    pub phases: &'a [Phase],
    pub tasks: &'a [PlanTask],
    pub milestones: &'a [Milestone],
    pub references: &'a [DayReference],
    pub overlay: &'a CalendarDayIndex,
    pub today_index: Option<i64>,
    pub edit_mode: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineLayout {
    pub primitives: Vec<Primitive>,
    pub lane_count: usize,
}

impl TimelineLayout {
    pub fn build(input: LayoutInput<'_>) -> Self {
        let LayoutInput {
            axis,
            viewport,
            phases,
            tasks,
            milestones,
            references,
            overlay,
            today_index,
            edit_mode,
        } = input;
        let date_at = |i: i64| axis.index_to_date(i);
        let mut primitives = Vec::new();

        if axis.total_days() == 0 {
            return Self::default();
        }

        for band in weekend_bands(viewport.start_index, viewport.end_index, date_at) {
            primitives.push(Primitive::WeekendBand(band));
        }

        for (date, entries) in overlay.iter() {
            let Ok(date) = parse_iso_date(date) else {
                continue;
            };
            let index = axis.raw_index(date);
            if viewport.contains(index) {
                primitives.push(Primitive::CalendarMarker {
                    index,
                    entries: entries.to_vec(),
                });
            }
        }

        let lanes = lanes_for(phases, tasks, milestones);
        let lane_count = lanes.len();
        primitives.extend(lanes.into_iter().map(Primitive::Lane));

        for index in viewport.start_index..=viewport.end_index {
            let date = axis.index_to_date(index);
            if date.day() == 1 {
                primitives.push(Primitive::GridLine {
                    index,
                    kind: GridKind::Month,
                });
            } else if date.weekday() == Weekday::Mon && axis.pixels_per_day() >= WEEK_GRID_MIN_PPD {
                primitives.push(Primitive::GridLine {
                    index,
                    kind: GridKind::Week,
                });
            }
        }

        if let Some(index) = today_index.filter(|i| viewport.contains(*i)) {
            primitives.push(Primitive::TodayMarker { index });
        }

        for (row, phase) in phases.iter().enumerate() {
            let Some((start, length)) = visible_span(axis, &viewport, phase.start_date, phase.end_date) else {
                continue;
            };
            let segments = weekday_segments(start, length, date_at);
            if segments.is_empty() {
                continue;
            }
            primitives.push(Primitive::Bar {
                row,
                owner: BarOwner::Phase(phase.id),
                label: phase.name.clone(),
                color: phase.color,
                segments,
            });
        }

        for (i, task) in tasks.iter().enumerate() {
            let Some((start, length)) = visible_span(axis, &viewport, task.start_date, task.end_date) else {
                continue;
            };
            primitives.push(Primitive::Bar {
                row: phases.len() + i,
                owner: BarOwner::Task(task.id),
                label: task.title.clone(),
                color: task.color,
                segments: vec![Segment {
                    start_index: start,
                    length,
                }],
            });
        }

        let loose_row = phases.len() + tasks.len();
        for milestone in milestones {
            let index = axis.raw_index(milestone.date);
            if !viewport.contains(index) {
                continue;
            }
            let row = match milestone.phase_id {
                Some(id) => match phases.iter().position(|p| p.id == id) {
                    Some(row) => row,
                    None => continue,
                },
                None => loose_row,
            };
            primitives.push(Primitive::Milestone {
                row,
                index,
                name: milestone.name.clone(),
            });
        }

        for ((row, phase_id, index), counts) in day_cells(axis, &viewport, phases, references) {
            primitives.push(Primitive::DayCell {
                row,
                phase_id,
                index,
                counts,
            });
        }

        if edit_mode {
            for (row, phase) in phases.iter().enumerate() {
                primitives.push(Primitive::CaptureOverlay {
                    row,
                    phase_id: phase.id,
                });
            }
        }

        Self {
            primitives,
            lane_count,
        }
    }
}

fn lanes_for(phases: &[Phase], tasks: &[PlanTask], milestones: &[Milestone]) -> Vec<Lane> {
    let mut lanes: Vec<Lane> = phases
        .iter()
        .map(|p| (LaneKind::Phase(p.id), p.name.clone()))
        .chain(tasks.iter().map(|t| (LaneKind::Task(t.id), t.title.clone())))
        .enumerate()
        .map(|(row, (kind, label))| Lane { row, kind, label })
        .collect();
    if milestones.iter().any(|m| m.phase_id.is_none()) {
        lanes.push(Lane {
            row: lanes.len(),
            kind: LaneKind::Milestones,
            label: "Milestones".into(),
        });
    }
    lanes
}

/// The part of `[start, end]` (inclusive dates) inside the viewport, as
/// `(first_index, length)`.
fn visible_span(
    axis: &TimeAxis,
    viewport: &ViewportRange,
    start: NaiveDate,
    end: NaiveDate,
) -> Option<(i64, i64)> {
    let first = axis.raw_index(start).max(viewport.start_index);
    let last = axis.raw_index(end).min(viewport.end_index);
    (last >= first).then(|| (first, last - first + 1))
}

fn day_cells(
    axis: &TimeAxis,
    viewport: &ViewportRange,
    phases: &[Phase],
    references: &[DayReference],
) -> BTreeMap<(usize, Uuid, i64), CellCounts> {
    let mut cells: BTreeMap<(usize, Uuid, i64), CellCounts> = BTreeMap::new();
    for reference in references {
        let index = axis.raw_index(reference.date);
        if !viewport.contains(index) {
            continue;
        }
        let Some(row) = phases.iter().position(|p| p.id == reference.phase_id) else {
            continue;
        };
        let counts = cells.entry((row, reference.phase_id, index)).or_default();
        match reference.kind {
            ReferenceKind::Comment => counts.comments += 1,
            ReferenceKind::File => counts.files += 1,
            ReferenceKind::Link => counts.links += 1,
        }
    }
    cells
}

/// Day-index of today, or `None` when today is off the axis.
pub fn today_index(axis: &TimeAxis, today: NaiveDate) -> Option<i64> {
    let index = axis.raw_index(today);
    axis.contains_index(index).then_some(index)
}

/// Horizontal scroll offset that centers `date` in a surface of
/// `visible_width`. Malformed dates yield `None`, meaning "leave the scroll
/// position alone".
pub fn scroll_target_for_date(date: &str, axis: &TimeAxis, visible_width: f32) -> Option<f32> {
    let date = match parse_iso_date(date) {
        Ok(date) => date,
        Err(e) => {
            warn!(error = %e, "scroll to date ignored");
            return None;
        }
    };
    if axis.total_days() == 0 {
        return None;
    }
    let width = if visible_width.is_finite() {
        visible_width.max(0.0)
    } else {
        0.0
    };
    let index = axis.date_to_index(date);
    let center = axis.index_to_x(index) + axis.pixels_per_day() / 2.0;
    let max_offset = (axis.total_width() - width).max(0.0);
    Some((center - width / 2.0).clamp(0.0, max_offset))
}

/// Which phase bar, and which part of it, lies under `local_x` on `row`.
///
/// `local_x` is relative to the surface's left edge. Edge handles are
/// `handle_px` wide and sit on the bar's outer edges.
pub fn hit_test_phase(
    phases: &[Phase],
    axis: &TimeAxis,
    row: usize,
    local_x: f32,
    handle_px: f32,
) -> Option<PointerTarget> {
    let phase = phases.get(row)?;
    let start_index = axis.raw_index(phase.start_date);
    let end_index = axis.raw_index(phase.end_date);
    let left = axis.index_to_x(start_index);
    let right = axis.index_to_x(end_index + 1);
    let half = handle_px / 2.0;

    if local_x < left - half || local_x > right + half {
        return Some(PointerTarget::EmptyLane { phase_id: phase.id });
    }
    let handle = if local_x <= left + half {
        BarHandle::Left
    } else if local_x >= right - half {
        BarHandle::Right
    } else {
        BarHandle::Center
    };
    Some(PointerTarget::Bar {
        phase_id: phase.id,
        handle,
        start_index,
        end_index,
    })
}
