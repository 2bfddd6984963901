//! Pointer-driven drag/resize state machine for phase bars.
//!
//! Only one gesture is ever live. While it runs, every processed pointer
//! move writes the new geometry straight onto a retained preview handle;
//! the cached timeline layout is left alone until the gesture is released
//! and the host applies the committed range.

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use super::axis::TimeAxis;
use super::viewport::FrameSlot;

/// Pointer travel (px) below which a press/release pair counts as a click.
pub const CLICK_SLOP: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    ResizeLeft,
    ResizeRight,
}

/// The live gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Sweeping out a new range on an empty part of a lane.
    Selecting {
        phase_id: Uuid,
        start_index: i64,
        current_index: i64,
    },
    /// Moving or resizing an existing bar.
    Editing {
        phase_id: Uuid,
        mode: DragMode,
        anchor_index: i64,
        current_index: i64,
        original_start_index: i64,
        original_length: i64,
    },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    pub fn phase_id(&self) -> Option<Uuid> {
        match self {
            DragState::Idle => None,
            DragState::Selecting { phase_id, .. } | DragState::Editing { phase_id, .. } => {
                Some(*phase_id)
            }
        }
    }

    /// The range (inclusive day-indices) the gesture would produce right now.
    ///
    /// Moves keep the bar inside `[0, total_days)`; resizes keep at least
    /// one day between the edges.
    pub fn tentative_range(&self, total_days: i64) -> Option<(i64, i64)> {
        let last = (total_days - 1).max(0);
        match *self {
            DragState::Idle => None,
            DragState::Selecting {
                start_index,
                current_index,
                ..
            } => Some((start_index.min(current_index), start_index.max(current_index))),
            DragState::Editing {
                mode,
                anchor_index,
                current_index,
                original_start_index,
                original_length,
                ..
            } => {
                let length = original_length.max(0);
                let original_end = original_start_index + length;
                match mode {
                    DragMode::Move => {
                        let delta = current_index - anchor_index;
                        let start = (original_start_index + delta).clamp(0, (last - length).max(0));
                        Some((start, start + length))
                    }
                    DragMode::ResizeRight => {
                        let start = original_start_index;
                        let end = current_index.clamp(0, last);
                        if end <= start {
                            Some(one_day_from(start, last))
                        } else {
                            Some((start, end))
                        }
                    }
                    DragMode::ResizeLeft => {
                        let end = original_end;
                        let start = current_index.clamp(0, last);
                        if start < end {
                            Some((start, end))
                        } else if end >= 1 && end > original_start_index {
                            Some((end - 1, end))
                        } else {
                            // No room left of the fixed edge without moving against the drag.
                            Some(one_day_from(start, last))
                        }
                    }
                }
            }
        }
    }

    fn original_range(&self) -> Option<(i64, i64)> {
        match *self {
            DragState::Editing {
                original_start_index,
                original_length,
                ..
            } => Some((original_start_index, original_start_index + original_length.max(0))),
            _ => None,
        }
    }

    fn set_current(&mut self, index: i64) {
        match self {
            DragState::Idle => {}
            DragState::Selecting { current_index, .. } | DragState::Editing { current_index, .. } => {
                *current_index = index
            }
        }
    }
}

/// Which part of a bar the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarHandle {
    Left,
    Center,
    Right,
}

/// What lies under the pointer at press time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    EmptyLane {
        phase_id: Uuid,
    },
    Bar {
        phase_id: Uuid,
        handle: BarHandle,
        start_index: i64,
        end_index: i64,
    },
}

/// Vertical placement of the lane a gesture started on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LaneGeometry {
    pub top: f32,
    pub height: f32,
}

/// Primary-button input seen by the surface in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub x: Option<f32>,
    pub released: bool,
    pub down: bool,
}

/// Screen-space rectangle of the drag preview.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PreviewGeometry {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// A retained visual the controller can reposition without a re-layout.
pub trait PreviewSurface {
    fn place(&mut self, geometry: PreviewGeometry);
    fn hide(&mut self);
}

/// The default preview: a single retained rectangle painted on its own layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewHandle {
    geometry: Option<PreviewGeometry>,
    writes: u64,
}

impl PreviewHandle {
    /// Current geometry, `None` while hidden.
    pub fn geometry(&self) -> Option<PreviewGeometry> {
        self.geometry
    }

    /// How many times geometry has been written.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl PreviewSurface for PreviewHandle {
    fn place(&mut self, geometry: PreviewGeometry) {
        self.geometry = Some(geometry);
        self.writes += 1;
    }

    fn hide(&mut self) {
        self.geometry = None;
    }
}

/// `(start, start + 1)`, stepped back when `start` is the axis' last day.
fn one_day_from(start: i64, last: i64) -> (i64, i64) {
    if start < last {
        (start, start + 1)
    } else {
        ((last - 1).max(0), last)
    }
}

/// The axis and the surface's current left edge, in screen space.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceFrame<'a> {
    pub axis: &'a TimeAxis,
    pub left_edge: f32,
}

impl SurfaceFrame<'_> {
    fn index_at(&self, client_x: f32) -> i64 {
        self.axis.client_offset_to_index(client_x, self.left_edge)
    }
}

/// How a released gesture resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// No gesture was live.
    Ignored,
    /// Press and release without movement.
    Click { date: NaiveDate },
    /// A new range for a phase.
    Commit {
        phase_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    /// The gesture produced nothing new.
    Discarded,
}

/// Drives the single live gesture and its preview.
#[derive(Debug, Default)]
pub struct DragController<P: PreviewSurface + Default = PreviewHandle> {
    state: DragState,
    lane: LaneGeometry,
    press_x: f32,
    press_index: i64,
    moved: bool,
    pending_move: FrameSlot<f32>,
    preview: Option<P>,
}

impl<P: PreviewSurface + Default> DragController<P> {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            lane: LaneGeometry::default(),
            press_x: 0.0,
            press_index: 0,
            moved: false,
            pending_move: FrameSlot::default(),
            preview: None,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_idle()
    }

    /// The preview handle, once the first gesture has created it.
    pub fn preview(&self) -> Option<&P> {
        self.preview.as_ref()
    }

    /// Begin a gesture. A press while another gesture is live is ignored.
    pub fn pointer_down(
        &mut self,
        target: PointerTarget,
        client_x: f32,
        lane: LaneGeometry,
        frame: SurfaceFrame<'_>,
    ) -> bool {
        if self.is_active() {
            debug!("pointer down ignored: gesture already in progress");
            return false;
        }

        let index = frame.index_at(client_x);
        self.state = match target {
            PointerTarget::EmptyLane { phase_id } => DragState::Selecting {
                phase_id,
                start_index: index,
                current_index: index,
            },
            PointerTarget::Bar {
                phase_id,
                handle,
                start_index,
                end_index,
            } => DragState::Editing {
                phase_id,
                mode: match handle {
                    BarHandle::Left => DragMode::ResizeLeft,
                    BarHandle::Center => DragMode::Move,
                    BarHandle::Right => DragMode::ResizeRight,
                },
                anchor_index: index,
                current_index: index,
                original_start_index: start_index,
                original_length: (end_index - start_index).max(0),
            },
        };
        self.lane = lane;
        self.press_x = client_x;
        self.press_index = index;
        self.moved = false;
        self.pending_move.cancel();
        self.write_preview(frame);
        true
    }

    /// Queue a pointer move; only the latest one before the next frame is processed.
    pub fn pointer_move(&mut self, client_x: f32) {
        if self.is_active() {
            self.pending_move.schedule(client_x);
        }
    }

    /// Process the queued move, if any. Call once per paint frame.
    pub fn on_frame(&mut self, frame: SurfaceFrame<'_>) {
        if let Some(client_x) = self.pending_move.take() {
            self.apply_move(client_x, frame);
        }
    }

    /// Finish the gesture at `client_x` and return to idle.
    pub fn pointer_up(&mut self, client_x: f32, frame: SurfaceFrame<'_>) -> DragOutcome {
        if !self.is_active() {
            return DragOutcome::Ignored;
        }
        self.pending_move.cancel();
        self.apply_move(client_x, frame);

        let state = std::mem::take(&mut self.state);
        self.hide_preview();

        if !self.moved {
            let date = frame.axis.index_to_date(self.press_index);
            debug!(%date, "click without drag");
            return DragOutcome::Click { date };
        }

        let Some((start, end)) = state.tentative_range(frame.axis.total_days()) else {
            return DragOutcome::Discarded;
        };
        let degenerate = match state {
            DragState::Selecting { .. } => start == end,
            _ => state.original_range() == Some((start, end)),
        };
        let Some(phase_id) = state.phase_id().filter(|_| !degenerate) else {
            debug!("drag released without a change; discarding");
            return DragOutcome::Discarded;
        };

        let start_date = frame.axis.index_to_date(start);
        let end_date = frame.axis.index_to_date(end);
        info!(%phase_id, %start_date, %end_date, "committing phase range");
        DragOutcome::Commit {
            phase_id,
            start_date,
            end_date,
        }
    }

    /// Feed one frame of pointer input to the live gesture.
    ///
    /// Returns the outcome once a release ends the gesture. A button that is up
    /// with no release reaching the surface means capture was lost, and the
    /// gesture is cancelled without an outcome.
    pub fn track(&mut self, pointer: PointerSample, frame: SurfaceFrame<'_>) -> Option<DragOutcome> {
        if !self.is_active() {
            return None;
        }
        if let Some(x) = pointer.x {
            self.pointer_move(x);
        }
        self.on_frame(frame);

        if pointer.released {
            return Some(match pointer.x {
                Some(x) => self.pointer_up(x, frame),
                None => {
                    self.cancel();
                    DragOutcome::Ignored
                }
            });
        }
        if !pointer.down {
            self.cancel();
        }
        None
    }

    /// Abandon the gesture without committing, e.g. when pointer capture is lost.
    pub fn cancel(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        info!(phase_id = ?self.state.phase_id(), "drag cancelled");
        self.state = DragState::Idle;
        self.pending_move.cancel();
        self.hide_preview();
        true
    }

    fn apply_move(&mut self, client_x: f32, frame: SurfaceFrame<'_>) {
        if (client_x - self.press_x).abs() > CLICK_SLOP {
            self.moved = true;
        }
        self.state.set_current(frame.index_at(client_x));
        self.write_preview(frame);
    }

    fn write_preview(&mut self, frame: SurfaceFrame<'_>) {
        let Some((start, end)) = self.state.tentative_range(frame.axis.total_days()) else {
            return;
        };
        let geometry = PreviewGeometry {
            left: frame.left_edge + frame.axis.index_to_x(start),
            top: self.lane.top,
            width: frame.axis.index_to_x(end - start + 1),
            height: self.lane.height,
        };
        self.preview.get_or_insert_with(P::default).place(geometry);
    }

    fn hide_preview(&mut self) {
        if let Some(preview) = self.preview.as_mut() {
            preview.hide();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PPD: f32 = 10.0;
    const LEFT: f32 = 100.0;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn axis() -> TimeAxis {
        TimeAxis::new(date(2025, 1, 1), PPD, 365)
    }

    /// Client x at the middle of a day-index.
    fn x_of(index: i64) -> f32 {
        LEFT + index as f32 * PPD + PPD / 2.0
    }

    fn lane() -> LaneGeometry {
        LaneGeometry {
            top: 40.0,
            height: 24.0,
        }
    }

    fn bar(axis: &TimeAxis, phase_id: Uuid, handle: BarHandle) -> PointerTarget {
        PointerTarget::Bar {
            phase_id,
            handle,
            start_index: axis.date_to_index(date(2025, 1, 6)),
            end_index: axis.date_to_index(date(2025, 1, 10)),
        }
    }

    #[test]
    fn move_shifts_both_edges() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let id = Uuid::new_v4();
        let mut ctl: DragController = DragController::new();

        assert!(ctl.pointer_down(bar(&axis, id, BarHandle::Center), x_of(7), lane(), frame));
        ctl.pointer_move(x_of(10));
        ctl.on_frame(frame);
        let outcome = ctl.pointer_up(x_of(14), frame);

        assert_eq!(
            outcome,
            DragOutcome::Commit {
                phase_id: id,
                start_date: date(2025, 1, 13),
                end_date: date(2025, 1, 17),
            }
        );
        assert!(ctl.state().is_idle());
    }

    #[test]
    fn move_is_clamped_to_the_axis() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let mut ctl: DragController = DragController::new();

        ctl.pointer_down(bar(&axis, Uuid::new_v4(), BarHandle::Center), x_of(7), lane(), frame);
        match ctl.pointer_up(x_of(-50), frame) {
            DragOutcome::Commit { start_date, end_date, .. } => {
                assert_eq!(start_date, date(2025, 1, 1));
                assert_eq!(end_date, date(2025, 1, 5));
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        ctl.pointer_down(bar(&axis, Uuid::new_v4(), BarHandle::Center), x_of(7), lane(), frame);
        match ctl.pointer_up(LEFT + 10_000.0, frame) {
            DragOutcome::Commit { start_date, end_date, .. } => {
                assert_eq!(end_date, date(2025, 12, 31));
                assert_eq!((end_date - start_date).num_days(), 4);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn resize_right_keeps_one_day_minimum() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let mut ctl: DragController = DragController::new();
        let start_index = axis.date_to_index(date(2025, 1, 6));

        ctl.pointer_down(bar(&axis, Uuid::new_v4(), BarHandle::Right), x_of(9), lane(), frame);
        match ctl.pointer_up(x_of(start_index), frame) {
            DragOutcome::Commit { start_date, end_date, .. } => {
                assert_eq!(start_date, date(2025, 1, 6));
                assert_eq!(end_date, date(2025, 1, 7));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn resize_left_moves_only_the_start() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let mut ctl: DragController = DragController::new();

        ctl.pointer_down(bar(&axis, Uuid::new_v4(), BarHandle::Left), x_of(5), lane(), frame);
        match ctl.pointer_up(x_of(2), frame) {
            DragOutcome::Commit { start_date, end_date, .. } => {
                assert_eq!(start_date, date(2025, 1, 3));
                assert_eq!(end_date, date(2025, 1, 10));
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        ctl.pointer_down(bar(&axis, Uuid::new_v4(), BarHandle::Left), x_of(5), lane(), frame);
        match ctl.pointer_up(x_of(30), frame) {
            DragOutcome::Commit { start_date, end_date, .. } => {
                assert_eq!(start_date, date(2025, 1, 9));
                assert_eq!(end_date, date(2025, 1, 10));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    fn single_day(index: i64, handle: BarHandle) -> PointerTarget {
        PointerTarget::Bar {
            phase_id: Uuid::new_v4(),
            handle,
            start_index: index,
            end_index: index,
        }
    }

    #[test]
    fn resize_right_at_the_last_day_stays_on_the_axis() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let mut ctl: DragController = DragController::new();

        ctl.pointer_down(single_day(364, BarHandle::Right), x_of(364), lane(), frame);
        match ctl.pointer_up(x_of(300), frame) {
            DragOutcome::Commit { start_date, end_date, .. } => {
                assert_eq!(start_date, date(2025, 12, 30));
                assert_eq!(end_date, date(2025, 12, 31));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn resize_left_at_the_first_day_extends_forward() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let mut ctl: DragController = DragController::new();

        ctl.pointer_down(single_day(0, BarHandle::Left), x_of(0), lane(), frame);
        match ctl.pointer_up(x_of(40), frame) {
            DragOutcome::Commit { start_date, end_date, .. } => {
                assert_eq!(start_date, date(2025, 2, 10));
                assert_eq!(end_date, date(2025, 2, 11));
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        // Past the last day the pair steps back onto the axis.
        ctl.pointer_down(single_day(0, BarHandle::Left), x_of(0), lane(), frame);
        match ctl.pointer_up(LEFT + 10_000.0, frame) {
            DragOutcome::Commit { start_date, end_date, .. } => {
                assert_eq!(start_date, date(2025, 12, 30));
                assert_eq!(end_date, date(2025, 12, 31));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn single_day_resize_never_moves_against_the_drag() {
        let mut state = DragState::Editing {
            phase_id: Uuid::new_v4(),
            mode: DragMode::ResizeLeft,
            anchor_index: 20,
            current_index: 25,
            original_start_index: 20,
            original_length: 0,
        };
        assert_eq!(state.tentative_range(365), Some((25, 26)));

        state.set_current(364);
        assert_eq!(state.tentative_range(365), Some((363, 364)));
    }

    fn held(x: f32) -> PointerSample {
        PointerSample {
            x: Some(x),
            released: false,
            down: true,
        }
    }

    #[test]
    fn only_the_pointer_ends_a_gesture() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let id = Uuid::new_v4();
        let mut ctl: DragController = DragController::new();

        ctl.pointer_down(bar(&axis, id, BarHandle::Center), x_of(7), lane(), frame);
        for x in [x_of(8), x_of(10), x_of(14)] {
            assert_eq!(ctl.track(held(x), frame), None);
            assert!(ctl.is_active());
        }

        let release = PointerSample {
            x: Some(x_of(14)),
            released: true,
            down: false,
        };
        assert!(matches!(
            ctl.track(release, frame),
            Some(DragOutcome::Commit { phase_id, .. }) if phase_id == id
        ));
        assert!(ctl.state().is_idle());
    }

    #[test]
    fn lost_capture_cancels_without_an_outcome() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let mut ctl: DragController = DragController::new();

        ctl.pointer_down(bar(&axis, Uuid::new_v4(), BarHandle::Right), x_of(9), lane(), frame);
        assert_eq!(ctl.track(held(x_of(20)), frame), None);

        let lost = PointerSample {
            x: Some(x_of(20)),
            released: false,
            down: false,
        };
        assert_eq!(ctl.track(lost, frame), None);
        assert!(ctl.state().is_idle());
        assert_eq!(ctl.preview().and_then(|p| p.geometry()), None);
    }

    #[test]
    fn selecting_sweeps_a_new_range_in_either_direction() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let id = Uuid::new_v4();
        let mut ctl: DragController = DragController::new();

        ctl.pointer_down(PointerTarget::EmptyLane { phase_id: id }, x_of(20), lane(), frame);
        assert!(matches!(ctl.state(), DragState::Selecting { .. }));
        let outcome = ctl.pointer_up(x_of(15), frame);
        assert_eq!(
            outcome,
            DragOutcome::Commit {
                phase_id: id,
                start_date: date(2025, 1, 16),
                end_date: date(2025, 1, 21),
            }
        );
    }

    #[test]
    fn zero_length_selection_is_discarded() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let mut ctl: DragController = DragController::new();

        ctl.pointer_down(PointerTarget::EmptyLane { phase_id: Uuid::new_v4() }, x_of(20), lane(), frame);
        ctl.pointer_move(x_of(25));
        ctl.on_frame(frame);
        assert_eq!(ctl.pointer_up(x_of(20), frame), DragOutcome::Discarded);
    }

    #[test]
    fn press_and_release_reports_a_click() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let mut ctl: DragController = DragController::new();

        ctl.pointer_down(bar(&axis, Uuid::new_v4(), BarHandle::Center), x_of(7), lane(), frame);
        assert_eq!(
            ctl.pointer_up(x_of(7) + 1.0, frame),
            DragOutcome::Click { date: date(2025, 1, 8) }
        );
    }

    #[test]
    fn second_press_is_ignored_while_dragging() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let first = Uuid::new_v4();
        let mut ctl: DragController = DragController::new();

        assert!(ctl.pointer_down(bar(&axis, first, BarHandle::Center), x_of(7), lane(), frame));
        assert!(!ctl.pointer_down(
            PointerTarget::EmptyLane { phase_id: Uuid::new_v4() },
            x_of(50),
            lane(),
            frame
        ));
        assert_eq!(ctl.state().phase_id(), Some(first));
    }

    #[test]
    fn cancel_returns_to_idle_without_commit() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let mut ctl: DragController = DragController::new();

        ctl.pointer_down(bar(&axis, Uuid::new_v4(), BarHandle::Center), x_of(7), lane(), frame);
        ctl.pointer_move(x_of(12));
        assert!(ctl.cancel());
        assert!(ctl.state().is_idle());
        assert_eq!(ctl.preview().unwrap().geometry(), None);
        assert_eq!(ctl.pointer_up(x_of(12), frame), DragOutcome::Ignored);
        assert!(!ctl.cancel());
    }

    #[test]
    fn preview_is_written_once_per_frame() {
        let axis = axis();
        let frame = SurfaceFrame { axis: &axis, left_edge: LEFT };
        let mut ctl: DragController = DragController::new();
        assert!(ctl.preview().is_none());

        ctl.pointer_down(bar(&axis, Uuid::new_v4(), BarHandle::Center), x_of(7), lane(), frame);
        let after_press = ctl.preview().unwrap().writes();

        ctl.pointer_move(x_of(8));
        ctl.pointer_move(x_of(9));
        ctl.pointer_move(x_of(10));
        ctl.on_frame(frame);
        let preview = ctl.preview().unwrap();
        assert_eq!(preview.writes(), after_press + 1);

        let geometry = preview.geometry().unwrap();
        assert_eq!(geometry.left, LEFT + 8.0 * PPD);
        assert_eq!(geometry.width, 5.0 * PPD);
        assert_eq!(geometry.top, 40.0);
        assert_eq!(geometry.height, 24.0);

        ctl.on_frame(frame);
        assert_eq!(ctl.preview().unwrap().writes(), after_press + 1);

        ctl.pointer_up(x_of(10), frame);
        assert_eq!(ctl.preview().unwrap().geometry(), None);
    }
}
