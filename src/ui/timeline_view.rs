//! The interactive timeline surface.
//!
//! Paints a cached [`TimelineLayout`] and routes pointer input to the drag
//! controller. While a gesture is live the cached layout is left untouched;
//! only the preview rectangle, painted on its own foreground layer, moves.

use std::sync::Arc;
use std::time::Instant;

use chrono::{Datelike, Local, NaiveDate};
use egui::{Align2, Color32, CursorIcon, Id, LayerId, Order, Painter, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::TimelineConfig;
use crate::model::{CalendarDayKind, DateRange, Plan, ReferenceKind};
use crate::timeline::dates::{format_iso_date, is_weekend};
use crate::timeline::drag::{BarHandle, DragMode, LaneGeometry, PointerSample, SurfaceFrame};
use crate::timeline::layout::{hit_test_phase, scroll_target_for_date, today_index, BarOwner, GridKind};
use crate::timeline::overlay::{IndexWindow, OverlayStatus};
use crate::timeline::{
    CellAction, DragController, DragState, EdgeAnchorCache, LayoutInput, OverlayRequest,
    OverlayResolver, PointerTarget, Primitive, ThreadExecutor, TimeAxis, TimelineEvent,
    TimelineLayout, ViewportRange, ViewportTracker,
};
use crate::ui::theme::{self, BAR_INSET, BAR_ROUNDING, HANDLE_WIDTH, HEADER_HEIGHT, LANE_HEIGHT};

/// Everything the cached layout depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LayoutKey {
    revision: u64,
    viewport: ViewportRange,
    pixels_per_day: f32,
    overlay_version: u64,
    edit_mode: bool,
}

pub struct TimelineView {
    config: TimelineConfig,
    range: Option<DateRange>,
    axis: TimeAxis,
    /// Index of today on the axis, refreshed with the range.
    today: Option<i64>,
    tracker: ViewportTracker,
    anchor: EdgeAnchorCache,
    overlay: OverlayResolver,
    overlay_key: Option<(u64, ViewportRange)>,
    overlay_version: u64,
    layout: Option<(LayoutKey, TimelineLayout)>,
    drag: DragController,
    pending_date: Option<String>,
    pending_scroll: Option<f32>,
    scroll_offset: f32,
    visible_width: f32,
    context_cell: Option<(Uuid, NaiveDate)>,
    pub edit_mode: bool,
}

impl TimelineView {
    pub fn new(config: TimelineConfig, ctx: &egui::Context) -> Self {
        let repaint = ctx.clone();
        let overlay = OverlayResolver::new(config.offload_policy(), Box::new(ThreadExecutor))
            .with_waker(Arc::new(move || repaint.request_repaint()));
        Self {
            axis: TimeAxis::new(Local::now().date_naive(), config.pixels_per_day, 0),
            anchor: EdgeAnchorCache::new(config.anchor_validity()),
            config,
            range: None,
            today: None,
            tracker: ViewportTracker::default(),
            overlay,
            overlay_key: None,
            overlay_version: 0,
            layout: None,
            drag: DragController::new(),
            pending_date: None,
            pending_scroll: None,
            scroll_offset: 0.0,
            visible_width: 0.0,
            context_cell: None,
            edit_mode: false,
        }
    }

    pub fn axis(&self) -> &TimeAxis {
        &self.axis
    }

    pub fn viewport(&self) -> ViewportRange {
        self.tracker.current(&self.axis)
    }

    pub fn overlay_status(&self) -> OverlayStatus {
        self.overlay.status()
    }

    /// Number of dates currently carrying calendar entries.
    pub fn overlay_dates(&self) -> usize {
        self.overlay.index().len()
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// Drop everything derived from the previous plan. Call after loading or
    /// replacing the plan.
    pub fn reset(&mut self) {
        self.drag.cancel();
        self.range = None;
        self.overlay_key = None;
        self.layout = None;
        self.context_cell = None;
        self.anchor.invalidate();
    }

    /// Center `date` (`YYYY-MM-DD`) on the next frame. Malformed dates leave
    /// the scroll position alone.
    pub fn scroll_to_date(&mut self, date: &str) {
        self.pending_date = Some(date.to_string());
    }

    pub fn zoom_in(&mut self) {
        self.zoom(true);
    }

    pub fn zoom_out(&mut self) {
        self.zoom(false);
    }

    fn zoom(&mut self, zoom_in: bool) {
        let center = self
            .axis
            .x_to_index(self.scroll_offset + self.visible_width / 2.0);
        if zoom_in {
            self.axis.zoom_in(self.config.max_pixels_per_day);
        } else {
            self.axis.zoom_out(self.config.min_pixels_per_day);
        }
        // A live preview was placed with the old scale.
        self.drag.cancel();
        self.tracker.invalidate();
        self.anchor.invalidate();

        let max_offset = (self.axis.total_width() - self.visible_width).max(0.0);
        let target = self.axis.index_to_x(center) + self.axis.pixels_per_day() / 2.0
            - self.visible_width / 2.0;
        self.pending_scroll = Some(target.clamp(0.0, max_offset));
        debug!(pixels_per_day = self.axis.pixels_per_day(), "zoom changed");
    }

    fn sync_range(&mut self, plan: &Plan) {
        let range = plan.active_range();
        if self.range == Some(range) {
            return;
        }
        info!(
            start = %range.start(),
            end = %range.end(),
            days = range.days(),
            "timeline range changed"
        );
        self.axis = TimeAxis::for_range(&range, self.axis.pixels_per_day());
        self.today = today_index(&self.axis, Local::now().date_naive());
        self.range = Some(range);
        self.drag.cancel();
        self.tracker.invalidate();
        self.anchor.invalidate();
        self.overlay_key = None;
        self.layout = None;
    }

    fn sync_overlay(&mut self, plan: &Plan, viewport: ViewportRange) {
        let key = (plan.revision, viewport);
        if self.overlay_key != Some(key) {
            self.overlay_key = Some(key);
            self.overlay.resolve(OverlayRequest {
                calendars: Arc::new(plan.active_calendars()),
                range: plan.active_range(),
                window: Some(IndexWindow::from_viewport(self.axis.start(), &viewport)),
            });
            self.overlay_version += 1;
        }
        if self.overlay.poll() {
            self.overlay_version += 1;
        }
    }

    fn sync_layout(&mut self, plan: &Plan, viewport: ViewportRange) {
        let key = LayoutKey {
            revision: plan.revision,
            viewport,
            pixels_per_day: self.axis.pixels_per_day(),
            overlay_version: self.overlay_version,
            edit_mode: self.edit_mode,
        };
        if self.layout.as_ref().map(|(k, _)| *k) == Some(key) {
            return;
        }
        let layout = TimelineLayout::build(LayoutInput {
            axis: &self.axis,
            viewport,
            phases: &plan.phases,
            tasks: &plan.tasks,
            milestones: &plan.milestones,
            references: &plan.references,
            overlay: self.overlay.index(),
            today_index: self.today,
            edit_mode: self.edit_mode,
        });
        debug!(
            primitives = layout.primitives.len(),
            first = viewport.start_index,
            last = viewport.end_index,
            "timeline layout rebuilt"
        );
        self.layout = Some((key, layout));
    }

    /// Render the surface. Returns the events produced this frame.
    pub fn show(&mut self, plan: &Plan, ui: &mut Ui) -> Vec<TimelineEvent> {
        let mut events = Vec::new();
        self.sync_range(plan);

        // Zoom with Ctrl + scroll wheel
        if ui.rect_contains_pointer(ui.max_rect()) {
            let zoom = ui.input(|i| i.zoom_delta());
            if zoom > 1.01 {
                self.zoom_in();
            } else if zoom < 0.99 {
                self.zoom_out();
            }
        }

        let available = ui.available_size();
        if self.visible_width <= 0.0 {
            self.visible_width = available.x;
        }
        if let Some(date) = self.pending_date.take() {
            if let Some(offset) = scroll_target_for_date(&date, &self.axis, self.visible_width) {
                self.pending_scroll = Some(offset);
            }
        }

        let width = self.axis.total_width().max(available.x);
        let height = (HEADER_HEIGHT + lane_rows(plan) as f32 * LANE_HEIGHT + 40.0).max(available.y);

        let mut scroll_area = egui::ScrollArea::both().auto_shrink([false, false]);
        if let Some(offset) = self.pending_scroll.take() {
            scroll_area = scroll_area.horizontal_scroll_offset(offset);
        }

        scroll_area.show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(Vec2::new(width, height), Sense::click_and_drag());
            let origin = response.rect.min;
            let clip = ui.clip_rect();

            self.scroll_offset = (clip.min.x - origin.x).max(0.0);
            self.visible_width = clip.width();
            self.tracker.notify(self.scroll_offset, self.visible_width);
            if self.tracker.on_frame(&self.axis, self.config.overscan_days) {
                self.anchor.invalidate();
            }
            let viewport = self.tracker.current(&self.axis);
            self.sync_overlay(plan, viewport);
            self.sync_layout(plan, viewport);

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            draw_header(&painter, origin, &self.axis, viewport, width);
            if let Some((_, layout)) = &self.layout {
                paint_layout(&painter, origin, &self.axis, layout, clip, response.rect.max.y);
            }

            self.handle_pointer(ui, &response, plan, origin, &mut events);
            self.paint_preview(ui, clip);
            if !self.drag.is_active() {
                self.show_tooltip(ui, &response, plan, origin);
            }
            self.show_context_menu(&response, plan, origin, &mut events);
        });

        events
    }

    fn lane_geometry(origin: Pos2, row: usize) -> LaneGeometry {
        LaneGeometry {
            top: origin.y + HEADER_HEIGHT + row as f32 * LANE_HEIGHT + BAR_INSET,
            height: LANE_HEIGHT - 2.0 * BAR_INSET,
        }
    }

    fn row_at(origin: Pos2, pos: Pos2) -> Option<usize> {
        let local_y = pos.y - origin.y - HEADER_HEIGHT;
        (local_y >= 0.0).then(|| (local_y / LANE_HEIGHT).floor() as usize)
    }

    /// What a press at `pos` would grab. Empty lane space is only selectable
    /// in edit mode.
    fn press_target(&self, plan: &Plan, origin: Pos2, pos: Pos2) -> Option<(PointerTarget, LaneGeometry)> {
        let row = Self::row_at(origin, pos)?;
        let target = hit_test_phase(&plan.phases, &self.axis, row, pos.x - origin.x, HANDLE_WIDTH)?;
        if matches!(target, PointerTarget::EmptyLane { .. }) && !self.edit_mode {
            return None;
        }
        Some((target, Self::lane_geometry(origin, row)))
    }

    fn handle_pointer(
        &mut self,
        ui: &Ui,
        response: &egui::Response,
        plan: &Plan,
        origin: Pos2,
        events: &mut Vec<TimelineEvent>,
    ) {
        let (pressed, released, down, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.pointer.interact_pos(),
            )
        });

        let press = if pressed && response.contains_pointer() {
            pos.and_then(|pos| self.press_target(plan, origin, pos).map(|t| (pos, t)))
        } else {
            None
        };

        let left_edge = self.anchor.left_edge(Instant::now(), || origin.x);
        let frame = SurfaceFrame {
            axis: &self.axis,
            left_edge,
        };

        if let Some((pos, (target, lane))) = press {
            self.drag.pointer_down(target, pos.x, lane, frame);
        }

        let mut gesture_released = false;
        if self.drag.is_active() {
            let pointer = PointerSample {
                x: pos.map(|p| p.x),
                released,
                down,
            };
            if let Some(outcome) = self.drag.track(pointer, frame) {
                gesture_released = true;
                events.extend(TimelineEvent::from_outcome(outcome));
            }
            ui.ctx().request_repaint();
        }

        if response.clicked() && !gesture_released {
            if let Some(pos) = response.interact_pointer_pos() {
                let date = self.axis.index_to_date(self.axis.client_offset_to_index(pos.x, origin.x));
                events.push(TimelineEvent::DayClick {
                    date: format_iso_date(date),
                });
            }
        }

        self.update_cursor(ui, response, plan, origin);
    }

    fn update_cursor(&self, ui: &Ui, response: &egui::Response, plan: &Plan, origin: Pos2) {
        let icon = match self.drag.state() {
            DragState::Editing { mode: DragMode::Move, .. } => Some(CursorIcon::Grabbing),
            DragState::Editing { .. } => Some(CursorIcon::ResizeHorizontal),
            DragState::Selecting { .. } => Some(CursorIcon::Crosshair),
            DragState::Idle => response
                .hover_pos()
                .and_then(|pos| self.press_target(plan, origin, pos))
                .map(|(target, _)| match target {
                    PointerTarget::Bar { handle: BarHandle::Center, .. } => CursorIcon::Grab,
                    PointerTarget::Bar { .. } => CursorIcon::ResizeHorizontal,
                    PointerTarget::EmptyLane { .. } => CursorIcon::Crosshair,
                }),
        };
        if let Some(icon) = icon {
            ui.ctx().set_cursor_icon(icon);
        }
    }

    fn paint_preview(&self, ui: &Ui, clip: Rect) {
        let Some(geometry) = self.drag.preview().and_then(|p| p.geometry()) else {
            return;
        };
        let painter = ui
            .ctx()
            .layer_painter(LayerId::new(Order::Foreground, Id::new("timeline-drag-preview")))
            .with_clip_rect(clip);
        let rect = Rect::from_min_size(
            Pos2::new(geometry.left, geometry.top),
            Vec2::new(geometry.width, geometry.height),
        );
        painter.rect_filled(rect, BAR_ROUNDING, theme::PREVIEW_FILL);
        painter.rect_stroke(rect, BAR_ROUNDING, Stroke::new(1.5, theme::PREVIEW_STROKE));

        if let Some((start, end)) = self.drag.state().tentative_range(self.axis.total_days()) {
            painter.text(
                Pos2::new(rect.left(), rect.top() - 2.0),
                Align2::LEFT_BOTTOM,
                format!(
                    "{} → {}",
                    format_iso_date(self.axis.index_to_date(start)),
                    format_iso_date(self.axis.index_to_date(end))
                ),
                theme::font_small(),
                theme::TEXT_PRIMARY,
            );
        }
    }

    fn show_tooltip(&self, ui: &Ui, response: &egui::Response, plan: &Plan, origin: Pos2) {
        let Some(pos) = response.hover_pos() else {
            return;
        };
        let index = self.axis.client_offset_to_index(pos.x, origin.x);
        let date = self.axis.index_to_date(index);
        let row = Self::row_at(origin, pos);

        let phase = row
            .and_then(|row| plan.phases.get(row))
            .filter(|p| date >= p.start_date && date <= p.end_date);
        let entries = self.overlay.index().get(date);
        let references: Vec<_> = match row.and_then(|row| plan.phases.get(row)) {
            Some(lane_phase) => plan
                .references
                .iter()
                .filter(|r| r.phase_id == lane_phase.id && r.date == date)
                .collect(),
            None => Vec::new(),
        };

        if phase.is_none() && entries.is_empty() && references.is_empty() {
            return;
        }

        egui::show_tooltip_at_pointer(
            ui.ctx(),
            ui.layer_id(),
            Id::new(("timeline-tip", row, index)),
            |ui| {
                if let Some(phase) = phase {
                    ui.strong(&phase.name);
                    ui.label(format!(
                        "{} → {} ({} days)",
                        phase.start_date.format("%d/%m/%Y"),
                        phase.end_date.format("%d/%m/%Y"),
                        (phase.end_date - phase.start_date).num_days() + 1
                    ));
                    if let Some(metrics) = &phase.metric_values {
                        for (name, value) in metrics {
                            ui.label(format!("{name}: {value}"));
                        }
                    }
                }
                for entry in entries {
                    ui.label(format!("{} · {}", entry.day.name, entry.calendar_name));
                }
                for reference in &references {
                    let icon = match reference.kind {
                        ReferenceKind::Comment => egui_phosphor::regular::CHAT_TEXT,
                        ReferenceKind::File => egui_phosphor::regular::PAPERCLIP,
                        ReferenceKind::Link => egui_phosphor::regular::LINK,
                    };
                    ui.label(format!("{icon} {}", reference.label));
                }
            },
        );
    }

    fn show_context_menu(
        &mut self,
        response: &egui::Response,
        plan: &Plan,
        origin: Pos2,
        events: &mut Vec<TimelineEvent>,
    ) {
        if response.secondary_clicked() {
            self.context_cell = response.interact_pointer_pos().and_then(|pos| {
                let phase = plan.phases.get(Self::row_at(origin, pos)?)?;
                let index = self.axis.client_offset_to_index(pos.x, origin.x);
                Some((phase.id, self.axis.index_to_date(index)))
            });
        }

        let cell = self.context_cell;
        response.context_menu(|ui| {
            let Some((phase_id, date)) = cell else {
                ui.label(egui::RichText::new("Right-click a phase lane").weak());
                return;
            };
            ui.label(egui::RichText::new(format_iso_date(date)).small().weak());
            for action in CellAction::ALL {
                if ui.button(action.label()).clicked() {
                    events.push(action.event(phase_id, date));
                    ui.close_menu();
                }
            }
        });
    }
}

/// Phase lanes, then task lanes, then the loose-milestone lane if needed.
fn lane_rows(plan: &Plan) -> usize {
    let loose = plan.milestones.iter().any(|m| m.phase_id.is_none());
    plan.phases.len() + plan.tasks.len() + usize::from(loose)
}

fn draw_header(painter: &Painter, origin: Pos2, axis: &TimeAxis, viewport: ViewportRange, width: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
    if viewport.is_empty() {
        return;
    }

    let ppd = axis.pixels_per_day();
    for index in viewport.start_index..=viewport.end_index {
        let date = axis.index_to_date(index);
        let x = origin.x + axis.index_to_x(index);

        if date.day() == 1 || index == viewport.start_index {
            painter.text(
                Pos2::new(x + 4.0, origin.y + 12.0),
                Align2::LEFT_CENTER,
                date.format("%b %Y").to_string(),
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }

        let show_day = if ppd >= 18.0 {
            true
        } else {
            ppd >= 6.0 && date.weekday() == chrono::Weekday::Mon
        };
        if show_day {
            let color = if is_weekend(date) {
                theme::TEXT_DIM
            } else {
                theme::TEXT_SECONDARY
            };
            painter.text(
                Pos2::new(x + 3.0, origin.y + 31.0),
                Align2::LEFT_CENTER,
                date.format("%d").to_string(),
                theme::font_sub(),
                color,
            );
        }
    }
}

fn paint_layout(
    painter: &Painter,
    origin: Pos2,
    axis: &TimeAxis,
    layout: &TimelineLayout,
    clip: Rect,
    bottom: f32,
) {
    let lanes_top = origin.y + HEADER_HEIGHT;
    let ppd = axis.pixels_per_day();
    let x_at = |index: i64| origin.x + axis.index_to_x(index);
    let row_top = |row: usize| lanes_top + row as f32 * LANE_HEIGHT;
    let column = |index: i64, len: i64| {
        Rect::from_min_max(Pos2::new(x_at(index), lanes_top), Pos2::new(x_at(index + len), bottom))
    };

    for primitive in &layout.primitives {
        match primitive {
            Primitive::WeekendBand(band) => {
                painter.rect_filled(column(band.start_index, band.length), 0.0, theme::WEEKEND_BAND);
            }
            Primitive::CalendarMarker { index, entries } => {
                let holiday = entries
                    .iter()
                    .any(|e| e.day.kind == CalendarDayKind::Holiday);
                let color = if holiday {
                    theme::HOLIDAY_MARKER
                } else {
                    theme::SPECIAL_MARKER
                };
                painter.rect_filled(column(*index, 1), 0.0, color);
            }
            Primitive::Lane(lane) => {
                let rect = Rect::from_min_size(
                    Pos2::new(origin.x, row_top(lane.row)),
                    Vec2::new(axis.total_width(), LANE_HEIGHT),
                );
                if lane.row % 2 == 1 {
                    painter.rect_filled(rect, 0.0, theme::BG_LANE_ALT);
                }
                painter.line_segment(
                    [rect.left_bottom(), rect.right_bottom()],
                    Stroke::new(0.5, theme::BORDER_SUBTLE),
                );
            }
            Primitive::GridLine { index, kind } => {
                let x = x_at(*index);
                let stroke = match kind {
                    GridKind::Month => Stroke::new(1.0, theme::GRID_MONTH),
                    GridKind::Week => Stroke::new(0.5, theme::GRID_WEEK),
                };
                painter.line_segment([Pos2::new(x, lanes_top), Pos2::new(x, bottom)], stroke);
            }
            Primitive::TodayMarker { index } => {
                let x = x_at(*index) + ppd / 2.0;
                painter.line_segment(
                    [Pos2::new(x, origin.y + HEADER_HEIGHT - 6.0), Pos2::new(x, bottom)],
                    Stroke::new(2.0, theme::TODAY_LINE),
                );
                painter.add(egui::Shape::convex_polygon(
                    vec![
                        Pos2::new(x - 5.0, origin.y + HEADER_HEIGHT - 8.0),
                        Pos2::new(x + 5.0, origin.y + HEADER_HEIGHT - 8.0),
                        Pos2::new(x, origin.y + HEADER_HEIGHT - 1.0),
                    ],
                    theme::TODAY_LINE,
                    Stroke::NONE,
                ));
            }
            Primitive::Bar {
                row,
                owner,
                label,
                color,
                segments,
            } => {
                let inset = match owner {
                    BarOwner::Phase(_) => BAR_INSET,
                    BarOwner::Task(_) => BAR_INSET + 4.0,
                };
                let top = row_top(*row) + inset;
                let h = LANE_HEIGHT - 2.0 * inset;
                for (i, segment) in segments.iter().enumerate() {
                    let rect = Rect::from_min_max(
                        Pos2::new(x_at(segment.start_index), top),
                        Pos2::new(x_at(segment.end_index()), top + h),
                    );
                    painter.rect_filled(rect, BAR_ROUNDING, *color);
                    if i == 0 && rect.width() > 24.0 {
                        painter.with_clip_rect(rect.intersect(clip)).text(
                            Pos2::new(rect.left().max(clip.left()) + 6.0, rect.center().y),
                            Align2::LEFT_CENTER,
                            label,
                            theme::font_bar(),
                            theme::TEXT_ON_BAR,
                        );
                    }
                }
            }
            Primitive::Milestone { row, index, name } => {
                let center = Pos2::new(x_at(*index) + ppd / 2.0, row_top(*row) + LANE_HEIGHT / 2.0);
                let size = 6.0;
                painter.add(egui::Shape::convex_polygon(
                    vec![
                        Pos2::new(center.x, center.y - size),
                        Pos2::new(center.x + size, center.y),
                        Pos2::new(center.x, center.y + size),
                        Pos2::new(center.x - size, center.y),
                    ],
                    theme::MILESTONE,
                    Stroke::new(1.0, Color32::from_black_alpha(80)),
                ));
                painter.text(
                    Pos2::new(center.x + size + 4.0, center.y),
                    Align2::LEFT_CENTER,
                    name,
                    theme::font_small(),
                    theme::TEXT_SECONDARY,
                );
            }
            Primitive::DayCell {
                row, index, counts, ..
            } => {
                let center = Pos2::new(x_at(*index) + ppd / 2.0, row_top(*row) + 6.0);
                painter.circle_filled(center, 5.5, theme::CELL_BADGE);
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    counts.total().to_string(),
                    theme::font_small(),
                    theme::BG_DARK,
                );
            }
            Primitive::CaptureOverlay { row, .. } => {
                let rect = Rect::from_min_size(
                    Pos2::new(origin.x, row_top(*row)),
                    Vec2::new(axis.total_width(), LANE_HEIGHT),
                )
                .shrink(1.0);
                painter.rect_stroke(rect, 2.0, Stroke::new(1.0, theme::CAPTURE_OUTLINE));
            }
        }
    }

    // Lane labels stay pinned to the visible left edge.
    for primitive in &layout.primitives {
        if let Primitive::Lane(lane) = primitive {
            let pos = Pos2::new(clip.left() + 6.0, row_top(lane.row) + LANE_HEIGHT / 2.0);
            let galley = painter.layout_no_wrap(lane.label.clone(), theme::font_small(), theme::TEXT_SECONDARY);
            let rect = Rect::from_min_size(
                Pos2::new(pos.x - 3.0, pos.y - galley.size().y / 2.0 - 1.0),
                galley.size() + Vec2::new(6.0, 2.0),
            );
            painter.rect_filled(rect, 3.0, theme::BG_PANEL.gamma_multiply(0.85));
            painter.galley(
                Pos2::new(pos.x, pos.y - galley.size().y / 2.0),
                galley,
                theme::TEXT_SECONDARY,
            );
        }
    }
}
