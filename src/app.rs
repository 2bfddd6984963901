use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDate};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{config_dir, TimelineConfig};
use crate::model::{Calendar, CalendarDay, CalendarDayKind, DayReference, Milestone, Phase, Plan, PlanTask, ReferenceKind};
use crate::timeline::dates::{format_iso_date, parse_iso_date};
use crate::timeline::overlay::OverlayStatus;
use crate::timeline::{DragState, TimelineEvent};
use crate::ui;
use crate::ui::timeline_view::TimelineView;

/// Main application state.
pub struct TimelineApp {
    pub plan: Plan,
    pub view: TimelineView,
    pub config: TimelineConfig,
    pub file_path: Option<PathBuf>,
    /// Date shown in the toolbar's "go to" picker.
    pub jump_date: NaiveDate,
    pub status_message: String,
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: TimelineConfig) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let today = Local::now().date_naive();
        let mut view = TimelineView::new(config.clone(), &cc.egui_ctx);
        view.scroll_to_date(&format_iso_date(today));

        Self {
            plan: sample_plan(today),
            view,
            config,
            file_path: None,
            jump_date: today,
            status_message: "Ready".to_string(),
        }
    }

    fn replace_plan(&mut self, plan: Plan, file_path: Option<PathBuf>) {
        self.plan = plan;
        self.file_path = file_path;
        self.view.reset();
        self.view.scroll_to_date(&format_iso_date(self.plan.start_date));
    }

    // --- File operations ---

    pub fn new_plan(&mut self) {
        self.replace_plan(Plan::default(), None);
        self.status_message = "New plan created".to_string();
    }

    pub fn open_plan(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Release Plan", &["plan.json", "json"])
            .pick_file()
        {
            match crate::io::load_plan(&path) {
                Ok(plan) => {
                    info!(path = %path.display(), phases = plan.phases.len(), "plan loaded");
                    self.replace_plan(plan, Some(path));
                    self.status_message = "Plan loaded".to_string();
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load plan");
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_plan(&mut self) {
        match self.file_path.clone() {
            Some(path) => self.write_plan(path),
            None => self.save_plan_as(),
        }
    }

    pub fn save_plan_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Release Plan", &["plan.json", "json"])
            .set_file_name(format!("{}.plan.json", self.plan.name))
            .save_file()
        {
            self.write_plan(path);
        }
    }

    fn write_plan(&mut self, path: PathBuf) {
        self.plan.touch();
        match crate::io::save_plan(&self.plan, &path) {
            Ok(()) => {
                info!(path = %path.display(), "plan saved");
                self.status_message = "Plan saved".to_string();
                self.file_path = Some(path);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save plan");
                self.status_message = format!("Error saving: {}", e);
            }
        }
    }

    pub fn import_calendar(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        else {
            return;
        };
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Imported Calendar")
            .to_string();

        match crate::io::calendar_csv::import_calendar(&path, &name) {
            Ok((calendar, skipped)) => {
                let count = calendar.days.len();
                self.plan.calendar_ids.push(calendar.id);
                self.plan.calendars.push(calendar);
                self.plan.touch();
                self.status_message = if skipped > 0 {
                    format!("Imported '{}' with {} days ({} rows skipped)", name, count, skipped)
                } else {
                    format!("Imported '{}' with {} days", name, count)
                };
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "calendar import failed");
                self.status_message = format!("Calendar import failed: {}", e);
            }
        }
    }

    /// Show or hide a calendar on the timeline.
    pub fn toggle_calendar(&mut self, id: Uuid) {
        if let Some(pos) = self.plan.calendar_ids.iter().position(|c| *c == id) {
            self.plan.calendar_ids.remove(pos);
        } else {
            self.plan.calendar_ids.push(id);
        }
        self.plan.touch();
    }

    pub fn jump_to_date(&mut self, date: NaiveDate) {
        self.jump_date = date;
        self.view.scroll_to_date(&format_iso_date(date));
    }

    pub fn open_config_folder(&mut self) {
        let dir = config_dir();
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|_| open::that(&dir)) {
            warn!(dir = %dir.display(), error = %e, "could not open settings folder");
            self.status_message = format!("Could not open {}: {}", dir.display(), e);
        }
    }

    fn handle_event(&mut self, event: TimelineEvent) {
        if let TimelineEvent::DayClick { date } = &event {
            if let Ok(date) = parse_iso_date(date) {
                self.jump_date = date;
            }
        }
        if let TimelineEvent::AddFile { phase_id, date } = &event {
            let Some(path) = rfd::FileDialog::new().pick_file() else {
                return;
            };
            let label = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("file")
                .to_string();
            if let Some(message) = add_reference(&mut self.plan, *phase_id, date, ReferenceKind::File, label) {
                self.status_message = message;
            }
            return;
        }
        if let Some(message) = apply_event(&mut self.plan, &event) {
            self.status_message = message;
        }
    }
}

/// Apply a timeline event to the plan. Returns a status line, or `None`
/// when the event was ignored.
pub fn apply_event(plan: &mut Plan, event: &TimelineEvent) -> Option<String> {
    match event {
        TimelineEvent::PhaseRangeChange {
            phase_id,
            start_date,
            end_date,
        } => {
            let (start, end) = match (parse_iso_date(start_date), parse_iso_date(end_date)) {
                (Ok(start), Ok(end)) => (start, end),
                (Err(e), _) | (_, Err(e)) => {
                    warn!(%phase_id, error = %e, "ignoring phase range change");
                    return None;
                }
            };
            let name = plan.phases.iter().find(|p| p.id == *phase_id)?.name.clone();
            plan.set_phase_range(*phase_id, start, end);
            Some(format!("Updated '{}' ({} → {})", name, start_date, end_date))
        }
        TimelineEvent::DayClick { date } => Some(format!("Selected {}", date)),
        TimelineEvent::AddComment { phase_id, date } => {
            add_reference(plan, *phase_id, date, ReferenceKind::Comment, "Comment".into())
        }
        TimelineEvent::AddFile { phase_id, date } => {
            add_reference(plan, *phase_id, date, ReferenceKind::File, "File".into())
        }
        TimelineEvent::AddLink { phase_id, date } => {
            add_reference(plan, *phase_id, date, ReferenceKind::Link, "Link".into())
        }
        TimelineEvent::ToggleMilestone { phase_id, date } => {
            let day = parse_iso_date(date).ok()?;
            if !plan.phases.iter().any(|p| p.id == *phase_id) {
                return None;
            }
            if plan.toggle_milestone(*phase_id, day) {
                Some(format!("Milestone added on {}", date))
            } else {
                Some(format!("Milestone removed from {}", date))
            }
        }
    }
}

fn add_reference(
    plan: &mut Plan,
    phase_id: Uuid,
    date: &str,
    kind: ReferenceKind,
    label: String,
) -> Option<String> {
    let day = parse_iso_date(date).ok()?;
    let phase = plan.phases.iter().find(|p| p.id == phase_id)?.name.clone();
    let what = match kind {
        ReferenceKind::Comment => "comment",
        ReferenceKind::File => "file",
        ReferenceKind::Link => "link",
    };
    plan.references.push(DayReference {
        phase_id,
        date: day,
        kind,
        label,
    });
    plan.touch();
    Some(format!("Added {} to '{}' on {}", what, phase, date))
}

/// Generate a sample release plan around `today` for demonstration.
pub fn sample_plan(today: NaiveDate) -> Plan {
    let mut plan = Plan::new(
        "Sample Release",
        today - Duration::days(14),
        today + Duration::days(120),
    );

    let stages = [
        ("Planning", -14, 6),
        ("Development", 7, 55),
        ("Beta", 49, 80),
        ("Hardening", 81, 101),
        ("Rollout", 102, 116),
    ];
    for (i, (name, from, to)) in stages.into_iter().enumerate() {
        let mut phase = Phase::new(name, today + Duration::days(from), today + Duration::days(to));
        phase.color = ui::theme::phase_color(i);
        plan.phases.push(phase);
    }
    plan.phases[2].metric_values = Some(BTreeMap::from([
        ("Open defects".to_string(), 42.0),
        ("Crash-free sessions %".to_string(), 99.2),
    ]));

    plan.tasks.push(PlanTask::new(
        "Docs refresh",
        today + Duration::days(60),
        today + Duration::days(95),
    ));

    let beta = plan.phases[2].id;
    plan.milestones
        .push(Milestone::new("Feature freeze", today + Duration::days(55), Some(plan.phases[1].id)));
    plan.milestones
        .push(Milestone::new("General availability", today + Duration::days(117), None));

    plan.references.push(DayReference {
        phase_id: beta,
        date: today + Duration::days(52),
        kind: ReferenceKind::Comment,
        label: "Beta sign-up opens".into(),
    });

    let mut holidays = Calendar::new("Company holidays");
    for (name, m, d) in [("New Year's Day", 1, 1), ("Labour Day", 5, 1), ("Christmas Day", 12, 25)] {
        if let Some(date) = NaiveDate::from_ymd_opt(2024, m, d) {
            holidays.push_day(CalendarDay::holiday(name, date).recurring());
        }
    }
    let mut freeze = Calendar::new("Release freezes");
    freeze.push_day(CalendarDay {
        kind: CalendarDayKind::Special,
        description: Some("No production deploys".into()),
        ..CalendarDay::holiday("Deploy freeze", today + Duration::days(100))
    });

    plan.calendar_ids = vec![holidays.id, freeze.id];
    plan.calendars = vec![holidays, freeze];
    plan
}

fn overlay_label(status: OverlayStatus) -> &'static str {
    match status {
        OverlayStatus::Empty => "calendars: none",
        OverlayStatus::Synchronous => "calendars: ready",
        OverlayStatus::Pending => "calendars: resolving…",
        OverlayStatus::Background => "calendars: ready (background)",
        OverlayStatus::FellBack => "calendars: ready (fallback)",
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keyboard shortcuts
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
            self.save_plan();
        }

        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(8.0, 4.0)),
            )
            .show(ctx, |ui| {
                ui::toolbar::show_toolbar(self, ui);
            });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(8.0, 2.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(egui::RichText::new(&self.status_message).size(11.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let viewport = self.view.viewport();
                        let gesture = match self.view.drag_state() {
                            DragState::Idle => "",
                            DragState::Selecting { .. } => "selecting · ",
                            DragState::Editing { .. } => "dragging · ",
                        };
                        ui.label(
                            egui::RichText::new(format!(
                                "{}{:.1} px/day · {} → {} · {}",
                                gesture,
                                self.view.axis().pixels_per_day(),
                                viewport.start_date.format("%d/%m/%Y"),
                                viewport.end_date.format("%d/%m/%Y"),
                                overlay_label(self.view.overlay_status()),
                            ))
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                        );
                    });
                });
            });

        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let events = egui::CentralPanel::default()
            .frame(chart_frame)
            .show(ctx, |ui| self.view.show(&self.plan, ui))
            .inner;

        for event in events {
            self.handle_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn plan() -> Plan {
        let mut plan = Plan::new("Test", date(2025, 1, 1), date(2025, 6, 30));
        plan.phases.push(Phase::new("Beta", date(2025, 1, 6), date(2025, 1, 10)));
        plan
    }

    #[test]
    fn range_change_updates_the_phase() {
        let mut plan = plan();
        let id = plan.phases[0].id;
        let message = apply_event(
            &mut plan,
            &TimelineEvent::PhaseRangeChange {
                phase_id: id,
                start_date: "2025-01-13".into(),
                end_date: "2025-01-17".into(),
            },
        );
        assert!(message.is_some());
        assert_eq!(plan.phases[0].start_date, date(2025, 1, 13));
        assert_eq!(plan.phases[0].end_date, date(2025, 1, 17));
        assert_eq!(plan.revision, 1);
    }

    #[test]
    fn malformed_range_change_is_ignored() {
        let mut plan = plan();
        let id = plan.phases[0].id;
        let message = apply_event(
            &mut plan,
            &TimelineEvent::PhaseRangeChange {
                phase_id: id,
                start_date: "13/01/2025".into(),
                end_date: "2025-01-17".into(),
            },
        );
        assert_eq!(message, None);
        assert_eq!(plan.phases[0].start_date, date(2025, 1, 6));
        assert_eq!(plan.revision, 0);
    }

    #[test]
    fn cell_events_attach_references() {
        let mut plan = plan();
        let id = plan.phases[0].id;
        apply_event(
            &mut plan,
            &TimelineEvent::AddLink {
                phase_id: id,
                date: "2025-01-08".into(),
            },
        );
        assert_eq!(plan.references.len(), 1);
        assert_eq!(plan.references[0].kind, ReferenceKind::Link);
        assert_eq!(plan.references[0].date, date(2025, 1, 8));

        // Unknown phase: nothing recorded.
        assert_eq!(
            apply_event(
                &mut plan,
                &TimelineEvent::AddComment {
                    phase_id: Uuid::new_v4(),
                    date: "2025-01-08".into(),
                },
            ),
            None
        );
        assert_eq!(plan.references.len(), 1);
    }

    #[test]
    fn toggle_milestone_twice_removes_it() {
        let mut plan = plan();
        let id = plan.phases[0].id;
        let event = TimelineEvent::ToggleMilestone {
            phase_id: id,
            date: "2025-01-09".into(),
        };
        apply_event(&mut plan, &event);
        assert_eq!(plan.milestones.len(), 1);
        apply_event(&mut plan, &event);
        assert!(plan.milestones.is_empty());
    }

    #[test]
    fn sample_plan_is_consistent() {
        let today = date(2025, 3, 12);
        let plan = sample_plan(today);
        assert_eq!(plan.active_calendars().len(), 2);
        for phase in &plan.phases {
            assert!(phase.start_date <= phase.end_date, "{}", phase.name);
            assert!(plan.active_range().contains(phase.start_date));
        }
        assert!(plan.milestones.iter().any(|m| m.phase_id.is_none()));
    }
}
