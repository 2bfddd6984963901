use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::Calendar;
use super::date_range::DateRange;
use super::phase::{Milestone, Phase, PlanTask};
use super::reference::DayReference;

/// A release plan: its phases, tasks, milestones, calendars, and day references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub phases: Vec<Phase>,
    #[serde(default)]
    pub tasks: Vec<PlanTask>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    /// Every calendar known to the plan file.
    #[serde(default)]
    pub calendars: Vec<Calendar>,
    /// Calendars shown on the timeline, by id.
    #[serde(default)]
    pub calendar_ids: Vec<Uuid>,
    #[serde(default)]
    pub references: Vec<DayReference>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    /// Bumped on every mutation; lets views cache derived layout.
    #[serde(skip)]
    pub revision: u64,
}

impl Default for Plan {
    fn default() -> Self {
        let today = Utc::now().date_naive();
        Self {
            name: "Untitled Plan".to_string(),
            start_date: today,
            end_date: today + chrono::Duration::days(90),
            phases: Vec::new(),
            tasks: Vec::new(),
            milestones: Vec::new(),
            calendars: Vec::new(),
            calendar_ids: Vec::new(),
            references: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
            revision: 0,
        }
    }
}

impl Plan {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
            ..Default::default()
        }
    }

    /// Touch the modified timestamp and bump the revision.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
        self.revision = self.revision.wrapping_add(1);
    }

    /// The date range the timeline spans for this plan.
    pub fn active_range(&self) -> DateRange {
        DateRange::for_plan(self.start_date, self.end_date)
    }

    /// Calendars selected for display, resolved by id in selection order.
    /// Unknown ids are skipped.
    pub fn active_calendars(&self) -> Vec<Calendar> {
        self.calendar_ids
            .iter()
            .filter_map(|id| self.calendars.iter().find(|c| c.id == *id))
            .cloned()
            .collect()
    }

    pub fn phase_mut(&mut self, id: Uuid) -> Option<&mut Phase> {
        self.phases.iter_mut().find(|p| p.id == id)
    }

    /// Set a phase's dates, enforcing `start < end` with a one-day minimum.
    /// Returns false when the phase does not exist.
    pub fn set_phase_range(&mut self, id: Uuid, start: NaiveDate, end: NaiveDate) -> bool {
        let Some(phase) = self.phase_mut(id) else {
            return false;
        };
        phase.start_date = start;
        phase.end_date = if end <= start {
            start + chrono::Duration::days(1)
        } else {
            end
        };
        self.touch();
        true
    }

    /// Add a milestone on the phase's lane, or remove the one already there.
    /// Returns true when a milestone now exists on that day.
    pub fn toggle_milestone(&mut self, phase_id: Uuid, date: NaiveDate) -> bool {
        let before = self.milestones.len();
        self.milestones
            .retain(|m| !(m.phase_id == Some(phase_id) && m.date == date));
        let added = self.milestones.len() == before;
        if added {
            self.milestones
                .push(Milestone::new("Milestone", date, Some(phase_id)));
        }
        self.touch();
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn set_phase_range_enforces_minimum_duration() {
        let mut plan = Plan::new("Release", date(2025, 1, 1), date(2025, 6, 30));
        let phase = Phase::new("Alpha", date(2025, 1, 6), date(2025, 1, 10));
        let id = phase.id;
        plan.phases.push(phase);

        assert!(plan.set_phase_range(id, date(2025, 1, 8), date(2025, 1, 8)));
        let phase = &plan.phases[0];
        assert_eq!(phase.start_date, date(2025, 1, 8));
        assert_eq!(phase.end_date, date(2025, 1, 9));
        assert!(!plan.set_phase_range(Uuid::new_v4(), date(2025, 1, 8), date(2025, 1, 9)));
    }

    #[test]
    fn toggle_milestone_adds_then_removes() {
        let mut plan = Plan::new("Release", date(2025, 1, 1), date(2025, 6, 30));
        let phase_id = Uuid::new_v4();
        assert!(plan.toggle_milestone(phase_id, date(2025, 2, 3)));
        assert_eq!(plan.milestones.len(), 1);
        assert!(!plan.toggle_milestone(phase_id, date(2025, 2, 3)));
        assert!(plan.milestones.is_empty());
    }

    #[test]
    fn active_calendars_follow_selection() {
        let mut plan = Plan::new("Release", date(2025, 1, 1), date(2025, 6, 30));
        let a = Calendar::new("Company");
        let b = Calendar::new("Country");
        plan.calendar_ids = vec![b.id, Uuid::new_v4()];
        plan.calendars = vec![a, b];
        let active = plan.active_calendars();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Country");
    }
}
