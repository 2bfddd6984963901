use std::path::Path;

use crate::error::TimelineResult;
use crate::model::Plan;

/// Save a plan to a JSON file.
pub fn save_plan(plan: &Plan, path: &Path) -> TimelineResult<()> {
    let json = serde_json::to_string_pretty(plan)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a plan from a JSON file.
pub fn load_plan(path: &Path) -> TimelineResult<Plan> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Calendar, CalendarDay, Phase};
    use chrono::NaiveDate;

    #[test]
    fn plan_survives_a_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release.plan.json");
        let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();

        let mut plan = Plan::new("Release 4.2", d(1, 6), d(6, 27));
        plan.phases.push(Phase::new("Beta", d(2, 3), d(3, 14)));
        let mut cal = Calendar::new("Holidays");
        cal.push_day(CalendarDay::holiday("Christmas", d(12, 25)).recurring());
        plan.calendar_ids.push(cal.id);
        plan.calendars.push(cal);

        save_plan(&plan, &path).unwrap();
        let loaded = load_plan(&path).unwrap();
        assert_eq!(loaded.name, "Release 4.2");
        assert_eq!(loaded.phases, plan.phases);
        assert_eq!(loaded.active_calendars().len(), 1);
        assert!(loaded.calendars[0].days[0].recurring);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_plan(&dir.path().join("absent.json")).is_err());
    }
}
