use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of special day a calendar entry marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarDayKind {
    Holiday,
    Special,
}

/// A holiday or special day belonging to a calendar.
///
/// When `recurring` is set, the month/day repeats every year of the active range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CalendarDayKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    /// Id of the owning calendar; never the calendar itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<Uuid>,
}

impl CalendarDay {
    pub fn holiday(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            date,
            name: name.into(),
            kind: CalendarDayKind::Holiday,
            description: None,
            recurring: false,
            calendar_id: None,
        }
    }

    pub fn recurring(mut self) -> Self {
        self.recurring = true;
        self
    }
}

/// A named set of special days, resolved by id from the calendar collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub days: Vec<CalendarDay>,
}

impl Calendar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            days: Vec::new(),
        }
    }

    /// Add a day, stamping it with this calendar's id.
    pub fn push_day(&mut self, mut day: CalendarDay) {
        day.calendar_id = Some(self.id);
        self.days.push(day);
    }
}
