use chrono::NaiveDate;
use uuid::Uuid;

use super::dates::format_iso_date;
use super::drag::DragOutcome;

/// Notifications handed to the host. All dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineEvent {
    PhaseRangeChange {
        phase_id: Uuid,
        start_date: String,
        end_date: String,
    },
    DayClick {
        date: String,
    },
    AddComment {
        phase_id: Uuid,
        date: String,
    },
    AddFile {
        phase_id: Uuid,
        date: String,
    },
    AddLink {
        phase_id: Uuid,
        date: String,
    },
    ToggleMilestone {
        phase_id: Uuid,
        date: String,
    },
}

/// Actions offered on a phase's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAction {
    AddComment,
    AddFile,
    AddLink,
    ToggleMilestone,
}

impl CellAction {
    pub const ALL: [CellAction; 4] = [
        CellAction::AddComment,
        CellAction::AddFile,
        CellAction::AddLink,
        CellAction::ToggleMilestone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CellAction::AddComment => "Add comment",
            CellAction::AddFile => "Attach file",
            CellAction::AddLink => "Add link",
            CellAction::ToggleMilestone => "Toggle milestone",
        }
    }

    pub fn event(self, phase_id: Uuid, date: NaiveDate) -> TimelineEvent {
        let date = format_iso_date(date);
        match self {
            CellAction::AddComment => TimelineEvent::AddComment { phase_id, date },
            CellAction::AddFile => TimelineEvent::AddFile { phase_id, date },
            CellAction::AddLink => TimelineEvent::AddLink { phase_id, date },
            CellAction::ToggleMilestone => TimelineEvent::ToggleMilestone { phase_id, date },
        }
    }
}

impl TimelineEvent {
    /// The host-facing event for a released gesture, if any.
    pub fn from_outcome(outcome: DragOutcome) -> Option<Self> {
        match outcome {
            DragOutcome::Commit {
                phase_id,
                start_date,
                end_date,
            } => Some(TimelineEvent::PhaseRangeChange {
                phase_id,
                start_date: format_iso_date(start_date),
                end_date: format_iso_date(end_date),
            }),
            DragOutcome::Click { date } => Some(TimelineEvent::DayClick {
                date: format_iso_date(date),
            }),
            DragOutcome::Ignored | DragOutcome::Discarded => None,
        }
    }
}
