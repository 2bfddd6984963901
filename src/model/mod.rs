pub mod calendar;
pub mod date_range;
pub mod phase;
pub mod plan;
pub mod reference;

pub use calendar::{Calendar, CalendarDay, CalendarDayKind};
pub use date_range::DateRange;
pub use phase::{Milestone, Phase, PlanTask};
pub use plan::Plan;
pub use reference::{DayReference, ReferenceKind};
