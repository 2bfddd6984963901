use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Comment,
    File,
    Link,
}

/// A comment, file, or link attached to one day of a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReference {
    pub phase_id: Uuid,
    pub date: NaiveDate,
    pub kind: ReferenceKind,
    #[serde(default)]
    pub label: String,
}
