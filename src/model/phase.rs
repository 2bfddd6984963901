use std::collections::BTreeMap;

use chrono::NaiveDate;
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A schedulable interval of a release plan, drawn as a bar on its own lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Display color for the phase bar, stored as `#RRGGBB`.
    #[serde(with = "hex_color")]
    pub color: Color32,
    /// Indicator values shown alongside the bar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_values: Option<BTreeMap<String, f64>>,
}

impl Phase {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date,
            end_date,
            color: Color32::from_rgb(70, 130, 180), // Steel blue
            metric_values: None,
        }
    }
}

/// A work item rendered on a task lane below the phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTask {
    pub id: Uuid,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "hex_color")]
    pub color: Color32,
}

impl PlanTask {
    pub fn new(title: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            start_date,
            end_date,
            color: Color32::from_rgb(106, 90, 205),
        }
    }
}

/// A single-day marker, optionally attached to a phase's lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Uuid,
    pub date: NaiveDate,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<Uuid>,
}

impl Milestone {
    pub fn new(name: impl Into<String>, date: NaiveDate, phase_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            name: name.into(),
            description: None,
            phase_id,
        }
    }
}

/// Serde helper storing `Color32` as a `#RRGGBB` / `#RRGGBBAA` string.
pub mod hex_color {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let [r, g, b, a] = color.to_array();
        if a == 255 {
            serializer.serialize_str(&format!("#{:02X}{:02X}{:02X}", r, g, b))
        } else {
            serializer.serialize_str(&format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_hex_color(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse_hex_color(s: &str) -> Result<Color32, String> {
        let hex = s.trim().trim_start_matches('#');
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .ok_or_else(|| format!("Invalid hex color '{}'", s))
        };
        match hex.len() {
            6 => Ok(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color32::from_rgba_unmultiplied(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)?,
            )),
            _ => Err(format!(
                "Invalid hex color '{}': expected 6 or 8 hex digits",
                s
            )),
        }
    }
}
