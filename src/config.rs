//! Persisted timeline settings (lives in the OS config directory).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{TimelineError, TimelineResult};
use crate::timeline::OffloadPolicy;

/// User-tunable engine settings. Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Initial zoom level.
    pub pixels_per_day: f32,
    pub min_pixels_per_day: f32,
    pub max_pixels_per_day: f32,
    /// Extra day-indices rendered on each side of the visible window.
    pub overscan_days: i64,
    /// Offload calendar resolution above this many calendar days...
    pub offload_min_days: usize,
    /// ...or above this many calendars.
    pub offload_min_calendars: usize,
    pub background_offload: bool,
    /// How long a measured surface edge stays valid.
    pub anchor_cache_ms: u64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            pixels_per_day: 24.0,
            min_pixels_per_day: 2.0,
            max_pixels_per_day: 80.0,
            overscan_days: 15,
            offload_min_days: 100,
            offload_min_calendars: 3,
            background_offload: true,
            anchor_cache_ms: 50,
        }
    }
}

impl TimelineConfig {
    pub fn offload_policy(&self) -> OffloadPolicy {
        OffloadPolicy {
            enabled: self.background_offload,
            min_days: self.offload_min_days,
            min_calendars: self.offload_min_calendars,
        }
    }

    pub fn anchor_validity(&self) -> Duration {
        Duration::from_millis(self.anchor_cache_ms)
    }

    /// Fix values that would make the surface unusable.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.min_pixels_per_day.is_finite() && self.min_pixels_per_day > 0.0) {
            self.min_pixels_per_day = defaults.min_pixels_per_day;
        }
        if !(self.max_pixels_per_day.is_finite() && self.max_pixels_per_day >= self.min_pixels_per_day) {
            self.max_pixels_per_day = defaults.max_pixels_per_day.max(self.min_pixels_per_day);
        }
        if !self.pixels_per_day.is_finite() {
            self.pixels_per_day = defaults.pixels_per_day;
        }
        self.pixels_per_day = self
            .pixels_per_day
            .clamp(self.min_pixels_per_day, self.max_pixels_per_day);
        self.overscan_days = self.overscan_days.max(0);
        self
    }

    /// `<config dir>/settings.json`, or `./settings.json` when no home is known.
    pub fn default_path() -> PathBuf {
        config_dir().join("settings.json")
    }

    /// Load settings; a missing or unreadable file yields the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(TimelineError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no settings file; using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> TimelineResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        Ok(config.sanitized())
    }

    pub fn save(&self, path: &Path) -> TimelineResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

pub fn config_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "ReleaseTimeline")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
