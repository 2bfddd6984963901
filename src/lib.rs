//! Release-planning timeline: a zoomable Gantt surface for plan phases.
//!
//! The engine in [`timeline`] is UI-agnostic; [`ui`] and [`app`] host it in
//! an eframe window.

pub mod app;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod timeline;
pub mod ui;

pub use error::{TimelineError, TimelineResult};
