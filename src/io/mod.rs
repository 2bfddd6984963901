pub mod calendar_csv;
pub mod file;

pub use file::{load_plan, save_plan};
