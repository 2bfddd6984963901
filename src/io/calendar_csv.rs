use std::path::Path;

use chrono::NaiveDate;
use tracing::warn;

use crate::error::{TimelineError, TimelineResult};
use crate::model::{Calendar, CalendarDay, CalendarDayKind};

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Date,
    Name,
    Kind,
    Description,
    Recurring,
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "date" | "day" | "when" => Some(Column::Date),
        "name" | "title" | "holiday" | "label" => Some(Column::Name),
        "type" | "kind" | "category" => Some(Column::Kind),
        "description" | "notes" | "note" | "details" => Some(Column::Description),
        "recurring" | "repeat" | "repeats" | "annual" | "yearly" => Some(Column::Recurring),
        _ => None,
    }
}

fn parse_flag(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "x" | "annual" | "yearly"
    )
}

fn parse_kind(s: &str) -> CalendarDayKind {
    match s.trim().to_lowercase().as_str() {
        "special" | "event" | "freeze" => CalendarDayKind::Special,
        _ => CalendarDayKind::Holiday,
    }
}

/// Import a calendar from a CSV file. Returns `(calendar, skipped_rows)`.
pub fn import_calendar(path: &Path, name: &str) -> TimelineResult<(Calendar, usize)> {
    let content = std::fs::read_to_string(path)?;
    import_calendar_str(&content, name)
}

/// Import a calendar from CSV text.
///
/// Auto-detects the delimiter and matches headers loosely ("Date", "Name",
/// "Type", "Description", "Recurring"). Rows without a usable date or name
/// are skipped and counted.
pub fn import_calendar_str(content: &str, name: &str) -> TimelineResult<(Calendar, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    if !col_map.contains(&Some(Column::Date)) || !col_map.contains(&Some(Column::Name)) {
        let found: Vec<&str> = headers.iter().collect();
        return Err(TimelineError::Import(format!(
            "calendar CSV needs date and name columns; found {:?}",
            found
        )));
    }

    let mut calendar = Calendar::new(name);
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row, error = %e, "skipping calendar CSV row");
                skipped += 1;
                continue;
            }
        };

        let field = |col: Column| {
            col_map
                .iter()
                .position(|c| *c == Some(col))
                .and_then(|idx| record.get(idx))
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let Some(day_name) = field(Column::Name) else {
            skipped += 1;
            continue;
        };
        let Some(date) = field(Column::Date).and_then(parse_date) else {
            warn!(row, date = field(Column::Date).unwrap_or(""), "skipping calendar row with invalid date");
            skipped += 1;
            continue;
        };

        calendar.push_day(CalendarDay {
            date,
            name: day_name.to_string(),
            kind: field(Column::Kind).map(parse_kind).unwrap_or(CalendarDayKind::Holiday),
            description: field(Column::Description).map(str::to_string),
            recurring: field(Column::Recurring).map(parse_flag).unwrap_or(false),
            calendar_id: None,
        });
    }

    Ok((calendar, skipped))
}
