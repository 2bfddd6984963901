use chrono::{Datelike, NaiveDate};

/// An inclusive calendar span with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range; swapped bounds are put back in order.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// The active range for a plan: the whole starting year through the end
    /// of the year two years past the plan's last year, so the surface can
    /// scroll well past the plan without recomputing the range.
    pub fn for_plan(plan_start: NaiveDate, plan_end: NaiveDate) -> Self {
        let (first, last) = if plan_start <= plan_end {
            (plan_start, plan_end)
        } else {
            (plan_end, plan_start)
        };
        let start = NaiveDate::from_ymd_opt(first.year(), 1, 1).unwrap_or(first);
        let end = NaiveDate::from_ymd_opt(last.year() + 2, 12, 31).unwrap_or(last);
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn plan_range_is_expanded_and_padded() {
        let range = DateRange::for_plan(date(2025, 3, 14), date(2025, 9, 30));
        assert_eq!(range.start(), date(2025, 1, 1));
        assert_eq!(range.end(), date(2027, 12, 31));
        assert_eq!(range.days(), 365 + 366 + 365);
    }

    #[test]
    fn swapped_bounds_are_ordered() {
        let range = DateRange::new(date(2025, 2, 1), date(2025, 1, 1));
        assert_eq!(range.start(), date(2025, 1, 1));
        assert!(range.contains(date(2025, 1, 15)));
        assert!(!range.contains(date(2025, 2, 2)));
    }
}
