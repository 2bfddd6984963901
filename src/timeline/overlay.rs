//! Calendar overlay resolution.
//!
//! Expands the active calendars (one-off and recurring special days) into an
//! index from ISO date to the entries falling on that date. Large inputs are
//! resolved on a background thread; the synchronous resolver is always kept
//! as the fallback so the overlay never goes blank because of the offload.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use super::dates::{format_iso_date, with_year};
use super::viewport::ViewportRange;
use crate::error::{TimelineError, TimelineResult};
use crate::model::{Calendar, CalendarDay, DateRange};

/// One calendar's contribution to a date.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEntry {
    pub day: CalendarDay,
    pub calendar_name: String,
}

/// ISO date → special days on that date, across all calendars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarDayIndex {
    entries: BTreeMap<String, Vec<OverlayEntry>>,
}

impl CalendarDayIndex {
    fn insert(&mut self, date: NaiveDate, day: &CalendarDay, calendar_name: &str) {
        let mut day = day.clone();
        day.date = date;
        self.entries
            .entry(format_iso_date(date))
            .or_default()
            .push(OverlayEntry {
                day,
                calendar_name: calendar_name.to_string(),
            });
    }

    pub fn get(&self, date: NaiveDate) -> &[OverlayEntry] {
        self.get_iso(&format_iso_date(date))
    }

    pub fn get_iso(&self, date: &str) -> &[OverlayEntry] {
        self.entries.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_iso(&self, date: &str) -> bool {
        self.entries.contains_key(date)
    }

    /// Number of distinct dates carrying entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[OverlayEntry])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Restricts resolution to a window of day-indices measured from `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexWindow {
    pub origin: NaiveDate,
    pub start_index: i64,
    pub end_index: i64,
}

impl IndexWindow {
    pub fn from_viewport(origin: NaiveDate, viewport: &ViewportRange) -> Self {
        Self {
            origin,
            start_index: viewport.start_index,
            end_index: viewport.end_index,
        }
    }

    fn contains(&self, date: NaiveDate) -> bool {
        let index = (date - self.origin).num_days();
        index >= self.start_index && index <= self.end_index
    }
}

/// Everything needed to resolve an overlay.
#[derive(Debug, Clone)]
pub struct OverlayRequest {
    pub calendars: Arc<Vec<Calendar>>,
    pub range: DateRange,
    pub window: Option<IndexWindow>,
}

impl OverlayRequest {
    pub fn total_days(&self) -> usize {
        self.calendars.iter().map(|c| c.days.len()).sum()
    }
}

/// Synchronous resolution; always correct, used directly for small inputs.
pub fn resolve_calendar_days(
    calendars: &[Calendar],
    range: DateRange,
    window: Option<IndexWindow>,
) -> CalendarDayIndex {
    let accepts = |date: NaiveDate| {
        range.contains(date) && window.map_or(true, |w| w.contains(date))
    };

    let mut index = CalendarDayIndex::default();
    for calendar in calendars {
        for day in &calendar.days {
            if day.recurring {
                for year in range.start().year()..=range.end().year() {
                    if let Some(candidate) = with_year(day.date, year) {
                        if accepts(candidate) {
                            index.insert(candidate, day, &calendar.name);
                        }
                    }
                }
            } else if accepts(day.date) {
                index.insert(day.date, day, &calendar.name);
            }
        }
    }
    index
}

/// When to prefer the background path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffloadPolicy {
    pub enabled: bool,
    /// Offload once the total number of calendar days exceeds this.
    pub min_days: usize,
    /// Offload once the number of calendars exceeds this.
    pub min_calendars: usize,
}

impl Default for OffloadPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            min_days: 100,
            min_calendars: 3,
        }
    }
}

impl OffloadPolicy {
    pub fn should_offload(&self, request: &OverlayRequest) -> bool {
        self.enabled
            && (request.total_days() > self.min_days
                || request.calendars.len() > self.min_calendars)
    }
}

/// Runs resolution jobs off the UI thread.
pub trait OffloadExecutor: Send + Sync {
    fn spawn(&self, job: Box<dyn FnOnce() + Send + 'static>) -> TimelineResult<()>;
}

/// Runs each job on a fresh named thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadExecutor;

impl OffloadExecutor for ThreadExecutor {
    fn spawn(&self, job: Box<dyn FnOnce() + Send + 'static>) -> TimelineResult<()> {
        std::thread::Builder::new()
            .name("calendar-overlay".into())
            .spawn(job)
            .map(|_| ())
            .map_err(TimelineError::from)
    }
}

/// Where the current index came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStatus {
    /// Nothing requested yet.
    Empty,
    /// Resolved synchronously because the input was small.
    Synchronous,
    /// A background result for the current request is outstanding; the
    /// index holds the previous result for the same calendars, or the
    /// synchronous fallback, meanwhile.
    Pending,
    /// Adopted from the background path.
    Background,
    /// The background path failed and the synchronous result stands.
    FellBack,
}

type JobResult = (u64, TimelineResult<CalendarDayIndex>);

/// Resolves calendar overlays, offloading large inputs to an executor.
///
/// Each request gets a new generation; results from superseded generations
/// are dropped when they arrive.
pub struct OverlayResolver {
    policy: OffloadPolicy,
    executor: Box<dyn OffloadExecutor>,
    waker: Option<Arc<dyn Fn() + Send + Sync>>,
    generation: u64,
    tx: Sender<JobResult>,
    rx: Receiver<JobResult>,
    request: Option<OverlayRequest>,
    index: CalendarDayIndex,
    status: OverlayStatus,
}

impl OverlayResolver {
    pub fn new(policy: OffloadPolicy, executor: Box<dyn OffloadExecutor>) -> Self {
        let (tx, rx) = channel();
        Self {
            policy,
            executor,
            waker: None,
            generation: 0,
            tx,
            rx,
            request: None,
            index: CalendarDayIndex::default(),
            status: OverlayStatus::Empty,
        }
    }

    /// Called from the worker once a result is queued, e.g. to request a repaint.
    pub fn with_waker(mut self, waker: Arc<dyn Fn() + Send + Sync>) -> Self {
        self.waker = Some(waker);
        self
    }

    pub fn index(&self) -> &CalendarDayIndex {
        &self.index
    }

    pub fn status(&self) -> OverlayStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start resolving `request`, superseding any request still in flight.
    pub fn resolve(&mut self, request: OverlayRequest) {
        self.generation += 1;
        let generation = self.generation;

        if !self.policy.should_offload(&request) {
            self.index = resolve_calendar_days(&request.calendars, request.range, request.window);
            self.status = OverlayStatus::Synchronous;
            self.request = Some(request);
            return;
        }

        debug!(
            generation,
            calendars = request.calendars.len(),
            days = request.total_days(),
            "offloading calendar overlay resolution"
        );

        let job_request = request.clone();
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        let job = Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                resolve_calendar_days(
                    &job_request.calendars,
                    job_request.range,
                    job_request.window,
                )
            }))
            .map_err(|_| TimelineError::Offload("worker panicked".into()));
            // The resolver may be gone; nothing to report to then.
            let _ = tx.send((generation, result));
            if let Some(waker) = waker {
                waker();
            }
        });

        // An index already built from the same calendars stays up while the
        // worker runs. Anything else gets a synchronous index before the worker
        // can possibly answer.
        let reusable = !self.index.is_empty()
            && self.request.as_ref().is_some_and(|previous| {
                previous.range == request.range && previous.calendars == request.calendars
            });
        if !reusable {
            self.index = resolve_calendar_days(&request.calendars, request.range, request.window);
        }
        self.request = Some(request);

        match self.executor.spawn(job) {
            Ok(()) => self.status = OverlayStatus::Pending,
            Err(e) => {
                warn!(generation, error = %e, "calendar offload unavailable; using synchronous result");
                if reusable {
                    self.fall_back();
                } else {
                    self.status = OverlayStatus::FellBack;
                }
            }
        }
    }

    /// Adopt any finished background result. Returns true if the index changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok((generation, result)) => {
                    if generation != self.generation {
                        debug!(generation, current = self.generation, "dropping superseded overlay result");
                        continue;
                    }
                    match result {
                        Ok(index) => {
                            info!(generation, dates = index.len(), "background calendar overlay ready");
                            changed |= index != self.index;
                            self.index = index;
                            self.status = OverlayStatus::Background;
                        }
                        Err(e) => {
                            warn!(generation, error = %e, "background calendar overlay failed; keeping synchronous result");
                            changed |= self.fall_back();
                        }
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    fn fall_back(&mut self) -> bool {
        self.status = OverlayStatus::FellBack;
        let Some(request) = &self.request else {
            return false;
        };
        let index = resolve_calendar_days(&request.calendars, request.range, request.window);
        let changed = index != self.index;
        self.index = index;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CalendarDayKind;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar(name: &str, days: Vec<CalendarDay>) -> Calendar {
        let mut cal = Calendar::new(name);
        for day in days {
            cal.push_day(day);
        }
        cal
    }

    fn big_request() -> OverlayRequest {
        let days = (0..150)
            .map(|i| CalendarDay::holiday(format!("Day {i}"), date(2025, 1, 1) + chrono::Duration::days(i)))
            .collect();
        OverlayRequest {
            calendars: Arc::new(vec![calendar("Busy", days)]),
            range: DateRange::new(date(2025, 1, 1), date(2025, 12, 31)),
            window: None,
        }
    }

    struct InlineExecutor;
    impl OffloadExecutor for InlineExecutor {
        fn spawn(&self, job: Box<dyn FnOnce() + Send + 'static>) -> TimelineResult<()> {
            job();
            Ok(())
        }
    }

    struct FailingExecutor;
    impl OffloadExecutor for FailingExecutor {
        fn spawn(&self, _job: Box<dyn FnOnce() + Send + 'static>) -> TimelineResult<()> {
            Err(TimelineError::Offload("no worker".into()))
        }
    }

    /// Holds jobs until the test runs them.
    #[derive(Clone, Default)]
    struct ParkedExecutor {
        jobs: Arc<Mutex<Vec<Box<dyn FnOnce() + Send + 'static>>>>,
    }
    impl ParkedExecutor {
        fn run_all(&self) {
            let jobs: Vec<_> = self.jobs.lock().unwrap().drain(..).collect();
            for job in jobs {
                job();
            }
        }
    }
    impl OffloadExecutor for ParkedExecutor {
        fn spawn(&self, job: Box<dyn FnOnce() + Send + 'static>) -> TimelineResult<()> {
            self.jobs.lock().unwrap().push(job);
            Ok(())
        }
    }

    /// Parks jobs, or refuses them once `refuse` is set.
    #[derive(Clone, Default)]
    struct SwitchableExecutor {
        parked: ParkedExecutor,
        refuse: Arc<AtomicBool>,
    }
    impl OffloadExecutor for SwitchableExecutor {
        fn spawn(&self, job: Box<dyn FnOnce() + Send + 'static>) -> TimelineResult<()> {
            if self.refuse.load(Ordering::SeqCst) {
                return Err(TimelineError::Offload("no worker".into()));
            }
            self.parked.spawn(job)
        }
    }

    fn first_ten_days() -> IndexWindow {
        IndexWindow {
            origin: date(2025, 1, 1),
            start_index: 0,
            end_index: 9,
        }
    }

    #[test]
    fn recurring_days_repeat_each_year_in_range() {
        let christmas = CalendarDay::holiday("Christmas", date(2024, 12, 25)).recurring();
        let cals = vec![calendar("Holidays", vec![christmas])];
        let index = resolve_calendar_days(
            &cals,
            DateRange::new(date(2025, 1, 1), date(2026, 12, 31)),
            None,
        );
        assert_eq!(index.len(), 2);
        assert!(index.contains_iso("2025-12-25"));
        assert!(index.contains_iso("2026-12-25"));
        assert!(!index.contains_iso("2024-12-25"));
        assert_eq!(index.get_iso("2025-12-25")[0].day.date, date(2025, 12, 25));
    }

    #[test]
    fn one_off_days_outside_range_are_dropped() {
        let cals = vec![calendar(
            "Company",
            vec![
                CalendarDay::holiday("Offsite", date(2025, 3, 3)),
                CalendarDay::holiday("Old", date(2019, 3, 3)),
            ],
        )];
        let index = resolve_calendar_days(
            &cals,
            DateRange::new(date(2025, 1, 1), date(2025, 12, 31)),
            None,
        );
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(date(2025, 3, 3))[0].calendar_name, "Company");
    }

    #[test]
    fn several_calendars_fan_in_on_one_date() {
        let mut special = CalendarDay::holiday("Release freeze", date(2025, 5, 1));
        special.kind = CalendarDayKind::Special;
        let cals = vec![
            calendar("Country", vec![CalendarDay::holiday("Labour Day", date(2025, 5, 1))]),
            calendar("Team", vec![special]),
        ];
        let index = resolve_calendar_days(
            &cals,
            DateRange::new(date(2025, 1, 1), date(2025, 12, 31)),
            None,
        );
        let entries = index.get(date(2025, 5, 1));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].day.kind, CalendarDayKind::Special);
    }

    #[test]
    fn window_restricts_to_viewport_indices() {
        let cals = vec![calendar(
            "Holidays",
            vec![
                CalendarDay::holiday("New Year", date(2025, 1, 1)).recurring(),
                CalendarDay::holiday("Midsummer", date(2025, 6, 20)),
            ],
        )];
        let window = IndexWindow {
            origin: date(2025, 1, 1),
            start_index: 150,
            end_index: 200,
        };
        let index = resolve_calendar_days(
            &cals,
            DateRange::new(date(2025, 1, 1), date(2026, 12, 31)),
            Some(window),
        );
        assert_eq!(index.len(), 1);
        assert!(index.contains_iso("2025-06-20"));
    }

    #[test]
    fn small_inputs_resolve_synchronously() {
        let cals = Arc::new(vec![calendar(
            "Holidays",
            vec![CalendarDay::holiday("Offsite", date(2025, 3, 3))],
        )]);
        let mut resolver = OverlayResolver::new(OffloadPolicy::default(), Box::new(FailingExecutor));
        resolver.resolve(OverlayRequest {
            calendars: cals,
            range: DateRange::new(date(2025, 1, 1), date(2025, 12, 31)),
            window: None,
        });
        assert_eq!(resolver.status(), OverlayStatus::Synchronous);
        assert_eq!(resolver.index().len(), 1);
    }

    #[test]
    fn large_inputs_adopt_background_result() {
        let mut resolver = OverlayResolver::new(OffloadPolicy::default(), Box::new(InlineExecutor));
        resolver.resolve(big_request());
        assert_eq!(resolver.status(), OverlayStatus::Pending);
        resolver.poll();
        assert_eq!(resolver.status(), OverlayStatus::Background);
        assert_eq!(resolver.index().len(), 150);
    }

    #[test]
    fn spawn_failure_keeps_synchronous_index() {
        let mut resolver = OverlayResolver::new(OffloadPolicy::default(), Box::new(FailingExecutor));
        resolver.resolve(big_request());
        assert_eq!(resolver.status(), OverlayStatus::FellBack);
        assert_eq!(resolver.index().len(), 150);
    }

    #[test]
    fn pending_result_never_leaves_index_empty() {
        let parked = ParkedExecutor::default();
        let mut resolver = OverlayResolver::new(OffloadPolicy::default(), Box::new(parked.clone()));
        resolver.resolve(big_request());
        assert!(!resolver.poll());
        assert_eq!(resolver.status(), OverlayStatus::Pending);
        assert_eq!(resolver.index().len(), 150);
    }

    #[test]
    fn superseded_results_are_dropped() {
        let parked = ParkedExecutor::default();
        let mut resolver = OverlayResolver::new(OffloadPolicy::default(), Box::new(parked.clone()));
        resolver.resolve(big_request());

        let mut narrower = big_request();
        narrower.window = Some(IndexWindow {
            origin: date(2025, 1, 1),
            start_index: 0,
            end_index: 9,
        });
        resolver.resolve(narrower);
        assert_eq!(resolver.generation(), 2);

        parked.run_all();
        resolver.poll();
        assert_eq!(resolver.status(), OverlayStatus::Background);
        assert_eq!(resolver.index().len(), 10);
    }

    #[test]
    fn failed_worker_falls_back() {
        let parked = ParkedExecutor::default();
        let mut resolver = OverlayResolver::new(OffloadPolicy::default(), Box::new(parked));
        resolver.resolve(big_request());
        // A panicking worker reports an error for its generation.
        resolver
            .tx
            .send((resolver.generation(), Err(TimelineError::Offload("boom".into()))))
            .unwrap();
        resolver.poll();
        assert_eq!(resolver.status(), OverlayStatus::FellBack);
        assert_eq!(resolver.index().len(), 150);
    }

    #[test]
    fn pending_request_keeps_the_index_for_the_same_calendars() {
        let parked = ParkedExecutor::default();
        let mut resolver = OverlayResolver::new(OffloadPolicy::default(), Box::new(parked.clone()));
        let request = big_request();
        resolver.resolve(request.clone());
        parked.run_all();
        resolver.poll();
        assert_eq!(resolver.index().len(), 150);

        // A new window over the same calendars: no synchronous pass, the
        // adopted index stays up until the worker answers.
        let mut scrolled = request;
        scrolled.window = Some(first_ten_days());
        resolver.resolve(scrolled);
        assert_eq!(resolver.status(), OverlayStatus::Pending);
        assert_eq!(resolver.index().len(), 150);

        parked.run_all();
        assert!(resolver.poll());
        assert_eq!(resolver.index().len(), 10);
    }

    #[test]
    fn changed_calendars_are_resolved_before_offloading() {
        let parked = ParkedExecutor::default();
        let mut resolver = OverlayResolver::new(OffloadPolicy::default(), Box::new(parked.clone()));
        resolver.resolve(big_request());
        parked.run_all();
        resolver.poll();

        let days = (0..120)
            .map(|i| CalendarDay::holiday(format!("Freeze {i}"), date(2025, 3, 1) + chrono::Duration::days(i)))
            .collect();
        resolver.resolve(OverlayRequest {
            calendars: Arc::new(vec![calendar("Freezes", days)]),
            range: DateRange::new(date(2025, 1, 1), date(2025, 12, 31)),
            window: None,
        });
        assert_eq!(resolver.status(), OverlayStatus::Pending);
        assert_eq!(resolver.index().len(), 120);
        assert_eq!(resolver.index().get(date(2025, 3, 1))[0].calendar_name, "Freezes");
    }

    #[test]
    fn refused_offload_resolves_the_new_window() {
        let executor = SwitchableExecutor::default();
        let mut resolver = OverlayResolver::new(OffloadPolicy::default(), Box::new(executor.clone()));
        let request = big_request();
        resolver.resolve(request.clone());
        executor.parked.run_all();
        resolver.poll();

        executor.refuse.store(true, Ordering::SeqCst);
        let mut scrolled = request;
        scrolled.window = Some(first_ten_days());
        resolver.resolve(scrolled);
        assert_eq!(resolver.status(), OverlayStatus::FellBack);
        assert_eq!(resolver.index().len(), 10);
    }
}
