//! Upload reconciliation: create an event per deadline unless one exists.
//!
//! Each deadline costs one search and at most one insert. Errors are
//! recorded per deadline and never stop the batch; nothing is retried.

use std::fmt;

use duesync_core::{CourseColors, LogRecord, NormalizedDeadline};
use duesync_providers::{CalendarService, EventQuery, NewEvent, ProviderError};
use tracing::{debug, info, warn};

/// The remote call a failed deadline stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStage {
    Search,
    Insert,
}

impl fmt::Display for ReconcileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Search => "duplicate check",
            Self::Insert => "insert",
        })
    }
}

/// What happened to one deadline.
#[derive(Debug)]
pub enum ReconcileOutcome {
    /// An event was created; the record goes in the event log.
    Created(LogRecord),
    /// An event with the same summary already covers the due time.
    SkippedDuplicate,
    Failed {
        stage: ReconcileStage,
        error: ProviderError,
    },
}

impl ReconcileOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// A deadline's summary and its outcome.
#[derive(Debug)]
pub struct ReconcileResult {
    pub summary: String,
    pub outcome: ReconcileOutcome,
}

/// Outcomes for a batch, in input order.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub results: Vec<ReconcileResult>,
}

impl ReconcileReport {
    /// Log records of the created events, in input order.
    pub fn records(&self) -> Vec<LogRecord> {
        self.results
            .iter()
            .filter_map(|r| match &r.outcome {
                ReconcileOutcome::Created(record) => Some(record.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn created(&self) -> usize {
        self.count(|o| o.is_created())
    }

    pub fn duplicates(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::SkippedDuplicate))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ReconcileOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Reconciles deadlines against one calendar.
pub struct Reconciler<'a> {
    calendar: &'a dyn CalendarService,
    colors: &'a CourseColors,
    time_zone: Option<String>,
}

impl<'a> Reconciler<'a> {
    pub fn new(calendar: &'a dyn CalendarService, colors: &'a CourseColors) -> Self {
        Self {
            calendar,
            colors,
            time_zone: None,
        }
    }

    /// IANA zone the created events are displayed in.
    pub fn with_time_zone(mut self, time_zone: Option<String>) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Processes one deadline.
    pub async fn reconcile(&self, deadline: &NormalizedDeadline) -> ReconcileOutcome {
        let summary = deadline.summary();
        let window = deadline.event_window();

        let query = EventQuery::new(window.clone()).with_text(&summary);
        let existing = match self.calendar.search_events(query).await {
            Ok(events) => events,
            Err(error) => {
                warn!("duplicate check failed for {}: {}", summary, error);
                return ReconcileOutcome::Failed {
                    stage: ReconcileStage::Search,
                    error,
                };
            }
        };

        // the text query matches loosely; only an identical summary counts
        if existing.iter().any(|e| e.has_summary(&summary)) {
            info!("duplicate event skipped: {}", summary);
            return ReconcileOutcome::SkippedDuplicate;
        }

        let mut event = NewEvent::new(&summary, window.start, window.end)
            .with_color(self.colors.resolve(&deadline.course_name));
        if let Some(ref tz) = self.time_zone {
            event = event.with_time_zone(tz);
        }

        match self.calendar.insert_event(event).await {
            Ok(created) if created.id.is_empty() => {
                warn!("insert for {} returned no event id", summary);
                ReconcileOutcome::Failed {
                    stage: ReconcileStage::Insert,
                    error: ProviderError::invalid_response("created event has no id")
                        .with_provider(self.calendar.name()),
                }
            }
            Ok(created) => {
                info!(
                    "event added: {} {}",
                    summary,
                    created.html_link.as_deref().unwrap_or("")
                );
                ReconcileOutcome::Created(LogRecord::created(
                    deadline,
                    created.id,
                    created.html_link,
                ))
            }
            Err(error) => {
                warn!("insert failed for {}: {}", summary, error);
                ReconcileOutcome::Failed {
                    stage: ReconcileStage::Insert,
                    error,
                }
            }
        }
    }

    /// Processes deadlines one after another, in order.
    pub async fn reconcile_all(&self, deadlines: &[NormalizedDeadline]) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for deadline in deadlines {
            let outcome = self.reconcile(deadline).await;
            report.results.push(ReconcileResult {
                summary: deadline.summary(),
                outcome,
            });
        }

        debug!(
            "reconciled {} deadlines against {}: {} created, {} duplicates, {} failed",
            deadlines.len(),
            self.calendar.name(),
            report.created(),
            report.duplicates(),
            report.failed()
        );
        report
    }
}
