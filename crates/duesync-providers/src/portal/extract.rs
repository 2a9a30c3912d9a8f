//! Pulling assignment deadlines out of course pages.

use duesync_core::{CourseNames, RawDeadline};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use super::error::{PortalError, PortalResult};
use super::session::PortalSession;

selector!(ASSIGNMENT_TABLE, "#assignments-student-table");
selector!(ASSIGNMENT_ROW, "#assignments-student-table tbody tr");
selector!(
    ASSIGNMENT_TITLE,
    "th.table--primaryLink a, th.table--primaryLink button"
);
selector!(DUE_DATE, "time.submissionTimeChart--dueDate");

/// A course that contributed nothing to the scrape, and why.
#[derive(Debug)]
pub struct SkippedCourse {
    pub course_id: String,
    pub course_name: String,
    pub error: PortalError,
}

/// Deadlines from every course that loaded, plus the ones that did not.
#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub deadlines: Vec<RawDeadline>,
    pub skipped: Vec<SkippedCourse>,
}

/// Extracts the deadlines listed on one course page.
///
/// Rows without a title or a due date are ignored.
pub fn extract_deadlines(
    html: &str,
    course_id: &str,
    course_name: &str,
) -> PortalResult<Vec<RawDeadline>> {
    let document = Html::parse_document(html);

    if document.select(&ASSIGNMENT_TABLE).next().is_none() {
        return Err(PortalError::AssignmentTableMissing {
            course: course_name.to_string(),
        });
    }

    let deadlines = document
        .select(&ASSIGNMENT_ROW)
        .filter_map(|row| read_row(row, course_id, course_name))
        .collect();

    Ok(deadlines)
}

fn read_row(row: ElementRef<'_>, course_id: &str, course_name: &str) -> Option<RawDeadline> {
    let title = row.select(&ASSIGNMENT_TITLE).next()?;
    let due = row.select(&DUE_DATE).next()?.value().attr("datetime")?;

    let name = title.text().collect::<String>().trim().to_string();
    if name.is_empty() {
        return None;
    }

    Some(RawDeadline::new(course_id, course_name, name, due))
}

/// Loads every course in order and collects its deadlines.
///
/// A course that times out, answers with an error status or has no
/// assignment table is skipped; the remaining courses are still scraped.
///
/// # Errors
///
/// Transport and URL failures end the scrape, see [`PortalError::skips_course`].
pub async fn scrape_deadlines(
    session: &PortalSession,
    course_ids: &[String],
    course_names: &CourseNames,
) -> PortalResult<ScrapeReport> {
    let mut report = ScrapeReport::default();

    for course_id in course_ids {
        let course_name = course_names.resolve(course_id);

        let result = match session.fetch_course_page(course_id, course_name).await {
            Ok(html) => extract_deadlines(&html, course_id, course_name),
            Err(e) => Err(e),
        };

        match result {
            Ok(deadlines) => {
                debug!("{} deadlines found for {}", deadlines.len(), course_name);
                report.deadlines.extend(deadlines);
            }
            Err(error) if !error.skips_course() => {
                warn!("aborting scrape at course {} ({}): {}", course_name, course_id, error);
                return Err(error);
            }
            Err(error) => {
                warn!("skipping course {} ({}): {}", course_name, course_id, error);
                report.skipped.push(SkippedCourse {
                    course_id: course_id.clone(),
                    course_name: course_name.to_string(),
                    error,
                });
            }
        }
    }

    info!(
        "scraped {} deadlines from {} courses ({} skipped)",
        report.deadlines.len(),
        course_ids.len(),
        report.skipped.len()
    );
    Ok(report)
}
