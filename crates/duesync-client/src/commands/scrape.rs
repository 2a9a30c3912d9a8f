//! `duesync scrape`: log in to Gradescope and write the deadlines file.

use duesync_providers::portal::{PortalError, PortalSession, ScrapeReport, SkippedCourse, scrape_deadlines};
use duesync_sync::DeadlinesFile;
use tracing::info;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Scrapes every configured course and writes the deadlines file.
///
/// A failed login or a transport failure ends the command before anything is
/// written. Courses that time out or have no assignment table are reported
/// and skipped.
pub async fn run(config: &ClientConfig) -> ClientResult<DeadlinesFile> {
    let portal = config.portal_config().map_err(ClientError::Config)?;

    println!("Logging in to Gradescope...");
    let session = match PortalSession::login(&portal).await {
        Ok(session) => session,
        Err(PortalError::LoginFailed) => {
            println!("Login failed. Please check your credentials.");
            return Err(PortalError::LoginFailed.into());
        }
        Err(e) => return Err(e.into()),
    };
    println!("Login successful!");

    let report = scrape_deadlines(&session, &portal.course_ids, &portal.course_names).await?;
    for line in skipped_lines(&report) {
        println!("{}", line);
    }

    let file = DeadlinesFile::in_dir(config.output_dir());
    file.write(&report.deadlines)?;
    info!(
        "{} deadline(s) from {} course(s)",
        report.deadlines.len(),
        portal.course_ids.len().saturating_sub(report.skipped.len())
    );
    println!("Deadlines saved to {}", file.path().display());

    Ok(file)
}

fn skipped_lines(report: &ScrapeReport) -> Vec<String> {
    report.skipped.iter().map(describe_skip).collect()
}

fn describe_skip(skipped: &SkippedCourse) -> String {
    match skipped.error {
        PortalError::CourseLoadTimeout { .. } => format!(
            "Timeout waiting for assignments table for course {}",
            skipped.course_name
        ),
        ref other => format!("Skipping course {}: {}", skipped.course_name, other),
    }
}
