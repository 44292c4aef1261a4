//! Report service
//!
//! One service shape serves both post reports and user reports; the subject
//! type picks the table.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::app::validation::require_text;
use crate::domain::entities::{
    NewReport, Report, ReportId, ReportStatus, ReportSubject, UserId, REPORT_TITLE_MAX_LEN,
};
use crate::domain::ports::ReportRepository;
use crate::error::AppError;

pub struct ReportService<S, R>
where
    S: ReportSubject,
    R: ReportRepository<S>,
{
    reports: Arc<R>,
    _subject: PhantomData<S>,
}

impl<S, R> ReportService<S, R>
where
    S: ReportSubject,
    R: ReportRepository<S>,
{
    pub fn new(reports: Arc<R>) -> Self {
        Self {
            reports,
            _subject: PhantomData,
        }
    }

    /// File a report. New reports start out INITIATED.
    pub async fn file(
        &self,
        subject: S,
        reporter: UserId,
        title: &str,
        details: &str,
    ) -> Result<Report<S>, AppError> {
        require_text("Report title", title, REPORT_TITLE_MAX_LEN)?;

        let report = self
            .reports
            .create(&NewReport {
                subject,
                reporter,
                title: title.to_string(),
                details: details.to_string(),
            })
            .await?;
        tracing::info!(report_id = %report.id, kind = S::KIND, subject = %subject, "Report filed");
        Ok(report)
    }

    pub async fn get(&self, id: &ReportId) -> Result<Report<S>, AppError> {
        self.reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} report {}", S::KIND, id)))
    }

    /// Newest first, optionally restricted to one status
    pub async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Report<S>>, AppError> {
        Ok(self.reports.list(status, limit, offset).await?)
    }

    pub async fn list_for_subject(&self, subject: &S) -> Result<Vec<Report<S>>, AppError> {
        Ok(self.reports.list_for_subject(subject).await?)
    }

    /// Move a report to any status
    pub async fn set_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<Report<S>, AppError> {
        let report = self.reports.set_status(id, status).await?;
        tracing::info!(report_id = %id, kind = S::KIND, status = %status, "Report status changed");
        Ok(report)
    }
}
