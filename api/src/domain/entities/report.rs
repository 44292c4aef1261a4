//! Moderation reports
//!
//! Post reports and user reports share one shape; only the subject differs.

use serde::{Deserialize, Serialize};

use super::{PostId, ReportId, Timestamps, UserId};

pub const REPORT_TITLE_MAX_LEN: usize = 256;

/// Workflow state of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    /// Anyone can create a report; it is not yet known to be valid
    #[default]
    Initiated,
    /// The report is valid and further action can be taken
    Verified,
    /// Verified, and the problem has since been solved
    Resolved,
    /// Verified and found to have no basis
    Rejected,
    /// Withdrawn by the reporter
    Redacted,
    /// Awaiting further action
    Pending,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Initiated => write!(f, "INITIATED"),
            ReportStatus::Verified => write!(f, "VERIFIED"),
            ReportStatus::Resolved => write!(f, "RESOLVED"),
            ReportStatus::Rejected => write!(f, "REJECTED"),
            ReportStatus::Redacted => write!(f, "REDACTED"),
            ReportStatus::Pending => write!(f, "PENDING"),
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INITIATED" => Ok(ReportStatus::Initiated),
            "VERIFIED" => Ok(ReportStatus::Verified),
            "RESOLVED" => Ok(ReportStatus::Resolved),
            "REJECTED" => Ok(ReportStatus::Rejected),
            "REDACTED" => Ok(ReportStatus::Redacted),
            "PENDING" => Ok(ReportStatus::Pending),
            _ => Err(format!("Unknown report status: {}", s)),
        }
    }
}

/// Something a report can be filed against
pub trait ReportSubject: Copy + Send + Sync + std::fmt::Display + 'static {
    /// Short name used in logs and error messages
    const KIND: &'static str;
}

impl ReportSubject for PostId {
    const KIND: &'static str = "post";
}

impl ReportSubject for UserId {
    const KIND: &'static str = "user";
}

/// A moderation report against a subject
#[derive(Debug, Clone, Serialize)]
pub struct Report<S> {
    pub id: ReportId,
    pub subject: S,
    pub reporter: UserId,
    pub title: String,
    pub details: String,
    pub status: ReportStatus,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl<S: ReportSubject> std::fmt::Display for Report<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Report: {} {} by {}",
            S::KIND,
            self.subject,
            self.reporter
        )
    }
}

pub type PostReport = Report<PostId>;
pub type UserReport = Report<UserId>;

/// Data needed to file a report
#[derive(Debug, Clone)]
pub struct NewReport<S> {
    pub subject: S,
    pub reporter: UserId,
    pub title: String,
    pub details: String,
}
