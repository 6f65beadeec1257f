//! Application-status availability gate.
//!
//! A chat room hangs off a job application, and whether the composer should
//! render at all depends on where that application is in its lifecycle. The
//! record itself is owned by the application-tracking service; this module
//! only reads its status string.
//!
//! The gate is a pure predicate with no knowledge of transport state: a
//! `false` answer tells the presentation layer to hide the composer and show
//! the explanatory empty state. It is not a transport-level block, and the
//! connection manager never consults it.

/// Lifecycle status of the job application backing a chat room.
///
/// Parsed once at the boundary; anything outside the closed set maps to
/// [`ApplicationStatus::Unknown`], which never permits chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Accepted,
    InProgress,
    Completed,
    Submitted,
    Rejected,
    Withdrawn,
    Cancelled,
    /// Absent, empty, or unrecognized input.
    Unknown,
}

impl ApplicationStatus {
    /// Parse a raw status string, matching the wire spellings
    /// (`IN_PROGRESS`, `SHORTLISTED`, ...) case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "APPLIED" => ApplicationStatus::Applied,
            "SHORTLISTED" => ApplicationStatus::Shortlisted,
            "ACCEPTED" => ApplicationStatus::Accepted,
            "IN_PROGRESS" => ApplicationStatus::InProgress,
            "COMPLETED" => ApplicationStatus::Completed,
            "SUBMITTED" => ApplicationStatus::Submitted,
            "REJECTED" => ApplicationStatus::Rejected,
            "WITHDRAWN" => ApplicationStatus::Withdrawn,
            "CANCELLED" => ApplicationStatus::Cancelled,
            _ => ApplicationStatus::Unknown,
        }
    }

    /// Parse an optional status; absent resolves to `Unknown`.
    pub fn from_opt(raw: Option<&str>) -> Self {
        raw.map_or(ApplicationStatus::Unknown, Self::parse)
    }

    /// Whether chat is permitted in this lifecycle state.
    pub fn permits_chat(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Shortlisted
                | ApplicationStatus::Accepted
                | ApplicationStatus::InProgress
                | ApplicationStatus::Completed
                | ApplicationStatus::Submitted
        )
    }

    /// Wire spelling of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Shortlisted => "SHORTLISTED",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::InProgress => "IN_PROGRESS",
            ApplicationStatus::Completed => "COMPLETED",
            ApplicationStatus::Submitted => "SUBMITTED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Withdrawn => "WITHDRAWN",
            ApplicationStatus::Cancelled => "CANCELLED",
            ApplicationStatus::Unknown => "UNKNOWN",
        }
    }
}

/// One-call form used by presentation logic before rendering the composer.
///
/// Never errors: unrecognized or absent status yields `false`.
pub fn is_chat_available(status: Option<&str>) -> bool {
    ApplicationStatus::from_opt(status).permits_chat()
}
