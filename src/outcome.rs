//! Attempt outcomes reported by the request-execution collaborator.
//!
//! Every attempt against an endpoint produces exactly one [`Outcome`]: an
//! optional payload plus a [`Status`]. The failover engine only ever looks at
//! the status; payloads are passed through to the caller untouched.

use serde::Serialize;

/// Category of an attempt's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    /// The endpoint acknowledged the operation.
    Success,
    /// The endpoint did not answer in time. Drives retries and failover.
    Timeout,
    /// The connection could not be established.
    NetworkIssues,
    /// The endpoint rejected the request as malformed.
    BadRequest,
    /// The endpoint rejected the credentials.
    AccessDenied,
    /// The endpoint answered with a body that could not be decoded.
    MalformedResponse,
    /// Anything else.
    Unknown,
}

impl StatusCategory {
    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCategory::Success => "success",
            StatusCategory::Timeout => "timeout",
            StatusCategory::NetworkIssues => "network_issues",
            StatusCategory::BadRequest => "bad_request",
            StatusCategory::AccessDenied => "access_denied",
            StatusCategory::MalformedResponse => "malformed_response",
            StatusCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status half of an [`Outcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    category: StatusCategory,
    error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl Status {
    /// A successful, non-error status.
    pub fn success() -> Self {
        Self {
            category: StatusCategory::Success,
            error: false,
            status_code: None,
            message: None,
        }
    }

    /// An error status caused by a timeout.
    pub fn timeout() -> Self {
        Self::error(StatusCategory::Timeout)
    }

    /// An error status of the given category.
    pub fn error(category: StatusCategory) -> Self {
        Self {
            category,
            error: true,
            status_code: None,
            message: None,
        }
    }

    pub fn with_status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn is_timeout(&self) -> bool {
        self.category == StatusCategory::Timeout
    }

    pub fn category(&self) -> StatusCategory {
        self.category
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Result of one attempt: an optional payload and its status.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub result: Option<T>,
    pub status: Status,
}

impl<T> Outcome<T> {
    pub fn new(result: Option<T>, status: Status) -> Self {
        Self { result, status }
    }

    /// A successful outcome carrying `value`.
    pub fn success(value: T) -> Self {
        Self::new(Some(value), Status::success())
    }

    /// A payload-less outcome with the given status.
    pub fn failure(status: Status) -> Self {
        Self::new(None, status)
    }

    pub fn into_parts(self) -> (Option<T>, Status) {
        (self.result, self.status)
    }

    /// Continue with the payload of a non-error outcome; anything else keeps
    /// its status and drops the payload.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self.result {
            Some(value) if !self.status.is_error() => f(value),
            _ => Outcome::failure(self.status),
        }
    }
}
