use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Network failure, or a non-2xx reply without a readable `{error}` body.
    Transport,
    /// The backend answered and said no (`{error}` body or `success: false`).
    Logical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub operation: &'static str,
    pub status: Option<u16>,
    pub message: String,
    pub details: Vec<String>,
}

impl FetchError {
    pub fn transport(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            operation,
            status: None,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn logical(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Logical,
            operation,
            status: None,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn is_transport(&self) -> bool {
        self.kind == FetchErrorKind::Transport
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FetchError {}
