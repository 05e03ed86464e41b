//! Typed errors for the report store, the query cache and mutations.
//!
//! Application-level failures (config, terminal, IO) go through
//! `color_eyre::Result` instead.

use thiserror::Error;

use crate::reports::types::ReportId;

/// A report id is already taken in the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("report id {0} already exists")]
pub struct DuplicateIdError(pub ReportId);

/// A fetch function failed. The message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
  message: String,
}

impl FetchError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

/// Failure of a write issued by a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
  #[error(transparent)]
  DuplicateId(#[from] DuplicateIdError),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fetch_error_displays_message_verbatim() {
    let err = FetchError::new("boom");
    assert_eq!(err.to_string(), "boom");
    assert_eq!(err.message(), "boom");
  }

  #[test]
  fn test_write_error_wraps_duplicate_id() {
    let err: WriteError = DuplicateIdError(ReportId::from("001")).into();
    assert_eq!(err.to_string(), "report id 001 already exists");
  }
}
