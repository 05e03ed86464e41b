use super::key::QueryKey;
use crate::error::FetchError;

/// Status of a cache entry, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
  Pending,
  Success,
  Error,
}

/// Result held by a cache entry
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
  /// No result yet, or a refetch is replacing the previous one
  Pending,
  /// Fetch completed successfully
  Success(T),
  /// Fetch failed
  Error(FetchError),
}

impl<T> QueryState<T> {
  pub fn status(&self) -> QueryStatus {
    match self {
      QueryState::Pending => QueryStatus::Pending,
      QueryState::Success(_) => QueryStatus::Success,
      QueryState::Error(_) => QueryStatus::Error,
    }
  }

  pub fn is_pending(&self) -> bool {
    matches!(self, QueryState::Pending)
  }

  pub fn is_success(&self) -> bool {
    matches!(self, QueryState::Success(_))
  }

  pub fn is_error(&self) -> bool {
    matches!(self, QueryState::Error(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&FetchError> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// Snapshot of one key's cached result, as delivered to subscribers.
///
/// `data()` is only ever `Some` on success. While a refetch is pending the
/// previous data may be carried in `placeholder()` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
  pub(crate) key: QueryKey,
  pub(crate) state: QueryState<T>,
  pub(crate) placeholder: Option<T>,
  pub(crate) is_stale: bool,
  pub(crate) is_fetching: bool,
}

impl<T> CacheEntry<T> {
  pub(crate) fn new(key: QueryKey) -> Self {
    Self {
      key,
      state: QueryState::Pending,
      placeholder: None,
      is_stale: false,
      is_fetching: false,
    }
  }

  pub fn key(&self) -> &QueryKey {
    &self.key
  }

  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  pub fn status(&self) -> QueryStatus {
    self.state.status()
  }

  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  pub fn error(&self) -> Option<&FetchError> {
    self.state.error()
  }

  /// Previous data kept while a refetch is pending
  pub fn placeholder(&self) -> Option<&T> {
    self.placeholder.as_ref()
  }

  /// Data to show: the result on success, else the placeholder if any.
  pub fn visible_data(&self) -> Option<&T> {
    self.data().or(self.placeholder.as_ref())
  }

  pub fn is_stale(&self) -> bool {
    self.is_stale
  }

  /// A fetch for this key is in flight
  pub fn is_fetching(&self) -> bool {
    self.is_fetching
  }
}
