//! Keyed query cache with subscriptions and invalidation.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::entry::{CacheEntry, QueryState};
use super::key::QueryKey;
use super::subscription::Subscription;
use crate::error::FetchError;

/// A boxed future that returns a Result<T, FetchError>
type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send>>;

/// A factory function that creates futures for fetching data
type FetcherFn<T> = Arc<dyn Fn() -> BoxFuture<T> + Send + Sync>;

/// Cache-wide behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
  /// How long a successful result counts as fresh
  pub stale_time: Duration,
  /// Carry the previous data as a placeholder while a refetch is pending
  pub keep_previous_data: bool,
  /// Views refetch stale entries when the terminal regains focus
  pub refetch_on_focus: bool,
}

impl Default for QueryOptions {
  fn default() -> Self {
    Self {
      stale_time: Duration::from_secs(60),
      keep_previous_data: true,
      refetch_on_focus: true,
    }
  }
}

/// Per-key state: the entry plus everything needed to refresh it.
struct Slot<T> {
  entry: CacheEntry<T>,
  /// First fetch function registered for this key, kept for the cache's lifetime
  fetcher: Option<FetcherFn<T>>,
  /// Generation of the fetch whose result will be accepted
  in_flight: Option<u64>,
  fetched_at: Option<Instant>,
  subscribers: Vec<mpsc::UnboundedSender<CacheEntry<T>>>,
}

impl<T: Clone> Slot<T> {
  fn new(key: QueryKey) -> Self {
    Self {
      entry: CacheEntry::new(key),
      fetcher: None,
      in_flight: None,
      fetched_at: None,
      subscribers: Vec::new(),
    }
  }

  fn needs_fetch(&self, stale_time: Duration) -> bool {
    match self.entry.state {
      QueryState::Pending | QueryState::Error(_) => true,
      QueryState::Success(_) => {
        self.entry.is_stale
          || self
            .fetched_at
            .map(|t| t.elapsed() >= stale_time)
            .unwrap_or(true)
      }
    }
  }

  fn has_subscribers(&mut self) -> bool {
    self.subscribers.retain(|tx| !tx.is_closed());
    !self.subscribers.is_empty()
  }

  /// Push the current entry to every subscriber, dropping closed ones.
  fn notify(&mut self) {
    let entry = &self.entry;
    self.subscribers.retain(|tx| tx.send(entry.clone()).is_ok());
  }

  fn begin(&mut self, generation: u64, keep_previous_data: bool) {
    let previous = std::mem::replace(&mut self.entry.state, QueryState::Pending);
    let placeholder = match previous {
      QueryState::Success(data) => Some(data),
      _ => self.entry.placeholder.take(),
    };

    self.entry.placeholder = placeholder.filter(|_| keep_previous_data);
    self.entry.is_stale = false;
    self.entry.is_fetching = true;
    self.in_flight = Some(generation);
  }
}

struct Shared<T> {
  slots: HashMap<QueryKey, Slot<T>>,
  generation: u64,
}

impl<T: Clone> Shared<T> {
  fn slot(&mut self, key: &QueryKey) -> &mut Slot<T> {
    self
      .slots
      .entry(key.clone())
      .or_insert_with(|| Slot::new(key.clone()))
  }

  /// Move the entry to pending under a new generation and notify.
  ///
  /// Returns the fetch to run, or `None` if the key has no fetch function.
  fn begin_fetch(
    &mut self,
    key: &QueryKey,
    keep_previous_data: bool,
  ) -> Option<(FetcherFn<T>, u64)> {
    let slot = self.slots.get_mut(key)?;
    let fetcher = slot.fetcher.clone()?;

    self.generation += 1;
    slot.begin(self.generation, keep_previous_data);
    slot.notify();

    Some((fetcher, self.generation))
  }
}

/// Shared query cache.
///
/// Each key holds at most one fetch in flight. Every transition of an entry
/// reaches all of its subscribers in the order it happened. Cloning the
/// client shares the cache.
pub struct QueryClient<T> {
  shared: Arc<Mutex<Shared<T>>>,
  options: QueryOptions,
}

impl<T> Clone for QueryClient<T> {
  fn clone(&self) -> Self {
    Self {
      shared: Arc::clone(&self.shared),
      options: self.options,
    }
  }
}

impl<T: Clone + Send + 'static> QueryClient<T> {
  pub fn new(options: QueryOptions) -> Self {
    Self {
      shared: Arc::new(Mutex::new(Shared {
        slots: HashMap::new(),
        generation: 0,
      })),
      options,
    }
  }

  pub fn options(&self) -> &QueryOptions {
    &self.options
  }

  fn lock(&self) -> MutexGuard<'_, Shared<T>> {
    self.shared.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Snapshot of the entry for `key`, if one exists.
  pub fn get(&self, key: &QueryKey) -> Option<CacheEntry<T>> {
    self.lock().slots.get(key).map(|slot| slot.entry.clone())
  }

  /// Subscribe to `key`, creating a pending entry if it does not exist yet.
  pub fn subscribe(&self, key: &QueryKey) -> Subscription<T> {
    let (tx, rx) = mpsc::unbounded_channel();

    let mut shared = self.lock();
    let slot = shared.slot(key);
    let current = slot.entry.clone();
    // The receiver is still in hand, so this send cannot fail
    let _ = tx.send(current.clone());
    slot.subscribers.push(tx);
    debug!(%key, subscribers = slot.subscribers.len(), "subscribed");

    Subscription::new(rx, current)
  }

  /// Subscribe to `key` and fetch it if needed.
  pub fn query<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Subscription<T>
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
  {
    let subscription = self.subscribe(key);
    self.fetch(key, fetcher);
    subscription
  }

  /// Fetch `key` unless a fetch is already in flight or the entry is fresh.
  ///
  /// The first fetcher given for a key stays associated with it and is the
  /// one used for every later fetch and invalidation. Returns `true` if a
  /// fetch was started.
  pub fn fetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> bool
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
  {
    let started = {
      let mut shared = self.lock();
      let slot = shared.slot(key);

      if slot.fetcher.is_none() {
        let fetcher: FetcherFn<T> = Arc::new(move || -> BoxFuture<T> { Box::pin(fetcher()) });
        slot.fetcher = Some(fetcher);
      }

      if slot.in_flight.is_some() {
        debug!(%key, "fetch already in flight");
        return false;
      }
      if !slot.needs_fetch(self.options.stale_time) {
        debug!(%key, "entry is fresh, skipping fetch");
        return false;
      }

      shared.begin_fetch(key, self.options.keep_previous_data)
    };

    match started {
      Some((fetcher, generation)) => {
        self.spawn_fetch(key.clone(), fetcher, generation);
        true
      }
      None => false,
    }
  }

  /// Mark `key` stale and refetch it right away if anyone is subscribed.
  ///
  /// A refetch supersedes a fetch still in flight; the older result is
  /// discarded when it arrives.
  pub fn invalidate(&self, key: &QueryKey) {
    let started = {
      let mut shared = self.lock();
      let Some(slot) = shared.slots.get_mut(key) else {
        debug!(%key, "invalidate on unknown key");
        return;
      };

      slot.entry.is_stale = true;
      if !slot.has_subscribers() {
        debug!(%key, "marked stale with no active subscribers");
        return;
      }

      shared.begin_fetch(key, self.options.keep_previous_data)
    };

    if let Some((fetcher, generation)) = started {
      debug!(%key, generation, "refetching after invalidation");
      self.spawn_fetch(key.clone(), fetcher, generation);
    }
  }

  fn spawn_fetch(&self, key: QueryKey, fetcher: FetcherFn<T>, generation: u64) {
    let task = tokio::spawn(fetcher());
    let client = self.clone();

    // A panicking fetch still settles, otherwise the key would stay in flight
    tokio::spawn(async move {
      let result = match task.await {
        Ok(result) => result,
        Err(e) => Err(FetchError::new(format!("fetch task failed: {}", e))),
      };
      client.settle(&key, generation, result);
    });
  }

  /// Apply a finished fetch, unless a newer one has replaced it.
  fn settle(&self, key: &QueryKey, generation: u64, result: Result<T, FetchError>) {
    let mut shared = self.lock();
    let Some(slot) = shared.slots.get_mut(key) else {
      return;
    };

    if slot.in_flight != Some(generation) {
      debug!(%key, generation, "discarding superseded fetch result");
      return;
    }

    slot.in_flight = None;
    slot.entry.is_fetching = false;
    slot.entry.placeholder = None;
    match result {
      Ok(data) => {
        slot.fetched_at = Some(Instant::now());
        slot.entry.state = QueryState::Success(data);
      }
      Err(err) => {
        warn!(%key, error = %err, "fetch failed");
        slot.entry.state = QueryState::Error(err);
      }
    }
    slot.notify();
  }
}
