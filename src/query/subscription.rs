use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

use super::entry::CacheEntry;

/// Live view of one cache key.
///
/// The first item is the entry as it was when subscribing; every later
/// transition follows in order. Dropping the subscription unsubscribes.
///
/// Async consumers use it as a [`Stream`]. The UI calls [`poll`](Self::poll)
/// from its tick handler instead, which never blocks.
#[derive(Debug)]
pub struct Subscription<T> {
  receiver: mpsc::UnboundedReceiver<CacheEntry<T>>,
  current: CacheEntry<T>,
}

impl<T: Clone> Subscription<T> {
  pub(crate) fn new(receiver: mpsc::UnboundedReceiver<CacheEntry<T>>, current: CacheEntry<T>) -> Self {
    Self { receiver, current }
  }

  /// Most recent entry seen by this subscription
  pub fn current(&self) -> &CacheEntry<T> {
    &self.current
  }

  /// Drain queued updates without blocking.
  ///
  /// Returns `true` if at least one update arrived.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    while let Ok(entry) = self.receiver.try_recv() {
      self.current = entry;
      changed = true;
    }
    changed
  }
}

impl<T: Clone + Unpin> Stream for Subscription<T> {
  type Item = CacheEntry<T>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    let this = self.get_mut();
    match this.receiver.poll_recv(cx) {
      Poll::Ready(Some(entry)) => {
        this.current = entry.clone();
        Poll::Ready(Some(entry))
      }
      other => other,
    }
  }
}
