//! UI-side handle for a write operation.
//!
//! A `Mutation` runs an async write on the tokio runtime and exposes its
//! progress the same way a query exposes loading state, so a view can
//! disable its trigger while the write is outstanding.
//!
//! ```ignore
//! let add = add_report.clone();
//! let mut mutation = Mutation::new(move |draft| {
//!     let add = add.clone();
//!     async move { add.run(draft).await }
//! });
//!
//! mutation.mutate(generator.generate());
//!
//! // In event loop tick
//! if mutation.poll() {
//!     // Result arrived
//! }
//! ```

use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::oneshot;

/// The state of a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationState<T> {
  /// Nothing has run yet
  Idle,
  /// A write is in progress
  Pending,
  /// Last write succeeded
  Success(T),
  /// Last write failed
  Error(String),
}

/// A boxed future that returns a Result<T, String>
type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;

type MutateFn<I, T> = Box<dyn Fn(I) -> BoxFuture<T> + Send + Sync>;

pub struct Mutation<I, T> {
  state: MutationState<T>,
  mutate_fn: MutateFn<I, T>,
  receiver: Option<oneshot::Receiver<Result<T, String>>>,
}

impl<I, T: Send + 'static> Mutation<I, T> {
  pub fn new<F, Fut, E>(mutate_fn: F) -> Self
  where
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: Display + 'static,
    I: 'static,
  {
    Self {
      state: MutationState::Idle,
      mutate_fn: Box::new(move |input: I| -> BoxFuture<T> {
        let future = mutate_fn(input);
        Box::pin(async move { future.await.map_err(|e| e.to_string()) })
      }),
      receiver: None,
    }
  }

  pub fn state(&self) -> &MutationState<T> {
    &self.state
  }

  pub fn is_pending(&self) -> bool {
    matches!(self.state, MutationState::Pending)
  }

  pub fn data(&self) -> Option<&T> {
    match &self.state {
      MutationState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match &self.state {
      MutationState::Error(e) => Some(e),
      _ => None,
    }
  }

  /// Start the write unless one is already pending.
  ///
  /// Returns `true` if the write was started.
  pub fn mutate(&mut self, input: I) -> bool {
    if self.is_pending() {
      return false;
    }

    let (tx, rx) = oneshot::channel();
    self.receiver = Some(rx);
    self.state = MutationState::Pending;

    let future = (self.mutate_fn)(input);
    tokio::spawn(async move {
      // Ignore send errors - receiver may have been dropped
      let _ = tx.send(future.await);
    });
    true
  }

  /// Poll for the result of a pending write.
  ///
  /// Returns `true` if the state changed.
  pub fn poll(&mut self) -> bool {
    let Some(receiver) = &mut self.receiver else {
      return false;
    };

    match receiver.try_recv() {
      Ok(Ok(data)) => {
        self.state = MutationState::Success(data);
        self.receiver = None;
        true
      }
      Ok(Err(error)) => {
        self.state = MutationState::Error(error);
        self.receiver = None;
        true
      }
      Err(oneshot::error::TryRecvError::Empty) => false,
      Err(oneshot::error::TryRecvError::Closed) => {
        self.state = MutationState::Error("Mutation was cancelled".to_string());
        self.receiver = None;
        true
      }
    }
  }
}

impl<I, T: std::fmt::Debug> std::fmt::Debug for Mutation<I, T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Mutation")
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  #[tokio::test]
  async fn test_mutation_success() {
    let mut mutation = Mutation::new(|n: u32| async move { Ok::<_, String>(n * 2) });
    assert_eq!(mutation.state(), &MutationState::Idle);

    assert!(mutation.mutate(21));
    assert!(mutation.is_pending());

    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(mutation.poll());
    assert_eq!(mutation.data(), Some(&42));
    assert!(!mutation.poll());
  }

  #[tokio::test]
  async fn test_mutation_error_is_stringified() {
    let mut mutation: Mutation<(), u32> = Mutation::new(|_| async {
      Err::<u32, _>(crate::error::FetchError::new("disk full"))
    });

    mutation.mutate(());
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(mutation.poll());
    assert_eq!(mutation.error(), Some("disk full"));
  }

  #[tokio::test]
  async fn test_mutate_while_pending_is_rejected() {
    let mut mutation = Mutation::new(|n: u32| async move {
      tokio::time::sleep(Duration::from_millis(50)).await;
      Ok::<_, String>(n)
    });

    assert!(mutation.mutate(1));
    assert!(!mutation.mutate(2));
    assert!(!mutation.poll());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(mutation.poll());
    assert_eq!(mutation.data(), Some(&1));

    // Free again once settled
    assert!(mutation.mutate(3));
  }
}
