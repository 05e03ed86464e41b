//! Client-side query cache.
//!
//! Inspired by TanStack Query: results are cached per [`QueryKey`], shared by
//! every subscriber of that key, and refreshed by invalidation after a write.
//!
//! # Example
//!
//! ```ignore
//! let client = QueryClient::new(QueryOptions::default());
//! let store = store.clone();
//! let mut reports = client.query(&QueryKey::from("reports"), move || {
//!     let store = store.clone();
//!     async move { Ok(store.list().await) }
//! });
//!
//! // After a write
//! client.invalidate(&QueryKey::from("reports"));
//!
//! // In event loop tick
//! if reports.poll() {
//!     // Entry changed, trigger re-render
//! }
//!
//! // In render
//! match reports.current().state() {
//!     QueryState::Pending => render_spinner(),
//!     QueryState::Success(data) => render_data(data),
//!     QueryState::Error(e) => render_error(e),
//! }
//! ```

mod client;
mod entry;
mod key;
mod mutation;
mod subscription;

pub use client::{QueryClient, QueryOptions};
pub use entry::{CacheEntry, QueryState, QueryStatus};
pub use key::QueryKey;
pub use mutation::{Mutation, MutationState};
pub use subscription::Subscription;
