//! Offline-first order synchronization engine for the Sokoni local-commerce
//! marketplace.
//!
//! A buyer can keep browsing the cached catalog and place orders while
//! disconnected; orders are durably queued on-device and drained to the
//! remote node, oldest first, once connectivity returns. The `node` module is
//! the remote end: the endpoints that accept synced orders and serve the
//! catalog.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod node;
pub mod shared;

mod state;

pub use application::services::{
    CatalogService, CheckoutContact, OrderService, SubmissionOutcome, SyncService,
};
pub use shared::config::AppConfig;
pub use shared::error::{AppError, Result};
pub use state::AppState;
