pub mod catalog_service;
pub mod order_service;
pub mod sync_service;

pub use catalog_service::CatalogService;
pub use order_service::{CheckoutContact, OrderService, SubmissionOutcome};
pub use sync_service::SyncService;
