mod cart;
mod order;
mod product;
mod sync_report;

pub use cart::CartItem;
pub use order::{OfflineOrder, OrderDraft, OrderLine};
pub use product::CachedProduct;
pub use sync_report::{SyncReport, SyncStatusSnapshot};
