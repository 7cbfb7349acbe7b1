mod client_ref;
mod gps;
mod order_local_id;
mod order_status;
mod phone_number;
mod product_id;
mod sync_state;

pub use client_ref::ClientRef;
pub use gps::Gps;
pub use order_local_id::OrderLocalId;
pub use order_status::OrderStatus;
pub use phone_number::PhoneNumber;
pub use product_id::ProductId;
pub use sync_state::SyncState;
