mod connection_pool;
mod fail_soft;
mod rows;
mod sqlite_store;

pub use connection_pool::ConnectionPool;
pub use fail_soft::FailSoftStore;
pub use sqlite_store::SqliteStore;
