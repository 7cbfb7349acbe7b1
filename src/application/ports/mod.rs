pub mod connectivity;
pub mod local_store;
pub mod order_gateway;
pub mod product_gateway;

pub use connectivity::Connectivity;
pub use local_store::LocalStore;
pub use order_gateway::{OrderAck, OrderGateway, OrderPayload, OrderPayloadLine};
pub use product_gateway::ProductGateway;
