mod client;

pub use client::RemoteApiClient;
