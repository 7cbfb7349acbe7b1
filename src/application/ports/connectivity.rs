use tokio::sync::watch;

/// Device connectivity signal. Implementations publish platform transitions
/// as-is, without debouncing; subscribers must tolerate flapping.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
    fn subscribe(&self) -> watch::Receiver<bool>;
}
