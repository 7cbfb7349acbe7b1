use crate::application::ports::Connectivity;
use tokio::sync::watch;
use tracing::info;

/// Connectivity sensor. Starts out optimistically online so the UI never
/// flashes an offline banner before the platform has reported; after that it
/// relays platform reachability events verbatim.
pub struct NetworkMonitor {
    tx: watch::Sender<bool>,
}

impl NetworkMonitor {
    pub fn new() -> Self {
        Self {
            tx: watch::channel(true).0,
        }
    }

    /// Feed a platform "became reachable"/"became unreachable" event in.
    pub fn set_online(&self, online: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current != online {
                *current = online;
                true
            } else {
                false
            }
        });
        if changed {
            info!(online, "connectivity changed");
        }
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Connectivity for NetworkMonitor {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
