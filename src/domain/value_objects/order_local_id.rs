use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned rowid of a queued order. Only meaningful on this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderLocalId(i64);

impl OrderLocalId {
    pub fn new(value: i64) -> Result<Self, String> {
        if value <= 0 {
            return Err("Local order id must be positive".to_string());
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrderLocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
