use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery coordinates captured at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gps {
    lat: f64,
    lng: f64,
}

impl Gps {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("Latitude {lat} out of range"));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!("Longitude {lng} out of range"));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl fmt::Display for Gps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_coordinate_ranges() {
        assert!(Gps::new(12.37, -1.53).is_ok());
        assert!(Gps::new(91.0, 0.0).is_err());
        assert!(Gps::new(0.0, 181.0).is_err());
    }
}
