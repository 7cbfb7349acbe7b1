use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer contact number. Delivery coordination happens over voice calls,
/// so a queued order without a dialable number is useless.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(value: &str) -> Result<(), String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("Phone number cannot be empty".to_string());
        }
        let mut digits = 0usize;
        for c in trimmed.chars() {
            match c {
                '0'..='9' => digits += 1,
                '+' | ' ' | '-' | '(' | ')' => {}
                other => {
                    return Err(format!("Phone number contains invalid character '{other}'"));
                }
            }
        }
        if digits < 6 {
            return Err("Phone number must contain at least 6 digits".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}
