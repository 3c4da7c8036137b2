use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// E.164: leading '+', non-zero first digit, at most 15 digits
static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").expect("valid mobile regex"));

/// Minimum length of an agent display name after trimming
pub const MIN_NAME_LEN: usize = 2;

/// Display name of an agent
///
/// # Invariants
/// - Trimmed
/// - At least [`MIN_NAME_LEN`] characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name
    ///
    /// # Example
    /// ```
    /// use agent_lists_api::domain::agent::AgentName;
    ///
    /// let name = AgentName::new("  Ada Lovelace ").expect("valid name");
    /// assert_eq!(name.as_str(), "Ada Lovelace");
    /// assert!(AgentName::new("A").is_err());
    /// ```
    pub fn new(name: impl AsRef<str>) -> Result<Self, String> {
        let name = name.as_ref().trim();
        if name.chars().count() < MIN_NAME_LEN {
            return Err(format!(
                "Name must be at least {} characters long",
                MIN_NAME_LEN
            ));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mobile number with country code, in E.164 form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Creates a validated mobile number
    ///
    /// # Example
    /// ```
    /// use agent_lists_api::domain::agent::MobileNumber;
    ///
    /// assert!(MobileNumber::new("+14155550100").is_ok());
    /// assert!(MobileNumber::new("4155550100").is_err());
    /// ```
    pub fn new(mobile: impl AsRef<str>) -> Result<Self, String> {
        let mobile = mobile.as_ref().trim();
        if MOBILE_RE.is_match(mobile) {
            Ok(Self(mobile.to_string()))
        } else {
            Err(
                "Please provide a valid mobile number with country code (e.g., +1234567890)"
                    .to_string(),
            )
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        assert_eq!(AgentName::new("  Bo ").unwrap().as_str(), "Bo");
    }

    #[test]
    fn short_name_rejected() {
        assert!(AgentName::new(" B ").is_err());
        assert!(AgentName::new("").is_err());
    }

    #[test]
    fn name_length_counts_characters() {
        assert!(AgentName::new("Żu").is_ok());
    }

    #[test]
    fn mobile_accepts_e164() {
        assert!(MobileNumber::new("+12").is_ok());
        assert!(MobileNumber::new("+919876543210").is_ok());
        assert!(MobileNumber::new(" +447700900123 ").is_ok());
    }

    #[test]
    fn mobile_requires_plus_prefix() {
        assert!(MobileNumber::new("919876543210").is_err());
    }

    #[test]
    fn mobile_rejects_leading_zero_country_code() {
        assert!(MobileNumber::new("+0123456").is_err());
    }

    #[test]
    fn mobile_rejects_too_many_digits() {
        assert!(MobileNumber::new("+1234567890123456").is_err());
    }

    #[test]
    fn mobile_rejects_separators() {
        assert!(MobileNumber::new("+1 415 555 0100").is_err());
        assert!(MobileNumber::new("+1-415-555-0100").is_err());
    }
}
