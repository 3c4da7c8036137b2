use serde::{Deserialize, Serialize};

/// One normalized contact row
///
/// # Invariants
/// - `name` and `phone` are non-empty and trimmed
/// - `notes` is trimmed and may be empty
/// - Immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(rename = "firstName")]
    name: String,
    phone: String,
    notes: String,
}

impl ContactRecord {
    /// Creates a contact record from raw cell values
    ///
    /// All three values are trimmed first.
    ///
    /// # Returns
    /// * `Ok(ContactRecord)` - If name and phone are present after trimming
    /// * `Err(String)` - If name or phone is empty
    ///
    /// # Example
    /// ```
    /// use agent_lists_api::domain::lists::ContactRecord;
    ///
    /// let record = ContactRecord::new(" Ada ", "+15550100", "").expect("valid record");
    /// assert_eq!(record.name(), "Ada");
    /// ```
    pub fn new(
        name: impl AsRef<str>,
        phone: impl AsRef<str>,
        notes: impl AsRef<str>,
    ) -> Result<Self, String> {
        let name = name.as_ref().trim();
        let phone = phone.as_ref().trim();

        if name.is_empty() {
            return Err("Name cannot be empty".to_string());
        }
        if phone.is_empty() {
            return Err("Phone cannot be empty".to_string());
        }

        Ok(Self {
            name: name.to_string(),
            phone: phone.to_string(),
            notes: notes.as_ref().trim().to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}
