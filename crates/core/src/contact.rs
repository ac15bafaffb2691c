//! Customer contact details.

use serde::{Deserialize, Serialize};

/// The customer's contact details, saved between visits.
///
/// The free-text order message is deliberately not part of this type: it is
/// entered per order and never stored, so it cannot be pre-filled from an
/// earlier visit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Social media handle.
    pub social: String,
}

impl ContactInfo {
    /// Copy with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            social: self.social.trim().to_string(),
        }
    }

    /// True when every field is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        [&self.name, &self.phone, &self.email, &self.social]
            .iter()
            .all(|field| field.trim().is_empty())
    }
}
