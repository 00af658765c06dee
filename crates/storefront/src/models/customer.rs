//! Customer directory entries and the logged-in identity.

use serde::{Deserialize, Serialize};

use ubermelon_core::Email;

/// A customer allowed to log in.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
}

impl Customer {
    /// "First Last", trimmed when either part is empty.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl std::fmt::Debug for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Customer")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Session-stored customer identity.
///
/// Minimal data stored in the session to identify the logged-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentCustomer {
    /// Customer's email address (directory key).
    pub email: Email,
    /// Used for greetings in the page header.
    pub first_name: String,
}

impl From<&Customer> for CurrentCustomer {
    fn from(customer: &Customer) -> Self {
        Self {
            email: customer.email.clone(),
            first_name: customer.first_name.clone(),
        }
    }
}
