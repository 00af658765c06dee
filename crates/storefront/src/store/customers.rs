//! The customer directory.
//!
//! # File format
//!
//! One customer per line:
//!
//! ```text
//! # first_name|last_name|email|password
//! Mel|Melitas|mel@ubermelon.com|correct horse battery staple
//! ```
//!
//! Passwords are hashed with Argon2 while loading; plaintext is not kept.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use thiserror::Error;
use ubermelon_core::{Email, EmailError};

use super::records::records;
use crate::models::Customer;
use crate::services::auth::hash_password;

const FIELD_COUNT: usize = 4;

/// Errors that can occur while loading a customer directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read customer file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected 4 fields, found {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: invalid email: {source}")]
    InvalidEmail {
        line: usize,
        #[source]
        source: EmailError,
    },
    #[error("line {line}: password cannot be empty")]
    EmptyPassword { line: usize },
    #[error("line {line}: duplicate customer email {email}")]
    DuplicateEmail { line: usize, email: Email },
    #[error("password hashing failed")]
    PasswordHash,
}

/// Read-only registry of customers, keyed by normalized email.
pub struct CustomerDirectory {
    customers: HashMap<Email, Customer>,
    /// Verified against when the email is unknown so both failure paths cost
    /// the same.
    dummy_hash: String,
}

impl CustomerDirectory {
    /// Build a directory from customers whose passwords are already hashed.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::DuplicateEmail` if two customers share an
    /// email (`line` is the 1-based position of the second one), or
    /// `DirectoryError::PasswordHash` if the dummy hash cannot be created.
    pub fn new(customers: Vec<Customer>) -> Result<Self, DirectoryError> {
        let mut by_email = HashMap::with_capacity(customers.len());
        for (position, customer) in customers.into_iter().enumerate() {
            let email = customer.email.clone();
            if by_email.insert(email.clone(), customer).is_some() {
                return Err(DirectoryError::DuplicateEmail {
                    line: position + 1,
                    email,
                });
            }
        }

        let dummy_hash =
            hash_password("ubermelon-unknown-customer").map_err(|_| DirectoryError::PasswordHash)?;

        Ok(Self {
            customers: by_email,
            dummy_hash,
        })
    }

    /// Parse a directory from pipe-delimited text, hashing each password.
    ///
    /// # Errors
    ///
    /// Returns a `DirectoryError` naming the offending line.
    pub fn parse(source: &str) -> Result<Self, DirectoryError> {
        let mut customers = Vec::new();
        let mut seen = HashSet::new();

        for record in records(source) {
            let line = record.line;
            let [first_name, last_name, email, password] =
                <[&str; FIELD_COUNT]>::try_from(record.fields.as_slice()).map_err(|_| {
                    DirectoryError::FieldCount {
                        line,
                        found: record.fields.len(),
                    }
                })?;

            let email = Email::parse(email)
                .map_err(|source| DirectoryError::InvalidEmail { line, source })?;
            if !seen.insert(email.clone()) {
                return Err(DirectoryError::DuplicateEmail { line, email });
            }
            if password.is_empty() {
                return Err(DirectoryError::EmptyPassword { line });
            }

            customers.push(Customer {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email,
                password_hash: hash_password(password).map_err(|_| DirectoryError::PasswordHash)?,
            });
        }

        Self::new(customers)
    }

    /// Load a customer file.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Io` if the file cannot be read, or a parse
    /// error.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let source = std::fs::read_to_string(path).map_err(|source| DirectoryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&source)
    }

    /// The built-in demo customers.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::PasswordHash` if hashing fails.
    pub fn builtin() -> Result<Self, DirectoryError> {
        Self::parse(BUILTIN_CUSTOMERS)
    }

    /// Look up a customer by (normalized) email.
    #[must_use]
    pub fn get_by_email(&self, email: &Email) -> Option<&Customer> {
        self.customers.get(email)
    }

    /// Hash to verify against when no customer matches.
    #[must_use]
    pub fn dummy_hash(&self) -> &str {
        &self.dummy_hash
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

impl std::fmt::Debug for CustomerDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerDirectory")
            .field("customers", &self.customers.len())
            .finish_non_exhaustive()
    }
}

const BUILTIN_CUSTOMERS: &str = "\
Mel|Melitas|mel@ubermelon.com|melon-patch-42
Casaba|Jones|casaba@ubermelon.com|rind-and-seed-7
Honey|Dew|honey@ubermelon.com|green-flesh-19
";

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[test]
    fn test_builtin_customers() {
        let directory = CustomerDirectory::builtin().unwrap();
        assert_eq!(directory.len(), 3);

        let mel = directory.get_by_email(&email("mel@ubermelon.com")).unwrap();
        assert_eq!(mel.first_name, "Mel");
        assert!(mel.password_hash.starts_with("$argon2"));
        assert_ne!(mel.password_hash, "melon-patch-42");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let directory = CustomerDirectory::parse("Mel|M|Mel@Ubermelon.com|pw").unwrap();
        assert!(directory.get_by_email(&email("MEL@ubermelon.COM")).is_some());
        assert!(directory.get_by_email(&email("other@ubermelon.com")).is_none());
    }

    #[test]
    fn test_parse_errors_name_line() {
        let err = CustomerDirectory::parse("# c\nMel|mel@ubermelon.com|pw").unwrap_err();
        assert!(matches!(err, DirectoryError::FieldCount { line: 2, found: 3 }));

        let err = CustomerDirectory::parse("Mel|M|not-an-email|pw").unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidEmail { line: 1, .. }));

        let err = CustomerDirectory::parse("Mel|M|mel@ubermelon.com|").unwrap_err();
        assert!(matches!(err, DirectoryError::EmptyPassword { line: 1 }));
    }

    #[test]
    fn test_parse_rejects_duplicate_emails() {
        let source = "Mel|M|mel@ubermelon.com|a\n\nMel|M|MEL@ubermelon.com|b";
        let err = CustomerDirectory::parse(source).unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 3: duplicate customer email mel@ubermelon.com"
        );
        assert!(matches!(err, DirectoryError::DuplicateEmail { line: 3, .. }));
    }

    #[test]
    fn test_debug_hides_customers() {
        let directory = CustomerDirectory::parse("Mel|M|mel@ubermelon.com|pw").unwrap();
        let debug_output = format!("{directory:?}");
        assert!(!debug_output.contains("argon2"));
        assert!(!debug_output.contains("mel@ubermelon.com"));
    }
}
