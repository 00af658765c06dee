//! Authentication service.
//!
//! Verifies email and password against the customer directory.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use ubermelon_core::Email;

use crate::models::Customer;
use crate::store::CustomerDirectory;

/// Authentication service.
pub struct AuthService<'a> {
    customers: &'a CustomerDirectory,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(customers: &'a CustomerDirectory) -> Self {
        Self { customers }
    }

    /// Log in with email and password.
    ///
    /// An unknown email and a wrong password fail the same way, and both
    /// run one Argon2 verification.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong.
    pub fn login(&self, email: &str, password: &str) -> Result<&'a Customer, AuthError> {
        let email = Email::parse(email)?;

        let Some(customer) = self.customers.get_by_email(&email) else {
            let _ = verify_password(password, self.customers.dummy_hash());
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &customer.password_hash)?;

        Ok(customer)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Hash a password using Argon2.
pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
