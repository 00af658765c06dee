//! Melon identifiers.
//!
//! Catalog entries are keyed by a short string code (e.g. `cran` for the
//! Crenshaw). The code appears in URLs (`/melon/cran`) and as a key in the
//! session-stored cart, so it is restricted to a URL- and file-safe alphabet.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`MelonId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MelonIdError {
    /// The input string is empty.
    #[error("melon id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("melon id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9_-]`.
    #[error("melon id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Identifier of a melon in the catalog.
///
/// ## Constraints
///
/// - Length: 1-32 characters
/// - Characters: lowercase ASCII letters, digits, `-` and `_`
///
/// ## Examples
///
/// ```
/// use ubermelon_core::MelonId;
///
/// assert!(MelonId::parse("cran").is_ok());
/// assert!(MelonId::parse("sugar-baby").is_ok());
///
/// assert!(MelonId::parse("").is_err());
/// assert!(MelonId::parse("Cran").is_err());
/// assert!(MelonId::parse("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MelonId(String);

impl MelonId {
    /// Maximum length of a melon id.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `MelonId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than
    /// [`MelonId::MAX_LENGTH`], or contains characters outside `[a-z0-9_-]`.
    pub fn parse(s: &str) -> Result<Self, MelonIdError> {
        if s.is_empty() {
            return Err(MelonIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(MelonIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_'))
        {
            return Err(MelonIdError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MelonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for MelonId {
    type Err = MelonIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MelonId {
    type Error = MelonIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MelonId> for String {
    fn from(id: MelonId) -> Self {
        id.0
    }
}

impl AsRef<str> for MelonId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
