//! The melon catalog.
//!
//! # File format
//!
//! One melon per line:
//!
//! ```text
//! # id|melon_type|common_name|price|image_url|color|seedless
//! cran|Crenshaw|Crenshaw|9.00||green|false
//! ```
//!
//! `image_url` may be empty. `seedless` accepts `true`/`false`/`1`/`0`
//! (case-insensitive).

use std::collections::{HashMap, HashSet};
use std::path::Path;

use thiserror::Error;
use ubermelon_core::{CurrencyCode, MelonId, MelonIdError, Price, PriceError};

use super::records::records;
use crate::models::Melon;

const FIELD_COUNT: usize = 7;

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected 7 fields, found {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: invalid melon id: {source}")]
    InvalidId {
        line: usize,
        #[source]
        source: MelonIdError,
    },
    #[error("line {line}: {source}")]
    InvalidPrice {
        line: usize,
        #[source]
        source: PriceError,
    },
    #[error("line {line}: invalid seedless flag {value:?}")]
    InvalidSeedless { line: usize, value: String },
    #[error("line {line}: duplicate melon id {id}")]
    DuplicateId { line: usize, id: MelonId },
}

/// Read-only registry of melons, keyed by id.
///
/// Keeps definition order for listings.
#[derive(Debug, Clone)]
pub struct Catalog {
    melons: Vec<Melon>,
    index: HashMap<MelonId, usize>,
    currency: CurrencyCode,
}

impl Catalog {
    /// Build a catalog from melons in display order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two melons share an id; `line`
    /// is the 1-based position of the second one.
    pub fn new(melons: Vec<Melon>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(melons.len());
        for (position, melon) in melons.iter().enumerate() {
            if index.insert(melon.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId {
                    line: position + 1,
                    id: melon.id.clone(),
                });
            }
        }

        Ok(Self {
            melons,
            index,
            currency: CurrencyCode::default(),
        })
    }

    /// Parse a catalog from pipe-delimited text.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` naming the offending line.
    pub fn parse(source: &str) -> Result<Self, CatalogError> {
        let currency = CurrencyCode::default();
        let mut melons = Vec::new();
        let mut seen = HashSet::new();

        for record in records(source) {
            let line = record.line;
            let [id, melon_type, common_name, price, image_url, color, seedless] =
                <[&str; FIELD_COUNT]>::try_from(record.fields.as_slice()).map_err(|_| {
                    CatalogError::FieldCount {
                        line,
                        found: record.fields.len(),
                    }
                })?;

            let id = MelonId::parse(id)
                .map_err(|source| CatalogError::InvalidId { line, source })?;
            if !seen.insert(id.clone()) {
                return Err(CatalogError::DuplicateId { line, id });
            }
            let price = Price::parse(price, currency)
                .map_err(|source| CatalogError::InvalidPrice { line, source })?;
            let seedless = parse_flag(seedless).ok_or_else(|| CatalogError::InvalidSeedless {
                line,
                value: seedless.to_string(),
            })?;

            melons.push(Melon {
                id,
                melon_type: melon_type.to_string(),
                common_name: common_name.to_string(),
                price,
                image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
                color: color.to_string(),
                seedless,
            });
        }

        Self::new(melons)
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, or a parse error.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&source)
    }

    /// The built-in Ubermelon catalog.
    ///
    /// A bad entry in the built-in table is logged and skipped.
    #[must_use]
    pub fn builtin() -> Self {
        let mut melons = Vec::with_capacity(BUILTIN_MELONS.len());
        for &(id, melon_type, common_name, cents, color, seedless) in BUILTIN_MELONS {
            let id = match MelonId::parse(id) {
                Ok(id) => id,
                Err(e) => {
                    tracing::error!(
                        melon_id = id,
                        error = %e,
                        "Invalid built-in melon id, skipping"
                    );
                    continue;
                }
            };
            melons.push(Melon {
                id,
                melon_type: melon_type.to_string(),
                common_name: common_name.to_string(),
                price: Price::from_cents(cents, CurrencyCode::USD),
                image_url: None,
                color: color.to_string(),
                seedless,
            });
        }

        Self::new(melons).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Built-in catalog is inconsistent, serving no melons");
            Self::empty()
        })
    }

    /// A catalog with no melons.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            melons: Vec::new(),
            index: HashMap::new(),
            currency: CurrencyCode::default(),
        }
    }

    /// Every melon, in definition order.
    #[must_use]
    pub fn get_all(&self) -> &[Melon] {
        &self.melons
    }

    /// Look up a melon by id.
    #[must_use]
    pub fn get_by_id(&self, id: &MelonId) -> Option<&Melon> {
        self.index
            .get(id)
            .and_then(|&position| self.melons.get(position))
    }

    #[must_use]
    pub fn contains(&self, id: &MelonId) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.melons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.melons.is_empty()
    }

    /// Currency all catalog prices are quoted in.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// `(id, melon_type, common_name, price_cents, color, seedless)`
const BUILTIN_MELONS: &[(&str, &str, &str, u32, &str, bool)] = &[
    ("apok", "Ananas", "Ananas", 275, "yellow", false),
    ("auri", "Watermelon", "Auria Beauty", 295, "red", false),
    ("cran", "Crenshaw", "Crenshaw", 900, "green", false),
    ("ligh", "Watermelon", "Lightning", 225, "red", true),
    ("mush", "Muskmelon", "Musk", 475, "orange", false),
    ("hybr", "Casaba", "Christmas", 300, "white", false),
    ("sugb", "Watermelon", "Sugar Baby", 250, "red", false),
    ("tomb", "Watermelon", "Tiger Baby", 325, "red", true),
    ("yelw", "Watermelon", "Yellow Doll", 350, "yellow", true),
];
