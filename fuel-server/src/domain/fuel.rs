//! Fuel type mnemonics and query filters.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A fuel type mnemonic such as `E10`, `U91` or `DL`.
///
/// The set of mnemonics is open-ended; the only guarantees are that the
/// value is non-empty, has no surrounding whitespace and is upper-case.
/// Client input is held to a stricter form (no inner whitespace or commas,
/// see [`FuelType::parse_normalized`]); upstream values only need to be
/// non-empty.
///
/// # Examples
///
/// ```
/// use fuel_server::domain::FuelType;
///
/// let e10 = FuelType::parse_normalized(" e10 ").unwrap();
/// assert_eq!(e10.as_str(), "E10");
///
/// assert!(FuelType::parse_normalized("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FuelType(String);

impl FuelType {
    /// Parse a client-supplied mnemonic, trimming whitespace and
    /// upper-casing it. Inner whitespace and commas are rejected.
    pub fn parse_normalized(s: &str) -> Result<Self, DomainError> {
        let fuel_type = Self::from_upstream(s)?;
        if fuel_type.0.chars().any(|c| c.is_whitespace() || c == ',') {
            return Err(DomainError::InvalidFuelType(s.to_string()));
        }
        Ok(fuel_type)
    }

    /// Accept a mnemonic as sent by FuelCheck: trimmed and upper-cased,
    /// rejected only when empty.
    pub fn from_upstream(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidFuelType(s.to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FuelType({})", self.0)
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FuelType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_upstream(&value)
    }
}

impl From<FuelType> for String {
    fn from(value: FuelType) -> Self {
        value.0
    }
}

/// A non-empty, ordered, duplicate-free set of requested fuel types.
///
/// The first element is the primary fuel type: radius queries sort by its
/// price. Duplicates are dropped keeping the first occurrence, so the
/// caller's priority order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuelTypeFilter {
    types: Vec<FuelType>,
}

impl FuelTypeFilter {
    /// Build a filter from an ordered list of fuel types.
    ///
    /// Returns [`DomainError::EmptyFuelTypes`] if the list is empty.
    pub fn new(types: impl IntoIterator<Item = FuelType>) -> Result<Self, DomainError> {
        let mut unique: Vec<FuelType> = Vec::new();
        for fuel_type in types {
            if !unique.contains(&fuel_type) {
                unique.push(fuel_type);
            }
        }

        if unique.is_empty() {
            return Err(DomainError::EmptyFuelTypes);
        }

        Ok(Self { types: unique })
    }

    /// Parse a comma-separated list such as `"E10,U91"`.
    ///
    /// Empty items (e.g. a trailing comma) are ignored.
    pub fn parse_list(s: &str) -> Result<Self, DomainError> {
        let types = s
            .split(',')
            .filter(|item| !item.trim().is_empty())
            .map(FuelType::parse_normalized)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(types)
    }

    /// The primary (sort-key) fuel type.
    pub fn primary(&self) -> &FuelType {
        &self.types[0]
    }

    pub fn contains(&self, fuel_type: &FuelType) -> bool {
        self.types.contains(fuel_type)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the filter holds no fuel types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FuelType> {
        self.types.iter()
    }
}
