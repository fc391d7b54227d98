//! Domain error types.
//!
//! These errors represent validation failures on caller-supplied values.
//! They are distinct from upstream/IO errors and surface as bad requests.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A radius query was made without any fuel types
    #[error("at least one fuel type is required")]
    EmptyFuelTypes,

    /// Fuel type mnemonic is empty or malformed
    #[error("invalid fuel type: {0:?}")]
    InvalidFuelType(String),

    /// Latitude or longitude out of range
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Radius is negative or not finite
    #[error("invalid radius: {0}")]
    InvalidRadius(f64),
}
