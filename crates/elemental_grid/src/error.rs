//! Error types for catalog validation and session creation.

use derive_more::{Display, Error};

use crate::AtomicNumber;

/// Catalog data that breaks a structural guarantee of the grid.
///
/// These are programming or data errors; the engine never runs on a catalog
/// that fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum InvariantViolation {
    /// Two catalog rows share an atomic number.
    #[display("Duplicate atomic number {}", _0)]
    DuplicateAtomicNumber(AtomicNumber),

    /// Two elements occupy the same grid cell.
    #[display("Elements {} and {} share grid cell ({}, {})", first, second, row, col)]
    DuplicatePosition {
        /// Element already placed at the cell.
        first: AtomicNumber,
        /// Element that collided with it.
        second: AtomicNumber,
        /// Grid row.
        row: i32,
        /// Grid column.
        col: i32,
    },

    /// A normalized name or symbol resolves to two different elements.
    #[display("Alias '{}' matches both element {} and element {}", alias, first, second)]
    AliasCollision {
        /// The normalized alias.
        alias: String,
        /// Element that claimed the alias first.
        first: AtomicNumber,
        /// Element that collided with it.
        second: AtomicNumber,
    },
}

impl std::error::Error for InvariantViolation {}

/// Fewer than two elements are available to build a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("insufficient data: {} element(s) available, at least 2 required", count)]
pub struct InsufficientCatalog {
    /// Number of elements the catalog holds.
    pub count: usize,
}
