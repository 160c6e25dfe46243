//! Core domain types for the element grid.

use std::collections::BTreeMap;

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Unique key of an element (its atomic number).
pub type AtomicNumber = u32;

/// Row holding the lanthanide overflow series.
pub const LANTHANIDE_ROW: i32 = 9;

/// Row holding the actinide overflow series.
pub const ACTINIDE_ROW: i32 = 10;

/// First column used by the overflow series rows.
pub const OVERFLOW_FIRST_COL: i32 = 4;

/// A cell coordinate on the periodic-table grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, new)]
pub struct GridPosition {
    /// Grid row (period, or 9/10 for the overflow series).
    pub row: i32,
    /// Grid column (group).
    pub col: i32,
}

impl GridPosition {
    /// Manhattan distance between two cells.
    pub fn manhattan_distance(self, other: GridPosition) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// A chemical element placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, new)]
pub struct Element {
    atomic_number: AtomicNumber,
    symbol: String,
    primary_name: String,
    local_name: Option<String>,
    row: i32,
    col: i32,
}

impl Element {
    /// Returns the grid cell the element occupies.
    pub fn position(&self) -> GridPosition {
        GridPosition::new(self.row, self.col)
    }

    /// Name shown to the player: the local name when present.
    pub fn display_name(&self) -> &str {
        self.local_name.as_deref().unwrap_or(&self.primary_name)
    }

    /// Every string a guess may match: symbol, primary name, local name.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        [Some(self.symbol.as_str()), Some(self.primary_name.as_str()), self.local_name.as_deref()]
            .into_iter()
            .flatten()
    }

    /// Whether this element sits in the lanthanide or actinide row.
    pub fn is_overflow_series(&self) -> bool {
        self.row == LANTHANIDE_ROW || self.row == ACTINIDE_ROW
    }
}

/// Elements uncovered in a session, unique by atomic number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RevealedSet {
    elements: BTreeMap<AtomicNumber, Element>,
}

impl RevealedSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an element. Returns `false` if it was already revealed.
    pub fn insert(&mut self, element: Element) -> bool {
        if self.elements.contains_key(element.atomic_number()) {
            return false;
        }
        self.elements.insert(*element.atomic_number(), element);
        true
    }

    /// Checks membership by atomic number.
    pub fn contains(&self, atomic_number: AtomicNumber) -> bool {
        self.elements.contains_key(&atomic_number)
    }

    /// Looks up a revealed element.
    pub fn get(&self, atomic_number: AtomicNumber) -> Option<&Element> {
        self.elements.get(&atomic_number)
    }

    /// Number of revealed elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing is revealed.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates revealed elements in atomic-number order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Atomic numbers of the revealed elements, ascending.
    pub fn atomic_numbers(&self) -> impl Iterator<Item = AtomicNumber> + '_ {
        self.elements.keys().copied()
    }
}

impl FromIterator<Element> for RevealedSet {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut set = Self::new();
        for element in iter {
            set.insert(element);
        }
        set
    }
}
