//! Validated, indexed snapshot of the element catalog.

use std::collections::HashMap;

use tracing::{info, instrument};

use crate::{AliasIndex, AtomicNumber, Element, GridPosition, InvariantViolation, NeighborIndex, RevealedSet};

/// The full catalog in its load order, with lookup tables built once.
///
/// Load order matters: daily puzzles index into [`ElementGrid::elements`], so
/// two grids built from the same ordering produce the same daily pair.
#[derive(Debug, Clone)]
pub struct ElementGrid {
    elements: Vec<Element>,
    by_number: HashMap<AtomicNumber, usize>,
    by_position: HashMap<GridPosition, AtomicNumber>,
    aliases: AliasIndex,
    neighbors: NeighborIndex,
}

impl ElementGrid {
    /// Validates the catalog and builds the alias and neighbour tables.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation`] for duplicate atomic numbers, two
    /// elements on one cell, or an alias shared between elements.
    #[instrument(skip_all, fields(elements = elements.len()))]
    pub fn new(elements: Vec<Element>) -> Result<Self, InvariantViolation> {
        let mut by_number = HashMap::with_capacity(elements.len());
        let mut by_position: HashMap<GridPosition, AtomicNumber> = HashMap::with_capacity(elements.len());

        for (idx, element) in elements.iter().enumerate() {
            let number = *element.atomic_number();
            if by_number.insert(number, idx).is_some() {
                return Err(InvariantViolation::DuplicateAtomicNumber(number));
            }
            let position = element.position();
            if let Some(&first) = by_position.get(&position) {
                return Err(InvariantViolation::DuplicatePosition {
                    first,
                    second: number,
                    row: position.row,
                    col: position.col,
                });
            }
            by_position.insert(position, number);
        }

        let aliases = AliasIndex::build(&elements)?;
        let neighbors = NeighborIndex::build(&elements);
        info!(elements = elements.len(), aliases = aliases.len(), "Element grid ready");

        Ok(Self {
            elements,
            by_number,
            by_position,
            aliases,
            neighbors,
        })
    }

    /// All elements in catalog order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at a catalog index.
    pub fn at(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Element by atomic number.
    pub fn get(&self, atomic_number: AtomicNumber) -> Option<&Element> {
        self.by_number
            .get(&atomic_number)
            .and_then(|&idx| self.elements.get(idx))
    }

    /// Element occupying a cell.
    pub fn at_position(&self, position: GridPosition) -> Option<&Element> {
        self.by_position.get(&position).and_then(|&n| self.get(n))
    }

    /// Resolves a guess against symbols, primary names and local names.
    pub fn lookup(&self, guess: &str) -> Option<&Element> {
        self.aliases.lookup(guess).and_then(|n| self.get(n))
    }

    /// Precomputed neighbour lists.
    pub fn neighbors(&self) -> &NeighborIndex {
        &self.neighbors
    }

    /// Connectivity check using the precomputed neighbour lists.
    pub fn reachable(&self, start: &Element, target: &Element, revealed: &RevealedSet) -> bool {
        self.neighbors.reachable(start, target, revealed)
    }
}
