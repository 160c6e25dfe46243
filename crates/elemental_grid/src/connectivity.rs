//! Connectivity checks between revealed elements.
//!
//! Two elements are adjacent when their grid cells are exactly one step apart
//! horizontally or vertically. A start element reaches a target element when a
//! chain of adjacent revealed elements links them.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{instrument, trace};

use crate::{AtomicNumber, Element, RevealedSet};

/// Checks whether two elements are orthogonal neighbours on the grid.
pub fn is_adjacent(a: &Element, b: &Element) -> bool {
    a.position().manhattan_distance(b.position()) == 1
}

/// Breadth-first search from `start` to `target` through `revealed` only.
///
/// Returns `false` if either endpoint is missing from `revealed`.
#[instrument(skip_all, fields(start = start.atomic_number(), target = target.atomic_number(), revealed = revealed.len()))]
pub fn reachable(start: &Element, target: &Element, revealed: &RevealedSet) -> bool {
    let (start_id, target_id) = (*start.atomic_number(), *target.atomic_number());
    if !revealed.contains(start_id) || !revealed.contains(target_id) {
        return false;
    }

    let mut visited = HashSet::from([start_id]);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        if *current.atomic_number() == target_id {
            trace!(visited = visited.len(), "Target reached");
            return true;
        }
        for candidate in revealed.iter() {
            if !visited.contains(candidate.atomic_number()) && is_adjacent(current, candidate) {
                visited.insert(*candidate.atomic_number());
                queue.push_back(candidate);
            }
        }
    }

    false
}

/// Precomputed neighbour lists for a fixed catalog.
///
/// Gives the same answers as [`reachable`] without rescanning the revealed set
/// for every dequeued element.
#[derive(Debug, Clone, Default)]
pub struct NeighborIndex {
    neighbors: HashMap<AtomicNumber, Vec<AtomicNumber>>,
}

impl NeighborIndex {
    /// Builds neighbour lists for every element of the catalog.
    #[instrument(skip_all, fields(elements = elements.len()))]
    pub fn build(elements: &[Element]) -> Self {
        let mut by_position = HashMap::with_capacity(elements.len());
        for element in elements {
            by_position.insert(element.position(), *element.atomic_number());
        }

        let mut neighbors = HashMap::with_capacity(elements.len());
        for element in elements {
            let here = element.position();
            let around = [(-1, 0), (1, 0), (0, -1), (0, 1)]
                .into_iter()
                .filter_map(|(dr, dc)| {
                    let cell = crate::GridPosition::new(here.row + dr, here.col + dc);
                    by_position.get(&cell).copied()
                })
                .collect::<Vec<_>>();
            neighbors.insert(*element.atomic_number(), around);
        }

        Self { neighbors }
    }

    /// Neighbours of an element, empty for unknown atomic numbers.
    pub fn neighbors_of(&self, atomic_number: AtomicNumber) -> &[AtomicNumber] {
        self.neighbors
            .get(&atomic_number)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Indexed variant of [`reachable`].
    #[instrument(skip_all, fields(start = start.atomic_number(), target = target.atomic_number(), revealed = revealed.len()))]
    pub fn reachable(&self, start: &Element, target: &Element, revealed: &RevealedSet) -> bool {
        let (start_id, target_id) = (*start.atomic_number(), *target.atomic_number());
        if !revealed.contains(start_id) || !revealed.contains(target_id) {
            return false;
        }

        let mut visited = HashSet::from([start_id]);
        let mut queue = VecDeque::from([start_id]);

        while let Some(current) = queue.pop_front() {
            if current == target_id {
                return true;
            }
            for &next in self.neighbors_of(current) {
                if revealed.contains(next) && visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        false
    }
}
