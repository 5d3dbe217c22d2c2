//! Bucketed occupancy index over the world volume.

use std::collections::HashMap;
use terrarium_core::{Cell, FoodId, OrganismId, Vec3};

/// What occupies a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Organism(OrganismId),
    Food(FoodId),
}

/// Mapping from discretized cell coordinates to the entities occupying them.
///
/// Rebuilt fully every tick rather than maintained incrementally; collision
/// resolution between the kinds sharing a cell is the caller's concern.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<Cell, Vec<EntityRef>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Bucket containing a world position.
    pub fn cell_for(&self, pos: Vec3) -> Cell {
        Cell::containing(pos, self.cell_size)
    }

    /// Clear and repopulate from current entity positions, O(n).
    pub fn rebuild<O, F>(&mut self, organisms: O, food: F)
    where
        O: IntoIterator<Item = (OrganismId, Vec3)>,
        F: IntoIterator<Item = (FoodId, Vec3)>,
    {
        self.cells.clear();
        for (id, pos) in organisms {
            let cell = self.cell_for(pos);
            self.cells.entry(cell).or_default().push(EntityRef::Organism(id));
        }
        for (id, pos) in food {
            let cell = self.cell_for(pos);
            self.cells.entry(cell).or_default().push(EntityRef::Food(id));
        }
    }

    /// Entities at a cell; empty slice when nothing is there.
    pub fn occupants(&self, cell: Cell) -> &[EntityRef] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        !self.occupants(cell).is_empty()
    }

    /// Whether a cell holds an organism other than `excluding`.
    ///
    /// Food does not block movement; entering a food cell is how eating
    /// happens.
    pub fn has_other_organism(&self, cell: Cell, excluding: OrganismId) -> bool {
        self.occupants(cell)
            .iter()
            .any(|e| matches!(e, EntityRef::Organism(id) if *id != excluding))
    }

    /// Total entities across all cells; equals live organisms + live food
    /// right after a rebuild.
    pub fn total_occupants(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }
}
