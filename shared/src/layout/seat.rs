//! Fixed seat layout
//!
//! Places live in an 11-column by 6-row grid. A place's slot index is
//! `position_y * SEAT_COLUMNS + position_x` and each slot holds one place.

use super::PlacementError;
use crate::models::{GridCell, Place};

pub const SEAT_COLUMNS: u32 = 11;
pub const SEAT_ROWS: u32 = 6;
pub const SEAT_CAPACITY: usize = (SEAT_COLUMNS * SEAT_ROWS) as usize;

/// Slot index of `cell`, rejecting cells outside the layout
pub fn slot_index(cell: GridCell) -> Result<usize, PlacementError> {
    if cell.x >= SEAT_COLUMNS || cell.y >= SEAT_ROWS {
        return Err(PlacementError::SlotOutOfRange { cell });
    }
    Ok((cell.y * SEAT_COLUMNS + cell.x) as usize)
}

/// Fixed-capacity seat layout
#[derive(Debug, Clone, PartialEq)]
pub struct SeatLayout {
    slots: Vec<Option<Place>>,
}

impl Default for SeatLayout {
    fn default() -> Self {
        Self {
            slots: vec![None; SEAT_CAPACITY],
        }
    }
}

impl SeatLayout {
    /// Build the layout from the backend's place list.
    ///
    /// Places outside the grid, or on a slot that is already taken, are
    /// dropped with a warning.
    pub fn from_places(places: impl IntoIterator<Item = Place>) -> Self {
        let mut layout = Self::default();
        for place in places {
            let slot = match slot_index(place.cell()) {
                Ok(slot) => slot,
                Err(e) => {
                    tracing::warn!(place_id = place.place_id, "Skipping place: {}", e);
                    continue;
                }
            };
            if let Some(existing) = &layout.slots[slot] {
                tracing::warn!(
                    place_id = place.place_id,
                    existing = existing.place_id,
                    slot,
                    "Skipping place on an occupied slot"
                );
                continue;
            }
            layout.slots[slot] = Some(place);
        }
        layout
    }

    pub fn get(&self, slot: usize) -> Option<&Place> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn slots(&self) -> &[Option<Place>] {
        &self.slots
    }

    /// Placed places in slot order
    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.slots.iter().flatten()
    }

    pub fn find(&self, place_id: i64) -> Option<(usize, &Place)> {
        self.slots
            .iter()
            .enumerate()
            .find_map(|(slot, p)| p.as_ref().filter(|p| p.place_id == place_id).map(|p| (slot, p)))
    }

    /// Check that a place may be put on `cell`.
    ///
    /// `exclude` is the place being moved, which may stay on its own slot.
    pub fn check_slot(&self, cell: GridCell, exclude: Option<i64>) -> Result<usize, PlacementError> {
        let slot = slot_index(cell)?;
        match &self.slots[slot] {
            Some(p) if Some(p.place_id) != exclude => Err(PlacementError::SlotTaken {
                slot,
                place_id: p.place_id,
            }),
            _ => Ok(slot),
        }
    }
}
