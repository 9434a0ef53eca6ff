//! Grid layout rules
//!
//! - [`grid`]: menu grid cells (one FULL item or up to two HALF items per cell)
//! - [`seat`]: fixed 11 x 6 seat layout for places

pub mod grid;
pub mod seat;

use thiserror::Error;

use crate::models::GridCell;

pub use grid::{CellContents, CellOccupancy, GridItem, MenuGrid, check_placement, occupancy};
pub use seat::{SEAT_CAPACITY, SEAT_COLUMNS, SEAT_ROWS, SeatLayout, slot_index};

/// Reasons a placement is rejected before any backend call is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("Cell {cell} is occupied by a FULL item")]
    CellHasFull { cell: GridCell },

    #[error("Cell {cell} already holds two HALF items")]
    CellFull { cell: GridCell },

    #[error("Cannot place a FULL item in cell {cell}, it already holds a HALF item")]
    FullOnHalf { cell: GridCell },

    #[error("Seat slot {cell} is outside the 11x6 layout")]
    SlotOutOfRange { cell: GridCell },

    #[error("Seat slot {slot} is taken by place {place_id}")]
    SlotTaken { slot: usize, place_id: i64 },
}
