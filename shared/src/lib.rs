//! Shared types for the POS client
//!
//! Wire models exchanged with the backend and the grid layout rules
//! (menu cells and the fixed seat layout) used by the client store.

pub mod layout;
pub mod models;

// Re-exports
pub use layout::PlacementError;
pub use serde::{Deserialize, Serialize};
