//! POS Client - store and HTTP client for the POS backend
//!
//! Provides the authenticated HTTP client, the typed backend API, and the
//! client-side store that caches menus, enforces grid placement and builds
//! orders.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod store;

pub use api::{PosApi, RestPosApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient, Tokens};
pub use store::{Fetched, OrderSelection, PosStore, SelectedItem};

// Re-export shared types for convenience
pub use shared::layout::{
    CellContents, CellOccupancy, GridItem, MenuGrid, PlacementError, SeatLayout,
};
pub use shared::models;
