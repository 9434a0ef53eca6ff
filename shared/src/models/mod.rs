//! Data models
//!
//! Wire types exchanged with the POS backend. All ids are `i64`,
//! all prices are integer currency units, field names are camelCase.

pub mod category;
pub mod menu;
pub mod order;
pub mod payment;
pub mod place;

// Re-exports
pub use category::*;
pub use menu::*;
pub use order::*;
pub use payment::*;
pub use place::*;
