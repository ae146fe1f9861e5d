//! Inventory domain module.
//!
//! Products, locations and the movements between them, plus the balance engine
//! that derives stock levels from them. Pure deterministic logic (no IO, no HTTP,
//! no storage).

pub mod balance;
pub mod location;
pub mod movement;
pub mod names;
pub mod product;
pub mod token;

pub use balance::{compute_balances, fold_ledger, BalanceRow};
pub use location::{Location, LocationFields};
pub use movement::{
    CheckedMovementRequest, Movement, MovementEdit, MovementFields, MovementRequest,
};
pub use names::{NameBook, NO_LOCATION, UNKNOWN_LOCATION, UNKNOWN_PRODUCT};
pub use product::{Product, ProductFields};
pub use token::Token;
