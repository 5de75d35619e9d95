//! `fleet-dispatch` — loading constraints, the greedy truck loader, and
//! manifest loading.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`constraints`] | `ConstraintSet`, `AddressCorrection`                    |
//! | [`loader`]      | `load_trucks`, `LoadOutcome`                            |
//! | [`records`]     | `load_packages_csv`, `load_packages_reader`             |
//! | [`error`]       | `DispatchError`, `DispatchResult<T>`                    |
//!
//! # Loading tiers (summary)
//!
//! Each loader pass walks the trucks in order and fills each one in three
//! tiers:
//!
//! ```text
//! ① forced     packages pinned to this truck
//! ② grouped    the whole group, only if it fits in one go
//! ③ remainder  earliest deadline first
//! ```
//!
//! Delayed packages are held out of every tier until their availability time.

pub mod constraints;
pub mod error;
pub mod loader;
pub mod records;

#[cfg(test)]
mod tests;

pub use constraints::{AddressCorrection, ConstraintSet};
pub use error::{DispatchError, DispatchResult};
pub use loader::{load_trucks, LoadOutcome};
pub use records::{load_packages_csv, load_packages_reader};
