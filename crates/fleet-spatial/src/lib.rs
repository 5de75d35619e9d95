//! `fleet-spatial` — distance graph, routing, and matrix loading.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `Location`, `Graph` (dual name/address index)               |
//! | [`router`]  | `Router` trait, `ShortestPaths`, `Reach`, `DijkstraRouter`  |
//! | [`matrix`]  | `load_distance_matrix_csv`, `load_distance_matrix_reader`   |
//! | [`address`] | `normalize_address`                                         |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Location`.             |

pub mod address;
pub mod error;
pub mod matrix;
pub mod network;
pub mod router;


pub use address::normalize_address;
pub use error::{GraphError, GraphResult};
pub use matrix::{load_distance_matrix_csv, load_distance_matrix_reader};
pub use network::{Graph, Location};
pub use router::{DijkstraRouter, Reach, Router, ShortestPaths};
