// src/types/mod.rs
pub mod bounds;
pub mod shape;

pub use bounds::*;
pub use shape::*;

// Einheitliche Typen für das gesamte Crate
pub type Coordinate = geo::Coord<f64>;
