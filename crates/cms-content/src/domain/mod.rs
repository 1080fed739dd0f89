//! Domain module

pub mod aggregates;
pub mod services;
pub mod value_objects;

pub use aggregates::*;
pub use value_objects::*;
