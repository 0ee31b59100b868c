//! `.sut` container encoding: byte primitives up through the full
//! database builder (C1-C10 of the design).

pub mod builder;
pub mod bytes;
pub mod effector;
pub mod layer;
pub mod material;
pub mod pattern_array;
pub mod schema;
pub mod tar;
pub mod uuidgen;

pub use builder::SutBuilder;
