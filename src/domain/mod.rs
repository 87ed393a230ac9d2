// Domain layer - Crop geometry, editor state and core types

pub mod errors;
pub mod geometry;
pub mod model;
pub mod session;
