// Domain layer: search query, normalized offers and the ports the engine talks through.

pub mod model;
pub mod ports;
