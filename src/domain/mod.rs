// Domain layer: entities, declared schemas and ports. No I/O happens here.

pub mod model;
pub mod ports;
pub mod schema;
