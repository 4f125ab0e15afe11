// Domain layer: models and ports. Policy lives in `core`.

pub mod model;
pub mod ports;
