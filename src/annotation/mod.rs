mod path;
mod satellite;

pub use path::AnnotatedPath;
pub use satellite::{Satellite, SatelliteKind};
