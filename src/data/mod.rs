//! Dataset storage, CSV I/O, splitting and synthetic generation

pub mod csv;
pub mod dataset;
pub mod split;
pub mod synthetic;

pub use self::csv::*;
pub use self::dataset::*;
pub use self::split::*;
pub use self::synthetic::*;
