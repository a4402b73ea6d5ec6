//! Safe SQL builder: identifiers from row descriptors only, values as parameters.

mod builder;
pub mod options;
pub mod params;
pub use builder::*;
pub use options::QueryOptions;
pub use params::*;
