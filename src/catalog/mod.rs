//! Name catalogs mapping gene, allele, and group names to ordinal ids.
//!
//! Catalogs are built once when a genome type is loaded and are read-only
//! afterwards. All lookups by name fail with a [`LookupError`] so that
//! content-authoring mistakes surface immediately.

mod errors;
mod groups;
mod names;

pub use errors::LookupError;
pub use groups::GeneGroupMap;
pub use names::GeneMap;
