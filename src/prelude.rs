//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use heredity::prelude::*;
//!
//! let registry = InterpreterRegistry::with_defaults();
//! let mut store = GenomeTypeStore::new();
//! store.load_str("goat", "{}", &registry).unwrap();
//! ```

pub use crate::catalog::{GeneGroupMap, GeneMap, LookupError};
pub use crate::genome::{
    BitBuffer, ByteMatrix, Genome, GenomeError, GenomeRecord, GENOME_RECORD_VERSION,
};
pub use crate::genotype::{
    AlleleFrequencies, Climate, GenomeType, GenomeTypeStore, GenomeTypeWire, Initializer,
    SexDetermination, SpawnConditions,
};
pub use crate::genotype::config::ConfigError;
pub use crate::interpret::{
    GeneInterpreter, InterpreterRegistry, Phenotype, PolygeneInterpreter,
};
