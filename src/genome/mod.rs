//! Genome data model: raw buffers, meiosis and fertilization, mutation, and
//! attribute-storage records.

mod buffers;
#[allow(clippy::module_inception)]
mod genome;
mod persist;

pub use buffers::{BitBuffer, ByteMatrix};
pub use genome::{Genome, GenomeError};
pub use persist::{GenomeRecord, GENOME_RECORD_VERSION};
