//! Heredity: a per-individual genetic simulation engine.
//!
//! This library models a creature's genome across several inheritance
//! mechanisms (autosomal genes, anonymous markers, packed two-state loci,
//! and sex-linked chromosomes), samples new genomes from configurable
//! population allele frequencies, performs meiosis and fertilization, applies
//! mutation, and lets pluggable interpreters turn genomes into phenotype
//! stats and viability decisions.

pub mod catalog;
pub mod genome;
pub mod genotype;
pub mod interpret;

pub mod prelude;

// Re-export commonly used types for convenient external access.
//
// These types form the public, stable surface that most consumers of the
// library will use when wiring genetics into a host simulation. Re-exporting
// them here makes them available as `heredity::Genome`, `heredity::GenomeType`,
// etc.
pub use genome::{Genome, GenomeError, GenomeRecord};
pub use genotype::{AlleleFrequencies, GenomeType, GenomeTypeStore};
pub use interpret::{GeneInterpreter, InterpreterRegistry, Phenotype};
