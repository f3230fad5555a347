//! Trait interpreters: the pluggable layer that turns raw genomes into
//! observable stats.
//!
//! The core never hardcodes what a gene means. Hosts register interpreters
//! by name before any genome type loads, and config assets pick them by
//! name. Unresolved names are fatal at load time, not at use time.

mod polygene;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rand::RngCore;

use crate::catalog::LookupError;
use crate::genome::Genome;
use crate::genotype::AlleleFrequencies;

pub use polygene::PolygeneInterpreter;

/// Interpreted trait values keyed by stat name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Phenotype {
    stats: BTreeMap<String, f32>,
}

impl Phenotype {
    /// Create an empty phenotype.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a named stat, replacing any previous value.
    pub fn set_stat(&mut self, name: impl Into<String>, value: f32) {
        self.stats.insert(name.into(), value);
    }

    /// Read a named stat, if set.
    pub fn stat(&self, name: &str) -> Option<f32> {
        self.stats.get(name).copied()
    }

    /// Iterate over all stats in name order.
    pub fn stats(&self) -> impl Iterator<Item = (&str, f32)> {
        self.stats.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// A pluggable reader of genomes.
///
/// Implementations are stateless and shared across genome types, so they
/// must be `Send + Sync`. Every method except [`GeneInterpreter::interpret`]
/// has a no-op default; interpreters override only the hooks they care
/// about.
pub trait GeneInterpreter: Send + Sync {
    /// Registration name, matched against config `interpreters` lists.
    fn name(&self) -> &str;

    /// Adjust a freshly conceived genome toward a target phenotype.
    ///
    /// Called before mutation when breeding aims at particular traits, e.g.
    /// selecting for a coat color.
    fn match_phenotype(&self, _genome: &mut Genome, _target: &Phenotype) {}

    /// Post-process a freshly sampled founder genome.
    ///
    /// Runs after frequency-based sampling and may rewrite loci, e.g. to
    /// bound the starting load of deleterious mutations.
    fn finalize_spawn(
        &self,
        _genome: &mut Genome,
        _frequencies: &AlleleFrequencies,
        _rng: &mut dyn RngCore,
    ) {
    }

    /// Whether this genome is nonviable before birth.
    fn is_embryonic_lethal(&self, _genome: &Genome) -> bool {
        false
    }

    /// Read the genome into stats on the phenotype.
    fn interpret(&self, genome: &Genome, phenotype: &mut Phenotype);
}

/// Name-keyed registry of interpreters, populated by hosts during startup.
#[derive(Default)]
pub struct InterpreterRegistry {
    interpreters: HashMap<String, Arc<dyn GeneInterpreter>>,
}

impl InterpreterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry preloaded with the built-in interpreters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PolygeneInterpreter::default()));
        registry
    }

    /// Register an interpreter under its own name, replacing any previous
    /// registration of that name.
    pub fn register(&mut self, interpreter: Arc<dyn GeneInterpreter>) {
        self.interpreters
            .insert(interpreter.name().to_string(), interpreter);
    }

    /// Resolve a registered interpreter by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn GeneInterpreter>, LookupError> {
        self.interpreters
            .get(name)
            .cloned()
            .ok_or_else(|| LookupError::Interpreter {
                name: name.to_string(),
            })
    }

    /// Number of registered interpreters.
    pub fn len(&self) -> usize {
        self.interpreters.len()
    }

    /// Check if no interpreters are registered.
    pub fn is_empty(&self) -> bool {
        self.interpreters.is_empty()
    }
}
