//! Genome types: immutable per-species descriptors.
//!
//! A genome type bundles the five gene catalogs, the sex-determination mode,
//! the interpreters resolved from an explicit registry, and the named
//! initializer presets. Types are loaded once from config assets and are
//! read-only afterwards, safe for unsynchronized concurrent reads.

pub mod config;
mod frequencies;
mod initializer;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{GeneGroupMap, GeneMap, LookupError};
use crate::genotype::config::{ConfigError, GenomeTypeConfig};
use crate::interpret::{GeneInterpreter, InterpreterRegistry};

pub use frequencies::AlleleFrequencies;
pub use initializer::{Climate, Initializer, SpawnConditions};

/// Which sex carries the mismatched chromosome pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SexDetermination {
    /// Males are heterogametic (mammal-style).
    #[default]
    Xy,
    /// Females are heterogametic (bird-style).
    Zw,
}

impl SexDetermination {
    /// Parse a config string (`"xy"` or `"zw"`).
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "xy" => Ok(Self::Xy),
            "zw" => Ok(Self::Zw),
            _ => Err(ConfigError::SexDetermination(s.to_string())),
        }
    }

    /// Whether an individual of the given sex is the heterogametic one.
    #[inline]
    pub fn heterogametic(&self, is_male: bool) -> bool {
        match self {
            Self::Xy => is_male,
            Self::Zw => !is_male,
        }
    }
}

/// Immutable per-species genetic descriptor.
pub struct GenomeType {
    name: String,
    autosomal: GeneMap,
    xz: GeneMap,
    yw: GeneMap,
    anonymous: GeneGroupMap,
    bitwise: GeneGroupMap,
    sex_determination: SexDetermination,
    interpreters: Vec<Arc<dyn GeneInterpreter>>,
    initializers: Vec<Initializer>,
    /// Resolved `(gene id, rate multiplier)` pairs for hypermutable genes.
    hypermutable: Vec<(usize, f64)>,
    default_frequencies: AlleleFrequencies,
}

/// The historical hypermutable default applied when a config omits the
/// `hypermutable` section.
const HYPERMUTABLE_DEFAULT: (&str, f64) = ("KIT", 10.0);

impl GenomeType {
    /// Parse a genome type from a JSON config asset.
    ///
    /// Every interpreter the asset names must already be registered;
    /// an unregistered name is a fatal [`LookupError`].
    pub fn from_json(
        name: impl Into<String>,
        json: &str,
        registry: &InterpreterRegistry,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let config: GenomeTypeConfig = serde_json::from_str(json)?;

        let autosomal = parse_gene_section(&config.genes.autosomal, "autosomal", &name)?;
        let xz = parse_gene_section(&config.genes.xz, "xz", &name)?;
        let yw = parse_gene_section(&config.genes.yw, "yw", &name)?;
        let anonymous = parse_group_section(&config.genes.anonymous, "anonymous", &name)?;
        let bitwise = parse_group_section(&config.genes.bitwise, "bitwise", &name)?;

        let sex_determination = match &config.sexdetermination {
            Some(s) => SexDetermination::parse(s)?,
            None => SexDetermination::default(),
        };

        let mut interpreters = Vec::with_capacity(config.interpreters.len());
        for interpreter_name in &config.interpreters {
            interpreters.push(registry.resolve(interpreter_name)?);
        }

        let mut initializers = Vec::with_capacity(config.initializers.len());
        for (initializer_name, cfg) in &config.initializers {
            let frequencies = AlleleFrequencies::from_config(
                cfg.autosomal.as_ref(),
                cfg.xz_section(),
                cfg.yw.as_ref(),
                cfg.bitwise.as_ref(),
                &autosomal,
                &xz,
                &yw,
                &bitwise,
                &name,
            )?;
            initializers.push(Initializer::new(
                initializer_name.clone(),
                frequencies,
                cfg.conditions.clone(),
            ));
        }

        let hypermutable = match &config.hypermutable {
            Some(map) => {
                let mut resolved = Vec::with_capacity(map.len());
                for (gene_name, multiplier) in map {
                    // Naming an unknown gene here is an authoring mistake.
                    resolved.push((autosomal.gene_id(gene_name)?, *multiplier));
                }
                resolved
            }
            None => autosomal
                .try_gene_id(HYPERMUTABLE_DEFAULT.0)
                .map(|gene| (gene, HYPERMUTABLE_DEFAULT.1))
                .into_iter()
                .collect(),
        };

        let default_frequencies = AlleleFrequencies::empty(&autosomal, &xz, &yw, &bitwise);

        Ok(Self {
            name,
            autosomal,
            xz,
            yw,
            anonymous,
            bitwise,
            sex_determination,
            interpreters,
            initializers,
            hypermutable,
            default_frequencies,
        })
    }

    /// Genome type name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Autosomal gene catalog.
    #[inline]
    pub fn autosomal(&self) -> &GeneMap {
        &self.autosomal
    }

    /// Sex-linked (X or Z) gene catalog.
    #[inline]
    pub fn xz(&self) -> &GeneMap {
        &self.xz
    }

    /// Heterogametic-only (Y or W) gene catalog.
    #[inline]
    pub fn yw(&self) -> &GeneMap {
        &self.yw
    }

    /// Anonymous marker group catalog.
    #[inline]
    pub fn anonymous(&self) -> &GeneGroupMap {
        &self.anonymous
    }

    /// Bitwise trait group catalog.
    #[inline]
    pub fn bitwise(&self) -> &GeneGroupMap {
        &self.bitwise
    }

    /// Sex-determination mode.
    #[inline]
    pub fn sex_determination(&self) -> SexDetermination {
        self.sex_determination
    }

    /// Ordered gene interpreters.
    #[inline]
    pub fn interpreters(&self) -> &[Arc<dyn GeneInterpreter>] {
        &self.interpreters
    }

    /// Mutation rate multiplier for a hypermutable gene, if configured.
    pub fn hypermutable_multiplier(&self, gene: usize) -> Option<f64> {
        self.hypermutable
            .iter()
            .find(|(g, _)| *g == gene)
            .map(|(_, m)| *m)
    }

    /// Look up an initializer by name.
    pub fn initializer(&self, name: &str) -> Result<&Initializer, LookupError> {
        self.initializers
            .iter()
            .find(|ini| ini.name() == name)
            .ok_or_else(|| LookupError::Initializer {
                name: name.to_string(),
            })
    }

    /// All initializers in load order.
    #[inline]
    pub fn initializers(&self) -> &[Initializer] {
        &self.initializers
    }

    /// Pick an initializer valid at the given location.
    ///
    /// An empty `names` slice means every initializer is a candidate.
    /// Candidates failing their spawn conditions are filtered out; if none
    /// survive this returns `Ok(None)`, a normal outcome — callers fall back
    /// to [`GenomeType::default_frequencies`]. Otherwise one survivor is
    /// picked uniformly at random.
    pub fn choose_initializer<R: Rng + ?Sized>(
        &self,
        names: &[&str],
        climate: &Climate,
        elevation: f32,
        rng: &mut R,
    ) -> Result<Option<&Initializer>, LookupError> {
        let mut valid: Vec<&Initializer> = Vec::new();
        if names.is_empty() {
            for ini in &self.initializers {
                if ini.can_spawn_at(climate, elevation) {
                    valid.push(ini);
                }
            }
        } else {
            for name in names {
                let ini = self.initializer(name)?;
                if ini.can_spawn_at(climate, elevation) {
                    valid.push(ini);
                }
            }
        }
        if valid.is_empty() {
            return Ok(None);
        }
        Ok(Some(valid[rng.random_range(0..valid.len())]))
    }

    /// The empty frequency table set: downstream samplers read it as
    /// "allele 0 everywhere, no bits set".
    #[inline]
    pub fn default_frequencies(&self) -> &AlleleFrequencies {
        &self.default_frequencies
    }

    /// Snapshot this type for catalog broadcast.
    ///
    /// Initializers are deliberately not carried: dependent processes never
    /// sample founders.
    pub fn to_wire(&self) -> GenomeTypeWire {
        GenomeTypeWire {
            name: self.name.clone(),
            autosomal: self.autosomal.clone(),
            xz: self.xz.clone(),
            yw: self.yw.clone(),
            anonymous: self.anonymous.clone(),
            bitwise: self.bitwise.clone(),
            sexdetermination: self.sex_determination,
            interpreter_names: self
                .interpreters
                .iter()
                .map(|i| i.name().to_string())
                .collect(),
        }
    }

    /// Rebuild a genome type from a broadcast snapshot, re-resolving
    /// interpreter names against the local registry. An unresolved name is a
    /// fatal receipt-time error.
    pub fn from_wire(
        wire: GenomeTypeWire,
        registry: &InterpreterRegistry,
    ) -> Result<Self, LookupError> {
        let mut interpreters = Vec::with_capacity(wire.interpreter_names.len());
        for name in &wire.interpreter_names {
            interpreters.push(registry.resolve(name)?);
        }
        let hypermutable = wire
            .autosomal
            .try_gene_id(HYPERMUTABLE_DEFAULT.0)
            .map(|gene| (gene, HYPERMUTABLE_DEFAULT.1))
            .into_iter()
            .collect();
        let default_frequencies =
            AlleleFrequencies::empty(&wire.autosomal, &wire.xz, &wire.yw, &wire.bitwise);
        Ok(Self {
            name: wire.name,
            autosomal: wire.autosomal,
            xz: wire.xz,
            yw: wire.yw,
            anonymous: wire.anonymous,
            bitwise: wire.bitwise,
            sex_determination: wire.sexdetermination,
            interpreters,
            initializers: Vec::new(),
            hypermutable,
            default_frequencies,
        })
    }
}

impl fmt::Debug for GenomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenomeType")
            .field("name", &self.name)
            .field("autosomal", &self.autosomal.gene_count())
            .field("xz", &self.xz.gene_count())
            .field("yw", &self.yw.gene_count())
            .field("anonymous", &self.anonymous.gene_count())
            .field("bitwise", &self.bitwise.gene_count())
            .field("sex_determination", &self.sex_determination)
            .field(
                "interpreters",
                &self
                    .interpreters
                    .iter()
                    .map(|i| i.name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn parse_gene_section(
    section: &[std::collections::BTreeMap<String, Vec<String>>],
    section_name: &'static str,
    type_name: &str,
) -> Result<GeneMap, ConfigError> {
    let mut genes = Vec::with_capacity(section.len());
    let mut alleles = Vec::with_capacity(section.len());
    for entry in section {
        if entry.len() != 1 {
            return Err(ConfigError::GeneEntry {
                section: section_name,
                genome_type: type_name.to_string(),
            });
        }
        let (gene, allele_names) = entry.iter().next().expect("len checked");
        genes.push(gene.clone());
        alleles.push(allele_names.clone());
    }
    Ok(GeneMap::from_entries(genes, alleles))
}

fn parse_group_section(
    section: &[std::collections::BTreeMap<String, usize>],
    section_name: &'static str,
    type_name: &str,
) -> Result<GeneGroupMap, ConfigError> {
    let mut groups = Vec::with_capacity(section.len());
    for entry in section {
        if entry.len() != 1 {
            return Err(ConfigError::GeneEntry {
                section: section_name,
                genome_type: type_name.to_string(),
            });
        }
        let (group, count) = entry.iter().next().expect("len checked");
        groups.push((group.clone(), *count));
    }
    Ok(GeneGroupMap::from_groups(groups))
}

/// Serializable catalog snapshot broadcast from the authoritative process to
/// dependents. Carries interpreter names, not implementations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeTypeWire {
    pub name: String,
    pub autosomal: GeneMap,
    pub xz: GeneMap,
    pub yw: GeneMap,
    pub anonymous: GeneGroupMap,
    pub bitwise: GeneGroupMap,
    pub sexdetermination: SexDetermination,
    pub interpreter_names: Vec<String>,
}

/// Explicit store of loaded genome types, keyed by asset name.
///
/// Populated during the initialization phase (after interpreter
/// registration) and read-only afterwards. Passed into the simulation
/// context rather than living in a process global.
#[derive(Debug, Default)]
pub struct GenomeTypeStore {
    types: HashMap<String, Arc<GenomeType>>,
}

impl GenomeTypeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one config asset and install it.
    pub fn load_str(
        &mut self,
        name: impl Into<String>,
        json: &str,
        registry: &InterpreterRegistry,
    ) -> Result<Arc<GenomeType>, ConfigError> {
        let name = name.into();
        let genome_type = Arc::new(GenomeType::from_json(name.clone(), json, registry)?);
        log::debug!(
            "Loaded genome type '{name}' ({} genes, {} initializers)",
            genome_type.autosomal().gene_count()
                + genome_type.xz().gene_count()
                + genome_type.yw().gene_count()
                + genome_type.anonymous().gene_count()
                + genome_type.bitwise().gene_count(),
            genome_type.initializers().len()
        );
        self.types.insert(name, Arc::clone(&genome_type));
        Ok(genome_type)
    }

    /// Install an already-built genome type under its own name.
    pub fn insert(&mut self, genome_type: Arc<GenomeType>) {
        self.types
            .insert(genome_type.name().to_string(), genome_type);
    }

    /// Look up a genome type by name.
    pub fn get(&self, name: &str) -> Result<Arc<GenomeType>, LookupError> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| LookupError::GenomeType {
                name: name.to_string(),
            })
    }

    /// Install a broadcast catalog, re-resolving interpreters locally.
    pub fn apply_catalog(
        &mut self,
        catalog: Vec<GenomeTypeWire>,
        registry: &InterpreterRegistry,
    ) -> Result<(), LookupError> {
        for wire in catalog {
            self.insert(Arc::new(GenomeType::from_wire(wire, registry)?));
        }
        Ok(())
    }

    /// Number of loaded types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if no types are loaded.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
