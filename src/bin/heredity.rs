//! Heredity CLI - inspect genome type configs and exercise the engine.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use heredity::genome::Genome;
use heredity::genotype::{Climate, GenomeType, GenomeTypeStore};
use heredity::interpret::{InterpreterRegistry, Phenotype};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Heredity - per-individual genetics engine
#[derive(Parser, Debug)]
#[command(name = "heredity")]
#[command(author, version, about = "Per-individual genetics engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate every genome type config in a directory
    Validate {
        /// Directory of .json genome type assets
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Sample a founder genome from a config
    Sample {
        /// Genome type config file
        #[arg(short, long)]
        config: PathBuf,

        /// Initializer to sample from (default frequencies if omitted)
        #[arg(short, long)]
        initializer: Option<String>,

        /// Sample a heterogametic individual
        #[arg(long)]
        heterogametic: bool,

        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Breed two sampled parents and print the offspring
    Inherit {
        /// Genome type config file
        #[arg(short, long)]
        config: PathBuf,

        /// Per-locus mutation rate applied to the offspring
        #[arg(short, long, default_value = "0.0")]
        mutation_rate: f64,

        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { dir } => {
            validate_configs(&dir)?;
        }
        Commands::Sample {
            config,
            initializer,
            heterogametic,
            seed,
        } => {
            sample_genome(&config, initializer.as_deref(), heterogametic, seed)?;
        }
        Commands::Inherit {
            config,
            mutation_rate,
            seed,
        } => {
            inherit_genomes(&config, mutation_rate, seed)?;
        }
    }

    Ok(())
}

fn load_type(path: &Path) -> Result<Arc<GenomeType>> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .context("Config path has no usable file name")?
        .to_string();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let registry = InterpreterRegistry::with_defaults();
    let mut store = GenomeTypeStore::new();
    let genome_type = store
        .load_str(name, &json, &registry)
        .with_context(|| format!("Failed to parse genome type {}", path.display()))?;
    Ok(genome_type)
}

/// One bad asset must not hide problems in the others, so every file is
/// checked and failures are tallied.
fn validate_configs(dir: &Path) -> Result<()> {
    let registry = InterpreterRegistry::with_defaults();
    let mut store = GenomeTypeStore::new();
    let mut checked = 0usize;
    let mut failed = 0usize;

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let name = match path.file_stem().and_then(|s| s.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        checked += 1;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to read {}: {e}", path.display());
                failed += 1;
                continue;
            }
        };
        match store.load_str(name.clone(), &json, &registry) {
            Ok(genome_type) => {
                println!(
                    "{name}: ok ({} autosomal, {} xz, {} yw, {} anonymous, {} bitwise, \
                     {} initializers)",
                    genome_type.autosomal().gene_count(),
                    genome_type.xz().gene_count(),
                    genome_type.yw().gene_count(),
                    genome_type.anonymous().gene_count(),
                    genome_type.bitwise().gene_count(),
                    genome_type.initializers().len(),
                );
            }
            Err(e) => {
                log::error!("{name}: {e}");
                failed += 1;
            }
        }
    }

    println!("Checked {checked} config(s), {failed} failed");
    if failed > 0 {
        bail!("{failed} genome type config(s) failed validation");
    }
    Ok(())
}

fn sample_genome(
    config: &Path,
    initializer: Option<&str>,
    heterogametic: bool,
    seed: u64,
) -> Result<()> {
    let genome_type = load_type(config)?;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let frequencies = match initializer {
        Some(name) => genome_type.initializer(name)?.frequencies().clone(),
        None => {
            let chosen = genome_type.choose_initializer(&[], &Climate::default(), 0.5, &mut rng)?;
            chosen
                .map(|ini| ini.frequencies().clone())
                .unwrap_or_else(|| genome_type.default_frequencies().clone())
        }
    };

    let mut genome = Genome::sample(
        Arc::clone(&genome_type),
        &frequencies,
        heterogametic,
        &mut rng,
    );
    for interpreter in genome_type.interpreters() {
        interpreter.finalize_spawn(&mut genome, &frequencies, &mut rng);
    }

    println!("{genome}");
    print_phenotype(&genome);
    let record = serde_json::to_string_pretty(&genome.to_record())?;
    println!("{record}");
    Ok(())
}

fn inherit_genomes(config: &Path, mutation_rate: f64, seed: u64) -> Result<()> {
    let genome_type = load_type(config)?;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let frequencies = genome_type.default_frequencies();

    let mother = Genome::sample(Arc::clone(&genome_type), frequencies, false, &mut rng);
    let father = Genome::sample(Arc::clone(&genome_type), frequencies, true, &mut rng);

    for (label, heterogametic) in [("daughter", false), ("son", true)] {
        let mut child = Genome::inherit(&mother, &father, heterogametic, &mut rng)?;
        if mutation_rate > 0.0 {
            child.mutate(mutation_rate, &mut rng);
        }
        println!("{label}: {child}");
        if child.is_embryonic_lethal() {
            println!("{label}: embryonic lethal");
        }
        print_phenotype(&child);
    }
    Ok(())
}

fn print_phenotype(genome: &Genome) {
    let mut phenotype = Phenotype::new();
    for interpreter in genome.genome_type().interpreters() {
        interpreter.interpret(genome, &mut phenotype);
    }
    for (name, value) in phenotype.stats() {
        println!("  {name} = {value}");
    }
}
