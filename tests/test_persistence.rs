//! Integration tests for genome records: round trips through JSON files,
//! catalog growth, and legacy layout migration.

use std::fs;
use std::sync::Arc;

use heredity::genome::{Genome, GenomeRecord, GENOME_RECORD_VERSION};
use heredity::genotype::GenomeType;
use heredity::interpret::InterpreterRegistry;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

const SPECIES: &str = r#"{
    "genes": {
        "autosomal": [ { "extension": ["wildtype", "black", "red"] } ],
        "xz": [ { "xlinked1": ["a", "b"] } ],
        "yw": [ { "ylinked1": ["a", "b"] } ],
        "anonymous": [ { "deleterious": 16 } ],
        "bitwise": [ { "coi": 256 } ]
    }
}"#;

const GROWN_SPECIES: &str = r#"{
    "genes": {
        "autosomal": [
            { "extension": ["wildtype", "black", "red"] },
            { "agouti": ["wildtype", "tan"] }
        ],
        "xz": [ { "xlinked1": ["a", "b"] } ],
        "yw": [ { "ylinked1": ["a", "b"] } ],
        "anonymous": [ { "deleterious": 16 }, { "markers": 8 } ],
        "bitwise": [ { "coi": 256 }, { "vigor": 32 } ]
    }
}"#;

fn load(name: &str, json: &str) -> Arc<GenomeType> {
    Arc::new(GenomeType::from_json(name, json, &InterpreterRegistry::with_defaults()).unwrap())
}

#[test]
fn test_record_survives_a_file_round_trip() {
    let ty = load("species", SPECIES);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(12345);
    let genome = Genome::sample(Arc::clone(&ty), ty.default_frequencies(), true, &mut rng);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("individual.json");
    fs::write(&path, serde_json::to_vec(&genome.to_record()).unwrap()).unwrap();

    let record: GenomeRecord = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(record.version, GENOME_RECORD_VERSION);
    let restored = Genome::from_record(Arc::clone(&ty), record);
    assert_eq!(restored, genome);
    assert!(restored.is_heterogametic());
}

#[test]
fn test_catalog_growth_zero_extends_saved_individuals() {
    let old = load("species", SPECIES);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
    let mut genome = Genome::sample(Arc::clone(&old), old.default_frequencies(), false, &mut rng);
    genome.set_homozygous("extension", "red").unwrap();
    let record = genome.to_record();

    let new = load("species", GROWN_SPECIES);
    let migrated = Genome::from_record(Arc::clone(&new), record);
    // Existing data keeps its position, new loci read as zero.
    assert!(migrated.has_only_alleles_named("extension", &["red"]).unwrap());
    assert!(migrated.has_only_alleles_named("agouti", &["wildtype"]).unwrap());
    assert_eq!(migrated.bitwise_sum("vigor"), 0);
    assert_eq!(migrated.anonymous().as_bytes().len(), 48);
}

#[test]
fn test_missing_buffers_read_as_zeroed() {
    let ty = load("species", SPECIES);
    let record = GenomeRecord {
        version: GENOME_RECORD_VERSION,
        ploidy: 2,
        ..Default::default()
    };
    let genome = Genome::from_record(Arc::clone(&ty), record);
    assert!(genome.is_homogametic());
    assert!(genome.has_only_alleles_named("extension", &["wildtype"]).unwrap());
    assert_eq!(genome.bitwise_sum("coi"), 0);
}

#[test]
fn test_legacy_record_migrates_once() {
    let ty = load("species", SPECIES);
    // Old layout: 32 diversity bytes then 16 vitality bytes, two copies each.
    let mut legacy = vec![0u8; 96];
    legacy[0] = 0b1111_0000;
    legacy[(32 + 7) * 2] = 3;
    legacy[(32 + 7) * 2 + 1] = 3;
    let record = GenomeRecord {
        version: 0,
        ploidy: 2,
        anonymous: Some(legacy),
        ..Default::default()
    };

    let genome = Genome::from_record(Arc::clone(&ty), record);
    // Diversity byte 0 unpacked into the first eight coi loci of copy 0.
    assert_eq!(genome.bitwise_sum("coi"), 4);
    for bit in 4..8 {
        assert!(genome.bitwise().get(bit, 0));
    }
    // Vitality moved into the deleterious range.
    assert_eq!(genome.anonymous().row(7), &[3, 3]);

    let reloaded = Genome::from_record(Arc::clone(&ty), genome.to_record());
    assert_eq!(reloaded, genome);
}
