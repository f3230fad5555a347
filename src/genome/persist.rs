//! Per-individual genome records for attribute storage.
//!
//! A record carries the raw category buffers plus a layout version. Loading
//! zero-extends every buffer to the genome type's current catalog sizes, so
//! adding genes to a species never invalidates saved individuals. Version 0
//! records written before the bitwise category existed are migrated in
//! place.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::genome::buffers::BitBuffer;
use crate::genome::Genome;
use crate::genotype::GenomeType;

/// Current record layout version.
pub const GENOME_RECORD_VERSION: u32 = 1;

/// Legacy layouts stored 32 "diversity" loci followed by 16 "vitality" loci
/// in the anonymous buffer.
const LEGACY_DIVERSITY_GENES: usize = 32;
const LEGACY_VITALITY_GENES: usize = 16;

/// Serializable snapshot of one genome's raw buffers.
///
/// Empty buffers are dropped from the record, except that a heterogametic
/// genome always serializes its yw buffer: its presence is the sex flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenomeRecord {
    #[serde(default)]
    pub version: u32,
    #[serde(default = "default_ploidy")]
    pub ploidy: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autosomal: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitwise: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xz: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yw: Option<Vec<u8>>,
}

fn default_ploidy() -> usize {
    2
}

impl Genome {
    /// Snapshot this genome into a storable record.
    pub fn to_record(&self) -> GenomeRecord {
        GenomeRecord {
            version: GENOME_RECORD_VERSION,
            ploidy: self.ploidy(),
            autosomal: non_empty(self.autosomal().as_bytes()),
            anonymous: non_empty(self.anonymous().as_bytes()),
            bitwise: non_empty(self.bitwise().as_bytes()),
            xz: non_empty(self.xz().as_bytes()),
            yw: self.yw().map(|yw| yw.as_bytes().to_vec()),
        }
    }

    /// Rebuild a genome from a stored record, zero-extending buffers to the
    /// type's current catalog sizes and migrating legacy layouts.
    pub fn from_record(genome_type: Arc<GenomeType>, record: GenomeRecord) -> Self {
        let record = migrate(&genome_type, record);
        Genome::from_buffers(
            genome_type,
            record.ploidy,
            record.autosomal.unwrap_or_default(),
            record.anonymous.unwrap_or_default(),
            record.bitwise.unwrap_or_default(),
            record.xz.unwrap_or_default(),
            record.yw,
        )
    }
}

fn non_empty(bytes: &[u8]) -> Option<Vec<u8>> {
    if bytes.is_empty() {
        None
    } else {
        Some(bytes.to_vec())
    }
}

/// Upgrade a version 0 record whose anonymous buffer still carries the old
/// diversity-plus-vitality layout.
///
/// Diversity bytes unpack into the `coi` bitwise group, one byte becoming
/// eight loci per copy; vitality bytes move to the front of the
/// `deleterious` anonymous group. The shape guard keeps genuinely small
/// version 0 records of other species untouched.
fn migrate(genome_type: &GenomeType, record: GenomeRecord) -> GenomeRecord {
    if record.version >= GENOME_RECORD_VERSION {
        return record;
    }
    let ploidy = record.ploidy;
    let legacy_len = ploidy * (LEGACY_DIVERSITY_GENES + LEGACY_VITALITY_GENES);
    let deleterious = genome_type.anonymous().try_range("deleterious");
    let coi = genome_type.bitwise().try_range("coi");
    let fits = record
        .anonymous
        .as_ref()
        .is_some_and(|bytes| bytes.len() == legacy_len)
        && deleterious.len() == LEGACY_VITALITY_GENES
        && coi.len() >= 8 * LEGACY_DIVERSITY_GENES;
    if !fits {
        return GenomeRecord {
            version: GENOME_RECORD_VERSION,
            ..record
        };
    }

    let legacy = record.anonymous.as_deref().unwrap_or_default();

    let mut bitwise = BitBuffer::from_bytes(
        record.bitwise.clone().unwrap_or_default(),
        genome_type.bitwise().gene_count(),
        ploidy,
    );
    for gene in 0..LEGACY_DIVERSITY_GENES {
        for copy in 0..ploidy {
            let byte = legacy[gene * ploidy + copy];
            for bit in 0..8 {
                let locus = coi.start + 8 * gene + bit;
                bitwise.set(locus, copy, (byte >> bit) & 1 == 1);
            }
        }
    }

    let mut anonymous = vec![0u8; ploidy * genome_type.anonymous().gene_count()];
    for gene in 0..LEGACY_VITALITY_GENES {
        for copy in 0..ploidy {
            let target = (deleterious.start + gene) * ploidy + copy;
            anonymous[target] = legacy[(LEGACY_DIVERSITY_GENES + gene) * ploidy + copy];
        }
    }

    GenomeRecord {
        version: GENOME_RECORD_VERSION,
        ploidy,
        autosomal: record.autosomal,
        anonymous: non_empty(&anonymous),
        bitwise: non_empty(bitwise.as_bytes()),
        xz: record.xz,
        yw: record.yw,
    }
}
