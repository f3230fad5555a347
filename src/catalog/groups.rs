use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::catalog::LookupError;

/// A name catalog for groups of structurally identical, allele-less loci.
///
/// Used for anonymous marker genes and bitwise two-state traits. Each group
/// occupies a contiguous, half-open index range in its category; group order
/// in the catalog defines the ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneGroupMap {
    groups: Vec<(String, usize)>,
}

impl GeneGroupMap {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from ordered `(name, locus count)` groups.
    pub fn from_groups(groups: Vec<(String, usize)>) -> Self {
        Self { groups }
    }

    /// Total number of loci across all groups.
    #[inline]
    pub fn gene_count(&self) -> usize {
        self.groups.iter().map(|(_, count)| count).sum()
    }

    /// Number of groups.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Ordinal (position) of a group, failing on an unknown name.
    pub fn group_ordinal(&self, name: &str) -> Result<usize, LookupError> {
        self.groups
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| LookupError::Group {
                name: name.to_string(),
            })
    }

    /// Locus count of a group, failing on an unknown name.
    pub fn group_size(&self, name: &str) -> Result<usize, LookupError> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, count)| *count)
            .ok_or_else(|| LookupError::Group {
                name: name.to_string(),
            })
    }

    /// Locus count of the group at the given ordinal.
    #[inline]
    pub fn size_of(&self, ordinal: usize) -> usize {
        self.groups[ordinal].1
    }

    /// Name of the group at the given ordinal.
    #[inline]
    pub fn name_of(&self, ordinal: usize) -> &str {
        &self.groups[ordinal].0
    }

    /// Half-open locus index range of a group, failing on an unknown name.
    ///
    /// Callers use this when the group is a hard requirement of the content.
    pub fn gene_range(&self, name: &str) -> Result<Range<usize>, LookupError> {
        let range = self.try_range(name);
        if range.end == 0 {
            return Err(LookupError::Group {
                name: name.to_string(),
            });
        }
        Ok(range)
    }

    /// Half-open locus index range of a group, or the empty range `0..0` when
    /// the group is absent.
    ///
    /// Callers use this when an absent group means "feature not configured
    /// for this species".
    pub fn try_range(&self, name: &str) -> Range<usize> {
        let mut start = 0;
        for (group, count) in &self.groups {
            if group == name {
                return start..start + count;
            }
            start += count;
        }
        0..0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trait_map() -> GeneGroupMap {
        GeneGroupMap::from_groups(vec![
            ("coi".into(), 128),
            ("strength".into(), 8),
            ("stamina".into(), 4),
        ])
    }

    #[test]
    fn test_group_map_counts() {
        let map = trait_map();
        assert_eq!(map.group_count(), 3);
        assert_eq!(map.gene_count(), 140);
        assert_eq!(GeneGroupMap::new().gene_count(), 0);
    }

    #[test]
    fn test_group_map_ordinal_and_size() {
        let map = trait_map();
        assert_eq!(map.group_ordinal("strength").unwrap(), 1);
        assert_eq!(map.group_size("stamina").unwrap(), 4);
        assert_eq!(map.size_of(0), 128);
        assert_eq!(map.name_of(2), "stamina");
    }

    #[test]
    fn test_group_map_ranges() {
        let map = trait_map();
        assert_eq!(map.gene_range("coi").unwrap(), 0..128);
        assert_eq!(map.gene_range("strength").unwrap(), 128..136);
        assert_eq!(map.gene_range("stamina").unwrap(), 136..140);
    }

    #[test]
    fn test_group_map_unknown_name() {
        let map = trait_map();
        // The fatal lookup propagates, the safe one yields an empty range.
        assert!(map.gene_range("thisgenedoesnotexist").is_err());
        assert_eq!(map.try_range("thisgenedoesnotexist"), 0..0);
        assert!(map.group_ordinal("luck").is_err());
        assert!(map.group_size("luck").is_err());
    }
}
