//! Named allele-frequency presets with optional spawn conditions.

use serde::Deserialize;

use crate::genotype::AlleleFrequencies;

/// Climate readings at a prospective spawn location.
///
/// Densities, geologic activity, and fertility are normalized to `[0, 1]`.
/// Elevation is passed separately, already normalized by the host; the core
/// never consults world state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Climate {
    /// Worldgen temperature in degrees.
    pub temperature: f32,
    /// Worldgen rainfall, 0 to 1.
    pub rainfall: f32,
    /// Forest density, 0 to 1.
    pub forest_density: f32,
    /// Shrub density, 0 to 1.
    pub shrub_density: f32,
    /// Geologic activity, 0 to 1.
    pub geologic_activity: f32,
    /// Soil fertility, 0 to 1.
    pub fertility: f32,
}

impl Default for Climate {
    fn default() -> Self {
        Self {
            temperature: 10.0,
            rainfall: 0.5,
            forest_density: 0.0,
            shrub_density: 0.0,
            geologic_activity: 0.0,
            fertility: 0.5,
        }
    }
}

/// Climate and elevation bounds restricting where an initializer applies.
///
/// Every bound defaults to its permissive extreme, so a condition block only
/// constrains what it mentions. Field names follow the config grammar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpawnConditions {
    #[serde(rename = "minTemp", default = "min_temp_default")]
    pub min_temp: f32,
    #[serde(rename = "maxTemp", default = "max_temp_default")]
    pub max_temp: f32,
    #[serde(rename = "minRain", default)]
    pub min_rain: f32,
    #[serde(rename = "maxRain", default = "one")]
    pub max_rain: f32,
    #[serde(rename = "minForest", default)]
    pub min_forest: f32,
    #[serde(rename = "maxForest", default = "one")]
    pub max_forest: f32,
    #[serde(rename = "minShrubs", default)]
    pub min_shrubs: f32,
    #[serde(rename = "maxShrubs", default = "one")]
    pub max_shrubs: f32,
    /// Satisfied when either forest or shrub density lies in bounds.
    #[serde(rename = "minForestOrShrubs", default)]
    pub min_forest_or_shrubs: f32,
    #[serde(rename = "maxForestOrShrubs", default = "one")]
    pub max_forest_or_shrubs: f32,
    /// Bounds over normalized elevation.
    #[serde(rename = "minY", default)]
    pub min_y: f32,
    #[serde(rename = "maxY", default = "one")]
    pub max_y: f32,
    #[serde(rename = "minGeologicActivity", default)]
    pub min_geologic_activity: f32,
    #[serde(rename = "maxGeologicActivity", default = "one")]
    pub max_geologic_activity: f32,
    #[serde(rename = "minFertility", default)]
    pub min_fertility: f32,
    #[serde(rename = "maxFertility", default = "one")]
    pub max_fertility: f32,
}

fn min_temp_default() -> f32 {
    -50.0
}

fn max_temp_default() -> f32 {
    50.0
}

fn one() -> f32 {
    1.0
}

impl Default for SpawnConditions {
    fn default() -> Self {
        serde_json::from_str("{}").expect("empty condition block is valid")
    }
}

impl SpawnConditions {
    /// Evaluate all configured bounds conjunctively.
    pub fn matches(&self, climate: &Climate, elevation: f32) -> bool {
        let forest_or_shrubs = (self.min_forest_or_shrubs <= climate.forest_density
            || self.min_forest_or_shrubs <= climate.shrub_density)
            && (self.max_forest_or_shrubs >= climate.forest_density
                || self.max_forest_or_shrubs >= climate.shrub_density);
        forest_or_shrubs
            && self.min_temp <= climate.temperature
            && self.max_temp >= climate.temperature
            && self.min_rain <= climate.rainfall
            && self.max_rain >= climate.rainfall
            && self.min_forest <= climate.forest_density
            && self.max_forest >= climate.forest_density
            && self.min_shrubs <= climate.shrub_density
            && self.max_shrubs >= climate.shrub_density
            && self.min_y <= elevation
            && self.max_y >= elevation
            && self.min_geologic_activity <= climate.geologic_activity
            && self.max_geologic_activity >= climate.geologic_activity
            && self.min_fertility <= climate.fertility
            && self.max_fertility >= climate.fertility
    }
}

/// A named allele-frequency preset used to seed newly spawned individuals.
#[derive(Debug, Clone, PartialEq)]
pub struct Initializer {
    name: String,
    frequencies: AlleleFrequencies,
    conditions: Option<SpawnConditions>,
}

impl Initializer {
    /// Create an initializer.
    pub fn new(
        name: impl Into<String>,
        frequencies: AlleleFrequencies,
        conditions: Option<SpawnConditions>,
    ) -> Self {
        Self {
            name: name.into(),
            frequencies,
            conditions,
        }
    }

    /// Initializer name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The preset's frequency tables.
    #[inline]
    pub fn frequencies(&self) -> &AlleleFrequencies {
        &self.frequencies
    }

    /// Check the spawn conditions; always true when no condition block is
    /// configured.
    pub fn can_spawn_at(&self, climate: &Climate, elevation: f32) -> bool {
        match &self.conditions {
            Some(conditions) => conditions.matches(climate, elevation),
            None => true,
        }
    }
}
