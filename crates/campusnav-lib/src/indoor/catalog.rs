//! Indoor floor configuration loading and lookup.
//!
//! The catalog is static configuration read once at startup. Resolution
//! order for the configuration file:
//!
//! 1. Explicit path argument when provided.
//! 2. `CAMPUSNAV_INDOOR_CONFIG` environment variable.
//! 3. `indoor_floors.json` in the platform configuration directory, if present.
//! 4. The catalog embedded in this crate.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geometry::Point;

use super::mapper::{geo_to_local, local_to_geo, Bounds, LocalExtent, LocalPoint};

/// Environment variable overriding the indoor configuration path.
pub const INDOOR_CONFIG_ENV: &str = "CAMPUSNAV_INDOOR_CONFIG";

const INDOOR_CONFIG_FILENAME: &str = "indoor_floors.json";

const BUILTIN_INDOOR_CONFIG: &str = include_str!("../../data/indoor_floors.json");

/// Minimum Jaro-Winkler similarity for a building to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkKind {
    Svg,
    Png,
}

/// Reference to a floor's plan artwork.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorArtwork {
    pub kind: ArtworkKind,
    pub asset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_box: Option<String>,
}

/// One floor of a building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorDescriptor {
    pub id: String,
    /// Sort key only; levels may be non-contiguous.
    pub level: i32,
    pub label: String,
    pub bounds: Bounds,
    pub artwork: FloorArtwork,
}

impl FloorDescriptor {
    /// Local coordinate extent of the artwork, or the unit square when no
    /// `viewBox` is declared.
    pub fn extent(&self) -> Result<LocalExtent> {
        match self.artwork.view_box.as_deref() {
            Some(view_box) => view_box.parse(),
            None => Ok(LocalExtent::default()),
        }
    }

    pub fn to_local(&self, point: Point) -> Result<LocalPoint> {
        geo_to_local(point, &self.bounds, &self.extent()?)
    }

    pub fn to_geo(&self, local: LocalPoint) -> Result<Point> {
        local_to_geo(local, &self.bounds, &self.extent()?)
    }
}

/// Indoor map definition of a single building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingIndoorConfig {
    pub id: String,
    pub name: String,
    pub default_floor: i32,
    pub floors: Vec<FloorDescriptor>,
}

impl BuildingIndoorConfig {
    /// Floor with exactly this level.
    pub fn floor(&self, level: i32) -> Option<&FloorDescriptor> {
        self.floors.iter().find(|floor| floor.level == level)
    }

    /// Floor with the level nearest to `requested`; ties go to the lower level.
    pub fn select_floor(&self, requested: i32) -> Result<&FloorDescriptor> {
        let selected = self
            .floors
            .iter()
            .min_by_key(|floor| {
                (
                    (i64::from(floor.level) - i64::from(requested)).abs(),
                    floor.level,
                )
            })
            .ok_or_else(|| Error::NoFloors {
                building: self.id.clone(),
            })?;

        if selected.level != requested {
            debug!(
                building = %self.id,
                requested,
                selected = selected.level,
                "no exact floor match; using nearest level"
            );
        }
        Ok(selected)
    }

    pub fn default_floor_descriptor(&self) -> Result<&FloorDescriptor> {
        self.select_floor(self.default_floor)
    }

    fn sort_floors(&mut self) {
        self.floors.sort_by_key(|floor| floor.level);
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    buildings: Vec<BuildingIndoorConfig>,
}

/// Collection of building indoor configurations keyed by building id.
#[derive(Debug, Clone, Default)]
pub struct IndoorCatalog {
    buildings: BTreeMap<String, BuildingIndoorConfig>,
    source: Option<PathBuf>,
}

impl IndoorCatalog {
    /// Catalog embedded in the library.
    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_INDOOR_CONFIG.as_bytes())
    }

    /// Load a catalog from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).map_err(|err| Error::ConfigLoad {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let mut catalog = Self::from_reader(file).map_err(|err| Error::ConfigLoad {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        catalog.source = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            buildings = catalog.len(),
            "loaded indoor floor configuration"
        );
        Ok(catalog)
    }

    /// Load a catalog from any JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let file: CatalogFile = serde_json::from_reader(reader)?;
        let buildings = file
            .buildings
            .into_iter()
            .map(|mut building| {
                building.sort_floors();
                (building.id.clone(), building)
            })
            .collect();

        Ok(Self {
            buildings,
            source: None,
        })
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub fn building_ids(&self) -> impl Iterator<Item = &str> {
        self.buildings.keys().map(String::as_str)
    }

    pub fn buildings(&self) -> impl Iterator<Item = &BuildingIndoorConfig> {
        self.buildings.values()
    }

    /// Look up a building by id (case-insensitive).
    pub fn get(&self, id: &str) -> Result<&BuildingIndoorConfig> {
        if let Some(building) = self.buildings.get(id) {
            return Ok(building);
        }
        if let Some(building) = self
            .buildings
            .values()
            .find(|building| building.id.eq_ignore_ascii_case(id))
        {
            return Ok(building);
        }

        Err(Error::UnknownBuilding {
            name: id.to_string(),
            suggestions: self.fuzzy_building_matches(id, 3),
        })
    }

    /// Building ids whose id or display name resembles `query`, best first.
    pub fn fuzzy_building_matches(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .buildings
            .values()
            .map(|building| {
                let by_id = strsim::jaro_winkler(&query, &building.id.to_lowercase());
                let by_name = strsim::jaro_winkler(&query, &building.name.to_lowercase());
                (by_id.max(by_name), building.id.as_str())
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, id)| id.to_string())
            .collect()
    }
}

/// Platform-specific location of a user-supplied indoor configuration.
pub fn default_indoor_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("org", "campusnav", "campusnav")
        .ok_or(Error::ConfigDirsUnavailable)?;
    Ok(dirs.config_dir().join(INDOOR_CONFIG_FILENAME))
}

/// Resolve which configuration file to load, or `None` for the built-in
/// catalog.
pub fn resolve_indoor_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(env_path) = env::var_os(INDOOR_CONFIG_ENV) {
        return Some(PathBuf::from(env_path));
    }

    match default_indoor_config_path() {
        Ok(path) if path.exists() => Some(path),
        Ok(_) => None,
        Err(error) => {
            debug!(%error, "no platform configuration directory; using built-in catalog");
            None
        }
    }
}

/// Load the indoor catalog following the documented resolution order.
pub fn load_indoor_catalog(explicit: Option<&Path>) -> Result<IndoorCatalog> {
    match resolve_indoor_config_path(explicit) {
        Some(path) => IndoorCatalog::from_path(&path),
        None => {
            debug!("using built-in indoor floor configuration");
            IndoorCatalog::builtin()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses_and_sorts_floors() {
        let catalog = IndoorCatalog::builtin().expect("embedded catalog parses");
        assert!(catalog.len() >= 3);
        for building in catalog.buildings() {
            let levels: Vec<i32> = building.floors.iter().map(|f| f.level).collect();
            let mut sorted = levels.clone();
            sorted.sort();
            assert_eq!(levels, sorted, "floors of {} sorted by level", building.id);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = IndoorCatalog::builtin().unwrap();
        assert_eq!(catalog.get("mb").unwrap().id, "MB");
    }
}
