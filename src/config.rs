use std::path::{Path, PathBuf};
use serde::Deserialize;
use crate::error::PackError;
use crate::model::Part;

/// An optional on-disk overlay (§10.3) merged onto the built-in catalogue at
/// startup. Absence of a config file is not an error.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CatalogueOverlay {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub unit_costs: Vec<UnitCostOverride>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UnitCostOverride {
    pub part_id: String,
    pub unit_cost: f64,
}

/// Loads the overlay from `explicit_path` if given, else from
/// `$XDG_CONFIG_HOME/lego-pack/config.toml` via `dirs`. Returns `Ok(None)`
/// when no file is found at the resolved path, which is the expected default.
pub fn load(explicit_path: Option<&Path>) -> Result<Option<CatalogueOverlay>, PackError> {
    let path = match explicit_path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path(),
    };

    let Some(path) = path else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }

    let text = std::fs::read_to_string(&path).map_err(|err| PackError::InvalidInput(format!("{}: {err}", path.display())))?;
    let overlay: CatalogueOverlay = toml::from_str(&text).map_err(|err| PackError::InvalidInput(format!("{}: {err}", path.display())))?;
    Ok(Some(overlay))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lego-pack").join("config.toml"))
}
