//! A layer-by-layer greedy brick-packing engine: converts a sparse, coloured
//! 3D voxel field into an ordered manifest of rectangular brick placements.
//!
//! The packing core lives in [`packer`] (C5) and [`driver`] (C6); everything
//! else is a collaborator the driver wires together. [`pack`] is the single
//! entry point a caller (the CLI in `main.rs`, or an embedding application)
//! needs.

pub mod catalogue;
pub mod classifier;
pub mod config;
pub mod driver;
pub mod error;
pub mod ldraw;
pub mod logging;
pub mod manifest;
pub mod model;
pub mod objects;
pub mod oracle;
pub mod palette;
pub mod packer;
pub mod seam;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use catalogue::Catalogue;
use classifier::ClusterShape;
use error::PackError;
use manifest::Manifest;
use model::{ColourId, PackDiagnostics};
use objects::{HardcodedObjectIndex, ObjectType};
use oracle::{AvailabilityOracle, SkipAvailabilityOracle};
use palette::PaletteMapper;

// ====================
// PUBLIC STRUCTS (core input, §6)
// ====================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputVoxel {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub hex_color: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Hints {
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Mode {
    #[serde(default)]
    pub skip_availability: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PackRequest {
    pub voxels: Vec<InputVoxel>,
    #[serde(default)]
    pub hints: Hints,
    #[serde(default)]
    pub mode: Mode,
}

/// Packs a voxel field into a manifest (§2 data flow, top to bottom): group
/// by layer, map colour, classify, pick candidates, verify availability,
/// pack, drive across layers, emit. This is the only entry point most
/// callers need; the individual components remain public for composing a
/// custom pipeline (e.g. swapping the oracle or catalogue overlay).
pub fn pack(
    request: PackRequest,
    catalogue: &Catalogue,
    object_index: &HardcodedObjectIndex,
    oracle: &dyn AvailabilityOracle,
) -> Result<Manifest, PackError> {
    validate(&request.voxels)?;

    let skip_oracle = SkipAvailabilityOracle;
    let effective_oracle: &dyn AvailabilityOracle = if request.mode.skip_availability.unwrap_or(false) { &skip_oracle } else { oracle };

    let object_type = request
        .hints
        .object_type
        .as_deref()
        .and_then(ObjectType::parse)
        .unwrap_or_else(|| derive_object_type(&request.voxels));

    let mapper = PaletteMapper::new(catalogue)?;
    let mut diagnostics = PackDiagnostics::default();
    let layers = group_by_layer_and_colour(&request.voxels, &mapper, &mut diagnostics);

    let (bricks, seam_map) = driver::drive(catalogue, object_index, object_type, effective_oracle, &layers, &mut diagnostics)?;

    log_diagnostics(&diagnostics);

    Ok(manifest::build_manifest(catalogue, &bricks, seam_map, false))
}

// ====================
// PRIVATE FUNCTIONS
// ====================

fn validate(voxels: &[InputVoxel]) -> Result<(), PackError> {
    if voxels.is_empty() {
        return Err(PackError::InvalidInput("voxel set is empty".into()));
    }

    let mut seen = HashSet::with_capacity(voxels.len());
    for voxel in voxels {
        if !seen.insert((voxel.x, voxel.y, voxel.z)) {
            return Err(PackError::InvalidInput(format!("duplicate voxel at ({}, {}, {})", voxel.x, voxel.y, voxel.z)));
        }
    }
    Ok(())
}

fn group_by_layer_and_colour(
    voxels: &[InputVoxel],
    mapper: &PaletteMapper,
    diagnostics: &mut PackDiagnostics,
) -> BTreeMap<i32, BTreeMap<ColourId, BTreeSet<(i32, i32)>>> {
    let mut layers: BTreeMap<i32, BTreeMap<ColourId, BTreeSet<(i32, i32)>>> = BTreeMap::new();
    for voxel in voxels {
        let colour_id = mapper.nearest(&voxel.hex_color, diagnostics);
        layers.entry(voxel.z).or_default().entry(colour_id).or_default().insert((voxel.x, voxel.y));
    }
    layers
}

/// Derives an object-type ordering hint from the overall bounding box when
/// the caller supplies none (§4.9).
fn derive_object_type(voxels: &[InputVoxel]) -> ObjectType {
    let cells: BTreeSet<(i32, i32)> = voxels.iter().map(|v| (v.x, v.y)).collect();
    match ClusterShape::of(&cells) {
        Some(shape) => ObjectType::classify(shape.width, shape.depth),
        None => ObjectType::Generic,
    }
}

fn log_diagnostics(diagnostics: &PackDiagnostics) {
    for (z, colour_id) in &diagnostics.parity_relaxed {
        debug!(layer = z, colour_id, "parity relaxed for colour group");
    }
    for hex in &diagnostics.malformed_colours {
        warn!(hex, "malformed colour fell back to grey");
    }
    if diagnostics.oracle_degraded {
        debug!("availability oracle returned unknown for at least one query; affected bricks are unverified");
    }
}
