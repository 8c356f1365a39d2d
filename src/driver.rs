use std::collections::{BTreeMap, BTreeSet};
use tracing::info_span;
use crate::catalogue::Catalogue;
use crate::error::PackError;
use crate::model::{ColourId, PackDiagnostics, PlacedBrick, SeamMapEntry, SeamSet};
use crate::objects::{HardcodedObjectIndex, ObjectType};
use crate::oracle::AvailabilityOracle;
use crate::packer::pack_layer;
use crate::seam::build_seam_map;

struct LayerResult {
    z: i32,
    bricks: Vec<PlacedBrick>,
    seam_set: SeamSet,
}

/// Drives the packer across every layer, bottom to top (C6). `layers` maps
/// each populated `z` to its colour-grouped voxel cells, already produced by
/// the palette mapper upstream.
pub fn drive(
    catalogue: &Catalogue,
    object_index: &HardcodedObjectIndex,
    object_type: ObjectType,
    oracle: &dyn AvailabilityOracle,
    layers: &BTreeMap<i32, BTreeMap<ColourId, BTreeSet<(i32, i32)>>>,
    diagnostics: &mut PackDiagnostics,
) -> Result<(Vec<PlacedBrick>, Vec<SeamMapEntry>), PackError> {
    let mut layer_results = Vec::new();
    let mut previous_seam = SeamSet::new();

    for (&z, colour_groups) in layers {
        let span = info_span!("layer", layer = z);
        let _enter = span.enter();

        let result = pack_layer(catalogue, object_index, object_type, oracle, z, colour_groups, &previous_seam, diagnostics)?;
        previous_seam = result.seam_set.clone();
        layer_results.push(LayerResult { z, bricks: result.bricks, seam_set: result.seam_set });
    }

    // Seam-map rows can only be finalised once the layer above has been
    // packed (§4.6), so this pass runs after the main loop rather than inline.
    let mut seam_map = Vec::new();
    for i in 0..layer_results.len() {
        if layer_results[i].seam_set.is_empty() {
            continue;
        }
        let next_bricks: &[PlacedBrick] = layer_results.get(i + 1).map(|l| l.bricks.as_slice()).unwrap_or(&[]);
        seam_map.extend(build_seam_map(layer_results[i].z, &layer_results[i].seam_set, next_bricks));
    }

    let bricks = layer_results.into_iter().flat_map(|l| l.bricks).collect();
    Ok((bricks, seam_map))
}
