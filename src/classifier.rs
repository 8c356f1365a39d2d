use std::collections::BTreeSet;
use crate::catalogue::Catalogue;
use crate::model::{Part, Rotation};
use crate::objects::{HardcodedObjectIndex, ObjectType};

/// Bounding-box/area/aspect-ratio summary of a connected voxel cluster (C4).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClusterShape {
    pub width: u32,
    pub depth: u32,
    pub area: u32,
    pub aspect_ratio_numerator: u32,
    pub aspect_ratio_denominator: u32,
}

impl ClusterShape {
    /// Computes the bounding box and area of a non-empty set of `(x, y)` cells.
    /// Area here is the bounding-box area (`w_bb x d_bb`), per §4.4 — the cell
    /// count itself (voxel count) is tracked separately by the caller.
    pub fn of(cells: &BTreeSet<(i32, i32)>) -> Option<ClusterShape> {
        let min_x = cells.iter().map(|&(x, _)| x).min()?;
        let max_x = cells.iter().map(|&(x, _)| x).max()?;
        let min_y = cells.iter().map(|&(_, y)| y).min()?;
        let max_y = cells.iter().map(|&(_, y)| y).max()?;
        let width = (max_x - min_x + 1) as u32;
        let depth = (max_y - min_y + 1) as u32;
        let (long, short) = if width >= depth { (width, depth) } else { (depth, width) };
        Some(ClusterShape { width, depth, area: width * depth, aspect_ratio_numerator: long, aspect_ratio_denominator: short.max(1) })
    }
}

/// A candidate placement: a part in a specific rotation, with its effective
/// footprint after that rotation is applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub part_id: String,
    pub rotation: Rotation,
    pub width: u32,
    pub depth: u32,
    pub height: u32,
    pub unit_cost: f64,
    /// True when this candidate came from a hardcoded-object recipe match
    /// and should be tried before the generic catalogue ordering (§4.4 step 1).
    pub from_recipe: bool,
}

/// Builds the ordered candidate list for a cluster (§4.4):
/// 1. A hardcoded-recipe match (if any) is emitted first, in recipe order.
/// 2. Then every catalogue part that fits inside the bounding box, in both
///    orientations, sorted by area descending (the fewer, larger pieces a
///    layer needs, the better — §1 goal (d)), category priority breaking
///    ties between same-footprint parts (e.g. a tile and a brick of
///    identical size), width descending breaking any remaining tie.
pub fn candidates(
    catalogue: &Catalogue,
    object_index: &HardcodedObjectIndex,
    object_type: ObjectType,
    shape: ClusterShape,
) -> Vec<Candidate> {
    let mut result = Vec::new();

    if let Some(recipe) = object_index.lookup(object_type, shape.width, shape.depth) {
        for part_id in &recipe.preferred_parts {
            if let Some(part) = catalogue.part(part_id) {
                for rotation in [Rotation::Deg0, Rotation::Deg90] {
                    if let Some(candidate) = fit_candidate(part, rotation, shape, true) {
                        result.push(candidate);
                    }
                }
            }
        }
    }

    let mut generic: Vec<Candidate> = catalogue
        .parts()
        .iter()
        .flat_map(|part| {
            [Rotation::Deg0, Rotation::Deg90]
                .into_iter()
                .filter_map(move |rotation| fit_candidate(part, rotation, shape, false))
        })
        .collect();

    generic.sort_by(|a, b| {
        let pa = catalogue.part(&a.part_id).map(|p| p.category.priority()).unwrap_or(u8::MAX);
        let pb = catalogue.part(&b.part_id).map(|p| p.category.priority()).unwrap_or(u8::MAX);
        (b.width * b.depth)
            .cmp(&(a.width * a.depth))
            .then(pa.cmp(&pb))
            .then(b.width.cmp(&a.width))
    });

    result.extend(generic);
    result
}

fn fit_candidate(part: &Part, rotation: Rotation, shape: ClusterShape, from_recipe: bool) -> Option<Candidate> {
    let (width, depth) = if rotation.swaps_axes() {
        (part.depth, part.width)
    } else {
        (part.width, part.depth)
    };
    if width <= shape.width && depth <= shape.depth {
        Some(Candidate {
            part_id: part.part_id.clone(),
            rotation,
            width,
            depth,
            height: part.height,
            unit_cost: part.unit_cost,
            from_recipe,
        })
    } else {
        None
    }
}
