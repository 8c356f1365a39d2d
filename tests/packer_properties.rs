//! Property-based tests over randomly generated small voxel fields, covering
//! the universally-quantified invariants of §8 (coverage, non-overlap,
//! determinism) rather than literal scenarios (those live in
//! `golden_scenarios.rs`).

use std::collections::{BTreeMap, BTreeSet};
use lego_pack::catalogue::Catalogue;
use lego_pack::driver::drive;
use lego_pack::model::{ColourId, PackDiagnostics};
use lego_pack::objects::{HardcodedObjectIndex, ObjectType};
use lego_pack::oracle::TableOracle;
use proptest::prelude::*;

/// Builds a colour-grouped layer map from a flat list of `(x, y, z)` cells,
/// all sharing one colour id, mirroring what `lib.rs::group_by_layer_and_colour`
/// would produce for a single-colour voxel field.
fn single_colour_layers(cells: &[(i32, i32, i32)], colour_id: ColourId) -> BTreeMap<i32, BTreeMap<ColourId, BTreeSet<(i32, i32)>>> {
    let mut layers: BTreeMap<i32, BTreeMap<ColourId, BTreeSet<(i32, i32)>>> = BTreeMap::new();
    for &(x, y, z) in cells {
        layers.entry(z).or_default().entry(colour_id).or_default().insert((x, y));
    }
    layers
}

/// A small grid of cells, `0..width x 0..depth`, on layers `0..height`, each
/// cell independently present with probability `density`.
fn arb_voxel_field() -> impl Strategy<Value = Vec<(i32, i32, i32)>> {
    (1i32..6, 1i32..6, 1i32..3).prop_flat_map(|(width, depth, height)| {
        let mut cells = Vec::new();
        for z in 0..height {
            for x in 0..width {
                for y in 0..depth {
                    cells.push((x, y, z));
                }
            }
        }
        prop::collection::vec(any::<bool>(), cells.len()).prop_map(move |mask| {
            cells.iter().zip(mask.iter()).filter(|(_, &present)| present).map(|(&cell, _)| cell).collect::<Vec<_>>()
        })
    })
}

proptest! {
    /// Coverage + non-overlap (§8 items 1-2): every input voxel is covered by
    /// exactly one placed brick's footprint, and no two bricks on the same
    /// layer claim the same stud.
    #[test]
    fn every_voxel_is_covered_exactly_once(cells in arb_voxel_field()) {
        prop_assume!(!cells.is_empty());
        let catalogue = Catalogue::builtin();
        let objects = HardcodedObjectIndex::builtin();
        let oracle = TableOracle::new();
        let mut diagnostics = PackDiagnostics::default();
        let layers = single_colour_layers(&cells, 3);

        let (bricks, _seam_map) = drive(&catalogue, &objects, ObjectType::Generic, &oracle, &layers, &mut diagnostics).unwrap();

        let input: BTreeSet<(i32, i32, i32)> = cells.iter().copied().collect();
        let mut covered: BTreeSet<(i32, i32, i32)> = BTreeSet::new();
        for brick in &bricks {
            let (x0, y0, x1, y1) = brick.footprint_span();
            for x in x0..x1 {
                for y in y0..y1 {
                    let voxel = (x, y, brick.origin.2);
                    prop_assert!(input.contains(&voxel), "brick covers a voxel outside the input set");
                    prop_assert!(covered.insert(voxel), "voxel {:?} covered by more than one brick", voxel);
                }
            }
        }
        prop_assert_eq!(covered, input);
    }

    /// Determinism (§8 item 6): packing the same field twice yields
    /// byte-identical placement lists (origin, footprint, rotation, part).
    #[test]
    fn packing_is_deterministic(cells in arb_voxel_field()) {
        prop_assume!(!cells.is_empty());
        let catalogue = Catalogue::builtin();
        let objects = HardcodedObjectIndex::builtin();
        let oracle = TableOracle::new();
        let layers = single_colour_layers(&cells, 1);

        let mut diagnostics_a = PackDiagnostics::default();
        let (bricks_a, seam_a) = drive(&catalogue, &objects, ObjectType::Generic, &oracle, &layers, &mut diagnostics_a).unwrap();
        let mut diagnostics_b = PackDiagnostics::default();
        let (bricks_b, seam_b) = drive(&catalogue, &objects, ObjectType::Generic, &oracle, &layers, &mut diagnostics_b).unwrap();

        prop_assert_eq!(bricks_a.len(), bricks_b.len());
        for (a, b) in bricks_a.iter().zip(bricks_b.iter()) {
            prop_assert_eq!(a.origin, b.origin);
            prop_assert_eq!(a.footprint, b.footprint);
            prop_assert_eq!(&a.part_id, &b.part_id);
            prop_assert_eq!(a.rotation, b.rotation);
        }
        prop_assert_eq!(seam_a.len(), seam_b.len());
    }

    /// Colour purity (§8 item 3): every brick's assigned colour equals the
    /// colour of every voxel it covers, by construction of `single_colour_layers`
    /// across two distinct colours sharing one layer.
    #[test]
    fn bricks_never_straddle_a_colour_boundary(
        left in prop::collection::vec((0i32..3, 0i32..3), 0..9),
        right in prop::collection::vec((3i32..6, 0i32..3), 0..9),
    ) {
        prop_assume!(!left.is_empty() && !right.is_empty());
        let catalogue = Catalogue::builtin();
        let objects = HardcodedObjectIndex::builtin();
        let oracle = TableOracle::new();
        let mut diagnostics = PackDiagnostics::default();

        let mut layers: BTreeMap<i32, BTreeMap<ColourId, BTreeSet<(i32, i32)>>> = BTreeMap::new();
        layers.entry(0).or_default().entry(2).or_default().extend(left.iter().copied());
        layers.entry(0).or_default().entry(4).or_default().extend(right.iter().copied());

        let (bricks, _seam_map) = drive(&catalogue, &objects, ObjectType::Generic, &oracle, &layers, &mut diagnostics).unwrap();

        for brick in &bricks {
            let (x0, _, x1, _) = brick.footprint_span();
            prop_assert!(x1 <= 3 || x0 >= 3, "brick straddles the colour boundary at x=3");
        }
    }
}
