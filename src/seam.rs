use crate::model::{PlacedBrick, SeamMapEntry, SeamSet};

/// Builds the diagnostic seam-map rows for one layer (C8): for each seam
/// column, whether some brick in the layer above bridges it. Purely
/// informational — §4.8 "no invariant enforcement".
pub fn build_seam_map(layer_z: i32, seam_set: &SeamSet, next_layer_bricks: &[PlacedBrick]) -> Vec<SeamMapEntry> {
    seam_set
        .iter()
        .map(|&c| {
            let covered_by = next_layer_bricks
                .iter()
                .find(|b| bridges(b, c))
                .map(|b| b.part_id.clone());
            SeamMapEntry { layer_z, column_x: c, width: 1, covered_by }
        })
        .collect()
}

/// Whether `brick`'s x-span centre lies within `w/2` of column `c`. Compared
/// in doubled integer units so no float arithmetic is needed.
fn bridges(brick: &PlacedBrick, c: i32) -> bool {
    let (x, _, _, _) = brick.footprint_span();
    let w = brick.footprint.0 as i32;
    let doubled_centre = 2 * x + w;
    (doubled_centre - 2 * c).abs() <= w
}
