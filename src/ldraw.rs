use crate::catalogue::Catalogue;
use crate::model::{PlacedBrick, Rotation};

/// LDraw units per stud, both horizontally and vertically (§4.7, §9
/// Resolution — the source domain's two implementations disagreed on the
/// vertical scale; this crate fixes one convention and uses it everywhere).
const LDRAW_UNITS_PER_STUD: f64 = 20.0;

/// Renders the placements as LDraw-style text (C7's `ldraw_text`, §4.7). The
/// coordinate mapping is fixed (§9 Resolution): `ldraw_x = x * 20`,
/// `ldraw_y = -(z * 20)`, `ldraw_z = y * 20`.
pub fn render(catalogue: &Catalogue, bricks: &[PlacedBrick]) -> String {
    let mut sorted: Vec<&PlacedBrick> = bricks.iter().collect();
    sorted.sort_by(|a, b| {
        a.origin.2
            .cmp(&b.origin.2)
            .then(a.origin.1.cmp(&b.origin.1))
            .then(a.origin.0.cmp(&b.origin.0))
            .then(a.part_id.cmp(&b.part_id))
    });

    let mut out = String::new();
    out.push_str("0 FILE model.ldr\n");
    out.push_str("0 Name: model.ldr\n");
    out.push_str("0 Author: lego-pack\n");

    for brick in sorted {
        let (x, y, z) = brick.origin;
        let ldraw_x = x as f64 * LDRAW_UNITS_PER_STUD;
        let ldraw_y = -(z as f64 * LDRAW_UNITS_PER_STUD);
        let ldraw_z = y as f64 * LDRAW_UNITS_PER_STUD;
        let ldraw_colour = catalogue.colour(brick.colour).map(|c| c.ldraw_id).unwrap_or(0);
        let matrix = rotation_matrix(brick.rotation);

        out.push_str(&format!(
            "1 {ldraw_colour} {ldraw_x} {ldraw_y} {ldraw_z} {} {} {} {} {} {} {} {} {} {}.dat\n",
            matrix[0], matrix[1], matrix[2], matrix[3], matrix[4], matrix[5], matrix[6], matrix[7], matrix[8], brick.part_id
        ));
    }

    out
}

/// The fixed rotation matrices about LDraw's vertical (y) axis, which is
/// where a brick's quarter-turn about this crate's vertical (z) axis lands
/// after the coordinate mapping above (§4.7: "0°->identity; 90°, 180°, 270°
/// use the fixed matrices of the source domain").
fn rotation_matrix(rotation: Rotation) -> [i32; 9] {
    match rotation {
        Rotation::Deg0 => [1, 0, 0, 0, 1, 0, 0, 0, 1],
        Rotation::Deg90 => [0, 0, 1, 0, 1, 0, -1, 0, 0],
        Rotation::Deg180 => [-1, 0, 0, 0, 1, 0, 0, 0, -1],
        Rotation::Deg270 => [0, 0, -1, 0, 1, 0, 1, 0, 0],
    }
}
