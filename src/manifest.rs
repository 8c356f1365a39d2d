use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::catalogue::{Catalogue, LAYER_MM, STUD_MM};
use crate::model::{Category, ColourId, Part, PlacedBrick, SeamMapEntry};

// ====================
// PUBLIC STRUCTS (external wire shape, §6)
// ====================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub studs: [i32; 3],
    pub mm: [f64; 3],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub studs: [u32; 3],
    pub mm: [f64; 3],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorInfo {
    pub name: String,
    pub hex: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrickRecord {
    pub brick_id: u32,
    pub part_id: String,
    pub lego_type: String,
    pub position: Position,
    pub dimensions: Dimensions,
    pub rotation: u16,
    pub color_id: ColourId,
    pub color_info: ColorInfo,
    pub vertices: Vec<[f64; 3]>,
    pub voxel_coverage: Vec<[i32; 3]>,
    pub is_verified: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelCoverageEntry {
    pub voxel: [i32; 3],
    pub brick_id: u32,
    pub part_id: String,
    pub lego_type: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub part_id: String,
    pub lego_type: String,
    pub color_id: ColourId,
    pub color_name: String,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceCount {
    pub total_pieces: u32,
    pub total_unique: u32,
    pub breakdown: Vec<InventoryRow>,
    pub estimated_cost: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssemblyStep {
    pub step: u32,
    pub layer_z: i32,
    pub parts_needed: Vec<InventoryRow>,
    pub bricks: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    pub total_steps: u32,
    pub difficulty: String,
    pub estimated_time_minutes: u32,
    pub steps: Vec<AssemblyStep>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeamMapRow {
    pub layer_z: i32,
    pub x_position: i32,
    pub width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub covered_by: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest_version: String,
    pub total_bricks: u32,
    pub bricks: Vec<BrickRecord>,
    pub voxel_coverage: Vec<VoxelCoverageEntry>,
    pub layers: BTreeMap<String, u32>,
    pub inventory: Vec<InventoryRow>,
    pub piece_count: PieceCount,
    pub assembly: Assembly,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seam_map: Option<Vec<SeamMapRow>>,
    pub cancelled: bool,
}

const MANIFEST_VERSION: &str = "2.0";

/// Builds the manifest (C7) from the placements vector: a pure function of
/// `bricks`, `seam_map`, and the catalogue (§3 "Lifecycle").
pub fn build_manifest(catalogue: &Catalogue, bricks: &[PlacedBrick], seam_map: Vec<SeamMapEntry>, cancelled: bool) -> Manifest {
    let mut sorted: Vec<&PlacedBrick> = bricks.iter().collect();
    // §3 invariant 7: deterministic (z, y, x, part) order.
    sorted.sort_by(|a, b| {
        a.origin.2
            .cmp(&b.origin.2)
            .then(a.origin.1.cmp(&b.origin.1))
            .then(a.origin.0.cmp(&b.origin.0))
            .then(a.part_id.cmp(&b.part_id))
    });

    let mut brick_records = Vec::with_capacity(sorted.len());
    let mut voxel_coverage = Vec::new();
    let mut layers: BTreeMap<String, u32> = BTreeMap::new();
    let mut quantities: BTreeMap<(String, ColourId), u32> = BTreeMap::new();

    for (index, brick) in sorted.iter().enumerate() {
        let brick_id = index as u32;
        let (x, y, z) = brick.origin;
        let (w, d) = brick.footprint;
        let h = brick.height;

        let part = catalogue.part(&brick.part_id);
        let lego_type = part.map(lego_type_of).unwrap_or_else(|| brick.part_id.clone());
        let colour = catalogue.colour(brick.colour);
        let color_info = ColorInfo {
            name: colour.map(|c| c.display_name.clone()).unwrap_or_else(|| "Unknown".into()),
            hex: colour.map(|c| c.rgb.to_hex()).unwrap_or_else(|| "#ffffff".into()),
        };

        let mut coverage = Vec::with_capacity((w * d * h) as usize);
        for dx in 0..w as i32 {
            for dy in 0..d as i32 {
                for dz in 0..h as i32 {
                    let voxel = [x + dx, y + dy, z + dz];
                    coverage.push(voxel);
                    voxel_coverage.push(VoxelCoverageEntry {
                        voxel,
                        brick_id,
                        part_id: brick.part_id.clone(),
                        lego_type: lego_type.clone(),
                    });
                }
            }
        }

        brick_records.push(BrickRecord {
            brick_id,
            part_id: brick.part_id.clone(),
            lego_type,
            position: Position {
                studs: [x, y, z],
                mm: [x as f64 * STUD_MM, y as f64 * STUD_MM, z as f64 * LAYER_MM],
            },
            dimensions: Dimensions {
                studs: [w, d, h],
                mm: [w as f64 * STUD_MM, d as f64 * STUD_MM, h as f64 * LAYER_MM],
            },
            rotation: brick.rotation.degrees(),
            color_id: brick.colour,
            color_info,
            vertices: cuboid_vertices(x, y, z, w, d, h),
            voxel_coverage: coverage,
            is_verified: brick.verified,
        });

        *layers.entry(z.to_string()).or_insert(0) += 1;
        *quantities.entry((brick.part_id.clone(), brick.colour)).or_insert(0) += 1;
    }

    let inventory = build_inventory(catalogue, &quantities);
    let piece_count = build_piece_count(catalogue, &inventory, sorted.len() as u32);
    let assembly = build_assembly(&brick_records);

    Manifest {
        manifest_version: MANIFEST_VERSION.to_string(),
        total_bricks: sorted.len() as u32,
        bricks: brick_records,
        voxel_coverage,
        layers,
        inventory,
        piece_count,
        assembly,
        seam_map: if seam_map.is_empty() {
            None
        } else {
            Some(
                seam_map
                    .into_iter()
                    .map(|entry| SeamMapRow { layer_z: entry.layer_z, x_position: entry.column_x, width: entry.width, covered_by: entry.covered_by })
                    .collect(),
            )
        },
        cancelled,
    }
}

/// Renders a human-readable shopping list from a built manifest's inventory
/// (§10.6, ported from the source domain's `generate_shopping_list`).
pub fn shopping_list(manifest: &Manifest) -> String {
    let mut out = String::new();
    out.push_str("LEGO Shopping List\n");
    out.push_str("==================\n");
    for row in &manifest.inventory {
        out.push_str(&format!("{:>4} x {} ({}) [{}]\n", row.quantity, row.lego_type, row.color_name, row.part_id));
    }
    out.push_str(&format!("\nTotal pieces: {}\n", manifest.piece_count.total_pieces));
    out.push_str(&format!("Estimated cost: ${:.2}\n", manifest.piece_count.estimated_cost));
    out
}

/// Renders the inventory as CSV (§10.6, ported from `generate_inventory_csv`).
pub fn inventory_csv(manifest: &Manifest) -> String {
    let mut out = String::from("part_id,lego_type,color_id,color_name,quantity\n");
    for row in &manifest.inventory {
        out.push_str(&format!("{},{},{},{},{}\n", row.part_id, row.lego_type, row.color_id, row.color_name, row.quantity));
    }
    out
}

// ====================
// PRIVATE FUNCTIONS
// ====================

fn lego_type_of(part: &Part) -> String {
    let category = match part.category {
        Category::Brick => "brick",
        Category::Plate => "plate",
        Category::Tile => "tile",
        Category::Slope => "slope",
        Category::Hinge => "hinge",
        Category::Baseplate => "baseplate",
    };
    format!("{category}_{}x{}", part.width, part.depth)
}

/// The eight corners of the axis-aligned mm cuboid, bottom face CCW then top
/// face CCW (§4.7).
fn cuboid_vertices(x: i32, y: i32, z: i32, w: u32, d: u32, h: u32) -> Vec<[f64; 3]> {
    let x0 = x as f64 * STUD_MM;
    let y0 = y as f64 * STUD_MM;
    let z0 = z as f64 * LAYER_MM;
    let x1 = (x + w as i32) as f64 * STUD_MM;
    let y1 = (y + d as i32) as f64 * STUD_MM;
    let z1 = (z + h as i32) as f64 * LAYER_MM;
    vec![
        [x0, y0, z0],
        [x1, y0, z0],
        [x1, y1, z0],
        [x0, y1, z0],
        [x0, y0, z1],
        [x1, y0, z1],
        [x1, y1, z1],
        [x0, y1, z1],
    ]
}

fn build_inventory(catalogue: &Catalogue, quantities: &BTreeMap<(String, ColourId), u32>) -> Vec<InventoryRow> {
    quantities
        .iter()
        .map(|((part_id, colour_id), &quantity)| {
            let part = catalogue.part(part_id);
            let colour = catalogue.colour(*colour_id);
            InventoryRow {
                part_id: part_id.clone(),
                lego_type: part.map(lego_type_of).unwrap_or_else(|| part_id.clone()),
                color_id: *colour_id,
                color_name: colour.map(|c| c.display_name.clone()).unwrap_or_else(|| "Unknown".into()),
                quantity,
            }
        })
        .collect()
}

fn build_piece_count(catalogue: &Catalogue, inventory: &[InventoryRow], total: u32) -> PieceCount {
    let raw_cost: f64 = inventory
        .iter()
        .map(|row| {
            let unit_cost = catalogue.part(&row.part_id).map(|p| p.unit_cost).unwrap_or(0.0);
            unit_cost * row.quantity as f64
        })
        .sum();

    PieceCount {
        total_pieces: total,
        total_unique: inventory.len() as u32,
        breakdown: inventory.to_vec(),
        estimated_cost: (raw_cost * 100.0).round() / 100.0,
    }
}

fn build_assembly(bricks: &[BrickRecord]) -> Assembly {
    let mut by_layer: BTreeMap<i32, Vec<&BrickRecord>> = BTreeMap::new();
    for brick in bricks {
        by_layer.entry(brick.position.studs[2]).or_default().push(brick);
    }

    let mut steps = Vec::new();
    for (step_index, (&z, layer_bricks)) in by_layer.iter().enumerate() {
        let mut sorted_bricks = layer_bricks.clone();
        sorted_bricks.sort_by(|a, b| a.position.studs[0].cmp(&b.position.studs[0]).then(a.position.studs[1].cmp(&b.position.studs[1])));

        let mut histogram: BTreeMap<(String, ColourId), (String, String, u32)> = BTreeMap::new();
        for brick in &sorted_bricks {
            let entry = histogram
                .entry((brick.part_id.clone(), brick.color_id))
                .or_insert_with(|| (brick.lego_type.clone(), brick.color_info.name.clone(), 0));
            entry.2 += 1;
        }

        let parts_needed = histogram
            .into_iter()
            .map(|((part_id, color_id), (lego_type, color_name, quantity))| InventoryRow { part_id, lego_type, color_id, color_name, quantity })
            .collect();

        steps.push(AssemblyStep {
            step: step_index as u32 + 1,
            layer_z: z,
            parts_needed,
            bricks: sorted_bricks.iter().map(|b| b.brick_id).collect(),
        });
    }

    let total = bricks.len() as u32;
    let difficulty = if total < 50 {
        "easy"
    } else if total < 150 {
        "medium"
    } else {
        "hard"
    };
    let estimated_time_minutes = ((3 * total as u32 + 59) / 60).max(5);

    Assembly {
        total_steps: steps.len() as u32,
        difficulty: difficulty.to_string(),
        estimated_time_minutes,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rotation;

    fn brick(part_id: &str, x: i32, y: i32, z: i32, w: u32, d: u32) -> PlacedBrick {
        PlacedBrick { part_id: part_id.into(), origin: (x, y, z), rotation: Rotation::Deg0, colour: 2, verified: true, footprint: (w, d), height: 1 }
    }

    #[test]
    fn manifest_counts_and_sorts_bricks_deterministically() {
        let catalogue = Catalogue::builtin();
        let bricks = vec![brick("3001", 2, 0, 0, 4, 2), brick("3001", 0, 0, 0, 4, 2)];
        let manifest = build_manifest(&catalogue, &bricks, Vec::new(), false);

        assert_eq!(manifest.total_bricks, 2);
        assert_eq!(manifest.bricks[0].position.studs, [0, 0, 0]);
        assert_eq!(manifest.bricks[1].position.studs, [2, 0, 0]);
    }

    #[test]
    fn inventory_groups_by_part_and_colour() {
        let catalogue = Catalogue::builtin();
        let bricks = vec![brick("3001", 0, 0, 0, 4, 2), brick("3001", 4, 0, 0, 4, 2)];
        let manifest = build_manifest(&catalogue, &bricks, Vec::new(), false);

        assert_eq!(manifest.inventory.len(), 1);
        assert_eq!(manifest.inventory[0].quantity, 2);
    }

    #[test]
    fn vertices_has_eight_corners_in_mm() {
        let catalogue = Catalogue::builtin();
        let bricks = vec![brick("3001", 0, 0, 0, 4, 2)];
        let manifest = build_manifest(&catalogue, &bricks, Vec::new(), false);

        assert_eq!(manifest.bricks[0].vertices.len(), 8);
        assert_eq!(manifest.bricks[0].vertices[0], [0.0, 0.0, 0.0]);
        assert_eq!(manifest.bricks[0].vertices[2], [4.0 * STUD_MM, 2.0 * STUD_MM, 0.0]);
    }

    #[test]
    fn difficulty_band_reflects_total_brick_count() {
        let catalogue = Catalogue::builtin();
        let bricks: Vec<PlacedBrick> = (0..60).map(|i| brick("3005", i, 0, 0, 1, 1)).collect();
        let manifest = build_manifest(&catalogue, &bricks, Vec::new(), false);
        assert_eq!(manifest.assembly.difficulty, "medium");
    }

    #[test]
    fn shopping_list_includes_total_cost() {
        let catalogue = Catalogue::builtin();
        let bricks = vec![brick("3001", 0, 0, 0, 4, 2)];
        let manifest = build_manifest(&catalogue, &bricks, Vec::new(), false);
        let text = shopping_list(&manifest);
        assert!(text.contains("Estimated cost"));
    }

    #[test]
    fn inventory_csv_has_header_row() {
        let catalogue = Catalogue::builtin();
        let bricks = vec![brick("3001", 0, 0, 0, 4, 2)];
        let manifest = build_manifest(&catalogue, &bricks, Vec::new(), false);
        let csv = inventory_csv(&manifest);
        assert!(csv.starts_with("part_id,lego_type,color_id,color_name,quantity"));
    }
}
