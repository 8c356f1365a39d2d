//! Round-trips a packing request through `--input`/`--output`-shaped files
//! (§10.5), exercising the same JSON boundary `main.rs` drives, using
//! `tempfile` rather than fixture files on disk.

use std::fs;
use lego_pack::catalogue::Catalogue;
use lego_pack::objects::HardcodedObjectIndex;
use lego_pack::oracle::SkipAvailabilityOracle;
use lego_pack::{ldraw, manifest, pack, PackRequest};
use tempfile::NamedTempFile;

fn voxel_json(x: i32, y: i32, z: i32, hex: &str) -> String {
    format!(r#"{{"x":{x},"y":{y},"z":{z},"hex_color":"{hex}"}}"#)
}

#[test]
fn input_file_round_trips_through_output_file() {
    let input_file = NamedTempFile::new().unwrap();
    let voxels = vec![
        voxel_json(0, 0, 0, "#ff0000"),
        voxel_json(1, 0, 0, "#ff0000"),
        voxel_json(0, 1, 0, "#ff0000"),
        voxel_json(1, 1, 0, "#ff0000"),
    ];
    let input_text = format!(r#"{{"voxels":[{}]}}"#, voxels.join(","));
    fs::write(input_file.path(), &input_text).unwrap();

    let read_back = fs::read_to_string(input_file.path()).unwrap();
    let request: PackRequest = serde_json::from_str(&read_back).unwrap();

    let catalogue = Catalogue::builtin();
    let object_index = HardcodedObjectIndex::builtin();
    let oracle = SkipAvailabilityOracle;
    let built = pack(request, &catalogue, &object_index, &oracle).unwrap();

    let output_file = NamedTempFile::new().unwrap();
    let output_text = serde_json::to_string_pretty(&built).unwrap();
    fs::write(output_file.path(), &output_text).unwrap();

    let reloaded: manifest::Manifest = serde_json::from_str(&fs::read_to_string(output_file.path()).unwrap()).unwrap();
    assert_eq!(reloaded.total_bricks, 1);
    assert_eq!(reloaded.manifest_version, "2.0");
    assert!(!reloaded.bricks[0].is_verified);
}

#[test]
fn ldraw_export_file_is_parseable_back_into_the_same_placements() {
    let catalogue = Catalogue::builtin();
    let object_index = HardcodedObjectIndex::builtin();
    let oracle = SkipAvailabilityOracle;
    let request: PackRequest = serde_json::from_str(&format!(
        r#"{{"voxels":[{},{},{},{}]}}"#,
        voxel_json(0, 0, 0, "#ffffff"),
        voxel_json(1, 0, 0, "#ffffff"),
        voxel_json(2, 0, 0, "#ffffff"),
        voxel_json(3, 0, 0, "#ffffff"),
    ))
    .unwrap();
    let built = pack(request, &catalogue, &object_index, &oracle).unwrap();

    let placements: Vec<lego_pack::model::PlacedBrick> = built
        .bricks
        .iter()
        .map(|b| lego_pack::model::PlacedBrick {
            part_id: b.part_id.clone(),
            origin: (b.position.studs[0], b.position.studs[1], b.position.studs[2]),
            rotation: lego_pack::model::Rotation::Deg0,
            colour: b.color_id,
            verified: b.is_verified,
            footprint: (b.dimensions.studs[0], b.dimensions.studs[1]),
            height: b.dimensions.studs[2],
        })
        .collect();

    let ldraw_file = NamedTempFile::new().unwrap();
    let ldraw_text = ldraw::render(&catalogue, &placements);
    fs::write(ldraw_file.path(), &ldraw_text).unwrap();

    let reloaded = fs::read_to_string(ldraw_file.path()).unwrap();
    for brick in &built.bricks {
        assert!(reloaded.contains(&format!("{}.dat", brick.part_id)));
    }
}
