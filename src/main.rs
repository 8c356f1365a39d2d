use std::fs;
use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use lego_pack::catalogue::Catalogue;
use lego_pack::objects::HardcodedObjectIndex;
use lego_pack::oracle::{CachingOracle, SkipAvailabilityOracle};
use lego_pack::{config, ldraw, logging, manifest, pack, PackRequest};

/// Packs a coloured voxel field into a LEGO-style brick manifest.
#[derive(Parser, Debug)]
#[command(name = "pack")]
struct Cli {
    /// Path to the input voxel JSON.
    #[arg(long)]
    input: PathBuf,

    /// Path to write the output manifest JSON.
    #[arg(long)]
    output: PathBuf,

    /// Skip the availability oracle entirely; every brick is unverified.
    #[arg(long)]
    skip_availability: bool,

    /// Also write an LDraw-style text export to this path.
    #[arg(long)]
    ldraw: Option<PathBuf>,

    /// Also write a human-readable shopping list to this path.
    #[arg(long)]
    shopping_list: Option<PathBuf>,

    /// Also write a part/colour/quantity inventory CSV to this path.
    #[arg(long)]
    inventory_csv: Option<PathBuf>,

    /// Object-type hint (desk, bed_base, shelf, generic) overriding the
    /// bounding-box heuristic.
    #[arg(long)]
    object_type: Option<String>,

    /// Append tracing output to this file in addition to stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Optional TOML catalogue overlay; defaults to the XDG config path.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_file.as_deref());

    match run(&cli) {
        Ok(()) => Ok(()),
        Err(err) => {
            let exit_code = err.chain().find_map(|cause| cause.downcast_ref::<lego_pack::error::PackError>()).map(|e| e.exit_code());
            eprintln!("{err:#}");
            match exit_code {
                Some(code) => std::process::exit(code),
                None => std::process::exit(1),
            }
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let input_text = fs::read_to_string(&cli.input).with_context(|| format!("reading {}", cli.input.display()))?;
    let mut request: PackRequest = serde_json::from_str(&input_text)
        .map_err(lego_pack::error::PackError::from)
        .with_context(|| format!("parsing {}", cli.input.display()))?;

    if cli.skip_availability {
        request.mode.skip_availability = Some(true);
    }
    if let Some(object_type) = &cli.object_type {
        request.hints.object_type = Some(object_type.clone());
    }

    let mut catalogue = Catalogue::builtin();
    if let Some(overlay) = config::load(cli.config.as_deref())? {
        catalogue.apply_overlay(&overlay);
    }
    let object_index = HardcodedObjectIndex::builtin();
    // A real network-backed oracle is an external collaborator (§1 Out of
    // scope); this binary has none wired in, so its default already degrades
    // to unknown/unverified, same as `--skip-availability`. An embedding
    // application uses `lego_pack::pack` directly with its own oracle.
    let oracle = CachingOracle::new(SkipAvailabilityOracle);

    let manifest = pack(request, &catalogue, &object_index, &oracle).with_context(|| format!("packing {}", cli.input.display()))?;

    let output_text = serde_json::to_string_pretty(&manifest).context("serializing manifest")?;
    fs::write(&cli.output, output_text).with_context(|| format!("writing {}", cli.output.display()))?;

    if let Some(ldraw_path) = &cli.ldraw {
        let ldraw_text = ldraw::render(&catalogue, &manifest_bricks(&manifest));
        fs::write(ldraw_path, ldraw_text).with_context(|| format!("writing {}", ldraw_path.display()))?;
    }

    if let Some(shopping_list_path) = &cli.shopping_list {
        let text = manifest::shopping_list(&manifest);
        fs::write(shopping_list_path, text).with_context(|| format!("writing {}", shopping_list_path.display()))?;
    }

    if let Some(inventory_csv_path) = &cli.inventory_csv {
        let text = manifest::inventory_csv(&manifest);
        fs::write(inventory_csv_path, text).with_context(|| format!("writing {}", inventory_csv_path.display()))?;
    }

    Ok(())
}

/// Reconstructs the placed-brick vector from a built manifest so the LDraw
/// exporter can run from a manifest already produced by [`pack`], without
/// requiring callers to keep the original placements vector around.
fn manifest_bricks(manifest: &manifest::Manifest) -> Vec<lego_pack::model::PlacedBrick> {
    manifest
        .bricks
        .iter()
        .map(|b| lego_pack::model::PlacedBrick {
            part_id: b.part_id.clone(),
            origin: (b.position.studs[0], b.position.studs[1], b.position.studs[2]),
            rotation: rotation_from_degrees(b.rotation),
            colour: b.color_id,
            verified: b.is_verified,
            footprint: (b.dimensions.studs[0], b.dimensions.studs[1]),
            height: b.dimensions.studs[2],
        })
        .collect()
}

fn rotation_from_degrees(degrees: u16) -> lego_pack::model::Rotation {
    match degrees {
        90 => lego_pack::model::Rotation::Deg90,
        180 => lego_pack::model::Rotation::Deg180,
        270 => lego_pack::model::Rotation::Deg270,
        _ => lego_pack::model::Rotation::Deg0,
    }
}
