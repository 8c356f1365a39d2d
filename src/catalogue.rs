use crate::model::{Category, PaletteColour, Part, Rgb};

// ====================
// PUBLIC CONSTANTS
// ====================

/// Millimetres per stud, in-plane (§4.2).
pub const STUD_MM: f64 = 8.0;

/// Millimetres per layer, vertical (§4.2).
pub const LAYER_MM: f64 = 9.6;

// ====================
// PUBLIC STRUCTS
// ====================

/// The immutable part and colour tables loaded at process start (C2).
/// Read-only after construction (§5's "shared-resource policy").
#[derive(Clone, Debug)]
pub struct Catalogue {
    parts: Vec<Part>,
    colours: Vec<PaletteColour>,
}

impl Catalogue {
    /// The built-in seed catalogue: five parts grounded in the source domain's
    /// own fallback part list (`_get_fallback_parts`/`brick_dimensions` in the
    /// original `master_builder.py`), plus a 1x1 plate and 2x2 tile to give C4's
    /// category-priority ordering something to differentiate beyond bricks.
    pub fn builtin() -> Self {
        let parts = vec![
            Part {
                part_id: "3001".into(),
                width: 4,
                depth: 2,
                height: 1,
                display_name: "Brick 2 x 4".into(),
                category: Category::Brick,
                unit_cost: 0.10,
            },
            Part {
                part_id: "3009".into(),
                width: 6,
                depth: 1,
                height: 1,
                display_name: "Brick 1 x 6".into(),
                category: Category::Brick,
                unit_cost: 0.08,
            },
            Part {
                part_id: "3003".into(),
                width: 2,
                depth: 2,
                height: 1,
                display_name: "Brick 2 x 2".into(),
                category: Category::Brick,
                unit_cost: 0.06,
            },
            Part {
                part_id: "3004".into(),
                width: 2,
                depth: 1,
                height: 1,
                display_name: "Brick 1 x 2".into(),
                category: Category::Brick,
                unit_cost: 0.04,
            },
            Part {
                part_id: "3005".into(),
                width: 1,
                depth: 1,
                height: 1,
                display_name: "Brick 1 x 1".into(),
                category: Category::Brick,
                unit_cost: 0.03,
            },
            Part {
                part_id: "3068".into(),
                width: 2,
                depth: 2,
                height: 1,
                display_name: "Tile 2 x 2".into(),
                category: Category::Tile,
                unit_cost: 0.05,
            },
            Part {
                part_id: "3070".into(),
                width: 1,
                depth: 1,
                height: 1,
                display_name: "Tile 1 x 1".into(),
                category: Category::Tile,
                unit_cost: 0.02,
            },
        ];
        let colours = builtin_colours();
        Catalogue { parts, colours }
    }

    /// Builds a catalogue from an explicit parts/colours table, bypassing
    /// the built-in seed set entirely. Used by callers that need a
    /// deliberately incomplete catalogue (e.g. testing §7's
    /// `CatalogueFailure` when no 1x1 unit is present).
    pub fn with_parts(parts: Vec<Part>, colours: Vec<PaletteColour>) -> Self {
        Catalogue { parts, colours }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn colours(&self) -> &[PaletteColour] {
        &self.colours
    }

    pub fn part(&self, part_id: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.part_id == part_id)
    }

    pub fn colour(&self, id: crate::model::ColourId) -> Option<&PaletteColour> {
        self.colours.iter().find(|c| c.id == id)
    }

    /// The smallest-footprint part (by area, ties broken by id), used by C5's
    /// final fallback pass. `None` only if the catalogue has no parts at all.
    pub fn smallest_part(&self) -> Option<&Part> {
        self.parts
            .iter()
            .min_by_key(|p| (p.area(), p.part_id.clone()))
    }

    /// Test-only constructor for exercising the palette mapper's
    /// empty-colour-table failure path (§4.1, §7 `PaletteFailure`).
    #[cfg(test)]
    pub fn empty_colours_for_test() -> Self {
        Catalogue { parts: Catalogue::builtin().parts, colours: Vec::new() }
    }

    /// Applies a config-file overlay (§10.3): additional parts are appended
    /// (an id collision replaces the built-in row), unit costs may be
    /// overridden independently of adding new parts.
    pub fn apply_overlay(&mut self, overlay: &crate::config::CatalogueOverlay) {
        for extra in &overlay.parts {
            if let Some(existing) = self.parts.iter_mut().find(|p| p.part_id == extra.part_id) {
                *existing = extra.clone();
            } else {
                self.parts.push(extra.clone());
            }
        }
        for entry in &overlay.unit_costs {
            if let Some(existing) = self.parts.iter_mut().find(|p| p.part_id == entry.part_id) {
                existing.unit_cost = entry.unit_cost;
            }
        }
    }
}

/// The built-in colour table: a small, ordered set of common LEGO colours
/// grounded in the source domain's `color_map`/`_get_fallback_colors` tables,
/// each carrying the matching official LDraw colour code used by the exporter.
fn builtin_colours() -> Vec<PaletteColour> {
    vec![
        PaletteColour { id: 0, display_name: "Black".into(), rgb: Rgb::new(0x1b, 0x1b, 0x1b), ldraw_id: 0 },
        PaletteColour { id: 1, display_name: "White".into(), rgb: Rgb::new(0xff, 0xff, 0xff), ldraw_id: 15 },
        PaletteColour { id: 2, display_name: "Red".into(), rgb: Rgb::new(0xc9, 0x1a, 0x09), ldraw_id: 4 },
        PaletteColour { id: 3, display_name: "Blue".into(), rgb: Rgb::new(0x00, 0x55, 0xbf), ldraw_id: 1 },
        PaletteColour { id: 4, display_name: "Green".into(), rgb: Rgb::new(0x23, 0x78, 0x41), ldraw_id: 2 },
        PaletteColour { id: 5, display_name: "Yellow".into(), rgb: Rgb::new(0xf2, 0xcd, 0x37), ldraw_id: 14 },
        PaletteColour { id: 6, display_name: "Orange".into(), rgb: Rgb::new(0xff, 0x7c, 0x00), ldraw_id: 25 },
        PaletteColour { id: 7, display_name: "Tan".into(), rgb: Rgb::new(0xd4, 0xa5, 0x74), ldraw_id: 19 },
        PaletteColour { id: 8, display_name: "Dark Tan".into(), rgb: Rgb::new(0x99, 0x66, 0x33), ldraw_id: 69 },
        PaletteColour { id: 9, display_name: "Light Gray".into(), rgb: Rgb::new(0xc0, 0xc0, 0xc0), ldraw_id: 71 },
        PaletteColour { id: 10, display_name: "Dark Gray".into(), rgb: Rgb::new(0x60, 0x5a, 0x52), ldraw_id: 72 },
        PaletteColour { id: 11, display_name: "Brown".into(), rgb: Rgb::new(0x58, 0x39, 0x27), ldraw_id: 8 },
        PaletteColour { id: 12, display_name: "Pink".into(), rgb: Rgb::new(0xff, 0x69, 0xb4), ldraw_id: 9 },
    ]
}
