use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

// This crate uses x, y, and z coordinate axes matching the LEGO stud lattice: x and y
// are the horizontal in-plane axes of a single layer, and z is the vertical layer index,
// increasing upward. This matches the source domain's own axis convention rather than
// any particular 3D file format's (LDraw inverts y relative to this; see ldraw.rs).

// ====================
// PUBLIC TYPE ALIASES
// ====================

/// Dense index into the catalogue's colour table.
pub type ColourId = u32;

// ====================
// PUBLIC STRUCTS
// ====================

/// A single input lattice point with its source colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Voxel {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub colour: Rgb,
}

/// 24-bit colour triple. `Display`/`FromStr` round-trip through the canonical
/// lowercase `#rrggbb` hex form used at the input/output boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Rgb { red, green, blue }
    }

    /// Opaque grey, the fallback colour for malformed hex input (§4.1).
    pub const FALLBACK: Rgb = Rgb::new(255, 255, 255);

    /// Parses a `#rrggbb` or `rrggbb` hex string, case-insensitively. Returns
    /// `None` (rather than erroring) so callers can apply the §4.1 grey-fallback
    /// policy and record a diagnostic instead of failing the whole pack.
    pub fn parse_hex(s: &str) -> Option<Rgb> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 {
            return None;
        }
        let red = u8::from_str_radix(&s[0..2], 16).ok()?;
        let green = u8::from_str_radix(&s[2..4], 16).ok()?;
        let blue = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Rgb::new(red, green, blue))
    }

    /// Canonical lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// A row of the part catalogue (C2): footprint, height, category, and cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub part_id: String,
    pub width: u32,
    pub depth: u32,
    pub height: u32,
    pub display_name: String,
    pub category: Category,
    pub unit_cost: f64,
}

impl Part {
    pub fn area(&self) -> u32 {
        self.width * self.depth
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Brick,
    Plate,
    Tile,
    Slope,
    Hinge,
    Baseplate,
}

impl Category {
    /// Tiebreaker used by the candidate ordering (§4.4) when two parts tie on
    /// footprint area: tile > brick > plate > slope > hinge, lower value first.
    /// It never overrides area — a smaller-area tile does not outrank a
    /// larger-area brick. Baseplate never appears as a packer candidate (it is
    /// not a unit covering part) and is given the lowest priority for completeness.
    pub fn priority(self) -> u8 {
        match self {
            Category::Tile => 0,
            Category::Brick => 1,
            Category::Plate => 2,
            Category::Slope => 3,
            Category::Hinge => 4,
            Category::Baseplate => 5,
        }
    }
}

/// A row of the catalogue's colour table: a dense id, display name, and RGB,
/// plus the parallel LDraw colour id used by the LDraw exporter (§4.7).
#[derive(Clone, Debug, PartialEq)]
pub struct PaletteColour {
    pub id: ColourId,
    pub display_name: String,
    pub rgb: Rgb,
    pub ldraw_id: u16,
}

/// Quarter-turn rotation about the vertical axis. `Deg180`/`Deg270` are
/// equivalent to `Deg0`/`Deg90` for axis-aligned rectangular footprint
/// placement but are recorded verbatim for downstream consumers (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u16)]
pub enum Rotation {
    Deg0 = 0,
    Deg90 = 90,
    Deg180 = 180,
    Deg270 = 270,
}

impl Rotation {
    /// Whether this rotation swaps width and depth for footprint purposes.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    pub fn degrees(self) -> u16 {
        self as u16
    }
}

/// One placed brick: a part, its minimum-corner origin, rotation, colour, and
/// whether the availability oracle confirmed it (§3 invariant 4).
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedBrick {
    pub part_id: String,
    pub origin: (i32, i32, i32),
    pub rotation: Rotation,
    pub colour: ColourId,
    pub verified: bool,
    /// Effective footprint after rotation is applied: `(w, d)`.
    pub footprint: (u32, u32),
    pub height: u32,
}

impl PlacedBrick {
    /// The half-open stud span this brick occupies on its own layer:
    /// `[x, x+w) x [y, y+d)` (§3).
    pub fn footprint_span(&self) -> (i32, i32, i32, i32) {
        let (x, y, _) = self.origin;
        let (w, d) = self.footprint;
        (x, y, x + w as i32, y + d as i32)
    }
}

/// Per-layer occupancy: which `(x, y)` studs are already claimed by a brick.
#[derive(Clone, Debug, Default)]
pub struct OccupancyGrid {
    filled: BTreeSet<(i32, i32)>,
}

impl OccupancyGrid {
    pub fn is_filled(&self, x: i32, y: i32) -> bool {
        self.filled.contains(&(x, y))
    }

    pub fn fill(&mut self, x: i32, y: i32) {
        self.filled.insert((x, y));
    }

    pub fn len(&self) -> usize {
        self.filled.len()
    }
}

/// Per-layer set of integer x-columns where a brick edge lies (§3).
pub type SeamSet = BTreeSet<i32>;

/// A diagnostic seam-map row (C8): whether the next layer bridges a seam column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeamMapEntry {
    pub layer_z: i32,
    pub column_x: i32,
    pub width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub covered_by: Option<String>,
}

/// Diagnostics recorded during packing that never fail the run but are surfaced
/// for inspection (relaxations, degraded oracle calls, malformed colour input).
#[derive(Clone, Debug, Default)]
pub struct PackDiagnostics {
    /// `(layer z, colour id)` pairs for which parity was relaxed (§4.5 edge case).
    pub parity_relaxed: Vec<(i32, ColourId)>,
    /// Hex strings that failed to parse and fell back to grey (§4.1).
    pub malformed_colours: Vec<String>,
    /// Set once any oracle call returned `unknown` during the run (§4.3/§7).
    pub oracle_degraded: bool,
}
