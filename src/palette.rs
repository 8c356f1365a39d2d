use std::cell::RefCell;
use std::collections::HashMap;
use crate::catalogue::Catalogue;
use crate::error::PackError;
use crate::model::{ColourId, PackDiagnostics, Rgb};

/// Maps an RGB hex string to the nearest catalogue colour id (C1). Nearest
/// neighbour is squared Euclidean distance in plain sRGB space — not the
/// teacher's perceptual Lab/CIEDE2000 distance, which this spec has no need
/// for (§4.1 asks for squared Euclidean explicitly, with ties broken by the
/// lower colour id). Results are memoised by the exact input string.
pub struct PaletteMapper<'a> {
    catalogue: &'a Catalogue,
    cache: RefCell<HashMap<String, ColourId>>,
}

impl<'a> PaletteMapper<'a> {
    pub fn new(catalogue: &'a Catalogue) -> Result<Self, PackError> {
        if catalogue.colours().is_empty() {
            return Err(PackError::PaletteFailure);
        }
        Ok(PaletteMapper { catalogue, cache: RefCell::new(HashMap::new()) })
    }

    /// Resolves a hex string (any case, with or without `#`) to a colour id.
    /// Malformed input is treated as opaque grey and recorded as a diagnostic
    /// rather than failing the pack (§4.1).
    pub fn nearest(&self, hex: &str, diagnostics: &mut PackDiagnostics) -> ColourId {
        let key = hex.to_ascii_lowercase();
        if let Some(&id) = self.cache.borrow().get(&key) {
            return id;
        }

        let rgb = Rgb::parse_hex(&key).unwrap_or_else(|| {
            diagnostics.malformed_colours.push(hex.to_string());
            Rgb::FALLBACK
        });

        let id = self.nearest_rgb(rgb);
        self.cache.borrow_mut().insert(key, id);
        id
    }

    fn nearest_rgb(&self, rgb: Rgb) -> ColourId {
        self.catalogue
            .colours()
            .iter()
            .map(|c| (squared_distance(rgb, c.rgb), c.id))
            // min_by_key keeps the first minimum on ties, which is the lowest
            // id as long as the colour table is built in ascending id order.
            .min_by_key(|&(distance, _)| distance)
            .map(|(_, id)| id)
            .expect("colour table emptiness is rejected at construction")
    }
}

fn squared_distance(a: Rgb, b: Rgb) -> i32 {
    let dr = a.red as i32 - b.red as i32;
    let dg = a.green as i32 - b.green as i32;
    let db = a.blue as i32 - b.blue as i32;
    dr * dr + dg * dg + db * db
}
