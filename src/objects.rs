/// Component archetypes the classifier distinguishes by aspect ratio and
/// area alone (§4.9, supplemented from the source domain's
/// `lego_objects_database.py`/`_classify_component_type`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectType {
    Desk,
    BedBase,
    Shelf,
    Generic,
}

impl ObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Desk => "desk",
            ObjectType::BedBase => "bed_base",
            ObjectType::Shelf => "shelf",
            ObjectType::Generic => "generic",
        }
    }

    pub fn parse(s: &str) -> Option<ObjectType> {
        match s {
            "desk" => Some(ObjectType::Desk),
            "bed_base" => Some(ObjectType::BedBase),
            "shelf" => Some(ObjectType::Shelf),
            "generic" => Some(ObjectType::Generic),
            _ => None,
        }
    }

    /// Derives an object type purely from bounding-box dimensions, used when
    /// the caller supplies no `hints.object_type` (§6, §4.9). This is always
    /// an ordering hint for C4's candidate list, never a pre-placement
    /// decision (§4.9's "never to pre-place bricks").
    pub fn classify(width: u32, depth: u32) -> ObjectType {
        let (long, short) = if width >= depth { (width, depth) } else { (depth, width) };
        let aspect_ratio = long as f64 / short.max(1) as f64;
        let area = width * depth;

        if short <= 2 && long >= 4 {
            ObjectType::Shelf
        } else if aspect_ratio >= 1.6 {
            ObjectType::Desk
        } else if area >= 96 {
            ObjectType::BedBase
        } else {
            ObjectType::Generic
        }
    }
}

/// One recipe entry: a preferred part ordering for an archetype matched
/// within ±1 stud of a bounding box (§4.9).
#[derive(Clone, Debug)]
pub struct Recipe {
    pub object_type: ObjectType,
    pub width: u32,
    pub depth: u32,
    /// Preferred part ids, in priority order.
    pub preferred_parts: Vec<String>,
}

/// Keyed by `(object_type, footprint_bucket)` (§4.9). Bucket matching is
/// exact-match first, then nearest within ±1 stud on both dimensions.
#[derive(Clone, Debug, Default)]
pub struct HardcodedObjectIndex {
    recipes: Vec<Recipe>,
}

impl HardcodedObjectIndex {
    pub fn new() -> Self {
        HardcodedObjectIndex { recipes: Vec::new() }
    }

    /// A small seed table of common archetypes, favouring large specialised
    /// bricks (2x4, 1x6) the way the source domain's `PRIORITY_BRICK_IDS`
    /// does for desk- and shelf-like components.
    pub fn builtin() -> Self {
        let mut index = HardcodedObjectIndex::new();
        index.recipes.push(Recipe {
            object_type: ObjectType::Desk,
            width: 8,
            depth: 4,
            preferred_parts: vec!["3001".into(), "3009".into(), "3003".into()],
        });
        index.recipes.push(Recipe {
            object_type: ObjectType::Shelf,
            width: 6,
            depth: 1,
            preferred_parts: vec!["3009".into(), "3004".into()],
        });
        index.recipes.push(Recipe {
            object_type: ObjectType::BedBase,
            width: 10,
            depth: 10,
            preferred_parts: vec!["3001".into(), "3003".into()],
        });
        index
    }

    /// Finds a recipe matching `object_type` whose footprint is within ±1
    /// stud of `(width, depth)` on both axes (§4.9 "approximate" match).
    pub fn lookup(&self, object_type: ObjectType, width: u32, depth: u32) -> Option<&Recipe> {
        self.recipes.iter().find(|r| {
            r.object_type == object_type
                && (r.width as i64 - width as i64).abs() <= 1
                && (r.depth as i64 - depth as i64).abs() <= 1
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_shallow_footprint_classifies_as_desk() {
        assert_eq!(ObjectType::classify(8, 4), ObjectType::Desk);
    }

    #[test]
    fn large_square_footprint_classifies_as_bed_base() {
        assert_eq!(ObjectType::classify(10, 10), ObjectType::BedBase);
    }

    #[test]
    fn thin_long_footprint_classifies_as_shelf() {
        assert_eq!(ObjectType::classify(6, 1), ObjectType::Shelf);
    }

    #[test]
    fn small_square_footprint_classifies_as_generic() {
        assert_eq!(ObjectType::classify(2, 2), ObjectType::Generic);
    }

    #[test]
    fn lookup_matches_within_one_stud_tolerance() {
        let index = HardcodedObjectIndex::builtin();
        let recipe = index.lookup(ObjectType::Desk, 9, 4).unwrap();
        assert_eq!(recipe.preferred_parts[0], "3001");
        assert!(index.lookup(ObjectType::Desk, 20, 20).is_none());
    }
}
