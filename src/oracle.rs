use std::cell::RefCell;
use std::collections::HashMap;
use crate::model::ColourId;

/// The three-valued verdict an oracle may return (§4.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
    Unknown,
}

/// `(part id, colour id) -> {true, false, unknown}` (§4.3, §6 "Collaborator
/// contracts"). A synchronous deployment implements this as a blocking call;
/// an asynchronous deployment would await it (§9 "Async-await mixing") — the
/// packer itself only ever calls the synchronous form, since §5 establishes
/// that the oracle is the sole suspension point and the rest of the packer
/// is pure CPU, so async callers are expected to block_on this trait rather
/// than the packer threading async through every layer.
pub trait AvailabilityOracle {
    fn is_available(&self, part_id: &str, colour_id: ColourId) -> Availability;
}

/// An oracle that always answers "available", used when the caller passes
/// `--skip-availability` (§6 CLI surface) or otherwise opts out of
/// verification. Bricks placed under this oracle are never `verified`,
/// matching §4.3's "unknown degrades to true, verified = false" rule.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkipAvailabilityOracle;

impl AvailabilityOracle for SkipAvailabilityOracle {
    fn is_available(&self, _part_id: &str, _colour_id: ColourId) -> Availability {
        Availability::Unknown
    }
}

/// Memoises another oracle's answers by `(part_id, colour_id)` (§4.3, §5
/// "write-once... unknown -> true/false promotion is permitted"). Wraps any
/// `AvailabilityOracle`, including a real HTTP-backed one outside this crate.
pub struct CachingOracle<O> {
    inner: O,
    cache: RefCell<HashMap<(String, ColourId), Availability>>,
}

impl<O: AvailabilityOracle> CachingOracle<O> {
    pub fn new(inner: O) -> Self {
        CachingOracle { inner, cache: RefCell::new(HashMap::new()) }
    }
}

impl<O: AvailabilityOracle> AvailabilityOracle for CachingOracle<O> {
    fn is_available(&self, part_id: &str, colour_id: ColourId) -> Availability {
        let key = (part_id.to_string(), colour_id);
        if let Some(&verdict) = self.cache.borrow().get(&key) {
            return verdict;
        }
        let verdict = self.inner.is_available(part_id, colour_id);
        self.cache.borrow_mut().insert(key, verdict);
        verdict
    }
}

/// A fixed-table oracle for tests (and for callers with a static allow/deny
/// list): answers `Available`/`Unavailable` for explicitly listed pairs and
/// `Unknown` for anything else, mirroring the degrade-on-no-answer behaviour
/// of the source domain's `RebrickableAPI.verify_part_availability` when no
/// API key is configured.
#[derive(Clone, Debug, Default)]
pub struct TableOracle {
    answers: HashMap<(String, ColourId), Availability>,
}

impl TableOracle {
    pub fn new() -> Self {
        TableOracle::default()
    }

    pub fn set(mut self, part_id: &str, colour_id: ColourId, availability: Availability) -> Self {
        self.answers.insert((part_id.to_string(), colour_id), availability);
        self
    }
}

impl AvailabilityOracle for TableOracle {
    fn is_available(&self, part_id: &str, colour_id: ColourId) -> Availability {
        self.answers
            .get(&(part_id.to_string(), colour_id))
            .copied()
            .unwrap_or(Availability::Unknown)
    }
}
