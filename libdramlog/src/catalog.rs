//! The static bottle catalog
//!
//! Entries are fixed at compile time; events reference them by id.

use crate::types::Whisky;

/// Reference bottle volume used to express fractional bottle counts
pub const BOTTLE_UNIT_CL: u32 = 70;

/// Suggested granularity when entering volumes
pub const CL_STEP: u32 = 10;

const fn whisky(
    id: &'static str,
    name: &'static str,
    distillery: &'static str,
    region: &'static str,
) -> Whisky {
    Whisky {
        id,
        name,
        distillery,
        region,
        bottle_size_cl: BOTTLE_UNIT_CL,
    }
}

static WHISKIES: [Whisky; 12] = [
    whisky("lag-16", "Lagavulin 16 Year Old", "Lagavulin", "Islay"),
    whisky("tal-10", "Talisker 10 Year Old", "Talisker", "Isle of Skye"),
    whisky("oban-14", "Oban 14 Year Old", "Oban", "Highland"),
    whisky("dal-15", "Dalwhinnie 15 Year Old", "Dalwhinnie", "Highland"),
    whisky("ci-12", "Caol Ila 12 Year Old", "Caol Ila", "Islay"),
    whisky("mort-16", "Mortlach 16 Year Old", "Mortlach", "Speyside"),
    whisky("sing-12", "The Singleton of Dufftown 12", "Dufftown", "Speyside"),
    whisky("jw-black", "Johnnie Walker Black Label", "Johnnie Walker", "Blend"),
    whisky("jw-blue", "Johnnie Walker Blue Label", "Johnnie Walker", "Blend"),
    // id predates the switch to the 14 year old bottling
    whisky("cl-12", "Clynelish 14 Year Old", "Clynelish", "Highland"),
    whisky("crag-12", "Cragganmore 12 Year Old", "Cragganmore", "Speyside"),
    whisky("glend-12", "Glendullan 12 Year Old", "Glendullan", "Speyside"),
];

/// All catalog entries in display order
pub fn all() -> &'static [Whisky] {
    &WHISKIES
}

pub fn find(id: &str) -> Option<&'static Whisky> {
    WHISKIES.iter().find(|w| w.id == id)
}

pub fn contains(id: &str) -> bool {
    find(id).is_some()
}

/// Name to show for a whisky id, falling back to the id itself
pub fn display_name(id: &str) -> &str {
    find(id).map(|w| w.name).unwrap_or(id)
}

/// Convert a volume to a number of reference bottles
pub fn bottles(cl: u64) -> f64 {
    cl as f64 / f64::from(BOTTLE_UNIT_CL)
}

pub fn format_bottles(cl: u64) -> String {
    format!("{:.2}", bottles(cl))
}
