//! Property-based generators for size values and size strings.

use proptest::prelude::*;
use relsize_core::{
    DatabaseId, FileNumber, Fork, ObjectLocator, TablespaceId, SIZE_UNITS, UNIT_ALIASES,
};

/// Strategy over byte counts weighted toward the interesting ranges:
/// full-range values, small values around zero, and values near unit
/// transition thresholds.
pub fn byte_count_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        3 => any::<i64>(),
        2 => -(20 * 1024_i64)..(20 * 1024),
        2 => boundary_byte_count_strategy(),
    ]
}

/// Byte counts within a couple of bytes of each unit transition.
pub fn boundary_byte_count_strategy() -> impl Strategy<Value = i64> {
    (0u32..5, -2_i64..3).prop_map(|(unit, delta)| (10 * 1024_i64 << (10 * unit)) + delta)
}

/// Unit spellings the parser accepts, with random case noise.
pub fn unit_spelling_strategy() -> impl Strategy<Value = String> {
    let names: Vec<String> = SIZE_UNITS
        .iter()
        .map(|unit| unit.name.to_string())
        .chain(UNIT_ALIASES.iter().map(|alias| alias.alias.to_string()))
        .collect();
    (prop::sample::select(names), any::<u32>()).prop_map(|(name, mask)| {
        name.chars()
            .enumerate()
            .map(|(index, c)| {
                if mask & (1 << (index % 32)) != 0 {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    })
}

/// Well-formed parser inputs: a fractional number, optional spacing,
/// and a unit.
pub fn size_text_strategy() -> impl Strategy<Value = String> {
    (
        any::<i32>(),
        0u32..100,
        prop::sample::select(vec!["", " ", "  "]),
        unit_spelling_strategy(),
    )
        .prop_map(|(int, frac, gap, unit)| format!("{int}.{frac:02}{gap}{unit}"))
}

/// Locators for ordinary per-database objects.
pub fn locator_strategy() -> impl Strategy<Value = ObjectLocator> {
    (1u32..100, 1u32..100, 1u32..100_000).prop_map(|(tablespace, database, file_number)| {
        ObjectLocator::new(
            TablespaceId::new(tablespace),
            DatabaseId::new(database),
            FileNumber::new(file_number),
        )
    })
}

/// Uniform choice over the four forks.
pub fn fork_strategy() -> impl Strategy<Value = Fork> {
    prop::sample::select(Fork::ALL.to_vec())
}

/// Proptest configuration sized for CI runs.
#[must_use]
pub fn ci_proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        max_shrink_iters: 500,
        ..ProptestConfig::default()
    }
}
