/// The `Value` enum, function values and the `str`/`repr` formatting rules.
pub mod core;

/// Hashable projections of values, used as dict keys and set members.
pub mod key;
