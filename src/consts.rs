//! VM parameters

/// Register count for the recipe interpreter.
///
/// Fixed at 8 in the canonical configuration; every operand index produced
/// by the wire codec must fall in `[0, REGISTER_COUNT)`.
pub const REGISTER_COUNT: usize = 8;
