/// Price value in quote currency
///
/// The simulator works in plain `f64`: all quoting and risk formulas are
/// continuous and the path is synthetic, so there is no tick grid to respect.
pub type Price = f64;

/// Quantity value in base units (signed for inventory)
pub type Quantity = f64;

/// Simulation step index (0-based)
pub type Step = usize;
