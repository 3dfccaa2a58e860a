//! Cost Calculator

use super::pricing::builtin_table;

/// USD cost of one exchange using the built-in pricing table.
///
/// `cost = in/1e6 * input_rate + out/1e6 * output_rate`; an unknown vendor
/// costs nothing.
#[must_use]
pub fn calculate_cost(input_tokens: u64, output_tokens: u64, model: &str, vendor: &str) -> f64 {
    builtin_table()
        .lookup(model, vendor)
        .calculate_cost(input_tokens, output_tokens)
}
