//! Conversions between joint and conditional word tables.
//!
//! A table of words of `n` symbols has `radix^n` cells, the first symbol in
//! the most significant digit. A *block* is a run of `radix` consecutive cells
//! sharing the same `n - 1` leading symbols.

use crate::types::ProbabilityTable;

/// Sums every block: order `k` joint to order `k - 1` joint over the prefix.
///
/// Total mass is conserved.
#[must_use]
pub fn marginalize_joint(joint: &[f64], radix: usize) -> ProbabilityTable {
    joint.chunks(radix).map(|block| block.iter().sum()).collect()
}

/// Normalizes every block of a joint table by its sum.
///
/// Blocks whose sum is zero stay zero. A trailing partial block is treated
/// as a block of its own.
#[must_use]
pub fn joint_to_conditional(joint: &[f64], radix: usize) -> ProbabilityTable {
    let mut conditional = Vec::with_capacity(joint.len());
    for block in joint.chunks(radix) {
        let sum: f64 = block.iter().sum();
        if sum > 0.0 {
            conditional.extend(block.iter().map(|p| p / sum));
        } else {
            conditional.extend(std::iter::repeat(0.0).take(block.len()));
        }
    }
    conditional
}

/// Raises a joint table by one symbol.
///
/// The mass of each word `w` is spread over the words `w x` following the
/// conditional table of the same order, looked up with the last symbols of
/// `w` as context. A context whose conditional block is all zero spreads the
/// mass uniformly over the `valid` symbols. `marginalize_joint` undoes this
/// exactly.
#[must_use]
pub fn elevate_joint(
    joint: &[f64],
    conditional: &[f64],
    radix: usize,
    valid: usize,
) -> ProbabilityTable {
    let context_cells = (conditional.len() / radix).max(1);
    let mut elevated = vec![0.0; joint.len() * radix];
    for (word, &mass) in joint.iter().enumerate() {
        if mass == 0.0 {
            continue;
        }
        let context = word % context_cells;
        let block = &conditional[context * radix..(context + 1) * radix];
        let target = &mut elevated[word * radix..(word + 1) * radix];
        if block.iter().sum::<f64>() > 0.0 {
            for (cell, &p) in target.iter_mut().zip(block) {
                *cell = mass * p;
            }
        } else {
            let share = mass / valid as f64;
            for cell in target.iter_mut().take(valid) {
                *cell = share;
            }
        }
    }
    elevated
}

/// Adds an older leading symbol carrying a uniform share of each word's mass.
#[must_use]
pub fn prepend_uniform(joint: &[f64], radix: usize, valid: usize) -> ProbabilityTable {
    let mut extended = vec![0.0; joint.len() * radix];
    let share = 1.0 / valid as f64;
    for first in 0..valid {
        let offset = first * joint.len();
        for (word, &mass) in joint.iter().enumerate() {
            extended[offset + word] = mass * share;
        }
    }
    extended
}

/// Sums out the leading symbol of every word.
#[must_use]
pub fn sum_out_oldest(joint: &[f64], radix: usize) -> ProbabilityTable {
    let suffix_cells = joint.len() / radix;
    let mut reduced = vec![0.0; suffix_cells];
    for chunk in joint.chunks(suffix_cells.max(1)) {
        for (cell, &mass) in reduced.iter_mut().zip(chunk) {
            *cell += mass;
        }
    }
    reduced
}

/// Divides a table by its total; a zero total leaves it unchanged.
pub fn normalize(table: &mut [f64]) {
    let total: f64 = table.iter().sum();
    if total > 0.0 {
        for cell in table.iter_mut() {
            *cell /= total;
        }
    }
}
