//! Color-channel statistics for barcode sets.
//!
//! Two-channel sequencers read A/C and G/T nucleotides through different
//! optical channels; a set whose positions are dominated by one channel can
//! lose base-calling accuracy. Balance is summarized per position as the
//! percentage of barcodes carrying an A or C there.

/// Per-position percentage (0–100) of barcodes with an A or C nucleotide.
///
/// Returns an empty vector for an empty set.
pub fn channel_percentages<S: AsRef<str>>(barcodes: &[S]) -> Vec<f64> {
    let Some(first) = barcodes.first() else {
        return Vec::new();
    };
    let length = first.as_ref().len();
    let total = barcodes.len() as f64;

    (0..length)
        .map(|pos| {
            let ac = barcodes
                .iter()
                .filter(|b| {
                    matches!(
                        b.as_ref().as_bytes()[pos].to_ascii_uppercase(),
                        b'A' | b'C'
                    )
                })
                .count();
            100.0 * ac as f64 / total
        })
        .collect()
}

/// Mean absolute deviation of the channel percentages from the balanced
/// 50% mark. Zero for a perfectly balanced set; at most 50.
pub fn balance_deviation(percentages: &[f64]) -> f64 {
    if percentages.is_empty() {
        return 0.0;
    }
    percentages.iter().map(|p| (p - 50.0).abs()).sum::<f64>() / percentages.len() as f64
}
