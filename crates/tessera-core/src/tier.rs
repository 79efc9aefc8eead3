#![forbid(unsafe_code)]

//! Weight classification.
//!
//! Maps a raw numeric weight with a wide dynamic range onto a small set of
//! discrete square edge lengths, so the packer only ever deals with a
//! tractable handful of tile sizes.

/// Decades subtracted from `ceil(log10(weight))` before clamping.
///
/// Calibrated for weights in the million-and-up range; a fixed policy
/// constant, never derived from the input.
pub const TIER_LOG_OFFSET: i64 = 5;

/// Classify a raw weight into an integer size tier (edge length in grid
/// units).
///
/// Zero, negative, and NaN weights classify as tier 1. Otherwise the tier
/// is `ceil(log10(weight)) - TIER_LOG_OFFSET`, clamped below by 1 and
/// above by `max_tier` when one is supplied.
///
/// Monotone: `w1 < w2` implies `classify(w1, cap) <= classify(w2, cap)`.
pub fn classify(raw_weight: f64, max_tier: Option<u32>) -> u32 {
    if !(raw_weight > 0.0) {
        return 1;
    }
    if !raw_weight.is_finite() {
        return max_tier.unwrap_or(u32::MAX).max(1);
    }

    let scale = raw_weight.log10().ceil() as i64 - TIER_LOG_OFFSET;
    let capped = match max_tier {
        Some(cap) => scale.min(i64::from(cap)),
        None => scale,
    };

    capped.max(1) as u32
}
