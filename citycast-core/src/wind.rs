/// Upper bounds (exclusive, m/s) for Beaufort levels 0 through 11.
const BEAUFORT_LIMITS: [f64; 12] = [
    0.3, 1.6, 3.4, 5.5, 8.0, 10.8, 13.9, 17.2, 20.8, 24.5, 28.5, 32.7,
];

/// Converts a wind velocity in m/s to a Beaufort level in `0..=12`.
///
/// Total over all inputs; NaN and negative speeds land on level 0.
pub fn beaufort_level(mps: f64) -> u8 {
    if mps.is_nan() {
        return 0;
    }
    BEAUFORT_LIMITS
        .iter()
        .position(|&limit| mps < limit)
        .unwrap_or(BEAUFORT_LIMITS.len()) as u8
}
