/// Level reached with `experience` points: `floor((sqrt(2500 + 200 * xp) - 50) / 100)`.
///
/// Evaluated with an exact integer square root, so the result never depends on
/// floating-point rounding.
#[must_use]
pub fn level_for_experience(experience: u32) -> u32 {
    let root = integer_sqrt(2_500 + 200 * u64::from(experience));
    u32::try_from((root - 50) / 100).unwrap_or(u32::MAX)
}

/// Points still missing to reach `level + 1`: `50 * (level + 1) * (level + 2) - xp`.
#[must_use]
pub fn until_next_level(level: u32, experience: u32) -> u32 {
    let next = u64::from(level) + 1;
    let threshold = 50 * next * (next + 1);
    u32::try_from(threshold.saturating_sub(u64::from(experience))).unwrap_or(u32::MAX)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn integer_sqrt(value: u64) -> u64 {
    let mut root = (value as f64).sqrt() as u64;
    while root * root > value {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= value {
        root += 1;
    }
    root
}
