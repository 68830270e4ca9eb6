//! Daily challenge rotation
//!
//! One of the four core activities carries the daily bonus each day,
//! picked by hashing the day key so every client agrees without talking
//! to the server.

use moonlit_domain::model::event::ActivityKind;
use shared::DateKey;

const ROTATION: [ActivityKind; 4] = [
    ActivityKind::Story,
    ActivityKind::Grammar,
    ActivityKind::Math,
    ActivityKind::Writing,
];

/// Which activity grants the daily bonus today
pub fn daily_challenge(today: &DateKey) -> ActivityKind {
    ROTATION[hash(today.as_str()) as usize % ROTATION.len()]
}

// 31-bit string hash, kept bit-for-bit compatible with the historical
// client so the rotation doesn't jump on migration
fn hash(value: &str) -> u32 {
    let mut h: i32 = 0;
    for c in value.chars() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32);
    }
    h.unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_per_day() {
        let day = DateKey::from("2024-06-15");
        assert_eq!(daily_challenge(&day), daily_challenge(&day));
    }

    #[test]
    fn test_rotation_covers_all_activities() {
        let mut seen = std::collections::HashSet::new();
        for d in 1..=28 {
            let day = DateKey::new(format!("2024-02-{:02}", d));
            seen.insert(format!("{}", daily_challenge(&day)));
        }
        assert_eq!(seen.len(), ROTATION.len());
    }

    #[test]
    fn test_known_hash_value() {
        // "a" hashes to its char code
        assert_eq!(hash("a"), 97);
        // Empty string maps to the first rotation slot
        assert_eq!(hash(""), 0);
    }
}
