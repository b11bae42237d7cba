//! Reference tables for levelling and experience awards.

use crate::traits::TraitValue;

/// Minimum experience for each character level, level 1 first.
pub const EXPERIENCE_PER_LEVEL: [i64; 20] = [
    0, 300, 900, 2_700, 6_500, 14_000, 23_000, 34_000, 48_000, 64_000, 85_000, 100_000, 120_000,
    140_000, 165_000, 195_000, 225_000, 265_000, 305_000, 355_000,
];

pub const MAX_LEVEL: u32 = EXPERIENCE_PER_LEVEL.len() as u32;

/// Experience awarded for defeating a creature of each challenge rating.
pub const CHALLENGE_RATING_EXPERIENCE: &[(&str, i64)] = &[
    ("0", 10),
    ("1/8", 25),
    ("1/4", 50),
    ("1/2", 100),
    ("1", 200),
    ("2", 450),
    ("3", 700),
    ("4", 1_100),
    ("5", 1_800),
    ("6", 2_300),
    ("7", 2_900),
    ("8", 3_900),
    ("9", 5_000),
    ("10", 5_900),
    ("11", 7_200),
    ("12", 8_400),
    ("13", 10_000),
    ("14", 11_500),
    ("15", 13_000),
    ("16", 15_000),
    ("17", 18_000),
    ("18", 20_000),
    ("19", 22_000),
    ("20", 25_000),
    ("21", 33_000),
    ("22", 41_000),
    ("23", 50_000),
    ("24", 62_000),
    ("25", 75_000),
    ("26", 90_000),
    ("27", 105_000),
    ("28", 120_000),
    ("29", 135_000),
    ("30", 155_000),
];

/// Highest level whose threshold does not exceed `experience`.
pub fn level_for_experience(experience: i64) -> u32 {
    EXPERIENCE_PER_LEVEL
        .iter()
        .take_while(|threshold| **threshold <= experience)
        .count()
        .max(1) as u32
}

/// Proficiency bonus by character level: +2 at level 1, +1 every four levels.
pub fn proficiency_bonus_for_level(level: u32) -> i64 {
    let level = level.clamp(1, MAX_LEVEL) as i64;
    (level - 1) / 4 + 2
}

/// Experience for a challenge rating trait; unknown ratings award nothing.
pub fn experience_for_challenge_rating(rating: Option<&TraitValue>) -> i64 {
    let key = match rating {
        None => "0".to_string(),
        Some(TraitValue::Int(i)) => i.to_string(),
        Some(TraitValue::Float(f)) if *f == 0.125 => "1/8".to_string(),
        Some(TraitValue::Float(f)) if *f == 0.25 => "1/4".to_string(),
        Some(TraitValue::Float(f)) if *f == 0.5 => "1/2".to_string(),
        Some(TraitValue::Float(f)) => (f.trunc() as i64).to_string(),
        Some(other) => other.to_string(),
    };
    CHALLENGE_RATING_EXPERIENCE
        .iter()
        .find(|(cr, _)| *cr == key)
        .map(|(_, exp)| *exp)
        .unwrap_or_else(|| {
            tracing::warn!("unknown challenge rating '{}', awarding no experience", key);
            0
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_follow_thresholds() {
        assert_eq!(level_for_experience(0), 1);
        assert_eq!(level_for_experience(299), 1);
        assert_eq!(level_for_experience(300), 2);
        assert_eq!(level_for_experience(6_499), 4);
        assert_eq!(level_for_experience(6_500), 5);
        assert_eq!(level_for_experience(120_000), 13);
        assert_eq!(level_for_experience(10_000_000), 20);
        assert_eq!(level_for_experience(-5), 1);
    }

    #[test]
    fn levels_are_monotonic() {
        let mut last = 1;
        for exp in (0..400_000).step_by(250) {
            let level = level_for_experience(exp);
            assert!(level >= last);
            last = level;
        }
    }

    #[test]
    fn proficiency_steps_every_four_levels() {
        let expected = [2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 6, 6, 6, 6];
        for (i, pb) in expected.iter().enumerate() {
            assert_eq!(proficiency_bonus_for_level(i as u32 + 1), *pb);
        }
    }

    #[test]
    fn challenge_ratings_accept_fractions() {
        assert_eq!(experience_for_challenge_rating(Some(&TraitValue::Text("1/4".into()))), 50);
        assert_eq!(experience_for_challenge_rating(Some(&TraitValue::Float(0.5))), 100);
        assert_eq!(experience_for_challenge_rating(Some(&TraitValue::Int(3))), 700);
        assert_eq!(experience_for_challenge_rating(None), 10);
        assert_eq!(experience_for_challenge_rating(Some(&TraitValue::Int(99))), 0);
    }
}
