//! Rank tiers and progress toward the next tier.

use serde::Serialize;

/// Identifies a tier in [`TIERS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TierId {
    Recruit,
    Operative,
    Specialist,
    Commander,
}

/// A named band of cumulative score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankTier {
    pub id: TierId,
    pub name: &'static str,
    pub threshold: u64,
    /// Tier reached after this one, `None` for the top tier
    pub next: Option<TierId>,
    /// CSS color used for the glyph and progress bar
    pub color: &'static str,
    pub glyph: &'static str,
}

/// Ascending by threshold
pub static TIERS: [RankTier; 4] = [
    RankTier {
        id: TierId::Recruit,
        name: "RECRUIT",
        threshold: 0,
        next: Some(TierId::Operative),
        color: "var(--rank-recruit)",
        glyph: "●",
    },
    RankTier {
        id: TierId::Operative,
        name: "OPERATIVE",
        threshold: 250,
        next: Some(TierId::Specialist),
        color: "var(--rank-operative)",
        glyph: "◆",
    },
    RankTier {
        id: TierId::Specialist,
        name: "SPECIALIST",
        threshold: 600,
        next: Some(TierId::Commander),
        color: "var(--rank-specialist)",
        glyph: "★",
    },
    RankTier {
        id: TierId::Commander,
        name: "COMMANDER",
        threshold: 1200,
        next: None,
        color: "var(--rank-commander)",
        glyph: "✪",
    },
];

impl TierId {
    pub fn tier(self) -> &'static RankTier {
        match self {
            TierId::Recruit => &TIERS[0],
            TierId::Operative => &TIERS[1],
            TierId::Specialist => &TIERS[2],
            TierId::Commander => &TIERS[3],
        }
    }
}

impl RankTier {
    pub fn next_tier(&self) -> Option<&'static RankTier> {
        self.next.map(TierId::tier)
    }
}

/// Where a score sits in the tier table
#[derive(Debug, Clone, PartialEq)]
pub struct RankStanding {
    pub score: u64,
    pub tier: &'static RankTier,
    /// Fraction of the way to the next tier, in `[0, 1]`
    pub progress: f64,
}

impl RankStanding {
    pub fn progress_percent(&self) -> f64 {
        self.progress * 100.0
    }

    pub fn is_max_rank(&self) -> bool {
        self.tier.next.is_none()
    }

    /// Text shown under the progress bar
    pub fn progress_label(&self) -> String {
        match self.tier.next_tier() {
            Some(next) => format!("{} / {} XP to {}", self.score, next.threshold, next.name),
            None => "MAXIMUM RANK ACHIEVED".to_string(),
        }
    }
}

/// Compute the tier and progress for a cumulative score.
pub fn standing(score: u64) -> RankStanding {
    let tier = TIERS
        .iter()
        .rev()
        .find(|tier| tier.threshold <= score)
        .unwrap_or(&TIERS[0]);

    let progress = match tier.next_tier() {
        Some(next) => {
            let span = next.threshold.saturating_sub(tier.threshold);
            if span == 0 {
                1.0
            } else {
                let into = score.saturating_sub(tier.threshold);
                (into as f64 / span as f64).clamp(0.0, 1.0)
            }
        }
        None => 1.0,
    };

    RankStanding {
        score,
        tier,
        progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_ascend_and_link_in_order() {
        for pair in TIERS.windows(2) {
            assert!(pair[0].threshold < pair[1].threshold);
            assert_eq!(pair[0].next, Some(pair[1].id));
        }
        assert_eq!(TIERS[3].next, None);
    }

    #[test]
    fn test_tier_id_lookup() {
        for tier in &TIERS {
            assert_eq!(tier.id.tier(), tier);
        }
    }

    #[test]
    fn test_score_zero_is_recruit() {
        let s = standing(0);
        assert_eq!(s.tier.name, "RECRUIT");
        assert_eq!(s.progress, 0.0);
        assert_eq!(s.progress_label(), "0 / 250 XP to OPERATIVE");
    }

    #[test]
    fn test_score_250_is_operative() {
        let s = standing(250);
        assert_eq!(s.tier.id, TierId::Operative);
        assert_eq!(s.progress, 0.0);
        assert_eq!(s.progress_label(), "250 / 600 XP to SPECIALIST");
    }

    #[test]
    fn test_score_249_stays_recruit() {
        let s = standing(249);
        assert_eq!(s.tier.id, TierId::Recruit);
        assert!(s.progress < 1.0);
        assert!((s.progress - 249.0 / 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_600_is_specialist_with_no_progress() {
        let s = standing(600);
        assert_eq!(s.tier.name, "SPECIALIST");
        assert_eq!(s.progress_percent(), 0.0);
    }

    #[test]
    fn test_score_900_is_half_way_to_commander() {
        let s = standing(900);
        assert_eq!(s.tier.id, TierId::Specialist);
        assert!((s.progress - 0.5).abs() < 1e-9);
        assert_eq!(s.progress_label(), "900 / 1200 XP to COMMANDER");
    }

    #[test]
    fn test_score_1200_is_max_rank() {
        let s = standing(1200);
        assert_eq!(s.tier.name, "COMMANDER");
        assert!(s.is_max_rank());
        assert_eq!(s.progress, 1.0);
        assert_eq!(s.progress_label(), "MAXIMUM RANK ACHIEVED");
    }

    #[test]
    fn test_huge_score_is_max_rank() {
        let s = standing(u64::MAX);
        assert_eq!(s.tier.id, TierId::Commander);
        assert_eq!(s.progress, 1.0);
    }

    #[test]
    fn test_standing_properties_hold_across_range() {
        for score in 0..2000u64 {
            let s = standing(score);
            assert!(s.tier.threshold <= score);
            match s.tier.next_tier() {
                Some(next) => {
                    assert!(score < next.threshold);
                    assert!(s.progress < 1.0);
                }
                None => assert_eq!(s.progress, 1.0),
            }
            assert!((0.0..=1.0).contains(&s.progress));
        }
    }
}
