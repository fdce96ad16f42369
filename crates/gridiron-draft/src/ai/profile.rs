// Synthetic AI team personalities.
//
// Every AI team gets a profile derived purely from its team id, so the same
// team behaves the same way across sessions without storing anything.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamStrategy {
    Rebuild,
    Contend,
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStyle {
    /// Best player available, ignoring need.
    Bpa,
    Needs,
    Balanced,
    Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiTeamProfile {
    pub team_id: String,
    pub strategy: TeamStrategy,
    pub draft_style: DraftStyle,
    /// Willingness to trade up, 0-100.
    pub aggressiveness: u8,
    /// Willingness to trade down, 0-100.
    pub patience_level: u8,
    /// Appetite for high-ceiling, high-variance prospects, 0-100.
    pub risk_tolerance: u8,
}

const STRATEGIES: [TeamStrategy; 3] = [TeamStrategy::Rebuild, TeamStrategy::Contend, TeamStrategy::Balanced];
const STYLES: [DraftStyle; 4] = [DraftStyle::Bpa, DraftStyle::Needs, DraftStyle::Balanced, DraftStyle::Value];

/// Linear congruential sequence seeded from a team id's byte sum.
struct ProfileSeed {
    state: u64,
}

impl ProfileSeed {
    const MULTIPLIER: u64 = 9301;
    const INCREMENT: u64 = 49297;
    const MODULUS: u64 = 233_280;

    fn from_team_id(team_id: &str) -> Self {
        let hash: u64 = team_id.bytes().map(u64::from).sum();
        ProfileSeed { state: hash }
    }

    /// Next draw in [0, 1).
    fn next_unit(&mut self) -> f64 {
        self.state = (self.state * Self::MULTIPLIER + Self::INCREMENT) % Self::MODULUS;
        self.state as f64 / Self::MODULUS as f64
    }

    /// Next draw as an integer in [low, low + span).
    fn next_in(&mut self, low: u8, span: u8) -> u8 {
        low + (self.next_unit() * f64::from(span)) as u8
    }
}

/// Derive the AI profile for a team. Pure: the same id always yields the same
/// profile, and ids with equal byte sums share one.
pub fn profile_for(team_id: &str) -> AiTeamProfile {
    let mut seed = ProfileSeed::from_team_id(team_id);

    let strategy = STRATEGIES[(seed.next_unit() * STRATEGIES.len() as f64) as usize];
    let draft_style = STYLES[(seed.next_unit() * STYLES.len() as f64) as usize];
    let aggressiveness = seed.next_in(20, 70);
    let patience_level = seed.next_in(20, 70);
    let risk_tolerance = seed.next_in(10, 80);

    AiTeamProfile {
        team_id: team_id.to_string(),
        strategy,
        draft_style,
        aggressiveness,
        patience_level,
        risk_tolerance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_profile_ne() {
        let p = profile_for("NE");
        assert_eq!(p.strategy, TeamStrategy::Rebuild);
        assert_eq!(p.draft_style, DraftStyle::Balanced);
        assert_eq!(p.aggressiveness, 54);
        assert_eq!(p.patience_level, 44);
        assert_eq!(p.risk_tolerance, 83);
    }

    #[test]
    fn known_profile_dal() {
        let p = profile_for("DAL");
        assert_eq!(p.strategy, TeamStrategy::Contend);
        assert_eq!(p.draft_style, DraftStyle::Needs);
        assert_eq!(p.aggressiveness, 76);
        assert_eq!(p.patience_level, 67);
        assert_eq!(p.risk_tolerance, 56);
    }

    #[test]
    fn known_profile_kc() {
        let p = profile_for("KC");
        assert_eq!(p.strategy, TeamStrategy::Balanced);
        assert_eq!(p.draft_style, DraftStyle::Needs);
        assert_eq!(p.aggressiveness, 55);
        assert_eq!(p.patience_level, 39);
        assert_eq!(p.risk_tolerance, 24);
    }

    #[test]
    fn profile_is_stable() {
        assert_eq!(profile_for("PHI"), profile_for("PHI"));
    }

    #[test]
    fn equal_byte_sums_share_a_profile() {
        // "BUF" and "DET" both sum to 221.
        let buf = profile_for("BUF");
        let det = profile_for("DET");
        assert_eq!(buf.strategy, det.strategy);
        assert_eq!(buf.draft_style, det.draft_style);
        assert_eq!(buf.aggressiveness, det.aggressiveness);
        assert_eq!(buf.team_id, "BUF");
        assert_eq!(det.team_id, "DET");
    }

    #[test]
    fn traits_stay_in_range() {
        for i in 0..200 {
            let p = profile_for(&format!("team_{i}"));
            assert!((20..90).contains(&p.aggressiveness));
            assert!((20..90).contains(&p.patience_level));
            assert!((10..90).contains(&p.risk_tolerance));
        }
    }
}
