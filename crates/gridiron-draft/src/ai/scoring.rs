// Prospect scoring for AI teams.
//
// score = true rating + needs bonus + value bonus + risk adjustment

use serde::{Deserialize, Serialize};

use super::profile::{AiTeamProfile, DraftStyle};
use crate::draft::prospect::{NeedPriority, Prospect, ProspectId, TeamNeeds};
use crate::valuation::chart::expected_pick_for_rating;

/// Multiplier on the needs bonus for needs-first drafters.
const NEEDS_STYLE_MULTIPLIER: f64 = 1.5;

/// A prospect's score from one team's point of view, with its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProspect {
    pub prospect_id: ProspectId,
    pub score: f64,
    pub needs_bonus: f64,
    pub value_bonus: f64,
    pub risk_adjustment: f64,
}

pub fn needs_bonus(profile: &AiTeamProfile, needs: Option<&TeamNeeds>, prospect: &Prospect) -> f64 {
    let base = match needs.and_then(|n| n.priority_for(prospect.position)) {
        Some(NeedPriority::Critical) => 15.0,
        Some(NeedPriority::High) => 10.0,
        Some(NeedPriority::Medium) => 5.0,
        Some(NeedPriority::Low) | None => 0.0,
    };
    if profile.draft_style == DraftStyle::Needs {
        base * NEEDS_STYLE_MULTIPLIER
    } else {
        base
    }
}

/// Reward prospects still on the board well after they were expected to go,
/// penalize apparent reaches. Only value and BPA drafters care.
pub fn value_bonus(profile: &AiTeamProfile, prospect: &Prospect, current_pick: u32) -> f64 {
    if !matches!(profile.draft_style, DraftStyle::Value | DraftStyle::Bpa) {
        return 0.0;
    }
    let expected = i64::from(expected_pick_for_rating(prospect.true_rating));
    let margin = i64::from(current_pick) - expected;
    match margin {
        m if m >= 30 => 10.0,
        m if m >= 15 => 5.0,
        m if m >= 5 => 2.0,
        m if m >= -15 => 0.0,
        m if m >= -40 => -5.0,
        _ => -10.0,
    }
}

pub fn risk_adjustment(profile: &AiTeamProfile, prospect: &Prospect) -> f64 {
    if profile.risk_tolerance > 70 {
        prospect.potential_gap * 0.3
    } else if profile.risk_tolerance < 30 {
        -prospect.potential_gap * 0.2
    } else {
        0.0
    }
}

pub fn score_prospect(
    profile: &AiTeamProfile,
    needs: Option<&TeamNeeds>,
    prospect: &Prospect,
    current_pick: u32,
) -> ScoredProspect {
    let needs_bonus = needs_bonus(profile, needs, prospect);
    let value_bonus = value_bonus(profile, prospect, current_pick);
    let risk_adjustment = risk_adjustment(profile, prospect);
    ScoredProspect {
        prospect_id: prospect.id,
        score: prospect.true_rating + needs_bonus + value_bonus + risk_adjustment,
        needs_bonus,
        value_bonus,
        risk_adjustment,
    }
}

/// Score and rank prospects, best first. The sort is stable, so equal scores
/// keep their input order.
pub fn rank_prospects<'a>(
    profile: &AiTeamProfile,
    needs: Option<&TeamNeeds>,
    prospects: impl IntoIterator<Item = &'a Prospect>,
    current_pick: u32,
) -> Vec<ScoredProspect> {
    let mut scored: Vec<ScoredProspect> = prospects
        .into_iter()
        .map(|p| score_prospect(profile, needs, p, current_pick))
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::profile::TeamStrategy;
    use crate::draft::prospect::{Position, PositionNeed};

    fn profile(style: DraftStyle, risk: u8) -> AiTeamProfile {
        AiTeamProfile {
            team_id: "TST".into(),
            strategy: TeamStrategy::Balanced,
            draft_style: style,
            aggressiveness: 50,
            patience_level: 50,
            risk_tolerance: risk,
        }
    }

    fn prospect(id: ProspectId, position: Position, rating: f64, gap: f64) -> Prospect {
        Prospect {
            id,
            name: format!("Prospect {id}"),
            position,
            true_rating: rating,
            scouted_rating: rating,
            potential: rating + gap,
            potential_gap: gap,
            round_projection: 1,
        }
    }

    fn needs() -> TeamNeeds {
        TeamNeeds {
            team_id: "TST".into(),
            needs: vec![
                PositionNeed {
                    position: Position::Cornerback,
                    priority: NeedPriority::Critical,
                    current_depth: 1,
                    target_depth: 4,
                },
                PositionNeed {
                    position: Position::WideReceiver,
                    priority: NeedPriority::Medium,
                    current_depth: 3,
                    target_depth: 5,
                },
            ],
        }
    }

    #[test]
    fn needs_bonus_by_priority() {
        let p = profile(DraftStyle::Balanced, 50);
        let n = needs();
        assert_eq!(needs_bonus(&p, Some(&n), &prospect(1, Position::Cornerback, 70.0, 0.0)), 15.0);
        assert_eq!(needs_bonus(&p, Some(&n), &prospect(2, Position::WideReceiver, 70.0, 0.0)), 5.0);
        assert_eq!(needs_bonus(&p, Some(&n), &prospect(3, Position::Kicker, 70.0, 0.0)), 0.0);
        assert_eq!(needs_bonus(&p, None, &prospect(4, Position::Cornerback, 70.0, 0.0)), 0.0);
    }

    #[test]
    fn needs_style_multiplies_bonus() {
        let p = profile(DraftStyle::Needs, 50);
        let n = needs();
        assert_eq!(needs_bonus(&p, Some(&n), &prospect(1, Position::Cornerback, 70.0, 0.0)), 22.5);
    }

    #[test]
    fn value_bonus_only_for_value_and_bpa() {
        // 80-rated prospect is expected at 32; still there at 70 (margin 38).
        let pr = prospect(1, Position::Safety, 80.0, 0.0);
        assert_eq!(value_bonus(&profile(DraftStyle::Value, 50), &pr, 70), 10.0);
        assert_eq!(value_bonus(&profile(DraftStyle::Bpa, 50), &pr, 70), 10.0);
        assert_eq!(value_bonus(&profile(DraftStyle::Needs, 50), &pr, 70), 0.0);
        assert_eq!(value_bonus(&profile(DraftStyle::Balanced, 50), &pr, 70), 0.0);
    }

    #[test]
    fn value_bonus_margins() {
        let p = profile(DraftStyle::Value, 50);
        let pr = prospect(1, Position::Safety, 80.0, 0.0); // expected 32
        assert_eq!(value_bonus(&p, &pr, 50), 5.0); // +18
        assert_eq!(value_bonus(&p, &pr, 40), 2.0); // +8
        assert_eq!(value_bonus(&p, &pr, 32), 0.0); // 0
        assert_eq!(value_bonus(&p, &pr, 10), -5.0); // -22
        let elite = prospect(2, Position::Quarterback, 70.0, 0.0); // expected 96
        assert_eq!(value_bonus(&p, &elite, 3), -10.0); // -93
    }

    #[test]
    fn risk_adjustment_by_tolerance() {
        let pr = prospect(1, Position::Linebacker, 70.0, 20.0);
        assert!((risk_adjustment(&profile(DraftStyle::Bpa, 80), &pr) - 6.0).abs() < 1e-9);
        assert!((risk_adjustment(&profile(DraftStyle::Bpa, 20), &pr) + 4.0).abs() < 1e-9);
        assert_eq!(risk_adjustment(&profile(DraftStyle::Bpa, 50), &pr), 0.0);
        assert_eq!(risk_adjustment(&profile(DraftStyle::Bpa, 70), &pr), 0.0);
    }

    #[test]
    fn rank_puts_need_ahead_of_slightly_better_player() {
        let p = profile(DraftStyle::Balanced, 50);
        let n = needs();
        let pool = vec![
            prospect(1, Position::Kicker, 80.0, 0.0),
            prospect(2, Position::Cornerback, 72.0, 0.0),
        ];
        let ranked = rank_prospects(&p, Some(&n), &pool, 10);
        assert_eq!(ranked[0].prospect_id, 2);
        assert_eq!(ranked[0].score, 87.0);
        assert_eq!(ranked[1].prospect_id, 1);
    }

    #[test]
    fn rank_keeps_input_order_on_ties() {
        let p = profile(DraftStyle::Balanced, 50);
        let pool = vec![
            prospect(7, Position::Kicker, 75.0, 0.0),
            prospect(3, Position::Punter, 75.0, 0.0),
            prospect(5, Position::Safety, 75.0, 0.0),
        ];
        let ranked = rank_prospects(&p, None, &pool, 10);
        let ids: Vec<ProspectId> = ranked.iter().map(|s| s.prospect_id).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }
}
