// Trade valuation: package values, offer evaluation, and greedy package
// suggestions for trading up or down.

use serde::{Deserialize, Serialize};

use super::chart::{future_pick_value, pick_value};
use crate::draft::trade::TradePackage;

/// |percentage difference| at or under which a trade counts as fair.
pub const FAIR_TRADE_PCT: f64 = 10.0;
/// Offers this far in the evaluator's favor are accepted outright.
pub const ACCEPT_PCT: f64 = 5.0;
/// Offers worse than this are declined outright.
pub const DECLINE_PCT: f64 = -10.0;

/// Trade-up packages stop accumulating once they reach this share of the
/// target pick's value.
const TRADE_UP_TARGET_SHARE: f64 = 0.95;
/// Trade-down packages must reach this share of the current pick's value.
const TRADE_DOWN_PREMIUM_SHARE: f64 = 1.10;
/// Below this share no package is suggested at all.
const MINIMUM_SHARE: f64 = 0.90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Accept,
    Counter,
    Decline,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Accept => "accept",
            Recommendation::Counter => "counter",
            Recommendation::Decline => "decline",
        }
    }
}

/// Result of comparing what is offered against what is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvaluation {
    pub offered_value: f64,
    pub requested_value: f64,
    /// `offered_value - requested_value`.
    pub difference: f64,
    /// `difference` as a percentage of `requested_value`.
    pub percentage_diff: f64,
    pub is_fair: bool,
    pub recommendation: Recommendation,
}

/// Total value of a package. Strictly additive, no synergy terms.
///
/// Future picks are discounted by how many drafts after `draft_year` they
/// fall.
pub fn package_value(package: &TradePackage, draft_year: u32) -> f64 {
    let current: f64 = package.picks.iter().map(|&p| pick_value(p)).sum();
    let future: f64 = package
        .future_picks
        .iter()
        .map(|f| future_pick_value(f.round, f.year.saturating_sub(draft_year)))
        .sum();
    current + future
}

/// Evaluate an offer from the perspective of the side receiving `offered`
/// and giving up `requested`.
pub fn evaluate_trade(offered: &TradePackage, requested: &TradePackage, draft_year: u32) -> TradeEvaluation {
    evaluate_values(package_value(offered, draft_year), package_value(requested, draft_year))
}

/// Shorthand for evaluating current-draft picks only.
pub fn evaluate_picks(offered: &[u32], requested: &[u32]) -> TradeEvaluation {
    let offered_value: f64 = offered.iter().map(|&p| pick_value(p)).sum();
    let requested_value: f64 = requested.iter().map(|&p| pick_value(p)).sum();
    evaluate_values(offered_value, requested_value)
}

fn evaluate_values(offered_value: f64, requested_value: f64) -> TradeEvaluation {
    let difference = offered_value - requested_value;
    let percentage_diff = if requested_value > 0.0 {
        difference / requested_value * 100.0
    } else {
        0.0
    };

    let recommendation = if percentage_diff >= ACCEPT_PCT {
        Recommendation::Accept
    } else if percentage_diff < DECLINE_PCT {
        Recommendation::Decline
    } else {
        Recommendation::Counter
    };

    TradeEvaluation {
        offered_value,
        requested_value,
        difference,
        percentage_diff,
        is_fair: percentage_diff.abs() <= FAIR_TRADE_PCT,
        recommendation,
    }
}

// ---------------------------------------------------------------------------
// Package suggestions
// ---------------------------------------------------------------------------

/// A set of picks assembled to match a target value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedPackage {
    /// Overall pick numbers, in the order they were accumulated.
    pub picks: Vec<u32>,
    pub total_value: f64,
    pub target_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TradeSuggestion {
    Package(SuggestedPackage),
    /// Even the best greedy accumulation falls short.
    Unaffordable { best_value: f64, target_value: f64 },
}

impl TradeSuggestion {
    pub fn package(&self) -> Option<&SuggestedPackage> {
        match self {
            TradeSuggestion::Package(p) => Some(p),
            TradeSuggestion::Unaffordable { .. } => None,
        }
    }

    pub fn into_package(self) -> Option<SuggestedPackage> {
        match self {
            TradeSuggestion::Package(p) => Some(p),
            TradeSuggestion::Unaffordable { .. } => None,
        }
    }
}

/// Suggest which of `owned_picks` to send to move up to `target_pick`.
///
/// Only picks after the target are considered. Picks are taken from most to
/// least valuable until the package reaches 95% of the target's value. If
/// every eligible pick together is still under 90%, the target is
/// unaffordable. This is a greedy heuristic, not an optimal subset search.
pub fn suggest_trade_up(target_pick: u32, owned_picks: &[u32]) -> TradeSuggestion {
    let target_value = pick_value(target_pick);

    let mut candidates: Vec<u32> = owned_picks
        .iter()
        .copied()
        .filter(|&p| p > target_pick)
        .collect();
    candidates.sort_by(|a, b| {
        pick_value(*b)
            .partial_cmp(&pick_value(*a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    accumulate(candidates, target_value, target_value * TRADE_UP_TARGET_SHARE)
}

/// Suggest which of `partner_picks` to ask for when moving down from
/// `current_pick`.
///
/// Only partner picks after the current pick are considered, taken in
/// ascending pick order until the package reaches 110% of the current pick's
/// value. Returns unaffordable when under 90% is reachable.
pub fn suggest_trade_down(current_pick: u32, partner_picks: &[u32]) -> TradeSuggestion {
    let target_value = pick_value(current_pick);

    let mut candidates: Vec<u32> = partner_picks
        .iter()
        .copied()
        .filter(|&p| p > current_pick)
        .collect();
    candidates.sort_unstable();

    accumulate(candidates, target_value, target_value * TRADE_DOWN_PREMIUM_SHARE)
}

fn accumulate(candidates: Vec<u32>, target_value: f64, stop_at: f64) -> TradeSuggestion {
    let mut picks = Vec::new();
    let mut total_value = 0.0;

    for pick in candidates {
        if total_value >= stop_at {
            break;
        }
        total_value += pick_value(pick);
        picks.push(pick);
    }

    if picks.is_empty() || total_value < target_value * MINIMUM_SHARE {
        return TradeSuggestion::Unaffordable {
            best_value: total_value,
            target_value,
        };
    }

    TradeSuggestion::Package(SuggestedPackage {
        picks,
        total_value,
        target_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::trade::FuturePickRef;
    use crate::valuation::chart::round_average_value;

    #[test]
    fn evaluate_two_for_one_decline() {
        let eval = evaluate_picks(&[15, 78], &[6]);
        assert_eq!(eval.offered_value, 1250.0);
        assert_eq!(eval.requested_value, 1600.0);
        assert_eq!(eval.difference, -350.0);
        assert!((eval.percentage_diff - (-21.875)).abs() < 1e-9);
        assert!(!eval.is_fair);
        assert_eq!(eval.recommendation, Recommendation::Decline);
    }

    #[test]
    fn evaluate_is_antisymmetric_in_difference() {
        let a = evaluate_picks(&[15, 78], &[6]);
        let b = evaluate_picks(&[6], &[15, 78]);
        assert_eq!(a.difference, -b.difference);
    }

    #[test]
    fn evaluate_accept_and_counter_bands() {
        // 1600 for 1500: +6.67%
        let accept = evaluate_picks(&[6], &[7]);
        assert_eq!(accept.recommendation, Recommendation::Accept);
        assert!(accept.is_fair);

        // 1500 for 1600: -6.25%
        let counter = evaluate_picks(&[7], &[6]);
        assert_eq!(counter.recommendation, Recommendation::Counter);
        assert!(counter.is_fair);
    }

    #[test]
    fn evaluate_empty_request_is_zero_percent() {
        let eval = evaluate_picks(&[10], &[]);
        assert_eq!(eval.percentage_diff, 0.0);
        assert_eq!(eval.recommendation, Recommendation::Counter);
    }

    #[test]
    fn package_value_includes_discounted_future_picks() {
        let package = TradePackage {
            picks: vec![32],
            future_picks: vec![FuturePickRef {
                year: 2028,
                round: 1,
                original_owner: "NE".into(),
            }],
        };
        let expected = 590.0 + round_average_value(1) * 0.70;
        assert!((package_value(&package, 2026) - expected).abs() < 1e-9);
    }

    #[test]
    fn trade_up_takes_most_valuable_picks_first() {
        // Target #10 = 1300; 95% = 1235.
        // Owned picks after 10: 20 (850), 40 (500), 45 (450), 100 (100).
        let suggestion = suggest_trade_up(10, &[100, 45, 20, 40, 3]);
        let package = suggestion.package().expect("should afford");
        assert_eq!(package.picks, vec![20, 40]);
        assert_eq!(package.total_value, 1350.0);
        assert_eq!(package.target_value, 1300.0);
    }

    #[test]
    fn trade_up_ignores_earlier_picks() {
        // Pick 3 would cover it alone but is ahead of the target.
        let suggestion = suggest_trade_up(10, &[3]);
        assert!(suggestion.package().is_none());
    }

    #[test]
    fn trade_up_cannot_afford() {
        // Target #1 = 3000; 64 (270) + 96 (116) is nowhere close.
        match suggest_trade_up(1, &[64, 96]) {
            TradeSuggestion::Unaffordable { best_value, target_value } => {
                assert_eq!(best_value, 386.0);
                assert_eq!(target_value, 3000.0);
            }
            other => panic!("expected unaffordable, got {:?}", other),
        }
    }

    #[test]
    fn trade_up_between_ninety_and_ninety_five_percent_still_suggests() {
        // Target #16 = 1000. 22 (780) + 68 (250) would pass; use 22 + 100
        // (100) + 122 (50) = 930, 93% of target.
        let suggestion = suggest_trade_up(16, &[22, 100, 122]);
        let package = suggestion.package().expect("93% is enough");
        assert_eq!(package.total_value, 930.0);
    }

    #[test]
    fn trade_down_requires_premium() {
        // Current #10 = 1300; 110% = 1430.
        // Partner picks after 10 ascending: 18 (900), 50 (400), 70 (240).
        let suggestion = suggest_trade_down(10, &[70, 5, 18, 50]);
        let package = suggestion.package().expect("should find package");
        assert_eq!(package.picks, vec![18, 50, 70]);
        assert_eq!(package.total_value, 1540.0);
    }

    #[test]
    fn trade_down_none_when_partner_is_thin() {
        let suggestion = suggest_trade_down(1, &[200, 210]);
        assert!(suggestion.package().is_none());
    }

    #[test]
    fn trade_down_ignores_partner_picks_before_current() {
        let suggestion = suggest_trade_down(20, &[2, 3]);
        assert!(suggestion.into_package().is_none());
    }
}
