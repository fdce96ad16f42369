// Trade records, proposals, and all-or-nothing ownership validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DraftError;
use super::pick::{FuturePick, Pick};
use crate::valuation::trade::TradeEvaluation;

/// Identifies a future-year pick by the slot it was created for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuturePickRef {
    pub year: u32,
    pub round: u32,
    pub original_owner: String,
}

impl FuturePickRef {
    pub fn matches(&self, pick: &FuturePick) -> bool {
        pick.year == self.year && pick.round == self.round && pick.original_owner == self.original_owner
    }
}

/// One side of a trade: current-draft picks by overall number plus any
/// future-year picks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TradePackage {
    #[serde(default)]
    pub picks: Vec<u32>,
    #[serde(default)]
    pub future_picks: Vec<FuturePickRef>,
}

impl TradePackage {
    pub fn from_picks(picks: Vec<u32>) -> Self {
        TradePackage {
            picks,
            future_picks: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty() && self.future_picks.is_empty()
    }

    /// Earliest current-draft pick in the package, if any.
    pub fn earliest_pick(&self) -> Option<u32> {
        self.picks.iter().copied().min()
    }
}

/// An executed trade. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub team_a: String,
    pub team_b: String,
    /// What `team_a` gives up.
    pub package_a: TradePackage,
    /// What `team_b` gives up.
    pub package_b: TradePackage,
    /// Overall number of the pick on the clock when the trade was made.
    pub pick_number_at_time: u32,
}

/// A trade offer from one team to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeProposal {
    pub from_team: String,
    pub to_team: String,
    /// What the proposing team gives.
    pub offered: TradePackage,
    /// What the proposing team asks for.
    pub requested: TradePackage,
}

/// A proposal waiting on a human counterparty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingTrade {
    pub id: String,
    pub proposal: TradeProposal,
    /// Evaluation from the receiving team's side.
    pub evaluation: TradeEvaluation,
    pub proposed_at: DateTime<Utc>,
}

/// Outcome of [`crate::draft::state::DraftState::propose_trade`].
#[derive(Debug, Clone, PartialEq)]
pub enum TradeResponse {
    /// The receiving AI accepted and the trade was committed.
    Executed(Trade),
    /// The receiving AI declined.
    Rejected(TradeEvaluation),
    /// The receiving team is human; the offer is stored as pending.
    Pending(TradeEvaluation),
}

/// Check that `team` owns every pick in `package` and that none of the
/// current-draft picks has been used yet. Each pick may be listed only once.
/// Nothing is mutated.
pub fn validate_package(
    team: &str,
    package: &TradePackage,
    picks: &[Pick],
    future_picks: &[FuturePick],
    used: &dyn Fn(u32) -> bool,
) -> Result<(), DraftError> {
    for (i, &overall) in package.picks.iter().enumerate() {
        if package.picks[..i].contains(&overall) {
            return Err(DraftError::DuplicateTradeAsset(format!("#{overall}")));
        }
        let pick = picks
            .iter()
            .find(|p| p.overall == overall)
            .ok_or_else(|| DraftError::TradeOwnershipMismatch {
                team: team.to_string(),
                pick: format!("#{overall}"),
            })?;
        if pick.current_owner != team {
            return Err(DraftError::TradeOwnershipMismatch {
                team: team.to_string(),
                pick: pick.label(),
            });
        }
        if used(overall) {
            return Err(DraftError::PickAlreadyUsed(overall));
        }
    }

    for (i, fref) in package.future_picks.iter().enumerate() {
        if package.future_picks[..i].contains(fref) {
            return Err(DraftError::DuplicateTradeAsset(format!(
                "{} R{} ({})",
                fref.year, fref.round, fref.original_owner
            )));
        }
        let owned = future_picks
            .iter()
            .any(|f| fref.matches(f) && f.current_owner == team);
        if !owned {
            return Err(DraftError::TradeOwnershipMismatch {
                team: team.to_string(),
                pick: format!("{} R{} ({})", fref.year, fref.round, fref.original_owner),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::{generate_pick_order, seed_future_picks};

    fn teams() -> Vec<String> {
        vec!["NE".into(), "KC".into(), "DAL".into()]
    }

    #[test]
    fn validate_accepts_owned_picks() {
        let picks = generate_pick_order(&teams(), 2);
        let future = seed_future_picks(&teams(), 2, 2026, 1);
        let package = TradePackage {
            picks: vec![1, 6],
            future_picks: vec![FuturePickRef {
                year: 2027,
                round: 1,
                original_owner: "NE".into(),
            }],
        };
        assert!(validate_package("NE", &package, &picks, &future, &|_| false).is_ok());
    }

    #[test]
    fn validate_rejects_foreign_pick() {
        let picks = generate_pick_order(&teams(), 2);
        let package = TradePackage::from_picks(vec![1, 2]);
        let err = validate_package("NE", &package, &picks, &[], &|_| false).unwrap_err();
        assert!(matches!(err, DraftError::TradeOwnershipMismatch { .. }));
    }

    #[test]
    fn validate_rejects_unknown_pick_number() {
        let picks = generate_pick_order(&teams(), 1);
        let package = TradePackage::from_picks(vec![99]);
        assert!(validate_package("NE", &package, &picks, &[], &|_| false).is_err());
    }

    #[test]
    fn validate_rejects_used_pick() {
        let picks = generate_pick_order(&teams(), 1);
        let package = TradePackage::from_picks(vec![1]);
        let err = validate_package("NE", &package, &picks, &[], &|n| n == 1).unwrap_err();
        assert_eq!(err, DraftError::PickAlreadyUsed(1));
    }

    #[test]
    fn validate_rejects_unowned_future_pick() {
        let future = seed_future_picks(&teams(), 1, 2026, 1);
        let package = TradePackage {
            picks: vec![],
            future_picks: vec![FuturePickRef {
                year: 2027,
                round: 1,
                original_owner: "KC".into(),
            }],
        };
        assert!(validate_package("NE", &package, &[], &future, &|_| false).is_err());
    }

    #[test]
    fn validate_rejects_repeated_picks() {
        let picks = generate_pick_order(&teams(), 2);
        let package = TradePackage::from_picks(vec![1, 6, 1]);
        let err = validate_package("NE", &package, &picks, &[], &|_| false).unwrap_err();
        assert_eq!(err, DraftError::DuplicateTradeAsset("#1".into()));

        let future = seed_future_picks(&teams(), 2, 2026, 1);
        let fref = FuturePickRef {
            year: 2027,
            round: 2,
            original_owner: "NE".into(),
        };
        let package = TradePackage {
            picks: vec![],
            future_picks: vec![fref.clone(), fref],
        };
        assert!(matches!(
            validate_package("NE", &package, &picks, &future, &|_| false),
            Err(DraftError::DuplicateTradeAsset(_))
        ));
    }

    #[test]
    fn earliest_pick_and_empty() {
        assert!(TradePackage::default().is_empty());
        let package = TradePackage::from_picks(vec![40, 12, 77]);
        assert_eq!(package.earliest_pick(), Some(12));
    }
}
