// Pick representation and draft order generation.

use serde::{Deserialize, Serialize};

use crate::compensatory::CompensatoryPickResult;

/// Default number of rounds in the amateur draft.
pub const DEFAULT_ROUNDS: u32 = 7;

/// A single slot in the live draft order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    /// Round number (1-indexed).
    pub round: u32,
    /// Position within the round (1-indexed). Compensatory picks follow the
    /// ordinary picks of their round.
    pub pick_in_round: u32,
    /// Overall pick number across the whole draft (1-indexed).
    pub overall: u32,
    /// Team currently holding the pick. Changes only through trades.
    pub current_owner: String,
    /// Team the pick was originally assigned to. Never changes.
    pub original_owner: String,
    #[serde(default)]
    pub is_compensatory: bool,
}

impl Pick {
    /// Short label such as "R2 P14 (#46)".
    pub fn label(&self) -> String {
        format!("R{} P{} (#{})", self.round, self.pick_in_round, self.overall)
    }
}

/// A pick in a future draft year. Tracked outside the live pick order and
/// identified by (year, round, original owner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuturePick {
    pub year: u32,
    pub round: u32,
    pub original_owner: String,
    pub current_owner: String,
}

/// Build the serpentine draft order: odd rounds use `teams` as given, even
/// rounds reverse it.
///
/// `teams` is the first-round order (worst record first). The team count is
/// assumed constant across rounds.
pub fn generate_pick_order(teams: &[String], rounds: u32) -> Vec<Pick> {
    let per_round = teams.len() as u32;
    let mut picks = Vec::with_capacity((per_round * rounds) as usize);

    for round in 1..=rounds {
        for (idx, team) in round_order(teams, round).enumerate() {
            let idx = idx as u32;
            picks.push(Pick {
                round,
                pick_in_round: idx + 1,
                overall: (round - 1) * per_round + idx + 1,
                current_owner: team.clone(),
                original_owner: team.clone(),
                is_compensatory: false,
            });
        }
    }

    picks
}

/// Build the serpentine order and append each round's compensatory picks
/// after its ordinary picks. Overall numbers are reassigned sequentially so
/// they remain a strict 1..N sequence.
pub fn generate_pick_order_with_compensatory(
    teams: &[String],
    rounds: u32,
    compensatory: &[CompensatoryPickResult],
) -> Vec<Pick> {
    let mut picks = Vec::new();

    for round in 1..=rounds {
        for (idx, team) in round_order(teams, round).enumerate() {
            picks.push(Pick {
                round,
                pick_in_round: idx as u32 + 1,
                overall: 0,
                current_owner: team.clone(),
                original_owner: team.clone(),
                is_compensatory: false,
            });
        }

        let mut comp: Vec<Pick> = compensatory
            .iter()
            .flat_map(|result| {
                result
                    .picks
                    .iter()
                    .filter(|cp| cp.round == round)
                    .map(|cp| Pick {
                        round,
                        pick_in_round: cp.pick_in_round,
                        overall: 0,
                        current_owner: result.team_id.clone(),
                        original_owner: result.team_id.clone(),
                        is_compensatory: true,
                    })
            })
            .collect();
        comp.sort_by_key(|p| p.pick_in_round);
        picks.extend(comp);
    }

    for (idx, pick) in picks.iter_mut().enumerate() {
        pick.overall = idx as u32 + 1;
    }

    picks
}

/// Seed one future pick per team per round for each of the next `years`
/// drafts after `draft_year`.
pub fn seed_future_picks(teams: &[String], rounds: u32, draft_year: u32, years: u32) -> Vec<FuturePick> {
    let mut future = Vec::new();
    for year in (draft_year + 1)..=(draft_year + years) {
        for round in 1..=rounds {
            for team in teams {
                future.push(FuturePick {
                    year,
                    round,
                    original_owner: team.clone(),
                    current_owner: team.clone(),
                });
            }
        }
    }
    future
}

fn round_order(teams: &[String], round: u32) -> Box<dyn Iterator<Item = &String> + '_> {
    if round % 2 == 0 {
        Box::new(teams.iter().rev())
    } else {
        Box::new(teams.iter())
    }
}
