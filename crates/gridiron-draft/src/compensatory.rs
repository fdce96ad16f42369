// Compensatory pick calculation from free-agency movement.
//
// Offline batch job: given the offseason's signings and the league's teams,
// award rounds 3-7 picks to teams that lost more qualifying free agents than
// they signed. Runs independently of any live draft.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::draft::prospect::DataError;

/// Salary (in $M) at which the salary component of a contract's value maxes
/// out.
const SALARY_CAP_FOR_VALUE: f64 = 25.0;

/// A gain cancels a loss when it is worth at least this share of it.
const CANCELLATION_SHARE: f64 = 0.8;

/// Most compensatory picks a single team can receive.
pub const MAX_PICKS_PER_TEAM: usize = 4;

/// Salary floors (in $M) for each compensatory round, highest first.
const SALARY_ROUNDS: [(f64, u32); 5] = [(15.0, 3), (10.0, 4), (6.0, 5), (3.0, 6), (1.0, 7)];

/// One free-agent move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signing {
    pub player: String,
    pub from_team: String,
    pub to_team: String,
    /// Average annual value in millions.
    pub salary: f64,
    pub overall: f64,
    /// Whether the departing team extended a qualifying offer.
    pub qualifying_offer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensatoryPick {
    pub round: u32,
    /// Slot within the round. Compensatory picks start after the last
    /// ordinary pick.
    pub pick_in_round: u32,
    pub value: f64,
    pub compensating_for_player: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensatoryPickResult {
    pub team_id: String,
    pub picks: Vec<CompensatoryPick>,
    /// Total value of losses no gain cancelled out.
    pub net_loss_value: f64,
}

/// Contract value on a 0-100 scale: half salary, 30% overall rating, 20%
/// expected playing time.
pub fn contract_value(salary: f64, overall: f64) -> f64 {
    let salary_norm = (salary / SALARY_CAP_FOR_VALUE).clamp(0.0, 1.0) * 100.0;
    let overall_norm = overall.clamp(0.0, 100.0);
    let playtime = if overall >= 75.0 {
        100.0
    } else if overall >= 65.0 {
        75.0
    } else {
        50.0
    };
    0.5 * salary_norm + 0.3 * overall_norm + 0.2 * playtime
}

/// Round awarded for losing a player at `salary`, if any.
pub fn salary_round(salary: f64) -> Option<u32> {
    SALARY_ROUNDS
        .iter()
        .find(|(floor, _)| salary >= *floor)
        .map(|(_, round)| *round)
}

struct Valued<'a> {
    signing: &'a Signing,
    value: f64,
}

fn valued_desc<'a>(signings: impl Iterator<Item = &'a Signing>) -> Vec<Valued<'a>> {
    let mut out: Vec<Valued<'a>> = signings
        .map(|s| Valued {
            signing: s,
            value: contract_value(s.salary, s.overall),
        })
        .collect();
    out.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// A pick a team qualifies for, before slots are assigned.
struct Award {
    team_idx: usize,
    round: u32,
    value: f64,
    player: String,
}

/// Compute every team's compensatory picks. Pure: the same signings and
/// teams always give the same result.
///
/// A loss is a player leaving a team that made him a qualifying offer; any
/// arrival is a gain. Losses and gains are matched greedily from the most
/// valuable loss down. Up to four uncompensated losses earn picks, by
/// salary. Within a round all teams' awards are ordered by value and slotted
/// after the round's ordinary picks. Returns one result per team in
/// `team_ids` order.
pub fn calculate_compensatory_picks(signings: &[Signing], team_ids: &[String]) -> Vec<CompensatoryPickResult> {
    let teams_per_round = team_ids.len() as u32;
    let moves: Vec<&Signing> = signings.iter().filter(|s| s.from_team != s.to_team).collect();

    let mut results: Vec<CompensatoryPickResult> = Vec::with_capacity(team_ids.len());
    let mut awards: Vec<Award> = Vec::new();

    for (team_idx, team) in team_ids.iter().enumerate() {
        let losses = valued_desc(
            moves
                .iter()
                .copied()
                .filter(|s| &s.from_team == team && s.qualifying_offer),
        );
        let gains = valued_desc(moves.iter().copied().filter(|s| &s.to_team == team));

        let mut consumed = vec![false; gains.len()];
        let mut uncompensated: Vec<&Valued> = Vec::new();
        for loss in &losses {
            let matched = gains
                .iter()
                .enumerate()
                .find(|(i, g)| !consumed[*i] && g.value >= loss.value * CANCELLATION_SHARE)
                .map(|(i, _)| i);
            match matched {
                Some(i) => {
                    consumed[i] = true;
                    debug!(
                        "{}: loss of {} cancelled by signing {}",
                        team, loss.signing.player, gains[i].signing.player
                    );
                }
                None => uncompensated.push(loss),
            }
        }

        let net_loss_value: f64 = uncompensated.iter().map(|l| l.value).sum();
        for loss in uncompensated.iter().take(MAX_PICKS_PER_TEAM) {
            if let Some(round) = salary_round(loss.signing.salary) {
                awards.push(Award {
                    team_idx,
                    round,
                    value: loss.value,
                    player: loss.signing.player.clone(),
                });
            }
        }

        results.push(CompensatoryPickResult {
            team_id: team.clone(),
            picks: Vec::new(),
            net_loss_value,
        });
    }

    for (_, round) in SALARY_ROUNDS.iter().rev() {
        let mut in_round: Vec<&Award> = awards.iter().filter(|a| a.round == *round).collect();
        in_round.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
        for (idx, award) in in_round.into_iter().enumerate() {
            results[award.team_idx].picks.push(CompensatoryPick {
                round: award.round,
                pick_in_round: teams_per_round + 1 + idx as u32,
                value: award.value,
                compensating_for_player: award.player.clone(),
            });
        }
    }

    for result in &mut results {
        result.picks.sort_by_key(|p| (p.round, p.pick_in_round));
    }
    results
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawSigning {
    player: String,
    from_team: String,
    to_team: String,
    salary: f64,
    overall: f64,
    qualifying_offer: String,
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" | "" => Some(false),
        _ => None,
    }
}

fn load_signings_from_reader<R: Read>(rdr: R) -> Result<Vec<Signing>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut signings = Vec::new();
    for result in reader.deserialize::<RawSigning>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed signing row: {}", e);
                continue;
            }
        };
        let Some(qualifying_offer) = parse_flag(&raw.qualifying_offer) else {
            warn!(
                "skipping signing '{}': bad qualifying_offer '{}'",
                raw.player.trim(),
                raw.qualifying_offer
            );
            continue;
        };
        signings.push(Signing {
            player: raw.player.trim().to_string(),
            from_team: raw.from_team.trim().to_string(),
            to_team: raw.to_team.trim().to_string(),
            salary: raw.salary,
            overall: raw.overall,
            qualifying_offer,
        });
    }
    Ok(signings)
}

/// Load free-agent signings from a CSV file.
pub fn load_signings(path: &Path) -> Result<Vec<Signing>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_signings_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams() -> Vec<String> {
        ["NE", "KC", "DAL", "GB"].iter().map(|s| s.to_string()).collect()
    }

    fn signing(player: &str, from: &str, to: &str, salary: f64, overall: f64, qo: bool) -> Signing {
        Signing {
            player: player.into(),
            from_team: from.into(),
            to_team: to.into(),
            salary,
            overall,
            qualifying_offer: qo,
        }
    }

    #[test]
    fn contract_value_components() {
        // 0.5 * 64 + 0.3 * 80 + 0.2 * 100
        assert!((contract_value(16.0, 80.0) - 76.0).abs() < 1e-9);
        // Salary caps at $25M; overall 60 plays like a backup.
        assert!((contract_value(40.0, 60.0) - (50.0 + 18.0 + 10.0)).abs() < 1e-9);
        assert!((contract_value(5.0, 70.0) - (10.0 + 21.0 + 15.0)).abs() < 1e-9);
    }

    #[test]
    fn salary_thresholds() {
        assert_eq!(salary_round(15.0), Some(3));
        assert_eq!(salary_round(14.99), Some(4));
        assert_eq!(salary_round(6.0), Some(5));
        assert_eq!(salary_round(3.5), Some(6));
        assert_eq!(salary_round(1.0), Some(7));
        assert_eq!(salary_round(0.9), None);
    }

    #[test]
    fn single_big_loss_earns_third_rounder() {
        let signings = vec![signing("Star Corner", "NE", "KC", 16.0, 80.0, true)];
        let results = calculate_compensatory_picks(&signings, &teams());
        assert_eq!(results.len(), 4);

        let ne = &results[0];
        assert_eq!(ne.team_id, "NE");
        assert_eq!(ne.picks.len(), 1);
        assert_eq!(ne.picks[0].round, 3);
        assert_eq!(ne.picks[0].pick_in_round, 5);
        assert_eq!(ne.picks[0].compensating_for_player, "Star Corner");
        assert!((ne.net_loss_value - 76.0).abs() < 1e-9);

        // KC gained without losing anything.
        assert!(results[1].picks.is_empty());
        assert_eq!(results[1].net_loss_value, 0.0);
    }

    #[test]
    fn losses_without_qualifying_offer_do_not_count() {
        let signings = vec![
            signing("A", "NE", "KC", 20.0, 85.0, false),
            signing("B", "DAL", "NE", 20.0, 85.0, false),
        ];
        let results = calculate_compensatory_picks(&signings, &teams());
        assert!(results.iter().all(|r| r.picks.is_empty()));
    }

    #[test]
    fn comparable_gain_cancels_loss() {
        // Loss worth 76; a gain worth >= 60.8 cancels it.
        let signings = vec![
            signing("Gone", "NE", "KC", 16.0, 80.0, true),
            signing("Arrived", "DAL", "NE", 12.0, 72.0, false), // 24 + 21.6 + 15 = 60.6
        ];
        let results = calculate_compensatory_picks(&signings, &teams());
        assert_eq!(results[0].picks.len(), 1, "60.6 is just under 80% of 76");

        let signings = vec![
            signing("Gone", "NE", "KC", 16.0, 80.0, true),
            signing("Arrived", "DAL", "NE", 12.0, 75.0, false), // 24 + 22.5 + 20 = 66.5
        ];
        let results = calculate_compensatory_picks(&signings, &teams());
        assert!(results[0].picks.is_empty());
        assert_eq!(results[0].net_loss_value, 0.0);
    }

    #[test]
    fn each_gain_cancels_at_most_one_loss() {
        let signings = vec![
            signing("Loss 1", "NE", "KC", 16.0, 80.0, true),
            signing("Loss 2", "NE", "GB", 16.0, 80.0, true),
            signing("Gain", "DAL", "NE", 25.0, 90.0, false),
        ];
        let results = calculate_compensatory_picks(&signings, &teams());
        assert_eq!(results[0].picks.len(), 1);
    }

    #[test]
    fn capped_at_four_picks_highest_value_first() {
        let signings: Vec<Signing> = (0..6)
            .map(|i| signing(&format!("Loss {i}"), "NE", "KC", 4.0 + i as f64 * 3.0, 70.0, true))
            .collect();
        let results = calculate_compensatory_picks(&signings, &teams());
        let ne = &results[0];
        assert_eq!(ne.picks.len(), MAX_PICKS_PER_TEAM);
        // Salaries 19, 16, 13, 10 survive the cap.
        let rounds: Vec<u32> = ne.picks.iter().map(|p| p.round).collect();
        assert_eq!(rounds, vec![3, 3, 4, 4]);
        assert!(ne.picks.iter().all(|p| (3..=7).contains(&p.round)));
        // Net loss counts every uncompensated loss, not just the awarded ones.
        let all: f64 = signings.iter().map(|s| contract_value(s.salary, s.overall)).sum();
        assert!((ne.net_loss_value - all).abs() < 1e-9);
    }

    #[test]
    fn round_slots_ordered_by_value_across_teams() {
        let signings = vec![
            signing("Cheaper", "NE", "DAL", 15.0, 70.0, true),
            signing("Pricier", "KC", "DAL", 24.0, 88.0, true),
        ];
        let results = calculate_compensatory_picks(&signings, &teams());
        assert_eq!(results[1].picks[0].pick_in_round, 5);
        assert_eq!(results[0].picks[0].pick_in_round, 6);
    }

    #[test]
    fn calculation_is_deterministic() {
        let signings = vec![
            signing("A", "NE", "KC", 16.0, 80.0, true),
            signing("B", "KC", "GB", 9.0, 71.0, true),
            signing("C", "GB", "NE", 3.0, 60.0, false),
            signing("D", "DAL", "NE", 1.5, 66.0, true),
        ];
        let a = calculate_compensatory_picks(&signings, &teams());
        let b = calculate_compensatory_picks(&signings, &teams());
        assert_eq!(a, b);
    }

    #[test]
    fn load_signings_parses_flags() {
        let csv = "\
player,from_team,to_team,salary,overall,qualifying_offer
Alpha,NE,KC,16,80,true
Bravo,KC,GB,9.5,71,yes
Charlie,GB,NE,3,60,no
Delta,DAL,NE,1.5,66,maybe
";
        let signings = load_signings_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(signings.len(), 3);
        assert!(signings[0].qualifying_offer);
        assert!(signings[1].qualifying_offer);
        assert!(!signings[2].qualifying_offer);
    }
}
