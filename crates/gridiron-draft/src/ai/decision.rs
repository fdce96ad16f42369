// AI pick and trade decisions.
//
// Everything here is a pure function of a `DecisionContext` plus an injected
// RNG. The draft state applies whatever decision comes back.

use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, info};

use super::profile::{profile_for, AiTeamProfile, TeamStrategy};
use super::scoring::{rank_prospects, ScoredProspect};
use crate::draft::pick::Pick;
use crate::draft::prospect::{Prospect, ProspectId, TeamNeeds};
use crate::draft::trade::{TradePackage, TradeProposal};
use crate::valuation::trade::{evaluate_trade, suggest_trade_down, suggest_trade_up, TradeEvaluation};

/// How many picks past the current one are scanned for trade-up suitors.
const TRADE_UP_LOOKAHEAD: usize = 5;

/// Baseline prospect score a team expects to land anyway.
const TRADE_UP_SCORE_BASELINE: f64 = 70.0;

/// Value gain must beat this fraction of the picks jumped.
const TRADE_UP_COST_FACTOR: f64 = 0.5;

/// Top-three scores within this spread make a team indifferent enough to
/// move down.
const TRADE_DOWN_SPREAD: f64 = 3.0;

/// What an AI team wants to do with the pick on the clock.
#[derive(Debug, Clone, PartialEq)]
pub enum AiDecision {
    Select {
        team: String,
        prospect_id: ProspectId,
        score: f64,
    },
    Trade {
        proposal: TradeProposal,
        /// Evaluation from the accepting side.
        evaluation: TradeEvaluation,
    },
    /// Nothing left to draft.
    Skip,
}

/// Which way an incoming offer moves the receiving team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    /// Receiver gives up its earliest pick for later value.
    Down,
    /// Receiver gets an earlier pick than it gives.
    Up,
}

/// Read-only view of the draft an AI decision is made against.
pub struct DecisionContext<'a> {
    /// Pick on the clock.
    pub current_pick: &'a Pick,
    pub draft_year: u32,
    pub available: Vec<&'a Prospect>,
    pub needs: &'a HashMap<String, TeamNeeds>,
    pub profiles: &'a HashMap<String, AiTeamProfile>,
    /// Unused picks from the current one onward, in draft order.
    pub upcoming: &'a [Pick],
    /// Human-controlled team, never offered AI-initiated trades it has to
    /// accept on its own.
    pub user_team: Option<&'a str>,
    pub quick_mode: bool,
    pub trades_enabled: bool,
}

impl<'a> DecisionContext<'a> {
    pub fn profile(&self, team: &str) -> AiTeamProfile {
        self.profiles
            .get(team)
            .cloned()
            .unwrap_or_else(|| profile_for(team))
    }

    pub fn rank_for(&self, team: &str) -> Vec<ScoredProspect> {
        let profile = self.profile(team);
        rank_prospects(
            &profile,
            self.needs.get(team),
            self.available.iter().copied(),
            self.current_pick.overall,
        )
    }

    fn is_user(&self, team: &str) -> bool {
        self.user_team == Some(team)
    }

    /// Overall numbers of `team`'s unused picks.
    fn unused_picks_of(&self, team: &str) -> Vec<u32> {
        self.upcoming
            .iter()
            .filter(|p| p.current_owner == team)
            .map(|p| p.overall)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Gates
// ---------------------------------------------------------------------------

/// Should `profile` try to jump up `pick_cost` picks for a prospect it scores
/// at `top_score`?
pub fn should_trade_up(profile: &AiTeamProfile, top_score: f64, pick_cost: u32, rng: &mut impl Rng) -> bool {
    let threshold = if profile.strategy == TeamStrategy::Contend { 50 } else { 70 };
    if profile.aggressiveness < threshold {
        return false;
    }
    let value_gain = top_score - TRADE_UP_SCORE_BASELINE;
    if value_gain <= f64::from(pick_cost) * TRADE_UP_COST_FACTOR {
        return false;
    }
    rng.gen_range(0.0..100.0) < f64::from(profile.aggressiveness)
}

/// Should `profile` look to move down from its current pick? `ranked` is the
/// team's board, best first.
pub fn should_trade_down(profile: &AiTeamProfile, ranked: &[ScoredProspect], rng: &mut impl Rng) -> bool {
    if profile.patience_level < 40 {
        return false;
    }
    let patience = f64::from(profile.patience_level);
    if profile.strategy == TeamStrategy::Rebuild && profile.patience_level >= 60 {
        return rng.gen_range(0.0..100.0) < patience;
    }
    let clustered = ranked.len() >= 3 && ranked[0].score - ranked[2].score <= TRADE_DOWN_SPREAD;
    clustered && rng.gen_range(0.0..100.0) < patience
}

// ---------------------------------------------------------------------------
// Incoming offers
// ---------------------------------------------------------------------------

/// Direction of a trade from the side that receives `receives` and gives
/// `gives`.
pub fn trade_direction(receives: &TradePackage, gives: &TradePackage) -> TradeDirection {
    match (gives.earliest_pick(), receives.earliest_pick()) {
        (Some(give), Some(get)) if give < get => TradeDirection::Down,
        (Some(_), None) => TradeDirection::Down,
        _ => TradeDirection::Up,
    }
}

/// Minimum percentage difference a team will accept for an offer moving it
/// in `direction`.
pub fn acceptance_threshold(strategy: TeamStrategy, direction: TradeDirection) -> f64 {
    match (strategy, direction) {
        (TeamStrategy::Rebuild, TradeDirection::Down) => -10.0,
        (TeamStrategy::Rebuild, TradeDirection::Up) => 5.0,
        (TeamStrategy::Contend, TradeDirection::Up) => -15.0,
        (TeamStrategy::Contend, TradeDirection::Down) => 0.0,
        (TeamStrategy::Balanced, _) => -5.0,
    }
}

/// Decide whether an AI team takes an offer. Returns the decision and the
/// evaluation from the receiver's side.
pub fn evaluate_incoming_offer(
    profile: &AiTeamProfile,
    receives: &TradePackage,
    gives: &TradePackage,
    draft_year: u32,
) -> (bool, TradeEvaluation) {
    let evaluation = evaluate_trade(receives, gives, draft_year);
    let direction = trade_direction(receives, gives);
    let accept = evaluation.percentage_diff >= acceptance_threshold(profile.strategy, direction);
    debug!(
        "{} weighs offer ({:?}): {:+.1}% -> {}",
        profile.team_id,
        direction,
        evaluation.percentage_diff,
        if accept { "accept" } else { "decline" }
    );
    (accept, evaluation)
}

// ---------------------------------------------------------------------------
// Trade generation
// ---------------------------------------------------------------------------

/// Find an AI team behind the current pick that wants to jump up to it.
///
/// Suitors are the owners of the next few picks, skipping the pick's owner
/// and the human team. The first suitor that passes its gate and can afford
/// the pick produces the proposal; the owner has not agreed to anything yet.
pub fn find_trade_up_offer(ctx: &DecisionContext<'_>, rng: &mut impl Rng) -> Option<TradeProposal> {
    let current = ctx.current_pick;
    let mut seen: Vec<&str> = Vec::new();

    for pick in ctx.upcoming.iter().skip(1).take(TRADE_UP_LOOKAHEAD) {
        let team = pick.current_owner.as_str();
        if team == current.current_owner || ctx.is_user(team) || seen.contains(&team) {
            continue;
        }
        seen.push(team);

        let profile = ctx.profile(team);
        let top = ctx.rank_for(team).into_iter().next()?;
        let pick_cost = pick.overall - current.overall;
        if !should_trade_up(&profile, top.score, pick_cost, rng) {
            continue;
        }

        let owned = ctx.unused_picks_of(team);
        let Some(package) = suggest_trade_up(current.overall, &owned).into_package() else {
            debug!("{} wants #{} but cannot afford it", team, current.overall);
            continue;
        };

        info!(
            "{} offers {:?} to move up to #{} (value {:.0} vs {:.0})",
            team, package.picks, current.overall, package.total_value, package.target_value
        );
        return Some(TradeProposal {
            from_team: team.to_string(),
            to_team: current.current_owner.clone(),
            offered: TradePackage::from_picks(package.picks),
            requested: TradePackage::from_picks(vec![current.overall]),
        });
    }

    None
}

/// Find a partner willing to take the current pick for a package of later
/// picks. The partner must accept the offer under its own profile.
pub fn find_trade_down_partner(ctx: &DecisionContext<'_>) -> Option<(TradeProposal, TradeEvaluation)> {
    let current = ctx.current_pick;
    let owner = current.current_owner.as_str();
    let mut partners: Vec<&str> = Vec::new();
    for pick in ctx.upcoming.iter().skip(1) {
        let team = pick.current_owner.as_str();
        if team != owner && !ctx.is_user(team) && !partners.contains(&team) {
            partners.push(team);
        }
    }

    for partner in partners {
        let owned = ctx.unused_picks_of(partner);
        let Some(package) = suggest_trade_down(current.overall, &owned).into_package() else {
            continue;
        };
        let receives = TradePackage::from_picks(vec![current.overall]);
        let gives = TradePackage::from_picks(package.picks);
        let (accept, evaluation) =
            evaluate_incoming_offer(&ctx.profile(partner), &receives, &gives, ctx.draft_year);
        if !accept {
            continue;
        }
        info!(
            "{} moves down from #{} with {} for {:?}",
            owner, current.overall, partner, gives.picks
        );
        return Some((
            TradeProposal {
                from_team: owner.to_string(),
                to_team: partner.to_string(),
                offered: receives,
                requested: gives,
            },
            evaluation,
        ));
    }

    None
}

/// Decide what the AI owner of the current pick does with it.
pub fn plan_ai_pick(ctx: &DecisionContext<'_>, rng: &mut impl Rng) -> AiDecision {
    let owner = ctx.current_pick.current_owner.as_str();
    let ranked = ctx.rank_for(owner);
    let Some(top) = ranked.first() else {
        return AiDecision::Skip;
    };
    let select = AiDecision::Select {
        team: owner.to_string(),
        prospect_id: top.prospect_id,
        score: top.score,
    };

    if ctx.quick_mode || !ctx.trades_enabled {
        return select;
    }

    if let Some(proposal) = find_trade_up_offer(ctx, rng) {
        let (accept, evaluation) = evaluate_incoming_offer(
            &ctx.profile(owner),
            &proposal.offered,
            &proposal.requested,
            ctx.draft_year,
        );
        if accept {
            return AiDecision::Trade { proposal, evaluation };
        }
    }

    let profile = ctx.profile(owner);
    if should_trade_down(&profile, &ranked, rng) {
        if let Some((proposal, evaluation)) = find_trade_down_partner(ctx) {
            return AiDecision::Trade { proposal, evaluation };
        }
    }

    select
}
