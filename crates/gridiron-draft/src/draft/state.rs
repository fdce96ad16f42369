// Draft state: pick order, clock, selections, trades, and the prospect pool.
//
// `DraftState` is the single aggregate every action goes through. It is plain
// serde data so the whole thing can be persisted and rehydrated as one value.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::clock::{DraftPhase, PickClock, DEFAULT_PICK_SECONDS};
use super::error::DraftError;
use super::pick::{
    generate_pick_order, generate_pick_order_with_compensatory, seed_future_picks, FuturePick, Pick,
    DEFAULT_ROUNDS,
};
use super::prospect::{Position, Prospect, ProspectId, TeamNeeds};
use super::trade::{validate_package, PendingTrade, Trade, TradePackage, TradeProposal, TradeResponse};
use crate::ai::decision::{evaluate_incoming_offer, find_trade_up_offer, plan_ai_pick, AiDecision, DecisionContext};
use crate::ai::profile::{profile_for, AiTeamProfile};
use crate::ai::scoring::ScoredProspect;
use crate::compensatory::CompensatoryPickResult;
use crate::valuation::grade::{grade_selections, TeamGrade};
use crate::valuation::trade::evaluate_trade;

/// Future drafts whose picks are tradeable.
const FUTURE_DRAFT_YEARS: u32 = 2;

/// How many entries of each AI team's board are kept for display.
const AI_BOARD_DEPTH: usize = 10;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSettings {
    pub rounds: u32,
    pub pick_time_seconds: u32,
    /// Move to the next pick as soon as a selection is made.
    pub auto_advance: bool,
    /// AI teams take their top-ranked prospect and never trade.
    pub quick_mode: bool,
    pub ai_trades_enabled: bool,
}

impl Default for DraftSettings {
    fn default() -> Self {
        DraftSettings {
            rounds: DEFAULT_ROUNDS,
            pick_time_seconds: DEFAULT_PICK_SECONDS,
            auto_advance: true,
            quick_mode: false,
            ai_trades_enabled: true,
        }
    }
}

/// A committed selection. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub pick: Pick,
    pub prospect: Prospect,
    pub team_id: String,
    pub timestamp: DateTime<Utc>,
}

/// What happened to the pick on the clock.
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    Selected(Selection),
    /// Nothing could be drafted; the clock moved on.
    Skipped(u32),
}

/// Result of letting the AI handle the current pick.
#[derive(Debug, Clone, PartialEq)]
pub struct AiPickResult {
    /// Trade made for the pick before it was used, if any.
    pub trade: Option<Trade>,
    pub outcome: PickOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Draft not running (not started, paused, or complete).
    Idle,
    Counting { remaining: u32 },
    /// Time ran out on a pick that was already used; the clock moved on.
    Advanced { overall: u32 },
    /// Time ran out and the pick was resolved automatically.
    Resolved(AiPickResult),
}

// ---------------------------------------------------------------------------
// DraftState
// ---------------------------------------------------------------------------

/// The complete state of the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftState {
    pub year: u32,
    pub settings: DraftSettings,
    pub phase: DraftPhase,
    /// League teams in first-round order.
    pub teams: Vec<String>,
    /// Human-controlled team, if any.
    pub user_team: Option<String>,
    /// Full prospect pool snapshot. Never mutated after initialization.
    pub prospects: Vec<Prospect>,
    /// Ids still on the board, in pool order.
    pub available: Vec<ProspectId>,
    pub picks: Vec<Pick>,
    pub future_picks: Vec<FuturePick>,
    /// Index into `picks` of the pick on the clock.
    pub current_index: usize,
    pub selections: Vec<Selection>,
    /// Overall numbers that passed without a selection.
    #[serde(default)]
    pub skipped: Vec<u32>,
    /// The user's ranked board, best first.
    pub user_board: Vec<ProspectId>,
    pub team_needs: HashMap<String, TeamNeeds>,
    pub ai_profiles: HashMap<String, AiTeamProfile>,
    /// Each AI team's board as of its most recent pick.
    #[serde(default)]
    pub ai_boards: HashMap<String, Vec<ScoredProspect>>,
    pub trades: Vec<Trade>,
    pub pending_trade: Option<PendingTrade>,
    pub clock: PickClock,
    next_trade_id: u32,
    /// Pick for which AI teams already had their chance to make the user an
    /// offer.
    #[serde(default)]
    offer_window_pick: Option<u32>,
}

impl DraftState {
    /// Build a fresh draft. The draft is `NotStarted` until
    /// [`start_draft`](Self::start_draft) is called.
    ///
    /// `teams` is the first-round order. Every team except `user_team` gets
    /// an AI profile.
    pub fn initialize(
        prospects: Vec<Prospect>,
        teams: Vec<String>,
        user_team: Option<String>,
        year: u32,
        settings: DraftSettings,
        needs: Vec<TeamNeeds>,
    ) -> Self {
        let picks = generate_pick_order(&teams, settings.rounds);
        let future_picks = seed_future_picks(&teams, settings.rounds, year, FUTURE_DRAFT_YEARS);
        let ai_profiles = teams
            .iter()
            .filter(|t| user_team.as_deref() != Some(t.as_str()))
            .map(|t| (t.clone(), profile_for(t)))
            .collect();
        let team_needs = needs.into_iter().map(|n| (n.team_id.clone(), n)).collect();

        let mut prospects = prospects;
        let mut seen = HashSet::new();
        prospects.retain(|p| {
            let fresh = seen.insert(p.id);
            if !fresh {
                warn!("Duplicate prospect id {} ({}), keeping the first", p.id, p.name);
            }
            fresh
        });
        let available = prospects.iter().map(|p| p.id).collect();

        info!(
            "Draft {} initialized: {} teams, {} rounds, {} picks, {} prospects",
            year,
            teams.len(),
            settings.rounds,
            picks.len(),
            prospects.len()
        );

        DraftState {
            year,
            clock: PickClock::new(settings.pick_time_seconds),
            settings,
            phase: DraftPhase::NotStarted,
            teams,
            user_team,
            prospects,
            available,
            picks,
            future_picks,
            current_index: 0,
            selections: Vec::new(),
            skipped: Vec::new(),
            user_board: Vec::new(),
            team_needs,
            ai_profiles,
            ai_boards: HashMap::new(),
            trades: Vec::new(),
            pending_trade: None,
            next_trade_id: 1,
            offer_window_pick: None,
        }
    }

    /// Rebuild the pick order with compensatory picks appended to their
    /// rounds. Only allowed before the draft starts.
    pub fn apply_compensatory_picks(&mut self, compensatory: &[CompensatoryPickResult]) -> Result<(), DraftError> {
        if self.phase != DraftPhase::NotStarted {
            return Err(DraftError::AlreadyStarted);
        }
        let known: Vec<CompensatoryPickResult> = compensatory
            .iter()
            .filter(|r| {
                let known = self.teams.contains(&r.team_id);
                if !known {
                    warn!("ignoring compensatory picks for unknown team '{}'", r.team_id);
                }
                known
            })
            .cloned()
            .collect();
        self.picks = generate_pick_order_with_compensatory(&self.teams, self.settings.rounds, &known);
        info!(
            "Applied {} compensatory picks; draft now has {} picks",
            known.iter().map(|r| r.picks.len()).sum::<usize>(),
            self.picks.len()
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn start_draft(&mut self) -> Result<(), DraftError> {
        if self.phase != DraftPhase::NotStarted {
            return Err(DraftError::AlreadyStarted);
        }
        self.clock.reset();
        if self.picks.is_empty() {
            self.phase = DraftPhase::Complete;
        } else {
            self.phase = DraftPhase::Active;
            info!("Draft {} started", self.year);
        }
        Ok(())
    }

    pub fn pause_draft(&mut self) -> Result<(), DraftError> {
        match self.phase {
            DraftPhase::Active => {
                self.phase = DraftPhase::Paused;
                info!("Draft paused with {}s on the clock", self.clock.remaining);
                Ok(())
            }
            DraftPhase::Paused => Ok(()),
            _ => Err(DraftError::DraftNotActive),
        }
    }

    pub fn resume_draft(&mut self) -> Result<(), DraftError> {
        match self.phase {
            DraftPhase::Paused => {
                self.phase = DraftPhase::Active;
                info!("Draft resumed with {}s on the clock", self.clock.remaining);
                Ok(())
            }
            DraftPhase::Active => Ok(()),
            _ => Err(DraftError::DraftNotActive),
        }
    }

    /// Move past the current pick. A pick that was never used is recorded as
    /// skipped.
    pub fn advance_to_next_pick(&mut self) -> Result<(), DraftError> {
        self.ensure_running()?;
        let overall = self.current_pick().ok_or(DraftError::NoActivePick)?.overall;
        if !self.is_pick_used(overall) {
            info!("Pick #{} skipped", overall);
            self.skipped.push(overall);
        }
        self.advance();
        Ok(())
    }

    pub fn reset_timer(&mut self) {
        self.clock.reset();
    }

    fn advance(&mut self) {
        self.current_index += 1;
        self.pending_trade = None;
        self.offer_window_pick = None;
        self.clock.reset();
        if self.current_index >= self.picks.len() {
            self.phase = DraftPhase::Complete;
            info!(
                "Draft {} complete: {} selections, {} trades",
                self.year,
                self.selections.len(),
                self.trades.len()
            );
        }
    }

    fn ensure_running(&self) -> Result<(), DraftError> {
        match self.phase {
            DraftPhase::Active | DraftPhase::Paused => Ok(()),
            DraftPhase::Complete => Err(DraftError::NoActivePick),
            DraftPhase::NotStarted => Err(DraftError::DraftNotActive),
        }
    }

    fn ensure_team(&self, team: &str) -> Result<(), DraftError> {
        if self.teams.iter().any(|t| t == team) {
            Ok(())
        } else {
            Err(DraftError::UnknownTeam(team.to_string()))
        }
    }

    // ------------------------------------------------------------------
    // Selections
    // ------------------------------------------------------------------

    /// Draft `prospect_id` with the current pick. When `team` is given it
    /// must be the pick's current owner.
    pub fn make_pick(&mut self, prospect_id: ProspectId, team: Option<&str>) -> Result<Selection, DraftError> {
        self.ensure_running()?;
        let pick = self.current_pick().ok_or(DraftError::NoActivePick)?.clone();
        if let Some(team) = team {
            self.ensure_team(team)?;
            if team != pick.current_owner {
                return Err(DraftError::WrongTeam {
                    team: team.to_string(),
                    owner: pick.current_owner.clone(),
                });
            }
        }
        if self.is_pick_used(pick.overall) {
            return Err(DraftError::PickAlreadyUsed(pick.overall));
        }
        let pos = self
            .available
            .iter()
            .position(|&id| id == prospect_id)
            .ok_or(DraftError::ProspectUnavailable(prospect_id))?;
        let prospect = self
            .prospect(prospect_id)
            .cloned()
            .ok_or(DraftError::ProspectUnavailable(prospect_id))?;

        self.available.remove(pos);
        self.user_board.retain(|&id| id != prospect_id);

        let selection = Selection {
            team_id: pick.current_owner.clone(),
            pick,
            prospect,
            timestamp: Utc::now(),
        };
        info!(
            "{}: {} selects {} ({}, {:.0})",
            selection.pick.label(),
            selection.team_id,
            selection.prospect.name,
            selection.prospect.position,
            selection.prospect.scouted_rating
        );
        self.selections.push(selection.clone());

        if self.settings.auto_advance {
            self.advance();
        }
        Ok(selection)
    }

    /// Let the AI handle the current pick: possibly trade it once, then
    /// select for whoever owns it. The user's pick is auto-drafted from the
    /// user board instead.
    pub fn simulate_ai_pick(&mut self, rng: &mut impl Rng) -> Result<AiPickResult, DraftError> {
        self.ensure_running()?;
        let owner = self.current_pick().ok_or(DraftError::NoActivePick)?.current_owner.clone();
        if self.user_team.as_deref() == Some(owner.as_str()) {
            let outcome = self.auto_pick_for_user()?;
            return Ok(AiPickResult { trade: None, outcome });
        }

        let trades_enabled = self.settings.ai_trades_enabled;
        let mut trade = None;
        let mut decision = self.plan_current(trades_enabled, rng)?;

        if let AiDecision::Trade { proposal, evaluation } = decision {
            debug!(
                "AI trade for #{}: {:+.1}% for the accepting side",
                self.current_pick().map(|p| p.overall).unwrap_or(0),
                evaluation.percentage_diff
            );
            trade = Some(self.execute_trade(&proposal)?);
            // The new owner uses the pick; no second trade.
            decision = self.plan_current(false, rng)?;
        }

        let outcome = match decision {
            AiDecision::Select { team, prospect_id, .. } => {
                PickOutcome::Selected(self.make_pick(prospect_id, Some(&team))?)
            }
            AiDecision::Skip | AiDecision::Trade { .. } => self.skip_current()?,
        };
        Ok(AiPickResult { trade, outcome })
    }

    /// Draft for the user: the highest available prospect on the user board,
    /// else the best scouted rating left. Skips the pick if the pool is
    /// empty.
    pub fn auto_pick_for_user(&mut self) -> Result<PickOutcome, DraftError> {
        self.ensure_running()?;
        self.current_pick().ok_or(DraftError::NoActivePick)?;

        let from_board = self
            .user_board
            .iter()
            .copied()
            .find(|id| self.available.contains(id));
        let choice = from_board.or_else(|| self.best_available(None, 1).first().map(|p| p.id));

        match choice {
            Some(id) => Ok(PickOutcome::Selected(self.make_pick(id, None)?)),
            None => self.skip_current(),
        }
    }

    fn skip_current(&mut self) -> Result<PickOutcome, DraftError> {
        let overall = self.current_pick().ok_or(DraftError::NoActivePick)?.overall;
        warn!("Nothing left to draft at #{}; skipping", overall);
        self.advance_to_next_pick()?;
        Ok(PickOutcome::Skipped(overall))
    }

    fn decision_context(&self, trades_enabled: bool) -> Option<DecisionContext<'_>> {
        let current_pick = self.picks.get(self.current_index)?;
        Some(DecisionContext {
            current_pick,
            draft_year: self.year,
            available: self.available_prospects(),
            needs: &self.team_needs,
            profiles: &self.ai_profiles,
            upcoming: &self.picks[self.current_index..],
            user_team: self.user_team.as_deref(),
            quick_mode: self.settings.quick_mode,
            trades_enabled,
        })
    }

    fn plan_current(&mut self, trades_enabled: bool, rng: &mut impl Rng) -> Result<AiDecision, DraftError> {
        let (decision, owner, board) = {
            let ctx = self.decision_context(trades_enabled).ok_or(DraftError::NoActivePick)?;
            let owner = ctx.current_pick.current_owner.clone();
            let mut board = ctx.rank_for(&owner);
            board.truncate(AI_BOARD_DEPTH);
            (plan_ai_pick(&ctx, rng), owner, board)
        };
        self.ai_boards.insert(owner, board);
        Ok(decision)
    }

    // ------------------------------------------------------------------
    // Trades
    // ------------------------------------------------------------------

    /// Offer a trade. AI receivers answer immediately; a human receiver gets
    /// the offer as the pending trade.
    pub fn propose_trade(&mut self, proposal: TradeProposal) -> Result<TradeResponse, DraftError> {
        self.ensure_running()?;
        self.validate_proposal(&proposal)?;

        // Evaluated from the receiving side: it gets `offered`.
        if self.user_team.as_deref() == Some(proposal.to_team.as_str()) {
            let evaluation = evaluate_trade(&proposal.offered, &proposal.requested, self.year);
            let pending = PendingTrade {
                id: self.take_trade_id(),
                proposal,
                evaluation: evaluation.clone(),
                proposed_at: Utc::now(),
            };
            info!(
                "Trade offer {} from {} awaiting the user",
                pending.id, pending.proposal.from_team
            );
            self.pending_trade = Some(pending);
            return Ok(TradeResponse::Pending(evaluation));
        }

        let profile = self
            .ai_profiles
            .get(&proposal.to_team)
            .cloned()
            .unwrap_or_else(|| profile_for(&proposal.to_team));
        let (accept, evaluation) =
            evaluate_incoming_offer(&profile, &proposal.offered, &proposal.requested, self.year);
        if accept {
            Ok(TradeResponse::Executed(self.execute_trade(&proposal)?))
        } else {
            info!(
                "{} declines trade from {} ({:+.1}%)",
                proposal.to_team, proposal.from_team, evaluation.percentage_diff
            );
            Ok(TradeResponse::Rejected(evaluation))
        }
    }

    /// Accept the pending offer. Ownership is re-validated; if anything moved
    /// since the offer was made the trade fails and the offer is dropped.
    pub fn accept_trade(&mut self) -> Result<Trade, DraftError> {
        let pending = self.pending_trade.take().ok_or(DraftError::NoPendingTrade)?;
        info!("User accepts trade {}", pending.id);
        self.execute_trade(&pending.proposal)
    }

    pub fn reject_trade(&mut self) -> Result<PendingTrade, DraftError> {
        let pending = self.pending_trade.take().ok_or(DraftError::NoPendingTrade)?;
        info!("User rejects trade {} from {}", pending.id, pending.proposal.from_team);
        Ok(pending)
    }

    /// Commit a trade. Every pick on both sides is validated against current
    /// ownership before anything moves; any mismatch fails the whole trade.
    /// Executing the same proposal twice therefore fails the second time.
    pub fn execute_trade(&mut self, proposal: &TradeProposal) -> Result<Trade, DraftError> {
        self.validate_proposal(proposal)?;

        self.transfer(&proposal.offered, &proposal.from_team, &proposal.to_team);
        self.transfer(&proposal.requested, &proposal.to_team, &proposal.from_team);

        let trade = Trade {
            id: self.take_trade_id(),
            timestamp: Utc::now(),
            team_a: proposal.from_team.clone(),
            team_b: proposal.to_team.clone(),
            package_a: proposal.offered.clone(),
            package_b: proposal.requested.clone(),
            pick_number_at_time: self.current_pick().map(|p| p.overall).unwrap_or(0),
        };
        info!(
            "Trade {}: {} sends {:?} to {} for {:?}",
            trade.id, trade.team_a, trade.package_a.picks, trade.team_b, trade.package_b.picks
        );
        self.trades.push(trade.clone());
        Ok(trade)
    }

    fn validate_proposal(&self, proposal: &TradeProposal) -> Result<(), DraftError> {
        self.ensure_team(&proposal.from_team)?;
        self.ensure_team(&proposal.to_team)?;
        if proposal.from_team == proposal.to_team {
            return Err(DraftError::SelfTrade);
        }
        if proposal.offered.is_empty() || proposal.requested.is_empty() {
            return Err(DraftError::EmptyTrade);
        }
        let used = |overall: u32| self.is_pick_used(overall);
        validate_package(&proposal.from_team, &proposal.offered, &self.picks, &self.future_picks, &used)?;
        validate_package(&proposal.to_team, &proposal.requested, &self.picks, &self.future_picks, &used)?;
        Ok(())
    }

    /// Move every pick in `package` from `from` to `to`. Callers validate
    /// first.
    fn transfer(&mut self, package: &TradePackage, from: &str, to: &str) {
        for pick in self
            .picks
            .iter_mut()
            .filter(|p| package.picks.contains(&p.overall) && p.current_owner == from)
        {
            pick.current_owner = to.to_string();
        }
        for future in self.future_picks.iter_mut().filter(|f| f.current_owner == from) {
            if package.future_picks.iter().any(|r| r.matches(future)) {
                future.current_owner = to.to_string();
            }
        }
    }

    fn take_trade_id(&mut self) -> String {
        let id = format!("trade_{:04}", self.next_trade_id);
        self.next_trade_id += 1;
        id
    }

    // ------------------------------------------------------------------
    // Clock
    // ------------------------------------------------------------------

    /// One second of draft time. Only runs while the draft is active.
    ///
    /// On the first tick of the user's pick, AI teams behind it get one
    /// chance to make a trade-up offer. When the clock hits zero the pick is
    /// resolved automatically.
    pub fn tick_timer(&mut self, rng: &mut impl Rng) -> Result<TickOutcome, DraftError> {
        if self.phase != DraftPhase::Active {
            return Ok(TickOutcome::Idle);
        }
        let Some(current) = self.current_pick() else {
            return Ok(TickOutcome::Idle);
        };
        let overall = current.overall;
        let user_on_clock = self.user_team.as_deref() == Some(current.current_owner.as_str());

        if user_on_clock && self.offer_window_pick != Some(overall) {
            self.offer_window_pick = Some(overall);
            self.solicit_offer_for_user(rng);
        }

        if !self.clock.tick() {
            return Ok(TickOutcome::Counting {
                remaining: self.clock.remaining,
            });
        }

        info!("Clock expired on #{}", overall);
        if self.is_pick_used(overall) {
            self.advance_to_next_pick()?;
            return Ok(TickOutcome::Advanced { overall });
        }
        let result = if user_on_clock {
            AiPickResult {
                trade: None,
                outcome: self.auto_pick_for_user()?,
            }
        } else {
            self.simulate_ai_pick(rng)?
        };
        Ok(TickOutcome::Resolved(result))
    }

    fn solicit_offer_for_user(&mut self, rng: &mut impl Rng) {
        if self.pending_trade.is_some() || self.settings.quick_mode || !self.settings.ai_trades_enabled {
            return;
        }
        let proposal = match self.decision_context(true) {
            Some(ctx) => find_trade_up_offer(&ctx, rng),
            None => None,
        };
        let Some(proposal) = proposal else {
            return;
        };
        let evaluation = evaluate_trade(&proposal.offered, &proposal.requested, self.year);
        let pending = PendingTrade {
            id: self.take_trade_id(),
            proposal,
            evaluation,
            proposed_at: Utc::now(),
        };
        info!(
            "{} offers {:?} to the user for {:?}",
            pending.proposal.from_team, pending.proposal.offered.picks, pending.proposal.requested.picks
        );
        self.pending_trade = Some(pending);
    }

    // ------------------------------------------------------------------
    // Board
    // ------------------------------------------------------------------

    /// Replace the user's board. Unknown or already-drafted ids are dropped,
    /// as are repeats.
    pub fn set_user_board(&mut self, board: Vec<ProspectId>) {
        let mut cleaned: Vec<ProspectId> = Vec::with_capacity(board.len());
        for id in board {
            if self.available.contains(&id) && !cleaned.contains(&id) {
                cleaned.push(id);
            }
        }
        debug!("User board set with {} prospects", cleaned.len());
        self.user_board = cleaned;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn phase(&self) -> DraftPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == DraftPhase::Complete
    }

    /// The pick on the clock. `None` once the draft is complete.
    pub fn current_pick(&self) -> Option<&Pick> {
        if self.phase == DraftPhase::Complete {
            return None;
        }
        self.picks.get(self.current_index)
    }

    pub fn is_user_on_clock(&self) -> bool {
        match (self.current_pick(), self.user_team.as_deref()) {
            (Some(pick), Some(user)) => pick.current_owner == user,
            _ => false,
        }
    }

    pub fn is_pick_used(&self, overall: u32) -> bool {
        self.selections.iter().any(|s| s.pick.overall == overall) || self.skipped.contains(&overall)
    }

    pub fn prospect(&self, id: ProspectId) -> Option<&Prospect> {
        self.prospects.iter().find(|p| p.id == id)
    }

    pub fn available_prospects(&self) -> Vec<&Prospect> {
        self.available.iter().filter_map(|&id| self.prospect(id)).collect()
    }

    /// Picks `team` currently owns, used or not, in draft order.
    pub fn team_picks(&self, team: &str) -> Vec<&Pick> {
        self.picks.iter().filter(|p| p.current_owner == team).collect()
    }

    pub fn team_future_picks(&self, team: &str) -> Vec<&FuturePick> {
        self.future_picks.iter().filter(|f| f.current_owner == team).collect()
    }

    pub fn team_selections(&self, team: &str) -> Vec<&Selection> {
        self.selections.iter().filter(|s| s.team_id == team).collect()
    }

    /// Best available prospects by scouted rating, optionally at one
    /// position. Equal ratings keep pool order.
    pub fn best_available(&self, position: Option<Position>, limit: usize) -> Vec<&Prospect> {
        let mut pool: Vec<&Prospect> = self
            .available_prospects()
            .into_iter()
            .filter(|p| position.map_or(true, |pos| p.position == pos))
            .collect();
        pool.sort_by(|a, b| {
            b.scouted_rating
                .partial_cmp(&a.scouted_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        pool.truncate(limit);
        pool
    }

    /// Letter grade from true ratings against the expected rating for each
    /// pick used. `None` if the team has not drafted anyone.
    pub fn team_grade(&self, team: &str) -> Option<TeamGrade> {
        let picks: Vec<(u32, f64)> = self
            .team_selections(team)
            .iter()
            .map(|s| (s.pick.overall, s.prospect.true_rating))
            .collect();
        grade_selections(team, &picks)
    }

    pub fn total_picks(&self) -> usize {
        self.picks.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
