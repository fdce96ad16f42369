// Messages exchanged between the draft event loop and the presentation
// layer, plus the read-only snapshot the presentation layer renders.

use serde::Serialize;

use crate::draft::clock::DraftPhase;
use crate::draft::pick::Pick;
use crate::draft::prospect::{Position, ProspectId};
use crate::draft::state::DraftState;
use crate::draft::trade::{PendingTrade, TradeProposal};

/// How many recent selections a snapshot carries.
const RECENT_SELECTIONS: usize = 8;

/// How many best-available prospects a snapshot carries.
const BEST_AVAILABLE: usize = 10;

// ---------------------------------------------------------------------------
// Commands (presentation -> event loop)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    StartDraft,
    Pause,
    Resume,
    /// Draft a prospect with the pick on the clock.
    Pick { prospect_id: ProspectId },
    /// Let the user's board (or best available) decide the current pick.
    AutoPick,
    /// Move on without using the current pick.
    Advance,
    /// Let the AI resolve the current pick.
    SimulateAiPick,
    /// Let the AI resolve picks until the user is on the clock or the draft
    /// ends.
    SimToUserPick,
    ProposeTrade(TradeProposal),
    AcceptTrade,
    RejectTrade,
    SetBoard(Vec<ProspectId>),
    ResetTimer,
    /// Re-send the current snapshot.
    Status,
    Quit,
}

// ---------------------------------------------------------------------------
// Updates (event loop -> presentation)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    StateSnapshot(Box<DraftSnapshot>),
    /// Only sent while the clock is counting, so the presentation layer can
    /// redraw the timer without a full snapshot.
    ClockTick { overall: u32, remaining: u32 },
    /// A command was refused; the message is the domain error.
    ActionFailed(String),
    /// Something worth telling the user (trade executed, offer received...).
    Notice(String),
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionLine {
    pub overall: u32,
    pub round: u32,
    pub pick_in_round: u32,
    pub team_id: String,
    pub prospect_id: ProspectId,
    pub prospect_name: String,
    pub position: Position,
    pub scouted_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProspectLine {
    pub id: ProspectId,
    pub name: String,
    pub position: Position,
    pub scouted_rating: f64,
    pub round_projection: u8,
}

/// Everything the presentation layer needs to draw the draft room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftSnapshot {
    pub year: u32,
    pub phase: DraftPhase,
    pub current_pick: Option<Pick>,
    pub time_remaining: u32,
    pub picks_made: usize,
    pub total_picks: usize,
    pub user_team: Option<String>,
    pub user_on_clock: bool,
    /// Most recent first.
    pub recent_selections: Vec<SelectionLine>,
    pub best_available: Vec<ProspectLine>,
    /// The user's unused picks, in draft order.
    pub user_picks: Vec<Pick>,
    pub pending_trade: Option<PendingTrade>,
    pub trades_made: usize,
}

impl DraftSnapshot {
    pub fn from_state(state: &DraftState) -> Self {
        let recent_selections = state
            .selections
            .iter()
            .rev()
            .take(RECENT_SELECTIONS)
            .map(|s| SelectionLine {
                overall: s.pick.overall,
                round: s.pick.round,
                pick_in_round: s.pick.pick_in_round,
                team_id: s.team_id.clone(),
                prospect_id: s.prospect.id,
                prospect_name: s.prospect.name.clone(),
                position: s.prospect.position,
                scouted_rating: s.prospect.scouted_rating,
            })
            .collect();

        let best_available = state
            .best_available(None, BEST_AVAILABLE)
            .into_iter()
            .map(|p| ProspectLine {
                id: p.id,
                name: p.name.clone(),
                position: p.position,
                scouted_rating: p.scouted_rating,
                round_projection: p.round_projection,
            })
            .collect();

        let user_picks = match state.user_team.as_deref() {
            Some(user) => state
                .team_picks(user)
                .into_iter()
                .filter(|p| !state.is_pick_used(p.overall))
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        DraftSnapshot {
            year: state.year,
            phase: state.phase(),
            current_pick: state.current_pick().cloned(),
            time_remaining: state.clock.remaining,
            picks_made: state.selections.len(),
            total_picks: state.total_picks(),
            user_team: state.user_team.clone(),
            user_on_clock: state.is_user_on_clock(),
            recent_selections,
            best_available,
            user_picks,
            pending_trade: state.pending_trade.clone(),
            trades_made: state.trades.len(),
        }
    }
}
