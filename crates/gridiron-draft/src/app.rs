// Application orchestrator: owns the draft aggregate and serializes every
// user command and clock tick through a single `tokio::select!` loop.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::draft::state::{AiPickResult, DraftState, PickOutcome, TickOutcome};
use crate::draft::trade::{Trade, TradeResponse};
use crate::draft::DraftError;
use crate::protocol::{DraftSnapshot, UiUpdate, UserCommand};

/// Draft clock resolution.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Everything the event loop owns.
pub struct AppState {
    pub config: Config,
    pub draft: DraftState,
    pub db: Database,
    /// Scopes the selection and trade ledgers to one draft session.
    pub draft_id: String,
    pub rng: ChaCha8Rng,
    /// Ledger high-water marks: entries below these are already in the db.
    recorded_selections: usize,
    recorded_trades: usize,
}

impl AppState {
    /// AI randomness is seeded from `config.draft.seed` when set.
    pub fn new(config: Config, draft: DraftState, db: Database, draft_id: String) -> Self {
        let seed = config.draft.seed.unwrap_or_else(rand::random);
        debug!("AI rng seed {}", seed);
        AppState {
            config,
            draft,
            db,
            draft_id,
            rng: ChaCha8Rng::seed_from_u64(seed),
            recorded_selections: 0,
            recorded_trades: 0,
        }
    }

    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot::from_state(&self.draft)
    }

    /// Write the aggregate and any new ledger entries to the database.
    pub fn persist(&mut self) -> anyhow::Result<()> {
        for selection in self.draft.selections.iter().skip(self.recorded_selections) {
            self.db.record_selection(selection, &self.draft_id)?;
        }
        self.recorded_selections = self.draft.selections.len();

        for trade in self.draft.trades.iter().skip(self.recorded_trades) {
            self.db.record_trade(trade, &self.draft_id)?;
        }
        self.recorded_trades = self.draft.trades.len();

        self.db.save_draft(&self.draft)
    }

    fn persist_or_warn(&mut self) {
        if let Err(e) = self.persist() {
            warn!("Failed to persist draft state: {:#}", e);
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Apply one command to the draft. Returns the notices worth showing the
    /// user. `Quit` is handled by the event loop and is a no-op here.
    pub fn apply_command(&mut self, cmd: UserCommand) -> Result<Vec<String>, DraftError> {
        let was_complete = self.draft.is_complete();
        let mut notices = Vec::new();
        match cmd {
            UserCommand::StartDraft => {
                self.draft.start_draft()?;
                notices.push(format!("The {} draft is underway", self.draft.year));
            }
            UserCommand::Pause => self.draft.pause_draft()?,
            UserCommand::Resume => self.draft.resume_draft()?,
            UserCommand::Pick { prospect_id } => {
                let team = self.draft.user_team.clone();
                let selection = self.draft.make_pick(prospect_id, team.as_deref())?;
                notices.push(format!(
                    "{}: {} selects {} ({})",
                    selection.pick.label(),
                    selection.team_id,
                    selection.prospect.name,
                    selection.prospect.position
                ));
            }
            UserCommand::AutoPick => {
                let outcome = self.draft.auto_pick_for_user()?;
                notices.push(describe_outcome(&outcome));
            }
            UserCommand::Advance => self.draft.advance_to_next_pick()?,
            UserCommand::SimulateAiPick => {
                let result = self.draft.simulate_ai_pick(&mut self.rng)?;
                describe_ai_result(&result, &mut notices);
            }
            UserCommand::SimToUserPick => {
                // Every simulated pick advances, so the draft's length bounds
                // the loop.
                let limit = self.draft.total_picks();
                for _ in 0..limit {
                    if self.draft.is_complete() || self.draft.is_user_on_clock() {
                        break;
                    }
                    // Without auto-advance a used pick stays on the clock.
                    if let Some(overall) = self.draft.current_pick().map(|p| p.overall) {
                        if self.draft.is_pick_used(overall) {
                            self.draft.advance_to_next_pick()?;
                            continue;
                        }
                    }
                    let result = self.draft.simulate_ai_pick(&mut self.rng)?;
                    describe_ai_result(&result, &mut notices);
                }
            }
            UserCommand::ProposeTrade(proposal) => match self.draft.propose_trade(proposal)? {
                TradeResponse::Executed(trade) => notices.push(describe_trade(&trade)),
                TradeResponse::Rejected(eval) => notices.push(format!(
                    "Trade declined ({:+.1}% for the other side)",
                    eval.percentage_diff
                )),
                TradeResponse::Pending(eval) => notices.push(format!(
                    "Trade offer sent ({:+.1}% for the receiver)",
                    eval.percentage_diff
                )),
            },
            UserCommand::AcceptTrade => {
                let trade = self.draft.accept_trade()?;
                notices.push(describe_trade(&trade));
            }
            UserCommand::RejectTrade => {
                let pending = self.draft.reject_trade()?;
                notices.push(format!("Declined offer from {}", pending.proposal.from_team));
            }
            UserCommand::SetBoard(board) => {
                self.draft.set_user_board(board);
                notices.push(format!("Board set: {} prospects", self.draft.user_board.len()));
            }
            UserCommand::ResetTimer => self.draft.reset_timer(),
            UserCommand::Status | UserCommand::Quit => {}
        }
        if self.draft.is_complete() && !was_complete {
            notices.push("The draft is complete".to_string());
        }
        Ok(notices)
    }
}

fn describe_outcome(outcome: &PickOutcome) -> String {
    match outcome {
        PickOutcome::Selected(s) => format!(
            "{}: {} selects {} ({})",
            s.pick.label(),
            s.team_id,
            s.prospect.name,
            s.prospect.position
        ),
        PickOutcome::Skipped(overall) => format!("Pick #{overall} passed without a selection"),
    }
}

fn describe_trade(trade: &Trade) -> String {
    format!(
        "Trade: {} sends {:?} to {} for {:?}",
        trade.team_a, trade.package_a.picks, trade.team_b, trade.package_b.picks
    )
}

fn describe_ai_result(result: &AiPickResult, notices: &mut Vec<String>) {
    if let Some(trade) = &result.trade {
        notices.push(describe_trade(trade));
    }
    notices.push(describe_outcome(&result.outcome));
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the draft event loop until `Quit` or the command channel closes.
///
/// Commands and the one-second clock tick share a single `select!`, so the
/// aggregate is only ever touched by one of them at a time. Every change is
/// persisted and followed by a snapshot on `ui_tx`.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Draft event loop started (draft_id={})", state.draft_id);

    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    // The first tick completes immediately; consume it so the clock starts
    // one full second after startup.
    ticker.tick().await;

    let _ = ui_tx.send(UiUpdate::StateSnapshot(Box::new(state.snapshot()))).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            _ = ticker.tick() => {
                handle_tick(&mut state, &ui_tx).await;
            }
        }
    }

    state.persist()?;
    info!("Draft event loop exiting");
    Ok(())
}

async fn handle_user_command(state: &mut AppState, cmd: UserCommand, ui_tx: &mpsc::Sender<UiUpdate>) {
    debug!("Command: {:?}", cmd);
    let result = state.apply_command(cmd);
    // Multi-step commands can commit picks before failing.
    state.persist_or_warn();
    match result {
        Ok(notices) => {
            for notice in notices {
                let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
            }
        }
        Err(e) => {
            info!("Command refused: {}", e);
            let _ = ui_tx.send(UiUpdate::ActionFailed(e.to_string())).await;
        }
    }
    let _ = ui_tx.send(UiUpdate::StateSnapshot(Box::new(state.snapshot()))).await;
}

async fn handle_tick(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let had_offer = state.draft.pending_trade.is_some();
    let outcome = match state.draft.tick_timer(&mut state.rng) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Clock tick failed: {}", e);
            return;
        }
    };

    match outcome {
        TickOutcome::Idle => {}
        TickOutcome::Counting { remaining } => {
            state.persist_or_warn();
            if !had_offer {
                if let Some(pending) = &state.draft.pending_trade {
                    let notice = format!(
                        "{} offers {:?} for {:?}",
                        pending.proposal.from_team, pending.proposal.offered.picks, pending.proposal.requested.picks
                    );
                    let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
                    let _ = ui_tx.send(UiUpdate::StateSnapshot(Box::new(state.snapshot()))).await;
                    return;
                }
            }
            if let Some(pick) = state.draft.current_pick() {
                let _ = ui_tx
                    .send(UiUpdate::ClockTick {
                        overall: pick.overall,
                        remaining,
                    })
                    .await;
            }
        }
        TickOutcome::Advanced { overall } => {
            state.persist_or_warn();
            let _ = ui_tx
                .send(UiUpdate::Notice(format!("Time expired; moving on from #{overall}")))
                .await;
            let _ = ui_tx.send(UiUpdate::StateSnapshot(Box::new(state.snapshot()))).await;
        }
        TickOutcome::Resolved(result) => {
            state.persist_or_warn();
            let mut notices = Vec::new();
            describe_ai_result(&result, &mut notices);
            for notice in notices {
                let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
            }
            let _ = ui_tx.send(UiUpdate::StateSnapshot(Box::new(state.snapshot()))).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Crash recovery
// ---------------------------------------------------------------------------

/// Restore the draft aggregate saved by a previous session.
///
/// Returns `Ok(true)` when a saved draft replaced `state.draft`. A ledger
/// without a saved aggregate cannot be replayed and is left alone.
pub fn recover_from_db(state: &mut AppState) -> anyhow::Result<bool> {
    if !state.db.has_draft_in_progress(&state.draft_id)? {
        info!("No draft in progress for draft_id={}, starting fresh", state.draft_id);
        return Ok(false);
    }

    let Some(draft) = state.db.load_draft()? else {
        warn!(
            "Ledger entries exist for draft_id={} but no saved draft state; starting fresh",
            state.draft_id
        );
        return Ok(false);
    };

    if draft.teams != state.config.league.teams {
        warn!("Saved draft uses a different team list than the config; keeping the saved one");
    }

    state.recorded_selections = draft.selections.len();
    state.recorded_trades = draft.trades.len();
    state.draft = draft;

    info!(
        "Crash recovery complete: {} selections, {} trades, phase {}, {} prospects remaining",
        state.draft.selections.len(),
        state.draft.trades.len(),
        state.draft.phase().label(),
        state.draft.available.len()
    );
    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
