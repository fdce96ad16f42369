// Line-oriented console: parses typed commands into `UserCommand`s and
// renders `UiUpdate`s as plain text.

use std::fmt::Write as _;

use thiserror::Error;

use crate::draft::prospect::ProspectId;
use crate::draft::trade::{FuturePickRef, TradePackage, TradeProposal};
use crate::protocol::{DraftSnapshot, UiUpdate, UserCommand};

pub const HELP: &str = "\
commands:
  start | pause | resume | status | quit
  pick <prospect id>         draft a prospect with your pick
  auto                       auto-draft from your board
  sim                        let the AI make the current pick
  next                       simulate until you are on the clock
  skip                       pass on the current pick
  board <id> <id> ...        set your ranked board
  trade <team> give <picks> get <picks>
                             picks are overall numbers or YEAR/ROUND/TEAM
                             for future picks, comma separated
  accept | reject            answer the pending offer
  reset                      reset the pick clock";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),

    #[error("`{command}` needs {what}")]
    MissingArgument { command: &'static str, what: &'static str },

    #[error("`{0}` is not a valid number")]
    BadNumber(String),

    #[error("`{0}` is not a pick (use an overall number or YEAR/ROUND/TEAM)")]
    BadPick(String),

    #[error("no user team is configured")]
    NoUserTeam,

    #[error("help requested")]
    Help,
}

/// Parse one line of console input. Empty lines are `None`.
pub fn parse_command(line: &str, user_team: Option<&str>) -> Result<Option<UserCommand>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let cmd = match head.to_lowercase().as_str() {
        "start" => UserCommand::StartDraft,
        "pause" => UserCommand::Pause,
        "resume" => UserCommand::Resume,
        "status" | "s" => UserCommand::Status,
        "quit" | "q" | "exit" => UserCommand::Quit,
        "auto" => UserCommand::AutoPick,
        "sim" => UserCommand::SimulateAiPick,
        "next" => UserCommand::SimToUserPick,
        "skip" | "advance" => UserCommand::Advance,
        "accept" => UserCommand::AcceptTrade,
        "reject" => UserCommand::RejectTrade,
        "reset" => UserCommand::ResetTimer,
        "help" | "?" => return Err(CommandError::Help),
        "pick" | "p" => {
            let id = rest.first().ok_or(CommandError::MissingArgument {
                command: "pick",
                what: "a prospect id",
            })?;
            UserCommand::Pick {
                prospect_id: parse_number(id)?,
            }
        }
        "board" => {
            let ids = rest
                .iter()
                .flat_map(|w| w.split(','))
                .filter(|w| !w.is_empty())
                .map(parse_number)
                .collect::<Result<Vec<ProspectId>, _>>()?;
            UserCommand::SetBoard(ids)
        }
        "trade" => UserCommand::ProposeTrade(parse_trade(&rest, user_team)?),
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}

fn parse_number(s: &str) -> Result<u32, CommandError> {
    s.trim().parse().map_err(|_| CommandError::BadNumber(s.to_string()))
}

/// `<team> give <picks> get <picks>`, from the user's side.
fn parse_trade(words: &[&str], user_team: Option<&str>) -> Result<TradeProposal, CommandError> {
    let from_team = user_team.ok_or(CommandError::NoUserTeam)?;
    let missing = CommandError::MissingArgument {
        command: "trade",
        what: "`<team> give <picks> get <picks>`",
    };
    let [to_team, give, offered, get, requested] = words else {
        return Err(missing);
    };
    if !give.eq_ignore_ascii_case("give") || !get.eq_ignore_ascii_case("get") {
        return Err(missing);
    }
    Ok(TradeProposal {
        from_team: from_team.to_string(),
        to_team: to_team.to_uppercase(),
        offered: parse_package(offered)?,
        requested: parse_package(requested)?,
    })
}

fn parse_package(list: &str) -> Result<TradePackage, CommandError> {
    let mut package = TradePackage::default();
    for item in list.split(',').filter(|s| !s.is_empty()) {
        if let Ok(overall) = item.parse::<u32>() {
            package.picks.push(overall);
            continue;
        }
        let parts: Vec<&str> = item.split('/').collect();
        let [year, round, team] = parts.as_slice() else {
            return Err(CommandError::BadPick(item.to_string()));
        };
        let (Ok(year), Ok(round)) = (year.parse(), round.parse()) else {
            return Err(CommandError::BadPick(item.to_string()));
        };
        package.future_picks.push(FuturePickRef {
            year,
            round,
            original_owner: team.to_uppercase(),
        });
    }
    Ok(package)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Text for one update, or `None` if it is not worth printing.
pub fn render_update(update: &UiUpdate) -> Option<String> {
    match update {
        UiUpdate::StateSnapshot(snap) => Some(render_snapshot(snap)),
        UiUpdate::ClockTick { overall, remaining } => {
            (*remaining <= 5 || remaining % 30 == 0).then(|| format!("  #{overall}: {remaining}s left"))
        }
        UiUpdate::ActionFailed(msg) => Some(format!("! {msg}")),
        UiUpdate::Notice(msg) => Some(format!("* {msg}")),
    }
}

pub fn render_snapshot(snap: &DraftSnapshot) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "== {} draft ({}) | {}/{} picks",
        snap.year,
        snap.phase.label(),
        snap.picks_made,
        snap.total_picks
    );
    if let Some(pick) = &snap.current_pick {
        let _ = write!(
            out,
            " | on the clock: {} with {} ({}s)",
            pick.current_owner,
            pick.label(),
            snap.time_remaining
        );
        if snap.user_on_clock {
            out.push_str(" <- YOU");
        }
    }
    out.push('\n');

    if !snap.best_available.is_empty() {
        out.push_str("  best available:\n");
        for p in &snap.best_available {
            let _ = writeln!(
                out,
                "    {:>4}  {:<24} {:<4} {:>5.1}  (R{})",
                p.id, p.name, p.position.display_str(), p.scouted_rating, p.round_projection
            );
        }
    }

    if !snap.user_picks.is_empty() {
        let picks: Vec<String> = snap.user_picks.iter().map(|p| p.overall.to_string()).collect();
        let _ = writeln!(out, "  your picks: {}", picks.join(", "));
    }

    if let Some(pending) = &snap.pending_trade {
        let _ = writeln!(
            out,
            "  offer from {}: {:?} for {:?} ({:+.1}%, {}) - accept or reject",
            pending.proposal.from_team,
            pending.proposal.offered.picks,
            pending.proposal.requested.picks,
            pending.evaluation.percentage_diff,
            pending.evaluation.recommendation.label()
        );
    }
    out
}
