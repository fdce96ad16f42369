// Typed failures for draft actions.

use thiserror::Error;

use super::prospect::ProspectId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("draft is not active")]
    DraftNotActive,

    #[error("draft has already been started")]
    AlreadyStarted,

    #[error("no pick is on the clock")]
    NoActivePick,

    #[error("prospect {0} is not available")]
    ProspectUnavailable(ProspectId),

    #[error("team `{team}` does not hold the current pick (held by `{owner}`)")]
    WrongTeam { team: String, owner: String },

    #[error("unknown team `{0}`")]
    UnknownTeam(String),

    #[error("team `{team}` does not own {pick}")]
    TradeOwnershipMismatch { team: String, pick: String },

    #[error("pick #{0} has already been used")]
    PickAlreadyUsed(u32),

    #[error("trade must move at least one pick on each side")]
    EmptyTrade,

    #[error("{0} is listed more than once in the trade")]
    DuplicateTradeAsset(String),

    #[error("a team cannot trade with itself")]
    SelfTrade,

    #[error("no trade is pending")]
    NoPendingTrade,
}
