// Draft state machine, pick order, selections, and trades.

pub mod clock;
pub mod error;
pub mod pick;
pub mod prospect;
pub mod state;
pub mod trade;

pub use error::DraftError;
