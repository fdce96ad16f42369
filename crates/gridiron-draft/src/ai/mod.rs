// AI team behavior: synthetic profiles, prospect scoring, pick and trade
// decisions.

pub mod decision;
pub mod profile;
pub mod scoring;

pub use decision::{plan_ai_pick, AiDecision, DecisionContext};
pub use profile::{profile_for, AiTeamProfile};
