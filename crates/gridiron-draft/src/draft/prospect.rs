// Prospect records, positions, and team needs. All of these are supplied by
// external collaborators; the engine only reads them.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub type ProspectId = u32;

/// Football positions used for prospects and team needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    OffensiveTackle,
    InteriorLine,
    EdgeRusher,
    DefensiveTackle,
    Linebacker,
    Cornerback,
    Safety,
    Kicker,
    Punter,
}

impl Position {
    pub const ALL: [Position; 13] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::OffensiveTackle,
        Position::InteriorLine,
        Position::EdgeRusher,
        Position::DefensiveTackle,
        Position::Linebacker,
        Position::Cornerback,
        Position::Safety,
        Position::Kicker,
        Position::Punter,
    ];

    /// Parse a position abbreviation. Common aliases are accepted
    /// ("OG"/"C" for interior line, "DE" for edge, "FS"/"SS" for safety).
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" | "HB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "OT" | "T" => Some(Position::OffensiveTackle),
            "IOL" | "OG" | "G" | "C" => Some(Position::InteriorLine),
            "EDGE" | "DE" => Some(Position::EdgeRusher),
            "DT" | "IDL" => Some(Position::DefensiveTackle),
            "LB" | "ILB" | "OLB" => Some(Position::Linebacker),
            "CB" => Some(Position::Cornerback),
            "S" | "FS" | "SS" => Some(Position::Safety),
            "K" => Some(Position::Kicker),
            "P" => Some(Position::Punter),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::OffensiveTackle => "OT",
            Position::InteriorLine => "IOL",
            Position::EdgeRusher => "EDGE",
            Position::DefensiveTackle => "DT",
            Position::Linebacker => "LB",
            Position::Cornerback => "CB",
            Position::Safety => "S",
            Position::Kicker => "K",
            Position::Punter => "P",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A draft-eligible amateur player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub id: ProspectId,
    pub name: String,
    pub position: Position,
    /// Hidden true rating. Only the AI and post-draft grading look at it.
    pub true_rating: f64,
    /// Rating as seen through the user's scouting.
    pub scouted_rating: f64,
    pub potential: f64,
    /// Spread between current ability and ceiling; drives risk adjustments.
    pub potential_gap: f64,
    /// Consensus round projection (1-7).
    pub round_projection: u8,
}

// ---------------------------------------------------------------------------
// Team needs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeedPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl NeedPriority {
    pub fn from_str_priority(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Some(NeedPriority::Critical),
            "high" => Some(NeedPriority::High),
            "medium" => Some(NeedPriority::Medium),
            "low" => Some(NeedPriority::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionNeed {
    pub position: Position,
    pub priority: NeedPriority,
    pub current_depth: u32,
    pub target_depth: u32,
}

/// A team's positional needs snapshot, regenerated at draft start.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamNeeds {
    pub team_id: String,
    pub needs: Vec<PositionNeed>,
}

impl TeamNeeds {
    pub fn new(team_id: &str) -> Self {
        TeamNeeds {
            team_id: team_id.to_string(),
            needs: Vec::new(),
        }
    }

    /// Priority for a position, if the team lists it at all.
    pub fn priority_for(&self, position: Position) -> Option<NeedPriority> {
        self.needs
            .iter()
            .find(|n| n.position == position)
            .map(|n| n.priority)
    }
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Deserialize)]
struct RawProspect {
    id: ProspectId,
    name: String,
    position: String,
    true_rating: f64,
    scouted_rating: f64,
    potential: f64,
    #[serde(default)]
    potential_gap: Option<f64>,
    round_projection: u8,
}

#[derive(Debug, Deserialize)]
struct RawNeed {
    team_id: String,
    position: String,
    priority: String,
    current_depth: u32,
    target_depth: u32,
}

fn load_prospects_from_reader<R: Read>(rdr: R) -> Result<Vec<Prospect>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut prospects: Vec<Prospect> = Vec::new();
    for result in reader.deserialize::<RawProspect>() {
        match result {
            Ok(raw) => {
                let Some(position) = Position::from_str_pos(&raw.position) else {
                    warn!("skipping prospect '{}': unknown position '{}'", raw.name.trim(), raw.position);
                    continue;
                };
                if prospects.iter().any(|p| p.id == raw.id) {
                    warn!("skipping prospect '{}': duplicate id {}", raw.name.trim(), raw.id);
                    continue;
                }
                let potential_gap = raw
                    .potential_gap
                    .unwrap_or((raw.potential - raw.true_rating).max(0.0));
                prospects.push(Prospect {
                    id: raw.id,
                    name: raw.name.trim().to_string(),
                    position,
                    true_rating: raw.true_rating,
                    scouted_rating: raw.scouted_rating,
                    potential: raw.potential,
                    potential_gap,
                    round_projection: raw.round_projection,
                });
            }
            Err(e) => {
                warn!("skipping malformed prospect row: {}", e);
            }
        }
    }
    Ok(prospects)
}

fn load_needs_from_reader<R: Read>(rdr: R) -> Result<Vec<TeamNeeds>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut by_team: HashMap<String, TeamNeeds> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for result in reader.deserialize::<RawNeed>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed needs row: {}", e);
                continue;
            }
        };
        let (Some(position), Some(priority)) = (
            Position::from_str_pos(&raw.position),
            NeedPriority::from_str_priority(&raw.priority),
        ) else {
            warn!(
                "skipping need for '{}': bad position '{}' or priority '{}'",
                raw.team_id, raw.position, raw.priority
            );
            continue;
        };
        let team_id = raw.team_id.trim().to_string();
        if !by_team.contains_key(&team_id) {
            order.push(team_id.clone());
        }
        by_team
            .entry(team_id.clone())
            .or_insert_with(|| TeamNeeds::new(&team_id))
            .needs
            .push(PositionNeed {
                position,
                priority,
                current_depth: raw.current_depth,
                target_depth: raw.target_depth,
            });
    }

    Ok(order
        .into_iter()
        .filter_map(|id| by_team.remove(&id))
        .collect())
}

/// Load the prospect pool from a CSV file.
pub fn load_prospects(path: &Path) -> Result<Vec<Prospect>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let prospects = load_prospects_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    if prospects.is_empty() {
        return Err(DataError::Validation(format!(
            "{} produced zero valid prospects",
            path.display()
        )));
    }
    Ok(prospects)
}

/// Load team needs from a CSV file (one row per team/position).
pub fn load_team_needs(path: &Path) -> Result<Vec<TeamNeeds>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_needs_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}
