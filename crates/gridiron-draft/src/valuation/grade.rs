// Post-draft letter grades.
//
// A team's grade is the average surplus of each selected prospect's rating
// over the rating expected at that pick, bucketed into letters.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::chart::expected_rating_for_pick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DraftGrade {
    D,
    C,
    CPlus,
    B,
    BPlus,
    A,
    APlus,
}

impl DraftGrade {
    /// Bucket an average rating surplus into a letter.
    pub fn from_surplus(surplus: f64) -> Self {
        if surplus >= 8.0 {
            DraftGrade::APlus
        } else if surplus >= 5.0 {
            DraftGrade::A
        } else if surplus >= 3.0 {
            DraftGrade::BPlus
        } else if surplus >= 1.0 {
            DraftGrade::B
        } else if surplus >= -1.0 {
            DraftGrade::CPlus
        } else if surplus >= -3.0 {
            DraftGrade::C
        } else {
            DraftGrade::D
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DraftGrade::APlus => "A+",
            DraftGrade::A => "A",
            DraftGrade::BPlus => "B+",
            DraftGrade::B => "B",
            DraftGrade::CPlus => "C+",
            DraftGrade::C => "C",
            DraftGrade::D => "D",
        }
    }
}

impl fmt::Display for DraftGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamGrade {
    pub team_id: String,
    pub grade: DraftGrade,
    pub average_surplus: f64,
    pub selections: usize,
}

/// Grade a team from its (overall pick, selected rating) pairs.
/// Returns `None` when the team made no selections.
pub fn grade_selections(team_id: &str, selections: &[(u32, f64)]) -> Option<TeamGrade> {
    if selections.is_empty() {
        return None;
    }
    let total: f64 = selections
        .iter()
        .map(|&(overall, rating)| rating - expected_rating_for_pick(overall))
        .sum();
    let average_surplus = total / selections.len() as f64;

    Some(TeamGrade {
        team_id: team_id.to_string(),
        grade: DraftGrade::from_surplus(average_surplus),
        average_surplus,
        selections: selections.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_selections_no_grade() {
        assert!(grade_selections("NE", &[]).is_none());
    }

    #[test]
    fn steal_grades_high() {
        // Pick 40 expects 75; an 85 is +10.
        let grade = grade_selections("NE", &[(40, 85.0)]).unwrap();
        assert_eq!(grade.grade, DraftGrade::APlus);
        assert_eq!(grade.average_surplus, 10.0);
    }

    #[test]
    fn reaches_average_down() {
        // Pick 3 expects 90 (got 84: -6); pick 100 expects 65 (got 66: +1).
        let grade = grade_selections("KC", &[(3, 84.0), (100, 66.0)]).unwrap();
        assert_eq!(grade.average_surplus, -2.5);
        assert_eq!(grade.grade, DraftGrade::C);
        assert_eq!(grade.selections, 2);
    }

    #[test]
    fn bucket_edges() {
        assert_eq!(DraftGrade::from_surplus(8.0), DraftGrade::APlus);
        assert_eq!(DraftGrade::from_surplus(4.99), DraftGrade::BPlus);
        assert_eq!(DraftGrade::from_surplus(-1.0), DraftGrade::CPlus);
        assert_eq!(DraftGrade::from_surplus(-3.01), DraftGrade::D);
        assert!(DraftGrade::APlus > DraftGrade::D);
        assert_eq!(DraftGrade::BPlus.to_string(), "B+");
    }
}
