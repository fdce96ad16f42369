// Trade value chart and the pick/rating lookup tables built on it.
//
// The chart is the classic 224-pick trade chart (seven 32-team rounds).
// Everything here is pure and total: out-of-table inputs fall back to floor
// values instead of failing.

/// Number of picks covered by the chart.
pub const CHART_PICKS: u32 = 224;

/// Picks per round the chart was built for.
const CHART_ROUND_SIZE: u32 = 32;

/// Lowest value any pick can be worth.
pub const PICK_VALUE_FLOOR: f64 = 1.0;

/// Linear decay per pick beyond the end of the chart.
const TAIL_DECAY_PER_PICK: f64 = 0.01;

/// Trade chart values for overall picks 1..=224. Non-increasing.
#[rustfmt::skip]
const PICK_VALUES: [f64; CHART_PICKS as usize] = [
    3000.0, 2600.0, 2200.0, 1800.0, 1700.0, 1600.0, 1500.0, 1400.0,
    1350.0, 1300.0, 1250.0, 1200.0, 1150.0, 1100.0, 1050.0, 1000.0,
    950.0, 900.0, 875.0, 850.0, 800.0, 780.0, 760.0, 740.0,
    720.0, 700.0, 680.0, 660.0, 640.0, 620.0, 600.0, 590.0,
    580.0, 560.0, 550.0, 540.0, 530.0, 520.0, 510.0, 500.0,
    490.0, 480.0, 470.0, 460.0, 450.0, 440.0, 430.0, 420.0,
    410.0, 400.0, 390.0, 380.0, 370.0, 360.0, 350.0, 340.0,
    330.0, 320.0, 310.0, 300.0, 292.0, 284.0, 276.0, 270.0,
    265.0, 260.0, 255.0, 250.0, 245.0, 240.0, 235.0, 230.0,
    225.0, 220.0, 215.0, 210.0, 205.0, 200.0, 195.0, 190.0,
    185.0, 180.0, 175.0, 170.0, 165.0, 160.0, 155.0, 150.0,
    145.0, 140.0, 136.0, 132.0, 128.0, 124.0, 120.0, 116.0,
    112.0, 108.0, 104.0, 100.0, 96.0, 92.0, 88.0, 86.0,
    84.0, 82.0, 80.0, 78.0, 76.0, 74.0, 72.0, 70.0,
    68.0, 66.0, 64.0, 62.0, 60.0, 58.0, 56.0, 54.0,
    52.0, 50.0, 49.0, 48.0, 47.0, 46.0, 45.0, 44.0,
    43.0, 42.0, 41.0, 40.0, 39.5, 39.0, 38.5, 38.0,
    37.5, 37.0, 36.5, 36.0, 35.5, 35.0, 34.5, 34.0,
    33.5, 33.0, 32.6, 32.2, 31.8, 31.4, 31.0, 30.6,
    30.2, 29.8, 29.4, 29.0, 28.6, 28.2, 27.8, 27.4,
    27.0, 26.6, 26.2, 25.8, 25.4, 25.0, 24.6, 24.2,
    23.8, 23.4, 23.0, 22.6, 22.2, 21.8, 21.4, 21.0,
    20.6, 20.2, 19.8, 19.4, 19.0, 18.6, 18.2, 17.8,
    17.4, 17.0, 16.6, 16.2, 15.8, 15.4, 15.0, 14.6,
    14.2, 13.8, 13.4, 13.0, 12.6, 12.2, 11.8, 11.4,
    11.0, 10.6, 10.2, 9.8, 9.4, 9.0, 8.6, 8.2,
    7.8, 7.4, 7.0, 6.6, 6.2, 5.8, 5.4, 5.0,
    4.6, 4.2, 3.8, 3.4, 3.0, 2.6, 2.3, 2.0,
];

/// Value of an overall pick on the trade chart.
///
/// Picks past the end of the chart decay linearly from the last chart value
/// toward [`PICK_VALUE_FLOOR`]. Pick 0 is not a real pick and gets the floor.
pub fn pick_value(overall: u32) -> f64 {
    match overall {
        0 => PICK_VALUE_FLOOR,
        1..=CHART_PICKS => PICK_VALUES[(overall - 1) as usize],
        _ => {
            let last = PICK_VALUES[(CHART_PICKS - 1) as usize];
            let decayed = last - f64::from(overall - CHART_PICKS) * TAIL_DECAY_PER_PICK;
            decayed.max(PICK_VALUE_FLOOR)
        }
    }
}

/// Average chart value of a round, used as the "historical" value of a
/// future pick whose exact slot is not known yet.
pub fn round_average_value(round: u32) -> f64 {
    let rounds = CHART_PICKS / CHART_ROUND_SIZE;
    if round == 0 || round > rounds {
        return PICK_VALUE_FLOOR;
    }
    let start = (round - 1) * CHART_ROUND_SIZE + 1;
    let end = round * CHART_ROUND_SIZE;
    let total: f64 = (start..=end).map(pick_value).sum();
    total / f64::from(CHART_ROUND_SIZE)
}

/// Discount applied to a future pick `years_away` drafts out.
pub fn future_discount(years_away: u32) -> f64 {
    match years_away {
        0 => 1.0,
        1 => 0.85,
        2 => 0.70,
        3 => 0.55,
        _ => 0.5,
    }
}

/// Value of a future-year pick in the given round.
pub fn future_pick_value(round: u32, years_away: u32) -> f64 {
    round_average_value(round) * future_discount(years_away)
}

/// Find the chart pick whose value is closest to `value`.
///
/// Linear scan over 1..=224; ties resolve to the earliest pick.
pub fn equivalent_pick(value: f64) -> u32 {
    let mut best_pick = 1;
    let mut best_diff = f64::INFINITY;
    for overall in 1..=CHART_PICKS {
        let diff = (pick_value(overall) - value).abs();
        if diff < best_diff {
            best_diff = diff;
            best_pick = overall;
        }
    }
    best_pick
}

// ---------------------------------------------------------------------------
// Expected-pick table
// ---------------------------------------------------------------------------

/// Rating floor -> overall pick where a prospect of that rating is usually
/// taken. Shared by AI value scoring and post-draft grades.
const EXPECTED_PICK_BY_RATING: &[(f64, u32)] = &[
    (90.0, 5),
    (85.0, 16),
    (80.0, 32),
    (75.0, 64),
    (70.0, 96),
    (65.0, 128),
    (60.0, 160),
    (55.0, 192),
];

/// Rating assumed for picks after the last bucket.
const LATE_ROUND_RATING: f64 = 50.0;

/// Overall pick at which a prospect with this rating is expected to go.
pub fn expected_pick_for_rating(rating: f64) -> u32 {
    EXPECTED_PICK_BY_RATING
        .iter()
        .find(|(floor, _)| rating >= *floor)
        .map(|(_, pick)| *pick)
        .unwrap_or(CHART_PICKS)
}

/// Rating a team should expect to land with a given overall pick.
pub fn expected_rating_for_pick(overall: u32) -> f64 {
    EXPECTED_PICK_BY_RATING
        .iter()
        .find(|(_, pick)| overall <= *pick)
        .map(|(floor, _)| *floor)
        .unwrap_or(LATE_ROUND_RATING)
}
