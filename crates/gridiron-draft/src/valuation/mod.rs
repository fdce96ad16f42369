// Trade value oracle: pick chart, trade evaluation, package suggestions, and
// draft grades.

pub mod chart;
pub mod grade;
pub mod trade;
