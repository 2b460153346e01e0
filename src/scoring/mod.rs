mod classification;
mod score;

pub use classification::{classify, reachable_bands};
pub use score::{compute_score, item_points, score_breakdown, Contribution, ScoreBreakdown};
