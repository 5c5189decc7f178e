//! Tree policies used to pick a child during selection.
//!
//! A policy scores one child from its own statistics and the visit count of
//! its parent; the tree takes the first child with the highest score.

/// Scores a child for selection. Higher is more promising.
pub trait SelectionPolicy: Send + Sync {
    /// `win_count` and `visit_count` belong to the child, `parent_visits`
    /// to the node being descended from. `parent_visits` is always > 0.
    fn score(&self, win_count: f64, visit_count: u32, parent_visits: u32, exploration: f64)
        -> f64;
}

/// Upper Confidence Bound 1:
///
/// ```text
/// score = w / n + C * sqrt(ln(N) / n)
/// ```
///
/// Unvisited children score `+inf`, so every child is tried once before any
/// is exploited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ucb1;

impl SelectionPolicy for Ucb1 {
    #[inline]
    fn score(&self, win_count: f64, visit_count: u32, parent_visits: u32, exploration: f64) -> f64 {
        if visit_count == 0 {
            return f64::INFINITY;
        }
        let n = f64::from(visit_count);
        let exploitation = win_count / n;
        let bonus = (f64::from(parent_visits).ln() / n).sqrt();
        exploitation + exploration * bonus
    }
}

/// Plain functions and closures with the scoring signature are policies too.
impl<F> SelectionPolicy for F
where
    F: Fn(f64, u32, u32, f64) -> f64 + Send + Sync,
{
    #[inline]
    fn score(&self, win_count: f64, visit_count: u32, parent_visits: u32, exploration: f64) -> f64 {
        self(win_count, visit_count, parent_visits, exploration)
    }
}
