//! Team balancer trait and implementations
//!
//! Both balancers take a `(player, rating)` roster and produce a
//! [`TeamSplit`]; they differ in optimality guarantee and cost.

use crate::error::{CoreError, Result};
use crate::types::{PlayerId, TeamSplit};
use crate::utils::{average_rating, rating_difference};

/// Trait for splitting a roster into two teams
pub trait TeamBalancer: Send + Sync {
    /// Partition `roster` into two disjoint, exhaustive teams.
    ///
    /// # Arguments
    /// * `roster` - List of (player_id, current_rating) pairs
    ///
    /// # Returns
    /// The chosen split with its absolute average-rating difference and both
    /// team averages, all rounded to the nearest integer.
    fn balance(&self, roster: &[(PlayerId, i32)]) -> Result<TeamSplit>;
}

/// Optimal balancer enumerating every ⌊N/2⌋-subset of the roster.
///
/// Cost is `C(N, ⌊N/2⌋)` evaluated splits, which is exponential in N; it is
/// intended for rosters of roughly ten players (252 splits at N = 10). Ties
/// on the minimal difference keep the first split in enumeration order, and
/// enumeration is lexicographic over roster indices, so the result is
/// deterministic for a given roster order.
#[derive(Debug, Clone, Default)]
pub struct ExhaustiveBalancer;

impl ExhaustiveBalancer {
    pub fn new() -> Self {
        Self
    }
}

impl TeamBalancer for ExhaustiveBalancer {
    fn balance(&self, roster: &[(PlayerId, i32)]) -> Result<TeamSplit> {
        validate_roster(roster)?;

        let n = roster.len();
        let half = n / 2;

        let mut best_diff = f64::INFINITY;
        let mut best_team_a: Vec<usize> = Vec::new();

        for_each_combination(n, half, |team_a| {
            // A split that empties either side is not a partition into teams.
            if team_a.is_empty() || team_a.len() == n {
                return;
            }

            let ratings_a: Vec<i32> = team_a.iter().map(|&i| roster[i].1).collect();
            let ratings_b: Vec<i32> = (0..n)
                .filter(|i| !team_a.contains(i))
                .map(|i| roster[i].1)
                .collect();

            let avg_a = average_rating(&ratings_a, 0.0);
            let avg_b = average_rating(&ratings_b, 0.0);
            let diff = rating_difference(avg_a, avg_b);

            if diff < best_diff {
                best_diff = diff;
                best_team_a = team_a.to_vec();
            }
        });

        Ok(build_split(roster, &best_team_a))
    }
}

/// Polynomial fallback balancer for rosters beyond exhaustive reach.
///
/// Players are sorted by descending rating (roster order breaks ties) and
/// assigned one by one to the side with the lower rating sum, capped at
/// ⌈N/2⌉ per side so team sizes still differ by at most one. No optimality
/// guarantee; this is an explicit, separately tested fallback path.
#[derive(Debug, Clone, Default)]
pub struct GreedyBalancer;

impl GreedyBalancer {
    pub fn new() -> Self {
        Self
    }
}

impl TeamBalancer for GreedyBalancer {
    fn balance(&self, roster: &[(PlayerId, i32)]) -> Result<TeamSplit> {
        validate_roster(roster)?;

        let n = roster.len();
        let side_cap = n.div_ceil(2);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| roster[b].1.cmp(&roster[a].1));

        let mut team_a: Vec<usize> = Vec::new();
        let mut team_b: Vec<usize> = Vec::new();
        let mut sum_a: i64 = 0;
        let mut sum_b: i64 = 0;

        for idx in order {
            let rating = roster[idx].1 as i64;
            let a_open = team_a.len() < side_cap;
            let b_open = team_b.len() < side_cap;

            if a_open && (!b_open || sum_a <= sum_b) {
                team_a.push(idx);
                sum_a += rating;
            } else {
                team_b.push(idx);
                sum_b += rating;
            }
        }

        team_a.sort_unstable();
        Ok(build_split(roster, &team_a))
    }
}

fn validate_roster(roster: &[(PlayerId, i32)]) -> Result<()> {
    if roster.len() < 2 {
        return Err(CoreError::InsufficientPlayers {
            required: 2,
            found: roster.len(),
        }
        .into());
    }
    Ok(())
}

fn build_split(roster: &[(PlayerId, i32)], team_a_indices: &[usize]) -> TeamSplit {
    let team_a: Vec<PlayerId> = team_a_indices
        .iter()
        .map(|&i| roster[i].0.clone())
        .collect();
    let team_b: Vec<PlayerId> = (0..roster.len())
        .filter(|i| !team_a_indices.contains(i))
        .map(|i| roster[i].0.clone())
        .collect();

    let ratings_a: Vec<i32> = team_a_indices.iter().map(|&i| roster[i].1).collect();
    let ratings_b: Vec<i32> = (0..roster.len())
        .filter(|i| !team_a_indices.contains(i))
        .map(|i| roster[i].1)
        .collect();

    let avg_a = average_rating(&ratings_a, 0.0);
    let avg_b = average_rating(&ratings_b, 0.0);

    TeamSplit {
        team_a,
        team_b,
        rating_diff: rating_difference(avg_a, avg_b).round() as i32,
        team_a_avg: avg_a.round() as i32,
        team_b_avg: avg_b.round() as i32,
    }
}

/// Visit every k-subset of `0..n` in lexicographic order
fn for_each_combination(n: usize, k: usize, mut visit: impl FnMut(&[usize])) {
    if k > n {
        return;
    }
    if k == 0 {
        visit(&[]);
        return;
    }

    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        visit(&indices);

        // Rightmost index that can still advance
        let mut i = k;
        loop {
            if i == 0 {
                return;
            }
            i -= 1;
            if indices[i] != i + n - k {
                break;
            }
        }

        indices[i] += 1;
        for j in i + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}
