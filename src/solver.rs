//! Assignment search: pick one candidate per photo.
//!
//! A combination is feasible when the chosen track indices are strictly
//! ascending in photo-time order (and, if `max_speed` is set, no pair of
//! consecutive photos implies travelling faster than that). Among feasible
//! combinations the one with the smallest summed distance wins.
//!
//! Two solvers implement [`AssignmentSolver`]:
//! - [`BruteForceSolver`] enumerates the full Cartesian product. Exact
//!   first-found tie-breaking, cost is the product of list lengths.
//! - [`DynamicProgrammingSolver`] runs in O(M·K²) for K candidates per photo
//!   and finds the same optimum.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};
use crate::{AlignConfig, Assignment, Candidate, CandidateList, PhotoPoint};

/// Counters describing how much of the search space was feasible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Size of the Cartesian product of all candidate lists (saturating)
    pub combinations: u64,
    /// Number of feasible combinations (saturating)
    pub feasible: u64,
}

/// Winning assignment plus search statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub assignment: Assignment,
    pub stats: SearchStats,
}

/// Chooses one candidate per photo. Implementations never mutate their inputs.
pub trait AssignmentSolver {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Find the minimum-score feasible assignment.
    ///
    /// `candidates[i]` belongs to `photos[i]`; photos are sorted by time.
    fn solve(
        &self,
        candidates: &[CandidateList],
        photos: &[PhotoPoint],
        config: &AlignConfig,
    ) -> Result<SearchOutcome>;
}

/// Whether `next` may follow `prev` for consecutive photos taken at
/// `prev_time` and `next_time`.
pub fn transition_ok(
    prev: &Candidate,
    prev_time: i64,
    next: &Candidate,
    next_time: i64,
    max_speed: Option<f64>,
) -> bool {
    if next.track_index <= prev.track_index {
        return false;
    }
    let Some(max_speed) = max_speed else {
        return true;
    };
    let travelled = next.arc_length - prev.arc_length;
    let elapsed = next_time - prev_time;
    if elapsed <= 0 {
        travelled <= 0.0
    } else {
        travelled / elapsed as f64 <= max_speed
    }
}

/// Score one combination: summed distance, or infinity if infeasible.
pub fn score_combination(
    choices: &[Candidate],
    photos: &[PhotoPoint],
    max_speed: Option<f64>,
) -> f64 {
    let feasible = choices.windows(2).zip(photos.windows(2)).all(|(c, p)| {
        transition_ok(&c[0], p[0].time, &c[1], p[1].time, max_speed)
    });
    if !feasible {
        return f64::INFINITY;
    }
    choices.iter().map(|c| c.distance).sum()
}

/// Product of list lengths, saturating at `u64::MAX`.
pub fn combination_count(candidates: &[CandidateList]) -> u64 {
    candidates
        .iter()
        .fold(1u64, |acc, list| acc.saturating_mul(list.len() as u64))
}

fn check_inputs(candidates: &[CandidateList], photos: &[PhotoPoint]) -> Result<()> {
    if candidates.len() != photos.len() {
        return Err(AlignError::InvalidInput(format!(
            "{} candidate lists for {} photos",
            candidates.len(),
            photos.len()
        )));
    }
    if let Some(photo_index) = candidates.iter().position(Vec::is_empty) {
        return Err(AlignError::EmptyCandidateList { photo_index });
    }
    Ok(())
}

fn log_outcome(solver: &str, outcome: &SearchOutcome) {
    info!(
        "[Search] {}: {} feasible of {} combinations, best score {:.2}",
        solver, outcome.stats.feasible, outcome.stats.combinations, outcome.assignment.score
    );
    debug!(
        "[Search] Best choice: {:?}",
        outcome.assignment.track_indices()
    );
}

// ============================================================================
// Brute force
// ============================================================================

/// Exhaustive enumeration of every combination, last photo varying fastest.
/// Ties keep the first combination found.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceSolver;

impl AssignmentSolver for BruteForceSolver {
    fn name(&self) -> &'static str {
        "brute_force"
    }

    fn solve(
        &self,
        candidates: &[CandidateList],
        photos: &[PhotoPoint],
        config: &AlignConfig,
    ) -> Result<SearchOutcome> {
        check_inputs(candidates, photos)?;

        let combinations = combination_count(candidates);
        if let Some(budget) = config.max_combinations {
            if combinations > budget {
                return Err(AlignError::SearchBudgetExceeded {
                    combinations,
                    budget,
                });
            }
        }
        if combinations > config.warn_combinations {
            warn!(
                "[Search] Will consider {} possible mappings; consider the DP solver",
                combinations
            );
        } else {
            debug!("[Search] Will consider {} possible mappings", combinations);
        }

        let m = candidates.len();
        let mut positions = vec![0usize; m];
        let mut choices: Vec<Candidate> = candidates.iter().map(|list| list[0]).collect();
        let mut best: Option<(f64, Vec<Candidate>)> = None;
        let mut feasible = 0u64;

        loop {
            let score = score_combination(&choices, photos, config.max_speed);
            if score.is_finite() {
                feasible += 1;
                if best.as_ref().is_none_or(|(best_score, _)| score < *best_score) {
                    best = Some((score, choices.clone()));
                }
            }

            if !advance(&mut positions, candidates) {
                break;
            }
            for (choice, (list, &pos)) in choices.iter_mut().zip(candidates.iter().zip(&positions)) {
                *choice = list[pos];
            }
        }

        let (score, choices) = best.ok_or(AlignError::NoFeasibleAssignment {
            photo_count: m,
            combinations,
        })?;

        let outcome = SearchOutcome {
            assignment: Assignment { choices, score },
            stats: SearchStats {
                combinations,
                feasible,
            },
        };
        log_outcome(self.name(), &outcome);
        Ok(outcome)
    }
}

/// Step to the next combination, last photo fastest.
/// Returns false once every combination has been visited.
fn advance(positions: &mut [usize], candidates: &[CandidateList]) -> bool {
    for digit in (0..positions.len()).rev() {
        positions[digit] += 1;
        if positions[digit] < candidates[digit].len() {
            return true;
        }
        positions[digit] = 0;
    }
    false
}

// ============================================================================
// Dynamic programming
// ============================================================================

/// Backward DP over (photo, candidate): `cost[i][k]` is the best summed
/// distance of photos `i..` given photo `i` takes candidate `k`.
///
/// The forward reconstruction takes, at each photo, the first candidate
/// with the smallest suffix cost among those allowed after the previous
/// choice. Equal-score ties therefore resolve to the lexicographically first
/// candidate positions, the same order brute force enumerates in, up to
/// floating-point summation order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicProgrammingSolver;

impl AssignmentSolver for DynamicProgrammingSolver {
    fn name(&self) -> &'static str {
        "dynamic_programming"
    }

    fn solve(
        &self,
        candidates: &[CandidateList],
        photos: &[PhotoPoint],
        config: &AlignConfig,
    ) -> Result<SearchOutcome> {
        check_inputs(candidates, photos)?;

        let combinations = combination_count(candidates);
        let m = candidates.len();
        if m == 0 {
            return Ok(SearchOutcome {
                assignment: Assignment {
                    choices: Vec::new(),
                    score: 0.0,
                },
                stats: SearchStats {
                    combinations,
                    feasible: 1,
                },
            });
        }

        let mut cost: Vec<Vec<f64>> = candidates
            .iter()
            .map(|list| vec![f64::INFINITY; list.len()])
            .collect();
        let mut count: Vec<Vec<u64>> = candidates
            .iter()
            .map(|list| vec![0u64; list.len()])
            .collect();

        for (k, c) in candidates[m - 1].iter().enumerate() {
            cost[m - 1][k] = c.distance;
            count[m - 1][k] = 1;
        }

        for i in (0..m - 1).rev() {
            for (k, c) in candidates[i].iter().enumerate() {
                let mut best_suffix = f64::INFINITY;
                let mut suffixes = 0u64;
                for (next_k, next) in candidates[i + 1].iter().enumerate() {
                    if !cost[i + 1][next_k].is_finite() {
                        continue;
                    }
                    if !transition_ok(c, photos[i].time, next, photos[i + 1].time, config.max_speed)
                    {
                        continue;
                    }
                    best_suffix = best_suffix.min(cost[i + 1][next_k]);
                    suffixes = suffixes.saturating_add(count[i + 1][next_k]);
                }
                cost[i][k] = c.distance + best_suffix;
                count[i][k] = suffixes;
            }
        }

        let feasible = count[0].iter().fold(0u64, |acc, &n| acc.saturating_add(n));

        let mut choices: Vec<Candidate> = Vec::with_capacity(m);
        let first = first_argmin(cost[0].iter().copied().enumerate()).ok_or(
            AlignError::NoFeasibleAssignment {
                photo_count: m,
                combinations,
            },
        )?;
        choices.push(candidates[0][first]);

        for i in 1..m {
            let prev = choices[i - 1];
            let allowed = cost[i].iter().copied().enumerate().filter(|&(k, _)| {
                transition_ok(
                    &prev,
                    photos[i - 1].time,
                    &candidates[i][k],
                    photos[i].time,
                    config.max_speed,
                )
            });
            let k = first_argmin(allowed).ok_or(AlignError::NoFeasibleAssignment {
                photo_count: m,
                combinations,
            })?;
            choices.push(candidates[i][k]);
        }

        let score = choices.iter().map(|c| c.distance).sum();
        let outcome = SearchOutcome {
            assignment: Assignment { choices, score },
            stats: SearchStats {
                combinations,
                feasible,
            },
        };
        log_outcome(self.name(), &outcome);
        Ok(outcome)
    }
}

/// Position of the first finite minimum.
fn first_argmin<I>(costs: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    let mut best: Option<(usize, f64)> = None;
    for (k, cost) in costs {
        if !cost.is_finite() {
            continue;
        }
        if best.is_none_or(|(_, b)| cost < b) {
            best = Some((k, cost));
        }
    }
    best.map(|(k, _)| k)
}
