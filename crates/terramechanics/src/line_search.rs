//! Equilibrium entry-angle search
//!
//! Minimizes `(W(α) − W_target)²`, where `W` is the integrated vertical load
//! at trial entry angle `α`, with a derivative-free two-phase line search:
//! golden-ratio bracketing from `α = 0` followed by successive parabolic
//! interpolation. A parabola vertex that falls outside the bracket, or that
//! stops shrinking the step, is replaced by a golden-section step into the
//! wider half. Every loop is capped by [`SolverConfig`], and nothing here
//! fails: degenerate brackets end the search with the best point so far.
//!
//! `W` is piecewise smooth in `α`. The fixed-step grid gains a step every
//! time the arc widens by one increment, so the load jumps there, and below
//! two vertical steps only the zero-stress arc ends are sampled.

use crate::config::{ResultPolicy, SolverConfig, LEGACY_SOLVED_ANGLE_DEG};
use crate::error::NumericDegeneracy;
use crate::geometry::WheelKinematics;
use crate::integrator::ContactIntegrator;

/// Golden ratio used to grow the bracketing steps
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Fraction of the wider bracket half sampled by a golden-section step
const GOLDEN_SECTION: f64 = 2.0 - GOLDEN_RATIO;

/// Smallest load change across the final bracket, relative to the remaining
/// load residual, that still counts as the load responding to the angle.
const PLATEAU_RATIO: f64 = 1e-3;

/// Three trial entry angles (rad) expected to straddle the minimum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lower: f64,
    pub inner: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Bracketing,
    Refining,
    Converged,
    MaxIterationsReached,
    Degenerate,
}

impl SearchPhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SearchPhase::Bracketing | SearchPhase::Refining)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchEvent {
    PhaseChanged(SearchPhase),
    /// Halving the initial step never produced a decrease
    NoDescent { step: f64 },
    BracketFound { bracket: Bracket },
    /// Expansion budget ran out while the objective was still decreasing
    Unbracketed { bracket: Bracket },
    Estimate { iteration: u32, angle: f64 },
    MaxIterationsReached { estimate: f64 },
}

/// Everything the search did, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSearchReport {
    /// Bracket handed to the interpolation phase
    pub bracket: Bracket,
    pub bracketed: bool,
    pub descended: bool,
    /// Successive trial angles of the interpolation phase
    pub estimates: Vec<f64>,
    pub phase: SearchPhase,
    /// Lowest-objective entry angle evaluated (rad)
    pub estimate: f64,
    /// Angle handed to callers under the configured result policy (rad)
    pub reported_angle: f64,
}

#[derive(Debug, Clone, Copy)]
struct Point {
    alpha: f64,
    load: f64,
    value: f64,
}

impl Point {
    fn lowest(self, other: Point) -> Point {
        if other.value < self.value { other } else { self }
    }
}

/// `inner` is a strict minimum of the bracket and the load still changes
/// across it by more than a sliver of the remaining mismatch.
fn isolates_minimum(lower: Point, inner: Point, upper: Point, target_load: f64) -> bool {
    let strict = inner.value < lower.value && inner.value < upper.value;
    let response = (lower.load - inner.load)
        .abs()
        .min((upper.load - inner.load).abs());
    strict && response >= PLATEAU_RATIO * (inner.load - target_load).abs()
}

pub struct EquilibriumSolver<'a> {
    integrator: ContactIntegrator<'a>,
    config: &'a SolverConfig,
}

impl<'a> EquilibriumSolver<'a> {
    pub fn new(integrator: ContactIntegrator<'a>, config: &'a SolverConfig) -> Self {
        EquilibriumSolver { integrator, config }
    }

    fn trial(&self, alpha: f64, kinematics: &WheelKinematics, target_load: f64) -> Point {
        let load = self.integrator.vertical_stress(alpha, kinematics);
        let mismatch = load - target_load;
        Point {
            alpha,
            load,
            value: mismatch * mismatch,
        }
    }

    /// Squared mismatch between the integrated vertical load and the target.
    pub fn objective(&self, alpha: f64, kinematics: &WheelKinematics, target_load: f64) -> f64 {
        self.trial(alpha, kinematics, target_load).value
    }

    pub fn solve(&self, kinematics: &WheelKinematics, target_load: f64) -> LineSearchReport {
        let observer = self.integrator.observer();
        let f = |alpha: f64| self.trial(alpha, kinematics, target_load);

        observer.on_search_event(SearchEvent::PhaseChanged(SearchPhase::Bracketing));

        let ceiling = self.config.max_entry_angle;
        let origin = f(0.0);
        let mut step = self.config.initial_step.min(ceiling);
        let mut first = f(step);
        let mut retries = 0;
        while origin.value < first.value && retries < self.config.retry_budget {
            step /= 2.0;
            first = f(step);
            retries += 1;
        }
        let descended = origin.value >= first.value;
        if !descended {
            observer.on_search_event(SearchEvent::NoDescent { step });
        }

        let mut trail = vec![origin, first];
        let mut bracketed = false;
        for k in 1..=self.config.retry_budget.max(1) {
            let last = trail[trail.len() - 1];
            if last.alpha >= ceiling {
                break;
            }
            let next = f((last.alpha + step * GOLDEN_RATIO.powi(k as i32)).min(ceiling));
            trail.push(next);
            if next.value > last.value {
                bracketed = true;
                break;
            }
        }
        let tail = &trail[trail.len().saturating_sub(3)..];
        let (mut lower, mut inner, mut upper) = match tail {
            [l, i, u] => (*l, *i, *u),
            [l, u] => (*l, *u, *u),
            _ => (origin, first, first),
        };

        let bracket = Bracket {
            lower: lower.alpha,
            inner: inner.alpha,
            upper: upper.alpha,
        };
        if bracketed {
            observer.on_search_event(SearchEvent::BracketFound { bracket });
        } else {
            observer.on_search_event(SearchEvent::Unbracketed { bracket });
        }

        observer.on_search_event(SearchEvent::PhaseChanged(SearchPhase::Refining));

        let mut best = inner.lowest(lower).lowest(upper);
        let mut estimates = Vec::new();
        let mut previous: Option<f64> = None;
        // Distance from inner of the step before last and of the last step
        let mut moves = (f64::INFINITY, f64::INFINITY);
        let mut phase = SearchPhase::MaxIterationsReached;

        for iteration in 0..self.config.max_iterations {
            let (l, i, u) = (lower.alpha, inner.alpha, upper.alpha);
            if u == l || i == l || u == i {
                observer.on_degeneracy(NumericDegeneracy::ZeroBracketWidth {
                    lower: l,
                    inner: i,
                    upper: u,
                });
                phase = SearchPhase::Degenerate;
                break;
            }

            let a2 = ((upper.value - lower.value) / (u - l) - (inner.value - lower.value) / (i - l))
                / (u - i);
            let a1 = (inner.value - lower.value) / (i - l) - a2 * (l + i);
            let vertex = -a1 / (2.0 * a2);
            if a2 == 0.0 || !vertex.is_finite() {
                observer.on_degeneracy(NumericDegeneracy::FlatParabola { curvature: a2 });
                phase = SearchPhase::Degenerate;
                break;
            }

            let parabolic = a2 > 0.0
                && vertex > l
                && vertex < u
                && vertex != i
                && (vertex - i).abs() < 0.5 * moves.0;
            let alpha = if parabolic {
                vertex
            } else if u - i >= i - l {
                i + GOLDEN_SECTION * (u - i)
            } else {
                i - GOLDEN_SECTION * (i - l)
            };
            moves = (moves.1, (alpha - i).abs());

            let candidate = f(alpha);
            if alpha > i {
                if candidate.value < inner.value {
                    lower = inner;
                    inner = candidate;
                } else {
                    upper = candidate;
                }
            } else if candidate.value < inner.value {
                upper = inner;
                inner = candidate;
            } else {
                lower = candidate;
            }
            best = best.lowest(candidate);

            estimates.push(alpha);
            observer.on_search_event(SearchEvent::Estimate { iteration, angle: alpha });

            let settled = previous.is_some_and(|prev| (alpha - prev).abs() < self.config.tolerance)
                && upper.alpha - lower.alpha < self.config.tolerance;
            previous = Some(alpha);
            if settled {
                if isolates_minimum(lower, inner, upper, target_load) {
                    phase = SearchPhase::Converged;
                } else {
                    observer.on_degeneracy(NumericDegeneracy::FlatObjective {
                        lower: lower.alpha,
                        upper: upper.alpha,
                        residual: inner.load - target_load,
                    });
                    phase = SearchPhase::Degenerate;
                }
                break;
            }
        }

        let estimate = best.alpha;
        if phase == SearchPhase::MaxIterationsReached {
            observer.on_search_event(SearchEvent::MaxIterationsReached { estimate });
        }
        observer.on_search_event(SearchEvent::PhaseChanged(phase));

        let reported_angle = match self.config.result_policy {
            ResultPolicy::Estimate => estimate,
            ResultPolicy::LegacyConstant => LEGACY_SOLVED_ANGLE_DEG.to_radians(),
        };

        LineSearchReport {
            bracket,
            bracketed,
            descended,
            estimates,
            phase,
            estimate,
            reported_angle,
        }
    }
}
