//! A from-scratch conflict-driven clause-learning (CDCL) SAT solver core.
//!
//! Two-watched-literal Boolean constraint propagation, First-UIP conflict analysis, and
//! non-chronological backjumping, with a decision loop driven by a growing conflict budget
//! instead of a restart policy. No incremental solving, no proof emission, no preprocessing,
//! no clause-database reduction, and no VSIDS activity heuristic: see DESIGN.md for why.

mod clause;
mod lit;
mod rng;
mod solver;
mod stats;
mod watch;

pub use clause::{ClauseOrigin, CRef};
pub use lit::{LBool, Lit, Var};
pub use rng::{Rng, DEFAULT_SEED};
pub use solver::{Solver, SolverStatus};
pub use stats::Stats;
