//! Concrete scenarios from SPEC_FULL.md §8.

use cdcl_core::{Lit, Solver, SolverStatus, Var};

fn lit(v: u32, sign: bool) -> Lit {
    Lit::new(Var::from_idx(v), sign)
}

/// Scenario 1: the empty formula is trivially satisfiable.
#[test]
fn scenario_empty_formula_is_sat() {
    let mut s = Solver::new();
    assert_eq!(s.solve(), SolverStatus::Sat);
}

/// Scenario 2: a single unit clause forces its literal true.
#[test]
fn scenario_single_unit_clause() {
    let mut s = Solver::new();
    assert!(s.add(lit(0, false)));
    assert_eq!(s.solve(), SolverStatus::Sat);
    assert!(s.model()[0].is_true());
}

/// Scenario 3: a direct contradiction is caught while adding the second unit clause, not
/// deferred to `solve()`.
#[test]
fn scenario_direct_contradiction_during_add() {
    let mut s = Solver::new();
    assert!(s.add(lit(0, false)));
    assert_eq!(s.status(), SolverStatus::Unsolved);
    assert!(!s.add(lit(0, true)));
    assert_eq!(s.status(), SolverStatus::Unsat);
}

/// Scenario 4: a small hand-picked 3-SAT instance is satisfiable, and the model actually
/// satisfies every clause.
#[test]
fn scenario_small_3sat_is_satisfiable() {
    let mut s = Solver::new();
    let (x, y, z) = (lit(0, false), lit(1, false), lit(2, false));

    // (x | y | z) & (x | ~y) & (~x | y) & (~x | ~y | z)
    assert!(s.add_clause(&[x, y, z]));
    assert!(s.add2(x, !y));
    assert!(s.add2(!x, y));
    assert!(s.add3(!x, !y, z));

    assert_eq!(s.solve(), SolverStatus::Sat);
    let m = s.model().to_vec();
    let holds = |l: Lit| m[l.var().idx() as usize].under_sign(l.sign()).is_true();
    assert!(holds(x) || holds(y) || holds(z));
    assert!(holds(x) || !holds(y));
    assert!(!holds(x) || holds(y));
    assert!(!holds(x) || !holds(y) || holds(z));
}

/// Scenario 5: the pigeonhole instance PHP(3,2) (three pigeons, two holes) is unsatisfiable.
/// Variables `p(i, j)` (pigeon `i` in hole `j`) are encoded as `i * 2 + j`.
#[test]
fn scenario_pigeonhole_php_3_2_is_unsat() {
    let mut s = Solver::new();
    let p = |i: u32, j: u32| lit(i * 2 + j, false);

    // every pigeon sits in at least one hole
    for i in 0..3 {
        s.add2(p(i, 0), p(i, 1));
    }
    // no hole holds two pigeons
    for j in 0..2 {
        for i in 0..3 {
            for k in (i + 1)..3 {
                s.add2(!p(i, j), !p(k, j));
            }
        }
    }

    assert_eq!(s.solve(), SolverStatus::Unsat);
}

/// Scenario 6: conflict-driven learning fires (at least one learned clause is recorded)
/// before the solver settles on UNSAT for an instance that requires backjumping to solve.
#[test]
fn scenario_learned_clause_observed_before_unsat() {
    let mut s = Solver::new();
    let p = |i: u32, j: u32| lit(i * 2 + j, false);

    for i in 0..3 {
        s.add2(p(i, 0), p(i, 1));
    }
    for j in 0..2 {
        for i in 0..3 {
            for k in (i + 1)..3 {
                s.add2(!p(i, j), !p(k, j));
            }
        }
    }

    assert_eq!(s.solve(), SolverStatus::Unsat);
    assert!(s.stats().conflicts >= 1);
    assert!(s.stats().learned_clauses >= 1);
}

#[test]
fn reset_status_preserves_clauses_across_resolve() {
    let mut s = Solver::new();
    s.add2(lit(0, false), lit(1, false));
    assert_eq!(s.solve(), SolverStatus::Sat);
    let clauses_before = s.clause_count();
    s.reset_status();
    assert_eq!(s.status(), SolverStatus::Unsolved);
    assert_eq!(s.clause_count(), clauses_before);
    assert_eq!(s.solve(), SolverStatus::Sat);
}
