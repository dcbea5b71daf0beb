//! The CDCL search engine: trail, two-watched-literal BCP, First-UIP conflict analysis,
//! non-chronological backjumping, and the growing-conflict-budget decision loop.

use crate::clause::{ClauseAllocator, ClauseOrigin, CRef};
use crate::lit::{LBool, Lit, Var};
use crate::rng::{Rng, DEFAULT_SEED};
use crate::stats::Stats;
use crate::watch::{WatchIndex, Watcher};

macro_rules! sat_log {
    (trace, $($arg:tt)*) => {
        #[cfg(feature = "logging")]
        log::trace!($($arg)*);
    };
    (debug, $($arg:tt)*) => {
        #[cfg(feature = "logging")]
        log::debug!($($arg)*);
    };
}

/// Overall solver status.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SolverStatus {
    Unsolved,
    Sat,
    Unsat,
}

/// Result of input-clause simplification (§4.10).
enum SimplifyResult {
    /// Clause is trivially satisfied (tautology, or already true at level 0); drop it.
    True,
    /// Clause simplified to the empty clause: the formula is UNSAT.
    False,
    /// Clause has at least one literal left; proceed to store/enqueue it.
    Unknown,
}

/// The CDCL solver core.
///
/// Owns every clause, the watch index, the trail, and all per-variable bookkeeping. Not
/// thread-safe; callers must externally serialize access to a single instance.
pub struct Solver {
    ca: ClauseAllocator,
    clauses: Vec<CRef>,
    learnts: Vec<CRef>,
    watches: WatchIndex,

    /// `value[var]`, three-valued, `UNKNOWN` for unassigned.
    values: Vec<LBool>,
    /// `level[var]`, or -1 if unassigned.
    var_level: Vec<i32>,
    /// `reason[lit.idx()]`: the clause that forced this literal, or `CRef::UNDEF`.
    reasons: Vec<CRef>,

    trail: Vec<Lit>,
    trail_lim: Vec<usize>,
    trail_head: usize,

    /// LIFO pool of candidate decision variables. Not VSIDS: no activity is tracked.
    var_order: Vec<Var>,

    /// Highest variable index mentioned so far, or -1 if none.
    max_var_id: i32,

    status: SolverStatus,
    model: Vec<LBool>,

    rng: Rng,
    stats: Stats,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Solver::with_seed(DEFAULT_SEED)
    }

    /// Construct a solver with an explicit polarity-PRNG seed, for reproducible branching.
    pub fn with_seed(seed: f64) -> Self {
        Solver {
            ca: ClauseAllocator::new(),
            clauses: vec![],
            learnts: vec![],
            watches: WatchIndex::new(),
            values: vec![],
            var_level: vec![],
            reasons: vec![],
            trail: vec![],
            trail_lim: vec![],
            trail_head: 0,
            var_order: vec![],
            max_var_id: -1,
            status: SolverStatus::Unsolved,
            model: vec![],
            rng: Rng::new(seed),
            stats: Stats::new(),
        }
    }

    // ----- public queries -----------------------------------------------------------

    #[inline]
    pub fn num_vars(&self) -> u32 {
        (self.max_var_id + 1).max(0) as u32
    }

    #[inline]
    pub fn clause_count(&self) -> u32 {
        (self.clauses.len() + self.learnts.len()) as u32
    }

    #[inline]
    pub fn status(&self) -> SolverStatus {
        self.status
    }

    /// The satisfying assignment, indexed by variable. Pre: `status() == Sat`.
    pub fn model(&self) -> &[LBool] {
        debug_assert_eq!(self.status, SolverStatus::Sat, "model() requires status() == Sat");
        &self.model
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Cancels all decisions back to level 0 and returns to `Unsolved`, preserving the
    /// clause database. No-op if the solver is already `Unsat`.
    pub fn reset_status(&mut self) {
        if self.status != SolverStatus::Unsat {
            self.cancel_until(0);
            self.status = SolverStatus::Unsolved;
        }
    }

    // ----- clause addition (§4.10) ---------------------------------------------------

    pub fn add(&mut self, lit: Lit) -> bool {
        self.add_clause_impl(vec![lit])
    }

    pub fn add2(&mut self, a: Lit, b: Lit) -> bool {
        if a == b {
            self.add_clause_impl(vec![a])
        } else {
            self.add_clause_impl(vec![a, b])
        }
    }

    pub fn add3(&mut self, a: Lit, b: Lit, c: Lit) -> bool {
        self.add_clause_impl(vec![a, b, c])
    }

    pub fn add_clause(&mut self, lits: &[Lit]) -> bool {
        self.add_clause_impl(lits.to_vec())
    }

    fn add_clause_impl(&mut self, mut lits: Vec<Lit>) -> bool {
        debug_assert!(
            self.status != SolverStatus::Unsat && self.current_level() == 0,
            "add_clause called on an UNSAT solver or with pending decisions"
        );
        for &l in &lits {
            debug_assert!(l.is_valid(), "invalid literal passed to add_clause");
        }
        self.mention_vars(&lits);

        match self.simplify_for_input(&mut lits) {
            SimplifyResult::True => return true,
            SimplifyResult::False => {
                self.status = SolverStatus::Unsat;
                return false;
            }
            SimplifyResult::Unknown => {}
        }

        if lits.is_empty() {
            self.status = SolverStatus::Unsat;
            return false;
        }
        if lits.len() == 1 {
            self.enqueue(lits[0], CRef::UNDEF);
            return true;
        }
        let cr = self.attach_new_clause(lits, ClauseOrigin::Formula);
        self.clauses.push(cr);
        true
    }

    /// Sort + dedupe, tautology check, and simplification against the current ground
    /// (level-0) assignment. See §4.10.
    fn simplify_for_input(&self, lits: &mut Vec<Lit>) -> SimplifyResult {
        lits.sort_unstable();
        lits.dedup();

        for w in lits.windows(2) {
            if w[0].var() == w[1].var() {
                // adjacent, distinct, same var => opposite signs => tautology
                return SimplifyResult::True;
            }
        }

        let mut write = 0;
        for read in 0..lits.len() {
            let l = lits[read];
            let val = self.value_lit(l);
            if val.is_true() {
                return SimplifyResult::True;
            } else if !val.is_false() {
                lits[write] = l;
                write += 1;
            }
        }
        lits.truncate(write);

        if lits.is_empty() {
            SimplifyResult::False
        } else {
            SimplifyResult::Unknown
        }
    }

    /// Grows `var_order`/`values`/`var_level`/`reasons`/`watches` to cover every variable
    /// mentioned in `lits`, per the growth policy in §4.10.
    fn mention_vars(&mut self, lits: &[Lit]) {
        let old_max = self.max_var_id;
        let mut new_max = old_max;
        for l in lits {
            let v = l.var().idx() as i32;
            if v > new_max {
                new_max = v;
            }
        }
        if new_max <= old_max {
            return;
        }
        let start = if old_max < 0 { 0 } else { old_max + 1 };
        for v in start..=new_max {
            self.var_order.push(Var::from_idx(v as u32));
        }
        self.max_var_id = new_max;

        let required = (new_max + 1) as usize;
        if required > self.values.len() {
            let grown = ((1.3 * required as f64) as usize).max(required + 5);
            self.values.resize(grown, LBool::UNKNOWN);
            self.var_level.resize(grown, -1);
            self.reasons.resize(2 * grown, CRef::UNDEF);
            self.watches.ensure_len(2 * grown);
            sat_log!(debug, "grew variable arrays to capacity {}", grown);
        }
    }

    fn attach_new_clause(&mut self, lits: Vec<Lit>, origin: ClauseOrigin) -> CRef {
        let (c0, c1) = (lits[0], lits[1]);
        let cr = self.ca.alloc(lits, origin);
        self.watches.push(!c0, Watcher::new(cr, c1));
        self.watches.push(!c1, Watcher::new(cr, c0));
        cr
    }

    // ----- trail & values (§4.4) ------------------------------------------------------

    #[inline]
    fn value_var(&self, var: Var) -> LBool {
        self.values[var.idx() as usize]
    }

    #[inline]
    fn value_lit(&self, lit: Lit) -> LBool {
        self.value_var(lit.var()).under_sign(lit.sign())
    }

    #[inline]
    pub fn current_level(&self) -> u32 {
        self.trail_lim.len() as u32
    }

    fn new_decision_level(&mut self) {
        self.trail_lim.push(self.trail.len());
    }

    /// Pre: `value[lit.var] == UNKNOWN`. Records the assignment; does not propagate.
    fn enqueue(&mut self, lit: Lit, reason: CRef) {
        debug_assert!(self.value_lit(lit).is_unknown());
        self.values[lit.var().idx() as usize] = LBool::of_bool(!lit.sign());
        self.var_level[lit.var().idx() as usize] = self.current_level() as i32;
        self.reasons[lit.idx()] = reason;
        self.trail.push(lit);
    }

    // ----- BCP (§4.5) -------------------------------------------------------------------

    /// Propagates all enqueued facts. Returns the conflicting clause, or `CRef::UNDEF` at
    /// fixpoint.
    fn propagate(&mut self) -> CRef {
        let mut confl = CRef::UNDEF;

        while self.trail_head < self.trail.len() {
            let p = self.trail[self.trail_head];
            self.trail_head += 1;
            self.stats.record_propagation();
            let false_lit = !p;

            let mut ws = self.watches.take(p);
            let end = ws.len();
            let mut i = 0usize;
            let mut j = 0usize;

            while i < end {
                let blocker = ws[i].blocker;
                if self.value_lit(blocker).is_true() {
                    ws[j] = ws[i];
                    j += 1;
                    i += 1;
                    continue;
                }

                let cr = ws[i].cref;
                i += 1;

                if self.ca.get(cr)[0] == false_lit {
                    self.ca.get_mut(cr).swap(0, 1);
                }
                debug_assert_eq!(self.ca.get(cr)[1], false_lit);

                let first = self.ca.get(cr)[0];
                let w = Watcher::new(cr, first);
                if first != blocker && self.value_lit(first).is_true() {
                    ws[j] = w;
                    j += 1;
                    continue;
                }

                let mut relocated = false;
                let len = self.ca.get(cr).len();
                for k in 2..len {
                    if !self.value_lit(self.ca.get(cr)[k]).is_false() {
                        self.ca.get_mut(cr).swap(1, k);
                        let new_watch = !self.ca.get(cr)[1];
                        debug_assert_ne!(new_watch, p);
                        self.watches.push(new_watch, w);
                        relocated = true;
                        break;
                    }
                }
                if relocated {
                    continue;
                }

                // no replacement watch found: unit or conflict under `first`
                ws[j] = w;
                j += 1;
                if self.value_lit(first).is_false() {
                    confl = cr;
                    self.trail_head = self.trail.len();
                    while i < end {
                        ws[j] = ws[i];
                        j += 1;
                        i += 1;
                    }
                } else {
                    self.enqueue(first, cr);
                }
            }

            ws.truncate(j);
            self.watches.put_back(p, ws);

            if confl.is_valid() {
                sat_log!(trace, "conflict detected while propagating {:?}", p);
                break;
            }
        }

        confl
    }

    // ----- conflict analysis (§4.6) ------------------------------------------------------

    /// First-UIP resolution. Returns `(learned_clause, backjump_level)`; `backjump_level <
    /// 0` signals UNSAT.
    fn analyze(&mut self, confl0: CRef) -> (Vec<Lit>, i32) {
        {
            let pivot_var = self.ca.get(confl0)[0].var();
            if self.var_level[pivot_var.idx() as usize] <= 0 {
                return (vec![], -1);
            }
        }

        let mut seen = vec![false; self.values.len()];
        let mut path_count: i32 = 0;
        let mut p: Option<Lit> = None;
        let mut confl = confl0;
        let mut learned: Vec<Lit> = vec![Lit::UNDEF];
        let mut index = self.trail.len();
        let current_level = self.current_level() as i32;

        loop {
            let start_j = if p.is_none() { 0 } else { 1 };
            let len = self.ca.get(confl).len();
            for j in start_j..len {
                let q = self.ca.get(confl)[j];
                let qv = q.var().idx() as usize;
                if seen[qv] {
                    continue;
                }
                let qlevel = self.var_level[qv];
                if qlevel <= 0 {
                    continue;
                }
                seen[qv] = true;
                if qlevel >= current_level {
                    path_count += 1;
                } else {
                    learned.push(q);
                }
            }

            loop {
                index -= 1;
                if seen[self.trail[index].var().idx() as usize] {
                    break;
                }
            }
            let pick = self.trail[index];
            seen[pick.var().idx() as usize] = false;
            confl = self.reasons[pick.idx()];
            path_count -= 1;
            p = Some(pick);
            if path_count <= 0 {
                break;
            }
        }

        let p = p.expect("analyze always resolves at least one literal");
        learned[0] = !p;
        Self::simplify_learned(&mut learned);

        let backjump_level = learned[1..]
            .iter()
            .map(|l| self.var_level[l.var().idx() as usize])
            .max()
            .unwrap_or(0);

        sat_log!(
            debug,
            "learned clause of size {} asserting {:?}, backjump to level {}",
            learned.len(),
            learned[0],
            backjump_level
        );

        (learned, backjump_level)
    }

    /// Dedupe the non-asserting literals (positions `>= 1`), leaving the asserting literal
    /// at position 0 untouched. No tautology check is needed: resolution never introduces
    /// opposite-signed literals over the same variable into the learned clause.
    fn simplify_learned(lits: &mut Vec<Lit>) {
        if lits.len() > 1 {
            lits[1..].sort_unstable();
        }
        lits.dedup();
    }

    // ----- backjumping (§4.7) ------------------------------------------------------------

    /// Undo the trail and variable assignments down to `level`, restoring every variable
    /// decided above it to `var_order`.
    fn cancel_until(&mut self, level: u32) {
        let cur = self.current_level();
        debug_assert!(level <= cur);
        if level == cur {
            return;
        }

        for k in level..cur {
            let idx = self.trail_lim[k as usize];
            self.var_order.push(self.trail[idx].var());
        }

        let cut = if level == 0 {
            self.trail_lim[0]
        } else {
            self.trail_lim[(level - 1) as usize]
        };

        for i in (cut..self.trail.len()).rev() {
            let var = self.trail[i].var();
            self.values[var.idx() as usize] = LBool::UNKNOWN;
        }

        self.trail.truncate(cut);
        self.trail_lim.truncate(level as usize);
        self.trail_head = self.trail.len();
    }

    // ----- decision heuristic (§4.8) ------------------------------------------------------

    /// Pops `var_order` until an unassigned variable is found, returning a literal with a
    /// polarity chosen by the seeded PRNG. Returns `Lit::UNDEF` when every variable is
    /// assigned (signals SAT).
    fn pick_branching_literal(&mut self) -> Lit {
        while let Some(v) = self.var_order.pop() {
            if self.value_var(v).is_unknown() {
                let sign = self.rng.next_bool();
                return Lit::new(v, sign);
            }
        }
        Lit::UNDEF
    }

    // ----- driver (§4.9) -------------------------------------------------------------------

    /// Decides satisfiability, running to completion. Idempotent once a final status is
    /// reached.
    pub fn solve(&mut self) -> SolverStatus {
        if self.status != SolverStatus::Unsolved {
            return self.status;
        }

        let confl = self.propagate();
        if confl.is_valid() {
            self.status = SolverStatus::Unsat;
            return self.status;
        }

        let mut budget: u64 = 1000;
        loop {
            let s = self.solve_limit(budget);
            if s != SolverStatus::Unsolved {
                self.status = s;
                if s == SolverStatus::Sat {
                    self.model = self.values[..self.num_vars() as usize].to_vec();
                }
                return s;
            }
            budget += 100;
        }
    }

    /// Runs propagate/analyze/decide until `max_conflicts` conflicts have been hit, or a
    /// final status is reached. Returns `Unsolved` if the budget ran out first.
    pub fn solve_limit(&mut self, max_conflicts: u64) -> SolverStatus {
        let mut n_conf: u64 = 0;

        while n_conf < max_conflicts {
            let confl = self.propagate();

            if confl.is_valid() {
                self.stats.record_conflict();
                n_conf += 1;

                let (learned, bl) = self.analyze(confl);
                if bl < 0 {
                    return SolverStatus::Unsat;
                }
                self.cancel_until(bl as u32);

                if learned.len() == 1 {
                    self.enqueue(learned[0], CRef::UNDEF);
                } else {
                    let lit0 = learned[0];
                    let cr = self.attach_new_clause(learned, ClauseOrigin::Learned);
                    self.learnts.push(cr);
                    self.stats.record_learned_clause();
                    self.enqueue(lit0, cr);
                }
            } else {
                let lit = self.pick_branching_literal();
                if !lit.is_valid() {
                    return SolverStatus::Sat;
                }
                self.new_decision_level();
                self.stats.record_decision(self.current_level());
                sat_log!(trace, "decide {:?} at level {}", lit, self.current_level());
                self.enqueue(lit, CRef::UNDEF);
            }
        }

        SolverStatus::Unsolved
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lit::Var;

    fn lit(v: u32, sign: bool) -> Lit {
        Lit::new(Var::from_idx(v), sign)
    }

    #[test]
    fn empty_formula_is_sat() {
        let mut s = Solver::new();
        assert_eq!(s.solve(), SolverStatus::Sat);
    }

    #[test]
    fn single_unit_clause() {
        let mut s = Solver::new();
        assert!(s.add(lit(0, false)));
        assert_eq!(s.solve(), SolverStatus::Sat);
        assert!(s.model()[0].is_true());
    }

    #[test]
    fn direct_contradiction_is_unsat_during_add() {
        let mut s = Solver::new();
        assert!(s.add(lit(0, false)));
        assert!(!s.add(lit(0, true)));
        assert_eq!(s.status(), SolverStatus::Unsat);
    }

    #[test]
    fn tautology_is_dropped() {
        let mut s = Solver::new();
        let before = s.clause_count();
        assert!(s.add2(lit(0, false), lit(0, true)));
        assert_eq!(s.clause_count(), before);
        assert_eq!(s.status(), SolverStatus::Unsolved);
    }

    #[test]
    fn duplicate_literal_collapses_to_unit() {
        let mut s1 = Solver::new();
        s1.add3(lit(0, false), lit(1, false), lit(1, false));
        let mut s2 = Solver::new();
        s2.add2(lit(0, false), lit(1, false));
        assert_eq!(s1.solve(), s2.solve());
    }

    #[test]
    fn small_3sat_instance_is_satisfiable() {
        let mut s = Solver::new();
        let (x, y, z) = (lit(0, false), lit(1, false), lit(2, false));
        s.add_clause(&[x, y, z]);
        s.add2(x, !y);
        s.add2(!x, y);
        s.add3(!x, !y, z);
        assert_eq!(s.solve(), SolverStatus::Sat);
        let m = s.model();
        let sat = |l: Lit| m[l.var().idx() as usize].under_sign(l.sign()).is_true();
        assert!(sat(x) || sat(y) || sat(z));
        assert!(sat(x) || !sat(y));
        assert!(!sat(x) || sat(y));
        assert!(!sat(x) || !sat(y) || sat(z));
    }

    #[test]
    fn idempotent_solve() {
        let mut s = Solver::new();
        s.add(lit(0, false));
        let first = s.solve();
        let second = s.solve();
        assert_eq!(first, second);
    }

    #[test]
    fn reset_status_allows_new_clauses_after_cancel() {
        let mut s = Solver::new();
        s.add2(lit(0, false), lit(1, false));
        assert_eq!(s.solve(), SolverStatus::Sat);
        s.reset_status();
        assert_eq!(s.status(), SolverStatus::Unsolved);
        assert!(s.add(lit(2, false)));
    }
}
