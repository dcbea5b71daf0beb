//! The watch index: per-literal lists of watchers, keyed densely by [`Lit::idx`].

use crate::clause::CRef;
use crate::lit::Lit;

/// A watcher: the clause being watched, plus a cached "blocker" literal from the same
/// clause used as a cheap satisfaction hint during BCP.
#[derive(Clone, Copy, Debug)]
pub struct Watcher {
    pub cref: CRef,
    pub blocker: Lit,
}

impl Watcher {
    #[inline]
    pub fn new(cref: CRef, blocker: Lit) -> Self {
        Watcher { cref, blocker }
    }
}

/// `watchers[lit.idx()]` is the list of watchers that must be re-examined when `lit` becomes
/// false. Grows monotonically alongside the variable space; never shrinks.
#[derive(Default, Debug)]
pub struct WatchIndex {
    watchers: Vec<Vec<Watcher>>,
}

impl WatchIndex {
    pub fn new() -> Self {
        WatchIndex { watchers: vec![] }
    }

    /// Ensure the index has room for literals up to `num_lits` (exclusive).
    pub fn ensure_len(&mut self, num_lits: usize) {
        if self.watchers.len() < num_lits {
            self.watchers.resize_with(num_lits, Vec::new);
        }
    }

    #[inline]
    pub fn push(&mut self, lit: Lit, w: Watcher) {
        self.watchers[lit.idx()].push(w);
    }

    /// Take the watch list for `lit` out of the index, leaving an empty `Vec` in its place.
    ///
    /// Used by BCP to walk and compact a literal's own watch list while still being able to
    /// push relocated watchers into a *different* literal's list without ever holding two
    /// simultaneous mutable borrows into the same `Vec<Vec<Watcher>>` (the safe-Rust
    /// counterpart to the raw-pointer trick the teacher's propagate loop uses).
    #[inline]
    pub fn take(&mut self, lit: Lit) -> Vec<Watcher> {
        std::mem::take(&mut self.watchers[lit.idx()])
    }

    #[inline]
    pub fn put_back(&mut self, lit: Lit, ws: Vec<Watcher>) {
        self.watchers[lit.idx()] = ws;
    }

    #[cfg(test)]
    fn get(&self, lit: Lit) -> &[Watcher] {
        &self.watchers[lit.idx()]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::clause::CRef;
    use crate::lit::Var;

    fn lit(v: u32, sign: bool) -> Lit {
        Lit::new(Var::from_idx(v), sign)
    }

    #[test]
    fn take_empties_and_put_back_restores() {
        let mut wl = WatchIndex::new();
        wl.ensure_len(4);
        let l = lit(0, false);
        wl.push(l, Watcher::new(CRef::UNDEF, lit(1, false)));
        assert_eq!(wl.get(l).len(), 1);
        let taken = wl.take(l);
        assert_eq!(wl.get(l).len(), 0);
        assert_eq!(taken.len(), 1);
        wl.put_back(l, taken);
        assert_eq!(wl.get(l).len(), 1);
    }
}
