//! Literal and three-valued-logic algebra.
//!
//! A [`Var`] is a dense non-negative identifier; a [`Lit`] pairs a `Var` with a polarity.
//! Both pack into a single `i32` so they stay `Copy` and index densely into flat arrays.

use std::fmt;
use std::ops::Not;

/// A Boolean variable, identified by a dense non-negative index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(i32);

impl Var {
    /// Sentinel for "no variable". Never produced by [`Var::from_idx`].
    pub const UNDEF: Var = Var(-1);

    #[inline]
    pub fn from_idx(idx: u32) -> Self {
        Var(idx as i32)
    }

    #[inline]
    pub fn idx(self) -> u32 {
        debug_assert!(self.is_valid());
        self.0 as u32
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Var({})", self.0)
        } else {
            write!(f, "Var(undef)")
        }
    }
}

/// A literal: a variable together with a polarity (`sign = false` is the positive literal).
///
/// Packed as `2*var + sign` so [`Lit::idx`] is dense and suitable as a flat-array key, per
/// the two-watched-literal scheme's indexing requirement.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(i32);

impl Lit {
    /// Sentinel "invalid" literal, returned by the decision heuristic when no unassigned
    /// variable remains.
    pub const UNDEF: Lit = Lit(-2);

    #[inline]
    pub fn new(var: Var, sign: bool) -> Self {
        debug_assert!(var.is_valid());
        Lit((var.0 << 1) | sign as i32)
    }

    #[inline]
    pub fn var(self) -> Var {
        Var(self.0 >> 1)
    }

    #[inline]
    pub fn sign(self) -> bool {
        (self.0 & 1) != 0
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }

    /// Dense index `2*var + sign`, used to key watch lists and reason arrays.
    #[inline]
    pub fn idx(self) -> usize {
        debug_assert!(self.is_valid());
        self.0 as usize
    }
}

impl Not for Lit {
    type Output = Lit;
    #[inline]
    fn not(self) -> Lit {
        Lit(self.0 ^ 1)
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            write!(f, "Lit(undef)")
        } else if self.sign() {
            write!(f, "-{}", self.var().idx() + 1)
        } else {
            write!(f, "{}", self.var().idx() + 1)
        }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Reads a literal out of a DIMACS-style nonzero integer (`v>0` positive, `v<0` negated,
/// 1-indexed variable).
impl From<i32> for Lit {
    #[inline]
    fn from(v: i32) -> Self {
        debug_assert_ne!(v, 0);
        Lit::new(Var::from_idx((v.abs() - 1) as u32), v < 0)
    }
}

/// Three-valued logic value: `TRUE`, `FALSE`, or `UNKNOWN`.
///
/// Negation is involutive and fixes `UNKNOWN` (`~UNKNOWN == UNKNOWN`).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LBool(i8);

impl LBool {
    pub const TRUE: LBool = LBool(0);
    pub const FALSE: LBool = LBool(1);
    pub const UNKNOWN: LBool = LBool(2);

    #[inline]
    pub fn of_bool(b: bool) -> Self {
        if b {
            LBool::TRUE
        } else {
            LBool::FALSE
        }
    }

    #[inline]
    pub fn is_true(self) -> bool {
        self == LBool::TRUE
    }

    #[inline]
    pub fn is_false(self) -> bool {
        self == LBool::FALSE
    }

    #[inline]
    pub fn is_unknown(self) -> bool {
        self == LBool::UNKNOWN
    }

    /// Value of `self` seen through a literal's polarity: flips TRUE/FALSE when `sign` is
    /// set, leaves UNKNOWN untouched.
    #[inline]
    pub fn under_sign(self, sign: bool) -> LBool {
        if self.is_unknown() || !sign {
            self
        } else {
            !self
        }
    }
}

impl Not for LBool {
    type Output = LBool;
    #[inline]
    fn not(self) -> LBool {
        match self {
            LBool::TRUE => LBool::FALSE,
            LBool::FALSE => LBool::TRUE,
            _ => LBool::UNKNOWN,
        }
    }
}

impl fmt::Debug for LBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            LBool::TRUE => "T",
            LBool::FALSE => "F",
            _ => "U",
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lit_negation_round_trips() {
        for v in 0..8u32 {
            let lit = Lit::new(Var::from_idx(v), false);
            assert_eq!(!!lit, lit);
            assert_ne!(lit, !lit);
            assert_eq!((!lit).var(), lit.var());
            assert!(!lit.sign());
            assert!((!lit).sign());
        }
    }

    #[test]
    fn lit_index_is_dense() {
        let seen: Vec<usize> = (0..8u32)
            .flat_map(|v| {
                let lit = Lit::new(Var::from_idx(v), false);
                vec![lit.idx(), (!lit).idx()]
            })
            .collect();
        let mut sorted = seen.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), seen.len(), "indices must be dense and unique");
        assert_eq!(sorted, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn lit_from_dimacs_int() {
        let pos = Lit::from(3);
        assert_eq!(pos.var(), Var::from_idx(2));
        assert!(!pos.sign());
        let neg = Lit::from(-3);
        assert_eq!(neg.var(), Var::from_idx(2));
        assert!(neg.sign());
    }

    #[test]
    fn lbool_negation_fixes_unknown() {
        assert_eq!(!LBool::UNKNOWN, LBool::UNKNOWN);
        assert_eq!(!LBool::TRUE, LBool::FALSE);
        assert_eq!(!LBool::FALSE, LBool::TRUE);
    }

    #[test]
    fn lbool_under_sign() {
        assert_eq!(LBool::TRUE.under_sign(false), LBool::TRUE);
        assert_eq!(LBool::TRUE.under_sign(true), LBool::FALSE);
        assert_eq!(LBool::UNKNOWN.under_sign(true), LBool::UNKNOWN);
    }
}
