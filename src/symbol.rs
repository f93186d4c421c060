//! String interning.
//!
//! Identifiers and field names flow through the checker constantly (struct
//! field lookup, builtin dispatch, map-key canonicalization); interning them
//! once keeps comparisons to a `u32` equality check instead of a string
//! compare.

use std::fmt;
use hashbrown::HashMap;

/// An interned string. Cheap to copy and compare.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl fmt::Debug for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Symbol({})", self.0)
  }
}

impl Symbol {
  /// The interned symbol for the empty identifier `_`.
  pub const UNDER: Symbol = Symbol(0);

  #[must_use] pub(crate) fn into_usize(self) -> usize { self.0 as usize }
}

/// Owns the string arena backing all [`Symbol`]s produced during a checking
/// pass. One [`Interner`] per [`crate::Checker`] instance; see base §5
/// ("Global mutable state: none; the checker instance owns all mutable
/// state").
#[derive(Default)]
pub struct Interner {
  strings: Vec<Box<str>>,
  lookup: HashMap<Box<str>, Symbol>,
}

impl Interner {
  #[must_use] pub fn new() -> Self {
    let mut this = Self::default();
    this.intern("_");
    this
  }

  /// Intern `s`, returning a stable [`Symbol`]. Interning the same string
  /// twice returns the same symbol.
  pub fn intern(&mut self, s: &str) -> Symbol {
    if let Some(&sym) = self.lookup.get(s) { return sym }
    let sym = Symbol(u32::try_from(self.strings.len()).expect("too many symbols"));
    self.strings.push(s.into());
    self.lookup.insert(s.into(), sym);
    sym
  }

  /// Recover the string backing a symbol.
  #[must_use] pub fn resolve(&self, sym: Symbol) -> &str { &self.strings[sym.into_usize()] }
}
