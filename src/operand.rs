//! The [`Operand`] record (base §3), the mutable value threaded through
//! every recursive checking call. Kept small and `Copy`-friendly per base §9
//! ("Keep the record small (≤ 6 machine words) since it is copied by value
//! at every recursion boundary").

use crate::ast::Expr;
use crate::konst::Const;
use crate::symbol::Symbol;
use crate::types::Ty;

/// base §3 "mode ∈ { invalid, novalue, builtin, typexpr, constant, variable,
/// mapindex, value, commaok }".
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Mode {
  Invalid,
  NoValue,
  Builtin,
  TypeExpr,
  Constant,
  Variable,
  MapIndex,
  Value,
  CommaOk,
}

impl Mode {
  /// base §3 "mapindex: ... eligible for the two-result comma-ok form";
  /// base glossary "Comma-ok mode: the expression may be consumed in a
  /// two-result assignment form".
  #[must_use] pub fn is_comma_ok_eligible(self) -> bool { matches!(self, Mode::CommaOk | Mode::MapIndex) }

  /// base §3 "variable: addressable l-value".
  #[must_use] pub fn is_addressable(self) -> bool { matches!(self, Mode::Variable) }
}

/// A predeclared builtin identifier referenced but not yet called
/// (`mode = builtin`, base §3). The builtin *set* itself (the "universe of
/// predeclared identifiers") is an out-of-scope collaborator (base §1); this
/// crate only needs enough of a closed enum to thread a builtin reference
/// through `Ident` resolution and reject an uncalled one (`UncalledBuiltin`).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BuiltinId { Len, Cap, Append, Make, New, Copy, Delete, Panic, Recover, Print, Println, Complex, Real, Imag, Close }

/// The mutable record threaded through recursive expression checking
/// (base §3 "Operand"). Cheap to copy: `typ`/`val` are references/enum
/// payloads, not owned trees.
#[derive(Clone)]
pub struct Operand<'tcx, 'ast> {
  pub mode: Mode,
  pub expr: Option<&'ast Expr<'ast>>,
  pub typ: Ty<'tcx>,
  pub val: Const,
  pub id: Option<BuiltinId>,
}

impl<'tcx, 'ast> Operand<'tcx, 'ast> {
  #[must_use] pub fn invalid(invalid_ty: Ty<'tcx>) -> Self {
    Operand { mode: Mode::Invalid, expr: None, typ: invalid_ty, val: Const::Unknown, id: None }
  }

  #[must_use] pub fn is_invalid(&self) -> bool { self.mode == Mode::Invalid || self.typ.is_invalid() }

  /// base §3 invariant: "`Array.len = -1`... `val` may be the *unknown*
  /// constant". A constant operand's `val` is `Unknown` exactly when a
  /// prior constant operation already failed (base §7).
  #[must_use] pub fn is_unknown_const(&self) -> bool { self.mode == Mode::Constant && matches!(self.val, Const::Unknown) }

  pub fn set_invalid(&mut self, invalid_ty: Ty<'tcx>) {
    self.mode = Mode::Invalid;
    self.typ = invalid_ty;
    self.val = Const::Unknown;
  }
}

/// A struct/array/map element's keyed-vs-positional key, reduced to a
/// hashable/comparable form for duplicate detection (base §4.7 `keyVal`).
#[derive(Clone, Debug)]
pub enum KeyVal {
  Bool(bool),
  Str(std::rc::Rc<str>),
  Int(i128),
  Uint(u128),
  Float(u64), // bit pattern of the f64, canonical enough for hashing/equality of constant floats
  Complex(u64, u64),
  Ident(Symbol),
  /// Fallback: the constant wasn't a simple scalar kind the checker
  /// canonicalizes; compared by `Display` text (base §4.7 "else the
  /// constant itself").
  Other(String),
}

impl PartialEq for KeyVal {
  fn eq(&self, other: &Self) -> bool {
    use KeyVal::*;
    match (self, other) {
      (Bool(a), Bool(b)) => a == b,
      (Str(a), Str(b)) => a == b,
      (Int(a), Int(b)) => a == b,
      (Uint(a), Uint(b)) => a == b,
      (Float(a), Float(b)) => a == b,
      (Complex(a, b), Complex(c, d)) => a == c && b == d,
      (Ident(a), Ident(b)) => a == b,
      (Other(a), Other(b)) => a == b,
      _ => false,
    }
  }
}
impl Eq for KeyVal {}

impl std::hash::Hash for KeyVal {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    std::mem::discriminant(self).hash(state);
    match self {
      KeyVal::Bool(b) => b.hash(state),
      KeyVal::Str(s) => s.hash(state),
      KeyVal::Int(i) => i.hash(state),
      KeyVal::Uint(u) => u.hash(state),
      KeyVal::Float(f) => f.hash(state),
      KeyVal::Complex(a, b) => { a.hash(state); b.hash(state) }
      KeyVal::Ident(s) => s.hash(state),
      KeyVal::Other(s) => s.hash(state),
    }
  }
}

/// Project a constant value to its canonical map/composite-literal key
/// (base §4.7 `keyVal`: "booleans/strings directly; integers as int64 or
/// uint64; floats as float64; complex as a (re, im) pair; else the constant
/// itself").
#[must_use]
pub fn key_val(c: &Const) -> KeyVal {
  match c {
    Const::Bool(b) => KeyVal::Bool(*b),
    Const::Str(s) => KeyVal::Str(s.clone()),
    Const::Int(_) => match c.int64_val() {
      Some((v, true)) => KeyVal::Int(i128::from(v)),
      _ => match c.uint64_val() {
        Some((v, _)) => KeyVal::Uint(u128::from(v)),
        None => KeyVal::Other(c.to_string()),
      }
    },
    Const::Float(_) => match c.float64_val() {
      Some((f, _)) => KeyVal::Float(f.to_bits()),
      None => KeyVal::Other(c.to_string()),
    },
    Const::Complex(_) => {
      let re = c.real().float64_val().map(|(f, _)| f.to_bits()).unwrap_or(0);
      let im = c.imag().float64_val().map(|(f, _)| f.to_bits()).unwrap_or(0);
      KeyVal::Complex(re, im)
    }
    Const::Unknown => KeyVal::Other("<unknown>".into()),
  }
}
