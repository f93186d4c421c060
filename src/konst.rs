//! Arbitrary-precision constant values (base §6 "Constant library"). Base
//! spec treats this as an external collaborator; SPEC_FULL §S.2 reifies it
//! on top of `num-bigint`/`num-rational`/`num-complex` (already the
//! teacher-adjacent stack declared in `Cargo.toml`) so the crate is
//! self-contained and testable. Integers are exact (`BigInt`); floats are
//! exact rationals (`BigRational`) rather than `f64`, matching the real
//! language's own `big.Rat`-backed constant folder closely enough to give
//! genuine arbitrary precision (base §8 scenario 1: `1 << 100` must not
//! overflow a machine integer).

use std::fmt;
use std::rc::Rc;
use num_bigint::BigInt;
use num_complex::Complex;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

pub type Rat = BigRational;
pub type Cplx = Complex<BigRational>;

/// Discriminant of a [`Const`], mirroring `constant.Kind` (base §6 "Kind
/// inspection").
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ConstKind { Unknown, Bool, String, Int, Float, Complex }

/// An arbitrary-precision constant value. `Unknown` is the sentinel that
/// suppresses cascading diagnostics once one constant operation has already
/// failed (base §7: "the constant library returns `Unknown`, the checker
/// stops emitting secondary overflow errors").
#[derive(Clone, Debug)]
pub enum Const {
  Unknown,
  Bool(bool),
  Str(Rc<str>),
  Int(BigInt),
  Float(Rat),
  Complex(Cplx),
}

impl PartialEq for Const {
  fn eq(&self, other: &Self) -> bool {
    use Const::*;
    match (self, other) {
      (Unknown, Unknown) => true,
      (Bool(a), Bool(b)) => a == b,
      (Str(a), Str(b)) => a == b,
      (Int(a), Int(b)) => a == b,
      (Float(a), Float(b)) => a == b,
      (Complex(a), Complex(b)) => a == b,
      _ => false,
    }
  }
}

impl fmt::Display for Const {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Const::Unknown => write!(f, "unknown"),
      Const::Bool(b) => write!(f, "{b}"),
      Const::Str(s) => write!(f, "{s:?}"),
      Const::Int(i) => write!(f, "{i}"),
      Const::Float(r) => write!(f, "{}", r.to_f64().unwrap_or(f64::NAN)),
      Const::Complex(c) => write!(f, "({} + {}i)", c.re.to_f64().unwrap_or(f64::NAN), c.im.to_f64().unwrap_or(f64::NAN)),
    }
  }
}

impl Const {
  #[must_use] pub fn kind(&self) -> ConstKind {
    match self {
      Const::Unknown => ConstKind::Unknown,
      Const::Bool(_) => ConstKind::Bool,
      Const::Str(_) => ConstKind::String,
      Const::Int(_) => ConstKind::Int,
      Const::Float(_) => ConstKind::Float,
      Const::Complex(_) => ConstKind::Complex,
    }
  }

  #[must_use] pub fn make_bool(b: bool) -> Const { Const::Bool(b) }
  #[must_use] pub fn make_string(s: impl Into<Rc<str>>) -> Const { Const::Str(s.into()) }
  #[must_use] pub fn make_int64(i: i64) -> Const { Const::Int(BigInt::from(i)) }
  #[must_use] pub fn make_uint64(u: u64) -> Const { Const::Int(BigInt::from(u)) }
  #[must_use] pub fn make_unknown() -> Const { Const::Unknown }

  /// `constant.MakeFloat64`: `NaN`/`Inf` have no constant representation
  /// and become `Unknown`, matching the real language's constant folder.
  #[must_use] pub fn make_float64(f: f64) -> Const {
    if !f.is_finite() { return Const::Unknown }
    match Rat::from_float(f) {
      Some(r) => Const::Float(r),
      None => Const::Unknown,
    }
  }

  /// `constant.MakeImag`: wraps `x` (real- or float-kinded) as a pure
  /// imaginary complex constant `x·i`.
  #[must_use] pub fn make_imag(x: &Const) -> Const {
    match x {
      Const::Int(i) => Const::Complex(Cplx::new(Rat::zero(), Rat::from_integer(i.clone()))),
      Const::Float(r) => Const::Complex(Cplx::new(Rat::zero(), r.clone())),
      _ => Const::Unknown,
    }
  }

  #[must_use] pub fn bool_val(&self) -> bool { matches!(self, Const::Bool(true)) }
  #[must_use] pub fn string_val(&self) -> &str {
    match self { Const::Str(s) => s, _ => "" }
  }

  /// `Sign`: -1, 0, or 1. `Unknown`/`Bool`/`String` are defined as 0 (never
  /// consulted by the checker for those kinds).
  #[must_use] pub fn sign(&self) -> i32 {
    match self {
      Const::Int(i) => i.signum().to_i32().unwrap_or(0),
      Const::Float(r) => {
        if r.is_zero() { 0 } else if r.is_negative() { -1 } else { 1 }
      }
      Const::Complex(c) => if c.re.is_zero() && c.im.is_zero() { 0 } else { 1 },
      _ => 0,
    }
  }

  #[must_use] pub fn is_zero(&self) -> bool { self.sign() == 0 }

  /// `BitLen`: bit length of the absolute value of an integer constant.
  /// Used by [`crate::representability::overflow`]'s untyped-integer growth
  /// guard (base §4.1, base §8 "Shift-overflow guard").
  #[must_use] pub fn bit_len(&self) -> u64 {
    match self {
      Const::Int(i) => i.bits(),
      _ => 0,
    }
  }

  /// `ToInt`: round a float/complex-with-zero-imaginary constant to an
  /// exact integer, or `Unknown` if that would lose information.
  #[must_use] pub fn to_int(&self) -> Const {
    match self {
      Const::Int(_) => self.clone(),
      Const::Float(r) => {
        if r.is_integer() { Const::Int(r.to_integer()) } else { Const::Unknown }
      }
      Const::Complex(c) => {
        if c.im.is_zero() && c.re.is_integer() { Const::Int(c.re.to_integer()) } else { Const::Unknown }
      }
      _ => Const::Unknown,
    }
  }

  #[must_use] pub fn to_float(&self) -> Const {
    match self {
      Const::Int(i) => Const::Float(Rat::from_integer(i.clone())),
      Const::Float(_) => self.clone(),
      Const::Complex(c) if c.im.is_zero() => Const::Float(c.re.clone()),
      _ => Const::Unknown,
    }
  }

  #[must_use] pub fn to_complex(&self) -> Const {
    match self {
      Const::Int(i) => Const::Complex(Cplx::new(Rat::from_integer(i.clone()), Rat::zero())),
      Const::Float(r) => Const::Complex(Cplx::new(r.clone(), Rat::zero())),
      Const::Complex(_) => self.clone(),
      _ => Const::Unknown,
    }
  }

  #[must_use] pub fn real(&self) -> Const {
    match self {
      Const::Complex(c) => Const::Float(c.re.clone()),
      Const::Int(_) | Const::Float(_) => self.clone(),
      _ => Const::Unknown,
    }
  }

  #[must_use] pub fn imag(&self) -> Const {
    match self {
      Const::Complex(c) => Const::Float(c.im.clone()),
      Const::Int(_) | Const::Float(_) => Const::Int(BigInt::zero()),
      _ => Const::Unknown,
    }
  }

  #[must_use] pub fn int64_val(&self) -> Option<(i64, bool)> {
    match self {
      Const::Int(i) => Some(match i.to_i64() {
        Some(v) => (v, true),
        None => (if i.is_negative() { i64::MIN } else { i64::MAX }, false),
      }),
      _ => None,
    }
  }

  #[must_use] pub fn uint64_val(&self) -> Option<(u64, bool)> {
    match self {
      Const::Int(i) => Some(match i.to_u64() {
        Some(v) => (v, true),
        None => (if i.is_negative() { 0 } else { u64::MAX }, false),
      }),
      _ => None,
    }
  }

  #[must_use] pub fn float64_val(&self) -> Option<(f64, bool)> {
    let r = match self { Const::Int(i) => Rat::from_integer(i.clone()), Const::Float(r) => r.clone(), _ => return None };
    let f = r.to_f64().unwrap_or(f64::INFINITY);
    let exact = Rat::from_float(f).is_some_and(|back| back == r);
    Some((f, exact))
  }

  #[must_use] pub fn float32_val(&self) -> Option<(f32, bool)> {
    let (f, exact) = self.float64_val()?;
    let f32v = f as f32;
    Some((f32v, exact && (f64::from(f32v) == f)))
  }

  /// `UnaryOp`: `+`, `-`, `^` (bitwise complement), `!`. `prec` is the bit
  /// width for a *typed unsigned* operand's two's-complement wraparound
  /// (base §4.2: "for unsigned unary `-` or `^` compute bit width from
  /// sizing oracle"); `0` means arbitrary precision (untyped or signed).
  #[must_use] pub fn unary_op(op: UnOp, x: &Const, prec: u32) -> Const {
    if matches!(x, Const::Unknown) { return Const::Unknown }
    match op {
      UnOp::Pos => x.clone(),
      UnOp::Neg => match x {
        Const::Int(i) => Const::Int(wrap_unsigned(-i, prec)),
        Const::Float(r) => Const::Float(-r.clone()),
        Const::Complex(c) => Const::Complex(Cplx::new(-c.re.clone(), -c.im.clone())),
        _ => Const::Unknown,
      },
      UnOp::Complement => match x {
        Const::Int(i) => Const::Int(wrap_unsigned(-(i + BigInt::one()), prec)),
        _ => Const::Unknown,
      },
      UnOp::Not => match x {
        Const::Bool(b) => Const::Bool(!b),
        _ => Const::Unknown,
      },
    }
  }

  /// `BinaryOp`: `+ - * / % & | ^ &^`. Integer `/` truncates toward zero
  /// (machine-division semantics); float `/` is exact rational division.
  #[must_use] pub fn binary_op(x: &Const, op: BinOp, y: &Const) -> Const {
    if matches!(x, Const::Unknown) || matches!(y, Const::Unknown) { return Const::Unknown }
    match (x, y) {
      (Const::Int(a), Const::Int(b)) => int_binop(a, op, b),
      (Const::Str(a), Const::Str(b)) if op == BinOp::Add => Const::Str(Rc::from(format!("{a}{b}"))),
      _ => {
        let (a, b) = match (x.to_complex(), y.to_complex()) {
          (Const::Complex(a), Const::Complex(b)) => (a, b),
          _ => return Const::Unknown,
        };
        let is_real = a.im.is_zero() && b.im.is_zero()
          && matches!(x, Const::Float(_) | Const::Int(_)) && matches!(y, Const::Float(_) | Const::Int(_));
        match op {
          BinOp::Add => complex_result(a.re + &b.re, a.im + &b.im, is_real),
          BinOp::Sub => complex_result(a.re - &b.re, a.im - &b.im, is_real),
          BinOp::Mul => {
            let re = &a.re * &b.re - &a.im * &b.im;
            let im = &a.re * &b.im + &a.im * &b.re;
            complex_result(re, im, is_real)
          }
          BinOp::Div => {
            let denom = &b.re * &b.re + &b.im * &b.im;
            if denom.is_zero() { return Const::Unknown }
            let re = (&a.re * &b.re + &a.im * &b.im) / &denom;
            let im = (&a.im * &b.re - &a.re * &b.im) / &denom;
            complex_result(re, im, is_real)
          }
          _ => Const::Unknown,
        }
      }
    }
  }

  /// `Shift`: `op` is `<<` or `>>`; `s` is the (already-validated,
  /// non-negative) shift count.
  #[must_use] pub fn shift(x: &Const, op: ShiftOp, s: u64) -> Const {
    let Const::Int(i) = x else { return Const::Unknown };
    let s = usize::try_from(s).unwrap_or(usize::MAX);
    match op {
      ShiftOp::Shl => Const::Int(i << s),
      ShiftOp::Shr => Const::Int(i >> s),
    }
  }

  /// `Compare`: `== != < <= > >=`.
  #[must_use] pub fn compare(x: &Const, op: CmpOp, y: &Const) -> bool {
    use CmpOp::*;
    match (x, y) {
      (Const::Bool(a), Const::Bool(b)) => match op { Eq => a == b, Ne => a != b, _ => false },
      (Const::Str(a), Const::Str(b)) => match op {
        Eq => a == b, Ne => a != b, Lt => a < b, Le => a <= b, Gt => a > b, Ge => a >= b,
      },
      (Const::Int(a), Const::Int(b)) => cmp_ord(a.cmp(b), op),
      _ => {
        let (a, b) = (x.to_float(), y.to_float());
        if let (Const::Float(a), Const::Float(b)) = (a, b) { cmp_ord(a.cmp(&b), op) }
        else if op == Eq { const_eq_complex(x, y) } else if op == Ne { !const_eq_complex(x, y) } else { false }
      }
    }
  }
}

fn const_eq_complex(x: &Const, y: &Const) -> bool {
  match (x.to_complex(), y.to_complex()) {
    (Const::Complex(a), Const::Complex(b)) => a == b,
    _ => false,
  }
}

fn cmp_ord(ord: std::cmp::Ordering, op: CmpOp) -> bool {
  use std::cmp::Ordering::*;
  use CmpOp::*;
  match op {
    Eq => ord == Equal,
    Ne => ord != Equal,
    Lt => ord == Less,
    Le => ord != Greater,
    Gt => ord == Greater,
    Ge => ord != Less,
  }
}

fn complex_result(re: Rat, im: Rat, is_real: bool) -> Const {
  if is_real && im.is_zero() { Const::Float(re) } else { Const::Complex(Cplx::new(re, im)) }
}

/// Two's-complement wraparound for a typed-unsigned operand; `prec == 0`
/// means "don't wrap" (untyped / signed context).
fn wrap_unsigned(v: BigInt, prec: u32) -> BigInt {
  if prec == 0 { return v }
  let modulus = BigInt::one() << prec;
  ((v % &modulus) + &modulus) % &modulus
}

fn int_binop(a: &BigInt, op: BinOp, b: &BigInt) -> Const {
  match op {
    BinOp::Add => Const::Int(a + b),
    BinOp::Sub => Const::Int(a - b),
    BinOp::Mul => Const::Int(a * b),
    BinOp::Div => if b.is_zero() { Const::Unknown } else { Const::Int(a / b) },
    BinOp::Rem => if b.is_zero() { Const::Unknown } else { Const::Int(a % b) },
    BinOp::And => Const::Int(a & b),
    BinOp::Or => Const::Int(a | b),
    BinOp::Xor => Const::Int(a ^ b),
    BinOp::AndNot => Const::Int(a & !b),
  }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UnOp { Pos, Neg, Complement, Not }

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BinOp { Add, Sub, Mul, Div, Rem, And, Or, Xor, AndNot }

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ShiftOp { Shl, Shr }

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CmpOp { Eq, Ne, Lt, Le, Gt, Ge }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn arbitrary_precision_shift() {
    let one = Const::make_int64(1);
    let big = Const::shift(&one, ShiftOp::Shl, 100);
    assert_eq!(big.bit_len(), 101);
  }

  #[test]
  fn integer_division_truncates() {
    let seven = Const::make_int64(7);
    let two = Const::make_int64(2);
    assert_eq!(Const::binary_op(&seven, BinOp::Div, &two), Const::make_int64(3));
    let neg = Const::make_int64(-7);
    assert_eq!(Const::binary_op(&neg, BinOp::Div, &two), Const::make_int64(-3));
  }

  #[test]
  fn division_by_zero_is_unknown() {
    let one = Const::make_int64(1);
    let zero = Const::make_int64(0);
    assert_eq!(Const::binary_op(&one, BinOp::Div, &zero), Const::Unknown);
  }

  #[test]
  fn imaginary_unit_squared_is_negative_one_complex() {
    let i = Const::make_imag(&Const::make_int64(1));
    let prod = Const::binary_op(&i, BinOp::Mul, &i); // i * i == -1 + 0i
    assert_eq!(prod.kind(), ConstKind::Complex);
    assert_eq!(prod.real(), Const::make_int64(-1).to_float());
    assert!(prod.imag().is_zero());
  }
}
