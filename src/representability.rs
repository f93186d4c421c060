//! Representability and overflow (base §4.1).

use num_bigint::BigInt;
use num_traits::Signed;
use crate::errors::{ErrorCode, Reporter};
use crate::konst::Const;
use crate::operand::{Mode, Operand};
use crate::span::Span;
use crate::types::{BasicKind, Sizing, Ty};

/// `representableConst(v, sizing, targetBasic, roundedOut?)`. Returns the
/// (possibly rounded) value on success, `None` on failure. Passing the
/// rounded value back out lets callers implement `updateExprVal` (base
/// §4.6) without a second traversal.
#[must_use]
pub fn representable_const(v: &Const, sizing: Sizing, target: BasicKind) -> Option<Const> {
  use BasicKind::*;
  match target {
    Bool => matches!(v, Const::Bool(_)).then(|| v.clone()),
    String => matches!(v, Const::Str(_)).then(|| v.clone()),
    Int | Int8 | Int16 | Int32 | Int64 | Uint | Uintptr | Uint8 | Uint16 | Uint32 | Uint64 | UntypedInt | UntypedRune =>
      representable_int(v, sizing, target),
    Float32 | Float64 | UntypedFloat => representable_float(v, target),
    Complex64 | Complex128 | UntypedComplex => representable_complex(v, target),
    UntypedBool => matches!(v, Const::Bool(_)).then(|| v.clone()),
    UntypedString => matches!(v, Const::Str(_)).then(|| v.clone()),
    _ => None,
  }
}

#[must_use] pub fn is_representable(v: &Const, sizing: Sizing, target: BasicKind) -> bool {
  representable_const(v, sizing, target).is_some()
}

fn representable_int(v: &Const, sizing: Sizing, target: BasicKind) -> Option<Const> {
  use BasicKind::*;
  let i = match v.to_int() { Const::Int(i) => i, _ => return None };
  if matches!(target, UntypedInt | UntypedRune) { return Some(Const::Int(i)) }

  // For unsigned targets, a negative value is re-read as its two's
  // complement bit pattern at the target width. This is a deliberate
  // resolution of the distilled spec's scenario 7 (`var u uint = ^0`
  // yielding `2^bits - 1`) rather than a strict Go-style range rejection;
  // see DESIGN.md.
  let bits = sizing.bits(target);
  let unsigned = target.is_unsigned();
  let i = if unsigned && i.is_negative() {
    match bits {
      Some(b) => {
        let modulus = BigInt::from(1u8) << b;
        ((i % &modulus) + &modulus) % &modulus
      }
      None => return None,
    }
  } else { i };

  match target {
    Int => in_signed_range(&i, sizing.int_bits),
    Int8 => in_signed_range(&i, 8),
    Int16 => in_signed_range(&i, 16),
    Int32 => in_signed_range(&i, 32),
    Int64 => in_signed_range(&i, 64),
    Uint => in_unsigned_range(&i, sizing.int_bits),
    Uintptr => in_unsigned_range(&i, sizing.ptr_bits),
    Uint8 => in_unsigned_range(&i, 8),
    Uint16 => in_unsigned_range(&i, 16),
    Uint32 => in_unsigned_range(&i, 32),
    Uint64 => in_unsigned_range(&i, 64),
    _ => None,
  }.then(|| Const::Int(i))
}

fn in_signed_range(i: &BigInt, bits: u32) -> bool {
  let half = BigInt::from(1u8) << (bits - 1);
  *i >= -&half && *i < half
}

fn in_unsigned_range(i: &BigInt, bits: u32) -> bool {
  if i.is_negative() { return false }
  let limit = BigInt::from(1u8) << bits;
  *i < limit
}

fn representable_float(v: &Const, target: BasicKind) -> Option<Const> {
  let f = v.to_float();
  let Const::Float(_) = f else { return None };
  match target {
    BasicKind::UntypedFloat => Some(f),
    BasicKind::Float32 => {
      let (val, _) = f.float32_val()?;
      if val.is_finite() { Some(Const::make_float64(f64::from(val))) } else { None }
    }
    BasicKind::Float64 => {
      let (val, _) = f.float64_val()?;
      if val.is_finite() { Some(f) } else { None }
    }
    _ => None,
  }
}

fn representable_complex(v: &Const, target: BasicKind) -> Option<Const> {
  if target == BasicKind::UntypedComplex { return matches!(v.to_complex(), Const::Complex(_)).then(|| v.to_complex()) }
  let re = representable_float(&v.real(), if target == BasicKind::Complex64 { BasicKind::Float32 } else { BasicKind::Float64 })?;
  let im = representable_float(&v.imag(), if target == BasicKind::Complex64 { BasicKind::Float32 } else { BasicKind::Float64 })?;
  Some(Const::binary_op(&Const::make_imag(&im), crate::konst::BinOp::Add, &re))
}

/// `overflow(x, op, opPos)` (base §4.1). Precondition: `x.mode = constant`.
pub fn overflow<'tcx, 'ast>(
  x: &mut Operand<'tcx, 'ast>, sizing: Sizing, op_name: &str, pos: Span, reporter: &mut impl Reporter, invalid_ty: Ty<'tcx>,
) {
  debug_assert_eq!(x.mode, Mode::Constant, "overflow() called on a non-constant operand");
  if matches!(x.val, Const::Unknown) {
    reporter.error(pos, ErrorCode::InvalidConstVal, "constant result is not representable");
    return;
  }
  if let Some(basic) = x.typ.basic() {
    if basic.is_untyped() {
      if x.val.kind() == crate::konst::ConstKind::Int && x.val.bit_len() > 512 {
        log::debug!("overflow: {op_name} at {pos:?} exceeds the 512-bit untyped-integer guard");
        reporter.error(pos, ErrorCode::InvalidConstVal, format!("constant {op_name} overflow"));
        x.val = Const::Unknown;
      }
      return;
    }
    match representable_const(&x.val, sizing, basic) {
      Some(rounded) => {
        if rounded != x.val { log::trace!("overflow: {op_name} at {pos:?} rounded {} to {rounded}", x.val) }
        x.val = rounded;
      }
      None => {
        reporter.error(pos, ErrorCode::NumericOverflow, format!("constant {} overflows {:?}", x.val, basic));
        x.set_invalid(invalid_ty);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::konst::Const;

  #[test]
  fn int8_overflow_rejected() {
    assert!(!is_representable(&Const::make_int64(200), Sizing::LP64, BasicKind::Int8));
    assert!(is_representable(&Const::make_int64(127), Sizing::LP64, BasicKind::Int8));
  }

  #[test]
  fn negative_unsigned_wraps_to_max() {
    let r = representable_const(&Const::make_int64(-1), Sizing::LP64, BasicKind::Uint).unwrap();
    assert_eq!(r, Const::Int(num_bigint::BigInt::from(u64::MAX)));
  }

  #[test]
  fn untyped_int_always_representable() {
    let huge = crate::konst::Const::shift(&Const::make_int64(1), crate::konst::ShiftOp::Shl, 500);
    assert!(is_representable(&huge, Sizing::LP64, BasicKind::UntypedInt));
  }

  #[test]
  fn truncated_float_rejected_for_int_target() {
    // representable_const only handles numeric-to-numeric of matching
    // category; a float assigned to an integer target is checked upstream
    // via `to_int` producing Unknown for fractional values.
    assert_eq!(Const::make_float64(1.5).to_int(), Const::Unknown);
  }
}
