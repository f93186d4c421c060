//! The seven cross-cutting invariants (base §8 "Invariants"). Each gets
//! either a `#[quickcheck]` property (when the claim is naturally a
//! generate-many-inputs check) or a handful of representative `#[test]`
//! cases (when it's a closed enumeration or needs a hand-built AST shape
//! quickcheck's generic `Arbitrary` impls wouldn't usefully randomize).

#[path = "common.rs"]
mod common;

use common::*;
use typeck::ast::{AstArena, BinaryOp};
use typeck::errors::ErrorCode;
use typeck::konst::ShiftOp;
use typeck::operand::Mode;
use typeck::representability::representable_const;
use typeck::resolve::ResolvedIdent;
use typeck::types::{BasicKind, TypeArena};
use typeck::{Const, Operand, RecordingReporter, Sizing, Span};

/// Invariant 1: after `expr(e)`, either the operand is invalid and at least
/// one diagnostic was reported, or its type is not `Invalid`.
#[test]
fn invariant_1_invalid_or_typed() {
  fn check(op: &Operand<'_, '_>, diagnostics_before: usize, reporter: &RecordingReporter) {
    if op.mode == Mode::Invalid {
      assert!(reporter.diagnostics.len() > diagnostics_before, "invalid operand carried no diagnostic");
    } else {
      assert_ne!(op.typ.basic(), Some(BasicKind::Invalid));
    }
  }

  // Well-typed constant: valid, not invalid.
  {
    let types = TypeArena::new();
    let mut names = Names::new();
    let scope = basic_scope(&types, &mut names);
    let arena = AstArena::new();
    let mut checker = new_checker(&types, scope);
    let before = checker.reporter_mut().diagnostics.len();
    let lit = int_lit(&arena, &mut checker, "42");
    let op = checker.expr(lit);
    check(&op, before, checker.reporter_mut());
  }

  // Undefined identifier: invalid, with a diagnostic.
  {
    let types = TypeArena::new();
    let mut names = Names::new();
    let scope = basic_scope(&types, &mut names);
    let arena = AstArena::new();
    let mut checker = new_checker(&types, scope);
    let before = checker.reporter_mut().diagnostics.len();
    let missing = names.sym("doesNotExist");
    let e = ident(&arena, missing);
    let op = checker.expr(e);
    check(&op, before, checker.reporter_mut());
  }

  // Integer division by zero: invalid, with a diagnostic.
  {
    let types = TypeArena::new();
    let mut names = Names::new();
    let scope = basic_scope(&types, &mut names);
    let arena = AstArena::new();
    let mut checker = new_checker(&types, scope);
    let before = checker.reporter_mut().diagnostics.len();
    let one = int_lit(&arena, &mut checker, "1");
    let zero = int_lit(&arena, &mut checker, "0");
    let e = binary(&arena, BinaryOp::Quo, one, zero);
    let op = checker.expr(e);
    check(&op, before, checker.reporter_mut());
  }

  // Mismatched typed operands: invalid, with a diagnostic.
  {
    let types = TypeArena::new();
    let mut names = Names::new();
    let mut scope = basic_scope(&types, &mut names);
    let i_sym = names.sym("i");
    let s_sym = names.sym("str_var");
    scope.define(i_sym, ResolvedIdent::Var(types.basic(BasicKind::Int)));
    scope.define(s_sym, ResolvedIdent::Var(types.basic(BasicKind::String)));
    let arena = AstArena::new();
    let mut checker = new_checker(&types, scope);
    let before = checker.reporter_mut().diagnostics.len();
    let lhs = ident(&arena, i_sym);
    let rhs = ident(&arena, s_sym);
    let e = binary(&arena, BinaryOp::Add, lhs, rhs);
    let op = checker.expr(e);
    check(&op, before, checker.reporter_mut());
  }
}

/// Invariant 2: a round-trip through `representable_const` is stable — a
/// value already representable as `t` stays representable as `t`, and the
/// rounded result is the same constant kind category `t` expects.
#[quickcheck_macros::quickcheck]
fn invariant_2_representable_const_round_trips(v: i64, target_idx: u8) -> bool {
  let targets = [
    BasicKind::Int8, BasicKind::Int16, BasicKind::Int32, BasicKind::Int64,
    BasicKind::Uint8, BasicKind::Uint16, BasicKind::Uint32, BasicKind::Uint64,
    BasicKind::Int, BasicKind::Uint,
  ];
  let target = targets[(target_idx as usize) % targets.len()];
  let c = Const::make_int64(v);
  match representable_const(&c, Sizing::LP64, target) {
    None => true,
    Some(r) => representable_const(&r, Sizing::LP64, target).is_some() && matches!(r, Const::Int(_)),
  }
}

/// Invariants 3/4: once an untyped operand has been converted to a typed
/// target, converting it again against the same target is a no-op.
#[quickcheck_macros::quickcheck]
fn invariant_3_4_convert_untyped_idempotent_once_typed(v: i64, target_idx: u8) -> bool {
  let targets = [BasicKind::Int8, BasicKind::Int16, BasicKind::Int32, BasicKind::Int64, BasicKind::Uint, BasicKind::Float64];
  let target_kind = targets[(target_idx as usize) % targets.len()];

  let types = TypeArena::new();
  let mut names = Names::new();
  let scope = basic_scope(&types, &mut names);
  let mut checker: TestChecker<'_, 'static> = new_checker(&types, scope);
  let untyped_int = checker.basic(BasicKind::UntypedInt);
  let mut x = Operand { mode: Mode::Constant, expr: None, typ: untyped_int, val: Const::make_int64(v), id: None };

  let target = checker.basic(target_kind);
  checker.convert_untyped(&mut x, target);
  if x.is_invalid() { return true } // overflow/truncation cases carry no idempotency claim here

  let before = (x.mode, x.typ.basic(), x.val.clone());
  checker.convert_untyped(&mut x, target);
  (x.mode, x.typ.basic(), x.val.clone()) == before
}

/// Invariant 5: once `update_expr_type(_, t, true)` finalizes an expression,
/// it is gone from the untyped registry — observable as a second call to
/// `update_expr_type` (with a different target) having no further effect.
#[test]
fn invariant_5_finalized_expr_leaves_untyped_registry() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let scope = basic_scope(&types, &mut names);
  let arena = AstArena::new();
  let mut checker = new_checker(&types, scope);

  let five = int_lit(&arena, &mut checker, "5");
  checker.expr(five);

  let int_ty = checker.basic(BasicKind::Int);
  checker.update_expr_type(five, int_ty, true);
  let first = checker.recorded_for(five).cloned().expect("finalized into the recorded-types sink");
  assert_eq!(first.typ.basic(), Some(BasicKind::Int));

  let float_ty = checker.basic(BasicKind::Float64);
  checker.update_expr_type(five, float_ty, true);
  let second = checker.recorded_for(five).cloned().expect("still present from the first finalization");
  assert_eq!(second.typ.basic(), Some(BasicKind::Int), "a removed registry entry must not be re-finalized");
}

/// Invariant 6: the default-type mapping is total on untyped kinds except
/// `UntypedNil`, which maps to `Invalid`.
#[test]
fn invariant_6_default_type_total_except_untyped_nil() {
  let untyped_kinds = [
    BasicKind::UntypedBool, BasicKind::UntypedInt, BasicKind::UntypedRune,
    BasicKind::UntypedFloat, BasicKind::UntypedComplex, BasicKind::UntypedString,
    BasicKind::UntypedNil,
  ];
  for k in untyped_kinds {
    let d = k.default_type();
    if k == BasicKind::UntypedNil {
      assert_eq!(d, BasicKind::Invalid);
    } else {
      assert_ne!(d, BasicKind::Invalid);
      assert!(!d.is_untyped(), "default type of {k:?} must be typed, got {d:?}");
    }
  }
}

/// Invariant 7: shifting an untyped integer constant far enough that its
/// result would exceed 512 bits reports `InvalidConstVal` and collapses the
/// value to `Unknown`, rather than growing the bignum without bound.
#[quickcheck_macros::quickcheck]
fn invariant_7_shift_overflow_guard(raw_k: u16) -> bool {
  let k = u64::from(raw_k % 1200);
  let types = TypeArena::new();
  let int_ty = types.basic(BasicKind::UntypedInt);
  let invalid_ty = types.basic(BasicKind::Invalid);

  let shifted = Const::shift(&Const::make_int64(1), ShiftOp::Shl, k);
  let mut x = Operand { mode: Mode::Constant, expr: None, typ: int_ty, val: shifted, id: None };
  let mut reporter = RecordingReporter::new();
  typeck::representability::overflow(&mut x, Sizing::LP64, "<<", Span::DUMMY, &mut reporter, invalid_ty);

  if k + 1 > 512 {
    matches!(x.val, Const::Unknown) && reporter.has(ErrorCode::InvalidConstVal)
  } else {
    x.val.bit_len() == k + 1 && !reporter.has(ErrorCode::InvalidConstVal)
  }
}
