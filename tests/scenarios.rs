//! The ten worked examples a reviewer would reach for first (base §8
//! "Scenarios"): one test per example, each built directly off the tiny
//! fixed universe in `common.rs` rather than a real parser.

#[path = "common.rs"]
mod common;

use common::*;
use typeck::ast::{AstArena, BinaryOp, ExprKind, TypeExpr, UnaryOp};
use typeck::errors::ErrorCode;
use typeck::operand::Mode;
use typeck::resolve::ResolvedIdent;
use typeck::types::{BasicKind, Ty, TyKind, TypeArena};

#[test]
fn scenario_1_shift_by_100_is_exact() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let scope = basic_scope(&types, &mut names);
  let arena = AstArena::new();
  let mut checker = new_checker(&types, scope);

  let one = int_lit(&arena, &mut checker, "1");
  let hundred = int_lit(&arena, &mut checker, "100");
  let shl = binary(&arena, BinaryOp::Shl, one, hundred);

  let op = checker.expr(shl);
  assert_eq!(op.mode, Mode::Constant);
  assert_eq!(op.typ.basic(), Some(BasicKind::UntypedInt));
  assert_eq!(op.val.bit_len(), 101);
  assert!(checker.reporter_mut().diagnostics.is_empty());
}

#[test]
fn scenario_2_int8_overflow() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let scope = basic_scope(&types, &mut names);
  let arena = AstArena::new();
  let mut checker = new_checker(&types, scope);

  let mut x = {
    let lit = int_lit(&arena, &mut checker, "200");
    checker.expr(lit)
  };
  let int8 = checker.basic(BasicKind::Int8);
  checker.convert_untyped(&mut x, int8);

  assert!(x.is_invalid());
  assert!(checker.reporter_mut().has(ErrorCode::NumericOverflow));
}

#[test]
fn scenario_3_float_truncated_to_int() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let scope = basic_scope(&types, &mut names);
  let arena = AstArena::new();
  let mut checker = new_checker(&types, scope);

  let mut x = {
    let lit = float_lit(&arena, &mut checker, "1.5");
    checker.expr(lit)
  };
  let int_ty = checker.basic(BasicKind::Int);
  checker.convert_untyped(&mut x, int_ty);

  assert!(x.is_invalid());
  assert!(checker.reporter_mut().has(ErrorCode::TruncatedFloat));
}

#[test]
fn scenario_4_duplicate_slice_literal_index() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let scope = basic_scope(&types, &mut names);
  let arena = AstArena::new();
  let mut checker = new_checker(&types, scope);

  let int_sym = names.sym("int");
  let slice_int = TypeExpr::Slice(Box::leak(Box::new(type_name(int_sym))));

  let k1 = int_lit(&arena, &mut checker, "1");
  let v1 = int_lit(&arena, &mut checker, "10");
  let k2 = int_lit(&arena, &mut checker, "1");
  let v2 = int_lit(&arena, &mut checker, "20");
  let lit = composite_lit(&arena, Some(slice_int), vec![elt(Some(k1), v1), elt(Some(k2), v2)]);

  checker.expr(lit);
  assert!(checker.reporter_mut().has(ErrorCode::DuplicateLitKey));
}

#[test]
fn scenario_5_too_many_values_in_struct_literal() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let scope = basic_scope(&types, &mut names);
  let arena = AstArena::new();
  let mut checker = new_checker(&types, scope);

  let int_sym = names.sym("int");
  let a_sym = names.sym("a");
  let b_sym = names.sym("b");
  let struct_ty = TypeExpr::Struct(vec![(a_sym, type_name(int_sym)), (b_sym, type_name(int_sym))]);

  let v1 = int_lit(&arena, &mut checker, "1");
  let v2 = int_lit(&arena, &mut checker, "2");
  let v3 = int_lit(&arena, &mut checker, "3");
  let lit = composite_lit(&arena, Some(struct_ty), vec![elt(None, v1), elt(None, v2), elt(None, v3)]);

  checker.expr(lit);
  assert!(checker.reporter_mut().has(ErrorCode::InvalidStructLit));
}

#[test]
fn scenario_6_interface_keyed_map_literal_duplicate_detection() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let scope = basic_scope(&types, &mut names);
  let arena = AstArena::new();
  let mut checker = new_checker(&types, scope);

  let int_sym = names.sym("int");
  let int32_sym = names.sym("int32");
  let iface_ty: &'static TypeExpr<'static> = Box::leak(Box::new(TypeExpr::Interface(vec![])));
  let int_ty_ref: &'static TypeExpr<'static> = Box::leak(Box::new(type_name(int_sym)));
  let map_ty = TypeExpr::Map(iface_ty, int_ty_ref);

  // differing dynamic types (int vs int32): no duplicate.
  {
    let k1 = int_lit(&arena, &mut checker, "1");
    let v1 = int_lit(&arena, &mut checker, "1");
    let conv_func = arena.alloc(DUMMY, ExprKind::Type(type_name(int32_sym)));
    let k2_arg = int_lit(&arena, &mut checker, "1");
    let k2 = call(&arena, conv_func, vec![k2_arg]);
    let v2 = int_lit(&arena, &mut checker, "2");
    let lit = composite_lit(&arena, Some(map_ty.clone()), vec![elt(Some(k1), v1), elt(Some(k2), v2)]);
    checker.expr(lit);
    assert!(!checker.reporter_mut().has(ErrorCode::DuplicateLitKey));
  }

  // same dynamic type (both default to int): duplicate.
  {
    let k1 = int_lit(&arena, &mut checker, "1");
    let v1 = int_lit(&arena, &mut checker, "1");
    let k2 = int_lit(&arena, &mut checker, "1");
    let v2 = int_lit(&arena, &mut checker, "2");
    let lit = composite_lit(&arena, Some(map_ty), vec![elt(Some(k1), v1), elt(Some(k2), v2)]);
    checker.expr(lit);
    assert!(checker.reporter_mut().has(ErrorCode::DuplicateLitKey));
  }
}

#[test]
fn scenario_7_unsigned_complement_of_zero_wraps() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let scope = basic_scope(&types, &mut names);
  let arena = AstArena::new();
  let mut checker = new_checker(&types, scope);

  let zero = int_lit(&arena, &mut checker, "0");
  let complement = unary(&arena, UnaryOp::Xor, zero);
  let mut x = checker.expr(complement);
  assert_eq!(x.mode, Mode::Constant);

  let uint_ty = checker.basic(BasicKind::Uint);
  checker.convert_untyped(&mut x, uint_ty);

  assert!(!x.is_invalid());
  assert_eq!(x.val, typeck::Const::Int(num_bigint::BigInt::from(u64::MAX)));
  assert!(checker.reporter_mut().diagnostics.is_empty());
}

#[test]
fn scenario_8_integer_division_by_zero() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let scope = basic_scope(&types, &mut names);
  let arena = AstArena::new();
  let mut checker = new_checker(&types, scope);

  let one = int_lit(&arena, &mut checker, "1");
  let zero = int_lit(&arena, &mut checker, "0");
  let quo = binary(&arena, BinaryOp::Quo, one, zero);

  let op = checker.expr(quo);
  assert!(op.is_invalid());
  assert!(checker.reporter_mut().has(ErrorCode::DivByZero));
}

#[test]
fn scenario_9_three_index_slice_of_string() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let mut scope = basic_scope(&types, &mut names);
  let s_sym = names.sym("s");
  scope.define(s_sym, ResolvedIdent::Var(types.basic(BasicKind::String)));
  let arena = AstArena::new();
  let mut checker = new_checker(&types, scope);

  let s_expr = ident(&arena, s_sym);
  let lo = int_lit(&arena, &mut checker, "1");
  let hi = int_lit(&arena, &mut checker, "2");
  let max = int_lit(&arena, &mut checker, "3");
  let slice_expr = arena.alloc(DUMMY, ExprKind::Slice { x: s_expr, lo: Some(lo), hi: Some(hi), max: Some(max) });

  let op = checker.expr(slice_expr);
  assert!(op.is_invalid());
  assert!(checker.reporter_mut().has(ErrorCode::InvalidSliceExpr));
}

#[test]
fn scenario_10_nil_equals_nil_is_undefined() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let scope = basic_scope(&types, &mut names);
  let arena = AstArena::new();
  let mut checker = new_checker(&types, scope);

  let nil_sym = names.sym("nil");
  let lhs = ident(&arena, nil_sym);
  let rhs = ident(&arena, nil_sym);
  let eq = binary(&arena, BinaryOp::Eq, lhs, rhs);

  let op = checker.expr(eq);
  assert!(op.is_invalid());
  assert!(checker.reporter_mut().has(ErrorCode::UndefinedOp));
}

#[test]
fn spread_call_checks_slice_argument_against_the_variadic_parameter_itself() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let mut scope = basic_scope(&types, &mut names);
  let arena = AstArena::new();

  let slice_int: Ty<'_> = types.alloc(TyKind::Slice(types.basic(BasicKind::Int)));
  let fty: Ty<'_> = types.alloc(TyKind::Signature {
    params: smallvec::smallvec![slice_int],
    results: smallvec::smallvec![],
    variadic: true,
  });
  let f_sym = names.sym("f");
  let xs_sym = names.sym("xs");
  scope.define(f_sym, ResolvedIdent::Value(fty));
  scope.define(xs_sym, ResolvedIdent::Var(slice_int));

  let mut checker = new_checker(&types, scope);
  let f = ident(&arena, f_sym);
  let xs = ident(&arena, xs_sym);
  let call_expr = call_ellipsis(&arena, f, vec![xs]);

  let op = checker.expr(call_expr);
  assert!(!op.is_invalid());
  assert!(checker.reporter_mut().diagnostics.is_empty());
}

#[test]
fn spread_call_to_non_variadic_function_is_rejected() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let mut scope = basic_scope(&types, &mut names);
  let arena = AstArena::new();

  let int_ty = types.basic(BasicKind::Int);
  let fty: Ty<'_> = types.alloc(TyKind::Signature {
    params: smallvec::smallvec![int_ty],
    results: smallvec::smallvec![],
    variadic: false,
  });
  let f_sym = names.sym("f");
  scope.define(f_sym, ResolvedIdent::Value(fty));

  let mut checker = new_checker(&types, scope);
  let f = ident(&arena, f_sym);
  let arg = int_lit(&arena, &mut checker, "1");
  let call_expr = call_ellipsis(&arena, f, vec![arg]);

  checker.expr(call_expr);
  assert!(checker.reporter_mut().has(ErrorCode::BadDotDotDotSyntax));
}

#[test]
fn composite_literal_index_must_be_a_constant() {
  let types = TypeArena::new();
  let mut names = Names::new();
  let mut scope = basic_scope(&types, &mut names);
  let int_sym = names.sym("int");
  let i_sym = names.sym("i");
  scope.define(i_sym, ResolvedIdent::Var(types.basic(BasicKind::Int)));
  let arena = AstArena::new();
  let mut checker = new_checker(&types, scope);

  let slice_int = TypeExpr::Slice(Box::leak(Box::new(type_name(int_sym))));
  let key = ident(&arena, i_sym);
  let v = int_lit(&arena, &mut checker, "10");
  let lit = composite_lit(&arena, Some(slice_int), vec![elt(Some(key), v)]);

  checker.expr(lit);
  assert!(checker.reporter_mut().has(ErrorCode::InvalidLitIndex));
}
