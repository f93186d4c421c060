//! Unary, binary, shift and comparison operator checking (base §4.2–§4.5).

use num_traits::{Signed, ToPrimitive};
use crate::ast::{BinaryOp, UnaryOp};
use crate::errors::{ErrorCode, Reporter};
use crate::konst::{BinOp as KBinOp, Const, ShiftOp, UnOp as KUnOp};
use crate::operand::{Mode, Operand};
use crate::resolve::Resolver;
use crate::span::Span;
use crate::types::{comparable, has_nil, identical, BasicKind, ChanDir, Ty, TyKind};
use super::Checker;

/// base §9 "a small, extensible `opName(op) -> string` table" rather than a
/// `Display` impl on `UnaryOp`/`BinaryOp` directly, so new operators (or a
/// future non-Go source language) only touch one place.
fn op_name_unary(op: UnaryOp) -> &'static str {
  match op {
    UnaryOp::Add => "+", UnaryOp::Sub => "-", UnaryOp::Xor => "^",
    UnaryOp::Not => "!", UnaryOp::And => "&", UnaryOp::Recv => "<-",
  }
}

fn op_name(op: BinaryOp) -> &'static str {
  use BinaryOp::*;
  match op {
    Add => "+", Sub => "-", Mul => "*", Quo => "/", Rem => "%",
    And => "&", Or => "|", Xor => "^", AndNot => "&^",
    Shl => "<<", Shr => ">>",
    LAnd => "&&", LOr => "||",
    Eq => "==", Ne => "!=", Lt => "<", Le => "<=", Gt => ">", Ge => ">=",
  }
}

fn binop_of(op: BinaryOp) -> KBinOp {
  match op {
    BinaryOp::Add => KBinOp::Add, BinaryOp::Sub => KBinOp::Sub, BinaryOp::Mul => KBinOp::Mul,
    BinaryOp::Quo => KBinOp::Div, BinaryOp::Rem => KBinOp::Rem,
    BinaryOp::And => KBinOp::And, BinaryOp::Or => KBinOp::Or,
    BinaryOp::Xor => KBinOp::Xor, BinaryOp::AndNot => KBinOp::AndNot,
    _ => unreachable!("binop_of called on a non-arithmetic operator"),
  }
}

fn cmpop_of(op: BinaryOp) -> crate::konst::CmpOp {
  use crate::konst::CmpOp;
  match op {
    BinaryOp::Eq => CmpOp::Eq, BinaryOp::Ne => CmpOp::Ne,
    BinaryOp::Lt => CmpOp::Lt, BinaryOp::Le => CmpOp::Le,
    BinaryOp::Gt => CmpOp::Gt, BinaryOp::Ge => CmpOp::Ge,
    _ => unreachable!("cmpop_of called on a non-comparison operator"),
  }
}

fn chan_recv_elem(t: Ty<'_>) -> Option<Ty<'_>> {
  match t.underlying().kind() {
    TyKind::Chan(dir, elem) if *dir != ChanDir::Send => Some(*elem),
    _ => None,
  }
}

fn nil_pairing<'tcx, 'ast>(x: &Operand<'tcx, 'ast>, y: &Operand<'tcx, 'ast>) -> bool {
  (x.typ.basic() == Some(BasicKind::UntypedNil) && has_nil(y.typ))
    || (y.typ.basic() == Some(BasicKind::UntypedNil) && has_nil(x.typ))
}

impl<'tcx, 'ast, R: Reporter, N: Resolver<'tcx>> Checker<'tcx, 'ast, R, N> {
  /// `unary(x, op, pos)` (base §4.2). `&` (address-of) and `<-` (receive)
  /// are special-cased: they don't require a numeric/boolean operand, so
  /// they're peeled off before the shared category check.
  pub fn unary(&mut self, x: &mut Operand<'tcx, 'ast>, op: UnaryOp, span: Span) {
    if x.is_invalid() { return }

    if op == UnaryOp::And {
      let addressable = x.mode.is_addressable();
      let composite_lit = x.expr.is_some_and(|e| matches!(e.unparen().kind, crate::ast::ExprKind::CompositeLit { .. }));
      if !addressable && !composite_lit {
        self.error(span, ErrorCode::UnaddressableOperand, "cannot take the address of this operand");
        x.set_invalid(self.invalid());
        return;
      }
      let base = x.typ;
      x.mode = Mode::Value;
      x.typ = self.alloc_pointer(base);
      x.val = Const::Unknown;
      return;
    }

    if op == UnaryOp::Recv {
      match chan_recv_elem(x.typ) {
        Some(elem) => { x.mode = Mode::CommaOk; x.typ = elem; x.val = Const::Unknown; }
        None => {
          self.error(span, ErrorCode::InvalidReceive, "cannot receive from a non-channel or send-only channel");
          x.set_invalid(self.invalid());
        }
      }
      return;
    }

    let ok = match op {
      UnaryOp::Add | UnaryOp::Sub => crate::predicates::is_numeric(x.typ),
      UnaryOp::Xor => crate::predicates::is_integer(x.typ),
      UnaryOp::Not => crate::predicates::is_boolean(x.typ),
      UnaryOp::And | UnaryOp::Recv => unreachable!(),
    };
    if !ok {
      self.error(span, ErrorCode::UndefinedOp, format!("operator {} not defined for {:?}", op_name_unary(op), x.typ.basic()));
      x.set_invalid(self.invalid());
      return;
    }

    if x.mode == Mode::Constant {
      let prec = if matches!(op, UnaryOp::Sub | UnaryOp::Xor) && crate::predicates::is_unsigned(x.typ) {
        x.typ.basic().and_then(|b| self.sizing().bits(b)).unwrap_or(0)
      } else { 0 };
      let konst_op = match op {
        UnaryOp::Add => KUnOp::Pos, UnaryOp::Sub => KUnOp::Neg,
        UnaryOp::Xor => KUnOp::Complement, UnaryOp::Not => KUnOp::Not,
        UnaryOp::And | UnaryOp::Recv => unreachable!(),
      };
      x.val = Const::unary_op(konst_op, &x.val, prec);
      let sizing = self.sizing();
      let invalid_ty = self.invalid();
      crate::representability::overflow(x, sizing, op_name_unary(op), span, &mut self.reporter, invalid_ty);
    } else {
      x.mode = Mode::Value;
    }
  }

  fn alloc_pointer(&self, base: Ty<'tcx>) -> Ty<'tcx> { self.types.alloc(TyKind::Pointer(base)) }

  /// `binary(lhs, rhs, op, pos)` (base §4.3). Shifts and comparisons are
  /// delegated to their own entry points once both operands are checked.
  pub fn binary(&mut self, lhs: &'ast crate::ast::Expr<'ast>, rhs: &'ast crate::ast::Expr<'ast>, op: BinaryOp, pos: Span, result_expr: Option<&'ast crate::ast::Expr<'ast>>) -> Operand<'tcx, 'ast> {
    let mut x = self.expr(lhs);
    let mut y = self.expr(rhs);
    if x.is_invalid() { return x }
    if y.is_invalid() { return y }

    if op.is_shift() { return self.shift(x, y, op, pos) }

    self.convert_untyped(&mut y, x.typ);
    if y.is_invalid() { return y }
    self.convert_untyped(&mut x, y.typ);
    if x.is_invalid() { return x }

    if op.is_comparison() { return self.comparison(x, y, op, pos) }

    if !identical(x.typ, y.typ) {
      self.error(pos, ErrorCode::MismatchedTypes, format!("mismatched types {:?} and {:?}", x.typ.basic(), y.typ.basic()));
      return self.invalid_operand();
    }

    let ok = match op {
      BinaryOp::Add => crate::predicates::is_numeric(x.typ) || crate::predicates::is_string(x.typ),
      BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Quo => crate::predicates::is_numeric(x.typ),
      BinaryOp::Rem | BinaryOp::And | BinaryOp::Or | BinaryOp::Xor | BinaryOp::AndNot => crate::predicates::is_integer(x.typ),
      BinaryOp::LAnd | BinaryOp::LOr => crate::predicates::is_boolean(x.typ),
      BinaryOp::Shl | BinaryOp::Shr | BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => unreachable!(),
    };
    if !ok {
      self.error(pos, ErrorCode::UndefinedOp, format!("operator {} not defined for {:?}", op_name(op), x.typ.basic()));
      return self.invalid_operand();
    }

    if matches!(op, BinaryOp::Quo | BinaryOp::Rem) {
      let divisor_zero = y.mode == Mode::Constant && !matches!(y.val, Const::Unknown) && y.val.is_zero();
      let complex_divisor_zero = op == BinaryOp::Quo && y.mode == Mode::Constant
        && crate::predicates::is_complex(x.typ)
        && y.val.real().is_zero() && y.val.imag().is_zero();
      if divisor_zero || complex_divisor_zero {
        self.error(pos, ErrorCode::DivByZero, "division by zero");
        return self.invalid_operand();
      }
    }

    if x.mode == Mode::Constant && y.mode == Mode::Constant {
      let mut result = x.clone();
      result.val = if matches!(x.val, Const::Unknown) || matches!(y.val, Const::Unknown) {
        Const::Unknown
      } else if matches!(op, BinaryOp::LAnd | BinaryOp::LOr) {
        Const::make_bool(if op == BinaryOp::LAnd { x.val.bool_val() && y.val.bool_val() } else { x.val.bool_val() || y.val.bool_val() })
      } else {
        Const::binary_op(&x.val, binop_of(op), &y.val)
      };
      let sizing = self.sizing();
      let invalid_ty = self.invalid();
      crate::representability::overflow(&mut result, sizing, op_name(op), pos, &mut self.reporter, invalid_ty);
      if let Some(e) = result_expr { result.expr = Some(e) }
      result
    } else {
      x.mode = Mode::Value;
      x.val = Const::Unknown;
      if let Some(e) = result_expr { x.expr = Some(e) }
      x
    }
  }

  /// `shift(x, y, op, pos)` (base §4.4).
  pub fn shift(&mut self, mut x: Operand<'tcx, 'ast>, mut y: Operand<'tcx, 'ast>, op: BinaryOp, pos: Span) -> Operand<'tcx, 'ast> {
    let shift_op = if op == BinaryOp::Shl { ShiftOp::Shl } else { ShiftOp::Shr };
    let lhs_untyped = x.typ.basic().is_some_and(BasicKind::is_untyped);

    let lhs_ok = if x.mode == Mode::Constant && lhs_untyped {
      !matches!(x.val.to_int(), Const::Unknown)
    } else {
      crate::predicates::is_integer(x.typ)
    };
    if !lhs_ok {
      self.error(pos, ErrorCode::InvalidShiftOperand, format!("shifted operand {:?} must be integer", x.typ.basic()));
      return self.invalid_operand();
    }

    if !crate::predicates::is_integer(y.typ) {
      self.error(pos, ErrorCode::InvalidShiftCount, format!("shift count {:?} must be integer", y.typ.basic()));
      return self.invalid_operand();
    }
    if y.typ.basic().is_some_and(BasicKind::is_untyped) {
      let uint = self.basic(BasicKind::Uint);
      self.convert_untyped(&mut y, uint);
      if y.is_invalid() { return y }
    }

    if y.mode == Mode::Constant {
      if !matches!(y.val, Const::Unknown) {
        let valid = match y.val.to_int() {
          Const::Int(i) => !i.is_negative() && i.to_u64().is_some_and(|v| v <= 1075),
          _ => false,
        };
        if !valid {
          self.error(pos, ErrorCode::InvalidShiftCount, format!("invalid shift count {}", y.val));
          return self.invalid_operand();
        }
      }

      if x.mode == Mode::Constant {
        let mut result = x.clone();
        if lhs_untyped && !crate::predicates::is_integer(x.typ) {
          result.typ = self.basic(BasicKind::UntypedInt);
        }
        result.val = if matches!(x.val, Const::Unknown) || matches!(y.val, Const::Unknown) {
          Const::Unknown
        } else {
          let count = match y.val.to_int() { Const::Int(i) => i.to_u64().unwrap_or(0), _ => 0 };
          Const::shift(&x.val.to_int(), shift_op, count)
        };
        let sizing = self.sizing();
        let invalid_ty = self.invalid();
        crate::representability::overflow(&mut result, sizing, op_name(op), pos, &mut self.reporter, invalid_ty);
        return result;
      }

      if lhs_untyped {
        self.error(pos, ErrorCode::InvalidShiftOperand, "shifted operand must be integer");
        return self.invalid_operand();
      }
      x.mode = Mode::Value;
      return x;
    }

    // Non-constant rhs: the count can't be folded, so a constant untyped
    // lhs is deferred (base §4.4 "the lhs's final type is fixed later by
    // `updateExprType`").
    if x.mode == Mode::Constant && lhs_untyped {
      if let Some(e) = x.expr { self.register_untyped(e, x.mode, x.typ, x.val.clone(), true) }
      x.mode = Mode::Value;
      return x;
    }
    if lhs_untyped {
      self.error(pos, ErrorCode::InvalidShiftOperand, "shifted operand must be integer");
      return self.invalid_operand();
    }
    x.mode = Mode::Value;
    x
  }

  /// `comparison(x, y, op, pos)` (base §4.5).
  pub fn comparison(&mut self, mut x: Operand<'tcx, 'ast>, mut y: Operand<'tcx, 'ast>, op: BinaryOp, pos: Span) -> Operand<'tcx, 'ast> {
    let assignable = self.assignable_to(&x, y.typ) || self.assignable_to(&y, x.typ);
    if !assignable {
      self.error(pos, ErrorCode::MismatchedTypes, format!("mismatched types {:?} and {:?}", x.typ.basic(), y.typ.basic()));
      return self.invalid_operand();
    }

    let ok = if matches!(op, BinaryOp::Eq | BinaryOp::Ne) {
      (comparable(x.typ) && comparable(y.typ)) || nil_pairing(&x, &y)
    } else {
      crate::predicates::is_ordered(x.typ) && crate::predicates::is_ordered(y.typ)
    };
    if !ok {
      self.error(pos, ErrorCode::UndefinedOp, format!("operator {} not defined for {:?}", op_name(op), x.typ.basic()));
      return self.invalid_operand();
    }

    let both_const = x.mode == Mode::Constant && y.mode == Mode::Constant;
    let val = if both_const {
      if matches!(x.val, Const::Unknown) || matches!(y.val, Const::Unknown) {
        Const::Unknown
      } else {
        Const::make_bool(Const::compare(&x.val, cmpop_of(op), &y.val))
      }
    } else {
      if let Some(e) = x.expr { let t = self.default_ty(x.typ); self.update_expr_type(e, t, true) }
      if let Some(e) = y.expr { let t = self.default_ty(y.typ); self.update_expr_type(e, t, true) }
      Const::Unknown
    };
    let _ = (&mut x, &mut y);

    Operand {
      mode: if both_const { Mode::Constant } else { Mode::Value },
      expr: None,
      typ: self.basic(BasicKind::UntypedBool),
      val,
      id: None,
    }
  }
}
