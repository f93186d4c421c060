//! Untyped-expression registry and propagation (base §3 "Untyped-expression
//! registry"; base §4.6 `updateExprType`/`updateExprVal`/`convertUntyped`/
//! `canConvertUntyped`/`implicitType`).

use crate::ast::{expr_id, Expr, ExprKind};
use crate::errors::{ErrorCode, Reporter};
use crate::konst::Const;
use crate::operand::{Mode, Operand};
use crate::resolve::Resolver;
use crate::types::{BasicKind, Ty, TyKind};
use super::Checker;

/// base §3 "a mapping from AST expression identity to a record `{ mode,
/// typ: Basic (untyped kind), val, isLhs }`". `expr` is the node the entry
/// is keyed on (the outermost paren wrapper, if any — see
/// `Checker::raw_expr`), kept so later traversal doesn't need the caller to
/// hand the same pointer back in.
#[derive(Clone)]
pub struct UntypedRecord<'tcx, 'ast> {
  pub mode: Mode,
  pub typ: Ty<'tcx>,
  pub val: Const,
  /// base §4.4 "a deferred shift whose lhs is untyped and non-constant
  /// records `isLhs = true`, so `updateExprType` can enforce that the
  /// type it's finally given is integer".
  pub is_lhs: bool,
  pub expr: &'ast Expr<'ast>,
}

impl<'tcx, 'ast, R: Reporter, N: Resolver<'tcx>> Checker<'tcx, 'ast, R, N> {
  /// Insert/overwrite a registry entry for `e` (base §3: entries are
  /// inserted when `rawExpr` finishes on an untyped, non-invalid result).
  pub(super) fn register_untyped(&mut self, e: &'ast Expr<'ast>, mode: Mode, typ: Ty<'tcx>, val: Const, is_lhs: bool) {
    log::trace!("register_untyped: {:?} is_lhs={is_lhs}", e.span);
    self.untyped.insert(expr_id(e), UntypedRecord { mode, typ, val, is_lhs, expr: e });
  }

  /// Push `typ` down through the AST shape of an untyped expression without
  /// touching the registry — used both by `update_expr_type`'s recursive
  /// step and, via `ParenExpr`, to look straight through a wrapper that was
  /// never separately registered (base §4.8 "ParenExpr: transparent").
  fn descend_expr_type(&mut self, e: &'ast Expr<'ast>, typ: Ty<'tcx>, final_: bool, const_entry: bool) {
    match &e.kind {
      ExprKind::Paren(inner) => self.descend_expr_type(inner, typ, final_, const_entry),
      ExprKind::Unary(_, operand) => {
        if !const_entry { self.update_expr_type(operand, typ, final_) }
      }
      ExprKind::Binary(op, lhs, rhs) => {
        if !const_entry {
          if op.is_comparison() {
            // both sides were already finalized to their own default types
            // during `comparison` (base §4.5); nothing left to push.
          } else if op.is_shift() {
            self.update_expr_type(lhs, typ, final_);
          } else {
            self.update_expr_type(lhs, typ, final_);
            self.update_expr_type(rhs, typ, final_);
          }
        }
      }
      ExprKind::Ident(_) | ExprKind::BasicLit(..) | ExprKind::Selector(..) | ExprKind::Call { .. } => {}
      _ => crate::errors::internal_error!("unexpected untyped AST kind in updateExprType: {:?}", e.kind),
    }
  }

  /// `updateExprType(e, typ, final)` (base §4.6).
  pub fn update_expr_type(&mut self, e: &'ast Expr<'ast>, typ: Ty<'tcx>, final_: bool) {
    let id = expr_id(e);
    let Some(rec) = self.untyped.get(&id).cloned() else { return };

    self.descend_expr_type(e, typ, final_, rec.mode == Mode::Constant);

    if !final_ {
      if let Some(b) = typ.basic() {
        if b.is_untyped() {
          self.untyped.insert(id, UntypedRecord { typ, ..rec });
          return;
        }
      }
    }

    self.untyped.remove(&id);

    if rec.is_lhs && !crate::predicates::is_integer(typ) {
      self.error(e.span, ErrorCode::InvalidShiftOperand, "shifted operand must be integer");
      return;
    }

    if rec.mode == Mode::Constant {
      match crate::representability::representable_const(&rec.val, self.sizing(), typ.basic().unwrap_or(BasicKind::Invalid)) {
        Some(rounded) => self.record(e, Mode::Constant, typ, rounded),
        None => self.error(e.span, ErrorCode::NumericOverflow, format!("cannot convert {} to {:?}", rec.val, typ.basic())),
      }
    } else {
      self.record(e, rec.mode, typ, Const::Unknown);
    }
  }

  /// `updateExprVal(e, val)`: swap the recorded constant value (used once
  /// representability rounds it) without disturbing `mode`/`typ`.
  pub fn update_expr_val(&mut self, e: &'ast Expr<'ast>, val: Const) {
    if let Some(rec) = self.untyped.get_mut(&expr_id(e)) {
      rec.val = val;
    }
  }

  /// `convertUntyped(x, target)` (base §4.6).
  pub fn convert_untyped(&mut self, x: &mut Operand<'tcx, 'ast>, target: Ty<'tcx>) {
    if x.is_invalid() || target.is_invalid() { return }
    let Some(xk) = x.typ.basic() else { return };
    if !xk.is_untyped() { return }

    if let Some(tk) = target.basic() {
      if tk.is_untyped() {
        if crate::predicates::is_numeric(x.typ) && crate::predicates::is_numeric(target) {
          if let (Some(xr), Some(tr)) = (xk.untyped_numeric_rank(), tk.untyped_numeric_rank()) {
            if xr < tr {
              x.typ = target;
              if let Some(e) = x.expr { self.update_expr_type(e, target, false) }
            }
          }
        } else if xk != tk {
          self.error(self.span_of(x), ErrorCode::MismatchedTypes, format!("mismatched types {xk:?} and {tk:?}"));
          x.set_invalid(self.invalid());
        }
        return;
      }
    }

    if x.mode == Mode::Constant {
      if let Some(tk) = target.basic() {
        match crate::representability::representable_const(&x.val, self.sizing(), tk) {
          Some(rounded) => {
            if let Some(e) = x.expr { self.update_expr_val(e, rounded.clone()) }
            x.val = rounded;
          }
          None => {
            let code = if x.val.kind() == crate::konst::ConstKind::Float && crate::predicates::is_integer(target) {
              ErrorCode::TruncatedFloat
            } else {
              ErrorCode::NumericOverflow
            };
            self.error(self.span_of(x), code, format!("{} (untyped {xk:?} constant) cannot be represented as {:?}", x.val, target.basic()));
            x.set_invalid(self.invalid());
            return;
          }
        }
      }
    }

    match self.implicit_type(x, target) {
      Some(t) => {
        x.typ = t;
        if let Some(e) = x.expr { self.update_expr_type(e, t, true) }
      }
      None => {
        self.error(self.span_of(x), ErrorCode::InvalidUntypedConversion, format!("cannot convert {xk:?} to {:?}", target.basic()));
        x.set_invalid(self.invalid());
      }
    }
  }

  /// `canConvertUntyped`: read-only probe used by assignability/comparison
  /// symmetry checks that need "would this succeed" without committing to
  /// `convert_untyped`'s side effects (registry/diagnostic mutation).
  #[must_use]
  pub fn can_convert_untyped(&self, x: &Operand<'tcx, 'ast>, target: Ty<'tcx>) -> bool {
    if x.is_invalid() || target.is_invalid() { return false }
    let Some(xk) = x.typ.basic() else { return false };
    if !xk.is_untyped() { return false }

    if let Some(tk) = target.basic() {
      if tk.is_untyped() {
        return xk == tk || (crate::predicates::is_numeric(x.typ) && crate::predicates::is_numeric(target));
      }
      if x.mode == Mode::Constant {
        return crate::representability::is_representable(&x.val, self.sizing(), tk);
      }
    }
    self.implicit_type(x, target).is_some()
  }

  /// `implicitType(x, target)` (base §4.6): the concrete type an untyped
  /// operand takes on when used where `target` is expected, independent of
  /// constant-value representability (which `convert_untyped` checks
  /// separately).
  #[must_use]
  pub fn implicit_type(&self, x: &Operand<'tcx, 'ast>, target: Ty<'tcx>) -> Option<Ty<'tcx>> {
    let xk = x.typ.basic()?;
    match target.kind() {
      TyKind::Basic(tb) => match xk {
        BasicKind::UntypedBool => (*tb == BasicKind::Bool).then_some(target),
        BasicKind::UntypedInt | BasicKind::UntypedRune | BasicKind::UntypedFloat | BasicKind::UntypedComplex =>
          crate::predicates::is_numeric(target).then_some(target),
        BasicKind::UntypedString => (*tb == BasicKind::String).then_some(target),
        BasicKind::UntypedNil => (*tb == BasicKind::UnsafePointer).then_some(target),
        _ => None,
      },
      TyKind::Interface { empty, .. } => {
        if xk == BasicKind::UntypedNil { return Some(self.basic(BasicKind::UntypedNil)) }
        if !*empty { return None }
        Some(self.basic(xk.default_type()))
      }
      TyKind::Pointer(_) | TyKind::Signature { .. } | TyKind::Slice(_) | TyKind::Map(_, _) | TyKind::Chan(_, _) =>
        (xk == BasicKind::UntypedNil).then(|| self.basic(BasicKind::UntypedNil)),
      _ => None,
    }
  }
}
