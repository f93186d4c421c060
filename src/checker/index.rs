//! Indexing, slicing, type assertion, pointer indirection (base §4.8), plus
//! the call-expression and selector-expression checking base §4.9's
//! dispatcher needs to handle `IndexExpr`/`SliceExpr`/`TypeAssertExpr`/
//! `StarExpr`/`CallExpr`/`SelectorExpr`. Base §1 places general name
//! resolution (identifier lookup, package-selector resolution) out of
//! scope, but struct-field and named-type method lookup are a pure function
//! of the type lattice this crate already owns, the same reasoning
//! `Checker::assignable_to` already applies to `identical`/interface method
//! sets — so that part of selector checking lives here rather than behind
//! the external [`crate::resolve::Resolver`].

use crate::ast::{Expr, TypeExpr};
use crate::errors::{ErrorCode, Reporter};
use crate::konst::Const;
use crate::operand::{BuiltinId, Mode, Operand};
use crate::resolve::Resolver;
use crate::span::Span;
use crate::symbol::Symbol;
use crate::types::{ArrayLen, BasicKind, Ty, TyKind};
use super::Checker;

impl<'tcx, 'ast, R: Reporter, N: Resolver<'tcx>> Checker<'tcx, 'ast, R, N> {
  // ---- IndexExpr (base §4.8) --------------------------------------------

  pub(super) fn check_index_expr(&mut self, base: &'ast Expr<'ast>, idx: &'ast Expr<'ast>, span: Span) -> Operand<'tcx, 'ast> {
    let x = self.expr(base);
    if x.is_invalid() { self.expr(idx); return x }

    match x.typ.underlying().kind() {
      TyKind::Basic(BasicKind::String) => {
        let length = (x.mode == Mode::Constant).then(|| x.val.string_val().len() as u64);
        self.index(idx, length);
        Operand { mode: Mode::Value, expr: None, typ: self.basic(BasicKind::Uint8), val: Const::Unknown, id: None }
      }
      TyKind::Array(len, elem) => {
        let (len, elem) = (*len, *elem);
        self.index(idx, len.known());
        let mode = if x.mode == Mode::Variable { Mode::Variable } else { Mode::Value };
        Operand { mode, expr: None, typ: elem, val: Const::Unknown, id: None }
      }
      TyKind::Pointer(base_ty) => match base_ty.underlying().kind() {
        TyKind::Array(len, elem) => {
          let (len, elem) = (*len, *elem);
          self.index(idx, len.known());
          Operand { mode: Mode::Variable, expr: None, typ: elem, val: Const::Unknown, id: None }
        }
        _ => { self.nonindexable(&x, span); self.expr(idx); self.invalid_operand() }
      },
      TyKind::Slice(elem) => {
        let elem = *elem;
        self.index(idx, None);
        Operand { mode: Mode::Variable, expr: None, typ: elem, val: Const::Unknown, id: None }
      }
      TyKind::Map(key, elem) => {
        let (key, elem) = (*key, *elem);
        let mut k = self.expr(idx);
        self.assignment(&mut k, key, idx.span, "as map key");
        Operand { mode: Mode::MapIndex, expr: None, typ: elem, val: Const::Unknown, id: None }
      }
      _ => { self.nonindexable(&x, span); self.expr(idx); self.invalid_operand() }
    }
  }

  fn nonindexable(&mut self, x: &Operand<'tcx, 'ast>, span: Span) {
    self.error(span, ErrorCode::NonIndexableOperand, format!("cannot index operand of type {:?}", x.typ.basic()));
  }

  // ---- SliceExpr (base §4.8) --------------------------------------------

  pub(super) fn check_slice_expr(
    &mut self, x_expr: &'ast Expr<'ast>, lo: Option<&'ast Expr<'ast>>, hi: Option<&'ast Expr<'ast>>, max: Option<&'ast Expr<'ast>>, span: Span,
  ) -> Operand<'tcx, 'ast> {
    let x = self.expr(x_expr);
    if x.is_invalid() {
      for e in [lo, hi, max].into_iter().flatten() { self.expr(e); }
      return x;
    }
    let three_index = max.is_some();

    let (result_typ, length) = match x.typ.underlying().kind() {
      TyKind::Basic(BasicKind::String) => {
        if three_index {
          self.error(span, ErrorCode::InvalidSliceExpr, "3-index slice of string");
          for e in [lo, hi, max].into_iter().flatten() { self.expr(e); }
          return self.invalid_operand();
        }
        (x.typ, (x.mode == Mode::Constant).then(|| x.val.string_val().len() as u64))
      }
      TyKind::Slice(_) => (x.typ, None),
      TyKind::Array(len, elem) => {
        if x.mode != Mode::Variable {
          self.error(span, ErrorCode::NonSliceableOperand, "cannot slice an unaddressable array");
          for e in [lo, hi, max].into_iter().flatten() { self.expr(e); }
          return self.invalid_operand();
        }
        (self.types.alloc(TyKind::Slice(*elem)), len.known())
      }
      TyKind::Pointer(base) => match base.underlying().kind() {
        TyKind::Array(len, elem) => (self.types.alloc(TyKind::Slice(*elem)), len.known()),
        _ => { self.nonsliceable(&x, span); for e in [lo, hi, max].into_iter().flatten() { self.expr(e); } return self.invalid_operand() }
      },
      _ => { self.nonsliceable(&x, span); for e in [lo, hi, max].into_iter().flatten() { self.expr(e); } return self.invalid_operand() }
    };

    if three_index && hi.is_none() {
      self.error(span, ErrorCode::InvalidSliceExpr, "3-index slice must specify the high bound");
    }

    // base §4.8 "Index validation uses index(expr, length+1) (the capacity
    // bound for the last two indices)".
    let cap_bound = length.map(|n| n + 1);
    let lo_val = lo.map_or(Some(0), |e| self.index(e, length));
    let hi_val = match hi { Some(e) => self.index(e, cap_bound), None => length };
    let max_val = max.and_then(|e| self.index(e, cap_bound));

    if let (Some(l), Some(h)) = (lo_val, hi_val) {
      if l > h { self.error(span, ErrorCode::SwappedSliceIndices, format!("swapped slice indices: {l} > {h}")); }
    }
    if let (Some(h), Some(m)) = (hi_val, max_val) {
      if h > m { self.error(span, ErrorCode::SwappedSliceIndices, format!("swapped slice indices: {h} > {m}")); }
    }

    Operand { mode: Mode::Value, expr: None, typ: result_typ, val: Const::Unknown, id: None }
  }

  fn nonsliceable(&mut self, x: &Operand<'tcx, 'ast>, span: Span) {
    self.error(span, ErrorCode::NonSliceableOperand, format!("cannot slice operand of type {:?}", x.typ.basic()));
  }

  // ---- TypeAssertExpr (base §4.8) ---------------------------------------

  /// `typeAssertion` (base §6 export list). `check_type_assert` is the
  /// dispatcher-facing name used from `exprInternal`'s `TypeAssertExpr` arm;
  /// both names reach the same implementation.
  pub fn type_assertion(&mut self, x_expr: &'ast Expr<'ast>, te: &TypeExpr<'ast>, span: Span) -> Operand<'tcx, 'ast> {
    self.check_type_assert(x_expr, te, span)
  }

  pub(super) fn check_type_assert(&mut self, x_expr: &'ast Expr<'ast>, te: &TypeExpr<'ast>, span: Span) -> Operand<'tcx, 'ast> {
    let x = self.expr(x_expr);
    if x.is_invalid() { return x }
    let TyKind::Interface { methods: iface_methods, empty } = x.typ.underlying().kind() else {
      self.error(span, ErrorCode::InvalidAssert, "type assertion on non-interface value");
      return self.invalid_operand();
    };
    let (iface_methods, empty) = (iface_methods.clone(), *empty);
    let target = self.eval_type(te, span);
    if target.is_invalid() { return self.invalid_operand() }

    if !empty && !matches!(target.underlying().kind(), TyKind::Interface { .. }) {
      for m in &iface_methods {
        if !self.type_has_method(target, m) {
          let code = if m.pointer_receiver { ErrorCode::InvalidAssert } else { ErrorCode::ImpossibleAssert };
          self.error(span, code, "missing method for type assertion");
          return self.invalid_operand();
        }
      }
    }
    Operand { mode: Mode::CommaOk, expr: None, typ: target, val: Const::Unknown, id: None }
  }

  // ---- StarExpr (base §4.8) ----------------------------------------------

  pub(super) fn check_star(&mut self, inner: &'ast Expr<'ast>, span: Span) -> Operand<'tcx, 'ast> {
    let (x, _kind) = self.raw_expr(inner, None);
    if x.is_invalid() { return x }
    if x.mode == Mode::TypeExpr {
      return Operand { mode: Mode::TypeExpr, expr: None, typ: self.types.alloc(TyKind::Pointer(x.typ)), val: Const::Unknown, id: None };
    }
    match x.typ.underlying().kind() {
      TyKind::Pointer(base) => Operand { mode: Mode::Variable, expr: None, typ: *base, val: Const::Unknown, id: None },
      _ => {
        self.error(span, ErrorCode::InvalidIndirection, format!("cannot indirect operand of type {:?}", x.typ.basic()));
        self.invalid_operand()
      }
    }
  }

  // ---- SelectorExpr's field/method half (base §4.8, §1 boundary note) ---

  pub(super) fn select_field_or_method(&mut self, x: &Operand<'tcx, 'ast>, sel: Symbol, span: Span) -> Operand<'tcx, 'ast> {
    let (base_ty, addressable) = match x.typ.underlying().kind() {
      TyKind::Pointer(b) => (*b, true),
      _ => (x.typ, x.mode.is_addressable()),
    };

    if let TyKind::Struct(fields) = base_ty.underlying().kind() {
      if let Some(f) = fields.iter().find(|f| f.name == sel) {
        let mode = if addressable { Mode::Variable } else { Mode::Value };
        return Operand { mode, expr: None, typ: f.ty, val: Const::Unknown, id: None };
      }
    }
    if let TyKind::Named(info, _, _) = base_ty.kind() {
      if let Some(m) = info.methods.iter().find(|m| m.name == sel) {
        return Operand { mode: Mode::Value, expr: None, typ: m.sig, val: Const::Unknown, id: None };
      }
    }
    if let TyKind::Interface { methods, .. } = x.typ.underlying().kind() {
      if let Some(m) = methods.iter().find(|m| m.name == sel) {
        return Operand { mode: Mode::Value, expr: None, typ: m.sig, val: Const::Unknown, id: None };
      }
    }
    self.error(span, ErrorCode::NotAnExpr, "undefined field or method");
    self.invalid_operand()
  }

  // ---- CallExpr (base §4.9 dispatcher; base §6 "implement... call") -----

  pub(super) fn check_call(&mut self, func: &'ast Expr<'ast>, args: &[&'ast Expr<'ast>], ellipsis: bool, span: Span) -> Operand<'tcx, 'ast> {
    let (f, _kind) = self.raw_expr(func, None);
    if f.is_invalid() {
      for &a in args { self.expr(a); }
      return f;
    }
    match f.mode {
      Mode::Builtin => self.check_builtin_call(f.id.expect("Mode::Builtin operand without an id"), args, span),
      Mode::TypeExpr => self.check_conversion(f.typ, args, span),
      Mode::Value | Mode::Variable => self.check_function_call(f.typ, args, ellipsis, span),
      _ => {
        self.error(span, ErrorCode::NotAnExpr, "cannot call this expression");
        for &a in args { self.expr(a); }
        self.invalid_operand()
      }
    }
  }

  fn check_function_call(&mut self, fty: Ty<'tcx>, args: &[&'ast Expr<'ast>], ellipsis: bool, span: Span) -> Operand<'tcx, 'ast> {
    let TyKind::Signature { params, results, variadic } = fty.underlying().kind() else {
      self.error(span, ErrorCode::NotAnExpr, format!("cannot call non-function type {:?}", fty.basic()));
      for &a in args { self.expr(a); }
      return self.invalid_operand();
    };
    let (params, results, variadic) = (params.clone(), results.clone(), *variadic);

    if ellipsis && !variadic {
      self.error(span, ErrorCode::BadDotDotDotSyntax, "invalid use of ... in call to non-variadic function");
    }
    let ellipsis = ellipsis && variadic;

    let min_params = if variadic { params.len().saturating_sub(1) } else { params.len() };
    if args.len() < min_params || (!variadic && args.len() > params.len()) {
      self.error(span, ErrorCode::TooManyValues, "wrong number of arguments in call");
    } else if ellipsis && args.len() != params.len() {
      self.error(span, ErrorCode::BadDotDotDotSyntax, "cannot use ... with a spread argument count that doesn't match the variadic parameter");
    }

    for (i, &a) in args.iter().enumerate() {
      let is_last_variadic_slot = variadic && i + 1 >= params.len();
      let target = if is_last_variadic_slot {
        if ellipsis {
          // `f(xs...)`: `xs` is assignment-checked against the variadic
          // parameter's own slice type, not its element type.
          params.last().copied()
        } else {
          params.last().map(|&last| match last.underlying().kind() { TyKind::Slice(e) => *e, _ => last })
        }
      } else {
        params.get(i).copied()
      };
      match target {
        Some(t) => { let mut v = self.expr_with_hint(a, t); self.assignment(&mut v, t, a.span, "in argument"); }
        None => { self.expr(a); }
      }
    }

    match results.len() {
      0 => Operand { mode: Mode::NoValue, expr: None, typ: self.invalid(), val: Const::Unknown, id: None },
      1 => Operand { mode: Mode::Value, expr: None, typ: results[0], val: Const::Unknown, id: None },
      _ => {
        let tuple = results.into_iter().collect();
        Operand { mode: Mode::Value, expr: None, typ: self.types.alloc(TyKind::Tuple(tuple)), val: Const::Unknown, id: None }
      }
    }
  }

  /// `T(x)`: an explicit type conversion (base §4.9 `exprKind::Conversion`).
  fn check_conversion(&mut self, target: Ty<'tcx>, args: &[&'ast Expr<'ast>], span: Span) -> Operand<'tcx, 'ast> {
    let [a0] = args else {
      self.error(span, ErrorCode::TooManyValues, "conversion requires exactly one argument");
      for &a in args { self.expr(a); }
      return self.invalid_operand();
    };
    let mut x = self.expr(a0);
    if x.is_invalid() { return x }

    if let Some(xb) = x.typ.basic() {
      if xb.is_untyped() {
        self.convert_untyped(&mut x, target);
        if x.is_invalid() { return x }
        return Operand { mode: x.mode, expr: None, typ: target, val: x.val, id: None };
      }
    }

    let convertible = crate::types::identical(x.typ, target)
      || (crate::predicates::is_numeric(x.typ) && crate::predicates::is_numeric(target))
      || (crate::predicates::is_string(x.typ) && crate::predicates::is_string(target))
      || crate::types::identical(x.typ.underlying(), target.underlying());
    if !convertible {
      self.error(span, ErrorCode::MismatchedTypes, format!("cannot convert {:?} to {:?}", x.typ.basic(), target.basic()));
      return self.invalid_operand();
    }

    if x.mode == Mode::Constant {
      match crate::representability::representable_const(&x.val, self.sizing(), target.basic().unwrap_or(BasicKind::Invalid)) {
        Some(v) => Operand { mode: Mode::Constant, expr: None, typ: target, val: v, id: None },
        // An explicit conversion is allowed to round/truncate where a bare
        // assignment would not be; the result is simply non-constant.
        None => Operand { mode: Mode::Value, expr: None, typ: target, val: Const::Unknown, id: None },
      }
    } else {
      Operand { mode: Mode::Value, expr: None, typ: target, val: Const::Unknown, id: None }
    }
  }

  fn check_builtin_call(&mut self, id: BuiltinId, args: &[&'ast Expr<'ast>], span: Span) -> Operand<'tcx, 'ast> {
    use BuiltinId::*;
    match id {
      Len | Cap => {
        let [a0] = args else {
          self.error(span, ErrorCode::TooManyValues, "wrong number of arguments to builtin");
          return self.invalid_operand();
        };
        let x = self.expr(a0);
        let int_ty = self.basic(BasicKind::Int);
        if id == Len && x.mode == Mode::Constant && crate::predicates::is_string(x.typ) {
          let n = i64::try_from(x.val.string_val().len()).unwrap_or(i64::MAX);
          return Operand { mode: Mode::Constant, expr: None, typ: int_ty, val: Const::make_int64(n), id: None };
        }
        Operand { mode: Mode::Value, expr: None, typ: int_ty, val: Const::Unknown, id: None }
      }
      New => {
        let Some(&a0) = args.first() else {
          self.error(span, ErrorCode::TooManyValues, "new requires a type argument");
          return self.invalid_operand();
        };
        let (t, _) = self.raw_expr(a0, None);
        if t.mode != Mode::TypeExpr {
          self.error(span, ErrorCode::BadTypeKeyword, "argument to new must be a type");
          return self.invalid_operand();
        }
        Operand { mode: Mode::Value, expr: None, typ: self.types.alloc(TyKind::Pointer(t.typ)), val: Const::Unknown, id: None }
      }
      Make => {
        let Some((&a0, rest)) = args.split_first() else {
          self.error(span, ErrorCode::TooManyValues, "make requires a type argument");
          return self.invalid_operand();
        };
        let (t, _) = self.raw_expr(a0, None);
        if t.mode != Mode::TypeExpr {
          self.error(span, ErrorCode::BadTypeKeyword, "argument to make must be a type");
          return self.invalid_operand();
        }
        let int_ty = self.basic(BasicKind::Int);
        for &a in rest {
          let mut v = self.expr(a);
          self.assignment(&mut v, int_ty, a.span, "as make size argument");
        }
        Operand { mode: Mode::Value, expr: None, typ: t.typ, val: Const::Unknown, id: None }
      }
      Append => {
        let Some((&first, rest)) = args.split_first() else {
          self.error(span, ErrorCode::TooManyValues, "append requires a slice argument");
          return self.invalid_operand();
        };
        let s = self.expr(first);
        if s.is_invalid() { return s }
        let TyKind::Slice(elem) = s.typ.underlying().kind() else {
          self.error(span, ErrorCode::NonIndexableOperand, "first argument to append must be a slice");
          return self.invalid_operand();
        };
        let elem = *elem;
        for &a in rest {
          let mut v = self.expr_with_hint(a, elem);
          self.assignment(&mut v, elem, a.span, "in append");
        }
        Operand { mode: Mode::Value, expr: None, typ: s.typ, val: Const::Unknown, id: None }
      }
      Copy => {
        if args.len() != 2 {
          self.error(span, ErrorCode::TooManyValues, "copy requires two arguments");
          for &a in args { self.expr(a); }
          return self.invalid_operand();
        }
        self.expr(args[0]);
        self.expr(args[1]);
        Operand { mode: Mode::Value, expr: None, typ: self.basic(BasicKind::Int), val: Const::Unknown, id: None }
      }
      Delete => {
        if let [m, k] = args {
          let mx = self.expr(m);
          if let TyKind::Map(kt, _) = mx.typ.underlying().kind() {
            let kt = *kt;
            let mut kv = self.expr(k);
            self.assignment(&mut kv, kt, k.span, "as map key");
          }
        } else {
          self.error(span, ErrorCode::TooManyValues, "delete requires two arguments");
          for &a in args { self.expr(a); }
        }
        Operand { mode: Mode::NoValue, expr: None, typ: self.invalid(), val: Const::Unknown, id: None }
      }
      Panic => {
        for &a in args { self.expr(a); }
        Operand { mode: Mode::NoValue, expr: None, typ: self.invalid(), val: Const::Unknown, id: None }
      }
      Recover => Operand { mode: Mode::Value, expr: None, typ: self.empty_interface(), val: Const::Unknown, id: None },
      Print | Println => {
        for &a in args { self.expr(a); }
        Operand { mode: Mode::NoValue, expr: None, typ: self.invalid(), val: Const::Unknown, id: None }
      }
      Close => {
        for &a in args { self.expr(a); }
        Operand { mode: Mode::NoValue, expr: None, typ: self.invalid(), val: Const::Unknown, id: None }
      }
      Complex => {
        let [re_e, im_e] = args else {
          self.error(span, ErrorCode::TooManyValues, "complex requires two arguments");
          return self.invalid_operand();
        };
        let mut re = self.expr(re_e);
        let mut im = self.expr(im_e);
        if re.is_invalid() || im.is_invalid() { return self.invalid_operand() }
        self.convert_untyped(&mut im, re.typ);
        self.convert_untyped(&mut re, im.typ);
        if re.mode == Mode::Constant && im.mode == Mode::Constant {
          let val = Const::binary_op(&re.val, crate::konst::BinOp::Add, &Const::make_imag(&im.val));
          return Operand { mode: Mode::Constant, expr: None, typ: self.basic(BasicKind::UntypedComplex), val, id: None };
        }
        Operand { mode: Mode::Value, expr: None, typ: self.basic(BasicKind::Complex128), val: Const::Unknown, id: None }
      }
      Real | Imag => {
        let [a0] = args else {
          self.error(span, ErrorCode::TooManyValues, "wrong number of arguments to builtin");
          return self.invalid_operand();
        };
        let x = self.expr(a0);
        if x.mode == Mode::Constant {
          let val = if id == Real { x.val.real() } else { x.val.imag() };
          return Operand { mode: Mode::Constant, expr: None, typ: self.basic(BasicKind::UntypedFloat), val, id: None };
        }
        Operand { mode: Mode::Value, expr: None, typ: self.basic(BasicKind::Float64), val: Const::Unknown, id: None }
      }
    }
  }

  fn empty_interface(&self) -> Ty<'tcx> {
    self.types.alloc(TyKind::Interface { methods: smallvec::SmallVec::new(), empty: true })
  }
}

impl ArrayLen {
  fn known(self) -> Option<u64> {
    match self { ArrayLen::Known(n) => Some(n), ArrayLen::Placeholder => None }
  }
}
