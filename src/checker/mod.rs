//! The [`Checker`]: owner of all mutable checking state (base §5 "Global
//! mutable state: none; the checker instance owns all mutable state") and
//! home of the dispatcher (`rawExpr` → `exprInternal`, base §4.9) plus the
//! four public entry points.
//!
//! Split across submodules the way the teacher splits large per-phase
//! behaviour over one shared owning type (`mmcc::build_mir::Translator`'s
//! methods span `build_mir.rs`/`build_vcode.rs`/`codegen.rs`): this file
//! owns the struct, the dispatcher and the entry points; `untyped.rs` owns
//! untyped-propagation; `operators.rs` owns unary/binary/shift/comparison;
//! `composite.rs` owns composite-literal elaboration; `index.rs` owns
//! indexing/slicing/assertion/star/paren; `later.rs` owns the later-queue.

mod composite;
mod index;
mod later;
mod operators;
mod untyped;

pub use later::LaterEntry;
pub use untyped::UntypedRecord;

use hashbrown::HashMap;
use crate::ast::{expr_id, Expr, ExprId, ExprKind, LitKind, TypeExpr};
use crate::errors::{ErrorCode, Reporter};
use crate::konst::Const;
use crate::operand::{BuiltinId, Mode, Operand};
use crate::resolve::{ResolvedIdent, Resolver};
use crate::span::Span;
use crate::symbol::Interner;
use crate::types::{identical, BasicKind, Method, Sizing, Ty, TyKind, TypeArena};

/// `exprKind` (base §4.9): what a checked expression turned out to be.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CheckedKind { Expression, Statement, Conversion }

/// The recorded-types sink entry (base §6 `recordTypeAndValue`).
#[derive(Clone, Debug)]
pub struct TypeAndValue<'tcx> {
  pub mode: Mode,
  pub typ: Ty<'tcx>,
  pub val: Const,
}

pub struct Checker<'tcx, 'ast, R, N> {
  types: &'tcx TypeArena<'tcx>,
  sizing: Sizing,
  untyped: HashMap<ExprId, UntypedRecord<'tcx, 'ast>>,
  recorded: HashMap<ExprId, TypeAndValue<'tcx>>,
  later: im::Vector<LaterEntry>,
  /// `iota` in effect for a `FuncLit` encountered right now (base §5
  /// "capture the enclosing declaration context and iota value at enqueue
  /// time"); const-declaration iota tracking itself is out of scope (base
  /// §1), so the external driver sets this as it walks const blocks.
  cur_iota: i64,
  pub interner: Interner,
  reporter: R,
  resolver: N,
}

impl<'tcx, 'ast, R: Reporter, N: Resolver<'tcx>> Checker<'tcx, 'ast, R, N> {
  pub fn new(types: &'tcx TypeArena<'tcx>, sizing: Sizing, reporter: R, resolver: N) -> Self {
    Checker {
      types, sizing,
      untyped: HashMap::new(),
      recorded: HashMap::new(),
      later: im::Vector::new(),
      cur_iota: 0,
      interner: Interner::new(),
      reporter, resolver,
    }
  }

  #[must_use] pub fn sizing(&self) -> Sizing { self.sizing }
  #[must_use] pub fn invalid(&self) -> Ty<'tcx> { self.basic(BasicKind::Invalid) }
  #[must_use] pub fn basic(&self, k: BasicKind) -> Ty<'tcx> { self.types.basic(k) }
  pub fn reporter_mut(&mut self) -> &mut R { &mut self.reporter }
  #[must_use] pub fn recorded_for(&self, e: &'ast Expr<'ast>) -> Option<&TypeAndValue<'tcx>> { self.recorded.get(&expr_id(e)) }

  /// Set the `iota` the (out-of-scope) declaration checker currently has in
  /// effect; captured by the next `FuncLit` enqueued onto the later-queue.
  pub fn set_iota(&mut self, iota: i64) { self.cur_iota = iota; }

  /// `representable(v, target) -> Option<rounded>` (base §4.1, base §6
  /// export list): this checker's own [`Sizing`] applied to
  /// [`crate::representability::representable_const`].
  #[must_use]
  pub fn representable(&self, v: &Const, target: BasicKind) -> Option<Const> {
    crate::representability::representable_const(v, self.sizing, target)
  }

  /// `isRepresentable` (base §6 export list): the boolean-only probe over
  /// [`Checker::representable`].
  #[must_use]
  pub fn is_representable(&self, v: &Const, target: BasicKind) -> bool {
    crate::representability::is_representable(v, self.sizing, target)
  }

  fn invalid_operand(&self) -> Operand<'tcx, 'ast> { Operand::invalid(self.invalid()) }

  fn error(&mut self, span: Span, code: ErrorCode, msg: impl Into<String>) {
    self.reporter.error(span, code, msg);
  }

  fn span_of(&self, x: &Operand<'tcx, 'ast>) -> Span { x.expr.map_or(Span::DUMMY, |e| e.span) }

  /// `default(t)`: map an untyped basic kind to its default typed
  /// counterpart (base glossary "Default type"); a no-op on already-typed
  /// types.
  #[must_use] pub fn default_ty(&self, t: Ty<'tcx>) -> Ty<'tcx> {
    match t.basic() {
      Some(b) if b.is_untyped() => self.basic(b.default_type()),
      _ => t,
    }
  }

  /// `assignableTo(x, target)` (base §6 "Assignability"). Reified directly
  /// rather than deferred to an external trait: unlike identifier/selector
  /// resolution, the algorithm is wholly determined by the type lattice
  /// this crate already owns (base §3's `identical`/interface method sets).
  #[must_use]
  pub fn assignable_to(&self, x: &Operand<'tcx, 'ast>, target: Ty<'tcx>) -> bool {
    if x.is_invalid() || target.is_invalid() { return true }
    if identical(x.typ, target) { return true }
    if let Some(xb) = x.typ.basic() {
      if xb.is_untyped() { return self.can_convert_untyped(x, target) }
    }
    if let TyKind::Interface { methods, empty } = target.kind() {
      if *empty { return true }
      return methods.iter().all(|m| self.type_has_method(x.typ, m));
    }
    identical(x.typ.underlying(), target.underlying())
  }

  fn type_has_method(&self, t: Ty<'tcx>, m: &Method<'tcx>) -> bool {
    match t.kind() {
      TyKind::Named(info, _, _) => info.methods.iter().any(|mm| mm.name == m.name && identical(mm.sig, m.sig)),
      TyKind::Interface { methods, .. } => methods.iter().any(|mm| mm.name == m.name && identical(mm.sig, m.sig)),
      _ => false,
    }
  }

  /// `assignment(x, target, context)`: the untyped-conversion step plus the
  /// assignability check, used throughout composite-literal and call-
  /// argument checking (base §4.7/§4.8). Reports and invalidates `x` on
  /// failure; returns whether the assignment was legal.
  pub(crate) fn assignment(&mut self, x: &mut Operand<'tcx, 'ast>, target: Ty<'tcx>, pos: Span, context: &str) -> bool {
    if x.is_invalid() { return false }
    if let Some(xb) = x.typ.basic() {
      if xb.is_untyped() {
        self.convert_untyped(x, target);
        if x.is_invalid() { return false }
      }
    }
    if !self.assignable_to(x, target) {
      self.error(pos, ErrorCode::MismatchedTypes, format!("cannot use value of type {:?} as {:?} {context}", x.typ.basic(), target.basic()));
      x.set_invalid(self.invalid());
      return false;
    }
    true
  }

  /// `recordTypeAndValue` (base §6). Insertion is idempotent: a paren chain
  /// whose inner and outer nodes finalize to the same triple overwrites
  /// with an identical value rather than conflicting (base §5).
  fn record(&mut self, e: &'ast Expr<'ast>, mode: Mode, typ: Ty<'tcx>, val: Const) {
    self.recorded.insert(expr_id(e), TypeAndValue { mode, typ, val });
  }

  // ---- public entry points (base §4.9) ----------------------------------

  /// `expr(x, e)`: requires a single value.
  pub fn expr(&mut self, e: &'ast Expr<'ast>) -> Operand<'tcx, 'ast> {
    let (x, kind) = self.raw_expr(e, None);
    self.single_value(x, kind, e.span)
  }

  /// `multiExpr(x, e)`: permits tuple results (e.g. multi-valued calls).
  pub fn multi_expr(&mut self, e: &'ast Expr<'ast>) -> Operand<'tcx, 'ast> {
    let (x, _kind) = self.raw_expr(e, None);
    if matches!(x.mode, Mode::NoValue | Mode::Builtin | Mode::TypeExpr) {
      self.error(e.span, ErrorCode::NotAnExpr, "used as value");
      return self.invalid_operand();
    }
    x
  }

  /// `exprWithHint(x, e, hint)`: forwards a composite-literal element hint.
  pub fn expr_with_hint(&mut self, e: &'ast Expr<'ast>, hint: Ty<'tcx>) -> Operand<'tcx, 'ast> {
    let (x, kind) = self.raw_expr(e, Some(hint));
    self.single_value(x, kind, e.span)
  }

  /// `exprOrType(x, e)`: accepts a type expression; `novalue` is an error.
  pub fn expr_or_type(&mut self, e: &'ast Expr<'ast>) -> Operand<'tcx, 'ast> {
    let (x, _kind) = self.raw_expr(e, None);
    if x.mode == Mode::NoValue {
      self.error(e.span, ErrorCode::NotAnExpr, "used as value or type");
      return self.invalid_operand();
    }
    x
  }

  /// `singleValue`: reject multi-valued / kindless results at the `expr`
  /// entry point (base §4.9). Public per base §6's export list, so a driver
  /// that calls `raw_expr` directly (e.g. to inspect `CheckedKind` before
  /// deciding arity) can still finish the job `expr` would have done.
  pub fn single_value(&mut self, mut x: Operand<'tcx, 'ast>, kind: CheckedKind, span: Span) -> Operand<'tcx, 'ast> {
    if x.is_invalid() { return x }
    match x.mode {
      Mode::NoValue => {
        self.error(span, ErrorCode::NotAnExpr, "used as value");
        x.set_invalid(self.invalid());
      }
      Mode::Builtin => {
        self.error(span, ErrorCode::UncalledBuiltin, "must be called");
        x.set_invalid(self.invalid());
      }
      Mode::TypeExpr => {
        self.error(span, ErrorCode::BadTypeKeyword, "is not an expression");
        x.set_invalid(self.invalid());
      }
      _ => {
        if is_tuple(x.typ) {
          self.error(span, ErrorCode::TooManyValues, "multiple-value expression used in single-value context");
          x.set_invalid(self.invalid());
        }
      }
    }
    let _ = kind;
    x
  }

  // ---- dispatcher (base §4.9) -------------------------------------------

  /// `rawExpr(x, e, hint)`. Public per base §6's export list: a driver is
  /// free to call this directly when it needs the raw `CheckedKind` (e.g.
  /// to decide whether a bare expression statement is a legal call/receive)
  /// rather than going through one of the arity-checked entry points.
  pub fn raw_expr(&mut self, e: &'ast Expr<'ast>, hint: Option<Ty<'tcx>>) -> (Operand<'tcx, 'ast>, CheckedKind) {
    log::trace!("raw_expr: {:?}", e.span);
    let (mut x, kind) = self.expr_internal(e, hint);
    x.expr = Some(e);
    if x.mode != Mode::Invalid {
      if let Some(basic) = x.typ.basic() {
        if basic.is_untyped() {
          let is_const = x.mode == Mode::Constant;
          self.register_untyped(e, x.mode, x.typ, if is_const { x.val.clone() } else { Const::Unknown }, false);
          return (x, kind);
        }
      }
    }
    if x.mode != Mode::Invalid {
      self.record(e, x.mode, x.typ, if x.mode == Mode::Constant { x.val.clone() } else { Const::Unknown });
    }
    (x, kind)
  }

  /// `exprInternal`: per-AST-node-kind case analysis (base §4.9).
  fn expr_internal(&mut self, e: &'ast Expr<'ast>, hint: Option<Ty<'tcx>>) -> (Operand<'tcx, 'ast>, CheckedKind) {
    match &e.kind {
      ExprKind::Bad => (self.invalid_operand(), CheckedKind::Statement),

      ExprKind::Ident(sym) => (self.check_ident(*sym, e.span), CheckedKind::Expression),

      ExprKind::BasicLit(lit_kind, text) => (self.check_basic_lit(*lit_kind, *text), CheckedKind::Expression),

      ExprKind::FuncLit(body) => {
        let sig = self.eval_type(&body.sig, e.span);
        self.enqueue_later(LaterEntry { body_token: body.body_token, iota: self.cur_iota });
        (Operand { mode: Mode::Value, expr: Some(e), typ: sig, val: Const::Unknown, id: None }, CheckedKind::Expression)
      }

      ExprKind::CompositeLit { typ, elts } => {
        let resolved = match (typ, hint) {
          (Some(te), _) => self.eval_type(te, e.span),
          (None, Some(h)) => h,
          (None, None) => {
            self.error(e.span, ErrorCode::InvalidLit, "missing type in composite literal");
            self.invalid()
          }
        };
        (self.composite_lit(resolved, elts, e.span), CheckedKind::Expression)
      }

      ExprKind::Paren(inner) => {
        let (mut x, kind) = self.raw_expr_for_paren(inner, hint);
        x.expr = Some(e);
        (x, kind)
      }

      ExprKind::Selector(base, sel) => (self.check_selector(base, *sel, e.span), CheckedKind::Expression),

      ExprKind::Index(base, idx) => (self.check_index_expr(base, idx, e.span), CheckedKind::Expression),

      ExprKind::Slice { x, lo, hi, max } => (self.check_slice_expr(x, *lo, *hi, *max, e.span), CheckedKind::Expression),

      ExprKind::TypeAssert(x, te) => (self.check_type_assert(x, te, e.span), CheckedKind::Expression),

      ExprKind::Call { func, args, ellipsis } => (self.check_call(func, args, *ellipsis, e.span), CheckedKind::Expression),

      ExprKind::Star(inner) => (self.check_star(inner, e.span), CheckedKind::Expression),

      ExprKind::Unary(op, inner) => {
        let mut x = self.expr(inner);
        self.unary(&mut x, *op, e.span);
        let kind = if matches!(op, crate::ast::UnaryOp::Recv) { CheckedKind::Statement } else { CheckedKind::Expression };
        (x, kind)
      }

      ExprKind::Binary(op, lhs, rhs) => {
        let x = self.binary(lhs, rhs, *op, e.span, Some(e));
        (x, CheckedKind::Expression)
      }

      ExprKind::KeyValue(_, _) => {
        crate::errors::internal_error!("bare KeyValueExpr reached exprInternal");
      }

      ExprKind::Ellipsis(_) => {
        self.error(e.span, ErrorCode::BadDotDotDotSyntax, "invalid use of ...");
        (self.invalid_operand(), CheckedKind::Statement)
      }

      ExprKind::Type(te) => {
        let ty = self.eval_type(te, e.span);
        (Operand { mode: Mode::TypeExpr, expr: Some(e), typ: ty, val: Const::Unknown, id: None }, CheckedKind::Expression)
      }
    }
  }

  /// ParenExpr is transparent for untyped-registry purposes: re-checking
  /// the inner node through `raw_expr` would register it a second time
  /// under its own identity. Instead we check the inner node's
  /// `exprInternal` directly and let the *caller* (the paren arm above)
  /// register under the paren node's identity, so a chain of parens yields
  /// exactly one registry entry (base §4.8 "ParenExpr: transparent").
  fn raw_expr_for_paren(&mut self, inner: &'ast Expr<'ast>, hint: Option<Ty<'tcx>>) -> (Operand<'tcx, 'ast>, CheckedKind) {
    match &inner.kind {
      ExprKind::Paren(next) => self.raw_expr_for_paren(next, hint),
      _ => self.expr_internal(inner, hint),
    }
  }

  fn check_ident(&mut self, sym: Symbol, span: Span) -> Operand<'tcx, 'ast> {
    match self.resolver.ident(sym) {
      Some(ResolvedIdent::Const(ty, val)) => Operand { mode: Mode::Constant, expr: None, typ: ty, val, id: None },
      Some(ResolvedIdent::Var(ty)) => Operand { mode: Mode::Variable, expr: None, typ: ty, val: Const::Unknown, id: None },
      Some(ResolvedIdent::Value(ty)) => Operand { mode: Mode::Value, expr: None, typ: ty, val: Const::Unknown, id: None },
      Some(ResolvedIdent::Type(ty)) => Operand { mode: Mode::TypeExpr, expr: None, typ: ty, val: Const::Unknown, id: None },
      Some(ResolvedIdent::Builtin(id)) => Operand { mode: Mode::Builtin, expr: None, typ: self.invalid(), val: Const::Unknown, id: Some(id) },
      Some(ResolvedIdent::Package) => {
        self.error(span, ErrorCode::NotAnExpr, "use of package identifier without selector");
        self.invalid_operand()
      }
      None => {
        self.error(span, ErrorCode::NotAnExpr, "undefined identifier");
        self.invalid_operand()
      }
    }
  }

  fn check_basic_lit(&mut self, kind: LitKind, text: Symbol) -> Operand<'tcx, 'ast> {
    let text = self.interner.resolve(text).to_string();
    let (basic, val) = crate::literal::parse(kind, &text);
    Operand { mode: Mode::Constant, expr: None, typ: self.basic(basic), val, id: None }
  }

  fn check_selector(&mut self, base: &'ast Expr<'ast>, sel: Symbol, span: Span) -> Operand<'tcx, 'ast> {
    // A bare package identifier used as the left side of a selector is
    // resolved entirely by the external resolver (base §6 `selector`);
    // anything else is a field/method selection on an already-typed
    // operand, which the composite/type lattice can answer on its own.
    if let ExprKind::Ident(pkg) = base.unparen().kind {
      if matches!(self.resolver.ident(pkg), Some(ResolvedIdent::Package)) {
        return match self.resolver.package_selector(pkg, sel) {
          Some(ResolvedIdent::Const(ty, val)) => Operand { mode: Mode::Constant, expr: None, typ: ty, val, id: None },
          Some(ResolvedIdent::Var(ty)) => Operand { mode: Mode::Variable, expr: None, typ: ty, val: Const::Unknown, id: None },
          Some(ResolvedIdent::Value(ty)) => Operand { mode: Mode::Value, expr: None, typ: ty, val: Const::Unknown, id: None },
          Some(ResolvedIdent::Type(ty)) => Operand { mode: Mode::TypeExpr, expr: None, typ: ty, val: Const::Unknown, id: None },
          _ => {
            self.error(span, ErrorCode::NotAnExpr, "undefined package member");
            self.invalid_operand()
          }
        }
      }
    }
    let x = self.expr(base);
    if x.is_invalid() { return self.invalid_operand() }
    self.select_field_or_method(&x, sel, span)
  }

  /// Enqueue a function-literal body for deferred checking (base §5
  /// "later-queue"); see `checker::later`. Backed by `im::Vector` (SPEC_FULL
  /// §S.6) rather than `std::Vec` so a driver that snapshots a `Checker`
  /// mid-pass (e.g. to retry a speculative branch) can cheaply clone the
  /// queue along with it.
  fn enqueue_later(&mut self, entry: LaterEntry) { self.later.push_back(entry) }

  /// Drain the later-queue in original enqueue order (base §5 "draining
  /// order must match original enqueue order") for the (out-of-scope)
  /// declaration/statement checker to consume.
  pub fn drain_later(&mut self) -> Vec<LaterEntry> {
    let drained: Vec<_> = std::mem::take(&mut self.later).into_iter().collect();
    log::debug!("drain_later: {} entries", drained.len());
    drained
  }

  #[cfg(test)]
  pub(crate) fn enqueue_later_for_test(&mut self, body_token: u32) {
    self.enqueue_later(LaterEntry { body_token, iota: self.cur_iota });
  }

  /// Evaluate a type expression (base §6 "Type-expression evaluator"). This
  /// crate evaluates the structural constructors directly (array/slice/
  /// map/chan/pointer/struct/interface/func), deferring only bare `Name`s
  /// to the out-of-scope resolver.
  fn eval_type(&mut self, te: &TypeExpr<'ast>, span: Span) -> Ty<'tcx> {
    use crate::types::{ArrayLen, ChanDir, Field, Method, TyKind};
    match te {
      TypeExpr::Name(sym) => self.resolver.type_name(*sym).unwrap_or_else(|| {
        self.error(span, ErrorCode::NotAnExpr, "undefined type");
        self.invalid()
      }),
      TypeExpr::Array(None, elem) => {
        let e = self.eval_type(elem, span);
        self.types.alloc(TyKind::Array(ArrayLen::Placeholder, e))
      }
      TypeExpr::Array(Some(len_expr), elem) => {
        let len_op = self.expr(len_expr);
        let e = self.eval_type(elem, span);
        let len = match len_op.val.to_int() {
          Const::Int(i) => u64::try_from(i).unwrap_or(0),
          _ => 0,
        };
        self.types.alloc(TyKind::Array(ArrayLen::Known(len), e))
      }
      TypeExpr::ArrayEllipsis(elem) => {
        let e = self.eval_type(elem, span);
        self.types.alloc(TyKind::Array(ArrayLen::Placeholder, e))
      }
      TypeExpr::Slice(elem) => {
        let e = self.eval_type(elem, span);
        self.types.alloc(TyKind::Slice(e))
      }
      TypeExpr::Pointer(base) => {
        let b = self.eval_type(base, span);
        self.types.alloc(TyKind::Pointer(b))
      }
      TypeExpr::Map(k, v) => {
        let k = self.eval_type(k, span);
        let v = self.eval_type(v, span);
        self.types.alloc(TyKind::Map(k, v))
      }
      TypeExpr::Chan(dir, elem) => {
        let e = self.eval_type(elem, span);
        self.types.alloc(TyKind::Chan(match dir { ChanDir::Send => ChanDir::Send, ChanDir::Recv => ChanDir::Recv, ChanDir::Both => ChanDir::Both }, e))
      }
      TypeExpr::Struct(fields) => {
        let fields = fields.iter().map(|(name, ty)| {
          let ty = self.eval_type(ty, span);
          let name_str = self.interner.resolve(*name);
          let exported = name_str.chars().next().is_some_and(char::is_uppercase);
          Field { name: *name, ty, package: None, exported }
        }).collect();
        self.types.alloc(TyKind::Struct(fields))
      }
      TypeExpr::Interface(names) => {
        let empty = names.is_empty();
        let methods = names.iter().map(|n| Method { name: *n, sig: self.invalid(), pointer_receiver: false }).collect();
        self.types.alloc(TyKind::Interface { methods, empty })
      }
      TypeExpr::Func(params, results, variadic) => {
        let params = params.iter().map(|p| self.eval_type(p, span)).collect();
        let results = results.iter().map(|r| self.eval_type(r, span)).collect();
        self.types.alloc(TyKind::Signature { params, results, variadic: *variadic })
      }
    }
  }
}

use crate::symbol::Symbol;

/// Tuple-ness check used by `single_value` (base §4.9 `singleValue`:
/// "errors on tuple results"). A free function since it only needs the type
/// lattice, not `&self`.
fn is_tuple(t: Ty<'_>) -> bool {
  matches!(t.kind(), crate::types::TyKind::Tuple(elems) if elems.len() > 1)
}
