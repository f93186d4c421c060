// Shared scaffolding for the integration tests in this directory: a tiny
// fixed "universe" of basic types/identifiers good enough to drive the
// checker end to end without a real parser or symbol table (base §1 places
// both out of scope).
#![allow(dead_code)]

use typeck::ast::{AstArena, Expr, ExprKind, LitKind, TypeExpr};
use typeck::resolve::{ResolvedIdent, Scope};
use typeck::span::Span;
use typeck::symbol::{Interner, Symbol};
use typeck::types::{BasicKind, Ty, TypeArena};
use typeck::{Checker, Const, RecordingReporter};

/// Interns the handful of type/identifier names these tests reference.
/// Deliberately separate from a [`Checker`]'s own (literal-text) interner —
/// name resolution goes through [`typeck::resolve::Resolver`], which only
/// needs symbols to compare equal to each other, never to a `Checker`'s
/// internal string table.
pub struct Names {
  pub interner: Interner,
}

impl Names {
  pub fn new() -> Self { Names { interner: Interner::new() } }
  pub fn sym(&mut self, s: &str) -> Symbol { self.interner.intern(s) }
}

pub fn basic_scope<'tcx>(types: &'tcx TypeArena<'tcx>, names: &mut Names) -> Scope<'tcx> {
  let mut scope = Scope::new();
  for (name, kind) in [
    ("int", BasicKind::Int), ("int8", BasicKind::Int8), ("int16", BasicKind::Int16),
    ("int32", BasicKind::Int32), ("int64", BasicKind::Int64),
    ("uint", BasicKind::Uint), ("uint8", BasicKind::Uint8),
    ("float64", BasicKind::Float64), ("string", BasicKind::String), ("bool", BasicKind::Bool),
  ] {
    let sym = names.sym(name);
    scope.define_type(sym, types.basic(kind));
  }
  let nil_sym = names.sym("nil");
  scope.define(nil_sym, ResolvedIdent::Value(types.basic(BasicKind::UntypedNil)));
  scope
}

pub type TestChecker<'tcx, 'ast> = Checker<'tcx, 'ast, RecordingReporter, Scope<'tcx>>;

pub fn new_checker<'tcx, 'ast>(types: &'tcx TypeArena<'tcx>, resolver: Scope<'tcx>) -> TestChecker<'tcx, 'ast> {
  let _ = env_logger::try_init();
  Checker::new(types, typeck::Sizing::LP64, RecordingReporter::new(), resolver)
}

pub const DUMMY: Span = Span::DUMMY;

pub fn int_lit<'tcx, 'ast>(arena: &'ast AstArena<'ast>, checker: &mut TestChecker<'tcx, 'ast>, text: &str) -> &'ast Expr<'ast> {
  let sym = checker.interner.intern(text);
  arena.alloc(DUMMY, ExprKind::BasicLit(LitKind::Int, sym))
}

pub fn float_lit<'tcx, 'ast>(arena: &'ast AstArena<'ast>, checker: &mut TestChecker<'tcx, 'ast>, text: &str) -> &'ast Expr<'ast> {
  let sym = checker.interner.intern(text);
  arena.alloc(DUMMY, ExprKind::BasicLit(LitKind::Float, sym))
}

pub fn ident<'ast>(arena: &'ast AstArena<'ast>, sym: Symbol) -> &'ast Expr<'ast> {
  arena.alloc(DUMMY, ExprKind::Ident(sym))
}

pub fn binary<'ast>(arena: &'ast AstArena<'ast>, op: typeck::ast::BinaryOp, lhs: &'ast Expr<'ast>, rhs: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
  arena.alloc(DUMMY, ExprKind::Binary(op, lhs, rhs))
}

pub fn unary<'ast>(arena: &'ast AstArena<'ast>, op: typeck::ast::UnaryOp, x: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
  arena.alloc(DUMMY, ExprKind::Unary(op, x))
}

pub fn call<'ast>(arena: &'ast AstArena<'ast>, func: &'ast Expr<'ast>, args: Vec<&'ast Expr<'ast>>) -> &'ast Expr<'ast> {
  arena.alloc(DUMMY, ExprKind::Call { func, args, ellipsis: false })
}

pub fn call_ellipsis<'ast>(arena: &'ast AstArena<'ast>, func: &'ast Expr<'ast>, args: Vec<&'ast Expr<'ast>>) -> &'ast Expr<'ast> {
  arena.alloc(DUMMY, ExprKind::Call { func, args, ellipsis: true })
}

pub fn type_name<'ast>(sym: Symbol) -> TypeExpr<'ast> { TypeExpr::Name(sym) }

pub fn composite_lit<'ast>(arena: &'ast AstArena<'ast>, typ: Option<TypeExpr<'ast>>, elts: Vec<typeck::ast::Elt<'ast>>) -> &'ast Expr<'ast> {
  arena.alloc(DUMMY, ExprKind::CompositeLit { typ: typ.map(Box::new), elts })
}

pub fn elt<'ast>(key: Option<&'ast Expr<'ast>>, value: &'ast Expr<'ast>) -> typeck::ast::Elt<'ast> {
  typeck::ast::Elt { key, value }
}

/// Build the unused-before-now "unconverted" constant `val` directly, for
/// tests that want to assert against a specific [`Const`] without going
/// through literal parsing.
pub fn const_int(i: i64) -> Const { Const::make_int64(i) }
