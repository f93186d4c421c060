//! A minimal reified AST. The lexer and parser live outside this crate, so
//! this module only gives the node kinds the checker actually dispatches on
//! concrete, arena-allocated bodies — enough for the crate to compile and be
//! exercised standalone (`hir`/`mir` trees living in a `typed_arena`-style
//! allocator rather than behind `Box`/`Rc` is the same shape used
//! throughout the surrounding compiler).
//!
//! An `&'ast Expr<'ast>` reference doubles as the untyped-expression
//! registry's identity key: a stable expression identity is all the
//! registry needs, and an arena pointer gives that for free.

use std::cell::Cell;
use typed_arena::Arena;
use crate::span::Span;
use crate::symbol::Symbol;

/// Owns every [`Expr`] node produced while building a tree to feed the
/// checker. One arena per syntax tree (not per [`crate::Checker`] instance —
/// the checker only ever borrows trees built elsewhere, read-only).
#[derive(Default)]
pub struct AstArena<'ast> {
  exprs: Arena<Expr<'ast>>,
}

impl<'ast> AstArena<'ast> {
  #[must_use] pub fn new() -> Self { Self::default() }

  pub fn alloc(&'ast self, span: Span, kind: ExprKind<'ast>) -> &'ast Expr<'ast> {
    self.exprs.alloc(Expr { span, kind, paren_of: Cell::new(None) })
  }
}

/// Literal payload kinds: int, float, imaginary, char, string.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LitKind { Int, Float, Imag, Char, String }

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UnaryOp { Add, Sub, Xor, Not, And, Recv }

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BinaryOp {
  Add, Sub, Mul, Quo, Rem,
  And, Or, Xor, AndNot,
  Shl, Shr,
  LAnd, LOr,
  Eq, Ne, Lt, Le, Gt, Ge,
}

impl BinaryOp {
  #[must_use] pub fn is_shift(self) -> bool { matches!(self, BinaryOp::Shl | BinaryOp::Shr) }
  #[must_use] pub fn is_comparison(self) -> bool {
    matches!(self, BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
  }
}

/// One element of a [`ExprKind::CompositeLit`]: either `value` alone
/// (positional) or `key: value`.
#[derive(Clone, Debug)]
pub struct Elt<'ast> {
  pub key: Option<&'ast Expr<'ast>>,
  pub value: &'ast Expr<'ast>,
}

/// A type-expression AST, kept separate from [`ExprKind`] since the
/// composite type constructors (struct/array/map/chan/func/interface) are
/// what a `typ()` evaluation consumes, not expression-checking per se.
/// `expr_or_type` is the bridge: some [`ExprKind`] variants (`Ident`,
/// `StarExpr` over a type, `ArrayType`…) can denote either an expression or
/// a type depending on context.
#[derive(Clone, Debug)]
pub enum TypeExpr<'ast> {
  /// A named type, resolved by the out-of-scope identifier/selector
  /// resolver.
  Name(Symbol),
  Array(Option<&'ast Expr<'ast>>, &'ast TypeExpr<'ast>),
  /// `[...]T`.
  ArrayEllipsis(&'ast TypeExpr<'ast>),
  Slice(&'ast TypeExpr<'ast>),
  Pointer(&'ast TypeExpr<'ast>),
  Map(&'ast TypeExpr<'ast>, &'ast TypeExpr<'ast>),
  Chan(crate::types::ChanDir, &'ast TypeExpr<'ast>),
  Struct(Vec<(Symbol, TypeExpr<'ast>)>),
  Interface(Vec<Symbol>),
  Func(Vec<TypeExpr<'ast>>, Vec<TypeExpr<'ast>>, bool),
}

/// A function literal body, for the later-queue. The body itself
/// (statements) is out of scope for this crate; only its existence and
/// captured params matter to the expression checker, which assigns the
/// literal a `Signature` type and enqueues the (out-of-scope) body check.
#[derive(Clone, Debug)]
pub struct FuncLitBody<'ast> {
  pub sig: TypeExpr<'ast>,
  /// Opaque token standing in for the statement list; statement checking
  /// is out of scope here, so the later-queue only needs something to
  /// carry through to the (external) drainer.
  pub body_token: u32,
}

#[derive(Clone, Debug)]
pub enum ExprKind<'ast> {
  Bad,
  Ident(Symbol),
  BasicLit(LitKind, Symbol),
  FuncLit(Box<FuncLitBody<'ast>>),
  CompositeLit { typ: Option<Box<TypeExpr<'ast>>>, elts: Vec<Elt<'ast>> },
  Paren(&'ast Expr<'ast>),
  Selector(&'ast Expr<'ast>, Symbol),
  Index(&'ast Expr<'ast>, &'ast Expr<'ast>),
  Slice { x: &'ast Expr<'ast>, lo: Option<&'ast Expr<'ast>>, hi: Option<&'ast Expr<'ast>>, max: Option<&'ast Expr<'ast>> },
  TypeAssert(&'ast Expr<'ast>, Box<TypeExpr<'ast>>),
  Call { func: &'ast Expr<'ast>, args: Vec<&'ast Expr<'ast>>, ellipsis: bool },
  Star(&'ast Expr<'ast>),
  Unary(UnaryOp, &'ast Expr<'ast>),
  Binary(BinaryOp, &'ast Expr<'ast>, &'ast Expr<'ast>),
  KeyValue(&'ast Expr<'ast>, &'ast Expr<'ast>),
  Ellipsis(Option<&'ast Expr<'ast>>),
  Type(TypeExpr<'ast>),
}

/// An AST expression node. `paren_of` records, for a node reached by
/// stripping parens, the outermost paren wrapper that named it. Paren
/// transparency — finalization targets the paren node, not the inner one —
/// is instead implemented by having [`crate::checker::Checker`] track the
/// *current* key explicitly, so this field is informational only.
pub struct Expr<'ast> {
  pub span: Span,
  pub kind: ExprKind<'ast>,
  paren_of: Cell<Option<&'ast Expr<'ast>>>,
}

impl<'ast> Expr<'ast> {
  /// Strip `ParenExpr` wrappers, returning the innermost non-paren node.
  #[must_use] pub fn unparen(&'ast self) -> &'ast Expr<'ast> {
    let mut e = self;
    while let ExprKind::Paren(inner) = &e.kind { e = inner }
    e
  }
}

impl std::fmt::Debug for Expr<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Expr").field("span", &self.span).field("kind", &self.kind).finish()
  }
}

/// The stable identity key for the untyped-expression registry. A raw
/// pointer is sound here because every [`Expr`] is arena-owned for the
/// lifetime of the checking pass that references it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ExprId(pub(crate) usize);

#[must_use] pub fn expr_id(e: &Expr<'_>) -> ExprId { ExprId(std::ptr::from_ref(e) as usize) }
