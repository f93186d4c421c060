//! Name resolution (base §1: "name resolution (identifier lookup, selector
//! resolution)... assumed available"; base §6 "Selector / identifier
//! resolvers — implement `selector`, `ident`, `call`"). Struct-field and
//! named-type method lookup are handled directly by this crate (the type
//! lattice already carries field/method lists, base §3), so the only
//! genuinely external surface left is: what a bare identifier or a
//! package-qualified selector denotes. [`Resolver`] reifies exactly that
//! boundary; [`Scope`] is a minimal concrete implementation for tests and
//! small embeddings, grounded on the teacher's own `Entity`/symbol-table
//! split (`mmcc::types::entity::Entity` carries a resolved declaration's
//! kind much the way [`ResolvedIdent`] does here).

use hashbrown::HashMap;
use crate::konst::Const;
use crate::operand::BuiltinId;
use crate::symbol::Symbol;
use crate::types::Ty;

/// What a bare `Ident` or `pkg.Name` selector resolves to, prior to being
/// folded into an [`crate::operand::Operand`] by the checker.
#[derive(Clone)]
pub enum ResolvedIdent<'tcx> {
  Const(Ty<'tcx>, Const),
  /// An addressable local/global variable.
  Var(Ty<'tcx>),
  /// A non-addressable value (e.g. a function identifier).
  Value(Ty<'tcx>),
  /// The identifier denotes a type, not a value (`mode = typexpr`).
  Type(Ty<'tcx>),
  Builtin(BuiltinId),
  /// A package identifier; only valid as the base of a `SelectorExpr`.
  Package,
}

/// The out-of-scope name-resolution collaborator, reified as a trait so
/// this crate can be exercised without a real parser/symbol table attached.
pub trait Resolver<'tcx> {
  fn ident(&mut self, sym: Symbol) -> Option<ResolvedIdent<'tcx>>;
  fn package_selector(&mut self, pkg: Symbol, sel: Symbol) -> Option<ResolvedIdent<'tcx>>;
  /// Resolve a bare type name (`int`, `MyStruct`, …) to a [`Ty`]. Backs
  /// `TypeExpr::Name` in the internal type-expression evaluator
  /// (`checker::eval_type`).
  fn type_name(&self, sym: Symbol) -> Option<Ty<'tcx>>;
}

/// A minimal, concrete [`Resolver`]: a flat symbol table plus a type-name
/// table. Good enough for tests and single-file embeddings; a real driver
/// plugs in its own scope-aware resolver.
#[derive(Default)]
pub struct Scope<'tcx> {
  idents: HashMap<Symbol, ResolvedIdent<'tcx>>,
  types: HashMap<Symbol, Ty<'tcx>>,
  packages: HashMap<Symbol, HashMap<Symbol, ResolvedIdent<'tcx>>>,
}

impl<'tcx> Scope<'tcx> {
  #[must_use] pub fn new() -> Self { Self::default() }

  pub fn define(&mut self, sym: Symbol, ident: ResolvedIdent<'tcx>) { self.idents.insert(sym, ident); }
  pub fn define_type(&mut self, sym: Symbol, ty: Ty<'tcx>) { self.types.insert(sym, ty); }
  pub fn define_package(&mut self, pkg: Symbol, sym: Symbol, ident: ResolvedIdent<'tcx>) {
    self.packages.entry(pkg).or_default().insert(sym, ident);
  }
}

impl<'tcx> Resolver<'tcx> for Scope<'tcx> {
  fn ident(&mut self, sym: Symbol) -> Option<ResolvedIdent<'tcx>> { self.idents.get(&sym).cloned() }

  fn package_selector(&mut self, pkg: Symbol, sel: Symbol) -> Option<ResolvedIdent<'tcx>> {
    self.packages.get(&pkg)?.get(&sel).cloned()
  }

  fn type_name(&self, sym: Symbol) -> Option<Ty<'tcx>> { self.types.get(&sym).copied() }
}
