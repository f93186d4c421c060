//! The type lattice (base §3 "Type lattice"): [`Basic`] plus the composite
//! type constructors. Composite types are arena-allocated, mirroring the
//! teacher's `ty::Ty<'a> = &'a WithMeta<TyKind<'a>>` representation in
//! `mmcc::build_mir::Translator` — a [`Ty`] is a thin `Copy` reference into
//! a [`TypeArena`], so the [`crate::operand::Operand`] that carries it stays
//! small enough to pass by value at every recursion boundary (base §9).

use std::fmt;
use bumpalo::Bump;
use smallvec::SmallVec;
use crate::symbol::Symbol;
use super::basic::BasicKind;

/// Owns every composite [`Ty`] produced during a checking pass. One arena
/// per [`crate::Checker`] (base §5: "Multiple packages type-checked
/// concurrently must use distinct checker instances").
#[derive(Default)]
pub struct TypeArena<'tcx> {
  bump: Bump,
  _marker: std::marker::PhantomData<&'tcx ()>,
}

impl<'tcx> TypeArena<'tcx> {
  #[must_use] pub fn new() -> Self { Self::default() }

  pub fn alloc(&'tcx self, kind: TyKind<'tcx>) -> Ty<'tcx> { Ty(self.bump.alloc(kind)) }

  #[must_use] pub fn basic(&'tcx self, kind: BasicKind) -> Ty<'tcx> { self.alloc(TyKind::Basic(kind)) }
}

/// A reference to an arena-allocated type. `Copy`, so it threads through the
/// recursive checker the same way the teacher's `ty::Ty<'a>` does.
#[derive(Copy, Clone)]
pub struct Ty<'tcx>(&'tcx TyKind<'tcx>);

impl<'tcx> Ty<'tcx> {
  #[must_use] pub fn kind(self) -> &'tcx TyKind<'tcx> { self.0 }

  /// Peel off [`TyKind::Named`] wrappers to get at the structural type
  /// underneath, as used throughout operator/composite checking (base §4.2
  /// "Receive": `x.typ.Underlying()`).
  #[must_use] pub fn underlying(self) -> Ty<'tcx> {
    match *self.0 {
      TyKind::Named(_, ty, _) => ty.underlying(),
      _ => self,
    }
  }

  #[must_use] pub fn basic(self) -> Option<BasicKind> {
    match *self.underlying().0 {
      TyKind::Basic(b) => Some(b),
      _ => None,
    }
  }

  #[must_use] pub fn is_invalid(self) -> bool { self.basic() == Some(BasicKind::Invalid) }
}

impl fmt::Debug for Ty<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Channel direction (base §3 `Chan(dir, elem)`).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ChanDir { Send, Recv, Both }

/// One field of a [`TyKind::Struct`]: name, type, and enough information to
/// judge cross-package positional-literal assignability (base §3 "Fields'
/// exported-ness gates cross-package positional assignment").
#[derive(Clone, Debug)]
pub struct Field<'tcx> {
  pub name: Symbol,
  pub ty: Ty<'tcx>,
  /// The package that declared this field; `None` means "the package
  /// currently being checked". Name resolution across packages is out of
  /// scope (base §1); this is carried only so `exported` can be judged.
  pub package: Option<Symbol>,
  pub exported: bool,
}

/// One method in an [`TyKind::Interface`]'s method set.
#[derive(Clone, Debug)]
pub struct Method<'tcx> {
  pub name: Symbol,
  pub sig: Ty<'tcx>,
  /// `true` if only a pointer-receiver implementation satisfies this
  /// method (base §4.8 TypeAssertExpr: "distinguishing pointer-receiver
  /// mismatch").
  pub pointer_receiver: bool,
}

/// A named struct/interface/etc. carries its own method set in addition to
/// whatever methods its underlying structural type contributes (base §3
/// `Named(type, methods)`).
#[derive(Clone, Debug)]
pub struct NamedInfo<'tcx> {
  pub name: Symbol,
  pub methods: Vec<Method<'tcx>>,
}

/// The full type-constructor lattice (base §3). `Array.len = -1` is
/// represented by `ArrayLen::Placeholder` rather than a raw `-1` sentinel so
/// the invalid state can't silently leak past `TyKind::Array` construction
/// sites without a match arm noticing (base §3 invariant: the placeholder
/// "exists only transiently... it is replaced with the final length before
/// the literal's operand is returned").
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ArrayLen {
  Known(u64),
  /// `[...]T` — length inferred from the composite literal's element count.
  Placeholder,
}

#[derive(Clone, Debug)]
pub enum TyKind<'tcx> {
  Basic(BasicKind),
  Pointer(Ty<'tcx>),
  Slice(Ty<'tcx>),
  Array(ArrayLen, Ty<'tcx>),
  Map(Ty<'tcx>, Ty<'tcx>),
  Chan(ChanDir, Ty<'tcx>),
  Struct(SmallVec<[Field<'tcx>; 4]>),
  /// `empty` is tracked separately from `methods.is_empty()` because the
  /// spec distinguishes "the empty interface" (assignable as the universal
  /// supertype, admits untyped nil in wider contexts, base §4.6
  /// `implicitType`) from "an interface that happens to have no methods
  /// declared but is nominally something else" — in this lattice those
  /// coincide, but the flag documents the distinction made in base §4.6.
  Interface { methods: SmallVec<[Method<'tcx>; 4]>, empty: bool },
  Signature { params: SmallVec<[Ty<'tcx>; 4]>, results: SmallVec<[Ty<'tcx>; 2]>, variadic: bool },
  Named(Box<NamedInfo<'tcx>>, Ty<'tcx>, std::marker::PhantomData<()>),
  Tuple(SmallVec<[Ty<'tcx>; 4]>),
}

/// Structural type identity (base §6 `identical(a, b)`). Composite types are
/// not hash-consed in this arena (unlike a fully interned compiler, the
/// checker's own lifetime is short enough that dedup isn't worth the
/// bookkeeping), so identity is computed recursively rather than by
/// reference equality — the same approach the underlying language's own
/// type-checker takes for structural types, reserving reference/name
/// equality for [`TyKind::Named`].
#[must_use]
pub fn identical<'tcx>(a: Ty<'tcx>, b: Ty<'tcx>) -> bool {
  match (a.kind(), b.kind()) {
    (TyKind::Basic(x), TyKind::Basic(y)) => x == y,
    (TyKind::Pointer(x), TyKind::Pointer(y)) => identical(*x, *y),
    (TyKind::Slice(x), TyKind::Slice(y)) => identical(*x, *y),
    (TyKind::Array(lx, ex), TyKind::Array(ly, ey)) => lx == ly && identical(*ex, *ey),
    (TyKind::Map(kx, vx), TyKind::Map(ky, vy)) => identical(*kx, *ky) && identical(*vx, *vy),
    (TyKind::Chan(dx, ex), TyKind::Chan(dy, ey)) => dx == dy && identical(*ex, *ey),
    (TyKind::Struct(fx), TyKind::Struct(fy)) => {
      fx.len() == fy.len() && fx.iter().zip(fy).all(|(a, b)|
        a.name == b.name && a.package == b.package && identical(a.ty, b.ty))
    }
    (TyKind::Interface { methods: mx, empty: ex }, TyKind::Interface { methods: my, empty: ey }) => {
      ex == ey && mx.len() == my.len() && mx.iter().zip(my).all(|(a, b)|
        a.name == b.name && identical(a.sig, b.sig))
    }
    (TyKind::Signature { params: px, results: rx, variadic: vx },
     TyKind::Signature { params: py, results: ry, variadic: vy }) => {
      vx == vy && px.len() == py.len() && rx.len() == ry.len()
        && px.iter().zip(py).all(|(a, b)| identical(*a, *b))
        && rx.iter().zip(ry).all(|(a, b)| identical(*a, *b))
    }
    (TyKind::Named(nx, _, _), TyKind::Named(ny, _, _)) => nx.name == ny.name,
    (TyKind::Tuple(tx), TyKind::Tuple(ty)) =>
      tx.len() == ty.len() && tx.iter().zip(ty).all(|(a, b)| identical(*a, *b)),
    _ => false,
  }
}

/// Whether `t`'s underlying type admits the predeclared `nil` value
/// (base §6 `hasNil`; used by equality-comparability and by
/// `implicitType`'s untyped-nil case).
#[must_use]
pub fn has_nil(t: Ty<'_>) -> bool {
  matches!(t.underlying().kind(),
    TyKind::Pointer(_) | TyKind::Slice(_) | TyKind::Map(_, _) | TyKind::Chan(_, _)
      | TyKind::Interface { .. } | TyKind::Signature { .. })
    || t.basic() == Some(BasicKind::UnsafePointer)
}

/// Structural comparability (base §6 `Comparable`; base §4.5 "both sides
/// must be *comparable* types"). Slices, maps and funcs are famously
/// incomparable; everything else, including structs and arrays, is
/// comparable iff every component is.
#[must_use]
pub fn comparable(t: Ty<'_>) -> bool {
  match t.underlying().kind() {
    TyKind::Slice(_) | TyKind::Map(_, _) | TyKind::Signature { .. } => false,
    // untyped nil has no structural type of its own; `nil == nil` is
    // rejected (base §8 scenario 10) and only reachable through the
    // has-nil pairing, never through both sides being comparable.
    TyKind::Basic(BasicKind::UntypedNil) => false,
    TyKind::Struct(fields) => fields.iter().all(|f| comparable(f.ty)),
    TyKind::Array(_, elem) => comparable(*elem),
    _ => true,
  }
}
