//! Diagnostics are accumulated, not thrown. Every detection site in this
//! crate sets an [`crate::operand::Operand`] to `Mode::Invalid` and emits
//! exactly one [`Diagnostic`] through a [`Reporter`].

use std::fmt;
use derive_more::Display;
use crate::span::Span;

/// Every error code enumerated in base §6, unchanged. `derive_more::Display`
/// (the stack `FuelLabs-fuel-vm/fuel-tx` uses for its own error enum) gives
/// each a human-readable name without a hand-written match.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
pub enum ErrorCode {
  #[display("operator not defined for operand")]
  UndefinedOp,
  #[display("invalid constant value")]
  InvalidConstVal,
  #[display("cannot take address of operand")]
  UnaddressableOperand,
  #[display("invalid receive operand")]
  InvalidReceive,
  #[display("invalid shift operand")]
  InvalidShiftOperand,
  #[display("invalid shift count")]
  InvalidShiftCount,
  #[display("invalid untyped conversion")]
  InvalidUntypedConversion,
  #[display("mismatched types")]
  MismatchedTypes,
  #[display("division by zero")]
  DivByZero,
  #[display("float truncated to integer")]
  TruncatedFloat,
  #[display("constant overflows type")]
  NumericOverflow,
  #[display("invalid use of ...")]
  BadDotDotDotSyntax,
  #[display("untyped literal")]
  UntypedLit,
  #[display("mixed keyed and unkeyed struct literal")]
  MixedStructLit,
  #[display("invalid field in struct literal")]
  InvalidLitField,
  #[display("missing field in struct literal")]
  MissingLitField,
  #[display("duplicate field in struct literal")]
  DuplicateLitField,
  #[display("invalid struct literal")]
  InvalidStructLit,
  #[display("unexported field in cross-package struct literal")]
  UnexportedLitField,
  #[display("invalid recursive type")]
  InvalidTypeCycle,
  #[display("missing key in composite literal")]
  MissingLitKey,
  #[display("duplicate key in composite literal")]
  DuplicateLitKey,
  #[display("invalid composite literal")]
  InvalidLit,
  #[display("cannot index operand")]
  NonIndexableOperand,
  #[display("cannot slice operand")]
  NonSliceableOperand,
  #[display("invalid slice expression")]
  InvalidSliceExpr,
  #[display("swapped slice indices")]
  SwappedSliceIndices,
  #[display("type used as expression")]
  BadTypeKeyword,
  #[display("invalid type assertion")]
  InvalidAssert,
  #[display("impossible type assertion")]
  ImpossibleAssert,
  #[display("invalid indirection")]
  InvalidIndirection,
  #[display("index out of bounds")]
  InvalidIndex,
  #[display("invalid index in composite literal")]
  InvalidLitIndex,
  #[display("array literal index out of bounds")]
  OversizeArrayLit,
  #[display("too many values")]
  TooManyValues,
  #[display("builtin must be called")]
  UncalledBuiltin,
  #[display("not an expression")]
  NotAnExpr,
}

/// One reported problem: where, what kind, and the formatted message.
#[derive(Clone, Debug)]
pub struct Diagnostic {
  pub span: Span,
  pub code: ErrorCode,
  pub message: String,
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}: {} ({})", self.span, self.message, self.code)
  }
}

/// The embedding driver's diagnostic sink (base §6 "Error reporter"). Object
/// safe so a [`crate::Checker`] can be generic over it or box it.
pub trait Reporter {
  fn report(&mut self, diag: Diagnostic);

  /// Convenience used throughout the checker: build and report in one call.
  fn error(&mut self, span: Span, code: ErrorCode, message: impl Into<String>) {
    self.report(Diagnostic { span, code, message: message.into() });
  }
}

/// A `Vec`-backed [`Reporter`] for tests and for drivers that want to defer
/// presentation (SPEC_FULL §S.3: "a minimal, concrete default alongside a
/// trait boundary").
#[derive(Default, Debug)]
pub struct RecordingReporter {
  pub diagnostics: Vec<Diagnostic>,
}

impl RecordingReporter {
  #[must_use] pub fn new() -> Self { Self::default() }
  #[must_use] pub fn codes(&self) -> Vec<ErrorCode> { self.diagnostics.iter().map(|d| d.code).collect() }
  #[must_use] pub fn has(&self, code: ErrorCode) -> bool { self.diagnostics.iter().any(|d| d.code == code) }
}

impl Reporter for RecordingReporter {
  fn report(&mut self, diag: Diagnostic) { self.diagnostics.push(diag) }
}

/// Base §7 class 3: "unreachable invariants... indicate a bug in the
/// checker itself", reported via an assertion facility rather than the
/// ordinary diagnostic path. Mirrors the teacher's own
/// `ty::TyKind::Error => panic!("unreachable: {self:?}")` idiom in
/// `build_mir.rs`.
macro_rules! internal_error {
  ($($arg:tt)*) => {
    panic!("checker internal error: {}", format_args!($($arg)*))
  };
}
pub(crate) use internal_error;
