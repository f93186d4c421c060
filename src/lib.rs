//! Expression type-checker for a structurally-typed, C-family language
//! with first-class functions, structs, arrays/slices/maps/channels,
//! pointers, interfaces, and an untyped-constant subsystem backed by
//! arbitrary-precision constant folding.
//!
//! The crate is split the way the teacher splits a large multi-phase
//! translation pass over one owning type: [`checker::Checker`] holds all
//! mutable state (base §5 "the checker instance owns all mutable state")
//! and its behaviour is spread across submodules by concern rather than by
//! AST shape. Lexing, parsing, statement/declaration checking, and name
//! resolution beyond "what does this identifier/selector denote" are
//! explicitly out of scope (base §1) and left to an embedding driver
//! through the [`resolve::Resolver`] and [`errors::Reporter`] traits.

pub mod ast;
pub mod checker;
pub mod errors;
pub mod konst;
pub mod literal;
pub mod operand;
pub mod predicates;
pub mod representability;
pub mod resolve;
pub mod span;
pub mod symbol;
pub mod types;

pub use checker::{CheckedKind, Checker, LaterEntry, TypeAndValue, UntypedRecord};
pub use errors::{Diagnostic, ErrorCode, Reporter, RecordingReporter};
pub use konst::Const;
pub use operand::{BuiltinId, KeyVal, Mode, Operand};
pub use resolve::{ResolvedIdent, Resolver, Scope};
pub use span::{Pos, Span};
pub use types::{BasicKind, Sizing, Ty, TypeArena};
