//! The type lattice (base spec §3): predeclared [`basic::Basic`] atoms and
//! the composite constructors in [`ty`].

pub mod basic;
pub mod ty;

pub use basic::{BasicKind, Flags, Sizing};
pub use ty::{ArrayLen, ChanDir, Field, Method, NamedInfo, Ty, TyKind, TypeArena, comparable, has_nil, identical};
