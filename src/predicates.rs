//! Type predicates (base §2 "Predicates & constant arithmetic (external)").
//!
//! Base spec lists these as an external collaborator with an assumed
//! contract; this crate reifies them as one-flag-check functions over
//! [`BasicKind::flags`] (SPEC_FULL, grounded on the teacher's `bitflags`
//! idiom in `types/basic.rs`).

use crate::types::{BasicKind, Flags, Ty};

fn flags(t: Ty<'_>) -> Option<Flags> { t.basic().map(BasicKind::flags) }

#[must_use] pub fn is_boolean(t: Ty<'_>) -> bool { flags(t).is_some_and(|f| f.contains(Flags::BOOLEAN)) }
#[must_use] pub fn is_integer(t: Ty<'_>) -> bool { flags(t).is_some_and(|f| f.contains(Flags::INTEGER)) }
#[must_use] pub fn is_unsigned(t: Ty<'_>) -> bool { flags(t).is_some_and(|f| f.contains(Flags::UNSIGNED)) }
#[must_use] pub fn is_float(t: Ty<'_>) -> bool { flags(t).is_some_and(|f| f.contains(Flags::FLOAT)) }
#[must_use] pub fn is_complex(t: Ty<'_>) -> bool { flags(t).is_some_and(|f| f.contains(Flags::COMPLEX)) }
#[must_use] pub fn is_numeric(t: Ty<'_>) -> bool { flags(t).is_some_and(|f| f.intersects(Flags::NUMERIC)) }
#[must_use] pub fn is_string(t: Ty<'_>) -> bool { flags(t).is_some_and(|f| f.contains(Flags::STRING)) }
#[must_use] pub fn is_ordered(t: Ty<'_>) -> bool { flags(t).is_some_and(|f| f.intersects(Flags::ORDERED)) }
#[must_use] pub fn is_untyped(t: Ty<'_>) -> bool { flags(t).is_some_and(|f| f.contains(Flags::UNTYPED)) }
#[must_use] pub fn is_typed(t: Ty<'_>) -> bool { !is_untyped(t) }

/// `hasNil` lives on `Ty` directly (`types::has_nil`) since it also needs to
/// see non-`Basic` kinds (pointer/slice/map/chan/interface/func); re-exported
/// here so callers can reach every predicate from one module.
pub use crate::types::has_nil;
/// Likewise for `Comparable` (base §6), which recurses into struct/array
/// element types.
pub use crate::types::comparable as is_comparable;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{BasicKind, TypeArena};

  #[test]
  fn numeric_covers_int_float_complex() {
    let arena = TypeArena::new();
    for k in [BasicKind::Int, BasicKind::Float64, BasicKind::Complex128, BasicKind::UntypedInt] {
      assert!(is_numeric(arena.basic(k)));
    }
    assert!(!is_numeric(arena.basic(BasicKind::String)));
    assert!(!is_numeric(arena.basic(BasicKind::Bool)));
  }

  #[test]
  fn ordered_is_numeric_or_string() {
    let arena = TypeArena::new();
    assert!(is_ordered(arena.basic(BasicKind::String)));
    assert!(is_ordered(arena.basic(BasicKind::Int)));
    assert!(!is_ordered(arena.basic(BasicKind::Bool)));
  }

  #[test]
  fn untyped_typed_partition() {
    let arena = TypeArena::new();
    let u = arena.basic(BasicKind::UntypedInt);
    let t = arena.basic(BasicKind::Int);
    assert!(is_untyped(u) && !is_typed(u));
    assert!(is_typed(t) && !is_untyped(t));
  }
}
