//! The later-queue (base §5 "Deferred function-literal checking": a
//! `FuncLit` is assigned its `Signature` type immediately, but its body is
//! checked only once the enclosing declaration's scope is fully settled).
//! Body/statement checking itself is out of scope (base §1); this module
//! only owns the queue a driver drains afterwards.

/// One entry in the later-queue: the opaque body token plus the `iota`
/// value captured at the point the literal was encountered (base §5
/// "capture the enclosing declaration context and iota value at enqueue
/// time").
#[derive(Copy, Clone, Debug)]
pub struct LaterEntry {
  pub body_token: u32,
  pub iota: i64,
}

#[cfg(test)]
mod tests {
  use crate::checker::Checker;
  use crate::errors::RecordingReporter;
  use crate::resolve::Scope;
  use crate::types::{Sizing, TypeArena};

  #[test]
  fn drain_preserves_enqueue_order() {
    let arena = TypeArena::new();
    let mut checker = Checker::new(&arena, Sizing::LP64, RecordingReporter::new(), Scope::new());
    checker.set_iota(3);
    checker.enqueue_later_for_test(1);
    checker.set_iota(7);
    checker.enqueue_later_for_test(2);
    let drained = checker.drain_later();
    assert_eq!(drained.len(), 2);
    assert_eq!((drained[0].body_token, drained[0].iota), (1, 3));
    assert_eq!((drained[1].body_token, drained[1].iota), (2, 7));
  }
}
