//! Composite literal elaboration (base §4.7): struct/array/slice/map
//! literals, the `index`/`indexedElts` helpers they (and `index.rs`'s
//! `IndexExpr`/`SliceExpr` checking) share, and the fallback path for any
//! other resolved type.

use hashbrown::{HashMap, HashSet};
use crate::ast::Elt;
use crate::errors::{ErrorCode, Reporter};
use crate::konst::Const;
use crate::operand::{key_val, KeyVal, Mode, Operand};
use crate::resolve::Resolver;
use crate::span::Span;
use crate::types::{identical, ArrayLen, Field, Ty, TyKind};
use super::Checker;

impl<'tcx, 'ast, R: Reporter, N: Resolver<'tcx>> Checker<'tcx, 'ast, R, N> {
  /// `exprInternal`'s `CompositeLit` arm (base §4.7), dispatching on the
  /// resolved type's underlying kind.
  pub(super) fn composite_lit(&mut self, typ: Ty<'tcx>, elts: &'ast [Elt<'ast>], span: Span) -> Operand<'tcx, 'ast> {
    if typ.is_invalid() {
      for elt in elts { self.use_elt(elt) }
      return self.invalid_operand();
    }
    match typ.underlying().kind() {
      TyKind::Struct(fields) => self.struct_lit(typ, fields, elts, span),
      TyKind::Array(ArrayLen::Known(n), elem) => {
        let (n, elem) = (*n, *elem);
        self.indexed_elts(elts, elem, Some(n), span, ErrorCode::OversizeArrayLit);
        Operand { mode: Mode::Value, expr: None, typ, val: Const::Unknown, id: None }
      }
      TyKind::Array(ArrayLen::Placeholder, elem) => {
        let elem = *elem;
        let max = self.indexed_elts(elts, elem, None, span, ErrorCode::OversizeArrayLit);
        let typ = self.types.alloc(TyKind::Array(ArrayLen::Known(max), elem));
        Operand { mode: Mode::Value, expr: None, typ, val: Const::Unknown, id: None }
      }
      TyKind::Slice(elem) => {
        let elem = *elem;
        self.indexed_elts(elts, elem, None, span, ErrorCode::OversizeArrayLit);
        Operand { mode: Mode::Value, expr: None, typ, val: Const::Unknown, id: None }
      }
      TyKind::Map(key, elem) => {
        let (key, elem) = (*key, *elem);
        self.map_lit(typ, key, elem, elts, span)
      }
      _ => self.fallback_lit(typ, elts, span),
    }
  }

  /// Still type-check an element's value (for "use", base §4.7 "Fallback")
  /// without committing to any particular literal shape.
  fn use_elt(&mut self, elt: &'ast Elt<'ast>) { self.expr(elt.value); }

  /// Struct literal (base §4.7 "Struct"): all-keyed, all-positional, or a
  /// per-element `MixedStructLit` error when the forms are mixed.
  fn struct_lit(&mut self, typ: Ty<'tcx>, fields: &[Field<'tcx>], elts: &'ast [Elt<'ast>], span: Span) -> Operand<'tcx, 'ast> {
    if elts.is_empty() { return Operand { mode: Mode::Value, expr: None, typ, val: Const::Unknown, id: None } }

    let keyed = elts[0].key.is_some();
    if keyed {
      let mut seen = HashSet::new();
      for elt in elts {
        let Some(key) = elt.key else {
          self.error(elt.value.span, ErrorCode::MixedStructLit, "mixing keyed and unkeyed values in struct literal");
          self.use_elt(elt);
          continue;
        };
        let crate::ast::ExprKind::Ident(name) = key.unparen().kind else {
          self.error(key.span, ErrorCode::InvalidLitField, "field name in struct literal must be an identifier");
          self.use_elt(elt);
          continue;
        };
        let Some(field) = fields.iter().find(|f| f.name == name) else {
          self.error(key.span, ErrorCode::InvalidLitField, "unknown field in struct literal");
          self.use_elt(elt);
          continue;
        };
        if !seen.insert(name) {
          self.error(key.span, ErrorCode::DuplicateLitField, "duplicate field name in struct literal");
        }
        if field.package.is_some() && !field.exported {
          self.error(key.span, ErrorCode::UnexportedLitField, "cannot refer to unexported field of struct declared in another package");
          self.use_elt(elt);
          continue;
        }
        let mut v = self.expr_with_hint(elt.value, field.ty);
        self.assignment(&mut v, field.ty, elt.value.span, "in struct literal");
      }
    } else {
      if elts.len() > fields.len() {
        self.error(span, ErrorCode::InvalidStructLit, "too many values in struct literal");
      } else if elts.len() < fields.len() {
        self.error(span, ErrorCode::MissingLitField, format!("too few values in struct literal ({} of {})", elts.len(), fields.len()));
      }
      for (i, elt) in elts.iter().enumerate() {
        if elt.key.is_some() {
          self.error(elt.value.span, ErrorCode::MixedStructLit, "mixing keyed and unkeyed values in struct literal");
          self.use_elt(elt);
          continue;
        }
        let Some(field) = fields.get(i) else {
          // base §4.7 "count ≤ len(fields)" violation already reported above;
          // still check the value for its own sake.
          self.use_elt(elt);
          continue;
        };
        if field.package.is_some() && !field.exported {
          self.error(elt.value.span, ErrorCode::UnexportedLitField, "cannot refer to unexported field of struct declared in another package");
          self.use_elt(elt);
          continue;
        }
        let mut v = self.expr_with_hint(elt.value, field.ty);
        self.assignment(&mut v, field.ty, elt.value.span, "in struct literal");
      }
    }
    Operand { mode: Mode::Value, expr: None, typ, val: Const::Unknown, id: None }
  }

  /// Map literal (base §4.7 "Map"): every element must be `key: value`;
  /// duplicate detection hashes `keyVal(constKey)`, additionally comparing
  /// dynamic types when the map's key type is an interface.
  fn map_lit(&mut self, typ: Ty<'tcx>, key_ty: Ty<'tcx>, elem_ty: Ty<'tcx>, elts: &'ast [Elt<'ast>], span: Span) -> Operand<'tcx, 'ast> {
    let key_is_interface = matches!(key_ty.underlying().kind(), TyKind::Interface { .. });
    let mut seen: HashMap<KeyVal, Vec<Ty<'tcx>>> = HashMap::new();
    let _ = span;
    for elt in elts {
      let Some(key) = elt.key else {
        self.error(elt.value.span, ErrorCode::MissingLitKey, "missing key in map literal");
        self.use_elt(elt);
        continue;
      };
      let mut k = self.expr_with_hint(key, key_ty);
      self.assignment(&mut k, key_ty, key.span, "as map key");
      if !k.is_invalid() && k.mode == Mode::Constant {
        let kv = key_val(&k.val);
        let dyn_ty = k.typ;
        let entry = seen.entry(kv).or_default();
        let dup = if key_is_interface { entry.iter().any(|t| identical(*t, dyn_ty)) } else { !entry.is_empty() };
        if dup {
          self.error(key.span, ErrorCode::DuplicateLitKey, "duplicate key in map literal");
        } else {
          entry.push(dyn_ty);
        }
      }
      let mut v = self.expr_with_hint(elt.value, elem_ty);
      self.assignment(&mut v, elem_ty, elt.value.span, "in map literal");
    }
    Operand { mode: Mode::Value, expr: None, typ, val: Const::Unknown, id: None }
  }

  /// base §4.7 "Fallback": any non-composable type still has its elements'
  /// values checked (to avoid spurious unused-variable diagnostics from the
  /// out-of-scope statement checker) before reporting `InvalidLit`.
  fn fallback_lit(&mut self, typ: Ty<'tcx>, elts: &'ast [Elt<'ast>], span: Span) -> Operand<'tcx, 'ast> {
    for elt in elts { self.use_elt(elt) }
    self.error(span, ErrorCode::InvalidLit, format!("invalid composite literal type {:?}", typ.basic()));
    self.invalid_operand()
  }

  /// `indexedElts(elts, elemType, arrayLen)` (base §4.7 "Array and Slice").
  /// `array_len` is `None` for a slice (no static bound to enforce).
  /// Returns `max`, the highest `index + 1` seen — used to finalize a
  /// `[...]T` literal's length.
  pub fn indexed_elts(&mut self, elts: &'ast [Elt<'ast>], elem_ty: Ty<'tcx>, array_len: Option<u64>, span: Span, oversize_code: ErrorCode) -> u64 {
    let _ = span;
    let mut index: i64 = 0;
    let mut visited: HashSet<u64> = HashSet::new();
    let mut max: u64 = 0;
    for elt in elts {
      if let Some(key) = elt.key {
        if let Some(i) = self.index_value(key, array_len, ErrorCode::InvalidLitIndex, false) {
          index = i64::try_from(i).unwrap_or(i64::MAX);
        }
      } else if let Some(len) = array_len {
        if index < 0 || index as u64 >= len {
          self.error(elt.value.span, oversize_code, format!("array index {index} out of bounds (array has {len} elements)"));
        }
      }
      if index >= 0 {
        let idx = index as u64;
        if !visited.insert(idx) {
          self.error(elt.value.span, ErrorCode::DuplicateLitKey, format!("duplicate index {idx} in literal"));
        }
        max = max.max(idx + 1);
      }
      let mut v = self.expr_with_hint(elt.value, elem_ty);
      self.assignment(&mut v, elem_ty, elt.value.span, "in array/slice literal");
      index += 1;
    }
    max
  }

  /// `index(indexExpr, length)` (base §4.8): validates a constant index is a
  /// non-negative integer `< length` (when `length` is statically known); a
  /// non-constant index of integer type is accepted as a runtime check.
  /// Returns the constant value when known.
  pub fn index(&mut self, e: &'ast crate::ast::Expr<'ast>, length: Option<u64>) -> Option<u64> {
    self.index_value(e, length, ErrorCode::InvalidIndex, true)
  }

  /// Shared by [`Self::index`] (general indexing, base §4.8, where a
  /// non-constant integer index is a runtime check) and `indexed_elts`'s
  /// composite-literal keys (base §4.7, where the key must itself be a
  /// non-negative integer *constant* — `allow_runtime` is `false` there, so
  /// a non-constant key is rejected outright instead of tolerated).
  fn index_value(&mut self, e: &'ast crate::ast::Expr<'ast>, length: Option<u64>, code: ErrorCode, allow_runtime: bool) -> Option<u64> {
    let x = self.expr(e);
    if x.is_invalid() { return None }
    if x.mode == Mode::Constant {
      if matches!(x.val, Const::Unknown) { return None }
      let crate::konst::Const::Int(i) = x.val.to_int() else {
        self.error(e.span, code, "index must be an integer constant");
        return None;
      };
      if num_traits::Signed::is_negative(&i) {
        self.error(e.span, code, "index must be non-negative");
        return None;
      }
      let Some(u) = num_traits::ToPrimitive::to_u64(&i) else {
        self.error(e.span, code, "index too large");
        return None;
      };
      if let Some(len) = length {
        if u >= len {
          self.error(e.span, code, format!("index {u} out of bounds (length {len})"));
          return None;
        }
      }
      Some(u)
    } else if allow_runtime {
      if !crate::predicates::is_integer(x.typ) {
        self.error(e.span, code, "index must be of integer type");
      }
      None
    } else {
      self.error(e.span, code, "index must be a non-negative constant");
      None
    }
  }
}
