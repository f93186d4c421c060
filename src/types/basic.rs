//! The predeclared [`Basic`] atoms (base §3 "Type lattice... Basic") and the
//! sizing oracle (base §6) that gives implementation-defined widths to
//! `Int`, `Uint`, `Uintptr`.

use bitflags::bitflags;

bitflags! {
  /// Cheap classification flags for a [`Basic`] kind, computed once in
  /// [`BasicKind::flags`] and then consulted by every `is_*` predicate in
  /// [`crate::predicates`]. A `bitflags` set is the natural fit here: the
  /// predicates overlap (e.g. `isNumeric` is the union of `isInteger`,
  /// `isFloat`, `isComplex`) and the teacher reaches for `bitflags` whenever
  /// a closed set of orthogonal-ish properties needs cheap membership tests.
  #[derive(Clone, Copy, PartialEq, Eq, Debug)]
  pub struct Flags: u16 {
    const BOOLEAN    = 1 << 0;
    const INTEGER    = 1 << 1;
    const UNSIGNED   = 1 << 2;
    const FLOAT      = 1 << 3;
    const COMPLEX    = 1 << 4;
    const STRING     = 1 << 5;
    const UNTYPED    = 1 << 6;
    const NILABLE    = 1 << 7;
    /// `UnsafePointer` and `Invalid` carry none of the above but still need
    /// a discriminant; no flag is required for them.
    const NUMERIC = Self::INTEGER.bits() | Self::FLOAT.bits() | Self::COMPLEX.bits();
    const ORDERED = Self::NUMERIC.bits() | Self::STRING.bits();
  }
}

/// The predeclared basic type kinds (base §3). The untyped/typed partition
/// is not a separate Rust type — it is the [`Flags::UNTYPED`] bit — so that
/// `isUntyped`/`isTyped` (base §2) are one flag check each rather than a
/// second enum to keep in sync.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BasicKind {
  Invalid,
  UnsafePointer,
  Bool,
  Int, Int8, Int16, Int32, Int64,
  Uint, Uintptr, Uint8, Uint16, Uint32, Uint64,
  Float32, Float64,
  Complex64, Complex128,
  String,
  UntypedBool,
  UntypedInt,
  UntypedRune,
  UntypedFloat,
  UntypedComplex,
  UntypedString,
  UntypedNil,
}

impl BasicKind {
  #[must_use] pub fn flags(self) -> Flags {
    use BasicKind::*;
    match self {
      Invalid | UnsafePointer => Flags::NILABLE,
      Bool => Flags::BOOLEAN,
      Int | Int8 | Int16 | Int32 | Int64 => Flags::INTEGER,
      Uint | Uintptr | Uint8 | Uint16 | Uint32 | Uint64 => Flags::INTEGER | Flags::UNSIGNED,
      Float32 | Float64 => Flags::FLOAT,
      Complex64 | Complex128 => Flags::COMPLEX,
      String => Flags::STRING,
      UntypedBool => Flags::BOOLEAN | Flags::UNTYPED,
      UntypedInt => Flags::INTEGER | Flags::UNTYPED,
      UntypedRune => Flags::INTEGER | Flags::UNTYPED,
      UntypedFloat => Flags::FLOAT | Flags::UNTYPED,
      UntypedComplex => Flags::COMPLEX | Flags::UNTYPED,
      UntypedString => Flags::STRING | Flags::UNTYPED,
      UntypedNil => Flags::UNTYPED | Flags::NILABLE,
    }
  }

  #[must_use] pub fn is_untyped(self) -> bool { self.flags().contains(Flags::UNTYPED) }
  #[must_use] pub fn is_unsigned(self) -> bool { self.flags().contains(Flags::UNSIGNED) }

  /// The *default type* an untyped kind takes on when forced to
  /// materialize (base §4.5, base glossary "Default type"). Total on every
  /// untyped kind except `UntypedNil`, which has no default and maps to
  /// `Invalid` (base §8 invariant: "Default-type mapping is total on
  /// untyped kinds except UntypedNil which maps to Invalid").
  #[must_use] pub fn default_type(self) -> BasicKind {
    use BasicKind::*;
    match self {
      UntypedBool => Bool,
      UntypedInt => Int,
      UntypedRune => Int32, // "rune" defaults to the 32-bit signed integer
      UntypedFloat => Float64,
      UntypedComplex => Complex128,
      UntypedString => String,
      UntypedNil => Invalid,
      other => other,
    }
  }

  /// A rough total ordering over the untyped numeric kinds used by
  /// [`crate::untyped::convert_untyped`]'s untyped-to-untyped widening rule
  /// (base §4.6: "UntypedInt < UntypedRune < UntypedFloat < UntypedComplex").
  #[must_use] pub fn untyped_numeric_rank(self) -> Option<u8> {
    use BasicKind::*;
    match self {
      UntypedInt => Some(0),
      UntypedRune => Some(1),
      UntypedFloat => Some(2),
      UntypedComplex => Some(3),
      _ => None,
    }
  }

  /// Bit width in bits, for integer kinds with a fixed width. `Int`,
  /// `Uint`, `Uintptr` defer to the [`Sizing`] oracle.
  #[must_use] pub fn fixed_bits(self) -> Option<u32> {
    use BasicKind::*;
    match self {
      Int8 | Uint8 => Some(8),
      Int16 | Uint16 => Some(16),
      Int32 | Uint32 => Some(32),
      Int64 | Uint64 => Some(64),
      _ => None,
    }
  }
}

/// Implementation-defined integer widths (base §6 "Sizing oracle"). This
/// doubles as the crate's only configuration surface (SPEC_FULL §S.5):
/// there is no other knob a caller needs to set before checking an
/// expression.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Sizing {
  pub int_bits: u32,
  pub ptr_bits: u32,
}

impl Sizing {
  /// `int`/`uint`/`uintptr` are 32 bits wide, pointers are 32 bits.
  pub const ILP32: Sizing = Sizing { int_bits: 32, ptr_bits: 32 };
  /// `int`/`uint` are 64 bits wide, pointers are 64 bits (`uintptr` tracks
  /// pointer width). This is the default used by [`Sizing::default`].
  pub const LP64: Sizing = Sizing { int_bits: 64, ptr_bits: 64 };

  /// Bit width of `basic`, resolving `Int`/`Uint`/`Uintptr` against this
  /// oracle and deferring to [`BasicKind::fixed_bits`] otherwise.
  #[must_use] pub fn bits(self, basic: BasicKind) -> Option<u32> {
    use BasicKind::*;
    match basic {
      Int | Uint => Some(self.int_bits),
      Uintptr => Some(self.ptr_bits),
      other => other.fixed_bits(),
    }
  }
}

impl Default for Sizing {
  fn default() -> Self { Sizing::LP64 }
}
