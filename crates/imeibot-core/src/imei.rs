//! IMEI identifiers and their Luhn check digit.
//!
//! An IMEI is exactly 15 ASCII digits. The last digit is the Luhn check digit
//! over the first 14. Validation failure is an ordinary `false`, never a
//! panic; [`Imei`] is the only way to carry an identifier that passed it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of digits in an IMEI, check digit included.
pub const IMEI_LEN: usize = 15;

/// Whether `candidate` is a structurally valid IMEI with a matching check
/// digit.
pub fn is_valid(candidate: &str) -> bool {
  let bytes = candidate.as_bytes();
  if bytes.len() != IMEI_LEN || !bytes.iter().all(u8::is_ascii_digit) {
    return false;
  }

  let digits: Vec<u8> = bytes.iter().map(|b| b - b'0').collect();
  luhn_check_digit(&digits[..IMEI_LEN - 1]) == digits[IMEI_LEN - 1]
}

/// Compute the Luhn check digit for `payload` (decimal digit values, not
/// ASCII).
///
/// Every second digit counting from the right of the payload is doubled, and
/// products above 9 have their digits summed.
pub fn luhn_check_digit(payload: &[u8]) -> u8 {
  let sum: u32 = payload
    .iter()
    .rev()
    .enumerate()
    .map(|(i, &d)| {
      let d = u32::from(d);
      if i % 2 == 0 {
        let doubled = d * 2;
        if doubled > 9 { doubled - 9 } else { doubled }
      } else {
        d
      }
    })
    .sum();

  ((10 - sum % 10) % 10) as u8
}

// ─── Imei ────────────────────────────────────────────────────────────────────

/// A validated IMEI. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Imei(String);

impl Imei {
  /// Validate raw input. Surrounding whitespace (common in chat input) is
  /// trimmed first; nothing else is normalised.
  pub fn parse(raw: &str) -> Result<Self> {
    let trimmed = raw.trim();
    if is_valid(trimmed) {
      Ok(Self(trimmed.to_owned()))
    } else {
      Err(Error::InvalidImei(raw.to_owned()))
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Imei {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for Imei {
  fn as_ref(&self) -> &str { &self.0 }
}

impl FromStr for Imei {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl TryFrom<String> for Imei {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { Self::parse(&s) }
}

impl From<Imei> for String {
  fn from(imei: Imei) -> Self { imei.0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_known_good_imeis() {
    assert!(is_valid("490014205973850"));
    assert!(is_valid("356735111052198"));
  }

  #[test]
  fn rejects_check_digit_mismatch() {
    assert!(!is_valid("490014205973859"));
    assert!(!is_valid("356735111052190"));
    assert!(!is_valid("123456789012345"));
  }

  #[test]
  fn rejects_wrong_length() {
    assert!(!is_valid(""));
    assert!(!is_valid("12345"));
    assert!(!is_valid("49001420597385"));
    assert!(!is_valid("4900142059738500"));
    assert!(!is_valid("123456789012345678"));
  }

  #[test]
  fn rejects_non_digits() {
    assert!(!is_valid("abcdefghijklmnop"));
    assert!(!is_valid("abcdefghijklmno"));
    assert!(!is_valid("49001420597385a"));
    assert!(!is_valid("4900142 5973850"));
    assert!(!is_valid("-49001420597385"));
  }

  #[test]
  fn repeated_digit_boundaries() {
    assert_eq!(luhn_check_digit(&[0; 14]), 0);
    assert!(is_valid("000000000000000"));
    assert!(!is_valid("000000000000001"));

    assert_eq!(luhn_check_digit(&[1; 14]), 9);
    assert!(is_valid("111111111111119"));
    assert!(!is_valid("111111111111111"));

    assert_eq!(luhn_check_digit(&[9; 14]), 4);
    assert!(is_valid("999999999999994"));
  }

  #[test]
  fn exactly_one_check_digit_fits_each_payload() {
    let payload = "35673511105219";
    let valid: Vec<u8> = (0..=9)
      .filter(|d| is_valid(&format!("{payload}{d}")))
      .collect();
    assert_eq!(valid, vec![8]);
  }

  #[test]
  fn parse_trims_whitespace() {
    let imei = Imei::parse("  490014205973850\n").unwrap();
    assert_eq!(imei.as_str(), "490014205973850");
  }

  #[test]
  fn parse_reports_raw_input() {
    let err = Imei::parse("12345").unwrap_err();
    assert!(matches!(err, Error::InvalidImei(ref s) if s == "12345"));
  }

  #[test]
  fn serde_rejects_invalid_strings() {
    let ok: Imei = serde_json::from_str("\"356735111052198\"").unwrap();
    assert_eq!(ok.to_string(), "356735111052198");
    assert_eq!(serde_json::to_string(&ok).unwrap(), "\"356735111052198\"");

    assert!(serde_json::from_str::<Imei>("\"356735111052190\"").is_err());
  }
}
