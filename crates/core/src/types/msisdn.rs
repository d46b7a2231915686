//! Phone number (MSISDN) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Msisdn`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum MsisdnError {
    /// The input contains no digits at all.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input has too few digits.
    #[error("phone number must have at least {min} digits")]
    TooShort {
        /// Minimum required digit count.
        min: usize,
    },
    /// The input has too many digits.
    #[error("phone number must have at most {max} digits")]
    TooLong {
        /// Maximum allowed digit count.
        max: usize,
    },
}

/// A normalized phone number.
///
/// Free-form input (spaces, dashes, parentheses, a leading `+`) is accepted
/// and reduced to its digits. The stored form is the normalized digit string
/// exactly as entered; no country-code rewriting is performed.
///
/// ## Constraints
///
/// - At least 10 digits (South African national format)
/// - At most 15 digits (ITU-T E.164 limit)
///
/// ## Examples
///
/// ```
/// use duma_core::Msisdn;
///
/// let msisdn = Msisdn::parse("082 123-4567 ").unwrap();
/// assert_eq!(msisdn.as_str(), "0821234567");
///
/// assert!(Msisdn::parse("12345").is_err());   // too short
/// assert!(Msisdn::parse("---").is_err());     // no digits
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Msisdn(String);

impl Msisdn {
    /// Minimum digit count for a dialable number.
    pub const MIN_DIGITS: usize = 10;

    /// Maximum digit count (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse an `Msisdn` from free-form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input, after stripping non-digit characters,
    /// is empty, shorter than 10 digits, or longer than 15 digits.
    pub fn parse(raw: &str) -> Result<Self, MsisdnError> {
        let digits = normalize_digits(raw);

        if digits.is_empty() {
            return Err(MsisdnError::Empty);
        }

        if digits.len() < Self::MIN_DIGITS {
            return Err(MsisdnError::TooShort {
                min: Self::MIN_DIGITS,
            });
        }

        if digits.len() > Self::MAX_DIGITS {
            return Err(MsisdnError::TooLong {
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(digits))
    }

    /// Returns the normalized digit string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Msisdn` and returns its digits.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Msisdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip every non-digit character from free-form phone input.
#[must_use]
pub fn normalize_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
