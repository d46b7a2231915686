//! Carrier resolution from phone-number prefixes.
//!
//! Maps a free-form phone number to one of the South African carriers the
//! portal resells for. Resolution is pure and cheap enough to run on every
//! keystroke; recent verdicts are memoized so repeated lookups of the same
//! number cost a cache hit.

use moka::sync::Cache;

use duma_core::normalize_digits;

/// Carrier string reported when no prefix matches.
pub const UNKNOWN_CARRIER: &str = "Unknown";

/// Minimum normalized digit count for a resolvable number.
pub const MIN_RESOLVABLE_DIGITS: usize = 10;

/// How many distinct numbers to keep memoized.
const MEMO_CAPACITY: u64 = 256;

/// Carrier prefix table, in declaration order.
///
/// Iteration order is load-bearing: "084" is listed under both MTN and
/// Cell C (the upstream mapping is ambiguous), and the first match in this
/// order wins. The prefixes are national format (leading zero), so a number
/// carrying the "27" country code yields a bare prefix that never matches;
/// both quirks are preserved verbatim from the upstream table.
const CARRIER_PREFIXES: &[(&str, &[&str])] = &[
    ("MTN", &["083", "073", "078", "063", "084"]),
    ("Vodacom", &["082", "072", "076", "079", "071"]),
    ("Cell C", &["084", "074", "061", "062"]),
    ("Telkom", &["081", "067", "068"]),
    ("Rain", &["087"]),
];

/// The verdict for one phone number.
///
/// Always replaced atomically; never partially updated.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PhoneValidationResult {
    /// Resolved carrier name, or [`UNKNOWN_CARRIER`].
    pub carrier: String,
    /// Whether the number is long enough and its prefix is recognized.
    pub is_valid: bool,
    /// The normalized digits the verdict applies to.
    pub checked_number: String,
}

/// Resolves phone numbers to carriers.
#[derive(Debug, Clone)]
pub struct NetworkResolver {
    memo: Cache<String, PhoneValidationResult>,
}

impl Default for NetworkResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkResolver {
    /// Create a resolver with an empty memo cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            memo: Cache::new(MEMO_CAPACITY),
        }
    }

    /// Resolve a free-form phone number to a carrier and validity verdict.
    ///
    /// Non-digit characters are stripped first. A number starting with the
    /// "27" country code has it dropped before the 3-digit prefix is taken;
    /// otherwise the first 3 digits are the prefix. The number is valid only
    /// if its normalized digit length is at least 10 and the prefix is in
    /// the carrier table.
    #[must_use]
    pub fn resolve(&self, raw_phone: &str) -> PhoneValidationResult {
        let digits = normalize_digits(raw_phone);
        self.memo
            .get_with(digits.clone(), || resolve_digits(&digits))
    }
}

/// Pure resolution over already-normalized digits.
fn resolve_digits(digits: &str) -> PhoneValidationResult {
    let prefix = if let Some(national) = digits.strip_prefix("27") {
        national.get(..3)
    } else {
        digits.get(..3)
    };

    let carrier = prefix.and_then(lookup_carrier);

    match carrier {
        Some(name) if digits.len() >= MIN_RESOLVABLE_DIGITS => PhoneValidationResult {
            carrier: name.to_owned(),
            is_valid: true,
            checked_number: digits.to_owned(),
        },
        _ => PhoneValidationResult {
            carrier: UNKNOWN_CARRIER.to_owned(),
            is_valid: false,
            checked_number: digits.to_owned(),
        },
    }
}

/// First carrier in table order whose prefix list contains `prefix`.
fn lookup_carrier(prefix: &str) -> Option<&'static str> {
    CARRIER_PREFIXES
        .iter()
        .find(|(_, prefixes)| prefixes.contains(&prefix))
        .map(|(carrier, _)| *carrier)
}
