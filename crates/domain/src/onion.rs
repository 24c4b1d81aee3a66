use fancy_regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Onion label embedded anywhere in a hostname, bounded by label separators.
static ONION_IN_HOSTNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\.)([a-z0-9]{16}\.onion)(?=\.|$)").expect("static onion pattern")
});

/// A standalone onion address, optionally dot-terminated.
static ONION_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z0-9]{16}\.onion)\.?$").expect("static onion pattern"));

/// Legacy (16-character) onion address, e.g. `t3mny6lhnyku4wrd.onion`.
///
/// Only the label shape is checked. Once matched the value is an opaque token;
/// nothing here asserts the key behind it exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OnionAddress(Arc<str>);

impl OnionAddress {
    /// Parse a value that must be exactly one onion address.
    pub fn parse(value: &str) -> Option<Self> {
        capture(&ONION_EXACT, value)
    }

    /// Find the first onion address carried as labels of `hostname`,
    /// e.g. `t3mny6lhnyku4wrd.onion.ns.example.com.`.
    pub fn find_in(hostname: &str) -> Option<Self> {
        capture(&ONION_IN_HOSTNAME, hostname)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn capture(regex: &Regex, value: &str) -> Option<OnionAddress> {
    // Backtracking cannot blow up on these patterns; an engine error just means no match.
    let captures = regex.captures(value).ok().flatten()?;
    captures
        .get(1)
        .map(|m| OnionAddress(Arc::from(m.as_str())))
}

impl fmt::Display for OnionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OnionAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
