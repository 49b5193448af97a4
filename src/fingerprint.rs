// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use core::{
    fmt,
    str::FromStr,
};

use thiserror::Error;

/// A full 40-hex-character OpenPGP fingerprint, stored canonically uppercase.
///
/// Allow-list entries and signature-verification results are both normalised
/// into this type before comparison, so that case never matters and the gate
/// never has to reason about short key IDs once past the signer resolver.
#[derive(Clone, Eq, Ord, PartialEq, PartialOrd, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct Fingerprint(String);

#[derive(Debug, Error)]
pub enum Error {
    #[error("fingerprint {0:?} is not 40 hex characters")]
    NotHex(String),
}

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Fingerprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 40 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::NotHex(s.to_owned()));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<&sequoia_openpgp::Fingerprint> for Fingerprint {
    fn from(fp: &sequoia_openpgp::Fingerprint) -> Self {
        // sequoia already renders fingerprints as uppercase hex, but we go
        // through the same canonicalisation as everything else rather than
        // trust that invariant at a distance.
        Self(fp.to_hex().replace(' ', "").to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        let lower: Fingerprint = "a".repeat(40).parse().unwrap();
        let upper: Fingerprint = "A".repeat(40).parse().unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.as_str(), "A".repeat(40));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!("AAAA".parse::<Fingerprint>().is_err());
    }

    #[test]
    fn rejects_non_hex() {
        assert!("Z".repeat(40).parse::<Fingerprint>().is_err());
    }
}
