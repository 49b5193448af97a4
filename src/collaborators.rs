// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use std::collections::BTreeMap;

use anyhow::Context as _;

use crate::{
    Fingerprint,
    Result,
};

const COLLABORATORS_FILE: &str = "collaborators.yaml";

/// The mapping from collaborator identity to the fingerprint of the key they
/// sign with, loaded once at startup from `<repo-private-dir>/collaborators.yaml`.
pub struct Collaborators(BTreeMap<String, Fingerprint>);

impl Collaborators {
    pub fn load(repo: &git2::Repository) -> Result<Self> {
        let path = repo.path().join(COLLABORATORS_FILE);
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse {} as a collaborator allow-list", path.display()))
    }

    pub(crate) fn parse(yaml: &str) -> Result<Self> {
        let map: BTreeMap<String, Fingerprint> = serde_yaml::from_str(yaml)?;
        Ok(Self(map))
    }

    /// Look up the collaborator identity owning `fingerprint`, if any.
    pub fn identity_for(&self, fingerprint: &Fingerprint) -> Option<&str> {
        self.0
            .iter()
            .find_map(|(identity, fp)| (fp == fingerprint).then_some(identity.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_resolves() {
        let yaml = format!("alice: {}\nbob: {}\n", "A".repeat(40), "B".repeat(40));
        let collaborators = Collaborators::parse(&yaml).unwrap();

        let alice_fp: Fingerprint = "a".repeat(40).parse().unwrap();
        assert_eq!(collaborators.identity_for(&alice_fp), Some("alice"));

        let carol_fp: Fingerprint = "c".repeat(40).parse().unwrap();
        assert_eq!(collaborators.identity_for(&carol_fp), None);
    }

    #[test]
    fn rejects_malformed_fingerprint() {
        let yaml = "alice: not-a-fingerprint\n";
        assert!(Collaborators::parse(yaml).is_err());
    }
}
