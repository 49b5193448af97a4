// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use std::io;

use anyhow::Context as _;
use sequoia_openpgp::{
    self as openpgp,
    cert::{
        Cert,
        CertParser,
    },
    parse::{
        stream::{
            DetachedVerifierBuilder,
            GoodChecksum,
            MessageLayer,
            MessageStructure,
            VerificationHelper,
        },
        Parse,
    },
    policy::StandardPolicy,
    KeyHandle,
};

use crate::{
    config::Config,
    git::commit::Signed,
    Fingerprint,
    Result,
};

/// The outcome of attempting to verify a detached signature: whether it
/// checked out cryptographically, and, if so, the full fingerprint of the key
/// that produced it. The allow-list is never consulted here (§4.3).
pub struct Outcome {
    pub valid: bool,
    pub fingerprint: Option<Fingerprint>,
}

/// An in-process set of OpenPGP certificates the gate treats as its trusted
/// keyring: the operations a "crypto backend" is expected to offer (list-keys
/// by id, verify-detached-signature) without any system GPG keyring or
/// network lookup.
pub struct Keyring {
    certs: Vec<Cert>,
}

impl Keyring {
    pub fn load(repo: &git2::Repository, config: &Config) -> Result<Self> {
        let path = config.keyring_path(repo)?;
        let certs = match std::fs::read(&path) {
            Ok(bytes) => Self::parse(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read keyring {}", path.display()))
            },
        };
        Ok(Self { certs })
    }

    #[cfg(test)]
    pub fn from_certs(certs: Vec<Cert>) -> Self {
        Self { certs }
    }

    fn parse(bytes: &[u8]) -> Result<Vec<Cert>> {
        CertParser::from_bytes(bytes)
            .context("failed to parse keyring")?
            .collect::<openpgp::Result<Vec<_>>>()
            .context("failed to parse a certificate in the keyring")
    }

    /// C2 plumbing: every certificate in the keyring whose fingerprint ends
    /// with `id` (case-insensitively). A full 40-hex fingerprint matches
    /// exactly one certificate by construction; a short id may match several,
    /// which the signer resolver treats as unauthorized (§4.2, §8 P5).
    pub fn find_keys(&self, id: &str) -> Vec<Fingerprint> {
        let id = id.to_ascii_uppercase();
        self.certs
            .iter()
            .filter(|cert| cert.fingerprint().to_hex().ends_with(&id))
            .map(|cert| Fingerprint::from(&cert.fingerprint()))
            .collect()
    }

    /// C3: verify `signed` against every certificate currently loaded.
    pub fn verify_detached(&self, signed: &Signed) -> Outcome {
        let policy = StandardPolicy::new();
        let helper = Helper {
            certs: self.certs.clone(),
            signer_fprs: Vec::new(),
        };

        let verify = || -> openpgp::Result<Vec<openpgp::Fingerprint>> {
            let mut verifier = DetachedVerifierBuilder::from_bytes(&signed.signature)?
                .with_policy(&policy, None, helper)?;
            verifier.verify_bytes(&signed.plaintext)?;
            Ok(verifier.into_helper().signer_fprs)
        };

        match verify() {
            Ok(fprs) if !fprs.is_empty() => Outcome {
                valid: true,
                fingerprint: Some(Fingerprint::from(&fprs[0])),
            },
            _ => Outcome {
                valid: false,
                fingerprint: None,
            },
        }
    }
}

struct Helper {
    certs: Vec<Cert>,
    signer_fprs: Vec<openpgp::Fingerprint>,
}

impl VerificationHelper for Helper {
    // Hand the whole loaded keyring to Sequoia; we have no separate notion of
    // "the candidate key for this signature" ahead of verification.
    fn get_certs(&mut self, _ids: &[KeyHandle]) -> openpgp::Result<Vec<Cert>> {
        Ok(self.certs.clone())
    }

    // Collect every successful signer fingerprint Sequoia reports; the caller
    // decides whether any of them is allow-listed.
    fn check(&mut self, structure: MessageStructure) -> openpgp::Result<()> {
        for layer in structure.iter() {
            if let MessageLayer::SignatureGroup { results } = layer {
                for result in results {
                    if let Ok(GoodChecksum { ka, .. }) = result {
                        self.signer_fprs.push(ka.key().fingerprint());
                    }
                }
            }
        }
        Ok(())
    }
}
