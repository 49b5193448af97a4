// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use crate::{
    Collaborators,
    Fingerprint,
    Keyring,
};

/// The result of resolving a key identifier reported by signature
/// verification to an authorized collaborator (§4.2).
pub enum Resolution {
    /// Exactly one key matched and it belongs to an allow-listed collaborator.
    Authorized { identity: String },
    /// No key in the keyring matched `id`.
    Unknown,
    /// More than one key matched `id`; short IDs are not collision-resistant,
    /// so this is always unauthorized regardless of allow-list contents.
    Ambiguous,
    /// Exactly one key matched, but its fingerprint is not in the allow-list.
    NotAllowed { fingerprint: Fingerprint },
}

pub fn resolve(keyring: &Keyring, collaborators: &Collaborators, id: &str) -> Resolution {
    let matches = keyring.find_keys(id);
    match matches.as_slice() {
        [] => Resolution::Unknown,
        [fingerprint] => match collaborators.identity_for(fingerprint) {
            Some(identity) => Resolution::Authorized {
                identity: identity.to_owned(),
            },
            None => Resolution::NotAllowed {
                fingerprint: fingerprint.clone(),
            },
        },
        _ => Resolution::Ambiguous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_is_unresolved() {
        let keyring = Keyring::from_certs(vec![]);
        let collaborators = Collaborators::parse(&format!("alice: {}\n", "A".repeat(40))).unwrap();
        assert!(matches!(
            resolve(&keyring, &collaborators, "DEADBEEF"),
            Resolution::Unknown
        ));
    }
}
