// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use super::{
    if_not_found_none,
    Result,
};

const PGP_SIGNATURE_BEGIN: &str = "-----BEGIN PGP SIGNATURE-----";

/// Detached signature material extracted from a commit, merge, or annotated
/// tag object: the signature bytes themselves, and the canonical bytes the
/// signature was computed over.
pub struct Signed {
    pub signature: Vec<u8>,
    pub plaintext: Vec<u8>,
}

/// Extract the PGP signature header libgit2 strips out of a commit object's
/// canonical representation, along with the remaining signed buffer.
///
/// Returns `None` if the commit carries no signature.
pub fn extract_commit_signature(repo: &git2::Repository, oid: git2::Oid) -> Result<Option<Signed>> {
    let extracted = if_not_found_none(repo.extract_signature(&oid, None))?;
    Ok(extracted.map(|(sig, data)| Signed {
        signature: sig.as_ref().to_vec(),
        plaintext: data.as_ref().to_vec(),
    }))
}

/// Extract the PGP signature embedded in the body of an annotated tag object.
///
/// Unlike commits, libgit2 does not special-case a signature field for tags:
/// the signer simply appends an ASCII-armored signature block to the tag
/// message. We split the raw object on that marker ourselves.
///
/// Returns `None` if the tag carries no signature.
pub fn extract_tag_signature(repo: &git2::Repository, oid: git2::Oid) -> Result<Option<Signed>> {
    let odb = repo.odb()?;
    let obj = odb.read(oid)?;
    let raw = obj.data();

    let marker = raw
        .windows(PGP_SIGNATURE_BEGIN.len())
        .position(|w| w == PGP_SIGNATURE_BEGIN.as_bytes());
    let Some(at) = marker else {
        return Ok(None);
    };

    // `git tag -s` signs the tag buffer as-is, terminating newline included,
    // and appends the armored block right after with no trimming. The signed
    // payload is therefore exactly everything up to the marker, verbatim.
    Ok(Some(Signed {
        signature: raw[at..].to_vec(),
        plaintext: raw[..at].to_vec(),
    }))
}
