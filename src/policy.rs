// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use crate::{
    classify::{
        ObjectKind,
        RefClass,
        UpdateKind,
    },
    git::commit::{
        extract_commit_signature,
        extract_tag_signature,
        Signed,
    },
    signer::{
        self,
        Resolution,
    },
    Context,
    Fingerprint,
    Result,
    Update,
};

/// The outcome of applying one policy rule: either the update (or the
/// object currently under inspection) is accepted, optionally with a
/// push-protocol log line, or rejected with the line that explains why.
pub enum Decision {
    Accept { log: Option<String> },
    Reject { reason: String },
}

impl Decision {
    fn accept() -> Self {
        Decision::Accept { log: None }
    }

    fn accept_with(log: impl Into<String>) -> Self {
        Decision::Accept {
            log: Some(log.into()),
        }
    }

    fn reject(reason: impl Into<String>) -> Self {
        Decision::Reject {
            reason: reason.into(),
        }
    }

    pub fn is_reject(&self) -> bool {
        matches!(self, Decision::Reject { .. })
    }
}

/// §4.6.1: deletions bypass every other check.
pub fn deletion(ctx: &Context, class: RefClass) -> Result<Decision> {
    let decision = match class {
        RefClass::Branch { .. } => {
            if ctx.config.allow_delete_branch()? {
                Decision::accept()
            } else {
                Decision::reject("Deleting a branch is not allowed")
            }
        },
        RefClass::RemoteTracking => {
            if ctx.config.allow_delete_branch()? {
                Decision::accept()
            } else {
                Decision::reject("Deleting a remote-tracking ref is not allowed")
            }
        },
        RefClass::Tag => {
            if ctx.config.allow_delete_tag()? {
                Decision::accept()
            } else {
                Decision::reject("Deleting a tag is not allowed")
            }
        },
        RefClass::Other => Decision::accept_with("Accepting deletion"),
    };
    Ok(decision)
}

/// §4.6.2: applies only to `refs/heads/master` with a non-zero new value.
/// `Ok(None)` means "not master, or commits-on-master explicitly allowed":
/// proceed straight to the graph walk.
pub fn master_rule(ctx: &Context, update: &Update) -> Result<Option<Decision>> {
    if !crate::classify::is_master(&update.name) {
        return Ok(None);
    }
    if ctx.config.allow_commits_on_master()? {
        return Ok(None);
    }

    if update.old == git2::Oid::zero() {
        return Ok(Some(Decision::accept_with(format!(
            "Creating master at {}",
            update.new
        ))));
    }

    let new_commit = ctx.repo.find_commit(update.new)?;
    let is_merge_of_old = new_commit.parent_ids().any(|parent| parent == update.old);
    if new_commit.parent_count() >= 2 && is_merge_of_old {
        Ok(None)
    } else {
        Ok(Some(Decision::reject(
            "Master only accepts merges of feature branches.",
        )))
    }
}

/// §4.6.3: applied once per object the walker yields.
pub fn check_object(ctx: &Context, update: &Update, oid: git2::Oid) -> Result<Decision> {
    if oid.is_zero() {
        return Ok(Decision::reject(format!(
            "Deletion of ref {} in the middle of the commit graph?",
            update.name
        )));
    }

    let kind = crate::classify::object_kind(&ctx.repo, oid)?;

    if matches!(update.kind(), UpdateKind::Create)
        && matches!(kind, ObjectKind::Commit | ObjectKind::Merge)
        && ctx.config.deny_create_branch()?
    {
        return Ok(Decision::reject("Creating a branch is not allowed"));
    }

    match kind {
        ObjectKind::Commit | ObjectKind::Merge => {
            if ctx.config.allow_unsigned_commits()? {
                return Ok(Decision::accept());
            }
            let signed = extract_commit_signature(&ctx.repo, oid)?;
            let label = if matches!(kind, ObjectKind::Merge) {
                "merge"
            } else {
                "commit"
            };
            signature_decision(ctx, signed, label, &oid.to_string())
        },
        ObjectKind::Tag => Ok(Decision::reject(format!(
            "Unknown type of update to {}?",
            update.name
        ))),
        ObjectKind::Other => Ok(Decision::reject(format!(
            "Unknown type of update to {}?",
            update.name
        ))),
    }
}

/// §4.6.4: the walker yielded nothing — classify `new` itself.
pub fn zero_new_objects(ctx: &Context, update: &Update) -> Result<Decision> {
    let kind = crate::classify::object_kind(&ctx.repo, update.new)?;
    match kind {
        ObjectKind::Commit | ObjectKind::Merge => {
            if ctx.config.allow_unsigned_tags()? && ctx.config.allow_unannotated()? {
                Ok(Decision::accept())
            } else {
                Ok(Decision::reject(format!(
                    "The un-annotated tag {} is not allowed.",
                    update.name
                )))
            }
        },
        ObjectKind::Tag => {
            if update.old != git2::Oid::zero() && !ctx.config.allow_modify_tag()? {
                // Rejected outright: no signature check, no success log, so a
                // rejected push never shows a "Good signature" line.
                return Ok(Decision::reject("Modifying a tag is not allowed."));
            }
            if ctx.config.allow_unsigned_tags()? {
                return Ok(Decision::accept());
            }
            let signed = extract_tag_signature(&ctx.repo, update.new)?;
            match signature_decision(ctx, signed, "tag", &update.name)? {
                Decision::Reject { .. } => Ok(Decision::reject(format!(
                    "Rejecting tag {} due to lack of a valid GPG signature.",
                    update.name
                ))),
                accepted => Ok(accepted),
            }
        },
        ObjectKind::Other => Ok(Decision::reject(format!(
            "No new commits, but {} is a {:?} instead of a tag?",
            update.name, kind
        ))),
    }
}

/// Shared machinery behind every "require a valid, allow-listed signature"
/// branch (§4.6.3, §4.6.4): verify the detached signature if present, then
/// resolve the signer against the allow-list.
fn signature_decision(
    ctx: &Context,
    signed: Option<Signed>,
    label: &str,
    subject: &str,
) -> Result<Decision> {
    let Some(signed) = signed else {
        return Ok(Decision::reject("Bad signature"));
    };
    let outcome = ctx.keyring.verify_detached(&signed);
    if !outcome.valid {
        return Ok(Decision::reject("Bad signature"));
    }
    let fingerprint: Fingerprint = outcome.fingerprint.expect("valid signature carries a fingerprint");
    match signer::resolve(&ctx.keyring, &ctx.collaborators, fingerprint.as_str()) {
        Resolution::Authorized { identity } => Ok(Decision::accept_with(format!(
            "Good signature on {label} {subject} by {identity} ({fingerprint})"
        ))),
        Resolution::Unknown | Resolution::Ambiguous | Resolution::NotAllowed { .. } => Ok(
            Decision::reject(format!("signed by unauthorised key {fingerprint}")),
        ),
    }
}
