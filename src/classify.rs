// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use crate::Result;

const MASTER: &str = "refs/heads/master";
const HEADS: &str = "refs/heads/";
const REMOTES: &str = "refs/remotes/";
const TAGS: &str = "refs/tags/";

/// A proposed reference update, as reported by the DVCS.
pub struct Update {
    pub old: git2::Oid,
    pub new: git2::Oid,
    pub name: String,
}

/// The kind of transition a triple represents, derived purely from the
/// zero-ness of `old`/`new` (§3).
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum UpdateKind {
    Create,
    Update,
    Delete,
}

/// The namespace a ref name falls into (§3).
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum RefClass {
    Branch { is_master: bool },
    RemoteTracking,
    Tag,
    Other,
}

/// The effective type of a walked object, after folding "has ≥2 parents" into
/// `Merge` ahead of any policy branch (§9).
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum ObjectKind {
    Commit,
    Merge,
    Tag,
    Other,
}

impl Update {
    pub fn kind(&self) -> UpdateKind {
        let zero = git2::Oid::zero();
        match (self.old == zero, self.new == zero) {
            (true, false) => UpdateKind::Create,
            (false, false) => UpdateKind::Update,
            (false, true) => UpdateKind::Delete,
            (true, true) => UpdateKind::Update, // not reachable per the hook protocol
        }
    }

    pub fn class(&self) -> RefClass {
        classify_name(&self.name)
    }
}

fn classify_name(name: &str) -> RefClass {
    if let Some(branch) = name.strip_prefix(HEADS) {
        RefClass::Branch {
            is_master: branch == "master",
        }
    } else if name.starts_with(REMOTES) {
        RefClass::RemoteTracking
    } else if name.starts_with(TAGS) {
        RefClass::Tag
    } else {
        RefClass::Other
    }
}

pub fn is_master(name: &str) -> bool {
    name == MASTER
}

/// Determine the effective kind of an already-looked-up object: a commit
/// with ≥2 parents is folded into `Merge` ahead of any policy branch (§4.6.3).
pub fn object_kind(repo: &git2::Repository, oid: git2::Oid) -> Result<ObjectKind> {
    let obj = repo.find_object(oid, None)?;
    let kind = match obj.kind() {
        Some(git2::ObjectType::Commit) => {
            let commit = obj.peel_to_commit()?;
            if commit.parent_count() >= 2 {
                ObjectKind::Merge
            } else {
                ObjectKind::Commit
            }
        },
        Some(git2::ObjectType::Tag) => ObjectKind::Tag,
        _ => ObjectKind::Other,
    };
    Ok(kind)
}
