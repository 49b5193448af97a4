// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use std::path::PathBuf;

use crate::{
    git::{
        config::Snapshot,
        if_not_found_none,
    },
    Result,
};

const DEFAULT_KEYRING_FILE: &str = "keyring.gpg";

/// A read-only view over the repository's `hooks.*` policy options, snapshotted
/// once at startup so that concurrent config writes elsewhere cannot change
/// the outcome of a single admission run.
pub struct Config {
    snapshot: Snapshot,
}

macro_rules! bool_option {
    ($(#[$meta:meta])* $name:ident, $key:literal) => {
        $(#[$meta])*
        pub fn $name(&self) -> Result<bool> {
            Ok(if_not_found_none(self.snapshot.get_bool($key))?.unwrap_or(false))
        }
    };
}

impl Config {
    pub fn load(repo: &git2::Repository) -> Result<Self> {
        let snapshot = Snapshot::try_from(repo.config()?)?;
        Ok(Self { snapshot })
    }

    bool_option!(
        /// Permit unsigned commits and merges.
        allow_unsigned_commits,
        "hooks.allowunsignedcommits"
    );
    bool_option!(
        /// Permit unsigned tags.
        allow_unsigned_tags,
        "hooks.allowunsignedtags"
    );
    bool_option!(
        /// Permit non-merge commits directly on `master`.
        allow_commits_on_master,
        "hooks.allowcommitsonmaster"
    );
    bool_option!(
        /// Permit lightweight (un-annotated) tags.
        allow_unannotated,
        "hooks.allowunannotated"
    );
    bool_option!(
        /// Permit deleting a tag.
        allow_delete_tag,
        "hooks.allowdeletetag"
    );
    bool_option!(
        /// Permit modifying (force-updating) an existing tag.
        allow_modify_tag,
        "hooks.allowmodifytag"
    );
    bool_option!(
        /// Permit deleting a branch or remote-tracking ref.
        allow_delete_branch,
        "hooks.allowdeletebranch"
    );
    bool_option!(
        /// Forbid creating a new branch altogether.
        deny_create_branch,
        "hooks.denycreatebranch"
    );

    /// Path to the armored OpenPGP keyring supplementing the certificates the
    /// gate was constructed with, relative to the repository's private
    /// metadata directory unless absolute. Defaults to `keyring.gpg`.
    pub fn keyring_path(&self, repo: &git2::Repository) -> Result<PathBuf> {
        let configured = if_not_found_none(self.snapshot.get_string("hooks.keyring"))?;
        let path = PathBuf::from(configured.unwrap_or_else(|| DEFAULT_KEYRING_FILE.to_owned()));
        Ok(if path.is_absolute() {
            path
        } else {
            repo.path().join(path)
        })
    }
}
