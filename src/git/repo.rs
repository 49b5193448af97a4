// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use std::{
    ffi::OsString,
    iter,
    path::Path,
};

use super::Result;

/// Open a repository at `path`, bare or otherwise, honouring `$GIT_DIR` and
/// friends the way the `git` CLI itself does.
pub fn open<P: AsRef<Path>>(path: P) -> Result<git2::Repository> {
    git2::Repository::open_ext(
        path,
        git2::RepositoryOpenFlags::FROM_ENV,
        iter::empty::<OsString>(),
    )
}
