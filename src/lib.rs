// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

mod classify;
mod collaborators;
mod config;
mod crypto;
mod diagnostics;
mod driver;
mod fingerprint;
mod git;
pub mod logging;
mod policy;
mod signer;
mod walk;

pub mod error;
pub use error::{
    Error,
    Result,
};

pub use classify::{
    ObjectKind,
    RefClass,
    Update,
    UpdateKind,
};
pub use collaborators::Collaborators;
pub use config::Config;
pub use crypto::Keyring;
pub use diagnostics::Diagnostics;
pub use driver::{
    run,
    Verdict,
};
pub use fingerprint::Fingerprint;

/// Everything the admission driver needs, assembled once at startup and
/// threaded by reference through every component operation.
pub struct Context {
    pub repo: git2::Repository,
    pub config: Config,
    pub collaborators: Collaborators,
    pub keyring: Keyring,
}

impl Context {
    pub fn open(git_dir: &std::path::Path) -> Result<Self> {
        let repo = git::repo::open(git_dir)?;
        let config = Config::load(&repo)?;
        let collaborators = Collaborators::load(&repo)?;
        let keyring = Keyring::load(&repo, &config)?;
        Ok(Self {
            repo,
            config,
            collaborators,
            keyring,
        })
    }
}
