// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

pub mod commit;
pub mod config;
pub mod repo;

pub type Result<T> = core::result::Result<T, git2::Error>;

pub fn if_not_found_none<T>(r: Result<T>) -> Result<Option<T>> {
    if_not_found_then(r.map(Some), || Ok(None))
}

pub fn if_not_found_then<F, T>(r: Result<T>, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    r.or_else(|e| match e.code() {
        git2::ErrorCode::NotFound => f(),
        _ => Err(e),
    })
}
