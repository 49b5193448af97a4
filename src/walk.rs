// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use crate::{
    classify::UpdateKind,
    Result,
    Update,
};

/// Enumerate every commit-like object newly introduced by `update`, hiding
/// whatever the boundary discipline of §4.5 says was already admitted.
///
/// Single-pass: backed directly by `git2::Revwalk`, itself a single-pass
/// iterator, so callers must not invoke this twice for the same update.
pub fn new_commits(repo: &git2::Repository, update: &Update) -> Result<Vec<git2::Oid>> {
    let mut walk = repo.revwalk()?;
    walk.push(update.new)?;

    match update.kind() {
        UpdateKind::Update => {
            // History grows monotonically: everything reachable from the
            // prior tip was verified on a previous push.
            walk.hide(update.old)?;
        },
        UpdateKind::Create => {
            // Nothing has ever pointed at `new` before. Hide every other
            // branch tip so only commits unreachable from the rest of the
            // repository are walked; the ref being created is excluded from
            // the hide set in case it already points at `new` locally.
            for branch in repo.branches(Some(git2::BranchType::Local))? {
                let (branch, _) = branch?;
                let reference = branch.get();
                if reference.name() == Some(update.name.as_str()) {
                    continue;
                }
                if let Some(target) = reference.target() {
                    walk.hide(target)?;
                }
            }
        },
        UpdateKind::Delete => {
            // The walker is never invoked for deletions (§4.6.1 bypasses all
            // other checks); nothing to hide.
        },
    }

    walk.collect::<core::result::Result<Vec<_>, _>>()
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_repo() -> (tempfile::TempDir, git2::Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        (dir, repo)
    }

    fn commit(
        repo: &git2::Repository,
        parents: &[&git2::Commit<'_>],
        message: &str,
    ) -> git2::Oid {
        let sig = git2::Signature::now("test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(None, &sig, &sig, message, &tree, parents)
            .unwrap()
    }

    #[test]
    fn update_hides_old_ancestors() {
        let (_dir, repo) = init_repo();
        let c1 = commit(&repo, &[], "c1");
        let c1 = repo.find_commit(c1).unwrap();
        let c2_oid = commit(&repo, &[&c1], "c2");
        let c2 = repo.find_commit(c2_oid).unwrap();
        let c3_oid = commit(&repo, &[&c2], "c3");

        let update = Update {
            old: c2_oid,
            new: c3_oid,
            name: "refs/heads/feature".to_owned(),
        };
        let new = new_commits(&repo, &update).unwrap();
        assert_eq!(new, vec![c3_oid]);
    }

    #[test]
    fn create_hides_other_branch_tips() {
        let (_dir, repo) = init_repo();
        let c1 = commit(&repo, &[], "c1");
        let c1_commit = repo.find_commit(c1).unwrap();
        repo.branch("main", &c1_commit, false).unwrap();

        let c2 = commit(&repo, &[&c1_commit], "c2");

        let update = Update {
            old: git2::Oid::zero(),
            new: c2,
            name: "refs/heads/feature".to_owned(),
        };
        let new = new_commits(&repo, &update).unwrap();
        assert_eq!(new, vec![c2]);
    }
}
