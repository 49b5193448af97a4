// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use std::io::Cursor;

use refgate::{
    Context,
    Diagnostics,
    Verdict,
};

const ZERO: &str = "0000000000000000000000000000000000000000";

struct Fixture {
    _dir: tempfile::TempDir,
    repo: git2::Repository,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        let yaml = format!("alice: {}\n", "A".repeat(40));
        std::fs::write(repo.path().join("collaborators.yaml"), yaml).unwrap();
        Fixture { _dir: dir, repo }
    }

    fn set(&self, key: &str, value: bool) {
        self.repo.config().unwrap().set_bool(key, value).unwrap();
    }

    fn commit(&self, parents: &[&git2::Commit<'_>], message: &str) -> git2::Oid {
        let sig = git2::Signature::now("test", "test@example.com").unwrap();
        let tree_id = self.repo.index().unwrap().write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        self.repo
            .commit(None, &sig, &sig, message, &tree, parents)
            .unwrap()
    }

    fn branch(&self, name: &str, target: git2::Oid) {
        let commit = self.repo.find_commit(target).unwrap();
        self.repo.branch(name, &commit, false).unwrap();
    }

    fn context(&self) -> Context {
        Context::open(self._dir.path()).unwrap()
    }
}

fn run(ctx: &Context, input: &str) -> (Verdict, String) {
    let mut out = Vec::new();
    let verdict;
    {
        let mut diagnostics = Diagnostics::new(&mut out);
        verdict = refgate::run(ctx, Cursor::new(input), &mut diagnostics).unwrap();
    }
    (verdict, String::from_utf8(out).unwrap())
}

#[test]
fn deleting_a_branch_is_rejected_by_default() {
    let fx = Fixture::new();
    let c1 = fx.commit(&[], "c1");
    fx.branch("feature", c1);
    let ctx = fx.context();

    let line = format!("{c1} {ZERO} refs/heads/feature\n");
    let (verdict, log) = run(&ctx, &line);

    assert_eq!(verdict, Verdict::Reject);
    assert!(log.contains("Deleting a branch is not allowed"), "{log}");
}

#[test]
fn deleting_a_branch_is_accepted_when_configured() {
    let fx = Fixture::new();
    fx.set("hooks.allowdeletebranch", true);
    let c1 = fx.commit(&[], "c1");
    fx.branch("feature", c1);
    let ctx = fx.context();

    let line = format!("{c1} {ZERO} refs/heads/feature\n");
    let (verdict, _log) = run(&ctx, &line);

    assert_eq!(verdict, Verdict::Accept);
}

#[test]
fn non_merge_commit_on_master_is_rejected() {
    let fx = Fixture::new();
    fx.set("hooks.allowunsignedcommits", true);
    let c1 = fx.commit(&[], "c1");
    let c1_commit = fx.repo.find_commit(c1).unwrap();
    fx.branch("master", c1);
    let c2 = fx.commit(&[&c1_commit], "c2");
    let ctx = fx.context();

    let line = format!("{c1} {c2} refs/heads/master\n");
    let (verdict, log) = run(&ctx, &line);

    assert_eq!(verdict, Verdict::Reject);
    assert!(
        log.contains("Master only accepts merges of feature branches."),
        "{log}"
    );
}

#[test]
fn merge_of_old_tip_on_master_passes_when_unsigned_allowed() {
    let fx = Fixture::new();
    fx.set("hooks.allowunsignedcommits", true);
    let c1 = fx.commit(&[], "c1");
    let c1_commit = fx.repo.find_commit(c1).unwrap();
    fx.branch("master", c1);
    let feature = fx.commit(&[&c1_commit], "feature work");
    let feature_commit = fx.repo.find_commit(feature).unwrap();
    let merge = fx.commit(&[&c1_commit, &feature_commit], "merge feature");
    let ctx = fx.context();

    let line = format!("{c1} {merge} refs/heads/master\n");
    let (verdict, _log) = run(&ctx, &line);

    assert_eq!(verdict, Verdict::Accept);
}

#[test]
fn lightweight_tag_is_rejected_by_default() {
    let fx = Fixture::new();
    fx.set("hooks.allowunsignedcommits", true);
    let c1 = fx.commit(&[], "c1");
    let ctx = fx.context();

    let line = format!("{ZERO} {c1} refs/tags/v1\n");
    let (verdict, log) = run(&ctx, &line);

    assert_eq!(verdict, Verdict::Reject);
    assert!(log.contains("un-annotated tag refs/tags/v1 is not allowed"), "{log}");
}

#[test]
fn branch_creation_denied_when_configured() {
    let fx = Fixture::new();
    fx.set("hooks.allowunsignedcommits", true);
    fx.set("hooks.denycreatebranch", true);
    let c1 = fx.commit(&[], "c1");
    let ctx = fx.context();

    let line = format!("{ZERO} {c1} refs/heads/feature\n");
    let (verdict, log) = run(&ctx, &line);

    assert_eq!(verdict, Verdict::Reject);
    assert!(log.contains("Creating a branch is not allowed"), "{log}");
}

#[test]
fn unsigned_commits_pass_on_a_feature_branch_when_allowed() {
    let fx = Fixture::new();
    fx.set("hooks.allowunsignedcommits", true);
    let c1 = fx.commit(&[], "c1");
    let ctx = fx.context();

    let line = format!("{ZERO} {c1} refs/heads/feature\n");
    let (verdict, _log) = run(&ctx, &line);

    assert_eq!(verdict, Verdict::Accept);
}

/// §8 P6: once a triple is rejected, no further input line is even parsed.
/// The second line here is malformed; if the driver attempted to process it,
/// `run` would return `Err`, not `Ok(Verdict::Reject)`.
#[test]
fn short_circuits_on_first_rejection() {
    let fx = Fixture::new();
    let c1 = fx.commit(&[], "c1");
    fx.branch("feature", c1);
    let ctx = fx.context();

    let input = format!("{c1} {ZERO} refs/heads/feature\nthis is not a valid update line\n");
    let result = refgate::run(&ctx, Cursor::new(input), &mut Diagnostics::new(Vec::new()));

    assert!(matches!(result, Ok(Verdict::Reject)));
}

#[test]
fn empty_input_is_accepted() {
    let fx = Fixture::new();
    let ctx = fx.context();
    let (verdict, log) = run(&ctx, "");
    assert_eq!(verdict, Verdict::Accept);
    assert!(log.is_empty());
}
