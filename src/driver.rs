// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use std::io::BufRead;

use anyhow::Context as _;

use crate::{
    classify::UpdateKind,
    diagnostics::Diagnostics,
    policy::{
        self,
        Decision,
    },
    walk,
    Context,
    Result,
    Update,
};

/// The single verdict an invocation produces (§3 invariant: exactly one
/// verdict per invocation, never partial acceptance).
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Verdict {
    Accept,
    Reject,
}

impl Verdict {
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Accept => 0,
            Verdict::Reject => 1,
        }
    }
}

/// C7: read update triples from `input` until EOF, admitting or rejecting
/// the whole push. Stops at the first rejected triple (§4.7.4, §8 P6).
pub fn run<R: BufRead, W: std::io::Write>(
    ctx: &Context,
    input: R,
    diagnostics: &mut Diagnostics<W>,
) -> Result<Verdict> {
    let mut verdict = Verdict::Accept;

    for line in input.lines() {
        let line = line.context("failed to read a line of push-update input")?;
        if line.trim().is_empty() {
            continue;
        }
        let update = parse_update(&line)?;
        log::debug!(
            "admitting update old={} new={} ref={}",
            update.old,
            update.new,
            update.name
        );

        let outcome = evaluate(ctx, &update)?;
        for message in &outcome.logs {
            diagnostics.emit(message);
        }
        if let Some(reason) = outcome.reject {
            log::info!("rejected {}: {}", update.name, reason);
            diagnostics.emit(&reason);
            verdict = Verdict::Reject;
            break;
        }
    }

    Ok(verdict)
}

/// The accumulated result of admitting one update: every push-protocol log
/// line produced along the way, and the rejection reason if any.
struct Outcome {
    logs: Vec<String>,
    reject: Option<String>,
}

fn evaluate(ctx: &Context, update: &Update) -> Result<Outcome> {
    if matches!(update.kind(), UpdateKind::Delete) {
        return Ok(match policy::deletion(ctx, update.class())? {
            Decision::Accept { log } => Outcome {
                logs: log.into_iter().collect(),
                reject: None,
            },
            Decision::Reject { reason } => Outcome {
                logs: Vec::new(),
                reject: Some(reason),
            },
        });
    }

    let mut logs = Vec::new();

    if let Some(decision) = policy::master_rule(ctx, update)? {
        match decision {
            Decision::Reject { reason } => {
                return Ok(Outcome {
                    logs,
                    reject: Some(reason),
                })
            },
            Decision::Accept { log } => logs.extend(log),
        }
    }

    let new_objects = walk::new_commits(&ctx.repo, update)?;
    if new_objects.is_empty() {
        match policy::zero_new_objects(ctx, update)? {
            Decision::Accept { log } => logs.extend(log),
            Decision::Reject { reason } => {
                return Ok(Outcome {
                    logs,
                    reject: Some(reason),
                })
            },
        }
    } else {
        for oid in new_objects {
            match policy::check_object(ctx, update, oid)? {
                Decision::Accept { log } => logs.extend(log),
                Decision::Reject { reason } => {
                    return Ok(Outcome {
                        logs,
                        reject: Some(reason),
                    })
                },
            }
        }
    }

    Ok(Outcome { logs, reject: None })
}

fn parse_update(line: &str) -> Result<Update> {
    let mut parts = line.splitn(3, ' ');
    let old = parts.next().context("malformed update line: missing old oid")?;
    let new = parts.next().context("malformed update line: missing new oid")?;
    let name = parts
        .next()
        .context("malformed update line: missing ref name")?;

    Ok(Update {
        old: git2::Oid::from_str(old).with_context(|| format!("malformed old oid {old:?}"))?,
        new: git2::Oid::from_str(new).with_context(|| format!("malformed new oid {new:?}"))?,
        name: name.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_line() {
        assert!(parse_update("not enough fields").is_err());
    }

    #[test]
    fn parses_well_formed_line() {
        let zero = "0".repeat(40);
        let line = format!("{zero} {} refs/heads/master", "1".repeat(40));
        let update = parse_update(&line).unwrap();
        assert_eq!(update.name, "refs/heads/master");
        assert_eq!(update.old, git2::Oid::zero());
    }
}
