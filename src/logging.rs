// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

//! Operator-facing tracing, kept distinct from the push-protocol text a
//! pusher sees (`crate::diagnostics`). A server-side hook has no terminal to
//! style output for, so this is a plain `eprintln!` sink gated by level.

pub struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("{}: {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

/// Install `Logger` as the global logger. An explicitly set `RUST_LOG` wins
/// outright; otherwise the level is `Info` bumped once per repeated `-v`
/// (`Info` → `Debug` → `Trace`), per the CLI's repeatable `--verbose` flag.
pub fn init(verbosity: u8) -> Result<(), log::SetLoggerError> {
    static LOGGER: Logger = Logger;
    log::set_logger(&LOGGER)?;
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| match verbosity {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    log::set_max_level(level);
    Ok(())
}
