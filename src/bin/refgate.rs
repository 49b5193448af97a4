// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use std::{
    io,
    path::PathBuf,
};

use clap::Parser as _;

fn main() -> refgate::Result<()> {
    let cli = Cli::parse();
    refgate::logging::init(cli.verbose)?;

    let ctx = refgate::Context::open(&cli.git_dir)?;
    let mut diagnostics = refgate::Diagnostics::stdout();

    let verdict = refgate::run(&ctx, io::stdin().lock(), &mut diagnostics)?;
    std::process::exit(verdict.exit_code());
}

/// refgate: server-side push admission gate
#[derive(Debug, clap::Parser)]
#[clap(author, version, about, max_term_width = 100)]
struct Cli {
    /// Path to the repository to admit pushes into
    #[clap(
        long,
        value_parser,
        value_name = "DIR",
        env = "GIT_DIR",
        default_value_os_t = std::env::current_dir().unwrap(),
    )]
    git_dir: PathBuf,

    /// Raise tracing verbosity; repeatable (-v, -vv, -vvv). Overridden by an
    /// explicitly set `RUST_LOG`.
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}
