// Copyright © 2022 Kim Altintop <kim@eagain.io>
// SPDX-License-Identifier: GPL-2.0-only WITH openvpn-openssl-exception

use std::io::{
    self,
    Write as _,
};

/// The push-protocol text sink (§4.9, §6): every message is relayed to the
/// pushing client, so it is kept deliberately separate from the `log` crate's
/// operator-facing tracing stream.
pub struct Diagnostics<W> {
    out: W,
}

impl Diagnostics<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: io::Write> Diagnostics<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Emit one push-protocol line, prefixed `*** ` per the wire contract.
    pub fn emit(&mut self, message: impl AsRef<str>) {
        // A write failure here has nowhere useful to propagate to: the push
        // is already being decided, and the client may simply have hung up.
        let _ = writeln!(self.out, "*** {}", message.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_every_line() {
        let mut buf = Vec::new();
        {
            let mut diagnostics = Diagnostics::new(&mut buf);
            diagnostics.emit("hello");
            diagnostics.emit("world");
        }
        assert_eq!(String::from_utf8(buf).unwrap(), "*** hello\n*** world\n");
    }
}
