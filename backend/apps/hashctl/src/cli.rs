//! Command line parsing

use anyhow::{Result, bail};

pub const USAGE: &str = "usage: hashctl hash | hashctl verify <token> | hashctl inspect <token>";

/// A parsed invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read a password from stdin and print a new token
    Hash,
    /// Read a password from stdin and check it against the token
    Verify { token: String },
    /// Print the parameters stored in a token
    Inspect { token: String },
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        match args {
            [cmd] if cmd == "hash" => Ok(Command::Hash),
            [cmd, token] if cmd == "verify" => Ok(Command::Verify {
                token: token.clone(),
            }),
            [cmd, token] if cmd == "inspect" => Ok(Command::Inspect {
                token: token.clone(),
            }),
            _ => bail!(USAGE),
        }
    }
}

/// Strip one trailing line ending in place
pub fn strip_line_ending(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}
