//! Line oriented progress and error reporting.
//!
//! Every line is written to a locked stdout in the `info string` form so that
//! front ends reading engine output can pass it through unchanged.

use std::io::{self, Write};

fn write_line(prefix: &str, s: &str) -> io::Result<()> {
    let mut line = String::from(prefix);
    line.push_str(s);
    line.push('\n');

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(line.as_bytes())?;
    handle.flush()
}

/// Send a debug info string. Nothing is written unless `can_debug` is set.
pub fn debug(can_debug: bool, s: &str) -> io::Result<()> {
    if can_debug {
        write_line("info string debug ", s)
    } else {
        Ok(())
    }
}

/// Send an error info string.
pub fn error(s: &str) -> io::Result<()> {
    write_line("info string error ", s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_debug_is_silent() {
        assert!(debug(false, "never written").is_ok());
    }
}
