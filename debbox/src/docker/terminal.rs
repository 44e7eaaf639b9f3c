//! Host terminal handling for interactive sessions.

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::errors::{DebboxError, DebboxResult};

/// Terminal dimensions (columns x rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub cols: u16,
    pub rows: u16,
}

impl TerminalSize {
    /// Query the host terminal's current dimensions.
    pub fn current() -> DebboxResult<Self> {
        let (cols, rows) = crossterm::terminal::size().map_err(DebboxError::Terminal)?;
        Ok(TerminalSize { cols, rows })
    }
}

/// RAII guard around raw terminal mode. The previous mode is restored on
/// every in-process exit path; restoration after an ungraceful kill is a
/// known gap.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn new() -> DebboxResult<Self> {
        enable_raw_mode().map_err(DebboxError::Terminal)?;
        Ok(RawModeGuard { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_query_does_not_panic_without_a_terminal() {
        // CI has no controlling terminal; either answer is acceptable.
        let _ = TerminalSize::current();
    }
}
