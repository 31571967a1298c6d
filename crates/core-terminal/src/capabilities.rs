//! Terminal capability probing.
//!
//! Records what the driver can do beyond plain writes so callers can degrade
//! gracefully. Detection runs once at startup and never blocks.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    /// Terminal reports focus gained/lost, enabling the long-command flash gate.
    pub focus_reporting: bool,
    /// The driver can move the visible window over its own scroll-back.
    pub viewport_scroll: bool,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        // VT terminals keep scroll-back on the emulator side; focus reports
        // are widely supported and harmless when ignored.
        Self {
            focus_reporting: true,
            viewport_scroll: false,
        }
    }
}
