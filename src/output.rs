//! # Output Configuration
//!
//! Controls how the CLI decorates its progress and summary lines. Status
//! markers are emoji when colour output is on and bracketed plain text
//! otherwise, so logs captured from CI stay readable.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;

/// Value of the `--color` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Output configuration for controlling colors, emojis and verbosity.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
    /// Suppress everything but errors.
    pub quiet: bool,
}

impl OutputConfig {
    /// Resolve the configuration from the `--color` choice and environment.
    ///
    /// In auto mode, colors are disabled if `NO_COLOR` is set (any value),
    /// `CLICOLOR=0`, `TERM=dumb`, or stdout is not a TTY (unless
    /// `CLICOLOR_FORCE=1`).
    pub fn new(color: ColorChoice, quiet: bool) -> Self {
        let use_color = match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => Self::detect_color_support(),
        };

        Self { use_color, quiet }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Print a status line unless quiet.
    pub fn status(&self, emoji_str: &str, plain: &str, message: impl std::fmt::Display) {
        if !self.quiet {
            println!("{} {}", emoji(self, emoji_str, plain), message);
        }
    }

    /// Print an indented detail line unless quiet.
    pub fn detail(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            println!("   {}", message);
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(ColorChoice::Auto, false)
    }
}

/// Returns the emoji when colors are enabled, else the plain alternative.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_always() {
        assert!(OutputConfig::new(ColorChoice::Always, false).use_color);
    }

    #[test]
    fn test_color_never() {
        assert!(!OutputConfig::new(ColorChoice::Never, false).use_color);
    }

    #[test]
    fn test_emoji_helper() {
        let colored = OutputConfig::new(ColorChoice::Always, false);
        let plain = OutputConfig::new(ColorChoice::Never, true);
        assert_eq!(emoji(&colored, "📦", "[ZIP]"), "📦");
        assert_eq!(emoji(&plain, "📦", "[ZIP]"), "[ZIP]");
        assert!(plain.quiet);
    }
}
