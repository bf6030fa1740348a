//! # Output Configuration
//!
//! Controls how the CLI styles what it prints.
//!
//! ## Respecting User Preferences
//!
//! Styling follows these flags and environment variables:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wstool::output::OutputConfig;
//!
//! let out = OutputConfig::from_env_and_flag("auto");
//! println!("{} src/foo", out.header("status"));
//! ```

use std::env;

use console::style;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colored output should be used.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: `always` forces colors on
    /// (overriding `NO_COLOR`), `never` forces them off, anything else
    /// detects from the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
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

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// A bold label introducing an element, e.g. `=== src/foo (git) ===`.
    pub fn header(&self, text: &str) -> String {
        let text = format!("=== {} ===", text);
        if self.use_color {
            style(text).bold().to_string()
        } else {
            text
        }
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, Tone::Success)
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, Tone::Warning)
    }

    pub fn failure(&self, text: &str) -> String {
        self.paint(text, Tone::Failure)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, Tone::Dim)
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.use_color {
            return text.to_string();
        }
        let styled = style(text);
        match tone {
            Tone::Success => styled.green(),
            Tone::Warning => styled.yellow(),
            Tone::Failure => styled.red().bold(),
            Tone::Dim => styled.dim(),
        }
        .to_string()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Failure,
    Dim,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("NEVER");
        assert!(!config.use_color);
    }

    #[test]
    fn test_plain_output_is_unstyled() {
        let out = OutputConfig::without_color();
        assert_eq!(out.header("src/foo"), "=== src/foo ===");
        assert_eq!(out.success("ok"), "ok");
        assert_eq!(out.failure("failed"), "failed");
    }

    #[test]
    fn test_colored_output_keeps_text() {
        console::set_colors_enabled(true);
        let out = OutputConfig::with_color();
        let painted = out.warning("careful");
        assert!(painted.contains("careful"));
        assert_ne!(painted, "careful");
    }
}
