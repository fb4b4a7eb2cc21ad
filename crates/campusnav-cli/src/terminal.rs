//! Terminal styling and color utilities.
//!
//! ANSI escape codes and capability detection for the text output of the
//! CLI. Colors are dropped entirely when the terminal cannot show them.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    /// Bold reverse green for WALK tags.
    pub const TAG_WALK: &str = "\x1b[1;7;32m";
    /// Bold reverse cyan for TRANSIT tags.
    pub const TAG_TRANSIT: &str = "\x1b[1;7;36m";
    /// Bold reverse magenta for any other travel mode.
    pub const TAG_OTHER: &str = "\x1b[1;7;35m";

    /// Bright bold white for headings and building names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary elements.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for distances.
    pub const CYAN: &str = "\x1b[36m";
    /// Green for durations and ETAs.
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow for shuttle departures and warnings.
    pub const YELLOW: &str = "\x1b[33m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color
/// is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_walk: &'static str,
    pub tag_transit: &'static str,
    pub tag_other: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_walk: colors::TAG_WALK,
            tag_transit: colors::TAG_TRANSIT,
            tag_other: colors::TAG_OTHER,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
            yellow: colors::YELLOW,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_walk: "",
            tag_transit: "",
            tag_other: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
            yellow: "",
        }
    }

    /// `colored()` when the terminal supports ANSI colors, else `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Tag color for a provider step travel mode (`WALK`, `TRANSIT`, ...).
    #[must_use]
    pub fn tag_for(&self, travel_mode: &str) -> &'static str {
        match travel_mode.to_ascii_uppercase().as_str() {
            "WALK" | "WALKING" => self.tag_walk,
            "TRANSIT" => self.tag_transit,
            _ => self.tag_other,
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects the `NO_COLOR` environment variable (https://no-color.org/)
/// and the `TERM=dumb` convention.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    /// Environment variables are process-global; serialize tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let saved: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var_os(k))).collect();

        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        let result = f();

        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
        result
    }

    #[test]
    fn plain_palette_is_empty() {
        let p = ColorPalette::plain();
        assert!(p.reset.is_empty());
        assert!(p.tag_for("WALK").is_empty());
    }

    #[test]
    fn tags_follow_travel_mode() {
        let p = ColorPalette::colored();
        assert_eq!(p.tag_for("walking"), colors::TAG_WALK);
        assert_eq!(p.tag_for("TRANSIT"), colors::TAG_TRANSIT);
        assert_eq!(p.tag_for("DRIVING"), colors::TAG_OTHER);
    }

    #[test]
    fn no_color_disables_colors() {
        with_env_vars(&[("NO_COLOR", Some("1")), ("TERM", None)], || {
            assert!(!supports_color());
        });
    }

    #[test]
    fn dumb_terminal_disables_colors() {
        with_env_vars(&[("NO_COLOR", None), ("TERM", Some("dumb"))], || {
            assert!(!supports_color());
        });
    }

    #[test]
    fn regular_terminal_supports_colors() {
        with_env_vars(
            &[("NO_COLOR", None), ("TERM", Some("xterm-256color"))],
            || {
                assert!(supports_color());
            },
        );
    }
}
