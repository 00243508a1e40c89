//! User settings and preferences
//!
//! Stored in the `[settings]` table of the config file.

use serde::{Deserialize, Serialize};

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Display width used when formatting SQL for listings
    #[serde(default = "default_format_width")]
    pub format_width: usize,

    /// Row limit used by `pam explore` when `--limit` is not given
    #[serde(default = "default_row_limit")]
    pub row_limit: usize,
}

fn default_format_width() -> usize {
    80
}

fn default_row_limit() -> usize {
    1000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format_width: default_format_width(),
            row_limit: default_row_limit(),
        }
    }
}
