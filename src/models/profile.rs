use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_AVATAR_PATH: &str = "data/logo/kivy-icon-256.png";
const DEFAULT_PRIMARY_COLOR: &str = "Indigo";
const DEFAULT_MOTIVATION_TIME: &str = "09:00";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub avatar_path: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: String::new(),
            avatar_path: DEFAULT_AVATAR_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("unknown theme '{}' (Light, Dark)", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub notifications_enabled: bool,
    pub theme: Theme,
    pub primary_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            theme: Theme::Light,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
        }
    }
}

/// Streak bookkeeping plus the date the daily motivation was last sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motivation {
    pub last_studied: String,
    pub current_streak: u32,
    pub last_sent_date: String,
    pub time: String,
}

impl Default for Motivation {
    fn default() -> Self {
        Self {
            last_studied: String::new(),
            current_streak: 0,
            last_sent_date: String::new(),
            time: DEFAULT_MOTIVATION_TIME.to_string(),
        }
    }
}
