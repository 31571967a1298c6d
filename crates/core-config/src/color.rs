//! Color names as written in `oxcmd.toml`.
//!
//! A spec is `"<fg>"` or `"<fg> on <bg>"` where each side is `default`, one of
//! the eight base names, or a `bright-` prefixed name. The renderer turns a
//! spec into embedded color tokens; nothing here knows the attribute layout.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown color name `{0}`")]
    UnknownColor(String),
    #[error("empty color spec")]
    EmptyColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorName {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl ColorName {
    /// Red, green and blue components making up this color.
    pub fn components(self) -> (bool, bool, bool) {
        match self {
            ColorName::Black => (false, false, false),
            ColorName::Red => (true, false, false),
            ColorName::Green => (false, true, false),
            ColorName::Yellow => (true, true, false),
            ColorName::Blue => (false, false, true),
            ColorName::Magenta => (true, false, true),
            ColorName::Cyan => (false, true, true),
            ColorName::White => (true, true, true),
        }
    }

    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "black" => ColorName::Black,
            "red" => ColorName::Red,
            "green" => ColorName::Green,
            "yellow" => ColorName::Yellow,
            "blue" => ColorName::Blue,
            "magenta" => ColorName::Magenta,
            "cyan" => ColorName::Cyan,
            "white" => ColorName::White,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shade {
    pub name: ColorName,
    pub bright: bool,
}

impl Shade {
    pub const fn normal(name: ColorName) -> Self {
        Self {
            name,
            bright: false,
        }
    }
    pub const fn bright(name: ColorName) -> Self {
        Self { name, bright: true }
    }
}

impl FromStr for Shade {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (bright, base) = match lower.strip_prefix("bright-") {
            Some(rest) => (true, rest),
            None => (false, lower.as_str()),
        };
        ColorName::parse(base)
            .map(|name| Shade { name, bright })
            .ok_or_else(|| ConfigError::UnknownColor(s.trim().to_string()))
    }
}

/// Foreground/background pair; `None` keeps the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub struct ColorSpec {
    pub fg: Option<Shade>,
    pub bg: Option<Shade>,
}

impl ColorSpec {
    pub const fn fg(fg: Shade) -> Self {
        Self {
            fg: Some(fg),
            bg: None,
        }
    }
    pub const fn fg_on_bg(fg: Shade, bg: Shade) -> Self {
        Self {
            fg: Some(fg),
            bg: Some(bg),
        }
    }
}

fn parse_side(s: &str) -> Result<Option<Shade>, ConfigError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("default") {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

impl FromStr for ColorSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::EmptyColor);
        }
        match s.split_once(" on ") {
            Some((fg, bg)) => Ok(Self {
                fg: parse_side(fg)?,
                bg: parse_side(bg)?,
            }),
            None => Ok(Self {
                fg: parse_side(s)?,
                bg: None,
            }),
        }
    }
}

impl TryFrom<String> for ColorSpec {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Shade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bright {
            f.write_str("bright-")?;
        }
        write!(f, "{}", format!("{:?}", self.name).to_ascii_lowercase())
    }
}
