//! Line decoration flags
//!
//! Each bit switches one decoration on. Decorations always render in the
//! order time, file location, level name, regardless of how the flags were
//! combined.

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Set of decorations rendered in front of every message.
///
/// # Examples
///
/// ```
/// use leveled_logger::Flags;
///
/// let flags = Flags::TIME | Flags::LEVEL;
/// assert!(flags.contains(Flags::TIME));
/// assert!(!flags.contains(Flags::FILE));
/// assert_eq!(flags.bits(), 0b101);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flags(u8);

impl Flags {
    /// `[2025/01/08 10:30:45] `
    pub const TIME: Flags = Flags(0b001);
    /// `main.rs:42 `
    pub const FILE: Flags = Flags(0b010);
    /// `[Info] `
    pub const LEVEL: Flags = Flags(0b100);

    pub const fn empty() -> Self {
        Flags(0)
    }

    pub const fn all() -> Self {
        Flags(Self::TIME.0 | Self::FILE.0 | Self::LEVEL.0)
    }

    /// Build from raw bits, ignoring bits that name no decoration.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Flags(bits & Self::all().0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = [(Flags::TIME, "time"), (Flags::FILE, "file"), (Flags::LEVEL, "level")]
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&names.join("|"))
    }
}

/// Parses `time|file|level` style lists, plus `all` and `none`.
impl FromStr for Flags {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Flags::empty();
        for part in s.split(['|', ',']).map(str::trim).filter(|p| !p.is_empty()) {
            flags |= match part.to_lowercase().as_str() {
                "time" => Flags::TIME,
                "file" | "caller" => Flags::FILE,
                "level" => Flags::LEVEL,
                "all" => Flags::all(),
                "none" => Flags::empty(),
                _ => return Err(LoggerError::invalid_flags(part)),
            };
        }
        Ok(flags)
    }
}
