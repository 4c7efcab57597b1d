//! Catalog of named Game of Life patterns.
//!
//! Each pattern is a fixed list of `(row, col)` offsets from an implicit
//! origin. Stamping a pattern onto a grid is done by
//! [`Grid::stamp`](crate::compute::Grid::stamp).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// `(row, col)` offset of an alive cell relative to the pattern origin.
pub type Offset = (usize, usize);

const GLIDER: &[Offset] = &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

const BLINKER: &[Offset] = &[(1, 0), (1, 1), (1, 2)];

const TOAD: &[Offset] = &[(1, 0), (1, 1), (1, 2), (0, 2), (0, 3), (0, 4)];

const BEACON: &[Offset] = &[
    (1, 1),
    (1, 2),
    (2, 1),
    (2, 2),
    (0, 0),
    (0, 1),
    (1, 0),
    (2, 0),
];

#[rustfmt::skip]
const PULSAR: &[Offset] = &[
    (2, 1), (2, 2), (2, 3),
    (3, 1), (3, 2), (3, 3),
    (4, 1), (4, 2), (4, 3),
    (1, 4), (2, 4), (3, 4),
    (4, 4), (5, 1), (5, 2),
    (5, 3), (1, 2), (1, 3),
];

/// Gosper glider gun, 36 cells in a 9x36 box.
#[rustfmt::skip]
const GLIDER_GUN: &[Offset] = &[
    (0, 24),
    (1, 22), (1, 24),
    (2, 12), (2, 13), (2, 20), (2, 21), (2, 34), (2, 35),
    (3, 11), (3, 15), (3, 20), (3, 21), (3, 34), (3, 35),
    (4, 0), (4, 1), (4, 10), (4, 16), (4, 20), (4, 21),
    (5, 0), (5, 1), (5, 10), (5, 14), (5, 16), (5, 17), (5, 22), (5, 24),
    (6, 10), (6, 16), (6, 24),
    (7, 11), (7, 15),
    (8, 12), (8, 13),
];

/// Altered 24-cell gun table, kept alongside the classical one.
#[rustfmt::skip]
const GLIDER_GUN_ALT: &[Offset] = &[
    (5, 1), (5, 2), (6, 1), (6, 2),
    (5, 11), (6, 11), (7, 11), (4, 12),
    (5, 12), (6, 12), (5, 13), (6, 13),
    (7, 12), (7, 13), (8, 12), (8, 13),
    (9, 11), (10, 11), (9, 12), (10, 12),
    (11, 11), (11, 12), (12, 11), (12, 12),
];

/// Identifier of a catalog pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternName {
    Glider,
    Blinker,
    Toad,
    Beacon,
    Pulsar,
    GliderGun,
    GliderGunAlt,
}

impl PatternName {
    /// Every catalog entry, in display order.
    pub const ALL: [PatternName; 7] = [
        PatternName::Glider,
        PatternName::Blinker,
        PatternName::Toad,
        PatternName::Beacon,
        PatternName::Pulsar,
        PatternName::GliderGun,
        PatternName::GliderGunAlt,
    ];

    /// Human-readable name.
    pub fn as_str(self) -> &'static str {
        match self {
            PatternName::Glider => "Glider",
            PatternName::Blinker => "Blinker",
            PatternName::Toad => "Toad",
            PatternName::Beacon => "Beacon",
            PatternName::Pulsar => "Pulsar",
            PatternName::GliderGun => "Glider Gun",
            PatternName::GliderGunAlt => "Glider Gun Alt",
        }
    }

    /// Alive-cell offsets of this pattern.
    pub fn cells(self) -> &'static [Offset] {
        match self {
            PatternName::Glider => GLIDER,
            PatternName::Blinker => BLINKER,
            PatternName::Toad => TOAD,
            PatternName::Beacon => BEACON,
            PatternName::Pulsar => PULSAR,
            PatternName::GliderGun => GLIDER_GUN,
            PatternName::GliderGunAlt => GLIDER_GUN_ALT,
        }
    }
}

impl fmt::Display for PatternName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternName {
    type Err = PatternError;

    /// Case-insensitive; spaces, `-` and `_` are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "glider" => Ok(PatternName::Glider),
            "blinker" => Ok(PatternName::Blinker),
            "toad" => Ok(PatternName::Toad),
            "beacon" => Ok(PatternName::Beacon),
            "pulsar" => Ok(PatternName::Pulsar),
            "glidergun" => Ok(PatternName::GliderGun),
            "glidergunalt" => Ok(PatternName::GliderGunAlt),
            _ => Err(PatternError::UnknownPattern(s.to_string())),
        }
    }
}

/// Look up a pattern's offsets by name.
pub fn lookup(name: &str) -> Result<&'static [Offset], PatternError> {
    name.parse::<PatternName>().map(PatternName::cells)
}

/// Pattern catalog errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("Unknown pattern: {0:?}")]
    UnknownPattern(String),
}
