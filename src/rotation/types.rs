//! Identifiers shared by every layer: formations, situations, arrow styles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Valid rotation numbers (1-indexed serve order arrangements)
pub const ROTATIONS: std::ops::RangeInclusive<u8> = 1..=6;

/// True if `rotation` is one of the six serve arrangements
pub fn is_valid_rotation(rotation: u8) -> bool {
    ROTATIONS.contains(&rotation)
}

/// Team alignment scheme. Root scope for all rotation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formation {
    #[serde(rename = "F6_2")]
    SixTwo,
    #[serde(rename = "F5_1")]
    FiveOne,
    #[serde(rename = "F4_2")]
    FourTwo,
}

impl Formation {
    pub const ALL: [Formation; 3] = [Formation::SixTwo, Formation::FiveOne, Formation::FourTwo];

    /// Identifier used in store keys and template files
    pub fn key(self) -> &'static str {
        match self {
            Formation::SixTwo => "F6_2",
            Formation::FiveOne => "F5_1",
            Formation::FourTwo => "F4_2",
        }
    }

    /// Coach-facing name
    pub fn title(self) -> &'static str {
        match self {
            Formation::SixTwo => "6-2",
            Formation::FiveOne => "5-1",
            Formation::FourTwo => "4-2",
        }
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Formation {
    type Err = String;

    /// Accepts either the key ("F6_2") or the title ("6-2")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Formation::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(s) || f.title() == s)
            .ok_or_else(|| format!("Unknown formation '{}'", s))
    }
}

/// Tactical phase within a formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Situation {
    Rotation,
    ServeStack,
    ServeReceiveStack,
    ReadyToAttack,
    BaseDefense,
}

impl Situation {
    /// Every selectable situation, in button order
    pub const ALL: [Situation; 5] = [
        Situation::Rotation,
        Situation::ServeStack,
        Situation::ServeReceiveStack,
        Situation::ReadyToAttack,
        Situation::BaseDefense,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Situation::Rotation => "Rotation",
            Situation::ServeStack => "ServeStack",
            Situation::ServeReceiveStack => "ServeReceiveStack",
            Situation::ReadyToAttack => "ReadyToAttack",
            Situation::BaseDefense => "BaseDefense",
        }
    }

    /// Button label with the camel case split into words
    pub fn label(self) -> String {
        let mut label = String::new();
        for (i, c) in self.key().chars().enumerate() {
            if i > 0 && c.is_ascii_uppercase() {
                label.push(' ');
            }
            label.push(c);
        }
        label
    }

    /// Position in [`Situation::ALL`]
    pub fn index(self) -> usize {
        Situation::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Situation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Situation::ALL
            .into_iter()
            .find(|sit| sit.key().eq_ignore_ascii_case(s) || sit.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown situation '{}'", s))
    }
}

/// Arrow head style drawn at the end of a transition arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArrowType {
    #[default]
    RedPoint,
    GreenPoint,
    BlueZip,
    #[serde(alias = "None")]
    Hidden,
}

impl ArrowType {
    pub const ALL: [ArrowType; 4] = [
        ArrowType::RedPoint,
        ArrowType::GreenPoint,
        ArrowType::BlueZip,
        ArrowType::Hidden,
    ];
}

impl FromStr for ArrowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "RedPoint" => Ok(ArrowType::RedPoint),
            "GreenPoint" => Ok(ArrowType::GreenPoint),
            "BlueZip" => Ok(ArrowType::BlueZip),
            "Hidden" | "None" => Ok(ArrowType::Hidden),
            other => Err(format!("Unknown arrow type '{}'", other)),
        }
    }
}

/// Segment style for the body of a transition arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SegmentType {
    #[default]
    RedRect,
    GreenTube,
    BlueZip,
    #[serde(alias = "None")]
    Hidden,
}

impl SegmentType {
    pub const ALL: [SegmentType; 4] = [
        SegmentType::RedRect,
        SegmentType::GreenTube,
        SegmentType::BlueZip,
        SegmentType::Hidden,
    ];
}

impl FromStr for SegmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "RedRect" => Ok(SegmentType::RedRect),
            "GreenTube" => Ok(SegmentType::GreenTube),
            "BlueZip" => Ok(SegmentType::BlueZip),
            "Hidden" | "None" => Ok(SegmentType::Hidden),
            other => Err(format!("Unknown segment type '{}'", other)),
        }
    }
}
