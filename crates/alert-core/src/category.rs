//! Upstream category codes and the fixed type lookup table.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Code used for lookups when the upstream category is not numeric.
pub const NEUTRAL_CATEGORY: u32 = 0;

/// An upstream category code.
///
/// The live feed sends `cat` as a number or a numeric string and the history
/// feed sends `category` as either, so the code is kept as text and only
/// interpreted through [`CategoryCode::numeric`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CategoryCode(String);

impl CategoryCode {
    /// Create a code from its textual form.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_string())
    }

    /// The code as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric code, or [`NEUTRAL_CATEGORY`] when the code is not a number.
    pub fn numeric(&self) -> u32 {
        self.0.parse().unwrap_or(NEUTRAL_CATEGORY)
    }

    /// Resolve the alert type for this code.
    pub fn alert_type(&self) -> AlertType {
        AlertType::from_code(self.numeric())
    }
}

impl From<&str> for CategoryCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CategoryCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<u32> for CategoryCode {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CategoryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<u64>() {
            Ok(n) => serializer.serialize_u64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for CategoryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CodeVisitor;

        impl<'de> Visitor<'de> for CodeVisitor {
            type Value = CategoryCode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a category code as a number or string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(CategoryCode(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(CategoryCode(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(CategoryCode(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(CategoryCode::new(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(CategoryCode::default())
            }
        }

        deserializer.deserialize_any(CodeVisitor)
    }
}

/// Stable alert type labels resolved from category codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertType {
    Missiles,
    RadiologicalEvent,
    EarthQuake,
    Tsunami,
    HostileAircraftIntrusion,
    HazardousMaterials,
    TerroristInfiltration,
    MissilesDrill,
    EarthQuakeDrill,
    RadiologicalEventDrill,
    TsunamiDrill,
    HostileAircraftIntrusionDrill,
    HazardousMaterialsDrill,
    TerroristInfiltrationDrill,
    NewsFlash,
    Unknown,
}

impl AlertType {
    /// Look up the type for a numeric category code. Unlisted codes are `Unknown`.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Missiles,
            2 => Self::RadiologicalEvent,
            3 => Self::EarthQuake,
            4 => Self::Tsunami,
            5 => Self::HostileAircraftIntrusion,
            6 => Self::HazardousMaterials,
            7 => Self::TerroristInfiltration,
            8 => Self::MissilesDrill,
            9 => Self::EarthQuakeDrill,
            10 => Self::RadiologicalEventDrill,
            11 => Self::TsunamiDrill,
            12 => Self::HostileAircraftIntrusionDrill,
            13 => Self::HazardousMaterialsDrill,
            14 => Self::TerroristInfiltrationDrill,
            // Formerly "earlyWarning".
            20 => Self::NewsFlash,
            _ => Self::Unknown,
        }
    }

    /// The label as exposed to subscribers and stored with each alert.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missiles => "missiles",
            Self::RadiologicalEvent => "radiologicalEvent",
            Self::EarthQuake => "earthQuake",
            Self::Tsunami => "tsunami",
            Self::HostileAircraftIntrusion => "hostileAircraftIntrusion",
            Self::HazardousMaterials => "hazardousMaterials",
            Self::TerroristInfiltration => "terroristInfiltration",
            Self::MissilesDrill => "missilesDrill",
            Self::EarthQuakeDrill => "earthQuakeDrill",
            Self::RadiologicalEventDrill => "radiologicalEventDrill",
            Self::TsunamiDrill => "tsunamiDrill",
            Self::HostileAircraftIntrusionDrill => "hostileAircraftIntrusionDrill",
            Self::HazardousMaterialsDrill => "hazardousMaterialsDrill",
            Self::TerroristInfiltrationDrill => "terroristInfiltrationDrill",
            Self::NewsFlash => "newsFlash",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
