//! The canonical rights-type codes.
//!
//! Rights assignment accepts one of a closed set of type codes. Each code
//! maps to a fixed human-readable label used for indexing and for building
//! selection lists in administrative interfaces. String codes are parsed
//! into [`RightsType`] at the boundary; nothing downstream compares raw
//! strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RightsError;

/// A reading-room location with restricted access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Special Collections.
    Spec,
    /// Music Library.
    Music,
    /// Archive of Recorded Sound.
    Ars,
    /// Art Library.
    Art,
    /// Hoover Library.
    Hoover,
    /// Media & Microtext.
    #[serde(rename = "m&m")]
    MediaAndMicrotext,
}

impl Location {
    /// Every known location.
    pub const ALL: [Self; 6] = [
        Self::Spec,
        Self::Music,
        Self::Ars,
        Self::Art,
        Self::Hoover,
        Self::MediaAndMicrotext,
    ];

    /// The location code used in `loc:` rights types.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Spec => "spec",
            Self::Music => "music",
            Self::Ars => "ars",
            Self::Art => "art",
            Self::Hoover => "hoover",
            Self::MediaAndMicrotext => "m&m",
        }
    }

    /// The human-readable location name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Spec => "Special Collections",
            Self::Music => "Music Library",
            Self::Ars => "Archive of Recorded Sound",
            Self::Art => "Art Library",
            Self::Hoover => "Hoover Library",
            Self::MediaAndMicrotext => "Media & Microtext",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|loc| loc.code() == code)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A canonical rights-type code.
///
/// The closed set: `world`, `world-nd`, `stanford`, `stanford-nd`,
/// `loc:<location>` for the six known locations, `dark`, and `none`.
/// The `-nd` suffix is the no-download modifier, not a distinct class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RightsType {
    /// World-readable.
    World {
        /// Viewing only, no download.
        no_download: bool,
    },
    /// Readable by the stanford group.
    Stanford {
        /// Viewing only, no download.
        no_download: bool,
    },
    /// Readable only at a named location.
    Location(Location),
    /// Neither discoverable nor readable (preserve only).
    Dark,
    /// Discoverable but not readable (citation only).
    Citation,
}

impl RightsType {
    /// Every canonical type code, paired with its human label.
    ///
    /// Key order matches the original selection-list ordering.
    #[must_use]
    pub fn catalog() -> Vec<(Self, &'static str)> {
        let mut entries = vec![
            (Self::World { no_download: false }, "World"),
            (Self::World { no_download: true }, "World (no-download)"),
            (Self::Stanford { no_download: false }, "Stanford"),
            (Self::Stanford { no_download: true }, "Stanford (no-download)"),
        ];
        for loc in Location::ALL {
            entries.push((Self::Location(loc), Self::location_label(loc)));
        }
        entries.push((Self::Dark, "Dark (Preserve Only)"));
        entries.push((Self::Citation, "Citation Only"));
        entries
    }

    /// The string code for this type (e.g. `world-nd`, `loc:spec`).
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::World { no_download: false } => "world".to_string(),
            Self::World { no_download: true } => "world-nd".to_string(),
            Self::Stanford { no_download: false } => "stanford".to_string(),
            Self::Stanford { no_download: true } => "stanford-nd".to_string(),
            Self::Location(loc) => format!("loc:{}", loc.code()),
            Self::Dark => "dark".to_string(),
            Self::Citation => "none".to_string(),
        }
    }

    /// The fixed human-readable label for this type.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::World { no_download: false } => "World",
            Self::World { no_download: true } => "World (no-download)",
            Self::Stanford { no_download: false } => "Stanford",
            Self::Stanford { no_download: true } => "Stanford (no-download)",
            Self::Location(loc) => Self::location_label(*loc),
            Self::Dark => "Dark (Preserve Only)",
            Self::Citation => "Citation Only",
        }
    }

    /// Returns true if `code` names a canonical rights type.
    #[must_use]
    pub fn is_valid_code(code: &str) -> bool {
        code.parse::<Self>().is_ok()
    }

    const fn location_label(loc: Location) -> &'static str {
        match loc {
            Location::Spec => "Location: Special Collections",
            Location::Music => "Location: Music Library",
            Location::Ars => "Location: Archive of Recorded Sound",
            Location::Art => "Location: Art Library",
            Location::Hoover => "Location: Hoover Library",
            Location::MediaAndMicrotext => "Location: Media & Microtext",
        }
    }
}

impl fmt::Display for RightsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for RightsType {
    type Err = RightsError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let unknown = || RightsError::UnknownRightsType {
            code: code.to_string(),
        };
        match code {
            "world" => Ok(Self::World { no_download: false }),
            "world-nd" => Ok(Self::World { no_download: true }),
            "stanford" => Ok(Self::Stanford { no_download: false }),
            "stanford-nd" => Ok(Self::Stanford { no_download: true }),
            "dark" => Ok(Self::Dark),
            "none" => Ok(Self::Citation),
            _ => {
                let loc = code.strip_prefix("loc:").ok_or_else(unknown)?;
                Location::from_code(loc).map(Self::Location).ok_or_else(unknown)
            }
        }
    }
}

impl TryFrom<String> for RightsType {
    type Error = RightsError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

impl From<RightsType> for String {
    fn from(rights: RightsType) -> Self {
        rights.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip_through_parsing() {
        for (rights, _) in RightsType::catalog() {
            let parsed: RightsType = rights.code().parse().unwrap();
            assert_eq!(parsed, rights);
        }
    }

    #[test]
    fn catalog_covers_all_twelve_codes() {
        let codes: Vec<String> = RightsType::catalog()
            .into_iter()
            .map(|(t, _)| t.code())
            .collect();
        assert_eq!(
            codes,
            vec![
                "world",
                "world-nd",
                "stanford",
                "stanford-nd",
                "loc:spec",
                "loc:music",
                "loc:ars",
                "loc:art",
                "loc:hoover",
                "loc:m&m",
                "dark",
                "none",
            ]
        );
    }

    #[test]
    fn labels_match_catalog_entries() {
        for (rights, label) in RightsType::catalog() {
            assert_eq!(rights.label(), label);
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        for bad in ["worldwide", "loc:basement", "stanford-nd-extra", "", "loc:"] {
            let err = bad.parse::<RightsType>().unwrap_err();
            assert!(matches!(err, RightsError::UnknownRightsType { .. }), "{bad}");
        }
        assert!(!RightsType::is_valid_code("worldwide"));
        assert!(RightsType::is_valid_code("loc:m&m"));
    }

    #[test]
    fn serde_uses_the_string_codes() {
        let json = serde_json::to_string(&RightsType::Location(Location::Spec)).unwrap();
        assert_eq!(json, "\"loc:spec\"");
        let back: RightsType = serde_json::from_str("\"world-nd\"").unwrap();
        assert_eq!(back, RightsType::World { no_download: true });
    }
}
