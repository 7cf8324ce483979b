use std::fmt;
use std::str::FromStr;

/// Group key used for stones whose stored category is missing or unrecognised
pub const UNKNOWN_CHAKRA: &str = "unknown";

/// Prefix the front end uses for its diagram zone ids (`svg-crown`, ...)
const ZONE_PREFIX: &str = "svg-";

/// The fixed set of chakra categories a stone can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Chakra {
    Root,
    Sacral,
    SolarPlexus,
    Heart,
    Throat,
    ThirdEye,
    Crown,
    Secondary,
}

impl Chakra {
    pub const ALL: [Chakra; 8] = [
        Chakra::Root,
        Chakra::Sacral,
        Chakra::SolarPlexus,
        Chakra::Heart,
        Chakra::Throat,
        Chakra::ThirdEye,
        Chakra::Crown,
        Chakra::Secondary,
    ];

    /// Bare category name, e.g. `solar-plexus`
    pub fn name(&self) -> &'static str {
        match self {
            Chakra::Root => "root",
            Chakra::Sacral => "sacral",
            Chakra::SolarPlexus => "solar-plexus",
            Chakra::Heart => "heart",
            Chakra::Throat => "throat",
            Chakra::ThirdEye => "third-eye",
            Chakra::Crown => "crown",
            Chakra::Secondary => "secondary",
        }
    }

    /// Canonical stored form, matching the diagram zone id (`svg-solar-plexus`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Chakra::Root => "svg-root",
            Chakra::Sacral => "svg-sacral",
            Chakra::SolarPlexus => "svg-solar-plexus",
            Chakra::Heart => "svg-heart",
            Chakra::Throat => "svg-throat",
            Chakra::ThirdEye => "svg-third-eye",
            Chakra::Crown => "svg-crown",
            Chakra::Secondary => "svg-secondary",
        }
    }

    /// Parse either the bare name or the `svg-` zone id
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let bare = trimmed.strip_prefix(ZONE_PREFIX).unwrap_or(trimmed);
        Self::ALL.iter().copied().find(|chakra| chakra.name() == bare)
    }

    /// Key a stored category value is grouped under on list reads
    pub fn group_key(stored: Option<&str>) -> String {
        stored
            .and_then(Self::parse)
            .map(|chakra| chakra.as_str().to_string())
            .unwrap_or_else(|| UNKNOWN_CHAKRA.to_string())
    }
}

impl fmt::Display for Chakra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chakra {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| s.to_string())
    }
}
