//! PDF/A conformance levels and the profile identifiers used in reports.

use std::fmt;
use std::str::FromStr;

/// PDF/A part and conformance letter, e.g. PDF/A-1b.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Conformance {
    A1a,
    #[default]
    A1b,
    A2a,
    A2b,
    A2u,
    A3a,
    A3b,
    A3u,
}

impl Conformance {
    pub const ALL: [Conformance; 8] = [
        Conformance::A1a,
        Conformance::A1b,
        Conformance::A2a,
        Conformance::A2b,
        Conformance::A2u,
        Conformance::A3a,
        Conformance::A3b,
        Conformance::A3u,
    ];

    /// Short tag such as `1b`, used in configuration and profile identifiers
    pub fn tag(&self) -> &'static str {
        match self {
            Conformance::A1a => "1a",
            Conformance::A1b => "1b",
            Conformance::A2a => "2a",
            Conformance::A2b => "2b",
            Conformance::A2u => "2u",
            Conformance::A3a => "3a",
            Conformance::A3b => "3b",
            Conformance::A3u => "3u",
        }
    }
}

impl fmt::Display for Conformance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PDF/A-{}", self.tag())
    }
}

impl FromStr for Conformance {
    type Err = String;

    /// Accepts `1b`, `pdfa1b`, `pdfa-1b` and `PDF/A-1b`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let tag = lowered
            .strip_prefix("pdf/a-")
            .or_else(|| lowered.strip_prefix("pdfa-"))
            .or_else(|| lowered.strip_prefix("pdfa"))
            .unwrap_or(&lowered);

        Conformance::ALL
            .into_iter()
            .find(|level| level.tag() == tag)
            .ok_or_else(|| format!("unknown PDF/A conformance level '{}'", s))
    }
}

/// Target profile of a validation run.
///
/// A fixed profile is rendered with the pass/fail `<result>` XML shape, a
/// parametric profile with the metadata-carrying preflight shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    Fixed(Conformance),
    Parametric(Conformance),
}

impl Profile {
    pub fn conformance(&self) -> Conformance {
        match self {
            Profile::Fixed(level) | Profile::Parametric(level) => *level,
        }
    }

    pub fn is_parametric(&self) -> bool {
        matches!(self, Profile::Parametric(_))
    }

    /// Identifier used as XML attribute name: `pdfa1b` or `pdfa_1b_`
    pub fn id(&self) -> String {
        match self {
            Profile::Fixed(level) => format!("pdfa{}", level.tag()),
            Profile::Parametric(level) => format!("pdfa_{}_", level.tag()),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.conformance().fmt(f)
    }
}
