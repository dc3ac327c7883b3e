use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Explanation style controlling the system instruction sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplainLevel {
    /// Plain language, no jargon.
    #[default]
    Simple,
    /// Comprehensive, with key concepts and nuances.
    Detailed,
    /// As if talking to a five-year-old.
    Eli5,
}

impl ExplainLevel {
    /// The fixed system instruction for this level.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Simple => {
                "Explain this simply and clearly. Avoid jargon and technical terms. \
                 Use everyday language that anyone can understand."
            }
            Self::Detailed => {
                "Provide a detailed explanation. Include key concepts, context, and nuances. \
                 Make it comprehensive but still accessible."
            }
            Self::Eli5 => {
                "Explain this like you're talking to a 5-year-old. Use very simple concepts, \
                 analogies, and avoid all technical terms. Be playful and engaging."
            }
        }
    }

    /// The wire and CLI name of this level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Detailed => "detailed",
            Self::Eli5 => "eli5",
        }
    }
}

impl fmt::Display for ExplainLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExplainLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "detailed" => Ok(Self::Detailed),
            "eli5" => Ok(Self::Eli5),
            other => Err(format!("unknown explanation level: {other}")),
        }
    }
}
