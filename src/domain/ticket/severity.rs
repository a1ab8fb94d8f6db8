//! Ticket severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of the reported problem, as classified by the AI workflow.
///
/// Wire values are the Romanian labels the workflow produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "scăzută", alias = "scazuta")]
    Scazuta,
    #[serde(rename = "medie")]
    Medie,
    #[serde(rename = "ridicată", alias = "ridicata")]
    Ridicata,
    #[serde(rename = "critică", alias = "critica")]
    Critica,
}

impl Severity {
    /// Lenient parse from workflow output.
    ///
    /// Accepts diacritic and plain spellings, case-insensitive. Unknown
    /// labels yield `None` so a bad value drops out of the fragment
    /// instead of failing the whole turn.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "scăzută" | "scazuta" => Some(Self::Scazuta),
            "medie" => Some(Self::Medie),
            "ridicată" | "ridicata" => Some(Self::Ridicata),
            "critică" | "critica" => Some(Self::Critica),
            _ => None,
        }
    }

    /// The canonical wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scazuta => "scăzută",
            Self::Medie => "medie",
            Self::Ridicata => "ridicată",
            Self::Critica => "critică",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
