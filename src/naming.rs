//! Case naming
//!
//! Pure mapping from a root-to-leaf context path, a trigger description and an
//! outcome description to the multi-line display name handed to the host.

use crate::tree::Label;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Line terminator used when joining name lines.
///
/// Hosts match case names as exact strings, so producer and consumer must agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Crlf,
    Lf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

impl std::str::FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crlf" => Ok(LineEnding::Crlf),
            "lf" => Ok(LineEnding::Lf),
            other => Err(format!(
                "Invalid line ending: {} (must be 'crlf' or 'lf')",
                other
            )),
        }
    }
}

/// Joining word placed before a context description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    Given,
    And,
    But,
}

impl Conjunction {
    /// Prefix as rendered, including indentation for joining words.
    pub fn prefix(self) -> &'static str {
        match self {
            Conjunction::Given => "given ",
            Conjunction::And => "  and ",
            Conjunction::But => "  but ",
        }
    }

    /// Conjunction for a context at `first` position or later, honouring an
    /// explicit choice only after the first named line.
    pub fn resolve(explicit: Option<Conjunction>, first: bool) -> Conjunction {
        if first {
            Conjunction::Given
        } else {
            explicit.unwrap_or(Conjunction::And)
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix().trim())
    }
}

/// Render the shared part of every case name at one leaf: the named context
/// lines followed by the `when` line.
pub fn leaf_prefix<'a, I>(contexts: I, trigger: &str, line_ending: LineEnding) -> String
where
    I: IntoIterator<Item = (&'a Label, Option<Conjunction>)>,
{
    let eol = line_ending.as_str();
    let mut text = String::new();
    let mut first = true;
    for (label, explicit) in contexts {
        let Some(description) = label.description() else {
            continue;
        };
        text.push_str(Conjunction::resolve(explicit, first).prefix());
        text.push_str(description);
        text.push_str(eol);
        first = false;
    }
    text.push_str("when ");
    text.push_str(trigger);
    text.push_str(eol);
    text
}

/// Complete a leaf prefix with one outcome line.
pub fn case_name(prefix: &str, outcome: &str, line_ending: LineEnding) -> String {
    format!("{}then {}{}", prefix, outcome, line_ending.as_str())
}
