//! Keyframe selector parsing.
//!
//! A selector is the key of a keyframe step, a comma separated list of
//! offsets such as `"0%, 20%"`, `"from"` or `"to"`.

use crate::config::KeyframeSteps;
use crate::errors::{ConfigError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)%$").expect("valid percentage regex"));

/// A parsed keyframe selector
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeSelector {
    /// Offsets in percent, in the order they were written
    pub offsets: Vec<f64>,
}

impl KeyframeSelector {
    pub fn parse(selector: &str) -> Result<Self> {
        let invalid = |message: String| ConfigError::InvalidSelector {
            selector: selector.to_string(),
            message,
        };

        let mut offsets = Vec::new();
        for item in selector.split(',') {
            let item = item.trim();
            let offset = match item {
                "" => return Err(invalid("empty offset".to_string())),
                "from" => 0.0,
                "to" => 100.0,
                _ => {
                    let caps = PERCENTAGE
                        .captures(item)
                        .ok_or_else(|| invalid(format!("`{}` is not a percentage", item)))?;
                    caps[1]
                        .parse::<f64>()
                        .map_err(|e| invalid(format!("`{}`: {}", item, e)))?
                }
            };
            if offset > 100.0 {
                return Err(invalid(format!("`{}` is outside 0%..100%", item)));
            }
            offsets.push(offset);
        }

        Ok(Self { offsets })
    }
}

impl fmt::Display for KeyframeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, offset) in self.offsets.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}%", offset)?;
        }
        Ok(())
    }
}

/// Flattened offsets of a keyframe set
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    /// Offsets in declaration order with repeats removed
    pub offsets: Vec<f64>,
}

impl Timeline {
    pub fn is_strictly_increasing(&self) -> bool {
        self.offsets.windows(2).all(|w| w[0] < w[1])
    }

    pub fn starts_at_zero(&self) -> bool {
        self.offsets.contains(&0.0)
    }

    pub fn ends_at_hundred(&self) -> bool {
        self.offsets.contains(&100.0)
    }
}

/// Flatten every selector of a keyframe set into a timeline.
pub fn timeline(steps: &KeyframeSteps) -> Result<Timeline> {
    let mut offsets: Vec<f64> = Vec::new();
    for selector in steps.keys() {
        for offset in KeyframeSelector::parse(selector)?.offsets {
            if !offsets.contains(&offset) {
                offsets.push(offset);
            }
        }
    }
    Ok(Timeline { offsets })
}
