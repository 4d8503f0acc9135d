//! Consistency checks over a [`TailwindConfig`].

use crate::animation::AnimationShorthand;
use crate::config::TailwindConfig;
use crate::content::{self, ContentKind};
use crate::keyframes;
use serde::Serialize;
use std::fmt;

/// CSS generic font families accepted as the last entry of a font stack
const GENERIC_FAMILIES: [&str; 13] = [
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "ui-serif",
    "ui-sans-serif",
    "ui-monospace",
    "ui-rounded",
    "math",
    "emoji",
    "fangsong",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// Dotted path of the offending entry, e.g. `theme.extend.animation.spin`
    pub path: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}: {}", level, self.path, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        });
    }

    fn warning(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        });
    }

    /// True when no error-level issue was found
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

/// Run every check against the configuration
pub fn validate(config: &TailwindConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_content(config, &mut report);
    check_font_families(config, &mut report);
    check_keyframes(config, &mut report);
    check_animations(config, &mut report);
    tracing::debug!(
        issues = report.issues.len(),
        valid = report.is_valid(),
        "validated configuration"
    );
    report
}

fn check_content(config: &TailwindConfig, report: &mut ValidationReport) {
    if config.content.is_empty() {
        report.warning("content", "no content patterns, nothing will be scanned");
        return;
    }

    for (i, pattern) in config.content.iter().enumerate() {
        let path = format!("content[{}]", i);
        if pattern.trim().is_empty() {
            report.error(path, "empty content pattern");
        } else if let Err(e) = glob::Pattern::new(pattern) {
            report.error(path, format!("invalid glob `{}`: {}", pattern, e));
        }
    }

    let coverage = content::coverage(&config.content);
    if !coverage.contains(&ContentKind::Markup) && !coverage.contains(&ContentKind::Script) {
        report.warning("content", "no pattern targets a template or script file extension");
    }
}

fn check_font_families(config: &TailwindConfig, report: &mut ValidationReport) {
    for (name, stack) in &config.theme.extend.font_family {
        let path = format!("theme.extend.fontFamily.{}", name);
        match stack.last() {
            None => report.error(path, "empty font stack"),
            Some(last) if !GENERIC_FAMILIES.contains(&last.trim()) => {
                report.warning(path, format!("font stack ends with `{}`, not a generic family", last))
            }
            Some(_) => {}
        }
    }
}

fn check_keyframes(config: &TailwindConfig, report: &mut ValidationReport) {
    let extend = &config.theme.extend;
    for (name, steps) in &extend.keyframes {
        let path = format!("theme.extend.keyframes.{}", name);

        let timeline = match keyframes::timeline(steps) {
            Ok(timeline) => timeline,
            Err(e) => {
                report.error(path, e.to_string());
                continue;
            }
        };

        if !timeline.is_strictly_increasing() {
            report.warning(path.clone(), "keyframe offsets are not in increasing order");
        }
        if !timeline.starts_at_zero() {
            report.warning(path.clone(), "no keyframe at 0%");
        }
        if !timeline.ends_at_hundred() {
            report.warning(path.clone(), "no keyframe at 100%");
        }

        let used = extend.animation.iter().any(|(key, value)| {
            key == name
                || AnimationShorthand::parse(value)
                    .map(|a| a.name.as_deref() == Some(name.as_str()))
                    .unwrap_or(false)
        });
        if !used {
            report.warning(path, "keyframes are not used by any animation");
        }
    }
}

fn check_animations(config: &TailwindConfig, report: &mut ValidationReport) {
    let extend = &config.theme.extend;
    for (name, value) in &extend.animation {
        let path = format!("theme.extend.animation.{}", name);

        if !extend.keyframes.contains_key(name) {
            report.error(path.clone(), format!("no keyframes named `{}`", name));
        }

        let shorthand = match AnimationShorthand::parse(value) {
            Ok(shorthand) => shorthand,
            Err(e) => {
                report.error(path, e.to_string());
                continue;
            }
        };

        match shorthand.duration_secs() {
            Some(secs) if secs > 0.0 => {}
            Some(_) => report.error(path.clone(), "duration must be positive"),
            None => report.error(path.clone(), "missing duration"),
        }

        match shorthand.name.as_deref() {
            Some(animation_name) if !extend.keyframes.contains_key(animation_name) => {
                report.error(path, format!("shorthand refers to undefined keyframes `{}`", animation_name))
            }
            Some(_) => {}
            None => report.warning(path, "shorthand does not name its keyframes"),
        }
    }
}
