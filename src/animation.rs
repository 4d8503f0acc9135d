//! Parsing of the CSS `animation` shorthand used in `theme.extend.animation`.

use crate::errors::{ConfigError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?(?:\d+(?:\.\d+)?|\.\d+))(ms|s)$").expect("valid time regex"));

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+(?:\.\d+)?|\.\d+)$").expect("valid number regex"));

static FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z-]+)\((.*)\)$").expect("valid function regex"));

const TIMING_KEYWORDS: [&str; 7] = [
    "ease",
    "linear",
    "ease-in",
    "ease-out",
    "ease-in-out",
    "step-start",
    "step-end",
];
const DIRECTIONS: [&str; 4] = ["normal", "reverse", "alternate", "alternate-reverse"];
const FILL_MODES: [&str; 4] = ["none", "forwards", "backwards", "both"];
const PLAY_STATES: [&str; 2] = ["running", "paused"];
const STEP_POSITIONS: [&str; 6] = ["jump-start", "jump-end", "jump-none", "jump-both", "start", "end"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
}

/// A CSS `<time>` value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssTime {
    pub value: f64,
    pub unit: TimeUnit,
}

impl CssTime {
    pub fn parse(token: &str) -> Option<Self> {
        let caps = TIME.captures(token)?;
        let value = caps[1].parse().ok()?;
        let unit = if &caps[2] == "ms" { TimeUnit::Milliseconds } else { TimeUnit::Seconds };
        Some(Self { value, unit })
    }

    pub fn as_secs_f64(&self) -> f64 {
        match self.unit {
            TimeUnit::Seconds => self.value,
            TimeUnit::Milliseconds => self.value / 1000.0,
        }
    }
}

impl fmt::Display for CssTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            TimeUnit::Seconds => write!(f, "{}s", self.value),
            TimeUnit::Milliseconds => write!(f, "{}ms", self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimingFunction {
    Keyword(String),
    CubicBezier([f64; 4]),
    Steps { count: u32, position: Option<String> },
    /// `linear(...)` easing, kept verbatim
    Linear(String),
}

impl fmt::Display for TimingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(keyword) => f.write_str(keyword),
            Self::CubicBezier([x1, y1, x2, y2]) => write!(f, "cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2),
            Self::Steps { count, position: Some(position) } => write!(f, "steps({}, {})", count, position),
            Self::Steps { count, position: None } => write!(f, "steps({})", count),
            Self::Linear(args) => write!(f, "linear({})", args),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterationCount {
    Infinite,
    Count(f64),
}

impl fmt::Display for IterationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infinite => f.write_str("infinite"),
            Self::Count(n) => write!(f, "{}", n),
        }
    }
}

/// A parsed `animation` shorthand value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationShorthand {
    pub name: Option<String>,
    pub duration: Option<CssTime>,
    pub timing_function: Option<TimingFunction>,
    pub delay: Option<CssTime>,
    pub iteration_count: Option<IterationCount>,
    pub direction: Option<String>,
    pub fill_mode: Option<String>,
    pub play_state: Option<String>,
}

/// Split on whitespace that is not inside parentheses
fn tokenize(value: &str) -> std::result::Result<Vec<&str>, String> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = None;

    for (i, c) in value.char_indices() {
        match c {
            '(' => {
                depth += 1;
                start.get_or_insert(i);
            }
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| "unbalanced `)`".to_string())?;
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    tokens.push(&value[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if depth != 0 {
        return Err("unbalanced `(`".to_string());
    }
    if let Some(s) = start {
        tokens.push(&value[s..]);
    }
    Ok(tokens)
}

fn parse_numbers(args: &str) -> std::result::Result<Vec<f64>, String> {
    args.split(',')
        .map(|arg| {
            let arg = arg.trim();
            arg.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| format!("`{}` is not a number", arg))
        })
        .collect()
}

fn parse_timing_function(token: &str) -> std::result::Result<Option<TimingFunction>, String> {
    if TIMING_KEYWORDS.contains(&token) {
        return Ok(Some(TimingFunction::Keyword(token.to_string())));
    }
    let Some(caps) = FUNCTION.captures(token) else {
        return Ok(None);
    };
    let args = caps[2].trim();

    match &caps[1] {
        "cubic-bezier" => {
            let numbers = parse_numbers(args)?;
            let [x1, y1, x2, y2] = numbers[..] else {
                return Err(format!("cubic-bezier() takes 4 arguments, got {}", numbers.len()));
            };
            if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
                return Err("cubic-bezier() x values must be within 0..1".to_string());
            }
            Ok(Some(TimingFunction::CubicBezier([x1, y1, x2, y2])))
        }
        "steps" => {
            let mut parts = args.split(',').map(str::trim);
            let count = parts
                .next()
                .and_then(|c| c.parse::<u32>().ok())
                .filter(|c| *c > 0)
                .ok_or_else(|| "steps() needs a positive integer count".to_string())?;
            let position = parts.next().map(str::to_string);
            if let Some(position) = position.as_deref().filter(|p| !STEP_POSITIONS.contains(p)) {
                return Err(format!("unknown steps() position `{}`", position));
            }
            if parts.next().is_some() {
                return Err("steps() takes at most 2 arguments".to_string());
            }
            Ok(Some(TimingFunction::Steps { count, position }))
        }
        "linear" => Ok(Some(TimingFunction::Linear(args.to_string()))),
        other => Err(format!("unknown function `{}()`", other)),
    }
}

impl AnimationShorthand {
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = |message: String| ConfigError::InvalidAnimation {
            value: value.to_string(),
            message,
        };

        let tokens = tokenize(value).map_err(invalid)?;
        if tokens.is_empty() {
            return Err(invalid("empty value".to_string()));
        }

        let mut shorthand = Self::default();
        for token in tokens {
            if let Some(time) = CssTime::parse(token) {
                if shorthand.duration.is_none() {
                    shorthand.duration = Some(time);
                } else if shorthand.delay.is_none() {
                    shorthand.delay = Some(time);
                } else {
                    return Err(invalid(format!("unexpected third time value `{}`", token)));
                }
                continue;
            }

            if shorthand.timing_function.is_none() {
                if let Some(function) = parse_timing_function(token).map_err(invalid)? {
                    shorthand.timing_function = Some(function);
                    continue;
                }
            }

            if shorthand.iteration_count.is_none() {
                if token == "infinite" {
                    shorthand.iteration_count = Some(IterationCount::Infinite);
                    continue;
                }
                if NUMBER.is_match(token) {
                    let count = token.parse().map_err(|_| invalid(format!("bad iteration count `{}`", token)))?;
                    shorthand.iteration_count = Some(IterationCount::Count(count));
                    continue;
                }
            }

            let slot = if DIRECTIONS.contains(&token) && shorthand.direction.is_none() {
                &mut shorthand.direction
            } else if FILL_MODES.contains(&token) && shorthand.fill_mode.is_none() {
                &mut shorthand.fill_mode
            } else if PLAY_STATES.contains(&token) && shorthand.play_state.is_none() {
                &mut shorthand.play_state
            } else if shorthand.name.is_none() && is_custom_ident(token) {
                &mut shorthand.name
            } else {
                return Err(invalid(format!("unexpected token `{}`", token)));
            };
            *slot = Some(token.to_string());
        }

        Ok(shorthand)
    }

    /// Duration in seconds, if one was given
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration.map(|d| d.as_secs_f64())
    }
}

fn is_custom_ident(token: &str) -> bool {
    let mut chars = token.chars();
    let first_ok = match chars.next() {
        // `-` must be followed by a name start, never a digit
        Some('-') => matches!(chars.clone().next(), Some(c) if c.is_alphabetic() || c == '-' || c == '_'),
        Some(c) => c.is_alphabetic() || c == '_',
        None => false,
    };
    first_ok && chars.all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

impl fmt::Display for AnimationShorthand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        parts.extend(self.name.clone());
        parts.extend(self.duration.map(|d| d.to_string()));
        parts.extend(self.timing_function.as_ref().map(|t| t.to_string()));
        parts.extend(self.delay.map(|d| d.to_string()));
        parts.extend(self.iteration_count.map(|c| c.to_string()));
        parts.extend(self.direction.clone());
        parts.extend(self.fill_mode.clone());
        parts.extend(self.play_state.clone());
        f.write_str(&parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_slide() {
        let shorthand =
            AnimationShorthand::parse("text-slide 12.5s cubic-bezier(0.83, 0, 0.17, 1) infinite").unwrap();
        assert_eq!(shorthand.name.as_deref(), Some("text-slide"));
        assert_eq!(shorthand.duration_secs(), Some(12.5));
        assert_eq!(shorthand.timing_function, Some(TimingFunction::CubicBezier([0.83, 0.0, 0.17, 1.0])));
        assert_eq!(shorthand.iteration_count, Some(IterationCount::Infinite));
        assert!(shorthand.delay.is_none());
        insta::assert_snapshot!(shorthand.to_string(), @"text-slide 12.5s cubic-bezier(0.83, 0, 0.17, 1) infinite");
    }

    #[test]
    fn test_parse_full_shorthand() {
        let shorthand = AnimationShorthand::parse("bounce 300ms ease-in 1s 3 alternate both paused").unwrap();
        assert_eq!(shorthand.name.as_deref(), Some("bounce"));
        assert_eq!(shorthand.duration_secs(), Some(0.3));
        assert_eq!(shorthand.delay.map(|d| d.as_secs_f64()), Some(1.0));
        assert_eq!(shorthand.iteration_count, Some(IterationCount::Count(3.0)));
        assert_eq!(shorthand.direction.as_deref(), Some("alternate"));
        assert_eq!(shorthand.fill_mode.as_deref(), Some("both"));
        assert_eq!(shorthand.play_state.as_deref(), Some("paused"));
    }

    #[test]
    fn test_parse_steps() {
        let shorthand = AnimationShorthand::parse("blink 1s steps(2, jump-none) infinite").unwrap();
        assert_eq!(
            shorthand.timing_function,
            Some(TimingFunction::Steps { count: 2, position: Some("jump-none".to_string()) })
        );
    }

    #[test]
    fn test_parse_without_duration() {
        let shorthand = AnimationShorthand::parse("spin linear infinite").unwrap();
        assert!(shorthand.duration.is_none());
        assert_eq!(shorthand.duration_secs(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(AnimationShorthand::parse("").is_err());
        assert!(AnimationShorthand::parse("spin 1s cubic-bezier(2, 0, 0, 1)").is_err());
        assert!(AnimationShorthand::parse("spin 1s cubic-bezier(0.1, 0)").is_err());
        assert!(AnimationShorthand::parse("spin 1s ease (").is_err());
        assert!(AnimationShorthand::parse("spin 1s 2s 3s").is_err());
        assert!(AnimationShorthand::parse("spin wobble 1s").is_err());
        assert!(AnimationShorthand::parse("spin 1s bounce(2)").is_err());
        assert!(AnimationShorthand::parse("spin 1s cubic-bezier(0.1, inf, 0.2, NaN) infinite").is_err());
        assert!(AnimationShorthand::parse("spin 1s cubic-bezier(0.1, 0, 0.2, -infinity)").is_err());
        assert!(AnimationShorthand::parse("blink 1s steps(2, bogus)").is_err());
    }

    #[test]
    fn test_steps_positions() {
        for position in STEP_POSITIONS {
            let value = format!("blink 1s steps(4, {})", position);
            assert!(AnimationShorthand::parse(&value).is_ok(), "{}", value);
        }
        let shorthand = AnimationShorthand::parse("blink 1s steps(3)").unwrap();
        assert_eq!(shorthand.timing_function, Some(TimingFunction::Steps { count: 3, position: None }));
    }

    #[test]
    fn test_animation_name_identifiers() {
        assert!(AnimationShorthand::parse("-1 1s").is_err());
        assert!(AnimationShorthand::parse("- 1s").is_err());
        let shorthand = AnimationShorthand::parse("-fade 1s").unwrap();
        assert_eq!(shorthand.name.as_deref(), Some("-fade"));
        let shorthand = AnimationShorthand::parse("--slide-in 1s").unwrap();
        assert_eq!(shorthand.name.as_deref(), Some("--slide-in"));
    }
}
