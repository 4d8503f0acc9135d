use crate::errors::{ConfigError, Result};
use indexmap::IndexMap;
use serde::de::{self, IgnoredAny, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// CSS property -> value pairs of a single keyframe step
pub type Declarations = IndexMap<String, String>;

/// Keyframe selector (e.g. `"0%, 20%"`) -> declarations
pub type KeyframeSteps = IndexMap<String, Declarations>;

/// Tailwind configuration record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailwindConfig {
    /// Glob patterns of files scanned for class usage
    pub content: Vec<String>,

    /// Theme configuration
    pub theme: Theme,

    /// Plugin module specifiers
    pub plugins: Vec<String>,
}

/// Theme configuration for Tailwind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Additions merged into the base theme
    pub extend: ThemeExtend,
}

/// Theme extensions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeExtend {
    /// Font family name -> fallback stack
    pub font_family: IndexMap<String, Vec<String>>,

    /// Animation name -> keyframe steps
    #[serde(deserialize_with = "deserialize_keyframes")]
    pub keyframes: IndexMap<String, KeyframeSteps>,

    /// Animation name -> `animation` shorthand
    pub animation: IndexMap<String, String>,
}

/// A declaration value. Numbers (`opacity: 0`) are kept as their CSS text.
struct CssValue(String);

impl<'de> Deserialize<'de> for CssValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct CssValueVisitor;

        impl Visitor<'_> for CssValueVisitor {
            type Value = CssValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a CSS value string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<CssValue, E> {
                Ok(CssValue(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<CssValue, E> {
                Ok(CssValue(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<CssValue, E> {
                Ok(CssValue(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<CssValue, E> {
                Ok(CssValue(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<CssValue, E> {
                Ok(CssValue(v.to_string()))
            }
        }

        deserializer.deserialize_any(CssValueVisitor)
    }
}

fn deserialize_keyframes<'de, D>(deserializer: D) -> std::result::Result<IndexMap<String, KeyframeSteps>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, IndexMap<String, IndexMap<String, CssValue>>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, steps)| {
            let steps = steps
                .into_iter()
                .map(|(selector, declarations)| {
                    let declarations = declarations.into_iter().map(|(property, value)| (property, value.0)).collect();
                    (selector, declarations)
                })
                .collect();
            (name, steps)
        })
        .collect())
}

/// Key names of a loaded document, used to report what the record drops
#[derive(Deserialize)]
struct DocumentKeys {
    #[serde(default)]
    theme: Option<ThemeKeys>,
    #[serde(flatten)]
    other: IndexMap<String, IgnoredAny>,
}

#[derive(Deserialize)]
struct ThemeKeys {
    #[serde(default)]
    extend: Option<IndexMap<String, IgnoredAny>>,
    #[serde(flatten)]
    other: IndexMap<String, IgnoredAny>,
}

impl DocumentKeys {
    /// Dotted paths of keys the configuration record has no field for
    fn ignored(&self) -> Vec<String> {
        let mut ignored: Vec<String> = self
            .other
            .keys()
            .filter(|key| !matches!(key.as_str(), "content" | "plugins"))
            .cloned()
            .collect();

        if let Some(theme) = &self.theme {
            ignored.extend(theme.other.keys().map(|key| format!("theme.{}", key)));
            if let Some(extend) = &theme.extend {
                ignored.extend(
                    extend
                        .keys()
                        .filter(|key| !matches!(key.as_str(), "fontFamily" | "keyframes" | "animation"))
                        .map(|key| format!("theme.extend.{}", key)),
                );
            }
        }
        ignored
    }

    fn warn_ignored(keys: std::result::Result<Self, impl fmt::Display>) {
        let Ok(keys) = keys else {
            return;
        };
        let ignored = keys.ignored();
        if !ignored.is_empty() {
            tracing::warn!("Ignoring configuration keys outside the theme record: {}", ignored.join(", "));
        }
    }
}

/// Textual forms a configuration can be read from or written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Js,
}

impl ConfigFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Some(Self::Json),
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            Some("js") | Some("cjs") | Some("mjs") => Some(Self::Js),
            _ => None,
        }
    }
}

impl TailwindConfig {
    /// Parse a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        DocumentKeys::warn_ignored(serde_json::from_str::<DocumentKeys>(content));
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        DocumentKeys::warn_ignored(serde_yaml::from_str::<DocumentKeys>(content));
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a `tailwind.config.js` module
    #[cfg(feature = "js")]
    pub fn from_js_str(content: &str, source_name: &str) -> Result<Self> {
        let value = crate::js_module::parse_exported_object(content, source_name)?;
        DocumentKeys::warn_ignored(DocumentKeys::deserialize(&value));
        Ok(serde_json::from_value(value)?)
    }

    /// Load configuration from a file (auto-detect format)
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.display().to_string(),
        })?;

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), ?format, "loading configuration");

        match format {
            ConfigFormat::Json => Self::from_json_str(&content),
            ConfigFormat::Yaml => Self::from_yaml_str(&content),
            #[cfg(feature = "js")]
            ConfigFormat::Js => Self::from_js_str(&content, &path.display().to_string()),
            #[cfg(not(feature = "js"))]
            ConfigFormat::Js => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }

    /// Pretty JSON form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// YAML form
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// CommonJS `tailwind.config.js` form
    pub fn to_js_module(&self) -> Result<String> {
        let mut value = serde_json::to_value(self)?;
        // Plugins are written as require() calls, not strings
        if let Value::Object(map) = &mut value {
            map.shift_remove("plugins");
        }

        let mut out = String::from("/** @type {import('tailwindcss').Config} */\nmodule.exports = ");
        write_js_value(&mut out, &value, 0, Some(&self.plugins))?;
        out.push_str(";\n");
        Ok(out)
    }

    /// Render in the requested format
    pub fn render(&self, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Json => self.to_json(),
            ConfigFormat::Yaml => self.to_yaml(),
            ConfigFormat::Js => self.to_js_module(),
        }
    }

    /// Names of all configured animations
    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.theme.extend.animation.keys().map(String::as_str)
    }

    /// Names of all configured keyframe sets
    pub fn keyframe_names(&self) -> impl Iterator<Item = &str> {
        self.theme.extend.keyframes.keys().map(String::as_str)
    }

    /// Merge with another configuration. Theme extensions are additive and
    /// entries of `other` win on conflicting keys.
    pub fn merge(mut self, other: Self) -> Self {
        for path in other.content {
            if !self.content.contains(&path) {
                self.content.push(path);
            }
        }

        let extend = &mut self.theme.extend;
        extend.font_family.extend(other.theme.extend.font_family);
        extend.animation.extend(other.theme.extend.animation);
        for (name, steps) in other.theme.extend.keyframes {
            extend.keyframes.entry(name).or_default().extend(steps);
        }

        for plugin in other.plugins {
            if !self.plugins.contains(&plugin) {
                self.plugins.push(plugin);
            }
        }

        self
    }
}

fn is_js_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn write_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

/// Write a JSON value as a JS expression. `plugins`, when given, is appended
/// to the top-level object as `require()` calls.
fn write_js_value(
    out: &mut String,
    value: &Value,
    level: usize,
    plugins: Option<&[String]>,
) -> Result<()> {
    match value {
        Value::Object(map) => {
            if map.is_empty() && plugins.is_none() {
                out.push_str("{}");
                return Ok(());
            }
            out.push_str("{\n");
            for (key, item) in map {
                write_indent(out, level + 1);
                if is_js_identifier(key) {
                    out.push_str(key);
                } else {
                    out.push_str(&serde_json::to_string(key)?);
                }
                out.push_str(": ");
                write_js_value(out, item, level + 1, None)?;
                out.push_str(",\n");
            }
            if let Some(plugins) = plugins {
                write_indent(out, level + 1);
                out.push_str("plugins: [");
                for (i, plugin) in plugins.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&format!("require({})", serde_json::to_string(plugin)?));
                }
                out.push_str("],\n");
            }
            write_indent(out, level);
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_js_value(out, item, level, None)?;
            }
            out.push(']');
        }
        other => out.push_str(&serde_json::to_string(other)?),
    }
    Ok(())
}
