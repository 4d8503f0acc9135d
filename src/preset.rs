//! The dashboard's theme configuration as constant data.

use crate::config::{Declarations, KeyframeSteps, TailwindConfig, Theme, ThemeExtend};
use indexmap::IndexMap;

pub const CONTENT: [&str; 2] = ["./templates/**/*.html", "./static/src/**/*.js"];

pub const FONT_FAMILY: &str = "faculty-glyphic";
pub const FONT_STACK: [&str; 2] = ["\"faculty-glyphic\"", "sans-serif"];

pub const ANIMATION: &str = "text-slide";
pub const ANIMATION_SHORTHAND: &str = "text-slide 12.5s cubic-bezier(0.83, 0, 0.17, 1) infinite";

/// Selector -> `transform` value, in timeline order
pub const TEXT_SLIDE_STEPS: [(&str, &str); 5] = [
    ("0%, 20%", "translateY(0%)"),
    ("25%, 45%", "translateY(-20%)"),
    ("50%, 70%", "translateY(-40%)"),
    ("75%, 95%", "translateY(-60%)"),
    ("100%", "translateY(-80%)"),
];

/// Build the dashboard configuration record.
pub fn dashboard_preset() -> TailwindConfig {
    let steps: KeyframeSteps = TEXT_SLIDE_STEPS
        .iter()
        .map(|(selector, transform)| {
            let declarations = Declarations::from([("transform".to_string(), transform.to_string())]);
            (selector.to_string(), declarations)
        })
        .collect();

    TailwindConfig {
        content: CONTENT.iter().map(|p| p.to_string()).collect(),
        theme: Theme {
            extend: ThemeExtend {
                font_family: IndexMap::from([(
                    FONT_FAMILY.to_string(),
                    FONT_STACK.iter().map(|f| f.to_string()).collect(),
                )]),
                keyframes: IndexMap::from([(ANIMATION.to_string(), steps)]),
                animation: IndexMap::from([(ANIMATION.to_string(), ANIMATION_SHORTHAND.to_string())]),
            },
        },
        plugins: Vec::new(),
    }
}
