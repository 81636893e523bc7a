//! JSON-lines action scripts
//!
//! One action per line in the wire form. Blank lines and lines starting with
//! `#` are skipped. `ADD_CATEGORY` is not a reducer action; it goes to the
//! category registry instead.

use anyhow::{Context, Result};
use packlist::{CategoryRegistry, CategoryStyle, PackingAction};
use serde::Deserialize;
use serde_json::Value;

const ADD_CATEGORY: &str = "ADD_CATEGORY";

/// Payload of an `ADD_CATEGORY` line
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCategory {
    pub name: String,
    /// Background color; picked from the palette when absent
    #[serde(default)]
    pub color: Option<String>,
}

impl NewCategory {
    pub fn style(&self, registry: &CategoryRegistry) -> CategoryStyle {
        match &self.color {
            Some(color) => CategoryStyle::from_color(color),
            None => {
                let palette = CategoryStyle::PALETTE;
                CategoryStyle::from_color(palette[registry.len() % palette.len()])
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Dispatch(PackingAction),
    AddCategory(NewCategory),
}

/// A parsed script step with its 1-based line number
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub number: usize,
    pub step: Step,
}

fn parse_step(text: &str) -> Result<Step> {
    let value: Value = serde_json::from_str(text).context("not valid JSON")?;

    if value.get("type").and_then(Value::as_str) == Some(ADD_CATEGORY) {
        let payload = value.get("payload").cloned().unwrap_or(Value::Null);
        let category = serde_json::from_value(payload).context("invalid ADD_CATEGORY payload")?;
        return Ok(Step::AddCategory(category));
    }

    let action = serde_json::from_value(value).context("invalid action")?;
    Ok(Step::Dispatch(action))
}

/// Parse a whole script, failing on the first bad line
pub fn parse(source: &str) -> Result<Vec<Line>> {
    source
        .lines()
        .enumerate()
        .map(|(i, text)| (i + 1, text.trim()))
        .filter(|(_, text)| !text.is_empty() && !text.starts_with('#'))
        .map(|(number, text)| {
            let step = parse_step(text).with_context(|| format!("line {}", number))?;
            Ok(Line { number, step })
        })
        .collect()
}
