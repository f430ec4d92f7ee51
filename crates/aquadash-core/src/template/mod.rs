//! Handlebars templates compiled once and rendered against JSON.
//!
//! Every template gets the dashboard helpers `formatDate`, `formatRelative`,
//! `formatNumber`, `formatHashrate` and `length`.

mod helpers;

pub use helpers::{format_hashrate, format_number, format_relative};

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

const TEMPLATE_NAME: &str = "stats";

/// HTML-escape `text` the way `{{value}}` interpolation does.
pub fn escape(text: &str) -> String {
    handlebars::html_escape(text)
}

/// A compiled template.
#[derive(Debug, Clone)]
pub struct Template {
    registry: Handlebars<'static>,
}

impl Template {
    /// Compile template source. Syntax errors carry the line and column.
    pub fn compile(source: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        helpers::register(&mut registry);
        registry.register_template_string(TEMPLATE_NAME, source)?;
        Ok(Self { registry })
    }

    /// Render against a JSON context.
    pub fn render(&self, context: &Value) -> Result<String> {
        Ok(self.registry.render(TEMPLATE_NAME, context)?)
    }

    /// Render any serializable value.
    pub fn render_serialize<T: Serialize>(&self, context: &T) -> Result<String> {
        let value = serde_json::to_value(context)?;
        self.render(&value)
    }
}
