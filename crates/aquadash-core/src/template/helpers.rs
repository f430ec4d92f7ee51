//! Formatting helpers callable from templates as `{{helper path}}`.

use chrono::{DateTime, Utc};
use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
    RenderErrorReason,
};
use serde_json::Value;

/// Dashboard helpers registered on every template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    /// Millisecond timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
    FormatDate,
    /// Millisecond timestamp relative to the document's `now`.
    FormatRelative,
    /// Number with thousands separators.
    FormatNumber,
    /// Hashes per second with an SI prefix.
    FormatHashrate,
    /// Length of an array, object or string.
    Length,
}

impl Builtin {
    pub(crate) const ALL: [Builtin; 5] = [
        Self::FormatDate,
        Self::FormatRelative,
        Self::FormatNumber,
        Self::FormatHashrate,
        Self::Length,
    ];

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::FormatDate => "formatDate",
            Self::FormatRelative => "formatRelative",
            Self::FormatNumber => "formatNumber",
            Self::FormatHashrate => "formatHashrate",
            Self::Length => "length",
        }
    }

    /// Apply the helper. Missing values render as empty (or `0` for `length`).
    fn apply(&self, value: Option<&Value>, root: &Value) -> Result<String, String> {
        let value = match value {
            None | Some(Value::Null) => {
                return Ok(if *self == Self::Length {
                    "0".to_string()
                } else {
                    String::new()
                })
            }
            Some(v) => v,
        };

        match self {
            Self::FormatDate => format_date(self.number(value)? as i64),
            Self::FormatRelative => {
                let now = root
                    .get("now")
                    .and_then(Value::as_f64)
                    .ok_or_else(|| "formatRelative needs a numeric 'now'".to_string())?;
                Ok(format_relative(self.number(value)? as i64 - now as i64))
            }
            Self::FormatNumber => Ok(format_number(self.number(value)?)),
            Self::FormatHashrate => Ok(format_hashrate(self.number(value)?)),
            Self::Length => match value {
                Value::Array(items) => Ok(items.len().to_string()),
                Value::Object(map) => Ok(map.len().to_string()),
                Value::String(s) => Ok(s.chars().count().to_string()),
                _ => Err(format!("length cannot measure {}", type_name(value))),
            },
        }
    }

    fn number(&self, value: &Value) -> Result<f64, String> {
        value
            .as_f64()
            .ok_or_else(|| format!("{} expects a number, got {}", self.name(), type_name(value)))
    }
}

impl HelperDef for Builtin {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        // `ctx` is the root document, so `formatRelative` sees `now` inside blocks too.
        let text = self
            .apply(h.param(0).map(|p| p.value()), ctx.data())
            .map_err(RenderErrorReason::Other)?;
        out.write(&text)?;
        Ok(())
    }
}

/// Register every dashboard helper on `registry`.
pub(crate) fn register(registry: &mut Handlebars<'static>) {
    for helper in Builtin::ALL {
        registry.register_helper(helper.name(), Box::new(helper));
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn format_date(ms: i64) -> Result<String, String> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .ok_or_else(|| format!("timestamp {} out of range", ms))
}

/// `in 4d 23h`, `12m 5s ago`, or `now` within a second.
pub fn format_relative(delta_ms: i64) -> String {
    let secs = delta_ms.unsigned_abs() / 1000;
    if secs == 0 {
        return "now".to_string();
    }

    let units = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];
    let mut remaining = secs;
    let mut parts = Vec::new();
    for (size, suffix) in units {
        let count = remaining / size;
        remaining %= size;
        if count > 0 || !parts.is_empty() {
            parts.push(format!("{}{}", count, suffix));
        }
        if parts.len() == 2 {
            break;
        }
    }

    // drop a trailing zero unit: "2d 0h" reads as "2d"
    if parts.len() == 2 && parts[1].starts_with('0') {
        parts.pop();
    }

    let span = parts.join(" ");
    if delta_ms > 0 {
        format!("in {}", span)
    } else {
        format!("{} ago", span)
    }
}

/// Thousands separators; fractional values keep two decimals.
pub fn format_number(n: f64) -> String {
    let formatted = if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        format!("{:.2}", n)
    };

    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// `1.50 MH/s` style rate.
pub fn format_hashrate(rate: f64) -> String {
    const UNITS: [&str; 7] = ["H/s", "KH/s", "MH/s", "GH/s", "TH/s", "PH/s", "EH/s"];

    let mut value = rate;
    let mut unit = 0;
    while value.abs() >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    format!("{:.2} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_all_helpers() {
        let mut registry = Handlebars::new();
        register(&mut registry);
        registry
            .register_template_string(
                "t",
                "{{formatDate t}}|{{formatRelative t}}|{{formatNumber n}}|{{formatHashrate n}}|{{length xs}}",
            )
            .unwrap();

        let out = registry
            .render("t", &json!({"now": 0, "t": 60_000, "n": 1500, "xs": [1, 2]}))
            .unwrap();
        assert_eq!(out, "1970-01-01 00:01:00 UTC|in 1m|1,500|1.50 KH/s|2");
    }

    #[test]
    fn test_format_date() {
        let out = Builtin::FormatDate
            .apply(Some(&json!(432_001_000_i64)), &json!({}))
            .unwrap();
        assert_eq!(out, "1970-01-06 00:00:01 UTC");
    }

    #[test]
    fn test_format_relative() {
        assert_eq!(format_relative(0), "now");
        assert_eq!(format_relative(999), "now");
        assert_eq!(format_relative(14_400), "in 14s");
        assert_eq!(format_relative(432_000_000), "in 5d");
        assert_eq!(format_relative(90_061_000), "in 1d 1h");
        assert_eq!(format_relative(-125_000), "2m 5s ago");

        let root = json!({"now": 1000});
        let out = Builtin::FormatRelative
            .apply(Some(&json!(3_601_000)), &root)
            .unwrap();
        assert_eq!(out, "in 1h");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(1_234_567.0), "1,234,567");
        assert_eq!(format_number(-1_234_567.0), "-1,234,567");
        assert_eq!(format_number(12_345.678), "12,345.68");
    }

    #[test]
    fn test_format_hashrate() {
        assert_eq!(format_hashrate(0.0), "0.00 H/s");
        assert_eq!(format_hashrate(950.0), "950.00 H/s");
        assert_eq!(format_hashrate(1_500_000.0), "1.50 MH/s");
        assert_eq!(format_hashrate(2.5e12), "2.50 TH/s");
    }

    #[test]
    fn test_length() {
        let root = json!({});
        assert_eq!(Builtin::Length.apply(Some(&json!([1, 2, 3])), &root).unwrap(), "3");
        assert_eq!(Builtin::Length.apply(Some(&json!("héllo")), &root).unwrap(), "5");
        assert_eq!(Builtin::Length.apply(None, &root).unwrap(), "0");
        assert!(Builtin::Length.apply(Some(&json!(4)), &root).is_err());
    }

    #[test]
    fn test_missing_and_wrong_type() {
        let root = json!({});
        assert_eq!(Builtin::FormatDate.apply(None, &root).unwrap(), "");
        assert_eq!(Builtin::FormatNumber.apply(Some(&Value::Null), &root).unwrap(), "");

        let err = Builtin::FormatNumber
            .apply(Some(&json!("12")), &root)
            .unwrap_err();
        assert_eq!(err, "formatNumber expects a number, got a string");

        assert!(Builtin::FormatRelative.apply(Some(&json!(5)), &root).is_err());
    }
}
