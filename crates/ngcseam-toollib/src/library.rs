//! Fusion 360 tool library model
//!
//! Only the fields needed for a tool table are modelled; everything else in
//! a `Library.json` is ignored. Fusion stores most numbers either as JSON
//! numbers or as strings with units (`"3 mm"`, `"3,5"`), so numeric fields
//! are kept as raw [`Value`]s and parsed on demand.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Root of a tool library export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolLibrary {
    /// Tool entries in file order
    #[serde(default)]
    pub data: Vec<LibraryEntry>,
}

/// One tool of the library
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryEntry {
    /// Tool type, e.g. "flat end mill"
    #[serde(rename = "type")]
    pub tool_type: String,

    /// Free-form description
    pub description: Option<Value>,

    pub expressions: Expressions,

    pub geometry: Geometry,

    /// Post processor settings, including the tool number
    #[serde(rename = "post-process")]
    pub post_process: PostProcess,
}

/// Parameter expressions as entered in the tool dialog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Expressions {
    pub tool_description: Option<Value>,
    pub tool_diameter: Option<Value>,
}

/// Resolved tool geometry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Cutting diameter
    #[serde(rename = "DC")]
    pub dc: Option<Value>,

    /// Corner radius
    #[serde(rename = "RE")]
    pub re: Option<Value>,

    /// Point angle
    #[serde(rename = "SIG")]
    pub sig: Option<Value>,

    /// Gauge length of the tool in its holder
    #[serde(rename = "assemblyGaugeLength")]
    pub assembly_gauge_length: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcess {
    /// Tool number in the machine
    pub number: Option<Value>,
}

fn unit_number_regex() -> &'static Regex {
    static UNIT_NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    UNIT_NUMBER_REGEX
        .get_or_init(|| Regex::new(r"^\s*([-+]?\d+(?:[.,]\d+)?)").expect("invalid regex pattern"))
}

/// Leading signed decimal of a number or a string with units.
///
/// `3`, `"3 mm"` and `"3,0mm"` all give 3.0. Anything else gives `None`.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => unit_number_regex()
            .captures(s)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().replace(',', ".").parse().ok()),
        _ => None,
    }
}

/// Integer from a JSON number (fraction truncated) or a plain numeric string
pub fn parse_tool_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int(s),
        _ => None,
    }
}

pub(crate) fn parse_int(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

fn number_field(value: Option<&Value>) -> Option<f64> {
    value.and_then(parse_number)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

impl LibraryEntry {
    /// Tool number from the post processor settings
    pub fn tool_number(&self) -> Option<i64> {
        self.post_process.number.as_ref().and_then(parse_tool_number)
    }

    /// Cutting diameter, falling back to the diameter expression, then 0
    pub fn diameter(&self) -> f64 {
        number_field(self.geometry.dc.as_ref())
            .or_else(|| number_field(self.expressions.tool_diameter.as_ref()))
            .unwrap_or(0.0)
    }

    pub fn corner_radius(&self) -> Option<f64> {
        number_field(self.geometry.re.as_ref())
    }

    pub fn point_angle(&self) -> Option<f64> {
        number_field(self.geometry.sig.as_ref())
    }

    pub fn assembly_gauge_length(&self) -> Option<f64> {
        number_field(self.geometry.assembly_gauge_length.as_ref())
    }

    /// Description text without surrounding single quotes
    pub fn description_text(&self) -> String {
        let text = non_empty_str(self.description.as_ref())
            .or_else(|| non_empty_str(self.expressions.tool_description.as_ref()))
            .unwrap_or("")
            .trim();

        match text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
            Some(unquoted) => unquoted.to_string(),
            None => text.to_string(),
        }
    }

    /// Tool table comment: type, description and geometry extras.
    ///
    /// `flat end mill – 6mm Flat (cornerR=0.000, angle=118°)`
    pub fn comment(&self) -> String {
        let mut extras = Vec::new();
        if let Some(radius) = self.corner_radius() {
            extras.push(format!("cornerR={:.3}", radius));
        }
        if let Some(angle) = self.point_angle() {
            if (angle - angle.round()).abs() < 1e-3 {
                extras.push(format!("angle={}°", angle.round() as i64));
            } else {
                extras.push(format!("angle={:.1}°", angle));
            }
        }

        let mut comment = self.tool_type.trim().to_string();
        let description = self.description_text();
        if !description.is_empty() {
            if comment.is_empty() {
                comment = description;
            } else {
                comment = format!("{} – {}", comment, description);
            }
        }
        if !extras.is_empty() {
            let extras = format!("({})", extras.join(", "));
            if comment.is_empty() {
                comment = extras;
            } else {
                comment = format!("{} {}", comment, extras);
            }
        }
        comment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: Value) -> LibraryEntry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(&json!(3)), Some(3.0));
        assert_eq!(parse_number(&json!(2.5)), Some(2.5));
        assert_eq!(parse_number(&json!("3 mm")), Some(3.0));
        assert_eq!(parse_number(&json!("  -1,5mm")), Some(-1.5));
        assert_eq!(parse_number(&json!("+0.25 in")), Some(0.25));
        assert_eq!(parse_number(&json!("mm 3")), None);
        assert_eq!(parse_number(&json!(null)), None);
        assert_eq!(parse_number(&json!(true)), None);
    }

    #[test]
    fn test_parse_tool_number() {
        assert_eq!(parse_tool_number(&json!(5)), Some(5));
        assert_eq!(parse_tool_number(&json!(5.9)), Some(5));
        assert_eq!(parse_tool_number(&json!(" 12 ")), Some(12));
        assert_eq!(parse_tool_number(&json!("12.0")), None);
        assert_eq!(parse_tool_number(&json!("T12")), None);
        assert_eq!(parse_tool_number(&json!(null)), None);
    }

    #[test]
    fn test_diameter_fallbacks() {
        let e = entry(json!({"geometry": {"DC": "6 mm"}, "expressions": {"tool_diameter": "8 mm"}}));
        assert_eq!(e.diameter(), 6.0);

        let e = entry(json!({"expressions": {"tool_diameter": "8 mm"}}));
        assert_eq!(e.diameter(), 8.0);

        assert_eq!(entry(json!({})).diameter(), 0.0);
    }

    #[test]
    fn test_comment_full() {
        let e = entry(json!({
            "type": "flat end mill ",
            "description": "'6mm Flat'",
            "geometry": {"RE": 0.5, "SIG": 118}
        }));
        assert_eq!(e.comment(), "flat end mill – 6mm Flat (cornerR=0.500, angle=118°)");
    }

    #[test]
    fn test_comment_fractional_angle_and_fallback_description() {
        let e = entry(json!({
            "type": "chamfer mill",
            "description": "",
            "expressions": {"tool_description": "90 deg chamfer"},
            "geometry": {"SIG": "89.5"}
        }));
        assert_eq!(e.comment(), "chamfer mill – 90 deg chamfer (angle=89.5°)");
    }

    #[test]
    fn test_comment_sparse_entries() {
        assert_eq!(entry(json!({})).comment(), "");
        assert_eq!(
            entry(json!({"geometry": {"RE": "1 mm"}})).comment(),
            "(cornerR=1.000)"
        );
        assert_eq!(entry(json!({"description": "probe"})).comment(), "probe");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let library: ToolLibrary = serde_json::from_value(json!({
            "version": 19,
            "data": [{"type": "drill", "post-process": {"number": 3, "comment": ""}, "BMC": "carbide"}]
        }))
        .unwrap();
        assert_eq!(library.data.len(), 1);
        assert_eq!(library.data[0].tool_number(), Some(3));
    }
}
