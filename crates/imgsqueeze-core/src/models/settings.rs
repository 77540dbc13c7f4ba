//! Per-request compression settings and their normalizer.
//!
//! The browser front end sends settings as a loosely typed JSON string in a
//! multipart text field. Normalization never fails: malformed payloads fall
//! back to defaults and the fallback is reported through [`SettingsSource`].

use serde_json::{Map, Value};

use super::format::TargetFormat;

pub const DEFAULT_QUALITY: u8 = 85;
pub const MIN_QUALITY: u8 = 10;
pub const MAX_QUALITY: u8 = 100;

/// Validated, defaulted compression settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionSettings {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: u8,
    pub format: TargetFormat,
    pub keep_ratio: bool,
    pub preserve_animation: bool,
    pub keep_original_name: bool,
    pub output_name: Option<String>,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            quality: DEFAULT_QUALITY,
            format: TargetFormat::default(),
            keep_ratio: true,
            preserve_animation: false,
            keep_original_name: false,
            output_name: None,
        }
    }
}

/// Where the normalized settings came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    /// No settings field was sent.
    Absent,
    /// The payload parsed as a JSON object.
    Parsed,
    /// The payload was unusable; defaults were applied.
    Recovered { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSettings {
    pub settings: CompressionSettings,
    pub source: SettingsSource,
}

impl CompressionSettings {
    /// Parse a raw settings payload, falling back to defaults on any problem.
    pub fn normalize(raw: Option<&str>) -> NormalizedSettings {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return NormalizedSettings {
                settings: Self::default(),
                source: SettingsSource::Absent,
            };
        };

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => NormalizedSettings {
                settings: Self::from_map(&map),
                source: SettingsSource::Parsed,
            },
            Ok(other) => Self::recovered(format!(
                "settings must be a JSON object, got {}",
                json_kind(&other)
            )),
            Err(e) => Self::recovered(e.to_string()),
        }
    }

    fn recovered(reason: String) -> NormalizedSettings {
        tracing::warn!(reason = %reason, "Failed to parse settings, using defaults");
        NormalizedSettings {
            settings: Self::default(),
            source: SettingsSource::Recovered { reason },
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let defaults = Self::default();

        let format = match map.get("format") {
            Some(Value::String(s)) if !s.trim().is_empty() => {
                TargetFormat::parse(s).unwrap_or_else(|| {
                    tracing::warn!(format = %s, "Unknown output format, using webp");
                    defaults.format
                })
            }
            _ => defaults.format,
        };

        let quality = map
            .get("quality")
            .and_then(coerce_int)
            .filter(|q| *q != 0)
            .map(|q| q.clamp(MIN_QUALITY as i64, MAX_QUALITY as i64) as u8)
            .unwrap_or(defaults.quality);

        Self {
            width: map.get("width").and_then(coerce_dimension),
            height: map.get("height").and_then(coerce_dimension),
            quality,
            format,
            keep_ratio: !matches!(map.get("keepRatio"), Some(Value::Bool(false))),
            preserve_animation: map.get("preserveAnimation").is_some_and(is_truthy),
            keep_original_name: map.get("keepOriginalName").is_some_and(is_truthy),
            output_name: match map.get("outputName") {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                _ => None,
            },
        }
    }

    /// Whether any resize was requested.
    pub fn has_resize(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

/// Integer coercion that accepts numbers and numeric-prefixed strings ("800px").
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

fn coerce_dimension(value: &Value) -> Option<u32> {
    coerce_int(value)
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
