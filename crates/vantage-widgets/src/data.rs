//! Chart data model: rows, series descriptors, chart kinds and tabs.

use crate::palette::palette_color;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use vantage_core::Color;

/// A single field value: text or number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl Value {
    /// Numeric interpretation. Text is parsed leniently; anything that does
    /// not parse (or is not finite) yields `None`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        n.is_finite().then_some(n)
    }

    /// Text content, if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

/// One record of a chart's input: an ordered mapping from field name to
/// [`Value`].
///
/// Rows in one collection are expected to share their keys, but nothing
/// enforces it; a missing key simply reads as absent.
///
/// ```
/// use vantage_widgets::DataRow;
///
/// let row = DataRow::new().with("name", "Feb").with("value", 20);
/// assert_eq!(row.label("name").as_deref(), Some("Feb"));
/// assert_eq!(row.number("value"), Some(20.0));
/// assert_eq!(row.number("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataRow {
    fields: Vec<(String, Value)>,
}

impl DataRow {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`DataRow::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, replacing an existing value in place (order is kept).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Raw value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Numeric value of `key`.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Display text of `key`.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<String> {
        self.get(key).map(ToString::to_string)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for DataRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for DataRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DataRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = DataRow;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to strings or numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DataRow, A::Error> {
                let mut row = DataRow::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    row.insert(key, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Per-series encoding override for composed charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Line with dots
    Line,
    /// Bars
    Bar,
}

/// How one field of the data rows is plotted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDescriptor {
    /// Display label, unique within a collection
    pub name: String,
    /// Row field to plot
    pub data_key: String,
    /// Display color (hex); falls back to the palette
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Axis identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis_id: Option<String>,
    /// Encoding override for composed charts
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SeriesKind>,
}

impl SeriesDescriptor {
    /// Create a descriptor plotting `data_key` under `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, data_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_key: data_key.into(),
            color: None,
            y_axis_id: None,
            kind: None,
        }
    }

    /// Set display color.
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the axis identifier.
    #[must_use]
    pub fn y_axis(mut self, id: impl Into<String>) -> Self {
        self.y_axis_id = Some(id.into());
        self
    }

    /// Set the composed-chart encoding.
    #[must_use]
    pub const fn kind(mut self, kind: SeriesKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Color at ordinal `index`: the configured color if it parses,
    /// otherwise the palette entry.
    #[must_use]
    pub fn resolved_color(&self, index: usize) -> Color {
        self.color
            .as_deref()
            .and_then(|c| Color::from_hex(c).ok())
            .unwrap_or_else(|| palette_color(index))
    }

    /// Effective encoding inside a composed chart (absent means bar).
    #[must_use]
    pub fn composed_kind(&self) -> SeriesKind {
        self.kind.unwrap_or(SeriesKind::Bar)
    }
}

/// Color for ordinal `index` of a series collection. Indexes past the end
/// (pie slices outnumbering series) use the palette.
#[must_use]
pub fn series_color(series: &[SeriesDescriptor], index: usize) -> Color {
    series
        .get(index)
        .map_or_else(|| palette_color(index), |s| s.resolved_color(index))
}

/// Visual encoding family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Grouped or stacked bars
    #[default]
    Bar,
    /// Lines with dots
    Line,
    /// Donut of the first series
    Pie,
    /// Filled lines
    Area,
    /// Per-series line or bar
    Composed,
}

impl ChartKind {
    /// Whether the kind plots against x/y axes.
    #[must_use]
    pub const fn is_cartesian(self) -> bool {
        !matches!(self, Self::Pie)
    }

    /// Lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Area => "area",
            Self::Composed => "composed",
        }
    }
}

/// A named alternative data set shown behind a tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTab {
    /// Tab label
    pub title: String,
    /// Rows shown while the tab is active
    #[serde(default)]
    pub data: Vec<DataRow>,
}

impl DataTab {
    /// Create a tab.
    #[must_use]
    pub fn new(title: impl Into<String>, data: Vec<DataRow>) -> Self {
        Self {
            title: title.into(),
            data,
        }
    }
}

/// Step a circular cursor over `len` entries. With one entry or none the
/// index is returned unchanged.
#[must_use]
pub const fn step_circular(index: usize, len: usize, forward: bool) -> usize {
    if len <= 1 {
        return index;
    }
    let index = if index >= len { len - 1 } else { index };
    if forward {
        if index == len - 1 {
            0
        } else {
            index + 1
        }
    } else if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

/// Render rows as CSV. Columns are the union of row keys in first-seen
/// order; missing fields are left blank.
#[must_use]
pub fn to_csv(rows: &[DataRow]) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for key in rows.iter().flat_map(DataRow::keys) {
        if !columns.contains(&key) {
            columns.push(key);
        }
    }

    let mut out = columns
        .iter()
        .map(|c| csv_field(c))
        .collect::<Vec<_>>()
        .join(",");
    for row in rows {
        out.push('\n');
        let line = columns
            .iter()
            .map(|c| row.label(c).map(|v| csv_field(&v)).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ===== Value Tests =====

    #[test]
    fn test_value_as_f64() {
        assert_eq!(Value::from(12).as_f64(), Some(12.0));
        assert_eq!(Value::from(" 3.5 ").as_f64(), Some(3.5));
        assert_eq!(Value::from("Jan").as_f64(), None);
        assert_eq!(Value::from(f64::NAN).as_f64(), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from(20).to_string(), "20");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
        assert_eq!(Value::from("Critical Risk").to_string(), "Critical Risk");
    }

    #[test]
    fn test_value_untagged_serde() {
        let v: Vec<Value> = serde_json::from_str(r#"[1, "a", 2.5]"#).unwrap();
        assert_eq!(
            v,
            vec![Value::Number(1.0), Value::Text("a".into()), Value::Number(2.5)]
        );
    }

    // ===== DataRow Tests =====

    #[test]
    fn test_row_insert_replaces_in_place() {
        let mut row = DataRow::new().with("name", "Jan").with("value", 10);
        row.insert("name", "Feb");
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["name", "value"]);
        assert_eq!(row.label("name").as_deref(), Some("Feb"));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_row_serde_keeps_order() {
        let json = r#"{"zeta":1,"alpha":"x","mid":2}"#;
        let row: DataRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(serde_json::to_string(&row).unwrap(), json);
    }

    #[test]
    fn test_row_from_iter() {
        let row: DataRow = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(row.number("b"), Some(2.0));
    }

    // ===== SeriesDescriptor Tests =====

    #[test]
    fn test_series_color_fallback() {
        let s = SeriesDescriptor::new("Count", "value");
        assert_eq!(s.resolved_color(1), palette_color(1));

        let red = s.clone().color("#ff0000");
        assert_eq!(red.resolved_color(1), Color::rgb(1.0, 0.0, 0.0));

        let bad = s.color("tomato-ish");
        assert_eq!(bad.resolved_color(3), palette_color(3));
    }

    #[test]
    fn test_series_color_past_end_uses_palette() {
        let series = vec![SeriesDescriptor::new("A", "a").color("#000000")];
        assert_eq!(series_color(&series, 0), Color::BLACK);
        assert_eq!(series_color(&series, 4), palette_color(4));
    }

    #[test]
    fn test_series_serde_accepts_type_alias() {
        let s: SeriesDescriptor =
            serde_json::from_str(r#"{"name":"Target","dataKey":"t","type":"line"}"#).unwrap();
        assert_eq!(s.kind, Some(SeriesKind::Line));
        assert_eq!(s.composed_kind(), SeriesKind::Line);
        assert_eq!(SeriesDescriptor::new("x", "x").composed_kind(), SeriesKind::Bar);
    }

    // ===== ChartKind Tests =====

    #[test]
    fn test_chart_kind_serde() {
        let kind: ChartKind = serde_json::from_str(r#""composed""#).unwrap();
        assert_eq!(kind, ChartKind::Composed);
        assert_eq!(ChartKind::default(), ChartKind::Bar);
        assert!(!ChartKind::Pie.is_cartesian());
        assert!(ChartKind::Area.is_cartesian());
    }

    // ===== Circular Step Tests =====

    #[test]
    fn test_step_circular_wraps() {
        assert_eq!(step_circular(2, 3, true), 0);
        assert_eq!(step_circular(0, 3, false), 2);
        assert_eq!(step_circular(1, 3, true), 2);
    }

    #[test]
    fn test_step_circular_single_is_noop() {
        assert_eq!(step_circular(0, 1, true), 0);
        assert_eq!(step_circular(0, 0, false), 0);
    }

    proptest! {
        #[test]
        fn prop_step_forward_then_back(len in 2usize..50, start in 0usize..50) {
            let index = start % len;
            let there = step_circular(index, len, true);
            prop_assert!(there < len);
            prop_assert_eq!(step_circular(there, len, false), index);
        }
    }

    // ===== CSV Tests =====

    #[test]
    fn test_to_csv() {
        let rows = vec![
            DataRow::new().with("name", "Jan").with("value", 10),
            DataRow::new().with("name", "Feb, late").with("other", 1),
        ];
        assert_eq!(
            to_csv(&rows),
            "name,value,other\nJan,10,\n\"Feb, late\",,1"
        );
    }

    #[test]
    fn test_to_csv_empty() {
        assert_eq!(to_csv(&[]), "");
    }
}
