//! Manifest types for analytics widgets and dashboards.

use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;
use vantage_core::Color;
use vantage_widgets::{AnalyticsWidget, AnalyticsWidgetData};

/// Data of a single analytics widget, as written in `widget.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetManifest {
    /// The widget data
    pub data: AnalyticsWidgetData,
}

impl WidgetManifest {
    /// Parse and validate a widget from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_yaml_ng::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse and validate a widget from JSON.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ManifestError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject an empty id. Values the widget will silently replace
    /// (unparsable series colors, series keys no row carries) are logged.
    pub fn validate(&self) -> Result<(), ManifestError> {
        validate_widget(0, &self.data)
    }

    /// Build the widget this manifest describes.
    #[must_use]
    pub fn into_widget(self) -> AnalyticsWidget {
        AnalyticsWidget::new(self.data)
    }
}

impl From<AnalyticsWidgetData> for WidgetManifest {
    fn from(data: AnalyticsWidgetData) -> Self {
        Self { data }
    }
}

/// A dashboard: an ordered list of widgets with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardManifest {
    /// Dashboard title
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Widgets in display order
    pub widgets: Vec<AnalyticsWidgetData>,
}

impl DashboardManifest {
    /// Parse and validate a dashboard from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_yaml_ng::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse and validate a dashboard from JSON.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ManifestError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Every widget needs a non-empty id, unique within the dashboard.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut seen = HashSet::new();
        for (index, widget) in self.widgets.iter().enumerate() {
            validate_widget(index, widget)?;
            if !seen.insert(widget.id.as_str()) {
                return Err(ManifestError::DuplicateWidgetId(widget.id.clone()));
            }
        }
        Ok(())
    }

    /// Widget data by id.
    #[must_use]
    pub fn widget(&self, id: &str) -> Option<&AnalyticsWidgetData> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// Build every widget in display order.
    #[must_use]
    pub fn into_widgets(self) -> Vec<AnalyticsWidget> {
        self.widgets.into_iter().map(AnalyticsWidget::new).collect()
    }
}

fn validate_widget(index: usize, data: &AnalyticsWidgetData) -> Result<(), ManifestError> {
    if data.id.trim().is_empty() {
        return Err(ManifestError::EmptyWidgetId { index });
    }

    for series in &data.chart_series {
        if let Some(color) = &series.color {
            if Color::from_hex(color).is_err() {
                warn!(
                    widget = %data.id,
                    series = %series.name,
                    %color,
                    "series color is not hex, using palette"
                );
            }
        }
        let plotted = data
            .chart_data
            .iter()
            .any(|row| row.get(&series.data_key).is_some());
        if !data.chart_data.is_empty() && !plotted {
            warn!(
                widget = %data.id,
                series = %series.name,
                key = %series.data_key,
                "no row carries the series key, plotting zeros"
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_widgets::{ChartKind, DrilldownFilter, IconName, SeverityFilter, WidgetStatus};

    const RISK_YAML: &str = r##"
id: risks
title: Risk Overview
subtitle: Open risks by severity
status: warning
icon: alert-circle
metrics:
  - label: Critical
    value: 3
    trend:
      direction: up
      value: 12
    drilldownHint: View critical risks
    drilldownFilter:
      kind: bySeverity
      value: critical
  - label: Owner
    value: Security
chartType: pie
chartData:
  - name: Critical Risk
    count: 3
  - name: High Risk
    count: 5
chartSeries:
  - name: Risks
    dataKey: count
    color: "#ef4444"
insights:
  - Critical risks up 12%
actionText: View all risks
actionHref: /risks
"##;

    #[test]
    fn test_parse_widget_manifest() {
        let manifest = WidgetManifest::from_yaml(RISK_YAML).unwrap();
        let data = &manifest.data;

        assert_eq!(data.id, "risks");
        assert_eq!(data.status, WidgetStatus::Warning);
        assert_eq!(data.icon, IconName::AlertCircle);
        assert_eq!(data.chart_type, ChartKind::Pie);
        assert_eq!(data.chart_data.len(), 2);
        assert_eq!(data.chart_series[0].data_key, "count");
        assert_eq!(data.metrics.len(), 2);
        assert_eq!(
            data.metrics[0].drilldown_filter,
            Some(DrilldownFilter::BySeverity(SeverityFilter::Critical))
        );
        assert_eq!(data.metrics[1].value.as_str(), Some("Security"));
        assert_eq!(data.action_href, "/risks");
    }

    #[test]
    fn test_widget_manifest_defaults() {
        let manifest = WidgetManifest::from_yaml("id: bare\ntitle: Bare\n").unwrap();
        assert_eq!(manifest.data.chart_type, ChartKind::Bar);
        assert_eq!(manifest.data.status, WidgetStatus::Info);
        assert!(manifest.data.chart_series.is_empty());
        assert!(!manifest.data.has_chart());
        assert_eq!(manifest.data.category_key(), "name");
    }

    #[test]
    fn test_unknown_icon_falls_back() {
        let manifest = WidgetManifest::from_yaml("id: w\nicon: rocket-ship\n").unwrap();
        assert_eq!(manifest.data.icon, IconName::Activity);
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = WidgetManifest::from_yaml("title: No id\n").unwrap_err();
        assert!(matches!(err, ManifestError::EmptyWidgetId { index: 0 }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = WidgetManifest::from_yaml("id: [unclosed").unwrap_err();
        assert!(matches!(err, ManifestError::Yaml(_)));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let manifest = WidgetManifest::from_yaml(RISK_YAML).unwrap();
        let yaml = manifest.to_yaml().unwrap();
        assert!(yaml.contains("chartSeries"));
        assert!(yaml.contains("dataKey"));
        assert_eq!(WidgetManifest::from_yaml(&yaml).unwrap(), manifest);
    }

    #[test]
    fn test_json_camel_case() {
        let json = r#"{
            "id": "revenue",
            "title": "Revenue",
            "chartType": "line",
            "xAxisKey": "month",
            "chartHeight": 240,
            "chartData": [{"month": "Jan", "value": 10}],
            "chartSeries": [{"name": "Revenue", "dataKey": "value"}]
        }"#;
        let manifest = WidgetManifest::from_json(json).unwrap();
        assert_eq!(manifest.data.category_key(), "month");
        assert_eq!(manifest.data.chart_height, Some(240.0));
        assert!(manifest.data.has_chart());

        let back = manifest.to_json().unwrap();
        assert!(back.contains("\"xAxisKey\": \"month\""));
    }

    #[test]
    fn test_into_widget() {
        let widget = WidgetManifest::from_yaml(RISK_YAML).unwrap().into_widget();
        assert_eq!(widget.data().title, "Risk Overview");
        assert_eq!(widget.tiles().len(), 2);
    }

    // ===== Dashboard Tests =====

    #[test]
    fn test_parse_dashboard() {
        let yaml = r"
title: Security
widgets:
  - id: risks
    title: Risks
  - id: incidents
    title: Incidents
    chartType: area
";
        let dashboard = DashboardManifest::from_yaml(yaml).unwrap();
        assert_eq!(dashboard.title, "Security");
        assert_eq!(dashboard.widgets.len(), 2);
        assert_eq!(
            dashboard.widget("incidents").map(|w| w.chart_type),
            Some(ChartKind::Area)
        );
        assert!(dashboard.widget("missing").is_none());
        assert_eq!(dashboard.into_widgets().len(), 2);
    }

    #[test]
    fn test_dashboard_duplicate_ids() {
        let yaml = "widgets:\n  - id: a\n  - id: b\n  - id: a\n";
        let err = DashboardManifest::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateWidgetId(ref id) if id == "a"));
    }

    #[test]
    fn test_dashboard_empty_id_position() {
        let json = r#"{"widgets": [{"id": "a"}, {"id": "  "}]}"#;
        let err = DashboardManifest::from_json(json).unwrap_err();
        assert!(matches!(err, ManifestError::EmptyWidgetId { index: 1 }));
    }

    #[test]
    fn test_empty_dashboard_is_valid() {
        let dashboard = DashboardManifest::from_yaml("{}").unwrap();
        assert!(dashboard.widgets.is_empty());
        assert_eq!(dashboard.to_yaml().unwrap().trim(), "widgets: []");
    }

    #[test]
    fn test_fallback_values_still_validate() {
        let yaml = r"
id: odd
chartData:
  - name: Jan
    value: 1
chartSeries:
  - name: Ghost
    dataKey: missing
    color: not-a-color
";
        let manifest = WidgetManifest::from_yaml(yaml).unwrap();
        assert_eq!(manifest.data.chart_series[0].name, "Ghost");
    }
}
