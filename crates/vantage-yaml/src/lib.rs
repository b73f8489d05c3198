//! Widget-data manifests for Vantage dashboards.
//!
//! A [`WidgetManifest`] holds the data of one analytics widget; a
//! [`DashboardManifest`] holds a list of them. Both read YAML or JSON using
//! the camelCase field names of the widget data model.

mod error;
mod manifest;

pub use error::ManifestError;
pub use manifest::{DashboardManifest, WidgetManifest};
