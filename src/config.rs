use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal spacing between level columns, px.
    pub h_spacing: f32,
    /// Vertical spacing between rows within a column, px.
    pub v_spacing: f32,
    pub base_stroke_width: f32,
    pub stroke_log_scale: f32,
    pub max_stroke_width: f32,
    /// Scope ids that do not name a swarm (the global hive scope).
    pub reserved_scopes: Vec<String>,
    pub label_max_chars: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            h_spacing: 220.0,
            v_spacing: 110.0,
            base_stroke_width: 1.5,
            stroke_log_scale: 0.75,
            max_stroke_width: 6.0,
            reserved_scopes: vec!["hive".to_string()],
            label_max_chars: 3,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    theme: Option<String>,
    #[serde(rename = "hSpacing")]
    h_spacing: Option<f32>,
    #[serde(rename = "vSpacing")]
    v_spacing: Option<f32>,
    #[serde(rename = "baseStrokeWidth")]
    base_stroke_width: Option<f32>,
    #[serde(rename = "strokeLogScale")]
    stroke_log_scale: Option<f32>,
    #[serde(rename = "maxStrokeWidth")]
    max_stroke_width: Option<f32>,
    #[serde(rename = "reservedScopes")]
    reserved_scopes: Option<Vec<String>>,
    #[serde(rename = "labelMaxChars")]
    label_max_chars: Option<usize>,
}

/// Load a layout config overlaying a JSON file on the defaults. The optional
/// `"theme"` key selects a preset by name and is returned separately so
/// embedders can keep their own theme override.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<(LayoutConfig, Option<String>)> {
    let mut config = LayoutConfig::default();
    let Some(path) = path else {
        return Ok((config, None));
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(v) = parsed.h_spacing {
        config.h_spacing = v;
    }
    if let Some(v) = parsed.v_spacing {
        config.v_spacing = v;
    }
    if let Some(v) = parsed.base_stroke_width {
        config.base_stroke_width = v;
    }
    if let Some(v) = parsed.stroke_log_scale {
        config.stroke_log_scale = v;
    }
    if let Some(v) = parsed.max_stroke_width {
        config.max_stroke_width = v;
    }
    if let Some(v) = parsed.reserved_scopes {
        config.reserved_scopes = v;
    }
    if let Some(v) = parsed.label_max_chars {
        config.label_max_chars = v;
    }

    Ok((config, parsed.theme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let (config, theme) = load_config(None).unwrap();
        assert_eq!(config.h_spacing, LayoutConfig::default().h_spacing);
        assert!(theme.is_none());
    }

    #[test]
    fn file_overlays_defaults() {
        let dir = std::env::temp_dir().join("swarmview-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(
            &path,
            r#"{"theme": "dark", "hSpacing": 300.0, "reservedScopes": ["hive", "global"]}"#,
        )
        .unwrap();

        let (config, theme) = load_config(Some(&path)).unwrap();
        assert_eq!(config.h_spacing, 300.0);
        assert_eq!(config.v_spacing, LayoutConfig::default().v_spacing);
        assert_eq!(config.reserved_scopes.len(), 2);
        assert_eq!(theme.as_deref(), Some("dark"));
    }
}
