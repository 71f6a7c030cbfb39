//! Line files: a named node/edge set plus run options, read from YAML or JSON.

use std::path::Path;

use fl_graph::{EdgeSpec, NodeSpec};
use fl_sim::SimOptions;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    #[serde(default)]
    pub simulation: SimOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    Yaml,
    Json,
}

impl LineFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(LineFormat::Yaml),
            Some("json") => Ok(LineFormat::Json),
            _ => Err(AppError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Parse line file content. Parse failures carry an empty path.
pub fn parse_line_file(content: &str, format: LineFormat) -> AppResult<LineFile> {
    let parsed: Result<LineFile, String> = match format {
        LineFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        LineFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| AppError::Parse {
        path: Default::default(),
        message,
    })
}

/// Load a line file, choosing YAML or JSON by extension.
pub fn load_line_file(path: &Path) -> AppResult<LineFile> {
    let format = LineFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| AppError::LineFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let line = parse_line_file(&content, format).map_err(|err| match err {
        AppError::Parse { message, .. } => AppError::Parse {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })?;

    debug!(
        path = %path.display(),
        nodes = line.nodes.len(),
        edges = line.edges.len(),
        "loaded line file"
    );
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            LineFormat::from_path(Path::new("a/line.YML")).unwrap(),
            LineFormat::Yaml
        );
        assert_eq!(
            LineFormat::from_path(Path::new("line.json")).unwrap(),
            LineFormat::Json
        );
        assert!(matches!(
            LineFormat::from_path(Path::new("line.toml")),
            Err(AppError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn simulation_section_is_optional() {
        let yaml = r#"
name: Two step
nodes:
  - { id: a, cycleTime: 3 }
  - { id: b, cycle_time_s: 1.5, maxCapacity: 3 }
edges:
  - { id: e1, source: a, target: b }
"#;
        let line = parse_line_file(yaml, LineFormat::Yaml).unwrap();
        assert_eq!(line.name, "Two step");
        assert_eq!(line.nodes[1].max_capacity, 3);
        assert_eq!(line.simulation, SimOptions::default());
    }

    #[test]
    fn partial_simulation_section_keeps_defaults() {
        let json = r#"{"nodes":[],"simulation":{"speed_multiplier":4.0}}"#;
        let line = parse_line_file(json, LineFormat::Json).unwrap();
        assert_eq!(line.simulation.speed_multiplier, 4.0);
        assert_eq!(line.simulation.min_duration_s, 0.1);
    }

    #[test]
    fn malformed_content_is_a_parse_error() {
        let err = parse_line_file("nodes: [", LineFormat::Yaml).unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }
}
