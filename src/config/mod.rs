use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::decompose::DecomposeOptions;
use crate::decompose::refine::DEFAULT_MAX_FLIPS;
use crate::level::PipelineOptions;
use crate::level::pipeline::DEFAULT_REFINEMENT;

/// Level file encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `return {...}` table for the game's loader
    #[default]
    Lua,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Lua => "lua",
            OutputFormat::Json => "json",
        }
    }
}

fn default_refinement() -> f64 {
    DEFAULT_REFINEMENT
}
fn default_convex() -> bool {
    true
}
fn default_refine_triangles() -> bool {
    true
}
fn default_max_flips() -> usize {
    DEFAULT_MAX_FLIPS
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_refinement")]
    pub refinement: f64,
    #[serde(default = "default_convex")]
    pub convex: bool,
    #[serde(default = "default_refine_triangles")]
    pub refine_triangles: bool,
    #[serde(default = "default_max_flips")]
    pub max_flips: usize,
    /// Abort on the first shape that fails instead of skipping it
    #[serde(default)]
    pub strict: bool,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            format: OutputFormat::default(),
            refinement: default_refinement(),
            convex: default_convex(),
            refine_triangles: default_refine_triangles(),
            max_flips: default_max_flips(),
            strict: false,
            verbose: default_verbose(),
        }
    }
}

impl FileConfig {
    /// Search the standard locations and return the first config that parses
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        log::debug!("loaded config from {}", path.display());
                        return Some(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Read one explicit config file
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            refinement: self.refinement,
            convex: self.convex,
            decompose: DecomposeOptions {
                refine_triangles: self.refine_triangles,
                max_flips: self.max_flips,
            },
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("shapebake.toml"));
    paths.push(PathBuf::from(".shapebake.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("shapebake").join("config.toml"));
        paths.push(config_dir.join("shapebake.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".shapebake.toml"));
        paths.push(home.join(".config").join("shapebake").join("config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.refinement, 18.0);
        assert!(config.convex);
        assert!(config.refine_triangles);
        assert_eq!(config.max_flips, 10_000);
        assert_eq!(config.format, OutputFormat::Lua);
        assert!(!config.strict);
        assert_eq!(config.pipeline_options(), PipelineOptions::default());
    }

    #[test]
    fn test_parse_config() {
        let config: FileConfig = toml::from_str(
            r#"
            input = "levels/cave.json"
            format = "json"
            refinement = 6.5
            convex = false
            max_flips = 50
            strict = true
            "#,
        )
        .unwrap();

        assert_eq!(config.input, Some(PathBuf::from("levels/cave.json")));
        assert_eq!(config.format, OutputFormat::Json);
        let options = config.pipeline_options();
        assert_eq!(options.refinement, 6.5);
        assert!(!options.convex);
        assert_eq!(options.decompose.max_flips, 50);
        assert!(config.strict);
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "verbose = true").unwrap();

        let config = FileConfig::from_path(file.path()).unwrap();
        assert!(config.verbose);
    }

    #[test]
    fn test_from_path_reports_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "refinement = \"fine\"").unwrap();

        let err = FileConfig::from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_paths_start_local() {
        let paths = get_config_paths();
        assert_eq!(paths[0], PathBuf::from("shapebake.toml"));
        assert_eq!(paths[1], PathBuf::from(".shapebake.toml"));
    }
}
