use crate::config::{parse_collector, AnalysisConfig, GcScopeConfig, ParserConfig};
use anyhow::{anyhow, Context, Result};
use chrono::DateTime;
use indexmap::IndexMap;
use std::env;
use std::path::{Path, PathBuf};

const PROJECT_FILE: &str = ".gcscoperc";

/// Configuration file handler for gcscope
///
/// ```ini
/// [parser]
/// collector = g1
/// jvm_start = 2016-10-10T18:39:37.244-07:00
///
/// [analysis]
/// max_pause_ms = 500
/// ```
#[derive(Debug, Default, Clone)]
pub struct ConfigFile {
    pub parser: IndexMap<String, String>,
    pub analysis: IndexMap<String, String>,
}

impl ConfigFile {
    /// Find project-level .gcscoperc by walking up from the current directory
    pub fn find_project_config() -> Option<PathBuf> {
        let current = env::current_dir().ok()?;
        Self::find_project_config_from(&current)
    }

    pub fn find_project_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let config_path = current.join(PROJECT_FILE);
            if config_path.exists() {
                return Some(config_path);
            }
            if !current.pop() {
                break;
            }
        }
        None
    }

    /// User config file locations in order of preference
    pub fn get_user_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if cfg!(windows) {
            if let Ok(appdata) = env::var("APPDATA") {
                paths.push(PathBuf::from(appdata).join("gcscope").join("config.ini"));
            }
            if let Ok(userprofile) = env::var("USERPROFILE") {
                paths.push(PathBuf::from(userprofile).join(PROJECT_FILE));
            }
        } else {
            let xdg_config = env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    env::var("HOME")
                        .map(|h| PathBuf::from(h).join(".config"))
                        .unwrap_or_else(|_| PathBuf::from(".config"))
                });

            paths.push(xdg_config.join("gcscope").join("config.ini"));

            if let Ok(home) = env::var("HOME") {
                paths.push(PathBuf::from(home).join(PROJECT_FILE));
            }
        }

        paths
    }

    /// Load configuration with precedence: project > user > defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::get_user_config_paths().into_iter().find(|p| p.exists()) {
            config = Self::merge_configs(config, Self::load_from_path(&path)?);
        }

        if let Some(project_path) = Self::find_project_config() {
            config = Self::merge_configs(config, Self::load_from_path(&project_path)?);
        }

        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse_ini_content(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    fn parse_ini_content(content: &str) -> Result<Self> {
        let mut config = Self::default();
        let mut current_section = String::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len() - 1].trim().to_string();
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(anyhow!("line {}: expected 'key = value'", index + 1));
            };
            let (key, value) = (key.trim().to_string(), value.trim().to_string());

            match current_section.as_str() {
                "parser" => {
                    config.parser.insert(key, value);
                }
                "analysis" => {
                    config.analysis.insert(key, value);
                }
                _ => {
                    // Unknown sections are ignored
                }
            }
        }

        Ok(config)
    }

    /// Merge two configurations, the second taking precedence per key
    fn merge_configs(base: Self, overlay: Self) -> Self {
        let mut merged = base;
        merged.parser.extend(overlay.parser);
        merged.analysis.extend(overlay.analysis);
        merged
    }

    /// Apply the file's settings on top of `config`
    pub fn apply(&self, config: &mut GcScopeConfig) -> Result<()> {
        apply_parser(&self.parser, &mut config.parser)?;
        apply_analysis(&self.analysis, &mut config.analysis)?;
        Ok(())
    }

    /// Defaults overlaid with whatever the config files set
    pub fn resolve(&self) -> Result<GcScopeConfig> {
        let mut config = GcScopeConfig::default();
        self.apply(&mut config)?;
        Ok(config)
    }
}

fn apply_parser(values: &IndexMap<String, String>, parser: &mut ParserConfig) -> Result<()> {
    for (key, value) in values {
        match key.as_str() {
            "collector" => {
                parser.collector = Some(
                    parse_collector(value)
                        .ok_or_else(|| anyhow!("unknown collector family '{}'", value))?,
                );
            }
            "jvm_start" => {
                let start = DateTime::parse_from_rfc3339(value)
                    .with_context(|| format!("parser.jvm_start: invalid timestamp '{}'", value))?;
                parser.jvm_start = Some(start);
            }
            "keep_discardable" => parser.keep_discardable = parse_bool(key, value)?,
            _ => tracing::debug!(key = %key, "ignoring unknown parser setting"),
        }
    }
    Ok(())
}

fn apply_analysis(values: &IndexMap<String, String>, analysis: &mut AnalysisConfig) -> Result<()> {
    for (key, value) in values {
        let target = match key.as_str() {
            "overhead_pause_ratio" => &mut analysis.overhead_pause_ratio,
            "overhead_reclaim_ratio" => &mut analysis.overhead_reclaim_ratio,
            "throughput_threshold" => &mut analysis.throughput_threshold,
            "heap_undersized_ratio" => &mut analysis.heap_undersized_ratio,
            "heap_oversized_ratio" => &mut analysis.heap_oversized_ratio,
            "no_headroom_ratio" => &mut analysis.no_headroom_ratio,
            "safepoint_gc_ratio" => &mut analysis.safepoint_gc_ratio,
            "max_pause_ms" => {
                analysis.max_pause_ms = value
                    .parse()
                    .with_context(|| format!("analysis.max_pause_ms: invalid value '{}'", value))?;
                continue;
            }
            _ => {
                tracing::debug!(key = %key, "ignoring unknown analysis setting");
                continue;
            }
        };
        *target = parse_ratio(key, value)?;
    }
    Ok(())
}

fn parse_ratio(key: &str, value: &str) -> Result<f64> {
    let ratio: f64 = value
        .parse()
        .with_context(|| format!("analysis.{}: invalid number '{}'", key, value))?;
    if !(0.0..=1.0).contains(&ratio) {
        return Err(anyhow!("analysis.{}: {} is outside 0..=1", key, ratio));
    }
    Ok(ratio)
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(anyhow!("{}: expected a boolean, got '{}'", key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::CollectorFamily;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# gcscope settings").unwrap();
        writeln!(file, "[parser]").unwrap();
        writeln!(file, "collector = cms").unwrap();
        writeln!(file, "jvm_start = 2016-10-10T18:39:37.244-07:00").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "[analysis]").unwrap();
        writeln!(file, "; tighter pause budget").unwrap();
        writeln!(file, "max_pause_ms = 250").unwrap();
        writeln!(file, "throughput_threshold = 0.95").unwrap();
        file.flush().unwrap();

        let config = ConfigFile::load_from_path(file.path()).unwrap().resolve().unwrap();

        assert_eq!(config.parser.collector, Some(CollectorFamily::Cms));
        assert!(config.parser.jvm_start.is_some());
        assert_eq!(config.analysis.max_pause_ms, 250);
        assert_eq!(config.analysis.throughput_threshold, 0.95);
        assert_eq!(config.analysis.overhead_pause_ratio, 0.98);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let config = ConfigFile::parse_ini_content("[analysis]\nheap_oversized_ratio = 3\n").unwrap();
        let err = config.resolve().unwrap_err();
        assert!(err.to_string().contains("outside"));

        let config = ConfigFile::parse_ini_content("[parser]\ncollector = epsilon\n").unwrap();
        assert!(config.resolve().is_err());

        assert!(ConfigFile::parse_ini_content("[parser]\njust words\n").is_err());
    }

    #[test]
    fn test_missing_file_has_context() {
        let dir = TempDir::new().unwrap();
        let err = ConfigFile::load_from_path(&dir.path().join("absent.ini")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_project_config_discovery() {
        let temp_dir = TempDir::new().unwrap();
        let project_root = temp_dir.path().canonicalize().unwrap();
        let subdir = project_root.join("logs").join("2024");
        std::fs::create_dir_all(&subdir).unwrap();

        let config_path = project_root.join(".gcscoperc");
        std::fs::write(&config_path, "[parser]\nkeep_discardable = yes\n").unwrap();

        assert_eq!(ConfigFile::find_project_config_from(&subdir), Some(config_path.clone()));
        let config = ConfigFile::load_from_path(&config_path).unwrap().resolve().unwrap();
        assert!(config.parser.keep_discardable);
    }

    #[test]
    fn test_config_merging() {
        let user = ConfigFile::parse_ini_content(
            "[parser]\ncollector = g1\n[analysis]\nmax_pause_ms = 100\n",
        )
        .unwrap();
        let project = ConfigFile::parse_ini_content("[analysis]\nmax_pause_ms = 300\n").unwrap();

        let merged = ConfigFile::merge_configs(user, project).resolve().unwrap();
        assert_eq!(merged.parser.collector, Some(CollectorFamily::G1));
        assert_eq!(merged.analysis.max_pause_ms, 300);
    }

    #[test]
    fn test_user_config_paths() {
        let paths = ConfigFile::get_user_config_paths();
        assert!(paths
            .iter()
            .any(|p| p.ends_with("gcscope/config.ini") || p.ends_with(".gcscoperc")));
    }
}
