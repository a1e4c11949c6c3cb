use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::{Checksum, ModelArtifact};

const DEFAULT_MODEL_DIR: &str = "traffic-light-models";
const DEFAULT_DETECTOR_FILE: &str = "detector.onnx";
const DEFAULT_CLASSIFIER_FILE: &str = "classifier.onnx";
const DEFAULT_DETECTOR_WIDTH: u32 = 300;
const DEFAULT_DETECTOR_HEIGHT: u32 = 300;

#[derive(Debug, Deserialize, Default)]
struct ClassifierConfigFile {
    model_dir: Option<PathBuf>,
    detector: Option<ModelConfigFile>,
    classifier: Option<ModelConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct ModelConfigFile {
    path: Option<PathBuf>,
    url: Option<String>,
    checksum: Option<String>,
    input_width: Option<u32>,
    input_height: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub model_dir: PathBuf,
    pub detector: ModelSettings,
    pub classifier: ModelSettings,
    pub detector_input: (u32, u32),
}

#[derive(Debug, Clone, Default)]
pub struct ModelSettings {
    pub path: PathBuf,
    pub url: Option<String>,
    pub checksum: Option<String>,
}

impl ClassifierConfig {
    /// Load from the file named by `TL_CONFIG` (if any), then apply env overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("TL_CONFIG").ok();
        Self::load_from(config_path.as_deref().map(Path::new))
    }

    /// Load from an explicit file (or defaults), then apply env overrides.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ClassifierConfigFile) -> Self {
        let model_dir = file
            .model_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR));
        let detector_input = (
            file.detector
                .as_ref()
                .and_then(|d| d.input_width)
                .unwrap_or(DEFAULT_DETECTOR_WIDTH),
            file.detector
                .as_ref()
                .and_then(|d| d.input_height)
                .unwrap_or(DEFAULT_DETECTOR_HEIGHT),
        );
        Self {
            model_dir,
            detector: model_settings(file.detector, DEFAULT_DETECTOR_FILE),
            classifier: model_settings(file.classifier, DEFAULT_CLASSIFIER_FILE),
            detector_input,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(dir) = non_empty_env("TL_MODEL_DIR") {
            self.model_dir = PathBuf::from(dir);
        }
        if let Some(path) = non_empty_env("TL_DETECTOR_MODEL") {
            self.detector.path = PathBuf::from(path);
        }
        if let Some(url) = non_empty_env("TL_DETECTOR_URL") {
            self.detector.url = Some(url);
        }
        if let Some(checksum) = non_empty_env("TL_DETECTOR_CHECKSUM") {
            self.detector.checksum = Some(checksum);
        }
        if let Some(path) = non_empty_env("TL_CLASSIFIER_MODEL") {
            self.classifier.path = PathBuf::from(path);
        }
        if let Some(url) = non_empty_env("TL_CLASSIFIER_URL") {
            self.classifier.url = Some(url);
        }
        if let Some(checksum) = non_empty_env("TL_CLASSIFIER_CHECKSUM") {
            self.classifier.checksum = Some(checksum);
        }
        if let Some(size) = non_empty_env("TL_DETECTOR_INPUT") {
            self.detector_input = parse_size(&size)
                .ok_or_else(|| anyhow!("TL_DETECTOR_INPUT must look like WIDTHxHEIGHT"))?;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        if self.detector_input.0 == 0 || self.detector_input.1 == 0 {
            return Err(anyhow!("detector input size must be non-zero"));
        }
        for (name, model) in [("detector", &self.detector), ("classifier", &self.classifier)] {
            if let Some(checksum) = &model.checksum {
                checksum
                    .parse::<Checksum>()
                    .with_context(|| format!("invalid {} checksum", name))?;
            }
            if let Some(url) = &model.url {
                url::Url::parse(url).with_context(|| format!("invalid {} url", name))?;
            }
        }
        if self.detector.path.is_relative() {
            self.detector.path = self.model_dir.join(&self.detector.path);
        }
        if self.classifier.path.is_relative() {
            self.classifier.path = self.model_dir.join(&self.classifier.path);
        }
        Ok(())
    }

    pub fn detector_artifact(&self) -> Result<ModelArtifact> {
        artifact("detector", &self.detector)
    }

    pub fn classifier_artifact(&self) -> Result<ModelArtifact> {
        artifact("classifier", &self.classifier)
    }
}

fn model_settings(file: Option<ModelConfigFile>, default_file: &str) -> ModelSettings {
    let file = file.unwrap_or_default();
    ModelSettings {
        path: file.path.unwrap_or_else(|| PathBuf::from(default_file)),
        url: file.url,
        checksum: file.checksum,
    }
}

fn artifact(name: &str, model: &ModelSettings) -> Result<ModelArtifact> {
    let checksum = model
        .checksum
        .as_deref()
        .ok_or_else(|| anyhow!("{} model has no checksum configured", name))?
        .parse()?;
    Ok(ModelArtifact {
        name: name.to_string(),
        path: model.path.clone(),
        url: model.url.clone(),
        checksum,
    })
}

fn read_config_file(path: &Path) -> Result<ClassifierConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parse_size(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}
