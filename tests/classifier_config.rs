use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::{Builder, NamedTempFile};

use tl_classifier::config::ClassifierConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "TL_CONFIG",
        "TL_MODEL_DIR",
        "TL_DETECTOR_MODEL",
        "TL_DETECTOR_URL",
        "TL_DETECTOR_CHECKSUM",
        "TL_CLASSIFIER_MODEL",
        "TL_CLASSIFIER_URL",
        "TL_CLASSIFIER_CHECKSUM",
        "TL_DETECTOR_INPUT",
    ] {
        std::env::remove_var(key);
    }
}

const EMPTY_MD5: &str = "md5:d41d8cd98f00b204e9800998ecf8427e";

#[test]
fn loads_json_config_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = format!(
        r#"{{
            "model_dir": "/opt/models",
            "detector": {{
                "path": "rfcn.onnx",
                "url": "https://models.example.com/rfcn.onnx",
                "checksum": "{}",
                "input_width": 640,
                "input_height": 480
            }},
            "classifier": {{
                "path": "/srv/lenet.onnx",
                "checksum": "{}"
            }}
        }}"#,
        EMPTY_MD5, EMPTY_MD5
    );
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("TL_CONFIG", file.path());
    std::env::set_var("TL_DETECTOR_INPUT", "800x600");
    std::env::set_var(
        "TL_CLASSIFIER_CHECKSUM",
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
    );

    let cfg = ClassifierConfig::load().expect("load config");

    assert_eq!(cfg.model_dir, PathBuf::from("/opt/models"));
    assert_eq!(cfg.detector.path, PathBuf::from("/opt/models/rfcn.onnx"));
    assert_eq!(
        cfg.detector.url.as_deref(),
        Some("https://models.example.com/rfcn.onnx")
    );
    assert_eq!(cfg.classifier.path, PathBuf::from("/srv/lenet.onnx"));
    assert_eq!(cfg.detector_input, (800, 600));

    let classifier = cfg.classifier_artifact().expect("classifier artifact");
    assert_eq!(classifier.checksum.algorithm(), "sha256");
    let detector = cfg.detector_artifact().expect("detector artifact");
    assert_eq!(detector.checksum.to_string(), EMPTY_MD5);

    clear_env();
}

#[test]
fn loads_toml_config() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = Builder::new().suffix(".toml").tempfile().expect("temp config");
    let toml = format!(
        r#"
model_dir = "models"

[detector]
checksum = "{}"
input_width = 512
input_height = 512
"#,
        EMPTY_MD5
    );
    std::io::Write::write_all(&mut file, toml.as_bytes()).expect("write config");

    let cfg = ClassifierConfig::load_from(Some(file.path())).expect("load config");
    assert_eq!(cfg.detector_input, (512, 512));
    assert_eq!(cfg.detector.path, PathBuf::from("models/detector.onnx"));
    assert_eq!(cfg.classifier.path, PathBuf::from("models/classifier.onnx"));
    assert!(cfg.classifier_artifact().is_err());

    clear_env();
}

#[test]
fn defaults_apply_without_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("TL_MODEL_DIR", "/var/lib/tl");
    let cfg = ClassifierConfig::load().expect("load config");
    assert_eq!(cfg.detector.path, PathBuf::from("/var/lib/tl/detector.onnx"));
    assert_eq!(cfg.detector_input, (300, 300));

    clear_env();
}

#[test]
fn rejects_invalid_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("TL_DETECTOR_INPUT", "big");
    assert!(ClassifierConfig::load().is_err());
    clear_env();

    std::env::set_var("TL_DETECTOR_INPUT", "0x300");
    assert!(ClassifierConfig::load().is_err());
    clear_env();

    std::env::set_var("TL_DETECTOR_CHECKSUM", "md5:1234");
    assert!(ClassifierConfig::load().is_err());
    clear_env();

    std::env::set_var("TL_CLASSIFIER_URL", "not a url");
    assert!(ClassifierConfig::load().is_err());
    clear_env();
}
