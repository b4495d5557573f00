/*!
 * Tests for configuration persistence and key handling
 */

use anyhow::Result;
use screenplay_formatter::app_config::{Config, CorrectionProvider, LogLevel, mask_api_key};
use screenplay_formatter::errors::ConfigError;

use crate::common;

/// Settings written by one run are read back by the next
#[test]
fn test_config_saveThenLoad_shouldRoundTripChanges() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.set_api_key("sk-test-1234567890abcd");
    config.set_model("gpt-4o")?;
    config.set_confidence(0.65)?;
    config.set_strict(true);
    config.save(&path)?;

    let loaded = Config::load(&path);
    assert_eq!(loaded, config);
    assert_eq!(loaded.llm.model, "gpt-4o");
    assert!(loaded.validation.strict);
    Ok(())
}

#[test]
fn test_config_load_withCorruptFile_shouldFallBackToDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "config.json", "{ not json")?;
    assert_eq!(Config::load(&path), Config::default());
    Ok(())
}

#[test]
fn test_config_fromJson_shouldAcceptProviderAndLevelNames() {
    let config: Config = serde_json::from_str(
        r#"{"llm": {"provider": "lmstudio", "model": "local-model"}, "log_level": "debug"}"#,
    )
    .unwrap();

    assert_eq!(config.llm.provider, CorrectionProvider::LMStudio);
    assert_eq!(config.llm.get_endpoint(), "http://localhost:1234/v1");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!((config.llm.min_confidence - 0.8).abs() < f64::EPSILON);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_requireApiKey_withoutKey_shouldBeFatalForOpenAi() {
    let config = Config::default();
    let result = config.require_api_key_with(None);
    assert!(matches!(result, Err(ConfigError::MissingApiKey(_))));
    assert!(result.unwrap_err().to_string().contains("OPENAI_API_KEY"));
}

#[test]
fn test_config_setConfidence_outOfRange_shouldKeepPreviousValue() {
    let mut config = Config::default();
    assert!(config.set_confidence(1.5).is_err());
    assert!(config.set_confidence(-0.1).is_err());
    assert!((config.llm.min_confidence - 0.8).abs() < f64::EPSILON);
}

#[test]
fn test_maskApiKey_shouldNeverRevealShortKeys() {
    assert_eq!(mask_api_key("sk-short"), "***");
    assert_eq!(mask_api_key("sk-abcdefghijklmnop"), "sk-abcde...mnop");
}
