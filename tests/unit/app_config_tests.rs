/*!
 * Tests for application configuration functionality
 */

use lexibook::app_config::{Config, LogLevel};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.openai.api_key, "");
    assert_eq!(config.openai.model, "gpt-4-1106-preview");
    assert_eq!(config.openai.endpoint, "https://api.openai.com/v1");
    assert_eq!(config.translation.max_chunk_size, 2000);
    assert_eq!(config.translation.temperature, 0.2);
    assert_eq!(config.translation.retry_count, 3);
    assert_eq!(config.translation.retry_backoff_ms, 1000);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.translation.system_prompt.contains("{source_language}"));
    assert!(config.translation.system_prompt.contains("{target_language}"));
}

/// Test loading a minimal YAML config with defaults filled in
#[test]
fn test_parse_config_withMinimalYaml_shouldApplyDefaults() {
    let yaml = r#"
openai:
  api_key: sk-test-key
"#;

    let config: Config = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(config.openai.api_key, "sk-test-key");
    assert_eq!(config.openai.model, "gpt-4-1106-preview");
    assert_eq!(config.translation.max_chunk_size, 2000);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test loading a YAML config that overrides tuning values
#[test]
fn test_parse_config_withOverrides_shouldUseProvidedValues() {
    let yaml = r#"
openai:
  api_key: sk-test-key
  model: gpt-4o
  endpoint: http://localhost:1234/v1
translation:
  max_chunk_size: 500
  temperature: 0.7
  retry_count: 5
log_level: debug
"#;

    let config: Config = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(config.openai.model, "gpt-4o");
    assert_eq!(config.openai.endpoint, "http://localhost:1234/v1");
    assert_eq!(config.translation.max_chunk_size, 500);
    assert_eq!(config.translation.temperature, 0.7);
    assert_eq!(config.translation.retry_count, 5);
    // Unset fields inside an overridden section still get defaults
    assert_eq!(config.translation.retry_backoff_ms, 1000);
    assert_eq!(config.log_level, LogLevel::Debug);
}

/// Test that validation requires an API key
#[test]
fn test_validate_withMissingApiKey_shouldFail() {
    let config = Config::default();

    let result = config.validate();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("API key"));
}

/// Test that validation rejects out-of-range tuning values
#[test]
fn test_validate_withBadTuning_shouldFail() {
    let mut config = Config::default();
    config.openai.api_key = "sk-test-key".to_string();

    config.translation.temperature = 3.0;
    assert!(config.validate().is_err());

    config.translation.temperature = 0.2;
    config.translation.max_chunk_size = 0;
    assert!(config.validate().is_err());
}

/// Test that a complete configuration validates
#[test]
fn test_validate_withApiKey_shouldSucceed() {
    let mut config = Config::default();
    config.openai.api_key = "sk-test-key".to_string();

    assert!(config.validate().is_ok());
}
