use crate::adapters::{SupplierA, SupplierB, SupplierC, SupplierD};
use crate::domain::ports::SupplierAdapter;
use crate::utils::error::{AggregatorError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregatorConfig {
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub suppliers: SuppliersConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuppliersConfig {
    pub supplier_a: Option<SupplierConfig>,
    pub supplier_b: Option<SupplierConfig>,
    pub supplier_c: Option<SupplierConfig>,
    pub supplier_d: Option<SupplierConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub enabled: Option<bool>,
}

/// Resolved settings for one supplier after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSupplier {
    pub name: &'static str,
    pub base_url: String,
    pub timeout: Duration,
}

impl AggregatorConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AggregatorError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AggregatorError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPPLIER_A_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AggregatorError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn supplier_entries(&self) -> [(&'static str, &'static str, Option<&SupplierConfig>); 4] {
        [
            (SupplierA::NAME, SupplierA::DEFAULT_BASE_URL, self.suppliers.supplier_a.as_ref()),
            (SupplierB::NAME, SupplierB::DEFAULT_BASE_URL, self.suppliers.supplier_b.as_ref()),
            (SupplierC::NAME, SupplierC::DEFAULT_BASE_URL, self.suppliers.supplier_c.as_ref()),
            (SupplierD::NAME, SupplierD::DEFAULT_BASE_URL, self.suppliers.supplier_d.as_ref()),
        ]
    }

    /// Enabled suppliers in fixed A, B, C, D order with defaults filled in.
    pub fn resolved_suppliers(&self) -> Vec<ResolvedSupplier> {
        self.supplier_entries()
            .into_iter()
            .filter(|(_, _, cfg)| cfg.and_then(|c| c.enabled).unwrap_or(true))
            .map(|(name, default_url, cfg)| ResolvedSupplier {
                name,
                base_url: cfg
                    .and_then(|c| c.base_url.clone())
                    .unwrap_or_else(|| default_url.to_string()),
                timeout: Duration::from_secs(
                    cfg.and_then(|c| c.timeout_seconds)
                        .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
                ),
            })
            .collect()
    }

    /// Composition root for the engine's adapter list.
    pub fn build_adapters(&self) -> Vec<Arc<dyn SupplierAdapter>> {
        self.resolved_suppliers()
            .into_iter()
            .map(|s| -> Arc<dyn SupplierAdapter> {
                match s.name {
                    SupplierA::NAME => Arc::new(SupplierA::new(s.base_url).with_timeout(s.timeout)),
                    SupplierB::NAME => Arc::new(SupplierB::new(s.base_url).with_timeout(s.timeout)),
                    SupplierC::NAME => Arc::new(SupplierC::new(s.base_url).with_timeout(s.timeout)),
                    _ => Arc::new(SupplierD::new(s.base_url).with_timeout(s.timeout)),
                }
            })
            .collect()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .and_then(LogFormat::from_name)
            .unwrap_or_default()
    }

    pub fn validate_config(&self) -> Result<()> {
        for (name, _, cfg) in self.supplier_entries() {
            let Some(cfg) = cfg else { continue };
            if !cfg.enabled.unwrap_or(true) {
                continue;
            }

            if let Some(base_url) = &cfg.base_url {
                validate_url(&format!("suppliers.{}.base_url", name), base_url)?;
            }

            if let Some(timeout) = cfg.timeout_seconds {
                validate_positive_number(
                    &format!("suppliers.{}.timeout_seconds", name),
                    timeout,
                    1,
                )?;
            }
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if LogFormat::from_name(format).is_none() {
                return Err(AggregatorError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: "Unsupported format. Valid formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Validate for AggregatorConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_has_all_suppliers() {
        let config = AggregatorConfig::default();
        let suppliers = config.resolved_suppliers();

        let names: Vec<&str> = suppliers.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["supplier_a", "supplier_b", "supplier_c", "supplier_d"]);
        assert_eq!(suppliers[0].base_url, "http://localhost:8001");
        assert_eq!(suppliers[3].base_url, "http://localhost:8004");
        assert!(suppliers.iter().all(|s| s.timeout == Duration::from_secs(10)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_supplier_overrides() {
        let toml_content = r#"
[logging]
level = "debug"
format = "json"

[suppliers.supplier_b]
base_url = "https://b.example.com"
timeout_seconds = 3

[suppliers.supplier_c]
enabled = false
"#;

        let config = AggregatorConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_level(), Some("debug"));
        assert_eq!(config.log_format(), LogFormat::Json);

        let suppliers = config.resolved_suppliers();
        let names: Vec<&str> = suppliers.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["supplier_a", "supplier_b", "supplier_d"]);
        assert_eq!(suppliers[1].base_url, "https://b.example.com");
        assert_eq!(suppliers[1].timeout, Duration::from_secs(3));

        let adapters = config.build_adapters();
        let adapter_names: Vec<&str> = adapters.iter().map(|a| a.name()).collect();
        assert_eq!(adapter_names, names);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HOTEL_AGG_TEST_SUPPLIER_A_URL", "https://a.test.com");

        let toml_content = r#"
[suppliers.supplier_a]
base_url = "${HOTEL_AGG_TEST_SUPPLIER_A_URL}"
"#;

        let config = AggregatorConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.resolved_suppliers()[0].base_url,
            "https://a.test.com"
        );

        std::env::remove_var("HOTEL_AGG_TEST_SUPPLIER_A_URL");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = AggregatorConfig::from_toml_str(
            r#"
[suppliers.supplier_a]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(bad_url.validate().is_err());

        let zero_timeout = AggregatorConfig::from_toml_str(
            r#"
[suppliers.supplier_d]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(zero_timeout.validate().is_err());

        let bad_format = AggregatorConfig::from_toml_str(
            r#"
[logging]
format = "xml"
"#,
        )
        .unwrap();
        assert!(bad_format.validate().is_err());

        // disabled suppliers are not checked
        let disabled = AggregatorConfig::from_toml_str(
            r#"
[suppliers.supplier_a]
base_url = "invalid-url"
enabled = false
"#,
        )
        .unwrap();
        assert!(disabled.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = AggregatorConfig::from_toml_str("[suppliers\nbase_url = ");
        assert!(matches!(result, Err(AggregatorError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[suppliers.supplier_a]
base_url = "http://127.0.0.1:9001"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = AggregatorConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.resolved_suppliers()[0].base_url,
            "http://127.0.0.1:9001"
        );
    }
}
