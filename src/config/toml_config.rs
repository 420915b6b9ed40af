use crate::utils::error::{Result, VoucherError};
use crate::utils::validation::{
    validate_combined_width, validate_non_empty_string, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

/// 應用碼 + switch 碼 + 異動碼 佔用的總寬度
pub const HEADER_CODES_WIDTH: usize = 8;
/// 啟用交易碼 + 裝置碼 + 交易類型 佔用的總寬度
pub const ACTIVATION_CODES_WIDTH: usize = 12;
pub const DEFAULT_DRIVER: &str = "http-bridge";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub procedure: ProcedureConfig,
    pub codes: CodesConfig,
    pub errors: ErrorCatalog,
    pub documents: BTreeMap<String, String>,
    #[serde(default)]
    pub datasource: DataSourceConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureConfig {
    /// 例如 `BONLIB.SPGESBON(?, ?)`
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodesConfig {
    pub application: String,
    pub switch: String,
    pub novelty: NoveltyCodes,
    pub activation: ActivationCodes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoveltyCodes {
    pub create: String,
    pub activate: String,
    pub consult: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationCodes {
    pub transaction_code: String,
    pub device: String,
    pub transaction_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCatalog {
    /// 結構驗證錯誤 (E01)
    pub structure: ErrorEntry,
    /// 通用技術錯誤 (E09)
    pub general: ErrorEntry,
    #[serde(default = "default_structure_status")]
    pub structure_status: u16,
    #[serde(default = "default_general_status")]
    pub general_status: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceConfig {
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_driver")]
    pub driver: String,
    pub login_timeout_seconds: Option<u64>,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            user: None,
            password: None,
            driver: default_driver(),
            login_timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
    pub level: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_driver() -> String {
    DEFAULT_DRIVER.to_string()
}

fn default_structure_status() -> u16 {
    400
}

fn default_general_status() -> u16 {
    500
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

/// 空白或未被替換的 `${VAR}` 視為未設定
pub fn sanitize(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !placeholder_regex().is_match(v))
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(VoucherError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| VoucherError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${AS400_PASSWORD})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        placeholder_regex()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("procedure.name", &self.procedure.name)?;

        let codes = &self.codes;
        for (field, novelty) in [
            ("codes.novelty.create", &codes.novelty.create),
            ("codes.novelty.activate", &codes.novelty.activate),
            ("codes.novelty.consult", &codes.novelty.consult),
        ] {
            validate_combined_width(
                field,
                &[codes.application.as_str(), codes.switch.as_str(), novelty.as_str()],
                HEADER_CODES_WIDTH,
            )?;
        }

        validate_combined_width(
            "codes.activation",
            &[
                codes.activation.transaction_code.as_str(),
                codes.activation.device.as_str(),
                codes.activation.transaction_type.as_str(),
            ],
            ACTIVATION_CODES_WIDTH,
        )?;

        if self.documents.is_empty() {
            return Err(VoucherError::MissingConfigError {
                field: "documents".to_string(),
            });
        }
        for (external, internal) in &self.documents {
            if internal.chars().count() != 2 {
                return Err(VoucherError::InvalidConfigValueError {
                    field: format!("documents.{}", external),
                    value: internal.clone(),
                    reason: "Internal document code must be 2 characters".to_string(),
                });
            }
        }

        validate_non_empty_string("errors.structure.code", &self.errors.structure.code)?;
        validate_non_empty_string("errors.general.code", &self.errors.general.code)?;
        validate_range("errors.structure_status", self.errors.structure_status, 400, 599)?;
        validate_range("errors.general_status", self.errors.general_status, 400, 599)?;

        // datasource 可以不完整 (閘道會停用)，但有填的 url 必須合法
        if let Some(url) = sanitize(self.datasource.url.as_deref()) {
            validate_url("datasource.url", url)?;
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub(crate) const SAMPLE_TOML: &str = r#"
[server]
port = 9090

[procedure]
name = "BONLIB.SPGESBON(?, ?)"

[codes]
application = "BONO"
switch = "RB"

[codes.novelty]
create = "01"
activate = "02"
consult = "03"

[codes.activation]
transaction_code = "0200"
device = "POS001"
transaction_type = "AC"

[errors]
structure = { code = "E01", description = "Error de estructura" }
general = { code = "E09", description = "Error general del sistema" }

[documents]
CC = "01"
CE = "02"
NI = "03"
PA = "04"

[datasource]
url = "https://bridge.example.com"
user = "SVCBONOS"
password = "${VOUCHER_TEST_UNSET_PASSWORD}"
"#;

    #[test]
    fn test_parse_sample_config() {
        let config = AppConfig::from_toml_str(SAMPLE_TOML).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.codes.novelty.activate, "02");
        assert_eq!(config.documents.get("CE").map(String::as_str), Some("02"));
        assert_eq!(config.errors.structure_status, 400);
        assert_eq!(config.errors.general_status, 500);
        assert_eq!(config.datasource.driver, DEFAULT_DRIVER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unresolved_placeholder_counts_as_unset() {
        let config = AppConfig::from_toml_str(SAMPLE_TOML).unwrap();

        assert_eq!(
            config.datasource.password.as_deref(),
            Some("${VOUCHER_TEST_UNSET_PASSWORD}")
        );
        assert_eq!(sanitize(config.datasource.password.as_deref()), None);
        assert_eq!(sanitize(Some("  ")), None);
        assert_eq!(sanitize(Some(" SVCBONOS ")), Some("SVCBONOS"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("VOUCHER_TEST_BRIDGE_URL", "https://as400-bridge.internal");
        let content = SAMPLE_TOML.replace(
            "https://bridge.example.com",
            "${VOUCHER_TEST_BRIDGE_URL}",
        );

        let config = AppConfig::from_toml_str(&content).unwrap();
        assert_eq!(
            config.datasource.url.as_deref(),
            Some("https://as400-bridge.internal")
        );

        std::env::remove_var("VOUCHER_TEST_BRIDGE_URL");
    }

    #[test]
    fn test_header_codes_must_fill_eight_characters() {
        let content = SAMPLE_TOML.replace("application = \"BONO\"", "application = \"BON\"");
        let config = AppConfig::from_toml_str(&content).unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("codes.novelty.create"));
    }

    #[test]
    fn test_activation_codes_must_fill_twelve_characters() {
        let content = SAMPLE_TOML.replace("device = \"POS001\"", "device = \"POS\"");
        let config = AppConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_datasource_url_rejected() {
        let content = SAMPLE_TOML.replace("https://bridge.example.com", "as400://host");
        let config = AppConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(SAMPLE_TOML.as_bytes()).unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.procedure.name, "BONLIB.SPGESBON(?, ?)");
    }
}
