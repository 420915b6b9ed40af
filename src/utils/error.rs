use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum VoucherError {
    /// 呼叫端造成的錯誤 (文件類型對應不存在、結構驗證失敗)
    #[error("{description}")]
    Domain {
        code: String,
        description: String,
        status: u16,
    },

    /// 系統面錯誤，對外一律以通用代碼回應
    #[error("{message}")]
    Technical {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {reason} (value: {value})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Domain,
    Technical,
}

impl VoucherError {
    pub fn domain(code: impl Into<String>, description: impl Into<String>, status: u16) -> Self {
        Self::Domain {
            code: code.into(),
            description: description.into(),
            status,
        }
    }

    pub fn technical(message: impl Into<String>, status: u16) -> Self {
        Self::Technical {
            message: message.into(),
            status: Some(status),
            source: None,
        }
    }

    pub fn technical_with_source(
        message: impl Into<String>,
        status: u16,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Technical {
            message: message.into(),
            status: Some(status),
            source: Some(source.into()),
        }
    }

    /// 只有 Domain 保留原本的代碼，其餘都視為技術性錯誤
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain { .. } => ErrorCategory::Domain,
            _ => ErrorCategory::Technical,
        }
    }

    pub fn is_domain(&self) -> bool {
        self.category() == ErrorCategory::Domain
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Domain { status, .. } => Some(*status),
            Self::Technical { status, .. } => *status,
            _ => None,
        }
    }
}

/// 程序呼叫傳輸層錯誤
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("procedure bridge responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed procedure reply: {0}")]
    Protocol(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, VoucherError>;
