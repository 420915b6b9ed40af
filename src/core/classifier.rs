use crate::config::ErrorCatalog;
use crate::utils::error::VoucherError;
use serde::Serialize;

/// 對外回應用的錯誤內容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReply {
    #[serde(skip)]
    pub status: u16,
    #[serde(rename = "codigoError")]
    pub code: String,
    #[serde(rename = "descripcionError")]
    pub description: String,
}

/// 將失敗分成呼叫端可修正的領域錯誤與技術錯誤
/// 技術錯誤一律回傳設定的通用代碼與描述
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    catalog: ErrorCatalog,
}

impl ErrorClassifier {
    pub fn new(catalog: ErrorCatalog) -> Self {
        Self { catalog }
    }

    /// Domain 與 Technical 原樣通過，其他錯誤一律包成 Technical
    pub fn normalize(&self, error: VoucherError) -> VoucherError {
        match error {
            VoucherError::Domain { .. } | VoucherError::Technical { .. } => error,
            other => VoucherError::Technical {
                message: other.to_string(),
                status: None,
                source: Some(Box::new(other)),
            },
        }
    }

    pub fn reply(&self, error: &VoucherError) -> ErrorReply {
        match error {
            VoucherError::Domain {
                code,
                description,
                status,
            } => ErrorReply {
                status: *status,
                code: code.clone(),
                description: description.clone(),
            },
            VoucherError::Technical { status, .. } => {
                self.general(status.unwrap_or(self.catalog.general_status))
            }
            _ => self.general(self.catalog.general_status),
        }
    }

    /// 請求格式不符時的回應，違規項目以逗號串接在描述後面
    pub fn structure_violation(&self, violations: &[String]) -> ErrorReply {
        let description = if violations.is_empty() {
            self.catalog.structure.description.clone()
        } else {
            format!(
                "{}: {}",
                self.catalog.structure.description,
                violations.join(", ")
            )
        };
        ErrorReply {
            status: self.catalog.structure_status,
            code: self.catalog.structure.code.clone(),
            description,
        }
    }

    fn general(&self, status: u16) -> ErrorReply {
        ErrorReply {
            status,
            code: self.catalog.general.code.clone(),
            description: self.catalog.general.description.clone(),
        }
    }
}
