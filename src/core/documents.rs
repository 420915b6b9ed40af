use crate::config::ErrorCatalog;
use crate::utils::error::{Result, VoucherError};
use std::collections::BTreeMap;

/// 對外兩碼文件類型 <-> 主機數字代碼
#[derive(Debug, Clone)]
pub struct DocumentTypeRegistry {
    mapping: BTreeMap<String, String>,
    structure_code: String,
    structure_description: String,
    structure_status: u16,
}

impl DocumentTypeRegistry {
    pub fn new(mapping: BTreeMap<String, String>, errors: &ErrorCatalog) -> Self {
        Self {
            mapping,
            structure_code: errors.structure.code.clone(),
            structure_description: errors.structure.description.clone(),
            structure_status: errors.structure_status,
        }
    }

    /// 編碼方向：找不到對應時是呼叫端的錯
    pub fn resolve_internal_code(&self, external_code: &str) -> Result<&str> {
        if external_code.trim().is_empty() {
            return Err(self.structure_error());
        }
        self.mapping
            .get(external_code)
            .map(String::as_str)
            .ok_or_else(|| self.structure_error())
    }

    /// 解碼方向：主機回傳的代碼若無對應，就當作沒有
    pub fn resolve_external_code(&self, internal_code: &str) -> Option<&str> {
        let internal_code = internal_code.trim();
        if internal_code.is_empty() {
            return None;
        }
        self.mapping
            .iter()
            .find(|(_, internal)| internal.as_str() == internal_code)
            .map(|(external, _)| external.as_str())
    }

    fn structure_error(&self) -> VoucherError {
        VoucherError::domain(
            self.structure_code.clone(),
            self.structure_description.clone(),
            self.structure_status,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorEntry;

    fn registry() -> DocumentTypeRegistry {
        let mapping = BTreeMap::from([
            ("CC".to_string(), "01".to_string()),
            ("CE".to_string(), "02".to_string()),
            ("NI".to_string(), "03".to_string()),
        ]);
        let errors = ErrorCatalog {
            structure: ErrorEntry {
                code: "E01".to_string(),
                description: "Error de estructura".to_string(),
            },
            general: ErrorEntry {
                code: "E09".to_string(),
                description: "Error general".to_string(),
            },
            structure_status: 400,
            general_status: 500,
        };
        DocumentTypeRegistry::new(mapping, &errors)
    }

    #[test]
    fn test_resolve_internal_code() {
        let registry = registry();
        assert_eq!(registry.resolve_internal_code("CE").unwrap(), "02");
    }

    #[test]
    fn test_unmapped_code_is_domain_error() {
        let err = registry().resolve_internal_code("XX").unwrap_err();
        match err {
            VoucherError::Domain {
                code,
                description,
                status,
            } => {
                assert_eq!(code, "E01");
                assert_eq!(description, "Error de estructura");
                assert_eq!(status, 400);
            }
            other => panic!("expected domain error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_code_is_domain_error() {
        assert!(registry().resolve_internal_code("  ").unwrap_err().is_domain());
    }

    #[test]
    fn test_reverse_lookup_is_silent() {
        let registry = registry();
        assert_eq!(registry.resolve_external_code("03"), Some("NI"));
        assert_eq!(registry.resolve_external_code("99"), None);
        assert_eq!(registry.resolve_external_code(""), None);
    }
}
