use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 每個請求共用的發行方識別欄位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    pub bin: String,
    pub nit: String,
    pub subtype: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequest {
    pub issuer: Issuer,
    /// 對外的兩碼文件類型
    pub document_type: String,
    pub document_number: String,
    pub holder_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResponse {
    pub response_code: Option<String>,
    pub response_description: Option<String>,
    pub voucher_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateRequest {
    pub issuer: Issuer,
    pub voucher_number: String,
    /// 整數金額字串，編碼時補上兩位小數 "00"
    pub load_amount: String,
    pub audit_number: String,
    pub sequence_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateResponse {
    pub response_code: Option<String>,
    pub response_description: Option<String>,
    pub authorization_number: Option<String>,
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub holder_name: Option<String>,
    pub account_number: Option<String>,
    pub status: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveRequest {
    pub issuer: Issuer,
    pub document_type: String,
    pub document_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    /// 空白時為 None
    pub number: Option<String>,
    /// 原始數字去掉最後兩個字元後的值，無法解析時為 None
    pub amount: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveResponse {
    pub response_code: Option<String>,
    pub response_description: Option<String>,
    pub vouchers: Vec<Voucher>,
}

/// 呼叫端透過標頭帶入的追蹤資訊
#[derive(Debug, Clone)]
pub struct HeaderContext {
    pub transaction_id: Option<String>,
    pub application_name: Option<String>,
    pub application_ip: Option<String>,
    pub timestamp: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl HeaderContext {
    pub fn new(
        transaction_id: Option<String>,
        application_name: Option<String>,
        application_ip: Option<String>,
        timestamp: Option<String>,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: blank_to_none(transaction_id),
            application_name: blank_to_none(application_name),
            application_ip: blank_to_none(application_ip),
            timestamp: blank_to_none(timestamp),
            received_at,
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
