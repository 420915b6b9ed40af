use crate::domain::model::{
    ActivateRequest, ActivateResponse, CreateRequest, CreateResponse, RetrieveRequest,
    RetrieveResponse,
};
use crate::utils::error::{Result, TransportError};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::fmt;
use std::time::Duration;

/// 三個票券生命週期操作的入口
#[async_trait]
pub trait VoucherManagement: Send + Sync {
    async fn create(&self, request: CreateRequest) -> Result<CreateResponse>;
    async fn activate(&self, request: ActivateRequest) -> Result<ActivateResponse>;
    async fn retrieve(&self, request: RetrieveRequest) -> Result<RetrieveResponse>;
}

/// 主機連線資訊。Debug 輸出只顯示遮罩後的值。
#[derive(Clone)]
pub struct Credentials {
    pub url: String,
    pub user: String,
    pub password: String,
    pub login_timeout: Option<Duration>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &mask(&self.url))
            .field("user", &mask(&self.user))
            .field("password", &"****")
            .field("login_timeout", &self.login_timeout)
            .finish()
    }
}

/// 保留前三與後三個字元，其餘以 `****` 取代；過短的值整個遮住
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 6 {
        return "****".to_string();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{}****{}", head, tail)
}

#[async_trait]
pub trait ProcedureTransport: Send + Sync {
    type Connection: ProcedureConnection;

    /// 是否能以此 driver 名稱建立連線
    fn supports_driver(&self, driver: &str) -> bool;

    async fn connect(
        &self,
        credentials: &Credentials,
    ) -> std::result::Result<Self::Connection, TransportError>;
}

/// 單次呼叫使用的連線，用完即關閉
#[async_trait]
pub trait ProcedureConnection: Send {
    /// 以單一輸入參數呼叫程序，回傳唯一的輸出參數
    async fn call(
        &mut self,
        procedure: &str,
        input: &str,
    ) -> std::result::Result<Option<String>, TransportError>;

    /// 連線測試 (`SELECT 1 FROM SYSIBM.SYSDUMMY1`)
    async fn probe(&mut self) -> std::result::Result<Option<i64>, TransportError>;

    async fn close(self);
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_edges() {
        assert_eq!(mask("http://as400.example.com"), "htt****com");
        assert_eq!(mask("bonusr"), "****");
        assert_eq!(mask(""), "****");
    }

    #[test]
    fn test_credentials_debug_never_shows_password() {
        let credentials = Credentials {
            url: "https://bridge.example.com".to_string(),
            user: "SVCBONOS01".to_string(),
            password: "s3cr3t-passw0rd".to_string(),
            login_timeout: None,
        };
        let rendered = format!("{:?}", credentials);
        assert!(!rendered.contains("s3cr3t-passw0rd"));
        assert!(!rendered.contains("SVCBONOS01"));
        assert!(rendered.contains("SVC****S01"));
    }
}
