use crate::config::toml_config::sanitize;
use crate::config::DataSourceConfig;
use crate::domain::ports::{mask, Credentials, ProcedureConnection, ProcedureTransport};
use crate::utils::error::{Result, VoucherError};
use std::time::Duration;
use tokio::sync::OnceCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayState {
    Unconfigured,
    Ready,
    Disabled,
}

impl GatewayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Ready => "ready",
            Self::Disabled => "disabled",
        }
    }
}

enum Readiness {
    Ready(Credentials),
    Disabled,
}

/// 主機預存程序的呼叫閘道。
///
/// 設定只在第一次使用時檢查一次；不完整的設定會讓閘道永久停用，
/// 之後每次 `execute` 都直接回 503，不會嘗試連線。
/// 每次呼叫都開一條新連線，用完即關閉，沒有連線池。
pub struct ProcedureGateway<T: ProcedureTransport> {
    datasource: DataSourceConfig,
    transport: T,
    readiness: OnceCell<Readiness>,
}

impl<T: ProcedureTransport> ProcedureGateway<T> {
    pub fn new(datasource: DataSourceConfig, transport: T) -> Self {
        Self {
            datasource,
            transport,
            readiness: OnceCell::new(),
        }
    }

    pub fn state(&self) -> GatewayState {
        match self.readiness.get() {
            None => GatewayState::Unconfigured,
            Some(Readiness::Ready(_)) => GatewayState::Ready,
            Some(Readiness::Disabled) => GatewayState::Disabled,
        }
    }

    /// 解析設定狀態；併發呼叫時只有第一個會執行檢查，其餘等待同一結果
    pub async fn ensure_ready(&self) -> GatewayState {
        self.readiness().await;
        self.state()
    }

    pub async fn execute(&self, procedure: &str, payload: &str) -> Result<Option<String>> {
        let credentials = match self.readiness().await {
            Readiness::Ready(credentials) => credentials,
            Readiness::Disabled => {
                return Err(VoucherError::technical(
                    "Datasource not configured. Check the [datasource] settings",
                    503,
                ));
            }
        };

        tracing::debug!("Calling stored procedure {} ({} chars)", procedure, payload.len());

        let mut connection = self.transport.connect(credentials).await.map_err(|e| {
            VoucherError::technical_with_source(
                format!("Error executing stored procedure: {}", e),
                500,
                e,
            )
        })?;

        let outcome = connection.call(procedure, payload).await;
        connection.close().await;

        outcome.map_err(|e| {
            VoucherError::technical_with_source(
                format!("Error executing stored procedure: {}", e),
                500,
                e,
            )
        })
    }

    async fn readiness(&self) -> &Readiness {
        self.readiness.get_or_init(|| self.resolve()).await
    }

    async fn resolve(&self) -> Readiness {
        let ds = &self.datasource;
        let (url, user, password) = match (
            sanitize(ds.url.as_deref()),
            sanitize(ds.user.as_deref()),
            sanitize(ds.password.as_deref()),
        ) {
            (Some(url), Some(user), Some(password)) => (url, user, password),
            _ => {
                tracing::warn!(
                    "⚠️ Datasource not fully configured (url/user/password). \
                     The service stays up but every operation will fail until it is completed."
                );
                return Readiness::Disabled;
            }
        };

        if !self.transport.supports_driver(&ds.driver) {
            tracing::error!("❌ Unsupported datasource driver: {}", ds.driver);
            return Readiness::Disabled;
        }

        let credentials = Credentials {
            url: url.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            login_timeout: ds.login_timeout_seconds.map(Duration::from_secs),
        };

        tracing::info!(
            "✅ Datasource configured (url={} user={} driver={})",
            mask(url),
            mask(user),
            ds.driver
        );

        self.probe(&credentials).await;
        Readiness::Ready(credentials)
    }

    /// 失敗只記錄，不會讓閘道回到停用狀態
    async fn probe(&self, credentials: &Credentials) {
        let mut connection = match self.transport.connect(credentials).await {
            Ok(connection) => connection,
            Err(e) => {
                tracing::warn!("⚠️ Connectivity probe failed: {}", e);
                return;
            }
        };

        match connection.probe().await {
            Ok(Some(value)) => tracing::info!(
                "🔌 Connectivity probe succeeded (SELECT 1 FROM SYSIBM.SYSDUMMY1 -> {})",
                value
            ),
            Ok(None) => tracing::warn!("⚠️ Connectivity probe returned no rows"),
            Err(e) => tracing::warn!("⚠️ Connectivity probe failed: {}", e),
        }
        connection.close().await;
    }
}

/// 健康檢查只需要知道閘道狀態，不需要知道傳輸實作
pub trait GatewayHealth: Send + Sync {
    fn gateway_state(&self) -> GatewayState;
}

impl<T: ProcedureTransport> GatewayHealth for ProcedureGateway<T> {
    fn gateway_state(&self) -> GatewayState {
        self.state()
    }
}
