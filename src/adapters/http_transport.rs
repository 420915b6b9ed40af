use crate::config::toml_config::DEFAULT_DRIVER;
use crate::domain::ports::{Credentials, ProcedureConnection, ProcedureTransport};
use crate::utils::error::TransportError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

pub const PROBE_SQL: &str = "SELECT 1 FROM SYSIBM.SYSDUMMY1";

#[derive(Debug, Serialize)]
struct CallRequest<'a> {
    procedure: &'a str,
    parameters: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct CallReply {
    output: Option<String>,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    sql: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryReply {
    #[serde(default)]
    rows: Vec<Vec<serde_json::Value>>,
}

/// 透過 HTTP 程序橋接服務呼叫主機的 SQL 介面
#[derive(Debug, Clone, Default)]
pub struct HttpProcedureTransport;

impl HttpProcedureTransport {
    pub fn new() -> Self {
        Self
    }
}

pub struct HttpConnection {
    client: Client,
    base: Url,
    user: String,
    password: String,
}

#[async_trait]
impl ProcedureTransport for HttpProcedureTransport {
    type Connection = HttpConnection;

    fn supports_driver(&self, driver: &str) -> bool {
        driver == DEFAULT_DRIVER
    }

    async fn connect(
        &self,
        credentials: &Credentials,
    ) -> std::result::Result<HttpConnection, TransportError> {
        let base = Url::parse(&credentials.url)
            .map_err(|e| TransportError::Connect(format!("invalid datasource url: {}", e)))?;

        // 每條連線都是新的 client，不保留閒置連線
        let mut builder = Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = credentials.login_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(HttpConnection {
            client: builder.build()?,
            base,
            user: credentials.user.clone(),
            password: credentials.password.clone(),
        })
    }
}

impl HttpConnection {
    fn endpoint(&self, path: &str) -> std::result::Result<Url, TransportError> {
        let mut base = self.base.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path)
            .map_err(|e| TransportError::Connect(format!("invalid bridge path: {}", e)))
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<reqwest::Response, TransportError> {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .post(url)
            .basic_auth(&self.user, Some(&self.password))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ProcedureConnection for HttpConnection {
    async fn call(
        &mut self,
        procedure: &str,
        input: &str,
    ) -> std::result::Result<Option<String>, TransportError> {
        let response = self
            .post(
                "call",
                &CallRequest {
                    procedure,
                    parameters: [input],
                },
            )
            .await?;

        let reply: CallReply = response
            .json()
            .await
            .map_err(|e| TransportError::Protocol(e.to_string()))?;
        Ok(reply.output)
    }

    async fn probe(&mut self) -> std::result::Result<Option<i64>, TransportError> {
        let response = self.post("query", &QueryRequest { sql: PROBE_SQL }).await?;

        let reply: QueryReply = response
            .json()
            .await
            .map_err(|e| TransportError::Protocol(e.to_string()))?;
        Ok(reply
            .rows
            .first()
            .and_then(|row| row.first())
            .and_then(serde_json::Value::as_i64))
    }

    async fn close(self) {
        drop(self);
    }
}
