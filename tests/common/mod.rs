#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use voucher_gateway::core::codec::{Span, TRAMA_LENGTH};
use voucher_gateway::domain::ports::Clock;

pub const PROCEDURE: &str = "BONLIB.SPGESBON(?, ?)";

/// 固定在 2025-03-07 09:05:30 的時鐘
pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 30))
            .unwrap()
    }
}

pub fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock)
}

/// 產生設定檔內容；`datasource` 為 None 時整段省略
pub fn config_toml(datasource: Option<&str>) -> String {
    let mut content = format!(
        r#"
[procedure]
name = "{PROCEDURE}"

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
structure = {{ code = "E01", description = "Error de estructura" }}
general = {{ code = "E09", description = "Error general del sistema" }}

[documents]
CC = "01"
CE = "02"
"#
    );

    if let Some(url) = datasource {
        content.push_str(&format!(
            r#"
[datasource]
url = "{url}"
user = "SVCBONOS"
password = "secret-pass"
login_timeout_seconds = 5
"#
        ));
    }
    content
}

/// 產生 2024 字元的回覆，指定位置填入值
pub fn reply(fields: &[(Span, &str)]) -> String {
    let mut chars = vec![' '; TRAMA_LENGTH];
    for (span, value) in fields {
        for (i, c) in value.chars().take(span.end - span.start).enumerate() {
            chars[span.start + i] = c;
        }
    }
    chars.into_iter().collect()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("idTransaccion", "TX-0001")
        .header("nombreAplicacion", "PORTAL")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
