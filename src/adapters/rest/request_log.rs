use crate::domain::model::HeaderContext;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// 失敗時附在紀錄上的錯誤摘要
#[derive(Debug, Clone, Copy)]
pub struct ErrorSummary<'a> {
    pub kind: &'a str,
    pub message: &'a str,
}

/// 每次 REST 呼叫輸出一行 JSON 紀錄
pub fn log_success(
    operation: &str,
    context: &HeaderContext,
    request: &Value,
    response: &impl Serialize,
    finished_at: DateTime<Utc>,
) {
    let line = build_entry(operation, context, request, response, finished_at, None);
    tracing::info!("{}", render(&line, operation));
}

pub fn log_failure(
    operation: &str,
    context: &HeaderContext,
    request: &Value,
    response: &impl Serialize,
    finished_at: DateTime<Utc>,
    error: ErrorSummary<'_>,
) {
    let line = build_entry(operation, context, request, response, finished_at, Some(error));
    tracing::error!("{}", render(&line, operation));
}

pub fn build_entry(
    operation: &str,
    context: &HeaderContext,
    request: &Value,
    response: &impl Serialize,
    finished_at: DateTime<Utc>,
    error: Option<ErrorSummary<'_>>,
) -> Value {
    let elapsed = (finished_at - context.received_at).num_milliseconds().max(0);

    let mut entry = Map::new();
    entry.insert("operation".to_string(), json!(operation));
    entry.insert("elapsedMillis".to_string(), json!(elapsed));
    entry.insert("headers".to_string(), Value::Object(headers(context)));
    entry.insert("request".to_string(), request.clone());
    entry.insert(
        "response".to_string(),
        serde_json::to_value(response).unwrap_or(Value::Null),
    );
    if let Some(error) = error {
        entry.insert(
            "error".to_string(),
            json!({ "type": error.kind, "message": error.message }),
        );
    }
    Value::Object(entry)
}

fn headers(context: &HeaderContext) -> Map<String, Value> {
    let mut headers = Map::new();
    let present = [
        ("idTransaccion", &context.transaction_id),
        ("nombreAplicacion", &context.application_name),
        ("ipAplicacion", &context.application_ip),
        ("timestamp", &context.timestamp),
    ];
    for (name, value) in present {
        if let Some(value) = value {
            headers.insert(name.to_string(), json!(value));
        }
    }
    headers
}

fn render(entry: &Value, operation: &str) -> String {
    serde_json::to_string(entry)
        .unwrap_or_else(|e| format!("{{\"operation\":\"{}\",\"logError\":\"{}\"}}", operation, e))
}
