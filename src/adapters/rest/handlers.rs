use super::dto::{
    ActivateVoucherDto, ActivateVoucherReply, CreateVoucherDto, CreateVoucherReply, RequestDto,
    RetrieveVouchersDto, RetrieveVouchersReply,
};
use super::request_log::{self, ErrorSummary};
use super::AppState;
use crate::core::classifier::ErrorReply;
use crate::domain::model::HeaderContext;
use crate::domain::ports::VoucherManagement;
use crate::utils::error::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;

// 標頭名稱不分大小寫，這裡用小寫形式
pub const TRANSACTION_ID: &str = "idtransaccion";
pub const APPLICATION_NAME: &str = "nombreaplicacion";
pub const APPLICATION_IP: &str = "ipaplicacion";
pub const TIMESTAMP: &str = "timestamp";

pub async fn create_voucher(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<CreateVoucherDto>, JsonRejection>,
) -> Response {
    handle(state, "crearBono", &headers, payload, |service, request| async move {
        service.create(request).await.map(CreateVoucherReply::from)
    })
    .await
}

pub async fn activate_voucher(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ActivateVoucherDto>, JsonRejection>,
) -> Response {
    handle(state, "activarBono", &headers, payload, |service, request| async move {
        service.activate(request).await.map(ActivateVoucherReply::from)
    })
    .await
}

pub async fn retrieve_vouchers(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<RetrieveVouchersDto>, JsonRejection>,
) -> Response {
    handle(state, "recuperarBono", &headers, payload, |service, request| async move {
        service.retrieve(request).await.map(RetrieveVouchersReply::from)
    })
    .await
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "UP",
        "gateway": state.gateway.gateway_state().as_str(),
    }))
}

/// 共用流程：擷取標頭、驗證請求、呼叫服務、轉換錯誤並記錄
async fn handle<D, R, F, Fut>(
    state: AppState,
    operation: &'static str,
    headers: &HeaderMap,
    payload: std::result::Result<Json<D>, JsonRejection>,
    call: F,
) -> Response
where
    D: RequestDto,
    R: Serialize,
    F: FnOnce(Arc<dyn VoucherManagement>, D::Domain) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let context = header_context(headers);

    let dto = match payload {
        Ok(Json(dto)) => dto,
        Err(rejection) => {
            let message = rejection.body_text();
            let reply = state.classifier.structure_violation(&[message.clone()]);
            request_log::log_failure(
                operation,
                &context,
                &Value::Null,
                &reply,
                Utc::now(),
                ErrorSummary {
                    kind: "MalformedRequest",
                    message: &message,
                },
            );
            return error_response(reply);
        }
    };

    let request = serde_json::to_value(&dto).unwrap_or(Value::Null);

    let violations = dto.violations();
    if !violations.is_empty() {
        let reply = state.classifier.structure_violation(&violations);
        request_log::log_failure(
            operation,
            &context,
            &request,
            &reply,
            Utc::now(),
            ErrorSummary {
                kind: "ValidationError",
                message: &violations.join(", "),
            },
        );
        return error_response(reply);
    }

    match call(Arc::clone(&state.service), dto.into_domain()).await {
        Ok(reply) => {
            request_log::log_success(operation, &context, &request, &reply, Utc::now());
            (StatusCode::OK, Json(reply)).into_response()
        }
        Err(err) => {
            let reply = state.classifier.reply(&err);
            request_log::log_failure(
                operation,
                &context,
                &request,
                &reply,
                Utc::now(),
                ErrorSummary {
                    kind: &format!("{:?}", err.category()),
                    message: &err.to_string(),
                },
            );
            error_response(reply)
        }
    }
}

pub fn header_context(headers: &HeaderMap) -> HeaderContext {
    let value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    HeaderContext::new(
        value(TRANSACTION_ID),
        value(APPLICATION_NAME),
        value(APPLICATION_IP),
        value(TIMESTAMP),
        Utc::now(),
    )
}

fn error_response(reply: ErrorReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(reply)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_header_context_reads_contract_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(TRANSACTION_ID, HeaderValue::from_static("TX-9"));
        headers.insert(APPLICATION_IP, HeaderValue::from_static("10.0.0.7"));
        headers.insert(TIMESTAMP, HeaderValue::from_static(""));

        let ctx = header_context(&headers);

        assert_eq!(ctx.transaction_id.as_deref(), Some("TX-9"));
        assert_eq!(ctx.application_ip.as_deref(), Some("10.0.0.7"));
        assert!(ctx.application_name.is_none());
        assert!(ctx.timestamp.is_none());
    }

    #[test]
    fn test_unknown_status_falls_back_to_500() {
        let response = error_response(ErrorReply {
            status: 42,
            code: "E09".to_string(),
            description: "Error general del sistema".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
