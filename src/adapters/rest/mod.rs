//! gateway 的 REST 介面

pub mod dto;
pub mod handlers;
pub mod request_log;

use crate::core::classifier::ErrorClassifier;
use crate::core::gateway::GatewayHealth;
use crate::domain::ports::VoucherManagement;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;

pub const BASE_PATH: &str = "/servicios/bonos/gestionBonos";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn VoucherManagement>,
    pub classifier: Arc<ErrorClassifier>,
    pub gateway: Arc<dyn GatewayHealth>,
}

impl AppState {
    pub fn new(
        service: Arc<dyn VoucherManagement>,
        classifier: ErrorClassifier,
        gateway: Arc<dyn GatewayHealth>,
    ) -> Self {
        Self {
            service,
            classifier: Arc::new(classifier),
            gateway,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            &format!("{}/crearBono", BASE_PATH),
            post(handlers::create_voucher),
        )
        .route(
            &format!("{}/activarBono", BASE_PATH),
            put(handlers::activate_voucher),
        )
        .route(
            &format!("{}/recuperarBono", BASE_PATH),
            post(handlers::retrieve_vouchers),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
}
