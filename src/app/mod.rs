use crate::adapters::rest::{self, AppState};
use crate::config::AppConfig;
use crate::core::classifier::ErrorClassifier;
use crate::core::codec::RecordCodec;
use crate::core::dispatcher::OperationDispatcher;
use crate::core::documents::DocumentTypeRegistry;
use crate::core::gateway::ProcedureGateway;
use crate::domain::ports::{Clock, ProcedureTransport};
use axum::Router;
use std::sync::Arc;

/// 組裝完成的服務：路由與共用的程序閘道
pub struct VoucherApp<T: ProcedureTransport> {
    pub gateway: Arc<ProcedureGateway<T>>,
    pub router: Router,
}

impl<T: ProcedureTransport + 'static> VoucherApp<T> {
    pub fn assemble(config: &AppConfig, transport: T, clock: Arc<dyn Clock>) -> Self {
        let gateway = Arc::new(ProcedureGateway::new(config.datasource.clone(), transport));

        let documents = DocumentTypeRegistry::new(config.documents.clone(), &config.errors);
        let codec = RecordCodec::new(config.codes.clone(), documents, clock);
        let classifier = ErrorClassifier::new(config.errors.clone());

        let dispatcher = OperationDispatcher::new(
            codec,
            Arc::clone(&gateway),
            config.procedure.name.clone(),
            classifier.clone(),
        );

        let state = AppState::new(Arc::new(dispatcher), classifier, gateway.clone());

        Self {
            router: rest::router(state),
            gateway,
        }
    }
}
