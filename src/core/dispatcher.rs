use crate::core::classifier::ErrorClassifier;
use crate::core::codec::{
    ActivateVoucher, CreateVoucher, RecordCodec, RetrieveVouchers, TramaOperation,
};
use crate::core::gateway::ProcedureGateway;
use crate::domain::model::{
    ActivateRequest, ActivateResponse, CreateRequest, CreateResponse, RetrieveRequest,
    RetrieveResponse,
};
use crate::domain::ports::{ProcedureTransport, VoucherManagement};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// encode -> execute -> decode，每個操作都走同一條路
pub struct OperationDispatcher<T: ProcedureTransport> {
    codec: RecordCodec,
    gateway: Arc<ProcedureGateway<T>>,
    procedure: String,
    classifier: ErrorClassifier,
}

impl<T: ProcedureTransport> OperationDispatcher<T> {
    pub fn new(
        codec: RecordCodec,
        gateway: Arc<ProcedureGateway<T>>,
        procedure: impl Into<String>,
        classifier: ErrorClassifier,
    ) -> Self {
        Self {
            codec,
            gateway,
            procedure: procedure.into(),
            classifier,
        }
    }

    pub async fn dispatch<O: TramaOperation>(&self, request: &O::Request) -> Result<O::Response> {
        let operation = O::KIND.name();

        let trama = O::encode(&self.codec, request).map_err(|e| self.classifier.normalize(e))?;
        tracing::debug!("📤 {} request trama: {} chars", operation, trama.chars().count());

        let output = self
            .gateway
            .execute(&self.procedure, &trama)
            .await
            .map_err(|e| self.classifier.normalize(e))?;

        // 輸出參數為 NULL 時當成空字串解碼，所有欄位都會是空的
        let output = output.unwrap_or_default();
        tracing::debug!("📥 {} reply trama: {} chars", operation, output.chars().count());

        Ok(O::decode(&self.codec, &output))
    }
}

#[async_trait]
impl<T: ProcedureTransport> VoucherManagement for OperationDispatcher<T> {
    async fn create(&self, request: CreateRequest) -> Result<CreateResponse> {
        self.dispatch::<CreateVoucher>(&request).await
    }

    async fn activate(&self, request: ActivateRequest) -> Result<ActivateResponse> {
        self.dispatch::<ActivateVoucher>(&request).await
    }

    async fn retrieve(&self, request: RetrieveRequest) -> Result<RetrieveResponse> {
        self.dispatch::<RetrieveVouchers>(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataSourceConfig;
    use crate::core::codec::offsets;
    use crate::core::codec::tests::{codec, errors, issuer, reply};
    use crate::core::testing::MockTransport;
    use crate::domain::model::Voucher;
    use crate::utils::error::VoucherError;

    const PROCEDURE: &str = "BONLIB.SPGESBON(?, ?)";

    fn dispatcher(transport: MockTransport) -> OperationDispatcher<MockTransport> {
        let datasource = DataSourceConfig {
            url: Some("https://bridge.example.com".to_string()),
            user: Some("SVCBONOS".to_string()),
            password: Some("secret-pass".to_string()),
            ..DataSourceConfig::default()
        };
        let gateway = Arc::new(ProcedureGateway::new(datasource, transport));
        OperationDispatcher::new(codec(), gateway, PROCEDURE, ErrorClassifier::new(errors()))
    }

    fn create_request(document_type: &str) -> CreateRequest {
        CreateRequest {
            issuer: issuer(),
            document_type: document_type.to_string(),
            document_number: "1032456".to_string(),
            holder_name: "MARIA PEREZ".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_round_trip_through_gateway() {
        let transport = MockTransport::replying(&reply(&[
            (offsets::RESPONSE_CODE, "00"),
            (offsets::RESPONSE_DESCRIPTION, "BONO CREADO"),
            (offsets::CREATED_VOUCHER_NUMBER, "7700123400009876"),
        ]));
        let dispatcher = dispatcher(transport.clone());

        let response = dispatcher.create(create_request("CC")).await.unwrap();

        assert_eq!(response.response_code.as_deref(), Some("00"));
        assert_eq!(response.response_description.as_deref(), Some("BONO CREADO"));
        assert_eq!(response.voucher_number.as_deref(), Some("7700123400009876"));

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, PROCEDURE);
        assert!(calls[0].1.starts_with("BONORB01"));
    }

    #[tokio::test]
    async fn test_domain_error_skips_the_gateway() {
        let transport = MockTransport::replying("");
        let dispatcher = dispatcher(transport.clone());

        let err = dispatcher.create(create_request("XX")).await.unwrap_err();

        match err {
            VoucherError::Domain { code, status, .. } => {
                assert_eq!(code, "E01");
                assert_eq!(status, 400);
            }
            other => panic!("expected domain error, got {:?}", other),
        }
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_as_technical() {
        let dispatcher = dispatcher(MockTransport::failing("connection reset"));

        let err = dispatcher
            .retrieve(RetrieveRequest {
                issuer: issuer(),
                document_type: "CC".to_string(),
                document_number: "79845123".to_string(),
            })
            .await
            .unwrap_err();

        assert!(!err.is_domain());
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_retrieve_decodes_voucher_list() {
        let transport = MockTransport::replying(&reply(&[
            (offsets::RESPONSE_CODE, "00"),
            (offsets::VOUCHER_SEGMENT, "0001,0000250;0002,0001000"),
        ]));

        let response = dispatcher(transport)
            .retrieve(RetrieveRequest {
                issuer: issuer(),
                document_type: "CE".to_string(),
                document_number: "79845123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            response.vouchers,
            vec![
                Voucher {
                    number: Some("0001".to_string()),
                    amount: Some(2),
                },
                Voucher {
                    number: Some("0002".to_string()),
                    amount: Some(10),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_null_output_decodes_to_empty_response() {
        let transport = MockTransport::default();
        transport.set_reply(Ok(None));

        let response = dispatcher(transport)
            .activate(ActivateRequest {
                issuer: issuer(),
                voucher_number: "7700123400001234".to_string(),
                load_amount: "50000".to_string(),
                audit_number: "123456".to_string(),
                sequence_number: "42".to_string(),
            })
            .await
            .unwrap();

        assert!(response.response_code.is_none());
        assert!(response.status.is_none());
    }
}
