//! 對外 API 的 JSON 結構，欄位名稱沿用既有契約

use crate::domain::model::{
    ActivateRequest, ActivateResponse, CreateRequest, CreateResponse, Issuer, RetrieveRequest,
    RetrieveResponse, Voucher,
};
use crate::utils::validation::FieldRule;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const BIN: FieldRule = FieldRule::digits("bin", 6, 6);
const NIT: FieldRule = FieldRule::digits("nit", 9, 15);
const SUBTYPE: FieldRule = FieldRule::text("subtipo", 3, 3);
const DOCUMENT_TYPE: FieldRule = FieldRule::text("tipoDocumento", 2, 2);
const DOCUMENT_NUMBER: FieldRule = FieldRule::digits("numeroDocumento", 6, 15);
const HOLDER_NAME: FieldRule = FieldRule::text("nombre", 5, 25);
const VOUCHER_NUMBER: FieldRule = FieldRule::text("numeroBono", 13, 19);
const LOAD_AMOUNT: FieldRule = FieldRule::digits("valorCarga", 5, 10);
const AUDIT_NUMBER: FieldRule = FieldRule::digits("numeroAuditoria", 6, 6);
const SEQUENCE_NUMBER: FieldRule = FieldRule::digits("consecutivo", 2, 12);

/// 請求 DTO：先檢查形狀，再轉成領域模型
pub trait RequestDto: Serialize + DeserializeOwned + Send {
    type Domain: Send;

    fn violations(&self) -> Vec<String>;
    fn into_domain(self) -> Self::Domain;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuerDto {
    pub bin: Option<String>,
    pub nit: Option<String>,
    #[serde(rename = "subtipo")]
    pub subtype: Option<String>,
}

impl IssuerDto {
    fn check(&self, violations: &mut Vec<String>) {
        BIN.check(self.bin.as_deref(), violations);
        NIT.check(self.nit.as_deref(), violations);
        SUBTYPE.check(self.subtype.as_deref(), violations);
    }

    fn into_domain(self) -> Issuer {
        Issuer {
            bin: self.bin.unwrap_or_default(),
            nit: self.nit.unwrap_or_default(),
            subtype: self.subtype.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateVoucherDto {
    #[serde(flatten)]
    pub issuer: IssuerDto,
    #[serde(rename = "tipoDocumento")]
    pub document_type: Option<String>,
    #[serde(rename = "numeroDocumento")]
    pub document_number: Option<String>,
    #[serde(rename = "nombre")]
    pub holder_name: Option<String>,
}

impl RequestDto for CreateVoucherDto {
    type Domain = CreateRequest;

    fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        self.issuer.check(&mut violations);
        DOCUMENT_TYPE.check(self.document_type.as_deref(), &mut violations);
        DOCUMENT_NUMBER.check(self.document_number.as_deref(), &mut violations);
        HOLDER_NAME.check(self.holder_name.as_deref(), &mut violations);
        violations
    }

    fn into_domain(self) -> CreateRequest {
        CreateRequest {
            issuer: self.issuer.into_domain(),
            document_type: self.document_type.unwrap_or_default(),
            document_number: self.document_number.unwrap_or_default(),
            holder_name: self.holder_name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivateVoucherDto {
    #[serde(flatten)]
    pub issuer: IssuerDto,
    #[serde(rename = "numeroBono")]
    pub voucher_number: Option<String>,
    #[serde(rename = "valorCarga")]
    pub load_amount: Option<String>,
    #[serde(rename = "numeroAuditoria")]
    pub audit_number: Option<String>,
    #[serde(rename = "consecutivo")]
    pub sequence_number: Option<String>,
}

impl RequestDto for ActivateVoucherDto {
    type Domain = ActivateRequest;

    fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        self.issuer.check(&mut violations);
        VOUCHER_NUMBER.check(self.voucher_number.as_deref(), &mut violations);
        LOAD_AMOUNT.check(self.load_amount.as_deref(), &mut violations);
        AUDIT_NUMBER.check(self.audit_number.as_deref(), &mut violations);
        SEQUENCE_NUMBER.check(self.sequence_number.as_deref(), &mut violations);
        violations
    }

    fn into_domain(self) -> ActivateRequest {
        ActivateRequest {
            issuer: self.issuer.into_domain(),
            voucher_number: self.voucher_number.unwrap_or_default(),
            load_amount: self.load_amount.unwrap_or_default(),
            audit_number: self.audit_number.unwrap_or_default(),
            sequence_number: self.sequence_number.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrieveVouchersDto {
    #[serde(flatten)]
    pub issuer: IssuerDto,
    #[serde(rename = "tipoDocumento")]
    pub document_type: Option<String>,
    #[serde(rename = "numeroDocumento")]
    pub document_number: Option<String>,
}

impl RequestDto for RetrieveVouchersDto {
    type Domain = RetrieveRequest;

    fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        self.issuer.check(&mut violations);
        DOCUMENT_TYPE.check(self.document_type.as_deref(), &mut violations);
        DOCUMENT_NUMBER.check(self.document_number.as_deref(), &mut violations);
        violations
    }

    fn into_domain(self) -> RetrieveRequest {
        RetrieveRequest {
            issuer: self.issuer.into_domain(),
            document_type: self.document_type.unwrap_or_default(),
            document_number: self.document_number.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVoucherReply {
    #[serde(rename = "codigoRespuesta", skip_serializing_if = "Option::is_none")]
    pub response_code: Option<String>,
    #[serde(rename = "descripcionRespuesta", skip_serializing_if = "Option::is_none")]
    pub response_description: Option<String>,
    #[serde(rename = "numeroBono", skip_serializing_if = "Option::is_none")]
    pub voucher_number: Option<String>,
}

impl From<CreateResponse> for CreateVoucherReply {
    fn from(response: CreateResponse) -> Self {
        Self {
            response_code: response.response_code,
            response_description: response.response_description,
            voucher_number: response.voucher_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateVoucherReply {
    #[serde(rename = "codigoRespuesta", skip_serializing_if = "Option::is_none")]
    pub response_code: Option<String>,
    #[serde(rename = "descripcionRespuesta", skip_serializing_if = "Option::is_none")]
    pub response_description: Option<String>,
    #[serde(rename = "numeroAutorizacion", skip_serializing_if = "Option::is_none")]
    pub authorization_number: Option<String>,
    #[serde(rename = "tipoDocumento", skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(rename = "numeroDocumento", skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(rename = "nombreCliente", skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
    #[serde(rename = "numeroCuenta", skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<ActivateResponse> for ActivateVoucherReply {
    fn from(response: ActivateResponse) -> Self {
        Self {
            response_code: response.response_code,
            response_description: response.response_description,
            authorization_number: response.authorization_number,
            document_type: response.document_type,
            document_number: response.document_number,
            holder_name: response.holder_name,
            account_number: response.account_number,
            status: response.status.map(String::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherDto {
    #[serde(rename = "numero", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(rename = "valor", skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveVouchersReply {
    #[serde(rename = "codigoRespuesta", skip_serializing_if = "Option::is_none")]
    pub response_code: Option<String>,
    #[serde(rename = "descripcionRespuesta", skip_serializing_if = "Option::is_none")]
    pub response_description: Option<String>,
    #[serde(rename = "bonos")]
    pub vouchers: Vec<VoucherDto>,
}

impl From<RetrieveResponse> for RetrieveVouchersReply {
    fn from(response: RetrieveResponse) -> Self {
        Self {
            response_code: response.response_code,
            response_description: response.response_description,
            vouchers: response
                .vouchers
                .into_iter()
                .map(|Voucher { number, amount }| VoucherDto { number, amount })
                .collect(),
        }
    }
}
