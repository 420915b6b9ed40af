//! trama 編解碼：與主機預存程序交換的定長位置式記錄
//!
//! 三種作業共用同一表頭（應用碼、交換碼、異動碼、本地日期時間）與發行者前綴；
//! 欄位之間無分隔符，位移與寬度皆以字元計，不是位元組

use crate::config::CodesConfig;
use crate::core::documents::DocumentTypeRegistry;
use crate::domain::model::{
    ActivateRequest, ActivateResponse, CreateRequest, CreateResponse, RetrieveRequest,
    RetrieveResponse, Voucher,
};
use crate::domain::ports::Clock;
use crate::utils::error::Result;
use std::sync::Arc;

/// 三個操作在設定碼寬度正確時的總長度
pub const TRAMA_LENGTH: usize = 2024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pad {
    /// 數字欄位：左補 '0'
    Zero,
    /// 文字與保留欄位：右補空白
    Space,
    /// 設定碼，原樣附加
    Verbatim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub width: usize,
    pub pad: Pad,
}

impl FieldSpec {
    pub const fn text(name: &'static str, width: usize) -> Self {
        Self {
            name,
            width,
            pad: Pad::Space,
        }
    }

    pub const fn numeric(name: &'static str, width: usize) -> Self {
        Self {
            name,
            width,
            pad: Pad::Zero,
        }
    }

    pub const fn verbatim(name: &'static str) -> Self {
        Self {
            name,
            width: 0,
            pad: Pad::Verbatim,
        }
    }
}

/// 回覆 trama 的半開區間 `[start, end)`，以字元計
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

pub mod offsets {
    use super::Span;

    pub const RESPONSE_CODE: Span = Span::new(46, 48);
    pub const RESPONSE_DESCRIPTION: Span = Span::new(48, 123);

    pub const CREATED_VOUCHER_NUMBER: Span = Span::new(181, 200);

    pub const AUTHORIZATION_NUMBER: Span = Span::new(203, 209);
    pub const DOCUMENT_TYPE: Span = Span::new(209, 211);
    pub const DOCUMENT_NUMBER: Span = Span::new(211, 227);
    pub const HOLDER_NAME: Span = Span::new(227, 252);
    pub const ACCOUNT_NUMBER: Span = Span::new(252, 271);
    pub const STATUS: Span = Span::new(271, 272);

    pub const VOUCHER_SEGMENT: Span = Span::new(160, 1459);
}

pub const HEADER_LAYOUT: [FieldSpec; 5] = [
    FieldSpec::verbatim("application_code"),
    FieldSpec::verbatim("switch_code"),
    FieldSpec::verbatim("novelty_code"),
    FieldSpec::text("date", 8),
    FieldSpec::text("time", 6),
];

pub const CREATE_LAYOUT: [FieldSpec; 11] = [
    FieldSpec::text("bin", 6),
    FieldSpec::text("subtype", 3),
    FieldSpec::numeric("nit", 15),
    FieldSpec::text("response_code", 2),
    FieldSpec::text("response_description", 75),
    FieldSpec::text("reserved", 19),
    FieldSpec::text("document_type", 2),
    FieldSpec::numeric("document_number", 15),
    FieldSpec::text("holder_name", 22),
    FieldSpec::text("voucher_number", 19),
    FieldSpec::text("filler", 1824),
];

pub const ACTIVATE_LAYOUT: [FieldSpec; 20] = [
    FieldSpec::text("bin", 6),
    FieldSpec::text("subtype", 3),
    FieldSpec::numeric("nit", 15),
    FieldSpec::text("response_code", 2),
    FieldSpec::text("response_description", 75),
    FieldSpec::text("reserved", 19),
    FieldSpec::text("voucher_number", 19),
    FieldSpec::numeric("load_amount", 12),
    FieldSpec::verbatim("transaction_code"),
    FieldSpec::verbatim("device"),
    FieldSpec::text("audit_number", 6),
    FieldSpec::text("sequence_number", 12),
    FieldSpec::verbatim("transaction_type"),
    FieldSpec::text("authorization_number", 6),
    FieldSpec::text("document_type", 2),
    FieldSpec::text("document_number", 16),
    FieldSpec::text("holder_name", 25),
    FieldSpec::text("account_number", 19),
    FieldSpec::text("status", 1),
    FieldSpec::text("filler", 1752),
];

pub const RETRIEVE_LAYOUT: [FieldSpec; 10] = [
    FieldSpec::text("bin", 6),
    FieldSpec::text("subtype", 3),
    FieldSpec::numeric("nit", 15),
    FieldSpec::text("response_code", 2),
    FieldSpec::text("response_description", 75),
    FieldSpec::text("reserved", 19),
    FieldSpec::text("document_type", 2),
    FieldSpec::numeric("document_number", 15),
    FieldSpec::text("vouchers", 1300),
    FieldSpec::text("filler", 565),
];

/// trama 所代表的業務作業，由表頭的異動碼決定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    Activate,
    Consult,
}

impl OperationKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create => "crearBono",
            Self::Activate => "activarBono",
            Self::Consult => "recuperarBono",
        }
    }

    pub fn novelty_code<'a>(&self, codes: &'a CodesConfig) -> &'a str {
        match self {
            Self::Create => &codes.novelty.create,
            Self::Activate => &codes.novelty.activate,
            Self::Consult => &codes.novelty.consult,
        }
    }
}

/// 單一作業的協定：綁定請求型別、回應型別與其版面編解碼
pub trait TramaOperation {
    type Request: Send + Sync;
    type Response: Send;

    const KIND: OperationKind;

    fn encode(codec: &RecordCodec, request: &Self::Request) -> Result<String>;
    fn decode(codec: &RecordCodec, trama: &str) -> Self::Response;
}

pub struct CreateVoucher;
pub struct ActivateVoucher;
pub struct RetrieveVouchers;

impl TramaOperation for CreateVoucher {
    type Request = CreateRequest;
    type Response = CreateResponse;
    const KIND: OperationKind = OperationKind::Create;

    fn encode(codec: &RecordCodec, request: &CreateRequest) -> Result<String> {
        codec.encode_create(request)
    }

    fn decode(_codec: &RecordCodec, trama: &str) -> CreateResponse {
        RecordCodec::decode_create(trama)
    }
}

impl TramaOperation for ActivateVoucher {
    type Request = ActivateRequest;
    type Response = ActivateResponse;
    const KIND: OperationKind = OperationKind::Activate;

    fn encode(codec: &RecordCodec, request: &ActivateRequest) -> Result<String> {
        Ok(codec.encode_activate(request))
    }

    fn decode(codec: &RecordCodec, trama: &str) -> ActivateResponse {
        codec.decode_activate(trama)
    }
}

impl TramaOperation for RetrieveVouchers {
    type Request = RetrieveRequest;
    type Response = RetrieveResponse;
    const KIND: OperationKind = OperationKind::Consult;

    fn encode(codec: &RecordCodec, request: &RetrieveRequest) -> Result<String> {
        codec.encode_retrieve(request)
    }

    fn decode(_codec: &RecordCodec, trama: &str) -> RetrieveResponse {
        RecordCodec::decode_retrieve(trama)
    }
}

#[derive(Clone)]
pub struct RecordCodec {
    codes: CodesConfig,
    documents: DocumentTypeRegistry,
    clock: Arc<dyn Clock>,
}

impl RecordCodec {
    pub fn new(codes: CodesConfig, documents: DocumentTypeRegistry, clock: Arc<dyn Clock>) -> Self {
        Self {
            codes,
            documents,
            clock,
        }
    }

    pub fn encode_create(&self, request: &CreateRequest) -> Result<String> {
        let document_code = self.documents.resolve_internal_code(&request.document_type)?;
        let mut trama = self.header(OperationKind::Create);
        write_fields(
            &mut trama,
            &CREATE_LAYOUT,
            [
                &request.issuer.bin,
                &request.issuer.subtype,
                &request.issuer.nit,
                "",
                "",
                "",
                document_code,
                &request.document_number,
                &request.holder_name,
                "",
                "",
            ],
        );
        Ok(trama)
    }

    pub fn encode_activate(&self, request: &ActivateRequest) -> String {
        let activation = &self.codes.activation;
        // 兩位小數固定為 00
        let load_amount = format!("{}00", request.load_amount);
        let mut trama = self.header(OperationKind::Activate);
        write_fields(
            &mut trama,
            &ACTIVATE_LAYOUT,
            [
                &request.issuer.bin,
                &request.issuer.subtype,
                &request.issuer.nit,
                "",
                "",
                "",
                &request.voucher_number,
                &load_amount,
                &activation.transaction_code,
                &activation.device,
                &request.audit_number,
                &request.sequence_number,
                &activation.transaction_type,
                "",
                "",
                "",
                "",
                "",
                "",
                "",
            ],
        );
        trama
    }

    pub fn encode_retrieve(&self, request: &RetrieveRequest) -> Result<String> {
        let document_code = self.documents.resolve_internal_code(&request.document_type)?;
        let mut trama = self.header(OperationKind::Consult);
        write_fields(
            &mut trama,
            &RETRIEVE_LAYOUT,
            [
                &request.issuer.bin,
                &request.issuer.subtype,
                &request.issuer.nit,
                "",
                "",
                "",
                document_code,
                &request.document_number,
                "",
                "",
            ],
        );
        Ok(trama)
    }

    pub fn decode_create(trama: &str) -> CreateResponse {
        CreateResponse {
            response_code: response_code(trama),
            response_description: trim_to_none(slice(trama, offsets::RESPONSE_DESCRIPTION)),
            voucher_number: trim_to_none(slice(trama, offsets::CREATED_VOUCHER_NUMBER)),
        }
    }

    pub fn decode_activate(&self, trama: &str) -> ActivateResponse {
        let document_type = self
            .documents
            .resolve_external_code(slice(trama, offsets::DOCUMENT_TYPE))
            .map(str::to_string);

        ActivateResponse {
            response_code: response_code(trama),
            response_description: trim_to_none(slice(trama, offsets::RESPONSE_DESCRIPTION)),
            authorization_number: trim_to_none(slice(trama, offsets::AUTHORIZATION_NUMBER)),
            document_type,
            document_number: trim_to_none(slice(trama, offsets::DOCUMENT_NUMBER)),
            holder_name: trim_to_none(slice(trama, offsets::HOLDER_NAME)),
            account_number: trim_to_none(slice(trama, offsets::ACCOUNT_NUMBER)),
            status: slice(trama, offsets::STATUS)
                .chars()
                .next()
                .filter(|c| !c.is_whitespace()),
        }
    }

    pub fn decode_retrieve(trama: &str) -> RetrieveResponse {
        RetrieveResponse {
            response_code: response_code(trama),
            response_description: trim_to_none(slice(trama, offsets::RESPONSE_DESCRIPTION)),
            vouchers: parse_vouchers(slice(trama, offsets::VOUCHER_SEGMENT)),
        }
    }

    fn header(&self, kind: OperationKind) -> String {
        let now = self.clock.now();
        let date = now.format("%Y%m%d").to_string();
        let time = now.format("%H%M%S").to_string();

        let mut trama = String::with_capacity(TRAMA_LENGTH);
        write_fields(
            &mut trama,
            &HEADER_LAYOUT,
            [
                &self.codes.application,
                &self.codes.switch,
                kind.novelty_code(&self.codes),
                &date,
                &time,
            ],
        );
        trama
    }
}

fn write_fields<const N: usize>(out: &mut String, layout: &[FieldSpec; N], values: [&str; N]) {
    for (field, value) in layout.iter().zip(values) {
        write_field(out, field, value);
    }
}

fn write_field(out: &mut String, field: &FieldSpec, value: &str) {
    if field.pad == Pad::Verbatim {
        out.push_str(value);
        return;
    }

    // 超過寬度的值截斷，讓後面的欄位維持在固定位置
    let value: String = value.chars().take(field.width).collect();
    let padding = field.width - value.chars().count();
    match field.pad {
        Pad::Zero => {
            out.extend(std::iter::repeat('0').take(padding));
            out.push_str(&value);
        }
        Pad::Space | Pad::Verbatim => {
            out.push_str(&value);
            out.extend(std::iter::repeat(' ').take(padding));
        }
    }
}

/// 以字元切片；超出長度時截短而非失敗
fn slice(source: &str, span: Span) -> &str {
    if span.end <= span.start {
        return "";
    }
    let mut boundaries = source
        .char_indices()
        .map(|(index, _)| index)
        .chain(std::iter::once(source.len()));

    let Some(start) = boundaries.nth(span.start) else {
        return "";
    };
    let end = boundaries
        .nth(span.end - span.start - 1)
        .unwrap_or(source.len());
    &source[start..end]
}

fn response_code(trama: &str) -> Option<String> {
    let code = slice(trama, offsets::RESPONSE_CODE);
    (!code.is_empty()).then(|| code.to_string())
}

fn trim_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// 格式 `numero,valor;numero,valor;...`；空白區段回傳空清單
fn parse_vouchers(segment: &str) -> Vec<Voucher> {
    let segment = segment.trim();
    if segment.is_empty() {
        return Vec::new();
    }

    segment
        .split(';')
        .filter(|record| !record.trim().is_empty())
        .filter_map(|record| {
            let mut fields: Vec<&str> = record.split(',').collect();
            // 與主機端的 split 行為一致：結尾的空欄位不算
            while fields.last().is_some_and(|field| field.is_empty()) {
                fields.pop();
            }
            if fields.len() < 2 {
                return None;
            }
            Some(Voucher {
                number: trim_to_none(fields[0]),
                amount: truncate_amount(fields[1]),
            })
        })
        .collect()
}

/// 原始欄位直接去掉最後兩個字元，剩下的才去空白解析；不做小數換算
fn truncate_amount(raw: &str) -> Option<i64> {
    let count = raw.chars().count();
    if count < 2 {
        return None;
    }
    raw.chars()
        .take(count - 2)
        .collect::<String>()
        .trim()
        .parse()
        .ok()
}
