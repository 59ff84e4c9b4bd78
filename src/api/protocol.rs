// ==========================================
// 车险经营分析引擎 - 消息协议
// ==========================================
// 职责: 请求/响应信封,按调用方提供的 id 关联
// 格式: {"id": 1, "type": "filter", "payload": {...}}
//       响应 type 为 ack / loaded / report / dimension_values / error
// ==========================================

use crate::api::error::{EngineError, ErrorKind};
use crate::config::InitPayload;
use crate::domain::{FilterState, Record};
use crate::engine::AnalysisReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// 请求
// ==========================================
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEnvelope {
    pub id: u64,
    #[serde(flatten)]
    pub request: Request,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Request {
    /// 加载配置表,替换已有配置
    Init(InitPayload),
    /// 外部解析器产出的明细记录,整体替换当前数据集
    #[serde(alias = "parse")]
    LoadDataset(Vec<Record>),
    /// 由引擎解析本地文件
    LoadFile { path: String },
    Process,
    Filter(FilterState),
    GetDimensionValues {
        dimension: String,
        #[serde(default, rename = "currentFilters", alias = "current_filters")]
        current_filters: Option<FilterState>,
    },
    /// 丢弃当前数据集
    Clear,
}

impl Request {
    /// 请求类型名（日志与错误消息使用）
    pub fn name(&self) -> &'static str {
        match self {
            Request::Init(_) => "init",
            Request::LoadDataset(_) => "load_dataset",
            Request::LoadFile { .. } => "load_file",
            Request::Process => "process",
            Request::Filter(_) => "filter",
            Request::GetDimensionValues { .. } => "get_dimension_values",
            Request::Clear => "clear",
        }
    }
}

// ==========================================
// 响应
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    /// 无法解析出 id 的请求,响应 id 为 null
    pub id: Option<u64>,
    #[serde(flatten)]
    pub response: Response,
}

impl ResponseEnvelope {
    pub fn new(id: Option<u64>, response: Response) -> Self {
        Self { id, response }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.response, Response::Error(_))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Response {
    Ack,
    Loaded(DatasetSummary),
    Report(Box<AnalysisReport>),
    DimensionValues { dimension: String, values: Vec<String> },
    Error(ErrorPayload),
}

/// 数据集装载回执
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub dataset_id: Uuid,
    pub row_count: usize,
    pub loaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&EngineError> for ErrorPayload {
    fn from(err: &EngineError) -> Self {
        Self {
            kind: err.kind(),
            message: err.localized_message(),
        }
    }
}
