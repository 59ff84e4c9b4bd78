// ==========================================
// 车险经营分析引擎 - API 层
// ==========================================
// 职责: 消息协议与错误类型,供分发器与后台工作线程使用
// ==========================================

pub mod error;
pub mod protocol;

// 重导出核心类型
pub use error::{EngineError, EngineResult, ErrorKind};
pub use protocol::{
    DatasetSummary, ErrorPayload, Request, RequestEnvelope, Response, ResponseEnvelope,
};
