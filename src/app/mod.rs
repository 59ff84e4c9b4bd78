// ==========================================
// 车险经营分析引擎 - 应用层
// ==========================================
// 职责: 会话状态、请求分发、后台工作线程与异步客户端
// ==========================================

pub mod dispatcher;
pub mod state;
pub mod worker;

// 重导出
pub use dispatcher::Dispatcher;
pub use state::{Dataset, EngineSession, SessionState};
pub use worker::{ClientError, EngineClient, EngineWorker, DEFAULT_TIMEOUT};
