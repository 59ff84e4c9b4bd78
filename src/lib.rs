// ==========================================
// 车险经营分析引擎 - 核心库
// ==========================================
// 系统定位: 车险经营数据的聚合与下钻筛选引擎
// 运行方式: 独立工作线程,通过消息协议与展示层通信
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与值对象
pub mod domain;

// 配置层 - 字段目录、映射表、计划、阈值
pub mod config;

// 引擎层 - 聚合、筛选、问题识别
pub mod engine;

// 导入层 - 外部文件解码
pub mod importer;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 消息协议
pub mod api;

// 应用层 - 会话、分发、工作线程
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    AggregatedGroup, AnalysisMode, CellValue, DrillCondition, FilterState, KpiSet, Record,
    TimeFilter,
};

pub use config::{ConfigLoader, EngineConfig, FieldCatalog, InitPayload};

pub use engine::{AggregationEngine, AnalysisPipeline, AnalysisReport, FilterEngine};

pub use api::{EngineError, Request, RequestEnvelope, Response, ResponseEnvelope};

pub use app::{ClientError, Dispatcher, EngineClient, SessionState};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车险经营分析引擎";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
