// ==========================================
// 车险经营分析引擎 - API 层错误类型
// ==========================================
// 职责: 引擎可检测的错误;映射为协议错误类别与本地化消息
// 说明: 未注册的维度不是错误 (筛选放行 / 可选值为空)
//       数值强转失败按 0 计,不上报
// ==========================================

use crate::config::ConfigError;
use crate::i18n::t_with_args;
use crate::importer::ImportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 状态错误 =====
    #[error("尚未加载配置,请先发送 init 请求 (请求: {request})")]
    NotConfigured { request: String },

    #[error("尚未加载数据集,无法执行 {request}")]
    NoDataset { request: String },

    // ===== 请求错误 =====
    #[error("筛选条件无效: 起始周 {week_start} 大于结束周 {week_end}")]
    InvalidWeekRange { week_start: u32, week_end: u32 },

    #[error("请求格式错误: {0}")]
    MalformedRequest(String),

    // ===== 下层错误 =====
    #[error("数据导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("配置加载失败: {0}")]
    Config(#[from] ConfigError),
}

/// 协议错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidState,
    InvalidFilter,
    InvalidRequest,
    Import,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::InvalidFilter => "invalid_filter",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::Import => "import",
            ErrorKind::Config => "config",
        };
        write!(f, "{}", name)
    }
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NotConfigured { .. } | EngineError::NoDataset { .. } => {
                ErrorKind::InvalidState
            }
            EngineError::InvalidWeekRange { .. } => ErrorKind::InvalidFilter,
            EngineError::MalformedRequest(_) => ErrorKind::InvalidRequest,
            EngineError::Import(_) => ErrorKind::Import,
            EngineError::Config(_) => ErrorKind::Config,
        }
    }

    /// 返回给展示层的消息（按当前语言）
    pub fn localized_message(&self) -> String {
        match self {
            EngineError::NotConfigured { request } => {
                t_with_args("error.not_configured", &[("request", request)])
            }
            EngineError::NoDataset { request } => {
                t_with_args("error.no_dataset", &[("request", request)])
            }
            EngineError::InvalidWeekRange {
                week_start,
                week_end,
            } => t_with_args(
                "error.invalid_week_range",
                &[
                    ("week_start", &week_start.to_string()),
                    ("week_end", &week_end.to_string()),
                ],
            ),
            EngineError::MalformedRequest(detail) => {
                t_with_args("error.malformed_request", &[("detail", detail)])
            }
            EngineError::Import(err) => {
                t_with_args("error.import_failed", &[("detail", &err.to_string())])
            }
            EngineError::Config(err) => {
                t_with_args("error.config_failed", &[("detail", &err.to_string())])
            }
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
