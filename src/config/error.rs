// ==========================================
// 车险经营分析引擎 - 配置错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    FileReadError { path: String, message: String },

    #[error("配置格式错误 ({source_name}): {message}")]
    InvalidFormat {
        source_name: String,
        message: String,
    },

    #[error("字段目录缺少必需维度: {0}")]
    MissingDimension(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
