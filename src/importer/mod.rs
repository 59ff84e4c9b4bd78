// ==========================================
// 车险经营分析引擎 - 导入层
// ==========================================
// 职责: 上传文件解码为明细记录,交给引擎
// 支持: Excel, CSV, JSON
// ==========================================

pub mod error;
pub mod file_parser;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvSource, ExcelSource, JsonSource, RecordSource, UniversalRecordSource};
