// ==========================================
// 车险经营分析引擎 - 配置层
// ==========================================
// 职责: 字段目录、业务类型映射、计划表、阈值
// 说明: init 时整体替换,请求处理期间只读
// ==========================================

pub mod business_mapping;
pub mod config_manager;
pub mod error;
pub mod field_catalog;
pub mod plan_table;
pub mod thresholds;

// 重导出核心类型
pub use business_mapping::{BusinessClass, BusinessMappingTable, DEFAULT_CATEGORY, DEFAULT_LABEL};
pub use config_manager::{config_files, ConfigLoader, EngineConfig, InitPayload};
pub use error::{ConfigError, ConfigResult};
pub use field_catalog::{dimension_keys, DimensionSpec, FieldCatalog, FieldSpec, LogicalField};
pub use plan_table::PlanTable;
pub use thresholds::{LevelCutoffs, ProblemThresholds, ThresholdConfig};
