// ==========================================
// 车险经营分析引擎 - 领域模型层
// ==========================================
// 职责: 定义明细记录、筛选状态、KPI 值对象与枚举
// 红线: 不含引擎逻辑,不含 IO
// ==========================================

pub mod filter;
pub mod kpi;
pub mod record;
pub mod types;

// 重导出核心类型
pub use filter::{DrillCondition, FilterState, TimeFilter};
pub use kpi::{
    safe_divide, AggregatedGroup, BaseSums, GrandTotals, KpiSet, KpiSnapshot,
    ACHIEVEMENT_DISPLAY_FALLBACK,
};
pub use record::{CellValue, FieldSource, Record};
pub use types::{AnalysisMode, GradedMetric, KpiLevel, ProblemKind};
