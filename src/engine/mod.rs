// ==========================================
// 车险经营分析引擎 - 引擎层
// ==========================================
// 职责: 字段解析、业务归类、筛选、聚合、问题识别、元信息
// 红线: 引擎不持有数据集,不做 IO;数据与配置由调用方显式传入
// ==========================================

pub mod aggregation;
pub mod classifier;
pub mod collation;
pub mod dimension;
pub mod field_resolver;
pub mod filter;
pub mod metadata;
pub mod pipeline;
pub mod problem_detector;

// 重导出核心引擎
pub use aggregation::AggregationEngine;
pub use classifier::{BusinessClassifier, ClassifiedRecord, BUSINESS_CATEGORY_FIELD, BUSINESS_LABEL_FIELD};
pub use dimension::{dimension_value, DimensionValueResolver};
pub use filter::FilterEngine;
pub use metadata::{DynamicInfo, MetadataExtractor, DEFAULT_COMPANY};
pub use pipeline::{AnalysisPipeline, AnalysisReport, SummaryReport};
pub use problem_detector::{Problem, ProblemDetector, MAX_REPORTED_PROBLEMS};
