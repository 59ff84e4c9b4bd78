// ==========================================
// 车险经营分析引擎 - 分析流水线
// ==========================================
// 职责: 编排一次完整分析
//   1. 业务类型归类 (全量一次)
//   2. 筛选 (可选)
//   3. 元信息
//   4. 整体指标 + 指标分级
//   5. 机构 / 客户类别 / 业务类型 三个维度聚合
//   6. 问题识别 (机构维度,前 5 条)
// 说明: 每次请求全量重算,结果不缓存
// ==========================================

use crate::config::{dimension_keys, EngineConfig, LogicalField, PlanTable, ThresholdConfig};
use crate::domain::{
    AggregatedGroup, FieldSource, FilterState, GradedMetric, GrandTotals, KpiLevel, KpiSnapshot,
    Record,
};
use crate::engine::aggregation::AggregationEngine;
use crate::engine::classifier::BusinessClassifier;
use crate::engine::filter::FilterEngine;
use crate::engine::metadata::{DynamicInfo, MetadataExtractor};
use crate::engine::problem_detector::{Problem, ProblemDetector};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

// ==========================================
// AnalysisReport - process / filter 的响应体
// ==========================================
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    #[serde(flatten)]
    pub snapshot: KpiSnapshot,
    pub levels: BTreeMap<GradedMetric, KpiLevel>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub summary: SummaryReport,
    pub problems: Vec<Problem>,
    pub groups_by_org: Vec<AggregatedGroup>,
    pub groups_by_category: Vec<AggregatedGroup>,
    pub groups_by_business_type: Vec<AggregatedGroup>,
    /// 原样回传当前阈值配置
    pub thresholds: ThresholdConfig,
    pub dynamic_info: DynamicInfo,
    pub record_count: usize,
}

// ==========================================
// AnalysisPipeline
// ==========================================
pub struct AnalysisPipeline<'c> {
    config: &'c EngineConfig,
}

impl<'c> AnalysisPipeline<'c> {
    pub fn new(config: &'c EngineConfig) -> Self {
        Self { config }
    }

    /// 全量分析
    pub fn process(&self, records: &[Record]) -> AnalysisReport {
        self.run(records, None)
    }

    /// 筛选后分析；调用方保证筛选状态合法
    pub fn filter(&self, records: &[Record], state: &FilterState) -> AnalysisReport {
        self.run(records, Some(state))
    }

    fn run(&self, records: &[Record], state: Option<&FilterState>) -> AnalysisReport {
        let started = Instant::now();
        let catalog = self.config.catalog.as_ref();

        // 归类必须先于任何分组
        let classifier = BusinessClassifier::new(
            &self.config.business_mapping,
            catalog.field(LogicalField::BusinessType),
        );
        let classified = classifier.classify_all(records);

        let subset: Vec<_> = match state {
            Some(state) => FilterEngine::new(catalog).apply(&classified, state),
            None => classified.iter().collect(),
        };

        let report = self.analyze(&subset);
        tracing::info!(
            "分析完成: 输入 {} 行, 参与 {} 行, 耗时 {:?}",
            records.len(),
            report.record_count,
            started.elapsed()
        );
        report
    }

    fn analyze<R: FieldSource>(&self, records: &[R]) -> AnalysisReport {
        let config = self.config;
        let catalog = config.catalog.as_ref();
        let aggregation = AggregationEngine::new(catalog);

        let dynamic_info = MetadataExtractor::new(catalog).extract(records);

        // 整体达成率取报告主体的计划
        let snapshot = aggregation.summarize(records, config.plans.target(&dynamic_info.company));
        let totals = GrandTotals::from(&snapshot.sums);

        let by = |key: &str, plans: Option<&PlanTable>| -> Vec<AggregatedGroup> {
            match catalog.dimension(key) {
                Some(dimension) => aggregation.aggregate(records, dimension, plans, totals),
                None => Vec::new(),
            }
        };
        let groups_by_org = by(dimension_keys::ORGANIZATION, Some(&config.plans));
        let groups_by_category = by(dimension_keys::CUSTOMER_CATEGORY, None);
        let groups_by_business_type = by(dimension_keys::BUSINESS_LABEL, None);

        let problems = ProblemDetector::new(&config.thresholds.problem).detect_top(&groups_by_org);

        AnalysisReport {
            summary: SummaryReport {
                levels: grade_summary(&config.thresholds, &snapshot),
                snapshot,
            },
            problems,
            groups_by_org,
            groups_by_category,
            groups_by_business_type,
            thresholds: config.thresholds.clone(),
            dynamic_info,
            record_count: records.len(),
        }
    }
}

/// 整体指标分级（达成率无计划时按 100 分级）
fn grade_summary(thresholds: &ThresholdConfig, snapshot: &KpiSnapshot) -> BTreeMap<GradedMetric, KpiLevel> {
    let kpis = &snapshot.kpis;
    GradedMetric::ALL
        .iter()
        .map(|&metric| {
            let value = match metric {
                GradedMetric::CostRate => kpis.cost_rate,
                GradedMetric::ClaimRate => kpis.claim_rate,
                GradedMetric::ExpenseRate => kpis.expense_rate,
                GradedMetric::PremiumAchievement => kpis.achievement_for_display(),
            };
            (metric, thresholds.grade(metric, value))
        })
        .collect()
}
