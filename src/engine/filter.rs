// ==========================================
// 车险经营分析引擎 - 筛选引擎
// ==========================================
// 职责: 时间筛选 + 下钻筛选,产出原始数据集的子集
// 规则:
//   - 时间: 设定年度时按字符串精确匹配;周次闭区间始终生效(缺失周次按 0)
//   - 下钻: 条件之间为"与",同一条件的取值之间为"或"
//   - 未注册的维度键直接放行(不是过滤掉)
// 说明: 输出保持原有顺序
// ==========================================

use crate::config::{DimensionSpec, FieldCatalog, LogicalField};
use crate::domain::{DrillCondition, FieldSource, FilterState, TimeFilter};
use crate::engine::dimension::dimension_value;
use crate::engine::field_resolver;

pub struct FilterEngine<'c> {
    catalog: &'c FieldCatalog,
}

/// 已解析的下钻条件
struct ResolvedCondition<'c> {
    dimension: &'c DimensionSpec,
    values: Vec<String>,
}

impl<'c> FilterEngine<'c> {
    pub fn new(catalog: &'c FieldCatalog) -> Self {
        Self { catalog }
    }

    /// 时间条件判定
    pub fn matches_time<R: FieldSource + ?Sized>(&self, record: &R, time: &TimeFilter) -> bool {
        if let Some(year) = time.year.as_deref() {
            let record_year = field_resolver::resolve(record, self.catalog.field(LogicalField::PolicyYear))
                .map(|v| v.to_text())
                .unwrap_or_default();
            if record_year != year {
                return false;
            }
        }

        let week = field_resolver::resolve_week(record, self.catalog.field(LogicalField::Week));
        time.week_start <= week && week <= time.week_end
    }

    /// 仅应用时间条件
    pub fn apply_time<'r, R: FieldSource>(
        &self,
        records: &'r [R],
        time: Option<&TimeFilter>,
    ) -> Vec<&'r R> {
        match time {
            Some(time) => records
                .iter()
                .filter(|record| self.matches_time(*record, time))
                .collect(),
            None => records.iter().collect(),
        }
    }

    /// 应用完整筛选状态
    pub fn apply<'r, R: FieldSource>(&self, records: &'r [R], state: &FilterState) -> Vec<&'r R> {
        let conditions = self.resolve_conditions(&state.drill);

        let filtered: Vec<&'r R> = records
            .iter()
            .filter(|record| {
                state
                    .time
                    .as_ref()
                    .map_or(true, |time| self.matches_time(*record, time))
            })
            .filter(|record| {
                conditions
                    .iter()
                    .all(|condition| Self::matches_condition(*record, condition))
            })
            .collect();

        tracing::debug!(
            "筛选完成: {} → {} 行 (下钻条件 {} 个, 生效 {} 个)",
            records.len(),
            filtered.len(),
            state.drill.len(),
            conditions.len()
        );
        filtered
    }

    fn resolve_conditions(&self, drill: &[DrillCondition]) -> Vec<ResolvedCondition<'c>> {
        drill
            .iter()
            .filter_map(|condition| match self.catalog.dimension(&condition.dimension) {
                Some(dimension) => Some(ResolvedCondition {
                    dimension,
                    values: condition.values.iter().map(|v| v.trim().to_string()).collect(),
                }),
                None => {
                    tracing::warn!("未注册的下钻维度,条件放行: {}", condition.dimension);
                    None
                }
            })
            .collect()
    }

    fn matches_condition<R: FieldSource + ?Sized>(record: &R, condition: &ResolvedCondition<'_>) -> bool {
        match dimension_value(record, condition.dimension) {
            Some(value) => condition.values.iter().any(|v| *v == value),
            None => false,
        }
    }
}
