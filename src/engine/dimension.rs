// ==========================================
// 车险经营分析引擎 - 维度取值
// ==========================================
// 职责: 记录在某维度上的取值;维度可选值枚举(供筛选面板填充)
// 规则: 分组、下钻筛选、可选值枚举共用 dimension_value,取值口径一致
// ==========================================

use crate::config::{DimensionSpec, FieldCatalog};
use crate::domain::{FieldSource, TimeFilter};
use crate::engine::collation;
use crate::engine::field_resolver;
use crate::engine::filter::FilterEngine;
use std::collections::HashSet;

/// 记录在维度上的取值（去首尾空白）；缺失时为 None
pub fn dimension_value<R: FieldSource + ?Sized>(record: &R, dimension: &DimensionSpec) -> Option<String> {
    field_resolver::resolve_text(record, &dimension.fields)
}

// ==========================================
// DimensionValueResolver
// ==========================================
pub struct DimensionValueResolver<'c> {
    catalog: &'c FieldCatalog,
}

impl<'c> DimensionValueResolver<'c> {
    pub fn new(catalog: &'c FieldCatalog) -> Self {
        Self { catalog }
    }

    /// 维度可选值：仅应用时间条件，去重后升序
    ///
    /// 未注册的维度键返回空列表。
    pub fn values_for<R: FieldSource>(
        &self,
        records: &[R],
        dimension_key: &str,
        time: Option<&TimeFilter>,
    ) -> Vec<String> {
        let dimension = match self.catalog.dimension(dimension_key) {
            Some(d) => d,
            None => {
                tracing::warn!("未注册的维度,返回空列表: {}", dimension_key);
                return Vec::new();
            }
        };

        let candidates = FilterEngine::new(self.catalog).apply_time(records, time);
        distinct_sorted(candidates.iter().copied(), dimension)
    }

    /// 所有注册维度的可选值（不做时间筛选）
    pub fn all_values<R: FieldSource>(&self, records: &[R]) -> Vec<(String, Vec<String>)> {
        self.catalog
            .dimensions()
            .iter()
            .map(|dimension| (dimension.key.clone(), distinct_sorted(records.iter(), dimension)))
            .collect()
    }
}

fn distinct_sorted<'r, R, I>(records: I, dimension: &DimensionSpec) -> Vec<String>
where
    R: FieldSource + 'r,
    I: Iterator<Item = &'r R>,
{
    let mut seen = HashSet::new();
    let mut values: Vec<String> = records
        .filter_map(|record| dimension_value(record, dimension))
        .filter(|value| seen.insert(value.clone()))
        .collect();
    collation::sort_labels(&mut values);
    values
}
