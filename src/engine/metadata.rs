// ==========================================
// 车险经营分析引擎 - 报告元信息
// ==========================================
// 职责: 推断保单年度/周次、识别机构集合与分析模式、生成报告标题
// 规则:
//   - 年度/周次只读第一条记录 (不扫描全表)
//   - 机构集合扫描全表,保持首次出现顺序
//   - 恰好一个机构为 single,否则为 multi
// ==========================================

use crate::config::{FieldCatalog, LogicalField};
use crate::domain::{AnalysisMode, FieldSource};
use crate::engine::dimension::DimensionValueResolver;
use crate::engine::field_resolver;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// 无法推断年度时的默认值
pub const DEFAULT_YEAR: &str = "2025";
/// 无法推断周次时的默认值
pub const DEFAULT_WEEK: &str = "未知";
/// 多机构模式下的报告主体
pub const DEFAULT_COMPANY: &str = "四川分公司";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicInfo {
    pub year: String,
    pub week: String,
    pub organization_count: usize,
    pub organizations: Vec<String>,
    pub analysis_mode: AnalysisMode,
    pub title: String,
    pub company: String,
    /// 维度键 → 可选值（升序）
    pub dimension_values: BTreeMap<String, Vec<String>>,
}

/// 报告标题
pub fn build_title(company: &str, year: &str, week: &str) -> String {
    format!("{}车险经营分析（保单年度{}·第{}周）", company, year, week)
}

pub struct MetadataExtractor<'c> {
    catalog: &'c FieldCatalog,
}

impl<'c> MetadataExtractor<'c> {
    pub fn new(catalog: &'c FieldCatalog) -> Self {
        Self { catalog }
    }

    pub fn extract<R: FieldSource>(&self, records: &[R]) -> DynamicInfo {
        let (year, week) = match records.first() {
            Some(first) => (self.first_year(first), self.first_week(first)),
            None => (DEFAULT_YEAR.to_string(), DEFAULT_WEEK.to_string()),
        };

        let organizations = self.organizations(records);
        let analysis_mode = AnalysisMode::from_organization_count(organizations.len());
        let company = match (analysis_mode, organizations.first()) {
            (AnalysisMode::Single, Some(org)) => org.clone(),
            _ => DEFAULT_COMPANY.to_string(),
        };

        let dimension_values = DimensionValueResolver::new(self.catalog)
            .all_values(records)
            .into_iter()
            .collect();

        tracing::debug!(
            "元信息: 年度={}, 周次={}, 机构数={}, 模式={}",
            year,
            week,
            organizations.len(),
            analysis_mode
        );

        DynamicInfo {
            title: build_title(&company, &year, &week),
            year,
            week,
            organization_count: organizations.len(),
            organizations,
            analysis_mode,
            company,
            dimension_values,
        }
    }

    /// 机构集合（首次出现顺序）
    pub fn organizations<R: FieldSource>(&self, records: &[R]) -> Vec<String> {
        let spec = self.catalog.field(LogicalField::Organization);
        let mut seen = HashSet::new();
        records
            .iter()
            .filter_map(|record| field_resolver::resolve_text(record, spec))
            .filter(|org| seen.insert(org.clone()))
            .collect()
    }

    fn first_year<R: FieldSource>(&self, record: &R) -> String {
        field_resolver::resolve_text(record, self.catalog.field(LogicalField::PolicyYear))
            .unwrap_or_else(|| DEFAULT_YEAR.to_string())
    }

    fn first_week<R: FieldSource>(&self, record: &R) -> String {
        field_resolver::resolve_text(record, self.catalog.field(LogicalField::Week))
            .map(|raw| field_resolver::strip_week_decoration(&raw))
            .filter(|week| !week.is_empty())
            .unwrap_or_else(|| DEFAULT_WEEK.to_string())
    }
}
