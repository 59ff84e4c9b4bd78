// ==========================================
// 车险经营分析引擎 - 聚合引擎
// ==========================================
// 职责: 按维度分组汇总六项基础量,派生比率,计算占比
// 规则:
//   1. 维度取值缺失的记录不进入任何分组
//   2. 数值强转失败按 0 计
//   3. 比率采用安全除法;变动成本率 = 满期赔付率 + 费用率
//   4. 达成率仅在计划存在且目标 > 0 时计算,否则为 null
//   5. 占比 = 分组量 / 调用方给定的合计
//   6. 按签单保费降序;相同保费保持首次出现顺序
// ==========================================

use crate::config::{DimensionSpec, FieldCatalog, LogicalField, PlanTable};
use crate::domain::{
    safe_divide, AggregatedGroup, BaseSums, FieldSource, GrandTotals, KpiSet, KpiSnapshot,
};
use crate::engine::dimension::dimension_value;
use crate::engine::field_resolver::resolve_number;
use std::collections::HashMap;

pub struct AggregationEngine<'c> {
    catalog: &'c FieldCatalog,
}

impl<'c> AggregationEngine<'c> {
    pub fn new(catalog: &'c FieldCatalog) -> Self {
        Self { catalog }
    }

    // ==========================================
    // 基础量
    // ==========================================

    /// 单条记录的六项基础量
    pub fn base_sums<R: FieldSource + ?Sized>(&self, record: &R) -> BaseSums {
        let catalog = self.catalog;
        BaseSums {
            premium: resolve_number(record, catalog.field(LogicalField::SignedPremium)),
            matured_premium: resolve_number(record, catalog.field(LogicalField::MaturedPremium)),
            claim: resolve_number(record, catalog.field(LogicalField::ReportedClaim)),
            expense: resolve_number(record, catalog.field(LogicalField::Expense)),
            policy_count: resolve_number(record, catalog.field(LogicalField::PolicyCount)),
            claim_count: resolve_number(record, catalog.field(LogicalField::ClaimCaseCount)),
        }
    }

    // ==========================================
    // 整体指标
    // ==========================================

    /// 整体指标：全部记录视为一个分组，不计算占比
    pub fn summarize<R: FieldSource>(&self, records: &[R], plan_target: Option<f64>) -> KpiSnapshot {
        let mut sums = BaseSums::default();
        for record in records {
            sums.add(&self.base_sums(record));
        }

        KpiSnapshot {
            kpis: KpiSet::derive(&sums, plan_target),
            sums,
        }
    }

    // ==========================================
    // 分组聚合
    // ==========================================

    /// 按维度分组聚合
    ///
    /// # 参数
    /// - `plans`: 计划表（仅机构维度传入）
    /// - `totals`: 占比分母（通常为整体签单保费与已报告赔款）
    pub fn aggregate<R: FieldSource>(
        &self,
        records: &[R],
        dimension: &DimensionSpec,
        plans: Option<&PlanTable>,
        totals: GrandTotals,
    ) -> Vec<AggregatedGroup> {
        // 分组顺序 = 首次出现顺序
        let mut order: Vec<(String, BaseSums)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut dropped = 0usize;

        for record in records {
            let value = match dimension_value(record, dimension) {
                Some(v) => v,
                None => {
                    dropped += 1;
                    continue;
                }
            };

            let sums = self.base_sums(record);
            match index.get(&value) {
                Some(&slot) => order[slot].1.add(&sums),
                None => {
                    index.insert(value.clone(), order.len());
                    order.push((value, sums));
                }
            }
        }

        if dropped > 0 {
            tracing::debug!("维度 {} 取值缺失,剔除 {} 行", dimension.key, dropped);
        }

        let mut groups: Vec<AggregatedGroup> = order
            .into_iter()
            .map(|(dimension_value, sums)| {
                let plan_target = plans.and_then(|p| p.target(&dimension_value));
                AggregatedGroup {
                    kpis: KpiSet::derive(&sums, plan_target),
                    premium_share: safe_divide(sums.premium, totals.premium) * 100.0,
                    claim_share: safe_divide(sums.claim, totals.claim) * 100.0,
                    dimension_value,
                    sums,
                }
            })
            .collect();

        // sort_by 为稳定排序，相同保费保持首次出现顺序
        groups.sort_by(|a, b| b.sums.premium.total_cmp(&a.sums.premium));
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::dimension_keys;
    use crate::domain::Record;

    fn org_row(org: &str, premium: f64, matured: f64, claim: f64) -> Record {
        Record::new()
            .with("third_level_organization", org)
            .with("signed_premium_yuan", premium)
            .with("matured_premium_yuan", matured)
            .with("reported_claim_payment_yuan", claim)
    }

    #[test]
    fn test_two_org_scenario() {
        let catalog = FieldCatalog::builtin().unwrap();
        let engine = AggregationEngine::new(&catalog);
        let records = vec![
            org_row("A", 1000.0, 800.0, 400.0),
            org_row("B", 2000.0, 1800.0, 180.0),
        ];
        let dimension = catalog.dimension(dimension_keys::ORGANIZATION).unwrap();
        let totals = GrandTotals::from(&engine.summarize(&records, None).sums);

        let groups = engine.aggregate(&records, dimension, None, totals);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].dimension_value, "B");
        assert_eq!(groups[1].dimension_value, "A");
        assert_eq!(groups[0].kpis.claim_rate, 10.0);
        assert_eq!(groups[1].kpis.claim_rate, 50.0);
        assert!((groups[0].premium_share - 66.666_666).abs() < 1e-3);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let catalog = FieldCatalog::builtin().unwrap();
        let engine = AggregationEngine::new(&catalog);
        let records = vec![
            org_row("乐山", 500.0, 0.0, 0.0),
            org_row("宜宾", 500.0, 0.0, 0.0),
            org_row("天府", 900.0, 0.0, 0.0),
        ];
        let dimension = catalog.dimension(dimension_keys::ORGANIZATION).unwrap();
        let groups = engine.aggregate(&records, dimension, None, GrandTotals::default());

        let order: Vec<&str> = groups.iter().map(|g| g.dimension_value.as_str()).collect();
        assert_eq!(order, vec!["天府", "乐山", "宜宾"]);
        // 合计为 0 时占比为 0
        assert_eq!(groups[0].premium_share, 0.0);
    }

    #[test]
    fn test_absent_dimension_rows_are_dropped() {
        let catalog = FieldCatalog::builtin().unwrap();
        let engine = AggregationEngine::new(&catalog);
        let records = vec![
            org_row("天府", 100.0, 0.0, 0.0),
            Record::new().with("signed_premium_yuan", 999.0),
            org_row("", 50.0, 0.0, 0.0),
        ];
        let dimension = catalog.dimension(dimension_keys::ORGANIZATION).unwrap();
        let groups = engine.aggregate(&records, dimension, None, GrandTotals::default());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].sums.premium, 100.0);
    }

    #[test]
    fn test_plan_only_applies_to_known_orgs() {
        let catalog = FieldCatalog::builtin().unwrap();
        let engine = AggregationEngine::new(&catalog);
        let records = vec![org_row("天府", 900.0, 0.0, 0.0), org_row("高新", 100.0, 0.0, 0.0)];
        let plans = PlanTable::new().with_target("天府", 1000.0).with_target("高新", 0.0);
        let dimension = catalog.dimension(dimension_keys::ORGANIZATION).unwrap();

        let groups = engine.aggregate(&records, dimension, Some(&plans), GrandTotals::default());

        assert_eq!(groups[0].kpis.achievement_rate, Some(90.0));
        assert_eq!(groups[1].kpis.achievement_rate, None);
    }

    #[test]
    fn test_partition_premium_equals_total() {
        let catalog = FieldCatalog::builtin().unwrap();
        let engine = AggregationEngine::new(&catalog);
        let records = vec![
            org_row("天府", 120.5, 0.0, 0.0),
            org_row("高新", 80.25, 0.0, 0.0),
            org_row("天府", 10.0, 0.0, 0.0),
        ];
        let dimension = catalog.dimension(dimension_keys::ORGANIZATION).unwrap();
        let total = engine.summarize(&records, None).sums.premium;
        let groups = engine.aggregate(&records, dimension, None, GrandTotals::default());

        let partition: f64 = groups.iter().map(|g| g.sums.premium).sum();
        assert!((partition - total).abs() < 1e-9);
    }
}
