// ==========================================
// 车险经营分析引擎 - KPI 值对象
// ==========================================
// 职责: 基础汇总量、派生比率、分组结果
// 说明: 每次请求全量重算,不缓存、不增量
// ==========================================

use serde::{Deserialize, Serialize};

/// 未设定计划时，展示层使用的达成率
pub const ACHIEVEMENT_DISPLAY_FALLBACK: f64 = 100.0;

/// 安全除法：分母为 0 或 NaN 时结果为 0
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || denominator.is_nan() {
        0.0
    } else {
        numerator / denominator
    }
}

// ==========================================
// BaseSums - 六项基础汇总量
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseSums {
    /// 签单保费
    pub premium: f64,
    /// 满期保费
    pub matured_premium: f64,
    /// 已报告赔款
    pub claim: f64,
    /// 费用额
    pub expense: f64,
    /// 保单件数
    pub policy_count: f64,
    /// 赔案件数
    pub claim_count: f64,
}

impl BaseSums {
    pub fn add(&mut self, other: &BaseSums) {
        self.premium += other.premium;
        self.matured_premium += other.matured_premium;
        self.claim += other.claim;
        self.expense += other.expense;
        self.policy_count += other.policy_count;
        self.claim_count += other.claim_count;
    }
}

// ==========================================
// KpiSet - 派生比率
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSet {
    /// 满期赔付率 (%)
    pub claim_rate: f64,
    /// 费用率 (%)
    pub expense_rate: f64,
    /// 变动成本率 (%) = 满期赔付率 + 费用率
    pub cost_rate: f64,
    /// 出险率 (%)
    pub claim_frequency: f64,
    /// 案均赔款
    pub avg_claim: f64,
    /// 年计划达成率 (%)，无计划时为 null
    pub achievement_rate: Option<f64>,
}

impl KpiSet {
    /// 由汇总量派生比率
    ///
    /// `plan_target` 仅在 > 0 时参与达成率计算。
    pub fn derive(sums: &BaseSums, plan_target: Option<f64>) -> Self {
        let claim_rate = safe_divide(sums.claim, sums.matured_premium) * 100.0;
        let expense_rate = safe_divide(sums.expense, sums.premium) * 100.0;

        let achievement_rate = plan_target
            .filter(|target| *target > 0.0)
            .map(|target| safe_divide(sums.premium, target) * 100.0);

        Self {
            claim_rate,
            expense_rate,
            cost_rate: claim_rate + expense_rate,
            claim_frequency: safe_divide(sums.claim_count, sums.policy_count) * 100.0,
            avg_claim: safe_divide(sums.claim, sums.claim_count),
            achievement_rate,
        }
    }

    /// 展示用达成率：无计划时按 100 展示
    pub fn achievement_for_display(&self) -> f64 {
        self.achievement_rate.unwrap_or(ACHIEVEMENT_DISPLAY_FALLBACK)
    }
}

// ==========================================
// AggregatedGroup - 单个维度取值的聚合结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedGroup {
    pub dimension_value: String,
    pub sums: BaseSums,
    pub kpis: KpiSet,
    /// 保费占比 (%)
    pub premium_share: f64,
    /// 已报告赔款占比 (%)
    pub claim_share: f64,
}

// ==========================================
// KpiSnapshot - 整体（不分组）指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSnapshot {
    pub sums: BaseSums,
    pub kpis: KpiSet,
}

/// 占比计算所需的全量合计
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GrandTotals {
    pub premium: f64,
    pub claim: f64,
}

impl From<&BaseSums> for GrandTotals {
    fn from(sums: &BaseSums) -> Self {
        Self {
            premium: sums.premium,
            claim: sums.claim,
        }
    }
}
