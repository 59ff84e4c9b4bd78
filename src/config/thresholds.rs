// ==========================================
// 车险经营分析引擎 - 阈值配置
// ==========================================
// 来源: thresholds.json
//   - 问题机构识别阈值: 问题识别的单值阈值
//   - KPI状态阈值: 指标分级 {warning, danger}
//   - 其余分区(如四象限基准线)原样保留并回传
// 规则: 缺失、为 0 或非有限值时使用引擎内置默认值
// ==========================================

use crate::domain::types::{GradedMetric, KpiLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 变动成本率超标默认阈值 (%)
pub const DEFAULT_COST_RATE_LIMIT: f64 = 93.0;
/// 年保费未达标默认阈值 (%)
pub const DEFAULT_PREMIUM_ACHIEVEMENT_FLOOR: f64 = 95.0;
/// 费用率超标默认阈值 (%)
pub const DEFAULT_EXPENSE_RATE_LIMIT: f64 = 18.0;

fn effective(value: Option<f64>, default: f64) -> f64 {
    value
        .filter(|v| v.is_finite() && *v != 0.0)
        .unwrap_or(default)
}

// ==========================================
// ProblemThresholds - 问题识别阈值
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemThresholds {
    #[serde(
        rename = "变动成本率超标",
        alias = "costRate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cost_rate: Option<f64>,

    #[serde(
        rename = "年保费未达标",
        alias = "premiumAchievement",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub premium_achievement: Option<f64>,

    #[serde(
        rename = "费用率超标",
        alias = "expenseRate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expense_rate: Option<f64>,
}

impl ProblemThresholds {
    pub fn cost_rate_limit(&self) -> f64 {
        effective(self.cost_rate, DEFAULT_COST_RATE_LIMIT)
    }

    pub fn premium_achievement_floor(&self) -> f64 {
        effective(self.premium_achievement, DEFAULT_PREMIUM_ACHIEVEMENT_FLOOR)
    }

    pub fn expense_rate_limit(&self) -> f64 {
        effective(self.expense_rate, DEFAULT_EXPENSE_RATE_LIMIT)
    }
}

// ==========================================
// LevelCutoffs - 指标分级阈值
// ==========================================
// 越高越差的指标: 超过 warning 为警示, 超过 danger 为危险
// 越高越好的指标: 低于 warning 为警示, 低于 danger 为危险
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCutoffs {
    pub warning: f64,
    pub danger: f64,
}

impl LevelCutoffs {
    pub fn new(warning: f64, danger: f64) -> Self {
        Self { warning, danger }
    }

    pub fn default_for(metric: GradedMetric) -> Self {
        match metric {
            GradedMetric::CostRate => Self::new(91.0, 94.0),
            GradedMetric::ClaimRate => Self::new(70.0, 75.0),
            GradedMetric::ExpenseRate => Self::new(14.0, 17.0),
            GradedMetric::PremiumAchievement => Self::new(100.0, 95.0),
        }
    }

    fn grade(&self, value: f64, higher_is_better: bool) -> KpiLevel {
        if higher_is_better {
            if value < self.danger {
                KpiLevel::Danger
            } else if value < self.warning {
                KpiLevel::Warning
            } else {
                KpiLevel::Good
            }
        } else if value > self.danger {
            KpiLevel::Danger
        } else if value > self.warning {
            KpiLevel::Warning
        } else {
            KpiLevel::Good
        }
    }
}

// ==========================================
// ThresholdConfig
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(rename = "问题机构识别阈值", alias = "problemThresholds", default)]
    pub problem: ProblemThresholds,

    #[serde(rename = "KPI状态阈值", alias = "kpiLevels", default)]
    pub levels: BTreeMap<GradedMetric, LevelCutoffs>,

    /// 引擎不解读的分区，回传给展示层
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ThresholdConfig {
    pub fn cutoffs(&self, metric: GradedMetric) -> LevelCutoffs {
        self.levels
            .get(&metric)
            .copied()
            .filter(|c| c.warning.is_finite() && c.danger.is_finite())
            .unwrap_or_else(|| LevelCutoffs::default_for(metric))
    }

    /// 指标分级
    pub fn grade(&self, metric: GradedMetric, value: f64) -> KpiLevel {
        self.cutoffs(metric).grade(value, metric.higher_is_better())
    }
}
