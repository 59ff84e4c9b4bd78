// ==========================================
// 车险经营分析引擎 - 领域类型定义
// ==========================================
// 职责: 分析模式、问题类型、指标状态等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 分析模式 (Analysis Mode)
// ==========================================
// 恰好一个机构为单机构模式，其余情况为多机构模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Single,
    Multi,
}

impl AnalysisMode {
    pub fn from_organization_count(count: usize) -> Self {
        if count == 1 {
            AnalysisMode::Single
        } else {
            AnalysisMode::Multi
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Single => write!(f, "single"),
            AnalysisMode::Multi => write!(f, "multi"),
        }
    }
}

// ==========================================
// 问题类型 (Problem Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// 变动成本率超标
    CostExceeded,
    /// 年保费未达标
    PremiumBehindTarget,
    /// 费用率超标
    ExpenseRateHigh,
}

impl ProblemKind {
    /// 问题清单里展示的标签
    pub fn label(&self) -> &'static str {
        match self {
            ProblemKind::CostExceeded => "成本超标",
            ProblemKind::PremiumBehindTarget => "保费未达标",
            ProblemKind::ExpenseRateHigh => "费用率高",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 指标状态 (KPI Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiLevel {
    Good,
    Warning,
    Danger,
}

// ==========================================
// 分级指标 (Graded Metric)
// ==========================================
// 序列化格式: 与阈值配置文件中的中文指标名一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradedMetric {
    #[serde(rename = "变动成本率", alias = "costRate")]
    CostRate,
    #[serde(rename = "满期赔付率", alias = "claimRate")]
    ClaimRate,
    #[serde(rename = "费用率", alias = "expenseRate")]
    ExpenseRate,
    #[serde(rename = "保费时间进度达成率", alias = "premiumAchievement")]
    PremiumAchievement,
}

impl GradedMetric {
    pub const ALL: [GradedMetric; 4] = [
        GradedMetric::CostRate,
        GradedMetric::ClaimRate,
        GradedMetric::ExpenseRate,
        GradedMetric::PremiumAchievement,
    ];

    /// 数值越高越好（仅达成率）
    pub fn higher_is_better(&self) -> bool {
        matches!(self, GradedMetric::PremiumAchievement)
    }
}
