// ==========================================
// 车险经营分析引擎 - 问题识别
// ==========================================
// 职责: 按阈值标记问题分组,输出 "<维度取值>(<问题>)"
// 规则:
//   1. 变动成本率 > 阈值 → 成本超标
//      否则 0 < 达成率 < 阈值 → 保费未达标 (仅有计划时判定)
//   2. 费用率 > 阈值 → 费用率高 (与 1 独立判定)
// 说明: 成本与达成率两项互斥,费用率独立;调用方只取前 5 条
// ==========================================

use crate::config::ProblemThresholds;
use crate::domain::{AggregatedGroup, ProblemKind};
use serde::{Serialize, Serializer};
use std::fmt;

/// 问题清单展示条数上限
pub const MAX_REPORTED_PROBLEMS: usize = 5;

// ==========================================
// Problem
// ==========================================
/// 单条问题；序列化为 "天府(成本超标)" 形式的字符串
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub subject: String,
    pub kind: ProblemKind,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.subject, self.kind.label())
    }
}

impl Serialize for Problem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ==========================================
// ProblemDetector
// ==========================================
pub struct ProblemDetector<'c> {
    thresholds: &'c ProblemThresholds,
}

impl<'c> ProblemDetector<'c> {
    pub fn new(thresholds: &'c ProblemThresholds) -> Self {
        Self { thresholds }
    }

    /// 按分组顺序输出全部问题
    pub fn detect(&self, groups: &[AggregatedGroup]) -> Vec<Problem> {
        let cost_limit = self.thresholds.cost_rate_limit();
        let achievement_floor = self.thresholds.premium_achievement_floor();
        let expense_limit = self.thresholds.expense_rate_limit();

        let mut problems = Vec::new();
        for group in groups {
            let kpis = &group.kpis;

            if kpis.cost_rate > cost_limit {
                problems.push(Self::problem(group, ProblemKind::CostExceeded));
            } else if let Some(rate) = kpis.achievement_rate {
                if rate > 0.0 && rate < achievement_floor {
                    problems.push(Self::problem(group, ProblemKind::PremiumBehindTarget));
                }
            }

            if kpis.expense_rate > expense_limit {
                problems.push(Self::problem(group, ProblemKind::ExpenseRateHigh));
            }
        }

        tracing::debug!("问题识别: {} 个分组, {} 条问题", groups.len(), problems.len());
        problems
    }

    /// 截取前 MAX_REPORTED_PROBLEMS 条
    pub fn detect_top(&self, groups: &[AggregatedGroup]) -> Vec<Problem> {
        let mut problems = self.detect(groups);
        problems.truncate(MAX_REPORTED_PROBLEMS);
        problems
    }

    fn problem(group: &AggregatedGroup, kind: ProblemKind) -> Problem {
        Problem {
            subject: group.dimension_value.clone(),
            kind,
        }
    }
}
