// ==========================================
// 车险经营分析引擎 - 年度保费计划表
// ==========================================
// 来源: year-plans.json {"年度保费计划": {机构: 目标保费}}
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 机构 → 年度目标保费
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanTable {
    #[serde(rename = "年度保费计划", alias = "annualPremiumPlans", default)]
    targets: HashMap<String, f64>,
}

impl PlanTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, organization: &str, target: f64) -> Self {
        self.targets.insert(organization.to_string(), target);
        self
    }

    /// 目标保费；无计划时返回 None
    pub fn target(&self, organization: &str) -> Option<f64> {
        self.targets.get(organization).copied()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_table_from_json() {
        let plans: PlanTable =
            serde_json::from_str(r#"{"年度保费计划": {"天府": 50000000, "高新": 42000000.5}}"#)
                .unwrap();
        assert_eq!(plans.target("天府"), Some(50_000_000.0));
        assert_eq!(plans.target("宜宾"), None);
    }

    #[test]
    fn test_plan_table_missing_section_is_empty() {
        let plans: PlanTable = serde_json::from_str("{}").unwrap();
        assert!(plans.is_empty());
    }
}
