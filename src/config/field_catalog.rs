// ==========================================
// 车险经营分析引擎 - 字段目录
// ==========================================
// 职责: 逻辑字段 → 候选物理列名；下钻维度注册表
// 存储: field_catalog.json (随版本发布的配置数据,编译期嵌入)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

const BUILTIN_CATALOG: &str = include_str!("field_catalog.json");

// ==========================================
// FieldSpec - 候选列名（有序）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSpec {
    candidates: Vec<String>,
}

impl FieldSpec {
    pub fn new(candidates: &[&str]) -> Self {
        Self {
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

/// 逻辑字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    SignedPremium,
    MaturedPremium,
    ReportedClaim,
    Expense,
    PolicyCount,
    ClaimCaseCount,
    Organization,
    CustomerCategory,
    BusinessType,
    PolicyYear,
    Week,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FieldTable {
    signed_premium: FieldSpec,
    matured_premium: FieldSpec,
    reported_claim: FieldSpec,
    expense: FieldSpec,
    policy_count: FieldSpec,
    claim_case_count: FieldSpec,
    organization: FieldSpec,
    customer_category: FieldSpec,
    business_type: FieldSpec,
    policy_year: FieldSpec,
    week: FieldSpec,
}

// ==========================================
// DimensionSpec - 下钻维度
// ==========================================
// 分组与筛选共用同一份候选列,两者取值方式必须一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSpec {
    pub key: String,
    pub label: String,
    /// 兼容的旧维度键
    #[serde(default)]
    pub aliases: Vec<String>,
    pub fields: FieldSpec,
}

impl DimensionSpec {
    pub fn matches_key(&self, key: &str) -> bool {
        self.key == key || self.aliases.iter().any(|a| a == key)
    }
}

// ==========================================
// FieldCatalog
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub version: String,
    fields: FieldTable,
    dimensions: Vec<DimensionSpec>,
}

impl FieldCatalog {
    /// 加载内置目录
    pub fn builtin() -> ConfigResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        let catalog: FieldCatalog =
            serde_json::from_str(raw).map_err(|e| ConfigError::InvalidFormat {
                source_name: "field_catalog".to_string(),
                message: e.to_string(),
            })?;

        for key in [
            dimension_keys::ORGANIZATION,
            dimension_keys::CUSTOMER_CATEGORY,
            dimension_keys::BUSINESS_LABEL,
        ] {
            if catalog.dimension(key).is_none() {
                return Err(ConfigError::MissingDimension(key.to_string()));
            }
        }

        Ok(catalog)
    }

    pub fn field(&self, field: LogicalField) -> &FieldSpec {
        let table = &self.fields;
        match field {
            LogicalField::SignedPremium => &table.signed_premium,
            LogicalField::MaturedPremium => &table.matured_premium,
            LogicalField::ReportedClaim => &table.reported_claim,
            LogicalField::Expense => &table.expense,
            LogicalField::PolicyCount => &table.policy_count,
            LogicalField::ClaimCaseCount => &table.claim_case_count,
            LogicalField::Organization => &table.organization,
            LogicalField::CustomerCategory => &table.customer_category,
            LogicalField::BusinessType => &table.business_type,
            LogicalField::PolicyYear => &table.policy_year,
            LogicalField::Week => &table.week,
        }
    }

    /// 按维度键（或兼容别名）查找；未注册返回 None
    pub fn dimension(&self, key: &str) -> Option<&DimensionSpec> {
        self.dimensions.iter().find(|d| d.matches_key(key))
    }

    pub fn dimensions(&self) -> &[DimensionSpec] {
        &self.dimensions
    }
}

/// 内置维度键
pub mod dimension_keys {
    pub const ORGANIZATION: &str = "third_level_organization";
    pub const CUSTOMER_CATEGORY: &str = "customer_category_3";
    pub const BUSINESS_LABEL: &str = "business_label";
    pub const POLICY_YEAR: &str = "policy_start_year";
    pub const WEEK: &str = "week_number";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = FieldCatalog::builtin().unwrap();
        assert!(!catalog.version.is_empty());
        assert_eq!(catalog.dimensions().len(), 5);
        assert_eq!(
            catalog.field(LogicalField::SignedPremium).candidates(),
            &["signed_premium_yuan".to_string(), "签单保费".to_string()]
        );
    }

    #[test]
    fn test_dimension_alias_lookup() {
        let catalog = FieldCatalog::builtin().unwrap();
        let by_alias = catalog.dimension("ui_short_label").unwrap();
        assert_eq!(by_alias.key, dimension_keys::BUSINESS_LABEL);
        assert!(catalog.dimension("energy_type").is_none());
    }

    #[test]
    fn test_catalog_without_required_dimension_is_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(BUILTIN_CATALOG).unwrap();
        value["dimensions"] = serde_json::json!([]);
        let err = FieldCatalog::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingDimension(_)));
    }
}
