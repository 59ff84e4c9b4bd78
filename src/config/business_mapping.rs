// ==========================================
// 车险经营分析引擎 - 业务类型映射表
// ==========================================
// 职责: 原始业务类型 → {大类, 简称}
// 来源: business_type_mapping.json (标准表 + 兼容表)
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 未映射业务类型的兜底大类
pub const DEFAULT_CATEGORY: &str = "其他";
/// 业务类型为空时的兜底简称
pub const DEFAULT_LABEL: &str = "其他";

/// 归类结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessClass {
    pub category: String,
    pub label: String,
}

impl BusinessClass {
    pub fn new(category: &str, label: &str) -> Self {
        Self {
            category: category.to_string(),
            label: label.to_string(),
        }
    }

    /// 兜底归类：大类"其他"，简称保留原始值
    pub fn fallback(raw: &str) -> Self {
        Self::new(DEFAULT_CATEGORY, raw)
    }
}

// ==========================================
// 配置文件格式
// ==========================================

/// 标准业务类型
#[derive(Debug, Clone, Deserialize)]
pub struct CanonicalBusinessType {
    pub csv_raw_value: String,
    #[serde(default)]
    pub ui_full_name: Option<String>,
    pub ui_short_label: String,
    pub category: String,
}

/// 兼容映射：旧口径原始值 → 标准全称
#[derive(Debug, Clone, Deserialize)]
pub struct CompatibilityMapping {
    pub csv_raw_value: String,
    pub maps_to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlatBusinessEntry {
    pub ui_short_label: String,
    pub category: String,
}

/// 两种格式：结构化 (标准表 + 兼容表) 或扁平 (原始值 → 简称/大类)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BusinessMappingConfig {
    Structured {
        business_types: Vec<CanonicalBusinessType>,
        #[serde(default)]
        compatibility_mappings: Vec<CompatibilityMapping>,
    },
    Flat(HashMap<String, FlatBusinessEntry>),
}

// ==========================================
// BusinessMappingTable
// ==========================================
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "BusinessMappingConfig")]
pub struct BusinessMappingTable {
    canonical: HashMap<String, BusinessClass>,
    aliases: HashMap<String, String>,
}

impl BusinessMappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canonical(mut self, raw: &str, category: &str, label: &str) -> Self {
        self.canonical
            .insert(raw.to_string(), BusinessClass::new(category, label));
        self
    }

    pub fn with_alias(mut self, raw: &str, maps_to: &str) -> Self {
        self.aliases.insert(raw.to_string(), maps_to.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.canonical.len() + self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty() && self.aliases.is_empty()
    }

    /// 归类原始业务类型
    ///
    /// 顺序: 兼容表 → 标准表 → 兜底。兼容表指向不存在的标准项时同样兜底。
    /// 空值归入"其他/其他"。
    pub fn classify(&self, raw: Option<&str>) -> BusinessClass {
        let raw = match raw.map(str::trim).filter(|r| !r.is_empty()) {
            Some(r) => r,
            None => return BusinessClass::new(DEFAULT_CATEGORY, DEFAULT_LABEL),
        };

        if let Some(target) = self.aliases.get(raw) {
            return match self.canonical.get(target) {
                Some(class) => class.clone(),
                None => BusinessClass::fallback(raw),
            };
        }

        self.canonical
            .get(raw)
            .cloned()
            .unwrap_or_else(|| BusinessClass::fallback(raw))
    }
}

impl From<BusinessMappingConfig> for BusinessMappingTable {
    fn from(config: BusinessMappingConfig) -> Self {
        let mut table = BusinessMappingTable::new();
        match config {
            BusinessMappingConfig::Structured {
                business_types,
                compatibility_mappings,
            } => {
                for item in business_types {
                    let class = BusinessClass::new(&item.category, &item.ui_short_label);
                    // 标准项同时可按原始值和全称查找
                    if let Some(full_name) = item.ui_full_name {
                        table.canonical.insert(full_name, class.clone());
                    }
                    table.canonical.insert(item.csv_raw_value, class);
                }
                for mapping in compatibility_mappings {
                    table.aliases.insert(mapping.csv_raw_value, mapping.maps_to);
                }
            }
            BusinessMappingConfig::Flat(entries) => {
                for (raw, entry) in entries {
                    table
                        .canonical
                        .insert(raw, BusinessClass::new(&entry.category, &entry.ui_short_label));
                }
            }
        }
        table
    }
}
