// ==========================================
// 车险经营分析引擎 - 配置管理器
// ==========================================
// 职责: 组装引擎配置 (字段目录 + 映射表 + 计划表 + 阈值)
// 来源: init 请求载荷,或配置目录下的 JSON 文件
// ==========================================

use crate::config::business_mapping::BusinessMappingTable;
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::field_catalog::FieldCatalog;
use crate::config::plan_table::PlanTable;
use crate::config::thresholds::ThresholdConfig;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// 配置目录下的文件名
pub mod config_files {
    pub const BUSINESS_MAPPING: &str = "business_type_mapping.json";
    pub const YEAR_PLANS: &str = "year-plans.json";
    pub const THRESHOLDS: &str = "thresholds.json";
}

// ==========================================
// InitPayload - init 请求载荷
// ==========================================
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitPayload {
    #[serde(default)]
    pub business_mapping: Option<BusinessMappingTable>,
    #[serde(default)]
    pub year_plans: Option<PlanTable>,
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,
}

// ==========================================
// EngineConfig - 引擎运行配置
// ==========================================
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub catalog: Arc<FieldCatalog>,
    pub business_mapping: BusinessMappingTable,
    pub plans: PlanTable,
    pub thresholds: ThresholdConfig,
}

impl EngineConfig {
    /// 由 init 载荷构建；缺省的表使用空表/默认阈值
    pub fn from_init(payload: InitPayload) -> ConfigResult<Self> {
        let catalog = FieldCatalog::builtin()?;

        Ok(Self {
            catalog: Arc::new(catalog),
            business_mapping: payload.business_mapping.unwrap_or_default(),
            plans: payload.year_plans.unwrap_or_default(),
            thresholds: payload.thresholds.unwrap_or_default(),
        })
    }

    pub fn with_defaults() -> ConfigResult<Self> {
        Self::from_init(InitPayload::default())
    }
}

// ==========================================
// ConfigLoader - 从目录加载
// ==========================================
pub struct ConfigLoader;

impl ConfigLoader {
    /// 读取配置目录；文件不存在时对应表为空
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> ConfigResult<InitPayload> {
        let dir = dir.as_ref();
        tracing::info!("加载配置目录: {}", dir.display());

        Ok(InitPayload {
            business_mapping: read_optional_json(&dir.join(config_files::BUSINESS_MAPPING))?,
            year_plans: read_optional_json(&dir.join(config_files::YEAR_PLANS))?,
            thresholds: read_optional_json(&dir.join(config_files::THRESHOLDS))?,
        })
    }
}

fn read_optional_json<T: DeserializeOwned>(path: &Path) -> ConfigResult<Option<T>> {
    if !path.exists() {
        tracing::warn!("配置文件不存在,使用默认值: {}", path.display());
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    // 兼容带 BOM 的文件
    let value = serde_json::from_str(raw.trim_start_matches('\u{feff}')).map_err(|e| {
        ConfigError::InvalidFormat {
            source_name: path.display().to_string(),
            message: e.to_string(),
        }
    })?;

    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_init_payload_camel_case() {
        let payload: InitPayload = serde_json::from_str(
            r#"{
                "businessMapping": {"营业货车": {"ui_short_label": "货车", "category": "营业货车"}},
                "yearPlans": {"年度保费计划": {"天府": 1000}},
                "thresholds": null
            }"#,
        )
        .unwrap();

        let config = EngineConfig::from_init(payload).unwrap();
        assert_eq!(config.business_mapping.len(), 1);
        assert_eq!(config.plans.target("天府"), Some(1000.0));
        assert_eq!(config.thresholds.problem.cost_rate_limit(), 93.0);
    }

    #[test]
    fn test_load_dir_with_partial_files() {
        let dir = TempDir::new().unwrap();
        let mut file =
            std::fs::File::create(dir.path().join(config_files::THRESHOLDS)).unwrap();
        write!(file, "\u{feff}{{\"问题机构识别阈值\": {{\"费用率超标\": 16}}}}").unwrap();

        let payload = ConfigLoader::load_dir(dir.path()).unwrap();
        assert!(payload.business_mapping.is_none());
        assert!(payload.year_plans.is_none());
        assert_eq!(payload.thresholds.unwrap().problem.expense_rate_limit(), 16.0);
    }

    #[test]
    fn test_load_dir_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(config_files::YEAR_PLANS), "{not json").unwrap();

        let err = ConfigLoader::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat { .. }));
    }
}
