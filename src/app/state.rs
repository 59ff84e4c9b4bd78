// ==========================================
// 车险经营分析引擎 - 会话状态
// ==========================================
// 职责: 持有当前配置与数据集 (数据集仓库)
// 状态: Uninitialized → Configured → Ready
//   - init 替换配置,不丢弃数据集
//   - 新数据集整体替换旧数据集,状态保持 Ready
//   - clear 丢弃数据集,回到 Configured
// ==========================================

use crate::api::{DatasetSummary, EngineError, EngineResult};
use crate::config::EngineConfig;
use crate::domain::Record;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Uninitialized,
    Configured,
    Ready,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Uninitialized => write!(f, "uninitialized"),
            SessionState::Configured => write!(f, "configured"),
            SessionState::Ready => write!(f, "ready"),
        }
    }
}

// ==========================================
// Dataset - 原始明细数据集
// ==========================================
#[derive(Debug, Clone)]
pub struct Dataset {
    pub id: Uuid,
    pub records: Vec<Record>,
    pub loaded_at: DateTime<Utc>,
    pub source: Option<String>,
}

impl Dataset {
    pub fn new(records: Vec<Record>, source: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            records,
            loaded_at: Utc::now(),
            source,
        }
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            dataset_id: self.id,
            row_count: self.records.len(),
            loaded_at: self.loaded_at,
            source: self.source.clone(),
        }
    }
}

// ==========================================
// EngineSession
// ==========================================
#[derive(Debug, Default)]
pub struct EngineSession {
    config: Option<EngineConfig>,
    dataset: Option<Dataset>,
}

impl EngineSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config: Some(config),
            dataset: None,
        }
    }

    pub fn state(&self) -> SessionState {
        match (&self.config, &self.dataset) {
            (None, _) => SessionState::Uninitialized,
            (Some(_), None) => SessionState::Configured,
            (Some(_), Some(_)) => SessionState::Ready,
        }
    }

    /// 替换配置
    pub fn configure(&mut self, config: EngineConfig) {
        tracing::info!(
            "加载配置: 业务映射 {} 项, 年度计划 {} 项, 字段目录版本 {}",
            config.business_mapping.len(),
            config.plans.len(),
            config.catalog.version
        );
        self.config = Some(config);
    }

    /// 装载数据集（整体替换）
    pub fn load(&mut self, records: Vec<Record>, source: Option<String>) -> EngineResult<DatasetSummary> {
        if self.config.is_none() {
            return Err(EngineError::NotConfigured {
                request: "load_dataset".to_string(),
            });
        }

        let dataset = Dataset::new(records, source);
        let summary = dataset.summary();
        if let Some(previous) = self.dataset.replace(dataset) {
            tracing::info!("替换数据集: {} ({} 行)", previous.id, previous.records.len());
        }
        tracing::info!("数据集已装载: {} ({} 行)", summary.dataset_id, summary.row_count);
        Ok(summary)
    }

    /// 丢弃数据集；返回是否存在过数据集
    pub fn clear(&mut self) -> bool {
        match self.dataset.take() {
            Some(dataset) => {
                tracing::info!("数据集已清除: {}", dataset.id);
                true
            }
            None => false,
        }
    }

    pub fn config(&self) -> Option<&EngineConfig> {
        self.config.as_ref()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// 分析类请求的前置检查：必须处于 Ready
    pub fn ready(&self, request: &str) -> EngineResult<(&EngineConfig, &Dataset)> {
        match (&self.config, &self.dataset) {
            (Some(config), Some(dataset)) => Ok((config, dataset)),
            (None, _) => Err(EngineError::NotConfigured {
                request: request.to_string(),
            }),
            (Some(_), None) => Err(EngineError::NoDataset {
                request: request.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let mut session = EngineSession::new();
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(matches!(
            session.load(vec![Record::new()], None),
            Err(EngineError::NotConfigured { .. })
        ));

        session.configure(EngineConfig::with_defaults().unwrap());
        assert_eq!(session.state(), SessionState::Configured);
        assert!(matches!(session.ready("process"), Err(EngineError::NoDataset { .. })));

        let first = session.load(vec![Record::new(); 3], None).unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(first.row_count, 3);

        let second = session.load(vec![Record::new()], Some("b.csv".to_string())).unwrap();
        assert_ne!(first.dataset_id, second.dataset_id);
        assert_eq!(session.dataset().map(|d| d.records.len()), Some(1));

        assert!(session.clear());
        assert_eq!(session.state(), SessionState::Configured);
        assert!(!session.clear());
    }

    #[test]
    fn test_reconfigure_keeps_dataset() {
        let mut session = EngineSession::with_config(EngineConfig::with_defaults().unwrap());
        session.load(vec![Record::new()], None).unwrap();

        session.configure(EngineConfig::with_defaults().unwrap());
        assert_eq!(session.state(), SessionState::Ready);
    }
}
