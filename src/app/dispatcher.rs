// ==========================================
// 车险经营分析引擎 - 请求分发器
// ==========================================
// 职责: 协议请求 → 引擎操作 → 关联 id 的响应
// 规则:
//   - 同步、单线程、按到达顺序处理
//   - process / filter / get_dimension_values 仅在 Ready 状态可用
//   - 任何错误都以 error 响应返回,不中断处理循环
// ==========================================

use crate::api::{
    EngineError, EngineResult, ErrorPayload, Request, RequestEnvelope, Response, ResponseEnvelope,
};
use crate::app::state::{EngineSession, SessionState};
use crate::config::{EngineConfig, InitPayload, LogicalField};
use crate::domain::{FilterState, Record};
use crate::engine::{AnalysisPipeline, BusinessClassifier, DimensionValueResolver};
use crate::importer::{RecordSource, UniversalRecordSource};
use std::path::Path;

#[derive(Debug, Default)]
pub struct Dispatcher {
    session: EngineSession,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已加载的配置启动（直接进入 Configured）
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            session: EngineSession::with_config(config),
        }
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn session(&self) -> &EngineSession {
        &self.session
    }

    /// 处理一条请求；错误转为 error 响应
    pub fn handle(&mut self, envelope: RequestEnvelope) -> ResponseEnvelope {
        let RequestEnvelope { id, request } = envelope;
        let name = request.name();
        tracing::debug!("收到请求: id={}, type={}, state={}", id, name, self.state());

        let response = match self.dispatch(request) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("请求失败: id={}, type={}, error={}", id, name, err);
                Response::Error(ErrorPayload::from(&err))
            }
        };
        ResponseEnvelope::new(Some(id), response)
    }

    pub fn dispatch(&mut self, request: Request) -> EngineResult<Response> {
        match request {
            Request::Init(payload) => self.init(payload),
            Request::LoadDataset(records) => self.load(records, None),
            Request::LoadFile { path } => self.load_file(&path),
            Request::Process => self.process(),
            Request::Filter(state) => self.filter(&state),
            Request::GetDimensionValues {
                dimension,
                current_filters,
            } => self.dimension_values(dimension, current_filters.as_ref()),
            Request::Clear => {
                self.session.clear();
                Ok(Response::Ack)
            }
        }
    }

    // ==========================================
    // 配置与数据集
    // ==========================================

    fn init(&mut self, payload: InitPayload) -> EngineResult<Response> {
        let config = EngineConfig::from_init(payload)?;
        self.session.configure(config);
        Ok(Response::Ack)
    }

    fn load(&mut self, records: Vec<Record>, source: Option<String>) -> EngineResult<Response> {
        let summary = self.session.load(records, source)?;
        Ok(Response::Loaded(summary))
    }

    fn load_file(&mut self, path: &str) -> EngineResult<Response> {
        // 未配置时不读文件
        if self.session.config().is_none() {
            return Err(EngineError::NotConfigured {
                request: "load_file".to_string(),
            });
        }

        let records = UniversalRecordSource.read_records(Path::new(path))?;
        self.load(records, Some(path.to_string()))
    }

    // ==========================================
    // 分析
    // ==========================================

    fn process(&self) -> EngineResult<Response> {
        let (config, dataset) = self.session.ready("process")?;
        let report = AnalysisPipeline::new(config).process(&dataset.records);
        Ok(Response::Report(Box::new(report)))
    }

    fn filter(&self, state: &FilterState) -> EngineResult<Response> {
        let (config, dataset) = self.session.ready("filter")?;
        validate_filter(state)?;

        let report = AnalysisPipeline::new(config).filter(&dataset.records, state);
        Ok(Response::Report(Box::new(report)))
    }

    /// 维度可选值：只应用时间条件,不应用下钻条件
    fn dimension_values(
        &self,
        dimension: String,
        current: Option<&FilterState>,
    ) -> EngineResult<Response> {
        let (config, dataset) = self.session.ready("get_dimension_values")?;
        if let Some(state) = current {
            validate_filter(state)?;
        }

        let catalog = config.catalog.as_ref();
        let classified = BusinessClassifier::new(
            &config.business_mapping,
            catalog.field(LogicalField::BusinessType),
        )
        .classify_all(&dataset.records);

        let time = current.and_then(|state| state.time.as_ref());
        let values = DimensionValueResolver::new(catalog).values_for(&classified, &dimension, time);

        Ok(Response::DimensionValues { dimension, values })
    }
}

fn validate_filter(state: &FilterState) -> EngineResult<()> {
    match &state.time {
        Some(time) if !time.is_valid() => Err(EngineError::InvalidWeekRange {
            week_start: time.week_start,
            week_end: time.week_end,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;
    use crate::domain::TimeFilter;

    fn envelope(id: u64, request: Request) -> RequestEnvelope {
        RequestEnvelope { id, request }
    }

    fn records() -> Vec<Record> {
        vec![
            Record::new()
                .with("third_level_organization", "天府")
                .with("week_number", 48.0)
                .with("signed_premium_yuan", 100.0),
            Record::new()
                .with("third_level_organization", "高新")
                .with("week_number", 49.0)
                .with("signed_premium_yuan", 300.0),
        ]
    }

    fn error_kind(response: &ResponseEnvelope) -> Option<ErrorKind> {
        match &response.response {
            Response::Error(payload) => Some(payload.kind),
            _ => None,
        }
    }

    #[test]
    fn test_requests_before_dataset_are_rejected() {
        let mut dispatcher = Dispatcher::new();

        let response = dispatcher.handle(envelope(1, Request::Process));
        assert_eq!(response.id, Some(1));
        assert_eq!(error_kind(&response), Some(ErrorKind::InvalidState));

        let response = dispatcher.handle(envelope(2, Request::LoadDataset(records())));
        assert_eq!(error_kind(&response), Some(ErrorKind::InvalidState));
        assert_eq!(dispatcher.state(), SessionState::Uninitialized);

        dispatcher.handle(envelope(3, Request::Init(InitPayload::default())));
        let response = dispatcher.handle(envelope(4, Request::Filter(FilterState::default())));
        assert_eq!(error_kind(&response), Some(ErrorKind::InvalidState));
        assert_eq!(dispatcher.state(), SessionState::Configured);
    }

    #[test]
    fn test_full_flow() {
        let mut dispatcher = Dispatcher::with_config(EngineConfig::with_defaults().unwrap());

        let response = dispatcher.handle(envelope(1, Request::LoadDataset(records())));
        assert!(matches!(response.response, Response::Loaded(ref s) if s.row_count == 2));
        assert_eq!(dispatcher.state(), SessionState::Ready);

        match dispatcher.handle(envelope(2, Request::Process)).response {
            Response::Report(report) => {
                assert_eq!(report.record_count, 2);
                assert_eq!(report.groups_by_org[0].dimension_value, "高新");
            }
            other => panic!("unexpected response: {:?}", other),
        }

        let request = Request::GetDimensionValues {
            dimension: "third_level_organization".to_string(),
            current_filters: Some(FilterState::default().with_time(TimeFilter::weeks(49, 52))),
        };
        match dispatcher.handle(envelope(3, request)).response {
            Response::DimensionValues { values, .. } => assert_eq!(values, vec!["高新".to_string()]),
            other => panic!("unexpected response: {:?}", other),
        }

        dispatcher.handle(envelope(4, Request::Clear));
        assert_eq!(dispatcher.state(), SessionState::Configured);
    }

    #[test]
    fn test_inverted_week_range_is_rejected() {
        let mut dispatcher = Dispatcher::with_config(EngineConfig::with_defaults().unwrap());
        dispatcher.handle(envelope(1, Request::LoadDataset(records())));

        let state = FilterState::default().with_time(TimeFilter::weeks(10, 2));
        let response = dispatcher.handle(envelope(2, Request::Filter(state)));
        assert_eq!(error_kind(&response), Some(ErrorKind::InvalidFilter));
        // 错误不影响会话状态
        assert_eq!(dispatcher.state(), SessionState::Ready);
    }

    #[test]
    fn test_missing_file_is_import_error() {
        let mut dispatcher = Dispatcher::with_config(EngineConfig::with_defaults().unwrap());
        let response = dispatcher.handle(envelope(
            1,
            Request::LoadFile {
                path: "/nonexistent/data.csv".to_string(),
            },
        ));
        assert_eq!(error_kind(&response), Some(ErrorKind::Import));
        assert_eq!(dispatcher.state(), SessionState::Configured);
    }
}
