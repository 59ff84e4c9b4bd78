// ==========================================
// 车险经营分析引擎 - 日志
// ==========================================
// 输出: stderr (stdout 只承载协议帧)
// 级别: RUST_LOG,缺省 info
// 格式: KPI_ENGINE_LOG_FORMAT=json 时输出 JSON 行,便于宿主进程采集
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量
pub const LOG_FORMAT_ENV: &str = "KPI_ENGINE_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }

    fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|raw| Self::parse(&raw))
            .unwrap_or(LogFormat::Text)
    }
}

/// 工作进程日志初始化
///
/// ```no_run
/// insurance_kpi_engine::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_line_number(true);

    match LogFormat::from_env() {
        LogFormat::Json => builder.json().with_current_span(false).init(),
        LogFormat::Text => builder.with_target(true).init(),
    }
}

/// 测试用: debug 级别写入测试输出,可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
