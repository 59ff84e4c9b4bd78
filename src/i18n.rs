// ==========================================
// 车险经营分析引擎 - 本地化消息
// ==========================================
// 职责: 协议错误响应中的可读消息
// 语言: zh-CN (缺省) / en,由 KPI_ENGINE_LOCALE 或 set_locale 切换
// 说明: rust_i18n::i18n! 在 lib.rs 中声明
// ==========================================

/// 缺省语言
pub const DEFAULT_LOCALE: &str = "zh-CN";
/// 可用语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];
/// 语言环境变量
pub const LOCALE_ENV: &str = "KPI_ENGINE_LOCALE";

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 切换语言；不在 SUPPORTED_LOCALES 中的语言被忽略并返回 false
pub fn set_locale(locale: &str) -> bool {
    match SUPPORTED_LOCALES.iter().find(|l| l.eq_ignore_ascii_case(locale.trim())) {
        Some(supported) => {
            rust_i18n::set_locale(supported);
            true
        }
        None => {
            tracing::warn!("不支持的语言,保持 {}: {}", current_locale(), locale);
            false
        }
    }
}

/// 按 KPI_ENGINE_LOCALE 设置语言（未设置时保持缺省）
pub fn init_from_env() {
    if let Ok(locale) = std::env::var(LOCALE_ENV) {
        set_locale(&locale);
    }
}

pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 带参数的消息,占位符形如 `%{request}`
///
/// ```no_run
/// use insurance_kpi_engine::i18n::t_with_args;
/// let msg = t_with_args("error.no_dataset", &[("request", "process")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |message, (name, value)| {
        message.replace(&format!("%{{{}}}", name), value)
    })
}
