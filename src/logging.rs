// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 支持环境变量配置日志级别, 可选 JSON 输出
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 切换为 JSON 行格式输出的环境变量（值为 "json" 时生效）
pub const LOG_FORMAT_ENV: &str = "STORE_OPENING_PLAN_LOG_FORMAT";

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=store_opening_plan::engine=debug
/// - STORE_OPENING_PLAN_LOG_FORMAT=json: 输出 JSON 行
///
/// # 示例
/// ```no_run
/// use store_opening_plan::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(true)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_line_number(true)
            .init();
    }
}

