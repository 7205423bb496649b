//! # 日志系统模块
//!
//! 为调度模拟器提供 `log` crate 的后端实现，支持多种日志级别和彩色输出。
//! 库代码只通过 `log` 的宏记录事件，是否输出、输出到哪里由调用方决定。
//!
//! ## 日志格式
//!
//! ```text
//! LEVEL [T0001] [module::name] [file.rs:42] message
//! ```
//!
//! 其中 `T` 后的数字为日志系统启动以来经过的毫秒数。
//!
//! ## 颜色方案
//!
//! - **ERROR**: 红色 (31)
//! - **WARN**: 亮黄色 (93)
//! - **INFO**: 蓝色 (34)
//! - **DEBUG**: 绿色 (32)
//! - **TRACE**: 暗灰色 (90)

use lazy_static::lazy_static;
use log::{self, Level, LevelFilter, Log, Metadata, Record};
use std::time::Instant;

lazy_static! {
    /// 日志系统的起始时间，用于计算时间戳
    static ref START: Instant = Instant::now();
}

/// 简单日志实现
///
/// 实现标准的 `Log` trait，将日志格式化后输出到标准错误。
struct SimpleLogger;

impl Log for SimpleLogger {
    /// 级别过滤由 `log::set_max_level` 完成，这里不再二次过滤
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let color = level_color(record.level());
        let module = record.target();

        if let (Some(file), Some(line)) = (record.file(), record.line()) {
            // 提取文件名（去掉路径）
            let file_name = file.rsplit('/').next().unwrap_or(file);
            eprintln!(
                "\u{1B}[{}m{:>5} [T{:>4}] [{}] [{}:{}] {}\u{1B}[0m",
                color,
                record.level(),
                timestamp(),
                module,
                file_name,
                line,
                record.args()
            );
        } else {
            eprintln!(
                "\u{1B}[{}m{:>5} [T{:>4}] [{}] [unknown] {}\u{1B}[0m",
                color,
                record.level(),
                timestamp(),
                module,
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// 日志级别对应的 ANSI 颜色代码
fn level_color(level: Level) -> u8 {
    match level {
        Level::Error => 31, // 红色
        Level::Warn => 93,  // 亮黄色
        Level::Info => 34,  // 蓝色
        Level::Debug => 32, // 绿色
        Level::Trace => 90, // 暗灰色
    }
}

/// 日志系统启动以来经过的毫秒数
fn timestamp() -> u128 {
    START.elapsed().as_millis()
}

/// 解析日志级别字符串
///
/// 无法识别的值返回 `None`，由调用方决定默认级别。
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_uppercase().as_str() {
        "OFF" => Some(LevelFilter::Off),
        "ERROR" => Some(LevelFilter::Error),
        "WARN" => Some(LevelFilter::Warn),
        "INFO" => Some(LevelFilter::Info),
        "DEBUG" => Some(LevelFilter::Debug),
        "TRACE" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// 初始化日志系统
///
/// 设置全局日志记录器并配置日志级别。日志级别通过运行时环境变量
/// `LOG` 配置，未设置或无法识别时默认为 `INFO`。
///
/// ## 环境变量配置
///
/// - `LOG=ERROR` - 只输出错误级别日志
/// - `LOG=WARN` - 输出警告及以上级别日志
/// - `LOG=INFO` - 输出信息及以上级别日志（默认）
/// - `LOG=DEBUG` - 输出调试及以上级别日志
/// - `LOG=TRACE` - 输出所有级别日志
///
/// ## Note
///
/// 全局记录器只能设置一次，重复调用时保留第一次的设置。
pub fn init() {
    static LOGGER: SimpleLogger = SimpleLogger;

    if log::set_logger(&LOGGER).is_err() {
        return;
    }
    let level = std::env::var("LOG")
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(LevelFilter::Info);
    log::set_max_level(level);
}
