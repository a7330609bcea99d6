//! 日志与过滤配置
//!
//! `[observability]` 配置段，供二进制程序初始化 tracing-subscriber 使用

use serde::{Deserialize, Serialize};

/// 可观测性配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// 过滤级别
    ///
    /// 支持 EnvFilter 语法（如 "info,webrtc=warn"）。默认值 "info"。
    /// 设置了 RUST_LOG 时以环境变量为准。
    #[serde(default = "default_filter_level")]
    pub filter_level: String,

    #[serde(default)]
    pub log: LogConfig,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志输出目标
    ///
    /// - "console": 仅输出到控制台（默认）
    /// - "file": 输出到文件
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 当 output = "file" 时有效：true 按天轮转，false 追加到单个文件
    #[serde(default)]
    pub rotate: bool,

    /// 日志文件目录
    #[serde(default = "default_log_path")]
    pub path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter_level: default_filter_level(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            output: default_log_output(),
            rotate: false,
            path: default_log_path(),
        }
    }
}

fn default_log_output() -> String {
    "console".to_string()
}

fn default_log_path() -> String {
    "logs/".to_string()
}

fn default_filter_level() -> String {
    "info".to_string()
}

impl ObservabilityConfig {
    pub fn is_console_logging(&self) -> bool {
        self.log.output == "console"
    }

    /// 获取过滤级别，优先使用 RUST_LOG
    pub fn effective_filter_level(&self) -> String {
        std::env::var("RUST_LOG")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.filter_level.clone())
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let main_level = self.filter_level.split(',').next().unwrap_or("").trim();
        if !["trace", "debug", "info", "warn", "error"].contains(&main_level) {
            errors.push(format!(
                "Invalid filter level '{}', must start with one of: trace, debug, info, warn, error",
                self.filter_level
            ));
        }

        if !["console", "file"].contains(&self.log.output.as_str()) {
            errors.push(format!(
                "Invalid log output '{}' (observability.log.output), must be 'console' or 'file'",
                self.log.output
            ));
        } else if self.log.output == "file" && self.log.path.trim().is_empty() {
            errors.push("Log path cannot be empty when observability.log.output = 'file'".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_observability_config() {
        let config = ObservabilityConfig::default();
        assert!(config.is_console_logging());
        assert_eq!(config.filter_level, "info");
        assert_eq!(config.log.path, "logs/");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_observability_validation() {
        let mut config = ObservabilityConfig::default();
        config.filter_level = "loud".to_string();
        config.log.output = "syslog".to_string();
        assert_eq!(config.validate().len(), 2);

        config.filter_level = "debug,webrtc=warn".to_string();
        config.log.output = "file".to_string();
        config.log.path = "  ".to_string();
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    #[serial]
    fn test_rust_log_takes_precedence() {
        let config = ObservabilityConfig::default();

        unsafe { std::env::set_var("RUST_LOG", "trace") };
        assert_eq!(config.effective_filter_level(), "trace");

        unsafe { std::env::set_var("RUST_LOG", "   ") };
        assert_eq!(config.effective_filter_level(), "info");

        unsafe { std::env::remove_var("RUST_LOG") };
        assert_eq!(config.effective_filter_level(), "info");
    }
}
