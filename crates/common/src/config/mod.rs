//! 统一配置管理
//!
//! ipfinder 的全部配置项（收集参数与日志）都在这里定义，
//! 配置文件使用 TOML 格式。

pub mod gather;
pub mod tracing;

pub use crate::config::gather::{ConcurrencyPolicy, GatherConfig, IpMatching, TimeoutLimit};
pub use crate::config::tracing::{LogConfig, ObservabilityConfig};

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// ipfinder 的主配置结构体
///
/// 所有配置段都有默认值，空文件即是合法配置。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpFinderConfig {
    /// 候选收集参数
    #[serde(default)]
    pub gather: GatherConfig,

    /// 日志配置
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl IpFinderConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(ConfigError::FileNotFound {
                path: path_ref.display().to_string(),
            });
        }

        if !path_ref.is_file() {
            return Err(ConfigError::NotAFile {
                path: path_ref.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path_ref)?;
        Self::from_toml(&content)
    }

    /// 从 TOML 字符串加载配置
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 将配置序列化为 TOML 字符串
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn observability_config(&self) -> &ObservabilityConfig {
        &self.observability
    }

    /// 验证配置有效性
    ///
    /// 以 "Warning:" 开头的条目不影响启动。
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = self.gather.validate();
        errors.extend(self.observability.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// 验证结果中是否存在非警告错误
    pub fn has_critical_errors(errors: &[String]) -> bool {
        errors.iter().any(|e| !e.starts_with("Warning:"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        let config = IpFinderConfig::from_toml("").unwrap();
        assert_eq!(config, IpFinderConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
            [gather]
            timeout_secs = 3
            concurrency = "reject"

            [observability]
            filter_level = "debug"

            [observability.log]
            output = "file"
            rotate = true
            path = "/tmp/ipfinder-logs"
        "#;
        let config = IpFinderConfig::from_toml(toml).unwrap();
        assert_eq!(config.gather.timeout_limit().as_secs_f64(), 3.0);
        assert_eq!(config.gather.concurrency, ConcurrencyPolicy::Reject);
        assert!(!config.observability.is_console_logging());
        assert!(config.observability.log.rotate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip_preserves_values() {
        let mut config = IpFinderConfig::default();
        config.gather.timeout_secs = 7.0;
        config.gather.ip_matching = IpMatching::Strict;
        let text = config.to_toml().unwrap();
        assert_eq!(IpFinderConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_validation_separates_warnings() {
        let mut config = IpFinderConfig::default();
        config.gather.timeout_secs = 0.0;
        let errors = config.validate().unwrap_err();
        assert!(!IpFinderConfig::has_critical_errors(&errors));

        config.observability.log.output = "syslog".to_string();
        let errors = config.validate().unwrap_err();
        assert!(IpFinderConfig::has_critical_errors(&errors));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gather]\ntimeout_secs = 2").unwrap();
        let config = IpFinderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.gather.timeout_limit().as_secs_f64(), 2.0);
    }

    #[test]
    fn test_from_file_errors() {
        let err = IpFinderConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.is_not_found());

        let dir = tempfile::tempdir().unwrap();
        let err = IpFinderConfig::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotAFile { .. }));

        let err = IpFinderConfig::from_toml("[gather\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
