//! ipfinder 主程序
//!
//! 加载配置，初始化日志，然后通过 Enhanced IP Finder 扩展执行一次收集并打印结果

mod cli;
mod observability;

use clap::Parser;
use ipfinder::error::{Error, Result};
use ipfinder::{HostEnvironment, IpFinderConfig, IpFinderExtension};
use ipfinder_common::ConfigError;
use observability::init_observability;
use std::path::{Path, PathBuf};
use tracing::{error, info};

// 标准输出只留给报告结果
macro_rules! bootstrap_info {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

macro_rules! bootstrap_error {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

use cli::{Cli, Commands};

const DEFAULT_CONFIG: &str = "ipfinder.toml";
const SYSTEM_CONFIG: &str = "/etc/ipfinder/config.toml";

/// Application launcher utilities
struct ApplicationLauncher;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Test { config_file } => {
            let config_path = ApplicationLauncher::find_config_file(
                config_file.as_ref().unwrap_or(&cli.config),
            )?
            .ok_or_else(|| {
                bootstrap_error!("No configuration file found!");
                Error::custom("No configuration file found. Please create one or specify a path")
            })?;
            ApplicationLauncher::test_config_file(&config_path)
        }
        command => {
            let config = ApplicationLauncher::load_config(&cli.config)?;

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;

            runtime.block_on(ApplicationLauncher::run_application(
                config,
                cli.timeout,
                command,
            ))
        }
    }
}

impl ApplicationLauncher {
    /// Find config file with fallback locations
    ///
    /// An explicit path must exist; the default name falls back to the system
    /// location and finally to `None` (built-in defaults).
    fn find_config_file(provided_path: &PathBuf) -> Result<Option<PathBuf>> {
        if provided_path != Path::new(DEFAULT_CONFIG) {
            if provided_path.exists() {
                bootstrap_info!("Using provided config file: {:?}", provided_path);
                return Ok(Some(provided_path.clone()));
            }
            bootstrap_error!("Provided config file not found: {:?}", provided_path);
            return Err(Error::custom(format!(
                "Config file not found: {provided_path:?}"
            )));
        }

        let fallback_paths = [PathBuf::from(DEFAULT_CONFIG), PathBuf::from(SYSTEM_CONFIG)];
        for path in &fallback_paths {
            if path.exists() {
                return Ok(Some(path.clone()));
            }
        }

        Ok(None)
    }

    fn load_config(provided_path: &PathBuf) -> Result<IpFinderConfig> {
        let Some(config_path) = Self::find_config_file(provided_path)? else {
            return Ok(IpFinderConfig::default());
        };

        let config = IpFinderConfig::from_file(&config_path).map_err(|e| {
            bootstrap_error!("❌ 配置加载失败: {}", e);
            e
        })?;

        if let Err(errors) = config.validate() {
            for (i, err) in errors.iter().enumerate() {
                bootstrap_error!("  {}. {}", i + 1, err);
            }
            if IpFinderConfig::has_critical_errors(&errors) {
                return Err(ConfigError::Validation(errors).into());
            }
        }

        Ok(config)
    }

    /// 测试配置文件是否有效
    fn test_config_file(config_path: &Path) -> Result<()> {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();

        let config = IpFinderConfig::from_file(config_path).map_err(|e| {
            error!("❌ 配置文件解析失败: {}", e);
            Error::validation(format!("配置解析失败: {e}"))
        })?;
        info!("✅ 配置文件解析成功: {:?}", config_path);

        match config.validate() {
            Ok(()) => info!("✅ 配置验证通过"),
            Err(errors) => {
                for (i, err) in errors.iter().enumerate() {
                    if err.starts_with("Warning:") {
                        info!("  {}. ⚠️  {}", i + 1, err);
                    } else {
                        error!("  {}. ❌ {}", i + 1, err);
                    }
                }
                if IpFinderConfig::has_critical_errors(&errors) {
                    return Err(Error::validation("配置验证失败"));
                }
            }
        }

        Ok(())
    }

    /// 运行一次报告命令
    async fn run_application(
        config: IpFinderConfig,
        timeout: Option<f64>,
        command: &Commands,
    ) -> Result<()> {
        let _observability_guard = init_observability(config.observability_config())?;

        let extension =
            IpFinderExtension::with_webrtc(HostEnvironment::unsandboxed(), &config.gather)?;
        if let Some(secs) = timeout {
            extension.set_timeout_limit(secs);
        }

        let output = match command {
            Commands::All => extension.get_all_ip_addresses().await?,
            Commands::Ipv4 => extension.get_ipv4_addresses().await?,
            Commands::Ipv6 => extension.get_ipv6_addresses().await?,
            Commands::Ports => extension.get_ports().await?,
            Commands::Other => extension.get_other_candidates().await?,
            Commands::Report { json: true } => {
                serde_json::to_string_pretty(&extension.report().await?)?
            }
            Commands::Report { json: false } => {
                let report = extension.report().await?;
                format!(
                    "IPv4: {}\nIPv6: {}\nPorts: {}\nOther: {}",
                    report.ipv4_joined(),
                    report.ipv6_joined(),
                    report.ports_joined(),
                    report.others_joined()
                )
            }
            Commands::Test { .. } => unreachable!("handled before the runtime starts"),
        };

        println!("{output}");
        Ok(())
    }
}
