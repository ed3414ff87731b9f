//! 统一的环境变量管理
//!
//! 只有命令行入口读取环境变量，库函数全部通过显式参数配置。

use std::env;
use std::fmt;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 日志与终端输出相关环境变量
pub mod output {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "REPORT_LOCALIZER_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                level @ ("trace" | "debug" | "info" | "warn" | "error") => Ok(level.to_string()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何非空值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// 性能相关环境变量
pub mod performance {
    use super::*;

    /// 回填工作线程数
    pub struct WorkerThreads;
    impl EnvVar<usize> for WorkerThreads {
        const NAME: &'static str = "REPORT_LOCALIZER_WORKERS";
        const DEFAULT: Option<usize> = None; // 使用 rayon 默认
        const DESCRIPTION: &'static str =
            "Number of parallel reinjection workers (default: CPU cores)";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 128)
        }
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 命令行帮助中的环境变量说明，每个变量一行
pub fn describe_variables() -> String {
    [
        (output::LogLevel::NAME, output::LogLevel::DESCRIPTION),
        (output::NoColor::NAME, output::NoColor::DESCRIPTION),
        (
            performance::WorkerThreads::NAME,
            performance::WorkerThreads::DESCRIPTION,
        ),
    ]
    .iter()
    .map(|(name, description)| format!("  {name:<28} {description}"))
    .collect::<Vec<_>>()
    .join("\n")
}

/// 环境变量配置汇总
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub log_level: String,
    pub no_color: bool,
    pub worker_threads: Option<usize>,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        let worker_threads = match env::var(performance::WorkerThreads::NAME) {
            Ok(value) => Some(performance::WorkerThreads::parse(&value)?),
            Err(_) => None,
        };

        Ok(Self {
            log_level: output::LogLevel::get()?,
            no_color: output::NoColor::get_or_default(false),
            worker_threads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(output::LogLevel::parse("DEBUG").unwrap(), "debug");
        assert_eq!(output::LogLevel::parse(" warn ").unwrap(), "warn");
        assert!(output::LogLevel::parse("loud").is_err());
    }

    #[test]
    fn test_no_color_parsing() {
        assert!(output::NoColor::parse("1").unwrap());
        assert!(!output::NoColor::parse("").unwrap());
    }

    #[test]
    fn test_worker_validation() {
        assert_eq!(performance::WorkerThreads::parse("4").unwrap(), 4);
        assert!(performance::WorkerThreads::parse("0").is_err());
        assert!(performance::WorkerThreads::parse("500").is_err());
        assert!(performance::WorkerThreads::parse("many").is_err());
    }

    #[test]
    fn test_describe_variables() {
        let help = describe_variables();

        assert_eq!(help.lines().count(), 3);
        assert!(help.contains("REPORT_LOCALIZER_LOG_LEVEL"));
        assert!(help.contains("Number of parallel reinjection workers"));
    }

    #[test]
    fn test_env_config_loading() {
        env::set_var("REPORT_LOCALIZER_WORKERS", "3");

        let config = EnvConfig::from_env().unwrap();
        assert_eq!(config.worker_threads, Some(3));

        env::remove_var("REPORT_LOCALIZER_WORKERS");
    }
}
