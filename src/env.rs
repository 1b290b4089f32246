//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，用于覆盖配置文件中的设置

use std::env;
use std::fmt;
use std::time::Duration;

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

    /// 仅当变量被显式设置时返回值，解析失败时返回错误
    fn get_if_set() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "PAGE_TRANSLATOR_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
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
}

/// 凭据相关环境变量
pub mod credentials {
    use super::*;

    /// ULCA API key
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "PAGE_TRANSLATOR_API_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str =
            "API key sent as the ulcaApiKey header during negotiation";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }

    /// ULCA user id
    pub struct UserId;
    impl EnvVar<String> for UserId {
        const NAME: &'static str = "PAGE_TRANSLATOR_USER_ID";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "User id sent as the userID header during negotiation";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 管道发现地址
    pub struct DiscoveryUrl;
    impl EnvVar<String> for DiscoveryUrl {
        const NAME: &'static str = "PAGE_TRANSLATOR_DISCOVERY_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Pipeline discovery endpoint URL";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Discovery URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 管道标识
    pub struct PipelineId;
    impl EnvVar<String> for PipelineId {
        const NAME: &'static str = "PAGE_TRANSLATOR_PIPELINE_ID";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Pipeline identifier sent with every negotiation";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }

    /// 最大重试次数
    pub struct MaxRetries;
    impl EnvVar<u32> for MaxRetries {
        const NAME: &'static str = "PAGE_TRANSLATOR_MAX_RETRIES";
        const DEFAULT: Option<u32> = Some(10);
        const DESCRIPTION: &'static str =
            "Transient failures tolerated per session before a translation fails";

        fn parse(value: &str) -> EnvResult<u32> {
            parse_positive_usize(value, Self::NAME, 0, 100).map(|n| n as u32)
        }
    }

    /// 最大并发请求数
    pub struct MaxConcurrentRequests;
    impl EnvVar<usize> for MaxConcurrentRequests {
        const NAME: &'static str = "PAGE_TRANSLATOR_MAX_CONCURRENT_REQUESTS";
        const DEFAULT: Option<usize> = None;
        const DESCRIPTION: &'static str =
            "Upper bound on in-flight translation requests (unbounded when unset)";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 1000)
        }
    }

    /// 请求超时
    pub struct RequestTimeout;
    impl EnvVar<Duration> for RequestTimeout {
        const NAME: &'static str = "PAGE_TRANSLATOR_REQUEST_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(30));
        const DESCRIPTION: &'static str = "HTTP request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds = parse_positive_usize(value, Self::NAME, 1, 300)?;
            Ok(Duration::from_secs(seconds as u64))
        }
    }
}

fn parse_non_empty(value: &str, var_name: &str) -> EnvResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Value cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
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

/// 生成环境变量文档
pub fn generate_env_docs() -> String {
    let rows: [(&str, &str); 9] = [
        (core::LogLevel::NAME, core::LogLevel::DESCRIPTION),
        (credentials::ApiKey::NAME, credentials::ApiKey::DESCRIPTION),
        (credentials::UserId::NAME, credentials::UserId::DESCRIPTION),
        (translation::DiscoveryUrl::NAME, translation::DiscoveryUrl::DESCRIPTION),
        (translation::PipelineId::NAME, translation::PipelineId::DESCRIPTION),
        (translation::MaxRetries::NAME, translation::MaxRetries::DESCRIPTION),
        (
            translation::MaxConcurrentRequests::NAME,
            translation::MaxConcurrentRequests::DESCRIPTION,
        ),
        (translation::RequestTimeout::NAME, translation::RequestTimeout::DESCRIPTION),
        ("RUST_LOG", "Overrides the log filter when set"),
    ];

    let mut docs = String::from("Environment variables:\n\n");
    for (name, description) in rows {
        docs.push_str(&format!("  {:<42} {}\n", name, description));
    }
    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_is_normalized() {
        assert_eq!(core::LogLevel::parse("DEBUG").unwrap(), "debug");
        assert!(core::LogLevel::parse("verbose").is_err());
    }

    #[test]
    fn credentials_reject_blank_values() {
        assert!(credentials::ApiKey::parse("   ").is_err());
        assert_eq!(credentials::UserId::parse(" abc ").unwrap(), "abc");
    }

    #[test]
    fn discovery_url_requires_scheme() {
        assert!(translation::DiscoveryUrl::parse("example.org/pipeline").is_err());
        assert!(translation::DiscoveryUrl::parse("https://example.org/pipeline").is_ok());
    }

    #[test]
    fn numeric_limits_are_enforced() {
        assert_eq!(translation::MaxRetries::parse("0").unwrap(), 0);
        assert!(translation::MaxRetries::parse("101").is_err());
        assert!(translation::MaxConcurrentRequests::parse("0").is_err());
        assert_eq!(
            translation::RequestTimeout::parse("5").unwrap(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn docs_list_every_variable() {
        let docs = generate_env_docs();
        assert!(docs.contains("PAGE_TRANSLATOR_API_KEY"));
        assert!(docs.contains("PAGE_TRANSLATOR_MAX_CONCURRENT_REQUESTS"));
    }
}
