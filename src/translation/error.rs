//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型，区分可重试的传输错误与致命错误

use thiserror::Error;

use crate::env::EnvError;

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// 配置错误（缺少凭据、无效参数等），在构造阶段立即返回
    #[error("配置错误: {0}")]
    Config(String),

    /// 管道协商失败：网络错误或响应结构无法解析，不会重试
    #[error("管道协商失败: {0}")]
    Negotiation(String),

    /// 翻译请求的传输层失败，可通过重新协商后重试
    #[error("网络错误: {0}")]
    Transport(String),

    /// 重试预算耗尽
    #[error("重试预算耗尽: 连续 {attempts} 次请求均未获得服务器响应")]
    RetryBudgetExhausted { attempts: u32 },

    /// 响应可以解码但缺少译文字段
    #[error("翻译响应格式错误: {0}")]
    MalformedResponse(String),

    /// 尚未协商任何管道能力就发起了翻译
    #[error("尚未协商翻译能力，无法发起翻译请求")]
    NoCapability,

    /// 解析错误（标记、配置文件等）
    #[error("解析错误: {0}")]
    Parse(String),
}

impl TranslationError {
    /// 是否属于可通过重新协商恢复的瞬时错误
    pub fn is_transient(&self) -> bool {
        matches!(self, TranslationError::Transport(_))
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::Config(_) => ErrorCategory::Configuration,
            TranslationError::Negotiation(_) => ErrorCategory::Negotiation,
            TranslationError::Transport(_) => ErrorCategory::Network,
            TranslationError::RetryBudgetExhausted { .. } => ErrorCategory::Network,
            TranslationError::MalformedResponse(_) => ErrorCategory::Service,
            TranslationError::NoCapability => ErrorCategory::Internal,
            TranslationError::Parse(_) => ErrorCategory::Parsing,
        }
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Negotiation,
    Network,
    Service,
    Parsing,
    Internal,
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        TranslationError::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::Parse(format!("JSON解析错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::Parse(format!("TOML解析错误: {}", error))
    }
}

impl From<EnvError> for TranslationError {
    fn from(error: EnvError) -> Self {
        TranslationError::Config(error.to_string())
    }
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::Parse(format!("IO错误: {}", error))
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_errors_are_transient() {
        assert!(TranslationError::Transport("reset".to_string()).is_transient());

        for error in [
            TranslationError::Config("x".to_string()),
            TranslationError::Negotiation("x".to_string()),
            TranslationError::RetryBudgetExhausted { attempts: 11 },
            TranslationError::MalformedResponse("x".to_string()),
            TranslationError::NoCapability,
            TranslationError::Parse("x".to_string()),
        ] {
            assert!(!error.is_transient(), "{:?} must be fatal", error);
        }
    }

    #[test]
    fn exhausted_budget_names_attempts() {
        let error = TranslationError::RetryBudgetExhausted { attempts: 11 };
        assert!(error.to_string().contains("11"));
        assert_eq!(error.category(), ErrorCategory::Network);
    }

    #[test]
    fn env_errors_become_config_errors() {
        let error: TranslationError = EnvError {
            variable: "PAGE_TRANSLATOR_MAX_RETRIES".to_string(),
            message: "not a number".to_string(),
        }
        .into();

        assert_eq!(error.category(), ErrorCategory::Configuration);
    }
}
