//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 翻译器配置
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TranslatorConfig {
    // 凭据
    pub api_key: String,
    pub user_id: String,

    // 管道协商
    pub discovery_url: String,
    pub pipeline_id: String,

    // 重试与并发
    pub max_retries: u32,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: Option<usize>,

    // 文本收集
    pub ignored_elements: Vec<String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            user_id: String::new(),

            discovery_url: constants::DEFAULT_DISCOVERY_URL.to_string(),
            pipeline_id: constants::DEFAULT_PIPELINE_ID.to_string(),

            max_retries: constants::DEFAULT_MAX_RETRIES,
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            max_concurrent_requests: None,

            ignored_elements: constants::IGNORED_ELEMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl TranslatorConfig {
    /// 使用给定凭据创建默认配置
    pub fn with_credentials(api_key: &str, user_id: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            user_id: user_id.to_string(),
            ..Self::default()
        }
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.api_key.trim().is_empty() || self.user_id.trim().is_empty() {
            return Err(TranslationError::Config("缺少 API key 或 user id".to_string()));
        }

        if url::Url::parse(&self.discovery_url).is_err() {
            return Err(TranslationError::Config(format!(
                "管道发现地址无效: {}",
                self.discovery_url
            )));
        }

        if self.pipeline_id.trim().is_empty() {
            return Err(TranslationError::Config("管道标识不能为空".to_string()));
        }

        if self.request_timeout_secs == 0 {
            return Err(TranslationError::Config("请求超时必须大于0".to_string()));
        }

        if self.max_concurrent_requests == Some(0) {
            return Err(TranslationError::Config("最大并发数不能为0".to_string()));
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) -> TranslationResult<()> {
        use crate::env::{credentials, translation, EnvVar};

        if let Some(api_key) = credentials::ApiKey::get_if_set()? {
            self.api_key = api_key;
        }

        if let Some(user_id) = credentials::UserId::get_if_set()? {
            self.user_id = user_id;
        }

        if let Some(url) = translation::DiscoveryUrl::get_if_set()? {
            tracing::info!("环境变量覆盖管道发现地址: {}", url);
            self.discovery_url = url;
        }

        if let Some(pipeline_id) = translation::PipelineId::get_if_set()? {
            self.pipeline_id = pipeline_id;
        }

        if let Some(max_retries) = translation::MaxRetries::get_if_set()? {
            self.max_retries = max_retries;
        }

        if let Some(timeout) = translation::RequestTimeout::get_if_set()? {
            self.request_timeout_secs = timeout.as_secs();
        }

        if let Some(max_concurrent) = translation::MaxConcurrentRequests::get_if_set()? {
            self.max_concurrent_requests = Some(max_concurrent);
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 简化的配置管理器
pub struct ConfigManager {
    config: TranslatorConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器
    ///
    /// 优先使用显式给出的配置文件，否则按 `CONFIG_PATHS` 顺序查找；
    /// 随后应用 `.env` 与环境变量覆盖并验证。
    pub fn new(explicit_path: Option<&Path>) -> TranslationResult<Self> {
        Self::load_dotenv();

        let mut config = match explicit_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_config()?,
        };
        config.apply_env_overrides()?;
        config.validate()?;

        Ok(Self { config })
    }

    pub fn into_config(self) -> TranslatorConfig {
        self.config
    }

    /// 从默认搜索路径加载配置
    fn load_config() -> TranslationResult<TranslatorConfig> {
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            let candidate = Path::new(expanded_path.as_ref());
            if candidate.exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(candidate);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(TranslatorConfig::default())
    }

    /// 从指定文件加载配置
    pub fn load_from_file(path: &Path) -> TranslationResult<TranslatorConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TranslationError::Config(format!("读取配置文件 {} 失败: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &Path) -> TranslationResult<()> {
        let config = TranslatorConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::Config(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::Config(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
