//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持配置文件、环境变量和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, TranslatorConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // ULCA 管道发现接口
    pub const DEFAULT_DISCOVERY_URL: &str =
        "https://meity-auth.ulcacontrib.org/ulca/apis/v0/model/getModelsPipeline";
    pub const DEFAULT_PIPELINE_ID: &str = "64392f96daac500b55c543cd";
    pub const TRANSLATION_TASK_TYPE: &str = "translation";

    // 重试与超时
    pub const DEFAULT_MAX_RETRIES: u32 = 10;
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    // 整棵子树都不参与翻译的元素
    pub const IGNORED_ELEMENTS: &[&str] = &["script", "style"];

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "page-translator.toml",
        ".page-translator.toml",
        "~/.config/page-translator/config.toml",
        "/etc/page-translator/config.toml",
    ];
}
