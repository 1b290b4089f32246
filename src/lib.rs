//! # Page Translator
//!
//! 将 HTML 文档中的文本通过管道协商式翻译服务翻译为目标语言，原地写回文档树。
//!
//! ## 模块组织
//!
//! - `parsers` - HTML 解析与序列化
//! - `network` - 翻译服务提供方接口与 ULCA 客户端
//! - `translation` - 文本收集、能力会话、重试与整页编排
//! - `env` - 类型安全的环境变量

pub mod env;
pub mod network;
pub mod parsers;
pub mod translation;

pub use parsers::html;

// Re-export commonly used items for convenience
pub use network::{PipelineProvider, UlcaProvider};
pub use translation::{
    Capability, CapabilitySession, ConfigManager, PageTranslator, TranslationError,
    TranslationResult, TranslatorConfig,
};
