//! 翻译功能模块
//!
//! 从 HTML 文档树中提取可翻译文本，按文本去重后通过协商得到的翻译管道逐条翻译，
//! 并把译文写回所有原始节点。
//!
//! ## 模块组织
//!
//! - `config` - 配置与常量
//! - `error` - 错误类型
//! - `pipeline` - 文本收集与去重
//! - `core` - 能力会话、翻译调用与整页编排
//!
//! ## 使用示例
//!
//! ```no_run
//! use page_translator::translation::{PageTranslator, TranslatorConfig};
//!
//! # async fn demo() -> Result<(), page_translator::translation::TranslationError> {
//! let translator = PageTranslator::new(TranslatorConfig::with_credentials("api-key", "user-id"))?;
//! let body = translator
//!     .translate_html_string("<p>Hello</p>", "en", "hi")
//!     .await?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;

pub use self::config::{ConfigManager, TranslatorConfig};
pub use self::core::{Capability, CapabilitySession, PageTranslator, TranslationInvoker};
pub use error::{TranslationError, TranslationResult};
pub use pipeline::{collect_translation_units, TranslationUnitMap};
