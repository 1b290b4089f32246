//! 翻译系统核心模块
//!
//! ## 模块依赖关系
//!
//! ```text
//! PageTranslator (service.rs)
//!     ├── TextCollector (pipeline/collector.rs)
//!     └── TranslationInvoker (invoker.rs)
//!             └── CapabilitySession (session.rs)
//!                     └── PipelineProvider (network)
//! ```

pub mod invoker;
pub mod service;
pub mod session;

pub use invoker::TranslationInvoker;
pub use service::{PageTranslator, ServiceStats, StatsSnapshot};
pub use session::{Capability, CapabilitySession};
