//! # 网络模块
//!
//! 翻译服务提供方的抽象与 ULCA 管道服务的 HTTP 实现：
//!
//! - `PipelineProvider` - 管道协商与推理调用的接口
//! - `ulca` - 基于 reqwest 的 ULCA/Bhashini 客户端
//! - `wire` - 请求与响应的 JSON 结构

pub mod ulca;
pub mod wire;

use crate::translation::core::session::Capability;
use crate::translation::error::TranslationResult;

pub use ulca::UlcaProvider;

/// 翻译服务提供方
///
/// 实现者的错误约定：
/// - `negotiate` 的任何失败都会被会话视为致命的协商错误；
/// - `translate` 的网络层失败返回 `TranslationError::Transport`（可重试），
///   可解码但缺少译文的响应返回 `TranslationError::MalformedResponse`（致命）。
#[allow(async_fn_in_trait)]
pub trait PipelineProvider {
    /// 为语言对协商翻译能力
    async fn negotiate(&self, source: &str, target: &str) -> TranslationResult<Capability>;

    /// 使用给定能力翻译一段文本
    async fn translate(&self, capability: &Capability, text: &str) -> TranslationResult<String>;
}
