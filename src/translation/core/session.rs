//! 翻译能力会话
//!
//! 会话在任意时刻最多持有一个语言对的翻译能力（回调地址、推理密钥、服务标识）。
//! 语言对变化或尚无能力时才重新协商；翻译失败后由调用方强制重新协商。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::network::PipelineProvider;
use crate::translation::error::{TranslationError, TranslationResult};

/// 协商得到的翻译能力，仅对协商时的语言对有效
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub source_language: String,
    pub target_language: String,
    pub callback_url: String,
    pub inference_api_key: String,
    pub service_id: String,
}

impl Capability {
    /// 是否适用于给定语言对
    pub fn matches(&self, source: &str, target: &str) -> bool {
        self.source_language == source && self.target_language == target
    }
}

/// 翻译能力会话
///
/// 会话状态只在单个任务内被并发的 future 共享，因此使用 `Cell`/`RefCell`，
/// 且任何借用都不会跨越 `.await`。
pub struct CapabilitySession<P> {
    provider: P,
    capability: RefCell<Option<Rc<Capability>>>,
    retries: Cell<u32>,
    negotiations: Cell<usize>,
}

impl<P: PipelineProvider> CapabilitySession<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            capability: RefCell::new(None),
            retries: Cell::new(0),
            negotiations: Cell::new(0),
        }
    }

    /// 确保持有给定语言对的能力；已持有时不发起任何请求
    pub async fn ensure_capability(
        &self,
        source: &str,
        target: &str,
    ) -> TranslationResult<Rc<Capability>> {
        if let Some(capability) = self.current() {
            if capability.matches(source, target) {
                return Ok(capability);
            }
            tracing::info!(
                "语言对变更 {}->{} => {}->{}，重新协商",
                capability.source_language,
                capability.target_language,
                source,
                target
            );
        }

        self.renegotiate(source, target).await
    }

    /// 强制重新协商，即使当前能力的语言对相同也会被替换
    ///
    /// 协商失败时当前能力被丢弃，错误原样返回给调用方，不做重试。
    pub async fn renegotiate(
        &self,
        source: &str,
        target: &str,
    ) -> TranslationResult<Rc<Capability>> {
        self.negotiations.set(self.negotiations.get() + 1);
        tracing::info!("协商翻译管道: {} -> {}", source, target);

        match self.provider.negotiate(source, target).await {
            Ok(capability) if capability.matches(source, target) => {
                tracing::debug!("管道协商成功, serviceId={}", capability.service_id);
                let capability = Rc::new(capability);
                *self.capability.borrow_mut() = Some(Rc::clone(&capability));
                Ok(capability)
            }
            Ok(capability) => {
                self.capability.borrow_mut().take();
                Err(TranslationError::Negotiation(format!(
                    "请求 {}->{} 却得到 {}->{} 的能力",
                    source, target, capability.source_language, capability.target_language
                )))
            }
            Err(e) => {
                self.capability.borrow_mut().take();
                tracing::error!("管道协商失败: {}", e);
                Err(match e {
                    TranslationError::Negotiation(_) => e,
                    other => TranslationError::Negotiation(other.to_string()),
                })
            }
        }
    }

    /// 获取给定语言对的当前能力
    pub fn capability_for(&self, source: &str, target: &str) -> TranslationResult<Rc<Capability>> {
        match self.current() {
            Some(capability) if capability.matches(source, target) => Ok(capability),
            _ => Err(TranslationError::NoCapability),
        }
    }

    /// 当前持有的能力（不区分语言对）
    pub fn current(&self) -> Option<Rc<Capability>> {
        self.capability.borrow().clone()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// 会话共享的连续失败计数
    pub fn retry_count(&self) -> u32 {
        self.retries.get()
    }

    pub(crate) fn record_failure(&self) -> u32 {
        let count = self.retries.get() + 1;
        self.retries.set(count);
        count
    }

    pub(crate) fn reset_retries(&self) {
        self.retries.set(0);
    }

    /// 已发起的协商次数
    pub fn negotiation_count(&self) -> usize {
        self.negotiations.get()
    }
}
