//! 单片段翻译调用
//!
//! 每次调用针对当前能力发起一次推理请求。传输失败时会话共享的失败计数加一，
//! 强制重新协商同一语言对后再次尝试；计数达到上限即返回重试预算耗尽。
//! 成功一次即把计数清零。

use crate::network::PipelineProvider;
use crate::translation::config::constants;
use crate::translation::core::session::CapabilitySession;
use crate::translation::error::{TranslationError, TranslationResult};

/// 翻译调用器
pub struct TranslationInvoker<'s, P> {
    session: &'s CapabilitySession<P>,
    max_retries: u32,
}

impl<'s, P: PipelineProvider> TranslationInvoker<'s, P> {
    pub fn new(session: &'s CapabilitySession<P>, max_retries: u32) -> Self {
        Self {
            session,
            max_retries,
        }
    }

    pub fn with_default_retries(session: &'s CapabilitySession<P>) -> Self {
        Self::new(session, constants::DEFAULT_MAX_RETRIES)
    }

    /// 翻译一段文本
    ///
    /// 可解码但缺少译文的响应立即返回 `MalformedResponse`，不计入失败计数。
    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> TranslationResult<String> {
        loop {
            let capability = self.session.capability_for(source, target)?;

            let error = match self.session.provider().translate(&capability, text).await {
                Ok(translated) => {
                    self.session.reset_retries();
                    return Ok(translated);
                }
                Err(e) if e.is_transient() => e,
                Err(e) => {
                    tracing::error!("翻译失败（不可重试）: {}", e);
                    return Err(e);
                }
            };

            let failures = self.session.retry_count();
            if failures >= self.max_retries {
                tracing::error!("连续 {} 次翻译请求失败，放弃: {}", failures + 1, error);
                return Err(TranslationError::RetryBudgetExhausted {
                    attempts: failures + 1,
                });
            }

            let failures = self.session.record_failure();
            tracing::warn!(
                "翻译请求失败（第 {}/{} 次重试），重新协商管道: {}",
                failures,
                self.max_retries,
                error
            );
            self.session.renegotiate(source, target).await?;
        }
    }
}
