//! 页面翻译服务
//!
//! 一次翻译过程（pass）：
//!
//! 1. 确保会话持有请求语言对的翻译能力；
//! 2. 收集翻译单元，相同文本只翻译一次；
//! 3. 为每个唯一文本并发发起一次翻译调用，结果到达后同步写入该文本的全部节点；
//! 4. 等待所有调用结束。任何片段致命失败都会使整个过程失败，已写入的节点不回滚。

use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{self, StreamExt};
use markup5ever_rcdom::{Handle, RcDom};

use crate::network::{PipelineProvider, UlcaProvider};
use crate::parsers::html::{markup_to_body, set_text_content};
use crate::translation::config::TranslatorConfig;
use crate::translation::core::invoker::TranslationInvoker;
use crate::translation::core::session::CapabilitySession;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::pipeline::collector::TextCollector;

/// 页面翻译器
///
/// 一个实例只持有一个语言对的能力；需要同时翻译不同语言对时应使用不同实例。
pub struct PageTranslator<P = UlcaProvider> {
    session: CapabilitySession<P>,
    ignored_elements: Vec<String>,
    max_retries: u32,
    max_concurrent_requests: Option<usize>,
    stats: ServiceStats,
}

impl PageTranslator<UlcaProvider> {
    /// 使用 ULCA 服务创建翻译器；配置无效时立即返回配置错误
    pub fn new(config: TranslatorConfig) -> TranslationResult<Self> {
        config.validate()?;
        let provider = UlcaProvider::new(&config)?;
        Ok(Self::with_provider(provider, &config))
    }
}

impl<P: PipelineProvider> PageTranslator<P> {
    /// 使用任意服务提供方创建翻译器
    pub fn with_provider(provider: P, config: &TranslatorConfig) -> Self {
        Self {
            session: CapabilitySession::new(provider),
            ignored_elements: config.ignored_elements.clone(),
            max_retries: config.max_retries,
            max_concurrent_requests: config.max_concurrent_requests,
            stats: ServiceStats::default(),
        }
    }

    /// 原地翻译一棵子树，返回同一个根节点
    pub async fn translate_dom(
        &self,
        root: Handle,
        source: &str,
        target: &str,
    ) -> TranslationResult<Handle> {
        self.session.ensure_capability(source, target).await?;

        let mut collector = TextCollector::new(&self.ignored_elements);
        let units = collector.collect_translation_units(&root);
        self.stats.inc_passes();
        self.stats.add_units_collected(units.len());

        if units.is_empty() {
            tracing::info!("没有可翻译的文本，跳过");
            return Ok(root);
        }

        tracing::info!(
            "开始翻译 {} 个唯一文本（{} 个节点）: {} -> {}",
            units.len(),
            collector.get_stats().text_nodes_found - collector.get_stats().blank_texts,
            source,
            target
        );

        let invoker = TranslationInvoker::new(&self.session, self.max_retries);
        let limit = self.max_concurrent_requests.unwrap_or(units.len()).max(1);

        let tasks = units.into_iter().map(|(text, nodes)| {
            let invoker = &invoker;
            async move {
                let translated = invoker.translate(&text, source, target).await;
                match translated {
                    Ok(translated) => {
                        let written = nodes
                            .iter()
                            .filter(|node| set_text_content(node, &translated))
                            .count();
                        tracing::debug!("已写入 {} 个节点: {:?}", written, text);
                        Ok(written)
                    }
                    Err(e) => {
                        tracing::error!("片段翻译失败 {:?}: {}", text, e);
                        Err(e)
                    }
                }
            }
        });

        // 不提前取消：所有已发起的调用都会运行到结束
        let results: Vec<TranslationResult<usize>> = stream::iter(tasks)
            .buffer_unordered(limit)
            .collect()
            .await;

        let mut first_error: Option<TranslationError> = None;
        let mut failed = 0;
        for result in results {
            match result {
                Ok(written) => self.stats.add_nodes_written(written),
                Err(e) => {
                    failed += 1;
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => {
                self.stats.add_fragments_failed(failed);
                tracing::error!("翻译过程失败: {} 个片段失败，已写入的节点保持不变", failed);
                Err(e)
            }
            None => {
                tracing::info!("翻译完成: {} -> {}", source, target);
                Ok(root)
            }
        }
    }

    /// 翻译整个文档
    pub async fn translate_document(
        &self,
        dom: RcDom,
        source: &str,
        target: &str,
    ) -> TranslationResult<RcDom> {
        self.translate_dom(dom.document.clone(), source, target).await?;
        Ok(dom)
    }

    /// 解析标记字符串并翻译其 `<body>`，返回翻译后的 body 节点
    pub async fn translate_html_string(
        &self,
        html: &str,
        source: &str,
        target: &str,
    ) -> TranslationResult<Handle> {
        let body = markup_to_body(html)
            .ok_or_else(|| TranslationError::Parse("无法从标记中得到 <body>".to_string()))?;
        self.translate_dom(body, source, target).await
    }

    pub fn session(&self) -> &CapabilitySession<P> {
        &self.session
    }

    /// 获取统计信息
    pub fn get_stats(&self) -> &ServiceStats {
        &self.stats
    }
}

/// 服务统计（跨多次翻译过程累计）
#[derive(Debug, Default)]
pub struct ServiceStats {
    pub passes: AtomicUsize,
    pub units_collected: AtomicUsize,
    pub nodes_written: AtomicUsize,
    pub fragments_failed: AtomicUsize,
}

impl ServiceStats {
    pub fn inc_passes(&self) {
        self.passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_units_collected(&self, count: usize) {
        self.units_collected.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_nodes_written(&self, count: usize) {
        self.nodes_written.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_fragments_failed(&self, count: usize) {
        self.fragments_failed.fetch_add(count, Ordering::Relaxed);
    }

    /// 获取快照
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            passes: self.passes.load(Ordering::Relaxed),
            units_collected: self.units_collected.load(Ordering::Relaxed),
            nodes_written: self.nodes_written.load(Ordering::Relaxed),
            fragments_failed: self.fragments_failed.load(Ordering::Relaxed),
        }
    }
}

/// 统计快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub passes: usize,
    pub units_collected: usize,
    pub nodes_written: usize,
    pub fragments_failed: usize,
}
