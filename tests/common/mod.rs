// 集成测试公共模块
//
// 提供脚本化的翻译服务提供方与 DOM 辅助函数

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use markup5ever_rcdom::Handle;

use page_translator::html::{find_nodes, get_text_content, markup_to_body};
use page_translator::translation::{
    Capability, TranslationError, TranslationResult, TranslatorConfig,
};
use page_translator::PipelineProvider;

/// 一次推理调用的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateCall {
    pub text: String,
    pub source: String,
    pub target: String,
    pub service_id: String,
}

/// 脚本化的服务提供方
#[derive(Default)]
pub struct StubProvider {
    translations: HashMap<String, String>,
    malformed_texts: HashSet<String>,
    always_failing_texts: HashSet<String>,
    transient_failures: Cell<u32>,
    fail_negotiation: Cell<bool>,
    in_flight: Cell<usize>,
    pub max_in_flight: Cell<usize>,
    pub negotiations: RefCell<Vec<(String, String)>>,
    pub calls: RefCell<Vec<TranslateCall>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, text: &str, translated: &str) -> Self {
        self.translations.insert(text.to_string(), translated.to_string());
        self
    }

    /// 该文本的响应缺少译文字段
    pub fn with_malformed(mut self, text: &str) -> Self {
        self.malformed_texts.insert(text.to_string());
        self
    }

    /// 该文本的每次请求都是传输失败
    pub fn with_always_failing(mut self, text: &str) -> Self {
        self.always_failing_texts.insert(text.to_string());
        self
    }

    /// 接下来 `count` 次推理请求为传输失败
    pub fn with_transient_failures(self, count: u32) -> Self {
        self.transient_failures.set(count);
        self
    }

    pub fn set_transient_failures(&self, count: u32) {
        self.transient_failures.set(count);
    }

    pub fn set_fail_negotiation(&self, fail: bool) {
        self.fail_negotiation.set(fail);
    }

    pub fn negotiation_count(&self) -> usize {
        self.negotiations.borrow().len()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn calls_for(&self, text: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.text == text).count()
    }
}

impl PipelineProvider for StubProvider {
    async fn negotiate(&self, source: &str, target: &str) -> TranslationResult<Capability> {
        self.negotiations
            .borrow_mut()
            .push((source.to_string(), target.to_string()));

        if self.fail_negotiation.get() {
            return Err(TranslationError::Negotiation("discovery unavailable".to_string()));
        }

        Ok(Capability {
            source_language: source.to_string(),
            target_language: target.to_string(),
            callback_url: "http://stub.invalid/compute".to_string(),
            inference_api_key: "stub-key".to_string(),
            service_id: format!("svc-{}-{}-{}", source, target, self.negotiation_count()),
        })
    }

    async fn translate(&self, capability: &Capability, text: &str) -> TranslationResult<String> {
        self.calls.borrow_mut().push(TranslateCall {
            text: text.to_string(),
            source: capability.source_language.clone(),
            target: capability.target_language.clone(),
            service_id: capability.service_id.clone(),
        });

        self.in_flight.set(self.in_flight.get() + 1);
        self.max_in_flight
            .set(self.max_in_flight.get().max(self.in_flight.get()));
        tokio::task::yield_now().await;
        self.in_flight.set(self.in_flight.get() - 1);

        if self.always_failing_texts.contains(text) {
            return Err(TranslationError::Transport("connection reset".to_string()));
        }

        if self.transient_failures.get() > 0 {
            self.transient_failures.set(self.transient_failures.get() - 1);
            return Err(TranslationError::Transport("connection reset".to_string()));
        }

        if self.malformed_texts.contains(text) {
            return Err(TranslationError::MalformedResponse(
                "missing pipelineResponse[0].output[0].target".to_string(),
            ));
        }

        Ok(self
            .translations
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("{}:{}", capability.target_language, text)))
    }
}

/// 测试用配置（凭据不会被 StubProvider 使用）
pub fn test_config() -> TranslatorConfig {
    TranslatorConfig::with_credentials("test-key", "test-user")
}

/// 解析标记并返回 body
pub fn body_of(markup: &str) -> Handle {
    markup_to_body(markup).expect("parser always synthesizes <body>")
}

/// 指定标签的所有元素的文本内容
pub fn texts_of(root: &Handle, tag: &str) -> Vec<String> {
    find_nodes(root, tag).iter().map(get_text_content).collect()
}
