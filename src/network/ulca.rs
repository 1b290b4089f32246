//! ULCA 管道服务客户端
//!
//! 协商走管道发现接口（`ulcaApiKey` + `userID` 请求头），
//! 翻译走协商得到的回调地址（`Authorization` 为推理密钥）。

use reqwest::Client;
use url::Url;

use super::wire::{extract_target_text, InferenceRequest, NegotiationRequest, NegotiationResponse};
use super::PipelineProvider;
use crate::translation::config::TranslatorConfig;
use crate::translation::core::session::Capability;
use crate::translation::error::{TranslationError, TranslationResult};

/// 基于 reqwest 的 ULCA 服务提供方
#[derive(Debug, Clone)]
pub struct UlcaProvider {
    client: Client,
    api_key: String,
    user_id: String,
    discovery_url: String,
    pipeline_id: String,
}

impl UlcaProvider {
    /// 创建客户端；缺少凭据时立即返回配置错误
    pub fn new(config: &TranslatorConfig) -> TranslationResult<Self> {
        if config.api_key.trim().is_empty() || config.user_id.trim().is_empty() {
            return Err(TranslationError::Config("缺少 API key 或 user id".to_string()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TranslationError::Config(format!("创建 HTTP 客户端失败: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            user_id: config.user_id.clone(),
            discovery_url: config.discovery_url.clone(),
            pipeline_id: config.pipeline_id.clone(),
        })
    }

    fn parse_capability(
        response: NegotiationResponse,
        source: &str,
        target: &str,
    ) -> TranslationResult<Capability> {
        let service_id = response
            .service_id()
            .ok_or_else(|| {
                TranslationError::Negotiation(
                    "响应缺少 pipelineResponseConfig[0].config.serviceId".to_string(),
                )
            })?
            .to_string();

        let callback_url = response.inference_endpoint.callback_url;
        Url::parse(&callback_url).map_err(|e| {
            TranslationError::Negotiation(format!("回调地址无效 '{}': {}", callback_url, e))
        })?;

        Ok(Capability {
            source_language: source.to_string(),
            target_language: target.to_string(),
            callback_url,
            inference_api_key: response.inference_endpoint.inference_api_key.value,
            service_id,
        })
    }
}

impl PipelineProvider for UlcaProvider {
    async fn negotiate(&self, source: &str, target: &str) -> TranslationResult<Capability> {
        let request = NegotiationRequest::new(source, target, &self.pipeline_id);

        let response = self
            .client
            .post(&self.discovery_url)
            .header("ulcaApiKey", &self.api_key)
            .header("userID", &self.user_id)
            .json(&request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| TranslationError::Negotiation(e.to_string()))?;

        let body: NegotiationResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Negotiation(format!("无法解析协商响应: {}", e)))?;

        Self::parse_capability(body, source, target)
    }

    async fn translate(&self, capability: &Capability, text: &str) -> TranslationResult<String> {
        let request = InferenceRequest::new(
            &capability.source_language,
            &capability.target_language,
            &capability.service_id,
            text,
        );

        let response = self
            .client
            .post(&capability.callback_url)
            .header(reqwest::header::AUTHORIZATION, &capability.inference_api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Transport(format!(
                "推理接口返回状态码 {}",
                status
            )));
        }

        // 无法解码的响应体与网络失败同等对待
        let body = response.text().await?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| TranslationError::Transport(format!("推理响应不是有效的 JSON: {}", e)))?;

        extract_target_text(&value)
            .map(str::to_string)
            .ok_or_else(|| {
                TranslationError::MalformedResponse(
                    "响应缺少 pipelineResponse[0].output[0].target".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_fail_at_construction() {
        let err = UlcaProvider::new(&TranslatorConfig::default()).unwrap_err();
        assert!(matches!(err, TranslationError::Config(_)));

        let mut config = TranslatorConfig::with_credentials("key", "");
        assert!(UlcaProvider::new(&config).is_err());

        config.user_id = "user".to_string();
        assert!(UlcaProvider::new(&config).is_ok());
    }
}
