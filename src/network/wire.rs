//! ULCA 管道接口的 JSON 结构

use serde::{Deserialize, Serialize};

use crate::translation::config::constants::TRANSLATION_TASK_TYPE;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePair {
    pub source_language: String,
    pub target_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskConfig {
    pub language: LanguagePair,
    #[serde(rename = "serviceId", skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTask {
    pub task_type: String,
    pub config: TaskConfig,
}

impl PipelineTask {
    pub fn translation(source: &str, target: &str, service_id: Option<&str>) -> Self {
        Self {
            task_type: TRANSLATION_TASK_TYPE.to_string(),
            config: TaskConfig {
                language: LanguagePair {
                    source_language: source.to_string(),
                    target_language: target.to_string(),
                },
                service_id: service_id.map(str::to_string),
            },
        }
    }
}

/// 管道协商请求
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationRequest {
    pub pipeline_tasks: Vec<PipelineTask>,
    pub pipeline_request_config: PipelineRequestConfig,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRequestConfig {
    pub pipeline_id: String,
}

impl NegotiationRequest {
    pub fn new(source: &str, target: &str, pipeline_id: &str) -> Self {
        Self {
            pipeline_tasks: vec![PipelineTask::translation(source, target, None)],
            pipeline_request_config: PipelineRequestConfig {
                pipeline_id: pipeline_id.to_string(),
            },
        }
    }
}

/// 管道协商响应中用到的部分
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationResponse {
    #[serde(rename = "pipelineInferenceAPIEndPoint")]
    pub inference_endpoint: InferenceEndpoint,
    pub pipeline_response_config: Vec<ResponseConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceEndpoint {
    pub callback_url: String,
    pub inference_api_key: InferenceApiKey,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceApiKey {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseConfig {
    pub config: OneOrMany<ServiceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub service_id: String,
}

/// 服务端有时返回对象，有时返回数组
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn first(&self) -> Option<&T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(items) => items.first(),
        }
    }
}

impl NegotiationResponse {
    /// 第一个管道配置的服务标识
    pub fn service_id(&self) -> Option<&str> {
        self.pipeline_response_config
            .first()
            .and_then(|config| config.config.first())
            .map(|config| config.service_id.as_str())
    }
}

/// 推理请求
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InferenceRequest {
    pub pipeline_tasks: Vec<PipelineTask>,
    pub input_data: InputData,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InputData {
    pub input: Vec<InputItem>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InputItem {
    pub source: String,
}

impl InferenceRequest {
    pub fn new(source: &str, target: &str, service_id: &str, text: &str) -> Self {
        Self {
            pipeline_tasks: vec![PipelineTask::translation(source, target, Some(service_id))],
            input_data: InputData {
                input: vec![InputItem {
                    source: text.to_string(),
                }],
            },
        }
    }
}

/// 推理响应中译文的位置
pub const TARGET_TEXT_POINTER: &str = "/pipelineResponse/0/output/0/target";

/// 从推理响应中提取译文
pub fn extract_target_text(response: &serde_json::Value) -> Option<&str> {
    response.pointer(TARGET_TEXT_POINTER)?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn negotiation_request_shape() {
        let request = NegotiationRequest::new("en", "hi", "pipeline-1");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "pipelineTasks": [{
                    "taskType": "translation",
                    "config": {"language": {"sourceLanguage": "en", "targetLanguage": "hi"}}
                }],
                "pipelineRequestConfig": {"pipelineId": "pipeline-1"}
            })
        );
    }

    #[test]
    fn inference_request_carries_service_id_and_text() {
        let request = InferenceRequest::new("en", "hi", "svc", "Hello");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "pipelineTasks": [{
                    "taskType": "translation",
                    "config": {
                        "language": {"sourceLanguage": "en", "targetLanguage": "hi"},
                        "serviceId": "svc"
                    }
                }],
                "inputData": {"input": [{"source": "Hello"}]}
            })
        );
    }

    #[test]
    fn service_id_accepts_object_or_list() {
        let object: NegotiationResponse = serde_json::from_value(json!({
            "pipelineInferenceAPIEndPoint": {
                "callbackUrl": "https://infer.example/compute",
                "inferenceApiKey": {"name": "Authorization", "value": "k"}
            },
            "pipelineResponseConfig": [{"config": {"serviceId": "svc-object"}}]
        }))
        .unwrap();
        assert_eq!(object.service_id(), Some("svc-object"));

        let list: NegotiationResponse = serde_json::from_value(json!({
            "pipelineInferenceAPIEndPoint": {
                "callbackUrl": "https://infer.example/compute",
                "inferenceApiKey": {"value": "k"}
            },
            "pipelineResponseConfig": [{"config": [{"serviceId": "svc-list"}, {"serviceId": "other"}]}]
        }))
        .unwrap();
        assert_eq!(list.service_id(), Some("svc-list"));
    }

    #[test]
    fn target_text_extraction() {
        let ok = json!({"pipelineResponse": [{"output": [{"source": "Hello", "target": "नमस्ते"}]}]});
        assert_eq!(extract_target_text(&ok), Some("नमस्ते"));

        let missing = json!({"pipelineResponse": [{"output": []}]});
        assert_eq!(extract_target_text(&missing), None);
    }
}
