//! OpenAI 互換 API を使った AiGenerator 実装
//!
//! 1 回のリクエストのみ行い、リトライはしない。

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{AiGenerator, GenerationError, GenerationResult, ProjectId};

const SYSTEM_PROMPT: &str = "You are a senior software engineer collaborating with a team \
inside a shared project chat. Answer the request with a single JSON object of the form \
{\"text\": string, \"files\": {path: {\"contents\": string}}, \"buildSteps\": [string], \
\"runCommands\": [string]}. Use empty collections when a field does not apply.";

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct HttpAiGenerator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl HttpAiGenerator {
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
        request_timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| GenerationError::Request(e.to_string()))?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl AiGenerator for HttpAiGenerator {
    async fn generate(
        &self,
        prompt: &str,
        project_id: &ProjectId,
    ) -> Result<GenerationResult, GenerationError> {
        let request = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": format!("[project {}] {}", project_id, prompt) }
            ],
            "response_format": { "type": "json_object" }
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::InvalidResponse("no completion content".to_string()))?;

        tracing::debug!("Generation for project '{}' returned {} bytes", project_id, content.len());
        Ok(parse_generation(&content))
    }
}

/// Structured model output. `text` is required so unrelated JSON is not mistaken for a reply.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationPayload {
    text: String,
    #[serde(default)]
    files: Map<String, Value>,
    #[serde(default)]
    build_steps: Vec<String>,
    #[serde(default)]
    run_commands: Vec<String>,
}

impl From<GenerationPayload> for GenerationResult {
    fn from(payload: GenerationPayload) -> Self {
        Self {
            text: payload.text,
            files: payload.files,
            build_steps: payload.build_steps,
            run_commands: payload.run_commands,
        }
    }
}

/// Model output is expected to be a JSON object; anything else is kept as plain text.
fn parse_generation(content: &str) -> GenerationResult {
    match serde_json::from_str::<GenerationPayload>(content) {
        Ok(payload) => payload.into(),
        Err(_) => GenerationResult {
            text: content.to_string(),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};

    fn project_id() -> ProjectId {
        ProjectId::new("65f1a2b3c4d5e6f7a8b9c0d1".to_string()).unwrap()
    }

    /// 固定レスポンスを返すスタブサーバーを起動し、その URL を返す
    async fn spawn_stub(status: StatusCode, body: serde_json::Value) -> String {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1/chat/completions", addr)
    }

    fn generator(url: String) -> HttpAiGenerator {
        HttpAiGenerator::new(
            url,
            "test-key".to_string(),
            "test-model".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_generation_structured() {
        // テスト項目: JSON オブジェクトの出力は構造化された結果になる
        // given (前提条件):
        let content = r#"{"text":"ok","buildSteps":["npm i"],"runCommands":["npm start"]}"#;

        // when (操作):
        let result = parse_generation(content);

        // then (期待する結果):
        assert_eq!(result.text, "ok");
        assert_eq!(result.build_steps, vec!["npm i".to_string()]);
        assert_eq!(result.run_commands, vec!["npm start".to_string()]);
    }

    #[test]
    fn test_parse_generation_plain_text_fallback() {
        // テスト項目: JSON でない出力はテキストとして扱われる
        // given (前提条件):
        let content = "function sort(a) { return a.sort(); }";

        // when (操作):
        let result = parse_generation(content);

        // then (期待する結果):
        assert_eq!(result.text, content);
        assert!(result.files.is_empty());
    }

    #[test]
    fn test_parse_generation_object_without_text_is_kept_raw() {
        // テスト項目: text を持たない JSON オブジェクトは、空の返答ではなく生の出力として扱われる
        // given (前提条件):
        let content = r#"{"answer":"use quicksort"}"#;

        // when (操作):
        let result = parse_generation(content);

        // then (期待する結果):
        assert_eq!(result.text, content);
        assert!(result.files.is_empty());
        assert!(result.build_steps.is_empty());
    }

    #[tokio::test]
    async fn test_generate_success() {
        // テスト項目: 2xx レスポンスの最初の choice が結果になる
        // given (前提条件):
        let url = spawn_stub(
            StatusCode::OK,
            serde_json::json!({
                "choices": [{ "message": { "content": "{\"text\":\"sorted\"}" } }]
            }),
        )
        .await;

        // when (操作):
        let result = generator(url).generate("sort", &project_id()).await;

        // then (期待する結果):
        assert_eq!(result.unwrap().text, "sorted");
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        // テスト項目: 2xx 以外のレスポンスは Status エラーになる
        // given (前提条件):
        let url = spawn_stub(
            StatusCode::TOO_MANY_REQUESTS,
            serde_json::json!({ "error": "rate limited" }),
        )
        .await;

        // when (操作):
        let result = generator(url).generate("sort", &project_id()).await;

        // then (期待する結果):
        assert_eq!(result, Err(GenerationError::Status(429)));
    }

    #[tokio::test]
    async fn test_generate_empty_choices() {
        // テスト項目: choices が空のレスポンスは InvalidResponse になる
        // given (前提条件):
        let url = spawn_stub(StatusCode::OK, serde_json::json!({ "choices": [] })).await;

        // when (操作):
        let result = generator(url).generate("sort", &project_id()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(GenerationError::InvalidResponse(_))));
    }
}
