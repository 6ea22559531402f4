use async_trait::async_trait;
use kernel::gateway::assistant::AssistantGateway;
use serde::{Deserialize, Serialize};
use shared::{
    config::AssistantConfig,
    error::{AppError, AppResult},
};
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are the planning assistant of an event marketplace. \
Help clients find vendors and venues, compare options, plan budgets and schedules, \
and understand how bookings, cancellations and availability work on the platform. \
Politely decline anything unrelated to planning events. Keep answers short.";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI 互換の chat completions API を呼び出す
pub struct HttpAssistantGateway {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl HttpAssistantGateway {
    pub fn new(config: &AssistantConfig, api_key: String) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::ExternalServiceError(format!("assistant client: {e}")))?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl AssistantGateway for HttpAssistantGateway {
    async fn complete(&self, message: &str) -> AppResult<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
            temperature: 0.4,
            max_tokens: 400,
        };

        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("assistant request failed: {e}")))?;

        if !res.status().is_success() {
            let status = res.status();
            let detail = res.text().await.unwrap_or_default();
            tracing::warn!(%status, detail = %detail, "assistant API returned an error");
            return Err(AppError::ExternalServiceError(format!(
                "assistant API returned {status}"
            )));
        }

        let parsed: ChatCompletionResponse = res
            .json()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("assistant response: {e}")))?;

        extract_reply(parsed)
    }
}

fn extract_reply(response: ChatCompletionResponse) -> AppResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::ExternalServiceError("assistant returned an empty reply".into()))
}

/// API キーが未設定のときに使う
pub struct DisabledAssistantGateway;

#[async_trait]
impl AssistantGateway for DisabledAssistantGateway {
    async fn complete(&self, _message: &str) -> AppResult<String> {
        Err(AppError::ServiceUnavailable(
            "the assistant is not configured".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_choice_content() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  Try a garden venue.  "}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_reply(parsed).unwrap(), "Try a garden venue.");
    }

    #[test]
    fn empty_choices_are_an_error() {
        let parsed: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_reply(parsed).is_err());
    }

    #[tokio::test]
    async fn disabled_gateway_reports_unavailable() {
        let err = DisabledAssistantGateway.complete("wedding venues?").await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }
}
