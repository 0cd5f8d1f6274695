use crate::config::GeminiConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::celebration::{CelebrationProvider, empty_reply_fallback, failure_fallback};

const SYSTEM_INSTRUCTION: &str = "You are a cheerful and energetic prize announcer. \
Speak in Thai only, use emojis sparingly but effectively.";

/// 生成用户提示词：一句简短、轻松有趣的祝贺语
fn build_prompt(item_name: &str) -> String {
    format!(
        "เขียนคำแสดงความยินดีแบบสดใสและตื่นเต้นสุดๆ สำหรับคนที่ได้รับของรางวัลคือ \"{item_name}\" \
ขอแบบสั้นๆ 1 ประโยค (ไม่เกิน 15 คำ) ให้ดูเป็นทางการน้อยแต่สนุกมาก"
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateContentResponse {
    /// 拼接第一个候选回复的全部文本片段
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| c.content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct GeminiService {
    http: Client,
    cfg: GeminiConfig,
}

impl GeminiService {
    pub fn new(cfg: GeminiConfig) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("lucky-spin/gemini")
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self { http, cfg })
    }

    pub fn is_enabled(&self) -> bool {
        !self.cfg.api_key.is_empty()
    }

    /// 调用 generateContent 生成祝贺语，返回去除首尾空白后的文本（可能为空）
    pub async fn generate(&self, item_name: &str) -> AppResult<String> {
        if !self.is_enabled() {
            return Err(AppError::ConfigError("Gemini API key is not set".into()));
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.cfg.base_url.trim_end_matches('/'),
            self.cfg.model
        );

        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: build_prompt(item_name),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.cfg.temperature,
            },
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.cfg.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Gemini request failed: HTTP {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&response.text().await?)?;
        Ok(parsed.text().trim().to_string())
    }
}

#[async_trait]
impl CelebrationProvider for GeminiService {
    async fn request_celebration(&self, item_name: &str) -> String {
        match self.generate(item_name).await {
            Ok(text) if text.is_empty() => {
                log::warn!("Gemini returned an empty celebration for {item_name}");
                empty_reply_fallback(item_name)
            }
            Ok(text) => text,
            Err(e) => {
                log::error!("Gemini celebration failed for {item_name}: {e}");
                failure_fallback(item_name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.to_string(),
            // 不可路由地址，确保测试不会真正访问外网
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..GeminiConfig::default()
        }
    }

    #[test]
    fn test_response_text_joins_first_candidate_parts() {
        let raw = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "  ยินดีด้วย"}, {"text": "! 🎉 \n"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text().trim(), "ยินดีด้วย! 🎉");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.text(), "");
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.into(),
                }],
            },
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: build_prompt("Mug"),
                }],
            }],
            generation_config: GenerationConfig { temperature: 1.0 },
        };
        let v = serde_json::to_value(&body).unwrap();
        assert!(v["systemInstruction"]["role"].is_null());
        assert_eq!(v["contents"][0]["role"], "user");
        assert!(v["contents"][0]["parts"][0]["text"].as_str().unwrap().contains("\"Mug\""));
        assert_eq!(v["generationConfig"]["temperature"], 1.0);
    }

    #[tokio::test]
    async fn test_missing_api_key_falls_back() {
        let svc = GeminiService::new(config("")).unwrap();
        assert!(!svc.is_enabled());
        assert_eq!(svc.request_celebration("Prize").await, failure_fallback("Prize"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        let svc = GeminiService::new(config("test-key")).unwrap();
        let msg = svc.request_celebration("Prize").await;
        assert_eq!(msg, failure_fallback("Prize"));
    }
}
