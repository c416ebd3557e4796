use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use tracing::debug;

use crate::config::CopywriterConfig;
use crate::errors::{GeminiError, GeminiResult};
use crate::i18n::Language;
use crate::prompts::{analysis_prompt, chat_system_instruction};
use crate::session::{ImageData, Message, Role, Source};
use crate::types::*;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Text and citations returned by a chat turn
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatReply {
    pub text: String,
    pub sources: Vec<Source>,
}

/// The two remote operations the conversation controller depends on
#[async_trait]
pub trait CopyGenerator: Send + Sync {
    /// Generate the initial four-style copy for a product image
    async fn analyze(&self, image: &ImageData, language: Language) -> GeminiResult<String>;

    /// Continue the refinement chat.
    ///
    /// `history` is the confirmed conversation only; `new_message` is sent
    /// as the next user turn.
    async fn continue_chat(
        &self,
        history: &[Message],
        new_message: &str,
        search_enabled: bool,
        language: Language,
    ) -> GeminiResult<ChatReply>;
}

/// Client for interacting with the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: GeminiModel,
}

impl GeminiClient {
    /// Create a new Gemini API client
    pub fn new(config: &CopywriterConfig) -> GeminiResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            GeminiError::ConfigError(
                "API key is required to initialize the Gemini client".to_string(),
            )
        })?;

        let model = GeminiModel::new(api_key, config.model_name.clone());

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url_or_default().trim_end_matches('/').to_string(),
            model,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model.model_name
    }

    /// Endpoint URL; the key travels in a header, never in the URL
    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model.model_name
        )
    }

    /// Generate content using the Gemini API
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let endpoint = self.endpoint();
        debug!(endpoint = %endpoint, contents = request.contents.len(), "Sending generateContent request");

        let response = self
            .client
            .post(&endpoint)
            .header(API_KEY_HEADER, self.model.api_key.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                GeminiError::RequestError(format!("Failed to send request: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                GeminiError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            return Err(GeminiError::HttpError {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        let response_body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                GeminiError::ParsingError(format!("Failed to parse response: {}", e.without_url()))
            })?;

        Ok(response_body)
    }
}

/// Single user turn: the image first, then the instruction
pub fn build_analysis_request(image: &ImageData, language: Language) -> GenerateContentRequest {
    let image_part = Part::inline_data(
        image.mime_type().to_string(),
        BASE64.encode(image.bytes()),
    );

    GenerateContentRequest {
        contents: vec![Content::user(vec![
            image_part,
            Part::text(analysis_prompt(language)),
        ])],
        system_instruction: None,
        tools: None,
    }
}

/// Replays `history`, then appends `new_message` as the next user turn
pub fn build_chat_request(
    history: &[Message],
    new_message: &str,
    search_enabled: bool,
    language: Language,
) -> GenerateContentRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|message| Content {
            parts: vec![Part::text(message.text.clone())],
            role: Some(message.role.as_str().to_string()),
        })
        .collect();
    contents.push(Content {
        parts: vec![Part::text(new_message.to_string())],
        role: Some(Role::User.as_str().to_string()),
    });

    GenerateContentRequest {
        contents,
        system_instruction: Some(Content::system(
            chat_system_instruction(language).to_string(),
        )),
        tools: search_enabled.then(|| vec![Tool::google_search()]),
    }
}

/// Concatenated text of the first candidate
pub fn extract_text_from_response(response: &GenerateContentResponse) -> GeminiResult<String> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| GeminiError::ResponseError("No candidates in response".to_string()))?;

    let content = candidate
        .content
        .as_ref()
        .ok_or_else(|| GeminiError::ResponseError("No content in candidate".to_string()))?;

    let texts: Vec<&str> = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();

    if texts.is_empty() {
        return Err(GeminiError::ResponseError("No text in content".to_string()));
    }

    Ok(texts.concat())
}

/// Web citations of the first candidate, in the order the API returned them
pub fn extract_sources_from_response(response: &GenerateContentResponse) -> Vec<Source> {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.grounding_metadata.as_ref())
        .map(|metadata| {
            metadata
                .grounding_chunks
                .iter()
                .filter_map(|chunk| chunk.web.as_ref())
                .map(|web| Source {
                    uri: web.uri.clone(),
                    title: web.title.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl CopyGenerator for GeminiClient {
    async fn analyze(&self, image: &ImageData, language: Language) -> GeminiResult<String> {
        let request = build_analysis_request(image, language);
        let response = self.generate_content(&request).await?;
        extract_text_from_response(&response)
    }

    async fn continue_chat(
        &self,
        history: &[Message],
        new_message: &str,
        search_enabled: bool,
        language: Language,
    ) -> GeminiResult<ChatReply> {
        let request = build_chat_request(history, new_message, search_enabled, language);
        let response = self.generate_content(&request).await?;
        let text = extract_text_from_response(&response)?;
        let sources = if search_enabled {
            extract_sources_from_response(&response)
        } else {
            Vec::new()
        };

        Ok(ChatReply { text, sources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = CopywriterConfig::default();
        let err = GeminiClient::new(&config).unwrap_err();
        assert!(matches!(err, GeminiError::ConfigError(_)));
    }

    #[test]
    fn test_endpoint_does_not_leak_key() {
        let mut config = CopywriterConfig::default();
        config.api_key = Some("secret".to_string());
        config.base_url = Some("http://localhost:9000/v1beta/".to_string());

        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_failed_request_error_omits_api_key() {
        let mut config = CopywriterConfig::default();
        config.api_key = Some("SECRETKEY123".to_string());
        config.base_url = Some("http://127.0.0.1:1/v1beta".to_string());
        let client = GeminiClient::new(&config).unwrap();
        let image = ImageData::new(b"png!".to_vec(), "image/png");

        let err = client.analyze(&image, Language::En).await.unwrap_err();

        assert!(matches!(err, GeminiError::RequestError(_)));
        assert!(!err.to_string().contains("SECRETKEY123"), "{}", err);
        assert!(!format!("{:?}", err).contains("SECRETKEY123"));
    }

    #[test]
    fn test_analysis_request_puts_image_before_prompt() {
        let image = ImageData::new(b"png!".to_vec(), "image/png");
        let request = build_analysis_request(&image, Language::En);

        assert_eq!(request.contents.len(), 1);
        let parts = &request.contents[0].parts;
        let inline = parts[0].inline_data.as_ref().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "cG5nIQ==");
        assert!(parts[1].text.as_ref().unwrap().contains("English"));
        assert!(request.tools.is_none());
    }

    #[test]
    fn test_chat_request_replays_history_then_new_message() {
        let history = vec![Message::model("## Formal Style\nCopy")];
        let request = build_chat_request(&history, "make it shorter", false, Language::Id);

        let roles: Vec<_> = request
            .contents
            .iter()
            .map(|c| c.role.as_deref().unwrap())
            .collect();
        assert_eq!(roles, vec!["model", "user"]);
        assert_eq!(
            request.contents[1].parts[0].text.as_deref(),
            Some("make it shorter")
        );
        assert!(request.tools.is_none());
        let instruction = request.system_instruction.unwrap();
        assert!(instruction.parts[0].text.as_ref().unwrap().contains("Bahasa Indonesia"));
    }

    #[test]
    fn test_chat_request_with_search_attaches_tool() {
        let request = build_chat_request(&[], "find trends", true, Language::En);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["tools"], json!([{ "googleSearch": {} }]));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let resp = response(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Shorter " }, { "text": "version." }] } }]
        }));
        assert_eq!(extract_text_from_response(&resp).unwrap(), "Shorter version.");
    }

    #[test]
    fn test_extract_text_errors() {
        let no_candidates = response(json!({ "candidates": [] }));
        assert!(matches!(
            extract_text_from_response(&no_candidates),
            Err(GeminiError::ResponseError(_))
        ));

        let blocked = response(json!({ "candidates": [{ "finishReason": "SAFETY" }] }));
        assert!(extract_text_from_response(&blocked).is_err());

        let no_text = response(json!({ "candidates": [{ "content": { "parts": [] } }] }));
        assert!(extract_text_from_response(&no_text).is_err());
    }

    #[test]
    fn test_extract_sources_skips_non_web_chunks() {
        let resp = response(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "ok" }] },
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://a.example", "title": "A" } },
                    {},
                    { "web": { "uri": "https://b.example", "title": "B" } }
                ] }
            }]
        }));

        assert_eq!(
            extract_sources_from_response(&resp),
            vec![
                Source { uri: "https://a.example".to_string(), title: "A".to_string() },
                Source { uri: "https://b.example".to_string(), title: "B".to_string() },
            ]
        );
    }

    #[test]
    fn test_extract_sources_without_metadata_is_empty() {
        let resp = response(json!({ "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }] }));
        assert!(extract_sources_from_response(&resp).is_empty());
    }
}
