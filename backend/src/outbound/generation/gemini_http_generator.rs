//! Reqwest-backed Gemini note generator.
//!
//! The adapter owns transport details only: request serialisation, base64
//! encoding of the document, timeout and HTTP error mapping, and extraction
//! of the markdown text from the first candidate.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::dto::{GenerateContentRequestDto, GenerateContentResponseDto};
use crate::domain::ports::{NoteGenerator, NoteGeneratorError, SourceDocument};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection settings for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Instruction sent ahead of every document.
    pub prompt: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_owned(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_owned(),
            prompt: prompt.into(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// [`NoteGenerator`] calling `models/{model}:generateContent`.
pub struct GeminiHttpGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    prompt: String,
}

impl GeminiHttpGenerator {
    /// Build the adapter with a client honouring `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: generate_endpoint(&config.base_url, &config.model),
            api_key: config.api_key,
            prompt: config.prompt,
        })
    }
}

fn generate_endpoint(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

#[async_trait]
impl NoteGenerator for GeminiHttpGenerator {
    async fn generate(&self, document: &SourceDocument) -> Result<String, NoteGeneratorError> {
        let payload = GenerateContentRequestDto::new(
            &self.prompt,
            document.mime_type,
            STANDARD.encode(&document.bytes),
        );
        let response = self
            .client
            .post(self.endpoint.as_str())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let notes = parse_notes(body.as_ref())?;
        debug!(
            document_bytes = document.bytes.len(),
            notes_chars = notes.len(),
            "notes generated"
        );
        Ok(notes)
    }
}

fn parse_notes(body: &[u8]) -> Result<String, NoteGeneratorError> {
    let decoded: GenerateContentResponseDto = serde_json::from_slice(body).map_err(|error| {
        NoteGeneratorError::decode(format!("invalid generateContent payload: {error}"))
    })?;
    decoded.into_text().ok_or_else(NoteGeneratorError::empty_response)
}

fn map_transport_error(error: reqwest::Error) -> NoteGeneratorError {
    if error.is_timeout() {
        NoteGeneratorError::timeout(error.to_string())
    } else {
        NoteGeneratorError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> NoteGeneratorError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            NoteGeneratorError::timeout(format!("status {}", status.as_u16()))
        }
        _ => NoteGeneratorError::rejected(status.as_u16(), body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.test/v1beta", "https://example.test/v1beta/models/m:generateContent")]
    #[case("https://example.test/v1beta/", "https://example.test/v1beta/models/m:generateContent")]
    fn endpoint_joins_base_and_model(#[case] base: &str, #[case] expected: &str) {
        assert_eq!(generate_endpoint(base, "m"), expected);
    }

    #[rstest]
    fn config_defaults_target_public_api() {
        let config = GeminiConfig::new("key", "Summarise");
        assert_eq!(config.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[rstest]
    fn parses_markdown_from_candidate() {
        let body = br##"{"candidates":[{"content":{"parts":[{"text":"# Title"}]}}]}"##;
        assert_eq!(parse_notes(body).expect("notes"), "# Title");
    }

    #[rstest]
    fn empty_candidates_are_an_empty_response() {
        let error = parse_notes(br#"{"candidates":[]}"#).expect_err("no text");
        assert_eq!(error, NoteGeneratorError::EmptyResponse);
    }

    #[rstest]
    fn malformed_json_is_a_decode_error() {
        let error = parse_notes(b"<html>").expect_err("not json");
        assert!(matches!(error, NoteGeneratorError::Decode { .. }));
    }

    #[rstest]
    #[case(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case(StatusCode::REQUEST_TIMEOUT, true)]
    #[case(StatusCode::TOO_MANY_REQUESTS, false)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, false)]
    fn statuses_map_to_timeout_or_rejection(#[case] status: StatusCode, #[case] timeout: bool) {
        let error = map_status_error(status, b"{\"error\":{\"message\":\"quota\"}}");
        if timeout {
            assert!(matches!(error, NoteGeneratorError::Timeout { .. }));
        } else {
            assert!(matches!(
                error,
                NoteGeneratorError::Rejected { status: code, .. } if code == status.as_u16()
            ));
        }
    }

    #[rstest]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x ".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    mod loopback {
        //! Exercises `generate` against a local HTTP server.

        use std::net::TcpListener;
        use std::sync::{Arc, Mutex};

        use actix_web::dev::ServerHandle;
        use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
        use serde_json::Value;

        use super::*;

        const API_KEY: &str = "test-api-key";
        const PROMPT: &str = "Summarise as markdown";

        #[derive(Debug, Clone)]
        struct RecordedRequest {
            path: String,
            api_key: Option<String>,
            body: Value,
        }

        struct FakeGemini {
            base_url: String,
            handle: ServerHandle,
            recorded: Arc<Mutex<Vec<RecordedRequest>>>,
        }

        impl FakeGemini {
            fn requests(&self) -> Vec<RecordedRequest> {
                self.recorded.lock().expect("recorded lock").clone()
            }

            fn generator(&self) -> GeminiHttpGenerator {
                let mut config = GeminiConfig::new(API_KEY, PROMPT);
                config.base_url = format!("{}/v1beta", self.base_url);
                config.model = "test-model".to_owned();
                config.timeout = Duration::from_secs(5);
                GeminiHttpGenerator::new(config).expect("client builds")
            }
        }

        fn spawn_fake_gemini(status: u16, reply: &'static str) -> FakeGemini {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
            let addr = listener.local_addr().expect("local addr");
            let recorded = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&recorded);

            let server = HttpServer::new(move || {
                let sink = Arc::clone(&sink);
                App::new().default_service(web::to(
                    move |req: HttpRequest, body: web::Bytes| {
                        let sink = Arc::clone(&sink);
                        async move {
                            sink.lock().expect("recorded lock").push(RecordedRequest {
                                path: req.path().to_owned(),
                                api_key: req
                                    .headers()
                                    .get(API_KEY_HEADER)
                                    .and_then(|value| value.to_str().ok())
                                    .map(str::to_owned),
                                body: serde_json::from_slice(&body).unwrap_or(Value::Null),
                            });
                            let status = actix_web::http::StatusCode::from_u16(status)
                                .expect("valid status");
                            HttpResponse::build(status)
                                .content_type("application/json")
                                .body(reply)
                        }
                    },
                ))
            })
            .disable_signals()
            .workers(1)
            .listen(listener)
            .expect("listen on loopback")
            .run();

            let handle = server.handle();
            actix_web::rt::spawn(server);

            FakeGemini {
                base_url: format!("http://{addr}"),
                handle,
                recorded,
            }
        }

        #[actix_web::test]
        async fn sends_prompt_document_and_api_key() {
            let fake = spawn_fake_gemini(
                200,
                r##"{"candidates":[{"content":{"parts":[{"text":"# Lecture notes"}]}}]}"##,
            );

            let notes = fake
                .generator()
                .generate(&SourceDocument::pdf(b"%PDF-1.7".to_vec()))
                .await
                .expect("notes generated");

            assert_eq!(notes, "# Lecture notes");
            let requests = fake.requests();
            assert_eq!(requests.len(), 1);
            let request = &requests[0];
            assert_eq!(request.path, "/v1beta/models/test-model:generateContent");
            assert_eq!(request.api_key.as_deref(), Some(API_KEY));
            let parts = &request.body["contents"][0]["parts"];
            assert_eq!(parts[0]["text"], PROMPT);
            assert_eq!(parts[1]["inlineData"]["mimeType"], "application/pdf");
            assert_eq!(parts[1]["inlineData"]["data"], STANDARD.encode(b"%PDF-1.7"));

            fake.handle.stop(true).await;
        }

        #[actix_web::test]
        async fn non_success_status_is_rejected_with_preview() {
            let fake = spawn_fake_gemini(429, r#"{"error":{"message":"quota exhausted"}}"#);

            let error = fake
                .generator()
                .generate(&SourceDocument::pdf(b"%PDF".to_vec()))
                .await
                .expect_err("rate limited");

            assert!(matches!(
                &error,
                NoteGeneratorError::Rejected { status: 429, message } if message.contains("quota exhausted")
            ));

            fake.handle.stop(true).await;
        }

        #[actix_web::test]
        async fn blank_candidates_are_an_empty_response() {
            let fake = spawn_fake_gemini(200, r#"{"candidates":[]}"#);

            let error = fake
                .generator()
                .generate(&SourceDocument::pdf(b"%PDF".to_vec()))
                .await
                .expect_err("no text");

            assert_eq!(error, NoteGeneratorError::EmptyResponse);
            fake.handle.stop(true).await;
        }
    }
}
