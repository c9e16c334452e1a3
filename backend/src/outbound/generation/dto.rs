//! Wire DTOs for the Gemini `generateContent` endpoint.
//!
//! Requests borrow the prompt and the encoded document; responses decode into
//! a candidate list from which only text parts are kept.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct GenerateContentRequestDto<'a> {
    pub(super) contents: [ContentDto<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct ContentDto<'a> {
    pub(super) parts: [RequestPartDto<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum RequestPartDto<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataDto<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InlineDataDto<'a> {
    pub(super) mime_type: &'a str,
    pub(super) data: String,
}

impl<'a> GenerateContentRequestDto<'a> {
    pub(super) fn new(prompt: &'a str, mime_type: &'a str, data: String) -> Self {
        Self {
            contents: [ContentDto {
                parts: [
                    RequestPartDto::Text { text: prompt },
                    RequestPartDto::InlineData {
                        inline_data: InlineDataDto { mime_type, data },
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateContentResponseDto {
    #[serde(default)]
    pub(super) candidates: Vec<CandidateDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CandidateDto {
    pub(super) content: Option<CandidateContentDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CandidateContentDto {
    #[serde(default)]
    pub(super) parts: Vec<ResponsePartDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResponsePartDto {
    pub(super) text: Option<String>,
}

impl GenerateContentResponseDto {
    /// Concatenate the text parts of the first candidate.
    ///
    /// Returns `None` when there is no candidate or the text is blank.
    pub(super) fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn request_places_prompt_before_inline_document() {
        let dto = GenerateContentRequestDto::new("Summarise", "application/pdf", "JVBERg==".into());

        let value = serde_json::to_value(&dto).expect("serialise request");

        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        { "text": "Summarise" },
                        { "inlineData": { "mimeType": "application/pdf", "data": "JVBERg==" } }
                    ]
                }]
            })
        );
    }

    #[rstest]
    fn response_text_joins_first_candidate_parts() {
        let body = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "# Notes\n" }, { "text": "- point" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        });

        let dto: GenerateContentResponseDto = serde_json::from_value(body).expect("decode");

        assert_eq!(dto.into_text().as_deref(), Some("# Notes\n- point"));
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "candidates": [] }))]
    #[case(json!({ "candidates": [{ "finishReason": "SAFETY" }] }))]
    #[case(json!({ "candidates": [{ "content": { "parts": [{ "text": "  " }] } }] }))]
    fn responses_without_text_yield_nothing(#[case] body: serde_json::Value) {
        let dto: GenerateContentResponseDto = serde_json::from_value(body).expect("decode");
        assert_eq!(dto.into_text(), None);
    }
}
