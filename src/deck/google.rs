/*!
 * Google Slides / Drive REST client.
 *
 * Reads presentations through the Slides API, copies them through the Drive
 * API and submits `replaceAllText` batch updates. Every call carries the
 * OAuth bearer token negotiated for the user.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::DeckError;
use crate::translation::planner::{ReplacementBatch, ReplacementRequest};

use super::{Deck, DeckCopy, DeckService, PageElement, Slide, TableCell, TableRow, presentation_url};

const SLIDES_API: &str = "https://slides.googleapis.com/v1";
const DRIVE_API: &str = "https://www.googleapis.com/drive/v3";

/// Authenticated client for Google Slides and Drive
#[derive(Debug)]
pub struct GoogleSlidesClient {
    /// HTTP client for API requests
    client: Client,
    /// OAuth access token
    access_token: String,
    /// Slides API base URL
    slides_api: String,
    /// Drive API base URL
    drive_api: String,
}

impl GoogleSlidesClient {
    /// Create a client using the public Google endpoints
    pub fn new(access_token: impl Into<String>, timeout_secs: u64) -> Self {
        Self::with_endpoints(access_token, SLIDES_API, DRIVE_API, timeout_secs)
    }

    /// Create a client against custom API base URLs
    pub fn with_endpoints(
        access_token: impl Into<String>,
        slides_api: impl Into<String>,
        drive_api: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            access_token: access_token.into(),
            slides_api: slides_api.into().trim_end_matches('/').to_string(),
            drive_api: drive_api.into().trim_end_matches('/').to_string(),
        }
    }
}

/// Read the body of a failed call into a message
async fn failure_message(response: Response) -> String {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    format!("HTTP {}: {}", status, body)
}

#[async_trait]
impl DeckService for GoogleSlidesClient {
    async fn fetch(&self, deck_id: &str) -> Result<Deck, DeckError> {
        let url = format!("{}/presentations/{}", self.slides_api, deck_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| DeckError::access(deck_id, e))?;

        if !response.status().is_success() {
            let message = failure_message(response).await;
            error!("[{}] Slides API error: {}", deck_id, message);
            return Err(DeckError::access(deck_id, message));
        }

        let presentation = response
            .json::<ApiPresentation>()
            .await
            .map_err(|e| DeckError::Parse(e.to_string()))?;
        debug!("[{}] Found {} slides", deck_id, presentation.slides.len());
        Ok(presentation.into_deck(deck_id))
    }

    async fn copy(&self, deck_id: &str, title: &str) -> Result<DeckCopy, DeckError> {
        let url = format!("{}/files/{}/copy", self.drive_api, deck_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .query(&[("supportsAllDrives", "true")])
            .json(&CopyBody { name: title })
            .send()
            .await
            .map_err(|e| DeckError::access(deck_id, e))?;

        if !response.status().is_success() {
            let message = failure_message(response).await;
            error!("[{}] Drive API error: {}", deck_id, message);
            return Err(DeckError::access(deck_id, message));
        }

        let file = response
            .json::<DriveFile>()
            .await
            .map_err(|e| DeckError::Parse(e.to_string()))?;
        Ok(DeckCopy {
            url: presentation_url(&file.id),
            id: file.id,
            title: title.to_string(),
        })
    }

    async fn apply_batch(&self, deck_id: &str, batch: &ReplacementBatch) -> Result<Vec<u64>, DeckError> {
        let url = format!("{}/presentations/{}:batchUpdate", self.slides_api, deck_id);
        let body = BatchUpdateBody::from_batch(batch);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeckError::apply(deck_id, batch.number, e))?;

        if !response.status().is_success() {
            let message = failure_message(response).await;
            return Err(DeckError::apply(deck_id, batch.number, message));
        }

        let reply = response
            .json::<BatchUpdateReply>()
            .await
            .map_err(|e| DeckError::apply(deck_id, batch.number, e))?;
        Ok(reply.occurrences_changed())
    }
}

#[derive(Debug, Serialize)]
struct CopyBody<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

/// `presentations.batchUpdate` request body
#[derive(Debug, Serialize)]
struct BatchUpdateBody<'a> {
    requests: Vec<ApiRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    replace_all_text: ReplaceAllText<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplaceAllText<'a> {
    replace_text: &'a str,
    page_object_ids: &'a [String],
    contains_text: ContainsText<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContainsText<'a> {
    text: &'a str,
    match_case: bool,
}

impl<'a> BatchUpdateBody<'a> {
    fn from_batch(batch: &'a ReplacementBatch) -> Self {
        Self {
            requests: batch.requests.iter().map(ApiRequest::from).collect(),
        }
    }
}

impl<'a> From<&'a ReplacementRequest> for ApiRequest<'a> {
    fn from(request: &'a ReplacementRequest) -> Self {
        Self {
            replace_all_text: ReplaceAllText {
                replace_text: &request.translated,
                page_object_ids: &request.slide_ids,
                contains_text: ContainsText {
                    text: &request.original,
                    match_case: true,
                },
            },
        }
    }
}

/// `presentations.batchUpdate` response body
#[derive(Debug, Default, Deserialize)]
struct BatchUpdateReply {
    #[serde(default)]
    replies: Vec<ApiReply>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiReply {
    #[serde(default)]
    replace_all_text: Option<ReplaceAllTextReply>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplaceAllTextReply {
    #[serde(default)]
    occurrences_changed: u64,
}

impl BatchUpdateReply {
    /// Per-request counts; a reply without a count changed nothing
    fn occurrences_changed(&self) -> Vec<u64> {
        self.replies
            .iter()
            .map(|reply| {
                reply
                    .replace_all_text
                    .as_ref()
                    .map_or(0, |r| r.occurrences_changed)
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPresentation {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    slides: Vec<ApiPage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPage {
    object_id: String,
    #[serde(default)]
    page_elements: Vec<ApiPageElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPageElement {
    #[serde(default)]
    shape: Option<ApiShape>,
    #[serde(default)]
    element_group: Option<ApiGroup>,
    #[serde(default)]
    table: Option<ApiTable>,
}

#[derive(Debug, Deserialize)]
struct ApiShape {
    #[serde(default)]
    text: Option<ApiTextContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTextContent {
    #[serde(default)]
    text_elements: Vec<ApiTextElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTextElement {
    #[serde(default)]
    text_run: Option<ApiTextRun>,
}

#[derive(Debug, Deserialize)]
struct ApiTextRun {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiGroup {
    #[serde(default)]
    children: Vec<ApiPageElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTable {
    #[serde(default)]
    table_rows: Vec<ApiTableRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTableRow {
    #[serde(default)]
    table_cells: Vec<ApiTableCell>,
}

#[derive(Debug, Deserialize)]
struct ApiTableCell {
    #[serde(default)]
    text: Option<ApiTextContent>,
}

impl ApiPresentation {
    fn into_deck(self, deck_id: &str) -> Deck {
        Deck {
            id: deck_id.to_string(),
            title: self.title.unwrap_or_default(),
            slides: self
                .slides
                .into_iter()
                .map(|page| Slide::new(page.object_id, page.page_elements.into_iter().map(convert_element).collect()))
                .collect(),
        }
    }
}

fn text_runs(text: Option<ApiTextContent>) -> Vec<String> {
    text.map(|content| {
        content
            .text_elements
            .into_iter()
            .filter_map(|element| element.text_run.map(|run| run.content))
            .collect()
    })
    .unwrap_or_default()
}

fn convert_element(element: ApiPageElement) -> PageElement {
    if let Some(shape) = element.shape {
        PageElement::Shape {
            text_runs: text_runs(shape.text),
        }
    } else if let Some(group) = element.element_group {
        PageElement::Group {
            children: group.children.into_iter().map(convert_element).collect(),
        }
    } else if let Some(table) = element.table {
        PageElement::Table {
            rows: table
                .table_rows
                .into_iter()
                .map(|row| TableRow {
                    cells: row
                        .table_cells
                        .into_iter()
                        .map(|cell| TableCell {
                            text_runs: text_runs(cell.text),
                        })
                        .collect(),
                })
                .collect(),
        }
    } else {
        PageElement::Other
    }
}
