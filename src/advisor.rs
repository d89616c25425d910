//! Questions to the hosted language model.
//!
//! The advisor forwards a free-text question to a generative model,
//! with the reference guide as system context, and returns its answer.
//! It is only available when an API key was configured; callers check
//! [`Advisor::is_configured`] first.  Failures never reach the user as
//! faults: [`consult`] turns them into a fixed advisory message.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::guide::GUIDE_CONTENT;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

pub const GREETING: &str = "Hola, soy tu experto virtual en vivienda. Basado en la guía legal y financiera, ¿qué duda tienes sobre tu perfil, contrato o capacidad de endeudamiento?";
pub const FALLBACK_MESSAGE: &str = "Hubo un error conectando con el asesor. Por favor verifica tu conexión o intenta más tarde.";
pub const EMPTY_ANSWER_MESSAGE: &str = "Lo siento, no pude generar una respuesta en este momento.";
pub const NOT_CONFIGURED_MESSAGE: &str = "Para usar el asistente AI, necesitas configurar tu API Key en el entorno.";

const PERSONA: &str = "Eres un asesor financiero experto en créditos de vivienda en Colombia.
Responde EXCLUSIVAMENTE basándote en el siguiente contexto extraído de una guía PDF.
Sé amable, profesional y motivador. Si la respuesta no está en el texto, indícalo.";

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor API key is not configured")]
    NotConfigured,

    #[error("request to the model failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model service returned {status}: {message}")]
    Service { status: u16, message: String },
}

/// Anything able to answer a question about the guide.
///
/// Implementations must be thread-safe because the HTTP handlers share
/// one instance across requests.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Whether a credential is available.  Checked before every call.
    fn is_configured(&self) -> bool;

    /// Model identifier, for display.
    fn model(&self) -> &str;

    /// Ask once.  `Ok` carries the raw answer, which may be empty.
    async fn ask(&self, question: &str) -> Result<String, AdvisorError>;
}

/// System instruction sent with every question.
pub fn system_instruction() -> String {
    format!("{PERSONA}\n\nCONTEXTO PDF:\n{GUIDE_CONTENT}")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: ServiceErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorDetail {
    #[serde(default)]
    message: String,
}

fn build_request(question: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: question.to_string(),
            }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: system_instruction(),
            }],
        },
    }
}

/// Concatenated text of the first candidate, or an empty string.
fn answer_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect())
        .unwrap_or_default()
}

/// Advisor backed by the Generative Language REST API.
pub struct GeminiAdvisor {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiAdvisor {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AdvisorError> {
        let client = Client::builder()
            .user_agent(concat!("housing_advisor/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn ask(&self, question: &str) -> Result<String, AdvisorError> {
        let api_key = self.api_key.as_deref().ok_or(AdvisorError::NotConfigured)?;
        debug!(model = %self.model, "sending question to model");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&build_request(question))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ServiceErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(AdvisorError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<GenerateContentResponse>().await?;
        Ok(answer_text(&body))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplyStatus {
    Answered,
    Fallback,
    NotConfigured,
}

/// What the user gets to see for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub status: ReplyStatus,
    pub text: String,
}

/// Ask `advisor` once and convert every outcome into a visible reply.
///
/// Returns `None` for a blank question.
pub async fn consult(advisor: &dyn Advisor, question: &str) -> Option<Reply> {
    if question.trim().is_empty() {
        return None;
    }
    if !advisor.is_configured() {
        warn!("advisor queried without an API key");
        return Some(Reply {
            status: ReplyStatus::NotConfigured,
            text: NOT_CONFIGURED_MESSAGE.to_string(),
        });
    }
    let reply = match advisor.ask(question).await {
        Ok(answer) if answer.trim().is_empty() => Reply {
            status: ReplyStatus::Answered,
            text: EMPTY_ANSWER_MESSAGE.to_string(),
        },
        Ok(answer) => Reply {
            status: ReplyStatus::Answered,
            text: answer,
        },
        Err(err) => {
            error!(error = %err, "advisor request failed");
            Reply {
                status: ReplyStatus::Fallback,
                text: FALLBACK_MESSAGE.to_string(),
            }
        }
    };
    Some(reply)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A running transcript with the advisor, opened by the greeting.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    next_id: u64,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        conversation.push(Role::Model, GREETING.to_string());
        conversation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn push(&mut self, role: Role, text: String) {
        self.messages.push(Message {
            id: self.next_id.to_string(),
            role,
            text,
            timestamp: Utc::now(),
        });
        self.next_id += 1;
    }

    /// Record `question` and the advisor's reply.
    ///
    /// Blank questions and an unconfigured advisor leave the transcript
    /// untouched.
    pub async fn submit(&mut self, advisor: &dyn Advisor, question: &str) -> Option<Reply> {
        let reply = consult(advisor, question).await?;
        if reply.status == ReplyStatus::NotConfigured {
            return Some(reply);
        }
        self.push(Role::User, question.to_string());
        self.push(Role::Model, reply.text.clone());
        debug!(messages = self.messages.len(), "transcript updated");
        Some(reply)
    }
}
