//! SOP generation: one LLM attempt, template fallback on any failure.
//!
//! Flow: build prompt → LlmClient::complete → on Err, render_enhanced(profile).
//! Upstream failures are logged and never returned to the caller.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::generation::prompts::build_sop_prompt;
use crate::generation::template::{render_enhanced, DocumentStyle};
use crate::llm_client::prompts::SOP_WRITER_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::sop::ApplicantProfile;

/// Which path produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationSource {
    Ai,
    Template,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Applied on the template path only.
    pub style: DocumentStyle,
    /// Skip the LLM and render the template directly.
    pub offline: bool,
}

#[derive(Debug, Clone)]
pub struct GeneratedText {
    pub text: String,
    pub source: GenerationSource,
}

/// Single LLM attempt for a profile.
pub async fn request_ai_sop(llm: &LlmClient, profile: &ApplicantProfile) -> Result<String, LlmError> {
    let prompt = build_sop_prompt(profile);
    llm.complete(&prompt, SOP_WRITER_SYSTEM).await
}

/// Produces a Statement of Purpose. Never fails.
pub async fn generate_sop(
    llm: &LlmClient,
    profile: &ApplicantProfile,
    options: GenerateOptions,
) -> GeneratedText {
    if !options.offline {
        match request_ai_sop(llm, profile).await {
            Ok(text) => {
                info!("Generated SOP via LLM ({} chars)", text.len());
                return GeneratedText {
                    text,
                    source: GenerationSource::Ai,
                };
            }
            Err(LlmError::MissingApiKey) => {
                info!("No LLM API key configured, using template generator");
            }
            Err(e) => {
                warn!("LLM generation failed, using template fallback: {e}");
            }
        }
    }

    GeneratedText {
        text: render_enhanced(profile, options.style),
        source: GenerationSource::Template,
    }
}
