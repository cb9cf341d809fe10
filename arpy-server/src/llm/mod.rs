// Copyright 2025 Arpy AI Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Generative-language relay.
//!
//! A [`GenerationProvider`] produces text from a prompt; [`LlmManager`]
//! wraps the optional provider, assembles prompts from conversation
//! history, and falls back to canned demo replies when no provider is
//! configured or the upstream call fails, so the service stays usable
//! without an API key.

use std::sync::Arc;

use arpy_core::Message;
use tracing::{info, warn};

use crate::config::LlmConfig;

mod providers;
pub use providers::GeminiProvider;

/// Maximum title length after post-processing.
const TITLE_MAX_CHARS: usize = 50;

/// Messages fed to the title prompt.
const TITLE_CONTEXT_MESSAGES: usize = 4;

const PERSONA_PROMPT: &str = "You are Arpy AI V2.0, an advanced AI assistant with a friendly, \
knowledgeable, and helpful personality. You provide thoughtful, contextual responses and \
maintain conversation flow naturally. Keep responses conversational and engaging while \
being informative.";

#[async_trait::async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate a completion for a fully assembled prompt.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;

    fn name(&self) -> &str;
}

/// Title generation error.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("no generation provider configured")]
    NotConfigured,

    #[error("generation failed: {0}")]
    Upstream(#[from] anyhow::Error),
}

pub struct LlmManager {
    provider: Option<Arc<dyn GenerationProvider>>,
}

impl LlmManager {
    /// Initialize from config; without an API key the manager runs in
    /// demo mode.
    pub fn new(config: &LlmConfig) -> Self {
        let provider: Option<Arc<dyn GenerationProvider>> = match &config.google_api_key {
            Some(key) => {
                info!(model = %config.gemini_model, "Initialized Gemini provider");
                Some(Arc::new(GeminiProvider::new(
                    key.clone(),
                    config.gemini_model.clone(),
                )))
            }
            None => {
                warn!("GOOGLE_API_KEY not set, chat will answer with demo responses");
                None
            }
        };

        Self { provider }
    }

    /// Manager backed by an explicit provider (used by tests).
    pub fn with_provider(provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Manager with no provider: always demo mode.
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Produce the assistant reply for a conversation.
    ///
    /// Never fails: upstream errors and the unconfigured case degrade to
    /// demo replies keyed on the latest user message.
    pub async fn chat_reply(&self, history: &[Message]) -> String {
        let latest = history
            .iter()
            .rev()
            .find(|m| !m.is_assistant())
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let Some(provider) = &self.provider else {
            return demo_reply(latest);
        };

        match provider.generate(&chat_prompt(history)).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                "I apologize, but I'm having trouble processing that request right now."
                    .to_string()
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "generation failed, using demo reply");
                demo_reply(latest)
            }
        }
    }

    /// Generate a short title for a conversation from its opening
    /// exchange.
    pub async fn conversation_title(&self, messages: &[Message]) -> Result<String, LlmError> {
        let provider = self.provider.as_ref().ok_or(LlmError::NotConfigured)?;
        let raw = provider.generate(&title_prompt(messages)).await?;
        Ok(clean_title(&raw))
    }
}

/// Render the persona preamble plus the running conversation.
fn chat_prompt(history: &[Message]) -> String {
    let rendered: Vec<String> = history
        .iter()
        .map(|m| format!("{}: {}", m.role.display_name(), m.content))
        .collect();

    format!(
        "{}\n\nConversation history:\n{}\n\nPlease respond to the latest user message naturally and helpfully.",
        PERSONA_PROMPT,
        rendered.join("\n")
    )
}

/// Render the title prompt from the opening messages.
fn title_prompt(messages: &[Message]) -> String {
    let context: Vec<String> = messages
        .iter()
        .take(TITLE_CONTEXT_MESSAGES)
        .map(|m| {
            format!(
                "{}: {}",
                match m.role {
                    arpy_core::Role::User => "user",
                    arpy_core::Role::Assistant => "assistant",
                },
                m.content
            )
        })
        .collect();

    format!(
        "Based on this conversation, generate a short, descriptive title (2-6 words max) that captures the main topic:\n\n{}\n\nGenerate only the title, no quotes or extra text:",
        context.join("\n")
    )
}

/// Trim, strip quote characters, and clamp a model-produced title.
fn clean_title(raw: &str) -> String {
    let stripped: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '"' && *c != '\'')
        .collect();
    stripped.chars().take(TITLE_MAX_CHARS).collect()
}

/// Canned replies for demo mode, keyed on the user message.
fn demo_reply(user_message: &str) -> String {
    let input = user_message.to_lowercase();

    if input.contains("hello") || input.contains("hi") {
        "Hello! I'm Arpy AI V2.0, your advanced AI assistant. I'm currently in demo mode - \
         please configure a valid Google API key to unlock my full capabilities. The interface \
         is fully functional and ready for real AI conversations!"
            .to_string()
    } else if input.contains("test") {
        "This is a demonstration response! The interface is working perfectly with voice \
         recognition, typing animations, theme switching, and all visual effects. Once you add \
         a valid Google API key, I'll provide intelligent, contextual responses to all your \
         questions."
            .to_string()
    } else if input.contains("voice") || input.contains("speak") {
        "I can hear you perfectly! The voice recognition system is working great. I can \
         process both text and voice inputs. Configure your Google API key to enable full \
         conversational AI responses."
            .to_string()
    } else {
        format!(
            "I received your message: \"{}\". I'm currently in demo mode due to API key \
             configuration issues. Please configure a valid Google API key to enable \
             intelligent responses!",
            user_message
        )
    }
}
