//! Persona context: who the assistant speaks as, and what it knows.
//!
//! The context is loaded once at startup (see the agent crate's context
//! loader) and is immutable afterwards. The system prompt is rendered from it
//! on every request; rendering is a pure function of the context.

use serde::{Deserialize, Serialize};

/// Default persona name when none is configured.
pub const DEFAULT_PERSONA_NAME: &str = "Hau Vo";

/// Background material used to ground the assistant's answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaContext {
    /// The person the assistant represents
    pub name: String,

    /// Plain text extracted from the résumé / profile document
    #[serde(default)]
    pub resume: String,

    /// Free-text summary written by the person
    #[serde(default)]
    pub summary: String,
}

impl PersonaContext {
    /// A persona with no background material.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resume: String::new(),
            summary: String::new(),
        }
    }

    /// Attach the résumé text.
    pub fn with_resume(mut self, resume: impl Into<String>) -> Self {
        self.resume = resume.into();
        self
    }

    /// Attach the summary text.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Whether any background material was loaded.
    pub fn has_background(&self) -> bool {
        !self.resume.trim().is_empty() || !self.summary.trim().is_empty()
    }

    /// Render the system prompt for this persona.
    ///
    /// Empty background sections are left out entirely.
    pub fn system_prompt(&self) -> String {
        let name = &self.name;
        let mut prompt = String::with_capacity(2048 + self.resume.len() + self.summary.len());

        prompt.push_str(&format!(
            "You are acting as {name}. You are answering questions on {name}'s website, \
             particularly questions related to {name}'s career, background, skills and experience. \
             Your responsibility is to represent {name} for interactions on the website as faithfully as possible. \
             You are given a summary of {name}'s background and profile which you can use to answer questions. \
             Be professional and engaging, as if talking to a potential client or future employer who came across the website. \
             If you don't know the answer to any question, use your record_unknown_question tool to record the question \
             that you couldn't answer, even if it's about something trivial or unrelated to career. \
             If the user is engaging in discussion, try to steer them towards getting in touch via email; \
             ask for their email and record it using your record_user_details tool."
        ));

        if !self.summary.trim().is_empty() {
            prompt.push_str("\n\n## Summary:\n");
            prompt.push_str(self.summary.trim());
        }

        if !self.resume.trim().is_empty() {
            prompt.push_str("\n\n## Profile:\n");
            prompt.push_str(self.resume.trim());
        }

        prompt.push_str(&format!(
            "\n\nWith this context, please chat with the user, always staying in character as {name}."
        ));

        prompt
    }
}

impl Default for PersonaContext {
    fn default() -> Self {
        Self::new(DEFAULT_PERSONA_NAME)
    }
}
