// Legal assistant: prompt formatting plus one model call per request
use anyhow::{Context, Error};
use log::info;

use crate::law::LawText;
use crate::models::ChatModel;
use crate::prompt::{format_contract_analysis_prompt, format_conversational_prompt};

pub struct LegalAssistant {
    model: Box<dyn ChatModel>,
    law_text: LawText,
}

impl LegalAssistant {
    pub fn new(model: Box<dyn ChatModel>, law_text: LawText) -> Self {
        Self { model, law_text }
    }

    pub fn model(&self) -> &dyn ChatModel {
        self.model.as_ref()
    }

    pub fn law_text(&self) -> &LawText {
        &self.law_text
    }

    /// Answer a tenancy question given the rendered chat history.
    ///
    /// A formatting failure surfaces as [`crate::prompt::PromptError`];
    /// model failures carry the "Error processing query" context.
    pub async fn get_response(
        &self,
        user_query: &str,
        chat_history: &str,
    ) -> Result<String, Error> {
        let prompt =
            format_conversational_prompt(user_query, self.law_text.as_str(), chat_history)?;
        info!(
            "Answering query with {} ({} prompt bytes)",
            self.model.provider(),
            prompt.len()
        );
        self.model
            .complete(&prompt)
            .await
            .context("Error processing query")
    }

    /// Analyze a rental contract against the law text.
    pub async fn analyze_contract(&self, contract_text: &str) -> Result<String, Error> {
        let prompt = format_contract_analysis_prompt(contract_text, self.law_text.as_str())?;
        info!(
            "Analyzing contract with {} ({} prompt bytes)",
            self.model.provider(),
            prompt.len()
        );
        self.model
            .complete(&prompt)
            .await
            .context("Error analyzing contract")
    }
}
