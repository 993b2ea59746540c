// Prompt module definition
mod template;
mod tenancy;

// Re-export module content
pub use template::{PromptError, PromptTemplate};
pub use tenancy::{
    format_contract_analysis_prompt, format_conversational_prompt, ANALYSIS_SECTIONS,
    CONTRACT_ANALYSIS_TEMPLATE, LEGAL_ASSISTANT_TEMPLATE,
};
