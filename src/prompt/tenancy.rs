// Tenancy law prompts: conversational Q&A and rental contract analysis
use super::template::{PromptError, PromptTemplate};
use std::collections::HashMap;

/// Conversational template.
///
/// Placeholders: `{chat_history}`, `{user_query}`, `{law_text}`
pub const LEGAL_ASSISTANT_TEMPLATE: &str = r#"
You are a friendly and knowledgeable legal assistant specializing in Ontario Tenancy Law. Your responses should be natural, clear, and include specific law citations only when directly relevant.

CHAT HISTORY:
{chat_history}

USER QUERY:
{user_query}

RELEVANT LAW:
{law_text}
"#;

/// Contract analysis template.
///
/// Placeholders: `{law_text}`, `{contract_text}`
pub const CONTRACT_ANALYSIS_TEMPLATE: &str = r#"
You are an expert rental contract analyzer specializing in Ontario tenancy law. Your task is to analyze the provided rental contract and evaluate it against the Ontario Residential Tenancies Act and related Ontario tenancy law.

ANALYSIS REQUIREMENTS:
1. Compliance Check: Compare each clause against the tenancy law
2. Identify Issues: Flag any terms that violate or conflict with the law
3. Missing Elements: Note any required provisions that are missing
4. Recommendations: Suggest specific improvements or modifications

ANALYZE THE FOLLOWING ASPECTS:
- Rent terms and payment structure
- Notice periods
- Rights and obligations of both parties
- Security deposits and service charges
- Maintenance responsibilities
- Termination clauses
- Any unusual or concerning terms

REFERENCE LAW:
{law_text}

RENTAL CONTRACT TO ANALYZE:
{contract_text}

Please provide a comprehensive analysis with the following structure:

1. OVERALL ASSESSMENT
- Brief evaluation of the contract's compliance
- Quality score (1-10) with justification

2. COMPLIANT ELEMENTS
- List provisions that properly align with the law
- Note particularly well-crafted clauses

3. ISSUES AND VIOLATIONS
- Identify clauses that violate the law
- Explain why they're problematic
- Reference specific sections of the law

4. MISSING ELEMENTS
- List required provisions that are absent
- Explain why they're necessary

5. RECOMMENDATIONS
- Specific changes needed for compliance
- Suggested additional provisions
- Language improvements for clarity

6. RISK ASSESSMENT
- Potential legal vulnerabilities
- Enforceability concerns
- Protection gaps for either party
"#;

/// Section headings the analysis template asks the model to produce, in order.
pub const ANALYSIS_SECTIONS: [&str; 6] = [
    "OVERALL ASSESSMENT",
    "COMPLIANT ELEMENTS",
    "ISSUES AND VIOLATIONS",
    "MISSING ELEMENTS",
    "RECOMMENDATIONS",
    "RISK ASSESSMENT",
];

/// Build the prompt for a conversational question.
pub fn format_conversational_prompt(
    user_query: &str,
    law_text: &str,
    chat_history: &str,
) -> Result<String, PromptError> {
    let mut values = HashMap::new();
    values.insert("user_query", user_query);
    values.insert("law_text", law_text);
    values.insert("chat_history", chat_history);
    PromptTemplate::new(LEGAL_ASSISTANT_TEMPLATE).format(&values)
}

/// Build the prompt for a rental contract compliance analysis.
pub fn format_contract_analysis_prompt(
    contract_text: &str,
    law_text: &str,
) -> Result<String, PromptError> {
    let mut values = HashMap::new();
    values.insert("contract_text", contract_text);
    values.insert("law_text", law_text);
    PromptTemplate::new(CONTRACT_ANALYSIS_TEMPLATE).format(&values)
}
