// Prompt template implementation - named `{placeholder}` substitution
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;

/// Error raised while formatting a prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    /// A placeholder named by the template received no value.
    #[error("missing value for prompt placeholder '{key}'")]
    MissingValue { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Immutable prompt template with named placeholders.
///
/// Placeholders are written `{name}` where `name` is an identifier. Literal
/// braces are escaped as `{{` and `}}`; a brace that opens no valid
/// placeholder is kept as text. Substituted values are inserted verbatim and
/// never scanned for placeholders themselves.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    source: &'static str,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Create a template from its source text
    pub fn new(source: &'static str) -> Self {
        Self {
            source,
            segments: parse(source),
        }
    }

    /// Get the raw template text
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Get template input variable names, in order of first appearance
    pub fn input_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.iter().any(|n| n == name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }

    /// Format template, failing if any placeholder has no value.
    /// Values whose key the template does not use are ignored.
    pub fn format<K, V>(&self, values: &HashMap<K, V>) -> Result<String, PromptError>
    where
        K: Borrow<str> + Hash + Eq,
        V: AsRef<str>,
    {
        let mut output = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Placeholder(name) => {
                    let value = values
                        .get(name.as_str())
                        .ok_or_else(|| PromptError::MissingValue { key: name.clone() })?;
                    output.push_str(value.as_ref());
                }
            }
        }
        Ok(output)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse(source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = source;

    while let Some(pos) = rest.find(['{', '}']) {
        literal.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            literal.push('{');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with("}}") {
            literal.push('}');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('{') {
            if let Some(end) = tail[1..].find('}') {
                let name = &tail[1..1 + end];
                if is_identifier(name) {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name.to_string()));
                    rest = &tail[end + 2..];
                    continue;
                }
            }
        }

        // Lone brace
        literal.push_str(&tail[..1]);
        rest = &tail[1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}
