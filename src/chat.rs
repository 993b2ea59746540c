// Interactive chat session over any line-oriented input
use std::io::Write;

use anyhow::Error;
use log::error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::assistant::LegalAssistant;
use crate::history::ChatHistory;
use crate::prompt::PromptError;

/// Result of handling one line of chat input.
#[derive(Debug)]
pub enum ChatOutcome {
    /// Blank line, nothing sent
    Ignored,
    Cleared,
    Exit,
    Answer(String),
    /// The provider call failed; the session can go on
    Failed(Error),
}

/// Chat state kept between questions.
#[derive(Debug, Default)]
pub struct ChatSession {
    history: ChatHistory,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// Handle one input line. `/clear` resets the history, `/exit` and
    /// `/quit` end the session, anything else is asked as a question.
    ///
    /// A [`PromptError`] is returned as `Err`; provider failures come back
    /// as [`ChatOutcome::Failed`].
    pub async fn handle_line(
        &mut self,
        assistant: &LegalAssistant,
        line: &str,
    ) -> Result<ChatOutcome, Error> {
        let input = line.trim();
        match input {
            "" => return Ok(ChatOutcome::Ignored),
            "/exit" | "/quit" => return Ok(ChatOutcome::Exit),
            "/clear" => {
                self.history.clear();
                return Ok(ChatOutcome::Cleared);
            }
            _ => {}
        }

        // Rendered before the question is pushed: the history holds earlier turns
        // only and the question appears once, under USER QUERY
        let chat_history = self.history.render();
        self.history.push_user(input);

        match assistant.get_response(input, &chat_history).await {
            Ok(answer) => {
                self.history.push_assistant(answer.clone());
                Ok(ChatOutcome::Answer(answer))
            }
            Err(e) if e.downcast_ref::<PromptError>().is_some() => Err(e),
            Err(e) => Ok(ChatOutcome::Failed(e)),
        }
    }

    /// Read lines until `/exit`, `/quit` or end of input, writing answers
    /// and provider errors to `out`.
    pub async fn run<R, W>(
        &mut self,
        assistant: &LegalAssistant,
        input: R,
        mut out: W,
    ) -> Result<(), Error>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            match self.handle_line(assistant, &line).await? {
                ChatOutcome::Ignored => {}
                ChatOutcome::Exit => break,
                ChatOutcome::Cleared => writeln!(out, "Chat history cleared.\n")?,
                ChatOutcome::Answer(answer) => writeln!(out, "\n{}\n", answer)?,
                ChatOutcome::Failed(e) => {
                    error!("{:#}", e);
                    writeln!(out, "Error: {:#}\n", e)?;
                }
            }
        }
        Ok(())
    }
}
