//! Chat-completions translation backend.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. The system
//! message teaches the model the four snippet opcodes and the callable
//! functions; the user message is the JSON list of statements; the reply must
//! be a JSON array of `{id, exec}` objects.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use ureq::{Agent, AgentBuilder};

use crate::{
    BridgeError, FunctionSignature, TranslatedStatement, TranslationRequest, TranslationResponse,
    Translator,
};

const PROMPT_HEADER: &str = "\
You translate instructions for a robotic arm into HOIL host snippets.

Each instruction arrives as a JSON object {\"id\": <number>, \"stmt\": <text>}.
Answer with a JSON array of objects {\"id\": <same id>, \"exec\": <snippet>} and
nothing else. A snippet is one opcode per line, using only:

  decl <name> [<expr>]      declare a variable, optionally initialised
  assign <name> <expr>      write a variable (or #[<name>,<index>] element)
  read <name>               read a variable; its value is the result
  call <fn> [<arg>,<arg>]   call one of the functions listed below

Expressions are postfix, items separated by ';':
  %x%  variable      \"text\"  string      1.5  number     true/false
  (fn,arg,arg)  nested call whose result is pushed
  #[%arr%,0]    array element
  + - * / % == != > >= < <= && || !   operators, [ negates

Example: \"raise the gripper by ten centimetres\" becomes
  call MoveBy 0,0,0.1

Functions you may call:
";

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

pub struct ChatTranslator {
    agent: Agent,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl ChatTranslator {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        ChatTranslator {
            agent: AgentBuilder::new().timeout(timeout).build(),
            endpoint: endpoint.into(),
            api_key: None,
            model: model.into(),
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

/// System prompt listing the callable functions.
pub(crate) fn system_prompt(functions: &[FunctionSignature]) -> String {
    let mut prompt = String::from(PROMPT_HEADER);
    for function in functions {
        let _ = writeln!(prompt, "  {}({})", function.name, function.params.join(", "));
    }
    prompt
}

/// Parse the model's reply, tolerating a fenced code block around it.
pub(crate) fn parse_reply(content: &str) -> Result<Vec<TranslatedStatement>, BridgeError> {
    let mut body = content.trim();
    if let Some(rest) = body.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        body = rest.strip_suffix("```").unwrap_or(rest).trim();
    }
    serde_json::from_str(body).map_err(|err| {
        BridgeError::Protocol(format!("reply is not a JSON array of {{id, exec}}: {err}"))
    })
}

impl Translator for ChatTranslator {
    #[tracing::instrument(level = "debug", skip_all, fields(model = %self.model, statements = request.statements.len()))]
    fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, BridgeError> {
        let body = json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": system_prompt(&request.functions) },
                { "role": "user", "content": serde_json::to_string(&request.statements)? },
            ],
        });

        let mut call = self.agent.post(&self.endpoint);
        if let Some(key) = &self.api_key {
            call = call.set("Authorization", &format!("Bearer {key}"));
        }
        let completion: ChatCompletion = call
            .send_json(body)?
            .into_json()
            .map_err(|err| BridgeError::Protocol(err.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| BridgeError::Protocol("completion has no choices".to_owned()))?;
        tracing::debug!(reply = %content, "translation reply");

        Ok(TranslationResponse {
            results: parse_reply(&content)?,
        })
    }
}
