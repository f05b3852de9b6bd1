//! Run Turn use case: one user input in, one response out.
//!
//! ```text
//! input ─▶ dev command? ─▶ memory context ─▶ model ─▶ tool calls ─▶ memory update ─▶ response
//! ```
//!
//! Tool calls are obtained natively (structured tool use, bounded by
//! `max_tool_rounds`) or by parsing `TOOL_CALL:` lines from plain text,
//! depending on what the selected model supports. A declined destructive
//! command ends the turn as [`TurnOutcome::Cancelled`] and leaves memory
//! untouched.

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::TurnProgress;
use crate::use_cases::dispatch::ToolDispatcher;
use crate::use_cases::memory::MemoryManager;
use lmagent_domain::dev::{
    ContextStats, DevCommand, SessionSummary, SessionTracker, TokenSummary, estimate_tokens,
};
use lmagent_domain::memory::{MemoryError, MemoryStats};
use lmagent_domain::tool::{
    contains_tool_invocation, parse_tool_invocations, tool_catalogue_prompt,
};
use lmagent_domain::{ChatMessage, ToolCall, ToolCallingMode, ToolDefinition, ToolResult};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Text returned when the model produced nothing visible
pub const EMPTY_RESPONSE: &str = "No response generated";

#[derive(Error, Debug)]
pub enum RunTurnError {
    #[error("{0}")]
    Gateway(#[from] GatewayError),

    #[error("{0}")]
    Memory(#[from] MemoryError),
}

/// How a turn ended
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The agent answered; memory has been updated
    Responded(String),
    /// The user declined a destructive command
    Cancelled,
    /// A development-mode command was handled locally
    Dev(DevReport),
}

/// Result of a `!` command
#[derive(Debug, Clone, PartialEq)]
pub enum DevReport {
    Tokens(TokenSummary),
    Memory {
        stats: MemoryStats,
        short_term_tokens: usize,
        long_term_tokens: usize,
    },
    Stats(SessionSummary),
    Cleared,
    Forgotten,
    Help,
    Unknown(String),
}

/// Either the collected text or a cancellation
enum Collected {
    Text(String),
    Cancelled,
}

pub struct RunTurnUseCase {
    gateway: Arc<dyn LlmGateway>,
    dispatcher: ToolDispatcher,
    memory: MemoryManager,
    tracker: SessionTracker,
    logger: Arc<dyn ConversationLogger>,
    progress: Arc<dyn TurnProgress>,
    model: String,
    mode: ToolCallingMode,
    system_prompt: String,
    params: ExecutionParams,
}

impl RunTurnUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        dispatcher: ToolDispatcher,
        memory: MemoryManager,
        logger: Arc<dyn ConversationLogger>,
        progress: Arc<dyn TurnProgress>,
        model: impl Into<String>,
        mode: ToolCallingMode,
        system_prompt: impl Into<String>,
        params: ExecutionParams,
    ) -> Self {
        Self {
            gateway,
            dispatcher,
            memory,
            tracker: SessionTracker::new(),
            logger,
            progress,
            model: model.into(),
            mode,
            system_prompt: system_prompt.into(),
            params,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn mode(&self) -> ToolCallingMode {
        self.mode
    }

    pub fn dev_mode(&self) -> bool {
        self.params.dev_mode
    }

    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.dispatcher
            .tool_spec()
            .names()
            .map(str::to_string)
            .collect()
    }

    /// Wind down after `process` was dropped because the user interrupted.
    ///
    /// Memory is left untouched, as for a cancelled turn.
    pub fn interrupted(&self, input: &str) {
        self.progress.on_interrupted();
        info!("Turn interrupted by user");
        self.logger
            .log(ConversationEvent::new("turn_interrupted", json!({ "input": input })));
    }

    /// Process one line of user input.
    pub async fn process(&mut self, input: &str) -> Result<TurnOutcome, RunTurnError> {
        if self.params.dev_mode
            && let Some(command) = DevCommand::parse(input)
        {
            debug!(?command, "Handling dev command");
            return Ok(TurnOutcome::Dev(self.handle_dev_command(command)?));
        }

        self.logger
            .log(ConversationEvent::new("user_input", json!({ "text": input })));

        let memory_context = self.memory.context();
        let prompt = if memory_context.is_empty() {
            input.to_string()
        } else {
            format!("{}\n{}", input, memory_context)
        };
        self.tracker.record_request(ContextStats::analyze(
            input,
            &memory_context,
            self.memory.short_term(),
            self.memory.long_term(),
        ));

        let collected = match self.mode {
            ToolCallingMode::Native => self.run_native(&prompt).await?,
            ToolCallingMode::PromptBased => self.run_prompt_based(&prompt).await?,
        };

        let text = match collected {
            Collected::Cancelled => {
                info!("Turn cancelled by user");
                self.logger
                    .log(ConversationEvent::new("turn_cancelled", json!({ "input": input })));
                return Ok(TurnOutcome::Cancelled);
            }
            Collected::Text(text) if text.trim().is_empty() => EMPTY_RESPONSE.to_string(),
            Collected::Text(text) => text,
        };

        self.memory.update(input, &text)?;
        self.logger
            .log(ConversationEvent::new("agent_response", json!({ "text": text })));
        Ok(TurnOutcome::Responded(text))
    }

    /// Structured tool calling, at most `max_tool_rounds` model requests.
    async fn run_native(&mut self, prompt: &str) -> Result<Collected, GatewayError> {
        let tools: Vec<ToolDefinition> = self.dispatcher.tool_spec().all().cloned().collect();
        let mut messages = vec![
            ChatMessage::system(&self.system_prompt),
            ChatMessage::user(prompt),
        ];
        let mut fragments: Vec<String> = Vec::new();

        for round in 1..=self.params.max_tool_rounds {
            debug!(round, "Native tool round");
            let response = self.ask_model(&messages, &tools).await?;
            let assistant = ChatMessage::from_response(&response);
            fragments.extend(assistant.visible_text());
            messages.push(assistant);

            if !response.has_tool_calls() {
                break;
            }
            for call in response.tool_calls() {
                let result = self.dispatch(&call).await;
                if result.is_cancelled() {
                    return Ok(Collected::Cancelled);
                }
                let message =
                    ChatMessage::tool_result(call.id.clone().unwrap_or_default(), result.display_text());
                fragments.extend(message.visible_text());
                messages.push(message);
            }
            if round == self.params.max_tool_rounds {
                warn!(rounds = round, "Tool round limit reached");
            }
        }

        Ok(Collected::Text(fragments.join("\n")))
    }

    /// One plain request; `TOOL_CALL:` lines in the answer are executed.
    async fn run_prompt_based(&mut self, prompt: &str) -> Result<Collected, GatewayError> {
        let system = format!(
            "{}\n\n{}",
            self.system_prompt,
            tool_catalogue_prompt(self.dispatcher.tool_spec())
        );
        let messages = vec![ChatMessage::system(system), ChatMessage::user(prompt)];
        let response = self.ask_model(&messages, &[]).await?;
        let text = response.text_content();
        if !contains_tool_invocation(&text) {
            return Ok(Collected::Text(text));
        }

        let parsed = parse_tool_invocations(&text);
        if !parsed.has_invocations() {
            return Ok(Collected::Text(text));
        }

        let mut parts = Vec::new();
        if !parsed.narrative.trim().is_empty() {
            parts.push(parsed.narrative.clone());
        }
        for call in &parsed.invocations {
            let result = self.dispatch(call).await;
            if result.is_cancelled() {
                return Ok(Collected::Cancelled);
            }
            parts.push(ToolDispatcher::fragment(call, &result));
        }
        Ok(Collected::Text(parts.join("\n\n")))
    }

    async fn ask_model(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<lmagent_domain::LlmResponse, GatewayError> {
        self.progress.on_thinking();
        let response = self.gateway.chat(&self.model, messages, tools).await;
        self.progress.on_model_response();
        response
    }

    async fn dispatch(&mut self, call: &ToolCall) -> ToolResult {
        let result = self.dispatcher.invoke(call, self.progress.as_ref()).await;
        let error = result.error().map(|e| e.message.clone());
        self.tracker
            .record_tool_call(call, result.output().unwrap_or_default(), error.as_deref());
        result
    }

    fn handle_dev_command(&mut self, command: DevCommand) -> Result<DevReport, MemoryError> {
        Ok(match command {
            DevCommand::Tokens => DevReport::Tokens(self.tracker.token_summary()),
            DevCommand::Memory => {
                let long_term = self.memory.long_term();
                DevReport::Memory {
                    stats: self.memory.stats(),
                    short_term_tokens: estimate_tokens(self.memory.short_term().as_str()),
                    long_term_tokens: if long_term.is_empty() {
                        0
                    } else {
                        estimate_tokens(&long_term.to_compact_json())
                    },
                }
            }
            DevCommand::Stats => DevReport::Stats(self.tracker.session_summary()),
            DevCommand::Clear => {
                self.memory.clear_short_term();
                DevReport::Cleared
            }
            DevCommand::Forget => {
                self.memory.clear_long_term()?;
                DevReport::Forgotten
            }
            DevCommand::Help => DevReport::Help,
            DevCommand::Unknown(text) => DevReport::Unknown(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::conversation_logger::NoConversationLogger;
    use crate::ports::progress::NoTurnProgress;
    use crate::use_cases::dispatch::tests::{RecordingExecutor, RecordingLogger};
    use crate::use_cases::memory::tests::InMemoryStore;
    use async_trait::async_trait;
    use lmagent_domain::agent::default_tools;
    use lmagent_domain::tool::entities::ToolSpec;
    use lmagent_domain::{ContentBlock, LlmResponse, MessageContent, ModelRecord, StopReason};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Gateway double replaying scripted responses and recording requests.
    struct ScriptedGateway {
        responses: Mutex<Vec<LlmResponse>>,
        requests: Mutex<Vec<(Vec<ChatMessage>, usize)>>,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<LlmResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn chat(
            &self,
            _model: &str,
            messages: &[ChatMessage],
            tools: &[ToolDefinition],
        ) -> Result<LlmResponse, GatewayError> {
            self.requests
                .lock()
                .unwrap()
                .push((messages.to_vec(), tools.len()));
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| GatewayError::RequestFailed("no scripted response".to_string()))
        }

        async fn list_models(&self) -> Result<Vec<ModelRecord>, GatewayError> {
            Ok(Vec::new())
        }
    }

    fn tool_use(id: &str, name: &str, args: &[(&str, &str)]) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input: args
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn tool_response(blocks: Vec<ContentBlock>) -> LlmResponse {
        LlmResponse {
            content: blocks,
            stop_reason: Some(StopReason::ToolUse),
            model: None,
        }
    }

    struct Harness {
        gateway: Arc<ScriptedGateway>,
        executor: Arc<RecordingExecutor>,
        logger: Arc<RecordingLogger>,
        use_case: RunTurnUseCase,
    }

    fn harness(mode: ToolCallingMode, responses: Vec<LlmResponse>, dev_mode: bool) -> Harness {
        harness_with(RecordingExecutor::new(), mode, responses, dev_mode)
    }

    /// Executor advertising the configured default tool set
    fn default_tools_executor() -> RecordingExecutor {
        let spec = default_tools().iter().fold(ToolSpec::new(), |spec, entry| {
            spec.register(ToolDefinition::new(&entry.name, &entry.description))
        });
        RecordingExecutor::with_spec(spec)
    }

    fn harness_with(
        executor: RecordingExecutor,
        mode: ToolCallingMode,
        responses: Vec<LlmResponse>,
        dev_mode: bool,
    ) -> Harness {
        let gateway = Arc::new(ScriptedGateway::new(responses));
        let executor = Arc::new(executor);
        let logger = Arc::new(RecordingLogger::default());
        let memory = MemoryManager::load(1000, Arc::new(InMemoryStore::default())).unwrap();
        let use_case = RunTurnUseCase::new(
            gateway.clone(),
            ToolDispatcher::new(executor.clone(), Arc::new(NoConversationLogger)),
            memory,
            logger.clone(),
            Arc::new(NoTurnProgress),
            "test-model",
            mode,
            "You are a test agent.",
            ExecutionParams::default().with_dev_mode(dev_mode),
        );
        Harness {
            gateway,
            executor,
            logger,
            use_case,
        }
    }

    #[tokio::test]
    async fn test_plain_response_updates_memory_once() {
        let mut h = harness_with(
            default_tools_executor(),
            ToolCallingMode::PromptBased,
            vec![LlmResponse::from_text("Hi! How can I help?")],
            false,
        );

        let outcome = h.use_case.process("Hello").await.unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::Responded("Hi! How can I help?".to_string())
        );
        let transcript = h.use_case.memory().short_term().as_str();
        assert_eq!(transcript.matches("User: ").count(), 1);
        assert_eq!(transcript.matches("Agent: ").count(), 1);
        assert_eq!(transcript, "\nUser: Hello\nAgent: Hi! How can I help?");

        // the catalogue sent to the model lists every default tool
        let requests = h.gateway.requests.lock().unwrap();
        let MessageContent::Text(system) = &requests[0].0[0].content else {
            panic!("expected a text system prompt");
        };
        for entry in default_tools() {
            assert!(system.contains(&entry.name), "missing {}", entry.name);
        }
        assert!(h.executor.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_context_is_appended_to_prompt() {
        let mut h = harness(
            ToolCallingMode::PromptBased,
            vec![LlmResponse::from_text("one"), LlmResponse::from_text("two")],
            false,
        );
        h.use_case.process("first").await.unwrap();
        h.use_case.process("second").await.unwrap();

        let requests = h.gateway.requests.lock().unwrap();
        let user_message = &requests[1].0[1];
        match &user_message.content {
            MessageContent::Text(text) => {
                assert!(text.starts_with("second\nRecent conversation: "));
            }
            other => panic!("unexpected content {:?}", other),
        }
        // prompt-based mode sends no tool schema but embeds the catalogue
        assert_eq!(requests[0].1, 0);
        match &requests[0].0[0].content {
            MessageContent::Text(system) => assert!(system.contains("TOOL_CALL:")),
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_response_placeholder() {
        let mut h = harness(
            ToolCallingMode::PromptBased,
            vec![LlmResponse::from_text("   ")],
            false,
        );
        let outcome = h.use_case.process("Hello").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Responded(EMPTY_RESPONSE.to_string()));
    }

    #[tokio::test]
    async fn test_prompt_based_tool_calls() {
        let mut h = harness(
            ToolCallingMode::PromptBased,
            vec![LlmResponse::from_text(
                "Let me check.\nTOOL_CALL: list_files(path=\"/a/b\")\nTOOL_CALL: teleport(to=\"mars\")",
            )],
            false,
        );

        let outcome = h.use_case.process("what is in /a/b?").await.unwrap();
        let TurnOutcome::Responded(text) = outcome else {
            panic!("expected a response");
        };

        assert!(text.starts_with("Let me check."));
        assert!(text.contains(r#"[list_files] ran list_files(path="/a/b")"#));
        assert!(text.contains("Unknown tool: teleport"));
        assert_eq!(h.executor.calls.lock().unwrap().len(), 1);
        assert_eq!(h.use_case.tracker().tool_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_prompt_based_cancellation_skips_memory() {
        let mut h = harness(
            ToolCallingMode::PromptBased,
            vec![LlmResponse::from_text(
                "TOOL_CALL: terminal(command=\"rm -rf build\")",
            )],
            false,
        );

        let outcome = h.use_case.process("clean up").await.unwrap();

        assert_eq!(outcome, TurnOutcome::Cancelled);
        assert!(h.use_case.memory().short_term().is_empty());
        let events = h.logger.events.lock().unwrap();
        assert!(events.iter().any(|(kind, _)| *kind == "turn_cancelled"));
    }

    #[tokio::test]
    async fn test_native_round_trip() {
        let mut h = harness(
            ToolCallingMode::Native,
            vec![
                tool_response(vec![
                    ContentBlock::text("Looking."),
                    tool_use("call_1", "list_files", &[("path", "/tmp")]),
                ]),
                LlmResponse::from_text("There are two files."),
            ],
            false,
        );

        let outcome = h.use_case.process("list /tmp").await.unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::Responded("Looking.\nThere are two files.".to_string())
        );
        let requests = h.gateway.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].1, 2);
        // second request carries the assistant tool request and the tool result
        let last = requests[1].0.last().unwrap();
        assert_eq!(last.role, lmagent_domain::Role::Tool);
    }

    #[tokio::test]
    async fn test_native_rounds_are_bounded() {
        let looping = || tool_response(vec![tool_use("c", "list_files", &[("path", ".")])]);
        let mut h = harness(
            ToolCallingMode::Native,
            vec![looping(), looping(), looping(), looping(), looping()],
            false,
        );

        let outcome = h.use_case.process("loop forever").await.unwrap();

        assert_eq!(h.gateway.request_count(), 3);
        assert_eq!(outcome, TurnOutcome::Responded(EMPTY_RESPONSE.to_string()));
    }

    #[tokio::test]
    async fn test_native_cancellation() {
        let mut h = harness(
            ToolCallingMode::Native,
            vec![tool_response(vec![tool_use(
                "c",
                "terminal",
                &[("command", "rm notes.txt")],
            )])],
            false,
        );

        assert_eq!(h.use_case.process("delete notes").await.unwrap(), TurnOutcome::Cancelled);
        assert_eq!(h.gateway.request_count(), 1);
    }

    #[tokio::test]
    async fn test_interrupted_turn_is_logged_without_memory() {
        let h = harness(ToolCallingMode::PromptBased, vec![], false);
        h.use_case.interrupted("run the build");

        assert!(h.use_case.memory().short_term().is_empty());
        let events = h.logger.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "turn_interrupted");
        assert_eq!(events[0].1["input"], "run the build");
    }

    #[tokio::test]
    async fn test_gateway_error_is_reported() {
        let mut h = harness(ToolCallingMode::PromptBased, vec![], false);
        let err = h.use_case.process("Hello").await.unwrap_err();
        assert!(matches!(err, RunTurnError::Gateway(_)));
        assert!(h.use_case.memory().short_term().is_empty());
    }

    #[tokio::test]
    async fn test_dev_commands() {
        let mut h = harness(
            ToolCallingMode::PromptBased,
            vec![LlmResponse::from_text("hello")],
            true,
        );
        h.use_case.process("hi").await.unwrap();

        match h.use_case.process("!tokens").await.unwrap() {
            TurnOutcome::Dev(DevReport::Tokens(summary)) => assert_eq!(summary.total_requests, 1),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            h.use_case.process("!memory").await.unwrap(),
            TurnOutcome::Dev(DevReport::Memory { .. })
        ));
        assert_eq!(
            h.use_case.process("!clear").await.unwrap(),
            TurnOutcome::Dev(DevReport::Cleared)
        );
        assert!(h.use_case.memory().short_term().is_empty());
        assert_eq!(
            h.use_case.process("!bogus").await.unwrap(),
            TurnOutcome::Dev(DevReport::Unknown("!bogus".to_string()))
        );
        // only the first input reached the model
        assert_eq!(h.gateway.request_count(), 1);
    }

    #[tokio::test]
    async fn test_forget_drops_long_term_facts() {
        let mut h = harness(
            ToolCallingMode::PromptBased,
            vec![LlmResponse::from_text("Nice to meet you, Dana")],
            true,
        );
        h.use_case.process("my name is dana").await.unwrap();
        assert!(!h.use_case.memory().long_term().is_empty());
        assert!(h.use_case.memory().stats().file_exists);

        assert_eq!(
            h.use_case.process("!forget").await.unwrap(),
            TurnOutcome::Dev(DevReport::Forgotten)
        );
        assert!(h.use_case.memory().long_term().is_empty());
        assert!(!h.use_case.memory().stats().file_exists);
        // the exchange itself stays in short-term memory
        assert!(!h.use_case.memory().short_term().is_empty());
    }

    #[tokio::test]
    async fn test_dev_commands_pass_through_when_disabled() {
        let mut h = harness(
            ToolCallingMode::PromptBased,
            vec![LlmResponse::from_text("I don't know that command")],
            false,
        );
        let outcome = h.use_case.process("!tokens").await.unwrap();
        assert!(matches!(outcome, TurnOutcome::Responded(_)));
        assert_eq!(h.gateway.request_count(), 1);
    }
}
