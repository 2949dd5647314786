//! Execute Pipeline use case
//!
//! The sequential crew executor. Each stage gets a fresh session whose system
//! prompt describes the assigned role; the role answers with a final answer
//! or with `tool` / `delegate` blocks that are resolved and fed back.
//!
//! ```text
//! stage ──► session.send(prompt) ──► directives? ──no──► final answer
//!                ▲                        │
//!                │                       yes
//!                │                        ▼
//!                └──── observations ◄── tool / coworker
//! ```
//!
//! A coworker answers a delegated question in its own session and may use
//! its own tools, but cannot delegate again. An answer holding an unreadable
//! block is never final; the role is asked to resend it.
//!
//! Every conversation event of one `kickoff` carries the same `run_id`.

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use crate::ports::pipeline_executor::{ExecutorError, PipelineExecutor};
use crate::ports::progress::ProgressNotifier;
use crate::ports::tool_executor::ToolExecutorPort;
use async_trait::async_trait;
use health_crew_domain::core::string::truncate;
use health_crew_domain::{
    CrewPromptTemplate, Delegation, Directive, Model, Pipeline, PipelineOutput, RoleConfig,
    RoleKind, StageKind, StageOutput, ToolCall, ToolDefinition, ToolError, ToolResult,
    clean_final_answer, parse_directives,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Who is speaking, and for which stage
#[derive(Clone, Copy)]
struct TurnContext<'a> {
    run_id: &'a str,
    pipeline: &'a Pipeline,
    role: &'a RoleConfig,
    stage: StageKind,
}

/// What one role produced while working on a stage
#[derive(Debug, Default)]
struct RoleRun {
    answer: String,
    tool_calls: usize,
    delegations: Vec<RoleKind>,
}

/// Sequential pipeline executor backed by an [`LlmGateway`]
pub struct ExecutePipelineUseCase<G, T>
where
    G: LlmGateway + ?Sized + 'static,
    T: ToolExecutorPort + ?Sized + 'static,
{
    gateway: Arc<G>,
    tool_executor: Arc<T>,
    model: Model,
    params: ExecutionParams,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G, T> ExecutePipelineUseCase<G, T>
where
    G: LlmGateway + ?Sized + 'static,
    T: ToolExecutorPort + ?Sized + 'static,
{
    pub fn new(gateway: Arc<G>, tool_executor: Arc<T>, model: Model) -> Self {
        Self {
            gateway,
            tool_executor,
            model,
            params: ExecutionParams::default(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    fn log(&self, run_id: &str, event_type: &'static str, payload: serde_json::Value) {
        self.conversation_logger
            .log(ConversationEvent::new(event_type, payload).with_run_id(run_id));
    }

    /// Tools offered by the executor that `role` holds the capability for.
    fn tools_for(&self, role: &RoleConfig) -> Vec<&ToolDefinition> {
        let mut tools: Vec<_> = self
            .tool_executor
            .tool_spec()
            .all()
            .filter(|t| role.can_use_tool(&t.name))
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    async fn run_stage(
        &self,
        ctx: TurnContext<'_>,
        prompt: String,
        progress: &dyn ProgressNotifier,
    ) -> Result<RoleRun, GatewayError> {
        let tools = self.tools_for(ctx.role);
        let coworkers: Vec<&RoleConfig> = if ctx.role.allow_delegation() {
            ctx.pipeline.coworkers_of(ctx.role.kind()).collect()
        } else {
            Vec::new()
        };
        let system_prompt = CrewPromptTemplate::role_system(
            ctx.role,
            &tools,
            &coworkers,
            ctx.pipeline.client_profile(),
        );

        let session = self
            .gateway
            .create_session_with_system_prompt(&self.model, &system_prompt)
            .await?;

        let mut run = RoleRun::default();
        let mut prompt = prompt;

        for turn in 1..=self.params.max_turns_per_stage {
            let response = self.send(session.as_ref(), ctx, &prompt).await?;
            let directives = parse_directives(&response);
            if directives.is_empty() {
                debug!(stage = %ctx.stage, turn, "Final answer received");
                run.answer = clean_final_answer(&response);
                return Ok(run);
            }

            let mut observations = Vec::with_capacity(directives.len());
            for directive in directives {
                let observation = match directive {
                    Directive::Tool(call) => self.observe_tool(ctx, &call, progress, &mut run).await,
                    Directive::Delegate(delegation) => {
                        self.delegate(ctx, &delegation, progress, &mut run).await?
                    }
                    Directive::Invalid(reason) => self.reject_directive(ctx, &reason),
                };
                observations.push(observation);
            }
            prompt = observations.join("\n\n");
        }

        run.answer = self.force_final_answer(session.as_ref(), ctx).await?;
        Ok(run)
    }

    /// Answer a delegated question as `ctx.role`, without further delegation.
    async fn run_coworker(
        &self,
        ctx: TurnContext<'_>,
        prompt: String,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, GatewayError> {
        let tools = self.tools_for(ctx.role);
        let system_prompt =
            CrewPromptTemplate::role_system(ctx.role, &tools, &[], ctx.pipeline.client_profile());
        let session = self
            .gateway
            .create_session_with_system_prompt(&self.model, &system_prompt)
            .await?;

        // Tool calls made by a coworker are not counted against the stage.
        let mut run = RoleRun::default();
        let mut prompt = prompt;

        for _ in 0..self.params.max_turns_per_stage {
            let response = self.send(session.as_ref(), ctx, &prompt).await?;
            let directives = parse_directives(&response);
            if directives.is_empty() {
                return Ok(clean_final_answer(&response));
            }

            let mut observations = Vec::with_capacity(directives.len());
            for directive in directives {
                let observation = match directive {
                    Directive::Tool(call) => self.observe_tool(ctx, &call, progress, &mut run).await,
                    Directive::Delegate(delegation) => CrewPromptTemplate::delegation_refused(
                        &delegation.coworker,
                        "You are answering a coworker's question and cannot delegate it further.",
                    ),
                    Directive::Invalid(reason) => self.reject_directive(ctx, &reason),
                };
                observations.push(observation);
            }
            prompt = observations.join("\n\n");
        }

        self.force_final_answer(session.as_ref(), ctx).await
    }

    async fn send(
        &self,
        session: &dyn LlmSession,
        ctx: TurnContext<'_>,
        prompt: &str,
    ) -> Result<String, GatewayError> {
        self.log(
            ctx.run_id,
            "llm_prompt",
            json!({
                "stage": ctx.stage.as_str(),
                "role": ctx.role.role(),
                "prompt": prompt,
            }),
        );

        let start = Instant::now();
        let response = session.send(prompt).await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        debug!(
            stage = %ctx.stage,
            role = ctx.role.role(),
            duration_ms,
            "Response: {}",
            truncate(&response, 200)
        );
        self.log(
            ctx.run_id,
            "llm_response",
            json!({
                "stage": ctx.stage.as_str(),
                "role": ctx.role.role(),
                "model": session.model().to_string(),
                "response": response,
                "duration_ms": duration_ms,
            }),
        );
        Ok(response)
    }

    async fn force_final_answer(
        &self,
        session: &dyn LlmSession,
        ctx: TurnContext<'_>,
    ) -> Result<String, GatewayError> {
        warn!(
            stage = %ctx.stage,
            role = ctx.role.role(),
            max_turns = self.params.max_turns_per_stage,
            "Turn budget exhausted, asking for a final answer"
        );
        let response = self
            .send(session, ctx, CrewPromptTemplate::final_answer_nudge())
            .await?;
        Ok(clean_final_answer(&response))
    }

    fn reject_directive(&self, ctx: TurnContext<'_>, reason: &str) -> String {
        warn!(
            stage = %ctx.stage,
            role = ctx.role.role(),
            "Unreadable directive: {}",
            reason
        );
        self.log(
            ctx.run_id,
            "invalid_directive",
            json!({
                "stage": ctx.stage.as_str(),
                "role": ctx.role.role(),
                "reason": reason,
            }),
        );
        CrewPromptTemplate::invalid_directive(reason)
    }

    async fn observe_tool(
        &self,
        ctx: TurnContext<'_>,
        call: &ToolCall,
        progress: &dyn ProgressNotifier,
        run: &mut RoleRun,
    ) -> String {
        run.tool_calls += 1;
        self.log(
            ctx.run_id,
            "tool_call",
            json!({
                "stage": ctx.stage.as_str(),
                "role": ctx.role.role(),
                "tool": call.tool_name,
                "args": call.arguments,
            }),
        );

        let result = if !self.tool_executor.has_tool(&call.tool_name) {
            ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name))
        } else if !ctx.role.can_use_tool(&call.tool_name) {
            warn!(
                role = ctx.role.role(),
                tool = %call.tool_name,
                "Tool call denied: role lacks the capability"
            );
            ToolResult::failure(
                &call.tool_name,
                ToolError::permission_denied(&call.tool_name)
                    .with_details(format!("{} cannot use this tool", ctx.role.role())),
            )
        } else {
            progress.on_tool_call(ctx.role.kind(), &call.tool_name);
            info!(role = ctx.role.role(), tool = %call.tool_name, "Executing tool");
            self.tool_executor.execute(call).await
        };

        self.log(
            ctx.run_id,
            "tool_result",
            json!({
                "stage": ctx.stage.as_str(),
                "role": ctx.role.role(),
                "tool": result.tool_name,
                "success": result.is_success(),
                "output": truncate(&result.observation(), 500),
            }),
        );

        let observation = CrewPromptTemplate::tool_observation(&result);
        truncate(&observation, self.params.max_observation_chars)
    }

    async fn delegate(
        &self,
        ctx: TurnContext<'_>,
        delegation: &Delegation,
        progress: &dyn ProgressNotifier,
        run: &mut RoleRun,
    ) -> Result<String, GatewayError> {
        if !ctx.role.allow_delegation() {
            return Ok(CrewPromptTemplate::delegation_refused(
                &delegation.coworker,
                "You are not allowed to delegate work.",
            ));
        }

        let coworker = match RoleKind::from_title(&delegation.coworker)
            .and_then(|kind| ctx.pipeline.role(kind))
        {
            Some(coworker) if coworker.kind() == ctx.role.kind() => {
                return Ok(CrewPromptTemplate::delegation_refused(
                    &delegation.coworker,
                    "You cannot delegate to yourself.",
                ));
            }
            Some(coworker) => coworker,
            None => {
                let names: Vec<&str> = ctx
                    .pipeline
                    .coworkers_of(ctx.role.kind())
                    .map(|r| r.role())
                    .collect();
                return Ok(CrewPromptTemplate::delegation_refused(
                    &delegation.coworker,
                    &format!(
                        "There is no coworker with that title. Choose one of: {}.",
                        names.join(", ")
                    ),
                ));
            }
        };

        info!(
            stage = %ctx.stage,
            from = ctx.role.role(),
            to = coworker.role(),
            "Delegating to coworker"
        );
        progress.on_delegation(ctx.role.kind(), coworker.kind());
        self.log(
            ctx.run_id,
            "delegation",
            json!({
                "stage": ctx.stage.as_str(),
                "from": ctx.role.role(),
                "to": coworker.role(),
                "task": delegation.task,
                "context": delegation.context,
            }),
        );
        run.delegations.push(coworker.kind());

        let prompt =
            CrewPromptTemplate::delegated_task(ctx.role, &delegation.task, &delegation.context);
        let coworker_ctx = TurnContext {
            run_id: ctx.run_id,
            pipeline: ctx.pipeline,
            role: coworker,
            stage: ctx.stage,
        };
        let answer = self.run_coworker(coworker_ctx, prompt, progress).await?;

        Ok(CrewPromptTemplate::delegation_observation(
            coworker.role(),
            &answer,
        ))
    }
}

#[async_trait]
impl<G, T> PipelineExecutor for ExecutePipelineUseCase<G, T>
where
    G: LlmGateway + ?Sized + 'static,
    T: ToolExecutorPort + ?Sized + 'static,
{
    async fn kickoff(
        &self,
        pipeline: &Pipeline,
        progress: &dyn ProgressNotifier,
    ) -> Result<PipelineOutput, ExecutorError> {
        let total = pipeline.stage_count();
        let run_id = Uuid::new_v4().to_string();
        info!(
            run_id = %run_id,
            stages = total,
            model = %self.model,
            provider = self.gateway.provider_name(),
            "Starting pipeline"
        );
        progress.on_pipeline_start(&pipeline.shape());

        let mut completed: Vec<StageOutput> = Vec::with_capacity(total);

        for (index, stage) in pipeline.stages().iter().enumerate() {
            let Some(role) = pipeline.role_for(stage) else {
                progress.on_pipeline_complete(false);
                return Err(ExecutorError::MissingRole {
                    stage: stage.kind(),
                });
            };

            info!(stage = %stage.kind(), role = role.role(), "Stage {}/{}", index + 1, total);
            progress.on_stage_start(stage.kind(), role.kind(), index, total);
            self.log(
                &run_id,
                "stage_started",
                json!({
                    "stage": stage.kind().as_str(),
                    "role": role.role(),
                    "index": index,
                    "total": total,
                }),
            );

            let ctx = TurnContext {
                run_id: &run_id,
                pipeline,
                role,
                stage: stage.kind(),
            };
            let prompt = CrewPromptTemplate::stage_prompt(stage, &completed);

            let run = match self.run_stage(ctx, prompt, progress).await {
                Ok(run) => run,
                Err(source) => {
                    warn!(stage = %stage.kind(), error = %source, "Stage failed");
                    progress.on_stage_complete(stage.kind(), false);
                    progress.on_pipeline_complete(false);
                    return Err(ExecutorError::Gateway {
                        stage: stage.kind(),
                        role: role.kind(),
                        source,
                    });
                }
            };

            progress.on_stage_complete(stage.kind(), true);
            self.log(
                &run_id,
                "stage_completed",
                json!({
                    "stage": stage.kind().as_str(),
                    "role": role.role(),
                    "output": run.answer,
                    "tool_calls": run.tool_calls,
                    "delegations": run.delegations,
                }),
            );

            completed.push(StageOutput {
                stage: stage.kind(),
                role: role.kind(),
                output: run.answer,
                tool_calls: run.tool_calls,
                delegations: run.delegations,
            });
        }

        progress.on_pipeline_complete(true);
        info!("Pipeline completed");
        Ok(PipelineOutput::from_stages(completed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use health_crew_domain::{
        ConsultationRequest, ConsultationRoster, InputMode, PipelineShape, ToolSpec,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Infrastructure ====================

    type Reply = Result<String, GatewayError>;

    #[derive(Default)]
    struct Transcript {
        /// System prompt of every session, in creation order
        system_prompts: Vec<String>,
        /// (session index, prompt) for every send
        prompts: Vec<(usize, String)>,
    }

    /// Session that returns scripted replies in order
    struct ScriptedSession {
        index: usize,
        model: Model,
        replies: Mutex<VecDeque<Reply>>,
        transcript: Arc<Mutex<Transcript>>,
    }

    #[async_trait]
    impl LlmSession for ScriptedSession {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn send(&self, content: &str) -> Result<String, GatewayError> {
            self.transcript
                .lock()
                .unwrap()
                .prompts
                .push((self.index, content.to_string()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("(no more responses)".to_string()))
        }
    }

    /// Gateway that hands out one scripted session per call, in order
    struct ScriptedGateway {
        sessions: Mutex<VecDeque<Vec<Reply>>>,
        transcript: Arc<Mutex<Transcript>>,
    }

    impl ScriptedGateway {
        fn new(sessions: Vec<Vec<Reply>>) -> Self {
            Self {
                sessions: Mutex::new(sessions.into()),
                transcript: Arc::new(Mutex::new(Transcript::default())),
            }
        }

        fn system_prompts(&self) -> Vec<String> {
            self.transcript.lock().unwrap().system_prompts.clone()
        }

        fn prompts_of(&self, session: usize) -> Vec<String> {
            self.transcript
                .lock()
                .unwrap()
                .prompts
                .iter()
                .filter(|(i, _)| *i == session)
                .map(|(_, p)| p.clone())
                .collect()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError> {
            self.create_session_with_system_prompt(model, "").await
        }

        async fn create_session_with_system_prompt(
            &self,
            model: &Model,
            system_prompt: &str,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            let index = {
                let mut transcript = self.transcript.lock().unwrap();
                transcript.system_prompts.push(system_prompt.to_string());
                transcript.system_prompts.len() - 1
            };
            let replies = self.sessions.lock().unwrap().pop_front().unwrap_or_default();
            Ok(Box::new(ScriptedSession {
                index,
                model: model.clone(),
                replies: Mutex::new(replies.into()),
                transcript: self.transcript.clone(),
            }))
        }
    }

    /// Tool executor offering `web_search`, recording every call
    struct RecordingTools {
        spec: ToolSpec,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingTools {
        fn new() -> Self {
            Self {
                spec: ToolSpec::new()
                    .register(ToolDefinition::new("web_search", "Search the web")),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ToolExecutorPort for RecordingTools {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            let query = call.get_string("query").unwrap_or_default().to_string();
            self.calls.lock().unwrap().push(query.clone());
            ToolResult::success(&call.tool_name, format!("results for {query}"))
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
        run_ids: Mutex<Vec<Option<String>>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type);
            self.run_ids.lock().unwrap().push(event.run_id);
        }
    }

    #[derive(Default)]
    struct TrackingProgress {
        events: Mutex<Vec<String>>,
    }

    impl TrackingProgress {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ProgressNotifier for TrackingProgress {
        fn on_pipeline_start(&self, shape: &PipelineShape) {
            self.events
                .lock()
                .unwrap()
                .push(format!("pipeline:{}", shape.stages.len()));
        }

        fn on_stage_start(&self, stage: StageKind, _role: RoleKind, index: usize, _total: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start:{}:{}", index, stage.as_str()));
        }

        fn on_stage_complete(&self, stage: StageKind, success: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done:{}:{}", stage.as_str(), success));
        }

        fn on_tool_call(&self, role: RoleKind, tool_name: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("tool:{}:{}", role.title(), tool_name));
        }

        fn on_delegation(&self, from: RoleKind, to: RoleKind) {
            self.events
                .lock()
                .unwrap()
                .push(format!("delegate:{}>{}", from.title(), to.title()));
        }

        fn on_pipeline_complete(&self, success: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("complete:{}", success));
        }
    }

    fn pipeline(disease: &str) -> Pipeline {
        let request = ConsultationRequest::new("45", "male", disease);
        ConsultationRoster::new(&request, InputMode::Interpolate)
            .build()
            .unwrap()
    }

    fn text(s: &str) -> Reply {
        Ok(s.to_string())
    }

    fn executor(
        gateway: &Arc<ScriptedGateway>,
        tools: &Arc<RecordingTools>,
    ) -> ExecutePipelineUseCase<ScriptedGateway, RecordingTools> {
        ExecutePipelineUseCase::new(gateway.clone(), tools.clone(), Model::default())
    }

    const SEARCH: &str = "```tool\n{\"tool\": \"web_search\", \"args\": {\"query\": \"cardio\"}}\n```";

    // ==================== Stage ordering ====================

    #[tokio::test]
    async fn test_stages_run_in_order_with_previous_context() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text("Final Answer: Walk 30 minutes daily.")],
            vec![text("Eat more vegetables.")],
            vec![text("Sleep eight hours.")],
        ]));
        let tools = Arc::new(RecordingTools::new());

        let output = executor(&gateway, &tools)
            .kickoff(&pipeline("no"), &NoProgress)
            .await
            .unwrap();

        assert_eq!(output.final_output, "Sleep eight hours.");
        let stages: Vec<_> = output.stages.iter().map(|s| s.stage).collect();
        assert_eq!(
            stages,
            vec![StageKind::Fitness, StageKind::Nutrition, StageKind::Health]
        );
        assert_eq!(output.stages[0].output, "Walk 30 minutes daily.");

        let system_prompts = gateway.system_prompts();
        assert!(system_prompts[0].starts_with("You are Fitness Expert."));
        assert!(system_prompts[2].starts_with("You are Doctor."));

        let health_prompt = &gateway.prompts_of(2)[0];
        assert!(health_prompt.contains("Walk 30 minutes daily."));
        assert!(health_prompt.contains("Eat more vegetables."));
        assert!(gateway.prompts_of(0)[0].contains("Analyze the fitness requirements"));
    }

    #[tokio::test]
    async fn test_disease_pipeline_runs_disease_expert_last() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text("a")],
            vec![text("b")],
            vec![text("c")],
            vec![text("Manage blood sugar.")],
        ]));
        let tools = Arc::new(RecordingTools::new());

        let output = executor(&gateway, &tools)
            .kickoff(&pipeline("yes"), &NoProgress)
            .await
            .unwrap();

        assert_eq!(output.stages.len(), 4);
        assert_eq!(output.stages[3].role, RoleKind::DiseaseExpert);
        assert_eq!(output.final_output, "Manage blood sugar.");
        assert!(gateway.prompts_of(3)[0].contains("Provide recommendations for managing yes"));
    }

    // ==================== Tools ====================

    #[tokio::test]
    async fn test_fitness_expert_can_search() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text(SEARCH), text("Swim twice a week.")],
            vec![text("b")],
            vec![text("c")],
        ]));
        let tools = Arc::new(RecordingTools::new());
        let progress = TrackingProgress::default();

        let output = executor(&gateway, &tools)
            .kickoff(&pipeline("no"), &progress)
            .await
            .unwrap();

        assert_eq!(tools.calls(), vec!["cardio"]);
        assert_eq!(output.stages[0].tool_calls, 1);
        assert_eq!(output.stages[0].output, "Swim twice a week.");
        assert!(gateway.prompts_of(0)[1].contains("results for cardio"));
        assert!(progress.events().contains(&"tool:Fitness Expert:web_search".to_string()));
        assert!(gateway.system_prompts()[0].contains("web_search"));
        assert!(!gateway.system_prompts()[1].contains("## Available Tools"));
    }

    #[tokio::test]
    async fn test_tool_call_without_capability_is_denied() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text("a")],
            vec![text(SEARCH), text("Eat oats.")],
            vec![text("c")],
        ]));
        let tools = Arc::new(RecordingTools::new());

        let output = executor(&gateway, &tools)
            .kickoff(&pipeline("no"), &NoProgress)
            .await
            .unwrap();

        assert!(tools.calls().is_empty());
        assert_eq!(output.stages[1].output, "Eat oats.");
        assert!(gateway.prompts_of(1)[1].contains("PERMISSION_DENIED"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let call = "```tool\n{\"tool\": \"read_file\", \"args\": {\"path\": \"/etc/passwd\"}}\n```";
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text(call), text("done")],
            vec![text("b")],
            vec![text("c")],
        ]));
        let tools = Arc::new(RecordingTools::new());

        executor(&gateway, &tools)
            .kickoff(&pipeline("no"), &NoProgress)
            .await
            .unwrap();

        assert!(gateway.prompts_of(0)[1].contains("NOT_FOUND"));
    }

    // ==================== Delegation ====================

    #[tokio::test]
    async fn test_delegation_runs_coworker_once() {
        let ask = "```delegate\n{\"coworker\": \"Disease Expert\", \"task\": \"Which foods help?\", \"context\": \"diabetic client\"}\n```";
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text("a")],
            vec![text(ask), text("Follow a low sugar diet.")],
            // coworker session
            vec![text("Prefer whole grains.")],
            vec![text("c")],
            vec![text("d")],
        ]));
        let tools = Arc::new(RecordingTools::new());
        let progress = TrackingProgress::default();

        let output = executor(&gateway, &tools)
            .kickoff(&pipeline("yes"), &progress)
            .await
            .unwrap();

        assert_eq!(output.stages[1].delegations, vec![RoleKind::DiseaseExpert]);
        assert_eq!(output.stages[1].output, "Follow a low sugar diet.");

        let coworker_system = &gateway.system_prompts()[2];
        assert!(coworker_system.starts_with("You are Disease Expert."));
        assert!(!coworker_system.contains("```delegate"));
        let coworker_prompt = &gateway.prompts_of(2)[0];
        assert!(coworker_prompt.contains("Which foods help?"));
        assert!(coworker_prompt.contains("diabetic client"));
        assert!(gateway.prompts_of(1)[1].contains("Prefer whole grains."));
        assert!(progress
            .events()
            .contains(&"delegate:Nutritionist>Disease Expert".to_string()));
    }

    #[tokio::test]
    async fn test_delegation_to_absent_role_is_refused() {
        let ask = "```delegate\n{\"coworker\": \"Disease Expert\", \"task\": \"help\"}\n```";
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text(ask), text("On my own then.")],
            vec![text("b")],
            vec![text("c")],
        ]));
        let tools = Arc::new(RecordingTools::new());

        let output = executor(&gateway, &tools)
            .kickoff(&pipeline("no"), &NoProgress)
            .await
            .unwrap();

        assert!(output.stages[0].delegations.is_empty());
        let observation = &gateway.prompts_of(0)[1];
        assert!(observation.contains("refused"));
        assert!(observation.contains("Nutritionist, Doctor"));
        assert_eq!(gateway.system_prompts().len(), 3);
    }

    #[tokio::test]
    async fn test_delegation_to_self_is_refused() {
        let ask = "```delegate\n{\"coworker\": \"Fitness Expert\", \"task\": \"help\"}\n```";
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text(ask), text("ok")],
            vec![text("b")],
            vec![text("c")],
        ]));
        let tools = Arc::new(RecordingTools::new());

        executor(&gateway, &tools)
            .kickoff(&pipeline("no"), &NoProgress)
            .await
            .unwrap();

        assert!(gateway.prompts_of(0)[1].contains("cannot delegate to yourself"));
    }

    #[tokio::test]
    async fn test_coworker_cannot_delegate_again() {
        let ask_doctor = "```delegate\n{\"coworker\": \"Doctor\", \"task\": \"check\"}\n```";
        let ask_back = "```delegate\n{\"coworker\": \"Fitness Expert\", \"task\": \"back to you\"}\n```";
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text(ask_doctor), text("final")],
            vec![text(ask_back), text("Looks safe.")],
            vec![text("b")],
            vec![text("c")],
        ]));
        let tools = Arc::new(RecordingTools::new());

        let output = executor(&gateway, &tools)
            .kickoff(&pipeline("no"), &NoProgress)
            .await
            .unwrap();

        assert!(gateway.prompts_of(1)[1].contains("cannot delegate it further"));
        assert!(gateway.prompts_of(0)[1].contains("Looks safe."));
        assert_eq!(output.stages[0].output, "final");
        // stage sessions + one coworker session
        assert_eq!(gateway.system_prompts().len(), 4);
    }

    // ==================== Unreadable directives ====================

    #[tokio::test]
    async fn test_unterminated_block_is_not_a_final_answer() {
        let cut_off =
            "Let me check.\n```tool\n{\"tool\": \"web_search\", \"args\": {\"query\": \"cardio\"}}";
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text("a")],
            vec![text("b")],
            vec![text(cut_off), text("Final Answer: Sleep eight hours.")],
        ]));
        let tools = Arc::new(RecordingTools::new());

        let output = executor(&gateway, &tools)
            .kickoff(&pipeline("no"), &NoProgress)
            .await
            .unwrap();

        assert_eq!(output.final_output, "Sleep eight hours.");
        assert!(!output.final_output.contains("```"));
        assert!(tools.calls().is_empty());
        let retry = &gateway.prompts_of(2)[1];
        assert!(retry.contains("not closed"));
        assert!(retry.contains("Final Answer"));
    }

    #[tokio::test]
    async fn test_malformed_block_is_sent_back() {
        let broken = "```delegate\n{\"coworker\": \"Doctor\"}\n```";
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text(broken), text("Stretch daily.")],
            vec![text("b")],
            vec![text("c")],
        ]));
        let tools = Arc::new(RecordingTools::new());

        let output = executor(&gateway, &tools)
            .kickoff(&pipeline("no"), &NoProgress)
            .await
            .unwrap();

        assert_eq!(output.stages[0].output, "Stretch daily.");
        assert!(output.stages[0].delegations.is_empty());
        assert!(gateway.prompts_of(0)[1].contains("\"coworker\" and \"task\""));
        assert_eq!(gateway.system_prompts().len(), 3);
    }

    #[tokio::test]
    async fn test_coworker_unreadable_block_is_sent_back() {
        let ask = "```delegate\n{\"coworker\": \"Doctor\", \"task\": \"check\"}\n```";
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text(ask), text("final")],
            // coworker session
            vec![text("```tool\nnot json\n```"), text("Looks safe.")],
            vec![text("b")],
            vec![text("c")],
        ]));
        let tools = Arc::new(RecordingTools::new());

        executor(&gateway, &tools)
            .kickoff(&pipeline("no"), &NoProgress)
            .await
            .unwrap();

        assert!(gateway.prompts_of(1)[1].contains("not valid JSON"));
        assert!(gateway.prompts_of(0)[1].contains("Looks safe."));
    }

    // ==================== Turn budget ====================

    #[tokio::test]
    async fn test_turn_budget_forces_final_answer() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text(SEARCH), text(SEARCH), text("Final Answer: Jog.")],
            vec![text("b")],
            vec![text("c")],
        ]));
        let tools = Arc::new(RecordingTools::new());

        let output = executor(&gateway, &tools)
            .with_params(ExecutionParams::default().with_max_turns_per_stage(2))
            .kickoff(&pipeline("no"), &NoProgress)
            .await
            .unwrap();

        assert_eq!(output.stages[0].output, "Jog.");
        assert_eq!(tools.calls().len(), 2);
        let prompts = gateway.prompts_of(0);
        assert_eq!(prompts.len(), 3);
        assert_eq!(prompts[2], CrewPromptTemplate::final_answer_nudge());
    }

    // ==================== Failures ====================

    #[tokio::test]
    async fn test_gateway_error_aborts_pipeline() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text("a")],
            vec![Err(GatewayError::RateLimited("quota".to_string()))],
            vec![text("never")],
        ]));
        let tools = Arc::new(RecordingTools::new());
        let progress = TrackingProgress::default();

        let err = executor(&gateway, &tools)
            .kickoff(&pipeline("no"), &progress)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ExecutorError::Gateway {
                stage: StageKind::Nutrition,
                role: RoleKind::Nutritionist,
                source: GatewayError::RateLimited("quota".to_string()),
            }
        );
        assert_eq!(gateway.system_prompts().len(), 2);
        assert_eq!(
            progress.events(),
            vec![
                "pipeline:3",
                "start:0:fitness",
                "done:fitness:true",
                "start:1:nutrition",
                "done:nutrition:false",
                "complete:false",
            ]
        );
    }

    // ==================== Client profile and logging ====================

    #[tokio::test]
    async fn test_structured_mode_sends_client_profile() {
        let request = ConsultationRequest::new("45", "male", "no");
        let pipeline = ConsultationRoster::new(&request, InputMode::Structured)
            .build()
            .unwrap();
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let tools = Arc::new(RecordingTools::new());

        executor(&gateway, &tools)
            .kickoff(&pipeline, &NoProgress)
            .await
            .unwrap();

        for system_prompt in gateway.system_prompts() {
            assert!(system_prompt.contains("## Client Profile"));
            assert!(system_prompt.contains("\"age\": \"45\""));
        }
        assert!(!gateway.prompts_of(0)[0].contains("45"));
    }

    #[tokio::test]
    async fn test_conversation_events_are_logged() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            vec![text(SEARCH), text("a")],
            vec![text("b")],
            vec![text("c")],
        ]));
        let tools = Arc::new(RecordingTools::new());
        let logger = Arc::new(RecordingLogger::default());

        executor(&gateway, &tools)
            .with_conversation_logger(logger.clone())
            .kickoff(&pipeline("no"), &NoProgress)
            .await
            .unwrap();

        let events = logger.events.lock().unwrap().clone();
        assert_eq!(
            &events[..6],
            &[
                "stage_started",
                "llm_prompt",
                "llm_response",
                "tool_call",
                "tool_result",
                "llm_prompt",
            ]
        );
        assert_eq!(events.iter().filter(|e| **e == "stage_completed").count(), 3);
    }

    #[tokio::test]
    async fn test_each_kickoff_logs_its_own_run_id() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let tools = Arc::new(RecordingTools::new());
        let logger = Arc::new(RecordingLogger::default());
        let executor = executor(&gateway, &tools).with_conversation_logger(logger.clone());

        executor.kickoff(&pipeline("no"), &NoProgress).await.unwrap();
        let first_run = logger.run_ids.lock().unwrap().len();
        executor.kickoff(&pipeline("no"), &NoProgress).await.unwrap();

        let run_ids = logger.run_ids.lock().unwrap().clone();
        assert!(run_ids.iter().all(Option::is_some));
        let (first, second) = run_ids.split_at(first_run);
        assert!(first.iter().all(|id| *id == first[0]));
        assert!(second.iter().all(|id| *id == second[0]));
        assert_ne!(first[0], second[0]);
    }
}
