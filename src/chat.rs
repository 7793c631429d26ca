//! One prompt invocation: schema, history, generation and session append.

use std::path::PathBuf;

use gemini_api::request::system_instruction;
use gemini_api::{GeminiApiClient, GeminiApiError, Generation, GenerationSettings, Prompt};
use serde::Serialize;
use session_store::SessionStore;

use crate::error::AppError;

/// Produces a generation for a fully assembled prompt.
pub trait Generator {
    fn generate(
        &self,
        settings: &GenerationSettings,
        prompt: &Prompt,
    ) -> Result<Generation, AppError>;
}

/// Drives the async client to completion on a current-thread runtime.
pub struct BlockingGenerator {
    client: GeminiApiClient,
}

impl BlockingGenerator {
    #[must_use]
    pub fn new(client: GeminiApiClient) -> Self {
        Self { client }
    }
}

impl Generator for BlockingGenerator {
    fn generate(
        &self,
        settings: &GenerationSettings,
        prompt: &Prompt,
    ) -> Result<Generation, AppError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(AppError::Runtime)?;

        runtime
            .block_on(self.client.generate(settings, prompt))
            .map_err(AppError::from)
    }
}

/// Operator input for one turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnInput {
    pub text: String,
    pub files: Vec<PathBuf>,
    pub schema_definition: String,
    pub grounding: bool,
}

/// Runs one turn against the active session.
///
/// The session is appended only after a usable generation; any failure
/// leaves it untouched.
pub fn run_turn(
    store: &SessionStore,
    generator: &dyn Generator,
    settings: &GenerationSettings,
    input: TurnInput,
) -> Result<Generation, AppError> {
    if input.text.trim().is_empty() {
        return Err(AppError::Validation("a single prompt is required".to_owned()));
    }

    let schema = response_schema::compile(&input.schema_definition)?;
    let history = store.read()?;
    tracing::debug!(
        history = history.len(),
        files = input.files.len(),
        schema = schema.is_some(),
        "sending prompt"
    );

    let prompt = Prompt {
        history,
        text: input.text,
        files: input.files,
        schema,
        grounding: input.grounding,
    };

    let generation = generator.generate(settings, &prompt)?;
    store.write(&prompt.text, generation.files.clone(), &generation.text)?;

    Ok(generation)
}

/// Byte and token counts reported by `--stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub system_prompt_bytes: usize,
    pub prompt_bytes: usize,
    pub response_bytes: usize,
    pub tokens: u64,
    pub files: usize,
}

#[derive(Serialize)]
struct StatsEnvelope<'a> {
    stats: &'a Stats,
}

impl Stats {
    #[must_use]
    pub fn new(settings: &GenerationSettings, prompt: &str, generation: &Generation) -> Self {
        Self {
            system_prompt_bytes: system_instruction(settings).len(),
            prompt_bytes: prompt.len(),
            response_bytes: generation.text.len(),
            tokens: generation.tokens,
            files: generation.files.len(),
        }
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string(&StatsEnvelope { stats: self })
            .map_err(|source| AppError::Protocol(GeminiApiError::Encode(source)))
    }
}
