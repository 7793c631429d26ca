//! Assembly of `generateContent` requests from history, a new turn and the
//! caller's generation settings.

use std::path::PathBuf;

use conversation::{DebugLog, FileReference, Message, Role};
use serde_json::value::RawValue;

use crate::error::GeminiApiError;
use crate::payload::{
    Content, GenerateContentRequest, GenerationConfig, Part, SystemInstruction, Tool,
    RESPONSE_MIME_JSON, RESPONSE_MIME_TEXT,
};

/// Appended to every system prompt; responses are printed to a terminal.
pub const TERMINAL_GUIDANCE: &str = "Your responses are printed to a terminal. \
Keep them concise and easily rendered there. \
Do not use markdown syntax, as it is not rendered in terminal output. \
You may use plain text formatting that a human can read immediately, such as dashes for list items. \
Answers must be factually correct; take care to avoid hallucinations. \
Only answer the specific question given and do not add information that is not directly relevant to it. ";

/// Rough number of words produced per output token.
pub const WORDS_PER_TOKEN: f64 = 0.75;

/// Optional facts about the operator, each turned into a system clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub location: String,
    pub description: String,
}

/// Model selection and sampling parameters plus system prompt inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub system_prompt: String,
    pub response_style: String,
    pub user: UserProfile,
}

/// One new turn: its text, local attachments, and request options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prompt {
    pub history: Vec<Message>,
    pub text: String,
    pub files: Vec<PathBuf>,
    /// Compiled JSON Schema; opaque to this layer.
    pub schema: Option<String>,
    pub grounding: bool,
}

/// Rejects settings the service cannot act on, before any network activity.
pub fn validate_settings(settings: &GenerationSettings) -> Result<(), GeminiApiError> {
    if settings.model.trim().is_empty() || settings.max_tokens == 0 || settings.temperature == 0.0
    {
        return Err(GeminiApiError::InvalidRequest(
            "model, max tokens and temperature must be specified".to_owned(),
        ));
    }

    Ok(())
}

/// Rejects a prompt whose schema is not valid JSON, so that no file is
/// uploaded for a request that can never be sent.
pub fn validate_prompt(prompt: &Prompt) -> Result<(), GeminiApiError> {
    if let Some(schema) = prompt.schema.as_deref() {
        serde_json::from_str::<&RawValue>(schema).map_err(GeminiApiError::InvalidSchema)?;
    }

    Ok(())
}

/// Whether the request should carry the search tool.
///
/// Schema-constrained output and grounding cannot be combined; a schema wins
/// and grounding is dropped with a debug notice.
pub fn effective_grounding(prompt: &Prompt, log: &dyn DebugLog) -> bool {
    if prompt.grounding && prompt.schema.is_some() {
        log.debug(
            "grounding_disabled",
            "grounding cannot be combined with a response schema; grounding disabled",
        );
        return false;
    }

    prompt.grounding
}

/// Builds the full system instruction text.
pub fn system_instruction(settings: &GenerationSettings) -> String {
    let mut text = String::new();
    text.push_str(&settings.system_prompt);
    text.push_str(". ");
    text.push_str(TERMINAL_GUIDANCE);

    let words = f64::from(settings.max_tokens) * WORDS_PER_TOKEN;
    text.push_str(&format!(
        "Your responses must not exceed {words} words in length. "
    ));

    let attributes = [
        ("location", settings.user.location.as_str()),
        ("name", settings.user.name.as_str()),
        ("description", settings.user.description.as_str()),
        (
            "preferred response style; note that this only refines your output and does not override any previous instruction where there is a contradiction",
            settings.response_style.as_str(),
        ),
    ];

    for (key, value) in attributes {
        if value.is_empty() {
            continue;
        }
        text.push_str(&format!(
            "Consider in your responses, where it may be relevant, that the user has provided this information regarding their {key}: {value:?}. "
        ));
    }

    text
}

/// One content entry per history message, preserving role and attachments.
pub fn history_contents(history: &[Message]) -> Vec<Content> {
    history
        .iter()
        .map(|message| content_for(message.role, &message.text, &message.files))
        .collect()
}

/// Assembles the request for `prompt`, given the references of the files
/// already uploaded for this turn.
pub fn build_request(
    settings: &GenerationSettings,
    prompt: &Prompt,
    uploaded: &[FileReference],
    log: &dyn DebugLog,
) -> Result<GenerateContentRequest, GeminiApiError> {
    validate_settings(settings)?;
    let grounding = effective_grounding(prompt, log);

    let mut contents = history_contents(&prompt.history);
    contents.push(content_for(Role::User, &prompt.text, uploaded));

    let (response_mime_type, response_schema) = match prompt.schema.as_deref() {
        Some(schema) => {
            let raw = RawValue::from_string(schema.to_owned())
                .map_err(GeminiApiError::InvalidSchema)?;
            (RESPONSE_MIME_JSON, Some(raw))
        }
        None => (RESPONSE_MIME_TEXT, None),
    };

    let tools = if grounding {
        vec![Tool::google_search()]
    } else {
        Vec::new()
    };

    Ok(GenerateContentRequest {
        system_instruction: SystemInstruction {
            parts: vec![Part::text(system_instruction(settings))],
        },
        contents,
        tools,
        generation_config: GenerationConfig {
            temperature: settings.temperature,
            top_p: settings.top_p,
            max_output_tokens: settings.max_tokens,
            response_mime_type: response_mime_type.to_owned(),
            response_schema,
        },
    })
}

fn content_for(role: Role, text: &str, files: &[FileReference]) -> Content {
    let mut parts = Vec::with_capacity(files.len() + 1);
    parts.push(Part::text(text));
    parts.extend(
        files
            .iter()
            .map(|file| Part::file(file.mime_type.clone(), file.uri.clone())),
    );

    Content {
        role: role.as_str().to_owned(),
        parts,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use conversation::NoopLog;

    use super::*;

    #[derive(Default)]
    struct RecordingLog {
        events: Mutex<Vec<String>>,
    }

    impl DebugLog for RecordingLog {
        fn debug(&self, event: &str, _detail: &str) {
            self.events
                .lock()
                .expect("log lock poisoned")
                .push(event.to_owned());
        }
    }

    fn settings() -> GenerationSettings {
        GenerationSettings {
            model: "gemini-test".to_owned(),
            max_tokens: 1000,
            temperature: 0.2,
            top_p: 0.3,
            system_prompt: "You are a test".to_owned(),
            response_style: String::new(),
            user: UserProfile::default(),
        }
    }

    #[test]
    fn validation_rejects_missing_parameters() {
        let mut missing_model = settings();
        missing_model.model.clear();
        let mut zero_tokens = settings();
        zero_tokens.max_tokens = 0;
        let mut zero_temperature = settings();
        zero_temperature.temperature = 0.0;

        for invalid in [missing_model, zero_tokens, zero_temperature] {
            assert!(matches!(
                validate_settings(&invalid),
                Err(GeminiApiError::InvalidRequest(_))
            ));
        }
        validate_settings(&settings()).expect("complete settings are valid");
    }

    #[test]
    fn system_instruction_carries_word_budget() {
        let text = system_instruction(&settings());
        assert!(text.starts_with("You are a test. Your responses are printed to a terminal."));
        assert!(text.contains("must not exceed 750 words"));
        assert!(!text.contains("Consider in your responses"));
    }

    #[test]
    fn system_instruction_adds_clause_per_populated_attribute() {
        let mut with_user = settings();
        with_user.user.name = "Ada".to_owned();
        with_user.user.location = "London".to_owned();
        with_user.response_style = "terse".to_owned();

        let text = system_instruction(&with_user);
        assert_eq!(text.matches("Consider in your responses").count(), 3);
        assert!(text.contains(r#"regarding their name: "Ada". "#));
        assert!(text.contains(r#"regarding their location: "London". "#));
        assert!(text.contains("preferred response style"));
        assert!(!text.contains("regarding their description"));

        let location = text.find("their location").expect("location clause");
        let name = text.find("their name").expect("name clause");
        assert!(location < name);
    }

    #[test]
    fn schema_suppresses_grounding_and_logs_notice() {
        let log = RecordingLog::default();
        let prompt = Prompt {
            text: "q".to_owned(),
            schema: Some(r#"{"type":"string"}"#.to_owned()),
            grounding: true,
            ..Prompt::default()
        };

        let request = build_request(&settings(), &prompt, &[], &log).expect("request");
        assert!(request.tools.is_empty());
        assert_eq!(
            request.generation_config.response_mime_type,
            RESPONSE_MIME_JSON
        );
        assert_eq!(
            log.events.lock().expect("log lock").as_slice(),
            ["grounding_disabled"]
        );
    }

    #[test]
    fn grounding_without_schema_adds_search_tool() {
        let prompt = Prompt {
            text: "q".to_owned(),
            grounding: true,
            ..Prompt::default()
        };

        let request = build_request(&settings(), &prompt, &[], &NoopLog).expect("request");
        assert_eq!(request.tools.len(), 1);
        assert!(request.tools[0].google_search.is_some());
        assert_eq!(
            request.generation_config.response_mime_type,
            RESPONSE_MIME_TEXT
        );
        assert!(request.generation_config.response_schema.is_none());
    }

    #[test]
    fn invalid_schema_json_is_rejected() {
        let prompt = Prompt {
            text: "q".to_owned(),
            schema: Some("{ not json".to_owned()),
            ..Prompt::default()
        };

        assert!(matches!(
            build_request(&settings(), &prompt, &[], &NoopLog),
            Err(GeminiApiError::InvalidSchema(_))
        ));
    }

    #[test]
    fn history_and_new_turn_keep_order_roles_and_files() {
        let reference = FileReference::new("uri://old", "image/png", "old.png");
        let prompt = Prompt {
            history: vec![
                Message::user("earlier", vec![reference]),
                Message::model("answer"),
            ],
            text: "now".to_owned(),
            ..Prompt::default()
        };
        let uploaded = [FileReference::new("uri://new", "application/pdf", "new.pdf")];

        let request = build_request(&settings(), &prompt, &uploaded, &NoopLog).expect("request");

        let roles = request
            .contents
            .iter()
            .map(|content| content.role.as_str())
            .collect::<Vec<_>>();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(request.contents[0].parts.len(), 2);
        assert_eq!(request.contents[1].parts.len(), 1);
        assert_eq!(request.contents[2].parts[0], Part::text("now"));
        assert_eq!(
            request.contents[2].parts[1],
            Part::file("application/pdf", "uri://new")
        );
    }
}
