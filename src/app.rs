//! Dispatch of one `gen` invocation.

use std::io::{self, Write};
use std::path::Path;

use gemini_api::GeminiApiClient;
use session_store::SessionStore;

use crate::args::{Cli, Command};
use crate::chat::{run_turn, BlockingGenerator, Stats, TurnInput};
use crate::config::{api_key_from_env, default_app_dir, AppConfig};
use crate::configure::configure;
use crate::error::AppError;
use crate::logging::tracing_log;
use crate::sessions::format_records;
use crate::spinner::Spinner;

pub fn run(cli: &Cli) -> Result<(), AppError> {
    let app_dir = match &cli.app_dir {
        Some(app_dir) => app_dir.clone(),
        None => default_app_dir()?,
    };
    let mut config = AppConfig::load(&app_dir)?;
    let store = SessionStore::new(&app_dir).with_logger(tracing_log());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let command = cli.command();
    if cli.new_session && command != Command::Configure {
        store.stash()?;
    }

    match command {
        Command::Configure => {
            let stdin = io::stdin();
            configure(&mut config, &mut stdin.lock(), &mut out)?;
            config.save(&app_dir)?;
        }
        Command::Restore(id) => store.restore(id)?,
        Command::Delete(id) => store.delete(id)?,
        Command::DeleteAll => store.delete_all()?,
        Command::List => out.write_all(format_records(&store.list()?).as_bytes())?,
        Command::Prompt => prompt(cli, &app_dir, &config, &store, &mut out)?,
    }

    out.flush()?;
    Ok(())
}

fn prompt(
    cli: &Cli,
    app_dir: &Path,
    config: &AppConfig,
    store: &SessionStore,
    out: &mut impl Write,
) -> Result<(), AppError> {
    if cli.new_session && cli.prompt.is_none() {
        return Ok(());
    }

    let Some(text) = cli.prompt.clone() else {
        return Err(AppError::Validation("a single prompt is required".to_owned()));
    };

    let api_key = api_key_from_env()?;
    let settings = config.generation_settings(&cli.settings_overrides());
    let client = GeminiApiClient::new(cli.api_config(api_key))?.with_logger(tracing_log());
    let generator = BlockingGenerator::new(client);
    tracing::debug!(app_dir = %app_dir.display(), model = %settings.model, "prompting");

    let input = TurnInput {
        text: text.clone(),
        files: cli.attachments(),
        schema_definition: cli.schema.clone().unwrap_or_default(),
        grounding: !cli.no_grounding,
    };

    let spinner = (!cli.script).then(Spinner::start);
    let result = run_turn(store, &generator, &settings, input);
    drop(spinner);
    let generation = result?;

    write!(out, "{}\n\n", generation.text)?;

    if cli.stats {
        eprintln!("{}", Stats::new(&settings, &text, &generation).to_json()?);
    }

    Ok(())
}
