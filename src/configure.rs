//! Interactive `--config` flow.

use std::io::{self, BufRead, Write};

use crate::config::{AppConfig, ConfigError};

const CLEAR_KEYWORD: &str = "none";

/// Prompts for every user detail and preference, showing the current value
/// as the default. Invalid numeric input is asked for again.
pub fn configure<R, W>(config: &mut AppConfig, input: &mut R, output: &mut W) -> Result<(), ConfigError>
where
    R: BufRead,
    W: Write,
{
    let mut prompter = Prompter { input, output };

    config.user.name = prompter.text(
        "Enter a name to refer to the user with",
        &config.user.name,
    )?;
    config.user.location = prompter.text(
        "Enter a location relevant to the user",
        &config.user.location,
    )?;
    config.user.description = prompter.text(
        "Enter a description or any information about the user that should be considered in responses",
        &config.user.description,
    )?;

    let style = prompter.text(
        "Add any desired response style, such as a specific tone, attitude or adopted role (enter 'none' to clear)",
        &config.preferences.response_style,
    )?;
    config.preferences.response_style = if style.eq_ignore_ascii_case(CLEAR_KEYWORD) {
        String::new()
    } else {
        style
    };

    config.preferences.temperature = prompter.parsed(
        "Specify the temperature setting for the model, above 0 and up to 2. This can be overridden per request",
        config.preferences.temperature,
        |value: &f64| *value > 0.0 && *value <= 2.0,
    )?;
    config.preferences.top_p = prompter.parsed(
        "Specify the top-p setting for the model, above 0 and up to 1. This can be overridden per request",
        config.preferences.top_p,
        |value: &f64| *value > 0.0 && *value <= 1.0,
    )?;
    config.preferences.max_tokens = prompter.parsed(
        "Specify the max tokens setting for the model. This can be overridden per request",
        config.preferences.max_tokens,
        |value: &u32| *value > 0,
    )?;

    Ok(())
}

struct Prompter<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<R: BufRead, W: Write> Prompter<'_, R, W> {
    fn text(&mut self, prompt: &str, current: &str) -> Result<String, ConfigError> {
        self.ask(prompt, current)?;
        let line = self.read_line()?;
        Ok(if line.is_empty() {
            current.to_owned()
        } else {
            line
        })
    }

    fn parsed<T>(
        &mut self,
        prompt: &str,
        current: T,
        valid: impl Fn(&T) -> bool,
    ) -> Result<T, ConfigError>
    where
        T: std::str::FromStr + std::fmt::Display + Copy,
    {
        loop {
            self.ask(prompt, &current.to_string())?;
            let line = self.read_line()?;
            if line.is_empty() {
                return Ok(current);
            }
            match line.parse::<T>() {
                Ok(value) if valid(&value) => return Ok(value),
                _ => {
                    writeln!(self.output, "invalid value {line:?}, try again")
                        .map_err(ConfigError::Input)?;
                }
            }
        }
    }

    fn ask(&mut self, prompt: &str, current: &str) -> Result<(), ConfigError> {
        let written = if current.is_empty() {
            writeln!(self.output, "{prompt}:")
        } else {
            writeln!(self.output, "{prompt} (default: '{current}'):")
        };
        written
            .and_then(|()| self.output.flush())
            .map_err(ConfigError::Input)
    }

    fn read_line(&mut self) -> Result<String, ConfigError> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(ConfigError::Input)?;
        if read == 0 {
            return Err(ConfigError::Input(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before configuration finished",
            )));
        }
        Ok(line.trim().to_owned())
    }
}
