use crate::error::{Result, ShellError};
use crate::models::command::Command;

/// Argument slots per stage, including the null sentinel added at launch.
pub const MAX_ARGS: usize = 64;

struct StageBuilder {
    commands: Vec<Command>,
    argv: Vec<String>,
    arg: String,
}

impl StageBuilder {
    fn finish_arg(&mut self) -> Result<()> {
        if self.arg.is_empty() {
            return Ok(());
        }
        if self.argv.len() >= MAX_ARGS - 1 {
            return Err(ShellError::TooManyArgs {
                limit: MAX_ARGS - 1,
            });
        }
        self.argv.push(std::mem::take(&mut self.arg));
        Ok(())
    }

    fn finish_stage(&mut self) -> Result<()> {
        self.finish_arg()?;
        if !self.argv.is_empty() {
            self.commands.push(Command::new(std::mem::take(&mut self.argv)));
        }
        Ok(())
    }
}

/// Splits a normalized buffer into one argument vector per pipeline stage.
/// Returns `None` when the buffer holds no command at all.
///
/// An escaped character is kept together with its backslash, so `a\ b`
/// becomes the single argument `a\ b`.
pub fn build_commands(normalized: &str, stages: usize) -> Result<Option<Vec<Command>>> {
    if normalized.is_empty() {
        return Ok(None);
    }

    let mut builder = StageBuilder {
        commands: Vec::with_capacity(stages),
        argv: Vec::new(),
        arg: String::new(),
    };
    let mut escaped = false;

    for c in normalized.chars() {
        if escaped {
            builder.arg.push(c);
            escaped = false;
            continue;
        }
        match c {
            ' ' => builder.finish_arg()?,
            '|' | '&' => builder.finish_stage()?,
            '\\' => {
                builder.arg.push(c);
                escaped = true;
            }
            _ => builder.arg.push(c),
        }
    }
    builder.finish_stage()?;

    if builder.commands.is_empty() {
        return Ok(None);
    }
    Ok(Some(builder.commands))
}
