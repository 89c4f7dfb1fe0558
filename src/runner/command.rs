//! Command execution
//!
//! This module runs recipe lines through the configured shell, streaming
//! the child's stdout and stderr line by line into the context's sinks.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{Context, Sink};
use std::io::{self, BufRead, BufReader, Read};
use std::process::{Command as StdCommand, Stdio};
use std::thread::{self, JoinHandle};

/// Runs a single command line to completion
pub trait Executor {
    fn execute(&self, command: &str, ctx: &Context) -> ExecutionResult<()>;
}

/// Executor that hands command lines to the context's interpreter
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl Executor for ShellExecutor {
    fn execute(&self, command: &str, ctx: &Context) -> ExecutionResult<()> {
        execute_command(command, ctx)
    }
}

/// Execute a command line in the given context
///
/// Blocks until the child exits. Ordering is kept within each stream but
/// not across stdout and stderr.
pub fn execute_command(command: &str, ctx: &Context) -> ExecutionResult<()> {
    let spawn_error = |source: io::Error| ExecutionError::Spawn {
        command: command.to_string(),
        source,
    };

    let (program, args) = ctx
        .interpreter
        .split_first()
        .ok_or_else(|| spawn_error(io::Error::new(io::ErrorKind::InvalidInput, "no interpreter configured")))?;

    let mut child = StdCommand::new(program)
        .args(args)
        .arg(command)
        .current_dir(&ctx.working_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error)?;

    let readers: Vec<JoinHandle<io::Result<()>>> = [
        child.stdout.take().map(|s| drain(s, ctx.out.clone())),
        child.stderr.take().map(|s| drain(s, ctx.err.clone())),
    ]
    .into_iter()
    .flatten()
    .collect();

    let status = child.wait().map_err(spawn_error)?;

    for reader in readers {
        reader.join().unwrap_or(Ok(()))?;
    }

    if !status.success() {
        return Err(ExecutionError::CommandFailed {
            command: command.to_string(),
            code: status.code(),
        });
    }

    Ok(())
}

/// Copy `source` into `sink` one line at a time on a separate thread
fn drain<R: Read + Send + 'static>(source: R, sink: Sink) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || {
        for line in BufReader::new(source).split(b'\n') {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            sink.write_line_bytes(&line)?;
        }
        Ok(())
    })
}
