//! Execution context for building targets
//!
//! The context carries everything a build needs besides the rules
//! themselves: where to run, how to run, how loud to be and where output
//! goes.

use colored::Colorize;
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared, thread-safe output destination
///
/// Clones write to the same underlying writer, so a command's stdout and
/// stderr readers can each hold one while the build loop holds another.
#[derive(Clone)]
pub struct Sink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Sink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Sink {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// In-memory sink plus a handle to read back what was written
    pub fn buffer() -> (Self, SinkBuffer) {
        let buffer = SinkBuffer::default();
        (Self::new(buffer.clone()), buffer)
    }

    /// Write `line` followed by a newline
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        self.write_line_bytes(line.as_bytes())
    }

    pub fn write_line_bytes(&self, line: &[u8]) -> io::Result<()> {
        let mut writer = self.lock();
        writer.write_all(line)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Read side of [`Sink::buffer`]
#[derive(Clone, Default)]
pub struct SinkBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SinkBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SinkBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self.bytes.lock().unwrap_or_else(|e| e.into_inner());
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

/// Execution context shared by every target of a run
#[derive(Clone)]
pub struct Context {
    /// Directory targets are resolved against and commands run in
    pub working_dir: PathBuf,

    /// Shell used to run command lines (e.g., ["sh", "-c"])
    pub interpreter: Vec<String>,

    /// Verbosity level
    pub verbosity: Verbosity,

    /// Print commands instead of running them
    pub dry_run: bool,

    /// Command echo and command stdout
    pub out: Sink,

    /// Diagnostics and command stderr
    pub err: Sink,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            verbosity: Verbosity::Normal,
            dry_run: false,
            out: Sink::stdout(),
            err: Sink::stderr(),
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Redirect output and diagnostics
    pub fn with_sinks(mut self, out: Sink, err: Sink) -> Self {
        self.out = out;
        self.err = err;
        self
    }

    /// Path of a target relative to the working directory
    pub fn target_path(&self, target: &str) -> PathBuf {
        self.working_dir.join(Path::new(target))
    }

    /// Print a command line before it runs
    pub fn echo_command(&self, command: &str) -> io::Result<()> {
        if self.verbosity >= Verbosity::Normal {
            self.out.write_line(command)?;
        }
        Ok(())
    }

    /// Report that a requested target needed no work
    pub fn print_up_to_date(&self, target: &str) -> io::Result<()> {
        if self.verbosity >= Verbosity::Normal {
            self.out.write_line(&format!("rmk: '{}' is up to date.", target))?;
        }
        Ok(())
    }

    /// Print warning message
    pub fn print_warning(&self, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            let _ = self.err.write_line(&format!("rmk: {}", message).yellow().to_string());
        }
    }

    /// Print debug message (only in verbose mode)
    pub fn print_debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            let _ = self.err.write_line(&format!("[DEBUG] {}", message));
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
