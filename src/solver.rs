use crate::error::{Error, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Substring of the first output line by which the solver reports bad input.
pub const INVALID_MARKER: &str = "Invalid";

/// Lines the solver printed, error case already excluded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverOutput {
    pub lines: Vec<String>,
}

impl SolverOutput {
    /// Checks the solver's error signal.
    ///
    /// Fails with [`Error::SolverValidation`] carrying the trimmed first line when that line
    /// contains `"Invalid"`.
    pub fn from_lines(lines: Vec<String>) -> Result<Self> {
        if let Some(first) = lines.first() {
            if first.contains(INVALID_MARKER) {
                return Err(Error::SolverValidation(first.trim().to_string()));
            }
        }
        Ok(Self { lines })
    }
}

/// Something that turns an input file into solver output.
pub trait Solver {
    fn run(&self, input: &Path) -> Result<SolverOutput>;
}

/// Runs the external solver as `<program> <args...> <input>` and captures its stdout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessSolver {
    pub program: String,
    pub args: Vec<String>,
}

impl ProcessSolver {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Solver for ProcessSolver {
    /// Blocks until the solver closes its stdout; there is no timeout.
    fn run(&self, input: &Path) -> Result<SolverOutput> {
        debug!(program = %self.program, args = ?self.args, input = %input.display(), "starting solver");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| Error::SolverSpawn {
                program: self.program.clone(),
                source,
            })?;

        let read = match child.stdout.take() {
            Some(stdout) => read_output(stdout),
            None => Ok(SolverOutput { lines: Vec::new() }),
        };
        // reap the child on every path, including a failed read
        let status = child.wait().map_err(Error::SolverIo)?;
        if !status.success() {
            warn!(%status, "solver exited unsuccessfully");
        }

        let output = read?;
        debug!(lines = output.lines.len(), "solver finished");
        Ok(output)
    }
}

/// Reads solver stdout, judging the first line before the rest is touched.
///
/// A rejection line wins over whatever follows it, so bytes after an `Invalid` line are
/// never decoded. The pipe is closed on return.
fn read_output(stdout: impl Read) -> Result<SolverOutput> {
    let mut reader = BufReader::new(stdout);
    let mut first = String::new();
    if reader.read_line(&mut first).map_err(Error::SolverIo)? == 0 {
        return Ok(SolverOutput { lines: Vec::new() });
    }
    let first = first.trim_end_matches(['\n', '\r']).to_string();
    if first.contains(INVALID_MARKER) {
        return Err(Error::SolverValidation(first.trim().to_string()));
    }

    let mut lines = vec![first];
    for line in reader.lines() {
        lines.push(line.map_err(Error::SolverIo)?);
    }
    Ok(SolverOutput { lines })
}

/// Replays fixed output instead of spawning a process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CannedSolver {
    pub lines: Vec<String>,
}

impl CannedSolver {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl Solver for CannedSolver {
    fn run(&self, _input: &Path) -> Result<SolverOutput> {
        SolverOutput::from_lines(self.lines.clone())
    }
}
