//! Downstream code generators.
//!
//! The pass hands a validated request to a [`Generator`] and returns whatever
//! it produces. [`ProcessGenerator`] speaks the same process plugin protocol
//! sqlc uses, so any JSON-format sqlc plugin can sit behind this one.

use safe_enum_protocol::{
    read_response, write_request, GenerateRequest, GenerateResponse, ProtocolError, RpcMethod,
};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Failed to spawn generator '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Generator I/O error")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// Non-zero exit; `stderr` is the generator's own message, relayed
    /// verbatim. A downstream sqlc plugin usually prints its own
    /// `error generating code:` prefix, so the host shows it twice.
    #[error("{stderr}")]
    Failed { status: ExitStatus, stderr: String },
    #[error("{0}")]
    Message(String),
}

/// Turns a validated request into generated files.
pub trait Generator {
    fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, GeneratorError>;
}

impl<F> Generator for F
where
    F: Fn(GenerateRequest) -> Result<GenerateResponse, GeneratorError>,
{
    fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, GeneratorError> {
        self(request)
    }
}

/// Validate only: answers every request with no files.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOnlyGenerator;

impl Generator for CheckOnlyGenerator {
    fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, GeneratorError> {
        Ok(GenerateResponse::empty())
    }
}

/// Runs another sqlc process plugin: `<program> [args..] <method>`, request
/// JSON on stdin, response JSON on stdout.
#[derive(Debug, Clone)]
pub struct ProcessGenerator {
    program: PathBuf,
    args: Vec<String>,
    method: RpcMethod,
}

impl ProcessGenerator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            method: RpcMethod::default(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_method(mut self, method: RpcMethod) -> Self {
        self.method = method;
        self
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }
}

impl Generator for ProcessGenerator {
    fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, GeneratorError> {
        let mut encoded = Vec::new();
        write_request(&mut encoded, &request)?;

        tracing::debug!(
            program = %self.program().display(),
            method = %self.method,
            bytes = encoded.len(),
            "spawning generator"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(self.method.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GeneratorError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| GeneratorError::Message("Failed to capture generator stdin".to_string()))?;
        // The child may fill stdout before it has read all of stdin.
        let writer = thread::spawn(move || stdin.write_all(&encoded));

        let output = child.wait_with_output()?;
        let write_result = writer
            .join()
            .map_err(|_| GeneratorError::Message("Generator stdin writer panicked".to_string()))?;

        if !output.status.success() {
            return Err(GeneratorError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }
        // A successful generator may exit without draining its stdin.
        match write_result {
            Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::debug!("generator exited before reading the whole request");
            }
            other => other?,
        }

        let response = read_response(output.stdout.as_slice())?;
        tracing::debug!(files = response.files.len(), "generator finished");
        Ok(response)
    }
}
