//! JSON framing for the process plugin transport.

use crate::types::{GenerateRequest, GenerateResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;
use thiserror::Error;

/// Method name sqlc passes as `argv[1]` for code generation.
pub const GENERATE_METHOD: &str = "/plugin.CodegenService/Generate";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Failed to decode {what}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode {what}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Unknown RPC method: '{0}'. Expected: /plugin.CodegenService/Generate or generate")]
    UnknownMethod(String),
}

/// RPC methods a codegen plugin answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RpcMethod {
    #[default]
    Generate,
}

impl RpcMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::Generate => GENERATE_METHOD,
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RpcMethod {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            GENERATE_METHOD | "generate" => Ok(RpcMethod::Generate),
            other => Err(ProtocolError::UnknownMethod(other.to_string())),
        }
    }
}

pub fn read_request<R: Read>(reader: R) -> Result<GenerateRequest, ProtocolError> {
    read_message(reader, "GenerateRequest")
}

pub fn read_response<R: Read>(reader: R) -> Result<GenerateResponse, ProtocolError> {
    read_message(reader, "GenerateResponse")
}

pub fn write_request<W: Write>(writer: W, request: &GenerateRequest) -> Result<(), ProtocolError> {
    write_message(writer, request, "GenerateRequest", false)
}

/// Write a response, newline-terminated.
pub fn write_response<W: Write>(
    writer: W,
    response: &GenerateResponse,
    pretty: bool,
) -> Result<(), ProtocolError> {
    write_message(writer, response, "GenerateResponse", pretty)
}

fn read_message<R: Read, T: DeserializeOwned>(
    reader: R,
    what: &'static str,
) -> Result<T, ProtocolError> {
    serde_json::from_reader(reader).map_err(|source| ProtocolError::Decode { what, source })
}

fn write_message<W: Write, T: Serialize>(
    mut writer: W,
    message: &T,
    what: &'static str,
    pretty: bool,
) -> Result<(), ProtocolError> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(message)
    } else {
        serde_json::to_vec(message)
    }
    .map_err(|source| ProtocolError::Encode { what, source })?;

    writer.write_all(&encoded)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
