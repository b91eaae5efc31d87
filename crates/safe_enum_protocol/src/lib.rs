//! sqlc Process Plugin Protocol (JSON encoding)
//!
//! sqlc runs a process plugin as a child process:
//!
//! ```text
//! <plugin> /plugin.CodegenService/Generate  < GenerateRequest  > GenerateResponse
//! ```
//!
//! - `argv[1]` names the RPC method
//! - stdin carries one `GenerateRequest`, stdout one `GenerateResponse`
//! - a non-zero exit status with text on stderr reports failure
//!
//! Messages use the protobuf JSON mapping. Only the fields the enum pass
//! reads or writes are modelled; everything else rides along untouched in
//! each message's `extra` map so downstream generators see the full request.

pub mod codec;
pub mod types;

pub use codec::{
    read_request, read_response, write_request, write_response, ProtocolError, RpcMethod,
    GENERATE_METHOD,
};
pub use types::{Catalog, Enum, File, GenerateRequest, GenerateResponse, Query, Schema};
