//! safe.enum Validation Pass
//!
//! Queries may reference enum values as `safe.enum('Type', 'Value')`. Before
//! any code is generated, every reference is checked against the catalog:
//!
//! 1. **Index**: all enum declarations from every schema are collected
//! 2. **Rewrite**: each valid reference becomes the literal `'Value'`
//! 3. **Aggregate**: every invalid reference in every query is reported at once
//! 4. **Handoff**: only a fully valid request reaches the generator
//!
//! There is no partial success. One bad reference anywhere aborts generation,
//! and the error lists all of them.
//!
//! # Modules
//!
//! - [`enum_index`]: enum name -> legal values
//! - [`annotation`]: scanning and rewriting one query
//! - [`error`]: validation errors and the aggregate diagnostic
//! - [`generator`]: downstream generators (subprocess, check-only)

pub mod annotation;
pub mod enum_index;
pub mod error;
pub mod generator;

pub use annotation::{find_annotations, rewrite_annotations, AnnotationRef, QueryOutcome};
pub use enum_index::EnumIndex;
pub use error::{aggregate, AggregateError, CheckError, ValidationError, ValidationErrorKind};
pub use generator::{CheckOnlyGenerator, Generator, GeneratorError, ProcessGenerator};

use safe_enum_protocol::{GenerateRequest, GenerateResponse};
use tracing::{debug, info, warn};

/// Rewrite every query of `request` in place and validate its annotations.
///
/// Valid references are rewritten even when others fail; on error the caller
/// must not forward the request.
pub fn check(request: &mut GenerateRequest) -> Result<(), AggregateError> {
    let index = EnumIndex::build(request.schemas());
    debug!(enum_types = index.len(), queries = request.queries.len(), "built enum index");

    let mut per_query = Vec::with_capacity(request.queries.len());
    let mut rewrites = 0;
    for query in &mut request.queries {
        let outcome = rewrite_annotations(&query.text, &index);
        if outcome.rewrites > 0 || !outcome.errors.is_empty() {
            debug!(
                query = %query.name,
                rewrites = outcome.rewrites,
                errors = outcome.errors.len(),
                "scanned query"
            );
        }
        rewrites += outcome.rewrites;
        query.text = outcome.text;
        per_query.push(outcome.errors);
    }

    aggregate(per_query)
        .inspect(|_| info!(rewrites, "safe.enum references validated"))
        .inspect_err(|err| warn!(errors = err.len(), "invalid safe.enum references"))
}

/// Validate and rewrite `request`, then hand it to `generator`.
///
/// The generator is only called when every reference is valid; its response
/// and errors are returned unchanged.
pub fn check_then_generate<G>(
    mut request: GenerateRequest,
    generator: &G,
) -> Result<GenerateResponse, CheckError>
where
    G: Generator + ?Sized,
{
    check(&mut request)?;
    Ok(generator.generate(request)?)
}
