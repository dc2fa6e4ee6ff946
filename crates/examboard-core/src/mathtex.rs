//! Boundary types for the external LaTeX-to-markup converter.
//!
//! The converter itself is a separate batch process owned by the site; this
//! module fixes the shapes crossing its stdin/stdout boundary and the batch
//! degradation rules, so both sides agree on them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Converter errors.
#[derive(Debug, Error)]
pub enum MathError {
    #[error("renderer failed: {0}")]
    Render(String),
    #[error("output encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One formula to convert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathRequest {
    pub latex: String,
    #[serde(default)]
    pub display: bool,
}

/// Classified converter input: a bare formula, one request object, or a
/// batch of requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathInput {
    Raw(String),
    Single(MathRequest),
    Batch(Vec<MathRequest>),
}

impl MathInput {
    /// Classify raw converter input.
    ///
    /// A valid JSON array of requests wins, then a single request object;
    /// anything else is treated as a bare formula string.
    pub fn parse(input: &str) -> MathInput {
        let trimmed = input.trim();
        if let Ok(batch) = serde_json::from_str::<Vec<MathRequest>>(trimmed) {
            return MathInput::Batch(batch);
        }
        if let Ok(single) = serde_json::from_str::<MathRequest>(trimmed) {
            return MathInput::Single(single);
        }
        MathInput::Raw(input.to_string())
    }
}

/// Markup producer behind the boundary. The production implementation
/// shells out to the MathJax process; tests substitute their own.
pub trait MathRenderer {
    fn render(&self, latex: &str, display: bool) -> Result<String, MathError>;
}

/// Run a renderer over classified input.
///
/// Raw input yields raw markup (display mode) and a failure propagates; a
/// single request yields one markup string; a batch yields a JSON array of
/// markup strings where each failed entry degrades to `""` instead of
/// failing the whole batch.
pub fn convert<R: MathRenderer>(renderer: &R, input: &MathInput) -> Result<String, MathError> {
    match input {
        MathInput::Raw(latex) => renderer.render(latex, true),
        MathInput::Single(request) => renderer.render(&request.latex, request.display),
        MathInput::Batch(requests) => {
            let rendered: Vec<String> = requests
                .iter()
                .map(|request| {
                    renderer
                        .render(&request.latex, request.display)
                        .unwrap_or_else(|e| {
                            log::warn!("formula {:?} failed: {e}", request.latex);
                            String::new()
                        })
                })
                .collect();
            Ok(serde_json::to_string(&rendered)?)
        }
    }
}
