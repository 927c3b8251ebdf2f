use htmlpath_dom::DomError;
use htmlpath_xpath1::XPathError;
use thiserror::Error;

/// Errors surfaced by document loading and query execution.
///
/// `Compile` and `Evaluate` both wrap [`XPathError`], so the query layer
/// converts with explicit `map_err` calls instead of `#[from]`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Expression failed to compile: {0}")]
    Compile(#[source] XPathError),

    #[error("Expression failed to evaluate: {0}")]
    Evaluate(#[source] XPathError),

    #[error("Parsing failed: {0}")]
    Parse(#[from] DomError),

    #[error("Node is not an element")]
    NotAnElement,

    #[error("No attribute named '{0}'")]
    NoSuchAttribute(String),
}
