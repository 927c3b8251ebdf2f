pub mod ast;
pub mod axes;
pub mod engine;
pub mod error;
pub mod functions;
pub mod navigator;
pub mod operators;
pub mod parser;

pub use ast::{Axis, BinaryOperator, Expr, LocationPath, NodeTest, Step};
pub use engine::{EvaluationContext, Expression, XPathValue, evaluate};
pub use navigator::{Navigator, NodeKind};

// Re-export test utilities for integration testing in downstream crates
pub use navigator::tests;
pub use error::XPathError;
pub use parser::parse_expression;
