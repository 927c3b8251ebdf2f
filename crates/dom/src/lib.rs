pub mod error;
pub mod tree;

mod parse;
mod serialize;

pub use error::DomError;
pub use tree::{Attribute, Children, Document, NodeData, NodeId, NodeType};
