pub mod cache;
pub mod error;
pub mod navigator;
pub mod node;
pub mod query;

pub use cache::{CacheConfig, QueryCache};
pub use error::Error;
pub use navigator::NodeNavigator;
pub use node::{ChildNodes, Node};
pub use query::{Queryer, query, query_all};

// The document model and the expression types callers hold directly.
pub use htmlpath_dom::{Attribute, Document, DomError, NodeId, NodeType};
pub use htmlpath_xpath1::{Expression, Navigator, NodeKind, XPathError};
