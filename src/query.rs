//! Query execution: compiled expressions driven over a document.

use std::sync::OnceLock;

use htmlpath_xpath1::Navigator;

use crate::cache::QueryCache;
use crate::error::Error;
use crate::navigator::NodeNavigator;
use crate::node::Node;

/// Executes path expressions against documents, caching their compiled
/// forms.
///
/// One `Queryer` can serve any number of threads; the only shared state
/// is the cache, which locks internally. Construct one per configuration
/// and pass it around, or use the free functions in this module for the
/// shared default instance.
#[derive(Debug, Default)]
pub struct Queryer {
    cache: QueryCache,
}

impl Queryer {
    /// An executor with the default cache configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// An executor backed by an explicitly configured cache.
    pub fn with_cache(cache: QueryCache) -> Self {
        Queryer { cache }
    }

    /// The cache backing this executor.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// All nodes selected by evaluating `path` with `node` as the
    /// context, in the order the engine produced them.
    ///
    /// A path that selects an attribute and then climbs back out of it
    /// revisits its own starting match, so one duplicate of the first
    /// result is dropped: a candidate is skipped when it equals the
    /// first accumulated node, or when its cursor sits on an attribute
    /// whose key and value match that node's data and text. Later
    /// results are not deduplicated against each other.
    pub fn query_all<'d>(&self, node: &Node<'d>, path: &str) -> Result<Vec<Node<'d>>, Error> {
        let compiled = self.cache.get_or_compile(path).map_err(Error::Compile)?;
        let Node::Tree { doc, id } = *node else {
            // Synthetic nodes are detached from any document; nothing
            // can be selected from them.
            return Ok(Vec::new());
        };

        let selected = compiled
            .select(NodeNavigator::new(doc, id))
            .map_err(Error::Evaluate)?;

        let mut results: Vec<Node<'d>> = Vec::with_capacity(selected.len());
        for nav in selected {
            let candidate = nav.current_node();
            if let Some(first) = results.first() {
                if candidate == *first
                    || (nav.is_on_attribute()
                        && nav.local_name() == first.data()
                        && nav.value() == first.inner_text())
                {
                    continue;
                }
            }
            results.push(candidate);
        }
        Ok(results)
    }

    /// The first node selected by `path`, or `None`. The full result set
    /// is evaluated; this takes its head.
    pub fn query<'d>(&self, node: &Node<'d>, path: &str) -> Result<Option<Node<'d>>, Error> {
        Ok(self.query_all(node, path)?.into_iter().next())
    }

    /// Like [`query_all`](Queryer::query_all), for callers who guarantee
    /// `path` is valid.
    ///
    /// # Panics
    /// Panics if the expression fails to compile or evaluate.
    pub fn find<'d>(&self, node: &Node<'d>, path: &str) -> Vec<Node<'d>> {
        match self.query_all(node, path) {
            Ok(nodes) => nodes,
            Err(err) => panic!("query '{path}': {err}"),
        }
    }

    /// Like [`query`](Queryer::query), for callers who guarantee `path`
    /// is valid.
    ///
    /// # Panics
    /// Panics if the expression fails to compile or evaluate.
    pub fn find_one<'d>(&self, node: &Node<'d>, path: &str) -> Option<Node<'d>> {
        match self.query(node, path) {
            Ok(node) => node,
            Err(err) => panic!("query '{path}': {err}"),
        }
    }
}

/// The shared executor behind the free functions and the [`Node`]
/// convenience methods. Callers who need a different cache configuration
/// construct their own [`Queryer`].
pub(crate) fn default_queryer() -> &'static Queryer {
    static DEFAULT: OnceLock<Queryer> = OnceLock::new();
    DEFAULT.get_or_init(Queryer::new)
}

/// All nodes selected by `path` from `node`, through the shared default
/// executor.
pub fn query_all<'d>(node: &Node<'d>, path: &str) -> Result<Vec<Node<'d>>, Error> {
    default_queryer().query_all(node, path)
}

/// The first node selected by `path` from `node`, through the shared
/// default executor.
pub fn query<'d>(node: &Node<'d>, path: &str) -> Result<Option<Node<'d>>, Error> {
    default_queryer().query(node, path)
}
