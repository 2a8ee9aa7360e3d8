use thiserror::Error;

mod memory;

pub use memory::MemoryDom;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("node {0:?} is no longer attached to the document")]
    Detached(NodeId),
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
}

pub type DomResult<T> = std::result::Result<T, DomError>;

/// Nodes added to the document since the observer last fired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationRecord {
    pub added: Vec<NodeId>,
}

/// The host page as seen by the filter engine.
///
/// Tag names are reported lowercase. Shadow roots are separate subtrees
/// reachable only through [`DomTree::shadow_root`].
pub trait DomTree {
    fn root(&self) -> NodeId;
    fn children(&self, node: NodeId) -> Vec<NodeId>;
    fn tag_name(&self, node: NodeId) -> Option<&str>;
    fn shadow_root(&self, node: NodeId) -> Option<NodeId>;

    fn set_style_filter(&mut self, node: NodeId, value: Option<&str>) -> DomResult<()>;
    fn set_playback_rate(&mut self, node: NodeId, rate: f64) -> DomResult<()>;

    /// Inserts raw markup under the document body, keyed by `id`.
    fn insert_markup(&mut self, id: &str, markup: &str) -> DomResult<()>;
    /// Returns whether an element carrying `id` existed.
    fn remove_by_id(&mut self, id: &str) -> bool;
    fn contains_id(&self, id: &str) -> bool;

    /// Creates or replaces the `<style>` element keyed by `id`.
    fn replace_stylesheet(&mut self, id: &str, css: &str) -> DomResult<()>;

    fn observe_insertions(&mut self) -> ObserverHandle;
    fn disconnect(&mut self, handle: ObserverHandle);
}
