use super::{DomError, DomResult, DomTree, MutationRecord, NodeId, ObserverHandle};

const SHADOW_ROOT_TAG: &str = "#shadow-root";

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    children: Vec<NodeId>,
    shadow_root: Option<NodeId>,
    style_filter: Option<String>,
    playback_rate: f64,
    detached: bool,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            children: Vec::new(),
            shadow_root: None,
            style_filter: None,
            playback_rate: 1.0,
            detached: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdElementKind {
    Markup,
    Style,
}

#[derive(Debug, Clone)]
struct IdElement {
    id: String,
    kind: IdElementKind,
    content: String,
}

/// Arena-backed document used by headless hosts and tests.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    body: NodeId,
    id_elements: Vec<IdElement>,
    observers: Vec<ObserverHandle>,
    next_observer: u64,
    pending: MutationRecord,
}

impl MemoryDom {
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: vec![NodeData::new("html")],
            body: NodeId(0),
            id_elements: Vec::new(),
            observers: Vec::new(),
            next_observer: 1,
            pending: MutationRecord::default(),
        };
        dom.body = dom.push_child(NodeId(0), "body");
        dom
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    fn push_child(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(tag));
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.push(id);
        }
        id
    }

    /// Appends an element and queues it for the next mutation record.
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.push_child(parent, tag);
        self.pending.added.push(id);
        id
    }

    pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
        if let Some(existing) = self.shadow_root(host) {
            return existing;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(SHADOW_ROOT_TAG));
        if let Some(host) = self.nodes.get_mut(host.0) {
            host.shadow_root = Some(id);
        }
        id
    }

    /// Leaves the node reachable but makes every write to it fail, the way a
    /// stale reference behaves after page script removes the element.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.detached = true;
        }
    }

    pub fn take_mutations(&mut self) -> MutationRecord {
        std::mem::take(&mut self.pending)
    }

    pub fn style_filter(&self, node: NodeId) -> Option<&str> {
        self.nodes
            .get(node.0)
            .and_then(|data| data.style_filter.as_deref())
    }

    pub fn playback_rate(&self, node: NodeId) -> Option<f64> {
        self.nodes.get(node.0).map(|data| data.playback_rate)
    }

    pub fn markup(&self, id: &str) -> Option<&str> {
        self.find_id_element(id, IdElementKind::Markup)
    }

    pub fn stylesheet(&self, id: &str) -> Option<&str> {
        self.find_id_element(id, IdElementKind::Style)
    }

    pub fn count_id(&self, id: &str) -> usize {
        self.id_elements
            .iter()
            .filter(|element| element.id == id)
            .count()
    }

    pub fn active_observers(&self) -> usize {
        self.observers.len()
    }

    fn find_id_element(&self, id: &str, kind: IdElementKind) -> Option<&str> {
        self.id_elements
            .iter()
            .find(|element| element.id == id && element.kind == kind)
            .map(|element| element.content.as_str())
    }

    fn writable(&mut self, node: NodeId) -> DomResult<&mut NodeData> {
        let data = self
            .nodes
            .get_mut(node.0)
            .ok_or(DomError::UnknownNode(node))?;
        if data.detached {
            return Err(DomError::Detached(node));
        }
        Ok(data)
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree for MemoryDom {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|data| data.tag.as_str())
    }

    fn shadow_root(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|data| data.shadow_root)
    }

    fn set_style_filter(&mut self, node: NodeId, value: Option<&str>) -> DomResult<()> {
        let data = self.writable(node)?;
        data.style_filter = value.map(str::to_string);
        Ok(())
    }

    fn set_playback_rate(&mut self, node: NodeId, rate: f64) -> DomResult<()> {
        let data = self.writable(node)?;
        data.playback_rate = rate;
        Ok(())
    }

    fn insert_markup(&mut self, id: &str, markup: &str) -> DomResult<()> {
        self.id_elements.push(IdElement {
            id: id.to_string(),
            kind: IdElementKind::Markup,
            content: markup.to_string(),
        });
        Ok(())
    }

    fn remove_by_id(&mut self, id: &str) -> bool {
        let before = self.id_elements.len();
        self.id_elements.retain(|element| element.id != id);
        self.id_elements.len() != before
    }

    fn contains_id(&self, id: &str) -> bool {
        self.id_elements.iter().any(|element| element.id == id)
    }

    fn replace_stylesheet(&mut self, id: &str, css: &str) -> DomResult<()> {
        self.remove_by_id(id);
        self.id_elements.push(IdElement {
            id: id.to_string(),
            kind: IdElementKind::Style,
            content: css.to_string(),
        });
        Ok(())
    }

    fn observe_insertions(&mut self) -> ObserverHandle {
        let handle = ObserverHandle(self.next_observer);
        self.next_observer += 1;
        self.observers.push(handle);
        handle
    }

    fn disconnect(&mut self, handle: ObserverHandle) {
        self.observers.retain(|observer| *observer != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_queues_mutations_until_taken() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let video = dom.append(body, "VIDEO");

        assert_eq!(dom.tag_name(video), Some("video"));
        assert_eq!(dom.take_mutations().added, vec![video]);
        assert!(dom.take_mutations().added.is_empty());
    }

    #[test]
    fn detached_nodes_reject_writes() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let video = dom.append(body, "video");
        dom.detach(video);

        let err = dom
            .set_style_filter(video, Some("brightness(1)"))
            .expect_err("detached node should reject writes");
        assert_eq!(err, DomError::Detached(video));
        assert_eq!(dom.style_filter(video), None);
    }

    #[test]
    fn replace_stylesheet_keeps_single_element() {
        let mut dom = MemoryDom::new();
        dom.replace_stylesheet("theme", "a {}").unwrap();
        dom.replace_stylesheet("theme", "b {}").unwrap();

        assert_eq!(dom.count_id("theme"), 1);
        assert_eq!(dom.stylesheet("theme"), Some("b {}"));
    }
}
