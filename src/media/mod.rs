use crate::dom::{DomTree, MutationRecord, NodeId, ObserverHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "video" => Some(Self::Video),
            "img" => Some(Self::Image),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaElement {
    pub node: NodeId,
    pub kind: MediaKind,
}

/// Finds filter targets, descending into shadow roots, and owns the
/// insertion observer registration.
#[derive(Debug, Default)]
pub struct MediaLocator {
    observer: Option<ObserverHandle>,
}

impl MediaLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locate<D: DomTree + ?Sized>(&self, dom: &D, include_images: bool) -> Vec<MediaElement> {
        let mut found = Vec::new();
        collect_media(dom, dom.root(), include_images, &mut found);
        found
    }

    pub fn count_videos<D: DomTree + ?Sized>(&self, dom: &D) -> usize {
        self.locate(dom, false).len()
    }

    pub fn is_observing(&self) -> bool {
        self.observer.is_some()
    }

    pub fn observe<D: DomTree + ?Sized>(&mut self, dom: &mut D) {
        if self.observer.is_none() {
            self.observer = Some(dom.observe_insertions());
            tracing::debug!("started observing media insertions");
        }
    }

    pub fn disconnect<D: DomTree + ?Sized>(&mut self, dom: &mut D) {
        if let Some(handle) = self.observer.take() {
            dom.disconnect(handle);
            tracing::debug!("stopped observing media insertions");
        }
    }

    /// Whether any added node is, or contains, a filter target.
    pub fn mutation_adds_media<D: DomTree + ?Sized>(
        &self,
        dom: &D,
        record: &MutationRecord,
        include_images: bool,
    ) -> bool {
        if self.observer.is_none() {
            return false;
        }
        record.added.iter().any(|node| {
            if is_match(dom, *node, include_images).is_some() {
                return true;
            }
            let mut found = Vec::new();
            collect_media(dom, *node, include_images, &mut found);
            !found.is_empty()
        })
    }
}

fn is_match<D: DomTree + ?Sized>(dom: &D, node: NodeId, include_images: bool) -> Option<MediaKind> {
    let kind = dom.tag_name(node).and_then(MediaKind::from_tag)?;
    match kind {
        MediaKind::Image if !include_images => None,
        kind => Some(kind),
    }
}

// Direct matches under `root` first, then every element's shadow root.
fn collect_media<D: DomTree + ?Sized>(
    dom: &D,
    root: NodeId,
    include_images: bool,
    found: &mut Vec<MediaElement>,
) {
    let descendants = descendants(dom, root);
    for node in &descendants {
        if let Some(kind) = is_match(dom, *node, include_images) {
            found.push(MediaElement { node: *node, kind });
        }
    }
    for node in descendants.iter().copied().chain(std::iter::once(root)) {
        if let Some(shadow) = dom.shadow_root(node) {
            collect_media(dom, shadow, include_images, found);
        }
    }
}

fn descendants<D: DomTree + ?Sized>(dom: &D, root: NodeId) -> Vec<NodeId> {
    let mut ordered = Vec::new();
    let mut stack: Vec<NodeId> = dom.children(root).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        ordered.push(node);
        stack.extend(dom.children(node).into_iter().rev());
    }
    ordered
}
