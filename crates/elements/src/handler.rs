use pagedom::{Document, DomError, NodeId, Page};

use crate::{ElementType, SelectorDescriptor};

/// Strategy for one family of interactive elements.
///
/// Handlers are stateless with respect to the page: every method receives the
/// document it works on, so a single registry serves any number of pages.
pub trait ElementHandler: Send + Sync {
    /// The family this handler serves.
    fn element_type(&self) -> ElementType;

    /// True when this handler claims `element`. Must not mutate anything.
    fn can_handle(&self, doc: &dyn Document, element: NodeId) -> bool;

    /// Activate `element` once through its native behavior.
    fn trigger(&self, page: &mut dyn Page, element: NodeId) -> Result<(), DomError>;

    /// Snapshot `element` into a descriptor that can find it again later.
    fn describe(&self, doc: &dyn Document, element: NodeId) -> SelectorDescriptor;

    /// Resolve a descriptor against the live document. `None` means the
    /// element is currently unreachable.
    fn find_element(&self, doc: &dyn Document, descriptor: &SelectorDescriptor)
    -> Option<NodeId>;
}
