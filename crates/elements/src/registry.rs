use std::fmt;

use pagedom::{Document, NodeId};
use thiserror::Error;

use crate::{ButtonHandler, ElementHandler, ElementType};

/// Errors raised while building a registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The handler declares a different element type than it was registered for.
    #[error("Handler for '{actual}' cannot be registered as '{requested}'")]
    InvalidHandler {
        /// Type requested at registration.
        requested: ElementType,
        /// Type the handler declares.
        actual: ElementType,
    },
}

/// Handlers keyed by element type. Registration order is detection priority.
#[derive(Default)]
pub struct HandlerRegistry {
    /// Entries in priority order.
    handlers: Vec<(ElementType, Box<dyn ElementHandler>)>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("types", &self.supported_types())
            .finish()
    }
}

impl HandlerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in handlers.
    pub fn with_defaults() -> Self {
        Self::with_button_handler(ButtonHandler::default())
    }

    /// A registry whose only entry is the given button handler.
    pub fn with_button_handler(button: ButtonHandler) -> Self {
        Self {
            handlers: vec![(ElementType::Button, Box::new(button))],
        }
    }

    /// Register `handler` for `ty`. Re-registering a type replaces the handler
    /// and keeps its priority slot.
    pub fn register(
        &mut self,
        ty: ElementType,
        handler: Box<dyn ElementHandler>,
    ) -> Result<(), RegistryError> {
        let actual = handler.element_type();
        if actual != ty {
            return Err(RegistryError::InvalidHandler {
                requested: ty,
                actual,
            });
        }
        match self.handlers.iter_mut().find(|(t, _)| *t == ty) {
            Some(slot) => slot.1 = handler,
            None => self.handlers.push((ty, handler)),
        }
        Ok(())
    }

    /// The first handler, in priority order, that claims `element`.
    pub fn detect(
        &self,
        doc: &dyn Document,
        element: NodeId,
    ) -> Option<(ElementType, &dyn ElementHandler)> {
        self.handlers
            .iter()
            .find(|(_, h)| h.can_handle(doc, element))
            .map(|(t, h)| (*t, h.as_ref()))
    }

    /// The handler registered for `ty`.
    pub fn handler(&self, ty: ElementType) -> Option<&dyn ElementHandler> {
        self.handlers
            .iter()
            .find(|(t, _)| *t == ty)
            .map(|(_, h)| h.as_ref())
    }

    /// Registered types in priority order.
    pub fn supported_types(&self) -> Vec<ElementType> {
        self.handlers.iter().map(|(t, _)| *t).collect()
    }
}

#[cfg(test)]
mod tests {
    use pagedom::{DomError, Element, MemoryDom, Page};

    use super::*;
    use crate::SelectorDescriptor;

    /// Claims anything with a `data-action` attribute.
    struct ActionHandler(ElementType);

    impl ElementHandler for ActionHandler {
        fn element_type(&self) -> ElementType {
            self.0
        }

        fn can_handle(&self, doc: &dyn Document, element: NodeId) -> bool {
            doc.attribute(element, "data-action").is_some()
        }

        fn trigger(&self, page: &mut dyn Page, element: NodeId) -> Result<(), DomError> {
            page.click(element)
        }

        fn describe(&self, _doc: &dyn Document, _element: NodeId) -> SelectorDescriptor {
            SelectorDescriptor::default()
        }

        fn find_element(
            &self,
            _doc: &dyn Document,
            _descriptor: &SelectorDescriptor,
        ) -> Option<NodeId> {
            None
        }
    }

    #[test]
    fn rejects_mismatched_handler() {
        let mut reg = HandlerRegistry::new();
        let err = reg
            .register(ElementType::Link, Box::new(ButtonHandler::default()))
            .expect_err("mismatch");
        assert_eq!(
            err,
            RegistryError::InvalidHandler {
                requested: ElementType::Link,
                actual: ElementType::Button
            }
        );
        assert!(reg.supported_types().is_empty());
    }

    #[test]
    fn detection_follows_registration_order() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let both = dom.append(body, Element::new("button").attr("data-action", "go"));
        let custom_only = dom.append(body, Element::new("div").attr("data-action", "go"));
        let neither = dom.append(body, Element::new("div"));

        let mut reg = HandlerRegistry::with_defaults();
        reg.register(ElementType::Custom, Box::new(ActionHandler(ElementType::Custom)))
            .expect("register");
        assert_eq!(
            reg.supported_types(),
            vec![ElementType::Button, ElementType::Custom]
        );

        for _ in 0..3 {
            assert_eq!(reg.detect(&dom, both).map(|d| d.0), Some(ElementType::Button));
        }
        assert_eq!(
            reg.detect(&dom, custom_only).map(|d| d.0),
            Some(ElementType::Custom)
        );
        assert!(reg.detect(&dom, neither).is_none());
    }

    #[test]
    fn reregistering_keeps_priority_slot() {
        let mut reg = HandlerRegistry::new();
        reg.register(ElementType::Link, Box::new(ActionHandler(ElementType::Link)))
            .expect("register");
        reg.register(ElementType::Button, Box::new(ButtonHandler::default()))
            .expect("register");
        reg.register(ElementType::Link, Box::new(ActionHandler(ElementType::Link)))
            .expect("register");
        assert_eq!(
            reg.supported_types(),
            vec![ElementType::Link, ElementType::Button]
        );
        assert!(reg.handler(ElementType::Input).is_none());
        assert!(reg.handler(ElementType::Button).is_some());
    }
}
