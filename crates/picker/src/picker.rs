use std::fmt;

use config::PickerSettings;
use elements::{ElementType, HandlerRegistry, SelectorDescriptor};
use keychord::KeyEvent;
use pagedom::{Disposition, Document, ListenerKind, NodeId, Page, PointerEvent};
use tracing::{debug, info};

/// Inline style properties touched by the highlight.
const OUTLINE: &str = "outline";
/// See [`OUTLINE`].
const OUTLINE_OFFSET: &str = "outline-offset";

/// Picker lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerState {
    /// Not listening.
    Idle,
    /// Capturing pointer and keyboard events.
    Active,
}

/// A claimed element, handed to the selection callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Type of the handler that claimed the element.
    pub element_type: ElementType,
    /// Descriptor produced by that handler.
    pub selector: SelectorDescriptor,
    /// The element itself, valid for the current page only.
    pub element: NodeId,
}

/// Result of a click while the picker may be active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The picker was idle; the click is not ours.
    Inactive,
    /// The click landed on the hint overlay.
    OnHint,
    /// An element was claimed and the callback ran.
    Selected(ElementType),
    /// No handler claims the element; the picker stays active.
    Unsupported(NodeId),
}

impl ClickOutcome {
    /// What the page should do with the click event.
    pub fn disposition(self) -> Disposition {
        match self {
            Self::Inactive => Disposition::PASS,
            _ => Disposition::CONSUME,
        }
    }
}

/// Callback invoked with the selection; runs at most once per activation.
pub type OnSelect = Box<dyn FnOnce(Selection) + Send>;

/// The currently highlighted element and the inline styles it had before.
#[derive(Debug)]
struct Highlighted {
    /// Highlighted element.
    node: NodeId,
    /// Original inline `outline`.
    outline: Option<String>,
    /// Original inline `outline-offset`.
    offset: Option<String>,
}

/// Per-activation state.
struct Session {
    /// Pending callback.
    on_select: OnSelect,
    /// Current highlight, if any.
    highlighted: Option<Highlighted>,
}

/// Selection-mode state machine for one page.
pub struct ElementPicker {
    /// Appearance and climb depth.
    settings: PickerSettings,
    /// `Some` while active.
    session: Option<Session>,
}

impl fmt::Debug for ElementPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementPicker")
            .field("state", &self.state())
            .field(
                "highlighted",
                &self
                    .session
                    .as_ref()
                    .and_then(|s| s.highlighted.as_ref().map(|h| h.node)),
            )
            .finish()
    }
}

impl Default for ElementPicker {
    fn default() -> Self {
        Self::new(PickerSettings::default())
    }
}

impl ElementPicker {
    /// An idle picker.
    pub fn new(settings: PickerSettings) -> Self {
        Self {
            settings,
            session: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> PickerState {
        if self.session.is_some() {
            PickerState::Active
        } else {
            PickerState::Idle
        }
    }

    /// True while selection mode is on.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The element currently highlighted.
    pub fn highlighted(&self) -> Option<NodeId> {
        self.session
            .as_ref()
            .and_then(|s| s.highlighted.as_ref())
            .map(|h| h.node)
    }

    /// Enter selection mode. Returns false, and drops `on_select`, if already active.
    pub fn activate<P: Page>(
        &mut self,
        page: &mut P,
        on_select: impl FnOnce(Selection) + Send + 'static,
    ) -> bool {
        if self.session.is_some() {
            debug!("picker already active");
            return false;
        }
        for kind in ListenerKind::ALL {
            page.add_listener(kind);
        }
        page.set_cursor(Some(&self.settings.cursor));
        page.show_hint(&self.settings.hint_id, &self.settings.hint_text);
        self.session = Some(Session {
            on_select: Box::new(on_select),
            highlighted: None,
        });
        info!("element picker activated");
        true
    }

    /// Leave selection mode, undoing every page change. Safe to call in any state.
    pub fn deactivate<P: Page>(&mut self, page: &mut P) {
        if let Some(session) = self.session.take() {
            self.teardown(page, session.highlighted);
        }
    }

    /// Detach listeners and remove every visual change.
    fn teardown<P: Page>(&self, page: &mut P, highlighted: Option<Highlighted>) {
        for kind in ListenerKind::ALL {
            page.remove_listener(kind);
        }
        page.set_cursor(None);
        if let Some(h) = highlighted {
            Self::restore(page, h);
        }
        page.remove_hint(&self.settings.hint_id);
        info!("element picker deactivated");
    }

    /// Highlight the nearest claimable element under the pointer.
    pub fn on_pointer_move<P: Page>(
        &mut self,
        page: &mut P,
        registry: &HandlerRegistry,
        event: PointerEvent,
    ) -> Disposition {
        if self.session.is_none() {
            return Disposition::PASS;
        }
        if self.is_on_hint(&*page, event.target) {
            return Disposition::STOP;
        }
        let target = self.resolve_interactive(&*page, registry, event.target);
        let Some(session) = self.session.as_mut() else {
            return Disposition::STOP;
        };
        if session.highlighted.as_ref().is_some_and(|h| h.node == target) {
            return Disposition::STOP;
        }
        if let Some(prev) = session.highlighted.take() {
            Self::restore(page, prev);
        }
        session.highlighted = Some(Highlighted {
            node: target,
            outline: page.style_property(target, OUTLINE),
            offset: page.style_property(target, OUTLINE_OFFSET),
        });
        page.set_style_property(target, OUTLINE, Some(&self.settings.highlight_outline));
        page.set_style_property(target, OUTLINE_OFFSET, Some(&self.settings.highlight_offset));
        Disposition::STOP
    }

    /// Claim the element under the pointer.
    pub fn on_click<P: Page>(
        &mut self,
        page: &mut P,
        registry: &HandlerRegistry,
        event: PointerEvent,
    ) -> ClickOutcome {
        if self.session.is_none() {
            return ClickOutcome::Inactive;
        }
        if self.is_on_hint(&*page, event.target) {
            return ClickOutcome::OnHint;
        }
        let element = self.resolve_interactive(&*page, registry, event.target);
        let Some((element_type, handler)) = registry.detect(&*page, element) else {
            debug!(element = element.raw(), "no handler claims element");
            return ClickOutcome::Unsupported(element);
        };
        let selector = handler.describe(&*page, element);
        debug!(%element_type, css_path = %selector.css_path, "element claimed");
        if let Some(Session {
            on_select,
            highlighted,
        }) = self.session.take()
        {
            self.teardown(page, highlighted);
            on_select(Selection {
                element_type,
                selector,
                element,
            });
        }
        ClickOutcome::Selected(element_type)
    }

    /// `Escape` cancels selection mode without invoking the callback.
    pub fn on_key_down<P: Page>(&mut self, page: &mut P, event: &KeyEvent) -> Disposition {
        if self.session.is_none() || !event.is_escape() {
            return Disposition::PASS;
        }
        debug!("element picker cancelled");
        self.deactivate(page);
        Disposition {
            prevent_default: true,
            stop_propagation: false,
        }
    }

    /// The nearest element accepted by the registry, inspecting `target` and
    /// its ancestors up to the configured climb depth; `target` itself when
    /// none is accepted.
    pub fn resolve_interactive(
        &self,
        doc: &dyn Document,
        registry: &HandlerRegistry,
        target: NodeId,
    ) -> NodeId {
        let mut current = Some(target);
        for depth in 0..self.settings.climb_depth {
            let Some(node) = current else {
                break;
            };
            if registry.detect(doc, node).is_some() {
                if depth > 0 {
                    debug!(depth, "interactive ancestor found");
                }
                return node;
            }
            current = doc.parent_element(node);
        }
        target
    }

    /// True when `node` is the hint overlay or inside it.
    fn is_on_hint(&self, doc: &dyn Document, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if doc.id(n).as_deref() == Some(self.settings.hint_id.as_str()) {
                return true;
            }
            current = doc.parent_element(n);
        }
        false
    }

    /// Put back the inline styles a highlight replaced.
    fn restore<P: Page>(page: &mut P, h: Highlighted) {
        page.set_style_property(h.node, OUTLINE, h.outline.as_deref());
        page.set_style_property(h.node, OUTLINE_OFFSET, h.offset.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use pagedom::{Element, MemoryDom};

    use super::*;

    fn page() -> (MemoryDom, NodeId, NodeId, NodeId) {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let button = dom.append(
            body,
            Element::new("button")
                .class("btn")
                .child(Element::new("span").child(Element::new("b").text("Go"))),
        );
        let span = dom.children(button)[0];
        let text = dom.append(body, Element::new("p").text("plain"));
        (dom, button, span, text)
    }

    #[test]
    fn activation_is_exclusive() {
        let (mut dom, ..) = page();
        let mut picker = ElementPicker::default();
        assert!(picker.activate(&mut dom, |_| {}));
        assert!(!picker.activate(&mut dom, |_| {}));
        assert_eq!(picker.state(), PickerState::Active);
        assert_eq!(dom.listeners().len(), 3);
        assert_eq!(dom.cursor(), Some("crosshair"));
        assert!(dom.element_by_id("webkeybind-selector-tip").is_some());
    }

    #[test]
    fn nested_markup_resolves_to_button() {
        let (dom, button, span, text) = page();
        let reg = HandlerRegistry::with_defaults();
        let picker = ElementPicker::default();
        let bold = dom.children(span)[0];
        assert_eq!(picker.resolve_interactive(&dom, &reg, bold), button);
        assert_eq!(picker.resolve_interactive(&dom, &reg, span), button);
        assert_eq!(picker.resolve_interactive(&dom, &reg, text), text);
    }

    #[test]
    fn climb_depth_limits_search() {
        let (dom, button, span, _) = page();
        let reg = HandlerRegistry::with_defaults();
        let bold = dom.children(span)[0];
        let picker = ElementPicker::new(PickerSettings {
            climb_depth: 2,
            ..PickerSettings::default()
        });
        assert_eq!(picker.resolve_interactive(&dom, &reg, bold), bold);
        assert_eq!(picker.resolve_interactive(&dom, &reg, span), button);
    }

    #[test]
    fn highlight_moves_and_restores() {
        let (mut dom, button, span, text) = page();
        let reg = HandlerRegistry::with_defaults();
        dom.set_style_property(text, "outline", Some("1px dotted blue"));
        let mut picker = ElementPicker::default();
        picker.activate(&mut dom, |_| {});

        let d = picker.on_pointer_move(&mut dom, &reg, PointerEvent { target: span });
        assert_eq!(d, Disposition::STOP);
        assert_eq!(picker.highlighted(), Some(button));
        assert_eq!(
            dom.style_property(button, "outline").as_deref(),
            Some("2px solid #4CAF50")
        );

        picker.on_pointer_move(&mut dom, &reg, PointerEvent { target: text });
        assert_eq!(picker.highlighted(), Some(text));
        assert_eq!(dom.style_property(button, "outline"), None);
        assert_eq!(dom.style_property(button, "outline-offset"), None);

        picker.deactivate(&mut dom);
        assert_eq!(
            dom.style_property(text, "outline").as_deref(),
            Some("1px dotted blue")
        );
    }

    #[test]
    fn hint_events_are_ignored() {
        let (mut dom, ..) = page();
        let reg = HandlerRegistry::with_defaults();
        let mut picker = ElementPicker::default();
        picker.activate(&mut dom, |_| {});
        let hint = dom.element_by_id("webkeybind-selector-tip").expect("hint");
        picker.on_pointer_move(&mut dom, &reg, PointerEvent { target: hint });
        assert_eq!(picker.highlighted(), None);
        assert_eq!(
            picker.on_click(&mut dom, &reg, PointerEvent { target: hint }),
            ClickOutcome::OnHint
        );
        assert!(picker.is_active());
    }

    #[test]
    fn click_selects_once_and_tears_down() {
        let (mut dom, button, span, _) = page();
        let reg = HandlerRegistry::with_defaults();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut picker = ElementPicker::default();
        let seen = Arc::clone(&calls);
        picker.activate(&mut dom, move |sel: Selection| {
            assert_eq!(sel.element_type, ElementType::Button);
            assert_eq!(sel.element, button);
            assert_eq!(sel.selector.text_content, "Go");
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let out = picker.on_click(&mut dom, &reg, PointerEvent { target: span });
        assert_eq!(out, ClickOutcome::Selected(ElementType::Button));
        assert_eq!(out.disposition(), Disposition::CONSUME);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(picker.state(), PickerState::Idle);
        assert!(dom.listeners().is_empty());
        assert_eq!(dom.cursor(), None);
        assert!(dom.element_by_id("webkeybind-selector-tip").is_none());

        let again = picker.on_click(&mut dom, &reg, PointerEvent { target: span });
        assert_eq!(again, ClickOutcome::Inactive);
        assert_eq!(again.disposition(), Disposition::PASS);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(dom.clicks(button), 0);
    }

    #[test]
    fn unsupported_click_keeps_picker_active() {
        let (mut dom, _, _, text) = page();
        let reg = HandlerRegistry::with_defaults();
        let mut picker = ElementPicker::default();
        picker.activate(&mut dom, |_| panic!("must not select"));
        let out = picker.on_click(&mut dom, &reg, PointerEvent { target: text });
        assert_eq!(out, ClickOutcome::Unsupported(text));
        assert!(picker.is_active());
        assert_eq!(dom.listeners().len(), 3);
    }

    #[test]
    fn escape_cancels_without_callback() {
        let (mut dom, ..) = page();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut picker = ElementPicker::default();
        picker.activate(&mut dom, move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(
            picker.on_key_down(&mut dom, &KeyEvent::new("a")),
            Disposition::PASS
        );
        assert!(picker.is_active());
        let d = picker.on_key_down(&mut dom, &KeyEvent::new("Escape"));
        assert!(d.prevent_default);
        assert_eq!(picker.state(), PickerState::Idle);
        assert!(dom.listeners().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        picker.deactivate(&mut dom);
        assert_eq!(picker.state(), PickerState::Idle);
    }
}
