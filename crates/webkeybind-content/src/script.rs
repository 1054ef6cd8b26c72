use std::{fmt, sync::Arc};

use bindings::{
    ActiveSet, BindingDraft, BindingMatcher, BindingRepository, FocusContext, KeyBinding,
    KeyValueStore, PageLocation, now_millis,
};
use config::Settings;
use elements::{ButtonHandler, HandlerRegistry};
use keychord::{Chord, KeyEvent};
use pagedom::{Disposition, Page, PointerEvent};
use picker::{ClickOutcome, ElementPicker, Selection};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webkeybind_protocol::{
    Channel, Incoming, Notice, ProtocolError, Request, Response, SelectionData,
};

use crate::{Error, NotificationDispatcher, Result};

/// The per-page controller.
pub struct ContentScript<P: Page> {
    /// The live page.
    page: P,
    /// Where the page is.
    location: PageLocation,
    /// Handlers in priority order.
    registry: HandlerRegistry,
    /// Selection mode.
    picker: ElementPicker,
    /// Chord lookup.
    matcher: BindingMatcher,
    /// Bindings that apply to this page.
    active: ActiveSet,
    /// Read side of the persisted collection.
    repo: BindingRepository,
    /// Request channel to the background service.
    background: Arc<dyn Channel>,
    /// Host notices.
    notifier: NotificationDispatcher,
    /// Picker callback sender; cloned into each activation.
    picked_tx: mpsc::UnboundedSender<Selection>,
    /// Picker callback receiver.
    picked_rx: mpsc::UnboundedReceiver<Selection>,
    /// Most recent pick, consumed by [`ContentScript::save_binding`].
    selection: Option<Selection>,
}

impl<P: Page> fmt::Debug for ContentScript<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentScript")
            .field("location", &self.location.href())
            .field("picker", &self.picker)
            .field("active", &self.active.len())
            .finish_non_exhaustive()
    }
}

impl<P: Page> ContentScript<P> {
    /// A content script for `page`. Bindings are not loaded until
    /// [`ContentScript::load_bindings`] runs.
    pub fn new(
        page: P,
        location: PageLocation,
        settings: &Settings,
        store: Arc<dyn KeyValueStore>,
        background: Arc<dyn Channel>,
        notifier: NotificationDispatcher,
    ) -> Self {
        let registry = HandlerRegistry::with_button_handler(ButtonHandler::with_max_depth(
            settings.selector.max_depth,
        ));
        let (picked_tx, picked_rx) = mpsc::unbounded_channel();
        Self {
            page,
            location,
            registry,
            picker: ElementPicker::new(settings.picker.clone()),
            matcher: BindingMatcher::new(),
            active: ActiveSet::default(),
            repo: BindingRepository::with_key(store, &settings.storage.bindings_key),
            background,
            notifier,
            picked_tx,
            picked_rx,
            selection: None,
        }
    }

    /// The page.
    pub fn page(&self) -> &P {
        &self.page
    }

    /// Mutable access to the page, for hosts replaying DOM changes.
    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// The page location.
    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    /// The handler registry.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// The picker.
    pub fn picker(&self) -> &ElementPicker {
        &self.picker
    }

    /// Bindings active on this page.
    pub fn active(&self) -> &ActiveSet {
        &self.active
    }

    /// The element picked most recently and not yet saved.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Re-read the persisted collection and re-derive the active set.
    /// Returns the number of active bindings.
    pub async fn load_bindings(&mut self) -> Result<usize> {
        let all = self.repo.list().await?;
        let total = all.len();
        self.active = ActiveSet::derive(all, &self.location);
        info!(
            host = self.location.hostname(),
            total,
            active = self.active.len(),
            "bindings loaded"
        );
        Ok(self.active.len())
    }

    /// Answer a message addressed to this page.
    pub async fn handle_message(&mut self, request: Request) -> Response {
        debug!(action = request.action().as_str(), "content request");
        match request {
            Request::StartElementSelection => {
                self.start_element_selection();
                Response::ok()
            }
            Request::ReloadBindings => match self.load_bindings().await {
                Ok(_) => Response::ok(),
                Err(e) => Response::failure(e),
            },
            Request::TestBinding { binding } => match self.fire(&binding) {
                Ok(()) => Response::ok(),
                Err(e) => Response::failure(e),
            },
            other => Response::from(ProtocolError::UnknownAction(Some(
                other.action().as_str().to_string(),
            ))),
        }
    }

    /// Answer a deferred request and resolve its responder.
    pub async fn answer(&mut self, incoming: Incoming) {
        let Incoming { request, responder } = incoming;
        let response = self.handle_message(request).await;
        responder.resolve(response);
    }

    /// Enter selection mode. Returns false when it was already on.
    pub fn start_element_selection(&mut self) -> bool {
        let tx = self.picked_tx.clone();
        self.picker.activate(&mut self.page, move |selection| {
            if tx.send(selection).is_err() {
                debug!("selection receiver gone");
            }
        })
    }

    /// Leave selection mode, e.g. before the page unloads.
    pub fn cancel_element_selection(&mut self) {
        self.picker.deactivate(&mut self.page);
    }

    /// Keydown in the capture phase.
    ///
    /// While the picker is active it owns the keyboard. Otherwise the chord is
    /// matched against the active set and the first binding that passes the
    /// focus guard is triggered.
    pub fn on_key_down(&mut self, event: &KeyEvent) -> Disposition {
        if self.picker.is_active() {
            return self.picker.on_key_down(&mut self.page, event);
        }
        let Some(chord) = Chord::from_event(event) else {
            return Disposition::PASS;
        };
        let focus = FocusContext::of(&self.page);
        let Some(binding) = self
            .matcher
            .find(&self.active, &chord.normalized(), focus)
            .cloned()
        else {
            return Disposition::PASS;
        };
        debug!(id = %binding.id, chord = %chord, "binding matched");
        if let Err(e) = self.fire(&binding) {
            debug!(error = %e, "binding did not fire");
        }
        Disposition::CONSUME
    }

    /// Pointer movement in the capture phase.
    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Disposition {
        self.picker
            .on_pointer_move(&mut self.page, &self.registry, event)
    }

    /// Click in the capture phase. A claimed element is handed to the
    /// background service.
    pub async fn on_click(&mut self, event: PointerEvent) -> Disposition {
        let outcome = self.picker.on_click(&mut self.page, &self.registry, event);
        match outcome {
            ClickOutcome::Selected(_) => {
                if let Ok(selection) = self.picked_rx.try_recv() {
                    self.forward_selection(selection).await;
                }
            }
            ClickOutcome::Unsupported(_) => {
                self.notifier
                    .post(Notice::warn("This element type is not supported"));
            }
            ClickOutcome::Inactive | ClickOutcome::OnHint => {}
        }
        outcome.disposition()
    }

    /// Keep `selection` for saving and report it to the background service.
    async fn forward_selection(&mut self, selection: Selection) {
        let data = SelectionData {
            element_type: selection.element_type,
            selector: selection.selector.clone(),
        };
        self.selection = Some(selection);
        match self.background.request(Request::ElementSelected { data }).await {
            Ok(r) if r.success => self.notifier.post(Notice::info("Element selected")),
            Ok(r) => {
                let msg = r.error.unwrap_or_default();
                warn!(error = %msg, "selection rejected");
                self.notifier
                    .post(Notice::error(format!("Selection failed: {msg}")));
            }
            Err(e) => {
                warn!(error = %e, "selection not delivered");
                self.notifier.post(Notice::error(format!("Selection failed: {e}")));
            }
        }
    }

    /// Turn `draft` and the current selection into a binding and save it
    /// through the background service.
    pub async fn save_binding(&mut self, draft: BindingDraft) -> Result<KeyBinding> {
        let selection = self.selection.as_ref().ok_or(Error::NoSelection)?;
        let binding = draft.into_binding(
            self.location.hostname(),
            selection.element_type,
            selection.selector.clone(),
            now_millis(),
            &mut rand::thread_rng(),
        )?;
        let response = self
            .background
            .request(Request::SaveBinding {
                binding: binding.clone(),
            })
            .await?;
        if !response.success {
            let msg = response.error.unwrap_or_default();
            self.notifier
                .post(Notice::error(format!("Failed to save shortcut: {msg}")));
            return Err(Error::Rejected(msg));
        }
        self.selection = None;
        info!(id = %binding.id, key = %binding.key, "binding created");
        self.notifier.post(Notice::success("Shortcut saved"));
        Ok(binding)
    }

    /// Resolve and activate the element of `binding`.
    pub fn trigger_binding(&mut self, binding: &KeyBinding) -> Result<()> {
        let handler = self
            .registry
            .handler(binding.element_type)
            .ok_or(Error::NoHandler(binding.element_type))?;
        let Some(element) = handler.find_element(&self.page, &binding.selector) else {
            return Err(Error::ElementUnresolvable {
                element_type: binding.element_type,
                css_path: binding.selector.css_path.clone(),
            });
        };
        handler.trigger(&mut self.page, element)?;
        info!(id = %binding.id, element = element.raw(), "element triggered");
        Ok(())
    }

    /// [`ContentScript::trigger_binding`], reporting the outcome as a notice.
    fn fire(&mut self, binding: &KeyBinding) -> Result<()> {
        let result = self.trigger_binding(binding);
        let notice = match &result {
            Ok(()) => Notice::success(format!("Triggered: {}", binding.description)),
            Err(e @ Error::ElementUnresolvable { css_path, .. }) => {
                warn!(id = %binding.id, %css_path, "element not found");
                Notice::warn(e.to_string())
            }
            Err(e) => {
                warn!(id = %binding.id, error = %e, "trigger failed");
                Notice::error(format!("Trigger failed: {e}"))
            }
        };
        self.notifier.post(notice);
        result
    }
}
