use std::sync::Arc;

use bindings::{BindingRepository, KeyValueStore};
use config::StorageSettings;
use futures::future::join_all;
use serde_json::Value;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};
use webkeybind_protocol::{
    Incoming, ProtocolError, Request, Response, SelectionData, TabMessenger,
};

use crate::{Error, Result};

/// Why the install hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallReason {
    /// First install: storage is initialized.
    Install,
    /// Upgrade: storage is left alone.
    Update,
}

/// Owner of the binding collection and the selection handoff.
#[derive(Clone)]
pub struct BackgroundService {
    /// Binding collection in synced storage.
    repo: BindingRepository,
    /// Local scratch storage.
    scratch: Arc<dyn KeyValueStore>,
    /// Tab fan-out for reload signals.
    tabs: Arc<dyn TabMessenger>,
    /// Scratch key of the parked selection.
    pending_key: String,
}

impl BackgroundService {
    /// A service using the default storage keys.
    ///
    /// Content scripts built from non-default settings must be paired with
    /// [`BackgroundService::from_settings`] over the same settings, or the two
    /// sides read and write different keys.
    pub fn new(
        sync: Arc<dyn KeyValueStore>,
        scratch: Arc<dyn KeyValueStore>,
        tabs: Arc<dyn TabMessenger>,
    ) -> Self {
        Self::from_settings(&StorageSettings::default(), sync, scratch, tabs)
    }

    /// A service using the keys from `settings`.
    pub fn from_settings(
        settings: &StorageSettings,
        sync: Arc<dyn KeyValueStore>,
        scratch: Arc<dyn KeyValueStore>,
        tabs: Arc<dyn TabMessenger>,
    ) -> Self {
        Self {
            repo: BindingRepository::with_key(sync, &settings.bindings_key),
            scratch,
            tabs,
            pending_key: settings.pending_selection_key.clone(),
        }
    }

    /// The binding repository.
    pub fn repository(&self) -> &BindingRepository {
        &self.repo
    }

    /// Install/update hook.
    pub async fn on_installed(&self, reason: InstallReason) -> Result<()> {
        match reason {
            InstallReason::Install => {
                info!("extension installed; initializing storage");
                self.repo.initialize().await?;
            }
            InstallReason::Update => info!("extension updated"),
        }
        Ok(())
    }

    /// Decode and answer a raw message.
    pub async fn handle_value(&self, value: Value) -> Response {
        match Request::from_value(value) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                debug!(error = %e, "rejecting message");
                Response::from(e)
            }
        }
    }

    /// Answer a request.
    pub async fn handle(&self, request: Request) -> Response {
        debug!(action = request.action().as_str(), "background request");
        match request {
            Request::SaveBinding { binding } => match self.repo.save(binding).await {
                Ok(_) => {
                    self.spawn_reload_broadcast();
                    Response::ok()
                }
                Err(e) => {
                    warn!(error = %e, "save failed");
                    Response::failure(e)
                }
            },
            Request::DeleteBinding { id } => match self.repo.delete(&id).await {
                Ok(_) => {
                    self.spawn_reload_broadcast();
                    Response::ok()
                }
                Err(e) => {
                    warn!(error = %e, "delete failed");
                    Response::failure(e)
                }
            },
            Request::GetBindings { domain } => {
                let domain = domain.as_deref().filter(|d| !d.is_empty());
                match self.repo.list_for_domain(domain).await {
                    Ok(bindings) => Response::with_bindings(bindings),
                    Err(e) => Response::failure(e),
                }
            }
            Request::ElementSelected { data } => match self.park_selection(&data).await {
                Ok(()) => Response::ok(),
                Err(e) => Response::failure(e),
            },
            other => Response::from(ProtocolError::UnknownAction(Some(
                other.action().as_str().to_string(),
            ))),
        }
    }

    /// Answer every request arriving on `rx`, in order, until the sending side closes.
    pub async fn serve(&self, mut rx: mpsc::Receiver<Incoming>) {
        while let Some(Incoming { request, responder }) = rx.recv().await {
            let response = self.handle(request).await;
            responder.resolve(response);
        }
        info!("background channel closed");
    }

    /// Store a selection for a management surface to collect.
    async fn park_selection(&self, data: &SelectionData) -> Result<()> {
        let value = serde_json::to_value(data).map_err(|e| Error::Selection(e.to_string()))?;
        self.scratch.set(&self.pending_key, value).await?;
        debug!(css_path = %data.selector.css_path, "selection parked");
        Ok(())
    }

    /// Collect and clear the parked selection.
    pub async fn take_pending_selection(&self) -> Result<Option<SelectionData>> {
        let Some(value) = self.scratch.get(&self.pending_key).await? else {
            return Ok(None);
        };
        self.scratch.remove(&self.pending_key).await?;
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| Error::Selection(e.to_string()))
    }

    /// Tell every tab to reload its bindings. Per-tab failures are swallowed.
    /// Returns the number of tabs that answered.
    pub async fn notify_reload(&self) -> usize {
        let tabs = match self.tabs.tabs().await {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "cannot enumerate tabs");
                return 0;
            }
        };
        let sends = tabs
            .iter()
            .map(|tab| self.tabs.send(*tab, Request::ReloadBindings));
        let results = join_all(sends).await;
        let mut reached = 0;
        for (tab, result) in tabs.iter().zip(results) {
            match result {
                Ok(_) => reached += 1,
                Err(e) => debug!(%tab, error = %e, "tab did not take reload"),
            }
        }
        debug!(reached, total = tabs.len(), "reload broadcast");
        reached
    }

    /// Run [`Self::notify_reload`] without waiting for it, so a tab awaiting
    /// this service can also receive the reload.
    pub fn spawn_reload_broadcast(&self) -> JoinHandle<usize> {
        let svc = self.clone();
        tokio::spawn(async move { svc.notify_reload().await })
    }
}
