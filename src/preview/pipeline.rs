//! Debounced, cached, cancellable preview generation.
//!
//! DESIGN
//! ======
//! `request_preview` records the payload, cancels whatever is pending and
//! schedules a generation after the debounce window, so a burst of edits
//! produces one renderer call with the last payload. `generate_preview` is
//! the undebounced path: empty payloads clear the preview, cache hits return
//! immediately, misses call the renderer under an `AbortHandle`.
//!
//! Every renderer call is tagged with a monotonically increasing id. Only the
//! call whose id is still the latest when it resolves may publish; anything
//! older settles silently. Aborted calls never touch error state.
//!
//! Observable state goes out on a `tokio::sync::watch` channel. The core is
//! guarded by a `std::sync::Mutex` that is never held across an await.
//!
//! TRADE-OFFS
//! ==========
//! Failures are published and left alone; retrying is an explicit host
//! action (`retry`). A failing renderer therefore costs one call per edit
//! burst, never a loop.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{AbortHandle, Abortable, Aborted};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::cache::PreviewCache;
use super::payload::cache_key;
use super::types::{PreviewError, PreviewInput, PreviewRenderer, PreviewRequest, PreviewResponse, PreviewState, Resolution};
use crate::config::PreviewConfig;
use crate::error::{ErrorCode, describe};

/// How a generation attempt settled.
#[derive(Debug)]
pub enum PreviewOutcome {
    /// Nothing to render; the preview was cleared without a call.
    Cleared,
    CacheHit(PreviewResponse),
    Rendered(PreviewResponse),
    /// A newer attempt started before this one resolved.
    Superseded,
    /// Aborted by `cancel_pending` or drop.
    Cancelled,
    Failed(PreviewError),
}

// =============================================================================
// PENDING WORK
// =============================================================================

/// Debounce timer and in-flight call. Aborted on cancel, replacement and drop.
#[derive(Debug, Default)]
struct PendingWork {
    timer: Option<JoinHandle<()>>,
    in_flight: Option<AbortHandle>,
}

impl PendingWork {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    fn cancel(&mut self) {
        self.cancel_timer();
        self.cancel_in_flight();
    }

    fn is_idle(&self) -> bool {
        self.timer.as_ref().is_none_or(JoinHandle::is_finished) && self.in_flight.is_none()
    }
}

impl Drop for PendingWork {
    fn drop(&mut self) {
        self.cancel();
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

#[derive(Debug)]
struct Core {
    cache: PreviewCache,
    /// Last attempted payload, replayed by `retry`.
    last_input: Option<PreviewInput>,
    latest_id: u64,
    pending: PendingWork,
}

impl Core {
    fn next_id(&mut self) -> u64 {
        self.latest_id += 1;
        self.latest_id
    }
}

struct Inner {
    renderer: Arc<dyn PreviewRenderer>,
    debounce: Duration,
    core: Mutex<Core>,
    state: watch::Sender<PreviewState>,
}

pub struct PreviewPipeline {
    inner: Arc<Inner>,
}

impl PreviewPipeline {
    #[must_use]
    pub fn new(renderer: Arc<dyn PreviewRenderer>, config: &PreviewConfig) -> Self {
        let (state, _) = watch::channel(PreviewState::default());
        let core = Core {
            cache: PreviewCache::new(config.cache_capacity),
            last_input: None,
            latest_id: 0,
            pending: PendingWork::default(),
        };
        Self {
            inner: Arc::new(Inner {
                renderer,
                debounce: Duration::from_millis(config.debounce_ms),
                core: Mutex::new(core),
                state,
            }),
        }
    }

    /// Schedule a generation after the debounce window, replacing any
    /// pending one. Must be called from within a Tokio runtime.
    pub fn request_preview(&self, input: PreviewInput, resolution: Resolution) {
        let mut core = self.inner.lock();
        core.last_input = Some(input.clone());
        core.pending.cancel();
        debug!(product_id = %input.product_id, layers = input.layers.len(), "preview scheduled");

        let inner = Arc::clone(&self.inner);
        core.pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            inner.generate(input, resolution).await;
        }));
    }

    /// Generate now, bypassing the debounce window.
    pub async fn generate_preview(&self, input: PreviewInput, resolution: Resolution) -> PreviewOutcome {
        self.inner.generate(input, resolution).await
    }

    /// Re-run generation with the last attempted payload. `None` when nothing
    /// has been attempted yet.
    pub async fn retry(&self, resolution: Resolution) -> Option<PreviewOutcome> {
        let input = self.inner.lock().last_input.clone()?;
        info!(product_id = %input.product_id, "preview retry");
        Some(self.inner.generate(input, resolution).await)
    }

    /// Abort the debounce timer and any in-flight call. Safe when idle.
    pub fn cancel_pending(&self) {
        self.inner.lock().pending.cancel();
        self.inner.state.send_if_modified(|state| {
            let was_loading = state.is_loading;
            state.is_loading = false;
            was_loading
        });
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PreviewState> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the current observable state.
    #[must_use]
    pub fn state(&self) -> PreviewState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.inner.lock().cache.len()
    }

    /// Whether neither a debounce timer nor a renderer call is outstanding.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.inner.lock().pending.is_idle()
    }
}

impl Drop for PreviewPipeline {
    fn drop(&mut self) {
        self.inner.lock().pending.cancel();
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn generate(&self, input: PreviewInput, resolution: Resolution) -> PreviewOutcome {
        if input.layers.is_empty() {
            {
                let mut core = self.lock();
                core.last_input = Some(input);
                core.pending.cancel_in_flight();
                core.next_id();
            }
            debug!("empty design, preview cleared");
            self.state.send_replace(PreviewState::default());
            return PreviewOutcome::Cleared;
        }

        let request = PreviewRequest::new(input.clone(), resolution);
        let key = cache_key(&request);

        let (id, registration) = {
            let mut core = self.lock();
            core.last_input = Some(input);
            core.pending.cancel_in_flight();
            let id = core.next_id();
            if let Some(hit) = core.cache.get(key).cloned() {
                drop(core);
                debug!(key, "preview cache hit");
                self.publish_success(&hit);
                return PreviewOutcome::CacheHit(hit);
            }
            let (handle, registration) = AbortHandle::new_pair();
            core.pending.in_flight = Some(handle);
            (id, registration)
        };

        info!(id, product_id = %request.product_id, layers = request.layers.len(), ?resolution, "preview request");
        self.state.send_modify(|state| state.is_loading = true);

        let result = Abortable::new(self.renderer.render(&request), registration).await;

        let mut core = self.lock();
        if core.latest_id != id {
            debug!(id, latest = core.latest_id, "stale preview result dropped");
            return PreviewOutcome::Superseded;
        }
        core.pending.in_flight = None;
        match result {
            Err(Aborted) => {
                debug!(id, "preview request cancelled");
                PreviewOutcome::Cancelled
            }
            Ok(Ok(response)) => {
                core.cache.insert(key, response.clone());
                drop(core);
                info!(id, preview_id = %response.preview_id, cached = response.cached, "preview ready");
                self.publish_success(&response);
                PreviewOutcome::Rendered(response)
            }
            Ok(Err(e)) => {
                drop(core);
                warn!(id, error = %e, retryable = e.retryable(), "preview failed");
                let message = describe(&e);
                self.state.send_modify(|state| {
                    state.error = Some(message);
                    state.is_loading = false;
                });
                PreviewOutcome::Failed(e)
            }
        }
    }

    fn publish_success(&self, response: &PreviewResponse) {
        self.state.send_modify(|state| {
            state.preview_url = Some(response.preview_url.clone());
            state.error = None;
            state.is_loading = false;
            state.last_response = Some(response.clone());
        });
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
