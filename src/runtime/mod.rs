//! Overlay runtime
//!
//! Hosts an `OverlayManager` on a tokio task that is its only owner. Pointer,
//! layout and lifecycle requests arrive as commands over a channel and are
//! applied one at a time; snap animations are driven by a frame interval that
//! only runs while some overlay is animating.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::host::{OverlayId, WindowHost};
use crate::input::{PointerEvent, PointerObserver};
use crate::manager::{ManagerError, OverlayConfig, OverlayManager};
use crate::overlay::OverlayContent;

/// Default period between animation frames
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

const COMMAND_QUEUE_DEPTH: usize = 256;

/// Runtime errors
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Overlay runtime has shut down")]
    Closed,

    #[error(transparent)]
    Manager(#[from] ManagerError),

    #[error("Runtime task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Events emitted by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// Targeted removal emptied the overlay collection
    AllOverlaysRemoved,
    /// A fire-and-forget request failed
    Failure(ManagerError),
}

/// Requests applied by the runtime task
pub enum RuntimeCommand {
    AddOverlay {
        content: Box<dyn OverlayContent>,
        config: OverlayConfig,
        reply: oneshot::Sender<Result<OverlayId, ManagerError>>,
    },
    RemoveOverlay {
        id: OverlayId,
        reply: oneshot::Sender<Result<(), ManagerError>>,
    },
    RemoveAll {
        reply: oneshot::Sender<Result<(), ManagerError>>,
    },
    AddObserver {
        id: OverlayId,
        observer: Box<dyn PointerObserver>,
        reply: oneshot::Sender<Result<(), ManagerError>>,
    },
    Pointer {
        id: OverlayId,
        event: PointerEvent,
    },
    ContentResized {
        id: OverlayId,
        width: u32,
        height: u32,
    },
    ScreenConfigurationChanged,
    SystemBarVisibilityChanged {
        hide_status_bar: bool,
        hide_navigation_bar: bool,
        portrait: bool,
    },
    Shutdown,
}

/// Cloneable handle for sending requests to a running runtime
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    tx: mpsc::Sender<RuntimeCommand>,
}

impl RuntimeHandle {
    pub async fn add_overlay(
        &self,
        content: Box<dyn OverlayContent>,
        config: OverlayConfig,
    ) -> RuntimeResult<OverlayId> {
        let (reply, rx) = oneshot::channel();
        self.send(RuntimeCommand::AddOverlay { content, config, reply }).await?;
        Ok(rx.await.map_err(|_| RuntimeError::Closed)??)
    }

    pub async fn remove_overlay(&self, id: OverlayId) -> RuntimeResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(RuntimeCommand::RemoveOverlay { id, reply }).await?;
        Ok(rx.await.map_err(|_| RuntimeError::Closed)??)
    }

    pub async fn remove_all(&self) -> RuntimeResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(RuntimeCommand::RemoveAll { reply }).await?;
        Ok(rx.await.map_err(|_| RuntimeError::Closed)??)
    }

    pub async fn add_pointer_observer(
        &self,
        id: OverlayId,
        observer: Box<dyn PointerObserver>,
    ) -> RuntimeResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(RuntimeCommand::AddObserver { id, observer, reply }).await?;
        Ok(rx.await.map_err(|_| RuntimeError::Closed)??)
    }

    /// Fire-and-forget; failures arrive as `RuntimeEvent::Failure`
    pub async fn dispatch_pointer_event(&self, id: OverlayId, event: PointerEvent) -> RuntimeResult<()> {
        self.send(RuntimeCommand::Pointer { id, event }).await
    }

    pub async fn content_resized(&self, id: OverlayId, width: u32, height: u32) -> RuntimeResult<()> {
        self.send(RuntimeCommand::ContentResized { id, width, height }).await
    }

    pub async fn screen_configuration_changed(&self) -> RuntimeResult<()> {
        self.send(RuntimeCommand::ScreenConfigurationChanged).await
    }

    pub async fn system_bar_visibility_changed(
        &self,
        hide_status_bar: bool,
        hide_navigation_bar: bool,
        portrait: bool,
    ) -> RuntimeResult<()> {
        self.send(RuntimeCommand::SystemBarVisibilityChanged {
            hide_status_bar,
            hide_navigation_bar,
            portrait,
        })
        .await
    }

    /// Ask the runtime to stop; overlays are left as they are
    pub async fn shutdown(&self) -> RuntimeResult<()> {
        self.send(RuntimeCommand::Shutdown).await
    }

    async fn send(&self, command: RuntimeCommand) -> RuntimeResult<()> {
        self.tx.send(command).await.map_err(|_| RuntimeError::Closed)
    }
}

/// A manager running on its own task
pub struct OverlayRuntime<H: WindowHost + 'static> {
    handle: RuntimeHandle,
    event_rx: Option<mpsc::UnboundedReceiver<RuntimeEvent>>,
    task: JoinHandle<OverlayManager<H>>,
}

impl<H: WindowHost + 'static> OverlayRuntime<H> {
    /// Move `manager` onto a new task. The manager's listener is replaced by
    /// one that emits `RuntimeEvent::AllOverlaysRemoved`.
    pub fn spawn(mut manager: OverlayManager<H>, frame_interval: Duration) -> Self {
        let frame_interval = frame_interval.max(MIN_FRAME_INTERVAL);
        let (tx, rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let listener_tx = event_tx.clone();
        manager.set_listener(Box::new(move || {
            let _ = listener_tx.send(RuntimeEvent::AllOverlaysRemoved);
        }));

        let task = tokio::spawn(run(manager, rx, event_tx, frame_interval));
        info!(frame_ms = frame_interval.as_millis() as u64, "overlay runtime started");

        Self {
            handle: RuntimeHandle { tx },
            event_rx: Some(event_rx),
            task,
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Take the event receiver (can only be called once)
    pub fn take_event_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<RuntimeEvent>> {
        self.event_rx.take()
    }

    /// Stop the runtime and get the manager back
    pub async fn shutdown(self) -> RuntimeResult<OverlayManager<H>> {
        // The task also exits once every handle is dropped
        let _ = self.handle.shutdown().await;
        Ok(self.task.await?)
    }
}

async fn run<H: WindowHost>(
    mut manager: OverlayManager<H>,
    mut rx: mpsc::Receiver<RuntimeCommand>,
    events: mpsc::UnboundedSender<RuntimeEvent>,
    frame_interval: Duration,
) -> OverlayManager<H> {
    let mut frames = time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let animating = manager.is_animating();
        tokio::select! {
            command = rx.recv() => {
                match command {
                    None | Some(RuntimeCommand::Shutdown) => break,
                    Some(command) => {
                        let was_animating = animating;
                        apply(&mut manager, command, &events);
                        if !was_animating && manager.is_animating() {
                            frames.reset_immediately();
                        }
                    }
                }
            }
            _ = frames.tick(), if animating => {
                trace!("animation frame");
                manager.tick(Instant::now().into_std());
                for failure in manager.take_host_failures() {
                    let _ = events.send(RuntimeEvent::Failure(failure));
                }
            }
        }
    }

    info!(overlays = manager.len(), "overlay runtime stopped");
    manager
}

fn apply<H: WindowHost>(
    manager: &mut OverlayManager<H>,
    command: RuntimeCommand,
    events: &mpsc::UnboundedSender<RuntimeEvent>,
) {
    let report = |result: Result<(), ManagerError>| {
        if let Err(e) = result {
            warn!("overlay request failed: {}", e);
            let _ = events.send(RuntimeEvent::Failure(e));
        }
    };

    match command {
        RuntimeCommand::AddOverlay { content, config, reply } => {
            let _ = reply.send(manager.add_overlay(content, &config));
        }
        RuntimeCommand::RemoveOverlay { id, reply } => {
            let _ = reply.send(manager.remove_overlay(id));
        }
        RuntimeCommand::RemoveAll { reply } => {
            let _ = reply.send(manager.remove_all());
        }
        RuntimeCommand::AddObserver { id, observer, reply } => {
            let _ = reply.send(manager.add_pointer_observer(id, observer));
        }
        RuntimeCommand::Pointer { id, event } => {
            report(manager.dispatch_pointer_event(id, &event).map(|_| ()));
        }
        RuntimeCommand::ContentResized { id, width, height } => {
            report(manager.on_content_resized(id, width, height));
        }
        RuntimeCommand::ScreenConfigurationChanged => {
            debug!("screen configuration changed");
            report(manager.on_screen_configuration_changed());
        }
        RuntimeCommand::SystemBarVisibilityChanged {
            hide_status_bar,
            hide_navigation_bar,
            portrait,
        } => {
            report(manager.on_system_bar_visibility_changed(hide_status_bar, hide_navigation_bar, portrait));
        }
        RuntimeCommand::Shutdown => {}
    }
}
