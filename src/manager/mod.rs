//! Overlay collection manager
//!
//! Creates and destroys overlay engines, routes pointer and layout events to
//! them, and reports when the last overlay has been removed.

mod overlay_config;

pub use overlay_config::OverlayConfig;

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::host::{HostError, OverlayId, WindowHost};
use crate::input::{PointerEvent, PointerObserver};
use crate::overlay::{ContentContainer, EngineTuning, OverlayContent, OverlayEngine};

/// Manager errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    #[error("Host failure for {id}: {source}")]
    Host {
        id: OverlayId,
        #[source]
        source: HostError,
    },

    #[error("No such overlay: {0}")]
    NotFound(OverlayId),
}

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Notified when targeted removal empties the overlay collection
pub trait OverlayListener: Send {
    fn on_all_overlays_removed(&mut self);
}

impl<F> OverlayListener for F
where
    F: FnMut() + Send,
{
    fn on_all_overlays_removed(&mut self) {
        self()
    }
}

/// Owns every active overlay and the host they are displayed on
pub struct OverlayManager<H: WindowHost> {
    host: H,
    /// Active overlays in insertion order
    overlays: Vec<OverlayEngine>,
    listener: Option<Box<dyn OverlayListener>>,
    tuning: EngineTuning,
    next_id: u64,
}

impl<H: WindowHost> OverlayManager<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            overlays: Vec::new(),
            listener: None,
            tuning: EngineTuning::default(),
            next_id: 1,
        }
    }

    pub fn with_tuning(mut self, tuning: EngineTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_listener(mut self, listener: Box<dyn OverlayListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn set_listener(&mut self, listener: Box<dyn OverlayListener>) {
        self.listener = Some(listener);
    }

    /// Create an overlay around `content` and display it
    pub fn add_overlay(
        &mut self,
        content: Box<dyn OverlayContent>,
        config: &OverlayConfig,
    ) -> ManagerResult<OverlayId> {
        let id = OverlayId(self.next_id);
        self.next_id += 1;

        let mut engine = OverlayEngine::new(id, &self.host, config.x, config.y, self.tuning);
        engine.set_over_margin(config.over_margin);
        engine.set_move_direction(config.move_direction);
        engine.set_animate_initial_move(config.animate_initial_move);
        engine.set_content(ContentContainer::new(
            content,
            config.width_dimension(),
            config.height_dimension(),
        ));

        self.host
            .add_window(id, engine.window_params())
            .map_err(|source| ManagerError::Host { id, source })?;

        let (width, height) = engine.measure_content().unwrap_or_default();
        engine.on_measured_size_changed(width, height, &mut self.host);
        engine.on_first_layout(&mut self.host);
        let failure = engine.take_host_failure();

        info!(overlay = %id, width, height, direction = ?config.move_direction, "overlay added");
        self.overlays.push(engine);

        match failure {
            Some(source) => Err(ManagerError::Host { id, source }),
            None => Ok(id),
        }
    }

    /// Remove one overlay. Removing an unknown or already removed overlay is a
    /// no-op. The engine is dropped even when the host fails to remove the
    /// window.
    pub fn remove_overlay(&mut self, id: OverlayId) -> ManagerResult<()> {
        let Some(index) = self.overlays.iter().position(|engine| engine.id() == id) else {
            debug!(overlay = %id, "already removed");
            return Ok(());
        };

        let mut engine = self.overlays.remove(index);
        engine.destroy();
        let result = self.host.remove_window_immediate(id);
        if let Err(e) = &result {
            warn!(overlay = %id, "window removal failed: {}", e);
        }
        info!(overlay = %id, remaining = self.overlays.len(), "overlay removed");

        if self.overlays.is_empty() {
            if let Some(listener) = self.listener.as_mut() {
                info!("all overlays removed");
                listener.on_all_overlays_removed();
            }
        }

        result.map_err(|source| ManagerError::Host { id, source })
    }

    /// Remove every overlay. Does not notify the listener.
    pub fn remove_all(&mut self) -> ManagerResult<()> {
        let mut first_error = None;
        for mut engine in self.overlays.drain(..) {
            engine.destroy();
            let id = engine.id();
            if let Err(source) = self.host.remove_window_immediate(id) {
                warn!(overlay = %id, "window removal failed: {}", source);
                first_error.get_or_insert(ManagerError::Host { id, source });
            }
        }
        info!("removed all overlays");
        first_error.map_or(Ok(()), Err)
    }

    /// Route a pointer event to one overlay
    pub fn dispatch_pointer_event(&mut self, id: OverlayId, event: &PointerEvent) -> ManagerResult<bool> {
        let (engine, host) = self.split(id)?;
        let consumed = engine.dispatch_pointer_event(event, host);
        check(engine)?;
        Ok(consumed)
    }

    /// An overlay's content was re-measured
    pub fn on_content_resized(&mut self, id: OverlayId, width: u32, height: u32) -> ManagerResult<()> {
        let (engine, host) = self.split(id)?;
        engine.on_measured_size_changed(width, height, host);
        check(engine)
    }

    pub fn on_screen_configuration_changed(&mut self) -> ManagerResult<()> {
        let host = &mut self.host;
        for_each_checked(&mut self.overlays, |engine| {
            engine.on_screen_configuration_changed(&mut *host)
        })
    }

    pub fn on_system_bar_visibility_changed(
        &mut self,
        hide_status_bar: bool,
        hide_navigation_bar: bool,
        portrait: bool,
    ) -> ManagerResult<()> {
        let host = &mut self.host;
        for_each_checked(&mut self.overlays, |engine| {
            engine.on_system_bar_visibility_changed(hide_status_bar, hide_navigation_bar, portrait, &mut *host)
        })
    }

    /// Register an observer for every pointer event one overlay receives
    pub fn add_pointer_observer(
        &mut self,
        id: OverlayId,
        observer: Box<dyn PointerObserver>,
    ) -> ManagerResult<()> {
        let (engine, _) = self.split(id)?;
        engine.add_observer(observer);
        Ok(())
    }

    /// Advance every running snap animation. Returns whether any is still
    /// running. Host failures are left for `take_host_failures`.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut animating = false;
        for engine in &mut self.overlays {
            animating |= engine.on_animation_frame(now, &mut self.host);
        }
        animating
    }

    /// Collect pending host failures from every overlay
    pub fn take_host_failures(&mut self) -> Vec<ManagerError> {
        self.overlays
            .iter_mut()
            .filter_map(|engine| {
                let id = engine.id();
                engine.take_host_failure().map(|source| ManagerError::Host { id, source })
            })
            .collect()
    }

    pub fn is_animating(&self) -> bool {
        self.overlays.iter().any(OverlayEngine::is_animating)
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&OverlayEngine> {
        self.overlays.iter().find(|engine| engine.id() == id)
    }

    pub fn ids(&self) -> Vec<OverlayId> {
        self.overlays.iter().map(OverlayEngine::id).collect()
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn split(&mut self, id: OverlayId) -> ManagerResult<(&mut OverlayEngine, &mut H)> {
        let engine = self
            .overlays
            .iter_mut()
            .find(|engine| engine.id() == id)
            .ok_or(ManagerError::NotFound(id))?;
        Ok((engine, &mut self.host))
    }
}

fn check(engine: &mut OverlayEngine) -> ManagerResult<()> {
    match engine.take_host_failure() {
        Some(source) => Err(ManagerError::Host { id: engine.id(), source }),
        None => Ok(()),
    }
}

/// Run `f` on every engine, then report the first host failure
fn for_each_checked<F>(engines: &mut [OverlayEngine], mut f: F) -> ManagerResult<()>
where
    F: FnMut(&mut OverlayEngine),
{
    let mut first_error = None;
    for engine in engines.iter_mut() {
        f(engine);
        if let Err(e) = check(engine) {
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

impl<H: WindowHost> std::fmt::Debug for OverlayManager<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayManager")
            .field("overlays", &self.overlays)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::geometry::{Point, ScreenMetrics, SystemBarDimensions};
    use crate::host::{HostCall, RecordingHost};
    use crate::overlay::MoveDirection;

    struct Bubble;

    impl OverlayContent for Bubble {
        fn preferred_size(&self) -> (u32, u32) {
            (200, 200)
        }

        fn perform_click(&mut self) {}
    }

    fn manager() -> (OverlayManager<RecordingHost>, Arc<AtomicUsize>) {
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = finished.clone();
        let host = RecordingHost::new(ScreenMetrics::new(1080, 1920, 3.0), SystemBarDimensions::default());
        let manager = OverlayManager::new(host).with_listener(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        (manager, finished)
    }

    fn quiet() -> OverlayConfig {
        OverlayConfig::new().with_animate_initial_move(false)
    }

    #[test]
    fn test_add_overlay_displays_and_places() {
        let (mut manager, _) = manager();
        let id = manager.add_overlay(Box::new(Bubble), &quiet()).unwrap();

        assert_eq!(manager.len(), 1);
        assert!(matches!(manager.host().calls()[0], HostCall::Add { .. }));
        assert_eq!(manager.overlay(id).map(OverlayEngine::position), Some(Point::new(0, 1720)));
        assert_eq!(manager.host().window(id).map(|p| (p.x, p.y)), Some((0, 1720)));
    }

    #[test]
    fn test_fixed_size_overrides_content() {
        let (mut manager, _) = manager();
        let id = manager
            .add_overlay(Box::new(Bubble), &quiet().with_size(100, 50))
            .unwrap();
        assert_eq!(manager.overlay(id).map(OverlayEngine::size), Some((100, 50)));
        assert_eq!(manager.overlay(id).map(OverlayEngine::position), Some(Point::new(0, 1870)));
    }

    #[test]
    fn test_last_targeted_removal_notifies_once() {
        let (mut manager, finished) = manager();
        let a = manager.add_overlay(Box::new(Bubble), &quiet()).unwrap();
        let b = manager.add_overlay(Box::new(Bubble), &quiet()).unwrap();

        manager.remove_overlay(a).unwrap();
        assert_eq!(finished.load(Ordering::SeqCst), 0);
        manager.remove_overlay(b).unwrap();
        assert_eq!(finished.load(Ordering::SeqCst), 1);

        manager.remove_overlay(b).unwrap();
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert_eq!(manager.host().window_count(), 0);
    }

    #[test]
    fn test_remove_all_never_notifies() {
        let (mut manager, finished) = manager();
        manager.add_overlay(Box::new(Bubble), &quiet()).unwrap();
        manager.add_overlay(Box::new(Bubble), &quiet()).unwrap();

        manager.remove_all().unwrap();
        assert!(manager.is_empty());
        assert_eq!(manager.host().window_count(), 0);
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_add_failure_leaves_collection_unchanged() {
        let (mut manager, _) = manager();
        manager.host_mut().revoke_permission();

        let result = manager.add_overlay(Box::new(Bubble), &quiet());
        assert!(matches!(
            result,
            Err(ManagerError::Host { source: HostError::PermissionDenied(_), .. })
        ));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_removal_failure_still_drops_overlay() {
        let (mut manager, finished) = manager();
        let id = manager.add_overlay(Box::new(Bubble), &quiet()).unwrap();
        manager.host_mut().revoke_permission();

        assert!(manager.remove_overlay(id).is_err());
        assert!(manager.is_empty());
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_to_unknown_overlay() {
        let (mut manager, _) = manager();
        let result = manager.dispatch_pointer_event(OverlayId(99), &PointerEvent::down(0.0, 0.0, 0.0, 0.0));
        assert_eq!(result, Err(ManagerError::NotFound(OverlayId(99))));
    }

    #[test]
    fn test_drag_and_tick_to_rest() {
        let (mut manager, _) = manager();
        let id = manager
            .add_overlay(Box::new(Bubble), &quiet().with_move_direction(MoveDirection::Default))
            .unwrap();

        manager.dispatch_pointer_event(id, &PointerEvent::down(50.0, 1800.0, 50.0, 80.0)).unwrap();
        manager.dispatch_pointer_event(id, &PointerEvent::moved(700.0, 900.0)).unwrap();
        manager.dispatch_pointer_event(id, &PointerEvent::up(700.0, 900.0)).unwrap();
        assert!(manager.is_animating());

        let t0 = Instant::now();
        let mut ms = 0;
        while manager.tick(t0 + Duration::from_millis(ms)) {
            ms += 16;
        }
        assert_eq!(manager.overlay(id).map(OverlayEngine::position), Some(Point::new(880, 820)));
        assert!(manager.take_host_failures().is_empty());
    }

    #[test]
    fn test_host_failure_surfaces_from_dispatch() {
        let (mut manager, _) = manager();
        let id = manager.add_overlay(Box::new(Bubble), &quiet()).unwrap();
        manager.host_mut().revoke_permission();

        manager.dispatch_pointer_event(id, &PointerEvent::down(0.0, 1720.0, 0.0, 0.0)).unwrap();
        let result = manager.dispatch_pointer_event(id, &PointerEvent::moved(300.0, 1000.0));
        assert!(matches!(result, Err(ManagerError::Host { .. })));
        assert_eq!(manager.overlay(id).map(OverlayEngine::position), Some(Point::new(300, 1000)));
    }

    #[test]
    fn test_oversized_overlay_gets_collapsed_limit() {
        let (mut manager, _) = manager();
        let id = manager
            .add_overlay(Box::new(Bubble), &quiet().with_size(i32::MAX, i32::MAX))
            .unwrap();

        let engine = manager.overlay(id).unwrap();
        let limit = engine.bounds().position_limit;
        assert_eq!(engine.size(), (i32::MAX as u32, i32::MAX as u32));
        assert!(limit.left <= limit.right && limit.top <= limit.bottom, "{:?}", limit);
        assert!(limit.contains(engine.position()));

        manager.host_mut().set_screen_metrics(ScreenMetrics::new(1920, 1080, 3.0));
        manager.on_screen_configuration_changed().unwrap();
        let engine = manager.overlay(id).unwrap();
        assert!(engine.bounds().position_limit.contains(engine.position()));
    }

    #[test]
    fn test_rotation_reaches_every_overlay() {
        let (mut manager, _) = manager();
        let a = manager.add_overlay(Box::new(Bubble), &quiet()).unwrap();
        let b = manager
            .add_overlay(Box::new(Bubble), &quiet().with_move_direction(MoveDirection::Right))
            .unwrap();

        manager.host_mut().set_screen_metrics(ScreenMetrics::new(1920, 1080, 3.0));
        manager.on_screen_configuration_changed().unwrap();

        assert_eq!(manager.overlay(a).map(OverlayEngine::position), Some(Point::new(0, 880)));
        assert_eq!(manager.overlay(b).map(OverlayEngine::position), Some(Point::new(1720, 880)));
    }
}
