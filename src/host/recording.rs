//! Headless host that records every window call
//!
//! Stands in for a real compositor in the CLI simulator and in tests.

use std::collections::HashMap;

use serde::Serialize;

use super::{HostError, HostResult, OverlayId, WindowHost, WindowParams};
use crate::geometry::{Point, ScreenMetrics, SystemBarDimensions};

/// One call made against the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    Add { id: OverlayId, params: WindowParams },
    Update { id: OverlayId, params: WindowParams },
    Remove { id: OverlayId },
}

/// In-memory window host
#[derive(Debug, Default)]
pub struct RecordingHost {
    metrics: ScreenMetrics,
    bars: SystemBarDimensions,
    windows: HashMap<OverlayId, WindowParams>,
    calls: Vec<HostCall>,
    permission_revoked: bool,
}

impl RecordingHost {
    pub fn new(metrics: ScreenMetrics, bars: SystemBarDimensions) -> Self {
        Self {
            metrics,
            bars,
            ..Default::default()
        }
    }

    /// Change the reported screen (rotation, multi-window resize)
    pub fn set_screen_metrics(&mut self, metrics: ScreenMetrics) {
        self.metrics = metrics;
    }

    /// Make every subsequent call fail as if overlay permission was withdrawn
    pub fn revoke_permission(&mut self) {
        self.permission_revoked = true;
    }

    pub fn restore_permission(&mut self) {
        self.permission_revoked = false;
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Positions pushed by `update_window_layout` for one window, in order
    pub fn positions(&self, id: OverlayId) -> Vec<Point> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Update { id: call_id, params } if *call_id == id => {
                    Some(Point::new(params.x, params.y))
                }
                _ => None,
            })
            .collect()
    }

    /// Current parameters of a displayed window
    pub fn window(&self, id: OverlayId) -> Option<&WindowParams> {
        self.windows.get(&id)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn check_permission(&self) -> HostResult<()> {
        if self.permission_revoked {
            return Err(HostError::PermissionDenied("overlay permission revoked".to_string()));
        }
        Ok(())
    }
}

impl WindowHost for RecordingHost {
    fn add_window(&mut self, id: OverlayId, params: &WindowParams) -> HostResult<()> {
        self.check_permission()?;
        if self.windows.contains_key(&id) {
            return Err(HostError::AlreadyAdded(id));
        }
        self.windows.insert(id, *params);
        self.calls.push(HostCall::Add { id, params: *params });
        Ok(())
    }

    fn update_window_layout(&mut self, id: OverlayId, params: &WindowParams) -> HostResult<()> {
        self.check_permission()?;
        let window = self.windows.get_mut(&id).ok_or(HostError::UnknownWindow(id))?;
        *window = *params;
        self.calls.push(HostCall::Update { id, params: *params });
        Ok(())
    }

    fn remove_window_immediate(&mut self, id: OverlayId) -> HostResult<()> {
        self.check_permission()?;
        self.windows.remove(&id).ok_or(HostError::UnknownWindow(id))?;
        self.calls.push(HostCall::Remove { id });
        Ok(())
    }

    fn screen_metrics(&self) -> ScreenMetrics {
        self.metrics
    }

    fn system_bars(&self) -> SystemBarDimensions {
        self.bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_and_tracks_windows() {
        let mut host = RecordingHost::new(ScreenMetrics::default(), SystemBarDimensions::default());
        let id = OverlayId(1);
        let mut params = WindowParams::default();

        host.add_window(id, &params).unwrap();
        params.x = 42;
        host.update_window_layout(id, &params).unwrap();

        assert_eq!(host.window(id).map(|p| p.x), Some(42));
        assert_eq!(host.positions(id), vec![Point::new(42, 0)]);

        host.remove_window_immediate(id).unwrap();
        assert_eq!(host.window_count(), 0);
        assert_eq!(host.calls().len(), 3);
    }

    #[test]
    fn test_rejects_unknown_and_duplicate_windows() {
        let mut host = RecordingHost::default();
        let id = OverlayId(7);
        let params = WindowParams::default();

        assert_eq!(host.update_window_layout(id, &params), Err(HostError::UnknownWindow(id)));
        host.add_window(id, &params).unwrap();
        assert_eq!(host.add_window(id, &params), Err(HostError::AlreadyAdded(id)));
    }

    #[test]
    fn test_revoked_permission_fails_every_call() {
        let mut host = RecordingHost::default();
        host.revoke_permission();
        let result = host.add_window(OverlayId(1), &WindowParams::default());
        assert!(matches!(result, Err(HostError::PermissionDenied(_))));
        assert!(host.calls().is_empty());

        host.restore_permission();
        assert!(host.add_window(OverlayId(1), &WindowParams::default()).is_ok());
        assert_eq!(host.window_count(), 1);
    }
}
