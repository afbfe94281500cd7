//! Render-surface size selection and publishing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::client::RelayClient;
use crate::codec::{Viewport, ViewportError};
use crate::debug;

/// Named device sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreset {
    Custom,
    Desktop,
    Tablet,
    Mobile,
}

impl DevicePreset {
    pub const ALL: [Self; 4] = [Self::Custom, Self::Desktop, Self::Tablet, Self::Mobile];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Custom => "Custom",
            Self::Desktop => "Desktop",
            Self::Tablet => "Tablet",
            Self::Mobile => "Mobile",
        }
    }

    pub const fn size(self) -> Viewport {
        let (width, height) = match self {
            Self::Custom => (1280.0, 720.0),
            Self::Desktop => (1440.0, 900.0),
            Self::Tablet => (768.0, 1024.0),
            Self::Mobile => (375.0, 812.0),
        };
        Viewport { width, height }
    }
}

impl fmt::Display for DevicePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DevicePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown device `{s}`"))
    }
}

/// Current device and size, starting at the desktop preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSelector {
    device: DevicePreset,
    viewport: Viewport,
}

impl Default for ScreenSelector {
    fn default() -> Self {
        Self {
            device: DevicePreset::Desktop,
            viewport: DevicePreset::Desktop.size(),
        }
    }
}

impl ScreenSelector {
    pub fn device(&self) -> DevicePreset {
        self.device
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Switch device. Choosing `Custom` keeps the current size.
    pub fn select(&mut self, device: DevicePreset) -> Viewport {
        self.device = device;
        if device != DevicePreset::Custom {
            self.viewport = device.size();
        }
        self.viewport
    }

    /// Enter an explicit size; only meaningful for `Custom`, so the device
    /// switches to it.
    pub fn set_size(&mut self, width: f64, height: f64) -> Result<Viewport, ViewportError> {
        self.viewport = Viewport::new(width, height)?;
        self.device = DevicePreset::Custom;
        Ok(self.viewport)
    }

    /// Swap width and height.
    pub fn toggle_orientation(&mut self) -> Viewport {
        self.viewport = self.viewport.rotated();
        self.viewport
    }
}

/// Pushes sizes to the relay; a newer size aborts a push still in flight.
pub struct ViewportPublisher {
    client: RelayClient,
    handle: Handle,
    in_flight: Option<JoinHandle<()>>,
    superseded: usize,
}

impl ViewportPublisher {
    pub fn new(client: RelayClient, handle: Handle) -> Self {
        Self {
            client,
            handle,
            in_flight: None,
            superseded: 0,
        }
    }

    pub fn publish(&mut self, viewport: Viewport) {
        if let Some(previous) = self.in_flight.take()
            && !previous.is_finished()
        {
            previous.abort();
            self.superseded += 1;
            debug!("editor"; "superseded viewport push aborted");
        }

        let client = self.client.clone();
        self.in_flight = Some(self.handle.spawn(async move {
            // Network errors are not surfaced for viewport pushes
            if let Err(e) = client.send_viewport(viewport).await {
                debug!("editor"; "viewport push failed: {}", e);
            }
        }));
    }

    /// Number of pushes aborted by a newer one.
    pub fn superseded(&self) -> usize {
        self.superseded
    }

    /// Wait for the latest push. Returns `false` if it was cancelled.
    pub async fn settle(&mut self) -> bool {
        match self.in_flight.take() {
            Some(handle) => handle.await.is_ok(),
            None => true,
        }
    }
}
