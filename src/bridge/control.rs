//! Control surface: the enable/disable toggle for volume key capture.

use std::str::FromStr;
use std::sync::Arc;

use super::error::{BridgeError, Result};
use super::interceptor::{CaptureMode, Interceptor};

/// Name of the request/response control endpoint.
pub const CONTROL_CHANNEL: &str = "com.ntwritecode.flowcontroller/volume";
/// Name of the event stream endpoint.
pub const EVENT_CHANNEL: &str = "com.ntwritecode.flowcontroller/volume_events";

pub const METHOD_ENABLE: &str = "enableVolumeButtons";
pub const METHOD_DISABLE: &str = "disableVolumeButtons";

/// Commands accepted on the control endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    EnableVolumeButtons,
    DisableVolumeButtons,
}

impl ControlCommand {
    pub fn method(&self) -> &'static str {
        match self {
            Self::EnableVolumeButtons => METHOD_ENABLE,
            Self::DisableVolumeButtons => METHOD_DISABLE,
        }
    }
}

impl FromStr for ControlCommand {
    type Err = BridgeError;

    fn from_str(method: &str) -> Result<Self> {
        match method {
            METHOD_ENABLE => Ok(Self::EnableVolumeButtons),
            METHOD_DISABLE => Ok(Self::DisableVolumeButtons),
            other => Err(BridgeError::UnsupportedOperation(other.to_string())),
        }
    }
}

/// Mutates the interceptor's capture state on behalf of the controller.
#[derive(Clone)]
pub struct ControlSurface {
    interceptor: Arc<Interceptor>,
}

impl ControlSurface {
    pub fn new(interceptor: Arc<Interceptor>) -> Self {
        Self { interceptor }
    }

    /// Switches to capturing. Always succeeds.
    pub fn enable(&self) -> bool {
        self.set_mode(CaptureMode::Capturing);
        true
    }

    /// Switches to passthrough. Always succeeds.
    pub fn disable(&self) -> bool {
        self.set_mode(CaptureMode::Passthrough);
        true
    }

    /// Dispatches a command by its method name.
    pub fn invoke(&self, method: &str) -> Result<bool> {
        match method.parse::<ControlCommand>() {
            Ok(command) => Ok(self.execute(command)),
            Err(e) => {
                tracing::warn!(method, "Unsupported control method");
                Err(e)
            }
        }
    }

    pub fn execute(&self, command: ControlCommand) -> bool {
        match command {
            ControlCommand::EnableVolumeButtons => self.enable(),
            ControlCommand::DisableVolumeButtons => self.disable(),
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.interceptor.mode()
    }

    fn set_mode(&self, mode: CaptureMode) {
        let enabled = mode == CaptureMode::Capturing;
        let was_enabled = self.interceptor.capture().set(enabled);
        if was_enabled != enabled {
            tracing::info!(?mode, "Volume key capture changed");
        }
    }
}
