//! Input event types.
//!
//! Raw key events arrive from the host dispatch path as a numeric key code plus
//! an action. Only the two codes named by the active [`KeyMap`] can ever become
//! an [`InputEvent`].

use serde::{Deserialize, Serialize};

/// A captured hardware button press, as delivered to the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    VolumeUp,
    VolumeDown,
}

impl InputEvent {
    /// Wire tag sent on the event channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VolumeUp => "volume_up",
            Self::VolumeDown => "volume_down",
        }
    }
}

impl std::fmt::Display for InputEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a raw key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// A raw key event as observed by the host dispatch mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub code: u32,
    pub action: KeyAction,
}

impl RawKeyEvent {
    pub fn down(code: u32) -> Self {
        Self {
            code,
            action: KeyAction::Down,
        }
    }

    pub fn up(code: u32) -> Self {
        Self {
            code,
            action: KeyAction::Up,
        }
    }
}

/// Outcome of offering a raw event to the interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Event was consumed and must not reach default handling.
    Handled,
    /// Host should deliver the event through its normal path.
    NotHandled,
}

impl KeyDisposition {
    #[inline]
    pub fn is_handled(self) -> bool {
        self == Self::Handled
    }
}

/// Windows virtual-key code for the volume-up key.
pub const VK_VOLUME_UP: u32 = 0xAF;
/// Windows virtual-key code for the volume-down key.
pub const VK_VOLUME_DOWN: u32 = 0xAE;
/// Android `KEYCODE_VOLUME_UP`.
pub const ANDROID_KEYCODE_VOLUME_UP: u32 = 24;
/// Android `KEYCODE_VOLUME_DOWN`.
pub const ANDROID_KEYCODE_VOLUME_DOWN: u32 = 25;

/// Named key code pair, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMapPreset {
    #[default]
    Windows,
    Android,
}

/// The pair of monitored key codes.
///
/// The mapping is fixed once built: `volume_up` maps to
/// [`InputEvent::VolumeUp`], `volume_down` to [`InputEvent::VolumeDown`], and
/// nothing else maps at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    volume_up: u32,
    volume_down: u32,
}

impl KeyMap {
    pub const WINDOWS: KeyMap = KeyMap {
        volume_up: VK_VOLUME_UP,
        volume_down: VK_VOLUME_DOWN,
    };

    pub const ANDROID: KeyMap = KeyMap {
        volume_up: ANDROID_KEYCODE_VOLUME_UP,
        volume_down: ANDROID_KEYCODE_VOLUME_DOWN,
    };

    /// Maps a raw code to its event tag, if monitored.
    #[inline]
    pub fn lookup(&self, code: u32) -> Option<InputEvent> {
        if code == self.volume_up {
            Some(InputEvent::VolumeUp)
        } else if code == self.volume_down {
            Some(InputEvent::VolumeDown)
        } else {
            None
        }
    }

    /// Raw code that produces the given event.
    pub fn code_for(&self, event: InputEvent) -> u32 {
        match event {
            InputEvent::VolumeUp => self.volume_up,
            InputEvent::VolumeDown => self.volume_down,
        }
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::WINDOWS
    }
}

impl From<KeyMapPreset> for KeyMap {
    fn from(preset: KeyMapPreset) -> Self {
        match preset {
            KeyMapPreset::Windows => Self::WINDOWS,
            KeyMapPreset::Android => Self::ANDROID,
        }
    }
}
