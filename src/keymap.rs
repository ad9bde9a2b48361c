//! Key decoding for TV remotes
//!
//! Remotes report keys inconsistently: some deliver a standard key name,
//! others only a device-specific numeric code. This module is the single
//! authoritative decoder, turning a raw `(name, code)` pair into a
//! [`RemoteKey`] so every handler downstream matches on one enum.

use serde::{Deserialize, Serialize};

use crate::error::{CccTvError, Result};

/// WebOS back button
pub const KEYCODE_WEBOS_BACK: u32 = 461;

// ============================================================================
// Key enum
// ============================================================================

/// Logical remote-control keys understood by the navigation core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Back,
    Stop,
    Play,
    Pause,
    PlayPause,
    Rewind,
    FastForward,
    Mute,
    /// Colour key bound to the subtitle selector
    Subtitle,
    /// Colour key bound to the audio language selector
    Language,
}

impl RemoteKey {
    /// Back and stop both dismiss things
    pub fn is_back_or_stop(self) -> bool {
        matches!(self, RemoteKey::Back | RemoteKey::Stop)
    }

    pub fn is_directional(self) -> bool {
        matches!(
            self,
            RemoteKey::Up | RemoteKey::Down | RemoteKey::Left | RemoteKey::Right
        )
    }
}

/// Raw key press as delivered by the platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub code: Option<u32>,
}

impl KeyEvent {
    pub fn named(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            code: None,
        }
    }

    pub fn code(code: u32) -> Self {
        Self {
            key: None,
            code: Some(code),
        }
    }

    /// Decode into a logical key; name takes priority over the numeric code
    pub fn decode(&self) -> Option<RemoteKey> {
        self.key
            .as_deref()
            .and_then(key_from_name)
            .or_else(|| self.code.and_then(key_from_code))
    }
}

// ============================================================================
// Decoders
// ============================================================================

/// Map a standard key name to a remote key
pub fn key_from_name(name: &str) -> Option<RemoteKey> {
    match name {
        "ArrowUp" => Some(RemoteKey::Up),
        "ArrowDown" => Some(RemoteKey::Down),
        "ArrowLeft" => Some(RemoteKey::Left),
        "ArrowRight" => Some(RemoteKey::Right),
        "Enter" => Some(RemoteKey::Enter),
        "Escape" | "Backspace" | "GoBack" | "BrowserBack" => Some(RemoteKey::Back),
        "MediaStop" => Some(RemoteKey::Stop),
        "MediaPlay" => Some(RemoteKey::Play),
        "MediaPause" => Some(RemoteKey::Pause),
        " " | "Spacebar" | "MediaPlayPause" => Some(RemoteKey::PlayPause),
        "MediaRewind" => Some(RemoteKey::Rewind),
        "MediaFastForward" => Some(RemoteKey::FastForward),
        "AudioVolumeMute" => Some(RemoteKey::Mute),
        "Subtitle" | "ColorF1Green" => Some(RemoteKey::Subtitle),
        "ColorF0Red" => Some(RemoteKey::Language),
        _ => None,
    }
}

/// Map a device-specific numeric code to a remote key
pub fn key_from_code(code: u32) -> Option<RemoteKey> {
    match code {
        38 => Some(RemoteKey::Up),
        40 => Some(RemoteKey::Down),
        37 => Some(RemoteKey::Left),
        39 => Some(RemoteKey::Right),
        13 => Some(RemoteKey::Enter),
        27 | 8 | KEYCODE_WEBOS_BACK => Some(RemoteKey::Back),
        413 | 178 => Some(RemoteKey::Stop),
        415 => Some(RemoteKey::Play),
        19 => Some(RemoteKey::Pause),
        179 => Some(RemoteKey::PlayPause),
        412 => Some(RemoteKey::Rewind),
        417 => Some(RemoteKey::FastForward),
        113 => Some(RemoteKey::Mute),
        799 | 460 => Some(RemoteKey::Subtitle),
        403 | 457 => Some(RemoteKey::Language),
        _ => None,
    }
}

/// Parse a comma-separated key script (`down,down,enter,461`)
///
/// Each token is either a short alias, a full key name, or a numeric code.
pub fn parse_key_script(script: &str) -> Result<Vec<KeyEvent>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|token| {
            if let Ok(code) = token.parse::<u32>() {
                return Ok(KeyEvent::code(code));
            }
            let name = match token.to_ascii_lowercase().as_str() {
                "up" => "ArrowUp",
                "down" => "ArrowDown",
                "left" => "ArrowLeft",
                "right" => "ArrowRight",
                "enter" | "ok" => "Enter",
                "back" | "esc" => "Escape",
                "stop" => "MediaStop",
                "play" => "MediaPlay",
                "pause" => "MediaPause",
                "playpause" | "space" => "MediaPlayPause",
                "rew" | "rewind" => "MediaRewind",
                "ff" | "forward" => "MediaFastForward",
                "mute" => "AudioVolumeMute",
                "subtitle" | "green" => "Subtitle",
                "language" | "red" => "ColorF0Red",
                _ => token,
            };
            if key_from_name(name).is_none() {
                return Err(CccTvError::KeyScript(format!("unknown key '{token}'")));
            }
            Ok(KeyEvent::named(name))
        })
        .collect()
}
