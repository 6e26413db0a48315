//! Positional audio emitter.
//!
//! Playback itself happens outside the scene: play and stop requests are
//! forwarded to the [`AudioEngine`](crate::resources::audio::AudioEngine)
//! command channel and the `playing` flag mirrors the last request.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct AudioSource {
    /// Asset id of the clip. Empty means no clip.
    pub clip: String,
    pub volume: f32,
    pub pitch: f32,
    pub looping: bool,
    pub spatial: bool,
    pub auto_play_on_start: bool,
    pub playing: bool,
}

impl Default for AudioSource {
    fn default() -> Self {
        Self {
            clip: String::new(),
            volume: 1.0,
            pitch: 1.0,
            looping: false,
            spatial: false,
            auto_play_on_start: false,
            playing: false,
        }
    }
}

impl AudioSource {
    pub fn has_clip(&self) -> bool {
        !self.clip.is_empty()
    }
}
