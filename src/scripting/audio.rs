//! Master volume controls.

use crate::interop::internal_calls as ic;

pub struct Audio;

impl Audio {
    pub fn master_volume() -> f32 {
        ic::audio_engine_get_master_volume()
    }

    /// Clamped to `[0, 1]`.
    pub fn set_master_volume(volume: f32) {
        ic::audio_engine_set_master_volume(volume);
    }

    pub fn is_muted() -> bool {
        ic::audio_engine_is_master_volume_muted()
    }

    pub fn set_muted(muted: bool) {
        ic::audio_engine_set_master_volume_muted(muted);
    }

    pub fn toggle_mute() {
        ic::audio_engine_toggle_mute_master_volume();
    }
}
