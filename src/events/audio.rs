use bevy_ecs::message::Message;

/// Commands sent *to* the audio thread
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    Play {
        entity_id: u64,
        clip: String,
        volume: f32,
        pitch: f32,
        looping: bool,
    },
    Stop { entity_id: u64 },
    SetMasterVolume { volume: f32 },
    SetMuted { muted: bool },
    Shutdown,
}

/// Events sent *back* from the audio thread
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioMessage {
    Started { entity_id: u64, clip: String },
    Stopped { entity_id: u64 },
    /// Effective output volume after master volume and mute are applied.
    OutputVolumeChanged { volume: f32 },
}
