//! ECS resources that bridge the scene with the background audio thread.
//!
//! Use [`setup_audio`] once during initialization to spawn the audio thread
//! and insert the [`AudioBridge`] resource. Call [`shutdown_audio`] during
//! teardown to stop the thread. Without a bridge, [`AudioEngine`] keeps its
//! volume state but playback requests go nowhere.

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::systems::audio::audio_thread;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::trace;

/// Shared bridge between the ECS world and the audio thread.
#[derive(Resource)]
pub struct AudioBridge {
    /// Receiver for [`AudioMessage`] messages (audio thread -> ECS).
    pub rx_msg: Receiver<AudioMessage>,
    /// Join handle for the background audio thread.
    pub handle: std::thread::JoinHandle<()>,
}

/// Master output state scripts control through the audio engine facade.
#[derive(Resource, Debug, Clone)]
pub struct AudioEngine {
    master_volume: f32,
    muted: bool,
    tx_cmd: Option<Sender<AudioCmd>>,
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new(1.0, false)
    }
}

impl AudioEngine {
    pub fn new(master_volume: f32, muted: bool) -> Self {
        Self {
            master_volume: master_volume.clamp(0.0, 1.0),
            muted,
            tx_cmd: None,
        }
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Sets the master volume, clamped to `[0, 1]`.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
        self.send(AudioCmd::SetMasterVolume {
            volume: self.master_volume,
        });
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.send(AudioCmd::SetMuted { muted });
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.muted);
    }

    /// Volume actually reaching the output.
    pub fn output_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    pub fn is_connected(&self) -> bool {
        self.tx_cmd.is_some()
    }

    /// Forwards a command to the audio thread if one is running.
    pub fn send(&self, cmd: AudioCmd) {
        match &self.tx_cmd {
            Some(tx) => {
                if tx.send(cmd).is_err() {
                    trace!("audio thread gone, command dropped");
                }
            }
            None => trace!("no audio thread, dropping {:?}", cmd),
        }
    }
}

/// Spawn the audio thread and register bridge resources.
///
/// Inserts [`AudioBridge`], connects the existing [`AudioEngine`] (or a default
/// one) and initializes `Messages<AudioMessage>`. The current master volume and
/// mute state are pushed to the thread right away.
pub fn setup_audio(world: &mut World) {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();

    let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg));

    world.insert_resource(AudioBridge { rx_msg, handle });
    world.init_resource::<Messages<AudioMessage>>();

    let mut engine = world.get_resource_or_insert_with(AudioEngine::default);
    engine.tx_cmd = Some(tx_cmd);
    let (volume, muted) = (engine.master_volume, engine.muted);
    engine.send(AudioCmd::SetMasterVolume { volume });
    engine.send(AudioCmd::SetMuted { muted });
}

/// Gracefully request shutdown of the audio thread and join it.
pub fn shutdown_audio(world: &mut World) {
    let sender = world
        .get_resource_mut::<AudioEngine>()
        .and_then(|mut engine| engine.tx_cmd.take());
    if let Some(bridge) = world.remove_resource::<AudioBridge>() {
        if let Some(tx) = sender {
            let _ = tx.send(AudioCmd::Shutdown);
        }
        let _ = bridge.handle.join();
    }
}
