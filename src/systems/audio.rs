//! Audio thread and the systems that bridge it with the scene.
//!
//! - [`audio_thread`] runs on its own OS thread and owns the mixer state. It
//!   processes [`AudioCmd`](crate::events::audio::AudioCmd) messages and emits
//!   [`AudioMessage`](crate::events::audio::AudioMessage) responses.
//! - [`poll_audio_messages`] non-blockingly drains the thread's responses into
//!   the ECS message queue.
//! - [`sync_audio_sources`] mirrors start and stop confirmations back onto
//!   [`AudioSource`] components.
//!
//! No output device is opened here; the thread keeps the bookkeeping a device
//! backend would need and a host can replace it with a real mixer.

use crate::components::audiosource::AudioSource;
use crate::components::id::EntityId;
use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::audio::AudioBridge;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info};
use rustc_hash::FxHashMap;

/// A clip the mixer considers playing.
#[derive(Debug, Clone)]
struct Voice {
    clip: String,
    volume: f32,
    pitch: f32,
    looping: bool,
}

/// Drain pending responses from the audio thread into `Messages<AudioMessage>`.
pub fn poll_audio_messages(bridge: Res<AudioBridge>, mut writer: MessageWriter<AudioMessage>) {
    writer.write_batch(bridge.rx_msg.try_iter());
}

/// Advance the ECS message queue for [`AudioMessage`].
pub fn update_bevy_audio_messages(mut messages: ResMut<Messages<AudioMessage>>) {
    messages.update();
}

/// Apply start/stop confirmations to the matching [`AudioSource`] components.
pub fn sync_audio_sources(
    mut reader: MessageReader<AudioMessage>,
    mut sources: Query<(&EntityId, &mut AudioSource)>,
) {
    let mut changes: FxHashMap<u64, bool> = FxHashMap::default();
    for msg in reader.read() {
        match msg {
            AudioMessage::Started { entity_id, .. } => {
                changes.insert(*entity_id, true);
            }
            AudioMessage::Stopped { entity_id } => {
                changes.insert(*entity_id, false);
            }
            AudioMessage::OutputVolumeChanged { .. } => {}
        }
    }
    if changes.is_empty() {
        return;
    }
    for (id, mut source) in sources.iter_mut() {
        if let Some(&playing) = changes.get(&id.0) {
            source.playing = playing;
        }
    }
}

/// Entry point of the dedicated audio thread.
///
/// Blocks on the command channel and exits on [`AudioCmd::Shutdown`] or when
/// every sender has been dropped. Starting a clip on an entity that is already
/// playing replaces the previous voice.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_evt: Sender<AudioMessage>) {
    debug!("audio thread starting (id={:?})", std::thread::current().id());

    let mut voices: FxHashMap<u64, Voice> = FxHashMap::default();
    let mut master_volume = 1.0_f32;
    let mut muted = false;

    while let Ok(cmd) = rx_cmd.recv() {
        match cmd {
            AudioCmd::Play {
                entity_id,
                clip,
                volume,
                pitch,
                looping,
            } => {
                debug!(
                    "play clip='{}' entity={} volume={} pitch={} looping={}",
                    clip, entity_id, volume, pitch, looping
                );
                voices.insert(
                    entity_id,
                    Voice {
                        clip: clip.clone(),
                        volume,
                        pitch,
                        looping,
                    },
                );
                let _ = tx_evt.send(AudioMessage::Started { entity_id, clip });
            }
            AudioCmd::Stop { entity_id } => {
                if let Some(voice) = voices.remove(&entity_id) {
                    debug!("stop clip='{}' entity={}", voice.clip, entity_id);
                }
                let _ = tx_evt.send(AudioMessage::Stopped { entity_id });
            }
            AudioCmd::SetMasterVolume { volume } => {
                master_volume = volume;
                let output = if muted { 0.0 } else { master_volume };
                let _ = tx_evt.send(AudioMessage::OutputVolumeChanged { volume: output });
            }
            AudioCmd::SetMuted { muted: m } => {
                muted = m;
                let output = if muted { 0.0 } else { master_volume };
                let _ = tx_evt.send(AudioMessage::OutputVolumeChanged { volume: output });
            }
            AudioCmd::Shutdown => break,
        }
    }

    info!("audio thread exiting with {} active voice(s)", voices.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_thread_confirms_play_and_stop() {
        let (tx_cmd, rx_cmd) = unbounded();
        let (tx_evt, rx_evt) = unbounded();
        let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_evt));

        tx_cmd
            .send(AudioCmd::Play {
                entity_id: 9,
                clip: "jump".into(),
                volume: 1.0,
                pitch: 1.0,
                looping: false,
            })
            .unwrap();
        tx_cmd.send(AudioCmd::Stop { entity_id: 9 }).unwrap();
        tx_cmd.send(AudioCmd::Shutdown).unwrap();
        handle.join().unwrap();

        let msgs: Vec<_> = rx_evt.try_iter().collect();
        assert_eq!(
            msgs,
            vec![
                AudioMessage::Started {
                    entity_id: 9,
                    clip: "jump".into()
                },
                AudioMessage::Stopped { entity_id: 9 },
            ]
        );
    }

    #[test]
    fn test_mute_reports_silent_output() {
        let (tx_cmd, rx_cmd) = unbounded();
        let (tx_evt, rx_evt) = unbounded();
        let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_evt));
        tx_cmd.send(AudioCmd::SetMasterVolume { volume: 0.5 }).unwrap();
        tx_cmd.send(AudioCmd::SetMuted { muted: true }).unwrap();
        drop(tx_cmd);
        handle.join().unwrap();

        let msgs: Vec<_> = rx_evt.try_iter().collect();
        assert_eq!(
            msgs.last(),
            Some(&AudioMessage::OutputVolumeChanged { volume: 0.0 })
        );
    }
}
