//! Per-frame input state resource.
//!
//! The host feeds raw key and mouse button codes in, scripts poll them through
//! [`Input`](crate::scripting::input::Input). Codes follow the GLFW numbering
//! listed in [`KeyCode`](crate::scripting::input::KeyCode).
use bevy_ecs::prelude::*;
use glam::Vec2;
use rustc_hash::FxHashSet;

#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    keys: FxHashSet<i32>,
    mouse_buttons: FxHashSet<i32>,
    /// Cursor position in window pixels.
    pub mouse_position: Vec2,
}

impl InputState {
    pub fn press_key(&mut self, code: i32) {
        self.keys.insert(code);
    }

    pub fn release_key(&mut self, code: i32) {
        self.keys.remove(&code);
    }

    pub fn is_key_pressed(&self, code: i32) -> bool {
        self.keys.contains(&code)
    }

    pub fn press_mouse_button(&mut self, code: i32) {
        self.mouse_buttons.insert(code);
    }

    pub fn release_mouse_button(&mut self, code: i32) {
        self.mouse_buttons.remove(&code);
    }

    pub fn is_mouse_button_pressed(&self, code: i32) -> bool {
        self.mouse_buttons.contains(&code)
    }

    /// Releases every key and button.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.mouse_buttons.clear();
    }
}
