//! Keyboard and mouse queries.
//!
//! Codes use GLFW numbering; the host feeds
//! [`InputState`](crate::resources::input::InputState) with the same values.

use crate::interop::internal_calls as ic;
use crate::math::Vector2;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space = 32,
    Apostrophe = 39,
    Comma = 44,
    Minus = 45,
    Period = 46,
    Slash = 47,

    D0 = 48,
    D1 = 49,
    D2 = 50,
    D3 = 51,
    D4 = 52,
    D5 = 53,
    D6 = 54,
    D7 = 55,
    D8 = 56,
    D9 = 57,

    Semicolon = 59,
    Equal = 61,

    A = 65,
    B = 66,
    C = 67,
    D = 68,
    E = 69,
    F = 70,
    G = 71,
    H = 72,
    I = 73,
    J = 74,
    K = 75,
    L = 76,
    M = 77,
    N = 78,
    O = 79,
    P = 80,
    Q = 81,
    R = 82,
    S = 83,
    T = 84,
    U = 85,
    V = 86,
    W = 87,
    X = 88,
    Y = 89,
    Z = 90,

    LeftBracket = 91,
    Backslash = 92,
    RightBracket = 93,
    GraveAccent = 96,

    Escape = 256,
    Enter = 257,
    Tab = 258,
    Backspace = 259,
    Insert = 260,
    Delete = 261,
    Right = 262,
    Left = 263,
    Down = 264,
    Up = 265,
    PageUp = 266,
    PageDown = 267,
    Home = 268,
    End = 269,
    CapsLock = 280,
    ScrollLock = 281,
    NumLock = 282,
    PrintScreen = 283,
    Pause = 284,

    F1 = 290,
    F2 = 291,
    F3 = 292,
    F4 = 293,
    F5 = 294,
    F6 = 295,
    F7 = 296,
    F8 = 297,
    F9 = 298,
    F10 = 299,
    F11 = 300,
    F12 = 301,

    LeftShift = 340,
    LeftControl = 341,
    LeftAlt = 342,
    LeftSuper = 343,
    RightShift = 344,
    RightControl = 345,
    RightAlt = 346,
    RightSuper = 347,
    Menu = 348,
}

impl KeyCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseCode {
    Left = 0,
    Right = 1,
    Middle = 2,
    Button3 = 3,
    Button4 = 4,
    Button5 = 5,
    Button6 = 6,
    Button7 = 7,
}

impl MouseCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

pub struct Input;

impl Input {
    pub fn is_key_pressed(key: KeyCode) -> bool {
        ic::input_is_key_pressed(key.code())
    }

    pub fn is_mouse_button_pressed(button: MouseCode) -> bool {
        ic::input_is_mouse_button_pressed(button.code())
    }

    pub fn mouse_position() -> Vector2 {
        let (mut x, mut y) = (0.0, 0.0);
        ic::input_get_mouse_position(&mut x, &mut y);
        Vector2::new(x, y)
    }

    pub fn mouse_x() -> f32 {
        ic::input_get_mouse_x()
    }

    pub fn mouse_y() -> f32 {
        ic::input_get_mouse_y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interop::{ScriptContext, bind};
    use crate::scene::Scene;
    use glam::Vec2;

    #[test]
    fn test_codes_use_glfw_numbering() {
        assert_eq!(KeyCode::Space.code(), 32);
        assert_eq!(KeyCode::A.code(), 65);
        assert_eq!(KeyCode::Escape.code(), 256);
        assert_eq!(KeyCode::F12.code(), 301);
        assert_eq!(MouseCode::Middle.code(), 2);
    }

    #[test]
    fn test_reads_host_fed_state() {
        let context = ScriptContext::new(Scene::new("input"));
        let _guard = bind(&context);
        assert!(!Input::is_key_pressed(KeyCode::W));
        {
            let mut scene = context.scene_mut();
            let mut input = scene.input_mut();
            input.press_key(KeyCode::W.code());
            input.press_mouse_button(MouseCode::Left.code());
            input.mouse_position = Vec2::new(10.0, 20.0);
        }
        assert!(Input::is_key_pressed(KeyCode::W));
        assert!(Input::is_mouse_button_pressed(MouseCode::Left));
        assert_eq!(Input::mouse_position(), Vector2::new(10.0, 20.0));
        assert_eq!(Input::mouse_x(), 10.0);
        assert_eq!(Input::mouse_y(), 20.0);
    }
}
