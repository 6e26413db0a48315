//! Sandbox scene and the behaviors it runs.
//!
//! A top-down player pushed around by impulses, a camera that trails it, a
//! tile that changes color on a timer, a coin the player can pick up, and a
//! behavior that dumps one field of every field type.

use glam::{Vec2, Vec3, Vec4};

use crate::components::audiosource::AudioSource;
use crate::components::camera::Camera;
use crate::components::colliders::BoxCollider2D;
use crate::components::renderers::SpriteRenderer;
use crate::components::rigidbody2d::{BodyType, Rigidbody2D};
use crate::components::script::Script;
use crate::interop::Physics2DContact;
use crate::math::{Vector2, Vector3, Vector4, mathf};
use crate::resources::bridgeconfig::BridgeConfig;
use crate::scene::Scene;
use crate::scripting::{
    Behavior, Entity, Input, KeyCode, Log, MouseCode, Random, Rigidbody2DComponent, ScriptError,
    ScriptField, ScriptFieldValue, ScriptRegistry, ScriptResult, SpriteRendererComponent,
    Timestep, TransformComponent,
};

/// Registers every sandbox behavior under its class name.
pub fn register_behaviors(registry: &mut ScriptRegistry) {
    registry.register::<Player>("Player");
    registry.register::<CameraFollow>("CameraFollow");
    registry.register::<ColorChanger>("ColorChanger");
    registry.register::<VariableValidator>("VariableValidator");
}

/// Builds the sandbox scene. Entity names are what the behaviors look each
/// other up by.
pub fn build_scene(config: &BridgeConfig) -> Scene {
    let mut scene = Scene::with_config("Sandbox", config);

    let player = scene.create_entity("Player");
    scene.insert(
        player,
        (
            Rigidbody2D {
                gravity_scale: 0.0,
                fixed_rotation: true,
                ..Rigidbody2D::new(BodyType::Dynamic)
            },
            BoxCollider2D::default(),
            SpriteRenderer::default(),
            Script::new("Player"),
        ),
    );

    let camera = scene.create_entity("Camera");
    scene.insert(
        camera,
        (
            Camera {
                primary: true,
                ..Camera::default()
            },
            Script::new("CameraFollow"),
        ),
    );

    let coin = scene.create_entity("Coin");
    scene.set_position(coin, Vec3::new(3.0, 0.0, 0.0));
    scene.insert(
        coin,
        (
            Rigidbody2D::new(BodyType::Static),
            BoxCollider2D {
                size: Vec2::splat(0.5),
                is_sensor: true,
                ..BoxCollider2D::default()
            },
        ),
    );

    let tile = scene.create_entity("ColorTile");
    scene.set_position(tile, Vec3::new(0.0, -3.0, 0.0));
    scene.insert(
        tile,
        (
            SpriteRenderer {
                color: Vec4::new(0.8, 0.2, 0.3, 1.0),
                ..SpriteRenderer::default()
            },
            Script::new("ColorChanger"),
        ),
    );

    let validator = scene.create_entity("Validator");
    scene.insert(validator, Script::new("VariableValidator"));

    let music = scene.create_entity("Music");
    scene.insert(
        music,
        AudioSource {
            clip: "assets/audio/theme.ogg".to_string(),
            looping: true,
            auto_play_on_start: true,
            ..AudioSource::default()
        },
    );

    scene
}

fn set_f32(target: &mut f32, value: &ScriptFieldValue) -> bool {
    value.as_f32().map(|v| *target = v).is_some()
}

// ==================== Player ====================

/// Moves with WASD through linear impulses, spins with Q/E and zooms the
/// camera with the arrow keys.
pub struct Player {
    pub move_speed: f32,
    pub rot_speed: f32,
    pub zoom_speed: f32,
    pub movement: Vector2,
    pub example_string: String,
    pub coins: u32,
    body: Option<Rigidbody2DComponent>,
    camera: Option<Entity>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rot_speed: 5.0,
            zoom_speed: 1.0,
            movement: Vector2::ZERO,
            example_string: "Example".to_string(),
            coins: 0,
            body: None,
            camera: None,
        }
    }
}

impl Behavior for Player {
    fn on_create(&mut self, entity: Entity) -> ScriptResult {
        self.body = Some(entity.require_component::<Rigidbody2DComponent>()?);
        Log::trace(format!("Move Speed: {}", self.move_speed));
        Log::trace(format!("Rotation Speed: {}", self.rot_speed));
        Log::trace(format!("Zoom Speed: {}", self.zoom_speed));
        Ok(())
    }

    fn on_update(&mut self, entity: Entity, ts: Timestep) -> ScriptResult {
        if self.camera.is_none() {
            self.camera = Entity::find_entity_by_name("Camera");
        }

        if Input::is_mouse_button_pressed(MouseCode::Right) {
            Log::trace(format!("Current Mouse Pos: {}", Input::mouse_position()));
        }

        self.movement = Vector2::ZERO;
        if Input::is_key_pressed(KeyCode::A) {
            self.movement.x -= 1.0;
        }
        if Input::is_key_pressed(KeyCode::D) {
            self.movement.x += 1.0;
        }
        if Input::is_key_pressed(KeyCode::S) {
            self.movement.y -= 1.0;
        }
        if Input::is_key_pressed(KeyCode::W) {
            self.movement.y += 1.0;
        }
        if self.movement.sqr_magnitude() > 0.0 {
            let body = self
                .body
                .ok_or_else(|| ScriptError::custom("player has no rigidbody"))?;
            body.apply_linear_impulse_to_center(self.movement * self.move_speed * ts.seconds(), true);
        }

        let spin = match (Input::is_key_pressed(KeyCode::Q), Input::is_key_pressed(KeyCode::E)) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        if spin != 0.0 {
            let transform = entity.require_component::<TransformComponent>()?;
            let mut rotation = transform.rotation();
            rotation.z += spin * self.rot_speed * ts.seconds();
            transform.set_rotation(rotation);
        }

        let zoom = match (Input::is_key_pressed(KeyCode::Left), Input::is_key_pressed(KeyCode::Right)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        if zoom != 0.0 {
            let Some(camera) = self.camera else {
                Log::error("Camera is missing!");
                return Ok(());
            };
            let delta = zoom * self.zoom_speed * ts.seconds();
            camera.with_behavior::<CameraFollow, _>(|follow| follow.distance_from_player += delta);
        }
        Ok(())
    }

    fn on_trigger_enter_2d(&mut self, _entity: Entity, contact: Physics2DContact) -> ScriptResult {
        if let Some(other) = contact.other_entity() {
            self.coins += 1;
            Log::info(format!("picked up {} ({} total)", other.name(), self.coins));
            other.destroy();
        }
        Ok(())
    }

    fn on_destroy(&mut self, _entity: Entity) -> ScriptResult {
        Log::warn("Player destroyed.");
        Ok(())
    }

    fn fields(&self) -> Vec<ScriptField> {
        vec![
            ScriptField::new("move_speed", ScriptFieldValue::Float(self.move_speed)),
            ScriptField::new("rot_speed", ScriptFieldValue::Float(self.rot_speed)),
            ScriptField::new("zoom_speed", ScriptFieldValue::Float(self.zoom_speed)),
            ScriptField::new("movement", ScriptFieldValue::Vector2(self.movement)),
            ScriptField::new(
                "example_string",
                ScriptFieldValue::String(self.example_string.clone()),
            ),
        ]
    }

    fn set_field(&mut self, name: &str, value: &ScriptFieldValue) -> bool {
        match (name, value) {
            ("move_speed", v) => set_f32(&mut self.move_speed, v),
            ("rot_speed", v) => set_f32(&mut self.rot_speed, v),
            ("zoom_speed", v) => set_f32(&mut self.zoom_speed, v),
            ("movement", ScriptFieldValue::Vector2(v)) => {
                self.movement = *v;
                true
            }
            ("example_string", ScriptFieldValue::String(s)) => {
                self.example_string = s.clone();
                true
            }
            _ => false,
        }
    }
}

// ==================== Camera ====================

/// Trails the player in late update, pulling back while it climbs.
pub struct CameraFollow {
    pub distance_from_player: f32,
    pub distance_min: f32,
    pub distance_max: f32,
    pub zoom_speed_percent_increase: f32,
    pub offset: Vector2,
    player: Option<Entity>,
    player_body: Option<Rigidbody2DComponent>,
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self {
            distance_from_player: 5.0,
            distance_min: 5.0,
            distance_max: 50.0,
            zoom_speed_percent_increase: 1.0,
            offset: Vector2::new(0.0, -2.0),
            player: None,
            player_body: None,
        }
    }
}

impl CameraFollow {
    fn distance(&mut self, t: f32) -> f32 {
        let climb = self
            .player_body
            .map_or(0.0, |body| body.linear_velocity().y);
        if climb > 0.0 {
            self.distance_from_player = climb * (1.0 + self.zoom_speed_percent_increase * t);
        }
        mathf::clamp(self.distance_from_player, self.distance_min, self.distance_max)
    }
}

impl Behavior for CameraFollow {
    fn on_start(&mut self, _entity: Entity) -> ScriptResult {
        let player = Entity::require_entity_by_name("Player")?;
        self.player = Some(player);
        self.player_body = player.get_component::<Rigidbody2DComponent>();
        Ok(())
    }

    fn on_late_update(&mut self, entity: Entity, _ts: Timestep) -> ScriptResult {
        let Some(player) = self.player.filter(|p| p.is_valid()) else {
            Log::error("Player is missing!");
            return Ok(());
        };
        let target = player
            .require_component::<TransformComponent>()?
            .position()
            .xy();
        let z = self.distance(0.7);
        entity
            .require_component::<TransformComponent>()?
            .set_position((target + self.offset).extend(z));
        Ok(())
    }

    fn fields(&self) -> Vec<ScriptField> {
        vec![
            ScriptField::new(
                "distance_from_player",
                ScriptFieldValue::Float(self.distance_from_player),
            ),
            ScriptField::new("distance_min", ScriptFieldValue::Float(self.distance_min)),
            ScriptField::new("distance_max", ScriptFieldValue::Float(self.distance_max)),
            ScriptField::new(
                "zoom_speed_percent_increase",
                ScriptFieldValue::Float(self.zoom_speed_percent_increase),
            ),
            ScriptField::new("offset", ScriptFieldValue::Vector2(self.offset)),
        ]
    }

    fn set_field(&mut self, name: &str, value: &ScriptFieldValue) -> bool {
        match (name, value) {
            ("distance_from_player", v) => set_f32(&mut self.distance_from_player, v),
            ("distance_min", v) => set_f32(&mut self.distance_min, v),
            ("distance_max", v) => set_f32(&mut self.distance_max, v),
            ("zoom_speed_percent_increase", v) => set_f32(&mut self.zoom_speed_percent_increase, v),
            ("offset", ScriptFieldValue::Vector2(v)) => {
                self.offset = *v;
                true
            }
            _ => false,
        }
    }
}

// ==================== ColorChanger ====================

/// Every `seconds_between` seconds, picks a random color and tiling factor.
pub struct ColorChanger {
    pub seconds_between: f32,
    pub max_tiling: i32,
    pub color: Vector4,
    elapsed: f32,
    sprite: Option<SpriteRendererComponent>,
}

impl Default for ColorChanger {
    fn default() -> Self {
        Self {
            seconds_between: 1.0,
            max_tiling: 100,
            color: Vector4::ONE,
            elapsed: 0.0,
            sprite: None,
        }
    }
}

impl Behavior for ColorChanger {
    fn on_create(&mut self, entity: Entity) -> ScriptResult {
        self.sprite = Some(entity.require_component::<SpriteRendererComponent>()?);
        Ok(())
    }

    fn on_update(&mut self, _entity: Entity, ts: Timestep) -> ScriptResult {
        self.elapsed += ts.seconds();
        if self.elapsed < self.seconds_between {
            return Ok(());
        }
        self.elapsed = 0.0;
        self.color = Vector4::new(Random::float(), Random::float(), Random::float(), 1.0);
        if let Some(sprite) = self.sprite {
            sprite.set_color(self.color);
            sprite.set_tiling_factor(Random::range_i32(1, self.max_tiling) as f32);
        }
        Ok(())
    }

    fn fields(&self) -> Vec<ScriptField> {
        vec![
            ScriptField::new("seconds_between", ScriptFieldValue::Float(self.seconds_between)),
            ScriptField::new("max_tiling", ScriptFieldValue::Int(self.max_tiling)),
            ScriptField::new("color", ScriptFieldValue::Vector4(self.color)),
        ]
    }

    fn set_field(&mut self, name: &str, value: &ScriptFieldValue) -> bool {
        match (name, value) {
            ("seconds_between", v) => set_f32(&mut self.seconds_between, v),
            ("max_tiling", ScriptFieldValue::Int(v)) => {
                self.max_tiling = *v;
                true
            }
            ("color", v) => v.as_vector4().map(|c| self.color = c).is_some(),
            _ => false,
        }
    }
}

// ==================== VariableValidator ====================

/// Holds one field of every field type and logs them on create when `var0`
/// is set.
pub struct VariableValidator {
    pub var0: bool,
    pub var1: char,
    pub var2: String,
    pub var3: f32,
    pub var4: f64,
    pub var5: i8,
    pub var6: u8,
    pub var7: i16,
    pub var8: u16,
    pub var9: i32,
    pub var10: u32,
    pub var11: i64,
    pub var12: u64,
    pub var13: Vector2,
    pub var14: Vector3,
    pub var15: Vector4,
    pub var16: Entity,
}

impl Default for VariableValidator {
    fn default() -> Self {
        Self {
            var0: false,
            var1: 'Y',
            var2: "Hello There!".to_string(),
            var3: 192.123,
            var4: 1237.1232,
            var5: -96,
            var6: 240,
            var7: -2400,
            var8: 2400,
            var9: -21654,
            var10: 31654,
            var11: -3165,
            var12: 6316545,
            var13: Vector2::new(1234.0, -1234.0),
            var14: Vector3::new(-1234.0, 1234.0, 98723.0),
            var15: Vector4::new(1234.0, 1234.0, -98723.0, 12356.0),
            var16: Entity::INVALID,
        }
    }
}

impl Behavior for VariableValidator {
    fn on_create(&mut self, _entity: Entity) -> ScriptResult {
        if !self.var0 {
            return Ok(());
        }
        for field in self.fields() {
            if field.value == ScriptFieldValue::Entity(0) {
                continue;
            }
            Log::trace(format!("Var: {} = {:?}", field.field_type(), field.value));
        }
        Ok(())
    }

    fn fields(&self) -> Vec<ScriptField> {
        use ScriptFieldValue as V;
        vec![
            ScriptField::new("var0", V::Bool(self.var0)),
            ScriptField::new("var1", V::Char(self.var1)),
            ScriptField::new("var2", V::String(self.var2.clone())),
            ScriptField::new("var3", V::Float(self.var3)),
            ScriptField::new("var4", V::Double(self.var4)),
            ScriptField::new("var5", V::Byte(self.var5)),
            ScriptField::new("var6", V::UByte(self.var6)),
            ScriptField::new("var7", V::Short(self.var7)),
            ScriptField::new("var8", V::UShort(self.var8)),
            ScriptField::new("var9", V::Int(self.var9)),
            ScriptField::new("var10", V::UInt(self.var10)),
            ScriptField::new("var11", V::Long(self.var11)),
            ScriptField::new("var12", V::ULong(self.var12)),
            ScriptField::new("var13", V::Vector2(self.var13)),
            ScriptField::new("var14", V::Vector3(self.var14)),
            ScriptField::new("var15", V::Vector4(self.var15)),
            ScriptField::new("var16", V::Entity(self.var16.id())),
        ]
    }

    fn set_field(&mut self, name: &str, value: &ScriptFieldValue) -> bool {
        use ScriptFieldValue as V;
        match (name, value.clone()) {
            ("var0", V::Bool(v)) => self.var0 = v,
            ("var1", V::Char(v)) => self.var1 = v,
            ("var2", V::String(v)) => self.var2 = v,
            ("var3", V::Float(v)) => self.var3 = v,
            ("var4", V::Double(v)) => self.var4 = v,
            ("var5", V::Byte(v)) => self.var5 = v,
            ("var6", V::UByte(v)) => self.var6 = v,
            ("var7", V::Short(v)) => self.var7 = v,
            ("var8", V::UShort(v)) => self.var8 = v,
            ("var9", V::Int(v)) => self.var9 = v,
            ("var10", V::UInt(v)) => self.var10 = v,
            ("var11", V::Long(v)) => self.var11 = v,
            ("var12", V::ULong(v)) => self.var12 = v,
            ("var13", V::Vector2(v)) => self.var13 = v,
            ("var14", V::Vector3(v)) => self.var14 = v,
            ("var15", V::Vector4(v)) => self.var15 = v,
            ("var16", V::Entity(id)) => self.var16 = Entity::from_id(id),
            _ => return false,
        }
        true
    }
}
