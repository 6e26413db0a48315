//! Errors raised from script code.
//!
//! None of these reach the frame loop: the driver logs them against the
//! entity and callback that produced them and carries on.

use thiserror::Error;

use crate::scene::ComponentKind;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("entity {0} does not exist")]
    MissingEntity(u64),
    #[error("entity '{name}' not found")]
    EntityNotFound { name: String },
    #[error("entity {entity_id} has no {kind}")]
    MissingComponent { entity_id: u64, kind: ComponentKind },
    #[error("unknown script class '{0}'")]
    UnknownClass(String),
    #[error("lua error: {0}")]
    Lua(String),
    #[error("{0}")]
    Custom(String),
}

impl ScriptError {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

#[cfg(feature = "lua")]
impl From<mlua::Error> for ScriptError {
    fn from(err: mlua::Error) -> Self {
        Self::Lua(err.to_string())
    }
}

/// Return type of every lifecycle callback.
pub type ScriptResult<T = ()> = Result<T, ScriptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_culprit() {
        let err = ScriptError::MissingComponent {
            entity_id: 7,
            kind: ComponentKind::Rigidbody2D,
        };
        assert_eq!(err.to_string(), "entity 7 has no Rigidbody2DComponent");
        let err = ScriptError::EntityNotFound {
            name: "Player".into(),
        };
        assert_eq!(err.to_string(), "entity 'Player' not found");
    }
}
