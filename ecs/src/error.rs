//! Error types for recoverable misuse of the ECS.
//!
//! Every variant corresponds to a soft failure: the offending operation has
//! been logged at error level and has mutated nothing. Contract violations
//! (unregistered type access, reading a component an entity does not hold)
//! panic instead and never appear here.

use core::fmt;

use crate::entity::Entity;

/// A recoverable misuse of the ECS. The operation that produced this error
/// was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A fixed capacity bound (entity ids, component slots, or component
    /// type tokens) is exhausted.
    CapacityExceeded {
        /// The bound that refused the operation.
        capacity: usize,
    },

    /// The entity already holds a component of this type.
    DuplicateComponent {
        entity: Entity,
        type_name: &'static str,
    },

    /// The entity holds no component of this type.
    MissingComponent {
        entity: Entity,
        type_name: &'static str,
    },

    /// The type is already registered.
    DuplicateType { type_name: &'static str },

    /// No system of this type has been registered.
    UnknownSystem { type_name: &'static str },

    /// The entity is not currently alive.
    DeadEntity { entity: Entity },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CapacityExceeded { capacity } => {
                write!(f, "capacity limit reached ({capacity})")
            }
            Error::DuplicateComponent { entity, type_name } => {
                write!(f, "{entity:?} already holds a {type_name}")
            }
            Error::MissingComponent { entity, type_name } => {
                write!(f, "{entity:?} holds no {type_name}")
            }
            Error::DuplicateType { type_name } => {
                write!(f, "type {type_name} is already registered")
            }
            Error::UnknownSystem { type_name } => {
                write!(f, "system {type_name} is not registered")
            }
            Error::DeadEntity { entity } => {
                write!(f, "{entity:?} is not alive")
            }
        }
    }
}

impl std::error::Error for Error {}
