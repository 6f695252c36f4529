//! Ownership of networked avatars.
//!
//! The presentation toggle only needs to know whether an avatar belongs to the
//! local participant. Any component can carry that answer by implementing
//! [`Ownership`]; [`Avatar`] is the carrier used by default.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Capability of a component to tell whether its entity is the local participant.
pub trait Ownership: Component {
    fn is_local(&self) -> bool;
}

/// Networked avatar root. `is_local` is populated by the networking layer.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct Avatar {
    pub is_local: bool,
}

impl Avatar {
    pub const LOCAL: Self = Self { is_local: true };
    pub const REMOTE: Self = Self { is_local: false };
}

impl Ownership for Avatar {
    fn is_local(&self) -> bool {
        self.is_local
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AvatarRole {
    Local,
    Remote,
}

impl From<bool> for AvatarRole {
    fn from(is_local: bool) -> Self {
        if is_local { Self::Local } else { Self::Remote }
    }
}

/// Marker for the avatar controlled by this process.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LocalPlayer;

/// Inserted once the presentation toggle has handled an avatar.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct PresentationApplied {
    pub role: AvatarRole,
}
