//! Playback state machine, refresh scheduling and the player that ties them to the compositor.

pub(crate) mod player;
pub(crate) mod scheduler;
pub(crate) mod selection;
pub(crate) mod state;
