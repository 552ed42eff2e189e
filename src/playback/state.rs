use crate::foundation::error::{AnaglyphError, AnaglyphResult};

/// Lifecycle of the loaded stream as seen by the player.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum PlaybackState {
    /// Nothing loaded.
    #[default]
    Idle,
    /// A stream is attached but its metadata is not available yet.
    Loading,
    /// Metadata loaded, not yet played.
    Ready,
    /// Frames are being composited every refresh.
    Playing,
    /// Paused by the user or after a rejected play.
    Paused,
    /// Playback ran past the last frame.
    Ended,
}

/// Named events driving [`PlaybackState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// A new stream was attached.
    Load,
    /// The stream reported its native size.
    MetadataLoaded,
    /// Playback started or resumed.
    Play,
    /// The host refused to start playback.
    PlayRejected,
    /// Playback paused.
    Pause,
    /// The playback position moved.
    Seek,
    /// The stream ran past its last frame.
    Ended,
    /// The stream was detached.
    Unload,
}

impl PlaybackState {
    /// Apply `trigger`, rejecting transitions that make no sense from this state.
    pub fn on(self, trigger: Trigger) -> AnaglyphResult<Self> {
        use PlaybackState as S;
        use Trigger as T;

        let next = match (self, trigger) {
            (_, T::Load) => S::Loading,
            (_, T::Unload) => S::Idle,

            (S::Loading, T::MetadataLoaded) => S::Ready,
            (s @ (S::Ready | S::Playing | S::Paused | S::Ended), T::MetadataLoaded) => s,

            // Playing before metadata is allowed; cycles skip until frames arrive.
            (S::Loading | S::Ready | S::Playing | S::Paused | S::Ended, T::Play) => S::Playing,
            (S::Loading | S::Ready | S::Playing | S::Paused | S::Ended, T::PlayRejected) => {
                S::Paused
            }

            (S::Playing | S::Paused, T::Pause) => S::Paused,
            (s @ (S::Loading | S::Ready | S::Ended), T::Pause) => s,

            (S::Playing | S::Paused | S::Ended, T::Ended) => S::Ended,

            (S::Ended, T::Seek) => S::Paused,
            (s @ (S::Loading | S::Ready | S::Playing | S::Paused), T::Seek) => s,

            (from, t) => {
                return Err(AnaglyphError::validation(format!(
                    "invalid playback transition {t:?} from {from:?}"
                )));
            }
        };
        Ok(next)
    }

    /// `true` only in [`PlaybackState::Playing`].
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/state.rs"]
mod tests;
