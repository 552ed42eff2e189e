use crate::{
    anaglyph::compositor::{Compositor, CycleOutcome, SkipReason, StopReason},
    config::PlayerOpts,
    display::DisplaySurface,
    foundation::error::AnaglyphResult,
    playback::{
        scheduler::RefreshScheduler,
        selection::PresetSelection,
        state::{PlaybackState, Trigger},
    },
    source::{MediaStream, adapter::FrameSourceAdapter},
};

/// Drives one media stream through the compositor at display refresh rate.
///
/// Hosts call [`Player::on_refresh`] on every refresh opportunity and keep requesting refreshes
/// while [`Player::wants_refresh`] is `true`. Every transition into
/// [`PlaybackState::Playing`] re-arms the cycle; pausing or reaching the end lets it lapse.
pub struct Player<S> {
    stream: S,
    state: PlaybackState,
    scheduler: RefreshScheduler,
    selection: PresetSelection,
    compositor: Compositor,
    metadata_seen: bool,
    status: Option<String>,
    frames_presented: u64,
    applied_revision: u64,
}

impl<S: MediaStream> Player<S> {
    /// Attach `stream`. Plays immediately when `opts.autoplay` is set.
    pub fn new(stream: S, opts: &PlayerOpts) -> Self {
        let mut player = Self {
            stream,
            state: PlaybackState::Idle,
            scheduler: RefreshScheduler::new(),
            selection: PresetSelection::new(opts.preset, opts.parallel),
            compositor: Compositor::new(FrameSourceAdapter::new(opts.resample)),
            metadata_seen: false,
            status: None,
            frames_presented: 0,
            applied_revision: 0,
        };
        player.transition(Trigger::Load);
        if opts.autoplay {
            player.play();
        }
        player
    }

    /// Swap in a newly opened stream and return the previous one, paused.
    ///
    /// Drops the pending cycle; the display is resized again once the new stream reports its
    /// metadata. Call [`Player::play`] to start it.
    pub fn replace_stream(&mut self, stream: S) -> S {
        let mut old = std::mem::replace(&mut self.stream, stream);
        old.pause();
        self.scheduler.cancel();
        self.transition(Trigger::Unload);
        self.transition(Trigger::Load);
        self.metadata_seen = false;
        self.status = None;
        old
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Latest user-facing status message, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// The attached stream.
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Mutable access for the host driving the stream (clock, seeking).
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Current filter selection.
    pub fn selection(&self) -> &PresetSelection {
        &self.selection
    }

    /// Select a preset by identifier; the next cycle uses it.
    pub fn select_preset(&mut self, id: &str) {
        self.selection.select(id);
    }

    /// Number of frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Selection revision the last presented frame was composed with.
    pub fn applied_revision(&self) -> u64 {
        self.applied_revision
    }

    /// Outstanding refresh requests (0 or 1).
    pub fn outstanding_requests(&self) -> usize {
        self.scheduler.outstanding()
    }

    /// `true` while a cycle is waiting for the next refresh.
    pub fn wants_refresh(&self) -> bool {
        self.scheduler.outstanding() > 0
    }

    /// Size the display once the stream reports metadata. Returns `true` on the call that did it.
    pub fn poll_metadata<D: DisplaySurface + ?Sized>(
        &mut self,
        surface: &mut D,
    ) -> AnaglyphResult<bool> {
        if self.metadata_seen {
            return Ok(false);
        }
        let native = self.stream.native_size();
        if native.is_empty() {
            self.set_status("waiting for video metadata");
            return Ok(false);
        }

        let working = FrameSourceAdapter::working_size(native);
        surface.resize(working)?;
        self.metadata_seen = true;
        tracing::info!(native = %native, working = %working, "video metadata loaded");
        self.status = None;
        self.transition(Trigger::MetadataLoaded);
        Ok(true)
    }

    /// Start or resume playback and arm the refresh cycle.
    ///
    /// Returns `true` when the host must request a redraw. A rejected play leaves the player
    /// paused with a status message.
    pub fn play(&mut self) -> bool {
        match self.stream.play() {
            Ok(()) => {
                self.transition(Trigger::Play);
                self.status = None;
                self.scheduler.request()
            }
            Err(e) => {
                tracing::warn!(error = %e, "playback rejected");
                self.set_status(format!("{e}; press play to start"));
                self.transition(Trigger::PlayRejected);
                false
            }
        }
    }

    /// Pause playback. The in-flight cycle stops on its next run.
    pub fn pause(&mut self) {
        self.stream.pause();
        self.transition(Trigger::Pause);
    }

    /// Toggle between playing and paused. Returns `true` when the host must request a redraw.
    pub fn toggle(&mut self) -> bool {
        if self.state.is_playing() && !self.stream.is_paused() {
            self.pause();
            false
        } else {
            self.play()
        }
    }

    /// Seek the stream relative to its current position.
    pub fn seek_by(&mut self, delta_secs: f64) -> AnaglyphResult<()> {
        let target = (self.stream.current_time() + delta_secs).max(0.0);
        self.stream.seek(target)?;
        self.transition(Trigger::Seek);
        Ok(())
    }

    /// Run the outstanding cycle, if any, and re-arm it unless the stream stopped.
    ///
    /// Returns `None` when no cycle was outstanding.
    pub fn on_refresh<D: DisplaySurface + ?Sized>(
        &mut self,
        surface: &mut D,
    ) -> Option<CycleOutcome> {
        if let Err(e) = self.poll_metadata(surface) {
            tracing::warn!(error = %e, "failed to size display surface");
            self.set_status(e.to_string());
        }
        if !self.scheduler.take() {
            return None;
        }

        let config = self.selection.snapshot();
        let outcome = match self.compositor.run_cycle(&mut self.stream, surface, &config) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "cycle failed; retrying next refresh");
                self.set_status(e.to_string());
                self.scheduler.request();
                return Some(CycleOutcome::Skipped(SkipReason::NotReady));
            }
        };

        match &outcome {
            CycleOutcome::Presented(preset) => {
                self.frames_presented += 1;
                self.status = None;
                if config.revision() != self.applied_revision {
                    tracing::debug!(
                        preset = %preset,
                        revision = config.revision(),
                        "preset applied"
                    );
                    self.applied_revision = config.revision();
                }
                tracing::trace!(
                    frame = self.frames_presented,
                    preset = %preset,
                    t = self.stream.current_time(),
                    "presented"
                );
            }
            CycleOutcome::Skipped(SkipReason::NotReady) => {
                self.set_status("waiting for video");
            }
            CycleOutcome::Skipped(SkipReason::UnknownPreset(id)) => {
                tracing::warn!(id = %id, "skipping frame: unknown filter preset");
            }
            CycleOutcome::Stopped(StopReason::Ended) => {
                self.transition(Trigger::Ended);
            }
            CycleOutcome::Stopped(StopReason::Paused) => {
                self.transition(Trigger::Pause);
            }
        }
        if outcome.reschedules() {
            self.scheduler.request();
        }
        Some(outcome)
    }

    fn transition(&mut self, trigger: Trigger) {
        match self.state.on(trigger) {
            Ok(next) => {
                if next != self.state {
                    tracing::debug!(from = ?self.state, to = ?next, ?trigger, "playback transition");
                }
                self.state = next;
            }
            Err(e) => tracing::debug!(error = %e, "ignored playback trigger"),
        }
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        if self.status.as_deref() != Some(msg.as_str()) {
            tracing::info!(status = %msg, "status");
            self.status = Some(msg);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;
