use std::{
    io::Read as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdout, Command, Stdio},
    time::Instant,
};

use image::RgbaImage;

use crate::{
    foundation::{
        core::{FrameSize, Fps},
        error::{AnaglyphError, AnaglyphResult},
    },
    source::MediaStream,
};

/// Forward jumps larger than this restart the decoder at the target instead of decoding through.
const MAX_DECODE_AHEAD_SECS: f64 = 2.0;

/// Stream metadata reported by `ffprobe`.
#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    /// Source file.
    pub source_path: PathBuf,
    /// Native decoded frame size.
    pub size: FrameSize,
    /// Native frame rate.
    pub fps: Fps,
    /// Container duration in seconds (0 when unknown).
    pub duration_sec: f64,
}

/// `true` when both `ffmpeg` and `ffprobe` run.
pub fn is_ffmpeg_on_path() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|tool| {
        Command::new(tool)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

/// Probe size, frame rate and duration of the first video stream of `source_path`.
#[tracing::instrument]
pub fn probe_video(source_path: &Path) -> AnaglyphResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct Probe {
        #[serde(default)]
        streams: Vec<ProbeVideo>,
        format: Option<ProbeFormat>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeVideo {
        width: u32,
        height: u32,
        r_frame_rate: String,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }

    let out = Command::new("ffprobe")
        .args(["-v", "error", "-select_streams", "v:0"])
        .args(["-show_entries", "stream=width,height,r_frame_rate:format=duration"])
        .args(["-of", "json"])
        .arg(source_path)
        .output()
        .map_err(|e| AnaglyphError::decode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(AnaglyphError::decode(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let probe: Probe = serde_json::from_slice(&out.stdout)
        .map_err(|e| AnaglyphError::serde(format!("unexpected ffprobe output: {e}")))?;
    let video = probe.streams.into_iter().next().ok_or_else(|| {
        AnaglyphError::decode(format!("'{}' has no video stream", source_path.display()))
    })?;
    let (num, den) = parse_ff_ratio(&video.r_frame_rate).ok_or_else(|| {
        AnaglyphError::decode(format!("unusable frame rate '{}'", video.r_frame_rate))
    })?;
    let duration_sec = probe
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(0.0);

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        size: FrameSize::new(video.width, video.height),
        fps: Fps::new(num, den)?,
        duration_sec,
    })
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if a == 0 || b == 0 {
        return None;
    }
    Some((a, b))
}

/// Whether the decoder has to be respawned at the clock position to show frame `target`.
///
/// `held` is the frame currently held, `next` the index the running decoder produces next
/// (`None` when no decoder runs). Reading forward is cheaper than a respawn up to
/// [`MAX_DECODE_AHEAD_SECS`].
fn needs_restart(target: u64, held: Option<u64>, next: Option<u64>, fps: Fps) -> bool {
    match next {
        None => held != Some(target),
        Some(next) => {
            held.is_some_and(|held| target < held)
                || fps.frames_to_secs(target.saturating_sub(next)) > MAX_DECODE_AHEAD_SECS
        }
    }
}

/// Wall-clock playback position that can be paused and moved.
#[derive(Clone, Copy, Debug)]
struct PlaybackClock {
    base_secs: f64,
    running_since: Option<Instant>,
}

impl PlaybackClock {
    fn new() -> Self {
        Self {
            base_secs: 0.0,
            running_since: None,
        }
    }

    fn position(&self) -> f64 {
        self.base_secs
            + self
                .running_since
                .map_or(0.0, |t| t.elapsed().as_secs_f64())
    }

    fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.base_secs = self.position();
        self.running_since = None;
    }

    fn set(&mut self, secs: f64) {
        self.base_secs = secs;
        if self.running_since.is_some() {
            self.running_since = Some(Instant::now());
        }
    }

    fn is_running(&self) -> bool {
        self.running_since.is_some()
    }
}

/// Raw RGBA frames piped out of one `ffmpeg` process.
struct FrameReader {
    child: Child,
    stdout: ChildStdout,
    next_index: u64,
}

impl FrameReader {
    fn spawn(info: &VideoSourceInfo, start_secs: f64) -> AnaglyphResult<Self> {
        // The system binary keeps native FFmpeg dev headers out of the build.
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-nostdin", "-ss", &format!("{start_secs:.6}")])
            .arg("-i")
            .arg(&info.source_path)
            .args(["-an", "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                AnaglyphError::decode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AnaglyphError::decode("failed to open ffmpeg stdout (unexpected)"))?;

        tracing::debug!(
            path = %info.source_path.display(),
            start_secs,
            "spawned ffmpeg decoder"
        );
        Ok(Self {
            child,
            stdout,
            next_index: info.fps.secs_to_frames_floor(start_secs),
        })
    }

    /// Read the next frame into `buf`; `false` at end of stream.
    fn read_into(&mut self, buf: &mut [u8]) -> AnaglyphResult<bool> {
        match self.stdout.read_exact(buf) {
            Ok(()) => {
                self.next_index += 1;
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(AnaglyphError::decode(format!(
                "failed to read frame from ffmpeg: {e}"
            ))),
        }
    }
}

impl Drop for FrameReader {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Media stream decoded live by the system `ffmpeg` binary and paced by a wall clock.
pub struct FfmpegStream {
    info: VideoSourceInfo,
    clock: PlaybackClock,
    reader: Option<FrameReader>,
    frame: RgbaImage,
    scratch: RgbaImage,
    frame_index: Option<u64>,
    ended: bool,
}

impl FfmpegStream {
    /// Probe `path` and prepare a paused stream at position 0.
    pub fn open(path: impl AsRef<Path>) -> AnaglyphResult<Self> {
        let info = probe_video(path.as_ref())?;
        if info.size.is_empty() {
            return Err(AnaglyphError::decode(format!(
                "'{}' reports an empty video size",
                info.source_path.display()
            )));
        }
        tracing::info!(
            path = %info.source_path.display(),
            size = %info.size,
            fps = info.fps.as_f64(),
            duration_sec = info.duration_sec,
            "opened video"
        );
        Ok(Self {
            frame: RgbaImage::new(info.size.width, info.size.height),
            scratch: RgbaImage::new(info.size.width, info.size.height),
            info,
            clock: PlaybackClock::new(),
            reader: None,
            frame_index: None,
            ended: false,
        })
    }

    /// Probed metadata.
    pub fn info(&self) -> &VideoSourceInfo {
        &self.info
    }

    /// Decode the frame shown at `secs` without starting playback.
    pub fn frame_at(&mut self, secs: f64) -> AnaglyphResult<RgbaImage> {
        self.seek(secs)?;
        match self.current_frame() {
            Ok(frame) => Ok(frame.clone()),
            Err(e) if e.is_transient() => Err(AnaglyphError::decode(format!(
                "no video frame decodable at {secs}s"
            ))),
            Err(e) => Err(e),
        }
    }

    /// Index of the frame currently held, if any.
    pub fn frame_index(&self) -> Option<u64> {
        self.frame_index
    }

    fn restart_decoder(&mut self, secs: f64) -> AnaglyphResult<()> {
        self.reader = None;
        self.frame_index = None;
        self.reader = Some(FrameReader::spawn(&self.info, secs)?);
        Ok(())
    }
}

impl MediaStream for FfmpegStream {
    fn native_size(&self) -> FrameSize {
        self.info.size
    }

    fn is_paused(&self) -> bool {
        !self.clock.is_running()
    }

    fn is_ended(&self) -> bool {
        self.ended
    }

    fn play(&mut self) -> AnaglyphResult<()> {
        if self.ended {
            self.seek(0.0)?;
        }
        if self.reader.is_none() {
            let at = self.clock.position();
            self.restart_decoder(at)
                .map_err(|e| AnaglyphError::playback_rejected(e.to_string()))?;
        }
        self.clock.resume();
        Ok(())
    }

    fn pause(&mut self) {
        self.clock.pause();
    }

    fn current_time(&self) -> f64 {
        self.clock.position()
    }

    fn seek(&mut self, secs: f64) -> AnaglyphResult<()> {
        if !secs.is_finite() {
            return Err(AnaglyphError::validation("seek target must be finite"));
        }
        let mut target = secs.max(0.0);
        if self.info.duration_sec > 0.0 {
            target = target.min(self.info.duration_sec);
        }
        self.clock.set(target);
        self.reader = None;
        self.frame_index = None;
        self.ended = false;
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        (self.info.duration_sec > 0.0).then_some(self.info.duration_sec)
    }

    fn current_frame(&mut self) -> AnaglyphResult<&RgbaImage> {
        let position = self.clock.position();
        let target = self.info.fps.secs_to_frames_floor(position);

        let next = self.reader.as_ref().map(|r| r.next_index);
        if !self.ended && needs_restart(target, self.frame_index, next, self.info.fps) {
            self.restart_decoder(position)?;
        }

        let mut hit_eof = false;
        if let Some(reader) = self.reader.as_mut() {
            while reader.next_index <= target {
                if !reader.read_into(&mut self.scratch)? {
                    hit_eof = true;
                    break;
                }
                std::mem::swap(&mut self.frame, &mut self.scratch);
                self.frame_index = Some(reader.next_index - 1);
            }
        }
        if hit_eof {
            tracing::debug!(held = ?self.frame_index, "ffmpeg reached end of stream");
            self.ended = true;
            self.clock.pause();
            self.reader = None;
        }

        match self.frame_index {
            Some(_) => Ok(&self.frame),
            None => Err(AnaglyphError::not_ready(format!(
                "no frame decoded at {position:.3}s"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/ffmpeg.rs"]
mod tests;
