// animated.rs: media element backed by animated images (GIF)
//
// Decoding happens on a worker thread; the element only polls the channel from
// `advance`, so the render loop never waits on it.

use super::{extension_of, MediaElement, MediaEvent, ReadyState, ANIMATED_EXTENSIONS};
use crate::error::{MediaError, PlayError};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

/// Frames that declare no delay play at 10 fps.
const FALLBACK_FRAME_DELAY_SECS: f64 = 0.1;

struct Timeline {
    frames: Vec<RgbaImage>,
    /// End time of each frame, seconds, increasing.
    ends: Vec<f64>,
}

impl Timeline {
    fn new(timed: Vec<(RgbaImage, f64)>) -> Result<Self, MediaError> {
        if timed.is_empty() {
            return Err(MediaError::Empty);
        }
        let mut t = 0.0;
        let mut ends = Vec::with_capacity(timed.len());
        let mut frames = Vec::with_capacity(timed.len());
        for (img, delay) in timed {
            t += if delay > 0.0 {
                delay
            } else {
                FALLBACK_FRAME_DELAY_SECS
            };
            ends.push(t);
            frames.push(img);
        }
        Ok(Self { frames, ends })
    }

    fn duration(&self) -> f64 {
        self.ends.last().copied().unwrap_or(0.0)
    }

    fn frame_at(&self, t: f64) -> &RgbaImage {
        let idx = self.ends.partition_point(|&end| end <= t).min(self.frames.len() - 1);
        &self.frames[idx]
    }
}

fn decode_err(e: image::ImageError) -> MediaError {
    MediaError::Decode(e.to_string())
}

fn decode_gif(path: &Path) -> Result<Vec<(RgbaImage, f64)>, MediaError> {
    let file = File::open(path).map_err(|e| MediaError::Io(e.to_string()))?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(decode_err)?;
    let frames = decoder.into_frames().collect_frames().map_err(decode_err)?;

    let timed = frames
        .into_iter()
        .map(|frame| {
            let (num, den) = frame.delay().numer_denom_ms();
            let secs = num as f64 / den.max(1) as f64 / 1000.0;
            (frame.into_buffer(), secs)
        })
        .collect();
    Ok(timed)
}

fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

pub struct AnimatedImageElement {
    name: String,
    pending: Option<Receiver<Result<Vec<(RgbaImage, f64)>, MediaError>>>,
    timeline: Option<Timeline>,
    error: Option<MediaError>,
    paused: bool,
    current_time: f64,
    volume: f32,
    ready_state: ReadyState,
    events: Vec<MediaEvent>,
}

impl AnimatedImageElement {
    fn empty(path: &Path) -> Self {
        Self {
            name: display_name(path),
            pending: None,
            timeline: None,
            error: None,
            paused: true,
            current_time: 0.0,
            volume: 1.0,
            ready_state: ReadyState::HaveNothing,
            events: Vec::new(),
        }
    }

    /// Start loading `path` in the background.
    pub fn open(path: &Path) -> Self {
        let mut element = Self::empty(path);

        let extension = extension_of(path).unwrap_or_default();
        if !ANIMATED_EXTENSIONS.contains(&extension.as_str()) {
            element.fail(MediaError::Unsupported { extension });
            return element;
        }

        let (tx, rx) = channel();
        let path: PathBuf = path.to_path_buf();
        thread::spawn(move || {
            log::info!("decoding {} in background", path.display());
            if tx.send(decode_gif(&path)).is_err() {
                log::warn!("element dropped while decoding {}", path.display());
            }
        });
        element.pending = Some(rx);
        element
    }

    /// Build an element from frames already in memory (`(image, delay seconds)`).
    pub fn from_frames(name: impl Into<String>, frames: Vec<(RgbaImage, f64)>) -> Self {
        let mut element = Self::empty(Path::new(""));
        element.name = name.into();
        element.finish_load(Ok(frames));
        element
    }

    pub fn error(&self) -> Option<&MediaError> {
        self.error.as_ref()
    }

    fn fail(&mut self, err: MediaError) {
        self.error = Some(err.clone());
        self.events.push(MediaEvent::Error(err));
        if !self.paused {
            self.paused = true;
            self.events.push(MediaEvent::Pause);
        }
    }

    fn finish_load(&mut self, result: Result<Vec<(RgbaImage, f64)>, MediaError>) {
        match result.and_then(Timeline::new) {
            Ok(timeline) => {
                self.timeline = Some(timeline);
                self.ready_state = ReadyState::HaveEnoughData;
                self.events.extend([
                    MediaEvent::LoadedMetadata,
                    MediaEvent::LoadedData,
                    MediaEvent::CanPlay,
                    MediaEvent::CanPlayThrough,
                ]);
            }
            Err(e) => self.fail(e),
        }
    }

    fn poll_decoder(&mut self) {
        let Some(rx) = self.pending.as_ref() else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.finish_load(result);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.fail(MediaError::Decode("decoder thread exited".into()));
            }
        }
    }
}

impl MediaElement for AnimatedImageElement {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn play(&mut self) -> Result<(), PlayError> {
        if self.error.is_some() {
            return Err(PlayError::NotSupported);
        }
        if let Some(tl) = self.timeline.as_ref() {
            if self.current_time >= tl.duration() {
                self.current_time = 0.0;
            }
        }
        if self.paused {
            self.paused = false;
            self.events.push(MediaEvent::Play);
            if self.ready_state < ReadyState::HaveFutureData {
                self.events.push(MediaEvent::Waiting);
            }
        }
        Ok(())
    }

    fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.events.push(MediaEvent::Pause);
        }
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        let Some(tl) = self.timeline.as_ref() else {
            return;
        };
        if !seconds.is_finite() {
            return;
        }
        self.current_time = seconds.clamp(0.0, tl.duration());
        self.events.push(MediaEvent::TimeUpdate);
    }

    fn duration(&self) -> f64 {
        self.timeline.as_ref().map_or(f64::NAN, Timeline::duration)
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn video_size(&self) -> Option<(u32, u32)> {
        self.timeline.as_ref().map(|tl| tl.frames[0].dimensions())
    }

    fn current_frame(&self) -> Option<&RgbaImage> {
        self.timeline.as_ref().map(|tl| tl.frame_at(self.current_time))
    }

    fn advance(&mut self, dt: Duration) {
        self.poll_decoder();

        if self.paused {
            return;
        }
        let Some(duration) = self.timeline.as_ref().map(Timeline::duration) else {
            return;
        };

        self.current_time += dt.as_secs_f64();
        self.events.push(MediaEvent::TimeUpdate);
        if self.current_time >= duration {
            self.current_time = duration;
            self.paused = true;
            self.events.push(MediaEvent::Pause);
            self.events.push(MediaEvent::Ended);
        }
    }

    fn drain_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.events)
    }
}
