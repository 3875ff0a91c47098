// media.rs: media element contract and the thin playback facade over it

pub mod animated;

use crate::error::{PlayError, PlayerError};
use image::RgbaImage;
use std::path::Path;
use std::time::Duration;

pub use animated::AnimatedImageElement;

/// Extensions accepted as video sources. Only the animated ones have a decoder;
/// the rest load into the "unsupported" error state.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "webm", "mkv", "mov", "ogv", "avi"];
pub const ANIMATED_EXTENSIONS: &[&str] = &["gif"];

/// How much of the media is available, in the browser's ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

/// Lifecycle notifications, drained once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    LoadedMetadata,
    LoadedData,
    CanPlay,
    CanPlayThrough,
    TimeUpdate,
    Play,
    Pause,
    Ended,
    Waiting,
    Stalled,
    Error(crate::error::MediaError),
}

pub trait MediaElement {
    fn source_name(&self) -> &str;

    fn play(&mut self) -> Result<(), PlayError>;
    fn pause(&mut self);
    fn paused(&self) -> bool;

    /// Seconds.
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    /// Seconds; NaN until metadata is known.
    fn duration(&self) -> f64;

    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);

    fn ready_state(&self) -> ReadyState;
    fn video_size(&self) -> Option<(u32, u32)>;
    fn current_frame(&self) -> Option<&RgbaImage>;

    /// Drive the element's clock and pick up decoder results.
    fn advance(&mut self, dt: Duration);
    fn drain_events(&mut self) -> Vec<MediaEvent>;

    fn aspect_ratio(&self) -> Option<f32> {
        let (w, h) = self.video_size()?;
        (w > 0 && h > 0).then(|| w as f32 / h as f32)
    }
}

fn extension_of(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    Some(ext.to_ascii_lowercase())
}

pub fn is_video_path(path: &Path) -> bool {
    let Some(ext) = extension_of(path) else {
        return false;
    };
    let ext = ext.as_str();
    VIDEO_EXTENSIONS.contains(&ext) || ANIMATED_EXTENSIONS.contains(&ext)
}

/// Open a media element for `path`. Non-video files are rejected up front;
/// decoding problems arrive later as `MediaEvent::Error`.
pub fn open_media(path: &Path) -> Result<Box<dyn MediaElement>, PlayerError> {
    if !is_video_path(path) {
        return Err(PlayerError::NotVideo {
            path: path.to_path_buf(),
        });
    }
    Ok(Box::new(AnimatedImageElement::open(path)))
}

/// `m:ss`, with unknown/negative values shown as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let seconds = known_duration(seconds).unwrap_or(0.0);
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", mins, secs)
}

/// Fraction of the bar left of the click, clamped to `[0, 1]`.
pub fn seek_fraction_from_click(click_x: f32, bar_left: f32, bar_width: f32) -> f32 {
    if bar_width <= 0.0 {
        return 0.0;
    }
    ((click_x - bar_left) / bar_width).clamp(0.0, 1.0)
}

fn known_duration(d: f64) -> Option<f64> {
    (d.is_finite() && d > 0.0).then_some(d)
}

/// Pass-through to the current media element. Requests without a source are
/// no-ops.
pub struct PlaybackFacade {
    element: Option<Box<dyn MediaElement>>,
    volume: f32,
}

impl Default for PlaybackFacade {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl PlaybackFacade {
    pub fn new(volume: f32) -> Self {
        Self {
            element: None,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn has_source(&self) -> bool {
        self.element.is_some()
    }

    pub fn element(&self) -> Option<&dyn MediaElement> {
        self.element.as_deref()
    }

    /// Swap in a new element; the previous one is paused and handed back.
    pub fn attach(&mut self, mut element: Box<dyn MediaElement>) -> Option<Box<dyn MediaElement>> {
        element.set_volume(self.volume);
        let mut previous = self.element.replace(element);
        if let Some(prev) = previous.as_mut() {
            prev.pause();
        }
        previous
    }

    pub fn is_paused(&self) -> bool {
        self.element.as_ref().map_or(true, |e| e.paused())
    }

    pub fn play(&mut self) -> Result<(), PlayError> {
        match self.element.as_mut() {
            Some(e) => e.play(),
            None => Err(PlayError::NoSource),
        }
    }

    pub fn pause(&mut self) {
        if let Some(e) = self.element.as_mut() {
            e.pause();
        }
    }

    /// Without a source this is a no-op, not an error.
    pub fn toggle_play_pause(&mut self) -> Result<(), PlayError> {
        if !self.has_source() {
            return Ok(());
        }
        if self.is_paused() {
            self.play()
        } else {
            self.pause();
            Ok(())
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(e) = self.element.as_mut() {
            e.set_volume(self.volume);
        }
    }

    /// Returns the requested time, or `None` when there is nothing to seek.
    pub fn seek_to_fraction(&mut self, fraction: f32) -> Option<f64> {
        let e = self.element.as_mut()?;
        let duration = known_duration(e.duration())?;
        let time = fraction.clamp(0.0, 1.0) as f64 * duration;
        e.set_current_time(time);
        Some(time)
    }

    pub fn progress(&self) -> f32 {
        let Some(e) = self.element.as_ref() else {
            return 0.0;
        };
        match known_duration(e.duration()) {
            Some(d) => (e.current_time() / d).clamp(0.0, 1.0) as f32,
            None => 0.0,
        }
    }

    pub fn time_display(&self) -> String {
        let current = self.element.as_ref().map_or(0.0, |e| e.current_time());
        let duration = self.element.as_ref().map_or(0.0, |e| e.duration());
        format!("{} / {}", format_time(current), format_time(duration))
    }

    pub fn ready_state(&self) -> ReadyState {
        self.element.as_ref().map_or(ReadyState::HaveNothing, |e| e.ready_state())
    }

    pub fn advance(&mut self, dt: Duration) -> Vec<MediaEvent> {
        match self.element.as_mut() {
            Some(e) => {
                e.advance(dt);
                e.drain_events()
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn time_format() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(59.9), "0:59");
        assert_eq!(format_time(61.0), "1:01");
        assert_eq!(format_time(3600.0 + 5.0), "60:05");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
    }

    #[test]
    fn click_fraction() {
        assert_eq!(seek_fraction_from_click(150.0, 100.0, 100.0), 0.5);
        assert_eq!(seek_fraction_from_click(50.0, 100.0, 100.0), 0.0);
        assert_eq!(seek_fraction_from_click(500.0, 100.0, 100.0), 1.0);
        assert_eq!(seek_fraction_from_click(10.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn video_classification() {
        assert!(is_video_path(&PathBuf::from("clip.MP4")));
        assert!(is_video_path(&PathBuf::from("/tmp/loop.gif")));
        assert!(!is_video_path(&PathBuf::from("notes.txt")));
        assert!(!is_video_path(&PathBuf::from("photo.jpg")));
        assert!(!is_video_path(&PathBuf::from("no_extension")));
    }

    #[test]
    fn non_video_is_rejected_by_open() {
        let err = open_media(&PathBuf::from("readme.md")).err().unwrap();
        assert!(matches!(err, PlayerError::NotVideo { .. }));
    }

    #[test]
    fn facade_without_source_is_inert() {
        let mut f = PlaybackFacade::default();
        assert!(f.toggle_play_pause().is_ok());
        assert_eq!(f.play(), Err(PlayError::NoSource));
        assert_eq!(f.seek_to_fraction(0.5), None);
        assert_eq!(f.progress(), 0.0);
        assert_eq!(f.time_display(), "0:00 / 0:00");
        assert!(f.is_paused());
        assert!(f.advance(Duration::from_millis(16)).is_empty());
    }

    #[test]
    fn volume_is_clamped() {
        let mut f = PlaybackFacade::default();
        f.set_volume(1.5);
        assert_eq!(f.volume(), 1.0);
        f.set_volume(0.25);
        assert_eq!(f.volume(), 0.25);
        f.set_volume(f32::NAN);
        assert_eq!(f.volume(), 0.25);
    }
}
