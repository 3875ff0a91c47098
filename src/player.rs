// player.rs: boundary layer. Input, UI and media notifications come in;
// camera pose / geometry changes / texture refresh decisions go out.

use crate::camera::{compute_pose, CameraPose};
use crate::error::{PlayError, PlayerError};
use crate::gesture::GestureTranslator;
use crate::media::{open_media, MediaElement, MediaEvent, PlaybackFacade, ReadyState};
use crate::orientation::{DisplayMode, Orientation};
use crate::projection::{select_geometry, ProjectionGeometry};
use std::path::Path;
use std::time::Duration;

/// What the render loop needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    pub pose: CameraPose,
    /// Upload the media's current frame to the video texture.
    pub refresh_texture: bool,
}

/// Snapshot for the control bar / status line.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatus {
    pub mode: DisplayMode,
    pub orientation: Orientation,
    pub is_playing: bool,
    pub has_source: bool,
    pub source_name: Option<String>,
    pub progress: f32,
    pub time_text: String,
    pub volume: f32,
    pub is_fullscreen: bool,
    /// A source is attached but has no frame to show yet.
    pub is_loading: bool,
    pub last_error: Option<String>,
}

pub struct Player {
    mode: DisplayMode,
    orientation: Orientation,
    gestures: GestureTranslator,
    geometry: ProjectionGeometry,
    geometry_dirty: bool,
    playback: PlaybackFacade,
    is_playing: bool,
    is_fullscreen: bool,
    /// One-off upload while paused: first decoded frame, or after a seek.
    poster_pending: bool,
    time_text: String,
    last_error: Option<String>,
}

impl Player {
    pub fn new(mode: DisplayMode, volume: f32) -> Self {
        let playback = PlaybackFacade::new(volume);
        let time_text = playback.time_display();
        Self {
            mode,
            orientation: Orientation::default(),
            gestures: GestureTranslator::new(),
            geometry: select_geometry(mode, None),
            geometry_dirty: true,
            playback,
            is_playing: false,
            is_fullscreen: false,
            poster_pending: false,
            time_text,
            last_error: None,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn geometry(&self) -> &ProjectionGeometry {
        &self.geometry
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_dragging(&self) -> bool {
        self.gestures.is_dragging()
    }

    pub fn media(&self) -> Option<&dyn MediaElement> {
        self.playback.element()
    }

    fn source_aspect(&self) -> Option<f32> {
        self.playback.element().and_then(|e| e.aspect_ratio())
    }

    fn reselect_geometry(&mut self) {
        self.geometry = select_geometry(self.mode, self.source_aspect());
        self.geometry_dirty = true;
    }

    /// The renderer calls this once per frame and rebuilds its mesh when it
    /// gets something back.
    pub fn take_geometry_change(&mut self) -> Option<ProjectionGeometry> {
        let dirty = std::mem::take(&mut self.geometry_dirty);
        dirty.then_some(self.geometry)
    }

    /// Always resets the view, even when `mode` is already active.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        log::info!("display mode -> {}", mode);
        self.mode = mode;
        self.orientation.reset();
        self.gestures.drag_end();
        self.reselect_geometry();
    }

    pub fn reset_view(&mut self) {
        self.orientation.reset();
    }

    // ---- media source ----

    /// Open a dropped or picked file. Non-video files are refused with a warning
    /// and leave the current source alone.
    pub fn load_path(&mut self, path: &Path) -> Result<(), PlayerError> {
        let element = match open_media(path) {
            Ok(e) => e,
            Err(err) => {
                log::warn!("{}", err);
                return Err(err);
            }
        };
        log::info!("loading {}", path.display());
        self.attach_media(element);
        Ok(())
    }

    pub fn attach_media(&mut self, element: Box<dyn MediaElement>) {
        // the old element is paused by the facade; its late events are dropped with it
        drop(self.playback.attach(element));
        self.is_playing = false;
        self.poster_pending = false;
        self.last_error = None;
        self.time_text = self.playback.time_display();
        self.reselect_geometry();
    }

    // ---- playback controls ----

    pub fn toggle_play_pause(&mut self) {
        if !self.playback.has_source() {
            return;
        }
        if let Err(err) = self.playback.toggle_play_pause() {
            self.report_play_failure(err);
        }
    }

    fn report_play_failure(&mut self, err: PlayError) {
        log::error!("play failed: {}", err);
        self.last_error = Some(err.to_string());
        self.is_playing = false;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.playback.set_volume(volume);
    }

    pub fn volume(&self) -> f32 {
        self.playback.volume()
    }

    pub fn seek_to_fraction(&mut self, fraction: f32) -> Option<f64> {
        let t = self.playback.seek_to_fraction(fraction)?;
        self.time_text = self.playback.time_display();
        self.poster_pending = true;
        Some(t)
    }

    /// Mirrors the window state; the window manager can leave fullscreen on its own.
    pub fn set_fullscreen(&mut self, on: bool) {
        self.is_fullscreen = on;
    }

    // ---- pointer / touch ----

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.gestures.drag_start(x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.gestures.drag_move(x, y, &mut self.orientation, self.mode)
    }

    pub fn pointer_up(&mut self) {
        self.gestures.drag_end();
    }

    pub fn touch_start(&mut self, id: u64, x: f32, y: f32) {
        self.gestures.touch_start(id, x, y);
    }

    pub fn touch_move(&mut self, id: u64, x: f32, y: f32) -> bool {
        self.gestures.touch_move(id, x, y, &mut self.orientation, self.mode)
    }

    pub fn touch_end(&mut self, id: u64) {
        self.gestures.touch_end(id);
    }

    // ---- per frame ----

    fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::LoadedMetadata => {
                let duration = self.playback.element().map_or(0.0, |e| e.duration());
                if let Some((w, h)) = self.playback.element().and_then(|e| e.video_size()) {
                    log::info!("metadata: {w}x{h}, {duration:.2}s");
                }
                self.time_text = self.playback.time_display();
                if self.mode == DisplayMode::Mono {
                    self.reselect_geometry();
                }
            }
            MediaEvent::TimeUpdate => self.time_text = self.playback.time_display(),
            MediaEvent::Play => self.is_playing = true,
            MediaEvent::Pause | MediaEvent::Ended => self.is_playing = false,
            MediaEvent::Waiting => log::debug!("media waiting for data"),
            MediaEvent::Stalled => log::warn!("media stalled"),
            MediaEvent::Error(err) => {
                log::error!("media error: {}", err);
                self.last_error = Some(err.to_string());
            }
            MediaEvent::LoadedData => self.poster_pending = true,
            MediaEvent::CanPlay | MediaEvent::CanPlayThrough => {}
        }
    }

    pub fn update(&mut self, dt: Duration) -> FrameUpdate {
        for event in self.playback.advance(dt) {
            self.handle_media_event(event);
        }

        let refresh_texture =
            self.has_frame() && (self.is_playing || std::mem::take(&mut self.poster_pending));

        FrameUpdate {
            pose: compute_pose(&self.orientation, self.mode),
            refresh_texture,
        }
    }

    fn has_frame(&self) -> bool {
        self.playback.has_source() && self.playback.ready_state() >= ReadyState::HaveCurrentData
    }

    pub fn status(&self) -> PlayerStatus {
        let is_loading = self.media().is_some() && !self.has_frame() && self.last_error.is_none();
        PlayerStatus {
            mode: self.mode,
            orientation: self.orientation,
            is_playing: self.is_playing,
            has_source: self.playback.has_source(),
            source_name: self.media().map(|e| e.source_name().to_string()),
            progress: self.playback.progress(),
            time_text: self.time_text.clone(),
            volume: self.playback.volume(),
            is_fullscreen: self.is_fullscreen,
            is_loading,
            last_error: self.last_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::AnimatedImageElement;
    use crate::projection::Shape;
    use image::{Rgba, RgbaImage};

    fn clip(w: u32, h: u32) -> Box<AnimatedImageElement> {
        let frame = RgbaImage::from_pixel(w, h, Rgba([1, 2, 3, 255]));
        let frames = vec![(frame.clone(), 1.0), (frame, 1.0)];
        Box::new(AnimatedImageElement::from_frames("clip", frames))
    }

    #[test]
    fn mode_switch_resets_view_and_geometry() {
        let mut p = Player::new(DisplayMode::Half360, 1.0);
        assert!(p.take_geometry_change().is_some());
        assert!(p.take_geometry_change().is_none());

        p.pointer_down(0.0, 0.0);
        p.pointer_move(300.0, -200.0);
        assert_ne!(p.orientation(), Orientation::default());

        p.set_mode(DisplayMode::Half360);
        assert_eq!(p.orientation(), Orientation::default());
        assert_eq!(
            p.take_geometry_change().map(|g| g.mode),
            Some(DisplayMode::Half360)
        );
        assert!(!p.is_dragging());
    }

    #[test]
    fn mono_geometry_follows_metadata() {
        let mut p = Player::new(DisplayMode::Mono, 1.0);
        p.take_geometry_change();
        p.attach_media(clip(4, 1));
        let expected = Shape::Plane {
            width: 10.0,
            height: 2.5,
        };
        // attaching already knows the size for in-memory frames
        let g = p.take_geometry_change().unwrap();
        assert_eq!(g.shape, expected);

        p.update(Duration::ZERO);
        let g = p.take_geometry_change().unwrap();
        assert_eq!(g.shape, expected);
    }

    #[test]
    fn texture_refreshes_only_while_playing() {
        let mut p = Player::new(DisplayMode::Full360, 1.0);
        assert!(!p.update(Duration::ZERO).refresh_texture);

        p.attach_media(clip(2, 1));
        // first decoded frame is shown once, then nothing until playback starts
        assert!(p.update(Duration::ZERO).refresh_texture);
        assert!(!p.update(Duration::ZERO).refresh_texture);

        p.toggle_play_pause();
        assert!(p.update(Duration::from_millis(16)).refresh_texture);
        assert!(p.is_playing());

        p.toggle_play_pause();
        assert!(!p.update(Duration::from_millis(16)).refresh_texture);
        assert!(!p.is_playing());

        // a seek while paused refreshes exactly once
        assert_eq!(p.seek_to_fraction(0.5), Some(1.0));
        assert!(p.update(Duration::ZERO).refresh_texture);
        assert!(!p.update(Duration::ZERO).refresh_texture);
    }

    #[test]
    fn playback_stops_at_end() {
        let mut p = Player::new(DisplayMode::Full360, 1.0);
        p.attach_media(clip(2, 1));
        p.toggle_play_pause();
        p.update(Duration::ZERO);
        assert!(p.is_playing());
        p.update(Duration::from_secs(3));
        assert!(!p.is_playing());
        assert_eq!(p.status().time_text, "0:02 / 0:02");
    }

    #[test]
    fn unsupported_source_reverts_to_paused() {
        let mut p = Player::new(DisplayMode::Half360, 1.0);
        p.load_path(Path::new("holiday.webm")).unwrap();
        p.update(Duration::ZERO);
        assert!(p.status().last_error.is_some());

        p.toggle_play_pause();
        p.update(Duration::ZERO);
        assert!(!p.is_playing());
        assert!(!p.update(Duration::ZERO).refresh_texture);
    }

    #[test]
    fn non_video_drop_changes_nothing() {
        let mut p = Player::new(DisplayMode::Half360, 1.0);
        p.attach_media(clip(2, 1));
        p.take_geometry_change();

        let err = p.load_path(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, PlayerError::NotVideo { .. }));
        assert_eq!(p.status().source_name.as_deref(), Some("clip"));
        assert!(p.take_geometry_change().is_none());
    }

    #[test]
    fn controls_without_media_are_noops() {
        let mut p = Player::new(DisplayMode::Half360, 0.5);
        p.toggle_play_pause();
        assert_eq!(p.seek_to_fraction(0.5), None);
        let status = p.status();
        assert!(!status.is_playing);
        assert!(status.last_error.is_none());
        assert_eq!(status.time_text, "0:00 / 0:00");
        assert_eq!(status.volume, 0.5);
        assert!(!status.is_loading);
    }

    #[test]
    fn fullscreen_flag_follows_the_window() {
        let mut p = Player::new(DisplayMode::Half360, 1.0);
        p.set_fullscreen(true);
        assert!(p.status().is_fullscreen);
        // left fullscreen without going through the app's toggle
        p.set_fullscreen(false);
        assert!(!p.status().is_fullscreen);
    }

    #[test]
    fn loading_until_first_frame_or_error() {
        let mut p = Player::new(DisplayMode::Half360, 1.0);
        p.load_path(Path::new("holiday.webm")).unwrap();
        assert!(p.status().is_loading);
        p.update(Duration::ZERO);
        assert!(!p.status().is_loading);

        p.attach_media(clip(2, 1));
        assert!(!p.status().is_loading);
    }
}
