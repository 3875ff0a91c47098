use std::time::Duration;

use image::RgbaImage;
use vr_video_player::media::{MediaElement, MediaEvent, PlaybackFacade, ReadyState};
use vr_video_player::{
    compute_pose, select_geometry, DisplayMode, GestureTranslator, Orientation, PlayError, Player,
    Shape,
};

/// Media element that reports whatever the test scripts, like a browser
/// `<video>` whose state is poked from outside.
struct ScriptedMedia {
    paused: bool,
    current_time: f64,
    duration: f64,
    volume: f32,
    ready_state: ReadyState,
    size: Option<(u32, u32)>,
    play_result: Result<(), PlayError>,
    queued: Vec<MediaEvent>,
}

impl ScriptedMedia {
    fn new(duration: f64) -> Self {
        Self {
            paused: true,
            current_time: 0.0,
            duration,
            volume: 1.0,
            ready_state: ReadyState::HaveNothing,
            size: None,
            play_result: Ok(()),
            queued: Vec::new(),
        }
    }
}

impl MediaElement for ScriptedMedia {
    fn source_name(&self) -> &str {
        "scripted"
    }

    fn play(&mut self) -> Result<(), PlayError> {
        self.play_result.clone()?;
        self.paused = false;
        self.queued.push(MediaEvent::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
        self.queued.push(MediaEvent::Pause);
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn video_size(&self) -> Option<(u32, u32)> {
        self.size
    }

    fn current_frame(&self) -> Option<&RgbaImage> {
        None
    }

    fn advance(&mut self, _dt: Duration) {}

    fn drain_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.queued)
    }
}

#[test]
fn latitude_stays_clamped_for_any_drag_sequence() {
    // deterministic pseudo-random walk, large and small steps of both signs
    let mut seed: u32 = 0x1234_5678;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        (seed % 4001) as f32 - 2000.0
    };

    for mode in DisplayMode::ALL {
        let limit = mode.latitude_limit();
        let mut gestures = GestureTranslator::new();
        let mut orientation = Orientation::default();
        let (mut x, mut y) = (0.0f32, 0.0f32);
        gestures.drag_start(x, y);
        for _ in 0..500 {
            x += next();
            y += next();
            gestures.drag_move(x, y, &mut orientation, mode);
            assert!((-limit..=limit).contains(&orientation.latitude_deg));
        }
    }
}

#[test]
fn full360_big_vertical_delta() {
    // pointer dragged up by 10000 px -> +1000° requested, clamps at +85
    let mut gestures = GestureTranslator::new();
    let mut o = Orientation::default();
    gestures.drag_start(0.0, 0.0);
    gestures.drag_move(1000.0, -10000.0, &mut o, DisplayMode::Full360);
    assert!((o.longitude_deg - 100.0).abs() < 1e-3);
    assert_eq!(o.latitude_deg, 85.0);

    // the same magnitude fed straight into adjust with a negative sign
    let mut o = Orientation::default();
    o.adjust(100.0, -1000.0, DisplayMode::Full360);
    assert_eq!(o.longitude_deg, 100.0);
    assert_eq!(o.latitude_deg, -85.0);
}

#[test]
fn mode_switch_always_resets() {
    let mut player = Player::new(DisplayMode::Full360, 1.0);
    for mode in [DisplayMode::Mono, DisplayMode::Mono, DisplayMode::Half360, DisplayMode::Full360] {
        player.pointer_down(0.0, 0.0);
        player.pointer_move(123.0, 45.0);
        player.pointer_up();
        assert_ne!(player.orientation(), Orientation::default());

        player.set_mode(mode);
        assert_eq!(player.orientation(), Orientation::default());
        assert_eq!(player.mode(), mode);
    }
}

#[test]
fn pose_has_no_hidden_state() {
    let o = Orientation::new(33.0, -48.0);
    let first = compute_pose(&o, DisplayMode::Mono);
    let _ = compute_pose(&Orientation::new(-10.0, 10.0), DisplayMode::Full360);
    assert_eq!(compute_pose(&o, DisplayMode::Mono), first);
}

#[test]
fn half360_reselection_is_stable() {
    let a = select_geometry(DisplayMode::Half360, Some(2.0)).build_mesh();
    let b = select_geometry(DisplayMode::Half360, Some(2.0)).build_mesh();
    assert_eq!(a.uvs, b.uvs);
    assert!(a.uvs.iter().all(|uv| (0.25..=0.75).contains(&uv[1])));
}

#[test]
fn mono_without_media_uses_sixteen_nine() {
    let player = Player::new(DisplayMode::Mono, 1.0);
    match player.geometry().shape {
        Shape::Plane { width, height } => assert!((height - width / 1.7778).abs() < 1e-3),
        other => panic!("unexpected shape {other:?}"),
    }
}

#[test]
fn small_horizontal_drag() {
    let mut player = Player::new(DisplayMode::Half360, 1.0);
    player.pointer_down(0.0, 0.0);
    player.pointer_move(10.0, 0.0);
    assert!((player.orientation().longitude_deg - 1.0).abs() < 1e-6);
    assert_eq!(player.orientation().latitude_deg, 0.0);
}

#[test]
fn seek_bar_midpoint() {
    let mut facade = PlaybackFacade::default();
    facade.attach(Box::new(ScriptedMedia::new(120.0)));
    let fraction = vr_video_player::media::seek_fraction_from_click(250.0, 50.0, 400.0);
    assert_eq!(facade.seek_to_fraction(fraction), Some(60.0));
    assert_eq!(facade.element().unwrap().current_time(), 60.0);
    assert_eq!(facade.time_display(), "1:00 / 2:00");
    assert!((facade.progress() - 0.5).abs() < 1e-6);
}

#[test]
fn seek_without_duration_is_ignored() {
    let mut facade = PlaybackFacade::default();
    facade.attach(Box::new(ScriptedMedia::new(f64::NAN)));
    assert_eq!(facade.seek_to_fraction(0.5), None);
    facade.attach(Box::new(ScriptedMedia::new(0.0)));
    assert_eq!(facade.seek_to_fraction(0.5), None);
}

#[test]
fn blocked_play_is_reported_and_stays_paused() {
    let mut media = ScriptedMedia::new(10.0);
    media.ready_state = ReadyState::HaveEnoughData;
    media.play_result = Err(PlayError::Aborted("autoplay blocked".into()));

    let mut player = Player::new(DisplayMode::Half360, 1.0);
    player.attach_media(Box::new(media));
    player.toggle_play_pause();

    let frame = player.update(Duration::from_millis(16));
    let status = player.status();
    assert!(!status.is_playing);
    assert!(status.last_error.unwrap().contains("autoplay blocked"));
    assert!(!frame.refresh_texture);
}

#[test]
fn stall_and_decode_errors_leave_state_to_the_element() {
    let mut media = ScriptedMedia::new(10.0);
    media.ready_state = ReadyState::HaveEnoughData;

    let mut player = Player::new(DisplayMode::Full360, 1.0);
    player.attach_media(Box::new(media));
    player.toggle_play_pause();
    assert!(player.update(Duration::ZERO).refresh_texture);

    // the element keeps playing after reporting; the player does not retry or stop it
    let mut stalled = ScriptedMedia::new(10.0);
    stalled.ready_state = ReadyState::HaveMetadata;
    stalled.paused = false;
    stalled.queued = vec![
        MediaEvent::Play,
        MediaEvent::Stalled,
        MediaEvent::Error(vr_video_player::MediaError::Decode("bad frame".into())),
    ];
    player.attach_media(Box::new(stalled));
    let frame = player.update(Duration::ZERO);
    assert!(player.is_playing());
    assert!(player.status().last_error.is_some());
    // no decoded frame available: nothing to upload
    assert!(!frame.refresh_texture);
}

#[test]
fn mono_plane_resizes_when_metadata_arrives() {
    let mut media = ScriptedMedia::new(5.0);
    media.size = Some((1920, 800));
    media.ready_state = ReadyState::HaveMetadata;
    media.queued.push(MediaEvent::LoadedMetadata);

    let mut player = Player::new(DisplayMode::Half360, 1.0);
    player.attach_media(Box::new(media));
    player.update(Duration::ZERO);
    player.take_geometry_change();

    player.set_mode(DisplayMode::Mono);
    match player.take_geometry_change().unwrap().shape {
        Shape::Plane { width, height } => {
            assert_eq!(width, 10.0);
            assert!((height - 10.0 * 800.0 / 1920.0).abs() < 1e-5);
        }
        other => panic!("unexpected shape {other:?}"),
    }
}

#[test]
fn volume_carries_over_to_new_media() {
    let mut player = Player::new(DisplayMode::Half360, 1.0);
    player.set_volume(0.4);
    player.attach_media(Box::new(ScriptedMedia::new(1.0)));
    assert_eq!(player.media().unwrap().volume(), 0.4);
}
