// main.rs: window, event loop and control bar for the VR video player

// no console window in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use vr_video_player::camera::PerspectiveCamera;
use vr_video_player::i18n::{self, tr};
use vr_video_player::media::{seek_fraction_from_click, ANIMATED_EXTENSIONS, VIDEO_EXTENSIONS};
use vr_video_player::renderer::Renderer;
use vr_video_player::{DisplayMode, Player, PlayerConfig, PlayerStatus};

use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{CursorIcon, Fullscreen, Window, WindowBuilder},
};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Things the UI asked for during this frame; applied after egui returns.
enum UiAction {
    OpenDialog,
    Exit,
    SetMode(DisplayMode),
    ResetView,
    ToggleFullscreen,
    TogglePlay,
    Seek(f32),
    SetVolume(f32),
    SetVsync(bool),
    SetLang(String),
}

struct UiState {
    drop_hover: bool,
    show_fps: bool,
    vsync: bool,
    fps: f32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match PlayerConfig::resolve() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };
    i18n::init(config.lang.clone());

    let event_loop = EventLoop::new();
    let window = match WindowBuilder::new()
        .with_title(tr("app.title"))
        .with_inner_size(LogicalSize::new(1280, 720))
        .build(&event_loop)
    {
        Ok(w) => Arc::new(w),
        Err(e) => {
            log::error!("unable to create window: {}", e);
            std::process::exit(1);
        }
    };

    let mut player = Player::new(config.mode, config.volume);
    let renderer_init = Renderer::new(window.clone(), player.geometry(), config.vsync);
    let mut renderer = pollster::block_on(renderer_init);
    let mut camera = PerspectiveCamera::new(config.fov_y_deg, 1.0);
    camera.set_aspect(renderer.size.width, renderer.size.height);

    if let Some(path) = config.file.as_deref() {
        open_path(&mut player, &mut renderer, path);
    }

    let mut ui = UiState {
        drop_hover: false,
        show_fps: false,
        vsync: config.vsync,
        fps: 0.0,
    };
    let mut cursor = PhysicalPosition::new(0.0f64, 0.0f64);
    let mut last_frame = Instant::now();
    let mut fps_window_start = Instant::now();
    let mut fps_frames = 0u32;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => {
                let consumed = renderer.egui_state.on_event(&renderer.egui_ctx, &event).consumed;

                match event {
                    WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,

                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        camera.set_aspect(new_size.width, new_size.height);
                    }
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        renderer.resize(*new_inner_size);
                        camera.set_aspect(new_inner_size.width, new_inner_size.height);
                    }

                    WindowEvent::KeyboardInput { input, .. } if !consumed => {
                        if input.state == ElementState::Pressed {
                            if let Some(key) = input.virtual_keycode {
                                handle_key(key, &mut player, &window, &mut renderer);
                            }
                        }
                    }

                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    } => match state {
                        ElementState::Pressed if !consumed => {
                            player.pointer_down(cursor.x as f32, cursor.y as f32);
                        }
                        // releases always end the drag, even over the UI
                        ElementState::Released => player.pointer_up(),
                        _ => {}
                    },

                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = position;
                        player.pointer_move(position.x as f32, position.y as f32);
                    }

                    WindowEvent::Touch(touch) => {
                        let id = touch.id;
                        let (x, y) = (touch.location.x as f32, touch.location.y as f32);
                        match touch.phase {
                            TouchPhase::Started if !consumed => player.touch_start(id, x, y),
                            TouchPhase::Moved => {
                                player.touch_move(id, x, y);
                            }
                            TouchPhase::Ended | TouchPhase::Cancelled => player.touch_end(id),
                            _ => {}
                        }
                    }

                    WindowEvent::HoveredFile(_) => ui.drop_hover = true,
                    WindowEvent::HoveredFileCancelled => ui.drop_hover = false,
                    WindowEvent::DroppedFile(path) => {
                        ui.drop_hover = false;
                        open_path(&mut player, &mut renderer, &path);
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame);
                last_frame = now;

                fps_frames += 1;
                let elapsed = now.duration_since(fps_window_start).as_secs_f32();
                if elapsed >= 1.0 {
                    ui.fps = fps_frames as f32 / elapsed;
                    fps_frames = 0;
                    fps_window_start = now;
                }

                let frame = player.update(dt);

                if let Some(geometry) = player.take_geometry_change() {
                    renderer.set_geometry(&geometry);
                }
                if frame.refresh_texture {
                    if let Some(image) = player.media().and_then(|m| m.current_frame()) {
                        renderer.upload_frame(image);
                    }
                }
                renderer.update_camera(camera.view_proj(&frame.pose));

                player.set_fullscreen(window.fullscreen().is_some());
                let status = player.status();
                let mut actions = Vec::new();
                let render_result = renderer.render_with_ui(&window, |ctx| {
                    draw_ui(ctx, &status, &mut ui, &mut actions);
                });

                let over_ui = renderer.egui_ctx.is_pointer_over_area();
                if !over_ui {
                    let icon = if player.is_dragging() {
                        CursorIcon::Grabbing
                    } else {
                        CursorIcon::Grab
                    };
                    window.set_cursor_icon(icon);
                }

                for action in actions {
                    match action {
                        UiAction::OpenDialog => {
                            if let Some(path) = pick_video_file() {
                                open_path(&mut player, &mut renderer, &path);
                            }
                        }
                        UiAction::Exit => *control_flow = ControlFlow::Exit,
                        UiAction::SetMode(mode) => player.set_mode(mode),
                        UiAction::ResetView => player.reset_view(),
                        UiAction::ToggleFullscreen => toggle_fullscreen(&window),
                        UiAction::TogglePlay => player.toggle_play_pause(),
                        UiAction::Seek(fraction) => {
                            player.seek_to_fraction(fraction);
                        }
                        UiAction::SetVolume(v) => player.set_volume(v),
                        UiAction::SetVsync(on) => renderer.set_vsync(on),
                        UiAction::SetLang(code) => {
                            i18n::init(code);
                            window.set_title(&tr("app.title"));
                        }
                    }
                }

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory");
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => log::warn!("render error: {:?}", e),
                }
            }

            Event::MainEventsCleared => window.request_redraw(),

            _ => {}
        }
    });
}

fn handle_key(key: VirtualKeyCode, player: &mut Player, window: &Window, renderer: &mut Renderer) {
    match key {
        VirtualKeyCode::O => {
            if let Some(path) = pick_video_file() {
                open_path(player, renderer, &path);
            }
        }
        VirtualKeyCode::Space => player.toggle_play_pause(),
        VirtualKeyCode::F | VirtualKeyCode::F11 => toggle_fullscreen(window),
        VirtualKeyCode::Escape if window.fullscreen().is_some() => window.set_fullscreen(None),
        VirtualKeyCode::Key1 => player.set_mode(DisplayMode::Mono),
        VirtualKeyCode::Key2 => player.set_mode(DisplayMode::Half360),
        VirtualKeyCode::Key3 => player.set_mode(DisplayMode::Full360),
        VirtualKeyCode::R => player.reset_view(),
        _ => {}
    }
}

fn pick_video_file() -> Option<PathBuf> {
    let mut extensions = VIDEO_EXTENSIONS.to_vec();
    extensions.extend_from_slice(ANIMATED_EXTENSIONS);
    rfd::FileDialog::new()
        .add_filter(&tr("file.filter.videos"), &extensions[..])
        .pick_file()
}

fn open_path(player: &mut Player, renderer: &mut Renderer, path: &std::path::Path) {
    match player.load_path(path) {
        Ok(()) => renderer.clear_video(),
        Err(_) => {
            let path = path.display().to_string();
            log::warn!("{}", i18n::tr_with("log.rejected_drop", &[("path", path)]));
        }
    }
}

fn toggle_fullscreen(window: &Window) {
    if window.fullscreen().is_some() {
        window.set_fullscreen(None);
    } else {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }
}

fn mode_label(mode: DisplayMode) -> String {
    tr(&format!("mode.{}", mode.tag()))
}

fn draw_ui(
    ctx: &egui::Context,
    status: &PlayerStatus,
    ui_state: &mut UiState,
    actions: &mut Vec<UiAction>,
) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button(tr("menu.file"), |ui| {
                if ui.button(tr("menu.open_video")).clicked() {
                    ui.close_menu();
                    actions.push(UiAction::OpenDialog);
                }
                if ui.button(tr("menu.exit")).clicked() {
                    actions.push(UiAction::Exit);
                }
            });

            ui.menu_button(tr("menu.view"), |ui| {
                if ui.button(tr("view.reset")).clicked() {
                    actions.push(UiAction::ResetView);
                    ui.close_menu();
                }
                let fs_label = if status.is_fullscreen {
                    tr("view.fullscreen.exit")
                } else {
                    tr("view.fullscreen.enter")
                };
                if ui.button(fs_label).clicked() {
                    actions.push(UiAction::ToggleFullscreen);
                    ui.close_menu();
                }

                ui.separator();
                ui.menu_button(tr("view.display_mode"), |ui| {
                    for mode in DisplayMode::ALL {
                        if ui.radio(status.mode == mode, mode_label(mode)).clicked() {
                            actions.push(UiAction::SetMode(mode));
                            ui.close_menu();
                        }
                    }
                });

                ui.separator();
                ui.checkbox(&mut ui_state.show_fps, "FPS");
                if ui.checkbox(&mut ui_state.vsync, "VSync").changed() {
                    actions.push(UiAction::SetVsync(ui_state.vsync));
                }
            });

            ui.menu_button(tr("menu.language"), |ui| {
                let current = i18n::current_lang();
                for (code, name) in i18n::LANGUAGES {
                    if ui.radio(current == code, name).clicked() {
                        actions.push(UiAction::SetLang(code.to_string()));
                        ui.close_menu();
                    }
                }
            });
        });
    });

    egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
        ui.add_space(4.0);

        // seek bar: click position -> fractional seek
        let width = ui.available_width();
        let (rect, response) = ui.allocate_exact_size(egui::vec2(width, 8.0), egui::Sense::click());
        let painter = ui.painter();
        painter.rect_filled(rect, 3.0, egui::Color32::from_gray(60));
        let mut played = rect;
        played.set_width(rect.width() * status.progress);
        painter.rect_filled(played, 3.0, egui::Color32::from_rgb(220, 60, 60));
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let fraction = seek_fraction_from_click(pos.x, rect.left(), rect.width());
                actions.push(UiAction::Seek(fraction));
            }
        }

        ui.horizontal(|ui| {
            let (icon, hint) = if status.is_playing {
                ("⏸", tr("control.pause"))
            } else {
                ("▶", tr("control.play"))
            };
            if ui
                .add_enabled(status.has_source, egui::Button::new(icon))
                .on_hover_text(hint)
                .clicked()
            {
                actions.push(UiAction::TogglePlay);
            }

            ui.label(status.time_text.as_str());
            ui.separator();

            let mut volume = status.volume;
            let slider = egui::Slider::new(&mut volume, 0.0..=1.0).text(tr("control.volume"));
            if ui.add(slider).changed() {
                actions.push(UiAction::SetVolume(volume));
            }
            ui.separator();

            for mode in DisplayMode::ALL {
                if ui.selectable_label(status.mode == mode, mode_label(mode)).clicked() {
                    actions.push(UiAction::SetMode(mode));
                }
            }
            ui.separator();

            let fs_icon = if status.is_fullscreen { "⛷" } else { "⛶" };
            if ui.button(fs_icon).on_hover_text(tr("control.fullscreen")).clicked() {
                actions.push(UiAction::ToggleFullscreen);
            }
        });

        ui.horizontal(|ui| {
            match &status.source_name {
                Some(name) => ui.label(name.as_str()),
                None => ui.label(tr("status.no_media")),
            };
            if status.is_loading {
                let loading = egui::RichText::new(tr("status.loading"));
                ui.label(loading.color(egui::Color32::YELLOW));
            }
            ui.label("|");
            ui.label(format!("Lat: {:.1}°", status.orientation.latitude_deg));
            ui.label("|");
            ui.label(format!("Lon: {:.1}°", status.orientation.longitude_deg));

            if let Some(err) = &status.last_error {
                ui.label("|");
                ui.label(
                    egui::RichText::new(format!("{} {}", tr("status.error_prefix"), err))
                        .color(egui::Color32::LIGHT_RED),
                );
            }

            if ui_state.show_fps {
                ui.label("|");
                let fps = format!("FPS: {:.1}", ui_state.fps);
                ui.label(egui::RichText::new(fps).color(egui::Color32::GREEN));
            }
        });
    });

    if ui_state.drop_hover {
        egui::Area::new(egui::Id::new("drop_zone"))
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.heading(tr("drop.hint"));
                });
            });
    }
}
