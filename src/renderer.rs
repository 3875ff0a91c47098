// renderer.rs: draws the projection mesh with the video texture, then the egui layer

use crate::projection::{FaceSide, ProjectionGeometry};
use glam::Mat4;
use image::RgbaImage;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Material colour before any frame has been uploaded (#222222).
const PLACEHOLDER_TINT: [f32; 4] = [0.133, 0.133, 0.133, 0.0];

fn setup_egui_ui_fonts(ctx: &egui::Context) {
    // Look for one system/bundled font that covers CJK; egui's defaults already
    // handle Latin. ab_glyph is used only to reject files egui could not parse.
    fn load_font(path: &std::path::Path) -> Option<Vec<u8>> {
        let bytes = std::fs::read(path).ok()?;
        ab_glyph::FontRef::try_from_slice(&bytes).ok()?;
        Some(bytes)
    }

    let mut candidates: Vec<std::path::PathBuf> = Vec::new();

    if cfg!(windows) {
        let dir = std::path::PathBuf::from(r"C:\Windows\Fonts");
        for f in ["msyh.ttf", "simhei.ttf", "meiryo.ttf", "malgun.ttf"] {
            candidates.push(dir.join(f));
        }
    } else if cfg!(target_os = "macos") {
        for p in [
            "/System/Library/Fonts/PingFang.ttc",
            "/System/Library/Fonts/Hiragino Sans GB.ttc",
            "/Library/Fonts/Arial Unicode.ttf",
        ] {
            candidates.push(p.into());
        }
    } else if cfg!(unix) {
        for p in [
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
            "/usr/share/fonts/truetype/wqy/wqy-zenhei.ttc",
        ] {
            candidates.push(p.into());
        }
    }

    // bundled fonts: <exe_dir>/assets/fonts and ./assets/fonts
    let bundled = ["NotoSansCJK-Regular.ttc", "NotoSansSC-Regular.otf", "NotoSans-Regular.ttf"];
    let exe = std::env::current_exe().ok();
    if let Some(dir) = exe.as_deref().and_then(std::path::Path::parent) {
        for f in bundled {
            candidates.push(dir.join("assets").join("fonts").join(f));
        }
    }
    for f in bundled {
        candidates.push(std::path::PathBuf::from("assets").join("fonts").join(f));
    }

    let Some((font_path, font_bytes)) = candidates
        .into_iter()
        .find_map(|p| load_font(&p).map(|bytes| (p, bytes)))
    else {
        log::info!("{}", crate::i18n::tr("font.not_found"));
        return;
    };

    log::info!(
        "{}",
        crate::i18n::tr_with("font.using", &[("path", font_path.display().to_string())])
    );

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert("ui".to_owned(), egui::FontData::from_owned(font_bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        if let Some(list) = fonts.families.get_mut(&family) {
            // after the default font so Latin glyphs keep egui's look
            list.push("ui".to_owned());
        }
    }
    ctx.set_fonts(fonts);
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    tint: [f32; 4],
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

/// The texture the current video frame is copied into.
struct VideoTexture {
    texture: wgpu::Texture,
    size: (u32, u32),
}

impl VideoTexture {
    fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            label: Some("video_texture"),
            view_formats: &[],
        });
        Self {
            texture,
            size: (width, height),
        }
    }

    fn write(&self, queue: &wgpu::Queue, rgba: &[u8]) {
        let (width, height) = self.size;
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            extent(width, height),
        );
    }
}

pub struct Renderer {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,

    // one pipeline per culled side
    inside_pipeline: wgpu::RenderPipeline,
    outside_pipeline: wgpu::RenderPipeline,
    side: FaceSide,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,

    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    video: VideoTexture,
    sampler: wgpu::Sampler,

    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,

    // UI
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

fn create_mesh_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    side: FaceSide,
) -> wgpu::RenderPipeline {
    let cull_mode = match side {
        FaceSide::Front => wgpu::Face::Back,
        FaceSide::Back => wgpu::Face::Front,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(match side {
            FaceSide::Front => "Mesh Pipeline (front)",
            FaceSide::Back => "Mesh Pipeline (back)",
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[Vertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(cull_mode),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        // a single convex-from-inside mesh, no depth buffer needed
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::Fifo
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

impl Renderer {
    pub async fn new(
        window: std::sync::Arc<Window>,
        geometry: &ProjectionGeometry,
        vsync: bool,
    ) -> Self {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // SAFETY: the window is kept alive by the Arc held in main for the whole event loop.
        let surface = unsafe { instance.create_surface(window.as_ref()) }.expect("create surface");
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("no suitable GPU adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: if cfg!(target_arch = "wasm32") {
                        wgpu::Limits::downlevel_webgl2_defaults()
                    } else {
                        wgpu::Limits::default().using_resolution(adapter.limits())
                    },
                    label: None,
                },
                None,
            )
            .await
            .expect("request GPU device");

        let surface_caps = surface.get_capabilities(&adapter);
        let formats = &surface_caps.formats;
        let surface_format = formats.iter().copied().find(|f| f.is_srgb()).unwrap_or(formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        // --- 1. Video texture (1x1 until the first frame arrives) ---
        let video = VideoTexture::new(&device, 1, 1);
        video.write(&queue, &[34, 34, 34, 255]);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat, // longitude wraps
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // --- 2. Uniforms ---
        let camera_uniform = CameraUniform {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            model: geometry.model_matrix().to_cols_array_2d(),
            tint: PLACEHOLDER_TINT,
        };

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("video_bind_group_layout"),
        });

        let bind_group = Self::create_bind_group(
            &device,
            &bind_group_layout,
            &camera_buffer,
            &video,
            &sampler,
        );

        // --- 3. Pipelines ---
        let shader = device.create_shader_module(wgpu::include_wgsl!("shader_mesh.wgsl"));
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let inside_pipeline = create_mesh_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            FaceSide::Back,
        );
        let outside_pipeline = create_mesh_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            FaceSide::Front,
        );

        // --- 4. Mesh ---
        let (vertex_buffer, index_buffer, index_count) =
            Self::create_mesh_buffers(&device, geometry);

        // --- 5. Egui ---
        let egui_ctx = egui::Context::default();
        setup_egui_ui_fonts(&egui_ctx);

        let mut egui_state = egui_winit::State::new(window.as_ref());
        egui_state.set_pixels_per_point(window.scale_factor() as f32);

        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        Self {
            surface,
            device,
            queue,
            config,
            size,
            inside_pipeline,
            outside_pipeline,
            side: geometry.side,
            vertex_buffer,
            index_buffer,
            index_count,
            bind_group_layout,
            bind_group,
            video,
            sampler,
            camera_uniform,
            camera_buffer,
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
        video: &VideoTexture,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        let view = video.texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some("video_bind_group"),
        })
    }

    fn create_mesh_buffers(
        device: &wgpu::Device,
        geometry: &ProjectionGeometry,
    ) -> (wgpu::Buffer, wgpu::Buffer, u32) {
        let mesh = geometry.build_mesh();
        let vertices: Vec<Vertex> = mesh
            .positions
            .iter()
            .zip(&mesh.uvs)
            .map(|(&position, &uv)| Vertex { position, uv })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        (vertex_buffer, index_buffer, mesh.indices.len() as u32)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_vsync(&mut self, vsync: bool) {
        self.config.present_mode = present_mode(vsync);
        self.surface.configure(&self.device, &self.config);
    }

    /// Swap the mesh after a mode change or a new aspect ratio.
    pub fn set_geometry(&mut self, geometry: &ProjectionGeometry) {
        let (vb, ib, count) = Self::create_mesh_buffers(&self.device, geometry);
        self.vertex_buffer = vb;
        self.index_buffer = ib;
        self.index_count = count;
        self.side = geometry.side;
        self.camera_uniform.model = geometry.model_matrix().to_cols_array_2d();
    }

    /// Back to the flat placeholder material (new source, nothing decoded yet).
    pub fn clear_video(&mut self) {
        self.camera_uniform.tint = PLACEHOLDER_TINT;
    }

    /// Copy a decoded frame into the video texture, reallocating on size change.
    pub fn upload_frame(&mut self, frame: &RgbaImage) {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return;
        }

        let max = self.device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            log::warn!("frame {width}x{height} exceeds GPU limit {max}, skipped");
            return;
        }

        if self.video.size != (width, height) {
            self.video = VideoTexture::new(&self.device, width, height);
            self.bind_group = Self::create_bind_group(
                &self.device,
                &self.bind_group_layout,
                &self.camera_buffer,
                &self.video,
                &self.sampler,
            );
        }
        self.video.write(&self.queue, frame.as_raw());
        self.camera_uniform.tint[3] = 1.0;
    }

    pub fn update_camera(&mut self, view_proj: Mat4) {
        self.camera_uniform.view_proj = view_proj.to_cols_array_2d();
        let uniform = [self.camera_uniform];
        self.queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&uniform));
    }

    pub fn render_with_ui(
        &mut self,
        window: &Window,
        run_ui: impl FnOnce(&egui::Context),
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        // 1. Scene
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            let pipeline = match self.side {
                FaceSide::Back => &self.inside_pipeline,
                FaceSide::Front => &self.outside_pipeline,
            };
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        // 2. UI
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, run_ui);

        self.egui_state.handle_platform_output(window, &self.egui_ctx, full_output.platform_output);
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes);

        let screen_descriptor = egui_wgpu::renderer::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
            self.egui_renderer.render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
