//! Panoramic / VR video player.
//!
//! Window-free pieces live here so they can be used and tested without a GPU:
//! look-angle state, drag handling, projection geometry, camera poses, and the
//! media element contract. `renderer` is the only module that touches wgpu.

pub mod camera;
pub mod config;
pub mod error;
pub mod gesture;
pub mod i18n;
pub mod media;
pub mod mesh;
pub mod orientation;
pub mod player;
pub mod projection;
pub mod renderer;

pub use camera::{compute_pose, CameraPose, PerspectiveCamera};
pub use config::PlayerConfig;
pub use error::{ConfigError, MediaError, PlayError, PlayerError};
pub use gesture::{DragSession, GestureTranslator, DRAG_SENSITIVITY_DEG_PER_PX};
pub use media::{MediaElement, MediaEvent, PlaybackFacade, ReadyState};
pub use orientation::{DisplayMode, Orientation};
pub use player::{FrameUpdate, Player, PlayerStatus};
pub use projection::{select_geometry, FaceSide, ProjectionGeometry, Shape, UvRemap};
