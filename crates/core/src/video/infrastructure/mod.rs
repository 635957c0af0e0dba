pub mod camera_source;
pub mod overlay;
pub mod window_renderer;
