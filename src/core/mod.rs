pub mod camera;
pub mod color;
pub mod projection;

pub use camera::{Camera, OrbitControls, ViewControls};
pub use color::Color;
pub use projection::{world_to_screen, ScreenPoint, Viewport};
