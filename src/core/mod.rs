pub mod camera;
pub mod color;
pub mod triangle;

pub use camera::Camera;
pub use color::Color;
pub use triangle::Triangle;
