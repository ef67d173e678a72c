pub mod dirty;
pub mod render;
pub mod utils;
pub mod widgets;

pub use dirty::DirtyFlags;
pub use render::render;
pub use utils::Protocol;
