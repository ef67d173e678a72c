pub mod catalog_list;
pub mod image;
pub mod status;

pub use self::catalog_list::create_catalog_list;
pub use self::image::{image_placeholder, render_image_widget};
pub use self::status::{create_footer, create_header, footer_text};
