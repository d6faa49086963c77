pub mod altimeter;
pub mod constants;
pub mod page;

pub use altimeter::{AltimeterPage, screen_bounds};
pub use page::Page;
