pub mod capture;
pub mod console;
pub mod render;
pub mod session;

pub use capture::ImageFile;
pub use console::Console;
