pub mod scan;
pub mod screen;
pub mod status;
