pub mod diagnostics;
pub mod images;
