pub mod editing;
pub mod io;
pub mod marking;

// Re-export key types for easier usage
pub use editing::{buffer::*, span::*, track::*};
pub use io::*;
pub use marking::{cache::*, scan::*};
