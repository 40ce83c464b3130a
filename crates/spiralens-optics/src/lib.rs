pub mod autofocus;
pub use autofocus::*;
pub mod component;
pub use component::*;
pub mod spiral;
pub use spiral::*;
pub mod stack;
pub use stack::*;
