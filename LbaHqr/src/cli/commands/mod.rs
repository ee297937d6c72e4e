pub mod anim;
pub mod archive;
pub mod clips;
mod definitions;
mod execute;
pub mod model;
pub mod resources;

pub use definitions::Commands;
