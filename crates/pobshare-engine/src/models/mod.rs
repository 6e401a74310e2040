pub mod build;
pub mod item;

pub use build::Build;
pub use item::{Item, Rarity};
