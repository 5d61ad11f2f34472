pub mod sprite;
pub mod tile;
