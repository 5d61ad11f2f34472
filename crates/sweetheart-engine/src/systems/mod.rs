pub mod animator;
pub mod puzzle;
