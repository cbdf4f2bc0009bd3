//! Host (desktop terminal) adapters for the Leitura core traits.

pub mod feedback;
pub mod input;
pub mod lifecycle;
pub mod motion;
pub mod render;
pub mod storage;
