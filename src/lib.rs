//! A small glTF 2.0 viewer: geometry is uploaded to the GPU once, and the
//! default scene's node tree is walked and drawn every frame.

pub mod config;
pub mod gltf;
pub mod renderer;
