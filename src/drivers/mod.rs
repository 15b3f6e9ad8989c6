//! Button inputs and lamp rendering.

pub mod button;
pub mod renderer;
