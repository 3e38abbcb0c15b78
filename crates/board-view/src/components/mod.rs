//! Page components. Each one is a pure function of its inputs.

pub mod feed;
pub mod forms;
pub mod post;
