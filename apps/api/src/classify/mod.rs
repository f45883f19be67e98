//! Classification pipeline: compile a constrained prompt from the taxonomy,
//! send it to the completion provider, strictly validate the model's output.

pub mod handlers;
pub mod prompt;
pub mod validate;
