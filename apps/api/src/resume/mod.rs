// Resume builder: delimited form parsing, AI polishing, HTML/text rendering.

pub mod form;
pub mod handlers;
pub mod prompts;
pub mod render;
