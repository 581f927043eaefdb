mod comments;
mod filters;

pub use comments::*;
pub use filters::*;
