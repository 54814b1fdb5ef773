pub mod mlp_error;

pub use mlp_error::{MlpError, Result};
