pub mod constants;
pub mod media_type;
pub mod model_resolver;
pub mod model_size;
pub mod naming;
pub mod wsl_path;
