pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;
pub mod display;

pub use error::{OptimizerError, OptimizerResult, ValidationError, PathError};
pub use validation::{validate_quality, validate_input_path, validate_config, MIN_QUALITY, MAX_QUALITY};
pub use formats::{
    is_image_media_type,
    media_type_from_path,
    optimized_file_name,
    unique_file_name,
    JPEG_MEDIA_TYPE,
    UNKNOWN_MEDIA_TYPE,
};
pub use fs::{read_raw_file, create_dir_all, write_file};
pub use display::{format_size, format_savings, savings_percent};
