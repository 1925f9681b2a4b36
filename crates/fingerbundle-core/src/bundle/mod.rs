mod reader;
mod writer;

pub use reader::{decode_bundle, read_bundle, GZIP_MAGIC};
pub use writer::{temp_json_path, to_writer_spaced, write_bundle, SpacedFormatter};
