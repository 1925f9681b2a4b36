mod walk;

pub use walk::{has_extension, scan_fingerprint_files};
