//! Private utility module
use std::path::Path;

/// The two leading bytes of every gzip member.
pub const GZ_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Check whether the given path names a gzip-compressed file,
/// judging by its extension alone.
pub fn is_gz_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

/// Check whether the given prefix starts with the gzip magic number.
pub fn has_gz_magic(prefix: &[u8]) -> bool {
    prefix.len() >= GZ_MAGIC.len() && prefix[..2] == GZ_MAGIC
}

/// Interpret a fixed-size, NUL-padded text field.
pub fn nul_trimmed_string(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).trim_end().to_string()
}
