/// Loading state of the optional background `<img>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLoad {
    Pending,
    Ready,
    /// Finished without decodable pixels, e.g. a missing file.
    Failed,
}

/// Classify an image from its `complete` flag and natural size. A broken
/// image reports `complete` with a zero natural size.
#[inline]
pub fn image_load_state(complete: bool, natural_width: u32, natural_height: u32) -> ImageLoad {
    match (complete, natural_width > 0 && natural_height > 0) {
        (false, _) => ImageLoad::Pending,
        (true, true) => ImageLoad::Ready,
        (true, false) => ImageLoad::Failed,
    }
}
