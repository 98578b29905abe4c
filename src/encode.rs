//! Encoding sinks and still-frame replication.

/// `ffmpeg`-based MP4 sink.
pub(crate) mod ffmpeg;
/// Read-back of encoded videos through `ffprobe`/`ffmpeg`.
pub(crate) mod probe;
/// Generic frame sink trait and the in-memory sink.
pub(crate) mod sink;
/// Frame-count rules and replication of one frame into a sink.
pub(crate) mod still;
