pub mod extract;
pub mod source;
pub mod types;

pub use extract::{expected_sample_count, extract_frames, frame_filename, frame_stride, sample_frames};
pub use source::{
    FfmpegSource, FrameSource, RawFrameReader, SyntheticVideo, parse_frame_rate, probe_video,
    video_info_from_probe,
};
pub use types::{SampledFrame, VideoInfo};
