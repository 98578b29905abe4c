use super::*;
use crate::foundation::core::Fps;

fn strings(args: &[OsString]) -> Vec<String> {
    args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
}

fn value_after(args: &[String], flag: &str) -> Vec<String> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].clone())
        .collect()
}

#[test]
fn even_size_uses_yuv420p() {
    let cfg = SinkConfig {
        width: 200,
        height: 150,
        fps: Fps::whole(10).unwrap(),
    };
    let args = strings(&encode_args(&cfg, &FfmpegSinkOpts::new("out/a.mp4")));

    assert_eq!(args.first().map(String::as_str), Some("-y"));
    assert_eq!(value_after(&args, "-pix_fmt"), vec!["rgb24", "yuv420p"]);
    assert_eq!(value_after(&args, "-s"), vec!["200x150"]);
    assert_eq!(value_after(&args, "-r"), vec!["10/1"]);
    assert_eq!(value_after(&args, "-c:v"), vec!["libx264"]);
    assert_eq!(value_after(&args, "-movflags"), vec!["+faststart"]);
    assert_eq!(args.last().map(String::as_str), Some("out/a.mp4"));
}

#[test]
fn odd_size_keeps_exact_dimensions_with_yuv444p() {
    assert_eq!(output_pix_fmt(201, 150), "yuv444p");
    assert_eq!(output_pix_fmt(200, 151), "yuv444p");
    assert_eq!(output_pix_fmt(2, 2), "yuv420p");

    let cfg = SinkConfig {
        width: 33,
        height: 17,
        fps: Fps::new(30000, 1001).unwrap(),
    };
    let mut opts = FfmpegSinkOpts::new("odd.mp4");
    opts.overwrite = false;
    let args = strings(&encode_args(&cfg, &opts));
    assert_eq!(args.first().map(String::as_str), Some("-n"));
    assert_eq!(value_after(&args, "-s"), vec!["33x17"]);
    assert_eq!(value_after(&args, "-r"), vec!["30000/1001"]);
    assert_eq!(value_after(&args, "-pix_fmt"), vec!["rgb24", "yuv444p"]);
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/unit_ffmpeg/never.mp4"));
    assert!(
        sink.push_frame(FrameIndex(0), &image::RgbImage::new(2, 2))
            .is_err()
    );
    assert!(sink.end().is_err());
}

#[test]
fn begin_rejects_zero_size() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/unit_ffmpeg/zero.mp4"));
    let err = sink
        .begin(SinkConfig {
            width: 0,
            height: 2,
            fps: Fps::whole(24).unwrap(),
        })
        .unwrap_err();
    assert!(matches!(err, CaptionError::Validation(_)));
}

#[test]
fn ensure_parent_dir_creates_nested_dirs_and_accepts_bare_names() {
    let path = Path::new("target/unit_ffmpeg/nested/deeper/out.mp4");
    ensure_parent_dir(path).unwrap();
    assert!(path.parent().unwrap().is_dir());
    ensure_parent_dir(Path::new("bare.mp4")).unwrap();
}
