use super::*;
use crate::layout::position::Anchor;

#[test]
fn minimal_job_gets_defaults() {
    let job = CaptionJob::from_reader(r#"{"image": "in.png", "text": "Hi"}"#.as_bytes()).unwrap();
    assert_eq!(job, CaptionJob::new("in.png", "Hi"));
    assert_eq!(job.output, PathBuf::from("output.mp4"));
    assert_eq!(job.duration, 5.0);
    assert_eq!(job.fps, Fps::whole(24).unwrap());
    assert_eq!(job.filter, ImageFilter::None);
    assert_eq!(job.style.font, None);
    assert_eq!(job.style.font_size, 50);
    assert_eq!(job.style.color, Rgba8::WHITE);
    assert_eq!(job.style.bg_color, None);
    assert_eq!(job.style.padding, 10);
    assert_eq!(job.style.position, TextPosition::Anchor(Anchor::Center));
    assert_eq!(job.style.align, TextAlign::Left);
    job.validate().unwrap();
}

#[test]
fn full_job_parses_every_field() {
    let json = r##"{
        "image_path": "photos/beach.jpg",
        "output_path": "out/beach.mp4",
        "text": "Line one\nLine two",
        "duration": 2.5,
        "fps": {"num": 30000, "den": 1001},
        "position": [400, 350],
        "font_path": "fonts/Custom.ttf",
        "font_size": 36,
        "text_color": [255, 255, 0],
        "bg_color": "#00000080",
        "padding": 20,
        "text_align": "right",
        "filter": "sepia"
    }"##;
    let job = CaptionJob::from_reader(json.as_bytes()).unwrap();
    assert_eq!(job.image, PathBuf::from("photos/beach.jpg"));
    assert_eq!(job.output, PathBuf::from("out/beach.mp4"));
    assert_eq!(job.duration, 2.5);
    assert_eq!(job.fps, Fps::new(30000, 1001).unwrap());
    assert_eq!(job.filter, ImageFilter::Sepia);
    assert_eq!(job.style.text, "Line one\nLine two");
    assert_eq!(job.style.position, TextPosition::At { x: 400.0, y: 350.0 });
    assert_eq!(job.style.font, Some(PathBuf::from("fonts/Custom.ttf")));
    assert_eq!(job.style.font_size, 36);
    assert_eq!(job.style.color, Rgba8::rgb(255, 255, 0));
    assert_eq!(job.style.bg_color, Some(Rgba8::rgba(0, 0, 0, 128)));
    assert_eq!(job.style.padding, 20);
    assert_eq!(job.style.align, TextAlign::Right);
}

#[test]
fn odd_positions_fall_back_instead_of_failing() {
    let job = CaptionJob::from_reader(
        r#"{"image": "a.png", "text": "x", "position": "diagonal"}"#.as_bytes(),
    )
    .unwrap();
    assert_eq!(job.style.position, TextPosition::Anchor(Anchor::TopLeft));

    let job =
        CaptionJob::from_reader(r#"{"image": "a.png", "text": "x", "position": 7}"#.as_bytes())
            .unwrap();
    assert_eq!(job.style.position, TextPosition::Anchor(Anchor::Center));
}

#[test]
fn malformed_json_is_validation_error() {
    for bad in [
        r#"{"text": "no image"}"#,
        r##"{"image": "a.png", "text": "x", "color": "#12"}"##,
        r#"{"image": "a.png", "text": "x", "fps": 0}"#,
        "not json",
    ] {
        let err = CaptionJob::from_reader(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, CaptionError::Validation(_)), "{bad}");
    }
}

#[test]
fn validate_rejects_unrenderable_values() {
    let mut job = CaptionJob::new("a.png", "x");
    job.style.font_size = 0;
    assert!(job.validate().is_err());

    let mut job = CaptionJob::new("a.png", "x");
    job.duration = f64::NAN;
    assert!(job.validate().is_err());

    let mut job = CaptionJob::new("a.png", "x");
    job.output = PathBuf::new();
    assert!(job.validate().is_err());

    let mut job = CaptionJob::new("a.png", "x");
    job.duration = -3.0;
    job.validate().unwrap();
}

#[test]
fn missing_job_file_is_an_error() {
    assert!(CaptionJob::from_path(Path::new("target/no_such_job.json")).is_err());
}
