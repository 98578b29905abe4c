use serde_json::json;

use super::*;

const CANVAS: Canvas = Canvas {
    width: 200,
    height: 150,
};
const BLOCK: BlockSize = BlockSize {
    width: 60.0,
    height: 20.0,
};

#[test]
fn every_anchor_matches_its_formula() {
    let p = 10u32;
    let (w, h, bw, bh, pf) = (200.0, 150.0, 60.0, 20.0, 10.0);
    let cx = (w - bw) / 2.0;
    let cy = (h - bh) / 2.0;
    let expected = [
        (Anchor::Center, (cx, cy)),
        (Anchor::TopLeft, (pf, pf)),
        (Anchor::TopCenter, (cx, pf)),
        (Anchor::TopRight, (w - bw - pf, pf)),
        (Anchor::CenterLeft, (pf, cy)),
        (Anchor::CenterRight, (w - bw - pf, cy)),
        (Anchor::BottomLeft, (pf, h - bh - pf)),
        (Anchor::BottomCenter, (cx, h - bh - pf)),
        (Anchor::BottomRight, (w - bw - pf, h - bh - pf)),
    ];
    assert_eq!(expected.len(), Anchor::ALL.len());
    for (anchor, xy) in expected {
        assert_eq!(
            resolve_origin(CANVAS, BLOCK, p, TextPosition::Anchor(anchor)),
            xy,
            "{}",
            anchor.name()
        );
    }
}

#[test]
fn center_ignores_padding() {
    let a = resolve_origin(CANVAS, BLOCK, 0, TextPosition::Anchor(Anchor::Center));
    let b = resolve_origin(CANVAS, BLOCK, 37, TextPosition::Anchor(Anchor::Center));
    assert_eq!(a, b);
}

#[test]
fn explicit_position_is_verbatim() {
    for padding in [0, 5, 50] {
        let layout = place_caption(CANVAS, BLOCK, padding, TextPosition::At { x: 75.0, y: 75.0 });
        assert_eq!((layout.x, layout.y), (75, 75));
    }
}

#[test]
fn coordinates_truncate_toward_zero() {
    let block = BlockSize {
        width: 61.0,
        height: 21.0,
    };
    // (200 - 61) / 2 = 69.5, (150 - 21) / 2 = 64.5
    let layout = place_caption(CANVAS, block, 0, TextPosition::Anchor(Anchor::Center));
    assert_eq!((layout.x, layout.y), (69, 64));

    // Oversized block: -2.5 truncates to -2.
    let wide = BlockSize {
        width: 205.0,
        height: 10.0,
    };
    let layout = place_caption(CANVAS, wide, 0, TextPosition::Anchor(Anchor::Center));
    assert_eq!(layout.x, -2);
}

#[test]
fn unknown_name_falls_back_to_top_left_with_padding() {
    let pos = TextPosition::from_name("diagonal");
    assert_eq!(pos, TextPosition::Anchor(Anchor::TopLeft));
    assert_eq!(resolve_origin(CANVAS, BLOCK, 12, pos), (12.0, 12.0));
}

#[test]
fn json_values_resolve_with_fallbacks() {
    assert_eq!(
        TextPosition::from_json(&json!("bottom_right")),
        TextPosition::Anchor(Anchor::BottomRight)
    );
    assert_eq!(
        TextPosition::from_json(&json!("diagonal")),
        TextPosition::Anchor(Anchor::TopLeft)
    );
    assert_eq!(
        TextPosition::from_json(&json!([400, 350])),
        TextPosition::At { x: 400.0, y: 350.0 }
    );
    for invalid in [json!(42), json!([1, 2, 3]), json!(["a", "b"]), json!(null)] {
        assert_eq!(
            TextPosition::from_json(&invalid),
            TextPosition::Anchor(Anchor::Center)
        );
    }
}

#[test]
fn cli_form_accepts_pairs_and_names() {
    assert_eq!(
        "75, 75".parse::<TextPosition>().unwrap(),
        TextPosition::At { x: 75.0, y: 75.0 }
    );
    assert_eq!(
        "top_right".parse::<TextPosition>().unwrap(),
        TextPosition::Anchor(Anchor::TopRight)
    );
    assert_eq!(
        "a,b".parse::<TextPosition>().unwrap(),
        TextPosition::Anchor(Anchor::TopLeft)
    );
}

#[test]
fn background_rect_grows_block_by_padding() {
    let layout = CaptionLayout {
        x: 20,
        y: 30,
        block: BLOCK,
    };
    assert_eq!(layout.background_rect(5), Rect::new(15.0, 25.0, 85.0, 55.0));
    assert_eq!(layout.background_rect(0), Rect::new(20.0, 30.0, 80.0, 50.0));
}
