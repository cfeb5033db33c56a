use super::*;
use crate::layout::properties::{Language, Localization};
use crate::text::metrics::MonospaceMeasure;

const FAMILY: &str = "dragalialosten";

fn run(kind: DialogueType, speaker: &str, dialogue: &str) -> Vec<DrawOp> {
    let loc = Localization::builtin();
    let props = loc.get(Language::En).unwrap();
    let form = FormState {
        speaker: speaker.to_owned(),
        dialogue: dialogue.to_owned(),
        dialogue_type: kind,
        ..FormState::default()
    };
    let mut m = MonospaceMeasure::default();
    layout_dialogue(&mut m, props, Canvas::EDITOR, FAMILY, &form).unwrap()
}

fn texts(ops: &[DrawOp]) -> Vec<&TextOp> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
        .collect()
}

#[test]
fn dialogue_type_codes_parse() {
    for t in DialogueType::ALL {
        assert_eq!(t.code().parse::<DialogueType>().unwrap(), t);
    }
    assert!("comic".parse::<DialogueType>().is_err());
    assert_eq!(
        serde_json::to_string(&DialogueType::Narration).unwrap(),
        "\"narration\""
    );
}

#[test]
fn style_table_matches_types() {
    assert_eq!(DialogueType::Standard.style().bar, Some(TextureKey::Bar));
    assert_eq!(DialogueType::Narration.style().bar, Some(TextureKey::Caption));
    assert_eq!(DialogueType::Full.style().bar, Some(TextureKey::Fullscreen));
    assert_eq!(DialogueType::Book.style().background, Some(TextureKey::Book));
    assert_eq!(DialogueType::Book.style().bar, None);
    assert!(DialogueType::Intro.style().layer_shadow);
    assert!(
        DialogueType::ALL
            .iter()
            .filter(|t| **t != DialogueType::Intro)
            .all(|t| !t.style().layer_shadow)
    );
}

#[test]
fn standard_places_name_and_left_aligned_lines() {
    let ops = run(DialogueType::Standard, "Euden", "Hello\nWorld");
    let t = texts(&ops);
    assert_eq!(t.len(), 3);

    assert_eq!(t[0].text, "Euden");
    assert_eq!(t[0].origin, Point::new(80.0, 1024.0));
    assert_eq!(t[0].size_px, 36.0);
    assert_eq!(t[0].color, Rgba8::WHITE);
    assert_eq!(t[0].family, FAMILY);

    assert_eq!(t[1].text, "Hello");
    assert_eq!(t[1].origin, Point::new(64.0, 1104.0));
    assert_eq!(t[1].size_px, 30.0);
    assert_eq!(t[1].color, Rgba8::rgb(0x07, 0x17, 0x26));
    assert_eq!(t[2].origin, Point::new(64.0, 1150.0));
}

#[test]
fn caption_centers_title_and_draws_rule() {
    let ops = run(DialogueType::Caption, "Title", "abcd");
    let t = texts(&ops);
    // 5 chars at 44px * 0.5em = 110px wide.
    assert_eq!(t[0].origin, Point::new(320.0, 400.0));
    assert_eq!(t[0].size_px, 44.0);
    let rule = ops
        .iter()
        .find_map(|op| match op {
            DrawOp::FillRect { rect, color } => Some((*rect, *color)),
            _ => None,
        })
        .unwrap();
    assert_eq!(rule.0, Rect::new(0.0, 430.0, 750.0, 431.0));
    assert_eq!(rule.1, Rgba8::WHITE);
    // 4 chars at 30px = 60px wide.
    assert_eq!(t[1].origin, Point::new(345.0, 490.0));
    assert_eq!(t[1].color, Rgba8::WHITE);
}

#[test]
fn narration_block_is_vertically_centered() {
    let ops = run(DialogueType::Narration, "ignored", "a\nb");
    let t = texts(&ops);
    assert_eq!(t.len(), 2);
    // 667 - (30 + 52) / 2
    assert_eq!(t[0].origin.y, 626.0);
    assert_eq!(t[1].origin.y, 678.0);
    assert!(t.iter().all(|op| op.text != "ignored"));
}

#[test]
fn book_centers_on_canvas_middle() {
    let ops = run(DialogueType::Book, "x", "only");
    let t = texts(&ops);
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].origin.y, 667.0 - 15.0);
    assert_eq!(t[0].color, Rgba8::rgb(0x41, 0x2c, 0x29));
}

#[test]
fn ruby_does_not_move_centered_line() {
    let plain = run(DialogueType::Full, "", "漢字です");
    let ruby = run(DialogueType::Full, "", "(漢字){かんじ}です");
    let p = texts(&plain);
    let r = texts(&ruby);
    assert_eq!(r.len(), 2);
    let line = r[1];
    assert_eq!(line.text, "漢字です");
    assert_eq!(line.origin, p[0].origin);
}

#[test]
fn reading_is_centered_over_base() {
    let ops = run(DialogueType::Standard, "", "ab(漢字){かんじ}");
    let t = texts(&ops);
    let reading = t[1];
    assert_eq!(reading.text, "かんじ");
    assert_eq!(reading.size_px, RUBY_SIZE_PX);
    // base center: 64 + width("ab") 30 + width("漢字") 30 / 2 = 109; reading 22.5 wide.
    assert_eq!(reading.origin, Point::new(109.0 - 11.25, 1104.0 - 30.0 + 2.0));
    assert_eq!(t[2].text, "ab漢字");
}

#[test]
fn intro_banners_are_slanted_about_right_edge() {
    let ops = run(DialogueType::Intro, "Euden", "The\nPrince");
    let t = texts(&ops);
    assert_eq!(t.len(), 2);

    let name = t[0];
    // 5 chars at 84px = 210px; 750 - 210 - 60.
    assert_eq!(name.origin, Point::new(480.0, 1060.0));
    let stroke = name.stroke.unwrap();
    assert_eq!(stroke.width, 8.0);
    assert_eq!(stroke.miter_limit, 2.0);
    assert_eq!(stroke.color, Rgba8::rgb(0x33, 0x33, 0x33));
    assert_eq!(name.color, Rgba8::WHITE);
    let pivot = name.transform * Point::new(750.0, 1060.0);
    assert!((pivot.x - 750.0).abs() < 1e-9 && (pivot.y - 1060.0).abs() < 1e-9);

    let title = t[1];
    assert_eq!(title.text, "The Prince");
    assert_eq!(title.origin.y, 1150.0);
    assert_eq!(title.color, Rgba8::rgb(0x33, 0x33, 0x33));
    assert!(title.stroke.is_none());
}

#[test]
fn centered_block_start_formula() {
    assert_eq!(centered_block_start(100.0, 20.0, 10.0, 1), 90.0);
    assert_eq!(centered_block_start(100.0, 20.0, 10.0, 3), 80.0);
}
