use std::io::Cursor;

use super::*;
use crate::assets::loader::MemoryAssetLoader;
use crate::compile::plan::DropShadow;
use crate::editor::form::{Emotion, EmotionChoice};
use crate::layout::dialogue::DialogueType;

fn png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn art_loader() -> MemoryAssetLoader {
    let loader = MemoryAssetLoader::new();
    for name in [
        "bar", "caption", "book", "fullscreen", "introBack", "introBar", "skipjp", "skipcn",
        "skipen_us", "happy_l", "happy_r",
    ] {
        loader
            .insert(&format!("images/{name}.png"), png(4, 4, [255, 255, 255, 255]))
            .unwrap();
    }
    loader
}

fn form(kind: DialogueType, lang: Language) -> FormState {
    FormState {
        speaker: "Euden".to_owned(),
        dialogue: "Hello".to_owned(),
        dialogue_type: kind,
        language: lang,
        emotion: None,
    }
}

fn snapshot(form: FormState, layers: &LayerStack) -> SceneSnapshot {
    SceneSnapshot::capture(layers, &form, Canvas::EDITOR, Canvas::PREVIEW)
}

fn one_layer() -> LayerStack {
    LayerStack::new(
        "Background",
        Some(Texture::solid(10, 10, [0, 0, 255, 255]).unwrap()),
    )
}

fn image_textures(plan: &ScenePlan) -> Vec<u64> {
    plan.image_ops().map(|op| op.texture.id()).collect()
}

#[test]
fn frame_art_per_type_and_language() {
    let std_en = frame_textures(&form(DialogueType::Standard, Language::En));
    assert_eq!(std_en, vec![TextureKey::Bar]);

    let std_ja = frame_textures(&form(DialogueType::Standard, Language::Ja));
    assert_eq!(std_ja, vec![TextureKey::Bar, TextureKey::Skip(Language::Ja)]);

    let book_en = frame_textures(&form(DialogueType::Book, Language::En));
    assert_eq!(book_en, vec![TextureKey::Book, TextureKey::Skip(Language::En)]);

    let book_zh = frame_textures(&form(DialogueType::Book, Language::ZhHans));
    assert_eq!(
        book_zh,
        vec![TextureKey::Book, TextureKey::Skip(Language::ZhHans)]
    );

    let mut intro = form(DialogueType::Intro, Language::En);
    intro.emotion = Some(EmotionChoice {
        emotion: Emotion::new("happy").unwrap(),
        side: EmotionSide::Left,
        offset_x: 0.0,
        offset_y: 0.0,
    });
    assert_eq!(
        frame_textures(&intro),
        vec![
            TextureKey::IntroBack,
            TextureKey::Emotion {
                emotion: Emotion::new("happy").unwrap(),
                side: EmotionSide::Left
            },
            TextureKey::IntroBar
        ]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn plan_paints_in_fixed_order() {
    let loader = art_loader();
    let composer = Composer::new(Localization::builtin(), ComposerOpts::default());
    let layers = one_layer();
    let layer_tex = layers.active().image.clone().unwrap();

    let f = form(DialogueType::Book, Language::Ja);
    composer
        .textures()
        .preload(&loader, &frame_textures(&f))
        .await
        .unwrap();
    let plan = composer.plan(&snapshot(f, &layers)).unwrap();

    let book = composer.textures().get(&TextureKey::Book).unwrap();
    let skip = composer
        .textures()
        .get(&TextureKey::Skip(Language::Ja))
        .unwrap();
    assert_eq!(
        image_textures(&plan),
        vec![book.id(), layer_tex.id(), skip.id()]
    );
    // Text comes last.
    assert!(matches!(plan.ops.last(), Some(DrawOp::Text(_))));
    assert_eq!(plan.text_ops().next().unwrap().family, "dragalialostja");
}

#[tokio::test(flavor = "current_thread")]
async fn intro_layers_cast_shadow_and_others_do_not() {
    let loader = art_loader();
    let composer = Composer::new(Localization::builtin(), ComposerOpts::default());
    let layers = one_layer();

    for (kind, shadow) in [
        (DialogueType::Intro, Some(DropShadow::INTRO)),
        (DialogueType::Standard, None),
    ] {
        let f = form(kind, Language::En);
        composer
            .textures()
            .preload(&loader, &frame_textures(&f))
            .await
            .unwrap();
        let plan = composer.plan(&snapshot(f, &layers)).unwrap();
        let layer_op = plan
            .image_ops()
            .find(|op| op.texture.same_as(layers.active().image.as_ref().unwrap()))
            .unwrap();
        assert_eq!(layer_op.shadow, shadow);
        // Frame art never casts a shadow.
        assert_eq!(plan.image_ops().filter(|op| op.shadow.is_some()).count(), usize::from(shadow.is_some()));
    }
}

#[tokio::test(flavor = "current_thread")]
async fn emotion_is_anchored_from_its_side() {
    let loader = art_loader();
    let composer = Composer::new(Localization::builtin(), ComposerOpts::default());
    let layers = one_layer();
    let mut f = form(DialogueType::Standard, Language::En);
    f.emotion = Some(EmotionChoice {
        emotion: Emotion::new("happy").unwrap(),
        side: EmotionSide::Right,
        offset_x: 5.0,
        offset_y: 10.0,
    });
    composer
        .textures()
        .preload(&loader, &frame_textures(&f))
        .await
        .unwrap();
    let plan = composer.plan(&snapshot(f, &layers)).unwrap();
    let balloon = plan.image_ops().nth(1).unwrap();
    assert_eq!(balloon.dest.center(), Point::new(750.0 - 180.0 + 5.0, 250.0 - 10.0));
    assert!(balloon.shadow.is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn compose_renders_frame_and_preview() {
    let loader = art_loader();
    let composer = Composer::new(Localization::builtin(), ComposerOpts::default());
    let layers = one_layer();
    let out = composer
        .compose(&loader, snapshot(form(DialogueType::Standard, Language::En), &layers))
        .await
        .unwrap()
        .rendered()
        .unwrap();
    assert_eq!((out.frame.width, out.frame.height), (750, 1334));
    assert_eq!((out.preview.width, out.preview.height), (375, 667));
    // Layer is centered on the canvas.
    assert_eq!(out.frame.pixel(375, 667), Some([0, 0, 255, 255]));
    assert_eq!(composer.state(), ComposeState::Idle);
    assert_eq!(loader.load_count("images/bar.png"), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn missing_art_fails_pass_and_releases_latch() {
    let loader = MemoryAssetLoader::new();
    let composer = Composer::new(Localization::builtin(), ComposerOpts::default());
    let layers = one_layer();
    let err = composer
        .compose(&loader, snapshot(form(DialogueType::Caption, Language::En), &layers))
        .await
        .unwrap_err();
    assert!(matches!(err, VnframeError::Asset(_)));
    assert_eq!(composer.state(), ComposeState::Idle);
}

#[tokio::test(flavor = "current_thread")]
async fn missing_fonts_are_counted_not_fatal() {
    let loader = MemoryAssetLoader::new();
    let composer = Composer::new(Localization::builtin(), ComposerOpts::default());
    assert_eq!(composer.load_fonts(&loader, &Language::ALL).await, 0);
    assert_eq!(loader.load_count("fonts/dragalialosten.ttf"), 1);
}
