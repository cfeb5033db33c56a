use std::io::Cursor;

use super::*;
use crate::assets::loader::MemoryAssetLoader;

fn png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn px(tex: &Texture, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * tex.width() + x) * 4) as usize;
    let d = tex.data();
    [d[i], d[i + 1], d[i + 2], d[i + 3]]
}

fn parts(offset: Vec2) -> PortraitParts {
    PortraitParts {
        character: "c1".to_owned(),
        face_parts: vec!["p/face.png".to_owned()],
        mouth_parts: vec!["p/mouth.png".to_owned()],
        offset,
    }
}

#[test]
fn compose_places_parts_at_shared_offset() {
    let base = Texture::solid(4, 4, [255, 0, 0, 255]).unwrap();
    let face = Texture::solid(2, 2, [0, 255, 0, 255]).unwrap();
    let mouth = Texture::solid(1, 1, [0, 0, 255, 255]).unwrap();

    let out = compose_portrait(&base, Some(&face), Some(&mouth), Vec2::new(10.0, 20.0)).unwrap();
    assert_eq!((out.width(), out.height()), (PORTRAIT_SIZE, PORTRAIT_SIZE));
    assert_eq!(px(&out, 0, 0), [255, 0, 0, 255]);
    assert_eq!(px(&out, 10, 20), [0, 0, 255, 255]);
    assert_eq!(px(&out, 11, 21), [0, 255, 0, 255]);
    assert_eq!(px(&out, 5, 5), [0, 0, 0, 0]);
}

#[test]
fn compose_clips_parts_outside_buffer() {
    let base = Texture::solid(1, 1, [0, 0, 0, 255]).unwrap();
    let face = Texture::solid(4, 4, [0, 255, 0, 255]).unwrap();
    let out = compose_portrait(&base, Some(&face), None, Vec2::new(1022.0, -2.0)).unwrap();
    assert_eq!(px(&out, 1023, 0), [0, 255, 0, 255]);
    assert_eq!(px(&out, 1023, 2), [0, 0, 0, 0]);
}

#[test]
fn part_picks_need_a_character() {
    let mut state = PortraitState::new();
    assert!(state.set_face(Some("p/face.png".to_owned())).is_none());
    let req = state.select_character(&parts(Vec2::ZERO));
    assert!(state.is_current(req.generation()));
    assert_eq!(req.selection().base, "portrait_output/c1/c1_base.png");
    assert_eq!(req.selection().face, None);
}

#[tokio::test(flavor = "current_thread")]
async fn stale_results_are_discarded() {
    let loader = MemoryAssetLoader::new();
    loader
        .insert("portrait_output/c1/c1_base.png", png(2, 2, [9, 9, 9, 255]))
        .unwrap();
    loader.insert("p/face.png", png(1, 1, [0, 255, 0, 255])).unwrap();

    let mut state = PortraitState::new();
    let first = state.select_character(&parts(Vec2::new(1.0, 1.0)));
    let second = state
        .set_face(Some("p/face.png".to_owned()))
        .unwrap();
    assert!(second.generation() > first.generation());

    // The newer request finishes first; the older one must not overwrite it.
    let newer = second.run(&loader).await;
    let older = first.run(&loader).await;

    let applied = state.accept(newer).unwrap().unwrap();
    assert_eq!(px(&applied, 1, 1), [0, 255, 0, 255]);
    assert!(state.accept(older).unwrap().is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn current_failures_surface_as_errors() {
    let loader = MemoryAssetLoader::new();
    let mut state = PortraitState::new();
    let req = state.select_character(&parts(Vec2::ZERO));
    let res = req.run(&loader).await;
    assert!(state.accept(res).is_err());

    let req = state.select_character(&parts(Vec2::ZERO));
    let res = req.run(&loader).await;
    state.reset();
    assert!(state.accept(res).unwrap().is_none());
}
