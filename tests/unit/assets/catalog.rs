use super::*;
use crate::assets::loader::MemoryAssetLoader;

const BACKGROUNDS: &str = r#"[
    {"type": "background", "fileName": "BG_a.png", "url": "https://x/a.png"},
    {"type": "skybox", "fileName": "SKY_a.png", "url": "https://x/s.png"},
    {"type": "background", "fileName": "BG_b.png", "url": "https://x/b.png"},
    {"type": "background", "fileName": "BG_c.png", "url": "https://x/c.png"}
]"#;

#[test]
fn backgrounds_group_by_type_in_order() {
    let cat = BackgroundCatalog::from_slice(BACKGROUNDS.as_bytes()).unwrap();
    assert_eq!(cat.kinds().collect::<Vec<_>>(), vec!["background", "skybox"]);
    let names: Vec<_> = cat
        .group("background")
        .iter()
        .map(|e| e.file_name.as_str())
        .collect();
    assert_eq!(names, vec!["BG_a.png", "BG_b.png", "BG_c.png"]);
    assert!(cat.group("cloud").is_empty());
}

#[test]
fn background_pages_clamp() {
    let cat = BackgroundCatalog::from_slice(BACKGROUNDS.as_bytes()).unwrap();
    assert_eq!(cat.page("background", 0, 2).len(), 2);
    assert_eq!(cat.page("background", 2, 2).len(), 1);
    assert!(cat.page("background", 9, 2).is_empty());
    assert_eq!(cat.next_page("background", 0, 2), 2);
    assert_eq!(cat.next_page("background", 2, 2), 2);
    assert_eq!(BackgroundCatalog::prev_page(1, 2), 0);
}

#[test]
fn thumbnail_url_appends_file_name() {
    let cat = BackgroundCatalog::from_slice(BACKGROUNDS.as_bytes()).unwrap();
    assert_eq!(
        cat.group("skybox")[0].thumbnail_url(),
        "https://dragalialost.wiki/thumb.php?width=75&f=SKY_a.png"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn broken_catalogs_load_empty() {
    let loader = MemoryAssetLoader::new();
    assert!(BackgroundCatalog::load(&loader).await.is_empty());
    loader.insert(PORTRAIT_DIRECTORY_PATH, "{ nope").unwrap();
    assert!(PortraitDirectory::load(&loader).await.is_empty());
}

#[test]
fn portrait_directory_finds_by_localized_name() {
    let json = r#"{"fileList": {
        "100001_01": {"en": "Euden", "ja": "ユーディル"},
        "100002_01": {"en": "Elisanne"}
    }}"#;
    let dir = PortraitDirectory::from_slice(json.as_bytes()).unwrap();
    assert_eq!(dir.len(), 2);
    assert_eq!(dir.find_by_name(Language::En, "Elisanne"), Some("100002_01"));
    assert_eq!(dir.find_by_name(Language::Ja, "ユーディル"), Some("100001_01"));
    assert_eq!(dir.find_by_name(Language::Ja, "Elisanne"), None);
    assert_eq!(dir.entries(Language::Ja).count(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn portrait_parts_strip_leading_dot_slash() {
    let loader = MemoryAssetLoader::new();
    loader
        .insert(
            "portrait_output/100001_01/data.json",
            r#"{
                "partsData": {
                    "faceParts": ["./portrait_output/100001_01/face/1.png"],
                    "mouthParts": ["portrait_output/100001_01/mouth/1.png"]
                },
                "offset": {"x": 320, "y": 180}
            }"#,
        )
        .unwrap();
    let parts = PortraitParts::load(&loader, "100001_01").await.unwrap();
    assert_eq!(parts.face_parts, vec!["portrait_output/100001_01/face/1.png"]);
    assert_eq!(parts.mouth_parts, vec!["portrait_output/100001_01/mouth/1.png"]);
    assert_eq!(parts.offset, Vec2::new(320.0, 180.0));
    assert_eq!(parts.base(), "portrait_output/100001_01/100001_01_base.png");
    assert_eq!(
        portrait_url(&parts.face_parts[0]),
        "https://dlportraits.space/portrait_output/100001_01/face/1.png"
    );

    assert!(PortraitParts::load(&loader, "missing").await.is_err());
}
