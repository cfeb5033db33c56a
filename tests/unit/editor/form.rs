use super::*;

#[test]
fn emotion_none_means_no_balloon() {
    assert_eq!(Emotion::parse_optional("none").unwrap(), None);
    assert_eq!(Emotion::parse_optional("").unwrap(), None);
    assert_eq!(
        Emotion::parse_optional("angry").unwrap().unwrap().as_str(),
        "angry"
    );
}

#[test]
fn emotion_rejects_path_fragments() {
    assert!(Emotion::new("../bar").is_err());
    assert!(Emotion::new("a/b").is_err());
    assert!(Emotion::new("none").is_err());
}

#[test]
fn emotion_side_codes() {
    assert_eq!(EmotionSide::Left.code(), "l");
    assert_eq!("r".parse::<EmotionSide>().unwrap(), EmotionSide::Right);
    assert!("x".parse::<EmotionSide>().is_err());
}

#[test]
fn form_state_parses_from_camel_case_json() {
    let json = r#"{
        "speaker": "Elisanne",
        "dialogue": "Hello\n(世界){せかい}",
        "dialogueType": "caption",
        "language": "ja",
        "emotion": { "emotion": "happy", "side": "r", "offsetY": 12 }
    }"#;
    let form: FormState = serde_json::from_str(json).unwrap();
    assert_eq!(form.dialogue_type, DialogueType::Caption);
    assert_eq!(form.language, Language::Ja);
    assert_eq!(form.lines(), vec!["Hello", "(世界){せかい}"]);
    let emo = form.emotion.unwrap();
    assert_eq!(emo.side, EmotionSide::Right);
    assert_eq!(emo.offset_x, 0.0);
    assert_eq!(emo.offset_y, 12.0);
}

#[test]
fn form_state_rejects_bad_emotion_names() {
    let json = r#"{ "emotion": { "emotion": "../x" } }"#;
    assert!(serde_json::from_str::<FormState>(json).is_err());
}

#[test]
fn empty_dialogue_is_one_empty_line() {
    assert_eq!(FormState::default().lines(), vec![""]);
}
