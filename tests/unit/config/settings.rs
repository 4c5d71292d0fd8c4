use super::*;

fn complete() -> Settings {
    Settings {
        unsplash_access_key: "key".to_string(),
        telegram_bot_token: "123:abc".to_string(),
        telegram_chat_id: "42".to_string(),
        ..Settings::default()
    }
}

#[test]
fn defaults_match_documented_values() {
    let s = Settings::default();
    assert_eq!(s.send_time, "07:30");
    assert_eq!(s.http_timeout, Duration::from_secs(30));
    assert_eq!(s.title, "Good Morning!");
    assert_eq!(s.text_color, Rgba8::WHITE);
    assert_eq!(s.run_paths(), RunPaths::in_dir("."));
}

#[test]
fn complete_settings_validate() {
    complete().validate().unwrap();
}

#[test]
fn missing_credentials_are_named() {
    let mut s = complete();
    s.telegram_chat_id = "  ".to_string();
    let err = s.validate().unwrap_err();
    assert!(matches!(err, DaybreakError::Config(_)));
    assert!(err.to_string().contains("TELEGRAM_CHAT_ID"));
}

#[test]
fn bad_send_time_and_timeout_are_rejected() {
    let mut s = complete();
    s.send_time = "25:00".to_string();
    assert!(s.validate().is_err());

    let mut s = complete();
    s.http_timeout = Duration::ZERO;
    assert!(s.validate().is_err());
}

#[test]
fn debug_hides_secrets() {
    let shown = format!("{:?}", complete());
    assert!(!shown.contains("123:abc"));
    assert!(!shown.contains("\"key\""));
    assert!(shown.contains("42"));
}

#[test]
fn explicit_font_goes_first() {
    let mut s = complete();
    s.font = Some(PathBuf::from("/fonts/mine.ttf"));
    let chain = s.font_chain();
    assert_eq!(
        chain.file_sources().next(),
        Some(std::path::Path::new("/fonts/mine.ttf"))
    );
}

#[test]
fn orchestrator_requires_valid_settings() {
    assert!(Settings::default().orchestrator().is_err());
    let orchestrator = complete().orchestrator().unwrap();
    assert_eq!(orchestrator.title(), "Good Morning!");
}
