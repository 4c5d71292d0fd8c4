use super::*;

#[test]
fn explicit_path_comes_first() {
    let dir = tempfile::tempdir().unwrap();
    let explicit = dir.path().join("mine.ttf");
    let other = dir.path().join("other.ttf");
    std::fs::write(&explicit, b"explicit").unwrap();
    std::fs::write(&other, b"other").unwrap();

    let chain = FontChain::new()
        .with_candidates(vec![other])
        .with_explicit(&explicit)
        .without_host_fonts();

    let font = chain.resolve().unwrap();
    assert_eq!(font.bytes.as_slice(), b"explicit");
    assert_eq!(font.source, explicit.display().to_string());
}

#[test]
fn missing_and_empty_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty.ttf");
    let good = dir.path().join("good.ttf");
    std::fs::write(&empty, b"").unwrap();
    std::fs::write(&good, b"font").unwrap();

    let chain = FontChain::new()
        .with_candidates(vec![dir.path().join("missing.ttf"), empty, good.clone()])
        .without_host_fonts();

    let font = chain.resolve().unwrap();
    assert_eq!(font.bytes.as_slice(), b"font");
    assert_eq!(font.index, 0);
}

#[test]
fn exhausted_chain_is_a_layout_error() {
    let chain = FontChain::new()
        .with_candidates(vec![PathBuf::from("/definitely/not/here.ttf")])
        .without_host_fonts();

    assert!(matches!(chain.resolve(), Err(DaybreakError::Layout(_))));
    assert!(matches!(chain.fallback(), Err(DaybreakError::Layout(_))));
}

#[test]
fn file_sources_order() {
    let chain = FontChain::new()
        .with_candidates(vec![PathBuf::from("b.ttf"), PathBuf::from("c.ttf")])
        .with_explicit("a.ttf");
    let order: Vec<_> = chain.file_sources().map(Path::to_path_buf).collect();
    assert_eq!(
        order,
        vec![
            PathBuf::from("a.ttf"),
            PathBuf::from("b.ttf"),
            PathBuf::from("c.ttf")
        ]
    );
}

#[test]
fn platform_candidates_are_absolute() {
    for path in platform_font_candidates() {
        assert!(
            path.is_absolute() || path.to_string_lossy().contains(":/"),
            "{}",
            path.display()
        );
    }
}
