use super::*;

#[test]
fn canvas_size_emptiness() {
    assert!(CanvasSize::new(0, 10).is_empty());
    assert!(CanvasSize::new(10, 0).is_empty());
    assert!(!CanvasSize::new(1, 1).is_empty());
}

#[test]
fn fallback_quote_is_fixed() {
    let q = Quote::fallback();
    assert_eq!(q.text, "Stay positive and happy.");
    assert_eq!(q.author, "A well-wisher");
}

#[test]
fn parse_hex_colors() {
    assert_eq!(Rgba8::parse_hex("#ffffff").unwrap(), Rgba8::WHITE);
    assert_eq!(
        Rgba8::parse_hex("10203080").unwrap(),
        Rgba8 {
            r: 0x10,
            g: 0x20,
            b: 0x30,
            a: 0x80
        }
    );
    assert!(Rgba8::parse_hex("#fff").is_err());
    assert!(Rgba8::parse_hex("#gg0000").is_err());
}
