use super::*;

fn calculator() -> ColorLevelCalculator {
    ColorLevelCalculator::new(Palette::default(), &HighlightConfig::default())
}

#[test]
fn test_level_for_count() {
    let cases = [(0, 1), (1, 1), (2, 1), (3, 2), (4, 2), (8, 4), (9, 5), (10, 5), (50, 5)];
    for (count, level) in cases {
        assert_eq!(level_for_count(count, 2, 5, 10), level, "count {count}");
    }
}

#[test]
fn test_level_is_monotone_and_bounded() {
    let calc = calculator();
    let mut last = 0;
    for count in 1..=20 {
        let level = calc.level(count);
        assert!(level >= last);
        assert!((1..=5).contains(&level));
        last = level;
    }
}

#[test]
fn test_calculate_highlight_picks_shade_by_level() {
    let calc = calculator();
    let yellow = *Palette::default().get("yellow").unwrap();

    let first = calc.calculate_highlight("yellow", 1, true);
    assert_eq!(first, LevelColor { level: 1, color: yellow.dark[0] });

    let top = calc.calculate_highlight("yellow", 10, false);
    assert_eq!(top, LevelColor { level: 5, color: yellow.light[4] });
}

#[test]
fn test_unknown_base_color_falls_back_to_default() {
    let calc = calculator();
    assert_eq!(
        calc.calculate_highlight("teal", 3, true),
        calc.calculate_highlight("yellow", 3, true)
    );
}

#[test]
fn test_palette_builtin_default() {
    let palette = Palette::builtin("blue");
    assert_eq!(palette.default_id(), "blue");
    assert_eq!(palette.resolve("nope"), palette.get("blue").unwrap());
    assert_eq!(palette.ids().count(), 6);

    let fallback = Palette::builtin("teal");
    assert_eq!(fallback.default_id(), "yellow");
}

#[test]
fn test_parse_hex() {
    assert_eq!(Rgb::parse_hex("#FF8000"), Some(Rgb::new(0xFF, 0x80, 0x00)));
    assert_eq!(Rgb::parse_hex("#abc"), Some(Rgb::new(0xAA, 0xBB, 0xCC)));
    assert_eq!(Rgb::parse_hex("#12345"), None);
    assert_eq!(Rgb::parse_hex("123456"), None);
    assert_eq!(Rgb::parse_hex("#GGGGGG"), None);
    assert_eq!(Rgb::new(0x0A, 0xBC, 0xFF).to_hex(), "#0ABCFF");
}

#[test]
fn test_mix_hex_colors() {
    assert_eq!(
        mix_hex_colors("#FFFFFF", "#000000", 0.5).as_deref(),
        Some("#808080")
    );
    assert_eq!(
        mix_hex_colors("#FF0000", "#0000FF", 1.0).as_deref(),
        Some("#FF0000")
    );
    assert_eq!(
        mix_hex_colors("#FF0000", "#0000FF", 0.0).as_deref(),
        Some("#0000FF")
    );
    assert_eq!(mix_hex_colors("red", "#000000", 0.5), None);
}

#[test]
fn test_dark_context_threshold() {
    let mut calc = calculator();
    assert!(calc.is_dark_context(Rgb::BLACK));
    assert!(!calc.is_dark_context(Rgb::WHITE));

    calc.set_dark_threshold(0.0);
    assert!(!calc.is_dark_context(Rgb::BLACK));
}

#[test]
fn test_build_gradient_stops() {
    let calc = calculator();
    let primary = Rgb::new(0xFF, 0xEE, 0x58);
    let gradient = calc.build_gradient(primary, "yellow", Rgb::BLACK, true);

    let percents: Vec<u8> = gradient.stops.iter().map(|s| s.percent).collect();
    assert_eq!(percents, vec![0, 60, 100]);
    assert_eq!(gradient.stops[0].color, primary.mix(Rgb::BLACK, 0.7));
    assert_eq!(gradient.stops[1].color, gradient.stops[2].color);
    assert!(gradient
        .to_string()
        .starts_with("linear-gradient(to right, #"));
}

#[test]
fn test_style_for_follows_ambient() {
    let calc = calculator();
    let yellow = *Palette::default().get("yellow").unwrap();

    let on_dark_text = calc.style_for("yellow", 1, Rgb::BLACK);
    assert!(on_dark_text.dark_context);
    assert_eq!(on_dark_text.color, yellow.dark[0]);

    let on_light_text = calc.style_for("yellow", 1, Rgb::WHITE);
    assert!(!on_light_text.dark_context);
    assert_eq!(on_light_text.color, yellow.light[0]);
}
