use campusnav_lib::labels::{LABEL_FONT_SIZE_CEILING, LABEL_VISIBILITY_MAX_DELTA};
use campusnav_lib::{is_label_visible, label_font_size, label_style};

#[test]
fn visibility_threshold_is_inclusive() {
    assert!(is_label_visible(LABEL_VISIBILITY_MAX_DELTA));
    assert!(is_label_visible(0.0075));
    assert!(!is_label_visible(0.008));
    assert!(is_label_visible(0.001));
}

#[test]
fn font_size_is_clamped_when_zoomed_in() {
    assert_eq!(label_font_size(0.004), 22.0);
    assert_eq!(label_font_size(0.001), LABEL_FONT_SIZE_CEILING);
}

#[test]
fn font_size_handles_zero_and_invalid_deltas() {
    assert_eq!(label_font_size(0.0), 22.0);
    assert_eq!(label_font_size(-0.01), 22.0);
    assert_eq!(label_font_size(f64::NAN), 22.0);
    assert!(label_font_size(f64::INFINITY).is_finite());
}

#[test]
fn font_size_strictly_decreases_once_below_ceiling() {
    // 25 * 0.004 / delta drops under 22 just past delta = 0.00455.
    let deltas: Vec<f64> = (0..50).map(|step| 0.005 + step as f64 * 0.001).collect();
    for pair in deltas.windows(2) {
        let (wider, narrower) = (label_font_size(pair[1]), label_font_size(pair[0]));
        assert!(wider < narrower, "{} -> {wider}, {} -> {narrower}", pair[1], pair[0]);
    }
    assert!((label_font_size(0.008) - 12.5).abs() < 1e-12);
}

#[test]
fn label_style_combines_both_decisions() {
    let style = label_style(0.01);
    assert!(!style.visible);
    assert!((style.font_size - 10.0).abs() < 1e-12);
}
