use super::*;

fn assert_close(actual: Rgba, expected: Rgba) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-5, "{actual:?} vs {expected:?}");
    }
}

#[test]
fn opaque_foreground_replaces_background() {
    let out = over([0.1, 0.2, 0.3, 1.0], [1.0, 0.0, 0.0, 1.0]);
    assert_close(out, [0.1, 0.2, 0.3, 1.0]);
}

#[test]
fn transparent_foreground_keeps_background() {
    let bg = [0.7, 0.6, 0.5, 0.4];
    assert_close(over([1.0, 1.0, 1.0, 0.0], bg), bg);
}

#[test]
fn half_alpha_interpolates() {
    let out = over([0.0, 0.0, 1.0, 0.5], [1.0, 0.0, 0.0, 1.0]);
    assert_close(out, [0.5, 0.0, 0.5, 1.0]);
}

#[test]
fn transparent_background_color_does_not_leak() {
    let out = over([1.0, 0.0, 0.0, 0.5], [0.0, 0.0, 1.0, 0.0]);
    assert_close(out, [1.0, 0.0, 0.0, 0.5]);
}

#[test]
fn translucent_background_is_weighted_by_its_alpha() {
    // premultiplied: fg 0.5 red, bg 0.5 * 0.5 * 0.5 blue, alpha 0.75
    let out = over([1.0, 0.0, 0.0, 0.5], [0.0, 0.0, 1.0, 0.5]);
    assert_close(out, [0.5 / 0.75, 0.0, 0.25 / 0.75, 0.75]);
}

#[test]
fn both_transparent_is_transparent_black() {
    let out = over([0.3, 0.3, 0.3, 0.0], [0.9, 0.1, 0.4, 0.0]);
    assert_close(out, [0.0, 0.0, 0.0, 0.0]);
}
