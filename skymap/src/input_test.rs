#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Modifiers
// =============================================================

#[test]
fn no_modifiers_keep_unit_step() {
    assert_eq!(Modifiers::default().step_scale(), 1.0);
}

#[test]
fn shift_and_alt_scale_steps() {
    assert_eq!(Modifiers { shift: true, alt: false }.step_scale(), 10.0);
    assert_eq!(Modifiers { shift: false, alt: true }.step_scale(), 0.1);
}

#[test]
fn shift_beats_alt() {
    assert_eq!(Modifiers { shift: true, alt: true }.step_scale(), 10.0);
}

// =============================================================
// Key
// =============================================================

#[test]
fn arrow_keys_map_to_pan_axes() {
    let cases = [
        ("ArrowLeft", (-1.0, 0.0)),
        ("ArrowRight", (1.0, 0.0)),
        ("ArrowUp", (0.0, 1.0)),
        ("ArrowDown", (0.0, -1.0)),
    ];
    for (name, expected) in cases {
        assert_eq!(Key(name.into()).pan_direction(), Some(expected), "{name}");
        assert_eq!(Key(name.into()).zoom_direction(), None, "{name}");
    }
}

#[test]
fn plus_and_minus_zoom_in_opposite_directions() {
    assert_eq!(Key("+".into()).zoom_direction(), Some(-1));
    assert_eq!(Key("=".into()).zoom_direction(), Some(-1));
    assert_eq!(Key("-".into()).zoom_direction(), Some(1));
    assert_eq!(Key("_".into()).zoom_direction(), Some(1));
}

#[test]
fn other_keys_do_nothing() {
    for name in ["a", "Escape", "arrowleft", ""] {
        let key = Key(name.into());
        assert_eq!(key.pan_direction(), None, "{name:?}");
        assert_eq!(key.zoom_direction(), None, "{name:?}");
    }
}

// =============================================================
// InputState
// =============================================================

#[test]
fn gesture_starts_idle() {
    assert_eq!(InputState::default(), InputState::Idle);
}

#[test]
fn panning_states_compare_by_position() {
    let a = InputState::Panning { last_screen: Point::new(3.0, 4.0) };
    let b = InputState::Panning { last_screen: Point::new(3.0, 4.0) };
    let c = InputState::Panning { last_screen: Point::new(3.0, 5.0) };
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(a, InputState::Idle);
}
