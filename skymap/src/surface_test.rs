use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn recorded() -> DrawList {
    let style = LineStyle::solid("#fff", 2.0);
    let mut list = DrawList::new();
    list.draw_line(pt(0.0, 0.0), pt(10.0, 10.0), &style);
    list.draw_curve(&[pt(0.0, 0.0), pt(5.0, 2.0), pt(10.0, 0.0)], &style);
    list.draw_closed_curve(&[pt(0.0, 0.0), pt(5.0, 5.0), pt(0.0, 10.0)], &style);
    list.draw_ellipse(pt(50.0, 50.0), 4.0, 4.0, &style);
    list
}

// --- LineStyle ---

#[test]
fn line_style_default_is_solid() {
    let style = LineStyle::default();
    assert!(style.dash.is_empty());
    assert!(style.width > 0.0);
}

#[test]
fn line_style_dashed() {
    let style = LineStyle::dashed("red", 1.5, vec![4.0, 2.0]);
    assert_eq!(style.color, "red");
    assert_eq!(style.dash, vec![4.0, 2.0]);
}

#[test]
fn line_style_dash_defaults_when_missing() {
    let style: LineStyle = serde_json::from_str(r##"{ "color": "#123", "width": 1.0 }"##).unwrap();
    assert!(style.dash.is_empty());
}

// --- DrawList ---

#[test]
fn draw_list_records_in_order() {
    let list = recorded();
    assert_eq!(list.len(), 4);
    assert!(matches!(list.commands[0], DrawCommand::Line { .. }));
    assert!(matches!(list.commands[1], DrawCommand::Curve { .. }));
    assert!(matches!(list.commands[2], DrawCommand::ClosedCurve { .. }));
    assert!(matches!(list.commands[3], DrawCommand::Ellipse { .. }));
}

#[test]
fn draw_list_clear() {
    let mut list = recorded();
    list.clear();
    assert!(list.is_empty());
}

#[test]
fn draw_command_points() {
    let list = recorded();
    assert_eq!(list.commands[0].points(), vec![pt(0.0, 0.0), pt(10.0, 10.0)]);
    assert_eq!(list.commands[1].points().len(), 3);
    assert_eq!(list.commands[3].points(), vec![pt(50.0, 50.0)]);
}

#[test]
fn replay_reproduces_commands() {
    let list = recorded();
    let mut copy = DrawList::new();
    list.replay(&mut copy);
    assert_eq!(copy, list);
}

#[test]
fn to_json_tags_kinds() {
    let json = recorded().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let kinds: Vec<&str> = value["commands"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["line", "curve", "closed_curve", "ellipse"]);
}

#[test]
fn json_round_trip() {
    let list = recorded();
    let back: DrawList = serde_json::from_str(&list.to_json().unwrap()).unwrap();
    assert_eq!(back, list);
}
