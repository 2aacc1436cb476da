use huepick::gradient::{Gradient, GradientDirection, GradientError, GradientStop};
use palette::Srgb;

fn hexes(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

fn three_stop() -> Gradient {
    Gradient::from_colors(
        &hexes(&["#ff0000", "#00ff00", "#0000ff"]),
        GradientDirection::ToRight,
    )
    .unwrap()
}

#[test]
fn test_colors_spread_evenly() {
    let positions: Vec<f32> = three_stop().stops().iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0.0, 50.0, 100.0]);
}

#[test]
fn test_single_color_is_flat() {
    let gradient = Gradient::from_colors(&hexes(&["#336699"]), GradientDirection::ToRight).unwrap();
    assert_eq!(gradient.stops().len(), 2);
    assert_eq!(gradient.color_at(0.0), gradient.color_at(100.0));
    assert_eq!(
        gradient.to_css(),
        "linear-gradient(to right, #336699 0%, #336699 100%)"
    );
}

#[test]
fn test_empty_and_invalid_colors() {
    assert_eq!(
        Gradient::from_colors(&[], GradientDirection::ToRight),
        Err(GradientError::Empty)
    );
    assert!(matches!(
        Gradient::from_colors(&hexes(&["#zzzzzz"]), GradientDirection::ToRight),
        Err(GradientError::InvalidColor(_))
    ));
}

#[test]
fn test_to_css() {
    let mut gradient = three_stop();
    assert_eq!(
        gradient.to_css(),
        "linear-gradient(to right, #ff0000 0%, #00ff00 50%, #0000ff 100%)"
    );

    gradient.set_direction(GradientDirection::Angle(135.0));
    gradient.move_stop(1, 33.333).unwrap();
    assert_eq!(
        gradient.to_css(),
        "linear-gradient(135deg, #ff0000 0%, #00ff00 33.33%, #0000ff 100%)"
    );
}

#[test]
fn test_add_stop_keeps_gap() {
    let mut gradient = three_stop();

    assert_eq!(gradient.add_stop("#ffffff", 25.0), Ok(1));
    assert_eq!(gradient.stops().len(), 4);

    assert_eq!(
        gradient.add_stop("#ffffff", 25.5),
        Err(GradientError::StopTooClose(25.5))
    );
    // Exactly the minimum gap is fine
    assert_eq!(gradient.add_stop("#000000", 26.0), Ok(2));

    // Outside the end stops there's nowhere to go
    assert!(gradient.add_stop("#000000", 100.0).is_err());
    assert!(gradient.add_stop("#000000", -5.0).is_err());
}

#[test]
fn test_move_stop_is_clamped_between_neighbours() {
    let mut gradient = three_stop();

    assert_eq!(gradient.move_stop(1, 99.5), Ok(99.0));
    assert_eq!(gradient.move_stop(1, -20.0), Ok(1.0));
    assert_eq!(gradient.move_stop(0, 10.0), Ok(0.0));
    assert_eq!(gradient.move_stop(2, 120.0), Ok(100.0));
    assert_eq!(gradient.move_stop(7, 10.0), Err(GradientError::IndexOutOfRange(7)));

    let positions: Vec<f32> = gradient.stops().iter().map(|s| s.position).collect();
    assert!(positions.windows(2).all(|w| w[1] - w[0] >= 1.0));
}

#[test]
fn test_end_stops_are_protected() {
    let mut gradient = three_stop();

    assert_eq!(gradient.remove_stop(0), Err(GradientError::ProtectedStop(0)));
    assert_eq!(gradient.remove_stop(2), Err(GradientError::ProtectedStop(2)));

    let removed = gradient.remove_stop(1).unwrap();
    assert_eq!(removed.color, "#00ff00");
    assert_eq!(gradient.remove_stop(1), Err(GradientError::ProtectedStop(1)));
}

#[test]
fn test_set_color_normalizes() {
    let mut gradient = three_stop();
    gradient.set_color(1, "white").unwrap();
    assert_eq!(gradient.stops()[1].color, "#ffffff");
    assert_eq!(
        gradient.set_color(3, "#000"),
        Err(GradientError::IndexOutOfRange(3))
    );
}

#[test]
fn test_color_at_interpolates() {
    let gradient = Gradient::from_colors(
        &hexes(&["#000000", "#ffffff"]),
        GradientDirection::ToRight,
    )
    .unwrap();

    assert_eq!(gradient.color_at(0.0), Srgb::new(0, 0, 0));
    assert_eq!(gradient.color_at(100.0), Srgb::new(255, 255, 255));
    assert_eq!(gradient.color_at(50.0), Srgb::new(128, 128, 128));
    assert_eq!(gradient.color_at(-10.0), Srgb::new(0, 0, 0));
    assert_eq!(gradient.color_at(150.0), Srgb::new(255, 255, 255));
}

#[test]
fn test_from_stops_validates() {
    let stops = vec![
        GradientStop {
            color: "#000000".to_string(),
            position: 0.0,
        },
        GradientStop {
            color: "#ffffff".to_string(),
            position: 0.5,
        },
    ];
    assert_eq!(
        Gradient::from_stops(stops, GradientDirection::ToRight),
        Err(GradientError::StopTooClose(0.5))
    );
}

#[test]
fn test_direction_serializes_as_css() {
    let json = serde_json::to_string(&GradientDirection::ToBottomLeft).unwrap();
    assert_eq!(json, "\"to bottom left\"");
    let back: GradientDirection = serde_json::from_str("\"270deg\"").unwrap();
    assert_eq!(back, GradientDirection::Angle(270.0));
}

fn stop(color: &str, position: f32) -> GradientStop {
    GradientStop {
        color: color.to_string(),
        position,
    }
}

#[test]
fn test_move_stop_without_room_stays_put() {
    // Gaps just under the minimum are still accepted as equal to it
    let mut gradient = Gradient::from_stops(
        vec![
            stop("#000000", 0.0),
            stop("#333333", 10.0),
            stop("#666666", 10.99995),
            stop("#999999", 11.9999),
            stop("#ffffff", 100.0),
        ],
        GradientDirection::ToRight,
    )
    .unwrap();

    assert_eq!(gradient.move_stop(2, 11.5), Ok(10.99995));
    assert_eq!(gradient.move_stop(2, 0.0), Ok(10.99995));
    assert_eq!(gradient.stops()[2].position, 10.99995);
}

#[test]
fn test_move_stop_on_densest_gradient() {
    let colors: Vec<String> = (0..101).map(|i| format!("#{:02x}0000", i * 2)).collect();
    let mut gradient = Gradient::from_colors(&colors, GradientDirection::ToRight).unwrap();

    for index in 1..100 {
        let before = gradient.stops()[index].position;
        let applied = gradient.move_stop(index, 50.0).unwrap();
        assert!((applied - before).abs() <= 1e-3, "stop {index} moved to {applied}");
    }
    let positions: Vec<f32> = gradient.stops().iter().map(|s| s.position).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}
