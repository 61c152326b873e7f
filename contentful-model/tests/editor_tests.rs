mod common;

use contentful_model::editor::{self, widget};
use contentful_model::{
    ClockFormat, ControlSettings, DateFormat, EditorInterface, EditorInterfaceControl, Error,
    SettingsShape,
};
use pretty_assertions::assert_eq;
use serde_json::{Map, json};

// ── Decoding ─────────────────────────────────────────────────────

#[test]
fn decodes_sample_interface() {
    let interface: EditorInterface =
        serde_json::from_value(common::sample_editor_interface()).unwrap();
    assert_eq!(interface.controls.len(), 7);

    let name = &interface.controls[0];
    assert_eq!(name.field_id, "name");
    assert_eq!(name.widget_id, widget::SINGLE_LINE);
    assert!(name.settings.is_none());

    let available = interface.controls[4].settings.as_ref().unwrap();
    assert_eq!(
        available.shape,
        SettingsShape::Boolean {
            true_label: Some("yes".into()),
            false_label: Some("no".into()),
        }
    );
    assert_eq!(available.help_text(), Some("Is it in stock?"));

    let rating = interface.controls[5].settings.as_ref().unwrap();
    assert_eq!(
        rating.shape,
        SettingsShape::Rating {
            number_of_stars: Some(7)
        }
    );
    assert_eq!(rating.help_text(), Some("How many do you likez?"));

    let release = interface.control("releaseDate").unwrap();
    assert_eq!(
        release.settings.as_ref().unwrap().shape,
        SettingsShape::DatePicker {
            format: Some(DateFormat::Time),
            clock_format: Some(ClockFormat::TwentyFour),
        }
    );
}

#[test]
fn help_text_is_read_for_every_widget() {
    let interface: EditorInterface =
        serde_json::from_value(common::sample_editor_interface()).unwrap();
    let help: Vec<_> = interface
        .controls
        .iter()
        .filter_map(|c| c.settings.as_ref())
        .map(|s| s.help_text().unwrap_or_default())
        .collect();
    assert_eq!(
        help,
        [
            "Generated from the name",
            "Is it in stock?",
            "How many do you likez?",
            "When does it ship?",
        ]
    );
}

#[test]
fn unregistered_widget_keeps_an_opaque_bag() {
    let settings = editor::decode_settings(
        widget::SLUG_EDITOR,
        &json!({"helpText": "Generated from the name", "trackingFieldId": "name"}),
    )
    .unwrap();

    let mut bag = Map::new();
    bag.insert("trackingFieldId".into(), json!("name"));
    assert_eq!(settings.shape, SettingsShape::Opaque(bag));
    assert_eq!(settings.help_text(), Some("Generated from the name"));
}

#[test]
fn unknown_widget_ids_are_not_errors() {
    let settings =
        editor::decode_settings("my-app-widget", &json!({"theme": "dark", "columns": 3})).unwrap();
    assert_eq!(
        editor::encode_settings(&settings),
        json!({"theme": "dark", "columns": 3})
    );
}

#[test]
fn typed_shapes_drop_unknown_keys() {
    let settings =
        editor::decode_settings(widget::RATING, &json!({"numberOfStars": 3, "color": "gold"}))
            .unwrap();
    assert_eq!(
        editor::encode_settings(&settings),
        json!({"numberOfStars": 3})
    );
}

#[test]
fn empty_settings_decode_to_empty_shape() {
    let settings = editor::decode_settings(widget::BOOLEAN, &json!({})).unwrap();
    assert_eq!(settings, ControlSettings::boolean(None, None));
    assert_eq!(editor::encode_settings(&settings), json!({}));
}

#[test]
fn every_date_format_is_accepted() {
    for (raw, format) in [
        ("dateonly", DateFormat::DateOnly),
        ("time", DateFormat::Time),
        ("timeZ", DateFormat::TimeZ),
    ] {
        let settings =
            editor::decode_settings(widget::DATE_PICKER, &json!({"format": raw})).unwrap();
        assert_eq!(settings, ControlSettings::date_picker(format));
        assert_eq!(format.to_string(), raw);
    }
}

// ── Malformed settings ───────────────────────────────────────────

#[test]
fn rejects_out_of_set_values() {
    for (widget_id, settings) in [
        (widget::DATE_PICKER, json!({"format": "week"})),
        (widget::DATE_PICKER, json!({"ampm": "13"})),
        (widget::RATING, json!({"numberOfStars": -1})),
        (widget::RATING, json!({"numberOfStars": "five"})),
        (widget::BOOLEAN, json!({"trueLabel": true})),
        (widget::SINGLE_LINE, json!({"helpText": 4})),
        (widget::SINGLE_LINE, json!("not an object")),
    ] {
        assert!(
            matches!(
                editor::decode_settings(widget_id, &settings),
                Err(Error::MalformedSettings(_))
            ),
            "accepted {settings} for {widget_id}"
        );
    }
}

#[test]
fn malformed_settings_fail_the_interface() {
    let payload = json!({
        "controls": [
            {"fieldId": "when", "widgetId": "datePicker", "settings": {"format": "week"}}
        ]
    });
    let err = serde_json::from_value::<EditorInterface>(payload).unwrap_err();
    assert!(err.to_string().contains("malformed control settings"), "{err}");
}

// ── Encoding ─────────────────────────────────────────────────────

#[test]
fn request_body_is_byte_exact() {
    let interface = EditorInterface {
        controls: vec![
            EditorInterfaceControl::new("field1", widget::SINGLE_LINE),
            EditorInterfaceControl::new("field2", widget::BOOLEAN)
                .with_settings(
                    ControlSettings::boolean(Some("Truthy".into()), Some("Falsy".into()))
                        .with_help_text("Help me here!"),
                )
                .unwrap(),
        ],
    };
    assert_eq!(
        serde_json::to_string(&interface).unwrap(),
        r#"{"controls":[{"fieldId":"field1","widgetId":"singleLine"},{"fieldId":"field2","widgetId":"boolean","settings":{"trueLabel":"Truthy","falseLabel":"Falsy","helpText":"Help me here!"}}]}"#
    );
}

#[test]
fn date_picker_encodes_format_then_clock() {
    let settings = ControlSettings::from_shape(SettingsShape::DatePicker {
        format: Some(DateFormat::TimeZ),
        clock_format: Some(ClockFormat::Twelve),
    });
    assert_eq!(
        serde_json::to_string(&settings).unwrap(),
        r#"{"format":"timeZ","ampm":"12"}"#
    );
}

#[test]
fn opaque_help_text_is_emitted_last() {
    let mut bag = Map::new();
    bag.insert("helpText".into(), json!("stale"));
    bag.insert("trackingFieldId".into(), json!("title"));
    let settings = ControlSettings::opaque(bag).with_help_text("Slug of the title");
    assert_eq!(
        serde_json::to_string(&settings).unwrap(),
        r#"{"trackingFieldId":"title","helpText":"Slug of the title"}"#
    );
}

#[test]
fn sample_interface_round_trips_without_sys() {
    let mut expected = common::sample_editor_interface();
    expected.as_object_mut().unwrap().remove("sys");
    // Typed settings are re-emitted with shape keys ahead of helpText.
    expected["controls"][4]["settings"] =
        json!({"trueLabel": "yes", "falseLabel": "no", "helpText": "Is it in stock?"});
    expected["controls"][5]["settings"] =
        json!({"numberOfStars": 7, "helpText": "How many do you likez?"});
    expected["controls"][6]["settings"] =
        json!({"format": "time", "ampm": "24", "helpText": "When does it ship?"});
    expected["controls"][3]["settings"] =
        json!({"trackingFieldId": "name", "helpText": "Generated from the name"});

    let interface: EditorInterface =
        serde_json::from_value(common::sample_editor_interface()).unwrap();
    let encoded = serde_json::to_value(&interface).unwrap();
    assert_eq!(
        serde_json::to_string(&encoded).unwrap(),
        serde_json::to_string(&expected).unwrap()
    );
}

// ── Shape and widget agreement ───────────────────────────────────

#[test]
fn with_settings_rejects_mismatched_shape() {
    let err = EditorInterfaceControl::new("stars", widget::RATING)
        .with_settings(ControlSettings::boolean(None, None))
        .unwrap_err();
    match err {
        Error::SettingsMismatch { widget_id, shape } => {
            assert_eq!(widget_id, "rating");
            assert_eq!(shape, "boolean");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opaque_bag_only_fits_unregistered_widgets() {
    assert!(
        EditorInterfaceControl::new("slug", widget::SLUG_EDITOR)
            .with_settings(ControlSettings::opaque(Map::new()))
            .is_ok()
    );
    assert!(matches!(
        EditorInterfaceControl::new("flag", widget::BOOLEAN)
            .with_settings(ControlSettings::opaque(Map::new())),
        Err(Error::SettingsMismatch { .. })
    ));
}

#[test]
fn registry_lists_typed_widgets() {
    assert_eq!(
        editor::registry().discriminators().collect::<Vec<_>>(),
        [widget::BOOLEAN, widget::RATING, widget::DATE_PICKER]
    );
    assert!(!editor::registry().contains(widget::MARKDOWN));

    for settings in [
        ControlSettings::boolean(None, None),
        ControlSettings::rating(5),
        ControlSettings::date_picker(DateFormat::DateOnly),
    ] {
        let widget_id = settings.shape.widget_id().unwrap();
        assert!(editor::registry().contains(widget_id));
        assert!(
            EditorInterfaceControl::new("f", widget_id)
                .with_settings(settings)
                .is_ok()
        );
    }
    assert_eq!(ControlSettings::opaque(Map::new()).shape.widget_id(), None);
}
