//! Shared fixtures for model tests.

#![allow(dead_code)]

use serde_json::{Value, json};

/// A role as returned by `GET /spaces/{id}/roles/{id}`.
pub fn sample_role() -> Value {
    json!({
        "name": "Developer",
        "description": "Allows reading Entries and managing API Keys",
        "policies": [
            {
                "effect": "allow",
                "actions": ["read"],
                "constraint": {"and": [{"equals": [{"doc": "sys.type"}, "Entry"]}]}
            },
            {
                "effect": "allow",
                "actions": ["read"],
                "constraint": {"and": [{"equals": [{"doc": "sys.type"}, "Asset"]}]}
            },
            {
                "effect": "deny",
                "actions": "all",
                "constraint": {
                    "and": [
                        {"equals": [{"doc": "sys.type"}, "Entry"]},
                        {"paths": [{"doc": "fields.internalNotes.%"}]}
                    ]
                }
            }
        ],
        "permissions": {
            "ContentModel": ["read"],
            "Settings": [],
            "ContentDelivery": "all"
        },
        "sys": {
            "type": "Role",
            "id": "0SUbYs2vZlXjVR6bH6o83O",
            "version": 1,
            "space": {"sys": {"type": "Link", "linkType": "Space", "id": "666"}}
        }
    })
}

/// An editor interface with seven controls; the last three carry typed
/// settings.
pub fn sample_editor_interface() -> Value {
    json!({
        "controls": [
            {"fieldId": "name", "widgetId": "singleLine"},
            {"fieldId": "description", "widgetId": "markdown"},
            {"fieldId": "tags", "widgetId": "tagEditor"},
            {
                "fieldId": "slug",
                "widgetId": "slugEditor",
                "settings": {"helpText": "Generated from the name", "trackingFieldId": "name"}
            },
            {
                "fieldId": "available",
                "widgetId": "boolean",
                "settings": {"helpText": "Is it in stock?", "trueLabel": "yes", "falseLabel": "no"}
            },
            {
                "fieldId": "rating",
                "widgetId": "rating",
                "settings": {"helpText": "How many do you likez?", "numberOfStars": 7}
            },
            {
                "fieldId": "releaseDate",
                "widgetId": "datePicker",
                "settings": {"helpText": "When does it ship?", "format": "time", "ampm": "24"}
            }
        ],
        "sys": {"type": "EditorInterface", "id": "default", "version": 3}
    })
}

/// A content type with a sized text field and a linked asset field.
pub fn sample_content_type() -> Value {
    json!({
        "name": "Product",
        "displayField": "productName",
        "description": null,
        "fields": [
            {
                "id": "productName",
                "name": "Product name",
                "type": "Text",
                "localized": true,
                "required": true,
                "validations": [{"size": {"min": 3, "max": 100}, "message": "3 to 100 characters"}],
                "disabled": false,
                "omitted": false
            },
            {
                "id": "image",
                "name": "Image",
                "type": "Array",
                "localized": false,
                "required": false,
                "items": {
                    "type": "Link",
                    "linkType": "Asset",
                    "validations": [{"linkMimetypeGroup": ["image"]}]
                }
            },
            {
                "id": "brand",
                "name": "Brand",
                "type": "Link",
                "linkType": "Entry",
                "validations": [
                    {"linkContentType": ["brand"]},
                    {"nodes": {"embedded-entry-block": [{"size": {"max": 4}}]}}
                ]
            }
        ],
        "sys": {"type": "ContentType", "id": "2PqfXUJwE8qSYKuM0U6w8M", "version": 3}
    })
}
