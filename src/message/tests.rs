use super::*;
use serde_json::json;

#[test]
fn basic_text_message() {
    let message = Message::text("body");
    assert_eq!(message.to_json(), json!({ "type": "text", "body": "body" }));
}

#[test]
fn text_message_with_suggested_responses() {
    let message = Message::text("body")
        .add_text_response("A")
        .add_text_response("B")
        .add_text_response("C");

    assert_eq!(
        message.to_json(),
        json!({
            "type": "text",
            "body": "body",
            "keyboards": [{
                "type": "suggested",
                "responses": [
                    { "type": "text", "body": "A" },
                    { "type": "text", "body": "B" },
                    { "type": "text", "body": "C" }
                ]
            }]
        })
    );
}

#[test]
fn suggested_responses_with_multi_add() {
    let message = Message::text("body").add_text_responses(["A", "B", "C"]);

    assert_eq!(
        message.to_json(),
        json!({
            "type": "text",
            "body": "body",
            "keyboards": [{
                "type": "suggested",
                "responses": [
                    { "type": "text", "body": "A" },
                    { "type": "text", "body": "B" },
                    { "type": "text", "body": "C" }
                ]
            }]
        })
    );
}

#[test]
fn response_keyboard_with_target_and_hidden() {
    let message = Message::text("body").add_response_keyboard(
        vec!["A", "B", "C"],
        Some(true),
        Some("sometestguy"),
    );

    assert_eq!(
        message.to_json(),
        json!({
            "type": "text",
            "body": "body",
            "keyboards": [{
                "type": "suggested",
                "to": "sometestguy",
                "hidden": true,
                "responses": [
                    { "type": "text", "body": "A" },
                    { "type": "text", "body": "B" },
                    { "type": "text", "body": "C" }
                ]
            }]
        })
    );
}

#[test]
fn response_keyboard_with_single_response() {
    let message =
        Message::text("body").add_response_keyboard("A", Some(true), Some("sometestguy"));

    assert_eq!(
        message.to_json(),
        json!({
            "type": "text",
            "body": "body",
            "keyboards": [{
                "type": "suggested",
                "to": "sometestguy",
                "hidden": true,
                "responses": [{ "type": "text", "body": "A" }]
            }]
        })
    );
}

#[test]
fn response_keyboard_without_target() {
    let message = Message::text("body").add_response_keyboard(
        vec![Response::text("A"), Response::text("B")],
        Some(true),
        None,
    );

    assert_eq!(
        message.to_json(),
        json!({
            "type": "text",
            "body": "body",
            "keyboards": [{
                "type": "suggested",
                "hidden": true,
                "responses": [
                    { "type": "text", "body": "A" },
                    { "type": "text", "body": "B" }
                ]
            }]
        })
    );
}

#[test]
fn response_keyboard_without_hidden() {
    let message = Message::text("body").add_response_keyboard(vec!["A", "B", "C"], None, None);

    assert_eq!(
        message.to_json(),
        json!({
            "type": "text",
            "body": "body",
            "keyboards": [{
                "type": "suggested",
                "responses": [
                    { "type": "text", "body": "A" },
                    { "type": "text", "body": "B" },
                    { "type": "text", "body": "C" }
                ]
            }]
        })
    );
}

#[test]
fn same_target_keyboards_merge_in_call_order() {
    let message = Message::text("body")
        .add_response_keyboard(vec!["A", "B", "C"], Some(true), Some("sometestguy"))
        .add_response_keyboard(vec!["D", "E", "F"], Some(true), Some("sometestguy"));

    assert_eq!(
        message.to_json(),
        json!({
            "type": "text",
            "body": "body",
            "keyboards": [{
                "type": "suggested",
                "to": "sometestguy",
                "hidden": true,
                "responses": [
                    { "type": "text", "body": "A" },
                    { "type": "text", "body": "B" },
                    { "type": "text", "body": "C" },
                    { "type": "text", "body": "D" },
                    { "type": "text", "body": "E" },
                    { "type": "text", "body": "F" }
                ]
            }]
        })
    );
}

#[test]
fn distinct_targets_get_distinct_keyboards() {
    let message = Message::text("body")
        .add_response_keyboard(vec!["A", "B", "C"], Some(true), Some("sometestguy"))
        .add_response_keyboard(vec!["G", "H", "I"], Some(true), Some("sometestguy2"))
        .add_response_keyboard(vec!["D", "E", "F"], Some(true), Some("sometestguy"));

    assert_eq!(
        message.to_json(),
        json!({
            "type": "text",
            "body": "body",
            "keyboards": [{
                "type": "suggested",
                "to": "sometestguy",
                "hidden": true,
                "responses": [
                    { "type": "text", "body": "A" },
                    { "type": "text", "body": "B" },
                    { "type": "text", "body": "C" },
                    { "type": "text", "body": "D" },
                    { "type": "text", "body": "E" },
                    { "type": "text", "body": "F" }
                ]
            }, {
                "type": "suggested",
                "to": "sometestguy2",
                "hidden": true,
                "responses": [
                    { "type": "text", "body": "G" },
                    { "type": "text", "body": "H" },
                    { "type": "text", "body": "I" }
                ]
            }]
        })
    );
}

#[test]
fn friend_picker_response_keyboard() {
    let message = Message::text("body").add_response_keyboard(
        Response::friend_picker(
            Some("A".to_string()),
            Some(4),
            Some(5),
            Some(vec!["foo".to_string()]),
        ),
        Some(true),
        Some("sometestguy"),
    );

    assert_eq!(
        message.to_json(),
        json!({
            "type": "text",
            "body": "body",
            "keyboards": [{
                "type": "suggested",
                "to": "sometestguy",
                "hidden": true,
                "responses": [{
                    "type": "friend-picker",
                    "body": "A",
                    "min": 4,
                    "max": 5,
                    "preselected": ["foo"]
                }]
            }]
        })
    );
}

#[test]
fn mixed_response_kinds_in_one_keyboard() {
    let message = Message::text("body").add_response_keyboard(
        vec![
            Response::friend_picker(
                Some("A".to_string()),
                Some(4),
                Some(5),
                Some(vec!["foo".to_string()]),
            ),
            Response::text("B"),
        ],
        Some(true),
        Some("sometestguy"),
    );

    assert_eq!(
        message.to_json(),
        json!({
            "type": "text",
            "body": "body",
            "keyboards": [{
                "type": "suggested",
                "to": "sometestguy",
                "hidden": true,
                "responses": [
                    {
                        "type": "friend-picker",
                        "body": "A",
                        "min": 4,
                        "max": 5,
                        "preselected": ["foo"]
                    },
                    { "type": "text", "body": "B" }
                ]
            }]
        })
    );
}

// A friend picker built with no arguments keeps every optional field as an
// explicit null in the serialized form. This mirrors the platform's
// absent-value sentinel and is the one place the omit-unset rule does not
// apply.
#[test]
fn friend_picker_without_arguments_serializes_explicit_nulls() {
    let message = Message::text("body").add_response_keyboard(
        Response::friend_picker(None, None, None, None),
        Some(true),
        Some("sometestguy"),
    );

    assert_eq!(
        message.to_json(),
        json!({
            "type": "text",
            "body": "body",
            "keyboards": [{
                "type": "suggested",
                "to": "sometestguy",
                "hidden": true,
                "responses": [{
                    "type": "friend-picker",
                    "body": null,
                    "min": null,
                    "max": null,
                    "preselected": null
                }]
            }]
        })
    );
}

#[test]
fn is_typing_construction() {
    let message = Message::is_typing(true);

    assert_eq!(message.typing(), Some(true));
    assert!(message.is_is_typing_message());
    assert_eq!(
        message.to_json(),
        json!({ "type": "is-typing", "isTyping": true })
    );
}

#[test]
fn read_receipt_construction() {
    let message =
        Message::read_receipt(vec!["6d8d060c-3ae4-46fc-bb18-6e7ba3182c0f".to_string()]);

    assert!(message.is_read_receipt_message());
    assert_eq!(
        message.to_json(),
        json!({
            "type": "read-receipt",
            "messageIds": ["6d8d060c-3ae4-46fc-bb18-6e7ba3182c0f"]
        })
    );
}

#[test]
fn everything_on_a_picture() {
    let message = Message::picture("http://i.imgur.com/8QP4ZFt.jpg")
        .set_no_forward(true)
        .set_delay(0)
        .set_type_time(12)
        .set_attribution_name("Imgur")
        .set_attribution_icon("http://s.imgur.com/images/favicon-96x96.png");

    assert_eq!(message.pic_url(), Some("http://i.imgur.com/8QP4ZFt.jpg"));
    assert_eq!(message.no_forward(), Some(true));
    assert_eq!(message.delay(), Some(0));
    assert_eq!(message.type_time(), Some(12));
    assert_eq!(message.attribution_name(), Some("Imgur"));
    assert_eq!(
        message.attribution_icon(),
        Some("http://s.imgur.com/images/favicon-96x96.png")
    );
    assert!(message.is_picture_message());

    assert_eq!(
        message.to_json(),
        json!({
            "type": "picture",
            "picUrl": "http://i.imgur.com/8QP4ZFt.jpg",
            "noForward": true,
            "attribution": {
                "name": "Imgur",
                "iconUrl": "http://s.imgur.com/images/favicon-96x96.png"
            },
            "typeTime": 12,
            "delay": 0
        })
    );
}

#[test]
fn everything_on_a_video() {
    let message = Message::video("http://i.imgur.com/XAFz40E.mp4")
        .set_loop(true)
        .set_muted(true)
        .set_autoplay(true)
        .set_no_save(true)
        .set_attribution_name("Imgur")
        .set_attribution_icon("http://s.imgur.com/images/favicon-96x96.png");

    assert_eq!(message.video_url(), Some("http://i.imgur.com/XAFz40E.mp4"));
    assert_eq!(message.looping(), Some(true));
    assert_eq!(message.muted(), Some(true));
    assert_eq!(message.autoplay(), Some(true));
    assert_eq!(message.no_save(), Some(true));
    assert!(message.is_video_message());

    assert_eq!(
        message.to_json(),
        json!({
            "type": "video",
            "videoUrl": "http://i.imgur.com/XAFz40E.mp4",
            "attribution": {
                "name": "Imgur",
                "iconUrl": "http://s.imgur.com/images/favicon-96x96.png"
            },
            "loop": true,
            "muted": true,
            "autoplay": true,
            "noSave": true
        })
    );
}

#[test]
fn everything_on_a_link() {
    let message = Message::link("http://imgur.com/8QP4ZFt")
        .set_pic_url("http://i.imgur.com/8QP4ZFt.jpg")
        .set_title("Cute Dog")
        .set_text("Elvis")
        .set_kik_js_data(json!({ "abc": 123 }))
        .set_attribution_name("Imgur")
        .set_attribution_icon("http://s.imgur.com/images/favicon-96x96.png");

    assert_eq!(message.url(), Some("http://imgur.com/8QP4ZFt"));
    assert_eq!(message.pic_url(), Some("http://i.imgur.com/8QP4ZFt.jpg"));
    assert_eq!(message.title(), Some("Cute Dog"));
    assert_eq!(message.link_text(), Some("Elvis"));
    assert_eq!(message.kik_js_data(), Some(&json!({ "abc": 123 })));
    assert!(message.is_link_message());

    assert_eq!(
        message.to_json(),
        json!({
            "type": "link",
            "attribution": {
                "name": "Imgur",
                "iconUrl": "http://s.imgur.com/images/favicon-96x96.png"
            },
            "kikJsData": { "abc": 123 },
            "title": "Cute Dog",
            "text": "Elvis",
            "url": "http://imgur.com/8QP4ZFt",
            "picUrl": "http://i.imgur.com/8QP4ZFt.jpg"
        })
    );
}

#[test]
fn parses_stickers() {
    let message = Message::from_json(json!({
        "type": "sticker",
        "id": "6d8d060c-3ae4-46fc-bb18-6e7ba3182c0f",
        "timestamp": 123821943124i64,
        "from": "atestuser",
        "stickerPackId": "memes",
        "stickerUrl": "http://cards-sticker-dev.herokuapp.com/stickers/memes/okay.png",
        "readReceiptRequested": true
    }))
    .unwrap();

    assert!(message.is_sticker_message());
    assert_eq!(message.sticker_pack_id(), Some("memes"));
    assert_eq!(
        message.sticker_url(),
        Some("http://cards-sticker-dev.herokuapp.com/stickers/memes/okay.png")
    );
    assert_eq!(message.id(), Some("6d8d060c-3ae4-46fc-bb18-6e7ba3182c0f"));
    assert_eq!(message.read_receipt_requested(), Some(true));
    assert_eq!(message.timestamp(), Some(123821943124));
}

#[test]
fn parses_scan_data() {
    let message = Message::from_json(json!({
        "type": "scan-data",
        "from": "atestuser",
        "id": "6d8d060c-3ae4-46fc-bb18-6e7ba3182c0f",
        "timestamp": 1399303478832i64,
        "data": "{\"store_id\": \"2538\"}"
    }))
    .unwrap();

    assert!(message.is_scan_data_message());
    assert_eq!(message.scan_data(), Some("{\"store_id\": \"2538\"}"));
}

#[test]
fn parses_participants() {
    let message = Message::from_json(json!({
        "type": "text",
        "from": "atestuser",
        "id": "6d8d060c-3ae4-46fc-bb18-6e7ba3182c0f",
        "timestamp": 1399303478832i64,
        "participants": ["sometestguy", "sometestguy2"],
        "body": "Test"
    }))
    .unwrap();

    assert!(message.is_text_message());
    assert_eq!(
        message.participants(),
        Some(&["sometestguy".to_string(), "sometestguy2".to_string()][..])
    );
}

#[test]
fn parses_mentions() {
    let message = Message::from_json(json!({
        "type": "text",
        "from": "atestuser",
        "id": "6d8d060c-3ae4-46fc-bb18-6e7ba3182c0f",
        "timestamp": 1399303478832i64,
        "mention": "yourbot",
        "body": "Test"
    }))
    .unwrap();

    assert!(message.is_text_message());
    assert!(message.is_mention());
    assert_eq!(message.mention(), Some("yourbot"));
}

#[test]
fn parses_delivery_receipts() {
    let message = Message::from_json(json!({
        "type": "delivery-receipt",
        "from": "atestuser",
        "id": "9a8764cb-3ae4-46fc-bb18-9871decfa11a",
        "messageIds": [
            "859537ca-3ae4-46fc-bb18-6e7ba3182c0f",
            "6d8d060c-3ae4-46fc-bb18-6e7ba3182c0f"
        ],
        "timestamp": 1399303478832i64,
        "readReceiptRequested": false
    }))
    .unwrap();

    assert!(message.is_delivery_receipt_message());
    assert_eq!(
        message.message_ids(),
        Some(
            &[
                "859537ca-3ae4-46fc-bb18-6e7ba3182c0f".to_string(),
                "6d8d060c-3ae4-46fc-bb18-6e7ba3182c0f".to_string()
            ][..]
        )
    );
}

#[test]
fn rejects_unknown_type_discriminant() {
    let err = Message::from_json(json!({ "type": "carrier-pigeon", "body": "hi" }));
    assert!(matches!(err, Err(crate::errors::BotError::Decode(_))));
}

#[test]
fn exactly_one_predicate_per_kind() {
    let kinds = [
        "text",
        "link",
        "picture",
        "video",
        "sticker",
        "is-typing",
        "read-receipt",
        "delivery-receipt",
        "scan-data",
        "start-chatting",
        "friend-picker",
    ];

    for kind in kinds {
        let message = Message::from_json(json!({ "type": kind })).unwrap();
        let predicates = [
            message.is_text_message(),
            message.is_link_message(),
            message.is_picture_message(),
            message.is_video_message(),
            message.is_sticker_message(),
            message.is_is_typing_message(),
            message.is_read_receipt_message(),
            message.is_delivery_receipt_message(),
            message.is_scan_data_message(),
            message.is_start_chatting_message(),
            message.is_friend_picker_message(),
        ];
        assert_eq!(
            predicates.iter().filter(|p| **p).count(),
            1,
            "kind {kind} should satisfy exactly one predicate"
        );
        assert_eq!(message.message_type().as_str(), kind);
    }
}

// Field presence, not just values, must survive a parse→serialize round
// trip: absent optional fields stay absent.
#[test]
fn round_trip_preserves_field_presence() {
    let samples = [
        json!({ "type": "text", "body": "Test", "from": "testuser1" }),
        json!({
            "type": "text",
            "from": "atestuser",
            "id": "6d8d060c-3ae4-46fc-bb18-6e7ba3182c0f",
            "timestamp": 1399303478832i64,
            "participants": ["a", "b"],
            "chatId": "3652a09b4be84006ac56-5d8b31464078",
            "body": "Test"
        }),
        json!({ "type": "picture", "picUrl": "http://i.imgur.com/MxnW5UM.jpg" }),
        json!({
            "type": "video",
            "videoUrl": "http://i.imgur.com/XAFz40E.mp4",
            "loop": true,
            "muted": false
        }),
        json!({ "type": "link", "url": "http://imgur.com", "kikJsData": { "abc": 123 } }),
        json!({ "type": "sticker", "stickerPackId": "memes" }),
        json!({ "type": "is-typing", "isTyping": false }),
        json!({ "type": "read-receipt", "messageIds": ["x"] }),
        json!({ "type": "delivery-receipt", "messageIds": [] }),
        json!({ "type": "scan-data", "data": "{}" }),
        json!({ "type": "start-chatting" }),
        json!({ "type": "friend-picker", "picked": ["sometestguy"] }),
    ];

    for sample in samples {
        let parsed = Message::from_json(sample.clone()).unwrap();
        assert_eq!(parsed.to_json(), sample);
    }
}

#[test]
fn serialize_parse_serialize_is_stable() {
    let message = Message::text("body")
        .set_delay(5)
        .add_response_keyboard(
            Response::friend_picker(None, Some(1), None, None),
            None,
            Some("sometestguy"),
        );

    let once = message.to_json();
    let twice = Message::from_json(once.clone()).unwrap().to_json();
    assert_eq!(once, twice);
}

#[test]
fn setters_for_other_kinds_are_inert() {
    let message = Message::text("body").set_loop(true).set_no_forward(true);
    assert_eq!(message.to_json(), json!({ "type": "text", "body": "body" }));
}

#[test]
fn from_str_builds_text_message() {
    let message: Message = "Complete".into();
    assert!(message.is_text_message());
    assert_eq!(message.text_body(), Some("Complete"));
}
