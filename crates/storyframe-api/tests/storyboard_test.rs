//! Integration tests for the storyboard endpoint.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use storyframe_test_support::{AGING_SCRIPT, FailingEnricher, TWO_HEADER_SCRIPT};

#[tokio::test]
async fn test_generate_storyboard_returns_camel_case_response() {
    // Arrange
    let app = common::build_test_app();
    let body = common::storyboard_body(TWO_HEADER_SCRIPT);

    // Act
    let (status, json) = common::post_json(app, "/api/storyboard", &body).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let global = &json["globalContinuity"];
    assert!(global["styleGuidance"].is_string());
    let names: Vec<&str> = global["characters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Maria", "João"]);
    assert!(global["visualMotifs"].is_array());
    assert!(global["palette"].is_array());

    let scenes = json["scenes"].as_array().unwrap();
    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0]["id"], "scene-1");
    assert!(!scenes[0]["cameraStyle"].as_str().unwrap().is_empty());
    assert!(scenes[0]["approxDuration"].is_string());
    assert!(scenes[0]["consistencyNotes"].is_array());

    let beat = &scenes[0]["beats"][0];
    assert_eq!(beat["beatId"], "scene-1.1");
    assert_eq!(beat["timecode"], "00:00");
    assert!(beat["visualIdea"].is_string());
    assert!(beat["continuity"]["lighting"].is_string());
    assert!(beat["prompt"].as_str().unwrap().contains("Style:"));
}

#[tokio::test]
async fn test_character_guide_and_contradiction_note() {
    // Arrange
    let app = common::build_test_app();
    let mut body = common::storyboard_body(AGING_SCRIPT);
    body["characterGuide"] = serde_json::json!("Maria: woman with black hair");

    // Act
    let (status, json) = common::post_json(app, "/api/storyboard", &body).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let characters = json["globalContinuity"]["characters"].as_array().unwrap();
    assert_eq!(characters[0]["id"], "char-1");
    assert_eq!(characters[0]["name"], "Maria");
    let notes = json["scenes"][2]["consistencyNotes"].as_array().unwrap();
    assert!(notes.iter().any(|n| n.as_str().unwrap().contains("elderly")));
}

#[tokio::test]
async fn test_blank_title_returns_400_validation_error() {
    let app = common::build_test_app();
    let mut body = common::storyboard_body("Maria waits.");
    body["title"] = serde_json::json!("   ");

    let (status, json) = common::post_json(app, "/api/storyboard", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_blank_script_returns_400_validation_error() {
    let app = common::build_test_app();
    let body = common::storyboard_body(" \n\t ");

    let (status, json) = common::post_json(app, "/api/storyboard", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_punctuation_only_script_returns_400_empty_input() {
    let app = common::build_test_app();
    let body = common::storyboard_body("... --- !!");

    let (status, json) = common::post_json(app, "/api/storyboard", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "empty_input");
}

#[tokio::test]
async fn test_unknown_enum_value_is_rejected_before_the_pipeline() {
    let app = common::build_test_app();
    let mut body = common::storyboard_body("Maria waits.");
    body["visualStyle"] = serde_json::json!("watercolor");

    let (status, _) = common::post_raw(app, "/api/storyboard", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_missing_field_is_rejected_before_the_pipeline() {
    let app = common::build_test_app();
    let mut body = common::storyboard_body("Maria waits.");
    body.as_object_mut().unwrap().remove("tone");

    let (status, _) = common::post_raw(app, "/api/storyboard", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_failing_enricher_still_returns_200() {
    let app = common::build_test_app_with_enricher(Arc::new(FailingEnricher));
    let body = common::storyboard_body(TWO_HEADER_SCRIPT);

    let (status, json) = common::post_json(app, "/api/storyboard", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["scenes"].as_array().unwrap().len(), 2);
}
