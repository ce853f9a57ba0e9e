use chrono::{TimeZone, Utc};
use curriculum_portal::models::{
    Admin, CreateResourceRequest, Curriculum, DeleteResponse, Resource, Sprint, TimelineEntry,
    UpdateCurriculumRequest, UpdateSprintRequest, parse_date,
};
use serde_json::json;
use uuid::Uuid;

// --- Wire Format (camelCase JSON) ---

#[test]
fn test_curriculum_serializes_camel_case() {
    let curriculum = Curriculum {
        id: Uuid::from_u128(1),
        title: "Systems".to_string(),
        domain: "software".to_string(),
        ..Curriculum::default()
    };

    let value = serde_json::to_value(&curriculum).unwrap();

    assert!(value.get("createdAt").is_some());
    assert!(value.get("created_at").is_none());
    assert_eq!(value["title"], "Systems");
}

#[test]
fn test_sprint_serializes_camel_case_fields() {
    let sprint = Sprint {
        sprint_number: Some(3),
        start_date: Some(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()),
        ..Sprint::default()
    };

    let value = serde_json::to_value(&sprint).unwrap();

    assert_eq!(value["sprintNumber"], 3);
    assert!(value.get("startDate").is_some());
    assert!(value.get("projectId").is_some());
    assert!(value.get("sprint_number").is_none());
}

#[test]
fn test_resource_type_keyword_rename() {
    // The Rust field is `resource_type` (type is reserved) but the JSON key
    // must stay "type".
    let resource = Resource {
        label: "Repo".to_string(),
        url: "https://example.com".to_string(),
        resource_type: Some("github".to_string()),
        ..Resource::default()
    };

    let value = serde_json::to_value(&resource).unwrap();
    assert_eq!(value["type"], "github");
    assert!(value.get("resourceType").is_none());

    let parsed: Resource = serde_json::from_value(json!({
        "id": Uuid::from_u128(9),
        "sprintId": Uuid::from_u128(8),
        "label": "Video",
        "url": "https://example.com/v",
        "type": "video",
        "createdAt": "2026-01-01T00:00:00Z"
    }))
    .unwrap();
    assert_eq!(parsed.resource_type.as_deref(), Some("video"));
}

#[test]
fn test_create_resource_request_accepts_type_key() {
    let request: CreateResourceRequest =
        serde_json::from_value(json!({"label": "Doc", "url": "https://d", "type": "doc"})).unwrap();

    assert_eq!(request.resource_type.as_deref(), Some("doc"));
}

#[test]
fn test_admin_never_serializes_password_hash() {
    let admin = Admin {
        id: Uuid::from_u128(1),
        email: "admin@example.com".to_string(),
        password_hash: "$2b$12$secret".to_string(),
        created_at: Utc::now(),
    };

    let value = serde_json::to_value(&admin).unwrap();

    assert!(value.get("password_hash").is_none());
    assert!(value.get("passwordHash").is_none());
    assert_eq!(value["email"], "admin@example.com");
}

#[test]
fn test_timeline_entry_wire_shape() {
    let entry = TimelineEntry {
        sprint_id: Uuid::from_u128(7),
        sprint_title: "Week 3".to_string(),
        project_title: "Kernel".to_string(),
        curriculum_title: "Systems".to_string(),
        resources_count: 4,
        ..TimelineEntry::default()
    };

    let value = serde_json::to_value(&entry).unwrap();

    assert_eq!(value["sprintId"], Uuid::from_u128(7).to_string());
    assert_eq!(value["sprintTitle"], "Week 3");
    assert_eq!(value["projectTitle"], "Kernel");
    assert_eq!(value["curriculumTitle"], "Systems");
    assert_eq!(value["resourcesCount"], 4);
}

#[test]
fn test_delete_response_shape() {
    let response = DeleteResponse {
        success: true,
        message: "Sprint deleted successfully".to_string(),
    };

    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value, json!({"success": true, "message": "Sprint deleted successfully"}));
}

// --- Partial Update Payloads ---

#[test]
fn test_update_request_empty_object_is_all_none() {
    let request: UpdateCurriculumRequest = serde_json::from_value(json!({})).unwrap();

    assert!(request.title.is_none());
    assert!(request.domain.is_none());
    assert!(request.description.is_none());
    assert!(request.icon.is_none());
    assert!(request.color.is_none());
}

#[test]
fn test_update_request_omits_none_fields_on_serialize() {
    let request = UpdateCurriculumRequest {
        title: Some("Renamed".to_string()),
        ..UpdateCurriculumRequest::default()
    };

    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value, json!({"title": "Renamed"}));
}

#[test]
fn test_update_sprint_request_date_strings() {
    let request: UpdateSprintRequest =
        serde_json::from_value(json!({"startDate": "2026-03-01", "sprintNumber": 2})).unwrap();

    assert_eq!(request.start_date.as_deref(), Some("2026-03-01"));
    assert_eq!(request.sprint_number, Some(2));
    assert!(request.title.is_none());
}

// --- Date Parsing ---

#[test]
fn test_parse_date_rfc3339() {
    let parsed = parse_date("2026-03-01T09:30:00+02:00").unwrap();

    assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 1, 7, 30, 0).unwrap());
}

#[test]
fn test_parse_date_plain_date_pins_midnight_utc() {
    let parsed = parse_date("2026-03-01").unwrap();

    assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_parse_date_rejects_other_formats() {
    assert!(parse_date("03/01/2026").is_err());
    assert!(parse_date("not-a-date").is_err());
    assert!(parse_date("").is_err());
}
