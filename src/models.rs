use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// Admin
///
/// The single operator identity stored in the `admins` table. Admins are
/// seeded out-of-band (see `src/bin/create_admin.rs`) and never created,
/// updated, or deleted through the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    // bcrypt hash; never serialized out to clients (the API only returns tokens).
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Curriculum
///
/// Top-level learning track from the `curricula` table. Root of the
/// Curriculum → Project → Sprint → Resource ownership chain.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Curriculum {
    pub id: Uuid,
    pub title: String,
    pub domain: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Project
///
/// A body of work within a curriculum (`projects` table).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Project {
    pub id: Uuid,
    // FK to curricula.id (owning parent).
    pub curriculum_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Sprint
///
/// A time-boxed unit of a project (`sprints` table). `sprint_number` is
/// optional and NOT unique within a project; duplicates are permitted.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sprint {
    pub id: Uuid,
    // FK to projects.id (owning parent).
    pub project_id: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub sprint_number: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Resource
///
/// A link/reference attached to a sprint (`resources` table).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Resource {
    pub id: Uuid,
    // FK to sprints.id (owning parent).
    pub sprint_id: Uuid,
    pub label: String,
    pub url: String,

    /// Maps SQL column "type" to Rust field "resource_type".
    /// This renaming is necessary because `type` is a reserved keyword in Rust;
    /// the JSON key stays "type" for API compatibility.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub resource_type: Option<String>,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Nested Read Projections (Output) ---

/// CurriculumTree
///
/// The "full curriculum read": one curriculum with all descendant projects,
/// sprints, and resources nested. Assembled by the repository from per-level
/// queries, each applying its entity's configured list ordering.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CurriculumTree {
    pub id: Uuid,
    pub title: String,
    pub domain: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub projects: Vec<ProjectTree>,
}

/// ProjectTree
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProjectTree {
    pub id: Uuid,
    pub curriculum_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub sprints: Vec<SprintTree>,
}

/// SprintTree
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SprintTree {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub sprint_number: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub resources: Vec<Resource>,
}

/// TimelineEntry
///
/// One row per sprint in the cross-curriculum chronological view: the sprint
/// joined with its parent project and curriculum titles, plus a count of the
/// resources attached to it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TimelineEntry {
    pub sprint_id: Uuid,
    pub sprint_title: String,
    pub sprint_number: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub project_title: String,
    pub curriculum_title: String,
    pub resources_count: i64,
}

// --- Auth Payloads ---

/// LoginRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// LoginResponse
///
/// The signed bearer token. Clients send it back as `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
}

// --- Request Payloads (Input Schemas) ---
//
// Required fields are deserialized as Option<T> so the handlers can surface a
// typed 400 ("x is required") instead of a framework-level rejection.

/// CreateCurriculumRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateCurriculumRequest {
    pub title: Option<String>,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// UpdateCurriculumRequest
///
/// Partial update payload. Uses `Option<T>` for all fields and
/// `#[serde(skip_serializing_if = "Option::is_none")]` so only provided fields
/// are included in the JSON payload; omitted fields are left unchanged.
///
/// Limitation shared by every `Update*Request`: an explicit JSON `null` and an
/// absent field deserialize identically, so optional columns (icon, summary,
/// endDate, ...) cannot be reset back to NULL through a PATCH — only
/// overwritten with a new value.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateCurriculumRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// CreateProjectRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub curriculum_id: Option<Uuid>,
}

/// UpdateProjectRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // Moving a project to another curriculum is allowed; the repository
    // verifies the target curriculum exists first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curriculum_id: Option<Uuid>,
}

/// CreateSprintRequest
///
/// Dates arrive as strings (RFC 3339 or plain `YYYY-MM-DD`) and are parsed by
/// the handler via [`parse_date`] before touching the repository.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateSprintRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub sprint_number: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub project_id: Option<Uuid>,
}

/// UpdateSprintRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateSprintRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_number: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
}

/// CreateResourceRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateResourceRequest {
    pub label: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub sprint_id: Option<Uuid>,
}

/// UpdateResourceRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateResourceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<Uuid>,
}

/// DeleteResponse
///
/// Wire shape of every successful DELETE: `{success, message}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

// --- Validated Repository Inputs ---
//
// Handlers validate the wire payloads above and hand these to the repository,
// so the persistence layer never sees unchecked input.

#[derive(Debug, Clone)]
pub struct NewCurriculum {
    pub title: String,
    pub domain: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub curriculum_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewSprint {
    pub title: String,
    pub summary: Option<String>,
    pub sprint_number: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub project_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewResource {
    pub label: String,
    pub url: String,
    pub resource_type: Option<String>,
    pub sprint_id: Uuid,
}

/// SprintChanges
///
/// `UpdateSprintRequest` with its date strings already parsed. Fields left as
/// `None` are not touched by the update statement.
#[derive(Debug, Clone, Default)]
pub struct SprintChanges {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub sprint_number: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub project_id: Option<Uuid>,
}

// --- Date Parsing ---

/// parse_date
///
/// Accepts either a full RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
/// Date-only values are pinned to midnight UTC so the stored value round-trips
/// without a timezone shift.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(format!("invalid date: {value}"))
}
