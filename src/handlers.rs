use crate::{
    AppState, auth,
    error::ApiError,
    models::{
        self, CreateCurriculumRequest, CreateProjectRequest, CreateResourceRequest,
        CreateSprintRequest, Curriculum, CurriculumTree, DeleteResponse, LoginRequest,
        LoginResponse, NewCurriculum, NewProject, NewResource, NewSprint, Project, Resource,
        Sprint, SprintChanges, TimelineEntry, UpdateCurriculumRequest, UpdateProjectRequest,
        UpdateResourceRequest, UpdateSprintRequest,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

// --- Validation Helpers ---

/// Resolves a required request field, rejecting absent or blank values with a
/// typed 400 instead of the generic 500 the legacy service produced.
fn require(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(format!("{field} is required")))
}

fn require_id(value: Option<Uuid>, field: &str) -> Result<Uuid, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("{field} is required")))
}

/// Rejects a supplied-but-blank value in a partial update. Fields that are
/// required at creation must not be blanked out through PATCH either; absent
/// fields pass untouched.
fn reject_blank(value: &Option<String>, field: &str) -> Result<(), ApiError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ApiError::Validation(format!(
            "{field} must not be blank"
        ))),
        _ => Ok(()),
    }
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    value
        .map(models::parse_date)
        .transpose()
        .map_err(ApiError::Validation)
}

fn check_sprint_number(value: Option<i32>) -> Result<(), ApiError> {
    match value {
        Some(n) if n <= 0 => Err(ApiError::Validation(
            "sprintNumber must be a positive integer".to_string(),
        )),
        _ => Ok(()),
    }
}

// --- Auth ---

/// login
///
/// [Public Route] Validates admin credentials and issues a signed bearer token.
/// A missing admin and a wrong password are deliberately indistinguishable to
/// the caller; both surface as the same 401.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let admin = state
        .repo
        .get_admin_by_email(&payload.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !bcrypt::verify(&payload.password, &admin.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = auth::issue_token(&admin, &state.config)?;
    Ok(Json(LoginResponse { token }))
}

// --- Curriculum ---

/// create_curriculum
///
/// [Protected Route] Creates a top-level curriculum. `title` and `domain` are
/// required; the remaining cosmetic fields are optional.
#[utoipa::path(
    post,
    path = "/curriculum",
    request_body = CreateCurriculumRequest,
    responses((status = 201, description = "Created", body = Curriculum))
)]
pub async fn create_curriculum(
    State(state): State<AppState>,
    Json(payload): Json<CreateCurriculumRequest>,
) -> Result<(StatusCode, Json<Curriculum>), ApiError> {
    let new = NewCurriculum {
        title: require(payload.title, "title")?,
        domain: require(payload.domain, "domain")?,
        description: payload.description,
        icon: payload.icon,
        color: payload.color,
    };
    let curriculum = state.repo.create_curriculum(new).await?;
    Ok((StatusCode::CREATED, Json(curriculum)))
}

/// list_curricula
///
/// [Public Route] Lists all curricula, newest first.
#[utoipa::path(
    get,
    path = "/curriculum",
    responses((status = 200, description = "All curricula", body = [Curriculum]))
)]
pub async fn list_curricula(
    State(state): State<AppState>,
) -> Result<Json<Vec<Curriculum>>, ApiError> {
    Ok(Json(state.repo.list_curricula().await?))
}

/// get_curriculum_full
///
/// [Public Route] The deep read: one curriculum with all descendant projects,
/// sprints, and resources nested.
#[utoipa::path(
    get,
    path = "/curriculum/{id}/full",
    params(("id" = Uuid, Path, description = "Curriculum ID")),
    responses(
        (status = 200, description = "Nested curriculum tree", body = CurriculumTree),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_curriculum_full(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CurriculumTree>, ApiError> {
    match state.repo.get_curriculum_full(id).await? {
        Some(tree) => Ok(Json(tree)),
        None => Err(ApiError::NotFound("Curriculum")),
    }
}

/// update_curriculum
///
/// [Protected Route] Partial update; only supplied fields change.
#[utoipa::path(
    patch,
    path = "/curriculum/{id}",
    params(("id" = Uuid, Path, description = "Curriculum ID")),
    request_body = UpdateCurriculumRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_curriculum(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCurriculumRequest>,
) -> Result<Json<Value>, ApiError> {
    reject_blank(&payload.title, "title")?;
    reject_blank(&payload.domain, "domain")?;
    match state.repo.update_curriculum(id, payload).await? {
        Some(curriculum) => Ok(Json(json!({ "success": true, "data": curriculum }))),
        None => Err(ApiError::NotFound("Curriculum")),
    }
}

/// delete_curriculum
///
/// [Protected Route] Deletes the curriculum; the database cascades the delete
/// through projects, sprints, and resources.
#[utoipa::path(
    delete,
    path = "/curriculum/{id}",
    params(("id" = Uuid, Path, description = "Curriculum ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_curriculum(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if state.repo.delete_curriculum(id).await? {
        Ok(Json(DeleteResponse {
            success: true,
            message: "Curriculum deleted successfully".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Curriculum"))
    }
}

// --- Project ---

/// create_project
///
/// [Protected Route] Creates a project under an existing curriculum. The
/// parent id is verified before the insert so a dangling reference is a 404,
/// not a constraint-violation 500.
#[utoipa::path(
    post,
    path = "/project",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Created", body = Project),
        (status = 404, description = "Curriculum not found")
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let new = NewProject {
        title: require(payload.title, "title")?,
        description: payload.description,
        curriculum_id: require_id(payload.curriculum_id, "curriculumId")?,
    };
    let project = state.repo.create_project(new).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// list_projects_by_curriculum
///
/// [Public Route] Lists a curriculum's projects, newest first.
#[utoipa::path(
    get,
    path = "/project/curriculum/{curriculum_id}",
    params(("curriculum_id" = Uuid, Path, description = "Curriculum ID")),
    responses((status = 200, description = "Projects", body = [Project]))
)]
pub async fn list_projects_by_curriculum(
    State(state): State<AppState>,
    Path(curriculum_id): Path<Uuid>,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(
        state.repo.list_projects_by_curriculum(curriculum_id).await?,
    ))
}

/// update_project
#[utoipa::path(
    patch,
    path = "/project/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<Value>, ApiError> {
    reject_blank(&payload.title, "title")?;
    match state.repo.update_project(id, payload).await? {
        Some(project) => Ok(Json(json!({ "success": true, "data": project }))),
        None => Err(ApiError::NotFound("Project")),
    }
}

/// delete_project
#[utoipa::path(
    delete,
    path = "/project/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if state.repo.delete_project(id).await? {
        Ok(Json(DeleteResponse {
            success: true,
            message: "Project deleted successfully".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Project"))
    }
}

// --- Sprint ---

/// create_sprint
///
/// [Protected Route] Creates a sprint under an existing project. Date strings
/// are parsed up front (RFC 3339 or `YYYY-MM-DD`); `sprintNumber`, when
/// present, must be positive but is NOT unique within a project.
#[utoipa::path(
    post,
    path = "/sprint",
    request_body = CreateSprintRequest,
    responses(
        (status = 201, description = "Created", body = Sprint),
        (status = 404, description = "Project not found")
    )
)]
pub async fn create_sprint(
    State(state): State<AppState>,
    Json(payload): Json<CreateSprintRequest>,
) -> Result<(StatusCode, Json<Sprint>), ApiError> {
    check_sprint_number(payload.sprint_number)?;
    let new = NewSprint {
        title: require(payload.title, "title")?,
        summary: payload.summary,
        sprint_number: payload.sprint_number,
        start_date: parse_optional_date(payload.start_date.as_deref())?,
        end_date: parse_optional_date(payload.end_date.as_deref())?,
        project_id: require_id(payload.project_id, "projectId")?,
    };
    let sprint = state.repo.create_sprint(new).await?;
    Ok((StatusCode::CREATED, Json(sprint)))
}

/// list_sprints_by_project
///
/// [Public Route] Lists a project's sprints ordered by sprint number ascending.
#[utoipa::path(
    get,
    path = "/sprint/project/{project_id}",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    responses((status = 200, description = "Sprints", body = [Sprint]))
)]
pub async fn list_sprints_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<Sprint>>, ApiError> {
    Ok(Json(state.repo.list_sprints_by_project(project_id).await?))
}

/// update_sprint
///
/// [Protected Route] Partial update. startDate/endDate strings are parsed into
/// timestamps when present and left untouched otherwise.
#[utoipa::path(
    patch,
    path = "/sprint/{id}",
    params(("id" = Uuid, Path, description = "Sprint ID")),
    request_body = UpdateSprintRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_sprint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSprintRequest>,
) -> Result<Json<Value>, ApiError> {
    check_sprint_number(payload.sprint_number)?;
    reject_blank(&payload.title, "title")?;
    let changes = SprintChanges {
        title: payload.title,
        summary: payload.summary,
        sprint_number: payload.sprint_number,
        start_date: parse_optional_date(payload.start_date.as_deref())?,
        end_date: parse_optional_date(payload.end_date.as_deref())?,
        project_id: payload.project_id,
    };
    match state.repo.update_sprint(id, changes).await? {
        Some(sprint) => Ok(Json(json!({ "success": true, "data": sprint }))),
        None => Err(ApiError::NotFound("Sprint")),
    }
}

/// delete_sprint
#[utoipa::path(
    delete,
    path = "/sprint/{id}",
    params(("id" = Uuid, Path, description = "Sprint ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_sprint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if state.repo.delete_sprint(id).await? {
        Ok(Json(DeleteResponse {
            success: true,
            message: "Sprint deleted successfully".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Sprint"))
    }
}

// --- Resource ---

/// create_resource
///
/// [Protected Route] Attaches a link/reference to an existing sprint. `type`
/// is a free-form tag (e.g. "github", "video", "doc").
#[utoipa::path(
    post,
    path = "/resource",
    request_body = CreateResourceRequest,
    responses(
        (status = 201, description = "Created", body = Resource),
        (status = 404, description = "Sprint not found")
    )
)]
pub async fn create_resource(
    State(state): State<AppState>,
    Json(payload): Json<CreateResourceRequest>,
) -> Result<(StatusCode, Json<Resource>), ApiError> {
    let new = NewResource {
        label: require(payload.label, "label")?,
        url: require(payload.url, "url")?,
        resource_type: payload.resource_type,
        sprint_id: require_id(payload.sprint_id, "sprintId")?,
    };
    let resource = state.repo.create_resource(new).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

/// list_resources_by_sprint
///
/// [Public Route] Lists a sprint's resources in insertion order.
#[utoipa::path(
    get,
    path = "/resource/sprint/{sprint_id}",
    params(("sprint_id" = Uuid, Path, description = "Sprint ID")),
    responses((status = 200, description = "Resources", body = [Resource]))
)]
pub async fn list_resources_by_sprint(
    State(state): State<AppState>,
    Path(sprint_id): Path<Uuid>,
) -> Result<Json<Vec<Resource>>, ApiError> {
    Ok(Json(state.repo.list_resources_by_sprint(sprint_id).await?))
}

/// update_resource
#[utoipa::path(
    patch,
    path = "/resource/{id}",
    params(("id" = Uuid, Path, description = "Resource ID")),
    request_body = UpdateResourceRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateResourceRequest>,
) -> Result<Json<Value>, ApiError> {
    reject_blank(&payload.label, "label")?;
    reject_blank(&payload.url, "url")?;
    match state.repo.update_resource(id, payload).await? {
        Some(resource) => Ok(Json(json!({ "success": true, "data": resource }))),
        None => Err(ApiError::NotFound("Resource")),
    }
}

/// delete_resource
#[utoipa::path(
    delete,
    path = "/resource/{id}",
    params(("id" = Uuid, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if state.repo.delete_resource(id).await? {
        Ok(Json(DeleteResponse {
            success: true,
            message: "Resource deleted successfully".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Resource"))
    }
}

// --- Timeline ---

/// get_timeline
///
/// [Public Route] The flattened cross-curriculum view: one row per sprint with
/// its parent titles and resource count, ordered by start date descending.
#[utoipa::path(
    get,
    path = "/timeline",
    responses((status = 200, description = "Timeline rows", body = [TimelineEntry]))
)]
pub async fn get_timeline(
    State(state): State<AppState>,
) -> Result<Json<Vec<TimelineEntry>>, ApiError> {
    Ok(Json(state.repo.get_timeline().await?))
}
