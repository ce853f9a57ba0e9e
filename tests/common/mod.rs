#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use curriculum_portal::{
    AppState,
    config::AppConfig,
    error::ApiError,
    models::{
        Admin, Curriculum, CurriculumTree, NewCurriculum, NewProject, NewResource, NewSprint,
        Project, Resource, Sprint, SprintChanges, TimelineEntry, UpdateCurriculumRequest,
        UpdateProjectRequest, UpdateResourceRequest,
    },
    repository::Repository,
};
use std::sync::Arc;
use uuid::Uuid;

// --- MOCK REPOSITORY IMPLEMENTATION ---

// Shared control point for handler/auth/router tests. Handlers rely on the
// Repository trait, so tests configure this struct with canned results.
//
// Conventions mirrored from the real implementation:
// - create_* echoes the validated input back as a persisted-looking row, so a
//   test can assert the handler passed values through unmangled.
// - update_* returns Some/None and delete_* true/false based on `found`.
pub struct MockRepo {
    // The single admin row; used by login and the local bypass.
    pub admin: Option<Admin>,

    // Pre-canned outputs for the read endpoints.
    pub curricula: Vec<Curriculum>,
    pub projects: Vec<Project>,
    pub sprints: Vec<Sprint>,
    pub resources: Vec<Resource>,
    pub tree: Option<CurriculumTree>,
    pub timeline: Vec<TimelineEntry>,

    // Whether update/delete targets exist.
    pub found: bool,
}

impl Default for MockRepo {
    fn default() -> Self {
        MockRepo {
            admin: None,
            curricula: vec![],
            projects: vec![],
            sprints: vec![],
            resources: vec![],
            tree: None,
            timeline: vec![],
            found: true,
        }
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>, ApiError> {
        Ok(self.admin.clone().filter(|a| a.email == email))
    }
    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>, ApiError> {
        Ok(self.admin.clone().filter(|a| a.id == id))
    }
    async fn create_admin(&self, email: &str, password_hash: &str) -> Result<Admin, ApiError> {
        Ok(Admin {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        })
    }

    async fn create_curriculum(&self, new: NewCurriculum) -> Result<Curriculum, ApiError> {
        Ok(Curriculum {
            id: Uuid::new_v4(),
            title: new.title,
            domain: new.domain,
            description: new.description,
            icon: new.icon,
            color: new.color,
            created_at: Utc::now(),
        })
    }
    async fn list_curricula(&self) -> Result<Vec<Curriculum>, ApiError> {
        Ok(self.curricula.clone())
    }
    async fn get_curriculum_full(&self, _id: Uuid) -> Result<Option<CurriculumTree>, ApiError> {
        Ok(self.tree.clone())
    }
    async fn update_curriculum(
        &self,
        id: Uuid,
        changes: UpdateCurriculumRequest,
    ) -> Result<Option<Curriculum>, ApiError> {
        if !self.found {
            return Ok(None);
        }
        let mut curriculum = Curriculum {
            id,
            ..Curriculum::default()
        };
        if let Some(title) = changes.title {
            curriculum.title = title;
        }
        Ok(Some(curriculum))
    }
    async fn delete_curriculum(&self, _id: Uuid) -> Result<bool, ApiError> {
        Ok(self.found)
    }

    async fn create_project(&self, new: NewProject) -> Result<Project, ApiError> {
        Ok(Project {
            id: Uuid::new_v4(),
            curriculum_id: new.curriculum_id,
            title: new.title,
            description: new.description,
            created_at: Utc::now(),
        })
    }
    async fn list_projects_by_curriculum(
        &self,
        _curriculum_id: Uuid,
    ) -> Result<Vec<Project>, ApiError> {
        Ok(self.projects.clone())
    }
    async fn update_project(
        &self,
        id: Uuid,
        changes: UpdateProjectRequest,
    ) -> Result<Option<Project>, ApiError> {
        if !self.found {
            return Ok(None);
        }
        let mut project = Project {
            id,
            ..Project::default()
        };
        if let Some(title) = changes.title {
            project.title = title;
        }
        Ok(Some(project))
    }
    async fn delete_project(&self, _id: Uuid) -> Result<bool, ApiError> {
        Ok(self.found)
    }

    async fn create_sprint(&self, new: NewSprint) -> Result<Sprint, ApiError> {
        Ok(Sprint {
            id: Uuid::new_v4(),
            project_id: new.project_id,
            title: new.title,
            summary: new.summary,
            sprint_number: new.sprint_number,
            start_date: new.start_date,
            end_date: new.end_date,
            created_at: Utc::now(),
        })
    }
    async fn list_sprints_by_project(&self, _project_id: Uuid) -> Result<Vec<Sprint>, ApiError> {
        Ok(self.sprints.clone())
    }
    async fn update_sprint(
        &self,
        id: Uuid,
        changes: SprintChanges,
    ) -> Result<Option<Sprint>, ApiError> {
        if !self.found {
            return Ok(None);
        }
        Ok(Some(Sprint {
            id,
            title: changes.title.unwrap_or_default(),
            summary: changes.summary,
            sprint_number: changes.sprint_number,
            start_date: changes.start_date,
            end_date: changes.end_date,
            ..Sprint::default()
        }))
    }
    async fn delete_sprint(&self, _id: Uuid) -> Result<bool, ApiError> {
        Ok(self.found)
    }

    async fn create_resource(&self, new: NewResource) -> Result<Resource, ApiError> {
        Ok(Resource {
            id: Uuid::new_v4(),
            sprint_id: new.sprint_id,
            label: new.label,
            url: new.url,
            resource_type: new.resource_type,
            created_at: Utc::now(),
        })
    }
    async fn list_resources_by_sprint(&self, _sprint_id: Uuid) -> Result<Vec<Resource>, ApiError> {
        Ok(self.resources.clone())
    }
    async fn update_resource(
        &self,
        id: Uuid,
        changes: UpdateResourceRequest,
    ) -> Result<Option<Resource>, ApiError> {
        if !self.found {
            return Ok(None);
        }
        let mut resource = Resource {
            id,
            ..Resource::default()
        };
        if let Some(label) = changes.label {
            resource.label = label;
        }
        Ok(Some(resource))
    }
    async fn delete_resource(&self, _id: Uuid) -> Result<bool, ApiError> {
        Ok(self.found)
    }

    async fn get_timeline(&self) -> Result<Vec<TimelineEntry>, ApiError> {
        Ok(self.timeline.clone())
    }
}

// --- TEST UTILITIES ---

pub const TEST_ADMIN_ID: Uuid = Uuid::from_u128(42);

/// Creates an AppState wired to the mock repo and a default (Local) config.
pub fn test_state(repo: MockRepo) -> AppState {
    AppState {
        repo: Arc::new(repo),
        config: AppConfig::default(),
    }
}

pub fn test_state_with_config(repo: MockRepo, config: AppConfig) -> AppState {
    AppState {
        repo: Arc::new(repo),
        config,
    }
}

/// An admin row whose password_hash matches `password`. Cost 4 keeps the
/// hashing fast enough for tests.
pub fn admin_with_password(password: &str) -> Admin {
    Admin {
        id: TEST_ADMIN_ID,
        email: "admin@example.com".to_string(),
        password_hash: bcrypt::hash(password, 4).unwrap(),
        created_at: Utc::now(),
    }
}
