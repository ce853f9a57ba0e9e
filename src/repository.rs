use crate::error::ApiError;
use crate::models::{
    Admin, Curriculum, CurriculumTree, NewCurriculum, NewProject, NewResource, NewSprint, Project,
    ProjectTree, Resource, Sprint, SprintChanges, SprintTree, TimelineEntry,
    UpdateCurriculumRequest, UpdateProjectRequest, UpdateResourceRequest,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Per-entity list orderings. These drive the default UI sort and are kept in
/// one place instead of being restated at each call site: curricula and
/// projects list newest-first, sprints follow their number, resources keep
/// insertion order.
pub mod ordering {
    pub const CURRICULUM: &str = "created_at DESC";
    pub const PROJECT: &str = "created_at DESC";
    pub const SPRINT: &str = "sprint_number ASC";
    pub const RESOURCE: &str = "created_at ASC";
}

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (Postgres, Mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable and usable across Axum's asynchronous task boundaries.
///
/// Conventions:
/// - `update_*` returns `Ok(None)` and `delete_*` returns `Ok(false)` when the
///   id does not exist; the handler maps those to 404.
/// - `create_*` for child entities verifies the parent id first and fails with
///   `ApiError::NotFound(<parent>)` instead of letting the foreign-key
///   constraint surface as a generic 500.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Admin / Auth ---
    async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>, ApiError>;
    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>, ApiError>;
    // Out-of-band seeding only; never reachable from a route.
    async fn create_admin(&self, email: &str, password_hash: &str) -> Result<Admin, ApiError>;

    // --- Curriculum ---
    async fn create_curriculum(&self, new: NewCurriculum) -> Result<Curriculum, ApiError>;
    async fn list_curricula(&self) -> Result<Vec<Curriculum>, ApiError>;
    // The deep read: curriculum with projects → sprints → resources nested.
    async fn get_curriculum_full(&self, id: Uuid) -> Result<Option<CurriculumTree>, ApiError>;
    async fn update_curriculum(
        &self,
        id: Uuid,
        changes: UpdateCurriculumRequest,
    ) -> Result<Option<Curriculum>, ApiError>;
    async fn delete_curriculum(&self, id: Uuid) -> Result<bool, ApiError>;

    // --- Project ---
    async fn create_project(&self, new: NewProject) -> Result<Project, ApiError>;
    async fn list_projects_by_curriculum(
        &self,
        curriculum_id: Uuid,
    ) -> Result<Vec<Project>, ApiError>;
    async fn update_project(
        &self,
        id: Uuid,
        changes: UpdateProjectRequest,
    ) -> Result<Option<Project>, ApiError>;
    async fn delete_project(&self, id: Uuid) -> Result<bool, ApiError>;

    // --- Sprint ---
    async fn create_sprint(&self, new: NewSprint) -> Result<Sprint, ApiError>;
    async fn list_sprints_by_project(&self, project_id: Uuid) -> Result<Vec<Sprint>, ApiError>;
    async fn update_sprint(
        &self,
        id: Uuid,
        changes: SprintChanges,
    ) -> Result<Option<Sprint>, ApiError>;
    async fn delete_sprint(&self, id: Uuid) -> Result<bool, ApiError>;

    // --- Resource ---
    async fn create_resource(&self, new: NewResource) -> Result<Resource, ApiError>;
    async fn list_resources_by_sprint(&self, sprint_id: Uuid) -> Result<Vec<Resource>, ApiError>;
    async fn update_resource(
        &self,
        id: Uuid,
        changes: UpdateResourceRequest,
    ) -> Result<Option<Resource>, ApiError>;
    async fn delete_resource(&self, id: Uuid) -> Result<bool, ApiError>;

    // --- Timeline ---
    async fn get_timeline(&self) -> Result<Vec<TimelineEntry>, ApiError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

const CURRICULUM_COLS: &str = "id, title, domain, description, icon, color, created_at";
const PROJECT_COLS: &str = "id, curriculum_id, title, description, created_at";
const SPRINT_COLS: &str =
    "id, project_id, title, summary, sprint_number, start_date, end_date, created_at";
const RESOURCE_COLS: &str = r#"id, sprint_id, label, url, "type", created_at"#;

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Verifies a parent row exists before inserting a child, so a dangling
    /// parent id becomes a typed 404 instead of a constraint-violation 500.
    async fn assert_exists(
        &self,
        table: &str,
        entity: &'static str,
        id: Uuid,
    ) -> Result<(), ApiError> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)");
        let exists: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(&self.pool).await?;
        if exists {
            Ok(())
        } else {
            Err(ApiError::NotFound(entity))
        }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- Admin / Auth ---

    async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>, ApiError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, password_hash, created_at FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>, ApiError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, password_hash, created_at FROM admins WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn create_admin(&self, email: &str, password_hash: &str) -> Result<Admin, ApiError> {
        let admin = sqlx::query_as::<_, Admin>(
            "INSERT INTO admins (id, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, email, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(admin)
    }

    // --- Curriculum ---

    async fn create_curriculum(&self, new: NewCurriculum) -> Result<Curriculum, ApiError> {
        let sql = format!(
            "INSERT INTO curricula (id, title, domain, description, icon, color) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {CURRICULUM_COLS}"
        );
        let curriculum = sqlx::query_as::<_, Curriculum>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.title)
            .bind(new.domain)
            .bind(new.description)
            .bind(new.icon)
            .bind(new.color)
            .fetch_one(&self.pool)
            .await?;
        Ok(curriculum)
    }

    async fn list_curricula(&self) -> Result<Vec<Curriculum>, ApiError> {
        let sql = format!(
            "SELECT {CURRICULUM_COLS} FROM curricula ORDER BY {}",
            ordering::CURRICULUM
        );
        let curricula = sqlx::query_as::<_, Curriculum>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(curricula)
    }

    /// get_curriculum_full
    ///
    /// One level-per-query read (curriculum, its projects, their sprints,
    /// their resources) assembled into a nested tree. Each level applies the
    /// same ordering as the corresponding flat listing endpoint.
    async fn get_curriculum_full(&self, id: Uuid) -> Result<Option<CurriculumTree>, ApiError> {
        let sql = format!("SELECT {CURRICULUM_COLS} FROM curricula WHERE id = $1");
        let Some(curriculum) = sqlx::query_as::<_, Curriculum>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT {PROJECT_COLS} FROM projects WHERE curriculum_id = $1 ORDER BY {}",
            ordering::PROJECT
        );
        let projects = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        let project_ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
        let sql = format!(
            "SELECT {SPRINT_COLS} FROM sprints WHERE project_id = ANY($1) ORDER BY {}",
            ordering::SPRINT
        );
        let sprints = sqlx::query_as::<_, Sprint>(&sql)
            .bind(&project_ids)
            .fetch_all(&self.pool)
            .await?;

        let sprint_ids: Vec<Uuid> = sprints.iter().map(|s| s.id).collect();
        let sql = format!(
            "SELECT {RESOURCE_COLS} FROM resources WHERE sprint_id = ANY($1) ORDER BY {}",
            ordering::RESOURCE
        );
        let resources = sqlx::query_as::<_, Resource>(&sql)
            .bind(&sprint_ids)
            .fetch_all(&self.pool)
            .await?;

        // Group children by parent id; per-group order is preserved because the
        // inputs are already sorted.
        let mut resources_by_sprint: HashMap<Uuid, Vec<Resource>> = HashMap::new();
        for resource in resources {
            resources_by_sprint
                .entry(resource.sprint_id)
                .or_default()
                .push(resource);
        }

        let mut sprints_by_project: HashMap<Uuid, Vec<SprintTree>> = HashMap::new();
        for sprint in sprints {
            let tree = SprintTree {
                resources: resources_by_sprint.remove(&sprint.id).unwrap_or_default(),
                id: sprint.id,
                project_id: sprint.project_id,
                title: sprint.title,
                summary: sprint.summary,
                sprint_number: sprint.sprint_number,
                start_date: sprint.start_date,
                end_date: sprint.end_date,
                created_at: sprint.created_at,
            };
            sprints_by_project
                .entry(tree.project_id)
                .or_default()
                .push(tree);
        }

        let project_trees = projects
            .into_iter()
            .map(|project| ProjectTree {
                sprints: sprints_by_project.remove(&project.id).unwrap_or_default(),
                id: project.id,
                curriculum_id: project.curriculum_id,
                title: project.title,
                description: project.description,
                created_at: project.created_at,
            })
            .collect();

        Ok(Some(CurriculumTree {
            id: curriculum.id,
            title: curriculum.title,
            domain: curriculum.domain,
            description: curriculum.description,
            icon: curriculum.icon,
            color: curriculum.color,
            created_at: curriculum.created_at,
            projects: project_trees,
        }))
    }

    /// update_curriculum
    ///
    /// Uses the PostgreSQL `COALESCE` function to handle `Option<T>` fields,
    /// only updating a column if the corresponding field in `changes` is `Some`.
    async fn update_curriculum(
        &self,
        id: Uuid,
        changes: UpdateCurriculumRequest,
    ) -> Result<Option<Curriculum>, ApiError> {
        let sql = format!(
            "UPDATE curricula \
             SET title = COALESCE($2, title), \
                 domain = COALESCE($3, domain), \
                 description = COALESCE($4, description), \
                 icon = COALESCE($5, icon), \
                 color = COALESCE($6, color) \
             WHERE id = $1 RETURNING {CURRICULUM_COLS}"
        );
        let curriculum = sqlx::query_as::<_, Curriculum>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.domain)
            .bind(changes.description)
            .bind(changes.icon)
            .bind(changes.color)
            .fetch_optional(&self.pool)
            .await?;
        Ok(curriculum)
    }

    /// delete_curriculum
    ///
    /// The database cascades the delete through projects, sprints, and
    /// resources in this single statement.
    async fn delete_curriculum(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM curricula WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Project ---

    async fn create_project(&self, new: NewProject) -> Result<Project, ApiError> {
        self.assert_exists("curricula", "Curriculum", new.curriculum_id)
            .await?;
        let sql = format!(
            "INSERT INTO projects (id, curriculum_id, title, description) \
             VALUES ($1, $2, $3, $4) RETURNING {PROJECT_COLS}"
        );
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.curriculum_id)
            .bind(new.title)
            .bind(new.description)
            .fetch_one(&self.pool)
            .await?;
        Ok(project)
    }

    async fn list_projects_by_curriculum(
        &self,
        curriculum_id: Uuid,
    ) -> Result<Vec<Project>, ApiError> {
        let sql = format!(
            "SELECT {PROJECT_COLS} FROM projects WHERE curriculum_id = $1 ORDER BY {}",
            ordering::PROJECT
        );
        let projects = sqlx::query_as::<_, Project>(&sql)
            .bind(curriculum_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(projects)
    }

    async fn update_project(
        &self,
        id: Uuid,
        changes: UpdateProjectRequest,
    ) -> Result<Option<Project>, ApiError> {
        if let Some(curriculum_id) = changes.curriculum_id {
            self.assert_exists("curricula", "Curriculum", curriculum_id)
                .await?;
        }
        let sql = format!(
            "UPDATE projects \
             SET title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 curriculum_id = COALESCE($4, curriculum_id) \
             WHERE id = $1 RETURNING {PROJECT_COLS}"
        );
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.curriculum_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Sprint ---

    async fn create_sprint(&self, new: NewSprint) -> Result<Sprint, ApiError> {
        self.assert_exists("projects", "Project", new.project_id)
            .await?;
        let sql = format!(
            "INSERT INTO sprints (id, project_id, title, summary, sprint_number, start_date, end_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {SPRINT_COLS}"
        );
        let sprint = sqlx::query_as::<_, Sprint>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.project_id)
            .bind(new.title)
            .bind(new.summary)
            .bind(new.sprint_number)
            .bind(new.start_date)
            .bind(new.end_date)
            .fetch_one(&self.pool)
            .await?;
        Ok(sprint)
    }

    async fn list_sprints_by_project(&self, project_id: Uuid) -> Result<Vec<Sprint>, ApiError> {
        let sql = format!(
            "SELECT {SPRINT_COLS} FROM sprints WHERE project_id = $1 ORDER BY {}",
            ordering::SPRINT
        );
        let sprints = sqlx::query_as::<_, Sprint>(&sql)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(sprints)
    }

    async fn update_sprint(
        &self,
        id: Uuid,
        changes: SprintChanges,
    ) -> Result<Option<Sprint>, ApiError> {
        if let Some(project_id) = changes.project_id {
            self.assert_exists("projects", "Project", project_id).await?;
        }
        let sql = format!(
            "UPDATE sprints \
             SET title = COALESCE($2, title), \
                 summary = COALESCE($3, summary), \
                 sprint_number = COALESCE($4, sprint_number), \
                 start_date = COALESCE($5, start_date), \
                 end_date = COALESCE($6, end_date), \
                 project_id = COALESCE($7, project_id) \
             WHERE id = $1 RETURNING {SPRINT_COLS}"
        );
        let sprint = sqlx::query_as::<_, Sprint>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.summary)
            .bind(changes.sprint_number)
            .bind(changes.start_date)
            .bind(changes.end_date)
            .bind(changes.project_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(sprint)
    }

    async fn delete_sprint(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM sprints WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Resource ---

    async fn create_resource(&self, new: NewResource) -> Result<Resource, ApiError> {
        self.assert_exists("sprints", "Sprint", new.sprint_id).await?;
        let sql = format!(
            "INSERT INTO resources (id, sprint_id, label, url, \"type\") \
             VALUES ($1, $2, $3, $4, $5) RETURNING {RESOURCE_COLS}"
        );
        let resource = sqlx::query_as::<_, Resource>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.sprint_id)
            .bind(new.label)
            .bind(new.url)
            .bind(new.resource_type)
            .fetch_one(&self.pool)
            .await?;
        Ok(resource)
    }

    async fn list_resources_by_sprint(&self, sprint_id: Uuid) -> Result<Vec<Resource>, ApiError> {
        let sql = format!(
            "SELECT {RESOURCE_COLS} FROM resources WHERE sprint_id = $1 ORDER BY {}",
            ordering::RESOURCE
        );
        let resources = sqlx::query_as::<_, Resource>(&sql)
            .bind(sprint_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(resources)
    }

    async fn update_resource(
        &self,
        id: Uuid,
        changes: UpdateResourceRequest,
    ) -> Result<Option<Resource>, ApiError> {
        if let Some(sprint_id) = changes.sprint_id {
            self.assert_exists("sprints", "Sprint", sprint_id).await?;
        }
        let sql = format!(
            "UPDATE resources \
             SET label = COALESCE($2, label), \
                 url = COALESCE($3, url), \
                 \"type\" = COALESCE($4, \"type\"), \
                 sprint_id = COALESCE($5, sprint_id) \
             WHERE id = $1 RETURNING {RESOURCE_COLS}"
        );
        let resource = sqlx::query_as::<_, Resource>(&sql)
            .bind(id)
            .bind(changes.label)
            .bind(changes.url)
            .bind(changes.resource_type)
            .bind(changes.sprint_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(resource)
    }

    async fn delete_resource(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Timeline ---

    /// get_timeline
    ///
    /// Joins every sprint with its parent project and curriculum and counts
    /// its resources, newest start date first. Sprints without a start date
    /// sort wherever Postgres puts NULLs for DESC (undefined by contract).
    async fn get_timeline(&self) -> Result<Vec<TimelineEntry>, ApiError> {
        let entries = sqlx::query_as::<_, TimelineEntry>(
            "SELECT s.id AS sprint_id, s.title AS sprint_title, s.sprint_number, \
                    s.start_date, s.end_date, \
                    p.title AS project_title, c.title AS curriculum_title, \
                    COUNT(r.id) AS resources_count \
             FROM sprints s \
             JOIN projects p ON s.project_id = p.id \
             JOIN curricula c ON p.curriculum_id = c.id \
             LEFT JOIN resources r ON r.sprint_id = s.id \
             GROUP BY s.id, p.title, c.title \
             ORDER BY s.start_date DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
