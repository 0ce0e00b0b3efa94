/// Projects and their responsible users
///
/// The responsible-user set is written with the project row in the same
/// transaction. On update the whole set is replaced (delete-then-insert) when
/// a new set is supplied, and kept untouched otherwise.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{attach, dedupe_ids};
use crate::error::{ServiceError, ServiceResult};
use crate::models::project::{Project, ProjectData};
use crate::models::project_member::ProjectMember;

/// A project with its responsible users
#[derive(Debug, Clone)]
pub struct ProjectWithMembers {
    pub project: Project,
    pub members: Vec<ProjectMember>,
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub member_ids: Vec<Uuid>,
}

/// Input for updating a project; `member_ids: None` keeps the current links
#[derive(Debug, Clone)]
pub struct ProjectChanges {
    pub name: String,
    pub description: String,
    pub member_ids: Option<Vec<Uuid>>,
}

fn duplicate_name() -> ServiceError {
    ServiceError::DuplicateKey("A project with this name already exists".to_string())
}

/// Creates a project and links its responsible users
///
/// # Errors
///
/// - `DuplicateKey` if the name is taken
/// - `Validation` if any responsible user does not exist (nothing is written)
pub async fn create(pool: &PgPool, input: NewProject) -> ServiceResult<ProjectWithMembers> {
    let member_ids = dedupe_ids(&input.member_ids);

    let mut tx = pool.begin().await?;

    if Project::name_taken(&mut *tx, &input.name, None).await? {
        return Err(duplicate_name());
    }

    let project = Project::create(
        &mut *tx,
        ProjectData {
            name: input.name,
            description: input.description,
        },
    )
    .await?;

    ProjectMember::add_many(&mut *tx, project.id, &member_ids).await?;
    let members = ProjectMember::list_for_projects(&mut *tx, &[project.id]).await?;

    tx.commit().await?;

    info!(project_id = %project.id, members = members.len(), "Project created");
    Ok(ProjectWithMembers { project, members })
}

/// Fetches one project with its responsible users
pub async fn get(pool: &PgPool, id: Uuid) -> ServiceResult<ProjectWithMembers> {
    let project = Project::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Project"))?;

    let members = ProjectMember::list_for_projects(pool, &[id]).await?;

    Ok(ProjectWithMembers { project, members })
}

/// Lists every project with its responsible users, newest first
pub async fn list(pool: &PgPool) -> ServiceResult<Vec<ProjectWithMembers>> {
    let projects = Project::list(pool).await?;
    let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
    let members = ProjectMember::list_for_projects(pool, &ids).await?;

    Ok(attach(projects, members, |p| p.id, |m| m.project_id)
        .into_iter()
        .map(|(project, members)| ProjectWithMembers { project, members })
        .collect())
}

/// Updates a project, atomically replacing its responsible users when given
///
/// # Errors
///
/// - `NotFound` if the project does not exist
/// - `DuplicateKey` if another project already has the new name
/// - `Validation` if any responsible user does not exist; the previous set is
///   left intact
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: ProjectChanges,
) -> ServiceResult<ProjectWithMembers> {
    let mut tx = pool.begin().await?;

    if Project::find_by_id(&mut *tx, id).await?.is_none() {
        return Err(ServiceError::not_found("Project"));
    }

    if Project::name_taken(&mut *tx, &input.name, Some(id)).await? {
        return Err(duplicate_name());
    }

    let project = Project::update(
        &mut *tx,
        id,
        ProjectData {
            name: input.name,
            description: input.description,
        },
    )
    .await?
    .ok_or_else(|| ServiceError::not_found("Project"))?;

    if let Some(member_ids) = input.member_ids {
        let member_ids = dedupe_ids(&member_ids);
        ProjectMember::delete_for_project(&mut *tx, id).await?;
        ProjectMember::add_many(&mut *tx, id, &member_ids).await?;
    }

    let members = ProjectMember::list_for_projects(&mut *tx, &[id]).await?;

    tx.commit().await?;

    info!(project_id = %id, members = members.len(), "Project updated");
    Ok(ProjectWithMembers { project, members })
}

/// Deletes a project after removing its links
///
/// # Errors
///
/// - `NotFound` if the project does not exist
/// - `Validation` if cycles still belong to the project
pub async fn delete(pool: &PgPool, id: Uuid) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    ProjectMember::delete_for_project(&mut *tx, id).await?;

    if !Project::delete(&mut *tx, id)
        .await
        .map_err(ServiceError::from_delete)?
    {
        return Err(ServiceError::not_found("Project"));
    }

    tx.commit().await?;

    info!(project_id = %id, "Project deleted");
    Ok(())
}
