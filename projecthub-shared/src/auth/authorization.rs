/// Authorization predicates
///
/// Pure permission checks over loaded domain entities. These never
/// touch the database: callers resolve entities first (reporting
/// "not found" takes precedence over "forbidden"), then ask these
/// predicates whether the actor holds the required relationship.
/// Every predicate fails closed - a missing related entity means no
/// permission.
///
/// Membership lookups that must scale (project rosters, task
/// assignees) are SQL set-membership queries on the respective models;
/// the predicates here accept the already-resolved result.

use crate::models::{project::Project, task::Task, team::Team};
use uuid::Uuid;

/// Checks whether `user_id` owns the project
pub fn is_project_owner(project: &Project, user_id: Uuid) -> bool {
    project.owner_id == user_id
}

/// Checks whether `user_id` owns the team
pub fn is_team_owner(team: &Team, user_id: Uuid) -> bool {
    team.owner_id == user_id
}

/// Checks whether `user_id` belongs to the team
///
/// The owner is implicitly a member even if absent from the member
/// roster.
pub fn is_team_member(team: &Team, member_ids: &[Uuid], user_id: Uuid) -> bool {
    team.owner_id == user_id || member_ids.contains(&user_id)
}

/// Checks whether `user_id` is among the task's assignees
pub fn is_task_assignee(assignee_ids: &[Uuid], user_id: Uuid) -> bool {
    assignee_ids.contains(&user_id)
}

/// Checks whether `user_id` may edit, delete, or reopen the task
///
/// Personal tasks are mutable by their owner; project tasks by the
/// project owner. `project` must be the task's project when the task
/// has one - passing `None` for a project task fails closed.
pub fn can_mutate_task(task: &Task, project: Option<&Project>, user_id: Uuid) -> bool {
    match task.project_id {
        None => task.owner_id == Some(user_id),
        Some(project_id) => project
            .filter(|p| p.id == project_id)
            .map(|p| p.owner_id == user_id)
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{TaskPriority, TaskStatus};
    use chrono::Utc;
    use sqlx::types::Json;

    fn project(id: Uuid, owner_id: Uuid) -> Project {
        Project {
            id,
            name: "api rewrite".to_string(),
            description: String::new(),
            owner_id,
            team_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn team(owner_id: Uuid) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: "backend".to_string(),
            description: String::new(),
            owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn task(project_id: Option<Uuid>, owner_id: Option<Uuid>) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "write docs".to_string(),
            description: String::new(),
            notes: String::new(),
            priority: TaskPriority::Medium,
            status: TaskStatus::Todo,
            project_id,
            owner_id,
            assigned_by: None,
            submission_content: Json(Vec::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            assigned_at: None,
            completed_at: None,
            deadline: None,
        }
    }

    #[test]
    fn test_project_owner() {
        let owner = Uuid::new_v4();
        let p = project(Uuid::new_v4(), owner);

        assert!(is_project_owner(&p, owner));
        assert!(!is_project_owner(&p, Uuid::new_v4()));
    }

    #[test]
    fn test_team_member_includes_owner() {
        let owner = Uuid::new_v4();
        let member = Uuid::new_v4();
        let t = team(owner);

        assert!(is_team_owner(&t, owner));
        assert!(is_team_member(&t, &[member], owner));
        assert!(is_team_member(&t, &[member], member));
        assert!(!is_team_member(&t, &[member], Uuid::new_v4()));
    }

    #[test]
    fn test_task_assignee() {
        let user = Uuid::new_v4();
        assert!(is_task_assignee(&[Uuid::new_v4(), user], user));
        assert!(!is_task_assignee(&[], user));
    }

    #[test]
    fn test_can_mutate_personal_task() {
        let owner = Uuid::new_v4();
        let t = task(None, Some(owner));

        assert!(can_mutate_task(&t, None, owner));
        assert!(!can_mutate_task(&t, None, Uuid::new_v4()));
    }

    #[test]
    fn test_can_mutate_project_task_requires_project_owner() {
        let project_id = Uuid::new_v4();
        let project_owner = Uuid::new_v4();
        let p = project(project_id, project_owner);
        let t = task(Some(project_id), None);

        assert!(can_mutate_task(&t, Some(&p), project_owner));
        assert!(!can_mutate_task(&t, Some(&p), Uuid::new_v4()));
    }

    #[test]
    fn test_can_mutate_fails_closed_without_project() {
        let t = task(Some(Uuid::new_v4()), None);
        assert!(!can_mutate_task(&t, None, Uuid::new_v4()));
    }

    #[test]
    fn test_can_mutate_rejects_mismatched_project() {
        let owner = Uuid::new_v4();
        let t = task(Some(Uuid::new_v4()), None);
        let other = project(Uuid::new_v4(), owner);

        // Project loaded for a different id never grants permission
        assert!(!can_mutate_task(&t, Some(&other), owner));
    }
}
