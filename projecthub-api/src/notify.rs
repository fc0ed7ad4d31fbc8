/// Notification dispatcher
///
/// Builds human-readable notifications for lifecycle events and writes
/// them to each recipient's inbox. Dispatch is best-effort: a failed
/// insert is logged and swallowed so a notification problem can never
/// fail the operation that triggered it. Most events exclude the actor
/// from the recipient set; review outcomes (approval, changes
/// requested) go to every assignee, the acting owner included.

use projecthub_shared::models::{
    notification::{CreateNotification, Notification, NotificationKind},
    project::Project,
    task::Task,
    team::Team,
    user::User,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Selects fan-out recipients, dropping the skipped user when one is
/// given
fn fan_out_recipients(recipients: &[Uuid], skip: Option<Uuid>) -> Vec<Uuid> {
    recipients
        .iter()
        .copied()
        .filter(|&user_id| Some(user_id) != skip)
        .collect()
}

/// Best-effort notification dispatcher
#[derive(Clone)]
pub struct Notifier {
    db: PgPool,
}

impl Notifier {
    /// Creates a dispatcher over the given pool
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Writes one notification, logging and swallowing any failure
    async fn send(
        &self,
        user_id: Uuid,
        title: &str,
        message: String,
        kind: NotificationKind,
        related_id: Option<Uuid>,
    ) {
        let result = Notification::create(
            &self.db,
            CreateNotification {
                user_id,
                title: title.to_string(),
                message,
                kind,
                related_id,
            },
        )
        .await;

        if let Err(e) = result {
            tracing::warn!(
                user_id = %user_id,
                kind = kind.as_str(),
                error = %e,
                "Failed to deliver notification"
            );
        }
    }

    /// Fans a notification out, skipping the given user (the actor)
    /// when one is passed
    async fn fan_out(
        &self,
        recipients: &[Uuid],
        skip: Option<Uuid>,
        title: &str,
        message: &str,
        kind: NotificationKind,
        related_id: Option<Uuid>,
    ) {
        for user_id in fan_out_recipients(recipients, skip) {
            self.send(user_id, title, message.to_string(), kind, related_id)
                .await;
        }
    }

    /// Notifies users they were assigned a task
    pub async fn task_assigned(&self, recipients: &[Uuid], actor: &User, task: &Task) {
        let message = format!("{} assigned you a task: {}", actor.username, task.title);
        self.fan_out(
            recipients,
            Some(actor.id),
            "New Task Assigned",
            &message,
            NotificationKind::TaskAssigned,
            Some(task.id),
        )
        .await;
    }

    /// Notifies assignees that a task's status was changed directly
    pub async fn task_status_changed(&self, recipients: &[Uuid], actor: &User, task: &Task) {
        let message = format!(
            "{} changed the status of '{}' to {}",
            actor.username,
            task.title,
            task.status.as_str()
        );
        self.fan_out(
            recipients,
            Some(actor.id),
            "Task Status Changed",
            &message,
            NotificationKind::TaskStatusChanged,
            Some(task.id),
        )
        .await;
    }

    /// Notifies the project owner that a task awaits review
    pub async fn task_submitted(&self, owner_id: Uuid, actor: &User, task: &Task) {
        if owner_id == actor.id {
            return;
        }
        let message = format!(
            "{} submitted '{}' for your approval",
            actor.username, task.title
        );
        self.send(
            owner_id,
            "Task Submitted for Approval",
            message,
            NotificationKind::TaskSubmittedForApproval,
            Some(task.id),
        )
        .await;
    }

    /// Notifies every assignee their submission was approved, the
    /// acting owner included when they are on the roster
    pub async fn task_approved(&self, recipients: &[Uuid], actor: &User, task: &Task) {
        let message = format!("{} approved '{}'", actor.username, task.title);
        self.fan_out(
            recipients,
            None,
            "Task Approved",
            &message,
            NotificationKind::TaskApproved,
            Some(task.id),
        )
        .await;
    }

    /// Notifies every assignee the owner wants more work on a
    /// submission, the acting owner included when they are on the
    /// roster
    pub async fn task_changes_requested(&self, recipients: &[Uuid], actor: &User, task: &Task) {
        let message = format!(
            "{} requested changes on '{}'",
            actor.username, task.title
        );
        self.fan_out(
            recipients,
            None,
            "Changes Requested",
            &message,
            NotificationKind::TaskChangesRequested,
            Some(task.id),
        )
        .await;
    }

    /// Notifies assignees a completed task was reopened
    pub async fn task_reopened(&self, recipients: &[Uuid], actor: &User, task: &Task) {
        let message = format!("{} reopened '{}'", actor.username, task.title);
        self.fan_out(
            recipients,
            Some(actor.id),
            "Task Reopened",
            &message,
            NotificationKind::TaskReopened,
            Some(task.id),
        )
        .await;
    }

    /// Notifies users they were added to a team
    pub async fn team_invitation(&self, recipients: &[Uuid], actor: &User, team: &Team) {
        let message = format!("{} added you to the team '{}'", actor.username, team.name);
        self.fan_out(
            recipients,
            Some(actor.id),
            "Added to Team",
            &message,
            NotificationKind::TeamInvitation,
            Some(team.id),
        )
        .await;
    }

    /// Notifies a user they were removed from a team
    pub async fn removed_from_team(&self, user_id: Uuid, actor: &User, team: &Team) {
        if user_id == actor.id {
            return;
        }
        let message = format!(
            "{} removed you from the team '{}'",
            actor.username, team.name
        );
        self.send(
            user_id,
            "Removed from Team",
            message,
            NotificationKind::RemoveFromTeam,
            Some(team.id),
        )
        .await;
    }

    /// Notifies users they were added to a project
    pub async fn project_invitation(&self, recipients: &[Uuid], actor: &User, project: &Project) {
        let message = format!(
            "{} added you to the project '{}'",
            actor.username, project.name
        );
        self.fan_out(
            recipients,
            Some(actor.id),
            "Added to Project",
            &message,
            NotificationKind::ProjectInvitation,
            Some(project.id),
        )
        .await;
    }

    /// Notifies remaining members that a project was deleted
    ///
    /// The project row is already gone, so only its name survives and
    /// no related id is attached.
    pub async fn project_deleted(&self, recipients: &[Uuid], actor: &User, project_name: &str) {
        let message = format!(
            "{} deleted the project '{}'",
            actor.username, project_name
        );
        self.fan_out(
            recipients,
            Some(actor.id),
            "Project Deleted",
            &message,
            NotificationKind::ProjectDeleted,
            None,
        )
        .await;
    }

    /// Notifies a member their project role changed
    pub async fn role_changed(&self, user_id: Uuid, actor: &User, project: &Project, role: &str) {
        if user_id == actor.id {
            return;
        }
        let message = format!(
            "{} changed your role in '{}' to {}",
            actor.username, project.name, role
        );
        self.send(
            user_id,
            "Role Changed",
            message,
            NotificationKind::RoleChanged,
            Some(project.id),
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out_skips_actor() {
        let actor = Uuid::new_v4();
        let other = Uuid::new_v4();

        let recipients = fan_out_recipients(&[actor, other], Some(actor));
        assert_eq!(recipients, vec![other]);
    }

    #[test]
    fn test_review_fan_out_keeps_acting_owner() {
        let owner = Uuid::new_v4();
        let assignee = Uuid::new_v4();

        // Approval and changes-requested go to every assignee, even
        // when the reviewing owner is one of them
        let recipients = fan_out_recipients(&[owner, assignee], None);
        assert_eq!(recipients, vec![owner, assignee]);
    }

    #[test]
    fn test_fan_out_with_absent_actor_keeps_everyone() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let recipients = fan_out_recipients(&[a, b], Some(Uuid::new_v4()));
        assert_eq!(recipients, vec![a, b]);
    }
}
