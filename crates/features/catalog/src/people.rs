use crate::CatalogInner;
use crate::error::{CatalogError, invalid};
use crate::model::{ForumUser, Project};
use crate::projects::ensure_owner;
use chrono::Utc;
use pmgr_kernel::domain::constants::{USERNAME_MAX_LENGTH, fields};
use pmgr_kernel::domain::project::ProjectKey;
use pmgr_kernel::validation::{check_length, check_required};
use tracing::info;

/// Projects a user owns and the ones they contribute to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProjects {
    pub owned: Vec<Project>,
    pub contributions: Vec<Project>,
}

impl CatalogInner {
    /// # Errors
    ///
    /// Rejects blank or long usernames; [`CatalogError::Conflict`] when the forum id or the
    /// username is already registered.
    pub fn register_user(&self, forum_id: u64, username: &str) -> Result<ForumUser, CatalogError> {
        let username = username.trim();
        check_required(fields::USERNAME, username)?;
        check_length(fields::USERNAME, username, USERNAME_MAX_LENGTH)?;

        let mut state = self.store.write();
        if state.users.contains_key(&forum_id) {
            return Err(CatalogError::conflict(
                "forum_id",
                format!("Forum user {forum_id} already registered."),
            ));
        }
        if state.user_by_name(username).is_some() {
            return Err(CatalogError::conflict(
                fields::USERNAME,
                format!("Username \"{username}\" already taken."),
            ));
        }

        let user = ForumUser { forum_id, username: username.to_owned(), created: Utc::now() };
        state.users.insert(forum_id, user.clone());
        info!(forum_id, %username, "User registered");
        Ok(user)
    }

    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for unknown forum ids.
    pub fn user(&self, forum_id: u64) -> Result<ForumUser, CatalogError> {
        self.store
            .read()
            .users
            .get(&forum_id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(format!("No user with forum id {forum_id}.")))
    }

    /// All users by username.
    #[must_use]
    pub fn users(&self) -> Vec<ForumUser> {
        let mut users: Vec<ForumUser> = self.store.read().users.values().cloned().collect();
        users.sort_by(|a, b| a.username.to_lowercase().cmp(&b.username.to_lowercase()));
        users
    }

    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for unknown forum ids.
    pub fn user_projects(&self, forum_id: u64) -> Result<UserProjects, CatalogError> {
        self.user(forum_id)?;
        let state = self.store.read();
        let mut projects = UserProjects::default();
        for project in state.projects.values() {
            if project.is_owner(forum_id) {
                projects.owned.push(project.clone());
            } else if project.contributors.contains(&forum_id) {
                projects.contributions.push(project.clone());
            }
        }
        projects.owned.sort_by(|a, b| a.name.cmp(&b.name));
        projects.contributions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    /// Owner only.
    ///
    /// # Errors
    ///
    /// Rejects unknown users, the owner and existing contributors.
    pub fn add_contributor(
        &self,
        key: &ProjectKey,
        username: &str,
        actor: u64,
    ) -> Result<Project, CatalogError> {
        let mut state = self.store.write();
        let user = state
            .user_by_name(username)
            .map(|user| user.forum_id)
            .ok_or_else(|| invalid(fields::USERNAME, format!("No user named \"{username}\".")))?;

        let project = state.project_mut(key)?;
        ensure_owner(project, actor)?;
        if project.is_owner(user) {
            return Err(invalid(
                fields::USERNAME,
                format!("User {username} is the owner, cannot add as a contributor."),
            ));
        }
        if project.contributors.contains(&user) {
            return Err(invalid(
                fields::USERNAME,
                format!("User {username} is already a contributor."),
            ));
        }

        project.contributors.push(user);
        project.modified = Utc::now();
        info!(project = %key, %username, "Contributor added");
        Ok(project.clone())
    }

    /// Owner only.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] when the user does not contribute to the project.
    pub fn remove_contributor(
        &self,
        key: &ProjectKey,
        username: &str,
        actor: u64,
    ) -> Result<Project, CatalogError> {
        let mut state = self.store.write();
        let user = state.user_by_name(username).map(|user| user.forum_id);
        let project = state.project_mut(key)?;
        ensure_owner(project, actor)?;

        let before = project.contributors.len();
        project.contributors.retain(|id| Some(*id) != user);
        if project.contributors.len() == before {
            return Err(CatalogError::not_found(format!("User {username} is not a contributor.")));
        }
        project.modified = Utc::now();
        Ok(project.clone())
    }
}
