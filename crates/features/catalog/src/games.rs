use crate::CatalogInner;
use crate::error::{CatalogError, invalid};
use crate::model::{Game, Project};
use crate::projects::ensure_editor;
use chrono::Utc;
use pmgr_kernel::domain::constants::fields;
use pmgr_kernel::domain::project::ProjectKey;

impl CatalogInner {
    #[must_use]
    pub fn games(&self) -> Vec<Game> {
        let mut games: Vec<Game> = self.store.read().games.values().cloned().collect();
        games.sort_by(|a, b| a.name.cmp(&b.name));
        games
    }

    /// Marks the project as supporting a game, addressed by slug or basename.
    ///
    /// # Errors
    ///
    /// Rejects unknown games and games already linked.
    pub fn add_game(&self, key: &ProjectKey, game: &str, actor: u64) -> Result<Project, CatalogError> {
        let mut state = self.store.write();
        let slug = state
            .games
            .values()
            .find(|known| known.slug == game || known.basename == game)
            .map(|known| known.slug.clone())
            .ok_or_else(|| invalid(fields::GAME, format!("Invalid game \"{game}\".")))?;

        let project = state.project_mut(key)?;
        ensure_editor(project, actor)?;
        if project.supported_games.contains(&slug) {
            return Err(invalid(fields::GAME, format!("Game already linked to {}.", key.kind)));
        }
        project.supported_games.push(slug);
        project.modified = Utc::now();
        Ok(project.clone())
    }

    /// # Errors
    ///
    /// [`CatalogError::NotFound`] when the game is not linked.
    pub fn remove_game(&self, key: &ProjectKey, game: &str, actor: u64) -> Result<Project, CatalogError> {
        let mut state = self.store.write();
        let slug = state
            .games
            .values()
            .find(|known| known.slug == game || known.basename == game)
            .map_or_else(|| game.to_owned(), |known| known.slug.clone());

        let project = state.project_mut(key)?;
        ensure_editor(project, actor)?;
        let before = project.supported_games.len();
        project.supported_games.retain(|linked| *linked != slug);
        if project.supported_games.len() == before {
            return Err(CatalogError::not_found(format!(
                "Game \"{game}\" not linked to {}.",
                key.kind
            )));
        }
        project.modified = Utc::now();
        Ok(project.clone())
    }
}
