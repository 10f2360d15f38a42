use core::error::Error;
use core::future::Future;

use indexer_api::types::{
    DatabaseConnection, DatabaseConnectionId, IndexingType, IndexingTypeId, NewUserIndexingConfig,
    UserId, UserIndexingConfig,
};
use itertools::Itertools as _;

use crate::reconciler::{SelectionState, UnknownTypeError, ValidationError, choose_default_database};

/// Persists and returns indexing types and user configs
pub trait ConfigStore {
    /// failure of any store call
    type Error: Error + Send + Sync + 'static;

    /// The full catalog of indexing types
    fn list_indexing_types(
        &self,
    ) -> impl Future<Output = Result<Vec<IndexingType>, Self::Error>> + Send;

    /// Every config the user has persisted, active or not
    fn list_user_configs(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<UserIndexingConfig>, Self::Error>> + Send;

    /// Persist configs; the order of `configs` carries no meaning
    fn save_configs(
        &self,
        configs: &[NewUserIndexingConfig],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Returns the database connections a user owns
pub trait ConnectionDirectory {
    /// failure of any directory call
    type Error: Error + Send + Sync + 'static;

    /// Connections owned by `user_id`, in the order they should be offered
    fn list_connections(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<DatabaseConnection>, Self::Error>> + Send;
}

/// Errors of an [`IndexingSession`]
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// The config store failed
    #[error("config store request failed")]
    Store(#[source] Box<dyn Error + Send + Sync>),
    /// The connection directory failed
    #[error("connection directory request failed")]
    Directory(#[source] Box<dyn Error + Send + Sync>),
    /// The save request was refused before reaching the store
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A toggle referenced an id outside the catalog
    #[error(transparent)]
    UnknownType(#[from] UnknownTypeError),
    /// A database was selected that the user does not own
    #[error("database connection {0} is not one of the user's connections")]
    UnknownDatabase(DatabaseConnectionId),
}

/// Lifecycle of a loaded selection.
///
/// A session that was never loaded does not exist, so there is no uninitialized phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// freshly derived from the store
    Initialized,
    /// edited since the last load
    Dirty,
    /// saved; stays here until the next reload
    Submitted,
}

/// One user's editing session of their indexing configuration
#[derive(Debug, Clone)]
pub struct IndexingSession {
    user_id: UserId,
    catalog: Vec<IndexingType>,
    connections: Vec<DatabaseConnection>,
    selection: SelectionState,
    selected_database: Option<DatabaseConnectionId>,
    phase: Phase,
}

impl IndexingSession {
    /// Fetch catalog, configs and connections and derive the initial selection.
    ///
    /// # Errors
    ///
    /// When any of the remote calls fail
    #[tracing::instrument(skip(store, directory), err)]
    pub async fn load<S, D>(store: &S, directory: &D, user_id: UserId) -> Result<Self, SessionError>
    where
        S: ConfigStore + Sync,
        D: ConnectionDirectory + Sync,
    {
        let (catalog, existing, connections) = fetch_all(store, directory, user_id).await?;
        let selection = SelectionState::initialize(&catalog, &existing);
        let selected_database = choose_default_database(&connections, None);

        tracing::info!(
            catalog = catalog.len(),
            selected = %selection.selected().join(","),
            database = ?selected_database,
            "indexing configuration loaded"
        );

        Ok(Self {
            user_id,
            catalog,
            connections,
            selection,
            selected_database,
            phase: Phase::Initialized,
        })
    }

    /// Refetch everything and derive the selection again.
    ///
    /// The database choice survives when the user still owns it.
    ///
    /// # Errors
    ///
    /// When any of the remote calls fail; the session is left unchanged then
    #[tracing::instrument(skip_all, fields(user_id = %self.user_id), err)]
    pub async fn reload<S, D>(&mut self, store: &S, directory: &D) -> Result<(), SessionError>
    where
        S: ConfigStore + Sync,
        D: ConnectionDirectory + Sync,
    {
        let (catalog, existing, connections) = fetch_all(store, directory, self.user_id).await?;
        let kept = self
            .selected_database
            .filter(|id| connections.iter().any(|connection| connection.id == *id));

        self.selection = SelectionState::initialize(&catalog, &existing);
        self.selected_database = choose_default_database(&connections, kept);
        self.catalog = catalog;
        self.connections = connections;
        self.phase = Phase::Initialized;
        Ok(())
    }

    /// Flip one indexing type, returning its new flag
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownType`] for ids outside the catalog
    pub fn toggle(&mut self, type_id: IndexingTypeId) -> Result<bool, SessionError> {
        let selected = self.selection.toggle(type_id)?;
        tracing::debug!(%type_id, selected, "toggled indexing type");
        self.phase = Phase::Dirty;
        Ok(selected)
    }

    /// Choose the target database
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownDatabase`] when the user does not own `database_id`
    pub fn select_database(&mut self, database_id: DatabaseConnectionId) -> Result<(), SessionError> {
        if !self
            .connections
            .iter()
            .any(|connection| connection.id == database_id)
        {
            return Err(SessionError::UnknownDatabase(database_id));
        }
        self.selected_database = Some(database_id);
        self.phase = Phase::Dirty;
        Ok(())
    }

    /// The configs a save would persist, without sending anything
    ///
    /// # Errors
    ///
    /// See [`SelectionState::build_save_request`]
    pub fn save_request(&self) -> Result<Vec<NewUserIndexingConfig>, ValidationError> {
        self.selection
            .build_save_request(self.selected_database, self.user_id)
    }

    /// Validate and persist the selection.
    ///
    /// Nothing reaches the store when validation fails.
    ///
    /// # Errors
    ///
    /// [`SessionError::Validation`] before any network call, [`SessionError::Store`] when the
    /// store refuses the configs
    #[tracing::instrument(skip_all, fields(user_id = %self.user_id), err)]
    pub async fn save<S>(&mut self, store: &S) -> Result<Vec<NewUserIndexingConfig>, SessionError>
    where
        S: ConfigStore + Sync,
    {
        let configs = self.save_request()?;
        store
            .save_configs(&configs)
            .await
            .map_err(|err| SessionError::Store(Box::new(err)))?;

        tracing::info!(count = configs.len(), "indexing configuration saved");
        self.phase = Phase::Submitted;
        Ok(configs)
    }

    /// The user this session belongs to
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The catalog in the order the store returned it
    #[must_use]
    pub fn catalog(&self) -> &[IndexingType] {
        &self.catalog
    }

    /// The user's database connections
    #[must_use]
    pub fn connections(&self) -> &[DatabaseConnection] {
        &self.connections
    }

    /// Current selection
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Current target database
    #[must_use]
    pub const fn selected_database(&self) -> Option<DatabaseConnectionId> {
        self.selected_database
    }

    /// Current lifecycle phase
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }
}

async fn fetch_all<S, D>(
    store: &S,
    directory: &D,
    user_id: UserId,
) -> Result<
    (
        Vec<IndexingType>,
        Vec<UserIndexingConfig>,
        Vec<DatabaseConnection>,
    ),
    SessionError,
>
where
    S: ConfigStore + Sync,
    D: ConnectionDirectory + Sync,
{
    let catalog = store
        .list_indexing_types()
        .await
        .map_err(|err| SessionError::Store(Box::new(err)))?;
    let existing = store
        .list_user_configs(user_id)
        .await
        .map_err(|err| SessionError::Store(Box::new(err)))?;
    let connections = directory
        .list_connections(user_id)
        .await
        .map_err(|err| SessionError::Directory(Box::new(err)))?;
    Ok((catalog, existing, connections))
}
