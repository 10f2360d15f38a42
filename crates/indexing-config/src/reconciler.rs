use std::collections::BTreeMap;

use indexer_api::types::{
    DatabaseConnection, DatabaseConnectionId, IndexingType, IndexingTypeId, NewUserIndexingConfig,
    UserId, UserIndexingConfig,
};

/// Reasons a save request is refused before anything is sent to the store
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// No target database was chosen
    #[error("Please select a database connection first")]
    NoDatabaseSelected,
    /// Every indexing type is deselected
    #[error("Please select at least one data type to index")]
    NoTypesSelected,
}

/// A toggle referenced an id that is not part of the catalog
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("indexing type {0} is not part of the catalog")]
pub struct UnknownTypeError(pub IndexingTypeId);

/// Which indexing types the user wants, keyed by catalog id.
///
/// The key set is fixed when the state is created from the catalog and never grows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    flags: BTreeMap<IndexingTypeId, bool>,
}

impl SelectionState {
    /// Derive the selection from the catalog and the configs the user already has.
    ///
    /// A type is selected iff an active config references it.
    #[must_use]
    pub fn initialize(catalog: &[IndexingType], existing: &[UserIndexingConfig]) -> Self {
        let flags = catalog
            .iter()
            .map(|indexing_type| {
                let configured = existing.iter().any(|config| {
                    config.indexing_type_id == indexing_type.id && config.active
                });
                (indexing_type.id, configured)
            })
            .collect();
        Self { flags }
    }

    /// Flip the flag of `type_id` and return its new value.
    ///
    /// # Errors
    ///
    /// [`UnknownTypeError`] when `type_id` is not in the catalog; the state is left untouched.
    pub fn toggle(&mut self, type_id: IndexingTypeId) -> Result<bool, UnknownTypeError> {
        let flag = self
            .flags
            .get_mut(&type_id)
            .ok_or(UnknownTypeError(type_id))?;
        *flag = !*flag;
        Ok(*flag)
    }

    /// `None` when `type_id` is not in the catalog
    #[must_use]
    pub fn is_selected(&self, type_id: IndexingTypeId) -> Option<bool> {
        self.flags.get(&type_id).copied()
    }

    /// All catalog ids with their flag, in id order
    pub fn iter(&self) -> impl Iterator<Item = (IndexingTypeId, bool)> + '_ {
        self.flags.iter().map(|(id, flag)| (*id, *flag))
    }

    /// Ids of the selected types, in id order
    pub fn selected(&self) -> impl Iterator<Item = IndexingTypeId> + '_ {
        self.iter().filter_map(|(id, flag)| flag.then_some(id))
    }

    /// Amount of catalog entries tracked
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// true for an empty catalog
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Validate the selection and turn it into the configs to persist.
    ///
    /// The database is checked first, so a missing database wins over an empty selection.
    /// Configs come out in ascending type id order.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NoDatabaseSelected`] when `database_connection_id` is `None`
    /// - [`ValidationError::NoTypesSelected`] when no type is selected
    pub fn build_save_request(
        &self,
        database_connection_id: Option<DatabaseConnectionId>,
        user_id: UserId,
    ) -> Result<Vec<NewUserIndexingConfig>, ValidationError> {
        let database_connection_id =
            database_connection_id.ok_or(ValidationError::NoDatabaseSelected)?;

        let configs = self
            .selected()
            .map(|indexing_type_id| NewUserIndexingConfig {
                user_id,
                indexing_type_id,
                database_connection_id,
            })
            .collect::<Vec<_>>();

        if configs.is_empty() {
            return Err(ValidationError::NoTypesSelected);
        }
        Ok(configs)
    }
}

/// Pick the database to preselect.
///
/// An existing selection is kept as is; otherwise the first connection wins.
#[must_use]
pub fn choose_default_database(
    connections: &[DatabaseConnection],
    current_selection: Option<DatabaseConnectionId>,
) -> Option<DatabaseConnectionId> {
    current_selection.or_else(|| connections.first().map(|connection| connection.id))
}
