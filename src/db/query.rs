use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Select};

use crate::entities::{prelude::Users, users};

/// Optional constraints for a filtered listing. Absent fields contribute
/// nothing to the generated statement.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub gender: Option<String>,
    pub limit: Option<u64>,
}

impl UserFilter {
    /// Builds a filter from raw query input. Empty or whitespace-only
    /// strings count as absent, so `?gender=` lists everything.
    #[must_use]
    pub fn new(gender: Option<String>, limit: Option<u64>) -> Self {
        Self {
            gender: gender.filter(|g| !g.trim().is_empty()),
            limit,
        }
    }
}

/// Assembles the listing SELECT. Every present filter contributes one bound
/// condition; a LIMIT is appended only for a positive cap. With no filters
/// this is the plain full-table query.
pub fn filtered_select(filter: &UserFilter) -> Select<users::Entity> {
    let mut query = Users::find();

    if let Some(gender) = &filter.gender {
        query = query.filter(users::Column::Gender.eq(gender.clone()));
    }

    if let Some(limit) = filter.limit
        && limit > 0
    {
        query = query.limit(limit);
    }

    query
}
