//! Reads served from precomputed views.

use crate::error::StorageResult;
use crate::schema::{EntitySchema, ReadSource, ViewSchema};
use crate::search::{SearchPlan, SearchRequest};
use crate::types::{PaginationPolicy, Record};

use super::EntityStore;

/// Lists a schema's view with the view's own search profile.
///
/// Strategy selection, predicate building and pagination are the same as for
/// the base table; only the relation and profile differ.
pub struct ViewBackedReader<'a, S: EntityStore + ?Sized> {
    store: &'a S,
    schema: &'a EntitySchema,
    view: &'a ViewSchema,
}

impl<'a, S: EntityStore + ?Sized> ViewBackedReader<'a, S> {
    pub fn new(store: &'a S, schema: &'a EntitySchema, view: &'a ViewSchema) -> Self {
        Self {
            store,
            schema,
            view,
        }
    }

    /// Plans `request` against the view profile.
    pub fn plan(&self, request: &SearchRequest, pagination: &PaginationPolicy) -> SearchPlan {
        SearchPlan::build(&self.view.profile, request, pagination)
    }

    pub async fn read(
        &self,
        request: &SearchRequest,
        pagination: &PaginationPolicy,
    ) -> StorageResult<Vec<Record>> {
        let plan = self.plan(request, pagination);
        tracing::debug!(
            entity = %self.schema.name,
            relation = %self.view.relation,
            skip = plan.is_skip(),
            "Reading from view"
        );
        self.store
            .search(ReadSource::View(self.schema, self.view), &plan)
            .await
    }
}
