use std::sync::Arc;

use agora_types::{Result, report::Report};

use crate::{
    config::Config,
    cqrs::{QueryHandler, queries::ListReports},
    uow::UnitOfWork,
};

pub struct ListReportsHandler;

impl ListReportsHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl QueryHandler<ListReports> for ListReportsHandler {
    async fn handle(
        &self,
        query: ListReports,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<Vec<Report>> {
        uow.reports().list(query.status, query.limit).await
    }
}
