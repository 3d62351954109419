use std::sync::Arc;

use agora_types::{Result, report::Report};

use crate::{
    config::Config,
    cqrs::{QueryHandler, queries::GetReportById},
    uow::UnitOfWork,
};

pub struct GetReportByIdHandler;

impl GetReportByIdHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl QueryHandler<GetReportById> for GetReportByIdHandler {
    async fn handle(
        &self,
        query: GetReportById,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<Report> {
        uow.reports().get_by_id(query.report_id).await
    }
}
