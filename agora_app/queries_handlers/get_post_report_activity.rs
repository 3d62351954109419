use std::sync::Arc;

use agora_types::Result;

use crate::{
    config::Config,
    cqrs::{
        QueryHandler,
        queries::{GetPostReportActivity, PostReportActivity},
    },
    uow::UnitOfWork,
};

pub struct GetPostReportActivityHandler;

impl GetPostReportActivityHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl QueryHandler<GetPostReportActivity> for GetPostReportActivityHandler {
    async fn handle(
        &self,
        query: GetPostReportActivity,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<PostReportActivity> {
        let post = uow.posts().get_by_id(query.post_id).await?;
        let author = uow.users().get_by_id(post.author_user_id).await?;
        let report_count = uow.reports().count_for_post(post.id).await?;

        Ok(PostReportActivity {
            post,
            author,
            report_count,
        })
    }
}
