use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use stillwater_api_schema::{post_flags, posts};
use stillwater_core::sea_ext::{fetch_page, search_any};
use stillwater_domain::pagination::{PageRequest, Paginated};
use stillwater_domain::post::{PostStatus, Visibility};

use crate::domain::filter::PostFilter;
use crate::domain::repository::PostRepository;
use crate::domain::types::{FlagOutcome, Post, PostStats};
use crate::error::ApiError;
use crate::infra::db::parse_column;

#[derive(Clone)]
pub struct DbPostRepository {
    pub db: DatabaseConnection,
}

fn post_condition(filter: &PostFilter) -> Condition {
    let mut cond = Condition::all().add(posts::Column::DeletedAt.is_null());
    if let Some(term) = filter.search.as_deref() {
        cond = cond.add(search_any(
            &[posts::Column::Title, posts::Column::Content],
            term,
        ));
    }
    if let Some(status) = filter.status {
        cond = cond.add(posts::Column::Status.eq(status.as_str()));
    }
    match filter.flagged {
        Some(true) => cond = cond.add(posts::Column::FlagCount.gt(0)),
        Some(false) => cond = cond.add(posts::Column::FlagCount.eq(0)),
        None => {}
    }
    if let Some(user_id) = filter.user_id {
        cond = cond.add(posts::Column::UserId.eq(user_id));
    }
    if let Some(visibility) = filter.visibility {
        cond = cond.add(posts::Column::Visibility.eq(visibility.as_str()));
    }
    cond
}

impl PostRepository for DbPostRepository {
    async fn list(
        &self,
        filter: &PostFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<Post>, ApiError> {
        let select = posts::Entity::find()
            .filter(post_condition(filter))
            .order_by_desc(posts::Column::CreatedAt);
        fetch_page(select, page, &self.db)
            .await
            .context("list posts")?
            .try_map(post_from_model)
    }

    async fn stats(&self) -> Result<PostStats, ApiError> {
        let by_status: Vec<(String, i64)> = posts::Entity::find()
            .select_only()
            .column(posts::Column::Status)
            .column_as(posts::Column::Id.count(), "count")
            .filter(posts::Column::DeletedAt.is_null())
            .group_by(posts::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .context("count posts by status")?;

        let flagged = posts::Entity::find()
            .filter(posts::Column::DeletedAt.is_null())
            .filter(posts::Column::FlagCount.gt(0))
            .count(&self.db)
            .await
            .context("count flagged posts")?;

        let mut stats = PostStats {
            flagged,
            ..Default::default()
        };
        for (status, count) in by_status {
            let count = u64::try_from(count).unwrap_or_default();
            stats.total += count;
            match PostStatus::parse(&status) {
                Some(PostStatus::Pending) => stats.pending = count,
                Some(PostStatus::Approved) => stats.approved = count,
                Some(PostStatus::Rejected) => stats.rejected = count,
                None => tracing::warn!(status = %status, "unexpected post status"),
            }
        }
        Ok(stats)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, ApiError> {
        let model = posts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find post")?;
        model.map(post_from_model).transpose()
    }

    async fn create(&self, post: &Post) -> Result<(), ApiError> {
        posts::ActiveModel {
            id: Set(post.id),
            user_id: Set(post.user_id),
            title: Set(post.title.clone()),
            content: Set(post.content.clone()),
            image_url: Set(post.image_url.clone()),
            status: Set(post.status.as_str().to_owned()),
            visibility: Set(post.visibility.as_str().to_owned()),
            flag_count: Set(0),
            deleted_at: Set(None),
            created_at: Set(post.created_at),
            updated_at: Set(post.updated_at),
        }
        .insert(&self.db)
        .await
        .context("insert post")?;
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: PostStatus) -> Result<Option<Post>, ApiError> {
        let model = posts::ActiveModel {
            id: Set(id),
            status: Set(status.as_str().to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        match model.update(&self.db).await {
            Ok(model) => post_from_model(model).map(Some),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(ApiError::Internal(anyhow::Error::new(e).context("set post status"))),
        }
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, ApiError> {
        let result = posts::Entity::update_many()
            .col_expr(posts::Column::DeletedAt, Expr::value(at))
            .col_expr(posts::Column::UpdatedAt, Expr::value(at))
            .filter(posts::Column::Id.eq(id))
            .filter(posts::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .context("soft delete post")?;
        Ok(result.rows_affected > 0)
    }

    async fn flag(&self, post_id: Uuid, user_id: Uuid) -> Result<FlagOutcome, ApiError> {
        let outcome = self
            .db
            .transaction::<_, FlagOutcome, DbErr>(|txn| {
                Box::pin(async move {
                    let inserted = post_flags::Entity::insert(post_flags::ActiveModel {
                        post_id: Set(post_id),
                        user_id: Set(user_id),
                        created_at: Set(Utc::now()),
                    })
                    .on_conflict(
                        OnConflict::columns([post_flags::Column::PostId, post_flags::Column::UserId])
                            .do_nothing()
                            .to_owned(),
                    )
                    .exec_without_returning(txn)
                    .await?;
                    if inserted == 0 {
                        return Ok(FlagOutcome::AlreadyFlagged);
                    }

                    posts::Entity::update_many()
                        .col_expr(
                            posts::Column::FlagCount,
                            Expr::col(posts::Column::FlagCount).add(1),
                        )
                        .filter(posts::Column::Id.eq(post_id))
                        .exec(txn)
                        .await?;

                    let flag_count: Option<i32> = posts::Entity::find_by_id(post_id)
                        .select_only()
                        .column(posts::Column::FlagCount)
                        .into_tuple()
                        .one(txn)
                        .await?;
                    Ok(FlagOutcome::Flagged {
                        flag_count: flag_count.unwrap_or(1),
                    })
                })
            })
            .await
            .context("flag post")?;
        Ok(outcome)
    }
}

fn post_from_model(model: posts::Model) -> Result<Post, ApiError> {
    Ok(Post {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        content: model.content,
        image_url: model.image_url,
        status: parse_column("status", &model.status, PostStatus::parse)?,
        visibility: parse_column("visibility", &model.visibility, Visibility::parse)?,
        flag_count: model.flag_count,
        deleted_at: model.deleted_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
