use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Select,
    sea_query::{NullOrdering, Order},
};
use serde_json::json;
use uuid::Uuid;

use stillwater_api_schema::content_items;
use stillwater_core::sea_ext::{contains_ci, fetch_page, json_contains, search_any};
use stillwater_domain::content::{ContentField, ContentKind, ContentSort};
use stillwater_domain::pagination::{PageRequest, Paginated};
use stillwater_domain::query::Window;

use crate::domain::filter::ContentFilter;
use crate::domain::repository::ContentRepository;
use crate::domain::types::{ContentItem, ContentPatch};
use crate::error::ApiError;
use crate::infra::db::{from_json_column, parse_column, to_json_column};

#[derive(Clone)]
pub struct DbContentRepository {
    pub db: DatabaseConnection,
}

fn field_column(field: ContentField) -> content_items::Column {
    match field {
        ContentField::Title => content_items::Column::Title,
        ContentField::Body => content_items::Column::Body,
        ContentField::Author => content_items::Column::Author,
    }
}

fn content_condition(filter: &ContentFilter) -> Condition {
    let mut cond = Condition::all().add(content_items::Column::Kind.eq(filter.kind.as_str()));
    if let Some(term) = filter.search.as_deref() {
        let cols: Vec<_> = filter
            .kind
            .search_fields()
            .iter()
            .copied()
            .map(field_column)
            .collect();
        cond = cond.add(search_any(&cols, term));
    }
    if let Some(active) = filter.active {
        cond = cond.add(content_items::Column::IsActive.eq(active));
    }
    if let Some(archived) = filter.archived {
        cond = cond.add(content_items::Column::IsArchived.eq(archived));
    }
    if let Some(published) = filter.published {
        cond = cond.add(content_items::Column::IsPublished.eq(published));
    }
    if let Some(tag) = filter.tag.as_deref() {
        cond = cond.add(json_contains(
            content_items::Column::Tags,
            json!([tag.to_lowercase()]),
        ));
    }
    if let Some(author) = filter.author.as_deref() {
        cond = cond.add(contains_ci(content_items::Column::Author, author));
    }
    cond
}

fn sorted(select: Select<content_items::Entity>, kind: ContentKind) -> Select<content_items::Entity> {
    match kind.sort() {
        ContentSort::Newest => select.order_by_desc(content_items::Column::CreatedAt),
        ContentSort::Ordered => select
            .order_by_asc(content_items::Column::OrderIndex)
            .order_by_asc(content_items::Column::CreatedAt),
    }
}

impl DbContentRepository {
    async fn find_model(
        &self,
        kind: ContentKind,
        id: Uuid,
    ) -> Result<Option<content_items::Model>, ApiError> {
        let model = content_items::Entity::find_by_id(id)
            .filter(content_items::Column::Kind.eq(kind.as_str()))
            .one(&self.db)
            .await
            .context("find content item")?;
        Ok(model)
    }
}

impl ContentRepository for DbContentRepository {
    async fn list(
        &self,
        filter: &ContentFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<ContentItem>, ApiError> {
        let select = sorted(
            content_items::Entity::find().filter(content_condition(filter)),
            filter.kind,
        );
        fetch_page(select, page, &self.db)
            .await
            .context("list content")?
            .try_map(content_from_model)
    }

    async fn find_by_id(
        &self,
        kind: ContentKind,
        id: Uuid,
    ) -> Result<Option<ContentItem>, ApiError> {
        self.find_model(kind, id)
            .await?
            .map(content_from_model)
            .transpose()
    }

    async fn create(&self, item: &ContentItem) -> Result<(), ApiError> {
        content_items::ActiveModel {
            id: Set(item.id),
            kind: Set(item.kind.as_str().to_owned()),
            title: Set(item.title.clone()),
            body: Set(item.body.clone()),
            author: Set(item.author.clone()),
            media_url: Set(item.media_url.clone()),
            tags: Set(to_json_column("tags", &item.tags)?),
            scheduled_at: Set(item.scheduled_at),
            is_active: Set(item.is_active),
            is_archived: Set(item.is_archived),
            is_published: Set(item.is_published),
            order_index: Set(item.order_index),
            created_at: Set(item.created_at),
            updated_at: Set(item.updated_at),
        }
        .insert(&self.db)
        .await
        .context("insert content item")?;
        Ok(())
    }

    async fn update(
        &self,
        kind: ContentKind,
        id: Uuid,
        patch: &ContentPatch,
    ) -> Result<Option<ContentItem>, ApiError> {
        if self.find_model(kind, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = content_items::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(title) = &patch.title {
            model.title = Set(title.clone());
        }
        if let Some(body) = &patch.body {
            model.body = Set(body.clone());
        }
        if let Some(author) = &patch.author {
            model.author = Set(author.clone());
        }
        if let Some(media_url) = &patch.media_url {
            model.media_url = Set(media_url.clone());
        }
        if let Some(tags) = &patch.tags {
            model.tags = Set(to_json_column("tags", tags)?);
        }
        if let Some(scheduled_at) = patch.scheduled_at {
            model.scheduled_at = Set(scheduled_at);
        }
        if let Some(active) = patch.is_active {
            model.is_active = Set(active);
        }
        if let Some(archived) = patch.is_archived {
            model.is_archived = Set(archived);
        }
        if let Some(published) = patch.is_published {
            model.is_published = Set(published);
        }
        if let Some(order_index) = patch.order_index {
            model.order_index = Set(order_index);
        }

        match model.update(&self.db).await {
            Ok(model) => content_from_model(model).map(Some),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(ApiError::Internal(anyhow::Error::new(e).context("update content item"))),
        }
    }

    async fn delete(&self, kind: ContentKind, id: Uuid) -> Result<bool, ApiError> {
        let result = content_items::Entity::delete_many()
            .filter(content_items::Column::Id.eq(id))
            .filter(content_items::Column::Kind.eq(kind.as_str()))
            .exec(&self.db)
            .await
            .context("delete content item")?;
        Ok(result.rows_affected > 0)
    }

    async fn current(
        &self,
        kind: ContentKind,
        window: Window,
    ) -> Result<Option<ContentItem>, ApiError> {
        let scheduled = Condition::any()
            .add(
                Condition::all()
                    .add(content_items::Column::ScheduledAt.gte(window.start))
                    .add(content_items::Column::ScheduledAt.lt(window.end)),
            )
            .add(content_items::Column::ScheduledAt.is_null());

        let model = content_items::Entity::find()
            .filter(content_items::Column::Kind.eq(kind.as_str()))
            .filter(content_items::Column::IsActive.eq(true))
            .filter(content_items::Column::IsArchived.eq(false))
            .filter(content_items::Column::IsPublished.eq(true))
            .filter(scheduled)
            .order_by_with_nulls(
                content_items::Column::ScheduledAt,
                Order::Desc,
                NullOrdering::Last,
            )
            .order_by_desc(content_items::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find current content")?;
        model.map(content_from_model).transpose()
    }
}

fn content_from_model(model: content_items::Model) -> Result<ContentItem, ApiError> {
    Ok(ContentItem {
        id: model.id,
        kind: parse_column("kind", &model.kind, ContentKind::parse)?,
        title: model.title,
        body: model.body,
        author: model.author,
        media_url: model.media_url,
        tags: from_json_column("tags", model.tags)?,
        scheduled_at: model.scheduled_at,
        is_active: model.is_active,
        is_archived: model.is_archived,
        is_published: model.is_published,
        order_index: model.order_index,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
