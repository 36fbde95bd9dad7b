use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QuerySelect,
    Select,
    sea_query::{BinOper, Expr, Func, LikeExpr, SimpleExpr},
};
use stillwater_domain::pagination::{PageInfo, PageRequest, Paginated};

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Case-insensitive substring match: `LOWER(col) LIKE '%term%'`.
pub fn contains_ci<C: ColumnTrait>(col: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    Expr::expr(Func::lower(Expr::col((col.entity_name(), col))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

/// OR of [`contains_ci`] across several columns.
pub fn search_any<C: ColumnTrait>(cols: &[C], term: &str) -> Condition {
    cols.iter()
        .fold(Condition::any(), |cond, col| cond.add(contains_ci(*col, term)))
}

/// JSONB containment: `col @> value`.
pub fn json_contains<C: ColumnTrait>(col: C, value: serde_json::Value) -> SimpleExpr {
    Expr::col((col.entity_name(), col)).binary(BinOper::Custom("@>"), Expr::val(value))
}

/// Run a select in dual mode: everything when `page` is `None`, otherwise
/// one page plus the total count.
pub async fn fetch_page<'db, E, C>(
    select: Select<E>,
    page: Option<PageRequest>,
    db: &'db C,
) -> Result<Paginated<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'db,
    C: ConnectionTrait,
{
    match page {
        None => Ok(Paginated::all(select.all(db).await?)),
        Some(request) => {
            let total = select.clone().count(db).await?;
            let items = select
                .offset(request.skip())
                .limit(request.take())
                .all(db)
                .await?;
            Ok(Paginated::page(items, PageInfo::new(request, total)))
        }
    }
}
