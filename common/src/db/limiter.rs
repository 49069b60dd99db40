use crate::model::{ListQueryParameters, ListQueryResult};
use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, FromQueryResult, Paginator, PaginatorTrait, QuerySelect,
    Select, SelectModel, Selector, SelectorTrait,
};
use std::num::NonZeroU64;

/// A query with an applied page window, still able to count the full result.
pub struct Limiter<'db, C, S1, S2>
where
    C: ConnectionTrait,
    S1: SelectorTrait + 'db,
    S2: SelectorTrait + 'db,
{
    db: &'db C,
    selector: Selector<S1>,
    paginator: Paginator<'db, C, S2>,
}

impl<'db, C, S1, S2> Limiter<'db, C, S1, S2>
where
    C: ConnectionTrait,
    S1: SelectorTrait + 'db,
    S2: SelectorTrait + 'db,
{
    pub async fn fetch(self) -> Result<Vec<S1::Item>, DbErr> {
        self.selector.all(self.db).await
    }

    pub async fn total(&self) -> Result<u64, DbErr> {
        self.paginator.num_items().await
    }

    /// Fetch the page and the total count, wrapped up as a list result.
    pub async fn into_result(
        self,
        params: ListQueryParameters,
    ) -> Result<ListQueryResult<S1::Item>, DbErr> {
        let total_count = self.total().await?;
        let data = self.fetch().await?;

        Ok(ListQueryResult {
            data,
            params,
            total_count,
        })
    }
}

pub trait LimiterTrait<'db, C>
where
    C: ConnectionTrait,
{
    type FetchSelector: SelectorTrait + 'db;
    type CountSelector: SelectorTrait + 'db;

    fn limiting(
        self,
        db: &'db C,
        offset: u64,
        limit: u64,
    ) -> Limiter<'db, C, Self::FetchSelector, Self::CountSelector>;

    /// Apply the paging of list query parameters.
    fn limiting_params(
        self,
        db: &'db C,
        params: &ListQueryParameters,
    ) -> Limiter<'db, C, Self::FetchSelector, Self::CountSelector>
    where
        Self: Sized,
    {
        self.limiting(db, params.offset(), params.limit())
    }
}

impl<'db, C, E, M> LimiterTrait<'db, C> for Select<E>
where
    C: ConnectionTrait,
    E: EntityTrait<Model = M>,
    M: FromQueryResult + Sized + Send + Sync + 'db,
{
    type FetchSelector = SelectModel<M>;
    type CountSelector = SelectModel<M>;

    fn limiting(
        self,
        db: &'db C,
        offset: u64,
        limit: u64,
    ) -> Limiter<'db, C, Self::FetchSelector, Self::CountSelector> {
        let selector = self
            .clone()
            .limit(NonZeroU64::new(limit).map(|limit| limit.get()))
            .offset(NonZeroU64::new(offset).map(|offset| offset.get()))
            .into_model();

        Limiter {
            db,
            paginator: self.paginate(db, 1),
            selector,
        }
    }
}
