use crate::error::CatalogError;
use crate::model::Project;
use pmgr_derive::api_model;
use std::cmp::Ordering;

/// Largest page a client may ask for.
const MAX_PAGE_SIZE: usize = 100;

#[api_model(rename_all = "lowercase")]
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    Name,
    Basename,
    #[default]
    Updated,
}

#[api_model(rename_all = "lowercase")]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Filters, ordering and pagination of project listings.
#[api_model(request, rename_all = "snake_case")]
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "server", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "server", into_params(parameter_in = Query))]
pub struct ListQuery {
    pub order_by: Option<OrderBy>,
    /// Defaults to descending for `updated` and ascending otherwise.
    pub ordering: Option<SortOrder>,
    /// Game slug.
    pub game: Option<String>,
    pub tag: Option<String>,
    /// Forum id of an owner or contributor.
    pub user: Option<u64>,
    /// 1-based.
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ListQuery {
    pub(crate) fn matches(&self, project: &Project) -> bool {
        self.game.as_ref().is_none_or(|game| project.supported_games.contains(game))
            && self.tag.as_ref().is_none_or(|tag| project.tags.contains(tag))
            && self.user.is_none_or(|user| project.can_edit(user))
    }

    pub(crate) fn sort(&self, projects: &mut [Project]) {
        let order_by = self.order_by.unwrap_or_default();
        let ordering = self.ordering.unwrap_or(match order_by {
            OrderBy::Updated => SortOrder::Desc,
            OrderBy::Name | OrderBy::Basename => SortOrder::Asc,
        });

        projects.sort_by(|a, b| {
            let ord: Ordering = match order_by {
                OrderBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                OrderBy::Basename => a.basename.cmp(&b.basename),
                OrderBy::Updated => a.updated().cmp(&b.updated()),
            };
            let ord = ord.then_with(|| a.key.slug.cmp(&b.key.slug));
            match ordering {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }

    /// Cuts one page out of `items`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for page 0 and pages past the end.
    pub(crate) fn paginate<T>(&self, items: Vec<T>, default_size: usize) -> Result<Page<T>, CatalogError> {
        let page_size = self.page_size.unwrap_or(default_size).clamp(1, MAX_PAGE_SIZE);
        let page = self.page.unwrap_or(1);
        let total = items.len();
        let total_pages = total.div_ceil(page_size).max(1);

        if page == 0 || page > total_pages {
            return Err(CatalogError::not_found("Invalid page."));
        }

        let items = items.into_iter().skip((page - 1) * page_size).take(page_size).collect();
        Ok(Page { items, page, page_size, total, total_pages })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_one_based() {
        let query = ListQuery { page: Some(2), page_size: Some(2), ..ListQuery::default() };
        let page = query.paginate((1..=5).collect(), 20).unwrap();
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn empty_listing_has_one_page() {
        let page = ListQuery::default().paginate(Vec::<u8>::new(), 20).unwrap();
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn pages_past_the_end_are_missing() {
        let query = ListQuery { page: Some(4), page_size: Some(2), ..ListQuery::default() };
        assert!(matches!(query.paginate((1..=5).collect(), 20), Err(CatalogError::NotFound { .. })));
        let query = ListQuery { page: Some(0), ..ListQuery::default() };
        assert!(query.paginate(vec![1], 20).is_err());
    }
}
