//! Hypermedia links attached to API responses.

use serde::Serialize;
use url::form_urlencoded;
use utoipa::ToSchema;

use super::pagination::{Paginated, PaginationMeta};

pub const REL_SELF: &str = "self";
pub const REL_FIRST: &str = "first";
pub const REL_PREV: &str = "prev";
pub const REL_NEXT: &str = "next";
pub const REL_LAST: &str = "last";

/// A single navigation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Link {
    #[schema(example = "self")]
    pub rel: String,
    #[schema(example = "/tags/1")]
    pub href: String,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }

    pub fn self_link(href: impl Into<String>) -> Self {
        Self::new(REL_SELF, href)
    }
}

/// A resource together with its links
#[derive(Debug, Clone, Serialize)]
pub struct EntityModel<T> {
    #[serde(flatten)]
    pub content: T,
    pub links: Vec<Link>,
}

impl<T> EntityModel<T> {
    pub fn new(content: T, links: Vec<Link>) -> Self {
        Self { content, links }
    }
}

/// A page of resources with page metadata and navigation links
#[derive(Debug, Clone, Serialize)]
pub struct CollectionModel<T> {
    pub content: Vec<EntityModel<T>>,
    pub page: PaginationMeta,
    pub links: Vec<Link>,
}

impl<T> CollectionModel<T> {
    /// Wrap a page, linking each item with `item_links` and the page itself
    /// relative to `base`.
    pub fn from_page(
        page: Paginated<T>,
        base: &PageLinkBase,
        item_links: impl Fn(&T) -> Vec<Link>,
    ) -> Self {
        let links = base.links(&page.meta);
        let content = page
            .data
            .into_iter()
            .map(|item| {
                let links = item_links(&item);
                EntityModel::new(item, links)
            })
            .collect();

        Self {
            content,
            page: page.meta,
            links,
        }
    }

    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.rel == rel)
    }
}

/// Path plus the non-paging query parameters a page link must carry over
#[derive(Debug, Clone, Default)]
pub struct PageLinkBase {
    path: String,
    query: Vec<(String, String)>,
}

impl PageLinkBase {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn with_optional_param(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with_param(key, value),
            None => self,
        }
    }

    /// Link to the given page
    pub fn href(&self, page: u64, size: u64) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.query {
            serializer.append_pair(key, value);
        }
        serializer.append_pair("page", &page.to_string());
        serializer.append_pair("size", &size.to_string());

        format!("{}?{}", self.path, serializer.finish())
    }

    /// self/first/prev/next/last links for a page
    pub fn links(&self, meta: &PaginationMeta) -> Vec<Link> {
        let mut links = vec![
            Link::self_link(self.href(meta.number, meta.size)),
            Link::new(REL_FIRST, self.href(0, meta.size)),
        ];
        if meta.has_prev() {
            // Past the end, prev points at the last page (or the first when empty)
            let prev = meta.number.min(meta.total_pages.max(1)) - 1;
            links.push(Link::new(REL_PREV, self.href(prev, meta.size)));
        }
        if meta.has_next() {
            links.push(Link::new(REL_NEXT, self.href(meta.number.saturating_add(1), meta.size)));
        }
        links.push(Link::new(REL_LAST, self.href(meta.last_page(), meta.size)));
        links
    }
}
