//! Listing engine: search, categorical and date filters, stable sort, pages
//!
//! Every dashboard list runs through the same pipeline over data that is
//! already in memory:
//!
//! ```text
//! Listing::new(items).search(q).retain(pred).within(&ctx).sort(dir).page(n, size)
//! ```
//!
//! Pages are numbered from 1. A page outside `1..=total_pages` is empty.

use serde::{Deserialize, Serialize};
use tuitionweb_config::SortDirection;

use crate::models::{Operation, PaymentEntry, User};
use crate::time::{TimeContext, Timestamped};

/// Records that can be matched against a free-text search
pub trait Searchable {
    /// `needle` is already lowercased and non-empty
    fn matches(&self, needle: &str) -> bool;
}

impl Searchable for User {
    fn matches(&self, needle: &str) -> bool {
        self.full_name().to_lowercase().contains(needle)
    }
}

impl Searchable for PaymentEntry {
    fn matches(&self, needle: &str) -> bool {
        self.student.full_name.to_lowercase().contains(needle)
    }
}

impl Searchable for Operation {
    fn matches(&self, needle: &str) -> bool {
        self.comment.to_lowercase().contains(needle)
            || self.initiator.full_name().to_lowercase().contains(needle)
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    /// Matching records across all pages
    pub total_count: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }

    /// Convert the items, keeping the paging numbers
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

/// ceil(len / page_size); zero for an empty list
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Working set of a listing query
#[derive(Debug, Clone)]
pub struct Listing<T> {
    items: Vec<T>,
}

impl<T> Listing<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Keep records matching the predicate
    pub fn retain(mut self, predicate: impl Fn(&T) -> bool) -> Self {
        self.items.retain(|item| predicate(item));
        self
    }

    /// Case-insensitive substring search; an empty query keeps everything
    pub fn search(self, query: &str) -> Self
    where
        T: Searchable,
    {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return self;
        }
        self.retain(|item| item.matches(&needle))
    }

    /// Keep records created inside the date bucket
    pub fn within(self, context: &TimeContext) -> Self
    where
        T: Timestamped,
    {
        self.retain(|item| context.contains(&item.created_at()))
    }

    /// Stable sort by creation time; ties keep collection order
    pub fn sort(mut self, direction: SortDirection) -> Self
    where
        T: Timestamped,
    {
        match direction {
            SortDirection::Asc => self.items.sort_by(|a, b| a.created_at().cmp(&b.created_at())),
            SortDirection::Desc => self.items.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
        }
        self
    }

    /// Slice out one page
    pub fn page(self, page: usize, page_size: usize) -> Page<T> {
        let total_count = self.items.len();
        let total_pages = total_pages(total_count, page_size);

        let items = if page == 0 || page > total_pages {
            Vec::new()
        } else {
            self.items
                .into_iter()
                .skip((page - 1) * page_size)
                .take(page_size)
                .collect()
        };

        Page {
            items,
            page,
            page_size,
            total_count,
            total_pages,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}
