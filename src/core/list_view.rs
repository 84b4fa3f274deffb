//! Search, sort and paging over records that are already in memory.

use crate::domain::model::{Customer, Invite, Job, Service, User};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

/// A value a record exposes for sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Missing,
    Number(f64),
    Text(String),
}

impl SortValue {
    pub fn text(value: impl AsRef<str>) -> Self {
        SortValue::Text(value.as_ref().to_lowercase())
    }

    pub fn opt_text(value: Option<impl AsRef<str>>) -> Self {
        value.map_or(SortValue::Missing, SortValue::text)
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Missing => 0,
            SortValue::Number(_) => 1,
            SortValue::Text(_) => 2,
        }
    }

    pub fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

pub trait Listable {
    /// Fields the search term is matched against.
    fn search_haystack(&self) -> Vec<String>;

    /// Value for a sort field; unknown fields are [`SortValue::Missing`].
    fn sort_value(&self, field: &str) -> SortValue;

    fn matches(&self, term_lower: &str) -> bool {
        term_lower.is_empty()
            || self
                .search_haystack()
                .iter()
                .any(|field| field.to_lowercase().contains(term_lower))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<'a, T> {
    pub items: Vec<&'a T>,
    pub page: usize,
    pub limit: usize,
    pub total_filtered: usize,
    pub total_pages: usize,
}

/// What the user has asked to see. Changing the search or the sort resets to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    search: String,
    sort: Option<Sort>,
    page: usize,
    limit: usize,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(6)
    }
}

impl ListState {
    pub fn new(limit: usize) -> Self {
        Self {
            search: String::new(),
            sort: None,
            page: 1,
            limit: limit.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search {
            self.search = term;
            self.page = 1;
        }
    }

    /// Same field flips the direction; a new field starts ascending.
    pub fn toggle_sort(&mut self, field: &str) {
        self.sort = Some(match self.sort.take() {
            Some(current) if current.field == field => Sort {
                direction: current.direction.flipped(),
                ..current
            },
            _ => Sort {
                field: field.to_string(),
                direction: SortDirection::Asc,
            },
        });
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: Option<Sort>) {
        if sort != self.sort {
            self.sort = sort;
            self.page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
    }

    /// Filters, sorts (stable) and slices `items`.
    pub fn apply<'a, T: Listable>(&self, items: &'a [T]) -> ListPage<'a, T> {
        let filtered = self.matching(items);

        let total_filtered = filtered.len();
        // Pages past the end come back empty, however large the page number.
        let start = (self.page - 1).saturating_mul(self.limit).min(total_filtered);
        let end = start.saturating_add(self.limit).min(total_filtered);

        ListPage {
            items: filtered[start..end].to_vec(),
            page: self.page,
            limit: self.limit,
            total_filtered,
            total_pages: total_filtered.div_ceil(self.limit),
        }
    }

    /// Every item that passes the search, in sort order. Paging is ignored.
    pub fn matching<'a, T: Listable>(&self, items: &'a [T]) -> Vec<&'a T> {
        let term = self.search.to_lowercase();
        let mut filtered: Vec<&T> = items.iter().filter(|item| item.matches(&term)).collect();

        if let Some(sort) = &self.sort {
            let mut keyed: Vec<(SortValue, &T)> = filtered
                .into_iter()
                .map(|item| (item.sort_value(&sort.field), item))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| match sort.direction {
                SortDirection::Asc => a.compare(b),
                SortDirection::Desc => b.compare(a),
            });
            filtered = keyed.into_iter().map(|(_, item)| item).collect();
        }
        filtered
    }
}

impl Listable for Job {
    fn search_haystack(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.services.len() + 2);
        if let Some(job_id) = &self.job_id {
            fields.push(job_id.clone());
        }
        fields.push(self.customer.full_name());
        fields.extend(self.services.iter().map(|s| s.name.clone()));
        fields
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "customer" => SortValue::text(self.customer.full_name()),
            "services" => SortValue::text(self.service_names()),
            "jobId" => SortValue::opt_text(self.job_id.as_deref()),
            "status" => SortValue::text(&self.status),
            "paymentType" => SortValue::opt_text(self.payment_type.map(|p| p.as_str())),
            "paymentAmount" => self.payment_amount.map_or(SortValue::Missing, SortValue::Number),
            "estimatedCompletionDate" => self
                .estimated_completion_date
                .map_or(SortValue::Missing, |d| SortValue::Number(d.timestamp_millis() as f64)),
            "createdAt" => self
                .created_at
                .map_or(SortValue::Missing, |d| SortValue::Number(d.timestamp_millis() as f64)),
            _ => SortValue::Missing,
        }
    }
}

impl Listable for Customer {
    fn search_haystack(&self) -> Vec<String> {
        vec![self.full_name(), self.email.clone(), self.phone.clone()]
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "name" => SortValue::text(self.full_name()),
            "firstName" => SortValue::text(&self.first_name),
            "lastName" => SortValue::opt_text(self.last_name.as_deref()),
            "email" => SortValue::text(&self.email),
            "phone" => SortValue::text(&self.phone),
            "status" => SortValue::text(&self.status),
            "totalJobs" => SortValue::Number(self.total_jobs as f64),
            _ => SortValue::Missing,
        }
    }
}

impl Listable for Service {
    fn search_haystack(&self) -> Vec<String> {
        let mut fields = vec![self.name.clone()];
        fields.extend(self.sub_services.iter().map(|s| s.name.clone()));
        fields
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "name" => SortValue::text(&self.name),
            "status" => SortValue::text(self.status_label()),
            _ => SortValue::Missing,
        }
    }
}

impl Listable for User {
    fn search_haystack(&self) -> Vec<String> {
        vec![self.full_name(), self.email.clone(), self.role.clone()]
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "name" => SortValue::text(self.full_name()),
            "email" => SortValue::text(&self.email),
            "role" => SortValue::text(&self.role),
            _ => SortValue::Missing,
        }
    }
}

impl Listable for Invite {
    fn search_haystack(&self) -> Vec<String> {
        vec![self.full_name(), self.email.clone()]
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "name" => SortValue::text(self.full_name()),
            "email" => SortValue::text(&self.email),
            _ => SortValue::Missing,
        }
    }
}
