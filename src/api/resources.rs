//! Typed calls for the resources the dashboard works with.

use crate::api::client::{ApiClient, ApiRequest};
use crate::api::endpoints;
use crate::domain::model::{
    ApiResponse, AuthPayload, Customer, Interval, Invite, InviteCheck, Job, Metadata, NewInvite,
    Service, ThemeMode, User,
};
use crate::domain::ports::MetadataSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Server-side filters for `GET /jobs`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub status: Option<String>,
    pub interval: Option<Interval>,
    pub customer: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl JobFilter {
    /// Drops paging so every match comes back for client-side sorting and searching.
    pub fn unpaged(mut self) -> Self {
        self.page = None;
        self.limit = None;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilter {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl ApiClient {
    pub async fn login(&self, email: &str, password: &str) -> Result<ApiResponse<AuthPayload>> {
        let request = ApiRequest::post(endpoints::LOGIN)
            .json(&json!({ "email": email, "password": password }))?;
        self.send(request).await
    }

    pub async fn profile(&self) -> Result<ApiResponse<AuthPayload>> {
        self.send(ApiRequest::get(endpoints::AUTH_PROFILE)).await
    }

    pub async fn update_theme(&self, theme: ThemeMode) -> Result<ApiResponse<Value>> {
        let request = ApiRequest::put(endpoints::PROFILE_THEME).json(&json!({ "theme": theme }))?;
        self.send(request).await
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> Result<ApiResponse<AuthPayload>> {
        let uri = endpoints::with_params(endpoints::REFRESH_TOKEN, &[("token", refresh_token)]);
        self.send(ApiRequest::get(uri)).await
    }

    pub async fn switch_organization(
        &self,
        organization_id: &str,
        franchise_id: &str,
    ) -> Result<ApiResponse<AuthPayload>> {
        let uri = endpoints::with_params(
            endpoints::SWITCH_ORGANIZATION,
            &[("organizationId", organization_id), ("franchiseId", franchise_id)],
        );
        self.send(ApiRequest::post(uri)).await
    }

    pub async fn request_password_recovery(&self, email: &str) -> Result<ApiResponse<Value>> {
        let request =
            ApiRequest::post(endpoints::RECOVER_PASSWORD_REQUEST).json(&json!({ "email": email }))?;
        self.send(request).await
    }

    /// Validates a password-recovery token.
    pub async fn check_token(&self, token: &str) -> Result<ApiResponse<Value>> {
        let uri = endpoints::with_params(endpoints::CHECK_TOKEN, &[("token", token)]);
        self.send(ApiRequest::get(uri)).await
    }

    pub async fn recover_password(&self, token: &str, password: &str) -> Result<ApiResponse<Value>> {
        let uri = endpoints::with_params(endpoints::RECOVER_PASSWORD, &[("token", token)]);
        let request = ApiRequest::post(uri).json(&json!({ "password": password }))?;
        self.send(request).await
    }

    pub async fn check_invite(&self, token: &str) -> Result<ApiResponse<InviteCheck>> {
        self.send(ApiRequest::get(endpoints::item(endpoints::INVITES, token)))
            .await
    }

    pub async fn accept_invite(&self, token: &str, password: &str) -> Result<ApiResponse<AuthPayload>> {
        let request = ApiRequest::post(endpoints::item(endpoints::INVITES, token))
            .json(&json!({ "password": password }))?;
        self.send(request).await
    }

    pub async fn resend_invite(&self, token: &str) -> Result<ApiResponse<Value>> {
        self.send(ApiRequest::put(endpoints::item(endpoints::INVITES, token)))
            .await
    }

    pub async fn delete_invite(&self, token: &str) -> Result<ApiResponse<Value>> {
        self.send(ApiRequest::delete(endpoints::item(endpoints::INVITES, token)))
            .await
    }

    pub async fn list_invites(&self, page: usize, limit: usize) -> Result<ApiResponse<Vec<Invite>>> {
        let request = ApiRequest::get(endpoints::INVITES)
            .query("page", page)
            .query("limit", limit);
        self.send(request).await
    }

    pub async fn create_invite(&self, invite: &NewInvite) -> Result<ApiResponse<Invite>> {
        let request = ApiRequest::post(endpoints::INVITES).json(invite)?;
        self.send(request).await
    }

    pub async fn list_franchise_users(&self) -> Result<ApiResponse<Vec<User>>> {
        self.send(ApiRequest::get(endpoints::FRANCHISE_USERS)).await
    }

    pub async fn remove_franchise_user(&self, user_id: &str) -> Result<ApiResponse<Value>> {
        self.send(ApiRequest::delete(endpoints::item(
            endpoints::FRANCHISE_USERS,
            user_id,
        )))
        .await
    }

    pub async fn list_customers(&self, filter: &CustomerFilter) -> Result<ApiResponse<Vec<Customer>>> {
        let request = ApiRequest::get(endpoints::CUSTOMERS)
            .query_opt("page", filter.page)
            .query_opt("limit", filter.limit)
            .query_opt("search", filter.search.as_deref())
            .query_opt("sort", filter.sort.as_deref());
        self.send(request).await
    }

    pub async fn search_customers(&self, term: &str) -> Result<ApiResponse<Vec<Customer>>> {
        let request = ApiRequest::get(endpoints::CUSTOMERS_SEARCH).query("search", term);
        self.send(request).await
    }

    pub async fn list_services(&self, inactive: bool) -> Result<ApiResponse<Vec<Service>>> {
        let request =
            ApiRequest::get(endpoints::SERVICES).query_opt("status", inactive.then_some("inactive"));
        self.send(request).await
    }

    pub async fn toggle_service_status(&self, service_id: &str) -> Result<ApiResponse<Value>> {
        self.send(ApiRequest::put(endpoints::item(
            endpoints::SERVICES_STATUS,
            service_id,
        )))
        .await
    }

    pub async fn list_jobs(&self, filter: &JobFilter) -> Result<ApiResponse<Vec<Job>>> {
        let request = ApiRequest::get(endpoints::JOBS)
            .query_opt("status", filter.status.as_deref())
            .query_opt("interval", filter.interval.map(|i| i.as_str()))
            .query_opt("customer", filter.customer.as_deref())
            .query_opt("page", filter.page)
            .query_opt("limit", filter.limit);
        self.send(request).await
    }

    pub async fn delete_job(&self, job_id: &str) -> Result<ApiResponse<Value>> {
        self.send(ApiRequest::delete(endpoints::item(endpoints::JOBS, job_id)))
            .await
    }

    pub async fn send_invoice(&self, job_id: &str) -> Result<ApiResponse<Value>> {
        let uri = format!("{}/invoice", endpoints::item(endpoints::JOBS, job_id));
        self.send(ApiRequest::post(uri)).await
    }

    pub async fn franchise_metadata(&self, token: Option<&str>) -> Result<ApiResponse<Metadata>> {
        let mut request = ApiRequest::get(endpoints::FRANCHISE_METADATA).query("filter", "");
        if let Some(token) = token {
            request = request.bearer(token);
        }
        self.send(request).await
    }

    /// Raw analytics payload for one of the `/analytics/*` endpoints.
    pub async fn analytics(&self, endpoint: &str, interval: Option<Interval>) -> Result<ApiResponse<Value>> {
        let request =
            ApiRequest::get(endpoint).query_opt("interval", interval.map(|i| i.as_str()));
        self.send(request).await
    }
}

#[async_trait]
impl MetadataSource for ApiClient {
    async fn fetch_metadata(&self, token: Option<&str>) -> Result<Metadata> {
        Ok(self.franchise_metadata(token).await?.data)
    }
}
