//! REST paths under the API root. Placeholders look like `:token`.

pub const AUTH: &str = "/auth";
pub const LOGIN: &str = "/auth/login";
pub const AUTH_EMAIL: &str = "/auth/email";
pub const REGISTER: &str = "/auth/register";
pub const AUTH_PROFILE: &str = "/auth/profile";
pub const CHECK_TOKEN: &str = "/auth/:token/check";
pub const VERIFY_EMAIL: &str = "/auth/:token/verify";
pub const REFRESH_TOKEN: &str = "/auth/:token/refresh";
pub const RECOVER_PASSWORD: &str = "/auth/:token/recover";
pub const RECOVER_PASSWORD_REQUEST: &str = "/auth/recover";
pub const SWITCH_ORGANIZATION: &str = "/auth/organization/:organizationId/:franchiseId";

pub const UPLOAD_DATA: &str = "/upload";

pub const PROFILE: &str = "/profile";
pub const PROFILE_THEME: &str = "/profile/theme";

pub const USERS: &str = "/users";

pub const FRANCHISES: &str = "/organizations/franchises";
pub const SETTINGS: &str = "/organizations/franchises/settings";
pub const STATUS_TEXTS: &str = "/organizations/franchises/status-texts";
pub const FRANCHISE_METADATA: &str = "/organizations/franchises/metadata";
pub const LEGAL_MESSAGES: &str = "/organizations/franchises/legal-messages";

pub const FRANCHISE_USERS: &str = "/organizations/franchises/users";
pub const FRANCHISE_USERS_ROLE: &str = "/organizations/franchises/users/role";

pub const INVITES: &str = "/invites";

pub const CUSTOMERS: &str = "/customers";
pub const CUSTOMERS_SEARCH: &str = "/customers/search";

pub const SERVICES: &str = "/services";
pub const SERVICES_STATUS: &str = "/services/status";

pub const JOBS: &str = "/jobs";

pub const ANALYTICS_JOBS: &str = "/analytics/jobs";
pub const ANALYTICS_CUSTOMERS: &str = "/analytics/customers";
pub const ANALYTICS_CHARTS_JOBS: &str = "/analytics/charts/jobs";
pub const ANALYTICS_CHARTS_SERVICES: &str = "/analytics/charts/services";
pub const ANALYTICS_CHARTS_CUSTOMERS: &str = "/analytics/charts/customers";
pub const ANALYTICS_CHARTS_JOBS_STATUS: &str = "/analytics/charts/jobs-status";
pub const ANALYTICS_CHARTS_CUSTOMERS_JOBS: &str = "/analytics/charts/customers-jobs";

/// Everything the analytics page loads, summaries first.
pub const ANALYTICS_ALL: [&str; 7] = [
    ANALYTICS_JOBS,
    ANALYTICS_CUSTOMERS,
    ANALYTICS_CHARTS_JOBS,
    ANALYTICS_CHARTS_SERVICES,
    ANALYTICS_CHARTS_CUSTOMERS,
    ANALYTICS_CHARTS_JOBS_STATUS,
    ANALYTICS_CHARTS_CUSTOMERS_JOBS,
];

/// Replaces each `:name` segment with its percent-encoded value.
///
/// Segments without a matching parameter are left untouched.
pub fn with_params(template: &str, params: &[(&str, &str)]) -> String {
    template
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| encode_segment(value))
                .unwrap_or_else(|| segment.to_string()),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// `"{base}/{id}"`, the shape of every item route.
pub fn item(base: &str, id: &str) -> String {
    format!("{}/{}", base, encode_segment(id))
}

fn encode_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
