use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::format::full_name;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub address_one: String,
    pub address_two: Option<String>,
    pub address_three: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub logo: Option<String>,
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Franchise {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastLogin {
    pub ip: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub franchise_id: String,
    #[serde(default)]
    pub organization_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl std::str::FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme '{}', expected light|dark", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub image: Option<String>,
    pub last_login: Option<LastLogin>,
    pub role: String,
    pub status: Option<String>,
    pub theme: Option<ThemeMode>,
    pub address: Option<Address>,
    pub franchise_id: String,
    pub organization_id: String,
    pub organization: Option<Organization>,
    pub organizations: Vec<Organization>,
}

impl User {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, self.last_name.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invite {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub organization_id: String,
    pub franchise_id: String,
    pub token: String,
}

impl Invite {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, self.last_name.as_deref())
    }
}

/// Body for `POST /invites`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvite {
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    pub role: String,
}

/// What `GET /invites/:token` reports about a pending invite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InviteCheck {
    pub user_exists: bool,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub email: String,
    pub phone: String,
    pub gender: Option<String>,
    pub organization: Option<Organization>,
    pub franchise: Option<Franchise>,
    pub status: String,
    pub total_jobs: u64,
}

impl Customer {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, self.last_name.as_deref())
    }
}

/// `parentId` arrives either as a bare id or populated with the parent service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceParent {
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        name: String,
    },
    Id(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub parent_id: Option<ServiceParent>,
    pub sub_services: Vec<Service>,
    pub organization_id: String,
    pub franchise_id: String,
    pub status: serde_json::Value,
}

impl Service {
    /// The parent's name when the parent is populated, otherwise the service's own name.
    pub fn display_name(&self) -> &str {
        match &self.parent_id {
            Some(ServiceParent::Populated { name, .. }) if !name.is_empty() => name,
            _ => &self.name,
        }
    }

    pub fn status_label(&self) -> String {
        match &self.status {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Bool(true) => "active".to_string(),
            serde_json::Value::Bool(false) => "inactive".to_string(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vehicle {
    pub vin_number: String,
    pub license_number: String,
    pub color: String,
    pub make: String,
    pub model: String,
    pub year: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Cash,
    CreditCart,
    Check,
    Finance,
    Other,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "cash",
            PaymentType::CreditCart => "credit_cart",
            PaymentType::Check => "check",
            PaymentType::Finance => "finance",
            PaymentType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: String,
    pub job_id: Option<String>,
    pub customer: Customer,
    pub customer_sign: Option<String>,
    pub vehicle: Option<Vehicle>,
    pub services: Vec<Service>,
    pub estimated_completion_date: Option<DateTime<Utc>>,
    pub payment_type: Option<PaymentType>,
    pub payment_amount: Option<f64>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub description: String,
    pub reviewed: bool,
    pub user_id: String,
    pub organization_id: String,
    pub franchise_id: String,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Parent-or-own service names, de-duplicated, joined with `", "`.
    pub fn service_names(&self) -> String {
        let names: Vec<&str> = self.services.iter().map(Service::display_name).collect();
        crate::utils::format::dedupe(&names).join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataStatus {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataStatusText {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub label: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub promotional_message: String,
    pub status_texts: Vec<MetadataStatusText>,
    pub statuses: Vec<MetadataStatus>,
    pub services: Option<Vec<Service>>,
}

impl Metadata {
    /// Display label configured for a status value, if any.
    pub fn status_label(&self, value: &str) -> Option<&str> {
        self.statuses
            .iter()
            .find(|s| s.value == value)
            .map(|s| s.label.as_str())
            .filter(|label| !label.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub total_data: u64,
}

/// Envelope every API response is wrapped in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Day,
    Week,
    Month,
    Year,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Day => "day",
            Interval::Week => "week",
            Interval::Month => "month",
            Interval::Year => "year",
        }
    }
}

impl std::str::FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Interval::Day),
            "week" => Ok(Interval::Week),
            "month" => Ok(Interval::Month),
            "year" => Ok(Interval::Year),
            other => Err(format!("unknown interval '{}', expected day|week|month|year", other)),
        }
    }
}

/// A row produced by the legacy CSV import, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub locker: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub password_hash: String,
    pub user_level: i64,
    pub is_legacy: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub rows_read: usize,
    pub imported: usize,
    pub skipped_short: usize,
    pub skipped_duplicate: usize,
}
