use crate::domain::model::{Customer, Job, Metadata};
use crate::domain::ports::Storage;
use crate::utils::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

impl Column {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

pub trait ExportRow {
    /// Text for the column `key`; unknown keys are empty.
    fn cell(&self, key: &str) -> String;
}

pub const JOB_COLUMNS: [Column; 7] = [
    Column::new("jobId", "Job ID"),
    Column::new("customer", "Customer"),
    Column::new("services", "Services"),
    Column::new("paymentType", "Payment Type"),
    Column::new("paymentAmount", "Price"),
    Column::new("status", "Status"),
    Column::new("estimatedCompletionDate", "Due At"),
];

pub const CUSTOMER_COLUMNS: [Column; 7] = [
    Column::new("firstName", "First Name"),
    Column::new("lastName", "Last Name"),
    Column::new("email", "Email"),
    Column::new("phone", "Phone"),
    Column::new("organization", "Organization"),
    Column::new("franchise", "Franchise"),
    Column::new("totalJobs", "Total Jobs"),
];

/// A job paired with the metadata used to label its status.
pub struct JobExport<'a> {
    pub job: &'a Job,
    pub metadata: Option<&'a Metadata>,
}

impl ExportRow for JobExport<'_> {
    fn cell(&self, key: &str) -> String {
        let job = self.job;
        match key {
            "jobId" => job.job_id.clone().unwrap_or_default(),
            "customer" => job.customer.full_name(),
            "services" => job.service_names(),
            "paymentType" => job
                .payment_type
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            "paymentAmount" => job
                .payment_amount
                .map(|a| a.to_string())
                .unwrap_or_default(),
            "status" => self
                .metadata
                .and_then(|m| m.status_label(&job.status))
                .unwrap_or(job.status.as_str())
                .to_string(),
            "estimatedCompletionDate" => job
                .estimated_completion_date
                .map(|d| d.to_rfc3339())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }
}

impl ExportRow for Customer {
    fn cell(&self, key: &str) -> String {
        match key {
            "firstName" => self.first_name.clone(),
            "lastName" => self.last_name.clone().unwrap_or_default(),
            "email" => self.email.clone(),
            "phone" => self.phone.clone(),
            "organization" => self
                .organization
                .as_ref()
                .map(|o| o.name.clone())
                .unwrap_or_default(),
            "franchise" => self
                .franchise
                .as_ref()
                .map(|f| f.name.clone())
                .unwrap_or_default(),
            "totalJobs" => self.total_jobs.to_string(),
            _ => String::new(),
        }
    }
}

/// Header row of labels, then one row per record. Fields are quoted as needed.
pub fn to_csv<R: ExportRow>(rows: &[R], columns: &[Column]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.label))?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| row.cell(c.key)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Validation {
        message: format!("export produced invalid UTF-8: {}", e),
    })
}

pub async fn write_csv_file<S: Storage, R: ExportRow>(
    storage: &S,
    path: &str,
    rows: &[R],
    columns: &[Column],
) -> Result<usize> {
    let csv = to_csv(rows, columns)?;
    storage.write_file(path, csv.as_bytes()).await?;
    tracing::info!("Exported {} rows to {}", rows.len(), path);
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Franchise, MetadataStatus, Organization, PaymentType};

    fn sample_job() -> Job {
        serde_json::from_value(serde_json::json!({
            "_id": "j1",
            "jobId": "JOB-001",
            "customer": {"firstName": "Ann", "lastName": "Lee"},
            "services": [{"name": "Front tint", "parentId": {"_id": "p1", "name": "Tint"}}],
            "paymentType": "cash",
            "paymentAmount": 250.5,
            "status": "in_progress",
            "estimatedCompletionDate": "2024-05-01T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_job_export_uses_metadata_status_label() {
        let job = sample_job();
        let metadata = Metadata {
            statuses: vec![MetadataStatus {
                label: "In Progress".to_string(),
                value: "in_progress".to_string(),
            }],
            ..Default::default()
        };
        let rows = [JobExport {
            job: &job,
            metadata: Some(&metadata),
        }];

        let csv = to_csv(&rows, &JOB_COLUMNS).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Job ID,Customer,Services,Payment Type,Price,Status,Due At"
        );
        assert_eq!(
            lines[1],
            "JOB-001,Ann Lee,Tint,cash,250.5,In Progress,2024-05-01T10:00:00+00:00"
        );
    }

    #[test]
    fn test_job_export_falls_back_to_raw_status() {
        let job = sample_job();
        let row = JobExport {
            job: &job,
            metadata: None,
        };
        assert_eq!(row.cell("status"), "in_progress");
        assert_eq!(job.payment_type, Some(PaymentType::Cash));
    }

    #[test]
    fn test_fields_with_delimiters_are_quoted() {
        let customer = Customer {
            first_name: "Lee, Jr".to_string(),
            last_name: Some("O\"Neil".to_string()),
            email: "ann@example.com".to_string(),
            organization: Some(Organization {
                name: "Six Wraps".to_string(),
                ..Default::default()
            }),
            franchise: Some(Franchise {
                id: "f1".to_string(),
                name: "Downtown".to_string(),
            }),
            total_jobs: 3,
            ..Default::default()
        };

        let csv = to_csv(&[customer], &CUSTOMER_COLUMNS).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[1],
            "\"Lee, Jr\",\"O\"\"Neil\",ann@example.com,,Six Wraps,Downtown,3"
        );
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let csv = to_csv::<Customer>(&[], &CUSTOMER_COLUMNS).unwrap();
        assert_eq!(
            csv,
            "First Name,Last Name,Email,Phone,Organization,Franchise,Total Jobs\n"
        );
    }
}
