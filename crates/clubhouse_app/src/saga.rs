//! Organization creation saga
//!
//! Creating an organization with a picture takes four remote steps. Once the
//! organization row exists every later failure unwinds what was done so far,
//! newest first, trying each compensation up to
//! [`AppConfig::compensation_attempts`] times. Nothing here is transactional:
//! a compensation that keeps failing is logged and given up on.

use std::fmt;

use chrono::{DateTime, Utc};
use clubhouse_core::{FieldKey, FileBlob, Record};

use crate::backend::{Backend, ObjectStorage};
use crate::charter::{charter_issues, CharterField, NewOrganization};
use crate::config::AppConfig;
use crate::error::{AppError, BackendError, Result, ValidationError};
use crate::model::{OrganizationId, UserId};
use crate::notify::{support_message, Notifier};

/// Forward steps, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SagaStep {
    InsertOrganization,
    UploadPicture,
    ResolvePublicUrl,
    PatchPictureUrl,
}

impl SagaStep {
    /// User-facing description of this step failing
    pub fn failure_message(self) -> &'static str {
        match self {
            SagaStep::InsertOrganization => "Error creating organization",
            SagaStep::UploadPicture => "Error uploading image to storage",
            SagaStep::ResolvePublicUrl => "Failed to retrieve image after upload",
            SagaStep::PatchPictureUrl => "Error uploading image to organization",
        }
    }
}

impl fmt::Display for SagaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SagaStep::InsertOrganization => "insert organization",
            SagaStep::UploadPicture => "upload picture",
            SagaStep::ResolvePublicUrl => "resolve picture url",
            SagaStep::PatchPictureUrl => "patch picture url",
        })
    }
}

/// Undo action registered by a completed forward step
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Compensation {
    DeleteOrganization(OrganizationId),
    RemovePicture { bucket: String, path: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompensationOutcome {
    pub compensation: Compensation,
    pub attempts: u32,
    pub succeeded: bool,
}

/// A successfully created organization
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Created {
    pub organization_id: OrganizationId,
    pub picture_url: Option<String>,
    /// Where to send the user next, `/{url}`
    pub redirect: String,
}

/// Everything a saga run did
#[derive(Debug)]
pub struct SagaReport {
    pub completed: Vec<SagaStep>,
    pub failed: Option<SagaStep>,
    pub compensations: Vec<CompensationOutcome>,
    pub outcome: Result<Created>,
}

impl SagaReport {
    pub fn into_result(self) -> Result<Created> {
        self.outcome
    }

    fn rejected(err: AppError) -> Self {
        SagaReport {
            completed: Vec::new(),
            failed: None,
            compensations: Vec::new(),
            outcome: Err(err),
        }
    }
}

#[derive(Default)]
struct Progress {
    completed: Vec<SagaStep>,
    pending: Vec<Compensation>,
}

/// Creates an organization from a finished charter record
pub struct CreateOrganization<'a> {
    backend: &'a dyn Backend,
    storage: &'a dyn ObjectStorage,
    notifier: &'a dyn Notifier,
    config: &'a AppConfig,
}

impl<'a> CreateOrganization<'a> {
    pub fn new(
        backend: &'a dyn Backend,
        storage: &'a dyn ObjectStorage,
        notifier: &'a dyn Notifier,
        config: &'a AppConfig,
    ) -> Self {
        Self {
            backend,
            storage,
            notifier,
            config,
        }
    }

    /// Run the saga and return the created organization
    pub async fn run(
        &self,
        record: &Record<CharterField>,
        creator: UserId,
        now: DateTime<Utc>,
    ) -> Result<Created> {
        self.execute(record, creator, now).await.into_result()
    }

    /// Run the saga and report every step taken
    ///
    /// `now` stamps the uploaded picture's path.
    pub async fn execute(
        &self,
        record: &Record<CharterField>,
        creator: UserId,
        now: DateTime<Utc>,
    ) -> SagaReport {
        if let Err(err) = self.check_charter(record) {
            return SagaReport::rejected(err);
        }

        let payload = NewOrganization::from_record(record, creator);
        let mut progress = Progress::default();

        let organization_id = match self.backend.insert_organization(&payload).await {
            Ok(id) => id,
            Err(err) => return self.abort(SagaStep::InsertOrganization, err, progress).await,
        };
        tracing::info!(organization = organization_id, url = %payload.url, "Inserted organization");
        progress.completed.push(SagaStep::InsertOrganization);
        progress
            .pending
            .push(Compensation::DeleteOrganization(organization_id));

        let picture = record.get(CharterField::Picture).and_then(|value| value.as_file());
        let picture_url = match picture {
            Some(file) => match self.attach_picture(organization_id, file, now, &mut progress).await {
                Ok(url) => Some(url),
                Err((step, err)) => return self.abort(step, err, progress).await,
            },
            None => None,
        };

        self.notifier.success("Organization created!");
        SagaReport {
            completed: progress.completed,
            failed: None,
            compensations: Vec::new(),
            outcome: Ok(Created {
                organization_id,
                picture_url,
                redirect: format!("/{}", payload.url),
            }),
        }
    }

    /// Reject a charter that fails its form requirements before any remote call
    fn check_charter(&self, record: &Record<CharterField>) -> Result<()> {
        let issues = charter_issues(record)?;
        if let Some(issue) = issues.first() {
            tracing::debug!(field = %issue.key, count = issues.len(), "Charter failed validation");
            let err = ValidationError::InvalidCharter {
                field: issue.key.name(),
            };
            self.notifier.error(&err.to_string());
            return Err(err.into());
        }
        Ok(())
    }

    async fn attach_picture(
        &self,
        organization_id: OrganizationId,
        file: &FileBlob,
        now: DateTime<Utc>,
        progress: &mut Progress,
    ) -> std::result::Result<String, (SagaStep, BackendError)> {
        let bucket = self.config.storage_bucket.as_str();
        let path = format!(
            "{}/{}/{}-{}",
            self.config.picture_prefix,
            organization_id,
            now.timestamp_millis(),
            file.name
        );

        self.storage
            .upload(bucket, &path, file)
            .await
            .map_err(|err| (SagaStep::UploadPicture, err))?;
        tracing::debug!(%path, bytes = file.len(), "Uploaded organization picture");
        progress.completed.push(SagaStep::UploadPicture);
        progress.pending.push(Compensation::RemovePicture {
            bucket: bucket.to_string(),
            path: path.clone(),
        });

        let url = self
            .storage
            .public_url(bucket, &path)
            .await
            .map_err(|err| (SagaStep::ResolvePublicUrl, err))?;
        progress.completed.push(SagaStep::ResolvePublicUrl);

        self.backend
            .set_organization_picture(organization_id, &url)
            .await
            .map_err(|err| (SagaStep::PatchPictureUrl, err))?;
        progress.completed.push(SagaStep::PatchPictureUrl);

        Ok(url)
    }

    async fn abort(&self, step: SagaStep, source: BackendError, progress: Progress) -> SagaReport {
        tracing::warn!(%step, error = %source, "Organization creation failed");

        let mut compensations = Vec::with_capacity(progress.pending.len());
        for compensation in progress.pending.into_iter().rev() {
            compensations.push(self.compensate(compensation).await);
        }
        let compensated = compensations.iter().all(|outcome| outcome.succeeded);

        self.notifier
            .error(&support_message(step.failure_message(), &self.config.support_email));

        let outcome = if progress.completed.is_empty() {
            Err(AppError::remote("create organization", source))
        } else {
            Err(AppError::PartialFailure {
                step,
                compensated,
                source,
            })
        };

        SagaReport {
            completed: progress.completed,
            failed: Some(step),
            compensations,
            outcome,
        }
    }

    async fn compensate(&self, compensation: Compensation) -> CompensationOutcome {
        let max_attempts = self.config.compensation_attempts.max(1);
        let mut attempts = 0;
        let mut succeeded = false;

        while attempts < max_attempts && !succeeded {
            attempts += 1;
            let result = match &compensation {
                Compensation::DeleteOrganization(id) => self.backend.delete_organization(*id).await,
                Compensation::RemovePicture { bucket, path } => self.storage.remove(bucket, path).await,
            };
            match result {
                Ok(()) => {
                    tracing::warn!(?compensation, attempts, "Compensation applied");
                    succeeded = true;
                }
                Err(err) => {
                    tracing::error!(?compensation, attempt = attempts, error = %err, "Compensation failed");
                }
            }
        }

        CompensationOutcome {
            compensation,
            attempts,
            succeeded,
        }
    }
}
