//! Strike administration
//!
//! The board only mutates its local list after the backend confirms: a
//! failed delete leaves the strike listed.

use crate::backend::Backend;
use crate::config::AppConfig;
use crate::error::{AppError, Result, ValidationError};
use crate::model::{OrganizationId, Strike, StrikeId, StrikeRequest};
use crate::notify::{support_message, Notifier};

/// Strikes of one selected organization
#[derive(Clone, Debug)]
pub struct StrikeBoard {
    organization: Option<(OrganizationId, String)>,
    strikes: Vec<Strike>,
    reason: String,
    support_email: String,
}

impl StrikeBoard {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            organization: None,
            strikes: Vec::new(),
            reason: String::new(),
            support_email: config.support_email.clone(),
        }
    }

    pub fn organization_id(&self) -> Option<OrganizationId> {
        self.organization.as_ref().map(|(id, _)| *id)
    }

    pub fn organization_name(&self) -> Option<&str> {
        self.organization.as_ref().map(|(_, name)| name.as_str())
    }

    pub fn strikes(&self) -> &[Strike] {
        &self.strikes
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = reason.into();
    }

    /// Switch to another organization and load its strikes
    ///
    /// The reason draft and the previous organization's list are dropped
    /// before loading.
    pub async fn select_organization(
        &mut self,
        id: OrganizationId,
        name: impl Into<String>,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<()> {
        self.reason.clear();
        self.strikes.clear();
        self.organization = Some((id, name.into()));

        match backend.list_strikes(id).await {
            Ok(strikes) => {
                tracing::debug!(organization = id, count = strikes.len(), "Loaded strikes");
                self.strikes = strikes;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(organization = id, error = %err, "Failed to load strikes");
                notifier.error(&support_message("Failed to load strikes", &self.support_email));
                Err(AppError::remote("load strikes", err))
            }
        }
    }

    /// Issue a strike with the drafted reason, returning the stored strike
    pub async fn issue(&mut self, backend: &dyn Backend, notifier: &dyn Notifier) -> Result<Strike> {
        let organization_id = match self.organization_id() {
            Some(id) => id,
            None => return Err(self.reject(ValidationError::NoOrganization, notifier)),
        };
        if self.reason.trim().is_empty() {
            return Err(self.reject(ValidationError::MissingReason, notifier));
        }

        let request = StrikeRequest {
            organization_id,
            reason: self.reason.clone(),
        };
        let strike = match backend.issue_strike(&request).await {
            Ok(strike) => strike,
            Err(err) => {
                tracing::warn!(organization = organization_id, error = %err, "Failed to issue strike");
                notifier.error(&support_message("Error issuing strike", &self.support_email));
                return Err(AppError::remote("issue strike", err));
            }
        };

        tracing::info!(organization = organization_id, strike = strike.id, "Issued strike");
        notifier.success("Strike issued!");
        self.reason.clear();
        self.strikes.push(strike.clone());
        Ok(strike)
    }

    /// Delete a strike, pruning it locally once the backend confirms
    pub async fn delete(
        &mut self,
        id: StrikeId,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<()> {
        if let Err(err) = backend.delete_strike(id).await {
            tracing::warn!(strike = id, error = %err, "Failed to delete strike");
            notifier.error(&support_message("Error deleting strike", &self.support_email));
            return Err(AppError::remote("delete strike", err));
        }

        self.strikes.retain(|strike| strike.id != id);
        tracing::info!(strike = id, "Deleted strike");
        notifier.success("Strike deleted!");
        Ok(())
    }

    fn reject(&self, err: ValidationError, notifier: &dyn Notifier) -> AppError {
        notifier.error(&err.to_string());
        err.into()
    }
}
