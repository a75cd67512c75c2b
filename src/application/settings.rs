use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;

use crate::application::error::{FieldViolation, ensure_non_empty, ensure_non_negative};
use crate::application::repos::{RepoError, SettingsRepo};
use crate::domain::entities::SiteSettingsRecord;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Validation(#[from] FieldViolation),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Partial settings update. Optional links are cleared by sending an empty string.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub whatsapp_number: Option<String>,
    pub phone_number: Option<String>,
    pub footer_text: Option<String>,
    pub delivery_charge_inside_dhaka: Option<i64>,
    pub delivery_charge_outside_dhaka: Option<i64>,
    pub service_hours: Option<String>,
    pub home_page_title: Option<String>,
    pub order_form_title: Option<String>,
    pub email: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub youtube_url: Option<String>,
}

impl SettingsPatch {
    fn validate(&self) -> Result<(), FieldViolation> {
        if let Some(value) = self.whatsapp_number.as_deref() {
            ensure_non_empty(value, "whatsappNumber")?;
        }
        if let Some(value) = self.phone_number.as_deref() {
            ensure_non_empty(value, "phoneNumber")?;
        }
        if let Some(value) = self.delivery_charge_inside_dhaka {
            ensure_non_negative(value, "deliveryChargeInsideDhaka")?;
        }
        if let Some(value) = self.delivery_charge_outside_dhaka {
            ensure_non_negative(value, "deliveryChargeOutsideDhaka")?;
        }
        Ok(())
    }

    fn apply(self, record: &mut SiteSettingsRecord) {
        if let Some(value) = self.whatsapp_number {
            record.whatsapp_number = value.trim().to_string();
        }
        if let Some(value) = self.phone_number {
            record.phone_number = value.trim().to_string();
        }
        if let Some(value) = self.footer_text {
            record.footer_text = value;
        }
        if let Some(value) = self.delivery_charge_inside_dhaka {
            record.delivery_charge_inside_dhaka = value;
        }
        if let Some(value) = self.delivery_charge_outside_dhaka {
            record.delivery_charge_outside_dhaka = value;
        }
        if let Some(value) = self.service_hours {
            record.service_hours = value;
        }
        if let Some(value) = self.home_page_title {
            record.home_page_title = value;
        }
        if let Some(value) = self.order_form_title {
            record.order_form_title = value;
        }
        if let Some(value) = self.email {
            record.email = optional_text(value);
        }
        if let Some(value) = self.facebook_url {
            record.facebook_url = optional_text(value);
        }
        if let Some(value) = self.instagram_url {
            record.instagram_url = optional_text(value);
        }
        if let Some(value) = self.youtube_url {
            record.youtube_url = optional_text(value);
        }
    }
}

fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn SettingsRepo>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepo>) -> Self {
        Self { repo }
    }

    /// Returns the stored settings, creating the defaults on first access.
    pub async fn load(&self) -> Result<SiteSettingsRecord, SettingsError> {
        if let Some(record) = self.repo.load_site_settings().await? {
            return Ok(record);
        }
        let defaults = SiteSettingsRecord::with_defaults(OffsetDateTime::now_utc());
        self.repo
            .ensure_site_settings(defaults)
            .await
            .map_err(SettingsError::from)
    }

    pub async fn update(&self, patch: SettingsPatch) -> Result<SiteSettingsRecord, SettingsError> {
        patch.validate()?;

        let mut record = self.load().await?;
        patch.apply(&mut record);
        record.updated_at = OffsetDateTime::now_utc();

        self.repo
            .upsert_site_settings(record)
            .await
            .map_err(SettingsError::from)
    }
}
