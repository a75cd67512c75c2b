use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{RepoError, SettingsRepo},
    domain::entities::SiteSettingsRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const SETTINGS_COLUMNS: &str = "whatsapp_number, phone_number, footer_text, \
     delivery_charge_inside_dhaka, delivery_charge_outside_dhaka, service_hours, \
     home_page_title, order_form_title, email, facebook_url, instagram_url, youtube_url, \
     updated_at";

#[derive(sqlx::FromRow)]
struct SiteSettingsRow {
    whatsapp_number: String,
    phone_number: String,
    footer_text: String,
    delivery_charge_inside_dhaka: i64,
    delivery_charge_outside_dhaka: i64,
    service_hours: String,
    home_page_title: String,
    order_form_title: String,
    email: Option<String>,
    facebook_url: Option<String>,
    instagram_url: Option<String>,
    youtube_url: Option<String>,
    updated_at: OffsetDateTime,
}

impl From<SiteSettingsRow> for SiteSettingsRecord {
    fn from(row: SiteSettingsRow) -> Self {
        Self {
            whatsapp_number: row.whatsapp_number,
            phone_number: row.phone_number,
            footer_text: row.footer_text,
            delivery_charge_inside_dhaka: row.delivery_charge_inside_dhaka,
            delivery_charge_outside_dhaka: row.delivery_charge_outside_dhaka,
            service_hours: row.service_hours,
            home_page_title: row.home_page_title,
            order_form_title: row.order_form_title,
            email: row.email,
            facebook_url: row.facebook_url,
            instagram_url: row.instagram_url,
            youtube_url: row.youtube_url,
            updated_at: row.updated_at,
        }
    }
}

impl PostgresRepositories {
    /// Writes the singleton row; `overwrite` selects upsert versus insert-if-absent.
    async fn write_site_settings(
        &self,
        settings: &SiteSettingsRecord,
        overwrite: bool,
    ) -> Result<(), RepoError> {
        let conflict = if overwrite {
            "ON CONFLICT (id) DO UPDATE SET
                whatsapp_number = EXCLUDED.whatsapp_number,
                phone_number = EXCLUDED.phone_number,
                footer_text = EXCLUDED.footer_text,
                delivery_charge_inside_dhaka = EXCLUDED.delivery_charge_inside_dhaka,
                delivery_charge_outside_dhaka = EXCLUDED.delivery_charge_outside_dhaka,
                service_hours = EXCLUDED.service_hours,
                home_page_title = EXCLUDED.home_page_title,
                order_form_title = EXCLUDED.order_form_title,
                email = EXCLUDED.email,
                facebook_url = EXCLUDED.facebook_url,
                instagram_url = EXCLUDED.instagram_url,
                youtube_url = EXCLUDED.youtube_url,
                updated_at = EXCLUDED.updated_at"
        } else {
            "ON CONFLICT (id) DO NOTHING"
        };

        let sql = format!(
            "INSERT INTO site_settings (id, {SETTINGS_COLUMNS}) \
             VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             {conflict}"
        );

        sqlx::query(&sql)
            .bind(&settings.whatsapp_number)
            .bind(&settings.phone_number)
            .bind(&settings.footer_text)
            .bind(settings.delivery_charge_inside_dhaka)
            .bind(settings.delivery_charge_outside_dhaka)
            .bind(&settings.service_hours)
            .bind(&settings.home_page_title)
            .bind(&settings.order_form_title)
            .bind(settings.email.as_deref())
            .bind(settings.facebook_url.as_deref())
            .bind(settings.instagram_url.as_deref())
            .bind(settings.youtube_url.as_deref())
            .bind(settings.updated_at)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[async_trait]
impl SettingsRepo for PostgresRepositories {
    async fn load_site_settings(&self) -> Result<Option<SiteSettingsRecord>, RepoError> {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM site_settings WHERE id = 1");
        let row = sqlx::query_as::<_, SiteSettingsRow>(&sql)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(SiteSettingsRecord::from))
    }

    async fn ensure_site_settings(
        &self,
        defaults: SiteSettingsRecord,
    ) -> Result<SiteSettingsRecord, RepoError> {
        self.write_site_settings(&defaults, false).await?;
        self.load_site_settings()
            .await?
            .ok_or_else(|| RepoError::from_persistence("site settings row missing"))
    }

    async fn upsert_site_settings(
        &self,
        settings: SiteSettingsRecord,
    ) -> Result<SiteSettingsRecord, RepoError> {
        self.write_site_settings(&settings, true).await?;
        Ok(settings)
    }
}
