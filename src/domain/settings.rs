//! Factory defaults for the storefront settings singleton.

use time::OffsetDateTime;

use crate::domain::entities::SiteSettingsRecord;

pub const DEFAULT_WHATSAPP_NUMBER: &str = "01911465879";
pub const DEFAULT_PHONE_NUMBER: &str = "01911465879";
pub const DEFAULT_FOOTER_TEXT: &str = "প্রিমিয়াম পাঞ্জাবির নির্ভরযোগ্য ঠিকানা";
pub const DEFAULT_DELIVERY_INSIDE_DHAKA: i64 = 60;
pub const DEFAULT_DELIVERY_OUTSIDE_DHAKA: i64 = 160;
pub const DEFAULT_SERVICE_HOURS: &str = "সকাল ৯টা - রাত ১০টা";
pub const DEFAULT_HOME_PAGE_TITLE: &str = "আমাদের পাঞ্জাবি কালেকশন";
pub const DEFAULT_ORDER_FORM_TITLE: &str = "পাঞ্জাবি অর্ডার ফর্ম";

impl SiteSettingsRecord {
    pub fn with_defaults(updated_at: OffsetDateTime) -> Self {
        Self {
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            phone_number: DEFAULT_PHONE_NUMBER.to_string(),
            footer_text: DEFAULT_FOOTER_TEXT.to_string(),
            delivery_charge_inside_dhaka: DEFAULT_DELIVERY_INSIDE_DHAKA,
            delivery_charge_outside_dhaka: DEFAULT_DELIVERY_OUTSIDE_DHAKA,
            service_hours: DEFAULT_SERVICE_HOURS.to_string(),
            home_page_title: DEFAULT_HOME_PAGE_TITLE.to_string(),
            order_form_title: DEFAULT_ORDER_FORM_TITLE.to_string(),
            email: None,
            facebook_url: None,
            instagram_url: None,
            youtube_url: None,
            updated_at,
        }
    }
}
