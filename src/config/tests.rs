use clap::Parser;

use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn image_limit_defaults_to_10_mib() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(
        settings.uploads.max_image_bytes.get(),
        DEFAULT_MAX_IMAGE_BYTES
    );
}

#[test]
fn image_limit_can_be_overridden_via_cli() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        uploads_max_image_bytes: Some(1_572_864),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.uploads.max_image_bytes.get(), 1_572_864);
}

#[test]
fn zero_image_limit_is_rejected() {
    let mut raw = RawSettings::default();
    raw.uploads.max_image_bytes = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero limit must fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "uploads.max_image_bytes",
            ..
        }
    ));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn admin_credentials_default_to_seed_pair() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.admin.username, DEFAULT_ADMIN_USERNAME);
    assert_eq!(settings.admin.password, DEFAULT_ADMIN_PASSWORD);
    assert!(!format!("{:?}", settings.admin).contains(DEFAULT_ADMIN_PASSWORD));
}

#[test]
fn strict_transitions_enabled_by_default() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert!(settings.orders.strict_transitions);

    let mut raw = RawSettings::default();
    raw.apply_serve_overrides(&ServeOverrides {
        orders_strict_transitions: Some(false),
        ..Default::default()
    });
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(!settings.orders.strict_transitions);
}

#[test]
fn notifications_disabled_without_endpoint() {
    let mut raw = RawSettings::default();
    raw.notifications.recipient = Some("owner@example.com".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(!settings.notifications.is_enabled());
}

#[test]
fn notifications_enabled_with_endpoint_and_recipient() {
    let mut raw = RawSettings::default();
    raw.notifications.endpoint = Some("https://mail.example.com/send".to_string());
    raw.notifications.recipient = Some("owner@example.com".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.notifications.is_enabled());
}

#[test]
fn notification_endpoint_must_be_http() {
    let mut raw = RawSettings::default();
    raw.notifications.endpoint = Some("ftp://mail.example.com".to_string());

    let err = Settings::from_raw(raw).expect_err("ftp endpoint must fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "notifications.endpoint",
            ..
        }
    ));
}

#[test]
fn blank_database_url_is_treated_as_missing() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.url.is_none());
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["storefront"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_seed_arguments() {
    let args = CliArgs::parse_from([
        "storefront",
        "seed",
        "--database-url",
        "postgres://example",
    ]);

    match args.command.expect("seed command") {
        Command::Seed(seed) => {
            assert_eq!(
                seed.database.database_url.as_deref(),
                Some("postgres://example")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}
