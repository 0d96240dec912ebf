//! Configuration wiring used by the command-line front end.

use fieldvisit::config::{FieldVisitConfig, MessengerKind};
use fieldvisit::contract::TechnicianId;
use fieldvisit::directory::Scope;

#[test]
fn toml_file_drives_scope_and_messenger() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[store]
root_dir = "/var/lib/fieldvisit"

[messenger]
kind = "whatsapp"

[messenger.whatsapp]
access_token = "secret"
phone_number_id = "1055"
default_country_code = "353"

[messenger.whatsapp.recipients]
rory = "0871234567"

[directory]
admin_users = ["Office", "Manager"]
"#,
    )
    .expect("write");

    let config = FieldVisitConfig::from_file(&path).expect("parse");
    assert_eq!(config.store.root_dir, std::path::PathBuf::from("/var/lib/fieldvisit"));
    assert_eq!(config.messenger.kind, MessengerKind::Whatsapp);
    assert_eq!(fieldvisit::messenger::from_config(&config.messenger).id(), "whatsapp");
    assert!(config.reminders.enabled);

    assert_eq!(Scope::for_user("manager", &config.directory), Scope::All);
    assert_eq!(
        Scope::for_user("Rory", &config.directory),
        Scope::Technician(TechnicianId::new("rory"))
    );
}
