use std::io::Write;

use slircd_modecore::config::ValidationError;
use slircd_modecore::{ChannelManager, Collaborators, Config};

#[test]
fn test_load_partial_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[server]
name = "irc.example.net"

[redirect]
limit_redirect_interop = true
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.server.name, "irc.example.net");
    assert!(config.redirect.limit_redirect_interop);
    assert_eq!(config.limits.max_bans, 64);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(slircd_modecore::config::ConfigError::Io(_))));
}

#[test]
fn test_manager_refuses_invalid_config() {
    let config = Config::from_toml_str("[limits]\nmax_bans = 0").unwrap();
    let result = ChannelManager::new(config, Collaborators::default());
    assert_eq!(result.err(), Some(vec![ValidationError::ZeroBanLimit]));
}
