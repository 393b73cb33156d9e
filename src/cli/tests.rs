use super::*;
use crate::core::constants::DEFAULT_SERVER_URL;

fn parse_args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv)
        .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
}

#[test]
fn no_subcommand_means_chat() {
    let args = parse_args(&["agrichat"]);
    assert!(args.command.is_none());
    assert!(args.server.is_none());
}

#[test]
fn global_flags_are_accepted_after_the_subcommand() {
    let args = parse_args(&[
        "agrichat",
        "say",
        "--server",
        "http://farm.local:8080",
        "--log-file",
        "/tmp/agrichat.log",
        "hello",
    ]);
    assert_eq!(args.server.as_deref(), Some("http://farm.local:8080"));
    assert_eq!(
        args.log_file.as_deref(),
        Some(Path::new("/tmp/agrichat.log"))
    );
}

#[test]
fn say_collects_words_and_optional_image() {
    let argv = ["agrichat", "say", "-i", "leaf.jpg", "what", "is", "this?"];
    match parse_args(&argv).command {
        Some(Commands::Say { image, prompt }) => {
            assert_eq!(image, Some(PathBuf::from("leaf.jpg")));
            assert_eq!(prompt, vec!["what", "is", "this?"]);
        }
        _ => panic!("argv={argv:?} should parse as say"),
    }
}

#[test]
fn set_takes_multi_word_values() {
    let argv = ["agrichat", "set", "log-file", "/tmp/my", "logs.txt"];
    match parse_args(&argv).command {
        Some(Commands::Set { key, value }) => {
            assert_eq!(key, "log-file");
            assert_eq!(value, vec!["/tmp/my", "logs.txt"]);
        }
        _ => panic!("argv={argv:?} should parse as set"),
    }
}

#[test]
fn server_url_prefers_flag_then_env_then_config() {
    let config = Config {
        server_url: Some("http://from-config:5000".into()),
        ..Config::default()
    };

    assert_eq!(
        resolve_server_url(Some("http://flag"), Some("http://env"), &config),
        "http://flag"
    );
    assert_eq!(
        resolve_server_url(None, Some("http://env"), &config),
        "http://env"
    );
    assert_eq!(
        resolve_server_url(Some("  "), None, &config),
        "http://from-config:5000"
    );
    assert_eq!(
        resolve_server_url(None, None, &Config::default()),
        DEFAULT_SERVER_URL
    );
}

#[test]
fn update_config_persists_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    update_config(&path, |config| {
        set_value(config, "server-url", &["https://farm.example".to_string()])
    })
    .unwrap();

    let saved = Config::load_from_path(&path).unwrap();
    assert_eq!(saved.server_url.as_deref(), Some("https://farm.example"));

    update_config(&path, |config| unset_value(config, "server-url")).unwrap();
    assert_eq!(Config::load_from_path(&path).unwrap(), Config::default());
}
