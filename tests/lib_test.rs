//! Library integration tests.

use milaidy::MilaidyError;

#[test]
fn error_types_are_public() {
    let err = MilaidyError::InvalidChannel {
        name: "canary".into(),
    };
    assert!(err.to_string().contains("canary"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> milaidy::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use milaidy::cli::{Cli, Commands, UpdateAction};

    let cli = Cli::parse_from(["milaidy", "update", "status"]);
    if let Some(Commands::Update(args)) = cli.command {
        assert!(matches!(args.action, Some(UpdateAction::Status(_))));
    } else {
        panic!("Expected Update command");
    }
}

#[test]
fn checker_works_with_public_stores() {
    use milaidy::config::{ConfigStore, MemoryConfigStore};
    use milaidy::updates::{Deadline, DistTagSource, DistTags, UpdateChecker};

    struct Fixed;

    impl DistTagSource for Fixed {
        fn fetch_dist_tags(&self, _deadline: &Deadline) -> Option<DistTags> {
            let mut tags = DistTags::new();
            tags.insert("latest".into(), "3.0.0".into());
            Some(tags)
        }
    }

    let store = MemoryConfigStore::new();
    let result = UpdateChecker::new(&store, &Fixed)
        .with_current_version("2.0.0")
        .with_channel_resolver(|_| Default::default())
        .check(true);

    assert!(result.update_available);
    assert_eq!(result.latest_version.as_deref(), Some("3.0.0"));
    assert_eq!(
        store.load_update().unwrap().last_check_version.as_deref(),
        Some("3.0.0")
    );
}

#[test]
fn install_detection_is_public() {
    use milaidy::updates::{classify_install_path, InstallMethod};
    use std::path::Path;

    assert_eq!(
        classify_install_path(Path::new("/opt/homebrew/Cellar/milaidy/2.0.0/bin/milaidy")),
        InstallMethod::Homebrew
    );
}
