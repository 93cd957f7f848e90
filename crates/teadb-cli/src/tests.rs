use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["teadb"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_run_with_json() {
    let cli = Cli::try_parse_from(["teadb", "run", "--json"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Run { json: true })));
}

#[test]
fn parses_seed_without_path() {
    let cli = Cli::try_parse_from(["teadb", "seed"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Seed { path: None })));
}

#[test]
fn parses_seed_with_path() {
    let cli = Cli::try_parse_from(["teadb", "seed", "--path", "/tmp/reference.yaml"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Seed { path: Some(path) }) => {
            assert_eq!(path, PathBuf::from("/tmp/reference.yaml"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_migrate_and_types() {
    let cli = Cli::try_parse_from(["teadb", "migrate"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Migrate)));
    let cli = Cli::try_parse_from(["teadb", "types"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Types)));
}

#[test]
fn parses_search_with_repeated_filters() {
    let cli = Cli::try_parse_from([
        "teadb",
        "search",
        "--type",
        "Green Tea",
        "--type",
        "Oolong Tea",
        "--text",
        "roasted chestnut",
        "--tag",
        "Smoky",
        "--json",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Search {
            tea_types,
            text,
            tags,
            json,
        }) => {
            assert_eq!(tea_types, vec!["Green Tea", "Oolong Tea"]);
            assert_eq!(text.as_deref(), Some("roasted chestnut"));
            assert_eq!(tags, vec!["Smoky"]);
            assert!(json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn unknown_command_is_rejected() {
    assert!(Cli::try_parse_from(["teadb", "crawl"]).is_err());
}

#[test]
fn every_command_but_migrate_needs_schema() {
    assert!(Commands::Run { json: false }.needs_schema());
    assert!(Commands::Seed { path: None }.needs_schema());
    assert!(Commands::Types.needs_schema());
    assert!(Commands::Search {
        tea_types: Vec::new(),
        text: None,
        tags: Vec::new(),
        json: false,
    }
    .needs_schema());
    assert!(!Commands::Migrate.needs_schema());
}
