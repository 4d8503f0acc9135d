use clap::Parser;
use tailwind_theme::{Cli, Commands, ConfigFormat};

#[test]
fn test_cli_parse_show_defaults() {
    let cli = Cli::parse_from(vec!["tailwind-theme", "show"]);

    assert!(!cli.verbose);
    match cli.command {
        Commands::Show(args) => {
            assert!(args.source.config.is_none());
            assert_eq!(args.format, ConfigFormat::Json);
        }
        other => panic!("Unexpected command: {:?}", other),
    }
}

#[test]
fn test_cli_parse_show_with_format() {
    let cli = Cli::parse_from(vec![
        "tailwind-theme",
        "show",
        "-c", "tailwind.config.js",
        "--format", "yaml",
        "-v",
    ]);

    assert!(cli.verbose);
    match cli.command {
        Commands::Show(args) => {
            assert_eq!(args.source.config.unwrap().to_str().unwrap(), "tailwind.config.js");
            assert_eq!(args.format, ConfigFormat::Yaml);
        }
        other => panic!("Unexpected command: {:?}", other),
    }
}

#[test]
fn test_cli_parse_validate() {
    let cli = Cli::parse_from(vec!["tailwind-theme", "validate", "--strict", "--json"]);

    match cli.command {
        Commands::Validate(args) => {
            assert!(args.strict);
            assert!(args.json);
        }
        other => panic!("Unexpected command: {:?}", other),
    }
}

#[test]
fn test_cli_parse_export() {
    let cli = Cli::parse_from(vec![
        "tailwind-theme",
        "export",
        "-o", "dist/tailwind.config.js",
        "--force",
    ]);

    match cli.command {
        Commands::Export(args) => {
            assert_eq!(args.output.to_str().unwrap(), "dist/tailwind.config.js");
            assert!(args.force);
            assert!(args.format.is_none());
            assert_eq!(args.resolved_format().unwrap(), ConfigFormat::Js);
        }
        other => panic!("Unexpected command: {:?}", other),
    }
}

#[test]
fn test_export_format_cannot_be_inferred() {
    let cli = Cli::parse_from(vec!["tailwind-theme", "export", "-o", "theme.txt"]);

    match cli.command {
        Commands::Export(args) => {
            let err = args.resolved_format().unwrap_err();
            assert!(err.contains("--format"));
        }
        other => panic!("Unexpected command: {:?}", other),
    }
}

#[test]
fn test_cli_parse_scan() {
    let cli = Cli::parse_from(vec![
        "tailwind-theme",
        "scan",
        "--base", "bot",
        "-e", "node_modules/**",
        "-e", "static/dist/**",
        "-j", "4",
        "-m", "scan.json",
    ]);

    match cli.command {
        Commands::Scan(args) => {
            assert_eq!(args.base.to_str().unwrap(), "bot");
            assert_eq!(args.exclude, vec!["node_modules/**", "static/dist/**"]);
            assert_eq!(args.jobs, Some(4));
            assert_eq!(args.manifest.unwrap().to_str().unwrap(), "scan.json");
            assert!(!args.allow_symlinks);
        }
        other => panic!("Unexpected command: {:?}", other),
    }
}

#[test]
fn test_scan_rejects_zero_jobs() {
    let cli = Cli::parse_from(vec!["tailwind-theme", "scan", "-j", "0"]);

    match cli.command {
        Commands::Scan(args) => assert!(args.validate().is_err()),
        other => panic!("Unexpected command: {:?}", other),
    }
}

#[test]
fn test_export_requires_output() {
    let result = Cli::try_parse_from(vec!["tailwind-theme", "export"]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_format_is_rejected() {
    let result = Cli::try_parse_from(vec!["tailwind-theme", "show", "--format", "toml"]);
    assert!(result.is_err());
}
