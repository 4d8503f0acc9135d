use std::fs;
use std::path::Path;
use std::process::Command;
use tailwind_theme::{
    export, scan, ConfigError, ConfigSource, ExportArgs, ScanArgs, TailwindConfig,
};
use tempfile::tempdir;

fn write_project(root: &Path) {
    fs::create_dir_all(root.join("templates")).unwrap();
    fs::create_dir_all(root.join("static/src/lib")).unwrap();
    fs::create_dir_all(root.join("static/dist")).unwrap();
    fs::write(
        root.join("templates/index.html"),
        r#"<h1 class="font-faculty-glyphic animate-text-slide">Hello</h1>"#,
    )
    .unwrap();
    fs::write(root.join("templates/dashboard.html"), r#"<div class="flex"></div>"#).unwrap();
    fs::write(root.join("static/src/main.js"), "document.body.classList.add('p-4');").unwrap();
    fs::write(root.join("static/src/lib/socket.js"), "export const socket = null;").unwrap();
    fs::write(root.join("static/dist/bundle.js"), "/* not scanned */").unwrap();
}

fn scan_args(base: &Path) -> ScanArgs {
    ScanArgs {
        source: ConfigSource::default(),
        base: base.to_path_buf(),
        exclude: vec![],
        jobs: None,
        allow_symlinks: false,
        manifest: None,
    }
}

#[test]
fn test_scan_builtin_theme() {
    let temp_dir = tempdir().unwrap();
    write_project(temp_dir.path());

    let manifest_path = temp_dir.path().join("out/scan.json");
    let args = ScanArgs {
        manifest: Some(manifest_path.clone()),
        ..scan_args(temp_dir.path())
    };

    let result = scan(&args, false).unwrap();
    assert_eq!(result.resolved.files.len(), 4);
    assert_eq!(result.manifest.patterns["./templates/**/*.html"].files.len(), 2);
    assert_eq!(result.manifest.patterns["./static/src/**/*.js"].files.len(), 2);

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
    assert_eq!(manifest["metadata"]["files_matched"], 4);
    let html_files = manifest["patterns"]["./templates/**/*.html"]["files"]
        .as_array()
        .unwrap();
    assert!(html_files.iter().any(|f| f == "templates/index.html"));
}

#[test]
fn test_scan_with_exclude_and_config_file() {
    let temp_dir = tempdir().unwrap();
    write_project(temp_dir.path());

    let config_path = temp_dir.path().join("tailwind.config.yaml");
    fs::write(
        &config_path,
        "content:\n  - \"./static/**/*.js\"\n  - \"./templates/*.{html,htm}\"\n",
    )
    .unwrap();

    let args = ScanArgs {
        source: ConfigSource {
            config: Some(config_path),
        },
        exclude: vec!["static/dist/**".to_string()],
        jobs: Some(2),
        ..scan_args(temp_dir.path())
    };

    let result = scan(&args, false).unwrap();
    let files: Vec<String> = result
        .resolved
        .files
        .iter()
        .map(|f| f.path.strip_prefix(temp_dir.path()).unwrap().display().to_string())
        .collect();
    assert_eq!(files.len(), 4);
    assert!(!files.iter().any(|f| f.contains("dist")));
}

#[test]
fn test_export_round_trip_all_formats() {
    let temp_dir = tempdir().unwrap();

    let mut outputs = vec!["theme.json", "theme.yaml"];
    if cfg!(feature = "js") {
        outputs.push("tailwind.config.js");
    }

    for name in outputs {
        let output = temp_dir.path().join(name);
        let args = ExportArgs {
            source: ConfigSource::default(),
            output: output.clone(),
            format: None,
            force: false,
        };
        let bytes = export(&args).unwrap();
        assert!(bytes > 0);

        let loaded = TailwindConfig::from_file(&output).unwrap();
        assert_eq!(loaded, tailwind_theme::dashboard_preset(), "round trip through {}", name);
    }
}

#[test]
fn test_export_refuses_to_overwrite() {
    let temp_dir = tempdir().unwrap();
    let output = temp_dir.path().join("theme.json");
    fs::write(&output, "{}").unwrap();

    let mut args = ExportArgs {
        source: ConfigSource::default(),
        output: output.clone(),
        format: None,
        force: false,
    };
    let err = export(&args).unwrap_err();
    assert!(matches!(err, ConfigError::OutputExists { .. }));
    assert_eq!(fs::read_to_string(&output).unwrap(), "{}");

    args.force = true;
    export(&args).unwrap();
    assert!(fs::read_to_string(&output).unwrap().contains("text-slide"));
}

#[test]
fn test_binary_validate_builtin_theme() {
    let output = Command::new(env!("CARGO_BIN_EXE_tailwind-theme"))
        .arg("validate")
        .arg("--strict")
        .output()
        .expect("Failed to execute tailwind-theme");

    assert!(
        output.status.success(),
        "validate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_binary_validate_reports_errors() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("broken.json");
    fs::write(
        &config_path,
        r#"{ "content": [""], "theme": { "extend": { "animation": { "spin": "spin 1s linear infinite" } } } }"#,
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_tailwind-theme"))
        .arg("validate")
        .arg("-c")
        .arg(&config_path)
        .output()
        .expect("Failed to execute tailwind-theme");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!output.status.success());
    assert!(stdout.contains("error: content[0]: empty content pattern"), "{}", stdout);
    assert!(stdout.contains("no keyframes named `spin`"), "{}", stdout);
}

#[test]
fn test_binary_show_yaml() {
    let output = Command::new(env!("CARGO_BIN_EXE_tailwind-theme"))
        .args(["show", "--format", "yaml"])
        .output()
        .expect("Failed to execute tailwind-theme");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed = TailwindConfig::from_yaml_str(&stdout).unwrap();
    assert_eq!(parsed, tailwind_theme::dashboard_preset());
}
