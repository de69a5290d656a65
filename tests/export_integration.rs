use ch3rry_pi3::export::{ExportSettings, export};
use ch3rry_pi3::ui::Site;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn settings(root: &Path, out: &str) -> ExportSettings {
    ExportSettings {
        out_dir: root.join(out),
        public_dir: root.join("public"),
        api_url: "https://twin-api.test".to_string(),
        ..ExportSettings::default()
    }
}

fn read_tree(dir: &Path, files: &[PathBuf]) -> Vec<(PathBuf, Vec<u8>)> {
    files
        .iter()
        .map(|f| (f.clone(), fs::read(dir.join(f)).unwrap()))
        .collect()
}

#[test]
fn test_export_writes_pages_and_public_assets() {
    let root = TempDir::new().unwrap();
    let public = root.path().join("public");
    fs::create_dir_all(public.join("img")).unwrap();
    fs::write(public.join("twin.js"), "customElements.define('twin-chat', class {});").unwrap();
    fs::write(public.join("img").join("avatar.png"), b"\x89PNG").unwrap();

    let settings = settings(root.path(), "out");
    let report = export(&settings, &Site::twin(&settings.api_url)).unwrap();

    assert_eq!(
        report.files,
        vec![
            PathBuf::from("404.html"),
            PathBuf::from("img/avatar.png"),
            PathBuf::from("index.html"),
            PathBuf::from("twin.js"),
        ]
    );

    let index = fs::read_to_string(settings.out_dir.join("index.html")).unwrap();
    assert!(index.contains("Ch3rry Pi3"));
    assert!(index.contains("This AI chatbot serves as Roger J. Campbell's Digital Twin"));
    assert_eq!(index.matches(r#"id="twin-container""#).count(), 1);
    assert!(index.contains("height:600px"));
    assert!(index.contains(r#"api-url="https://twin-api.test""#));
}

#[test]
fn test_rebuild_is_byte_identical() {
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("public")).unwrap();
    fs::write(root.path().join("public").join("app.css"), "body{margin:0}").unwrap();

    let first = settings(root.path(), "out-a");
    let second = settings(root.path(), "out-b");
    let site = Site::twin(&first.api_url);

    let a = export(&first, &site).unwrap();
    let b = export(&second, &site).unwrap();
    assert_eq!(a.files, b.files);
    assert_eq!(
        read_tree(&first.out_dir, &a.files),
        read_tree(&second.out_dir, &b.files)
    );

    // Same directory again
    let again = export(&first, &site).unwrap();
    assert_eq!(
        read_tree(&first.out_dir, &a.files),
        read_tree(&first.out_dir, &again.files)
    );
}

#[test]
fn test_missing_public_dir_is_fine() {
    let root = TempDir::new().unwrap();
    let settings = settings(root.path(), "out");
    let report = export(&settings, &Site::twin(&settings.api_url)).unwrap();
    assert_eq!(report.files.len(), 2);
}
