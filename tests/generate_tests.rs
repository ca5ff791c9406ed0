//! End-to-end tests for the `generate` command, driving the binary against a
//! small zettelkasten in a temp directory.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A zettelkasten folder, a site folder, and a config file pointing at both.
struct TestSite {
    _root: TempDir,
    zk_dir: PathBuf,
    site_dir: PathBuf,
    config_path: PathBuf,
}

impl TestSite {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let zk_dir = root.path().join("zettelkasten");
        let site_dir = root.path().join("site");
        fs::create_dir(&zk_dir).unwrap();
        fs::create_dir(&site_dir).unwrap();

        let config_path = root.path().join("config.toml");
        fs::write(
            &config_path,
            format!(
                "zettelkasten_dir = {:?}\nsite_dir = {:?}\nsite_title = \"Test Site\"\n",
                zk_dir, site_dir
            ),
        )
        .unwrap();

        Self {
            _root: root,
            zk_dir,
            site_dir,
            config_path,
        }
    }

    fn add_note(&self, name: &str, contents: &str) {
        fs::write(self.zk_dir.join(name), contents).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("zk-ssg").unwrap();
        cmd.arg("--config")
            .arg(&self.config_path)
            .arg("generate")
            .arg("--keep-stale");
        cmd
    }

    fn site_file(&self, rel: &str) -> PathBuf {
        self.site_dir.join(rel)
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

/// The standard fixture: a categorical index, an about page, and one note.
fn standard_site() -> TestSite {
    let site = TestSite::new();
    site.add_note(
        "index.md",
        "Welcome. #published \n\n#projects\n\nSee [[about]] for more.\n",
    );
    site.add_note("about.md", "This site is a test. #published \n");
    site.add_note(
        "20200101000000.md",
        "# Alpha\n\nA note about alpha. #published #projects \n\nBack to [[about]].\n",
    );
    site
}

#[test]
fn test_generate_builds_the_whole_site() {
    let site = standard_site();
    site.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully generated"))
        .stdout(predicate::str::contains("warning:").not());

    // Root pages land in the site root, notes in the pages subfolder.
    for page in [
        "index.html",
        "about.html",
        "alphabetical-index.html",
        "chronological-index.html",
        "pages/20200101000000.html",
    ] {
        assert!(site.site_file(page).is_file(), "{page} should exist");
    }

    // Supporting files are provided on first run.
    assert!(site.site_file("style.css").is_file());
    assert!(site.site_file("header.html").is_file());
    assert!(site.site_file("footer.html").is_file());
}

#[test]
fn test_categorical_index_lists_tagged_notes() {
    let site = standard_site();
    site.cmd().assert().success();

    let index = read(&site.site_file("index.html"));
    // The #projects token was replaced by a link to the tagged note, and the
    // wiki link to the about page was resolved cross-folder.
    assert!(index.contains(r#"<a href="pages/20200101000000.html">[§] Alpha</a>"#));
    assert!(index.contains(r#"<a href="about.html">[§] about</a>"#));
    assert!(!index.contains("#projects"));
    // Wrapped in the template, copyright appended, sort links inserted.
    assert!(index.contains("<title>Test Site</title>"));
    assert!(index.contains("text-align: center"));
    assert!(index.contains("sort by:"));
}

#[test]
fn test_note_links_climb_out_of_the_pages_folder() {
    let site = standard_site();
    site.cmd().assert().success();

    let alpha = read(&site.site_file("pages/20200101000000.html"));
    assert!(alpha.contains(r#"<a href="../about.html">[§] about</a>"#));
    // Tags are hidden by default.
    assert!(!alpha.contains("#published"));
    // Subfolder pages reference root assets through ../.
    assert!(alpha.contains(r#"href="../style.css""#));
}

#[test]
fn test_indexes_list_the_note() {
    let site = standard_site();
    site.cmd().assert().success();

    let alpha_index = read(&site.site_file("alphabetical-index.html"));
    assert!(alpha_index.contains(r#"<a href="pages/20200101000000.html">[§] Alpha</a>"#));

    let chrono_index = read(&site.site_file("chronological-index.html"));
    assert!(chrono_index.contains(r#"<a href="pages/20200101000000.html">[§] Alpha</a>"#));
}

#[test]
fn test_unpublished_notes_stay_out() {
    let site = standard_site();
    site.add_note("20200202000000.md", "# Draft\n\nnot ready\n");
    site.cmd().assert().success();

    assert!(!site.site_file("pages/20200202000000.html").exists());
    let index = read(&site.site_file("alphabetical-index.html"));
    assert!(!index.contains("Draft"));
}

#[test]
fn test_broken_link_warns_but_still_generates() {
    let site = standard_site();
    site.add_note(
        "20200303000000.md",
        "# Beta\n\nSee [[19990101000000]]. #published \n",
    );

    site.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("warning:"))
        .stdout(predicate::str::contains("[[19990101000000]]"));

    assert!(site.site_file("pages/20200303000000.html").is_file());
}

#[test]
fn test_missing_categorical_index_fails() {
    let site = TestSite::new();
    site.add_note("about.md", "body #published \n");

    site.cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("index.md"));
}

#[test]
fn test_second_run_is_stable() {
    let site = standard_site();
    site.cmd().assert().success();
    let first = read(&site.site_file("pages/20200101000000.html"));

    site.cmd().assert().success();
    let second = read(&site.site_file("pages/20200101000000.html"));
    assert_eq!(first, second);
}

#[test]
fn test_json_report() {
    let site = standard_site();
    site.cmd()
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"published\""))
        .stdout(predicate::str::contains("\"html_files\""));
}

#[test]
fn test_config_show_round_trips() {
    let site = TestSite::new();
    let mut cmd = Command::cargo_bin("zk-ssg").unwrap();
    cmd.arg("--config")
        .arg(&site.config_path)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("site_title = \"Test Site\""))
        .stdout(predicate::str::contains("site_subfolder_name = \"pages\""));
}
