use pmgr_archive::{ArchiveError, ArchiveInspector, ParentPlugin};
use pmgr_kernel::domain::layout::{PathLayout, SubPluginRoot};
use pmgr_kernel::domain::project::ProjectKind;
use pmgr_kernel::validation::ViolationCode;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

macro_rules! plugins {
    ($path:literal) => {
        concat!("addons/source-python/plugins/", $path)
    };
}

macro_rules! packages {
    ($path:literal) => {
        concat!("addons/source-python/packages/custom/", $path)
    };
}

fn archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, body) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).expect("directory");
        } else {
            writer.start_file(*name, options).expect("start");
            writer.write_all(body.as_bytes()).expect("write");
        }
    }
    writer.finish().expect("finish").into_inner()
}

fn inspector() -> ArchiveInspector {
    ArchiveInspector::new(1024 * 1024)
}

fn rejection(result: Result<pmgr_archive::InspectedArchive, ArchiveError>) -> (ViolationCode, String) {
    let err = result.expect_err("archive should be rejected");
    let violation = err.violation().expect("rejection");
    (violation.code, violation.message.to_string())
}

#[test]
fn plugin_archive_is_accepted() {
    let bytes = archive(&[
        (plugins!(""), ""),
        (plugins!("gungame/"), ""),
        (plugins!("gungame/gungame.py"), "# entry"),
        (plugins!("gungame/core/weapons.py"), ""),
        (plugins!("gungame/requirements.json"), r#"{"pypi": [{"name": "configobj"}]}"#),
        ("resource/source-python/translations/gungame/strings.ini", ""),
    ]);

    let inspected = inspector().inspect(ProjectKind::Plugin, &bytes, None).expect("accepted");
    assert_eq!(inspected.basename, "gungame");
    assert!(!inspected.is_module);
    assert_eq!(inspected.files.len(), 4);
    assert_eq!(inspected.requirements.pypi[0].name, "configobj");
}

#[test]
fn plugin_with_two_directories_is_ambiguous() {
    let bytes = archive(&[
        (plugins!("gungame/gungame.py"), ""),
        (plugins!("other/other.py"), ""),
    ]);
    let (code, message) = rejection(inspector().inspect(ProjectKind::Plugin, &bytes, None));
    assert_eq!(code, ViolationCode::Multiple);
    assert_eq!(message, "Multiple base directories found for plugin.");
}

#[test]
fn plugin_without_primary_file_hints_at_sub_plugins() {
    let bytes = archive(&[(plugins!("gungame/modes/dm/dm.py"), "")]);
    let (code, message) = rejection(inspector().inspect(ProjectKind::Plugin, &bytes, None));
    assert_eq!(code, ViolationCode::NotFound);
    assert_eq!(
        message,
        "No primary file found in zip.  Perhaps you are attempting to upload a sub-plugin."
    );
}

#[test]
fn module_package_reads_module_manifest() {
    let bytes = archive(&[
        (packages!("easy_tools.py"), ""),
        (packages!("easy_tools_requirements.json"), r#"{"custom": [{"basename": "core_lib"}]}"#),
    ]);

    let inspected = inspector().inspect(ProjectKind::Package, &bytes, None).expect("accepted");
    assert_eq!(inspected.basename, "easy_tools");
    assert!(inspected.is_module);
    assert_eq!(inspected.requirements.custom[0].basename, "core_lib");
}

#[test]
fn package_directory_needs_init() {
    let bytes = archive(&[(packages!("easy_tools/helpers.py"), "")]);
    let (code, message) = rejection(inspector().inspect(ProjectKind::Package, &bytes, None));
    assert_eq!(code, ViolationCode::NotFound);
    assert_eq!(message, "No primary file found in zip for package \"easy_tools\".");
}

#[test]
fn forbidden_basename_is_rejected() {
    let bytes = archive(&[(plugins!("sp_admin/sp_admin.py"), "")]);
    let (_, message) = rejection(inspector().inspect(ProjectKind::Plugin, &bytes, None));
    assert_eq!(message, "Plugin basename cannot start with \"sp_\".");
}

#[test]
fn stray_files_are_listed() {
    let bytes = archive(&[
        (plugins!("gungame/gungame.py"), ""),
        ("gungame.exe", ""),
    ]);
    let (code, message) = rejection(inspector().inspect(ProjectKind::Plugin, &bytes, None));
    assert_eq!(code, ViolationCode::Invalid);
    assert_eq!(message, "Invalid paths found in zip: gungame.exe");
}

#[test]
fn broken_manifest_is_reported() {
    let bytes = archive(&[
        (plugins!("gungame/gungame.py"), ""),
        (plugins!("gungame/requirements.json"), r#"{"pypi": [{"version": "1.0"}]}"#),
    ]);
    let (_, message) = rejection(inspector().inspect(ProjectKind::Plugin, &bytes, None));
    assert_eq!(message, "No name found for object in \"pypi\" listing in requirements json file.");
}

#[test]
fn sub_plugin_resolves_under_registered_path() {
    let roots = [
        SubPluginRoot { path: "modes".to_owned(), layout: PathLayout::PACKAGE_USING_BASENAME },
        SubPluginRoot { path: "addons/custom".to_owned(), layout: PathLayout::MODULE },
    ];
    let parent = ParentPlugin { basename: "gungame", roots: &roots };

    let package = archive(&[(plugins!("gungame/modes/deathmatch/deathmatch.py"), "")]);
    let inspected =
        inspector().inspect(ProjectKind::SubPlugin, &package, Some(&parent)).expect("package");
    assert_eq!(inspected.basename, "deathmatch");
    assert_eq!(inspected.sub_path.as_deref(), Some("modes"));
    assert!(!inspected.is_module);

    let module = archive(&[(plugins!("gungame/addons/custom/knife_pro.py"), "")]);
    let inspected =
        inspector().inspect(ProjectKind::SubPlugin, &module, Some(&parent)).expect("module");
    assert_eq!(inspected.basename, "knife_pro");
    assert!(inspected.is_module);
}

#[test]
fn sub_plugin_with_wrong_parent() {
    let roots = [SubPluginRoot { path: "modes".to_owned(), layout: PathLayout::all() }];
    let parent = ParentPlugin { basename: "gungame", roots: &roots };
    let bytes = archive(&[(plugins!("warcraft/modes/dm/dm.py"), "")]);

    let (code, message) =
        rejection(inspector().inspect(ProjectKind::SubPlugin, &bytes, Some(&parent)));
    assert_eq!(code, ViolationCode::Invalid);
    assert_eq!(message, "Wrong plugin base directory found in zip.");
}

#[test]
fn sub_plugin_parent_directory_must_be_unique() {
    let roots = [SubPluginRoot { path: "modes".to_owned(), layout: PathLayout::all() }];
    let parent = ParentPlugin { basename: "gungame", roots: &roots };

    let bytes = archive(&[
        (plugins!("gungame/modes/dm/dm.py"), ""),
        (plugins!("warcraft/modes/dm/dm.py"), ""),
    ]);
    let (code, message) =
        rejection(inspector().inspect(ProjectKind::SubPlugin, &bytes, Some(&parent)));
    assert_eq!(code, ViolationCode::Multiple);
    assert_eq!(message, "Multiple plugins found in zip.");

    let bytes = archive(&[("readme.txt", "no plugin here")]);
    let (code, message) =
        rejection(inspector().inspect(ProjectKind::SubPlugin, &bytes, Some(&parent)));
    assert_eq!(code, ViolationCode::NotFound);
    assert_eq!(message, "No plugin base directory found in zip.");
}

#[test]
fn sub_plugin_directory_must_be_unique() {
    let roots = [
        SubPluginRoot { path: "modes".to_owned(), layout: PathLayout::all() },
        SubPluginRoot { path: "addons/custom".to_owned(), layout: PathLayout::all() },
    ];
    let parent = ParentPlugin { basename: "gungame", roots: &roots };

    let bytes = archive(&[
        (plugins!("gungame/modes/dm/dm.py"), ""),
        (plugins!("gungame/modes/ffa/ffa.py"), ""),
    ]);
    let (code, message) =
        rejection(inspector().inspect(ProjectKind::SubPlugin, &bytes, Some(&parent)));
    assert_eq!(code, ViolationCode::Multiple);
    assert_eq!(message, "Multiple sub-plugins found in zip.");

    let bytes = archive(&[
        (plugins!("gungame/modes/dm/dm.py"), ""),
        (plugins!("gungame/addons/custom/knife_pro.py"), ""),
    ]);
    let (code, message) =
        rejection(inspector().inspect(ProjectKind::SubPlugin, &bytes, Some(&parent)));
    assert_eq!(code, ViolationCode::Multiple);
    assert_eq!(message, "Multiple sub-plugins found in zip.");

    let bytes = archive(&[
        (plugins!("gungame/gungame.py"), ""),
        (plugins!("gungame/weapons/knife.py"), ""),
    ]);
    let (code, message) =
        rejection(inspector().inspect(ProjectKind::SubPlugin, &bytes, Some(&parent)));
    assert_eq!(code, ViolationCode::NotFound);
    assert_eq!(message, "No sub-plugin base directory found in zip.");
}

#[test]
fn sub_plugin_layout_not_allowed_by_path() {
    let roots = [SubPluginRoot { path: "modes".to_owned(), layout: PathLayout::MODULE }];
    let parent = ParentPlugin { basename: "gungame", roots: &roots };
    let bytes = archive(&[(plugins!("gungame/modes/dm/__init__.py"), "")]);

    let (code, message) =
        rejection(inspector().inspect(ProjectKind::SubPlugin, &bytes, Some(&parent)));
    assert_eq!(code, ViolationCode::NotFound);
    assert_eq!(
        message,
        concat!(
            "SubPlugin not found in path, though files found within zip for directory: ",
            "\"addons/source-python/plugins/gungame/modes/\"."
        )
    );
}

#[test]
fn garbage_and_oversized_uploads() {
    let (_, message) = rejection(inspector().inspect(ProjectKind::Plugin, b"not a zip", None));
    assert_eq!(message, "Given file is not a valid zip file.");

    let small = ArchiveInspector::new(4);
    let err = small.inspect(ProjectKind::Plugin, b"0123456789", None).expect_err("too large");
    assert_eq!(err.kind(), "too_large");
}
