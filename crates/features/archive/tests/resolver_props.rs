use pmgr_archive::{Resolution, resolve_plugin, resolve_single, Candidate};
use proptest::prelude::*;

fn basename() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}[a-z0-9]"
}

fn file_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}\\.(py|txt|json)"
}

fn first_segment(rest: &str) -> Option<Candidate<'_>> {
    rest.split('/').next().map(Candidate::directory)
}

proptest! {
    #[test]
    fn one_directory_always_resolves(name in basename(), files in prop::collection::vec(file_name(), 1..8)) {
        let mut paths: Vec<String> = files.iter().map(|f| format!("root/{name}/{f}")).collect();
        paths.push(format!("root/{name}/{name}.py"));

        prop_assert_eq!(
            resolve_single(&paths, "root/", first_segment),
            Resolution::Found(Candidate::directory(&name))
        );
    }

    #[test]
    fn two_directories_never_resolve(a in basename(), b in basename()) {
        prop_assume!(a != b);
        let paths = vec![format!("root/{a}/x.py"), format!("root/{b}/y.py")];
        let is_multiple = matches!(
            resolve_single(&paths, "root/", first_segment),
            Resolution::Multiple { .. }
        );
        prop_assert!(is_multiple);
    }

    #[test]
    fn only_python_files_vote(name in basename(), other in basename()) {
        prop_assume!(name != other);
        let paths = vec![
            format!("addons/source-python/plugins/{other}/readme.txt"),
            format!("addons/source-python/plugins/{name}/{name}.py"),
        ];
        let resolved = resolve_plugin(&paths).expect("single python directory");
        prop_assert_eq!(resolved.basename, name);
    }
}
