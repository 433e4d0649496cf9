use pmgr_domain::layout::PathLayout;
use pmgr_domain::project::{ProjectKey, ProjectKind};
use pmgr_domain::requirements::RequirementGroup;

#[test]
fn project_kind_parses_singular_and_plural() {
    assert_eq!("sub-plugins".parse::<ProjectKind>(), Ok(ProjectKind::SubPlugin));
    assert_eq!("package".parse::<ProjectKind>(), Ok(ProjectKind::Package));
    assert!("addons".parse::<ProjectKind>().is_err());
    assert_eq!(serde_json::to_string(&ProjectKind::SubPlugin).unwrap(), "\"sub-plugin\"");
}

#[test]
fn media_dir_nests_sub_plugins_under_their_plugin() {
    assert_eq!(ProjectKey::plugin("gungame").media_dir(), "plugins/gungame");
    assert_eq!(
        ProjectKey::sub_plugin("gungame", "deathmatch").media_dir(),
        "sub-plugins/gungame/deathmatch"
    );
}

#[test]
fn layout_flags_round_trip_through_bits() {
    let layout = PathLayout::from_flags(true, false, true);
    assert!(layout.contains(PathLayout::MODULE));
    assert!(layout.allows_package());
    assert!(!PathLayout::MODULE.allows_package());

    let json = serde_json::to_string(&layout).unwrap();
    assert_eq!(serde_json::from_str::<PathLayout>(&json).unwrap(), layout);
}

#[test]
fn requirement_groups_know_their_key_field() {
    assert_eq!(RequirementGroup::parse("pypi"), Some(RequirementGroup::Pypi));
    assert_eq!(RequirementGroup::parse("ini"), None);
    assert_eq!(RequirementGroup::Custom.required_field(), "basename");
    assert_eq!(RequirementGroup::Vcs.required_field(), "url");
}
