//! Resolution against realistic repository indices

use emenv_package::decode::repository_from_node;
use emenv_package::{
    resolve, InstallTree, Manifest, ManifestDefaults, PackageDef, PackageError, PackageKind,
    Repository, ResolveContext,
};
use emenv_syntax::parse_document;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

const MELPA: &str = r#"
(1
 (magit . [(3 3 0) ((emacs (25 1)) (dash (2 19 1)) (transient (0 4 0))) "A Git porcelain." tar])
 (dash . [(2 19 1) nil "A modern list library." single])
 (transient . [(0 4 0) ((dash (2 19 0))) "Transient commands." single])
 (zenburn-theme . [(2 7) nil "A low contrast theme." single])
 (s . [(1 13 0) nil "String manipulation." single]))
"#;

const GNU: &str = r#"
(1
 (dash . [(2 20 0) nil "A modern list library." single])
 (transient . [(0 5 0) nil "Transient commands." single]))
"#;

fn repository(name: &str, index: &str) -> Repository {
    let url = format!("https://{}.example/packages", name);
    repository_from_node(name, &url, &parse_document(index).unwrap()).unwrap()
}

fn repositories() -> BTreeMap<String, Repository> {
    [("melpa", MELPA), ("gnu", GNU)]
        .into_iter()
        .map(|(name, index)| (name.to_string(), repository(name, index)))
        .collect()
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_provenance_tree() {
    let repos = repositories();
    let prefer = strings(&["melpa", "gnu"]);
    let provided = strings(&["emacs"]);
    let ctx = ResolveContext::new(&repos, &prefer, &provided);

    let set = resolve(
        ctx,
        &[
            PackageDef::standard("magit"),
            PackageDef::theme("zenburn-theme"),
            PackageDef::standard("transient").with_repo("gnu"),
        ],
    )
    .unwrap();

    insta::assert_snapshot!(set.tree.render(), @r"
    root
      package magit 3.3.0 from melpa
        provided emacs
        dependency dash 2.19.1 from melpa
      theme zenburn-theme 2.7 from melpa
      package transient 0.5.0 from gnu
    ");

    let fetchable: Vec<_> = set.fetchable().map(|d| d.name.as_str()).collect();
    assert_eq!(fetchable, vec!["dash", "magit", "transient", "zenburn-theme"]);
    assert_eq!(set.get("emacs").unwrap().kind, PackageKind::Provided);
}

#[test]
fn test_resolution_is_deterministic() {
    let repos = repositories();
    let prefer = strings(&["gnu", "melpa"]);
    let provided = strings(&["emacs"]);
    let packages = [PackageDef::standard("magit"), PackageDef::standard("s")];

    let first = resolve(ResolveContext::new(&repos, &prefer, &provided), &packages).unwrap();
    let second = resolve(ResolveContext::new(&repos, &prefer, &provided), &packages).unwrap();

    assert_eq!(first, second);
    assert_eq!(format!("{:?}", first), format!("{:?}", second));
    assert_eq!(first.get("dash").unwrap().repo, "gnu");
}

#[test]
fn test_shallower_requirement_takes_over_depth_two_winner() {
    let chain = repository(
        "local",
        r#"
        (1
         (a . [(1) ((b (1))) "Top." single])
         (b . [(1) ((c (1))) "Middle." single])
         (c . [(1) nil "Bottom." single]))
        "#,
    );
    let repos: BTreeMap<_, _> = [("local".to_string(), chain)].into_iter().collect();
    let prefer = strings(&["local"]);
    let ctx = ResolveContext::new(&repos, &prefer, &[]);

    let set = resolve(ctx, &[PackageDef::standard("a"), PackageDef::standard("c")]).unwrap();

    let c = set.get("c").unwrap();
    assert_eq!(c.depth, 0);
    assert_eq!(c.parent, Some(InstallTree::ROOT));
    assert_eq!(c.kind, PackageKind::Standard);

    let b = set.node_of("b").unwrap();
    let old = set.tree.children(b)[0];
    assert_eq!(set.tree.node(old).def.kind, PackageKind::Shadow);
    assert_eq!(set.tree.node(old).def.name, "c");

    let top: Vec<_> = set
        .tree
        .children(InstallTree::ROOT)
        .iter()
        .map(|&id| set.tree.node(id).def.name.as_str())
        .collect();
    assert_eq!(top, vec!["a", "c"]);
    assert_eq!(set.fetchable().count(), 3);
}

#[test]
fn test_shadowed_subtree_is_dropped() {
    let repos = repositories();
    let prefer = strings(&["melpa"]);
    let provided = strings(&["emacs"]);
    let ctx = ResolveContext::new(&repos, &prefer, &provided);

    let set = resolve(
        ctx,
        &[PackageDef::standard("magit"), PackageDef::standard("transient")],
    )
    .unwrap();

    let magit = set.node_of("magit").unwrap();
    let old = set.tree.children(magit)[2];
    assert_eq!(set.tree.node(old).def.kind, PackageKind::Shadow);
    assert!(set.tree.children(old).is_empty());

    let transient = set.node_of("transient").unwrap();
    assert_eq!(set.tree.node(transient).parent, Some(InstallTree::ROOT));
    assert_eq!(set.get("transient").unwrap().depth, 0);

    // The new winner re-resolves its own dependencies; dash stays with magit
    let child = set.tree.children(transient)[0];
    assert_eq!(set.tree.node(child).def.kind, PackageKind::Shadow);
    assert_eq!(set.get("dash").unwrap().depth, 1);
}

#[test]
fn test_equal_depth_keeps_first_winner() {
    let repos = repositories();
    let prefer = strings(&["melpa", "gnu"]);
    let ctx = ResolveContext::new(&repos, &prefer, &[]);

    let set = resolve(
        ctx,
        &[
            PackageDef::standard("dash"),
            PackageDef::standard("dash").with_repo("gnu"),
        ],
    )
    .unwrap();

    let dash = set.get("dash").unwrap();
    assert_eq!(dash.repo, "melpa");
    assert_eq!(dash.version, "2.19.1");
    let second = set.tree.children(InstallTree::ROOT)[1];
    assert_eq!(set.tree.node(second).def.kind, PackageKind::Shadow);
}

#[test]
fn test_provided_names_are_never_looked_up() {
    let repos = repositories();
    let prefer = strings(&["melpa"]);
    let provided = strings(&["emacs", "dash"]);
    let ctx = ResolveContext::new(&repos, &prefer, &provided);

    let set = resolve(ctx, &[PackageDef::standard("magit")]).unwrap();
    assert_eq!(set.get("dash").unwrap().kind, PackageKind::Provided);
    assert!(set.fetchable().all(|d| d.name != "dash" && d.name != "emacs"));

    // Only the first occurrence is recorded; transient's dash is a shadow
    let transient = set.node_of("transient").unwrap();
    let child = set.tree.children(transient)[0];
    assert_eq!(set.tree.node(child).def.kind, PackageKind::Shadow);
}

#[test]
fn test_missing_packages_fail() {
    let repos = repositories();
    let prefer = strings(&["melpa", "gnu"]);

    let result = resolve(
        ResolveContext::new(&repos, &prefer, &[]),
        &[PackageDef::standard("helm")],
    );
    assert!(matches!(result, Err(PackageError::NoSuchPackage(name)) if name == "helm"));

    let result = resolve(
        ResolveContext::new(&repos, &prefer, &[]),
        &[PackageDef::standard("s").with_repo("gnu")],
    );
    assert!(matches!(
        result,
        Err(PackageError::PackageNotFoundIn { package, repo }) if package == "s" && repo == "gnu"
    ));

    let result = resolve(
        ResolveContext::new(&repos, &prefer, &[]),
        &[PackageDef::standard("s").with_repo("marmalade")],
    );
    assert!(matches!(result, Err(PackageError::RepositoryNotFound(repo)) if repo == "marmalade"));
}

#[test]
fn test_missing_dependency_fails_whole_resolution() {
    let broken = repository(
        "local",
        r#"(1 (a . [(1) ((ghost (1))) "Needs a ghost." single]))"#,
    );
    let repos: BTreeMap<_, _> = [("local".to_string(), broken)].into_iter().collect();
    let prefer = strings(&["local"]);

    let result = resolve(
        ResolveContext::new(&repos, &prefer, &[]),
        &[PackageDef::standard("a")],
    );
    assert!(matches!(result, Err(PackageError::NoSuchPackage(name)) if name == "ghost"));
}

#[test]
fn test_manifest_to_install_set() {
    let manifest = Manifest::from_str(
        r#"
        (source melpa "https://melpa.example/packages")
        (source gnu "https://gnu.example/packages")
        (prefer gnu)
        (provided emacs)
        (package magit (repo melpa))
        "#,
        &ManifestDefaults::empty(),
    )
    .unwrap();
    assert_eq!(manifest.prefer, vec!["gnu", "melpa"]);

    let set = manifest.resolve(&repositories()).unwrap();
    let magit = set.get("magit").unwrap();
    assert_eq!(magit.repo, "melpa");
    assert_eq!(magit.url, "https://melpa.example/packages/magit-3.3.0.tar");
    assert_eq!(set.get("dash").unwrap().repo, "gnu");
    assert_eq!(set.get("transient").unwrap().version, "0.5.0");
}
