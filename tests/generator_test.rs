use std::fs;
use std::path::Path;

use mason::config::ConfigMap;
use mason::error::{Error, Result};
use mason::fileops::{ExecutionMode, FileOps};
use mason::generator::Runner;
use mason::renderer::MiniJinjaRenderer;
use mason::resolver::{find, resolve_catalog, PackageResolver};
use mason::script::HookScriptEngine;
use tempfile::TempDir;

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Resolves the catalog at `root` and runs one generator against `out`.
fn run_generator(
    root: &Path,
    out: &Path,
    name: &str,
    pairs: &[(&str, &str)],
    mode: ExecutionMode,
) -> Result<ConfigMap> {
    let cache = TempDir::new().unwrap();
    let generators = resolve_catalog(&PackageResolver::new(cache.path()), root)?;
    let target = find(&generators, name)?;

    let mut config: ConfigMap =
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();

    let renderer = MiniJinjaRenderer::new();
    let scripts = HookScriptEngine::new();
    let files = FileOps::new(mode);
    let runner = Runner::new(&generators, &renderer, &scripts, &files, out);

    runner.run(target, &mut config)?;
    Ok(config)
}

#[test_log::test]
fn test_leaf_generator_renders_template_tree() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_file(
        &root.path().join("g.yaml"),
        "generators:\n  - name: item\n    args: [type, name]\n",
    );
    write_file(
        &root.path().join(".g/item/tpl/[type]/[name].txt.tpl"),
        "Hello {{ name }}!",
    );
    write_file(&root.path().join(".g/item/tpl/README.md"), "static notes\n");

    run_generator(
        root.path(),
        out.path(),
        "item",
        &[("type", "component"), ("name", "test")],
        ExecutionMode::Apply,
    )
    .unwrap();

    let expected = TempDir::new().unwrap();
    write_file(&expected.path().join("component/test.txt"), "Hello test!");
    write_file(&expected.path().join("README.md"), "static notes\n");
    assert!(!dir_diff::is_different(out.path(), expected.path()).unwrap());
}

#[test]
fn test_missing_argument_fails_before_any_write() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_file(
        &root.path().join("g.yaml"),
        "generators:\n  - name: item\n    args: [type, name]\n",
    );
    write_file(&root.path().join(".g/item/tpl/[name].txt.tpl"), "{{ name }}");

    let err = run_generator(
        root.path(),
        out.path(),
        "item",
        &[("type", "component")],
        ExecutionMode::Apply,
    )
    .unwrap_err();

    if let Error::MissingArgument { name } = err {
        assert_eq!(name, "name");
    } else {
        panic!("expected Error::MissingArgument");
    }
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_empty_argument_value_counts_as_missing() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_file(
        &root.path().join("g.yaml"),
        "generators:\n  - name: item\n    args: [name]\n",
    );
    write_file(&root.path().join(".g/item/tpl/a.txt"), "a");

    let err = run_generator(
        root.path(),
        out.path(),
        "item",
        &[("name", "")],
        ExecutionMode::Apply,
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingArgument { .. }));
}

#[test]
fn test_unknown_generator_name() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_file(&root.path().join("g.yaml"), "generators: []\n");

    let err =
        run_generator(root.path(), out.path(), "nope", &[], ExecutionMode::Apply).unwrap_err();
    assert!(matches!(err, Error::GeneratorNotFound { .. }));
}

#[test]
fn test_delegating_generator_renders_no_tree_of_its_own() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_file(
        &root.path().join("g.yaml"),
        r#"
generators:
  - name: item
    args: [name]
  - name: all
    use: [item]
"#,
    );
    write_file(&root.path().join(".g/item/tpl/[name].txt.tpl"), "item {{ name }}");
    write_file(&root.path().join(".g/all/tpl/own.txt"), "never rendered");

    run_generator(root.path(), out.path(), "all", &[("name", "test")], ExecutionMode::Apply)
        .unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("test.txt")).unwrap(),
        "item test"
    );
    assert!(!out.path().join("own.txt").exists());
}

#[test]
fn test_delegating_generator_runs_own_post_commands() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_file(
        &root.path().join("g.yaml"),
        r#"
generators:
  - name: item
    args: [name]
  - name: all
    use: [item]
    post:
      - "touch done-{{ name }}"
"#,
    );
    write_file(&root.path().join(".g/item/tpl/[name].txt.tpl"), "item {{ name }}");

    run_generator(root.path(), out.path(), "all", &[("name", "test")], ExecutionMode::Apply)
        .unwrap();

    assert!(out.path().join("test.txt").exists());
    assert!(out.path().join("done-test").exists());
}

#[test]
fn test_failing_post_command_aborts_the_rest() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_file(
        &root.path().join("g.yaml"),
        r#"
generators:
  - name: item
    args: [name]
    post:
      - "exit 4"
      - "touch after"
"#,
    );
    write_file(&root.path().join(".g/item/tpl/a.txt"), "a");

    let err = run_generator(
        root.path(),
        out.path(),
        "item",
        &[("name", "test")],
        ExecutionMode::Apply,
    )
    .unwrap_err();

    assert!(matches!(err, Error::CommandError { .. }));
    assert!(!out.path().join("after").exists());
}

#[test]
fn test_cyclic_use_chain_is_rejected() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_file(
        &root.path().join("g.yaml"),
        r#"
generators:
  - name: item
    args: [name]
  - name: all
    use: [item, all]
"#,
    );
    write_file(&root.path().join(".g/item/tpl/a.txt"), "a");

    let err = run_generator(
        root.path(),
        out.path(),
        "all",
        &[("name", "test")],
        ExecutionMode::Apply,
    )
    .unwrap_err();

    if let Error::CyclicUse { chain } = err {
        assert!(chain.contains("all -> all"));
    } else {
        panic!("expected Error::CyclicUse");
    }
}

#[test_log::test]
fn test_dry_run_writes_nothing() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_file(
        &root.path().join("g.yaml"),
        r#"
generators:
  - name: item
    args: [name]
    post:
      - "touch marker"
"#,
    );
    write_file(&root.path().join(".g/item/tpl/[name].txt.tpl"), "{{ name }}");

    run_generator(
        root.path(),
        out.path(),
        "item",
        &[("name", "test")],
        ExecutionMode::DryRun,
    )
    .unwrap();

    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[cfg(unix)]
mod hooks {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn write_hook(path: &Path, content: &str) {
        write_file(path, content);
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_config_hook_output_drives_rendering() {
        let root = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_file(
            &root.path().join("g.yaml"),
            "generators:\n  - name: route\n    args: [name]\n",
        );
        write_hook(
            &root.path().join(".g/route/hooks"),
            r#"#!/bin/sh
cat > /dev/null
echo '{"funcName": "PostsEdit"}'
"#,
        );
        write_file(
            &root.path().join(".g/route/tpl/[funcName].go.tpl"),
            "func {{ funcName }}() {}",
        );

        let config = run_generator(
            root.path(),
            out.path(),
            "route",
            &[("name", "posts_edit")],
            ExecutionMode::Apply,
        )
        .unwrap();

        assert_eq!(config.get("funcName").map(String::as_str), Some("PostsEdit"));
        assert_eq!(
            fs::read_to_string(out.path().join("PostsEdit.go")).unwrap(),
            "func PostsEdit() {}"
        );
    }

    #[test]
    fn test_missing_transform_target_is_skipped() {
        let root = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_file(
            &root.path().join("g.yaml"),
            r#"
generators:
  - name: route
    args: [name]
    transforms:
      - mark: "never-rendered.txt"
      - mark: "route.txt"
"#,
        );
        write_hook(
            &root.path().join(".g/route/hooks"),
            r#"#!/bin/sh
case "$1" in
  config) cat > /dev/null; echo '{}' ;;
  transform) cat > /dev/null; printf 'transformed' ;;
esac
"#,
        );
        write_file(&root.path().join(".g/route/tpl/route.txt"), "original");

        run_generator(
            root.path(),
            out.path(),
            "route",
            &[("name", "test")],
            ExecutionMode::Apply,
        )
        .unwrap();

        // The missing target was skipped; the present one was rewritten.
        assert!(!out.path().join("never-rendered.txt").exists());
        assert_eq!(
            fs::read_to_string(out.path().join("route.txt")).unwrap(),
            "transformed"
        );
    }

    #[test]
    fn test_delegates_share_one_configuration_map() {
        let root = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_file(
            &root.path().join("g.yaml"),
            r#"
generators:
  - name: first
    args: [name]
  - name: second
    args: [name]
  - name: all
    use: [first, second]
"#,
        );
        write_hook(
            &root.path().join(".g/first/hooks"),
            r#"#!/bin/sh
cat > /dev/null
echo '{"extra": "from-first"}'
"#,
        );
        write_file(&root.path().join(".g/first/tpl/first.txt"), "first");
        // The second delegate sees keys written by the first one.
        write_file(
            &root.path().join(".g/second/tpl/[extra].txt.tpl"),
            "{{ extra }}",
        );

        let config = run_generator(
            root.path(),
            out.path(),
            "all",
            &[("name", "test")],
            ExecutionMode::Apply,
        )
        .unwrap();

        assert_eq!(config.get("extra").map(String::as_str), Some("from-first"));
        assert_eq!(
            fs::read_to_string(out.path().join("from-first.txt")).unwrap(),
            "from-first"
        );
    }
}
