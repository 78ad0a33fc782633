//! Catalog resolution for mason.
//! Turns a root catalog document plus its namespaced includes, local or
//! remote, into one flat sequence of namespace-qualified generators.

use crate::config::{load_catalog, parse_catalog, GeneratorSpec};
use crate::constants::{GENERATOR_DIR, HOOKS_FILE, TEMPLATE_SUBDIR};
use crate::error::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};
use url::Url;

/// Represents the source location of an include reference.
#[derive(Debug)]
pub enum IncludeSource {
    /// Local filesystem path, resolved against the including document
    Local(PathBuf),
    /// Git repository URL (HTTPS, git or SSH)
    Git(String),
}

impl std::fmt::Display for IncludeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncludeSource::Local(path) => write!(f, "local path: '{}'", path.display()),
            IncludeSource::Git(repo) => write!(f, "git repository: '{}'", repo),
        }
    }
}

impl IncludeSource {
    /// Classifies an include reference string.
    ///
    /// `gh:owner/repo` is shorthand for the matching GitHub HTTPS URL;
    /// anything that does not parse as a git URL is a local path.
    pub fn from_string(s: &str) -> Self {
        if let Some(rest) = s.strip_prefix("gh:") {
            return Self::Git(format!("https://github.com/{}", rest));
        }

        if let Ok(url) = Url::parse(s) {
            if url.scheme() == "https" || url.scheme() == "git" {
                return Self::Git(s.to_string());
            }
        }

        // SSH git URL format
        if s.starts_with("git@") {
            return Self::Git(s.to_string());
        }

        Self::Local(PathBuf::from(s))
    }
}

/// Trait for turning include references into local directories.
///
/// The rest of the pipeline only sees this interface; fetching and caching
/// of remote packages live behind it.
pub trait IncludeResolver {
    /// Resolves a reference to a concrete local directory, trying each
    /// search path for local references.
    fn resolve(&self, reference: &str, search_paths: &[PathBuf]) -> Result<PathBuf>;
}

/// Resolver for local paths and git-hosted catalog packages.
///
/// Remote repositories are cloned once into `cache_dir` and reused on
/// later runs.
pub struct PackageResolver {
    cache_dir: PathBuf,
}

impl PackageResolver {
    pub fn new<P: Into<PathBuf>>(cache_dir: P) -> Self {
        Self { cache_dir: cache_dir.into() }
    }

    fn clone_repository(&self, repo_url: &str) -> Result<PathBuf> {
        let repo_name =
            repo_url.split('/').next_back().unwrap_or("package").trim_end_matches(".git");
        let clone_path = self.cache_dir.join(repo_name);

        if clone_path.exists() {
            debug!("Using cached clone '{}'.", clone_path.display());
            return Ok(clone_path);
        }

        std::fs::create_dir_all(&self.cache_dir).map_err(Error::IoError)?;

        debug!("Cloning '{}' to '{}'.", repo_url, clone_path.display());

        // Set up authentication callbacks
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, _allowed_types| {
            git2::Cred::ssh_key(
                username_from_url.unwrap_or("git"),
                None,
                Path::new(&format!(
                    "{}/.ssh/id_rsa",
                    std::env::var("HOME").unwrap_or_default()
                )),
                None,
            )
        });

        let mut fetch_opts = git2::FetchOptions::new();
        fetch_opts.remote_callbacks(callbacks);

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fetch_opts);

        match builder.clone(repo_url, &clone_path) {
            Ok(_) => Ok(clone_path),
            Err(e) => Err(Error::ResolveError {
                reference: repo_url.to_string(),
                reason: e.message().to_string(),
            }),
        }
    }
}

impl IncludeResolver for PackageResolver {
    fn resolve(&self, reference: &str, search_paths: &[PathBuf]) -> Result<PathBuf> {
        match IncludeSource::from_string(reference) {
            IncludeSource::Git(repo) => self.clone_repository(&repo),
            IncludeSource::Local(path) => {
                if path.is_absolute() && path.exists() {
                    return Ok(path);
                }
                for base in search_paths {
                    let candidate = base.join(&path);
                    if candidate.exists() {
                        return Ok(candidate);
                    }
                }
                Err(Error::ResolveError {
                    reference: reference.to_string(),
                    reason: "no such directory in search paths".to_string(),
                })
            }
        }
    }
}

/// Default cache directory for remote catalog packages.
pub fn default_cache_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".cache").join("mason"),
        None => std::env::temp_dir().join("mason"),
    }
}

/// A generator bound to the directory of the catalog document that
/// declared it.
#[derive(Debug, Clone)]
pub struct ResolvedGenerator {
    /// Fully namespace-qualified name exposed to the CLI and `use` lookups
    pub cmd: String,
    /// The originating spec, `use` entries qualified and `args` inherited
    pub cfg: GeneratorSpec,
    /// Directory whose `.g/<name>` holds this generator's assets
    pub root_dir: PathBuf,
}

impl ResolvedGenerator {
    /// The generator's template tree root.
    pub fn template_dir(&self) -> PathBuf {
        self.root_dir.join(GENERATOR_DIR).join(&self.cfg.name).join(TEMPLATE_SUBDIR)
    }

    /// The generator's hook program.
    pub fn hooks_file(&self) -> PathBuf {
        self.root_dir.join(GENERATOR_DIR).join(&self.cfg.name).join(HOOKS_FILE)
    }
}

/// Returns the resolved generator with the given qualified name.
pub fn find<'a>(generators: &'a [ResolvedGenerator], cmd: &str) -> Result<&'a ResolvedGenerator> {
    generators
        .iter()
        .find(|g| g.cmd == cmd)
        .ok_or_else(|| Error::GeneratorNotFound { name: cmd.to_string() })
}

fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        namespace.to_string()
    } else {
        format!("{}:{}", namespace, name)
    }
}

/// Resolves the catalog rooted at `root_dir` into a flat generator sequence.
///
/// The root document carries no namespace prefix; included documents are
/// prefixed with their label, chained across nested includes.
///
/// # Errors
/// Any unreadable or unparseable document, unresolvable include reference,
/// duplicate qualified name or unresolved `use` lookup aborts the whole
/// resolve; no partial catalog is returned.
pub fn resolve_catalog(
    resolver: &dyn IncludeResolver,
    root_dir: &Path,
) -> Result<Vec<ResolvedGenerator>> {
    resolve_document(resolver, "", root_dir, Vec::new())
}

/// Resolves one catalog document into the accumulated generator sequence.
///
/// The accumulator is taken and returned by value: generators from this
/// document are appended before recursing into its includes, so a `use`
/// lookup only ever sees generators resolved before the referring one.
fn resolve_document(
    resolver: &dyn IncludeResolver,
    namespace: &str,
    dir: &Path,
    mut resolved: Vec<ResolvedGenerator>,
) -> Result<Vec<ResolvedGenerator>> {
    let content = load_catalog(dir)?;
    let catalog = parse_catalog(&content)?;

    debug!("Resolving catalog in '{}' (namespace '{}')", dir.display(), namespace);

    for mut cfg in catalog.generators {
        let cmd = qualify(namespace, &cfg.name);

        if resolved.iter().any(|g| g.cmd == cmd) {
            return Err(Error::DuplicateGenerator { name: cmd });
        }

        if !cfg.use_.is_empty() {
            cfg.use_ = cfg.use_.iter().map(|u| qualify(namespace, u)).collect();
            // A delegating generator assumes its first delegate's signature.
            let delegate = find(&resolved, &cfg.use_[0])?;
            cfg.args = delegate.cfg.args.clone();
        }

        resolved.push(ResolvedGenerator { cmd, cfg, root_dir: dir.to_path_buf() });
    }

    // Include labels are unordered in the document; sort them so resolution
    // and listing order are deterministic.
    let mut includes: Vec<(&String, &String)> = catalog.include.iter().collect();
    includes.sort_by(|a, b| a.0.cmp(b.0));

    for (label, reference) in includes {
        let child_dir = resolver.resolve(reference, &[dir.to_path_buf()])?;
        let child_namespace = qualify(namespace, label);
        resolved = resolve_document(resolver, &child_namespace, &child_dir, resolved)?;
    }

    Ok(resolved)
}
