use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

const FACADE: &str = "hookwire";
const MEMBER_PREFIX: &str = "hw_";
const DEPENDENCY_TABLES: [&str; 2] = ["dependencies", "dev-dependencies"];

/// The Cargo.toml of the crate a derive macro expands in.
///
/// Generated code names `hw_model` items, and the expanding crate may
/// depend on `hw_model` directly or only on the `hookwire` facade, which
/// re-exports it as `hookwire::model`.
///
/// ```rust
/// # use hw_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.get_crate_path("hw_model"));
/// ```
///
/// A crate deriving its own types should add `extern crate self as hw_model;`
/// so the fallback path `::hw_model` resolves inside it.
#[derive(Debug)]
pub struct Manifest {
    document: Document<Box<str>>,
    modified: SystemTime,
}

impl Manifest {
    /// The path of the `hookwire` member crate `name`.
    ///
    /// `[dependencies]` is searched before `[dev-dependencies]`; in each, a
    /// direct dependency beats the facade. Without either the result is
    /// `::name`.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        DEPENDENCY_TABLES
            .iter()
            .filter_map(|table| match self.document.get(table) {
                Some(Item::Table(deps)) => resolve(deps, name),
                _ => None,
            })
            .next()
            .unwrap_or_else(|| absolute(name))
    }

    /// Runs `func` on the manifest of the crate being compiled.
    ///
    /// Parsed manifests are cached per path until the file changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static CACHE: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = manifest_path();
        let modified = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .unwrap_or_else(|err| panic!("no modification time for {}: {err}", path.display()));

        {
            let cache = CACHE.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = cache.get(&path).filter(|m| m.modified == modified) {
                return func(manifest);
            }
        }

        let text = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("cannot read {}: {err}", path.display()));
        let manifest = Manifest {
            document: Document::parse(text.into_boxed_str())
                .unwrap_or_else(|err| panic!("cannot parse {}: {err}", path.display())),
            modified,
        };
        let result = func(&manifest);
        CACHE
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);
        result
    }
}

#[inline(never)]
fn manifest_path() -> PathBuf {
    let Some(dir) = std::env::var_os("CARGO_MANIFEST_DIR") else {
        panic!("CARGO_MANIFEST_DIR is not set; derives must run under cargo");
    };
    let path = PathBuf::from(dir).join("Cargo.toml");
    assert!(path.exists(), "no Cargo.toml at {}", path.display());
    path
}

fn resolve(deps: &Table, name: &str) -> Option<syn::Path> {
    if deps.contains_key(name) {
        return Some(absolute(name));
    }
    let module = name.strip_prefix(MEMBER_PREFIX)?;
    deps.contains_key(FACADE)
        .then(|| absolute(&format!("{FACADE}::{module}")))
}

fn absolute(path: &str) -> syn::Path {
    syn::parse_str(&format!("::{path}"))
        .unwrap_or_else(|err| panic!("`::{path}` is not a path: {err}"))
}

// -----------------------------------------------------------------------------
// Tests
