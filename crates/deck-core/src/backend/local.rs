use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use walkdir::WalkDir;

use super::scan;
use crate::cluster::{
    ClusterId, ClusterSummary, ImportCandidate, ImportKind, ModLoader, NewCluster, Provider,
};
use crate::commands::{CommandError, CommandErrorKind, LauncherCommands};
use crate::config::{Config, ImportPaths};

const MANIFEST_FILE: &str = "cluster.toml";
const GAME_DIR: &str = "minecraft";
const STAGING_PREFIX: &str = ".staging-";

/// On-disk description of a cluster: `clusters/<slug>/cluster.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterManifest {
    pub id: ClusterId,
    pub name: String,
    pub mc_version: String,
    pub mod_loader: ModLoader,
    pub loader_version: String,
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_from: Option<ImportKind>,
}

/// Directory name for a cluster called `name`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "cluster".to_string()
    } else {
        slug.to_string()
    }
}

/// A cluster built under a hidden directory, not yet visible.
#[derive(Debug)]
struct Staged {
    dir: TempDir,
    slug: String,
    id: ClusterId,
}

/// Filesystem-backed launcher commands.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    clusters_dir: PathBuf,
    import_paths: ImportPaths,
}

impl LocalBackend {
    pub fn new(clusters_dir: PathBuf, import_paths: ImportPaths) -> Self {
        Self {
            clusters_dir,
            import_paths,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.clusters_dir(), config.import.clone())
    }

    pub fn clusters_dir(&self) -> &Path {
        &self.clusters_dir
    }

    /// Explicit path, else the configured override, else the launcher default.
    pub fn resolve_base_path(
        &self,
        kind: ImportKind,
        base_path: Option<PathBuf>,
    ) -> Result<PathBuf, CommandError> {
        base_path
            .or_else(|| self.import_paths.get(kind).map(Path::to_path_buf))
            .or_else(|| scan::default_base_path(kind))
            .ok_or_else(|| {
                CommandError::not_found(format!(
                    "no data directory known for {}",
                    kind.display_name()
                ))
            })
    }

    fn check_free(&self, slug: &str) -> Result<(), CommandError> {
        if self.clusters_dir.join(slug).exists() {
            return Err(CommandError::new(
                CommandErrorKind::AlreadyExists,
                format!("cluster directory {slug} already exists"),
            ));
        }
        Ok(())
    }

    /// Builds the cluster in a hidden directory under `clusters_dir`. Dropping
    /// the result removes it.
    fn stage(
        &self,
        cluster: &NewCluster,
        imported_from: Option<ImportKind>,
    ) -> Result<Staged, CommandError> {
        fs::create_dir_all(&self.clusters_dir)?;
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.clusters_dir)?;
        fs::create_dir(dir.path().join(GAME_DIR))?;

        let manifest = ClusterManifest {
            id: ClusterId::new_v4(),
            name: cluster.name.clone(),
            mc_version: cluster.mc_version.clone(),
            mod_loader: cluster.mod_loader,
            loader_version: cluster.loader_version.clone(),
            provider: cluster.provider,
            icon: cluster.icon.clone(),
            created_at: Utc::now(),
            imported_from,
        };
        let contents = toml::to_string_pretty(&manifest)
            .map_err(|err| CommandError::invalid_data(err.to_string()))?;
        fs::write(dir.path().join(MANIFEST_FILE), contents)?;

        Ok(Staged {
            dir,
            slug: slugify(&cluster.name),
            id: manifest.id,
        })
    }

    /// Moves staged clusters into place. Either all of them land or none do.
    fn commit(&self, staged: Vec<Staged>) -> Result<Vec<ClusterId>, CommandError> {
        let mut placed: Vec<PathBuf> = Vec::with_capacity(staged.len());
        let mut ids = Vec::with_capacity(staged.len());
        for entry in staged {
            let target = self.clusters_dir.join(&entry.slug);
            let result = self.check_free(&entry.slug).and_then(|()| {
                let source = entry.dir.keep();
                fs::rename(&source, &target).map_err(|err| {
                    let _ = fs::remove_dir_all(&source);
                    CommandError::from(err)
                })
            });
            if let Err(err) = result {
                for path in &placed {
                    if let Err(cleanup) = fs::remove_dir_all(path) {
                        tracing::warn!(path = %path.display(), error = %cleanup, "rollback failed");
                    }
                }
                return Err(err);
            }
            tracing::info!(id = %entry.id, slug = %entry.slug, "cluster created");
            placed.push(target);
            ids.push(entry.id);
        }
        Ok(ids)
    }

    fn create(&self, cluster: &NewCluster) -> Result<ClusterId, CommandError> {
        self.check_free(&slugify(&cluster.name))?;
        let staged = self.stage(cluster, None)?;
        let ids = self.commit(vec![staged])?;
        ids.into_iter()
            .next()
            .ok_or_else(|| CommandError::invalid_data("no cluster was created"))
    }

    fn import(
        &self,
        kind: ImportKind,
        base_path: Option<PathBuf>,
        selection: &[ImportCandidate],
    ) -> Result<(), CommandError> {
        let base = self.resolve_base_path(kind, base_path)?;
        if !base.is_dir() {
            return Err(CommandError::not_found(format!(
                "{} data directory {} does not exist",
                kind.display_name(),
                base.display()
            )));
        }

        let mut slugs = HashSet::with_capacity(selection.len());
        let mut clusters = Vec::with_capacity(selection.len());
        for candidate in selection {
            let cluster = NewCluster {
                name: candidate.name.clone(),
                mc_version: candidate.mc_version.clone().ok_or_else(|| {
                    CommandError::invalid_data(format!(
                        "instance {} has no Minecraft version",
                        candidate.name
                    ))
                })?,
                mod_loader: candidate.mod_loader.unwrap_or_default(),
                loader_version: NewCluster::LATEST_LOADER.to_string(),
                provider: Provider::Import,
                icon: None,
            };
            let slug = slugify(&cluster.name);
            if !slugs.insert(slug.clone()) {
                return Err(CommandError::new(
                    CommandErrorKind::AlreadyExists,
                    format!("more than one selected instance maps to cluster directory {slug}"),
                ));
            }
            self.check_free(&slug)?;
            clusters.push((candidate, cluster));
        }

        let mut staged = Vec::with_capacity(clusters.len());
        for (candidate, cluster) in &clusters {
            let entry = self.stage(cluster, Some(kind))?;
            tracing::info!(name = %candidate.name, %kind, "importing instance");
            let source = scan::game_dir(kind, &candidate.path);
            if source.is_dir() {
                copy_dir(&source, &entry.dir.path().join(GAME_DIR))?;
            }
            staged.push(entry);
        }
        self.commit(staged)?;
        Ok(())
    }

    fn read_clusters(&self) -> Result<Vec<ClusterSummary>, CommandError> {
        if !self.clusters_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut clusters = Vec::new();
        for entry in fs::read_dir(&self.clusters_dir)? {
            let entry = entry?;
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let path = entry.path();
            let manifest_path = path.join(MANIFEST_FILE);
            if !manifest_path.is_file() {
                continue;
            }
            let contents = fs::read_to_string(&manifest_path)?;
            match toml::from_str::<ClusterManifest>(&contents) {
                Ok(manifest) => clusters.push(ClusterSummary {
                    id: manifest.id,
                    name: manifest.name,
                    mc_version: manifest.mc_version,
                    mod_loader: manifest.mod_loader,
                    imported_from: manifest.imported_from,
                    path,
                }),
                Err(err) => {
                    tracing::warn!(path = %manifest_path.display(), error = %err, "skipping invalid cluster manifest");
                }
            }
        }

        clusters.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(clusters)
    }
}

/// Recursively copies `src` into `dst`. Symlinks are not followed.
fn copy_dir(src: &Path, dst: &Path) -> Result<(), CommandError> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|err| CommandError::invalid_data(err.to_string()))?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Runs blocking filesystem work off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T, CommandError>
where
    F: FnOnce() -> Result<T, CommandError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|err| {
        CommandError::new(CommandErrorKind::Io, format!("backend task failed: {err}"))
    })?
}

impl LauncherCommands for LocalBackend {
    async fn create_cluster(&self, cluster: NewCluster) -> Result<ClusterId, CommandError> {
        let backend = self.clone();
        blocking(move || backend.create(&cluster)).await
    }

    async fn list_import_candidates(
        &self,
        kind: ImportKind,
        base_path: Option<PathBuf>,
    ) -> Result<Vec<ImportCandidate>, CommandError> {
        let base = self.resolve_base_path(kind, base_path)?;
        blocking(move || scan::scan(kind, &base)).await
    }

    async fn import_instances(
        &self,
        kind: ImportKind,
        base_path: Option<PathBuf>,
        selection: Vec<ImportCandidate>,
    ) -> Result<(), CommandError> {
        let backend = self.clone();
        blocking(move || backend.import(kind, base_path, &selection)).await
    }

    async fn list_clusters(&self) -> Result<Vec<ClusterSummary>, CommandError> {
        let backend = self.clone();
        blocking(move || backend.read_clusters()).await
    }
}

#[cfg(test)]
mod tests {
    use tempfile::{TempDir, tempdir};

    use super::*;

    fn backend() -> (TempDir, LocalBackend) {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::new(dir.path().join("clusters"), ImportPaths::default());
        (dir, backend)
    }

    fn new_cluster(name: &str) -> NewCluster {
        NewCluster {
            name: name.to_string(),
            mc_version: "1.20.1".to_string(),
            mod_loader: ModLoader::Fabric,
            loader_version: NewCluster::LATEST_LOADER.to_string(),
            provider: Provider::New,
            icon: None,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Pack!"), "my-pack");
        assert_eq!(slugify("  a  b  "), "a-b");
        assert_eq!(slugify("???"), "cluster");
    }

    #[tokio::test]
    async fn test_create_writes_manifest() {
        let (_dir, backend) = backend();
        let id = backend.create_cluster(new_cluster("Test")).await.unwrap();

        let contents =
            fs::read_to_string(backend.clusters_dir().join("test").join(MANIFEST_FILE)).unwrap();
        let manifest: ClusterManifest = toml::from_str(&contents).unwrap();
        assert_eq!(manifest.id, id);
        assert_eq!(manifest.name, "Test");
        assert_eq!(manifest.mod_loader, ModLoader::Fabric);
        assert_eq!(manifest.imported_from, None);
        assert_eq!(manifest.icon, None);
        assert!(backend.clusters_dir().join("test").join(GAME_DIR).is_dir());
    }

    #[tokio::test]
    async fn test_create_existing_slug_fails() {
        let (_dir, backend) = backend();
        backend.create_cluster(new_cluster("Test")).await.unwrap();
        let err = backend
            .create_cluster(new_cluster("test"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, CommandErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_list_clusters_sorted_by_name() {
        let (_dir, backend) = backend();
        assert!(backend.list_clusters().await.unwrap().is_empty());

        for name in ["beta", "Alpha", "gamma"] {
            backend.create_cluster(new_cluster(name)).await.unwrap();
        }
        let names: Vec<_> = backend
            .list_clusters()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
    }

    #[tokio::test]
    async fn test_import_copies_game_dir() {
        let (dir, backend) = backend();
        let base = dir.path().join("prism");
        let inst = base.join("instances").join("pack");
        fs::create_dir_all(inst.join(".minecraft").join("saves").join("world")).unwrap();
        fs::write(inst.join("instance.cfg"), "name=Old Pack\n").unwrap();
        fs::write(inst.join(".minecraft").join("options.txt"), "fov:90\n").unwrap();
        fs::write(
            inst.join("mmc-pack.json"),
            r#"{"components":[{"uid":"net.minecraft","version":"1.20.1"}]}"#,
        )
        .unwrap();

        let candidates = backend
            .list_import_candidates(ImportKind::Prism, Some(base.clone()))
            .await
            .unwrap();
        assert_eq!(candidates.len(), 1);

        backend
            .import_instances(ImportKind::Prism, Some(base), candidates)
            .await
            .unwrap();

        let clusters = backend.list_clusters().await.unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].name, "Old Pack");
        assert_eq!(clusters[0].imported_from, Some(ImportKind::Prism));
        let game = clusters[0].path.join(GAME_DIR);
        assert_eq!(
            fs::read_to_string(game.join("options.txt")).unwrap(),
            "fov:90\n"
        );
        assert!(game.join("saves").join("world").is_dir());
    }

    #[tokio::test]
    async fn test_import_without_version_is_invalid() {
        let (dir, backend) = backend();
        let candidate = ImportCandidate {
            name: "Mystery".to_string(),
            path: dir.path().join("nowhere"),
            mc_version: None,
            mod_loader: None,
        };
        let err = backend
            .import_instances(ImportKind::Prism, Some(dir.path().to_path_buf()), vec![candidate])
            .await
            .unwrap_err();
        assert_eq!(err.kind, CommandErrorKind::InvalidData);
        assert!(backend.list_clusters().await.unwrap().is_empty());
    }

    fn candidate(dir: &Path, name: &str) -> ImportCandidate {
        ImportCandidate {
            name: name.to_string(),
            path: dir.join(slugify(name)),
            mc_version: Some("1.20.1".to_string()),
            mod_loader: Some(ModLoader::Fabric),
        }
    }

    fn entries(dir: &Path) -> usize {
        fs::read_dir(dir).map_or(0, Iterator::count)
    }

    #[tokio::test]
    async fn test_import_duplicate_names_writes_nothing() {
        let (dir, backend) = backend();
        let selection = vec![
            candidate(dir.path(), "Other Pack"),
            candidate(dir.path(), "Same Pack"),
            candidate(dir.path(), "same pack"),
        ];
        let err = backend
            .import_instances(ImportKind::Prism, Some(dir.path().to_path_buf()), selection)
            .await
            .unwrap_err();
        assert_eq!(err.kind, CommandErrorKind::AlreadyExists);
        assert!(backend.list_clusters().await.unwrap().is_empty());
        assert_eq!(entries(backend.clusters_dir()), 0);
    }

    #[tokio::test]
    async fn test_import_can_be_retried_after_failure() {
        let (dir, backend) = backend();
        backend.create_cluster(new_cluster("Taken")).await.unwrap();

        let err = backend
            .import_instances(
                ImportKind::Prism,
                Some(dir.path().to_path_buf()),
                vec![candidate(dir.path(), "Fresh"), candidate(dir.path(), "Taken")],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, CommandErrorKind::AlreadyExists);
        assert_eq!(backend.list_clusters().await.unwrap().len(), 1);

        backend
            .import_instances(
                ImportKind::Prism,
                Some(dir.path().to_path_buf()),
                vec![candidate(dir.path(), "Fresh")],
            )
            .await
            .unwrap();
        let names: Vec<_> = backend
            .list_clusters()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Fresh", "Taken"]);
        assert_eq!(entries(backend.clusters_dir()), 2);
    }

    #[tokio::test]
    async fn test_list_clusters_skips_staging_dirs() {
        let (_dir, backend) = backend();
        backend.create_cluster(new_cluster("Real")).await.unwrap();
        let staged = backend.stage(&new_cluster("Half Done"), None).unwrap();
        assert!(staged.dir.path().join(MANIFEST_FILE).is_file());

        let clusters = backend.list_clusters().await.unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].name, "Real");

        drop(staged);
        assert_eq!(entries(backend.clusters_dir()), 1);
    }

    #[tokio::test]
    async fn test_create_persists_icon() {
        let (_dir, backend) = backend();
        let cluster = NewCluster {
            icon: Some("icons/creeper.png".to_string()),
            ..new_cluster("Icon")
        };
        backend.create_cluster(cluster).await.unwrap();

        let contents =
            fs::read_to_string(backend.clusters_dir().join("icon").join(MANIFEST_FILE)).unwrap();
        let manifest: ClusterManifest = toml::from_str(&contents).unwrap();
        assert_eq!(manifest.icon.as_deref(), Some("icons/creeper.png"));
    }

    #[test]
    fn test_base_path_precedence() {
        let import_paths = ImportPaths {
            modrinth: Some(PathBuf::from("/configured")),
            ..ImportPaths::default()
        };
        let backend = LocalBackend::new(PathBuf::from("/clusters"), import_paths);

        assert_eq!(
            backend
                .resolve_base_path(ImportKind::Modrinth, Some(PathBuf::from("/explicit")))
                .unwrap(),
            PathBuf::from("/explicit")
        );
        assert_eq!(
            backend
                .resolve_base_path(ImportKind::Modrinth, None)
                .unwrap(),
            PathBuf::from("/configured")
        );
    }
}
