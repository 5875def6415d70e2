//! Discovery of other launchers' instances on disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::cluster::{ImportCandidate, ImportKind, ModLoader};
use crate::commands::CommandError;

/// Where each launcher keeps its data when not configured otherwise.
pub(super) fn default_base_path(kind: ImportKind) -> Option<PathBuf> {
    match kind {
        ImportKind::Prism => dirs::data_dir().map(|d| d.join("PrismLauncher")),
        ImportKind::MultiMc => dirs::data_dir().map(|d| d.join("multimc")),
        ImportKind::Curseforge => dirs::home_dir().map(|d| d.join("curseforge").join("minecraft")),
        ImportKind::Modrinth => dirs::data_dir().map(|d| d.join("ModrinthApp")),
        ImportKind::AtLauncher => dirs::data_dir().map(|d| d.join("ATLauncher")),
    }
}

fn instances_subdir(kind: ImportKind) -> &'static str {
    match kind {
        ImportKind::Prism | ImportKind::MultiMc | ImportKind::AtLauncher => "instances",
        ImportKind::Curseforge => "Instances",
        ImportKind::Modrinth => "profiles",
    }
}

fn marker_file(kind: ImportKind) -> &'static str {
    match kind {
        ImportKind::Prism | ImportKind::MultiMc => "instance.cfg",
        ImportKind::Curseforge => "minecraftinstance.json",
        ImportKind::Modrinth => "profile.json",
        ImportKind::AtLauncher => "instance.json",
    }
}

/// Directory holding the game files (saves, mods, config) of an instance.
pub(super) fn game_dir(kind: ImportKind, instance: &Path) -> PathBuf {
    match kind {
        ImportKind::Prism | ImportKind::MultiMc => {
            let dotted = instance.join(".minecraft");
            if dotted.is_dir() {
                dotted
            } else {
                instance.join("minecraft")
            }
        }
        ImportKind::Curseforge | ImportKind::Modrinth | ImportKind::AtLauncher => {
            instance.to_path_buf()
        }
    }
}

/// Lists importable instances below `base`, sorted by name.
///
/// Directories without the launcher's marker file are skipped, as are
/// instances whose metadata cannot be parsed.
pub(super) fn scan(kind: ImportKind, base: &Path) -> Result<Vec<ImportCandidate>, CommandError> {
    let instances = base.join(instances_subdir(kind));
    if !instances.is_dir() {
        return Err(CommandError::not_found(format!(
            "no {} instances at {}",
            kind.display_name(),
            instances.display()
        )));
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(&instances)? {
        let path = entry?.path();
        let marker = path.join(marker_file(kind));
        if !marker.is_file() {
            continue;
        }
        match read_candidate(kind, &path, &marker) {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable instance");
            }
        }
    }

    candidates.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    tracing::debug!(%kind, count = candidates.len(), "scanned import candidates");
    Ok(candidates)
}

fn read_candidate(
    kind: ImportKind,
    path: &Path,
    marker: &Path,
) -> Result<ImportCandidate, CommandError> {
    let contents = fs::read_to_string(marker)?;
    let fallback_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (name, mc_version, mod_loader) = match kind {
        ImportKind::Prism | ImportKind::MultiMc => {
            let name = cfg_value(&contents, "name");
            let (version, loader) = read_mmc_pack(&path.join("mmc-pack.json"));
            (name, version, loader)
        }
        ImportKind::Curseforge => {
            let json = parse_json(&contents)?;
            (
                str_at(&json, &["name"]),
                str_at(&json, &["gameVersion"]),
                str_at(&json, &["baseModLoader", "name"]).and_then(|s| parse_loader(&s)),
            )
        }
        ImportKind::Modrinth => {
            let json = parse_json(&contents)?;
            (
                str_at(&json, &["metadata", "name"]),
                str_at(&json, &["metadata", "game_version"]),
                str_at(&json, &["metadata", "loader"]).and_then(|s| parse_loader(&s)),
            )
        }
        ImportKind::AtLauncher => {
            let json = parse_json(&contents)?;
            (
                str_at(&json, &["launcher", "name"]),
                str_at(&json, &["id"]),
                str_at(&json, &["launcher", "loaderVersion", "type"])
                    .and_then(|s| parse_loader(&s))
                    .or(Some(ModLoader::Vanilla)),
            )
        }
    };

    Ok(ImportCandidate {
        name: name.filter(|n| !n.trim().is_empty()).unwrap_or(fallback_name),
        path: path.to_path_buf(),
        mc_version,
        mod_loader,
    })
}

/// Reads `key=value` from an INI-style `instance.cfg`.
fn cfg_value(contents: &str, key: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        (k.trim() == key).then(|| v.trim().to_string())
    })
}

/// Game version and loader from a Prism/MultiMC component list.
fn read_mmc_pack(path: &Path) -> (Option<String>, Option<ModLoader>) {
    let Some(json) = fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str::<Value>(&s).ok())
    else {
        return (None, None);
    };
    let Some(components) = json.get("components").and_then(Value::as_array) else {
        return (None, None);
    };

    let mut version = None;
    let mut loader = Some(ModLoader::Vanilla);
    for component in components {
        let uid = component.get("uid").and_then(Value::as_str).unwrap_or_default();
        match uid {
            "net.minecraft" => {
                version = component
                    .get("version")
                    .and_then(Value::as_str)
                    .map(str::to_string);
            }
            "net.fabricmc.fabric-loader" => loader = Some(ModLoader::Fabric),
            "net.minecraftforge" => loader = Some(ModLoader::Forge),
            "net.neoforged" => loader = Some(ModLoader::NeoForge),
            "org.quiltmc.quilt-loader" => loader = Some(ModLoader::Quilt),
            _ => {}
        }
    }
    (version, loader)
}

fn parse_json(contents: &str) -> Result<Value, CommandError> {
    serde_json::from_str(contents).map_err(|err| CommandError::invalid_data(err.to_string()))
}

fn str_at(json: &Value, path: &[&str]) -> Option<String> {
    path.iter()
        .try_fold(json, |value, key| value.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Loader from free-form launcher metadata like `forge-47.2.0` or `Fabric`.
fn parse_loader(raw: &str) -> Option<ModLoader> {
    if let Ok(loader) = raw.parse() {
        return Some(loader);
    }
    let lower = raw.to_ascii_lowercase();
    // "neoforge" contains "forge"; check it first.
    [
        ("neoforge", ModLoader::NeoForge),
        ("forge", ModLoader::Forge),
        ("fabric", ModLoader::Fabric),
        ("quilt", ModLoader::Quilt),
    ]
    .into_iter()
    .find_map(|(needle, loader)| lower.contains(needle).then_some(loader))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::commands::CommandErrorKind;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_scan_prism_instances() {
        let base = tempdir().unwrap();
        let inst = base.path().join("instances").join("fab");
        write(&inst.join("instance.cfg"), "InstanceType=OneSix\nname=Fabric Pack\n");
        write(
            &inst.join("mmc-pack.json"),
            r#"{"components":[{"uid":"net.minecraft","version":"1.20.1"},{"uid":"net.fabricmc.fabric-loader","version":"0.15.0"}]}"#,
        );
        // No marker: not an instance.
        fs::create_dir_all(base.path().join("instances").join("_LAUNCHER_TEMP")).unwrap();

        let candidates = scan(ImportKind::Prism, base.path()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Fabric Pack");
        assert_eq!(candidates[0].mc_version.as_deref(), Some("1.20.1"));
        assert_eq!(candidates[0].mod_loader, Some(ModLoader::Fabric));
        assert_eq!(candidates[0].path, inst);
    }

    #[test]
    fn test_scan_curseforge_instances_sorted() {
        let base = tempdir().unwrap();
        for (dir, name) in [("b", "Zeta"), ("a", "alpha")] {
            write(
                &base.path().join("Instances").join(dir).join("minecraftinstance.json"),
                &format!(
                    r#"{{"name":"{name}","gameVersion":"1.20.1","baseModLoader":{{"name":"neoforge-20.1.0"}}}}"#
                ),
            );
        }

        let candidates = scan(ImportKind::Curseforge, base.path()).unwrap();
        let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Zeta"]);
        assert_eq!(candidates[0].mod_loader, Some(ModLoader::NeoForge));
    }

    #[test]
    fn test_scan_modrinth_and_atlauncher() {
        let base = tempdir().unwrap();
        write(
            &base.path().join("profiles").join("p").join("profile.json"),
            r#"{"metadata":{"name":"Quilty","game_version":"1.19.4","loader":"quilt"}}"#,
        );
        let candidates = scan(ImportKind::Modrinth, base.path()).unwrap();
        assert_eq!(candidates[0].mod_loader, Some(ModLoader::Quilt));

        write(
            &base.path().join("instances").join("v").join("instance.json"),
            r#"{"id":"1.12.2","launcher":{"name":"Old Times"}}"#,
        );
        let candidates = scan(ImportKind::AtLauncher, base.path()).unwrap();
        assert_eq!(candidates[0].name, "Old Times");
        assert_eq!(candidates[0].mc_version.as_deref(), Some("1.12.2"));
        assert_eq!(candidates[0].mod_loader, Some(ModLoader::Vanilla));
    }

    #[test]
    fn test_scan_skips_unparseable_metadata() {
        let base = tempdir().unwrap();
        write(
            &base.path().join("profiles").join("broken").join("profile.json"),
            "{not json",
        );
        assert!(scan(ImportKind::Modrinth, base.path()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_directory_is_not_found() {
        let base = tempdir().unwrap();
        let err = scan(ImportKind::MultiMc, base.path()).unwrap_err();
        assert_eq!(err.kind, CommandErrorKind::NotFound);
    }

    #[test]
    fn test_parse_loader_prefers_neoforge() {
        assert_eq!(parse_loader("forge-47.2.0"), Some(ModLoader::Forge));
        assert_eq!(parse_loader("NeoForge"), Some(ModLoader::NeoForge));
        assert_eq!(parse_loader("Fabric"), Some(ModLoader::Fabric));
        assert_eq!(parse_loader("liteloader"), None);
    }

    #[test]
    fn test_prism_game_dir_prefers_dotted() {
        let dir = tempdir().unwrap();
        assert_eq!(
            game_dir(ImportKind::Prism, dir.path()),
            dir.path().join("minecraft")
        );
        fs::create_dir(dir.path().join(".minecraft")).unwrap();
        assert_eq!(
            game_dir(ImportKind::Prism, dir.path()),
            dir.path().join(".minecraft")
        );
    }
}
