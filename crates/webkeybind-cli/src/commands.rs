//! Subcommand implementations. Each returns the text to print.

use std::{env, path::PathBuf, sync::Arc};

use bindings::{
    ActiveSet, BindingMatcher, BindingRepository, FocusContext, KeyBinding, PageLocation,
};
use config::Settings;
use tracing::info;

use crate::{Error, Result, cli::Commands, file_store::FileStore};

/// Default store file (`~/.webkeybind/storage.json`).
pub fn default_store_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".webkeybind");
    p.push("storage.json");
    p
}

/// Repository over the JSON store at `path`, using the configured key and quota.
pub fn open_repository(settings: &Settings, path: PathBuf) -> BindingRepository {
    let store = FileStore::new(path, settings.storage.sync_quota_bytes);
    BindingRepository::with_key(Arc::new(store), &settings.storage.bindings_key)
}

/// Run `command` against `repo`.
pub async fn run(command: &Commands, repo: &BindingRepository) -> Result<String> {
    match command {
        Commands::List { domain, json } => {
            let domain = domain.as_deref().filter(|d| !d.is_empty());
            let bindings = repo.list_for_domain(domain).await?;
            if *json {
                Ok(serde_json::to_string_pretty(&bindings)?)
            } else {
                Ok(table(&bindings))
            }
        }
        Commands::Delete { id } => {
            if repo.delete(id).await? {
                Ok(format!("deleted {id}"))
            } else {
                Ok(format!("no binding {id}"))
            }
        }
        Commands::Enable { id } => {
            repo.set_enabled(id, true).await?;
            Ok(format!("enabled {id}"))
        }
        Commands::Disable { id } => {
            repo.set_enabled(id, false).await?;
            Ok(format!("disabled {id}"))
        }
        Commands::Match {
            url,
            key,
            in_text_field,
        } => {
            let location = PageLocation::parse(url).map_err(|e| Error::Url {
                url: url.clone(),
                message: e.to_string(),
            })?;
            let active = ActiveSet::derive(repo.list().await?, &location);
            let focus = FocusContext {
                in_text_entry: *in_text_field,
            };
            info!(host = location.hostname(), active = active.len(), "matching");
            Ok(match BindingMatcher::new().find(&active, key, focus) {
                Some(b) => line(b),
                None => format!(
                    "no binding for {key} ({} active on {})",
                    active.len(),
                    location.hostname()
                ),
            })
        }
        Commands::Check => Ok("OK".to_string()),
    }
}

/// One binding per line.
fn table(bindings: &[KeyBinding]) -> String {
    if bindings.is_empty() {
        return "no bindings".to_string();
    }
    bindings.iter().map(line).collect::<Vec<_>>().join("\n")
}

/// `id  key  domain  [off]  description`
fn line(b: &KeyBinding) -> String {
    let state = if b.enabled { "" } else { " [off]" };
    format!(
        "{}  {}  {}{}  {}",
        b.id, b.key, b.domain, state, b.description
    )
}

#[cfg(test)]
mod tests {
    use std::{env, process};

    use elements::{ElementType, SelectorDescriptor};
    use tokio::fs;

    use super::*;

    fn binding(id: &str, domain: &str, key: &str, ignore_input_focus: bool) -> KeyBinding {
        KeyBinding {
            id: id.to_string(),
            domain: domain.to_string(),
            url: String::new(),
            element_type: ElementType::Button,
            selector: SelectorDescriptor::default(),
            key: key.to_string(),
            description: format!("{id} desc"),
            ignore_input_focus,
            enabled: true,
            created_at: 0,
        }
    }

    async fn repo(label: &str) -> BindingRepository {
        let path = env::temp_dir()
            .join(format!("wkb-cmd-{label}-{}", process::id()))
            .join("storage.json");
        fs::remove_file(&path).await.ok();
        let repo = open_repository(&Settings::default(), path);
        repo.save(binding("a", "example.com", "Ctrl+K", false))
            .await
            .unwrap();
        repo.save(binding("b", "example.com", "Ctrl+K", true))
            .await
            .unwrap();
        repo.save(binding("c", "other.test", "Alt+X", false))
            .await
            .unwrap();
        repo
    }

    #[tokio::test]
    async fn list_and_filter() {
        let repo = repo("list").await;
        let all = run(
            &Commands::List {
                domain: None,
                json: false,
            },
            &repo,
        )
        .await
        .unwrap();
        assert_eq!(all.lines().count(), 3);
        let one = run(
            &Commands::List {
                domain: Some("other.test".into()),
                json: false,
            },
            &repo,
        )
        .await
        .unwrap();
        assert_eq!(one, "c  Alt+X  other.test  c desc");
    }

    #[tokio::test]
    async fn json_listing_decodes_back() {
        let repo = repo("json").await;
        let text = run(
            &Commands::List {
                domain: Some("example.com".into()),
                json: true,
            },
            &repo,
        )
        .await
        .unwrap();
        let decoded: Vec<KeyBinding> = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, repo.list_for_domain(Some("example.com")).await.unwrap());
        let err = Error::from(serde_json::from_str::<Vec<KeyBinding>>("[").unwrap_err());
        assert!(err.to_string().starts_with("Failed to encode bindings"));
    }

    #[tokio::test]
    async fn toggle_and_delete() {
        let repo = repo("toggle").await;
        run(&Commands::Disable { id: "c".into() }, &repo)
            .await
            .unwrap();
        assert!(!repo.find("c").await.unwrap().unwrap().enabled);
        assert!(
            run(&Commands::Enable { id: "zzz".into() }, &repo)
                .await
                .is_err()
        );
        assert_eq!(
            run(&Commands::Delete { id: "a".into() }, &repo)
                .await
                .unwrap(),
            "deleted a"
        );
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn match_honors_focus_guard() {
        let repo = repo("match").await;
        let cmd = |in_text_field| Commands::Match {
            url: "https://example.com/page".into(),
            key: "K+Ctrl".into(),
            in_text_field,
        };
        assert!(
            run(&cmd(false), &repo)
                .await
                .unwrap()
                .starts_with("a  ")
        );
        assert!(run(&cmd(true), &repo).await.unwrap().starts_with("b  "));

        let bad = Commands::Match {
            url: "not a url".into(),
            key: "Ctrl+K".into(),
            in_text_field: false,
        };
        assert!(matches!(run(&bad, &repo).await, Err(Error::Url { .. })));
    }
}
