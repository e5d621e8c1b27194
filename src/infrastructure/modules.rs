//! Simulated module providers built from the configured manifests

use std::time::Duration;

use serde_json::{json, Value};

use crate::{
    core::{
        action::{Action, ActionTree},
        bundle::{ModuleDescriptor, ModuleTable, Provider, Resolved},
    },
    infrastructure::config::{Config, ModuleManifest},
    presentation::view::TextView,
};

pub fn module_table(config: &Config) -> ModuleTable<TextView> {
    config
        .modules
        .iter()
        .fold(ModuleTable::new(), |table, (key, manifest)| {
            table.with(key.clone(), descriptor(manifest))
        })
}

pub fn descriptor(manifest: &ModuleManifest) -> ModuleDescriptor<TextView> {
    let view = TextView::new(manifest.title.clone(), manifest.body.clone());
    let delay = Duration::from_millis(manifest.delay_ms);
    let wrap = manifest.wrap_default;

    let view = Provider::new(move || {
        let view = view.clone();
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(if wrap {
                Resolved::Wrapped(view)
            } else {
                Resolved::Raw(view)
            })
        }
    });

    let actions = manifest
        .counters
        .iter()
        .fold(ActionTree::new(), |tree, key| {
            tree.with(key.clone(), Action::counter(key.clone()))
        });

    let state = match &manifest.fail {
        Some(message) => Provider::failing(message.clone()),
        None if wrap => Provider::json_state(json!({ "default": manifest.state })),
        None => Provider::json_state(manifest.state.clone()),
    };

    ModuleDescriptor::new(view, Provider::ready(Resolved::Raw(actions)), state)
}

/// Counter keys of every manifest, each starting at zero
pub fn counter_seed(config: &Config) -> serde_json::Map<String, Value> {
    config
        .modules
        .values()
        .flat_map(|manifest| manifest.counters.iter())
        .map(|key| (key.clone(), Value::from(0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::error::{LoadError, ProviderKind};

    fn manifest(fail: Option<&str>, wrap_default: bool) -> ModuleManifest {
        ModuleManifest {
            title: "Home".to_string(),
            body: "{user}".to_string(),
            delay_ms: 0,
            fail: fail.map(str::to_string),
            wrap_default,
            state: json!({ "user": "guest" }),
            counters: vec!["visits".to_string()],
        }
    }

    #[tokio::test]
    async fn test_descriptor_resolves_manifest() {
        for wrap in [false, true] {
            let bundle = descriptor(&manifest(None, wrap)).fetch("home").await.unwrap();
            assert_eq!(bundle.view, TextView::new("Home", "{user}"));
            assert_eq!(bundle.state.get("user"), Some(&json!("guest")));
            assert_eq!(bundle.actions.names(), vec!["visits"]);
        }
    }

    #[tokio::test]
    async fn test_failing_manifest() {
        let error = descriptor(&manifest(Some("offline"), false))
            .fetch("home")
            .await
            .unwrap_err();
        match error {
            LoadError::Provider { key, kind, source } => {
                assert_eq!(key, "home");
                assert_eq!(kind, ProviderKind::State);
                assert_eq!(source.message(), "offline");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delay_is_applied() {
        let mut slow = manifest(None, false);
        slow.delay_ms = 30;
        let started = tokio::time::Instant::now();
        descriptor(&slow).fetch("home").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_module_table_and_counter_seed() {
        let config = Config::embedded().unwrap();
        let table = module_table(&config);
        assert_eq!(table.sorted_keys(), vec!["broken", "feed", "home"]);
        assert_eq!(counter_seed(&config).get("visits"), Some(&json!(0)));
    }
}
