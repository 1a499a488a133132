//! Single notification pass.
//!
//! Users are processed one at a time, services one at a time within a user.
//! For each (service, handle): read the cached snapshot, fetch the current
//! one, diff, then overwrite the cache. The first error aborts the pass;
//! caches already written by earlier steps stay written.

use crate::cache::CacheStore;
use crate::config::{Handles, TrackedUser};
use crate::error::AppResult;
use crate::judges::{DeltaEntry, JudgeRegistry};
use crate::report::{aggregate, UserReport};

/// Newly solved problems of one user across all of their services, in
/// configured service order and sorted by problem id within a service.
pub async fn collect_user_delta(
    judges: &JudgeRegistry,
    cache: &CacheStore,
    handles: &Handles,
) -> AppResult<Vec<DeltaEntry>> {
    let mut problems = Vec::new();

    for (service, handle) in handles {
        let judge = judges.get(service)?;

        let old = match cache.read(service, handle)? {
            Some(snapshot) => snapshot,
            None => judge.empty_snapshot(),
        };
        let new = judge.fetch_snapshot(handle).await?;

        // Diff before writing so a metadata failure keeps the old snapshot.
        let delta = judge.compute_delta(&old, &new)?;
        cache.write(service, handle, &new)?;

        tracing::debug!("{}/{}: {} new problems", service, handle, delta.len());
        problems.extend(delta);
    }

    Ok(problems)
}

/// Run one pass over `users` and render the summary. An empty string means
/// there is nothing to post.
pub async fn run_once(
    judges: &JudgeRegistry,
    cache: &CacheStore,
    users: &[TrackedUser],
) -> AppResult<String> {
    let mut reports = Vec::new();

    for user in users {
        let problems = collect_user_delta(judges, cache, &user.handles).await?;
        tracing::info!("{} solved {} new problems", user.name, problems.len());

        if let Some(report) = UserReport::build(&user.name, problems) {
            reports.push(report);
        }
    }

    Ok(aggregate(reports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use serde_json::json;

    use crate::cache::scratch_dir;
    use crate::cli::Cli;
    use crate::config::{ConfigFile, Settings};
    use crate::error::AppError;
    use crate::judges::mock::MockJudge;

    fn user(name: &str, handles: &[(&str, &str)]) -> TrackedUser {
        TrackedUser {
            name: name.to_string(),
            handles: handles
                .iter()
                .map(|(s, h)| (s.to_string(), h.to_string()))
                .collect::<Handles>(),
        }
    }

    fn registry(judges: Vec<MockJudge>) -> JudgeRegistry {
        let mut registry = JudgeRegistry::new();
        for judge in judges {
            registry.register(Box::new(judge));
        }
        registry
    }

    #[tokio::test]
    async fn first_run_reports_everything_and_fills_cache() {
        let cache = CacheStore::new(scratch_dir("runner-first"));
        let judges = registry(vec![MockJudge::new("atcoder").with_solved("alice_ac", &["b", "a"])]);

        let text = run_once(&judges, &cache, &[user("alice", &[("atcoder", "alice_ac")])])
            .await
            .unwrap();

        assert_eq!(
            text,
            "_alice_ solved *2* problems!\n\
             atcoder a https://judge.test/atcoder/a\n\
             atcoder b https://judge.test/atcoder/b"
        );
        assert_eq!(cache.read("atcoder", "alice_ac").unwrap(), Some(json!(["b", "a"])));
        let _ = fs::remove_dir_all(cache.root());
    }

    #[tokio::test]
    async fn second_run_with_same_snapshot_is_silent() {
        let cache = CacheStore::new(scratch_dir("runner-second"));
        let judges = registry(vec![MockJudge::new("atcoder").with_solved("alice_ac", &["a"])]);
        let users = [user("alice", &[("atcoder", "alice_ac")])];

        run_once(&judges, &cache, &users).await.unwrap();
        let text = run_once(&judges, &cache, &users).await.unwrap();

        assert_eq!(text, "");
        let _ = fs::remove_dir_all(cache.root());
    }

    #[tokio::test]
    async fn only_problems_missing_from_cache_are_reported() {
        let cache = CacheStore::new(scratch_dir("runner-diff"));
        cache.write("atcoder", "alice_ac", &json!(["a"])).unwrap();
        let judges = registry(vec![MockJudge::new("atcoder").with_solved("alice_ac", &["a", "c"])]);

        let problems = collect_user_delta(
            &judges,
            &cache,
            &user("alice", &[("atcoder", "alice_ac")]).handles,
        )
        .await
        .unwrap();

        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].title, "atcoder c");
        let _ = fs::remove_dir_all(cache.root());
    }

    #[tokio::test]
    async fn services_are_combined_per_user_and_users_sorted_by_count() {
        let cache = CacheStore::new(scratch_dir("runner-multi"));
        let judges = registry(vec![
            MockJudge::new("atcoder")
                .with_solved("a1", &["x"])
                .with_solved("b1", &["x", "y"]),
            MockJudge::new("codeforces").with_solved("b2", &["z"]),
        ]);
        let users = [
            user("alice", &[("atcoder", "a1")]),
            user("bob", &[("atcoder", "b1"), ("codeforces", "b2")]),
        ];

        let text = run_once(&judges, &cache, &users).await.unwrap();

        let blocks: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("_bob_ solved *3* problems!"));
        assert!(blocks[0].ends_with("codeforces z https://judge.test/codeforces/z"));
        assert!(blocks[1].starts_with("_alice_ solved *1* problems!"));
        let _ = fs::remove_dir_all(cache.root());
    }

    #[tokio::test]
    async fn fetch_failure_aborts_but_keeps_earlier_caches() {
        let cache = CacheStore::new(scratch_dir("runner-fail"));
        let judges = registry(vec![MockJudge::new("atcoder")
            .with_solved("ok", &["a"])
            .with_error("broken")]);
        let users = [
            user("first", &[("atcoder", "ok")]),
            user("second", &[("atcoder", "broken")]),
        ];

        let err = run_once(&judges, &cache, &users).await.unwrap_err();

        assert!(matches!(err, AppError::Network(_)));
        assert!(cache.read("atcoder", "ok").unwrap().is_some());
        assert!(cache.read("atcoder", "broken").unwrap().is_none());
        let _ = fs::remove_dir_all(cache.root());
    }

    #[tokio::test]
    async fn corrupt_cache_aborts_before_fetching() {
        let cache = CacheStore::new(scratch_dir("runner-corrupt"));
        let path = cache.path_for("atcoder", "alice_ac");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[").unwrap();

        let judge = MockJudge::new("atcoder").with_solved("alice_ac", &["a"]);
        let fetch_log = judge.fetch_log();
        let judges = registry(vec![judge]);

        let err = run_once(&judges, &cache, &[user("alice", &[("atcoder", "alice_ac")])])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CacheCorruption { .. }));
        assert!(fetch_log.lock().unwrap().is_empty());
        let _ = fs::remove_dir_all(cache.root());
    }

    #[tokio::test]
    async fn tied_users_and_their_services_follow_config_file_order() {
        let cache = CacheStore::new(scratch_dir("runner-file-order"));
        let judges = registry(vec![
            MockJudge::new("atcoder")
                .with_solved("zed_ac", &["p"])
                .with_solved("amy_ac", &["q"]),
            MockJudge::new("codeforces")
                .with_solved("zed_cf", &["r"])
                .with_solved("amy_cf", &["s"]),
        ]);
        let file: ConfigFile = serde_json::from_value(json!({
            "users": {
                "zed": {"codeforces": "zed_cf", "atcoder": "zed_ac"},
                "amy": {"atcoder": "amy_ac", "codeforces": "amy_cf"}
            },
            "webhook-url": "https://hooks.example.test/x",
            "cache-dir": cache.root().display().to_string()
        }))
        .unwrap();
        let cli = <Cli as clap::Parser>::try_parse_from(["shoujin-notifier"]).unwrap();
        let settings = Settings::resolve(&cli, file).unwrap();

        let text = run_once(&judges, &cache, &settings.users).await.unwrap();

        assert_eq!(
            text,
            "_zed_ solved *2* problems!\n\
             codeforces r https://judge.test/codeforces/r\n\
             atcoder p https://judge.test/atcoder/p\n\n\
             _amy_ solved *2* problems!\n\
             atcoder q https://judge.test/atcoder/q\n\
             codeforces s https://judge.test/codeforces/s"
        );
        let _ = fs::remove_dir_all(cache.root());
    }

    #[tokio::test]
    async fn handles_are_fetched_in_user_then_service_order() {
        let cache = CacheStore::new(scratch_dir("runner-order"));
        let judge = MockJudge::new("atcoder");
        let fetch_log = judge.fetch_log();
        let judges = registry(vec![judge]);

        run_once(
            &judges,
            &cache,
            &[
                user("zed", &[("atcoder", "z")]),
                user("amy", &[("atcoder", "a")]),
            ],
        )
        .await
        .unwrap();

        assert_eq!(*fetch_log.lock().unwrap(), vec!["z", "a"]);
        assert_eq!(
            fs::read_dir(cache.root().join("atcoder")).unwrap().count(),
            2
        );
        let _ = fs::remove_dir_all(cache.root());
    }
}
