#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use affiliate_cli::commands::ingest;
    use affiliate_shared::store::{open_store, StoreConfig};
    use tempfile::TempDir;

    fn sqlite_config(dir: &TempDir) -> StoreConfig {
        StoreConfig::Sqlite {
            path: dir.path().join("data").join("posts.db"),
        }
    }

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("write payload file");
        path
    }

    #[tokio::test]
    async fn ingest_writes_posts_and_products() {
        let dir = TempDir::new().expect("create temp dir");
        let config = sqlite_config(&dir);
        let file = write_file(
            dir.path(),
            "posts.json",
            r#"[
                {"id":"cafe-1","title":"Cafeteira Elétrica","content":"Boa","price":"299,90",
                 "affiliate_url":"https://example.com/cafe"},
                {"id":"draft-1","title":"Rascunho","content":"wip","status":"draft"}
            ]"#,
        );

        let summary = ingest::run(&config, &file).await.expect("ingest");
        let slugs: Vec<_> = summary.saved.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["cafeteira-eletrica", "rascunho"]);

        let store = open_store(&config).await.expect("reopen store");
        let posts = store.list_published_posts().await.expect("list posts");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "cafe-1");
        assert_eq!(posts[0].price, Some(299.9));

        let products = store.list_products().await.expect("list products");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].affiliate_url, "https://example.com/cafe");
    }

    #[tokio::test]
    async fn invalid_payload_aborts_before_any_write() {
        let dir = TempDir::new().expect("create temp dir");
        let config = sqlite_config(&dir);
        let file = write_file(
            dir.path(),
            "posts.json",
            r#"[
                {"id":"ok","title":"Valid","content":"fine"},
                {"id":"bad","title":"No content"}
            ]"#,
        );

        let err = ingest::run(&config, &file).await.expect_err("second payload invalid");
        let message = format!("{err:#}");
        assert!(message.contains("#1 (bad: No content)"), "{message}");
        assert!(message.contains("content"), "{message}");

        let store = open_store(&config).await.expect("open store");
        let stats = store.stats().await.expect("stats");
        assert_eq!(stats.posts, 0);
    }

    #[tokio::test]
    async fn empty_array_is_an_error() {
        let dir = TempDir::new().expect("create temp dir");
        let file = write_file(dir.path(), "empty.json", "[]");
        assert!(ingest::run(&sqlite_config(&dir), &file).await.is_err());
    }
}
