// End-to-end acquisition over HTTP:
//  - issuer endpoint (POST) -> token with expiry, or 401 for a wrong secret
// Then runs app and user acquisitions through the memory cache.

#[cfg(test)]
mod test {

    use std::sync::{atomic::{AtomicUsize, Ordering}, Arc};

    use axum::{routing::post, Json};
    use http::StatusCode;
    use serde_json::{json, Value};

    use crate::acquisition::{CacheBypass, TokenAcquirer};
    use crate::cache::{MemoryStore, TokenCacheGateway, TokenStore};
    use crate::cache::key::user_key;
    use crate::config::parse_settings;
    use crate::restclient::{RequestOptions, RestClient};
    use crate::sources::{HttpIssuer, IssuerRejection};
    use crate::tests::common::{spawn_axum, Router};

    const API_PATH: &str = "/api/sparrow_app/token/";

    async fn spawn_issuer(counter: Arc<AtomicUsize>) -> (tokio::task::JoinHandle<()>, String) {
        let router = Router::new().route(API_PATH, post(move |Json(body): Json<Value>| {
            let c = counter.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                if body["secret"] != "s3cr3t" {
                    return (StatusCode::UNAUTHORIZED, "invalid secret".to_owned());
                }
                let token = match body.get("uid").and_then(Value::as_str) {
                    Some(uid) => format!("user-token-{uid}"),
                    None => "app-token".to_owned(),
                };
                (StatusCode::OK, json!({"token": token, "expires_in": 120}).to_string())
            }
        }));
        let (handle, addr) = spawn_axum(router).await;
        (handle, addr.to_string())
    }

    fn http_acquirer(addr: &str, store: &MemoryStore) -> TokenAcquirer {
        let issuer = HttpIssuer::new(addr, API_PATH, RequestOptions::default().with_timeout_seconds(5))
            .unwrap()
            .with_client(RestClient::with_proxy(None).unwrap());
        let (bypass, _) = CacheBypass::switch(false);
        TokenAcquirer::new(issuer)
            .with_cache(TokenCacheGateway::new(store.clone()))
            .with_bypass(bypass)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn app_token_is_fetched_once_then_cached() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (handle, addr) = spawn_issuer(counter.clone()).await;
        let acquirer = http_acquirer(&addr, &MemoryStore::new());

        let first = acquirer.get_app_token("svc", "s3cr3t").await.unwrap();
        let second = acquirer.get_app_token("svc", "s3cr3t").await.unwrap();

        let payload: Value = serde_json::from_str(&first).unwrap();
        assert_eq!(payload, json!({"token": "app-token", "expires_in": 120}));
        assert_eq!(first, second);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        handle.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn user_token_lands_under_user_key() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (handle, addr) = spawn_issuer(counter.clone()).await;
        let store = MemoryStore::new();
        let acquirer = http_acquirer(&addr, &store);

        let token = acquirer.get_user_token("svc", "s3cr3t", "u1").await.unwrap();

        assert!(token.contains("user-token-u1"));
        assert_eq!(store.get(&user_key("u1")).await.unwrap(), Some(token));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        handle.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn wrong_secret_is_rejected_with_issuer_message() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (handle, addr) = spawn_issuer(counter.clone()).await;
        let store = MemoryStore::new();
        let acquirer = http_acquirer(&addr, &store);

        let err = acquirer.get_app_token("svc", "wrong").await.unwrap_err();

        assert_eq!(err.to_string(), "invalid secret");
        assert_eq!(err.downcast_ref::<IssuerRejection>().map(|r| r.status), Some(401));
        assert!(store.is_empty().await);

        handle.abort();
    }

    #[test]
    fn settings_decide_cache_presence() {
        let without_cache = parse_settings("issuer:\n  service_addr: 127.0.0.1:8001\n").unwrap();
        assert!(!TokenAcquirer::from_settings(&without_cache).unwrap().cache().is_configured());

        let memory_cache = parse_settings("issuer:\n  service_addr: 127.0.0.1:8001\ncache: {}\n").unwrap();
        assert!(TokenAcquirer::from_settings(&memory_cache).unwrap().cache().is_configured());
    }

    #[tokio::test]
    async fn redis_settings_build_a_lazy_pool() {
        let redis_cache = parse_settings(
            "issuer:\n  service_addr: 127.0.0.1:8001\ncache:\n  redis_url: redis://127.0.0.1:6379/0\n",
        )
        .unwrap();
        assert!(TokenAcquirer::from_settings(&redis_cache).unwrap().cache().is_configured());
    }
}
