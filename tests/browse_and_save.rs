use bizdir::domain::{ApiResponse, AuthSession, ResultPage, TransportError};
use bizdir::pagination::PageFetch;
use bizdir::{initialize, Config, RequestTracker, RetryPolicy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
struct BusinessQuery {
    city: String,
}

#[tokio::test(start_paused = true)]
async fn browse_pages_then_save_after_sign_in() {
    let context = initialize(&Config::default());
    let fetches = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fetches);

    let mut businesses = context.paginator(
        "businesses",
        BusinessQuery {
            city: "Portland".to_string(),
        },
        ResultPage::new(vec!["Powell's Books".to_string()]),
        move |query: &BusinessQuery, page| {
            counter.fetch_add(1, Ordering::SeqCst);
            let city = query.city.clone();
            async move {
                Ok::<_, TransportError>(ApiResponse::Success(ResultPage::new(vec![format!(
                    "{city} business #{page}"
                )])))
            }
        },
    );

    assert_eq!(businesses.go_to(1).await.unwrap(), PageFetch::Cached);
    assert_eq!(businesses.go_to(3).await.unwrap(), PageFetch::Fetched);
    assert_eq!(businesses.go_to(1).await.unwrap(), PageFetch::Cached);
    assert_eq!(businesses.go_to(3).await.unwrap(), PageFetch::Cached);
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    let picked = businesses.current_data().unwrap().items[0].clone();
    assert_eq!(picked, "Portland business #3");

    let (gate, watcher) = context.watched_auth_gate();
    let (saved_tx, saved_rx) = oneshot::channel();
    gate.lock().unwrap().with_auth(move |token| {
        let _ = saved_tx.send((token, picked));
    });
    assert!(gate.lock().unwrap().prompt_shown());

    context
        .sessions()
        .sign_in(AuthSession::new("u-42", "Robin", "access-42"));

    let (token, saved) = tokio::time::timeout(Duration::from_secs(1), saved_rx)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(token, "access-42");
    assert_eq!(saved, "Portland business #3");
    assert!(!gate.lock().unwrap().prompt_shown());

    watcher.abort();
}

#[tokio::test(start_paused = true)]
async fn confirmation_guards_a_tracked_delete() {
    let context = initialize(&Config::default());
    let tracker: RequestTracker = context.tracker("delete-review");
    let deleted = Arc::new(Mutex::new(Vec::new()));

    let mut gate = context.confirmation_gate();
    let (go_tx, go_rx) = oneshot::channel::<()>();
    gate.with_confirmation(move || {
        let _ = go_tx.send(());
    });
    assert!(gate.prompt_shown());
    assert!(gate.confirm());
    go_rx.await.unwrap();

    let sink = Arc::clone(&deleted);
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let outcome = tracker
        .send_with_retry(
            move || {
                let attempt = counter.fetch_add(1, Ordering::SeqCst);
                let sink = Arc::clone(&sink);
                async move {
                    if attempt == 0 {
                        return Err(TransportError::new("connection reset"));
                    }
                    sink.lock().unwrap().push("review-7");
                    Ok(ApiResponse::<()>::Success(()))
                }
            },
            RetryPolicy::Times(2),
            |_| true,
        )
        .await;

    assert!(outcome.unwrap().is_success());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert_eq!(*deleted.lock().unwrap(), vec!["review-7"]);
    assert!(!tracker.is_loading());
}
