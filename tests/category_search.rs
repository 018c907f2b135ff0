use bizdir::app::{Action, FieldKind};
use bizdir::domain::{ApiResponse, CategoryMatches, TransportResult};
use bizdir::{initialize, Config};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Calls = Arc<Mutex<Vec<String>>>;

fn categories_endpoint(
    calls: &Calls,
) -> impl Fn(String) -> BoxFuture<'static, TransportResult<ApiResponse<CategoryMatches>>>
       + Send
       + Sync
       + 'static {
    let log = Arc::clone(calls);
    move |query: String| {
        log.lock().unwrap().push(query.clone());
        async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let body = if query == "hot" {
                r#"{"status":"SUCCESS","categories":["Hotels","Hot Springs"]}"#
            } else {
                r#"{"status":"SUCCESS","categories":[]}"#
            };
            ApiResponse::from_json(body)
        }
        .boxed()
    }
}

#[tokio::test(start_paused = true)]
async fn typing_hot_then_selecting_hotels() {
    let context = initialize(&Config::default());
    let calls: Calls = Arc::default();
    let mut field = context.field(FieldKind::Category, categories_endpoint(&calls));

    field.focus();
    for value in ["h", "ho"] {
        assert!(!field
            .input(value)
            .iter()
            .any(|action| matches!(action, Action::ScheduleSearch(_))));
    }
    assert_eq!(field.input("hot"), vec![Action::ScheduleSearch("hot".to_string())]);

    tokio::time::sleep(Duration::from_millis(90)).await;
    assert!(calls.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(*calls.lock().unwrap(), vec!["hot".to_string()]);

    let state = field.search_state();
    assert_eq!(state.results, vec!["Hotels".to_string(), "Hot Springs".to_string()]);
    assert!(state.results_visible);
    assert!(!state.loading);

    field.select("Hotels");
    let state = field.search_state();
    assert_eq!(state.results, vec!["Hotels".to_string(), "Hot Springs".to_string()]);
    assert!(!state.results_visible);
    assert_eq!(field.value(), "Hotels");

    assert!(field.input("Hotels").is_empty());
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn city_field_uses_its_own_delay() {
    let context = initialize(&Config::default());
    let calls: Calls = Arc::default();
    let mut field = context.field(FieldKind::City, categories_endpoint(&calls));

    field.input("Po");
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(calls.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(*calls.lock().unwrap(), vec!["Po".to_string()]);
}
