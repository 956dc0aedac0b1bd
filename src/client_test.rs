use super::*;

#[tokio::test]
async fn abort_all_stops_registered_tasks() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut subscriptions = Subscriptions::new();
    subscriptions.register(tokio::spawn(async move {
        loop {
            if tx.send(()).is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }));
    assert_eq!(subscriptions.len(), 1);
    rx.recv().await.expect("task is running");

    subscriptions.abort_all();
    assert!(subscriptions.is_empty());

    tokio::time::sleep(Duration::from_millis(10)).await;
    while rx.try_recv().is_ok() {
        // Drain messages queued before the abort landed.
    }
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn dropping_subscriptions_tears_tasks_down() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut subscriptions = Subscriptions::new();
    subscriptions.register(tokio::spawn(async move {
        loop {
            if tx.send(()).is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }));
    rx.recv().await.expect("task is running");

    drop(subscriptions);
    tokio::time::sleep(Duration::from_millis(10)).await;
    while rx.try_recv().is_ok() {}
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn abort_all_is_idempotent() {
    let mut subscriptions = Subscriptions::new();
    subscriptions.register(tokio::spawn(async {
        futures_util::future::pending::<()>().await;
    }));
    subscriptions.abort_all();
    subscriptions.abort_all();
    assert!(subscriptions.is_empty());
}

#[tokio::test]
async fn connecting_to_an_unreachable_host_fails_fast() {
    let err = run("ws://127.0.0.1:9", "scene", Duration::from_millis(16))
        .await
        .expect_err("nothing listens on the discard port");
    assert!(matches!(err, ClientError::Connect(_)));
}
