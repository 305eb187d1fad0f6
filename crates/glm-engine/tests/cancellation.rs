//! Cooperative cancellation through the shared flag.

use futures::StreamExt;
use glm_engine::*;

fn long_request() -> GenerationRequest {
    GenerationRequest::new("the quick brown fox jumps over the lazy dog")
}

#[tokio::test]
async fn interrupt_stops_in_flight_generation() {
    let engine = EchoEngine::default();
    let flag = CancellationFlag::new();
    let mut stream = engine.generate(long_request(), flag.clone()).unwrap();

    assert_eq!(stream.next().await, Some(Ok("t".to_string())));
    assert_eq!(stream.next().await, Some(Ok("th".to_string())));

    flag.interrupt();

    // At most one event may already be in flight.
    let remaining = stream.count().await;
    assert!(remaining <= 1, "{remaining} events after interrupt");
}

#[tokio::test]
async fn interrupt_reaches_every_session() {
    let engine = EchoEngine::default();
    let flag = CancellationFlag::new();

    let mut first = engine.generate(long_request(), flag.clone()).unwrap();
    let second = engine.generate(long_request(), flag.clone()).unwrap();

    assert!(first.next().await.is_some());
    flag.interrupt();

    assert!(first.count().await <= 1);
    assert_eq!(second.count().await, 0);
}

#[tokio::test]
async fn later_generations_stay_stopped_until_resumed() {
    let engine = EchoEngine::default();
    let flag = CancellationFlag::new();
    flag.interrupt();

    let stopped = engine.generate(long_request(), flag.clone()).unwrap();
    assert_eq!(stopped.count().await, 0);

    flag.resume();
    let resumed = engine
        .generate(GenerationRequest::new("ok"), flag.clone())
        .unwrap();
    let events: Vec<_> = resumed.map(|e| e.unwrap()).collect().await;
    assert_eq!(events, vec!["o", "ok"]);
}
