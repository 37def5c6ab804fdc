use super::*;

#[tokio::test]
async fn new_state_has_no_clients() {
    let state = AppState::new(RelayConfig::default());
    assert_eq!(state.client_count().await, 0);
    assert_eq!(state.config.port, 3000);
}

#[tokio::test]
async fn clones_share_the_client_map() {
    let state = AppState::new(RelayConfig::default());
    let other = state.clone();
    let (tx, _rx) = mpsc::channel(1);
    state.clients.write().await.insert(Uuid::new_v4(), tx);
    assert_eq!(other.client_count().await, 1);
}
