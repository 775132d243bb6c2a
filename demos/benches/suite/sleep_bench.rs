//! Async functions awaiting timers

use quickbench::export;
use std::time::Duration;

#[export]
async fn bench_async_quick() {
    tokio::task::yield_now().await;
}

#[export]
async fn bench_async_sleep() {
    tokio::time::sleep(Duration::from_millis(30)).await;
}

#[export]
async fn bench_async_slow() -> Result<(), std::io::Error> {
    tokio::time::sleep(Duration::from_millis(300)).await;
    Ok(())
}
