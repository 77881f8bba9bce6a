//! 定时器封装模块
//!
//! 使用 `web_sys` 的 `setTimeout` 实现可 await 的延时，供超时竞速使用。

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{Either, select};
use wasm_bindgen_futures::JsFuture;

/// 可 await 的延时
#[async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

/// 浏览器 `setTimeout` 实现
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

#[async_trait(?Send)]
impl Timer for BrowserTimer {
    async fn sleep(&self, duration: Duration) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
        });
        let _ = JsFuture::from(promise).await;
    }
}

/// 让 `fut` 与计时器竞速：先完成者胜出，超时返回 None
///
/// 落败的 future 直接丢弃，不会被主动取消。
pub async fn with_timeout<T, F, Tm>(timer: &Tm, duration: Duration, fut: F) -> Option<T>
where
    F: Future<Output = T>,
    Tm: Timer + ?Sized,
{
    let fut = Box::pin(fut);
    let delay = timer.sleep(duration);
    match select(fut, delay).await {
        Either::Left((value, _)) => Some(value),
        Either::Right(_) => None,
    }
}


#[cfg(test)]
mod tests {
    use super::mock::{InstantTimer, NeverTimer};
    use super::*;

    #[tokio::test]
    async fn test_ready_future_beats_never_timer() {
        let value = with_timeout(&NeverTimer, Duration::from_secs(8), async { 7 }).await;
        assert_eq!(value, Some(7));
    }

    #[tokio::test]
    async fn test_timer_wins_against_pending_future() {
        let value = with_timeout(
            &InstantTimer,
            Duration::from_secs(8),
            futures::future::pending::<u8>(),
        )
        .await;
        assert_eq!(value, None);
    }
}
