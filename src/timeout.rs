//! 调用上下文与超时协商。
//!
//! [`Context`] 携带可选的截止时间与取消信号，子上下文在父上下文取消时一并取消。
//! [`shrink`] 根据配置的默认超时推导单次调用实际使用的超时，且不会延长调用方的截止时间。

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// 调用上下文。克隆得到的是同一个上下文的句柄。
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    token: CancellationToken,
}

/// 取消派生出的上下文；调用 [`CancelFunc::cancel`] 或 drop 时生效。
#[derive(Debug, Default)]
#[must_use = "dropping a CancelFunc cancels the derived context immediately"]
pub struct CancelFunc {
    guard: Option<DropGuard>,
}

impl CancelFunc {
    /// 不做任何事的取消函数。
    pub fn noop() -> Self {
        Self { guard: None }
    }

    pub fn cancel(mut self) {
        self.guard.take();
    }
}

impl Context {
    /// 没有截止时间、永不取消的根上下文。
    pub fn background() -> Self {
        Self::default()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 上下文已结束的原因；仍然有效时返回 `None`。
    pub fn err(&self) -> Option<ContextError> {
        if self.token.is_cancelled() {
            return Some(ContextError::Canceled);
        }
        match self.deadline {
            Some(d) if d <= Instant::now() => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn with_cancel(&self) -> (Context, CancelFunc) {
        let token = self.token.child_token();
        let cancel = CancelFunc {
            guard: Some(token.clone().drop_guard()),
        };
        (
            Context {
                deadline: self.deadline,
                token,
            },
            cancel,
        )
    }

    /// 派生带截止时间的子上下文；父上下文的截止时间更早时沿用父上下文的。
    pub fn with_deadline(&self, deadline: Instant) -> (Context, CancelFunc) {
        let (mut ctx, cancel) = self.with_cancel();
        ctx.deadline = Some(match self.deadline {
            Some(d) if d < deadline => d,
            _ => deadline,
        });
        (ctx, cancel)
    }

    pub fn with_timeout(&self, timeout: Duration) -> (Context, CancelFunc) {
        self.with_deadline(Instant::now() + timeout)
    }

    /// 等待上下文结束（取消或到达截止时间）。
    pub async fn done(&self) -> ContextError {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => ContextError::Canceled,
            _ = sleep_until(self.deadline) => ContextError::DeadlineExceeded,
        }
    }

    /// 在上下文的约束下运行 `fut`。
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, ContextError> {
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            out = fut => Ok(out),
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(d) => tokio::time::sleep_until(d).await,
        None => std::future::pending().await,
    }
}

/// 推导单次调用的超时。
///
/// - `duration` 为 0：不启用超时，原样返回 `ctx`，有效时长为 0；
/// - `ctx` 的剩余时间小于 `duration`：原样返回 `ctx`，有效时长为剩余时间；
/// - 否则派生一个以 `duration` 为上限的子上下文。
///
/// 返回的 [`CancelFunc`] 必须持有到调用结束。
pub fn shrink(ctx: &Context, duration: Duration) -> (Duration, Context, CancelFunc) {
    if duration.is_zero() {
        return (Duration::ZERO, ctx.clone(), CancelFunc::noop());
    }
    if let Some(deadline) = ctx.deadline {
        let left = deadline.saturating_duration_since(Instant::now());
        if left < duration {
            return (left, ctx.clone(), CancelFunc::noop());
        }
    }
    let (ctx, cancel) = ctx.with_timeout(duration);
    (duration, ctx, cancel)
}
