//! 백그라운드 작업 모듈
//!
//! 작업 스레드 하나에서 실행되는 작업과, 호출 스레드가 막히지 않고 폴링하는 완료 신호를 정의합니다.
//! 한 [`TaskSlot`]에서는 동시에 하나의 작업만 실행될 수 있으며 취소 기능은 없습니다.
//! 슬롯 점유는 작업 스레드가 쥐고 있으므로, 핸들을 버려도 작업이 끝나기 전에는 슬롯이 비지 않습니다.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ExtractError, Result};

/// 호출 스레드가 폴링할 때 기본 대기 간격
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// 작업 완료 신호
///
/// 작업 스레드가 한 번만 `false → true`로 바꾸고, 호출 스레드는 읽기만 합니다.
#[derive(Debug, Clone, Default)]
pub struct CompletionSignal(Arc<AtomicBool>);

impl CompletionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// 완료 표시 (작업 스레드 전용)
    fn complete(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// 완료 여부 (막히지 않음)
    pub fn is_complete(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// 작업 스레드가 끝날 때(패닉 포함) 완료 신호를 보냄
struct CompleteOnDrop(CompletionSignal);

impl Drop for CompleteOnDrop {
    fn drop(&mut self) {
        self.0.complete();
    }
}

/// 동시에 하나의 작업만 허용하는 슬롯
#[derive(Debug, Clone, Default)]
pub struct TaskSlot {
    busy: Arc<AtomicBool>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 슬롯 점유, 이미 사용 중이면 `Busy`
    pub fn acquire(&self) -> Result<SlotGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExtractError::Busy)?;
        Ok(SlotGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    /// 작업이 진행 중인지 확인
    #[cfg(test)]
    pub(crate) fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// 슬롯 점유 표시, 해제 시 슬롯이 비워짐
#[derive(Debug)]
pub struct SlotGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// 실행 중인 백그라운드 작업
#[derive(Debug)]
pub struct TaskHandle<T> {
    name: &'static str,
    signal: CompletionSignal,
    worker: JoinHandle<T>,
}

impl<T: Send + 'static> TaskHandle<T> {
    /// 작업 스레드를 띄우고 바로 반환
    ///
    /// # Arguments
    /// * `guard` - 작업 스레드가 작업이 끝날 때까지 쥐고 있을 슬롯 점유 표시
    /// * `name` - 스레드 이름과 로그에 쓰이는 작업 이름
    /// * `work` - 작업 스레드에서 실행할 작업
    pub fn spawn<F>(guard: SlotGuard, name: &'static str, work: F) -> Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let signal = CompletionSignal::new();
        let worker_signal = signal.clone();

        let worker = thread::Builder::new()
            .name(format!("vextract-{}", name))
            .spawn(move || {
                // 슬롯이 완료 신호보다 먼저 비워지도록 나중에 선언
                let _done = CompleteOnDrop(worker_signal);
                let _slot = guard;
                work()
            })
            .map_err(|e| ExtractError::WorkerSpawn {
                reason: e.to_string(),
            })?;

        debug!(task = name, "worker spawned");
        Ok(Self {
            name,
            signal,
            worker,
        })
    }
}

impl<T> TaskHandle<T> {
    /// 완료 여부 (막히지 않음)
    pub fn is_complete(&self) -> bool {
        self.signal.is_complete()
    }

    /// 완료될 때까지 폴링하며 매 반복마다 `on_tick`을 호출
    ///
    /// 호출 스레드가 다른 일을 처리할 수 있도록 막지 않고 양보합니다.
    pub fn wait_with(&self, interval: Duration, mut on_tick: impl FnMut()) {
        while !self.is_complete() {
            on_tick();
            thread::sleep(interval);
        }
    }

    /// 작업 결과를 받음
    ///
    /// 작업 스레드가 끝날 때까지 막히므로 `is_complete`가 `true`가 된 뒤에 호출합니다.
    pub fn join(self) -> Result<T> {
        let name = self.name;
        self.worker.join().map_err(|_| {
            warn!(task = name, "worker panicked");
            ExtractError::WorkerPanicked { task: name }
        })
    }
}
