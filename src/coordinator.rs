//! 추출 조정 모듈
//!
//! 추출기 하나를 작업 스레드에서 실행하고, 호출 스레드가 완료를 폴링한 뒤 결과를 받도록 합니다.
//! 같은 조정자에서 만든 [`Sink`]와 작업 슬롯을 공유하므로 읽기와 쓰기는 겹치지 않습니다.

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::error::Result;
use crate::extractor::{extract_from_reader, Extraction};
use crate::input::{open_input, DEFAULT_MMAP_THRESHOLD};
use crate::request::ExtractionRequest;
use crate::sink::Sink;
use crate::stats::Statistics;
use crate::task::{SlotGuard, TaskHandle, TaskSlot, DEFAULT_POLL_INTERVAL};

/// 추출 조정자
#[derive(Debug, Clone)]
pub struct ExtractionCoordinator {
    slot: TaskSlot,
    mmap_threshold: u64,
    poll_interval: Duration,
}

impl Default for ExtractionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionCoordinator {
    /// 기본 설정으로 생성
    pub fn new() -> Self {
        Self {
            slot: TaskSlot::new(),
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// 메모리 매핑 임계값 설정
    pub fn with_mmap_threshold(mut self, mmap_threshold: u64) -> Self {
        self.mmap_threshold = mmap_threshold;
        self
    }

    /// 완료 폴링 간격 설정
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// 같은 작업 슬롯을 공유하는 출력 싱크
    pub fn sink(&self) -> Sink {
        Sink::new(self.slot.clone())
    }

    /// 입력 파일에 대해 추출 시작
    ///
    /// 요청을 검사하고 입력 파일을 연 뒤 작업 스레드를 띄우고 바로 반환합니다.
    ///
    /// # Errors
    /// * `InvalidConfiguration` - 요청이 불변 조건을 만족하지 않음
    /// * `Busy` - 다른 작업이 진행 중
    /// * `InputUnavailable` - 입력 파일을 열 수 없음
    pub fn start(&self, request: ExtractionRequest, input: &Path) -> Result<ExtractionHandle> {
        request.validate()?;
        let guard = self.slot.acquire()?;
        let source = open_input(input, self.mmap_threshold)?;
        info!(input = %input.display(), mode = %request.mode(), "reading input");
        Self::spawn(guard, request, source)
    }

    /// 임의의 줄 소스에 대해 추출 시작
    pub fn start_reader<R>(&self, request: ExtractionRequest, reader: R) -> Result<ExtractionHandle>
    where
        R: BufRead + Send + 'static,
    {
        request.validate()?;
        let guard = self.slot.acquire()?;
        Self::spawn(guard, request, reader)
    }

    fn spawn<R>(guard: SlotGuard, request: ExtractionRequest, reader: R) -> Result<ExtractionHandle>
    where
        R: BufRead + Send + 'static,
    {
        let stats = Arc::new(Statistics::new());
        let worker_stats = Arc::clone(&stats);
        let task = TaskHandle::spawn(guard, "extract", move || {
            extract_from_reader(&request, reader, &worker_stats)
        })?;
        Ok(ExtractionHandle { task, stats })
    }
}

/// 진행 중인 추출 작업
#[derive(Debug)]
pub struct ExtractionHandle {
    task: TaskHandle<Result<Extraction>>,
    stats: Arc<Statistics>,
}

impl ExtractionHandle {
    /// 완료 여부 (막히지 않음)
    pub fn is_complete(&self) -> bool {
        self.task.is_complete()
    }

    /// 작업 스레드가 갱신하는 진행 통계
    pub fn stats(&self) -> &Arc<Statistics> {
        &self.stats
    }

    /// 완료될 때까지 폴링하며 매 반복마다 `on_tick`에 진행 통계를 전달
    pub fn wait_with(&self, interval: Duration, mut on_tick: impl FnMut(&Statistics)) {
        self.task.wait_with(interval, || on_tick(&self.stats));
    }

    /// 추출 결과 반환
    ///
    /// `is_complete`가 `true`가 된 뒤에 호출해야 합니다.
    pub fn join(self) -> Result<Extraction> {
        self.task.join()?
    }
}
