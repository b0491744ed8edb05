//! 출력 싱크 모듈
//!
//! 누적된 출력 바이트를 작업 스레드에서 파일로 그대로 씁니다.
//! 파일을 연 뒤의 쓰기 실패는 재시도하지 않으며, 출력 파일이 잘린 상태로 남을 수 있습니다.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::{ExtractError, Result};
use crate::task::{TaskHandle, TaskSlot};

/// 출력 싱크
#[derive(Debug, Clone)]
pub struct Sink {
    slot: TaskSlot,
}

impl Sink {
    /// 주어진 작업 슬롯을 사용하는 싱크 생성
    pub fn new(slot: TaskSlot) -> Self {
        Self { slot }
    }

    /// 출력 파일 쓰기 시작
    ///
    /// 출력 파일을 연 뒤 작업 스레드를 띄우고 바로 반환합니다.
    ///
    /// # Errors
    /// * `Busy` - 다른 작업이 진행 중
    /// * `OutputUnavailable` - 출력 파일을 쓰기용으로 열 수 없음
    pub fn write(&self, text: Vec<u8>, destination: &Path) -> Result<WriteHandle> {
        let guard = self.slot.acquire()?;
        let file = File::create(destination).map_err(|e| ExtractError::OutputUnavailable {
            path: destination.to_path_buf(),
            reason: e.to_string(),
        })?;

        let path = destination.to_path_buf();
        let worker_path = path.clone();
        let task = TaskHandle::spawn(guard, "write", move || {
            write_all(BufWriter::new(file), &text, &worker_path)
        })?;
        Ok(WriteHandle { task, path })
    }
}

/// 출력 바이트를 모두 쓰고 비움
///
/// `path`는 에러와 로그에 표시할 출력 경로입니다.
fn write_all<W: Write>(mut writer: W, text: &[u8], path: &Path) -> Result<u64> {
    let failed = |e: std::io::Error| ExtractError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    writer.write_all(text).map_err(failed)?;
    writer.flush().map_err(failed)?;

    let bytes = text.len() as u64;
    info!(output = %path.display(), bytes, "output written");
    Ok(bytes)
}

/// 진행 중인 쓰기 작업
#[derive(Debug)]
pub struct WriteHandle {
    task: TaskHandle<Result<u64>>,
    path: PathBuf,
}

impl WriteHandle {
    /// 완료 여부 (막히지 않음)
    pub fn is_complete(&self) -> bool {
        self.task.is_complete()
    }

    /// 출력 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 완료될 때까지 폴링하며 매 반복마다 `on_tick`을 호출
    pub fn wait_with(&self, interval: Duration, on_tick: impl FnMut()) {
        self.task.wait_with(interval, on_tick);
    }

    /// 쓴 바이트 수 반환
    ///
    /// `is_complete`가 `true`가 된 뒤에 호출해야 합니다.
    pub fn join(self) -> Result<u64> {
        self.task.join()?
    }
}
