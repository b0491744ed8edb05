//! 추출 실행 모듈
//!
//! 읽기 → 결과 보고 → 쓰기로 이어지는 한 번의 실행 전체를 담당합니다.
//! 각 단계는 작업 스레드에서 실행되고 호출 스레드는 완료를 폴링합니다.
//! 모든 종료 상태(성공, 값 없음, 각 에러)는 정확히 하나의 종료 메시지를 남깁니다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::coordinator::{ExtractionCoordinator, ExtractionHandle};
use crate::error::{ExtractError, Result};
use crate::request::ExtractionRequest;
use crate::stats::Statistics;
use crate::status::{emit, Reporter, StatusLevel};

/// 실행 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// 출력 파일 저장 완료
    Written {
        /// 일치한 값 수
        count: u64,
        /// 저장된 레코드 수
        records: u64,
        /// 쓴 바이트 수
        bytes: u64,
        /// 출력 파일 경로
        output: PathBuf,
    },
    /// 추출된 값이 없어 출력 파일을 만들지 않음
    NoMatches {
        /// 일치한 값 수 (범위 밖 일치만 있었으면 0보다 클 수 있음)
        count: u64,
    },
}

/// 실행 결과와 통계
#[derive(Debug)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub stats: Arc<Statistics>,
}

/// 추출 실행
///
/// # Arguments
/// * `coordinator` - 작업 스레드를 관리하는 조정자
/// * `request` - 추출 요청
/// * `input` - 입력 데이터 파일 경로
/// * `output` - 출력 파일 경로
/// * `reporter` - 상태 메시지를 받을 리포터
/// * `on_tick` - 폴링할 때마다 호출되는 콜백 (진행 표시 등)
pub fn run_extraction(
    coordinator: &ExtractionCoordinator,
    request: ExtractionRequest,
    input: &Path,
    output: &Path,
    reporter: &dyn Reporter,
    mut on_tick: impl FnMut(&Statistics),
) -> Result<RunSummary> {
    let started = coordinator.start(request, input);
    run_started(coordinator, started, output, reporter, &mut on_tick)
}

/// 시작된 읽기 작업부터 실행을 이어가고, 실패하면 에러 메시지를 하나 남김
fn run_started(
    coordinator: &ExtractionCoordinator,
    started: Result<ExtractionHandle>,
    output: &Path,
    reporter: &dyn Reporter,
    on_tick: &mut dyn FnMut(&Statistics),
) -> Result<RunSummary> {
    let result = run_inner(coordinator, started, output, reporter, on_tick);
    if let Err(ref e) = result {
        emit(reporter, StatusLevel::Error, failure_text(e));
    }
    result
}

fn run_inner(
    coordinator: &ExtractionCoordinator,
    started: Result<ExtractionHandle>,
    output: &Path,
    reporter: &dyn Reporter,
    on_tick: &mut dyn FnMut(&Statistics),
) -> Result<RunSummary> {
    let interval = coordinator.poll_interval();

    // 읽기
    let handle = started?;
    emit(reporter, StatusLevel::Progress, "입력 데이터 파일 읽는 중...");
    handle.wait_with(interval, |stats| on_tick(stats));
    let stats = Arc::clone(handle.stats());
    let extraction = handle.join()?;

    if extraction.is_empty() {
        emit(reporter, StatusLevel::NoValues, "읽은 값이 없습니다!");
        return Ok(RunSummary {
            outcome: RunOutcome::NoMatches {
                count: extraction.count,
            },
            stats,
        });
    }

    emit(
        reporter,
        StatusLevel::Progress,
        format!("데이터 파일 읽기 완료, {}개 값 추출됨.", extraction.count),
    );

    // 쓰기
    let count = extraction.count;
    let records = extraction.records;
    let handle = coordinator.sink().write(extraction.text, output)?;
    emit(reporter, StatusLevel::Progress, "출력 파일에 쓰는 중...");
    handle.wait_with(interval, || on_tick(stats.as_ref()));
    let bytes = handle.join()?;
    stats.add_bytes_written(bytes);
    emit(reporter, StatusLevel::Progress, "출력 파일에 값 저장 완료.");

    emit(reporter, StatusLevel::Finished, "추출 완료 :)");
    Ok(RunSummary {
        outcome: RunOutcome::Written {
            count,
            records,
            bytes,
            output: output.to_path_buf(),
        },
        stats,
    })
}

/// 에러의 사용자용 종료 메시지
pub fn failure_text(error: &ExtractError) -> String {
    match error {
        ExtractError::InvalidConfiguration { reason } => {
            format!("중단됨, 잘못된 사용자 입력: {}", reason)
        }
        other => format!("오류: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusLog;
    use std::io::{BufReader, Cursor, Read};
    use tempfile::TempDir;

    /// 앞부분을 읽은 뒤 장치 에러를 내는 입력
    struct BrokenTail;

    impl Read for BrokenTail {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "device error"))
        }
    }

    #[test]
    fn test_failure_text() {
        let invalid = ExtractError::invalid("값이 지정되지 않았습니다");
        assert_eq!(
            failure_text(&invalid),
            "중단됨, 잘못된 사용자 입력: 값이 지정되지 않았습니다"
        );

        let missing = ExtractError::InputUnavailable {
            path: PathBuf::from("in.txt"),
            reason: "없음".to_string(),
        };
        assert!(failure_text(&missing).starts_with("오류: 입력 데이터 파일을 열 수 없습니다"));
    }

    #[test]
    fn test_invalid_request_reports_once() {
        let log = StatusLog::new();
        let result = run_extraction(
            &ExtractionCoordinator::new(),
            ExtractionRequest::pair("X=", ""),
            Path::new("in.txt"),
            Path::new("out.txt"),
            &log,
            |_| {},
        );

        assert!(result.is_err());
        let messages = log.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].level, StatusLevel::Error);
    }

    #[test]
    fn test_read_failure_reports_once() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.txt");
        let log = StatusLog::new();
        let coordinator = ExtractionCoordinator::new();

        let input = BufReader::new(Cursor::new("A:1\nA:2\n").chain(BrokenTail));
        let started = coordinator.start_reader(ExtractionRequest::single("A:"), input);
        let mut on_tick = |_: &Statistics| {};
        let result = run_started(&coordinator, started, &output, &log, &mut on_tick);

        assert!(matches!(result, Err(ExtractError::ReadFailed { .. })));
        assert!(!output.exists());
        let messages = log.messages();
        let errors: Vec<_> = messages
            .iter()
            .filter(|m| m.level == StatusLevel::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].text.contains("device error"));
        assert_eq!(messages.iter().filter(|m| m.level.is_terminal()).count(), 1);
        assert_eq!(messages.last().map(|m| m.level), Some(StatusLevel::Error));
    }

    #[test]
    fn test_non_utf8_values_written_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("data.txt");
        let output = temp_dir.path().join("data_T=.txt");
        std::fs::write(&input, b"T=5\xb5g\n").unwrap();
        let log = StatusLog::new();

        let request = ExtractionRequest::single("T=").with_decimal(crate::DecimalMark::Point);
        run_extraction(
            &ExtractionCoordinator::new(),
            request,
            &input,
            &output,
            &log,
            |_| {},
        )
        .unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"0\t5\xb5g\r\n");
    }
}
