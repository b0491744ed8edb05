//! 에러 타입 정의 모듈
//!
//! vextract에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! 추출된 값이 하나도 없는 경우는 에러가 아니라 [`crate::run::RunOutcome::NoMatches`]로 표현됩니다.

use std::path::PathBuf;
use thiserror::Error;

/// vextract에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum ExtractError {
    /// 입력 데이터 파일을 열 수 없음
    #[error("입력 데이터 파일을 열 수 없습니다 ({path}): {reason}")]
    InputUnavailable { path: PathBuf, reason: String },

    /// 출력 파일을 쓰기용으로 열 수 없음
    #[error("출력 파일을 열 수 없습니다 ({path}): {reason}")]
    OutputUnavailable { path: PathBuf, reason: String },

    /// 추출 요청이 불변 조건을 만족하지 않음
    #[error("잘못된 설정: {reason}")]
    InvalidConfiguration { reason: String },

    /// 입력을 연 뒤 읽는 도중 실패
    #[error("입력 읽기 실패: {reason}")]
    ReadFailed { reason: String },

    /// 출력 파일을 연 뒤 쓰는 도중 실패 (재시도하지 않음)
    #[error("파일 쓰기 실패 ({path}): {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// 이미 다른 백그라운드 작업이 진행 중
    #[error("이미 진행 중인 작업이 있습니다")]
    Busy,

    /// 작업 스레드 생성 실패
    #[error("작업 스레드 생성 실패: {reason}")]
    WorkerSpawn { reason: String },

    /// 작업 스레드가 패닉으로 종료됨
    #[error("작업 스레드가 비정상 종료되었습니다: {task}")]
    WorkerPanicked { task: &'static str },
}

impl ExtractError {
    /// 설정 오류 생성 헬퍼
    pub fn invalid(reason: impl Into<String>) -> Self {
        ExtractError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// vextract 결과 타입 별칭
pub type Result<T> = std::result::Result<T, ExtractError>;
