//! 상태 메시지 모듈
//!
//! 사용자에게 보여 줄 타임스탬프 상태 메시지와 이를 받는 [`Reporter`]를 정의합니다.
//! 표시 방식은 호출자가 정하며, 모든 메시지는 `tracing`에도 같은 수준으로 기록됩니다.

use chrono::{Local, NaiveTime};
use std::sync::Mutex;
use tracing::{error, info, warn};

/// 상태 메시지 수준
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// 진행 중 메시지
    Progress,
    /// 성공 종료
    Finished,
    /// 추출된 값 없음 (에러 아님)
    NoValues,
    /// 에러 종료
    Error,
}

impl StatusLevel {
    /// 실행을 끝내는 메시지인지 확인
    pub fn is_terminal(self) -> bool {
        !matches!(self, StatusLevel::Progress)
    }
}

/// 타임스탬프가 붙은 상태 메시지
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub time: NaiveTime,
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    /// 현재 시각으로 메시지 생성
    pub fn new(level: StatusLevel, text: impl Into<String>) -> Self {
        Self::at(Local::now().time(), level, text)
    }

    /// 주어진 시각으로 메시지 생성
    pub fn at(time: NaiveTime, level: StatusLevel, text: impl Into<String>) -> Self {
        Self {
            time,
            level,
            text: text.into(),
        }
    }
}

/// `hh:mm:ss,mmm:<내용>` 형식
impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.time.format("%H:%M:%S,%3f"), self.text)
    }
}

/// 상태 메시지를 받는 쪽
pub trait Reporter {
    fn report(&self, message: StatusMessage);
}

/// 메시지를 만들어 로그에 남기고 `reporter`에 전달
pub fn emit(reporter: &dyn Reporter, level: StatusLevel, text: impl Into<String>) {
    let message = StatusMessage::new(level, text);
    match level {
        StatusLevel::Progress | StatusLevel::Finished => info!(status = %message.text),
        StatusLevel::NoValues => warn!(status = %message.text),
        StatusLevel::Error => error!(status = %message.text),
    }
    reporter.report(message);
}

/// 메시지를 메모리에 모아 두는 리포터
#[derive(Debug, Default)]
pub struct StatusLog {
    messages: Mutex<Vec<StatusMessage>>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 받은 메시지
    pub fn messages(&self) -> Vec<StatusMessage> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 지금까지 받은 메시지 내용만
    pub fn texts(&self) -> Vec<String> {
        self.messages().into_iter().map(|m| m.text).collect()
    }
}

impl Reporter for StatusLog {
    fn report(&self, message: StatusMessage) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_format() {
        let time = NaiveTime::from_hms_milli_opt(9, 5, 3, 42).unwrap();
        let message = StatusMessage::at(time, StatusLevel::Progress, "읽는 중...");
        assert_eq!(message.to_string(), "09:05:03,042:읽는 중...");
    }

    #[test]
    fn test_terminal_levels() {
        assert!(!StatusLevel::Progress.is_terminal());
        assert!(StatusLevel::Finished.is_terminal());
        assert!(StatusLevel::NoValues.is_terminal());
        assert!(StatusLevel::Error.is_terminal());
    }

    #[test]
    fn test_status_log_collects() {
        let log = StatusLog::new();
        emit(&log, StatusLevel::Progress, "첫 번째");
        emit(&log, StatusLevel::Finished, "두 번째");

        assert_eq!(log.texts(), vec!["첫 번째", "두 번째"]);
        assert_eq!(log.messages()[1].level, StatusLevel::Finished);
    }
}
