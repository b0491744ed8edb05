//! 통계 및 유틸리티 모듈
//!
//! 작업 스레드와 공유하는 실행 통계 수집 및 포맷팅을 담당합니다.

use colored::Colorize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 실행 통계 구조체
///
/// 작업 스레드가 읽는 도중 갱신하고, 호출 스레드는 폴링하면서 진행 상황을 읽습니다.
#[derive(Debug, Default)]
pub struct Statistics {
    /// 읽은 줄 수
    pub lines_read: AtomicU64,
    /// 읽은 총 바이트
    pub bytes_read: AtomicU64,
    /// 접두사와 일치한 값 수 (범위 필터 적용 전)
    pub values_matched: AtomicU64,
    /// 출력 버퍼에 추가된 레코드 수
    pub records_extracted: AtomicU64,
    /// 쓴 총 바이트
    pub bytes_written: AtomicU64,
    /// 처리 시작 시간
    start_time: Option<Instant>,
}

impl Statistics {
    /// 새 통계 인스턴스 생성
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// 읽은 줄 하나 기록
    pub fn add_line(&self, bytes: u64) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    /// 일치한 값 수 갱신
    pub fn set_values_matched(&self, count: u64) {
        self.values_matched.store(count, Ordering::Relaxed);
    }

    /// 추출된 레코드 수 갱신
    pub fn set_records_extracted(&self, count: u64) {
        self.records_extracted.store(count, Ordering::Relaxed);
    }

    /// 쓴 바이트 추가
    pub fn add_bytes_written(&self, bytes: u64) {
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn get_lines_read(&self) -> u64 {
        self.lines_read.load(Ordering::Relaxed)
    }

    pub fn get_values_matched(&self) -> u64 {
        self.values_matched.load(Ordering::Relaxed)
    }

    pub fn get_records_extracted(&self) -> u64 {
        self.records_extracted.load(Ordering::Relaxed)
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// 처리 통계 요약 출력
    pub fn print_summary(&self) {
        let bytes_read = self.bytes_read.load(Ordering::Relaxed);
        let bytes_written = self.bytes_written.load(Ordering::Relaxed);
        let records = self.get_records_extracted();

        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 추출 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 읽은 줄:      {}",
            "📄".bright_cyan(),
            self.get_lines_read()
        );
        println!(
            "  {} 일치한 값:    {}",
            "🔍".bright_magenta(),
            self.get_values_matched()
        );

        if records > 0 {
            println!(
                "  {} 추출 레코드:  {}",
                "✅".bright_green(),
                records.to_string().green()
            );
        } else {
            println!(
                "  {} 추출 레코드:  {}",
                "⚠️".bright_yellow(),
                "0".yellow()
            );
        }

        println!(
            "  {} 입력 용량:    {}",
            "📥".bright_yellow(),
            format_bytes(bytes_read)
        );
        println!(
            "  {} 출력 용량:    {}",
            "📤".bright_magenta(),
            format_bytes(bytes_written)
        );
        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(self.elapsed())
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use vextract::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}시간 {}분", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}분 {}초", mins, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1073741824), "1.00 GB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5.000초");
        assert_eq!(format_duration(Duration::from_secs(65)), "1분 5초");
        assert_eq!(format_duration(Duration::from_secs(3665)), "1시간 1분");
    }

    #[test]
    fn test_statistics_counters() {
        let stats = Statistics::new();

        stats.add_line(4);
        stats.add_line(6);
        stats.set_values_matched(3);
        stats.set_values_matched(5);
        stats.set_records_extracted(2);
        stats.add_bytes_written(12);

        assert_eq!(stats.get_lines_read(), 2);
        assert_eq!(stats.bytes_read.load(Ordering::Relaxed), 10);
        assert_eq!(stats.get_values_matched(), 5);
        assert_eq!(stats.get_records_extracted(), 2);
        assert_eq!(stats.bytes_written.load(Ordering::Relaxed), 12);
    }
}
