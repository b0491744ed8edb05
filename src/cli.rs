//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::error::{ExtractError, Result};
use crate::input::DEFAULT_MMAP_THRESHOLD;
use crate::locale::DecimalMark;
use crate::request::{default_output_path, Delimiter, ExtractionRequest, ModeKind, RecordRange};

/// vextract CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "vextract",
    author = "YourName <your@email.com>",
    version,
    about = "VALUE EXTRACTOR - 줄 단위 텍스트 파일에서 값을 추출하여 구분자 형식 표로 저장하는 CLI 도구",
    long_about = r#"
VALUE EXTRACTOR
===============

입력 데이터 파일에서 지정한 접두사로 시작하는 줄을 찾아
값을 잘라낸 뒤 구분자로 나눈 표 형식(CRLF 줄 끝)으로 저장합니다.

모드:
  single  접두사 하나, "<번호><구분자><값>" 출력
  pair    접두사 두 개, "{" ... "}" 블록 안에서 "<값1><구분자><값2>" 출력

예제:
  vextract -i data.txt -1 "T="
  vextract -i data.txt -m pair -1 "X=" -2 "Y=" -d semicolon
  vextract -i data.txt -1 "T=" --start 10 --stop 20 --decimal point
"#
)]
pub struct Args {
    /// 입력 데이터 파일 경로
    #[arg(short, long)]
    pub input: PathBuf,

    /// 출력 파일 경로 (기본값: <입력>_<접두사>.txt)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 추출 모드
    #[arg(short, long, value_enum, default_value_t = ModeKind::Single)]
    pub mode: ModeKind,

    /// 첫 번째 값 접두사
    #[arg(short = '1', long = "first")]
    pub first: String,

    /// 두 번째 값 접두사 (pair 모드에서 필수)
    #[arg(short = '2', long = "second")]
    pub second: Option<String>,

    /// 출력 필드 구분자
    #[arg(short, long, value_enum, default_value_t = Delimiter::Tab)]
    pub delimiter: Delimiter,

    /// 소수점 표기
    #[arg(long, value_enum, default_value_t = DecimalMark::Comma)]
    pub decimal: DecimalMark,

    /// 추출 범위 시작 번호 (1부터)
    #[arg(long)]
    pub start: Option<u64>,

    /// 추출 범위 끝 번호 (0이면 끝까지)
    #[arg(long)]
    pub stop: Option<u64>,

    /// 이 크기(바이트) 이상인 입력은 메모리 매핑
    #[arg(long, default_value_t = DEFAULT_MMAP_THRESHOLD)]
    pub mmap_threshold: u64,

    /// 상세 로그 (-v: info, -vv: debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// 상태 메시지만 출력 (요약/헤더 생략)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// 로그 수준
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// 추출 범위 (범위 옵션이 없으면 전체)
    pub fn get_range(&self) -> Result<RecordRange> {
        if self.start.is_none() && self.stop.is_none() {
            return Ok(RecordRange::unbounded());
        }
        RecordRange::new(self.start.unwrap_or(1), self.stop)
    }

    /// 인자를 검사하여 추출 요청 생성
    pub fn to_request(&self) -> Result<ExtractionRequest> {
        if self.input.as_os_str().is_empty() {
            return Err(ExtractError::invalid("입력 데이터 파일이 선택되지 않았습니다"));
        }

        let request = match self.mode {
            ModeKind::Single => ExtractionRequest::single(self.first.as_str()),
            ModeKind::Pair => {
                let second = self.second.as_deref().unwrap_or_default();
                ExtractionRequest::pair(self.first.as_str(), second)
            }
        }
        .with_delimiter(self.delimiter)
        .with_decimal(self.decimal)
        .with_range(self.get_range()?);

        request.validate()?;
        Ok(request)
    }

    /// 출력 파일 경로 (지정하지 않으면 입력 경로로부터 생성)
    pub fn get_output(&self, request: &ExtractionRequest) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input, request.mode()))
    }
}
