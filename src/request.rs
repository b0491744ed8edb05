//! 추출 요청 모듈
//!
//! 한 번의 추출 실행에 필요한 불변 설정(모드, 접두사, 구분자, 소수점 표기, 범위)을 정의합니다.

use clap::ValueEnum;
use std::path::{Path, PathBuf};

use crate::error::{ExtractError, Result};
use crate::locale::DecimalMark;

/// 출력 필드 구분자
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Delimiter {
    /// 탭 문자
    #[default]
    Tab,
    /// 세미콜론 `;`
    Semicolon,
    /// 쉼표 `,`
    Comma,
    /// 공백 한 칸
    Space,
}

impl Delimiter {
    /// 실제로 출력되는 구분자 문자열
    pub fn as_str(self) -> &'static str {
        match self {
            Delimiter::Tab => "\t",
            Delimiter::Semicolon => ";",
            Delimiter::Comma => ",",
            Delimiter::Space => " ",
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delimiter::Tab => write!(f, "탭"),
            Delimiter::Semicolon => write!(f, "; (세미콜론)"),
            Delimiter::Comma => write!(f, ", (쉼표)"),
            Delimiter::Space => write!(f, "공백"),
        }
    }
}

/// CLI에서 고르는 추출 모드 종류
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum ModeKind {
    /// 값 하나 (번호와 값 출력)
    #[default]
    Single,
    /// 값 두 개 (`{` ... `}` 블록 안에서 짝지음)
    Pair,
}

/// 추출 모드와 접두사
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionMode {
    /// 접두사 하나로 값을 추출
    SingleValue { prefix: String },
    /// 두 접두사의 값을 한 레코드로 짝지어 추출
    PairValue { first: String, second: String },
}

impl ExtractionMode {
    /// 모드 종류
    pub fn kind(&self) -> ModeKind {
        match self {
            ExtractionMode::SingleValue { .. } => ModeKind::Single,
            ExtractionMode::PairValue { .. } => ModeKind::Pair,
        }
    }

    /// 기본 출력 파일 이름에 붙는 접두사
    ///
    /// 값 하나 모드는 첫 번째 접두사, 값 두 개 모드는 두 번째 접두사를 사용합니다.
    pub fn output_tag(&self) -> &str {
        match self {
            ExtractionMode::SingleValue { prefix } => prefix,
            ExtractionMode::PairValue { second, .. } => second,
        }
    }
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionMode::SingleValue { prefix } => write!(f, "값 하나 [{}]", prefix),
            ExtractionMode::PairValue { first, second } => {
                write!(f, "값 두 개 [{}] [{}]", first, second)
            }
        }
    }
}

/// 1부터 시작하는 포함 범위 `[start, stop]`
///
/// `stop`이 `None`이면 상한이 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordRange {
    start: u64,
    stop: Option<u64>,
}

impl Default for RecordRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl RecordRange {
    /// 전체 범위 (`[1, ∞)`)
    pub fn unbounded() -> Self {
        Self {
            start: 1,
            stop: None,
        }
    }

    /// 범위 생성
    ///
    /// `stop == Some(0)`은 상한 없음으로 정규화됩니다.
    ///
    /// # Examples
    /// ```
    /// use vextract::request::RecordRange;
    ///
    /// let range = RecordRange::new(2, Some(0)).unwrap();
    /// assert_eq!(range.stop(), None);
    /// assert!(RecordRange::new(0, None).is_err());
    /// assert!(RecordRange::new(5, Some(3)).is_err());
    /// ```
    pub fn new(start: u64, stop: Option<u64>) -> Result<Self> {
        if start == 0 {
            return Err(ExtractError::invalid("시작 번호는 1 이상이어야 합니다"));
        }
        let stop = stop.filter(|&s| s != 0);
        if let Some(stop) = stop {
            if stop < start {
                return Err(ExtractError::invalid(format!(
                    "끝 번호({})가 시작 번호({})보다 작습니다",
                    stop, start
                )));
            }
        }
        Ok(Self { start, stop })
    }

    /// 시작 번호
    pub fn start(&self) -> u64 {
        self.start
    }

    /// 끝 번호 (상한이 없으면 `None`)
    pub fn stop(&self) -> Option<u64> {
        self.stop
    }

    /// `ordinal`번째 일치가 범위 안에 있는지 확인
    pub fn contains(&self, ordinal: u64) -> bool {
        ordinal >= self.start && self.stop.map_or(true, |stop| ordinal <= stop)
    }

    /// 범위 안에서의 0부터 시작하는 위치
    pub fn offset(&self, ordinal: u64) -> Option<u64> {
        self.contains(ordinal).then(|| ordinal - self.start)
    }

    /// 더 이상 읽을 필요가 없는지 확인
    pub fn is_exhausted(&self, ordinal: u64) -> bool {
        self.stop.map_or(false, |stop| ordinal >= stop)
    }
}

impl std::fmt::Display for RecordRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stop {
            Some(stop) => write!(f, "{} ~ {}", self.start, stop),
            None => write!(f, "{} ~ 끝", self.start),
        }
    }
}

/// 한 번의 추출 실행 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    mode: ExtractionMode,
    delimiter: Delimiter,
    decimal: DecimalMark,
    range: RecordRange,
}

impl ExtractionRequest {
    /// 값 하나 모드 요청 생성
    pub fn single(prefix: impl Into<String>) -> Self {
        Self::with_mode(ExtractionMode::SingleValue {
            prefix: prefix.into(),
        })
    }

    /// 값 두 개 모드 요청 생성
    pub fn pair(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::with_mode(ExtractionMode::PairValue {
            first: first.into(),
            second: second.into(),
        })
    }

    fn with_mode(mode: ExtractionMode) -> Self {
        Self {
            mode,
            delimiter: Delimiter::default(),
            decimal: DecimalMark::default(),
            range: RecordRange::default(),
        }
    }

    /// 구분자 설정
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// 소수점 표기 설정
    pub fn with_decimal(mut self, decimal: DecimalMark) -> Self {
        self.decimal = decimal;
        self
    }

    /// 범위 설정
    pub fn with_range(mut self, range: RecordRange) -> Self {
        self.range = range;
        self
    }

    pub fn mode(&self) -> &ExtractionMode {
        &self.mode
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn decimal(&self) -> DecimalMark {
        self.decimal
    }

    pub fn range(&self) -> RecordRange {
        self.range
    }

    /// 요청의 불변 조건 검사
    ///
    /// 접두사가 비어 있으면 `InvalidConfiguration`을 반환합니다.
    pub fn validate(&self) -> Result<()> {
        match &self.mode {
            ExtractionMode::SingleValue { prefix } => {
                if prefix.is_empty() {
                    return Err(ExtractError::invalid("값이 지정되지 않았습니다"));
                }
            }
            ExtractionMode::PairValue { first, second } => {
                if first.is_empty() {
                    return Err(ExtractError::invalid("값이 지정되지 않았습니다"));
                }
                if second.is_empty() {
                    return Err(ExtractError::invalid("두 번째 값이 지정되지 않았습니다"));
                }
            }
        }
        Ok(())
    }
}

/// 입력 파일 경로로부터 기본 출력 파일 경로를 만듦
///
/// 끝의 `.txt`를 떼고 `_<접두사>.txt`를 붙입니다. 접두사 안의 경로 구분자는 `_`로 바꿉니다.
///
/// # Examples
/// ```
/// use std::path::{Path, PathBuf};
/// use vextract::request::{default_output_path, ExtractionMode};
///
/// let mode = ExtractionMode::SingleValue { prefix: "T=".to_string() };
/// assert_eq!(
///     default_output_path(Path::new("data/log.txt"), &mode),
///     PathBuf::from("data/log_T=.txt")
/// );
/// ```
pub fn default_output_path(input: &Path, mode: &ExtractionMode) -> PathBuf {
    let raw = input.to_string_lossy().into_owned();
    let stem = raw.strip_suffix(".txt").unwrap_or(&raw);
    let tag = mode.output_tag().replace(['/', '\\'], "_");
    PathBuf::from(format!("{}_{}.txt", stem, tag))
}
