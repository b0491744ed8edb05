//! 값 추출 모듈
//!
//! 줄 단위 입력을 받아 출력 레코드를 만드는 두 가지 상태 기계를 정의합니다.
//!
//! - [`SingleFieldExtractor`]: 접두사 하나, `<번호><구분자><값>` 출력
//! - [`PairFieldExtractor`]: 접두사 두 개, `{` ... `}` 블록 안에서 `<값1><구분자><값2>` 출력
//!
//! 범위 필터링과 버퍼 추가는 두 모드가 [`RecordBuffer`]를 공유합니다.
//! 줄과 값은 바이트 그대로 다루며, 소수점 변환 외에는 입력 바이트를 바꾸지 않습니다.

use std::io::BufRead;
use tracing::{debug, info};

use crate::classifier::PrefixMatcher;
use crate::error::{ExtractError, Result};
use crate::input::LineReader;
use crate::locale::DecimalMark;
use crate::request::{Delimiter, ExtractionMode, ExtractionRequest, RecordRange};
use crate::stats::Statistics;

/// 출력 레코드 줄 끝 (플랫폼과 무관)
pub const LINE_ENDING: &[u8] = b"\r\n";

/// 레코드 시작 표시 줄
pub const OPEN_MARKER: &[u8] = b"{";

/// 레코드 끝 표시 줄
pub const CLOSE_MARKER: &[u8] = b"}";

/// 추출 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// 누적된 출력 바이트
    pub text: Vec<u8>,
    /// 일치한 값 수 (범위 필터 적용 전)
    pub count: u64,
    /// 출력에 들어간 레코드 수
    pub records: u64,
}

impl Extraction {
    /// 추출된 값이 없는지 확인
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// 한 줄을 처리한 뒤 계속 읽을지 여부
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// 줄 단위 추출기 공통 인터페이스
pub trait Extractor {
    /// 한 줄 처리
    fn consume(&mut self, line: &[u8]) -> Flow;

    /// 지금까지 일치한 값 수
    fn matched(&self) -> u64;

    /// 추출 종료 후 결과 반환
    fn finish(self) -> Extraction;
}

/// 범위 필터링을 적용하며 출력 바이트를 누적하는 버퍼
#[derive(Debug)]
pub struct RecordBuffer {
    text: Vec<u8>,
    matched: u64,
    records: u64,
    range: RecordRange,
    delimiter: Delimiter,
    decimal: DecimalMark,
}

impl RecordBuffer {
    pub fn new(range: RecordRange, delimiter: Delimiter, decimal: DecimalMark) -> Self {
        Self {
            text: Vec::new(),
            matched: 0,
            records: 0,
            range,
            delimiter,
            decimal,
        }
    }

    /// 요청 설정으로 버퍼 생성
    pub fn for_request(request: &ExtractionRequest) -> Self {
        Self::new(request.range(), request.delimiter(), request.decimal())
    }

    /// 일치 하나를 세고, 범위 안이면 범위 내 0 기반 위치를 반환
    pub fn next_match(&mut self) -> Option<u64> {
        self.matched += 1;
        self.range.offset(self.matched)
    }

    /// `<번호><구분자><값>` 레코드 추가
    pub fn push_indexed(&mut self, index: u64, value: &[u8]) {
        self.text.extend_from_slice(index.to_string().as_bytes());
        self.text.extend_from_slice(self.delimiter.as_str().as_bytes());
        self.push_value(value);
        self.end_record();
    }

    /// `<값1><구분자><값2>` 레코드 추가
    pub fn push_pair(&mut self, first: &[u8], second: &[u8]) {
        self.push_value(first);
        self.text.extend_from_slice(self.delimiter.as_str().as_bytes());
        self.push_value(second);
        self.end_record();
    }

    fn push_value(&mut self, value: &[u8]) {
        let value = self.decimal.apply(value);
        self.text.extend_from_slice(&value);
    }

    fn end_record(&mut self) {
        self.text.extend_from_slice(LINE_ENDING);
        self.records += 1;
    }

    /// 범위 끝에 도달했으면 `Stop`
    pub fn flow(&self) -> Flow {
        if self.range.is_exhausted(self.matched) {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    pub fn matched(&self) -> u64 {
        self.matched
    }

    pub fn into_extraction(self) -> Extraction {
        Extraction {
            text: self.text,
            count: self.matched,
            records: self.records,
        }
    }
}

/// 값 하나 모드 추출기
#[derive(Debug)]
pub struct SingleFieldExtractor {
    prefix: PrefixMatcher,
    buffer: RecordBuffer,
}

impl SingleFieldExtractor {
    pub fn new(prefix: PrefixMatcher, buffer: RecordBuffer) -> Self {
        Self { prefix, buffer }
    }
}

impl Extractor for SingleFieldExtractor {
    fn consume(&mut self, line: &[u8]) -> Flow {
        let Some(value) = self.prefix.extract(line) else {
            return Flow::Continue;
        };
        if let Some(index) = self.buffer.next_match() {
            self.buffer.push_indexed(index, value);
        }
        self.buffer.flow()
    }

    fn matched(&self) -> u64 {
        self.buffer.matched()
    }

    fn finish(self) -> Extraction {
        self.buffer.into_extraction()
    }
}

/// 아직 짝이 맞지 않은 두 값
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct PendingRecord {
    first: Vec<u8>,
    second: Vec<u8>,
}

impl PendingRecord {
    fn clear(&mut self) {
        self.first.clear();
        self.second.clear();
    }

    fn is_complete(&self) -> bool {
        !self.first.is_empty() && !self.second.is_empty()
    }

    /// 두 값을 꺼내고 비움
    fn take(&mut self) -> (Vec<u8>, Vec<u8>) {
        (
            std::mem::take(&mut self.first),
            std::mem::take(&mut self.second),
        )
    }
}

/// 값 두 개 모드 추출기
///
/// 한 줄에 대해 다음 검사를 순서대로 모두 적용합니다.
/// 1. `{` 이면 대기 값을 비움
/// 2. 첫 번째 접두사와 일치하면 첫 번째 값을 덮어씀
/// 3. 두 번째 접두사와 일치하면 두 번째 값을 덮어씀
/// 4. `}` 이면 대기 값을 비움
/// 5. 두 값이 모두 비어 있지 않으면 레코드 하나를 완성하고 대기 값을 비움
#[derive(Debug)]
pub struct PairFieldExtractor {
    first: PrefixMatcher,
    second: PrefixMatcher,
    pending: PendingRecord,
    buffer: RecordBuffer,
}

impl PairFieldExtractor {
    pub fn new(first: PrefixMatcher, second: PrefixMatcher, buffer: RecordBuffer) -> Self {
        Self {
            first,
            second,
            pending: PendingRecord::default(),
            buffer,
        }
    }
}

impl Extractor for PairFieldExtractor {
    fn consume(&mut self, line: &[u8]) -> Flow {
        if line == OPEN_MARKER {
            self.pending.clear();
        }
        if let Some(value) = self.first.extract(line) {
            self.pending.first.clear();
            self.pending.first.extend_from_slice(value);
        }
        if let Some(value) = self.second.extract(line) {
            self.pending.second.clear();
            self.pending.second.extend_from_slice(value);
        }
        if line == CLOSE_MARKER {
            self.pending.clear();
        }

        if !self.pending.is_complete() {
            return Flow::Continue;
        }

        let (first, second) = self.pending.take();
        if self.buffer.next_match().is_some() {
            self.buffer.push_pair(&first, &second);
        }
        self.buffer.flow()
    }

    fn matched(&self) -> u64 {
        self.buffer.matched()
    }

    fn finish(self) -> Extraction {
        self.buffer.into_extraction()
    }
}

/// 요청 모드에 따라 선택되는 추출기
#[derive(Debug)]
pub enum ExtractorKind {
    Single(SingleFieldExtractor),
    Pair(PairFieldExtractor),
}

impl ExtractorKind {
    /// 요청으로부터 추출기 생성
    pub fn for_request(request: &ExtractionRequest) -> Result<Self> {
        request.validate()?;
        let buffer = RecordBuffer::for_request(request);
        let extractor = match request.mode() {
            ExtractionMode::SingleValue { prefix } => ExtractorKind::Single(
                SingleFieldExtractor::new(PrefixMatcher::new(prefix.as_str())?, buffer),
            ),
            ExtractionMode::PairValue { first, second } => {
                ExtractorKind::Pair(PairFieldExtractor::new(
                    PrefixMatcher::new(first.as_str())?,
                    PrefixMatcher::new(second.as_str())?,
                    buffer,
                ))
            }
        };
        Ok(extractor)
    }
}

impl Extractor for ExtractorKind {
    fn consume(&mut self, line: &[u8]) -> Flow {
        match self {
            ExtractorKind::Single(e) => e.consume(line),
            ExtractorKind::Pair(e) => e.consume(line),
        }
    }

    fn matched(&self) -> u64 {
        match self {
            ExtractorKind::Single(e) => e.matched(),
            ExtractorKind::Pair(e) => e.matched(),
        }
    }

    fn finish(self) -> Extraction {
        match self {
            ExtractorKind::Single(e) => e.finish(),
            ExtractorKind::Pair(e) => e.finish(),
        }
    }
}

/// 메모리 안의 줄 목록에서 추출 (동기 실행)
///
/// # Examples
/// ```
/// use vextract::extractor::extract_lines;
/// use vextract::request::{Delimiter, ExtractionRequest};
/// use vextract::locale::DecimalMark;
///
/// let request = ExtractionRequest::single("A:")
///     .with_delimiter(Delimiter::Comma)
///     .with_decimal(DecimalMark::Point);
/// let result = extract_lines(&request, ["A:1", "B:x", "A:2"]).unwrap();
/// assert_eq!(result.text, b"0,1\r\n1,2\r\n");
/// assert_eq!(result.count, 2);
/// ```
pub fn extract_lines<I>(request: &ExtractionRequest, lines: I) -> Result<Extraction>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut extractor = ExtractorKind::for_request(request)?;
    for line in lines {
        if extractor.consume(line.as_ref()) == Flow::Stop {
            break;
        }
    }
    Ok(extractor.finish())
}

/// 줄 소스에서 추출하며 통계를 갱신 (동기 실행)
///
/// # Arguments
/// * `request` - 추출 요청
/// * `reader` - 줄 단위 입력
/// * `stats` - 진행 상황을 기록할 공유 통계
pub fn extract_from_reader<R: BufRead>(
    request: &ExtractionRequest,
    reader: R,
    stats: &Statistics,
) -> Result<Extraction> {
    let mut extractor = ExtractorKind::for_request(request)?;

    for line in LineReader::new(reader) {
        let line = line.map_err(|e| ExtractError::ReadFailed {
            reason: e.to_string(),
        })?;
        stats.add_line(line.raw_len as u64);

        let flow = extractor.consume(&line.bytes);
        stats.set_values_matched(extractor.matched());
        if flow == Flow::Stop {
            debug!(matched = extractor.matched(), "range end reached, stop reading");
            break;
        }
    }

    let extraction = extractor.finish();
    stats.set_records_extracted(extraction.records);
    info!(
        matched = extraction.count,
        records = extraction.records,
        lines = stats.get_lines_read(),
        "extraction finished"
    );
    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(range: RecordRange) -> ExtractionRequest {
        ExtractionRequest::single("A:")
            .with_delimiter(Delimiter::Comma)
            .with_decimal(DecimalMark::Point)
            .with_range(range)
    }

    fn pair() -> ExtractionRequest {
        ExtractionRequest::pair("X=", "Y=")
            .with_delimiter(Delimiter::Semicolon)
            .with_decimal(DecimalMark::Point)
    }

    const SINGLE_LINES: [&str; 4] = ["A:1", "B:x", "A:2", "A:3"];

    #[test]
    fn test_single_full_range() {
        let result = extract_lines(&single(RecordRange::unbounded()), SINGLE_LINES).unwrap();
        assert_eq!(result.text, b"0,1\r\n1,2\r\n2,3\r\n");
        assert_eq!(result.count, 3);
        assert_eq!(result.records, 3);
    }

    #[test]
    fn test_single_index_is_offset_within_range() {
        let range = RecordRange::new(2, Some(2)).unwrap();
        let result = extract_lines(&single(range), SINGLE_LINES).unwrap();
        assert_eq!(result.text, b"0,2\r\n");
        assert_eq!(result.records, 1);
        // 범위 끝(두 번째 값)에서 읽기를 멈추므로 세 번째 값은 세지 않음
        assert_eq!(result.count, 2);
    }

    #[test]
    fn test_single_open_range_from_start() {
        let range = RecordRange::new(2, None).unwrap();
        let result = extract_lines(&single(range), SINGLE_LINES).unwrap();
        assert_eq!(result.text, b"0,2\r\n1,3\r\n");
        assert_eq!(result.count, 3);
    }

    #[test]
    fn test_single_stops_at_range_end() {
        let range = RecordRange::new(1, Some(2)).unwrap();
        let mut extractor = ExtractorKind::for_request(&single(range)).unwrap();
        assert_eq!(extractor.consume(b"A:1"), Flow::Continue);
        assert_eq!(extractor.consume(b"B:x"), Flow::Continue);
        assert_eq!(extractor.consume(b"A:2"), Flow::Stop);
        assert_eq!(extractor.finish().count, 2);
    }

    #[test]
    fn test_single_empty_value_still_counts() {
        let result = extract_lines(&single(RecordRange::unbounded()), ["A:", "A:5"]).unwrap();
        assert_eq!(result.text, b"0,\r\n1,5\r\n");
    }

    #[test]
    fn test_single_comma_decimal() {
        let request = ExtractionRequest::single("T=")
            .with_delimiter(Delimiter::Tab)
            .with_decimal(DecimalMark::Comma);
        let result = extract_lines(&request, ["T=21.5", "T=1.000.2"]).unwrap();
        assert_eq!(result.text, b"0\t21,5\r\n1\t1,000,2\r\n");
    }

    #[test]
    fn test_pair_blocks() {
        let lines = ["{", "X=1", "Y=2", "}", "{", "X=3", "Y=4", "}"];
        let result = extract_lines(&pair(), lines).unwrap();
        assert_eq!(result.text, b"1;2\r\n3;4\r\n");
        assert_eq!(result.count, 2);
    }

    #[test]
    fn test_pair_incomplete_block_emits_nothing() {
        let lines = ["{", "X=1", "}", "{", "Y=2", "}"];
        let result = extract_lines(&pair(), lines).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.count, 0);
    }

    #[test]
    fn test_pair_resets_after_emission() {
        let lines = ["{", "X=1", "Y=2", "Y=3", "}"];
        let result = extract_lines(&pair(), lines).unwrap();
        assert_eq!(result.text, b"1;2\r\n");
        assert_eq!(result.count, 1);
    }

    #[test]
    fn test_pair_without_boundaries() {
        let lines = ["X=1", "Y=2", "X=3", "Y=4"];
        let result = extract_lines(&pair(), lines).unwrap();
        assert_eq!(result.text, b"1;2\r\n3;4\r\n");
    }

    #[test]
    fn test_pair_open_marker_discards_partial() {
        let lines = ["X=1", "{", "Y=2", "X=9", "}"];
        let result = extract_lines(&pair(), lines).unwrap();
        assert_eq!(result.text, b"9;2\r\n");
    }

    #[test]
    fn test_pair_empty_value_does_not_complete() {
        let lines = ["{", "X=", "Y=2", "}"];
        let result = extract_lines(&pair(), lines).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_pair_same_prefix_pairs_on_one_line() {
        let request = ExtractionRequest::pair("V=", "V=")
            .with_delimiter(Delimiter::Space)
            .with_decimal(DecimalMark::Comma);
        let result = extract_lines(&request, ["V=0.5"]).unwrap();
        assert_eq!(result.text, b"0,5 0,5\r\n");
    }

    #[test]
    fn test_pair_range() {
        let lines = [
            "{", "X=1", "Y=2", "}", "{", "X=3", "Y=4", "}", "{", "X=5", "Y=6", "}",
        ];
        // 두 번째 레코드에서 읽기를 멈춰야 함
        let request = pair().with_range(RecordRange::new(2, Some(2)).unwrap());
        let mut extractor = ExtractorKind::for_request(&request).unwrap();
        let mut consumed = 0;
        for line in lines {
            consumed += 1;
            if extractor.consume(line.as_bytes()) == Flow::Stop {
                break;
            }
        }
        let result = extractor.finish();
        assert_eq!(result.text, b"3;4\r\n");
        assert_eq!(result.count, 2);
        assert_eq!(consumed, 7);
    }

    #[test]
    fn test_for_request_rejects_empty_prefix() {
        let result = ExtractorKind::for_request(&ExtractionRequest::pair("X=", ""));
        assert!(matches!(
            result,
            Err(ExtractError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_extract_from_reader_updates_stats() {
        let stats = Statistics::new();
        let input: &[u8] = b"A:1\r\nB:x\r\nA:2\r\n";
        let result = extract_from_reader(&single(RecordRange::unbounded()), input, &stats).unwrap();

        assert_eq!(result.text, b"0,1\r\n1,2\r\n");
        assert_eq!(stats.get_lines_read(), 3);
        assert_eq!(stats.get_values_matched(), 2);
        assert_eq!(stats.get_records_extracted(), 2);
    }

    #[test]
    fn test_extract_from_reader_crlf_boundaries() {
        let stats = Statistics::new();
        let input: &[u8] = b"{\r\nX=1.5\r\nY=2\r\n}\r\n";
        let result = extract_from_reader(&pair(), input, &stats).unwrap();
        assert_eq!(result.text, b"1.5;2\r\n");
    }

    #[test]
    fn test_extract_from_reader_passes_non_utf8_bytes() {
        let stats = Statistics::new();
        let request = ExtractionRequest::single("T=").with_decimal(DecimalMark::Point);
        let input: &[u8] = b"T=5\xb5g\n";
        let result = extract_from_reader(&request, input, &stats).unwrap();
        assert_eq!(result.text, b"0\t5\xb5g\r\n");
    }

    /// 첫 줄을 돌려준 뒤 읽기 에러를 내는 입력
    struct FailingReader {
        served: bool,
    }

    impl std::io::Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.served {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
            }
            self.served = true;
            let line = b"A:1\n";
            buf[..line.len()].copy_from_slice(line);
            Ok(line.len())
        }
    }

    #[test]
    fn test_extract_from_reader_read_error() {
        let stats = Statistics::new();
        let reader = std::io::BufReader::new(FailingReader { served: false });
        let result = extract_from_reader(&single(RecordRange::unbounded()), reader, &stats);

        match result {
            Err(ExtractError::ReadFailed { reason }) => assert!(reason.contains("disk gone")),
            other => panic!("expected ReadFailed, got {:?}", other),
        }
        assert_eq!(stats.get_lines_read(), 1);
    }
}
