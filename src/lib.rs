//! vextract - VALUE EXTRACTOR
//!
//! 줄 단위 반구조화 텍스트 파일에서 값을 추출하여 구분자 형식 표로 저장하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🔍 **접두사 추출**: 지정한 접두사로 시작하는 줄에서 값을 잘라냄
//! - 🧩 **값 두 개 모드**: `{` ... `}` 블록 안의 두 값을 한 레코드로 짝지음
//! - 📏 **범위 선택**: 1부터 시작하는 `[시작, 끝]` 범위의 값만 출력
//! - 🔢 **소수점 변환**: `.`을 `,`로 바꾸는 소수점 표기 선택
//! - 🧵 **백그라운드 처리**: 읽기와 쓰기를 작업 스레드에서 실행하고 완료를 폴링
//! - 🗺️ **메모리 매핑**: 대용량 입력 파일은 메모리 매핑으로 읽음
//! - 🎨 **컬러 출력**: 타임스탬프 상태 메시지와 진행 스피너
//!
//! # 예제
//!
//! ```bash
//! # 값 하나 추출
//! vextract -i data.txt -1 "T="
//!
//! # 값 두 개 추출, 세미콜론 구분
//! vextract -i data.txt -m pair -1 "X=" -2 "Y=" -d semicolon
//!
//! # 10번째부터 20번째 값만, 소수점 유지
//! vextract -i data.txt -1 "T=" --start 10 --stop 20 --decimal point
//! ```

pub mod classifier;
pub mod cli;
pub mod coordinator;
pub mod error;
pub mod extractor;
pub mod input;
pub mod locale;
pub mod request;
pub mod run;
pub mod sink;
pub mod stats;
pub mod status;
pub mod task;

// Re-exports for convenient access
pub use cli::Args;
pub use coordinator::{ExtractionCoordinator, ExtractionHandle};
pub use error::{ExtractError, Result};
pub use extractor::{extract_from_reader, extract_lines, Extraction, Extractor, ExtractorKind};
pub use locale::{to_comma_decimal, DecimalMark};
pub use request::{Delimiter, ExtractionMode, ExtractionRequest, ModeKind, RecordRange};
pub use run::{run_extraction, RunOutcome, RunSummary};
pub use sink::{Sink, WriteHandle};
pub use stats::{format_bytes, Statistics};
pub use status::{Reporter, StatusLevel, StatusLog, StatusMessage};
