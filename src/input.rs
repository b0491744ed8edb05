//! 입력 파일 모듈
//!
//! 입력 데이터 파일을 줄 단위 소스로 엽니다. 큰 파일은 메모리 매핑을 사용합니다.

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::Path;
use tracing::debug;

use crate::error::{ExtractError, Result};

/// 이 크기 이상이면 메모리 매핑 사용 (10MB)
pub const DEFAULT_MMAP_THRESHOLD: u64 = 10 * 1024 * 1024;

/// 작업 스레드로 넘길 수 있는 줄 소스
pub type LineSource = Box<dyn BufRead + Send>;

/// 입력 파일 열기
///
/// # Arguments
/// * `path` - 입력 데이터 파일 경로
/// * `mmap_threshold` - 메모리 매핑을 사용할 최소 파일 크기
///
/// # Returns
/// 줄 단위로 읽을 수 있는 소스 또는 `InputUnavailable`
pub fn open_input(path: &Path, mmap_threshold: u64) -> Result<LineSource> {
    let unavailable = |e: io::Error| ExtractError::InputUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let file = File::open(path).map_err(unavailable)?;
    let metadata = file.metadata().map_err(unavailable)?;
    if metadata.is_dir() {
        return Err(ExtractError::InputUnavailable {
            path: path.to_path_buf(),
            reason: "폴더입니다".to_string(),
        });
    }

    let file_size = metadata.len();
    if file_size > 0 && file_size >= mmap_threshold {
        // 대용량 파일: 메모리 매핑 사용
        let mmap = unsafe { Mmap::map(&file).map_err(unavailable)? };
        debug!(path = %path.display(), file_size, "memory-mapped input");
        Ok(Box::new(Cursor::new(mmap)))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// 읽어 들인 한 줄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 줄 끝 문자를 뗀 원본 바이트
    pub bytes: Vec<u8>,
    /// 줄 끝 문자를 포함한 원본 바이트 수
    pub raw_len: usize,
}

/// `\n`과 `\r\n`을 모두 줄 끝으로 인식하는 줄 반복자
///
/// 인코딩을 해석하지 않으므로 UTF-8이 아닌 바이트도 그대로 전달됩니다.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<RawLine>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(raw_len) => {
                let mut end = self.buf.len();
                if self.buf[..end].ends_with(b"\n") {
                    end -= 1;
                }
                if self.buf[..end].ends_with(b"\r") {
                    end -= 1;
                }
                let bytes = self.buf[..end].to_vec();
                Some(Ok(RawLine { bytes, raw_len }))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
